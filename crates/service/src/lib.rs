//! Service layer providing the directory's business rules on top of models.
//! - Separates moderation and auth logic from data access.
//! - Exposes repository traits with SeaORM and in-memory implementations.
//! - Provides clear error types and documented interfaces.

pub mod auth;
pub mod listings;
