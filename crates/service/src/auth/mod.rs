//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Centralizes registration, the two login entry points and token-based
//! identity resolution under the service crate.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use domain::Identity;
pub use service::AuthService;
