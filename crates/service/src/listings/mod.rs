//! Listings module: moderation state machine, ownership rules and the
//! reporting queries (statistics, category directory) on top of a
//! repository abstraction.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::ListingService;
