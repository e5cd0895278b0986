//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access following the Repository pattern and are
//! implemented by concrete repositories in `crate::infrastructure::persistence`.
//! Mock implementations are generated via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`CarrierRepository`] - Carrier CRUD and listing
//! - [`TokenRepository`] - API token authentication

pub mod carrier_repository;
pub mod token_repository;

pub use carrier_repository::CarrierRepository;
pub use token_repository::{ApiToken, TokenRepository};

#[cfg(test)]
pub use carrier_repository::MockCarrierRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
