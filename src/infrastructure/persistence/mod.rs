//! PostgreSQL repository implementations.
//!
//! Queries are built at runtime with SQLx; listing queries use
//! [`sqlx::QueryBuilder`] so filters and ordering can vary per request.
//!
//! # Repositories
//!
//! - [`PgCarrierRepository`] - Carrier storage, listing and lookup
//! - [`PgTokenRepository`] - API token storage and validation

pub mod pg_carrier_repository;
pub mod pg_token_repository;

pub use pg_carrier_repository::PgCarrierRepository;
pub use pg_token_repository::PgTokenRepository;
