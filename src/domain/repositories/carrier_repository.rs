//! Repository trait for carrier persistence.

use crate::domain::entities::{Carrier, NewCarrier, UpdateCarrier};
use crate::domain::query::{CarrierQuery, Page};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for carriers.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgCarrierRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_carrier.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CarrierRepository: Send + Sync {
    /// Returns one page of carriers matching the query's filters, in its sort order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_all_paginate(&self, query: &CarrierQuery) -> Result<Page<Carrier>, AppError>;

    /// Returns every carrier ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn all(&self) -> Result<Vec<Carrier>, AppError>;

    /// Finds a carrier by its database ID.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find(&self, id: i64) -> Result<Option<Carrier>, AppError>;

    /// Finds a carrier by its unique code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<Carrier>, AppError>;

    /// Creates a new carrier.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the name or code is already taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_carrier: NewCarrier) -> Result<Carrier, AppError>;

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the carrier does not exist.
    /// Returns [`AppError::Conflict`] if the new name or code is already taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn update(&self, id: i64, update: UpdateCarrier) -> Result<Carrier, AppError>;

    /// Permanently deletes a carrier.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the carrier does not exist.
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, id: i64) -> Result<(), AppError>;

    /// Round-trips to the store; used by the health check.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store is unreachable.
    async fn ping(&self) -> Result<(), AppError>;
}
