//! Data Transfer Objects for API requests and responses.
//!
//! Request DTOs are validated with `validator`; responses go through the
//! [`envelope`] transformers.

pub mod carrier;
pub mod envelope;
pub mod health;
pub mod rates;
