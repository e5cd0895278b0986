//! Application layer services implementing business logic.
//!
//! Services coordinate repository calls, validation and rate computation, and
//! give HTTP handlers a small API that only speaks [`crate::error::AppError`].
//!
//! # Available Services
//!
//! - [`services::carrier_service::CarrierService`] - Carrier CRUD and rate quotes
//! - [`services::auth_service::AuthService`] - API token authentication

pub mod services;
