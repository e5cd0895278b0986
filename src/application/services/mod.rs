//! Business logic services for the application layer.

pub mod auth_service;
pub mod carrier_service;

pub use auth_service::AuthService;
pub use carrier_service::{CarrierService, QuoteDefaults, QuoteOverrides};
