//! Domain layer containing business entities and logic.
//!
//! This module is independent of HTTP and storage concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Carrier entity and its creation/update inputs
//! - [`repositories`] - Data access trait definitions
//! - [`query`] - Listing filters, sorting and pagination
//! - [`shipment`] - Shipment aggregate and rate computation
//!
//! # Design Principles
//!
//! - Repository traits define contracts implemented by the infrastructure layer
//! - Orchestration lives in services (see [`crate::application::services`])

pub mod entities;
pub mod query;
pub mod repositories;
pub mod shipment;
