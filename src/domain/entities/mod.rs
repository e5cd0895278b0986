//! Core domain entities.
//!
//! Entities are plain data structures. Creation and partial update inputs live
//! next to the entity they produce:
//!
//! - [`Carrier`] - A persisted shipping provider
//! - [`NewCarrier`] - Input for creating a carrier
//! - [`UpdateCarrier`] - Partial update input

pub mod carrier;

pub use carrier::{Carrier, NewCarrier, UpdateCarrier};
