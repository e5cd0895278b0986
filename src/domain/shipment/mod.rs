//! Shipment aggregate and rate computation.
//!
//! A [`Shipment`] gathers a destination, a set of carriers and one
//! [`Package`], then produces one [`Rate`] per carrier.
//!
//! # Pricing
//!
//! - volumetric weight = length × width × height / `dim_divisor`
//! - billable weight = max(actual, volumetric), rounded up to 0.1 kg
//! - amount = `base_fee_cents` + `per_kg_cents` × billable weight (rounded to a cent)

pub mod aggregate;
pub mod package;
pub mod rate;

pub use aggregate::{Shipment, ShipmentError};
pub use package::{MAX_DIMENSION_CM, MAX_WEIGHT_KG, Package};
pub use rate::Rate;
