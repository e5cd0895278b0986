//! Domain entity representing a shipping carrier.

use chrono::{DateTime, Utc};

/// Volumetric divisor applied when a new carrier does not specify one (cm³ per kg).
pub const DEFAULT_DIM_DIVISOR: i32 = 5000;

/// Currency assigned to a new carrier when none is given.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Upper bound for `base_fee_cents` and `per_kg_cents`.
pub const MAX_FEE_CENTS: i64 = 100_000_000;

/// Transit time assigned to a new carrier when none is given.
pub const DEFAULT_TRANSIT_DAYS: i32 = 5;

/// A shipping provider with its tariff parameters.
///
/// Rates are computed as `base_fee_cents + per_kg_cents * billable_weight`,
/// where billable weight accounts for the volumetric divisor.
#[derive(Debug, Clone, PartialEq)]
pub struct Carrier {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub base_fee_cents: i64,
    pub per_kg_cents: i64,
    pub dim_divisor: i32,
    pub currency: String,
    pub transit_days: i32,
    pub tracking_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input data for creating a new carrier.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCarrier {
    pub name: String,
    pub code: String,
    pub base_fee_cents: i64,
    pub per_kg_cents: i64,
    pub dim_divisor: i32,
    pub currency: String,
    pub transit_days: i32,
    pub tracking_url: Option<String>,
}

/// Partial update for an existing carrier.
///
/// `None` leaves a field unchanged. For `tracking_url`, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateCarrier {
    pub name: Option<String>,
    pub code: Option<String>,
    pub base_fee_cents: Option<i64>,
    pub per_kg_cents: Option<i64>,
    pub dim_divisor: Option<i32>,
    pub currency: Option<String>,
    pub transit_days: Option<i32>,
    pub tracking_url: Option<Option<String>>,
}

impl UpdateCarrier {
    /// Returns true when the update would not change anything.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.code.is_none()
            && self.base_fee_cents.is_none()
            && self.per_kg_cents.is_none()
            && self.dim_divisor.is_none()
            && self.currency.is_none()
            && self.transit_days.is_none()
            && self.tracking_url.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_default_is_empty() {
        assert!(UpdateCarrier::default().is_empty());
    }

    #[test]
    fn test_update_with_field_is_not_empty() {
        let update = UpdateCarrier {
            transit_days: Some(1),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
