//! Computed shipping rate.

/// Quote for shipping one package with one carrier.
#[derive(Debug, Clone, PartialEq)]
pub struct Rate {
    pub carrier_id: i64,
    pub carrier_name: String,
    pub carrier_code: String,
    pub currency: String,
    pub amount_cents: i64,
    pub billable_weight_kg: f64,
    pub transit_days: i32,
    pub to_postal_code: String,
}
