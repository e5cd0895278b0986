//! DTOs for rate quoting.

use serde::{Deserialize, Serialize};

use crate::api::dto::envelope::Transformer;
use crate::application::services::QuoteOverrides;
use crate::domain::shipment::Rate;

/// Optional package and destination overrides.
///
/// Accepted as query string on `GET /carriers/rates` and as JSON body on
/// `POST /carriers/rates`. Omitted fields fall back to the configured defaults.
#[derive(Debug, Default, Deserialize)]
pub struct QuoteParams {
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub to_postal_code: Option<String>,
}

impl From<QuoteParams> for QuoteOverrides {
    fn from(p: QuoteParams) -> Self {
        QuoteOverrides {
            weight: p.weight,
            height: p.height,
            length: p.length,
            width: p.width,
            to_postal_code: p.to_postal_code,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RateItem {
    pub carrier_id: i64,
    pub carrier_name: String,
    pub carrier_code: String,
    pub currency: String,
    pub amount_cents: i64,
    pub billable_weight_kg: f64,
    pub transit_days: i32,
    pub to_postal_code: String,
}

pub struct RateTransformer;

impl Transformer<Rate> for RateTransformer {
    type Output = RateItem;

    fn transform(&self, r: Rate) -> RateItem {
        RateItem {
            carrier_id: r.carrier_id,
            carrier_name: r.carrier_name,
            carrier_code: r.carrier_code,
            currency: r.currency,
            amount_cents: r.amount_cents,
            billable_weight_kg: r.billable_weight_kg,
            transit_days: r.transit_days,
            to_postal_code: r.to_postal_code,
        }
    }
}
