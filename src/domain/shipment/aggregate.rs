//! The [`Shipment`] aggregate.

use crate::domain::entities::Carrier;
use crate::domain::shipment::{Package, Rate};
use crate::error::FieldErrors;

const MAX_POSTAL_CODE_LEN: usize = 16;

/// Rate computation was rejected, with the offending inputs listed.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ShipmentError {
    pub message: String,
    pub fields: FieldErrors,
}

impl ShipmentError {
    pub fn new(message: impl Into<String>, fields: FieldErrors) -> Self {
        Self {
            message: message.into(),
            fields,
        }
    }
}

/// A package bound for one postal code, quoted across a set of carriers.
#[derive(Debug, Clone, Default)]
pub struct Shipment {
    to_postal_code: String,
    carriers: Vec<Carrier>,
    package: Option<Package>,
}

impl Shipment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Destination postal code. Empty means unspecified.
    pub fn with_to_postal_code(mut self, postal_code: impl Into<String>) -> Self {
        self.to_postal_code = postal_code.into();
        self
    }

    pub fn add_carrier(mut self, carrier: Carrier) -> Self {
        self.carriers.push(carrier);
        self
    }

    pub fn with_carriers(mut self, carriers: impl IntoIterator<Item = Carrier>) -> Self {
        self.carriers.extend(carriers);
        self
    }

    pub fn with_package(mut self, package: Package) -> Self {
        self.package = Some(package);
        self
    }

    /// Quotes the package with every carrier, cheapest first.
    ///
    /// Ties on amount are ordered by carrier name. No carriers yields an
    /// empty list.
    ///
    /// # Errors
    ///
    /// Returns [`ShipmentError`] when the package is missing or out of range,
    /// the postal code is malformed, a carrier has a non-positive volumetric
    /// divisor, or a carrier's amount does not fit in `i64` cents.
    pub fn rates(&self) -> Result<Vec<Rate>, ShipmentError> {
        let mut fields = FieldErrors::new();

        match &self.package {
            Some(package) => package.check(&mut fields),
            None => {
                fields.insert("package".to_string(), vec!["Package is required".to_string()]);
            }
        }

        if !is_valid_postal_code(&self.to_postal_code) {
            fields.insert(
                "to_postal_code".to_string(),
                vec![format!(
                    "At most {MAX_POSTAL_CODE_LEN} letters, digits, spaces or hyphens"
                )],
            );
        }

        let bad_carriers: Vec<String> = self
            .carriers
            .iter()
            .filter(|c| c.dim_divisor <= 0)
            .map(|c| format!("Carrier `{}` has a non-positive dim_divisor", c.code))
            .collect();
        if !bad_carriers.is_empty() {
            fields.insert("carriers".to_string(), bad_carriers);
        }

        let package = match &self.package {
            Some(package) if fields.is_empty() => package,
            _ => return Err(ShipmentError::new("Unable to compute rates", fields)),
        };

        let mut rates = Vec::with_capacity(self.carriers.len());
        let mut unpriceable = Vec::new();
        for carrier in &self.carriers {
            match self.quote(carrier, package) {
                Some(rate) => rates.push(rate),
                None => unpriceable.push(format!(
                    "Rate for carrier `{}` exceeds the supported amount",
                    carrier.code
                )),
            }
        }
        if !unpriceable.is_empty() {
            fields.insert("carriers".to_string(), unpriceable);
            return Err(ShipmentError::new("Unable to compute rates", fields));
        }

        rates.sort_by(|a, b| {
            a.amount_cents
                .cmp(&b.amount_cents)
                .then_with(|| a.carrier_name.cmp(&b.carrier_name))
        });

        Ok(rates)
    }

    /// `None` when the amount overflows `i64` cents.
    fn quote(&self, carrier: &Carrier, package: &Package) -> Option<Rate> {
        let volumetric = package.volume_cm3() / f64::from(carrier.dim_divisor);
        let billable = round_up_to_tenth(package.weight().max(volumetric));
        let weight_charge = whole_cents(carrier.per_kg_cents as f64 * billable)?;
        let amount_cents = carrier.base_fee_cents.checked_add(weight_charge)?;

        Some(Rate {
            carrier_id: carrier.id,
            carrier_name: carrier.name.clone(),
            carrier_code: carrier.code.clone(),
            currency: carrier.currency.clone(),
            amount_cents,
            billable_weight_kg: billable,
            transit_days: carrier.transit_days,
            to_postal_code: self.to_postal_code.clone(),
        })
    }
}

/// Rounds to the nearest cent, or `None` if the result is not a valid `i64`.
fn whole_cents(amount: f64) -> Option<i64> {
    let rounded = amount.round();
    // i64::MAX as f64 is 2^63, the first value that no longer fits.
    if rounded.is_finite() && rounded >= 0.0 && rounded < i64::MAX as f64 {
        Some(rounded as i64)
    } else {
        None
    }
}

/// Rounds up to the next 0.1, tolerating float noise such as `2.1 * 10.0`.
fn round_up_to_tenth(kg: f64) -> f64 {
    ((kg * 10.0) - 1e-6).ceil() / 10.0
}

fn is_valid_postal_code(code: &str) -> bool {
    code.chars().count() <= MAX_POSTAL_CODE_LEN
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '-')
}
