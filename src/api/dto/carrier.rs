//! DTOs for carrier management.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::{Validate, ValidateUrl, ValidationError, ValidationErrors};

use crate::api::dto::envelope::Transformer;
use crate::domain::entities::carrier::{
    DEFAULT_CURRENCY, DEFAULT_DIM_DIVISOR, DEFAULT_TRANSIT_DAYS,
};
use crate::domain::entities::{Carrier, NewCarrier, UpdateCarrier};

/// Lowercase slug, 1-32 characters, starting with a letter or digit.
static CARRIER_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9_-]{0,31}$").unwrap());

static CURRENCY_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]{3}$").unwrap());

/// Request body for `POST /carriers`.
///
/// Only `name` is required. A missing `code` is derived from the name
/// (`"Royal Mail"` becomes `"royal-mail"`).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCarrierRequest {
    #[validate(
        required(message = "Name is required"),
        length(min = 1, max = 100, message = "Name must be 1-100 characters")
    )]
    pub name: Option<String>,

    #[validate(regex(
        path = *CARRIER_CODE_REGEX,
        message = "Code must be a lowercase slug of at most 32 characters"
    ))]
    pub code: Option<String>,

    #[validate(range(
        min = 0,
        max = 100_000_000,
        message = "Must be between 0 and 100000000"
    ))]
    pub base_fee_cents: Option<i64>,

    #[validate(range(
        min = 0,
        max = 100_000_000,
        message = "Must be between 0 and 100000000"
    ))]
    pub per_kg_cents: Option<i64>,

    #[validate(range(min = 1, max = 100_000, message = "Must be between 1 and 100000"))]
    pub dim_divisor: Option<i32>,

    #[validate(regex(path = *CURRENCY_REGEX, message = "Must be a 3-letter uppercase code"))]
    pub currency: Option<String>,

    #[validate(range(min = 0, max = 365, message = "Must be between 0 and 365"))]
    pub transit_days: Option<i32>,

    #[validate(url(message = "Invalid URL format"))]
    pub tracking_url: Option<String>,
}

impl CreateCarrierRequest {
    /// Runs field validation, including the code derived from the name.
    ///
    /// # Errors
    ///
    /// Returns every field that failed validation.
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);

        if self.code.is_none()
            && let Some(name) = &self.name
            && !CARRIER_CODE_REGEX.is_match(&slugify(name))
        {
            errors.add(
                "code",
                ValidationError::new("regex")
                    .with_message("Code cannot be derived from name; provide one".into()),
            );
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Converts a checked request into domain input, filling defaults.
    pub fn into_new_carrier(self) -> NewCarrier {
        let name = self.name.unwrap_or_default();
        let code = self.code.unwrap_or_else(|| slugify(&name));

        NewCarrier {
            name,
            code,
            base_fee_cents: self.base_fee_cents.unwrap_or(0),
            per_kg_cents: self.per_kg_cents.unwrap_or(0),
            dim_divisor: self.dim_divisor.unwrap_or(DEFAULT_DIM_DIVISOR),
            currency: self
                .currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            transit_days: self.transit_days.unwrap_or(DEFAULT_TRANSIT_DAYS),
            tracking_url: self.tracking_url,
        }
    }
}

/// Request body for `PUT`/`PATCH /carriers/{id}`.
///
/// All fields are optional; absent fields are left unchanged.
///
/// # `tracking_url` semantics
///
/// - **Absent** → leave existing value unchanged
/// - **`null`** → clear it
/// - **URL** → replace it
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCarrierRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(regex(
        path = *CARRIER_CODE_REGEX,
        message = "Code must be a lowercase slug of at most 32 characters"
    ))]
    pub code: Option<String>,

    #[validate(range(
        min = 0,
        max = 100_000_000,
        message = "Must be between 0 and 100000000"
    ))]
    pub base_fee_cents: Option<i64>,

    #[validate(range(
        min = 0,
        max = 100_000_000,
        message = "Must be between 0 and 100000000"
    ))]
    pub per_kg_cents: Option<i64>,

    #[validate(range(min = 1, max = 100_000, message = "Must be between 1 and 100000"))]
    pub dim_divisor: Option<i32>,

    #[validate(regex(path = *CURRENCY_REGEX, message = "Must be a 3-letter uppercase code"))]
    pub currency: Option<String>,

    #[validate(range(min = 0, max = 365, message = "Must be between 0 and 365"))]
    pub transit_days: Option<i32>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub tracking_url: Option<Option<String>>,
}

impl UpdateCarrierRequest {
    /// Runs field validation, including a replacement `tracking_url`.
    ///
    /// # Errors
    ///
    /// Returns every field that failed validation.
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);

        if let Some(Some(url)) = &self.tracking_url
            && !url.validate_url()
        {
            errors.add(
                "tracking_url",
                ValidationError::new("url").with_message("Invalid URL format".into()),
            );
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    pub fn into_update(self) -> UpdateCarrier {
        UpdateCarrier {
            name: self.name,
            code: self.code,
            base_fee_cents: self.base_fee_cents,
            per_kg_cents: self.per_kg_cents,
            dim_divisor: self.dim_divisor,
            currency: self.currency,
            transit_days: self.transit_days,
            tracking_url: self.tracking_url,
        }
    }
}

/// Wire representation of a carrier.
#[derive(Debug, Serialize)]
pub struct CarrierItem {
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

/// Maps [`Carrier`] entities to [`CarrierItem`].
pub struct CarrierTransformer;

impl Transformer<Carrier> for CarrierTransformer {
    type Output = CarrierItem;

    fn transform(&self, c: Carrier) -> CarrierItem {
        CarrierItem {
            id: c.id,
            name: c.name,
            code: c.code,
            base_fee_cents: c.base_fee_cents,
            per_kg_cents: c.per_kg_cents,
            dim_divisor: c.dim_divisor,
            currency: c.currency,
            transit_days: c.transit_days,
            tracking_url: c.tracking_url,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Lowercases and joins alphanumeric runs with `-`, truncated to 32 characters.
fn slugify(name: &str) -> String {
    let mut slug = String::new();
    for word in name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        if !slug.is_empty() {
            slug.push('-');
        }
        slug.push_str(&word.to_ascii_lowercase());
    }
    slug.chars().take(32).collect()
}
