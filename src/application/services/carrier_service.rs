//! Carrier management and rate quoting.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::{Carrier, NewCarrier, UpdateCarrier};
use crate::domain::query::{Page, QueryParser};
use crate::domain::repositories::CarrierRepository;
use crate::domain::shipment::{Package, Rate, Shipment};
use crate::error::AppError;

/// Package and destination used for quotes when the request does not say.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteDefaults {
    pub package: Package,
    pub to_postal_code: String,
}

impl Default for QuoteDefaults {
    fn default() -> Self {
        Self {
            package: Package::new()
                .with_weight(2.1)
                .with_height(10.0)
                .with_length(20.0)
                .with_width(15.0),
            to_postal_code: String::new(),
        }
    }
}

/// Per-request replacements for [`QuoteDefaults`]. `None` keeps the default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteOverrides {
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub to_postal_code: Option<String>,
}

impl QuoteOverrides {
    fn resolve(self, defaults: &QuoteDefaults) -> (Package, String) {
        let base = defaults.package;
        let package = Package::new()
            .with_weight(self.weight.unwrap_or(base.weight()))
            .with_height(self.height.unwrap_or(base.height()))
            .with_length(self.length.unwrap_or(base.length()))
            .with_width(self.width.unwrap_or(base.width()));
        let postal_code = self
            .to_postal_code
            .unwrap_or_else(|| defaults.to_postal_code.clone());

        (package, postal_code)
    }
}

/// Service for carrier CRUD and shipping rate quotes.
///
/// Every lookup miss is reported as [`AppError::NotFound`] with the message
/// `"Carrier not found"`, whichever operation triggered it.
pub struct CarrierService {
    repository: Arc<dyn CarrierRepository>,
    parser: QueryParser,
    quote_defaults: QuoteDefaults,
}

impl CarrierService {
    pub fn new(
        repository: Arc<dyn CarrierRepository>,
        parser: QueryParser,
        quote_defaults: QuoteDefaults,
    ) -> Self {
        Self {
            repository,
            parser,
            quote_defaults,
        }
    }

    /// Lists carriers using filter, sort and page parameters from the query string.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] with per-parameter field errors if the
    /// query is malformed.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list_carriers(
        &self,
        params: &HashMap<String, String>,
    ) -> Result<Page<Carrier>, AppError> {
        let query = self.parser.parse(params)?;
        self.repository.find_all_paginate(&query).await
    }

    /// Creates a carrier. Input is expected to be validated already.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the code (or name) is taken.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn create_carrier(&self, new_carrier: NewCarrier) -> Result<Carrier, AppError> {
        if self
            .repository
            .find_by_code(&new_carrier.code)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "Carrier code already exists",
                json!({"code": new_carrier.code}),
            ));
        }

        let carrier = self.repository.create(new_carrier).await?;

        tracing::info!(carrier_id = carrier.id, code = %carrier.code, "Carrier created");
        metrics::counter!("carriers_created_total").increment(1);

        Ok(carrier)
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the carrier does not exist.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn get_carrier(&self, id: i64) -> Result<Carrier, AppError> {
        self.repository
            .find(id)
            .await?
            .ok_or_else(|| AppError::not_found("Carrier not found", json!({"id": id})))
    }

    /// Applies a partial update. An empty update returns the carrier unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the carrier does not exist.
    /// Returns [`AppError::Conflict`] if the new code belongs to another carrier.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn update_carrier(
        &self,
        id: i64,
        update: UpdateCarrier,
    ) -> Result<Carrier, AppError> {
        let current = self.get_carrier(id).await?;

        if update.is_empty() {
            return Ok(current);
        }

        if let Some(code) = &update.code
            && *code != current.code
            && self.repository.find_by_code(code).await?.is_some()
        {
            return Err(AppError::conflict(
                "Carrier code already exists",
                json!({"code": code}),
            ));
        }

        let carrier = self.repository.update(id, update).await?;

        tracing::info!(carrier_id = carrier.id, "Carrier updated");
        metrics::counter!("carriers_updated_total").increment(1);

        Ok(carrier)
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the carrier does not exist.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn delete_carrier(&self, id: i64) -> Result<(), AppError> {
        self.get_carrier(id).await?;
        self.repository.delete(id).await?;

        tracing::info!(carrier_id = id, "Carrier deleted");
        metrics::counter!("carriers_deleted_total").increment(1);

        Ok(())
    }

    /// Quotes one package across every stored carrier, cheapest first.
    ///
    /// No paging or filtering is applied: all carriers take part.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] with field errors if the package or
    /// destination is rejected by the rate computation.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn quote_all_rates(&self, overrides: QuoteOverrides) -> Result<Vec<Rate>, AppError> {
        let carriers = self.repository.all().await?;
        let (package, to_postal_code) = overrides.resolve(&self.quote_defaults);

        let shipment = Shipment::new()
            .with_to_postal_code(to_postal_code)
            .with_carriers(carriers)
            .with_package(package);

        let rates = shipment.rates().map_err(|e| {
            tracing::warn!(fields = ?e.fields, "Rate computation rejected");
            AppError::from(e)
        })?;

        metrics::counter!("rate_quotes_total").increment(1);

        Ok(rates)
    }

    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store is unreachable.
    pub async fn health_check(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }
}
