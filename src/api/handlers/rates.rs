//! Handlers for rate quoting.

use axum::{Json, extract::State};

use crate::api::dto::envelope::{self, CollectionResponse};
use crate::api::dto::rates::{QuoteParams, RateItem, RateTransformer};
use crate::api::extract::{JsonBody, QueryString};
use crate::error::AppError;
use crate::state::AppState;

/// Quotes the configured default package with every carrier.
///
/// # Endpoint
///
/// `GET /api/v1/carriers/rates?weight=3.5&to_postal_code=10115`
///
/// With no carriers stored the response is `{"data": []}`.
///
/// # Errors
///
/// Returns 400 if a parameter is malformed, or a package dimension or the
/// postal code is rejected.
pub async fn rates_handler(
    State(state): State<AppState>,
    QueryString(params): QueryString<QuoteParams>,
) -> Result<Json<CollectionResponse<RateItem>>, AppError> {
    quote(&state, params).await
}

/// Same as [`rates_handler`], with overrides in a JSON body.
///
/// # Endpoint
///
/// `POST /api/v1/carriers/rates`
pub async fn quote_rates_handler(
    State(state): State<AppState>,
    JsonBody(params): JsonBody<QuoteParams>,
) -> Result<Json<CollectionResponse<RateItem>>, AppError> {
    quote(&state, params).await
}

async fn quote(
    state: &AppState,
    params: QuoteParams,
) -> Result<Json<CollectionResponse<RateItem>>, AppError> {
    let rates = state.carrier_service.quote_all_rates(params.into()).await?;

    Ok(Json(envelope::collection(rates, &RateTransformer)))
}
