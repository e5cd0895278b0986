//! Handlers for carrier management endpoints.

use std::collections::HashMap;

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::carrier::{
    CarrierItem, CarrierTransformer, CreateCarrierRequest, UpdateCarrierRequest,
};
use crate::api::dto::envelope::{self, CollectionResponse, ItemResponse};
use crate::api::extract::{JsonBody, PathParam, QueryString};
use crate::error::AppError;
use crate::state::AppState;

/// Lists carriers, one page at a time.
///
/// # Endpoint
///
/// `GET /api/v1/carriers?page=2&page_size=20&filter=name:like:ex&sort=-base_fee_cents`
///
/// # Errors
///
/// Returns 400 with the offending parameters if the query is malformed.
pub async fn list_carriers_handler(
    State(state): State<AppState>,
    QueryString(params): QueryString<HashMap<String, String>>,
) -> Result<Json<CollectionResponse<CarrierItem>>, AppError> {
    let page = state.carrier_service.list_carriers(&params).await?;

    Ok(Json(envelope::paginated(page, &CarrierTransformer)))
}

/// Creates a carrier.
///
/// # Endpoint
///
/// `POST /api/v1/carriers`
///
/// # Errors
///
/// Returns 400 if the body is malformed or validation fails.
/// Returns 409 if the code or name is taken.
pub async fn create_carrier_handler(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateCarrierRequest>,
) -> Result<(StatusCode, Json<ItemResponse<CarrierItem>>), AppError> {
    payload.check()?;

    let carrier = state
        .carrier_service
        .create_carrier(payload.into_new_carrier())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(envelope::item(carrier, &CarrierTransformer)),
    ))
}

/// # Endpoint
///
/// `GET /api/v1/carriers/{id}`
pub async fn get_carrier_handler(
    PathParam(id): PathParam<i64>,
    State(state): State<AppState>,
) -> Result<Json<ItemResponse<CarrierItem>>, AppError> {
    let carrier = state.carrier_service.get_carrier(id).await?;

    Ok(Json(envelope::item(carrier, &CarrierTransformer)))
}

/// Partially updates a carrier.
///
/// # Endpoint
///
/// `PUT /api/v1/carriers/{id}` or `PATCH /api/v1/carriers/{id}`
///
/// Absent fields are left unchanged. `tracking_url: null` clears the URL.
///
/// # Errors
///
/// Returns 400 if validation fails.
/// Returns 404 if the carrier does not exist.
/// Returns 409 if the new code or name is taken.
pub async fn update_carrier_handler(
    PathParam(id): PathParam<i64>,
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<UpdateCarrierRequest>,
) -> Result<Json<ItemResponse<CarrierItem>>, AppError> {
    payload.check()?;

    let carrier = state
        .carrier_service
        .update_carrier(id, payload.into_update())
        .await?;

    Ok(Json(envelope::item(carrier, &CarrierTransformer)))
}

/// Permanently deletes a carrier.
///
/// # Endpoint
///
/// `DELETE /api/v1/carriers/{id}`
///
/// # Errors
///
/// Returns 404 if the carrier does not exist.
pub async fn delete_carrier_handler(
    PathParam(id): PathParam<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.carrier_service.delete_carrier(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
