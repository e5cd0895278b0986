//! API route configuration.
//!
//! All API endpoints require Bearer token authentication via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{
    create_carrier_handler, delete_carrier_handler, get_carrier_handler, list_carriers_handler,
    quote_rates_handler, rates_handler, update_carrier_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// All API routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `GET    /carriers`        - List carriers (paginated, filterable, sortable)
/// - `POST   /carriers`        - Create a carrier
/// - `GET    /carriers/rates`  - Quote the default package with every carrier
/// - `POST   /carriers/rates`  - Same, with package overrides in the body
/// - `GET    /carriers/{id}`   - Show a carrier
/// - `PUT    /carriers/{id}`   - Update a carrier
/// - `PATCH  /carriers/{id}`   - Update a carrier
/// - `DELETE /carriers/{id}`   - Delete a carrier
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/carriers",
            get(list_carriers_handler).post(create_carrier_handler),
        )
        .route(
            "/carriers/rates",
            get(rates_handler).post(quote_rates_handler),
        )
        .route(
            "/carriers/{id}",
            get(get_carrier_handler)
                .put(update_carrier_handler)
                .patch(update_carrier_handler)
                .delete(delete_carrier_handler),
        )
}
