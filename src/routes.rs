//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`   - Health check (public)
//! - `/api/v1/*`      - REST API (Bearer token required, rate limited)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on `/api/v1`
//! - **Authentication** - Bearer token on `/api/v1`
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::config::Config;
use crate::state::AppState;
use anyhow::Result;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Errors
///
/// Returns an error if the rate limit settings are invalid.
pub fn app_router(state: AppState, config: &Config) -> Result<NormalizePath<Router>> {
    let api_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
        .layer(rate_limit::layer(
            config.rate_limit_per_second,
            config.rate_limit_burst,
        )?);

    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api/v1", api_router)
        .with_state(state)
        .layer(tracing::layer());

    Ok(NormalizePathLayer::trim_trailing_slash().layer(router))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::{AuthService, CarrierService, QuoteDefaults};
    use crate::domain::repositories::{MockCarrierRepository, MockTokenRepository};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state() -> AppState {
        let mut carriers = MockCarrierRepository::new();
        carriers.expect_ping().returning(|| Ok(()));

        let config = Config::test_default();
        AppState::new(
            Arc::new(CarrierService::new(
                Arc::new(carriers),
                config.query_parser(),
                QuoteDefaults::default(),
            )),
            Arc::new(AuthService::new(
                Arc::new(MockTokenRepository::new()),
                config.token_signing_secret,
            )),
        )
    }

    #[tokio::test]
    async fn test_health_with_trailing_slash() {
        let app = app_router(state(), &Config::test_default()).unwrap();

        let response = app
            .oneshot(Request::get("/health/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_invalid_rate_limit_is_rejected() {
        let mut config = Config::test_default();
        config.rate_limit_burst = 0;

        assert!(app_router(state(), &config).is_err());
    }
}
