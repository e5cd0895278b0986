//! Rate limiting middleware using token bucket algorithm.

use anyhow::{Context, Result};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

/// Per-client-IP rate limiter type used for `/api/v1`.
pub type RateLimitLayer =
    GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Creates a rate limiter replenishing one token every `per_second` seconds,
/// holding at most `burst_size` tokens.
///
/// Defaults from configuration are 2 and 100
/// (`RATE_LIMIT_PER_SECOND`, `RATE_LIMIT_BURST`).
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// Rate limits are applied per client IP address extracted from the
/// socket peer address, so the server must be started with connect info.
///
/// # Errors
///
/// Returns an error if either setting is zero.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .nest("/api/v1", api_routes())
///     .layer(rate_limit::layer(2, 100)?);
/// ```
pub fn layer(per_second: u64, burst_size: u32) -> Result<RateLimitLayer> {
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(per_second)
        .burst_size(burst_size)
        .finish()
        .context("Rate limit period and burst size must be greater than 0")?;

    Ok(GovernorLayer::new(Arc::new(governor_conf)))
}
