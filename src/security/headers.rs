//! Baseline security response headers.
//!
//! Applied to every response, API or not, including rate limit denials and
//! CORS preflight replies.

use axum::http::{header, HeaderValue};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

pub const NOSNIFF: &str = "nosniff";
pub const FRAME_DENY: &str = "DENY";
pub const HSTS: &str = "max-age=31536000; includeSubDomains";

/// Wrap a router so every response carries the security headers.
pub fn with_security_headers(router: Router) -> Router {
    router
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static(NOSNIFF),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static(FRAME_DENY),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static(HSTS),
        ))
}
