//! Request inspection helpers.
//!
//! # Responsibilities
//! - Generate a request ID (UUID v4) when the client did not send one
//! - Derive the best-effort client identifier from proxy headers
//! - Normalize the request path used as the rate limit key

use axum::http::{HeaderMap, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};

pub const X_REQUEST_ID: &str = "x-request-id";
pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
pub const X_REAL_IP: &str = "x-real-ip";

/// Client identifier used when no proxy header is present.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Identify the client from `X-Forwarded-For`, then `X-Real-IP`.
///
/// Only the first hop of `X-Forwarded-For` is used. Empty values fall
/// through to the next source; with nothing usable the identifier is
/// `"unknown"`, so all header-less clients share one bucket.
pub fn client_identifier(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get(X_FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let real_ip = || {
        headers
            .get(X_REAL_IP)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    forwarded
        .or_else(real_ip)
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}

/// Strip a trailing slash so `/api/v1/health/` and `/api/v1/health` share
/// a counter. The root path is left alone.
pub fn normalize_path(path: &str) -> &str {
    match path.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => path,
    }
}
