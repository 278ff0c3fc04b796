//! Response decoration shared by the middleware and handlers.
//!
//! # Responsibilities
//! - Stamp API responses with the version marker and discovery links
//! - Attach CORS allow headers and the CORS preflight reply
//! - Report rate limit state and response time
//! - Build the 429 denial body

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::config::SiteConfig;
use crate::http::error::ErrorCode;
use crate::security::RateDecision;

pub const X_NOUI_VERSION: &str = "x-noui-version";
pub const X_NOUI_DOCS: &str = "x-noui-docs";
pub const X_NOUI_DISCOVERY: &str = "x-noui-discovery";
pub const X_RESPONSE_TIME: &str = "x-response-time";
pub const X_RATELIMIT_LIMIT: &str = "x-ratelimit-limit";
pub const X_RATELIMIT_REMAINING: &str = "x-ratelimit-remaining";
pub const X_RATELIMIT_RESET: &str = "x-ratelimit-reset";

pub const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// Current time as an RFC 3339 string with millisecond precision.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn set(headers: &mut HeaderMap, name: &'static str, value: &str) {
    if let Ok(value) = HeaderValue::from_str(value) {
        headers.insert(HeaderName::from_static(name), value);
    }
}

/// Version marker and discovery links carried by every API response.
pub fn apply_site_headers(headers: &mut HeaderMap, site: &SiteConfig) {
    set(headers, X_NOUI_VERSION, &site.version);
    set(headers, X_NOUI_DOCS, &site.docs_url);
    set(headers, X_NOUI_DISCOVERY, &site.discovery_url);
}

pub fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
}

pub fn apply_rate_limit_headers(headers: &mut HeaderMap, decision: &RateDecision) {
    set(headers, X_RATELIMIT_LIMIT, &decision.limit.to_string());
    set(headers, X_RATELIMIT_REMAINING, &decision.remaining.to_string());
    set(headers, X_RATELIMIT_RESET, &decision.reset_epoch_secs().to_string());
}

pub fn apply_response_time(headers: &mut HeaderMap, elapsed: Duration) {
    set(headers, X_RESPONSE_TIME, &format!("{}ms", elapsed.as_millis()));
}

/// 204 reply to a CORS preflight.
pub fn preflight() -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::NO_CONTENT;
    let headers = response.headers_mut();
    apply_cors_headers(headers);
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static("86400"),
    );
    response
}

#[derive(Debug, Serialize)]
struct RateLimitedBody<'a> {
    error: bool,
    code: ErrorCode,
    message: String,
    limit: u32,
    remaining: u32,
    retry_after: u64,
    docs: &'a str,
}

/// 429 reply for a denied request.
pub fn rate_limited(decision: &RateDecision, retry_after: u64, site: &SiteConfig) -> Response {
    let body = RateLimitedBody {
        error: true,
        code: ErrorCode::RateLimited,
        message: format!("Too many requests. Try again in {} seconds.", retry_after),
        limit: decision.limit,
        remaining: 0,
        retry_after,
        docs: &site.rate_limit_docs_url,
    };

    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
    let headers = response.headers_mut();
    set(headers, "retry-after", &retry_after.to_string());
    set(headers, X_RATELIMIT_LIMIT, &decision.limit.to_string());
    set(headers, X_RATELIMIT_REMAINING, "0");
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    set(headers, X_NOUI_VERSION, &site.version);
    response
}
