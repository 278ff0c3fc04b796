//! API gate: CORS preflight, rate limiting and API response headers.

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request},
    middleware::Next,
    response::Response,
};

use crate::http::error::render_deferred;
use crate::http::request::{client_identifier, normalize_path};
use crate::http::response;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::security::rate_limit::now_millis;

/// Runs in front of every route handler.
///
/// - `OPTIONS` on any path is answered with a 204 preflight.
/// - Deferred [`ApiError`](crate::http::ApiError) responses are rendered
///   against the configured docs URL.
/// - Paths outside the API prefix pass straight through.
/// - API paths are checked against the limiter once; a denial returns 429
///   without reaching the handler, an admission runs the handler and then
///   stamps the response with the decision taken before it ran.
pub async fn api_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();

    if request.method() == Method::OPTIONS {
        return response::preflight();
    }

    let method = request.method().to_string();
    let path = normalize_path(request.uri().path()).to_string();
    let rate_limit = &state.config.rate_limit;
    let docs_url = state.config.site.docs_url.as_str();
    if !path.starts_with(rate_limit.api_prefix.as_str()) {
        return render_deferred(next.run(request).await, docs_url);
    }

    let decision = if rate_limit.enabled {
        let client = client_identifier(request.headers());
        let decision = state.limiter.check(&client, &path);
        metrics::record_tracked_keys(state.limiter.tracked_keys());

        if !decision.allowed {
            let retry_after = decision.retry_after_secs(now_millis());
            tracing::warn!(
                client = %client,
                path = %path,
                limit = decision.limit,
                retry_after,
                "Rate limit exceeded"
            );
            metrics::record_rate_limited(&path);
            metrics::record_request(&method, 429, start);
            return response::rate_limited(&decision, retry_after, &state.config.site);
        }
        Some(decision)
    } else {
        None
    };

    let mut res = render_deferred(next.run(request).await, docs_url);
    metrics::record_request(&method, res.status().as_u16(), start);

    let headers = res.headers_mut();
    response::apply_site_headers(headers, &state.config.site);
    response::apply_cors_headers(headers);
    if let Some(decision) = &decision {
        response::apply_rate_limit_headers(headers, decision);
    }
    response::apply_response_time(headers, start.elapsed());
    res
}
