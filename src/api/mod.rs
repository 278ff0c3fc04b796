//! REST endpoints under `/api/v1`.
//!
//! # Routes
//! ```text
//! GET        /api/v1            index document
//! GET        /api/v1/status     platform status
//! GET        /api/v1/health     liveness + uptime
//! GET        /api/v1/services   service directory
//! GET        /api/v1/stats      aggregate counts
//! POST       /api/v1/init       create store tables
//! GET|POST   /api/v1/waitlist   schema | signup
//! GET|POST   /api/v1/feedback   schema | submit
//! GET|POST   /api/v1/apply      schema | submit
//! ```
//!
//! Any other method on these paths gets a 405 listing what is accepted.

pub mod discovery;
pub mod ids;
pub mod stats;
pub mod submissions;

use axum::{
    routing::{get, post, MethodRouter},
    Router,
};

use crate::http::error::ApiError;
use crate::http::server::AppState;

fn only(route: MethodRouter<AppState>, allowed: &'static [&'static str]) -> MethodRouter<AppState> {
    route.fallback(move || async move { ApiError::method_not_allowed(allowed) })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1", only(get(discovery::index), &["GET"]))
        .route("/api/v1/status", only(get(discovery::status), &["GET"]))
        .route("/api/v1/health", only(get(discovery::health), &["GET"]))
        .route("/api/v1/services", only(get(discovery::services), &["GET"]))
        .route("/api/v1/stats", only(get(stats::stats), &["GET"]))
        .route("/api/v1/init", only(post(stats::init), &["POST"]))
        .route(
            "/api/v1/waitlist",
            only(
                get(submissions::waitlist_schema).post(submissions::join_waitlist),
                &["GET", "POST"],
            ),
        )
        .route(
            "/api/v1/feedback",
            only(
                get(submissions::feedback_schema).post(submissions::submit_feedback),
                &["GET", "POST"],
            ),
        )
        .route(
            "/api/v1/apply",
            only(
                get(submissions::application_schema).post(submissions::submit_application),
                &["GET", "POST"],
            ),
        )
}
