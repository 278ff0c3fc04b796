//! Aggregate stats and schema initialization.

use axum::{extract::State, Json};
use chrono::{Duration, Utc};
use serde_json::{json, Value};

use crate::http::error::ApiError;
use crate::http::response::timestamp;
use crate::http::server::AppState;

pub const TABLES: [&str; 3] = ["noui.waitlist", "noui.feedback", "noui.applications"];

/// Counts only. Nothing that identifies a submitter leaves this handler.
pub async fn stats(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let since = Utc::now() - Duration::hours(24);
    let stats = state.store.stats(since).map_err(|e| {
        tracing::error!(error = %e, "Stats query failed");
        ApiError::internal("Stats unavailable. Database may not be initialized.")
            .with_details(json!({ "hint": "POST /api/v1/init first." }))
    })?;

    Ok(Json(json!({
        "totals": stats.totals,
        "last_24h": stats.recent,
        "unique_platforms": stats.unique_platforms,
        "timestamp": timestamp(),
        "note": "Counts only — no PII exposed.",
    })))
}

/// Idempotent: calling it on an initialized store changes nothing.
pub async fn init(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state.store.init().map_err(|e| {
        tracing::error!(error = %e, "Store initialization failed");
        ApiError::internal("Database initialization failed.")
            .with_details(json!({ "reason": e.to_string() }))
    })?;
    tracing::info!("Store schema created/verified");

    Ok(Json(json!({
        "initialized": true,
        "message": "Database schema created/verified.",
        "tables": TABLES,
    })))
}
