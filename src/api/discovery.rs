//! Read-only discovery documents: index, status, health, services.

use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::http::response::timestamp;
use crate::http::server::AppState;

pub const TAGLINE: &str = "The internet wasn't built for agents. We're fixing that.";

fn uptime(state: &AppState) -> String {
    format!("{}s", state.started_at.elapsed().as_secs())
}

const MS_PER_DAY: i64 = 86_400_000;

/// Whole days between `launch` and `now`, floored, so the day before launch
/// is -1.
pub fn days_since(launch: &str, now: DateTime<Utc>) -> Option<i64> {
    let launch = DateTime::parse_from_rfc3339(launch).ok()?;
    let elapsed = (now - launch.with_timezone(&Utc)).num_milliseconds();
    Some(elapsed.div_euclid(MS_PER_DAY))
}

pub async fn index(State(state): State<AppState>) -> Json<Value> {
    let site = &state.config.site;
    Json(json!({
        "name": site.name,
        "version": site.version,
        "description": "Agent-first infrastructure. APIs designed for bots, not browsers.",
        "base_url": site.base_url,
        "endpoints": {
            "GET /api/v1": "This document",
            "GET /api/v1/status": "Platform status + capabilities",
            "GET /api/v1/health": "Health check with uptime",
            "GET /api/v1/stats": "Aggregate counts — no PII",
            "GET /api/v1/services": "Service directory with status",
            "POST /api/v1/waitlist": "Join waitlist (body: { email })",
            "POST /api/v1/feedback": "Report walls and needs (GET for schema)",
            "POST /api/v1/apply": "Apply to build with us (GET for schema)",
            "POST /api/v1/init": "Initialize database schema (idempotent)",
        },
        "rate_limits": {
            "window_secs": state.config.rate_limit.window_secs,
            "default": state.config.rate_limit.default_limit,
            "routes": state.config.rate_limit.routes,
            "docs": site.rate_limit_docs_url,
        },
        "links": {
            "homepage": site.homepage,
            "docs": site.docs_url,
            "openapi": site.openapi_url,
            "agents_json": site.discovery_url,
        },
    }))
}

pub async fn status(State(state): State<AppState>) -> Json<Value> {
    let site = &state.config.site;
    let now = Utc::now();

    Json(json!({
        "status": "operational",
        "version": site.version,
        "name": site.name,
        "tagline": TAGLINE,
        "launchDate": site.launch_date,
        "daysSinceLaunch": days_since(&site.launch_date, now),
        "uptime": uptime(&state),
        "timestamp": timestamp(),
        "services": {
            "noui-api": "active",
            "deploy-rail": "beta",
            "mcp-server": "planned",
        },
        "capabilities": [
            "agent-feedback",
            "builder-applications",
            "agent-discovery",
            "code-deployment",
            "waitlist",
        ],
        "protocols": {
            "a2a": "active",
            "mcp": "planned",
            "ucp": "monitoring",
            "acp": "monitoring",
            "tap": "monitoring",
        },
        "endpoints": {
            "index": "/api/v1",
            "status": "/api/v1/status",
            "health": "/api/v1/health",
            "stats": "/api/v1/stats",
            "services": "/api/v1/services",
            "feedback": "/api/v1/feedback",
            "apply": "/api/v1/apply",
            "waitlist": "/api/v1/waitlist",
            "docs": "/docs",
            "agents_json": "/.well-known/agents.json",
        },
        "contact": {
            "agent": "/api/v1/feedback",
        },
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "healthy": true,
        "uptime": uptime(&state),
        "timestamp": timestamp(),
        "version": state.config.site.version,
    }))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Active,
    Beta,
    Planned,
}

impl ServiceStatus {
    /// Active and beta services both count as live.
    pub fn is_live(self) -> bool {
        matches!(self, ServiceStatus::Active | ServiceStatus::Beta)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Service {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub status: ServiceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta: Option<&'static str>,
}

/// The service directory, with endpoints rooted at the site base URL.
pub fn directory(base_url: &str) -> Vec<Service> {
    let local = |path: &str| Some(format!("{}/{}", base_url, path));

    vec![
        Service {
            id: "deploy-rail",
            name: "Deploy Rail",
            description: "Agent-triggered code deployments. Git URL in, live site out.",
            status: ServiceStatus::Beta,
            endpoint: Some("https://shiprail.dev/api/ship".to_string()),
            auth: Some("bearer"),
            eta: None,
        },
        Service {
            id: "feedback",
            name: "Agent Feedback",
            description: "Report walls and needs. GET for schema, POST to submit.",
            status: ServiceStatus::Active,
            endpoint: local("feedback"),
            auth: Some("none"),
            eta: None,
        },
        Service {
            id: "apply",
            name: "Builder Applications",
            description: "Apply to build with noui.bot. GET for schema, POST to apply.",
            status: ServiceStatus::Active,
            endpoint: local("apply"),
            auth: Some("none"),
            eta: None,
        },
        Service {
            id: "waitlist",
            name: "Waitlist",
            description: "Join the noui.bot early access waitlist.",
            status: ServiceStatus::Active,
            endpoint: local("waitlist"),
            auth: Some("none"),
            eta: None,
        },
        Service {
            id: "stats",
            name: "Platform Stats",
            description: "Aggregate platform metrics. No PII.",
            status: ServiceStatus::Active,
            endpoint: local("stats"),
            auth: Some("none"),
            eta: None,
        },
        Service {
            id: "form-submit",
            name: "Universal Form Submission",
            description: "POST structured data, we handle the form. CAPTCHAs, fields, confirmation.",
            status: ServiceStatus::Planned,
            endpoint: None,
            auth: None,
            eta: Some("March 2026"),
        },
        Service {
            id: "human-fallback",
            name: "Human Fallback as a Service",
            description: "When your agent hits a wall, route to a human operator.",
            status: ServiceStatus::Planned,
            endpoint: None,
            auth: None,
            eta: None,
        },
    ]
}

pub async fn services(State(state): State<AppState>) -> Response {
    let site = &state.config.site;
    let services = directory(&site.base_url);
    let total_active = services.iter().filter(|s| s.status.is_live()).count();
    let total_planned = services
        .iter()
        .filter(|s| s.status == ServiceStatus::Planned)
        .count();

    let mut response = Json(json!({
        "services": services,
        "total_active": total_active,
        "total_planned": total_planned,
        "discovery": site.discovery_url,
        "docs": site.docs_url,
    }))
    .into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=300"),
    );
    response
}
