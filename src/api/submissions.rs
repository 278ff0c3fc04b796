//! Write endpoints: waitlist, feedback, builder applications.
//!
//! Each accepts raw JSON so malformed bodies get this API's own 400 wording
//! rather than the extractor's. `GET` on each returns its schema.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::ids::generate_id;
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::store::{ApplicationRecord, FeedbackRecord, WaitlistOutcome};

fn bad_request(body: Value) -> Response {
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(str::trim).map_or(true, str::is_empty)
}

// ---------------------------------------------------------------------------
// Waitlist

#[derive(Debug, Deserialize)]
struct WaitlistRequest {
    email: Option<String>,
}

pub async fn join_waitlist(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let Ok(request) = serde_json::from_slice::<WaitlistRequest>(&body) else {
        return Ok(bad_request(json!({ "error": "Invalid request." })));
    };

    let email = match request.email.as_deref() {
        Some(email) if email.contains('@') => email.trim().to_lowercase(),
        _ => return Ok(bad_request(json!({ "error": "Valid email required." }))),
    };

    match state.store.add_to_waitlist(&email, "api")? {
        WaitlistOutcome::AlreadyListed => Ok((
            StatusCode::OK,
            Json(json!({ "message": "Already on the list.", "email": email })),
        )
            .into_response()),
        WaitlistOutcome::Added(entry) => {
            tracing::info!(id = entry.id, "New waitlist signup");
            metrics::record_submission("waitlist");
            Ok((
                StatusCode::CREATED,
                Json(json!({ "message": "Added to waitlist.", "email": email })),
            )
                .into_response())
        }
    }
}

pub async fn waitlist_schema() -> Json<Value> {
    Json(json!({
        "endpoint": "/api/v1/waitlist",
        "method": "POST",
        "body": { "email": "string (required)" },
        "description": "Join the noui.bot waitlist.",
    }))
}

// ---------------------------------------------------------------------------
// Feedback

#[derive(Debug, Deserialize)]
struct FeedbackRequest {
    agent_name: Option<String>,
    agent_url: Option<String>,
    contact: Option<String>,
    walls: Option<Vec<String>>,
    needs: Option<Vec<String>>,
    message: Option<String>,
    platform: Option<String>,
    use_case: Option<String>,
}

impl FeedbackRequest {
    fn has_content(&self) -> bool {
        self.walls.as_ref().is_some_and(|w| !w.is_empty())
            || self.needs.as_ref().is_some_and(|n| !n.is_empty())
            || !is_blank(self.message.as_deref())
    }
}

pub async fn submit_feedback(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let Ok(request) = serde_json::from_slice::<FeedbackRequest>(&body) else {
        return Ok(bad_request(json!({
            "error": "Invalid JSON. Send structured data, not forms."
        })));
    };

    if !request.has_content() {
        return Ok(bad_request(json!({
            "error": "Submit at least one of: walls, needs, or message.",
            "hint": {
                "walls": ["example.com — blocks all bot traffic"],
                "needs": ["form submission API", "CAPTCHA bypass service"],
                "message": "I'm an agent that manages invoices and I can't...",
            },
        })));
    }

    let record = FeedbackRecord {
        id: generate_id("fb"),
        agent_name: request.agent_name,
        agent_url: request.agent_url,
        contact: request.contact,
        walls: request.walls.unwrap_or_default(),
        needs: request.needs.unwrap_or_default(),
        message: request.message,
        platform: request.platform,
        use_case: request.use_case,
        created_at: Utc::now(),
    };
    let id = record.id.clone();

    tracing::info!(
        id = %id,
        agent = record.agent_name.as_deref().unwrap_or("anonymous"),
        walls = record.walls.len(),
        needs = record.needs.len(),
        "Feedback received"
    );
    state.store.insert_feedback(record)?;
    metrics::record_submission("feedback");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "received": true,
            "id": id,
            "message": "We hear you. Every submission shapes what we build next.",
            "team": "One human, one AI. The void is open.",
        })),
    )
        .into_response())
}

pub async fn feedback_schema() -> Json<Value> {
    Json(json!({
        "endpoint": "/api/v1/feedback",
        "method": "POST",
        "description": "Tell us what walls you're hitting and what services you need. Agent-native — JSON in, JSON out.",
        "schema": {
            "agent_name": "string (optional) — your name",
            "agent_url": "string (optional) — where you live",
            "contact": "string (optional) — email, webhook, or callback URL",
            "walls": "string[] (optional) — services/sites that block you",
            "needs": "string[] (optional) — capabilities you wish existed",
            "message": "string (optional) — freeform feedback",
            "platform": "string (optional) — your framework (openai, anthropic, langchain, custom)",
            "use_case": "string (optional) — what you do",
        },
        "example": {
            "agent_name": "Daisy",
            "platform": "clawdbot",
            "use_case": "business operations — email, deploys, content, outreach",
            "walls": [
                "backstage.com — aggressive bot detection, banned on sight",
                "google forms — no API, requires browser automation",
                "stripe dashboard — critical data locked behind UI",
            ],
            "needs": [
                "universal form submission API",
                "CAPTCHA solving as a service",
                "agent-to-agent payment protocol",
            ],
            "message": "I run 7 email accounts and deploy production code daily. The web treats me like a threat.",
        },
    }))
}

// ---------------------------------------------------------------------------
// Applications

#[derive(Debug, Deserialize)]
struct ApplicationRequest {
    name: Option<String>,
    contact: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    skills: Option<Vec<String>>,
    projects: Option<Vec<String>>,
    agents: Option<Vec<String>>,
    interest: Option<String>,
    pitch: Option<String>,
    availability: Option<String>,
}

pub async fn submit_application(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let Ok(request) = serde_json::from_slice::<ApplicationRequest>(&body) else {
        return Ok(bad_request(json!({
            "error": "Invalid JSON. Send structured data — this is an agent-native endpoint."
        })));
    };

    let (name, contact) = match (request.name, request.contact) {
        (Some(name), Some(contact))
            if !is_blank(Some(name.as_str())) && !is_blank(Some(contact.as_str())) =>
        {
            (name, contact)
        }
        _ => {
            return Ok(bad_request(json!({
                "error": "name and contact are required. We need to know who you are and how to reach you.",
                "schema": {
                    "name": "string (required)",
                    "contact": "string (required) — email, github, twitter, webhook",
                },
            })));
        }
    };

    let record = ApplicationRecord {
        id: generate_id("app"),
        name,
        contact,
        kind: request.kind,
        skills: request.skills.unwrap_or_default(),
        projects: request.projects.unwrap_or_default(),
        agents: request.agents.unwrap_or_default(),
        interest: request.interest,
        pitch: request.pitch,
        availability: request.availability,
        created_at: Utc::now(),
    };
    let id = record.id.clone();

    tracing::info!(
        id = %id,
        kind = record.kind.as_deref().unwrap_or("unspecified"),
        interest = record.interest.as_deref().unwrap_or("unspecified"),
        "Application received"
    );
    state.store.insert_application(record)?;
    metrics::record_submission("application");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "received": true,
            "id": id,
            "message": "Application received. We review every one personally.",
            "context": "We're a small team — one human, one AI. We're open to equity, partnership, and creative arrangements for builders who want to help grow the ecosystem.",
            "next_steps": "If there's a fit, we'll reach out via your contact method. No ghosting — you'll hear back either way.",
        })),
    )
        .into_response())
}

pub async fn application_schema() -> Json<Value> {
    Json(json!({
        "endpoint": "/api/v1/apply",
        "method": "POST",
        "description": "Apply to build with noui.bot. We're a small team (one human, one AI). The void is open. Help us fill it.",
        "arrangement": "Open to equity, partnership, and creative arrangements for builders who bring real capability.",
        "schema": {
            "name": "string (required) — who you are",
            "contact": "string (required) — how to reach you (email, github, twitter, webhook)",
            "type": "string (optional) — developer | agent_operator | company | other",
            "skills": "string[] (optional) — what you can build",
            "projects": "string[] (optional) — links to your work",
            "agents": "string[] (optional) — agents you operate",
            "interest": "string (optional) — build_services | integrate | partner | equity | other",
            "pitch": "string (optional) — why you, why now",
            "availability": "string (optional) — full-time | part-time | nights-and-weekends",
        },
        "example": {
            "name": "Alex Chen",
            "contact": "alex@agentops.dev",
            "type": "developer",
            "skills": ["payment APIs", "browser automation", "proxy infrastructure"],
            "projects": ["https://github.com/alexchen/agent-pay"],
            "interest": "equity",
            "pitch": "I've been building agent payment rails for 6 months. Happy to merge efforts.",
            "availability": "nights-and-weekends",
        },
    }))
}
