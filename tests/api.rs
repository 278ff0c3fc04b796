//! Endpoint behaviour, driven in-process.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};

use noui_api::config::ApiConfig;
use noui_api::store::{MemoryStore, Store};
use noui_api::HttpServer;

mod common;
use common::{app, app_with, get, header_str, json_body, post_json, send};

#[tokio::test]
async fn test_waitlist_signup_and_duplicate() {
    let app = app();

    let res = send(
        &app,
        post_json("/api/v1/waitlist", "1.1.1.1", r#"{"email": "  Agent@Example.COM "}"#),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = json_body(res).await;
    assert_eq!(body["message"], "Added to waitlist.");
    assert_eq!(body["email"], "agent@example.com");

    let res = send(
        &app,
        post_json("/api/v1/waitlist", "1.1.1.1", r#"{"email": "agent@example.com"}"#),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await["message"], "Already on the list.");
}

#[tokio::test]
async fn test_waitlist_validation() {
    let app = app();

    let res = send(&app, post_json("/api/v1/waitlist", "1.1.1.1", r#"{"email": "nobody"}"#)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(res).await["error"], "Valid email required.");

    let res = send(&app, post_json("/api/v1/waitlist", "1.1.1.1", "{}")).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(res).await["error"], "Valid email required.");

    let res = send(&app, post_json("/api/v1/waitlist", "1.1.1.1", "email=a@b.c")).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(res).await["error"], "Invalid request.");
}

#[tokio::test]
async fn test_feedback_submission() {
    let app = app();

    let res = send(
        &app,
        post_json(
            "/api/v1/feedback",
            "1.1.1.1",
            r#"{"agent_name": "Daisy", "platform": "custom", "walls": ["google forms"]}"#,
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = json_body(res).await;
    assert_eq!(body["received"], true);
    assert!(body["id"].as_str().unwrap().starts_with("fb_"));

    let res = send(&app, post_json("/api/v1/feedback", "1.1.1.1", r#"{"message": "  "}"#)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = json_body(res).await;
    assert_eq!(body["error"], "Submit at least one of: walls, needs, or message.");
    assert!(body["hint"]["walls"].is_array());

    let res = send(&app, post_json("/api/v1/feedback", "1.1.1.1", "not json")).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(res).await["error"],
        "Invalid JSON. Send structured data, not forms."
    );
}

#[tokio::test]
async fn test_application_submission() {
    let app = app();

    let res = send(
        &app,
        post_json(
            "/api/v1/apply",
            "1.1.1.1",
            r#"{"name": "Alex", "contact": "alex@agentops.dev", "type": "developer", "interest": "equity"}"#,
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = json_body(res).await;
    assert!(body["id"].as_str().unwrap().starts_with("app_"));
    assert_eq!(body["message"], "Application received. We review every one personally.");

    let res = send(
        &app,
        post_json("/api/v1/apply", "1.1.1.1", r#"{"name": "Alex", "contact": " "}"#),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(res).await["schema"]["name"], "string (required)");
}

#[tokio::test]
async fn test_stats_counts_submissions() {
    let app = app();

    send(&app, post_json("/api/v1/waitlist", "1.1.1.1", r#"{"email": "a@b.c"}"#)).await;
    send(&app, post_json("/api/v1/feedback", "1.1.1.1", r#"{"needs": ["x"], "platform": "openai"}"#)).await;
    send(&app, post_json("/api/v1/feedback", "1.1.1.1", r#"{"needs": ["y"], "platform": "openai"}"#)).await;
    send(&app, post_json("/api/v1/apply", "1.1.1.1", r#"{"name": "n", "contact": "c"}"#)).await;

    let res = send(&app, get("/api/v1/stats", "1.1.1.1")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["totals"]["waitlist"], 1);
    assert_eq!(body["totals"]["feedback"], 2);
    assert_eq!(body["totals"]["applications"], 1);
    assert_eq!(body["last_24h"]["feedback"], 2);
    assert_eq!(body["unique_platforms"], 1);
    assert_eq!(body["note"], "Counts only — no PII exposed.");
}

#[tokio::test]
async fn test_uninitialized_store_until_init() {
    let mut config = ApiConfig::default();
    config.store.auto_init = false;
    let app = app_with(config);

    let res = send(&app, get("/api/v1/stats", "1.1.1.1")).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(res).await;
    assert_eq!(body["code"], "INTERNAL_ERROR");
    assert_eq!(body["details"]["hint"], "POST /api/v1/init first.");

    let res = send(&app, post_json("/api/v1/waitlist", "1.1.1.1", r#"{"email": "a@b.c"}"#)).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    for _ in 0..2 {
        let res = send(&app, post_json("/api/v1/init", "1.1.1.1", "")).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = json_body(res).await;
        assert_eq!(body["initialized"], true);
        assert_eq!(body["tables"].as_array().unwrap().len(), 3);
    }

    let res = send(&app, get("/api/v1/stats", "1.1.1.1")).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_custom_store_is_used() {
    let store = Arc::new(MemoryStore::initialized());
    store.add_to_waitlist("seed@example.com", "import").unwrap();

    let server = HttpServer::with_store(ApiConfig::default(), store.clone());
    let res = send(&server.router(), get("/api/v1/stats", "1.1.1.1")).await;
    assert_eq!(json_body(res).await["totals"]["waitlist"], 1);
}

#[tokio::test]
async fn test_discovery_documents() {
    let app = app();

    let res = send(&app, get("/api/v1", "1.1.1.1")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["name"], "noui.bot");
    assert_eq!(body["version"], "0.2.0");
    assert_eq!(body["rate_limits"]["routes"]["/api/v1/waitlist"], 10);

    let res = send(&app, get("/api/v1/status", "1.1.1.1")).await;
    let body = json_body(res).await;
    assert_eq!(body["status"], "operational");
    assert!(body["daysSinceLaunch"].is_i64());

    let res = send(&app, get("/api/v1/health", "1.1.1.1")).await;
    let body = json_body(res).await;
    assert_eq!(body["healthy"], true);
    assert!(body["uptime"].as_str().unwrap().ends_with('s'));

    let res = send(&app, get("/api/v1/services", "1.1.1.1")).await;
    assert_eq!(header_str(&res, "cache-control"), Some("public, max-age=300"));
    let body = json_body(res).await;
    assert_eq!(body["total_active"], 5);
    assert_eq!(body["total_planned"], 2);
}

#[tokio::test]
async fn test_schema_documents() {
    let app = app();
    for path in ["/api/v1/waitlist", "/api/v1/feedback", "/api/v1/apply"] {
        let res = send(&app, get(path, "1.1.1.1")).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = json_body(res).await;
        assert_eq!(body["endpoint"], path);
        assert_eq!(body["method"], "POST");
    }
}

#[tokio::test]
async fn test_wrong_method() {
    let app = app();

    let res = send(
        &app,
        Request::builder()
            .method(Method::DELETE)
            .uri("/api/v1/waitlist")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(header_str(&res, "allow"), Some("GET, POST"));
    assert_eq!(json_body(res).await["code"], "METHOD_NOT_ALLOWED");

    let res = send(&app, get("/api/v1/init", "1.1.1.1")).await;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(header_str(&res, "allow"), Some("POST"));
}

#[tokio::test]
async fn test_unknown_api_path() {
    let res = send(&app(), get("/api/v2/anything", "1.1.1.1")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(header_str(&res, "x-ratelimit-limit"), Some("100"));
    let body = json_body(res).await;
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let mut config = ApiConfig::default();
    config.security.max_body_size = 32;
    let app = app_with(config);

    let big = format!(r#"{{"message": "{}"}}"#, "x".repeat(256));
    let res = send(&app, post_json("/api/v1/feedback", "1.1.1.1", &big)).await;
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_body_limit_rejection_carries_security_headers() {
    let server = HttpServer::new(ApiConfig::default());
    let big = "x".repeat(70 * 1024);

    let res = send(
        &server.router(),
        Request::builder()
            .method(Method::POST)
            .uri("/api/v1/feedback")
            .header("x-forwarded-for", "1.2.3.4")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::CONTENT_LENGTH, big.len())
            .body(Body::from(big))
            .unwrap(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(header_str(&res, "x-content-type-options"), Some("nosniff"));
    assert_eq!(header_str(&res, "x-frame-options"), Some("DENY"));
    assert_eq!(
        header_str(&res, "strict-transport-security"),
        Some("max-age=31536000; includeSubDomains")
    );
    // Rejected before the API gate, so nothing was counted.
    assert!(server.state().limiter.window("1.2.3.4", "/api/v1/feedback").is_none());
}

#[tokio::test]
async fn test_error_bodies_link_configured_docs() {
    let mut config = ApiConfig::default();
    config.site.docs_url = "https://docs.example.test/api".to_string();
    config.store.auto_init = false;
    let app = app_with(config);

    let not_found = send(&app, get("/api/v1/nowhere", "1.1.1.1")).await;
    let wrong_method = send(&app, get("/api/v1/init", "1.1.1.1")).await;
    let uninitialized = send(&app, get("/api/v1/stats", "1.1.1.1")).await;
    let off_api = send(&app, get("/pricing", "1.1.1.1")).await;

    for res in [not_found, wrong_method, uninitialized, off_api] {
        let status = res.status();
        let body = json_body(res).await;
        assert_eq!(body["docs"], "https://docs.example.test/api", "status {}", status);
        assert_eq!(body["status"], status.as_u16());
    }
}
