//! Rate limiting through the full middleware stack.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};

use noui_api::config::ApiConfig;
use noui_api::security::RouteLimitTable;
use noui_api::HttpServer;

mod common;
use common::{app, app_with, get, header_str, json_body, post_json, send};

#[tokio::test]
async fn test_waitlist_eleventh_request_is_denied() {
    let app = app();

    for i in 0..10u32 {
        let body = format!(r#"{{"email": "agent{}@example.com"}}"#, i);
        let res = send(&app, post_json("/api/v1/waitlist", "1.2.3.4", &body)).await;
        assert_eq!(res.status(), StatusCode::CREATED, "request {}", i + 1);
        assert_eq!(header_str(&res, "x-ratelimit-limit"), Some("10"));
        let expected = (9 - i).to_string();
        assert_eq!(header_str(&res, "x-ratelimit-remaining"), Some(expected.as_str()));
    }

    let res = send(
        &app,
        post_json("/api/v1/waitlist", "1.2.3.4", r#"{"email": "late@example.com"}"#),
    )
    .await;
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(header_str(&res, "x-ratelimit-remaining"), Some("0"));
    assert_eq!(header_str(&res, "access-control-allow-origin"), Some("*"));
    assert_eq!(header_str(&res, "x-content-type-options"), Some("nosniff"));

    let retry_header: u64 = header_str(&res, "retry-after").unwrap().parse().unwrap();
    let body = json_body(res).await;
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "RATE_LIMITED");
    assert_eq!(body["limit"], 10);
    assert_eq!(body["remaining"], 0);
    assert_eq!(body["docs"], "https://noui.bot/docs#rate-limits");

    let retry_after = body["retry_after"].as_u64().unwrap();
    assert!((1..=60).contains(&retry_after));
    assert_eq!(retry_after, retry_header);
    assert_eq!(
        body["message"],
        format!("Too many requests. Try again in {} seconds.", retry_after)
    );
}

#[tokio::test]
async fn test_business_failures_still_count() {
    let app = app();

    for _ in 0..10 {
        let res = send(&app, post_json("/api/v1/waitlist", "1.2.3.4", r#"{"email": "nope"}"#)).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
    let res = send(&app, post_json("/api/v1/waitlist", "1.2.3.4", r#"{"email": "a@b.c"}"#)).await;
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_denied_request_never_reaches_handler() {
    let app = app();

    for i in 0..11 {
        let body = format!(r#"{{"email": "agent{}@example.com"}}"#, i);
        send(&app, post_json("/api/v1/waitlist", "1.2.3.4", &body)).await;
    }

    let res = send(&app, get("/api/v1/stats", "1.2.3.4")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["totals"]["waitlist"], 10);
}

#[tokio::test]
async fn test_paths_have_independent_counters() {
    let server = HttpServer::new(ApiConfig::default());
    let app = server.router();

    let health = send(&app, get("/api/v1/health", "1.2.3.4")).await;
    let waitlist = send(&app, get("/api/v1/waitlist", "1.2.3.4")).await;

    assert_eq!(health.status(), StatusCode::OK);
    assert_eq!(waitlist.status(), StatusCode::OK);
    assert_eq!(header_str(&health, "x-ratelimit-remaining"), Some("119"));
    assert_eq!(header_str(&waitlist, "x-ratelimit-remaining"), Some("9"));

    let limiter = &server.state().limiter;
    assert_eq!(limiter.window("1.2.3.4", "/api/v1/health").unwrap().count, 1);
    assert_eq!(limiter.window("1.2.3.4", "/api/v1/waitlist").unwrap().count, 1);
}

#[tokio::test]
async fn test_clients_have_independent_counters() {
    let app = app();

    for _ in 0..11 {
        send(&app, get("/api/v1/apply", "1.2.3.4")).await;
    }
    assert_eq!(
        send(&app, get("/api/v1/apply", "1.2.3.4")).await.status(),
        StatusCode::TOO_MANY_REQUESTS
    );

    let other = send(&app, get("/api/v1/apply", "5.6.7.8")).await;
    assert_eq!(other.status(), StatusCode::OK);
    assert_eq!(header_str(&other, "x-ratelimit-remaining"), Some("9"));
}

#[tokio::test]
async fn test_unlisted_path_uses_default_ceiling() {
    let app = app();

    for i in 0..100 {
        let res = send(&app, get("/api/v1/unknown", "1.2.3.4")).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "request {}", i + 1);
    }
    let res = send(&app, get("/api/v1/unknown", "1.2.3.4")).await;
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(json_body(res).await["limit"], 100);
}

#[tokio::test]
async fn test_trailing_slash_shares_counter() {
    let server = HttpServer::new(ApiConfig::default());
    let app = server.router();

    send(&app, get("/api/v1/health", "1.2.3.4")).await;
    send(&app, get("/api/v1/health/", "1.2.3.4")).await;

    let window = server.state().limiter.window("1.2.3.4", "/api/v1/health").unwrap();
    assert_eq!(window.count, 2);
}

#[tokio::test]
async fn test_clients_without_proxy_headers_share_a_bucket() {
    let server = HttpServer::new(ApiConfig::default());
    let app = server.router();

    let bare = || {
        Request::builder()
            .uri("/api/v1/status")
            .body(Body::empty())
            .unwrap()
    };
    send(&app, bare()).await;
    send(&app, bare()).await;

    let window = server.state().limiter.window("unknown", "/api/v1/status").unwrap();
    assert_eq!(window.count, 2);
}

#[tokio::test]
async fn test_non_api_paths_bypass_limiter() {
    let mut config = ApiConfig::default();
    config.rate_limit.default_limit = 1;
    let app = app_with(config);

    for _ in 0..5 {
        let res = send(&app, get("/pricing", "1.2.3.4")).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert!(header_str(&res, "x-ratelimit-limit").is_none());
        assert!(header_str(&res, "x-noui-version").is_none());
        assert_eq!(header_str(&res, "x-frame-options"), Some("DENY"));
        assert_eq!(
            header_str(&res, "strict-transport-security"),
            Some("max-age=31536000; includeSubDomains")
        );
    }
}

#[tokio::test]
async fn test_preflight_is_not_counted() {
    let server = HttpServer::new(ApiConfig::default());
    let app = server.router();

    let res = send(
        &app,
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/v1/waitlist")
            .header("x-forwarded-for", "1.2.3.4")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert_eq!(header_str(&res, "access-control-max-age"), Some("86400"));
    assert_eq!(
        header_str(&res, "access-control-allow-methods"),
        Some("GET, POST, OPTIONS")
    );
    assert_eq!(header_str(&res, "x-content-type-options"), Some("nosniff"));
    assert!(server.state().limiter.window("1.2.3.4", "/api/v1/waitlist").is_none());
}

#[tokio::test]
async fn test_admission_headers() {
    let app = app();
    let res = send(&app, get("/api/v1/health", "1.2.3.4")).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(header_str(&res, "x-noui-version"), Some("0.2.0"));
    assert_eq!(header_str(&res, "x-noui-docs"), Some("https://noui.bot/docs"));
    assert_eq!(
        header_str(&res, "x-noui-discovery"),
        Some("https://noui.bot/.well-known/agents.json")
    );
    assert_eq!(header_str(&res, "access-control-allow-origin"), Some("*"));
    assert!(header_str(&res, "x-response-time").unwrap().ends_with("ms"));
    assert!(header_str(&res, "x-ratelimit-reset").unwrap().parse::<u64>().is_ok());
    assert!(header_str(&res, "x-request-id").is_some());
}

#[tokio::test]
async fn test_disabled_limiter_admits_everything() {
    let mut config = ApiConfig::default();
    config.rate_limit.enabled = false;
    let app = app_with(config);

    for _ in 0..15 {
        let res = send(&app, get("/api/v1/apply", "1.2.3.4")).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(header_str(&res, "x-ratelimit-limit").is_none());
        assert_eq!(header_str(&res, "x-noui-version"), Some("0.2.0"));
    }
}

#[tokio::test]
async fn test_reloaded_limits_apply_to_live_router() {
    let server = HttpServer::new(ApiConfig::default());
    let app = server.router();

    server
        .state()
        .limiter
        .reload(RouteLimitTable::new(100).with_route("/api/v1/health", 2));

    assert_eq!(send(&app, get("/api/v1/health", "1.2.3.4")).await.status(), StatusCode::OK);
    assert_eq!(send(&app, get("/api/v1/health", "1.2.3.4")).await.status(), StatusCode::OK);
    assert_eq!(
        send(&app, get("/api/v1/health", "1.2.3.4")).await.status(),
        StatusCode::TOO_MANY_REQUESTS
    );
}
