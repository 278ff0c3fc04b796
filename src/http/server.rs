//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the API routes
//! - Wire up middleware (request ID, tracing, timeout, body limit,
//!   API gate, security headers)
//! - Apply route limit reloads to the running rate limiter
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::api;
use crate::config::ApiConfig;
use crate::http::error::ApiError;
use crate::http::middleware::api_middleware;
use crate::http::request::MakeRequestUuidV4;
use crate::security::{headers, limits, RateLimiter, RouteLimitTable};
use crate::store::{MemoryStore, Store};

/// Application state injected into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ApiConfig>,
    pub limiter: Arc<RateLimiter>,
    pub store: Arc<dyn Store>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: ApiConfig, store: Arc<dyn Store>) -> Self {
        Self {
            limiter: Arc::new(RateLimiter::from_config(&config.rate_limit)),
            config: Arc::new(config),
            store,
            started_at: Instant::now(),
        }
    }
}

/// HTTP server for the API.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a server backed by an in-memory store.
    pub fn new(config: ApiConfig) -> Self {
        let store = if config.store.auto_init {
            MemoryStore::initialized()
        } else {
            MemoryStore::new()
        };
        Self::with_store(config, Arc::new(store))
    }

    /// Create a server backed by the given store.
    pub fn with_store(config: ApiConfig, store: Arc<dyn Store>) -> Self {
        let state = AppState::new(config, store);
        let router = Self::build_router(state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState) -> Router {
        let config = state.config.clone();

        let router = api::router()
            .fallback(|| async { ApiError::not_found("No such endpoint.") })
            .layer(middleware::from_fn_with_state(state.clone(), api_middleware))
            .with_state(state);

        let router = limits::with_body_limit(router, &config.security)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

        // Outside the body limit and timeout so their 413/408 replies are covered.
        let router = if config.security.enable_headers {
            headers::with_security_headers(router)
        } else {
            router
        };

        router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// The fully layered router, for driving requests in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &ApiConfig {
        &self.state.config
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Route limit tables arriving on `limit_updates` replace the limiter's
    /// ceilings. Returns once `shutdown` fires and in-flight requests have
    /// drained.
    pub async fn run(
        self,
        listener: TcpListener,
        mut limit_updates: mpsc::UnboundedReceiver<RouteLimitTable>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let limiter = self.state.limiter.clone();
        tokio::spawn(async move {
            while let Some(table) = limit_updates.recv().await {
                tracing::info!(
                    routes = table.len(),
                    default_limit = table.default_limit(),
                    "Route limits reloaded"
                );
                limiter.reload(table);
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
