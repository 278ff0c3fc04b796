//! Machine-readable API error responses.
//!
//! Handlers return [`ApiError`] without knowing the site configuration.
//! Its `IntoResponse` only sets the status and stashes the error in the
//! response extensions; the API middleware then calls [`render_deferred`]
//! with the configured docs URL to produce the JSON body.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::store::StoreError;

/// Stable error codes exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    RateLimited,
    ValidationError,
    InternalError,
    ServiceUnavailable,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ErrorCode::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ErrorCode::ValidationError => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// An error returned to the client as `{ error: true, code, message, ... }`.
#[derive(Debug, Clone, Error)]
#[error("{code:?}: {message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<Value>,
    /// Methods listed in the `Allow` header of a 405.
    pub allowed_methods: &'static [&'static str],
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            allowed_methods: &[],
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// 405 listing the methods a route accepts.
    pub fn method_not_allowed(allowed: &'static [&'static str]) -> Self {
        let mut err = Self::new(
            ErrorCode::MethodNotAllowed,
            format!("This endpoint accepts: {}", allowed.join(", ")),
        );
        err.allowed_methods = allowed;
        err
    }

    /// Render the full JSON response, linking to `docs_url`.
    pub fn render(self, docs_url: &str) -> Response {
        let status = self.code.status();
        let mut body = json!({
            "error": true,
            "code": self.code,
            "message": self.message,
            "status": status.as_u16(),
            "docs": docs_url,
            "timestamp": crate::http::response::timestamp(),
        });
        if let Some(details) = self.details {
            body["details"] = details;
        }
        if !self.allowed_methods.is_empty() {
            body["allowed_methods"] = json!(self.allowed_methods);
        }

        let mut response = (status, Json(body)).into_response();
        if !self.allowed_methods.is_empty() {
            if let Ok(value) = HeaderValue::from_str(&self.allowed_methods.join(", ")) {
                response.headers_mut().insert(header::ALLOW, value);
            }
        }
        response
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotInitialized => ApiError::internal("Database not initialized.")
                .with_details(json!({ "hint": "POST /api/v1/init first." })),
            StoreError::DuplicateId(id) => {
                ApiError::internal("Record could not be stored.").with_details(json!({ "id": id }))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = self.code.status().into_response();
        response.extensions_mut().insert(self);
        response
    }
}

/// Replace a deferred [`ApiError`] response with its rendered body.
/// Responses that do not carry an error are returned untouched.
pub fn render_deferred(mut response: Response, docs_url: &str) -> Response {
    match response.extensions_mut().remove::<ApiError>() {
        Some(err) => err.render(docs_url),
        None => response,
    }
}
