//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layer stack)
//!     → request.rs (request ID, client identifier, path normalization)
//!     → middleware/ (CORS preflight, rate limit, API headers)
//!     → api handlers
//!     → response.rs (API headers, 429 body) / error.rs (error bodies)
//!     → Send to client
//! ```

pub mod error;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use error::{ApiError, ErrorCode};
pub use request::{client_identifier, MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
