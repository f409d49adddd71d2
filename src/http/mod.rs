//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (correlation id, source address, timing)
//!     → handlers.rs (/wake → pipeline, /health, fallbacks)
//!     → response.rs (JSON envelope, status mapping)
//!     → request.rs (X-Request-ID, X-Request-Duration-Ms)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestContext, X_REQUEST_DURATION_MS, X_REQUEST_ID};
pub use response::{ResponseCode, ResponseEnvelope};
pub use server::{build_router, AppState, HttpServer};
