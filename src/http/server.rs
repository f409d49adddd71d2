//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (correlation id, tracing, panic catching)
//! - Bind server to listener
//! - Serve until the shutdown signal fires

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::config::{ConfigError, GatewayConfig};
use crate::http::handlers;
use crate::http::request::trace_request;
use crate::pipeline::WakePipeline;
use crate::wol::{PacketTransport, UdpTransport};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<WakePipeline>,
}

impl AppState {
    pub fn new(pipeline: WakePipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

/// HTTP server for the wake gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a server that broadcasts real UDP magic packets.
    pub fn new(config: GatewayConfig) -> Result<Self, ConfigError> {
        Self::with_transport(config, Arc::new(UdpTransport))
    }

    /// Create a server with a caller-supplied packet transport.
    pub fn with_transport(
        config: GatewayConfig,
        transport: Arc<dyn PacketTransport>,
    ) -> Result<Self, ConfigError> {
        let pipeline = WakePipeline::from_config(&config, transport)?;
        let router = build_router(AppState::new(pipeline));
        Ok(Self { router, config })
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(state: AppState) -> Router {
    with_middleware(
        Router::new()
            .route("/wake", get(handlers::wake).fallback(handlers::method_not_allowed))
            .route("/health", get(handlers::health).fallback(handlers::method_not_allowed))
            .fallback(handlers::not_found)
            .with_state(state),
    )
}

/// `trace_request` is the outermost layer so that every response, including
/// fallbacks and caught panics, carries the correlation headers.
fn with_middleware(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(handlers::internal_error))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_request))
}
