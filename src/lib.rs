//! Wake-on-LAN HTTP gateway library.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod pipeline;
pub mod registry;
pub mod security;
pub mod wol;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use pipeline::{RequestError, WakeParams, WakePipeline, WakeReceipt};
