//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, console + file)
//!     → rotation.rs (size-bounded log file retention)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Operators (stdout), log shippers (file)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Correlation id flows through every log line via the request span
//! - Metrics are cheap (no-ops without a recorder)

pub mod logging;
pub mod metrics;
pub mod rotation;
