//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing + presentation produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Metrics are cheap facade calls; no exporter is bundled

pub mod logging;
pub mod metrics;
