//! Infrastructure - configuration, logging and metrics
//!
//! - `config` - Application configuration (TOML loading, defaults)
//! - `logging` - tracing-subscriber setup
//! - `metrics` - Outcome counters

pub mod config;
pub mod logging;
pub mod metrics;

pub use config::{Config, GatewayConfig};
pub use logging::{init_logging, LogTarget};
pub use metrics::Metrics;
