pub mod addon;
pub mod cli;
pub mod error;
pub mod helm;
pub mod k8s;
pub mod metrics;
pub mod otel;

pub use error::{AddonError, HealthError, MatchError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
