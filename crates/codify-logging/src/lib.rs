//! codify-logging - Tracing setup and diagnostic sinks
//!
//! This crate provides:
//! - [`init_logging`] to install a `tracing` subscriber filtered by [`LogLevel`]
//! - [`TracingSink`] forwarding generation diagnostics to `tracing`
//! - [`CollectingSink`] buffering diagnostics for later inspection

mod level;
mod sink;
mod subscriber;

pub use level::LogLevel;
pub use sink::{CollectingSink, TracingSink};
pub use subscriber::init_logging;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{CollectingSink, LogLevel, TracingSink, init_logging};
}
