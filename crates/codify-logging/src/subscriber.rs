//! Global subscriber installation

use crate::level::LogLevel;
use tracing_subscriber::EnvFilter;

/// Initialize logging to stderr at `level`.
///
/// `RUST_LOG` takes precedence when set. Returns `false` when a global
/// subscriber was already installed; the existing one is kept.
pub fn init_logging(level: LogLevel) -> bool {
    let filter = EnvFilter::builder()
        .with_default_directive(level.to_filter().into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    // Try to set as global default (ignore error if already set)
    tracing::subscriber::set_global_default(subscriber).is_ok()
}
