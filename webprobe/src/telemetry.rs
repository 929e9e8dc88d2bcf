//! Tracing initialization.
//!
//! Logs go to stderr so stdout carries only rendered panels. The filter comes from `RUST_LOG`
//! when set, otherwise from the configured `log_filter`:
//!
//! ```bash
//! RUST_LOG=webprobe=debug webprobe fetch --path /index.html
//! ```

use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize tracing with a console fmt layer.
///
/// Parameters:
/// - `default_filter`: filter directive used when `RUST_LOG` is unset or invalid
pub fn init_telemetry(default_filter: &str) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    debug!("Telemetry initialized");
    Ok(())
}
