//! Structured logging.
//!
//! Generation emits `tracing` spans for each report, section and component.
//! Binaries call [`init_logging`] once; libraries embedding the crate can
//! install their own subscriber instead.

use std::sync::OnceLock;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::{LogFormat, LoggingSettings};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Install the global subscriber. Later calls are no-ops.
///
/// `RUST_LOG` takes precedence over the configured level. Output goes to
/// stderr so stdout stays free for rendered reports.
pub fn init_logging(settings: &LoggingSettings) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = env_filter(&settings.level);

        let layer = match settings.format {
            LogFormat::Pretty => fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(filter)
                .boxed(),
            LogFormat::Json => fmt::layer()
                .json()
                .with_current_span(true)
                .with_writer(std::io::stderr)
                .with_filter(filter)
                .boxed(),
        };

        // Another subscriber may already be installed, e.g. by a test harness.
        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            tracing::debug!("global tracing subscriber already set, keeping it");
        }

        tracing::debug!(level = %settings.level, format = ?settings.format, "logging initialised");
    });
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}
