//! Logging setup for the netgen CLI.
//!
//! Diagnostics go to stderr so the summary on stdout stays clean. `RUST_LOG`
//! filters them (default `info`) and `NETGEN_LOG_FORMAT` picks the layout.

use std::{env, str::FromStr, sync::OnceLock};

use thiserror::Error;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Layer, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
};

const LOG_FORMAT_ENV: &str = "NETGEN_LOG_FORMAT";

static INITIALISED: OnceLock<()> = OnceLock::new();

/// Layout of the diagnostics written to stderr.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LogFormat {
    /// Human-readable lines with span close timings.
    #[default]
    Human,
    /// One JSON object per event, carrying the span list of each generation.
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(LoggingError::UnsupportedFormat {
                provided: other.to_owned(),
            }),
        }
    }
}

impl LogFormat {
    /// Reads `NETGEN_LOG_FORMAT`; an unset variable means [`LogFormat::Human`].
    ///
    /// # Errors
    /// Returns [`LoggingError::UnsupportedFormat`] for unknown or non-UTF-8
    /// values.
    pub fn from_env() -> Result<Self, LoggingError> {
        env::var_os(LOG_FORMAT_ENV).map_or(Ok(Self::Human), |raw| {
            raw.to_str()
                .ok_or_else(|| LoggingError::UnsupportedFormat {
                    provided: raw.to_string_lossy().into_owned(),
                })?
                .parse()
        })
    }
}

/// Errors raised while setting up structured logging.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// `NETGEN_LOG_FORMAT` named an unknown format.
    #[error("unsupported log format `{provided}`; expected `human` or `json`")]
    UnsupportedFormat {
        /// Value supplied by the user, lossily decoded.
        provided: String,
    },
}

/// Installs global structured logging once per process.
///
/// When another subscriber already owns the global slot it is left in place
/// and told so through `tracing`.
///
/// # Errors
/// Returns [`LoggingError`] when `NETGEN_LOG_FORMAT` is not a supported
/// format.
pub fn init_logging() -> Result<(), LoggingError> {
    if INITIALISED.get().is_some() {
        return Ok(());
    }
    let format = LogFormat::from_env()?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    let fmt_layer = match format {
        LogFormat::Human => fmt_layer.boxed(),
        LogFormat::Json => fmt_layer
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Best-effort: another logger may already own the `log` slot.
    let _ = LogTracer::init();

    if let Err(err) = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
    {
        tracing::debug!(error = %err, "keeping the existing global subscriber");
    }
    let _ = INITIALISED.set(());
    Ok(())
}
