//! Tracing setup for the command-line front-end.
//!
//! Library code only emits `tracing` events; installing a subscriber is left
//! to the binary (or to tests that want to see the output).

use std::sync::OnceLock;

use time::{UtcOffset, format_description::FormatItem, macros::format_description};
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

static INSTALLED: OnceLock<()> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Invalid log filter {directive:?}: {source}")]
    Filter {
        directive: String,
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(tracing::subscriber::SetGlobalDefaultError),
}

/// Install a stderr subscriber. `RUST_LOG` wins when set; otherwise `info`,
/// or `debug` when `verbose`. Subsequent calls are no-ops.
pub fn init(verbose: bool) -> Result<(), LoggingError> {
    if INSTALLED.get().is_some() {
        return Ok(());
    }

    let env_filter = build_env_filter(verbose)?;
    let stderr_layer = fmt::layer()
        .with_timer(build_timer())
        .with_target(verbose)
        .with_writer(std::io::stderr);

    let subscriber = Registry::default().with(env_filter).with(stderr_layer);
    tracing::subscriber::set_global_default(subscriber).map_err(LoggingError::SetGlobal)?;
    let _ = INSTALLED.set(());
    Ok(())
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

fn build_env_filter(verbose: bool) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let directive = default_directive(verbose);
    EnvFilter::try_new(directive).map_err(|source| LoggingError::Filter {
        directive: directive.to_string(),
        source,
    })
}

fn build_timer() -> fmt::time::OffsetTime<&'static [FormatItem<'static>]> {
    const DISPLAY_FORMAT: &[FormatItem<'static>] =
        format_description!("[hour]:[minute]:[second].[subsecond digits:3]");
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    fmt::time::OffsetTime::new(offset, DISPLAY_FORMAT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_raises_default_level() {
        assert_eq!(default_directive(false), "info");
        assert_eq!(default_directive(true), "debug");
    }

    #[test]
    fn default_directives_parse() {
        assert!(EnvFilter::try_new(default_directive(false)).is_ok());
        assert!(EnvFilter::try_new(default_directive(true)).is_ok());
    }
}
