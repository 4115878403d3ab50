//! File-based tracing for the `orion_discovery` binary

use std::path::PathBuf;

use strum_macros::{AsRefStr, EnumString};
use tracing::{Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::Registry;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use super::lazy_file_writer::LazyFileWriter;
use crate::constants::{LOG_LEVEL_ENV_VAR, TRACE_LOG_FILE};

/// Tracing levels accepted in the configuration and environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TracingLevel {
    /// Failures only
    Error,
    /// Failures and orphaned platform state
    #[default]
    Warn,
    /// Connection and submission progress
    Info,
    /// Request bodies and resolved ids
    Debug,
    /// Everything
    Trace,
}

impl TracingLevel {
    /// Level from `ORION_DISCOVERY_LOG`, else `configured`, else `warn`
    ///
    /// Unparseable values fall back to the next source.
    pub fn resolve(configured: Option<&str>) -> Self {
        std::env::var(LOG_LEVEL_ENV_VAR)
            .ok()
            .and_then(|level| level.parse().ok())
            .or_else(|| configured.and_then(|level| level.parse().ok()))
            .unwrap_or_default()
    }

    /// Install the global subscriber writing to the trace log
    ///
    /// The file is only created on the first event at or above `self`.
    pub fn init_file_tracing(self) {
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(LazyFileWriter::new(trace_log_path()))
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true);

        Registry::default()
            .with(LevelFilter { level: self })
            .with(file_layer)
            .init();
    }

    const fn admits(self, level: Level) -> bool {
        let rank = match level {
            Level::ERROR => Self::Error,
            Level::WARN => Self::Warn,
            Level::INFO => Self::Info,
            Level::DEBUG => Self::Debug,
            Level::TRACE => Self::Trace,
        };
        rank as u8 <= self as u8
    }
}

/// Path of the trace log in the temp directory
pub fn trace_log_path() -> PathBuf {
    std::env::temp_dir().join(TRACE_LOG_FILE)
}

/// Level filter that also drops HTTP stack noise
#[derive(Clone, Copy)]
struct LevelFilter {
    level: TracingLevel,
}

impl<S> Layer<S> for LevelFilter
where
    S: Subscriber,
{
    fn enabled(
        &self,
        metadata: &tracing::Metadata<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) -> bool {
        let target = metadata.target();
        if target.starts_with("reqwest::")
            || target.starts_with("hyper")
            || target.starts_with("h2::")
            || target.starts_with("rustls::")
            || target.starts_with("want::")
        {
            return false;
        }

        self.level.admits(*metadata.level())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("INFO".parse::<TracingLevel>(), Ok(TracingLevel::Info));
        assert_eq!("debug".parse::<TracingLevel>(), Ok(TracingLevel::Debug));
        assert!("verbose".parse::<TracingLevel>().is_err());
        assert_eq!(TracingLevel::Trace.as_ref(), "trace");
    }

    #[test]
    fn test_admits() {
        assert!(TracingLevel::Warn.admits(Level::ERROR));
        assert!(TracingLevel::Warn.admits(Level::WARN));
        assert!(!TracingLevel::Warn.admits(Level::INFO));
        assert!(TracingLevel::Trace.admits(Level::TRACE));
        assert!(!TracingLevel::Error.admits(Level::WARN));
    }
}
