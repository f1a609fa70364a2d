//! Tracing/logging initialization.
//!
//! Filtering follows `RUST_LOG` (default `info`); the output format comes
//! from `WEBMOUNT_LOG_FORMAT` (`json` or `pretty`, default `json`).

use core::str::FromStr;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Environment variable selecting the log output format.
pub const LOG_FORMAT_ENV: &str = "WEBMOUNT_LOG_FORMAT";

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable, multi-line output for local development.
    Pretty,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown log format '{0}' (expected 'json' or 'pretty')")]
pub struct UnknownLogFormat(pub String);

impl FromStr for LogFormat {
    type Err = UnknownLogFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            _ => Err(UnknownLogFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    /// `EnvFilter` directives, e.g. `info,webmount_api=debug`.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: DEFAULT_FILTER.to_string(),
        }
    }
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var(LOG_FORMAT_ENV).ok().as_deref(),
            std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(),
        )
    }

    /// Build from raw variable values; unknown formats fall back to the default.
    pub fn from_vars(format: Option<&str>, filter: Option<&str>) -> Self {
        let format = match format.map(LogFormat::from_str) {
            Some(Ok(f)) => f,
            Some(Err(e)) => {
                eprintln!("{e}; falling back to json");
                LogFormat::default()
            }
            None => LogFormat::default(),
        };
        let filter = filter
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .unwrap_or(DEFAULT_FILTER)
            .to_string();
        Self { format, filter }
    }
}

/// Install the global subscriber described by `config`.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init(config: &LogConfig) {
    let filter = EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::SystemTime);

    let _ = match config.format {
        LogFormat::Json => builder.json().with_target(false).try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_formats() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" Pretty ".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn defaults_apply_when_unset_or_invalid() {
        assert_eq!(LogConfig::from_vars(None, None), LogConfig::default());

        let cfg = LogConfig::from_vars(Some("xml"), Some("   "));
        assert_eq!(cfg.format, LogFormat::Json);
        assert_eq!(cfg.filter, "info");
    }

    #[test]
    fn explicit_values_are_kept() {
        let cfg = LogConfig::from_vars(Some("pretty"), Some("warn,webmount_api=debug"));
        assert_eq!(cfg.format, LogFormat::Pretty);
        assert_eq!(cfg.filter, "warn,webmount_api=debug");
    }

    #[test]
    fn init_twice_is_a_no_op() {
        init(&LogConfig::default());
        init(&LogConfig::from_vars(Some("pretty"), None));
    }
}
