//! Tracing/logging initialization.
//!
//! JSON lines by default; `SIMRS_LOG_FORMAT=pretty|compact` switches to the
//! human-readable formatters for local use. Filtering follows `RUST_LOG`.

use std::str::FromStr;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub const LOG_FORMAT_ENV: &str = "SIMRS_LOG_FORMAT";
pub const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
    Compact,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown log format {0:?} (expected json, pretty or compact)")]
pub struct UnknownLogFormat(String);

impl FromStr for LogFormat {
    type Err = UnknownLogFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(UnknownLogFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// `EnvFilter` directive, e.g. `info` or `simrs_billing=debug`.
    pub filter: String,
    pub format: LogFormat,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: LogFormat::default(),
        }
    }
}

impl TracingConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unknown formats fall back to JSON; the problem is reported once the
    /// subscriber is up.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let filter = lookup(EnvFilter::DEFAULT_ENV)
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string());
        let format = lookup(LOG_FORMAT_ENV)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default();
        Self { filter, format }
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }

    /// Install the global subscriber. Returns `false` if one was already set.
    pub fn try_init(&self) -> bool {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(self.env_filter())
            .with_target(false);

        let installed = match self.format {
            LogFormat::Json => builder
                .json()
                .with_timer(tracing_subscriber::fmt::time::SystemTime)
                .try_init(),
            LogFormat::Pretty => builder.pretty().try_init(),
            LogFormat::Compact => builder.compact().try_init(),
        }
        .is_ok();

        if installed {
            ::tracing::debug!(filter = %self.filter, format = ?self.format, "tracing initialized");
        }
        installed
    }
}

/// Initialize tracing/logging for the process from the environment.
pub fn init() {
    let config = TracingConfig::from_env();
    if !config.try_init() {
        return;
    }
    if let Ok(raw) = std::env::var(LOG_FORMAT_ENV)
        && raw.parse::<LogFormat>().is_err()
    {
        ::tracing::warn!(raw = %raw, "{LOG_FORMAT_ENV} not recognised; using json");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn defaults_to_json_at_info() {
        let config = TracingConfig::from_lookup(lookup(&[]));
        assert_eq!(config, TracingConfig::default());
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.filter, "info");
    }

    #[test]
    fn reads_filter_and_format() {
        let config = TracingConfig::from_lookup(lookup(&[
            ("RUST_LOG", "simrs_billing=debug"),
            (LOG_FORMAT_ENV, " Pretty "),
        ]));
        assert_eq!(config.filter, "simrs_billing=debug");
        assert_eq!(config.format, LogFormat::Pretty);
    }

    #[test]
    fn unknown_format_falls_back_to_json() {
        let config = TracingConfig::from_lookup(lookup(&[(LOG_FORMAT_ENV, "xml")]));
        assert_eq!(config.format, LogFormat::Json);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn second_init_is_a_no_op() {
        let config = TracingConfig {
            filter: "warn".to_string(),
            format: LogFormat::Compact,
        };
        config.try_init();
        assert!(!config.try_init());
    }
}
