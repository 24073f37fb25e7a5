//! Verifier settings, read from the environment.

use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;

pub const TIMEOUT_ENV: &str = "SIMRS_BPJS_TIMEOUT_MS";
pub const LATENCY_ENV: &str = "SIMRS_BPJS_LATENCY_MS";
pub const COVERAGE_RATIO_ENV: &str = "SIMRS_BPJS_COVERAGE_RATIO";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierConfig {
    /// Upper bound on a single verification round-trip.
    pub timeout: Duration,
    /// Artificial delay of the simulated verifier.
    pub simulated_latency: Duration,
    /// Coverage share reported by the simulated verifier.
    pub coverage_ratio: Decimal,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            simulated_latency: Duration::from_millis(1_500),
            coverage_ratio: Decimal::new(5, 1),
        }
    }
}

impl VerifierConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset or invalid values fall back to
    /// the defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let timeout = parse_or(&lookup, TIMEOUT_ENV, defaults.timeout.as_millis() as u64);
        let latency = parse_or(
            &lookup,
            LATENCY_ENV,
            defaults.simulated_latency.as_millis() as u64,
        );
        let mut coverage_ratio = parse_or(&lookup, COVERAGE_RATIO_ENV, defaults.coverage_ratio);
        if coverage_ratio < Decimal::ZERO || coverage_ratio > Decimal::ONE {
            tracing::warn!(%coverage_ratio, "{COVERAGE_RATIO_ENV} outside 0..=1; using default");
            coverage_ratio = defaults.coverage_ratio;
        }

        Self {
            timeout: Duration::from_millis(timeout),
            simulated_latency: Duration::from_millis(latency),
            coverage_ratio,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, raw = %raw, %default, "invalid value; using default");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(VerifierConfig::from_lookup(lookup(&[])), VerifierConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let config = VerifierConfig::from_lookup(lookup(&[
            (TIMEOUT_ENV, "2000"),
            (LATENCY_ENV, " 10 "),
            (COVERAGE_RATIO_ENV, "0.8"),
        ]));
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.simulated_latency, Duration::from_millis(10));
        assert_eq!(config.coverage_ratio, Decimal::new(8, 1));
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = VerifierConfig::from_lookup(lookup(&[
            (TIMEOUT_ENV, "soon"),
            (COVERAGE_RATIO_ENV, "1.5"),
        ]));
        assert_eq!(config, VerifierConfig::default());
    }
}
