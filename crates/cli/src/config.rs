//! Binary settings: display currency plus the verifier configuration.

use std::time::Duration;

use simrs_billing::CurrencyFormat;
use simrs_insurance::VerifierConfig;

pub const CURRENCY_SYMBOL_ENV: &str = "SIMRS_CURRENCY_SYMBOL";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CliConfig {
    pub currency: CurrencyFormat,
    pub verifier: VerifierConfig,
}

impl CliConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let currency = match lookup(CURRENCY_SYMBOL_ENV) {
            None => CurrencyFormat::default(),
            Some(symbol) if symbol.trim().is_empty() => {
                tracing::warn!("{CURRENCY_SYMBOL_ENV} is blank; using default");
                CurrencyFormat::default()
            }
            Some(symbol) => CurrencyFormat::indonesian(symbol.trim()),
        };

        Self {
            currency,
            verifier: VerifierConfig::from_lookup(lookup),
        }
    }

    /// Apply command-line overrides on top of the environment.
    pub fn with_overrides(mut self, currency_symbol: Option<String>, timeout_ms: Option<u64>) -> Self {
        if let Some(symbol) = currency_symbol {
            self.currency = CurrencyFormat::indonesian(symbol);
        }
        if let Some(ms) = timeout_ms {
            self.verifier.timeout = Duration::from_millis(ms);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_rupiah() {
        let config = CliConfig::from_lookup(|_| None);
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.currency.symbol, "Rp");
    }

    #[test]
    fn blank_symbol_falls_back() {
        let config = CliConfig::from_lookup(|key| {
            (key == CURRENCY_SYMBOL_ENV).then(|| "   ".to_string())
        });
        assert_eq!(config.currency.symbol, "Rp");
    }

    #[test]
    fn flags_override_environment() {
        let config = CliConfig::from_lookup(|key| match key {
            CURRENCY_SYMBOL_ENV => Some("IDR".to_string()),
            "SIMRS_BPJS_TIMEOUT_MS" => Some("5000".to_string()),
            _ => None,
        });
        assert_eq!(config.currency.symbol, "IDR");
        assert_eq!(config.verifier.timeout, Duration::from_secs(5));

        let config = config.with_overrides(Some("Rp.".to_string()), Some(250));
        assert_eq!(config.currency.symbol, "Rp.");
        assert_eq!(config.verifier.timeout, Duration::from_millis(250));
    }
}
