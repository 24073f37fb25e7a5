//! Localized currency text for display fields.
//!
//! The calculator only produces fixed `"1234567.89"` strings; turning those into
//! `"Rp 1.234.567,89"` is the display side's job.

use serde::{Deserialize, Serialize};

use simrs_core::Money;

/// Currency symbol plus digit grouping conventions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub thousands_separator: char,
    pub decimal_separator: char,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::rupiah()
    }
}

impl CurrencyFormat {
    /// Indonesian Rupiah: `Rp 1.234.567,89`.
    pub fn rupiah() -> Self {
        Self::indonesian("Rp")
    }

    /// Indonesian grouping with a custom symbol.
    pub fn indonesian(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            thousands_separator: '.',
            decimal_separator: ',',
        }
    }

    pub fn format(&self, amount: Money) -> String {
        let fixed = amount.to_fixed();
        let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, digit) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(self.thousands_separator);
            }
            grouped.push(digit);
        }

        if self.symbol.is_empty() {
            format!("{grouped}{}{cents}", self.decimal_separator)
        } else {
            format!("{} {grouped}{}{cents}", self.symbol, self.decimal_separator)
        }
    }

    /// Format a fixed-format display string (as produced by the calculator).
    pub fn format_str(&self, fixed: &str) -> String {
        self.format(Money::parse_lenient(fixed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rupiah_grouping() {
        let rp = CurrencyFormat::rupiah();
        assert_eq!(rp.format(Money::whole(250_000)), "Rp 250.000,00");
        assert_eq!(rp.format_str("1234567.89"), "Rp 1.234.567,89");
        assert_eq!(rp.format(Money::whole(999)), "Rp 999,00");
        assert_eq!(rp.format(Money::ZERO), "Rp 0,00");
    }

    #[test]
    fn empty_symbol_drops_prefix() {
        let plain = CurrencyFormat::indonesian("");
        assert_eq!(plain.format(Money::whole(1_000)), "1.000,00");
    }
}
