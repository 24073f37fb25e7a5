use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::client::InsuranceVerifier;
use crate::config::VerifierConfig;
use crate::error::VerificationError;
use crate::types::{MembershipStatus, VerificationRequest, VerificationResponse};

/// Minimum length of a card number the simulated insurer accepts.
pub const MIN_CARD_DIGITS: usize = 8;

/// Stand-in for the BPJS membership service.
///
/// Waits `latency`, rejects card numbers that are not at least
/// [`MIN_CARD_DIGITS`] digits, reports configured cards as inactive and
/// everything else as an active class-1 membership. With an outage set, every
/// call fails as [`VerificationError::Unavailable`].
#[derive(Debug, Clone)]
pub struct SimulatedBpjsVerifier {
    latency: Duration,
    coverage_ratio: Decimal,
    inactive_cards: HashSet<String>,
    outage: bool,
}

impl SimulatedBpjsVerifier {
    pub fn new(latency: Duration, coverage_ratio: Decimal) -> Self {
        Self {
            latency,
            coverage_ratio,
            inactive_cards: HashSet::new(),
            outage: false,
        }
    }

    pub fn from_config(config: &VerifierConfig) -> Self {
        Self::new(config.simulated_latency, config.coverage_ratio)
    }

    pub fn with_inactive_card(mut self, card_number: impl Into<String>) -> Self {
        self.inactive_cards.insert(card_number.into());
        self
    }

    /// Simulate the insurer being unreachable.
    pub fn with_outage(mut self) -> Self {
        self.outage = true;
        self
    }
}

#[async_trait]
impl InsuranceVerifier for SimulatedBpjsVerifier {
    async fn verify(
        &self,
        request: &VerificationRequest,
    ) -> Result<VerificationResponse, VerificationError> {
        tokio::time::sleep(self.latency).await;

        if self.outage {
            return Err(VerificationError::Unavailable(
                "BPJS service unreachable".to_string(),
            ));
        }

        let card_number = request.card_number.trim();
        if card_number.len() < MIN_CARD_DIGITS || !card_number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(VerificationError::Rejected(
                "invalid insurance number".to_string(),
            ));
        }

        let (status, coverage_ratio) = if self.inactive_cards.contains(card_number) {
            (MembershipStatus::Inactive, Decimal::ZERO)
        } else {
            (MembershipStatus::Active, self.coverage_ratio)
        };

        Ok(VerificationResponse {
            card_number: card_number.to_string(),
            status,
            member_name: "BPJS Member".to_string(),
            care_class: 1,
            coverage_ratio,
            verified_at: Utc::now(),
        })
    }
}
