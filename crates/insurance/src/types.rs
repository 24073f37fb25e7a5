use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use simrs_core::{Money, PatientId};

use crate::error::VerificationError;

/// Membership check for one patient's insurance card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRequest {
    pub patient_id: Option<PatientId>,
    pub card_number: String,
    /// Date of service the membership must be valid on.
    pub service_date: NaiveDate,
}

impl VerificationRequest {
    /// Request for today's date.
    pub fn new(patient_id: Option<PatientId>, card_number: impl Into<String>) -> Self {
        Self {
            patient_id,
            card_number: card_number.into(),
            service_date: Utc::now().date_naive(),
        }
    }

    /// Presence checks only; the card format is the insurer's call.
    pub fn validate(&self) -> Result<(), VerificationError> {
        if self.patient_id.is_none() {
            return Err(VerificationError::MissingInput("patient_id"));
        }
        if self.card_number.trim().is_empty() {
            return Err(VerificationError::MissingInput("card_number"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    Active,
    Inactive,
}

/// The insurer's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResponse {
    pub card_number: String,
    pub status: MembershipStatus,
    pub member_name: String,
    /// Care class (1 = highest).
    pub care_class: u8,
    /// Share of the bill the insurer covers, between 0 and 1.
    pub coverage_ratio: Decimal,
    pub verified_at: DateTime<Utc>,
}

impl VerificationResponse {
    pub fn is_active(&self) -> bool {
        self.status == MembershipStatus::Active
    }

    /// Amount the insurer covers of `total`; zero for inactive memberships.
    pub fn coverage_for(&self, total: Money) -> Money {
        if self.is_active() {
            total.scale(self.coverage_ratio)
        } else {
            Money::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: MembershipStatus) -> VerificationResponse {
        VerificationResponse {
            card_number: "0001234567890".to_string(),
            status,
            member_name: "Siti Rahayu".to_string(),
            care_class: 1,
            coverage_ratio: Decimal::new(5, 1),
            verified_at: Utc::now(),
        }
    }

    #[test]
    fn coverage_is_share_of_total_when_active() {
        let covered = response(MembershipStatus::Active).coverage_for(Money::whole(250_001));
        assert_eq!(covered.to_fixed(), "125000.50");
    }

    #[test]
    fn inactive_membership_covers_nothing() {
        let covered = response(MembershipStatus::Inactive).coverage_for(Money::whole(250_000));
        assert_eq!(covered, Money::ZERO);
    }

    #[test]
    fn presence_checks() {
        let missing_patient = VerificationRequest::new(None, "0001234567890");
        assert_eq!(
            missing_patient.validate(),
            Err(VerificationError::MissingInput("patient_id"))
        );

        let missing_card = VerificationRequest::new(Some(PatientId::new()), "  ");
        assert_eq!(
            missing_card.validate(),
            Err(VerificationError::MissingInput("card_number"))
        );
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&MembershipStatus::Active).unwrap();
        assert_eq!(json, "\"active\"");
    }
}
