use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use simrs_billing::{BillingForm, LineItemInput, RecordingView};
use simrs_core::{Money, PatientId};
use simrs_insurance::{
    InsuranceClient, InsuranceVerifier, MembershipStatus, SimulatedBpjsVerifier,
    VerificationError, VerificationRequest, VerificationResponse, VerifierConfig,
};

fn fast_client(verifier: SimulatedBpjsVerifier) -> InsuranceClient {
    InsuranceClient::new(Arc::new(verifier), Duration::from_secs(5))
}

fn request(card: &str) -> VerificationRequest {
    VerificationRequest::new(Some(PatientId::new()), card)
}

#[tokio::test]
async fn active_card_gets_configured_coverage() {
    let client = fast_client(SimulatedBpjsVerifier::new(
        Duration::from_millis(1),
        Decimal::new(5, 1),
    ));

    let response = client.verify(&request(" 0001234567890 ")).await.unwrap();
    assert_eq!(response.status, MembershipStatus::Active);
    assert_eq!(response.card_number, "0001234567890");
    assert_eq!(response.care_class, 1);
    assert_eq!(
        response.coverage_for(Money::whole(250_000)),
        Money::whole(125_000)
    );
}

#[tokio::test]
async fn short_or_non_numeric_cards_are_rejected() {
    let client = fast_client(SimulatedBpjsVerifier::new(Duration::ZERO, Decimal::ONE));

    for card in ["1234567", "00012345678AB"] {
        let err = client.verify(&request(card)).await.unwrap_err();
        assert!(matches!(err, VerificationError::Rejected(_)), "card {card}");
    }
}

#[tokio::test]
async fn listed_cards_are_inactive() {
    let client = fast_client(
        SimulatedBpjsVerifier::new(Duration::ZERO, Decimal::ONE)
            .with_inactive_card("0009999999999"),
    );

    let response = client.verify(&request("0009999999999")).await.unwrap();
    assert!(!response.is_active());
    assert_eq!(response.coverage_for(Money::whole(100_000)), Money::ZERO);
}

#[tokio::test]
async fn outage_reports_unavailable() {
    let client = fast_client(
        SimulatedBpjsVerifier::new(Duration::ZERO, Decimal::ONE).with_outage(),
    );

    let err = client.verify(&request("0001234567890")).await.unwrap_err();
    assert!(matches!(err, VerificationError::Unavailable(_)));
    assert_eq!(err.to_string(), "insurer unavailable: BPJS service unreachable");
}

#[tokio::test]
async fn missing_input_fails_before_calling_insurer() {
    struct Unreachable;

    #[async_trait]
    impl InsuranceVerifier for Unreachable {
        async fn verify(
            &self,
            _request: &VerificationRequest,
        ) -> Result<VerificationResponse, VerificationError> {
            panic!("verifier must not be called");
        }
    }

    let client = InsuranceClient::new(Arc::new(Unreachable), Duration::from_secs(1));
    let err = client
        .verify(&VerificationRequest::new(None, "0001234567890"))
        .await
        .unwrap_err();
    assert_eq!(err, VerificationError::MissingInput("patient_id"));
}

#[tokio::test]
async fn slow_insurer_times_out() {
    let verifier = SimulatedBpjsVerifier::new(Duration::from_millis(500), Decimal::ONE);
    let client = InsuranceClient::new(Arc::new(verifier), Duration::from_millis(20));

    let err = client.verify(&request("0001234567890")).await.unwrap_err();
    assert_eq!(err, VerificationError::Timeout(Duration::from_millis(20)));
}

#[tokio::test]
async fn simulated_client_uses_config() {
    let config = VerifierConfig {
        timeout: Duration::from_secs(1),
        simulated_latency: Duration::from_millis(1),
        coverage_ratio: Decimal::new(75, 2),
    };
    let client = InsuranceClient::simulated(&config);
    assert_eq!(client.timeout(), Duration::from_secs(1));

    let response = client.verify(&request("0001234567890")).await.unwrap();
    assert_eq!(response.coverage_ratio, Decimal::new(75, 2));
}

#[tokio::test]
async fn verified_coverage_fills_the_billing_form() {
    let mut form = BillingForm::with_view(RecordingView::new());
    form.add_item(LineItemInput::new("Konsultasi spesialis", "1", "150000"));
    form.add_item(LineItemInput::new("Cek darah lengkap", "1", "85000"));

    let client = fast_client(SimulatedBpjsVerifier::new(
        Duration::from_millis(1),
        Decimal::new(5, 1),
    ));
    let response = client.verify(&request("0001234567890")).await.unwrap();
    let covered = form.apply_coverage_ratio(response.coverage_ratio);

    assert_eq!(covered, response.coverage_for(Money::whole(235_000)));
    assert_eq!(form.view().summary.patient_responsibility, "117500.00");
    assert_eq!(form.view().patient_responsibility_display, "Rp 117.500,00");
}
