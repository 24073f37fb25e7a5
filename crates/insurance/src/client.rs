use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::VerifierConfig;
use crate::error::VerificationError;
use crate::simulated::SimulatedBpjsVerifier;
use crate::types::{VerificationRequest, VerificationResponse};

/// Something that can answer a membership check.
#[async_trait]
pub trait InsuranceVerifier: Send + Sync {
    async fn verify(
        &self,
        request: &VerificationRequest,
    ) -> Result<VerificationResponse, VerificationError>;
}

/// Front door for verification: presence checks, a bounded wait, logging.
#[derive(Clone)]
pub struct InsuranceClient {
    verifier: Arc<dyn InsuranceVerifier>,
    timeout: Duration,
}

impl InsuranceClient {
    pub fn new(verifier: Arc<dyn InsuranceVerifier>, timeout: Duration) -> Self {
        Self { verifier, timeout }
    }

    /// Client backed by the simulated BPJS verifier.
    pub fn simulated(config: &VerifierConfig) -> Self {
        Self::new(
            Arc::new(SimulatedBpjsVerifier::from_config(config)),
            config.timeout,
        )
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn verify(
        &self,
        request: &VerificationRequest,
    ) -> Result<VerificationResponse, VerificationError> {
        request.validate()?;

        match tokio::time::timeout(self.timeout, self.verifier.verify(request)).await {
            Ok(Ok(response)) => {
                tracing::info!(
                    card_number = %response.card_number,
                    status = ?response.status,
                    care_class = response.care_class,
                    "insurance verified"
                );
                Ok(response)
            }
            Ok(Err(err)) => {
                tracing::warn!(card_number = %request.card_number, error = %err, "insurance verification failed");
                Err(err)
            }
            Err(_) => {
                tracing::warn!(
                    card_number = %request.card_number,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "insurance verification timed out"
                );
                Err(VerificationError::Timeout(self.timeout))
            }
        }
    }
}

impl std::fmt::Debug for InsuranceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InsuranceClient")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
