//! Insurance (BPJS) membership verification.
//!
//! An explicit request/response interface with a bounded wait, in place of a
//! fire-and-forget callback. [`SimulatedBpjsVerifier`] stands in for the real
//! BPJS VClaim service until that integration exists.

pub mod client;
pub mod config;
pub mod error;
pub mod simulated;
pub mod types;

pub use client::{InsuranceClient, InsuranceVerifier};
pub use config::VerifierConfig;
pub use error::VerificationError;
pub use simulated::SimulatedBpjsVerifier;
pub use types::{MembershipStatus, VerificationRequest, VerificationResponse};
