//! `simrs-core`: shared building blocks for the hospital billing crates.
//!
//! Pure domain primitives only: money, identifiers, errors and the aggregate/event
//! traits the billing record is modelled on.

pub mod aggregate;
pub mod error;
pub mod event;
pub mod id;
pub mod money;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot};
pub use error::{DomainError, DomainResult};
pub use event::Event;
pub use id::{BillId, PatientId};
pub use money::Money;
pub use value_object::ValueObject;
