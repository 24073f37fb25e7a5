//! Hospital billing domain.
//!
//! Deterministic billing logic only (no IO, no HTTP, no storage):
//!
//! - [`calculator`]: item totals, grand total and patient responsibility
//! - [`form`]: the editable billing form, recomputed on every edit
//! - [`view`] / [`currency`]: the display side the form renders into
//! - [`payment`]: change owed back to a payer
//! - [`record`]: the issued bill and its payment lifecycle
//! - [`search`]: text filtering over bills

pub mod calculator;
pub mod currency;
pub mod form;
pub mod line_item;
pub mod payment;
pub mod record;
pub mod search;
pub mod view;

pub use calculator::{
    BillingSummary, SummaryDisplay, compute_item_total, compute_summary, item_total, summarize,
};
pub use currency::CurrencyFormat;
pub use form::{BillingForm, BillingFormInput, FormRow, RowId};
pub use line_item::{ItemType, LineItem, LineItemInput, parse_quantity};
pub use payment::{compute_change, compute_change_str};
pub use record::{
    AddBillItem, ApplyInsuranceCoverage, BillCancelled, BillCommand, BillEvent, BillIssued,
    BillItemAdded, BillStatus, BillingRecord, CancelBill, InsuranceCoverageApplied, IssueBill,
    PaymentMethod, PaymentRecorded, RecordPayment, VisitType,
};
pub use search::{filter_bills, matches_query};
pub use view::{BillingView, NullView, RecordingView};
