//! Billing total calculator.
//!
//! Pure functions from form state to totals. Nothing here returns an error:
//! malformed numeric input contributes zero, so a half-typed form always has a
//! displayable total.

use serde::{Deserialize, Serialize};

use simrs_core::Money;

use crate::line_item::{LineItem, LineItemInput, parse_quantity};

/// Totals derived from the current line items and insurance coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BillingSummary {
    /// Sum of the per-item totals (each already rounded to cents).
    pub total_amount: Money,
    /// Coverage the summary was computed with.
    pub insurance_covered: Money,
    /// `max(0, total_amount - insurance_covered)`.
    pub patient_responsibility: Money,
}

impl BillingSummary {
    /// Build a summary from already rounded item totals.
    pub fn from_totals<I>(totals: I, insurance_covered: Money) -> Self
    where
        I: IntoIterator<Item = Money>,
    {
        let total_amount: Money = totals.into_iter().sum();
        Self {
            total_amount,
            insurance_covered,
            patient_responsibility: total_amount.saturating_sub(insurance_covered),
        }
    }

    /// Fixed two-decimal strings for the display fields.
    pub fn display(&self) -> SummaryDisplay {
        SummaryDisplay {
            total_amount: self.total_amount.to_fixed(),
            patient_responsibility: self.patient_responsibility.to_fixed(),
        }
    }
}

/// Rendered form of a [`BillingSummary`] (`"250000.00"`, no locale, no symbol).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SummaryDisplay {
    pub total_amount: String,
    pub patient_responsibility: String,
}

/// `quantity × unit_price`, rounded to two decimal places.
pub fn item_total(quantity: u32, unit_price: Money) -> Money {
    unit_price.times(quantity).round_cents()
}

/// Item total straight from form text. Missing or non-numeric fields count as
/// zero.
pub fn compute_item_total(quantity: &str, unit_price: &str) -> Money {
    item_total(parse_quantity(quantity), Money::parse_lenient(unit_price))
}

/// Summary over typed line items.
pub fn summarize(items: &[LineItem], insurance_covered: Money) -> BillingSummary {
    BillingSummary::from_totals(items.iter().map(LineItem::total), insurance_covered)
}

/// Summary straight from form rows and the insurance-covered field.
///
/// Each row is rounded to cents before summing so the total matches the
/// per-row figures shown next to it.
pub fn compute_summary<'a, I>(items: I, insurance_covered: &str) -> BillingSummary
where
    I: IntoIterator<Item = &'a LineItemInput>,
{
    let mut rows = 0usize;
    let totals = items.into_iter().map(|input| {
        rows += 1;
        LineItem::from_input(input).total()
    });
    let summary = BillingSummary::from_totals(totals, Money::parse_lenient(insurance_covered));

    tracing::debug!(
        rows,
        total_amount = %summary.total_amount,
        patient_responsibility = %summary.patient_responsibility,
        "billing summary computed"
    );

    summary
}
