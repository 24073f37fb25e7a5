//! Display collaborator for the billing form.

use std::collections::BTreeMap;

use crate::calculator::SummaryDisplay;
use crate::currency::CurrencyFormat;
use crate::form::RowId;

/// Receives every recomputed figure from a [`crate::BillingForm`].
///
/// Strings arrive in the fixed two-decimal format; localisation is up to the
/// implementation.
pub trait BillingView {
    fn render_item_total(&mut self, row: RowId, total: &str);

    fn render_summary(&mut self, summary: &SummaryDisplay);

    /// A row left the form.
    fn remove_row(&mut self, _row: RowId) {}
}

impl<V: BillingView + ?Sized> BillingView for &mut V {
    fn render_item_total(&mut self, row: RowId, total: &str) {
        (**self).render_item_total(row, total);
    }

    fn render_summary(&mut self, summary: &SummaryDisplay) {
        (**self).render_summary(summary);
    }

    fn remove_row(&mut self, row: RowId) {
        (**self).remove_row(row);
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullView;

impl BillingView for NullView {
    fn render_item_total(&mut self, _row: RowId, _total: &str) {}

    fn render_summary(&mut self, _summary: &SummaryDisplay) {}
}

/// Keeps the latest rendered state, like the form's output fields.
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    pub item_totals: BTreeMap<RowId, String>,
    pub summary: SummaryDisplay,
    pub total_amount_display: String,
    pub patient_responsibility_display: String,
    pub summary_renders: usize,
    currency: CurrencyFormat,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_currency(currency: CurrencyFormat) -> Self {
        Self {
            currency,
            ..Self::default()
        }
    }
}

impl BillingView for RecordingView {
    fn render_item_total(&mut self, row: RowId, total: &str) {
        self.item_totals.insert(row, total.to_string());
    }

    fn render_summary(&mut self, summary: &SummaryDisplay) {
        self.summary = summary.clone();
        self.total_amount_display = self.currency.format_str(&summary.total_amount);
        self.patient_responsibility_display =
            self.currency.format_str(&summary.patient_responsibility);
        self.summary_renders += 1;
    }

    fn remove_row(&mut self, row: RowId) {
        self.item_totals.remove(&row);
    }
}
