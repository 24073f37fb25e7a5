//! Billing form view-model.
//!
//! Holds the rows and the insurance-covered field exactly as typed, and pushes
//! recomputed figures into a [`BillingView`] synchronously after every edit
//! that can change a total.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use simrs_core::{DomainError, DomainResult, Money};

use crate::calculator::{BillingSummary, compute_summary};
use crate::line_item::{self, ItemType, LineItem, LineItemInput};
use crate::view::{BillingView, NullView};

/// Stable handle of a form row. Ids are never reused within one form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(u32);

impl RowId {
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRow {
    pub id: RowId,
    pub input: LineItemInput,
}

impl FormRow {
    pub fn line_item(&self) -> LineItem {
        LineItem::from_input(&self.input)
    }
}

/// Serialized form contents (a submitted form, a saved draft, CLI input).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingFormInput {
    #[serde(default)]
    pub items: Vec<LineItemInput>,
    #[serde(default, deserialize_with = "line_item::form_field")]
    pub insurance_covered: Option<String>,
}

impl BillingFormInput {
    pub fn summary(&self) -> BillingSummary {
        compute_summary(&self.items, self.insurance_covered.as_deref().unwrap_or_default())
    }
}

/// Editable billing form bound to a view.
#[derive(Debug)]
pub struct BillingForm<V: BillingView = NullView> {
    rows: Vec<FormRow>,
    next_row: u32,
    insurance_covered: String,
    view: V,
}

impl Default for BillingForm<NullView> {
    fn default() -> Self {
        Self::new()
    }
}

impl BillingForm<NullView> {
    /// A form nobody is watching (useful for pure computation).
    pub fn new() -> Self {
        Self::with_view(NullView)
    }
}

impl<V: BillingView> BillingForm<V> {
    pub fn with_view(view: V) -> Self {
        Self {
            rows: Vec::new(),
            next_row: 0,
            insurance_covered: String::new(),
            view,
        }
    }

    /// Rebuild a form from serialized contents and render it once.
    pub fn from_input(input: &BillingFormInput, view: V) -> Self {
        let mut form = Self::with_view(view);
        for item in &input.items {
            form.push_row(item.clone());
        }
        form.insurance_covered = input.insurance_covered.clone().unwrap_or_default();
        form.recompute();
        form
    }

    /// Append an empty row: quantity 1, unit price 0, type service.
    pub fn add_row(&mut self) -> RowId {
        self.add_item(LineItemInput {
            description: Some(String::new()),
            quantity: Some("1".to_string()),
            unit_price: Some("0".to_string()),
            item_type: Some(ItemType::Service.as_str().to_string()),
        })
    }

    /// Append a pre-filled row.
    pub fn add_item(&mut self, input: LineItemInput) -> RowId {
        let id = self.push_row(input);
        tracing::debug!(row = %id, "billing row added");
        self.refresh_row(id);
        self.refresh_summary();
        id
    }

    pub fn remove_row(&mut self, id: RowId) -> DomainResult<()> {
        let index = self.index_of(id)?;
        self.rows.remove(index);
        tracing::debug!(row = %id, "billing row removed");
        self.view.remove_row(id);
        self.refresh_summary();
        Ok(())
    }

    pub fn set_description(&mut self, id: RowId, description: &str) -> DomainResult<()> {
        self.row_mut(id)?.input.description = Some(description.to_string());
        Ok(())
    }

    pub fn set_item_type(&mut self, id: RowId, item_type: &str) -> DomainResult<()> {
        self.row_mut(id)?.input.item_type = Some(item_type.to_string());
        Ok(())
    }

    pub fn set_quantity(&mut self, id: RowId, quantity: &str) -> DomainResult<()> {
        self.row_mut(id)?.input.quantity = Some(quantity.to_string());
        self.refresh_row(id);
        self.refresh_summary();
        Ok(())
    }

    pub fn set_unit_price(&mut self, id: RowId, unit_price: &str) -> DomainResult<()> {
        self.row_mut(id)?.input.unit_price = Some(unit_price.to_string());
        self.refresh_row(id);
        self.refresh_summary();
        Ok(())
    }

    pub fn set_insurance_covered(&mut self, raw: &str) {
        self.insurance_covered = raw.to_string();
        self.refresh_summary();
    }

    /// Set insurance-covered to `total × ratio` (rounded to cents), as done
    /// after a successful insurance verification. Returns the new coverage.
    pub fn apply_coverage_ratio(&mut self, ratio: Decimal) -> Money {
        let covered = self.summary().total_amount.scale(ratio);
        tracing::debug!(%ratio, covered = %covered, "insurance coverage applied to form");
        self.set_insurance_covered(&covered.to_fixed());
        covered
    }

    /// Re-render every row total and the summary.
    pub fn recompute(&mut self) -> BillingSummary {
        let ids: Vec<RowId> = self.rows.iter().map(|r| r.id).collect();
        for id in ids {
            self.refresh_row(id);
        }
        self.refresh_summary()
    }

    /// Current totals, without rendering.
    pub fn summary(&self) -> BillingSummary {
        compute_summary(self.rows.iter().map(|r| &r.input), &self.insurance_covered)
    }

    pub fn rows(&self) -> &[FormRow] {
        &self.rows
    }

    pub fn row(&self, id: RowId) -> Option<&FormRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    /// Heading shown above a row: `"Item #<position>"`, 1-based.
    pub fn row_label(&self, id: RowId) -> Option<String> {
        self.index_of(id).ok().map(|i| format!("Item #{}", i + 1))
    }

    pub fn insurance_covered(&self) -> &str {
        &self.insurance_covered
    }

    pub fn line_items(&self) -> Vec<LineItem> {
        self.rows.iter().map(FormRow::line_item).collect()
    }

    pub fn to_input(&self) -> BillingFormInput {
        BillingFormInput {
            items: self.rows.iter().map(|r| r.input.clone()).collect(),
            insurance_covered: Some(self.insurance_covered.clone()),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    fn push_row(&mut self, input: LineItemInput) -> RowId {
        let id = RowId(self.next_row);
        self.next_row += 1;
        self.rows.push(FormRow { id, input });
        id
    }

    fn index_of(&self, id: RowId) -> DomainResult<usize> {
        self.rows
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(DomainError::not_found)
    }

    fn row_mut(&mut self, id: RowId) -> DomainResult<&mut FormRow> {
        self.rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(DomainError::not_found)
    }

    fn refresh_row(&mut self, id: RowId) {
        if let Some(row) = self.row(id) {
            let total = row.line_item().total().to_fixed();
            self.view.render_item_total(id, &total);
        }
    }

    fn refresh_summary(&mut self) -> BillingSummary {
        let summary = self.summary();
        self.view.render_summary(&summary.display());
        summary
    }
}
