//! `summary`, `change` and `verify`, each rendering to a `String` so the
//! binary only has to print.

use std::path::Path;

use anyhow::Context;

use simrs_billing::{
    BillingForm, BillingFormInput, BillingSummary, CurrencyFormat, RecordingView, compute_change,
};
use simrs_core::{Money, PatientId};
use simrs_insurance::{InsuranceClient, VerificationRequest, VerificationResponse};

pub fn load_form(path: &Path) -> anyhow::Result<BillingFormInput> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read billing form {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("failed to parse billing form {}", path.display()))
}

/// Per-row totals followed by the summary, in fixed and currency formats.
pub fn render_summary(input: &BillingFormInput, currency: &CurrencyFormat) -> String {
    let form = BillingForm::from_input(input, RecordingView::with_currency(currency.clone()));
    render_form(&form)
}

pub fn summary_json(summary: &BillingSummary) -> anyhow::Result<String> {
    serde_json::to_string_pretty(summary).context("failed to serialize billing summary")
}

pub fn render_change(amount_due: Money, payment_amount: Money, currency: &CurrencyFormat) -> String {
    let change = compute_change(amount_due, payment_amount);
    format!("Change: {change} ({})", currency.format(change))
}

/// Run a verification and, when a form is given, apply the coverage to it.
pub async fn verify(
    client: &InsuranceClient,
    patient_id: PatientId,
    card_number: &str,
    form: Option<&BillingFormInput>,
    currency: &CurrencyFormat,
) -> anyhow::Result<String> {
    let request = VerificationRequest::new(Some(patient_id), card_number);
    let response = client
        .verify(&request)
        .await
        .with_context(|| format!("insurance verification failed for card {card_number}"))?;

    let mut lines = vec![render_membership(&response)];

    if let Some(input) = form {
        let mut form = BillingForm::from_input(input, RecordingView::with_currency(currency.clone()));
        if response.is_active() {
            form.apply_coverage_ratio(response.coverage_ratio);
        } else {
            tracing::warn!(card_number, "membership inactive; insurance coverage left unchanged");
        }
        lines.push(String::new());
        lines.push(render_form(&form));
    }

    Ok(lines.join("\n"))
}

fn render_membership(response: &VerificationResponse) -> String {
    let status = if response.is_active() { "active" } else { "inactive" };
    [
        format!("Card:           {}", response.card_number),
        format!("Status:         {status}"),
        format!("Member:         {}", response.member_name),
        format!("Care class:     {}", response.care_class),
        format!("Coverage ratio: {}", response.coverage_ratio),
    ]
    .join("\n")
}

fn render_form(form: &BillingForm<RecordingView>) -> String {
    let view = form.view();
    let mut lines: Vec<String> = form
        .rows()
        .iter()
        .map(|row| {
            let item = row.line_item();
            let label = form.row_label(row.id).unwrap_or_default();
            let total = view.item_totals.get(&row.id).cloned().unwrap_or_default();
            format!(
                "{label}  {} ({})  {} x {} = {total}",
                item.description, item.item_type, item.quantity, item.unit_price
            )
        })
        .collect();

    let summary = form.summary();
    lines.push(format!(
        "Total amount:           {} ({})",
        view.summary.total_amount, view.total_amount_display
    ));
    lines.push(format!("Insurance covered:      {}", summary.insurance_covered));
    lines.push(format!(
        "Patient responsibility: {} ({})",
        view.summary.patient_responsibility, view.patient_responsibility_display
    ));
    lines.join("\n")
}
