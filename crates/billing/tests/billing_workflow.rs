use chrono::Utc;
use rust_decimal::Decimal;
use simrs_billing::{
    BillCommand, BillStatus, BillingForm, BillingRecord, IssueBill, PaymentMethod, RecordPayment,
    RecordingView, VisitType, compute_change,
};
use simrs_core::{Aggregate, BillId, Money, PatientId};

#[test]
fn form_preview_matches_issued_bill() {
    let mut form = BillingForm::with_view(RecordingView::new());

    let consult = form.add_row();
    form.set_description(consult, "Konsultasi spesialis penyakit dalam").unwrap();
    form.set_quantity(consult, "2").unwrap();
    form.set_unit_price(consult, "50000").unwrap();

    let lab = form.add_row();
    form.set_description(lab, "Cek gula darah").unwrap();
    form.set_item_type(lab, "lab").unwrap();
    form.set_unit_price(lab, "150000").unwrap();

    let covered = form.apply_coverage_ratio(Decimal::new(5, 1));
    assert_eq!(covered, Money::whole(125_000));
    assert_eq!(form.view().summary.patient_responsibility, "125000.00");

    let bill_id = BillId::new();
    let mut bill = BillingRecord::empty(bill_id);
    bill.execute(&BillCommand::IssueBill(IssueBill {
        bill_id,
        patient_id: PatientId::new(),
        visit_id: None,
        visit_type: VisitType::Outpatient,
        items: form.line_items(),
        insurance_covered: covered,
        due_date: None,
        notes: None,
        occurred_at: Utc::now(),
    }))
    .unwrap();

    assert_eq!(bill.summary(), form.summary());
    assert_eq!(bill.summary().display(), form.view().summary);
}

#[test]
fn cash_payment_with_change_settles_bill() {
    let mut form = BillingForm::new();
    form.add_item(simrs_billing::LineItemInput::new("Rawat inap 3 hari", "3", "350000"));

    let bill_id = BillId::new();
    let mut bill = BillingRecord::empty(bill_id);
    bill.execute(&BillCommand::IssueBill(IssueBill {
        bill_id,
        patient_id: PatientId::new(),
        visit_id: Some("RI-0007".to_string()),
        visit_type: VisitType::Inpatient,
        items: form.line_items(),
        insurance_covered: Money::ZERO,
        due_date: None,
        notes: None,
        occurred_at: Utc::now(),
    }))
    .unwrap();

    let tendered = Money::whole(1_100_000);
    bill.execute(&BillCommand::RecordPayment(RecordPayment {
        bill_id,
        amount: tendered,
        method: PaymentMethod::Cash,
        occurred_at: Utc::now(),
    }))
    .unwrap();

    assert_eq!(bill.status(), BillStatus::Paid);
    assert_eq!(bill.total_paid(), Money::whole(1_050_000));
    assert_eq!(
        compute_change(bill.patient_responsibility(), tendered),
        Money::whole(50_000)
    );
}
