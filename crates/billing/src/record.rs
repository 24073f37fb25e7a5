use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use simrs_core::{Aggregate, AggregateRoot, BillId, DomainError, Event, Money, PatientId};

use crate::calculator::{BillingSummary, summarize};
use crate::line_item::LineItem;
use crate::payment::compute_change;

/// Kind of visit a bill belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitType {
    Outpatient,
    Inpatient,
    Emergency,
    Pharmacy,
    Lab,
    Radiology,
}

impl VisitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitType::Outpatient => "outpatient",
            VisitType::Inpatient => "inpatient",
            VisitType::Emergency => "emergency",
            VisitType::Pharmacy => "pharmacy",
            VisitType::Lab => "lab",
            VisitType::Radiology => "radiology",
        }
    }
}

/// Bill status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    Pending,
    PartiallyPaid,
    Paid,
    Cancelled,
}

impl BillStatus {
    /// Human-readable label, as shown in the bill list.
    pub fn label(&self) -> &'static str {
        match self {
            BillStatus::Pending => "pending",
            BillStatus::PartiallyPaid => "partially paid",
            BillStatus::Paid => "paid",
            BillStatus::Cancelled => "cancelled",
        }
    }

    fn accepts_payment(&self) -> bool {
        matches!(self, BillStatus::Pending | BillStatus::PartiallyPaid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    BankTransfer,
    Insurance,
}

/// Aggregate root: an issued patient bill.
///
/// Totals are always recomputed here from the bill's own items; figures shown
/// by the billing form are a preview only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingRecord {
    id: BillId,
    patient_id: Option<PatientId>,
    visit_id: Option<String>,
    visit_type: Option<VisitType>,
    items: Vec<LineItem>,
    total_amount: Money,
    insurance_covered: Money,
    patient_responsibility: Money,
    total_paid: Money,
    status: BillStatus,
    issued_at: Option<DateTime<Utc>>,
    due_date: Option<DateTime<Utc>>,
    paid_at: Option<DateTime<Utc>>,
    payment_method: Option<PaymentMethod>,
    notes: Option<String>,
    version: u64,
    created: bool,
}

impl BillingRecord {
    /// Create an empty, not-yet-issued aggregate instance for rehydration.
    pub fn empty(id: BillId) -> Self {
        Self {
            id,
            patient_id: None,
            visit_id: None,
            visit_type: None,
            items: Vec::new(),
            total_amount: Money::ZERO,
            insurance_covered: Money::ZERO,
            patient_responsibility: Money::ZERO,
            total_paid: Money::ZERO,
            status: BillStatus::Pending,
            issued_at: None,
            due_date: None,
            paid_at: None,
            payment_method: None,
            notes: None,
            version: 0,
            created: false,
        }
    }

    /// Rebuild state from a stored event stream.
    pub fn from_events<'a, I>(id: BillId, events: I) -> Self
    where
        I: IntoIterator<Item = &'a BillEvent>,
    {
        let mut bill = Self::empty(id);
        for event in events {
            bill.apply(event);
        }
        bill
    }

    pub fn id_typed(&self) -> BillId {
        self.id
    }

    pub fn patient_id(&self) -> Option<PatientId> {
        self.patient_id
    }

    pub fn visit_id(&self) -> Option<&str> {
        self.visit_id.as_deref()
    }

    pub fn visit_type(&self) -> Option<VisitType> {
        self.visit_type
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn status(&self) -> BillStatus {
        self.status
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn insurance_covered(&self) -> Money {
        self.insurance_covered
    }

    pub fn patient_responsibility(&self) -> Money {
        self.patient_responsibility
    }

    pub fn total_paid(&self) -> Money {
        self.total_paid
    }

    pub fn outstanding_amount(&self) -> Money {
        self.patient_responsibility.saturating_sub(self.total_paid)
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.issued_at
    }

    pub fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    pub fn paid_at(&self) -> Option<DateTime<Utc>> {
        self.paid_at
    }

    pub fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn is_issued(&self) -> bool {
        self.created
    }

    pub fn summary(&self) -> BillingSummary {
        BillingSummary {
            total_amount: self.total_amount,
            insurance_covered: self.insurance_covered,
            patient_responsibility: self.patient_responsibility,
        }
    }

    /// Everything a free-text search over the bill list should match.
    pub fn search_text(&self) -> String {
        let mut parts: Vec<String> = vec![self.id.to_string(), self.status.label().to_string()];
        if let Some(patient_id) = self.patient_id {
            parts.push(patient_id.to_string());
        }
        if let Some(visit_id) = &self.visit_id {
            parts.push(visit_id.clone());
        }
        if let Some(visit_type) = self.visit_type {
            parts.push(visit_type.as_str().to_string());
        }
        parts.extend(self.items.iter().map(|i| i.description.clone()));
        if let Some(notes) = &self.notes {
            parts.push(notes.clone());
        }
        parts.push(self.total_amount.to_fixed());
        parts.join(" ")
    }
}

impl AggregateRoot for BillingRecord {
    type Id = BillId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: IssueBill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueBill {
    pub bill_id: BillId,
    pub patient_id: PatientId,
    pub visit_id: Option<String>,
    pub visit_type: VisitType,
    pub items: Vec<LineItem>,
    pub insurance_covered: Money,
    pub due_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AddBillItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddBillItem {
    pub bill_id: BillId,
    pub item: LineItem,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ApplyInsuranceCoverage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyInsuranceCoverage {
    pub bill_id: BillId,
    pub insurance_covered: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RecordPayment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPayment {
    pub bill_id: BillId,
    pub amount: Money,
    pub method: PaymentMethod,
    pub occurred_at: DateTime<Utc>,
}

/// Command: CancelBill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelBill {
    pub bill_id: BillId,
    pub reason: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BillCommand {
    IssueBill(IssueBill),
    AddBillItem(AddBillItem),
    ApplyInsuranceCoverage(ApplyInsuranceCoverage),
    RecordPayment(RecordPayment),
    CancelBill(CancelBill),
}

/// Event: BillIssued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillIssued {
    pub bill_id: BillId,
    pub patient_id: PatientId,
    pub visit_id: Option<String>,
    pub visit_type: VisitType,
    pub items: Vec<LineItem>,
    pub total_amount: Money,
    pub insurance_covered: Money,
    pub patient_responsibility: Money,
    pub due_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: BillItemAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillItemAdded {
    pub bill_id: BillId,
    pub item: LineItem,
    pub total_amount: Money,
    pub patient_responsibility: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Event: InsuranceCoverageApplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceCoverageApplied {
    pub bill_id: BillId,
    pub insurance_covered: Money,
    pub patient_responsibility: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PaymentRecorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecorded {
    pub bill_id: BillId,
    /// Amount handed over by the payer.
    pub amount: Money,
    pub method: PaymentMethod,
    /// Portion of `amount` given back.
    pub change_due: Money,
    pub new_total_paid: Money,
    pub status: BillStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Event: BillCancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillCancelled {
    pub bill_id: BillId,
    pub reason: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BillEvent {
    BillIssued(BillIssued),
    BillItemAdded(BillItemAdded),
    InsuranceCoverageApplied(InsuranceCoverageApplied),
    PaymentRecorded(PaymentRecorded),
    BillCancelled(BillCancelled),
}

impl Event for BillEvent {
    fn event_type(&self) -> &'static str {
        match self {
            BillEvent::BillIssued(_) => "billing.bill.issued",
            BillEvent::BillItemAdded(_) => "billing.bill.item_added",
            BillEvent::InsuranceCoverageApplied(_) => "billing.bill.insurance_coverage_applied",
            BillEvent::PaymentRecorded(_) => "billing.bill.payment_recorded",
            BillEvent::BillCancelled(_) => "billing.bill.cancelled",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            BillEvent::BillIssued(e) => e.occurred_at,
            BillEvent::BillItemAdded(e) => e.occurred_at,
            BillEvent::InsuranceCoverageApplied(e) => e.occurred_at,
            BillEvent::PaymentRecorded(e) => e.occurred_at,
            BillEvent::BillCancelled(e) => e.occurred_at,
        }
    }
}

impl Aggregate for BillingRecord {
    type Command = BillCommand;
    type Event = BillEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            BillEvent::BillIssued(e) => {
                self.id = e.bill_id;
                self.patient_id = Some(e.patient_id);
                self.visit_id = e.visit_id.clone();
                self.visit_type = Some(e.visit_type);
                self.items = e.items.clone();
                self.total_amount = e.total_amount;
                self.insurance_covered = e.insurance_covered;
                self.patient_responsibility = e.patient_responsibility;
                self.total_paid = Money::ZERO;
                self.status = BillStatus::Pending;
                self.issued_at = Some(e.occurred_at);
                self.due_date = e.due_date;
                self.notes = e.notes.clone();
                self.created = true;
            }
            BillEvent::BillItemAdded(e) => {
                self.items.push(e.item.clone());
                self.total_amount = e.total_amount;
                self.patient_responsibility = e.patient_responsibility;
            }
            BillEvent::InsuranceCoverageApplied(e) => {
                self.insurance_covered = e.insurance_covered;
                self.patient_responsibility = e.patient_responsibility;
            }
            BillEvent::PaymentRecorded(e) => {
                self.total_paid = e.new_total_paid;
                self.payment_method = Some(e.method);
                self.status = e.status;
                if e.status == BillStatus::Paid {
                    self.paid_at = Some(e.occurred_at);
                }
            }
            BillEvent::BillCancelled(_) => {
                self.status = BillStatus::Cancelled;
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            BillCommand::IssueBill(cmd) => self.handle_issue(cmd),
            BillCommand::AddBillItem(cmd) => self.handle_add_item(cmd),
            BillCommand::ApplyInsuranceCoverage(cmd) => self.handle_apply_coverage(cmd),
            BillCommand::RecordPayment(cmd) => self.handle_record_payment(cmd),
            BillCommand::CancelBill(cmd) => self.handle_cancel(cmd),
        }
    }
}

impl BillingRecord {
    fn ensure_issued(&self, bill_id: BillId) -> Result<(), DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        if self.id != bill_id {
            return Err(DomainError::invariant("bill_id mismatch"));
        }
        Ok(())
    }

    fn ensure_pending(&self, action: &str) -> Result<(), DomainError> {
        if self.status != BillStatus::Pending {
            return Err(DomainError::invariant(format!(
                "cannot {action} on a {} bill",
                self.status.label()
            )));
        }
        Ok(())
    }

    fn validate_item(item: &LineItem) -> Result<(), DomainError> {
        if item.description.trim().is_empty() {
            return Err(DomainError::validation("bill item description is required"));
        }
        if item.quantity == 0 {
            return Err(DomainError::validation(
                "bill item quantity must be positive",
            ));
        }
        Ok(())
    }

    fn handle_issue(&self, cmd: &IssueBill) -> Result<Vec<BillEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("bill already issued"));
        }
        if self.id != cmd.bill_id {
            return Err(DomainError::invariant("bill_id mismatch"));
        }
        if cmd.items.is_empty() {
            return Err(DomainError::validation("cannot issue a bill without items"));
        }
        for item in &cmd.items {
            Self::validate_item(item)?;
        }

        let summary = summarize(&cmd.items, cmd.insurance_covered);

        Ok(vec![BillEvent::BillIssued(BillIssued {
            bill_id: cmd.bill_id,
            patient_id: cmd.patient_id,
            visit_id: cmd.visit_id.clone(),
            visit_type: cmd.visit_type,
            items: cmd.items.clone(),
            total_amount: summary.total_amount,
            insurance_covered: summary.insurance_covered,
            patient_responsibility: summary.patient_responsibility,
            due_date: cmd.due_date,
            notes: cmd.notes.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_add_item(&self, cmd: &AddBillItem) -> Result<Vec<BillEvent>, DomainError> {
        self.ensure_issued(cmd.bill_id)?;
        self.ensure_pending("add items")?;
        Self::validate_item(&cmd.item)?;

        let mut items = self.items.clone();
        items.push(cmd.item.clone());
        let summary = summarize(&items, self.insurance_covered);

        Ok(vec![BillEvent::BillItemAdded(BillItemAdded {
            bill_id: cmd.bill_id,
            item: cmd.item.clone(),
            total_amount: summary.total_amount,
            patient_responsibility: summary.patient_responsibility,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_apply_coverage(
        &self,
        cmd: &ApplyInsuranceCoverage,
    ) -> Result<Vec<BillEvent>, DomainError> {
        self.ensure_issued(cmd.bill_id)?;
        self.ensure_pending("apply insurance coverage")?;

        let summary = summarize(&self.items, cmd.insurance_covered);

        Ok(vec![BillEvent::InsuranceCoverageApplied(
            InsuranceCoverageApplied {
                bill_id: cmd.bill_id,
                insurance_covered: summary.insurance_covered,
                patient_responsibility: summary.patient_responsibility,
                occurred_at: cmd.occurred_at,
            },
        )])
    }

    fn handle_record_payment(&self, cmd: &RecordPayment) -> Result<Vec<BillEvent>, DomainError> {
        self.ensure_issued(cmd.bill_id)?;

        if !self.status.accepts_payment() {
            return Err(DomainError::invariant(format!(
                "cannot record payment on a {} bill",
                self.status.label()
            )));
        }
        let outstanding = self.outstanding_amount();
        // A zero payment only settles a bill with nothing left to pay.
        if cmd.amount.is_zero() && !outstanding.is_zero() {
            return Err(DomainError::validation("payment amount must be positive"));
        }

        let change_due = compute_change(outstanding, cmd.amount);
        let new_total_paid = self.total_paid + cmd.amount.saturating_sub(change_due);
        let status = if new_total_paid >= self.patient_responsibility {
            BillStatus::Paid
        } else {
            BillStatus::PartiallyPaid
        };

        tracing::debug!(
            bill_id = %cmd.bill_id,
            amount = %cmd.amount,
            change_due = %change_due,
            status = status.label(),
            "payment recorded"
        );

        Ok(vec![BillEvent::PaymentRecorded(PaymentRecorded {
            bill_id: cmd.bill_id,
            amount: cmd.amount,
            method: cmd.method,
            change_due,
            new_total_paid,
            status,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_cancel(&self, cmd: &CancelBill) -> Result<Vec<BillEvent>, DomainError> {
        self.ensure_issued(cmd.bill_id)?;

        match self.status {
            BillStatus::Cancelled => Err(DomainError::conflict("bill is already cancelled")),
            BillStatus::Paid => Err(DomainError::invariant("cannot cancel a paid bill")),
            BillStatus::Pending | BillStatus::PartiallyPaid => {
                Ok(vec![BillEvent::BillCancelled(BillCancelled {
                    bill_id: cmd.bill_id,
                    reason: cmd.reason.clone(),
                    occurred_at: cmd.occurred_at,
                })])
            }
        }
    }
}
