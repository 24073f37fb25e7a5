//! Free-text filtering over the bill list.

use crate::record::BillingRecord;

/// Case-insensitive substring match. A blank query matches everything.
pub fn matches_query(text: &str, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    text.to_lowercase().contains(&query.to_lowercase())
}

/// Bills whose searchable text contains `query`, in their original order.
pub fn filter_bills<'a>(bills: &'a [BillingRecord], query: &str) -> Vec<&'a BillingRecord> {
    let matched: Vec<&BillingRecord> = bills
        .iter()
        .filter(|bill| matches_query(&bill.search_text(), query))
        .collect();
    tracing::debug!(query, total = bills.len(), matched = matched.len(), "bills filtered");
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_item::{ItemType, LineItem};
    use crate::record::{BillCommand, IssueBill, VisitType};
    use chrono::Utc;
    use simrs_core::{Aggregate, BillId, Money, PatientId};

    fn bill(description: &str, visit_type: VisitType) -> BillingRecord {
        let bill_id = BillId::new();
        let mut bill = BillingRecord::empty(bill_id);
        bill.execute(&BillCommand::IssueBill(IssueBill {
            bill_id,
            patient_id: PatientId::new(),
            visit_id: None,
            visit_type,
            items: vec![LineItem::new(description, 1, Money::whole(10_000), ItemType::Service)],
            insurance_covered: Money::ZERO,
            due_date: None,
            notes: None,
            occurred_at: Utc::now(),
        }))
        .unwrap();
        bill
    }

    #[test]
    fn query_is_case_insensitive_and_trimmed() {
        assert!(matches_query("Cek Darah Lengkap", "  darah "));
        assert!(!matches_query("Cek Darah Lengkap", "urin"));
        assert!(matches_query("anything", ""));
    }

    #[test]
    fn filters_by_item_description_and_visit_type() {
        let bills = vec![
            bill("Hematologi lengkap", VisitType::Lab),
            bill("USG abdomen", VisitType::Radiology),
            bill("Konsultasi", VisitType::Outpatient),
        ];

        let hits = filter_bills(&bills, "usg");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id_typed(), bills[1].id_typed());

        assert_eq!(filter_bills(&bills, "RADIOLOGY").len(), 1);
        assert_eq!(filter_bills(&bills, "pending").len(), 3);
        assert_eq!(filter_bills(&bills, "").len(), 3);
        assert!(filter_bills(&bills, "operasi").is_empty());
    }
}
