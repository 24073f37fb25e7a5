//! Change owed back to a paying patient.

use simrs_core::Money;

/// `max(0, payment_amount - amount_due)`.
pub fn compute_change(amount_due: Money, payment_amount: Money) -> Money {
    payment_amount.saturating_sub(amount_due).round_cents()
}

/// [`compute_change`] over raw form fields; malformed amounts count as zero.
pub fn compute_change_str(amount_due: &str, payment_amount: &str) -> Money {
    compute_change(
        Money::parse_lenient(amount_due),
        Money::parse_lenient(payment_amount),
    )
}
