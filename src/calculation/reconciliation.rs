//! Reconciliation of item totals against the receipt subtotal.
//!
//! The check is recomputed from scratch on every call. Unassigned items take
//! priority: a bill with anything left unassigned is incomplete, however close
//! its totals are.

use rust_decimal::Decimal;

use crate::models::{
    AuditStep, BillSnapshot, MismatchDirection, ReconciliationReport, ReconciliationStatus,
};

use super::money::{AmountParser, AmountReader, round_to_cents};
use super::share_model::{
    PricedItem, all_items_total, assigned_item_count, assigned_total, price_items,
    unassigned_item_count, unassigned_total,
};

/// Differences smaller than one cent are rounding noise.
pub const RECONCILIATION_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// The reconciliation report together with the audit step that records it.
#[derive(Debug, Clone)]
pub struct ReconciliationResult {
    /// The reconciliation report.
    pub report: ReconciliationReport,
    /// The audit step recording this check.
    pub audit_step: AuditStep,
}

/// Returns true if two amounts agree within [`RECONCILIATION_TOLERANCE`].
pub fn within_tolerance(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() < RECONCILIATION_TOLERANCE
}

/// Classifies a bill from its unassigned item count and totals.
///
/// # Examples
///
/// ```
/// use bill_split_engine::calculation::classify;
/// use bill_split_engine::models::ReconciliationStatus;
/// use rust_decimal::Decimal;
///
/// let thirty = Decimal::new(3000, 2);
/// assert_eq!(classify(0, thirty, thirty), ReconciliationStatus::Balanced);
/// assert_eq!(classify(1, thirty, thirty), ReconciliationStatus::Incomplete);
/// assert_eq!(classify(0, thirty, Decimal::new(2999, 2)), ReconciliationStatus::Mismatched);
/// ```
pub fn classify(
    unassigned_item_count: u32,
    assigned_total: Decimal,
    receipt_subtotal: Decimal,
) -> ReconciliationStatus {
    if unassigned_item_count > 0 {
        ReconciliationStatus::Incomplete
    } else if within_tolerance(assigned_total, receipt_subtotal) {
        ReconciliationStatus::Balanced
    } else {
        ReconciliationStatus::Mismatched
    }
}

/// Reconciles priced items against the receipt subtotal.
pub fn reconcile(
    items: &[PricedItem],
    receipt_subtotal: Decimal,
    step_number: u32,
) -> ReconciliationResult {
    let receipt_subtotal = round_to_cents(receipt_subtotal);
    let assigned = assigned_total(items);
    let unassigned = unassigned_total(items);
    let all_items = all_items_total(items);
    let assigned_count = assigned_item_count(items);
    let unassigned_count = unassigned_item_count(items);

    let status = classify(unassigned_count, assigned, receipt_subtotal);

    let (difference, direction) = if status == ReconciliationStatus::Mismatched {
        let difference = assigned - receipt_subtotal;
        let direction = if difference.is_sign_positive() {
            MismatchDirection::AssignedOverReceipt
        } else {
            MismatchDirection::AssignedUnderReceipt
        };
        (Some(difference), Some(direction))
    } else {
        (None, None)
    };

    let report = ReconciliationReport {
        status,
        assigned_item_count: assigned_count,
        unassigned_item_count: unassigned_count,
        assigned_total: assigned,
        unassigned_total: unassigned,
        all_items_total: all_items,
        receipt_subtotal,
        all_items_match_receipt: within_tolerance(all_items, receipt_subtotal),
        difference,
        direction,
    };

    let reasoning = match status {
        ReconciliationStatus::Incomplete => format!(
            "{} item(s) worth ${} are not assigned to anyone",
            unassigned_count, unassigned
        ),
        ReconciliationStatus::Balanced => format!(
            "All items assigned and assigned total ${} matches receipt subtotal ${}",
            assigned, receipt_subtotal
        ),
        ReconciliationStatus::Mismatched => {
            let gap = (assigned - receipt_subtotal).abs();
            let relation = if assigned > receipt_subtotal {
                "more"
            } else {
                "less"
            };
            format!(
                "Assigned items total ${} is ${} {} than receipt subtotal ${}",
                assigned, gap, relation, receipt_subtotal
            )
        }
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "reconciliation".to_string(),
        rule_name: "Reconciliation".to_string(),
        input: serde_json::json!({
            "assigned_total": assigned.to_string(),
            "receipt_subtotal": receipt_subtotal.to_string(),
            "unassigned_item_count": unassigned_count
        }),
        output: serde_json::json!({
            "status": status.to_string(),
            "difference": difference.map(|d| d.to_string())
        }),
        reasoning,
    };

    ReconciliationResult { report, audit_step }
}

/// Reconciles a bill snapshot without allocating it.
///
/// # Examples
///
/// ```
/// use bill_split_engine::calculation::{check_reconciliation, AmountParser};
/// use bill_split_engine::models::{BillAdjustments, BillSnapshot, Item, Person, ReconciliationStatus, Share};
///
/// let snapshot = BillSnapshot::new(
///     vec![Person::new("p1")],
///     vec![
///         Item::new("item_1", "10.00", vec![Share::new("p1", "100")]),
///         Item::new("item_2", "5.00", vec![]),
///     ],
///     BillAdjustments { receipt_subtotal: "15.00".into(), ..BillAdjustments::default() },
/// );
///
/// let report = check_reconciliation(&snapshot, &AmountParser::default());
/// assert_eq!(report.status, ReconciliationStatus::Incomplete);
/// assert!(report.all_items_match_receipt);
/// ```
pub fn check_reconciliation(snapshot: &BillSnapshot, parser: &AmountParser) -> ReconciliationReport {
    let mut reader = AmountReader::new(parser);
    let items = price_items(&snapshot.items, &mut reader);
    let receipt_subtotal = reader.amount(
        "adjustments.receipt_subtotal",
        &snapshot.adjustments.receipt_subtotal,
    );
    reconcile(&items, receipt_subtotal, 1).report
}
