//! Per-person allocation of a bill.
//!
//! [`allocate`] turns a [`BillSnapshot`] into an [`AllocationResult`]: each
//! person's subtotal, their share of every bill-level adjustment, their total,
//! and the reconciliation verdict for the bill as a whole.

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{
    AllocationResult, AuditStep, AuditTrace, BillAdjustments, BillSnapshot, PersonBreakdown,
};

use super::money::{AmountParser, AmountReader, round_to_cents, scale_or_zero, sum_or_zero};
use super::reconciliation::reconcile;
use super::share_model::{PricedItem, price_items, summarize_items};
use super::strategy::{AdjustmentKind, AllocationBasis};

/// Bill-level amounts after parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjustmentAmounts {
    /// Tax amount.
    pub tax_amount: Decimal,
    /// Discount amount.
    pub discount: Decimal,
    /// Tip amount.
    pub tip: Decimal,
    /// Service charge amount.
    pub service_charge: Decimal,
    /// Receipt subtotal.
    pub receipt_subtotal: Decimal,
}

impl AdjustmentAmounts {
    /// Parses the adjustment amounts, coercing malformed ones to zero.
    pub fn read(adjustments: &BillAdjustments, reader: &mut AmountReader<'_>) -> Self {
        Self {
            tax_amount: reader.amount("adjustments.tax_amount", &adjustments.tax_amount),
            discount: reader.amount("adjustments.discount", &adjustments.discount),
            tip: reader.amount("adjustments.tip", &adjustments.tip),
            service_charge: reader
                .amount("adjustments.service_charge", &adjustments.service_charge),
            receipt_subtotal: reader
                .amount("adjustments.receipt_subtotal", &adjustments.receipt_subtotal),
        }
    }

    /// The amount for one kind of adjustment.
    pub fn get(&self, kind: AdjustmentKind) -> Decimal {
        match kind {
            AdjustmentKind::Tax => self.tax_amount,
            AdjustmentKind::Discount => self.discount,
            AdjustmentKind::Tip => self.tip,
            AdjustmentKind::ServiceCharge => self.service_charge,
        }
    }
}

/// A person's subtotal: the sum of `price * percentage / 100` over every item
/// they hold a share of, rounded once after the full sum.
pub fn person_subtotal(items: &[PricedItem], person_id: &str) -> Decimal {
    let raw = sum_or_zero(items.iter().filter_map(|item| {
        item.share_of(person_id)
            .map(|percentage| scale_or_zero(item.price, percentage, Decimal::ONE_HUNDRED))
    }));
    round_to_cents(raw)
}

/// Number of items in which the person holds a non-zero share.
pub fn person_item_count(items: &[PricedItem], person_id: &str) -> u32 {
    items
        .iter()
        .filter(|item| item.share_of(person_id).is_some_and(|pct| !pct.is_zero()))
        .count() as u32
}

/// Splits a bill between the people on it.
///
/// Malformed numbers never cause a failure: each one counts as zero for that
/// field only and is listed in the result's audit warnings.
///
/// # Examples
///
/// ```
/// use bill_split_engine::calculation::{allocate, AmountParser};
/// use bill_split_engine::models::{BillAdjustments, BillSnapshot, Item, Person, Share};
/// use rust_decimal::Decimal;
///
/// let snapshot = BillSnapshot::new(
///     vec![Person::new("p1"), Person::new("p2")],
///     vec![Item::new("item_1", "10.00", vec![Share::new("p1", "50"), Share::new("p2", "50")])],
///     BillAdjustments {
///         tax_amount: "1.00".into(),
///         receipt_subtotal: "10.00".into(),
///         ..BillAdjustments::default()
///     },
/// );
///
/// let result = allocate(&snapshot, &AmountParser::default());
/// let p1 = result.breakdown("p1").unwrap();
/// assert_eq!(p1.subtotal, Decimal::new(500, 2));
/// assert_eq!(p1.tax_share, Decimal::new(50, 2));
/// assert_eq!(p1.total, Decimal::new(550, 2));
/// ```
pub fn allocate(snapshot: &BillSnapshot, parser: &AmountParser) -> AllocationResult {
    let mut reader = AmountReader::new(parser);
    let items = price_items(&snapshot.items, &mut reader);
    let amounts = AdjustmentAmounts::read(&snapshot.adjustments, &mut reader);

    let mut steps: Vec<AuditStep> = Vec::new();
    let mut step_number: u32 = 1;

    let item_totals = summarize_items(&items, step_number);
    let totals = item_totals.totals;
    steps.push(item_totals.audit_step);
    step_number += 1;

    let subtotals: Vec<(Decimal, u32)> = snapshot
        .people
        .iter()
        .map(|person| {
            (
                person_subtotal(&items, &person.id),
                person_item_count(&items, &person.id),
            )
        })
        .collect();

    let basis = AllocationBasis {
        all_items_total: totals.all_items_total,
        active_people: subtotals.iter().filter(|(_, count)| *count > 0).count() as u32,
    };

    let mut people = Vec::with_capacity(snapshot.people.len());
    for (person, (subtotal, item_count)) in snapshot.people.iter().zip(subtotals) {
        let is_active = item_count > 0;
        let [tax_share, discount_share, tip_share, service_charge_share] =
            AdjustmentKind::ALL.map(|kind| {
                kind.strategy()
                    .share(amounts.get(kind), subtotal, is_active, basis)
            });
        let total = round_to_cents(sum_or_zero([
            subtotal,
            tax_share,
            -discount_share,
            tip_share,
            service_charge_share,
        ]));

        let breakdown = PersonBreakdown {
            person_id: person.id.clone(),
            item_count,
            subtotal,
            tax_share,
            discount_share,
            tip_share,
            service_charge_share,
            total,
        };
        steps.push(person_audit_step(&breakdown, basis, step_number));
        step_number += 1;
        people.push(breakdown);
    }

    let reconciliation = reconcile(&items, amounts.receipt_subtotal, step_number);
    steps.push(reconciliation.audit_step);

    let warnings = reader.into_warnings();
    debug!(
        people = people.len(),
        items = items.len(),
        active_people = basis.active_people,
        status = %reconciliation.report.status,
        malformed_fields = warnings.len(),
        "Allocated bill"
    );

    AllocationResult {
        people,
        assigned_total: totals.assigned_total,
        unassigned_total: totals.unassigned_total,
        all_items_total: totals.all_items_total,
        payer_id: snapshot.adjustments.payer_id.clone(),
        reconciliation: reconciliation.report,
        audit_trace: AuditTrace { steps, warnings },
    }
}

fn person_audit_step(breakdown: &PersonBreakdown, basis: AllocationBasis, step_number: u32) -> AuditStep {
    let reasoning = if breakdown.is_active() {
        format!(
            "${} subtotal + ${} tax - ${} discount + ${} tip + ${} service charge = ${}",
            breakdown.subtotal,
            breakdown.tax_share,
            breakdown.discount_share,
            breakdown.tip_share,
            breakdown.service_charge_share,
            breakdown.total
        )
    } else {
        format!(
            "{} has no items assigned - no share of tip or service charge",
            breakdown.person_id
        )
    };

    let mut output = serde_json::Map::new();
    output.insert("subtotal".to_string(), breakdown.subtotal.to_string().into());
    for kind in AdjustmentKind::ALL {
        output.insert(
            kind.rule_id().to_string(),
            adjustment_share(breakdown, kind).to_string().into(),
        );
    }
    output.insert("total".to_string(), breakdown.total.to_string().into());

    AuditStep {
        step_number,
        rule_id: "person_allocation".to_string(),
        rule_name: "Person Allocation".to_string(),
        input: serde_json::json!({
            "person_id": breakdown.person_id,
            "item_count": breakdown.item_count,
            "all_items_total": basis.all_items_total.to_string(),
            "active_people": basis.active_people
        }),
        output: serde_json::Value::Object(output),
        reasoning,
    }
}

fn adjustment_share(breakdown: &PersonBreakdown, kind: AdjustmentKind) -> Decimal {
    match kind {
        AdjustmentKind::Tax => breakdown.tax_share,
        AdjustmentKind::Discount => breakdown.discount_share,
        AdjustmentKind::Tip => breakdown.tip_share,
        AdjustmentKind::ServiceCharge => breakdown.service_charge_share,
    }
}
