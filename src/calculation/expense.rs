//! Packaging a balanced bill as an expense.
//!
//! The engine does not submit anything itself. It only builds the payload the
//! submission service receives, and refuses to do so for a bill that has not
//! been reconciled.

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AllocationResult, BillSnapshot, ExpenseItem, ExpenseParticipant, ExpensePayload,
};

use super::money::{AmountParser, AmountReader, round_to_cents, sum_or_zero};
use super::share_model::price_items;

/// Builds the expense payload for a balanced bill.
///
/// Only people with at least one item become participants, and the payload
/// total is the sum of their totals.
///
/// # Errors
///
/// Returns [`EngineError::NotReconciled`] unless the allocation's
/// reconciliation status is balanced.
pub fn build_expense_payload(
    snapshot: &BillSnapshot,
    allocation: &AllocationResult,
    receipt_path: Option<&str>,
    parser: &AmountParser,
) -> EngineResult<ExpensePayload> {
    if !allocation.reconciliation.is_balanced() {
        return Err(EngineError::NotReconciled {
            status: allocation.reconciliation.status,
        });
    }

    let mut reader = AmountReader::new(parser);
    let priced = price_items(&snapshot.items, &mut reader);
    let adjustments = &snapshot.adjustments;
    let tax_rate = reader.amount("adjustments.tax_rate", &adjustments.tax_rate);
    let tax_amount = reader.amount("adjustments.tax_amount", &adjustments.tax_amount);
    let discount = reader.amount("adjustments.discount", &adjustments.discount);
    let tip = reader.amount("adjustments.tip", &adjustments.tip);
    let service_charge = reader.amount("adjustments.service_charge", &adjustments.service_charge);

    let items = snapshot
        .items
        .iter()
        .zip(&priced)
        .map(|(item, priced)| ExpenseItem {
            id: item.id.clone(),
            name: item.name.clone(),
            price: round_to_cents(priced.price),
            shares: item.shares.clone(),
        })
        .collect();

    let participants: Vec<ExpenseParticipant> = allocation
        .rendered_breakdowns()
        .map(|breakdown| ExpenseParticipant {
            person_id: breakdown.person_id.clone(),
            name: snapshot
                .person(&breakdown.person_id)
                .map(|person| person.name.clone())
                .unwrap_or_default(),
            subtotal: breakdown.subtotal,
            tax_share: breakdown.tax_share,
            discount_share: breakdown.discount_share,
            tip_share: breakdown.tip_share,
            service_charge_share: breakdown.service_charge_share,
            total: breakdown.total,
        })
        .collect();

    let total = sum_or_zero(participants.iter().map(|p| p.total));

    Ok(ExpensePayload {
        receipt_path: receipt_path.unwrap_or_default().to_string(),
        payer_id: adjustments.payer_id.clone(),
        subtotal: allocation.reconciliation.receipt_subtotal,
        tax_rate,
        tax_amount: round_to_cents(tax_amount),
        discount: round_to_cents(discount),
        tip: round_to_cents(tip),
        service_charge: round_to_cents(service_charge),
        total: round_to_cents(total),
        items,
        participants,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::allocate;
    use crate::models::{BillAdjustments, Item, Person, ReconciliationStatus, Share};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn snapshot(receipt_subtotal: &str, second_item_shares: Vec<Share>) -> BillSnapshot {
        BillSnapshot::new(
            vec![
                Person {
                    id: "p1".to_string(),
                    name: "Alice".to_string(),
                    color: "#f00".to_string(),
                },
                Person::new("p2"),
                Person::new("p3"),
            ],
            vec![
                Item::new("item_1", "$10.00", vec![Share::new("p1", "100")]),
                Item::new("item_2", "20.00", second_item_shares),
            ],
            BillAdjustments {
                tax_rate: "0.1".into(),
                tax_amount: "3.00".into(),
                tip: "6.00".into(),
                receipt_subtotal: receipt_subtotal.into(),
                payer_id: Some("p1".to_string()),
                ..BillAdjustments::default()
            },
        )
    }

    #[test]
    fn test_balanced_bill_builds_payload() {
        let parser = AmountParser::default();
        let bill = snapshot("30.00", vec![Share::new("p2", "100")]);
        let allocation = allocate(&bill, &parser);

        let payload = build_expense_payload(&bill, &allocation, None, &parser).unwrap();

        assert_eq!(payload.receipt_path, "");
        assert_eq!(payload.payer_id.as_deref(), Some("p1"));
        assert_eq!(payload.subtotal, dec("30.00"));
        assert_eq!(payload.items[0].price, dec("10.00"));
        assert_eq!(payload.participants.len(), 2);
        assert_eq!(payload.participants[0].name, "Alice");
        // 10 + 1 tax + 3 tip, 20 + 2 tax + 3 tip
        assert_eq!(payload.participants[0].total, dec("14.00"));
        assert_eq!(payload.participants[1].total, dec("25.00"));
        assert_eq!(payload.total, dec("39.00"));
    }

    #[test]
    fn test_payload_total_is_sum_of_participants() {
        let parser = AmountParser::default();
        let bill = snapshot(
            "30.00",
            vec![Share::new("p2", "50"), Share::new("p3", "50")],
        );
        let allocation = allocate(&bill, &parser);

        let payload =
            build_expense_payload(&bill, &allocation, Some("receipts/abc.jpg"), &parser).unwrap();

        let sum: Decimal = payload.participants.iter().map(|p| p.total).sum();
        assert_eq!(payload.total, sum);
        assert_eq!(payload.receipt_path, "receipts/abc.jpg");
    }

    #[test]
    fn test_incomplete_bill_is_refused() {
        let parser = AmountParser::default();
        let bill = snapshot("30.00", vec![]);
        let allocation = allocate(&bill, &parser);

        match build_expense_payload(&bill, &allocation, None, &parser) {
            Err(EngineError::NotReconciled { status }) => {
                assert_eq!(status, ReconciliationStatus::Incomplete)
            }
            other => panic!("Expected NotReconciled error, got {:?}", other),
        }
    }

    #[test]
    fn test_mismatched_bill_is_refused() {
        let parser = AmountParser::default();
        let bill = snapshot("31.00", vec![Share::new("p2", "100")]);
        let allocation = allocate(&bill, &parser);

        assert!(matches!(
            build_expense_payload(&bill, &allocation, None, &parser),
            Err(EngineError::NotReconciled {
                status: ReconciliationStatus::Mismatched
            })
        ));
    }
}
