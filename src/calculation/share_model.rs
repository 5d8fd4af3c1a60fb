//! Item-level queries over a bill.
//!
//! Items are first read into [`PricedItem`]s, with every price and share
//! percentage parsed once. The aggregate queries then run over the priced
//! items without touching raw input again.

use rust_decimal::Decimal;

use crate::models::{AuditStep, Item};

use super::money::{AmountReader, round_to_cents, sum_or_zero};

/// A share with its percentage parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedShare {
    /// The person holding the share.
    pub person_id: String,
    /// The parsed percentage, zero if it was malformed.
    pub percentage: Decimal,
}

/// An item with its price and shares parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedItem {
    /// The item id.
    pub id: String,
    /// The parsed price, zero if it was malformed.
    pub price: Decimal,
    /// The parsed shares.
    pub shares: Vec<PricedShare>,
}

impl PricedItem {
    /// Returns true if nobody holds a share of this item.
    ///
    /// A share whose percentage was malformed still counts as a share, the
    /// same as it would in the raw item.
    pub fn is_unassigned(&self) -> bool {
        self.shares.is_empty()
    }

    /// Returns the percentage the person holds, if they hold a share at all.
    pub fn share_of(&self, person_id: &str) -> Option<Decimal> {
        self.shares
            .iter()
            .find(|share| share.person_id == person_id)
            .map(|share| share.percentage)
    }
}

/// Parses every item's price and shares.
///
/// Malformed values are coerced to zero and recorded by the reader.
pub fn price_items(items: &[Item], reader: &mut AmountReader<'_>) -> Vec<PricedItem> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let price = reader.amount(&format!("items[{}].price", index), &item.price);
            let shares = item
                .shares
                .iter()
                .enumerate()
                .map(|(share_index, share)| PricedShare {
                    person_id: share.person_id.clone(),
                    percentage: reader.percentage(
                        &format!("items[{}].shares[{}].percentage", index, share_index),
                        &share.percentage,
                    ),
                })
                .collect();

            PricedItem {
                id: item.id.clone(),
                price,
                shares,
            }
        })
        .collect()
}

/// Sum of every item's price, rounded to the cent.
pub fn all_items_total(items: &[PricedItem]) -> Decimal {
    round_to_cents(sum_or_zero(items.iter().map(|item| item.price)))
}

/// Sum of prices of items with at least one share, rounded to the cent.
pub fn assigned_total(items: &[PricedItem]) -> Decimal {
    round_to_cents(sum_or_zero(
        items
            .iter()
            .filter(|item| !item.is_unassigned())
            .map(|item| item.price),
    ))
}

/// `all_items_total - assigned_total`.
pub fn unassigned_total(items: &[PricedItem]) -> Decimal {
    all_items_total(items) - assigned_total(items)
}

/// Items that nobody holds a share of.
pub fn unassigned_items(items: &[PricedItem]) -> Vec<&PricedItem> {
    items.iter().filter(|item| item.is_unassigned()).collect()
}

/// Number of items with at least one share.
pub fn assigned_item_count(items: &[PricedItem]) -> u32 {
    items.iter().filter(|item| !item.is_unassigned()).count() as u32
}

/// Number of items with no shares.
pub fn unassigned_item_count(items: &[PricedItem]) -> u32 {
    items.iter().filter(|item| item.is_unassigned()).count() as u32
}

/// The three item totals computed together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemTotals {
    /// Sum of every item's price.
    pub all_items_total: Decimal,
    /// Sum of prices of assigned items.
    pub assigned_total: Decimal,
    /// Sum of prices of unassigned items.
    pub unassigned_total: Decimal,
}

/// The item totals together with the audit step that records them.
#[derive(Debug, Clone)]
pub struct ItemTotalsResult {
    /// The computed totals.
    pub totals: ItemTotals,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes the item totals for a bill.
///
/// # Examples
///
/// ```
/// use bill_split_engine::calculation::{summarize_items, PricedItem, PricedShare};
/// use rust_decimal::Decimal;
///
/// let items = vec![
///     PricedItem {
///         id: "item_1".to_string(),
///         price: Decimal::new(1000, 2),
///         shares: vec![PricedShare { person_id: "p1".to_string(), percentage: Decimal::ONE_HUNDRED }],
///     },
///     PricedItem { id: "item_2".to_string(), price: Decimal::new(500, 2), shares: vec![] },
/// ];
///
/// let result = summarize_items(&items, 1);
/// assert_eq!(result.totals.all_items_total, Decimal::new(1500, 2));
/// assert_eq!(result.totals.unassigned_total, Decimal::new(500, 2));
/// ```
pub fn summarize_items(items: &[PricedItem], step_number: u32) -> ItemTotalsResult {
    let totals = ItemTotals {
        all_items_total: all_items_total(items),
        assigned_total: assigned_total(items),
        unassigned_total: unassigned_total(items),
    };
    let assigned_count = assigned_item_count(items);
    let unassigned_count = unassigned_item_count(items);

    let audit_step = AuditStep {
        step_number,
        rule_id: "item_totals".to_string(),
        rule_name: "Item Totals".to_string(),
        input: serde_json::json!({
            "item_count": items.len(),
            "assigned_item_count": assigned_count,
            "unassigned_item_count": unassigned_count
        }),
        output: serde_json::json!({
            "all_items_total": totals.all_items_total.to_string(),
            "assigned_total": totals.assigned_total.to_string(),
            "unassigned_total": totals.unassigned_total.to_string()
        }),
        reasoning: format!(
            "{} items totalling ${}: {} assigned (${}), {} unassigned (${})",
            items.len(),
            totals.all_items_total,
            assigned_count,
            totals.assigned_total,
            unassigned_count,
            totals.unassigned_total
        ),
    };

    ItemTotalsResult { totals, audit_step }
}
