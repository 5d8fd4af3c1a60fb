//! Expense payload handed to the external submission service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Share;

/// An item as it appears in a submitted expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseItem {
    /// The item id.
    pub id: String,
    /// The item name.
    pub name: String,
    /// The item price after parsing.
    pub price: Decimal,
    /// Who owns the item and how much of it.
    pub shares: Vec<Share>,
}

/// One participant's part of a submitted expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseParticipant {
    /// The person id.
    pub person_id: String,
    /// The person's display name.
    pub name: String,
    /// Share of item prices.
    pub subtotal: Decimal,
    /// Share of tax.
    pub tax_share: Decimal,
    /// Share of discount.
    pub discount_share: Decimal,
    /// Share of tip.
    pub tip_share: Decimal,
    /// Share of service charge.
    pub service_charge_share: Decimal,
    /// Amount owed.
    pub total: Decimal,
}

/// A balanced bill packaged for submission.
///
/// `total` is always the sum of the participants' totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpensePayload {
    /// Path of the stored receipt image, empty when there is none.
    pub receipt_path: String,
    /// The person who paid.
    pub payer_id: Option<String>,
    /// The receipt subtotal.
    pub subtotal: Decimal,
    /// Tax rate as a fraction.
    pub tax_rate: Decimal,
    /// Tax amount.
    pub tax_amount: Decimal,
    /// Discount amount.
    pub discount: Decimal,
    /// Tip amount.
    pub tip: Decimal,
    /// Service charge amount.
    pub service_charge: Decimal,
    /// Sum of participant totals.
    pub total: Decimal,
    /// Items on the receipt.
    pub items: Vec<ExpenseItem>,
    /// People who owe part of the bill.
    pub participants: Vec<ExpenseParticipant>,
}
