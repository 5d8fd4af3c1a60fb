//! Recalculation of bill-level totals.
//!
//! When someone edits the subtotal, tax rate, discount, tip or service charge
//! directly, the tax amount and grand total are derived again from the edited
//! numbers so the bill stays internally consistent.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AuditWarning, BillAdjustments, BillSnapshot, RawAmount};

use super::money::{AmountParser, AmountReader, round_to_cents, scale_or_zero, sum_or_zero};
use super::share_model::{assigned_total, price_items};

/// Bill-level fields as edited by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecalculationInput {
    /// The receipt subtotal.
    pub subtotal: RawAmount,
    /// Tax rate as a fraction (0.08 for 8%).
    #[serde(default)]
    pub tax_rate: RawAmount,
    /// Discount amount.
    #[serde(default)]
    pub discount: RawAmount,
    /// Tip amount.
    #[serde(default)]
    pub tip: RawAmount,
    /// Service charge amount.
    #[serde(default)]
    pub service_charge: RawAmount,
}

/// Bill-level totals derived from a [`RecalculationInput`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecalculatedTotals {
    /// The subtotal, rounded to the cent.
    pub subtotal: Decimal,
    /// The tax rate as entered.
    pub tax_rate: Decimal,
    /// `subtotal * tax_rate`, rounded to the cent.
    pub tax_amount: Decimal,
    /// The discount, rounded to the cent.
    pub discount: Decimal,
    /// The tip, rounded to the cent.
    pub tip: Decimal,
    /// The service charge, rounded to the cent.
    pub service_charge: Decimal,
    /// `subtotal + tax_amount - discount + tip + service_charge`.
    pub total: Decimal,
    /// Fields that could not be read and were counted as zero.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<AuditWarning>,
}

impl RecalculatedTotals {
    /// Returns new adjustments carrying these totals.
    ///
    /// The payer is kept from `current`; everything else comes from the
    /// recalculation.
    pub fn apply_to(&self, current: &BillAdjustments) -> BillAdjustments {
        BillAdjustments {
            tax_rate: RawAmount::new(self.tax_rate.normalize().to_string()),
            tax_amount: RawAmount::new(self.tax_amount.to_string()),
            discount: RawAmount::new(self.discount.to_string()),
            tip: RawAmount::new(self.tip.to_string()),
            service_charge: RawAmount::new(self.service_charge.to_string()),
            receipt_subtotal: RawAmount::new(self.subtotal.to_string()),
            payer_id: current.payer_id.clone(),
        }
    }
}

/// Derives the tax amount and grand total from edited bill-level fields.
///
/// # Examples
///
/// ```
/// use bill_split_engine::calculation::{recalculate_totals, AmountParser, RecalculationInput};
/// use rust_decimal::Decimal;
///
/// let input = RecalculationInput {
///     subtotal: "100.00".into(),
///     tax_rate: "0.08".into(),
///     discount: "10.00".into(),
///     tip: "5.00".into(),
///     service_charge: "2.00".into(),
/// };
///
/// let totals = recalculate_totals(&input, &AmountParser::default());
/// assert_eq!(totals.tax_amount, Decimal::new(800, 2));
/// assert_eq!(totals.total, Decimal::new(10500, 2));
/// ```
pub fn recalculate_totals(input: &RecalculationInput, parser: &AmountParser) -> RecalculatedTotals {
    let mut reader = AmountReader::new(parser);
    let subtotal = round_to_cents(reader.amount("subtotal", &input.subtotal));
    let tax_rate = reader.amount("tax_rate", &input.tax_rate);
    let discount = round_to_cents(reader.amount("discount", &input.discount));
    let tip = round_to_cents(reader.amount("tip", &input.tip));
    let service_charge = round_to_cents(reader.amount("service_charge", &input.service_charge));

    let tax_amount = round_to_cents(scale_or_zero(subtotal, tax_rate, Decimal::ONE));
    let total = round_to_cents(sum_or_zero([
        subtotal,
        tax_amount,
        -discount,
        tip,
        service_charge,
    ]));

    RecalculatedTotals {
        subtotal,
        tax_rate,
        tax_amount,
        discount,
        tip,
        service_charge,
        total,
        warnings: reader.into_warnings(),
    }
}

/// Returns adjustments whose receipt subtotal equals the current assigned total.
///
/// Used when the user accepts the item prices as correct and wants the
/// receipt subtotal brought in line with them.
pub fn sync_receipt_subtotal(snapshot: &BillSnapshot, parser: &AmountParser) -> BillAdjustments {
    let mut reader = AmountReader::new(parser);
    let items = price_items(&snapshot.items, &mut reader);

    BillAdjustments {
        receipt_subtotal: RawAmount::new(assigned_total(&items).to_string()),
        ..snapshot.adjustments.clone()
    }
}
