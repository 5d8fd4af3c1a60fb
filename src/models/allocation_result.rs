//! Allocation result models for the Bill Split Engine.
//!
//! This module contains the [`AllocationResult`] type and its associated structures
//! that capture all outputs of splitting a bill: per-person breakdowns, item totals,
//! the reconciliation verdict, and an audit trace of every calculation step.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One person's share of the bill.
///
/// # Example
///
/// ```
/// use bill_split_engine::models::PersonBreakdown;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let breakdown = PersonBreakdown {
///     person_id: "p1".to_string(),
///     item_count: 2,
///     subtotal: Decimal::from_str("20.00").unwrap(),
///     tax_share: Decimal::from_str("1.60").unwrap(),
///     discount_share: Decimal::ZERO,
///     tip_share: Decimal::from_str("3.00").unwrap(),
///     service_charge_share: Decimal::ZERO,
///     total: Decimal::from_str("24.60").unwrap(),
/// };
/// assert!(breakdown.is_active());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonBreakdown {
    /// The person this breakdown belongs to.
    pub person_id: String,
    /// Number of items in which the person holds a non-zero share.
    pub item_count: u32,
    /// The person's share of item prices.
    pub subtotal: Decimal,
    /// The person's proportional share of tax.
    pub tax_share: Decimal,
    /// The person's proportional share of the discount.
    pub discount_share: Decimal,
    /// The person's equal share of the tip.
    pub tip_share: Decimal,
    /// The person's equal share of the service charge.
    pub service_charge_share: Decimal,
    /// What the person owes in total.
    pub total: Decimal,
}

impl PersonBreakdown {
    /// Returns true if the person has at least one item assigned.
    pub fn is_active(&self) -> bool {
        self.item_count > 0
    }
}

/// Classification of the bill's assignment state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconciliationStatus {
    /// At least one item has no shares.
    Incomplete,
    /// Every item is assigned and the assigned total matches the receipt subtotal.
    Balanced,
    /// Every item is assigned but the assigned total differs from the receipt subtotal.
    Mismatched,
}

impl fmt::Display for ReconciliationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ReconciliationStatus::Incomplete => "incomplete",
            ReconciliationStatus::Balanced => "balanced",
            ReconciliationStatus::Mismatched => "mismatched",
        };
        f.write_str(text)
    }
}

/// Which way a mismatched bill is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchDirection {
    /// Assigned items add up to more than the receipt subtotal.
    AssignedOverReceipt,
    /// Assigned items add up to less than the receipt subtotal.
    AssignedUnderReceipt,
}

/// The outcome of comparing item totals with the receipt subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    /// The overall classification.
    pub status: ReconciliationStatus,
    /// Number of items with at least one share.
    pub assigned_item_count: u32,
    /// Number of items with no shares.
    pub unassigned_item_count: u32,
    /// Sum of prices of assigned items.
    pub assigned_total: Decimal,
    /// Sum of prices of unassigned items.
    pub unassigned_total: Decimal,
    /// Sum of all item prices.
    pub all_items_total: Decimal,
    /// The subtotal printed on the receipt.
    pub receipt_subtotal: Decimal,
    /// Whether all items, assigned or not, add up to the receipt subtotal.
    pub all_items_match_receipt: bool,
    /// `assigned_total - receipt_subtotal`, present only when mismatched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difference: Option<Decimal>,
    /// Direction of the mismatch, present only when mismatched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<MismatchDirection>,
}

impl ReconciliationReport {
    /// Returns true if the bill is ready to be turned into an expense.
    pub fn is_balanced(&self) -> bool {
        self.status == ReconciliationStatus::Balanced
    }
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings flag input that was recovered from rather than rejected, such as a
/// price that could not be read and was counted as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for an allocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

/// The complete result of splitting a bill.
///
/// The result is derived entirely from the snapshot it was computed from and
/// is never stored, so computing it twice from the same snapshot yields equal
/// values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationResult {
    /// One breakdown per person on the bill, in input order.
    pub people: Vec<PersonBreakdown>,
    /// Sum of prices of assigned items.
    pub assigned_total: Decimal,
    /// Sum of prices of unassigned items.
    pub unassigned_total: Decimal,
    /// Sum of all item prices.
    pub all_items_total: Decimal,
    /// The person who paid, carried through from the adjustments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer_id: Option<String>,
    /// Reconciliation of item totals against the receipt.
    pub reconciliation: ReconciliationReport,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

impl AllocationResult {
    /// Returns the breakdown for a person, if they are on the bill.
    pub fn breakdown(&self, person_id: &str) -> Option<&PersonBreakdown> {
        self.people.iter().find(|b| b.person_id == person_id)
    }

    /// Returns the breakdowns worth showing: people with at least one item.
    pub fn rendered_breakdowns(&self) -> impl Iterator<Item = &PersonBreakdown> {
        self.people.iter().filter(|b| b.is_active())
    }

    /// Sum of every person's total.
    pub fn people_total(&self) -> Decimal {
        self.people.iter().map(|b| b.total).sum()
    }
}
