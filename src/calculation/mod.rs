//! Calculation logic for the Bill Split Engine.
//!
//! This module contains all the calculation functions for splitting a bill:
//! parsing and rounding amounts, item totals, the proportional and equal-split
//! allocation strategies, the per-person allocator, reconciliation against the
//! receipt subtotal, recalculation of bill-level totals, and packaging a
//! balanced bill as an expense.

mod allocator;
mod expense;
mod money;
mod recalculator;
mod reconciliation;
mod share_model;
mod strategy;

pub use allocator::{AdjustmentAmounts, allocate, person_item_count, person_subtotal};
pub use expense::build_expense_payload;
pub use money::{
    AmountParser, AmountReader, MALFORMED_AMOUNT_CODE, MAX_AMOUNT, MAX_SHARE_PERCENTAGE,
    ParsedAmount, round_to_cents, scale_or_zero, sum_or_zero,
};
pub use recalculator::{
    RecalculatedTotals, RecalculationInput, recalculate_totals, sync_receipt_subtotal,
};
pub use reconciliation::{
    RECONCILIATION_TOLERANCE, ReconciliationResult, check_reconciliation, classify, reconcile,
    within_tolerance,
};
pub use share_model::{
    ItemTotals, ItemTotalsResult, PricedItem, PricedShare, all_items_total, assigned_item_count,
    assigned_total, price_items, summarize_items, unassigned_item_count, unassigned_items,
    unassigned_total,
};
pub use strategy::{AdjustmentKind, AllocationBasis, AllocationStrategy};
