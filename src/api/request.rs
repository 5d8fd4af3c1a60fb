//! Request types for the Bill Split Engine API.
//!
//! This module defines the JSON request structures for the `/allocate`,
//! `/recalculate` and `/expense-payload` endpoints.

use serde::{Deserialize, Serialize};

use crate::models::{BillAdjustments, BillSnapshot, Item, Person};

/// Request body for the `/allocate` and `/expense-payload` endpoints.
///
/// Carries the full bill: who is splitting it, the items and their shares,
/// and the bill-level adjustments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationRequest {
    /// People splitting the bill.
    pub people: Vec<Person>,
    /// Items on the receipt.
    pub items: Vec<Item>,
    /// Bill-level adjustments.
    #[serde(default)]
    pub adjustments: BillAdjustments,
    /// Path of the stored receipt image, used only when building an expense.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_path: Option<String>,
}

impl From<AllocationRequest> for BillSnapshot {
    fn from(req: AllocationRequest) -> Self {
        BillSnapshot {
            people: req.people,
            items: req.items,
            adjustments: req.adjustments,
        }
    }
}
