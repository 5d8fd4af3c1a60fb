//! Core data models for the Bill Split Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod allocation_result;
mod amount;
mod bill;
mod expense;

pub use allocation_result::{
    AllocationResult, AuditStep, AuditTrace, AuditWarning, MismatchDirection, PersonBreakdown,
    ReconciliationReport, ReconciliationStatus,
};
pub use amount::RawAmount;
pub use bill::{BillAdjustments, BillSnapshot, Item, Person, Share};
pub use expense::{ExpenseItem, ExpenseParticipant, ExpensePayload};
