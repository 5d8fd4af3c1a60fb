//! Bill Split Engine
//!
//! This crate splits a shared receipt between people. Items are owned through
//! percentage shares; tax and discount are spread in proportion to what each
//! person ordered, while tip and service charge are split evenly among the
//! people who ordered something. The assigned items are reconciled against the
//! receipt subtotal, and a balanced bill can be packaged as an expense.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
