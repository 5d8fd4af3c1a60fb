//! Allocation strategies for bill-level adjustments.
//!
//! Tax and discount follow the money: each person carries them in proportion
//! to their share of all item prices. Tip and service charge follow the
//! people: they are split evenly between everyone who has something assigned.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::{round_to_cents, scale_or_zero};

/// How a bill-level amount is divided between people.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStrategy {
    /// In proportion to each person's subtotal over the total of all items.
    Proportional,
    /// Evenly between every person with at least one assigned item.
    EqualSplit,
}

/// A bill-level amount that has to be divided between people.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    /// Sales tax.
    Tax,
    /// A discount on the whole bill.
    Discount,
    /// Gratuity.
    Tip,
    /// A service charge added by the venue.
    ServiceCharge,
}

impl AdjustmentKind {
    /// Every adjustment kind, in the order they are applied.
    pub const ALL: [AdjustmentKind; 4] = [
        AdjustmentKind::Tax,
        AdjustmentKind::Discount,
        AdjustmentKind::Tip,
        AdjustmentKind::ServiceCharge,
    ];

    /// The strategy used to divide this kind of adjustment.
    pub fn strategy(self) -> AllocationStrategy {
        match self {
            AdjustmentKind::Tax | AdjustmentKind::Discount => AllocationStrategy::Proportional,
            AdjustmentKind::Tip | AdjustmentKind::ServiceCharge => AllocationStrategy::EqualSplit,
        }
    }

    /// Key under which this share is recorded in audit steps.
    pub fn rule_id(self) -> &'static str {
        match self {
            AdjustmentKind::Tax => "tax_share",
            AdjustmentKind::Discount => "discount_share",
            AdjustmentKind::Tip => "tip_share",
            AdjustmentKind::ServiceCharge => "service_charge_share",
        }
    }
}

/// Bill-wide figures a strategy needs besides the person's own numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationBasis {
    /// Sum of all item prices, assigned or not.
    pub all_items_total: Decimal,
    /// Number of people with at least one assigned item.
    pub active_people: u32,
}

impl AllocationStrategy {
    /// Works out one person's part of `amount`, rounded to the cent.
    ///
    /// Both strategies return zero instead of dividing by zero: proportional
    /// when there are no item prices, equal-split when nobody is active.
    ///
    /// # Examples
    ///
    /// ```
    /// use bill_split_engine::calculation::{AllocationBasis, AllocationStrategy};
    /// use rust_decimal::Decimal;
    ///
    /// let basis = AllocationBasis { all_items_total: Decimal::new(4000, 2), active_people: 2 };
    ///
    /// // $10 of $40 in items carries a quarter of $4.00 tax.
    /// let tax = AllocationStrategy::Proportional.share(Decimal::new(400, 2), Decimal::new(1000, 2), true, basis);
    /// assert_eq!(tax, Decimal::new(100, 2));
    ///
    /// // A $9.00 tip is split evenly between the two active people.
    /// let tip = AllocationStrategy::EqualSplit.share(Decimal::new(900, 2), Decimal::new(1000, 2), true, basis);
    /// assert_eq!(tip, Decimal::new(450, 2));
    /// ```
    pub fn share(
        self,
        amount: Decimal,
        person_subtotal: Decimal,
        person_is_active: bool,
        basis: AllocationBasis,
    ) -> Decimal {
        let share = match self {
            AllocationStrategy::Proportional => {
                scale_or_zero(person_subtotal, amount, basis.all_items_total)
            }
            AllocationStrategy::EqualSplit => {
                if !person_is_active || basis.active_people == 0 {
                    Decimal::ZERO
                } else {
                    amount / Decimal::from(basis.active_people)
                }
            }
        };
        round_to_cents(share)
    }
}
