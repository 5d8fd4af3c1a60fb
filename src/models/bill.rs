//! Bill snapshot models.
//!
//! This module defines the people, items, shares and bill-level adjustments
//! that make up a single receipt being split.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::RawAmount;

/// A person taking part in the bill.
///
/// Only `id` matters to the engine; `name` and `color` are carried through
/// for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Unique identifier for the person within the bill.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Display color.
    #[serde(default)]
    pub color: String,
}

impl Person {
    /// Creates a person with only an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            color: String::new(),
        }
    }
}

/// Fractional ownership of an item by one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    /// The person holding the share.
    pub person_id: String,
    /// Percentage of the item owned, expected in `[0, 100]`.
    pub percentage: RawAmount,
}

impl Share {
    /// Creates a share from a person id and a percentage.
    pub fn new(person_id: impl Into<String>, percentage: impl Into<RawAmount>) -> Self {
        Self {
            person_id: person_id.into(),
            percentage: percentage.into(),
        }
    }
}

/// A line item on the receipt.
///
/// An item with no shares is unassigned. Share percentages are not required
/// to add up to 100; partial and over-assignment are valid states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier for the item within the bill.
    pub id: String,
    /// Display name as printed on the receipt.
    #[serde(default)]
    pub name: String,
    /// The price of the item.
    pub price: RawAmount,
    /// Ownership shares of this item.
    #[serde(default)]
    pub shares: Vec<Share>,
}

impl Item {
    /// Creates an item with the given shares.
    pub fn new(id: impl Into<String>, price: impl Into<RawAmount>, shares: Vec<Share>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            price: price.into(),
            shares,
        }
    }

    /// Returns true if nobody holds a share of this item.
    pub fn is_unassigned(&self) -> bool {
        self.shares.is_empty()
    }
}

/// Bill-level amounts applied on top of the items.
///
/// `tax_amount` may be edited independently of `tax_rate` and need not equal
/// `receipt_subtotal * tax_rate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillAdjustments {
    /// Tax rate as a fraction (0.08 for 8%).
    #[serde(default)]
    pub tax_rate: RawAmount,
    /// Tax amount shown on the receipt.
    #[serde(default)]
    pub tax_amount: RawAmount,
    /// Discount applied to the whole bill.
    #[serde(default)]
    pub discount: RawAmount,
    /// Tip added to the bill.
    #[serde(default)]
    pub tip: RawAmount,
    /// Service charge added to the bill.
    #[serde(default)]
    pub service_charge: RawAmount,
    /// Subtotal as printed on the receipt.
    #[serde(default)]
    pub receipt_subtotal: RawAmount,
    /// The person who paid the bill, if known.
    #[serde(default)]
    pub payer_id: Option<String>,
}

impl Default for BillAdjustments {
    fn default() -> Self {
        Self {
            tax_rate: RawAmount::new("0"),
            tax_amount: RawAmount::zero(),
            discount: RawAmount::zero(),
            tip: RawAmount::zero(),
            service_charge: RawAmount::zero(),
            receipt_subtotal: RawAmount::zero(),
            payer_id: None,
        }
    }
}

/// An immutable view of everything needed to split a bill.
///
/// Every engine operation takes a snapshot by reference and never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillSnapshot {
    /// People splitting the bill.
    #[serde(default)]
    pub people: Vec<Person>,
    /// Items on the receipt.
    #[serde(default)]
    pub items: Vec<Item>,
    /// Bill-level adjustments.
    #[serde(default)]
    pub adjustments: BillAdjustments,
}

impl BillSnapshot {
    /// Creates a snapshot from its parts.
    pub fn new(people: Vec<Person>, items: Vec<Item>, adjustments: BillAdjustments) -> Self {
        Self {
            people,
            items,
            adjustments,
        }
    }

    /// Looks up a person by id.
    pub fn person(&self, id: &str) -> Option<&Person> {
        self.people.iter().find(|p| p.id == id)
    }

    /// Checks the structural rules of the snapshot.
    ///
    /// Person ids and item ids must be unique within the bill, and a person may
    /// hold at most one share per item. Share percentages are not
    /// checked against each other.
    ///
    /// # Example
    ///
    /// ```
    /// use bill_split_engine::models::{BillAdjustments, BillSnapshot, Item, Person, Share};
    ///
    /// let snapshot = BillSnapshot::new(
    ///     vec![Person::new("p1")],
    ///     vec![Item::new("item_1", "10.00", vec![Share::new("p1", "60")])],
    ///     BillAdjustments::default(),
    /// );
    /// assert!(snapshot.validate().is_ok());
    /// ```
    pub fn validate(&self) -> EngineResult<()> {
        let mut person_ids = HashSet::new();
        for (index, person) in self.people.iter().enumerate() {
            if !person_ids.insert(person.id.as_str()) {
                return Err(EngineError::InvalidBill {
                    field: format!("people[{}].id", index),
                    message: format!("duplicate person id '{}'", person.id),
                });
            }
        }

        let mut item_ids = HashSet::new();
        for (index, item) in self.items.iter().enumerate() {
            if !item_ids.insert(item.id.as_str()) {
                return Err(EngineError::InvalidBill {
                    field: format!("items[{}].id", index),
                    message: format!("duplicate item id '{}'", item.id),
                });
            }

            let mut share_holders = HashSet::new();
            for (share_index, share) in item.shares.iter().enumerate() {
                if !share_holders.insert(share.person_id.as_str()) {
                    return Err(EngineError::InvalidBill {
                        field: format!("items[{}].shares[{}].person_id", index, share_index),
                        message: format!(
                            "person '{}' holds more than one share of item '{}'",
                            share.person_id, item.id
                        ),
                    });
                }
            }
        }

        if let Some(payer_id) = &self.adjustments.payer_id {
            if self.person(payer_id).is_none() {
                return Err(EngineError::InvalidBill {
                    field: "adjustments.payer_id".to_string(),
                    message: format!("payer '{}' is not one of the people on the bill", payer_id),
                });
            }
        }

        Ok(())
    }
}
