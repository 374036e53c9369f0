//! Expense records as stored in the shared collection.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Color assigned to a new expense when the user leaves the picker untouched.
pub const DEFAULT_COLOR: &str = "#117554";

/// Unique identifier assigned by the host page when a record is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(String);

impl ExpenseId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ExpenseId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A finalized expense entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: ExpenseId,
    pub name: String,
    pub amount: f64,
    pub category: String,
    pub color: String,
}

impl ExpenseRecord {
    /// Strips the identifier, leaving the fields the form edits.
    pub fn without_id(&self) -> NewExpense {
        NewExpense {
            name: self.name.clone(),
            amount: self.amount,
            category: self.category.clone(),
            color: self.color.clone(),
        }
    }
}

/// An expense that passed form validation but has not been given an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub name: String,
    pub amount: f64,
    pub category: String,
    pub color: String,
}

impl NewExpense {
    pub fn new(
        name: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            amount,
            category: category.into(),
            color: color.into(),
        }
    }

    pub fn with_id(self, id: ExpenseId) -> ExpenseRecord {
        ExpenseRecord {
            id,
            name: self.name,
            amount: self.amount,
            category: self.category,
            color: self.color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_serializes_as_plain_string() {
        let record = NewExpense::new("Coffee", 4.5, "Food", "#ff0000").with_id("x".into());
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"id\":\"x\""), "unexpected json: {json}");
    }

    #[test]
    fn without_id_keeps_every_other_field() {
        let record = NewExpense::new("Rent", 1200.0, "Housing", DEFAULT_COLOR).with_id("r1".into());
        let draft = record.without_id();
        assert_eq!(draft.name, "Rent");
        assert_eq!(draft.amount, 1200.0);
        assert_eq!(draft.category, "Housing");
        assert_eq!(draft.color, DEFAULT_COLOR);
    }
}
