//! The shared expense collection and its persistence.

pub mod json;

use std::{cell::RefCell, rc::Rc};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    errors::{FluxoError, Result},
    expense::{ExpenseId, ExpenseRecord},
};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Operations the host page and list views need from the collection.
pub trait ExpenseStore {
    /// Appends a record. Ids must be unique within the collection.
    fn add(&mut self, record: ExpenseRecord) -> Result<()>;
    /// Replaces the record that has the same id.
    fn update(&mut self, record: ExpenseRecord) -> Result<()>;
    fn remove(&mut self, id: &ExpenseId) -> Result<ExpenseRecord>;
    fn get(&self, id: &ExpenseId) -> Option<ExpenseRecord>;
    /// All records in insertion order.
    fn list(&self) -> Vec<ExpenseRecord>;

    fn len(&self) -> usize {
        self.list().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory expense collection; the unit of persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseBook {
    #[serde(default)]
    pub expenses: Vec<ExpenseRecord>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "ExpenseBook::schema_version_default")]
    pub schema_version: u8,
}

impl Default for ExpenseBook {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpenseBook {
    pub fn new() -> Self {
        Self {
            expenses: Vec::new(),
            updated_at: Utc::now(),
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    pub fn ids(&self) -> impl Iterator<Item = &ExpenseId> {
        self.expenses.iter().map(|record| &record.id)
    }

    fn position(&self, id: &ExpenseId) -> Option<usize> {
        self.expenses.iter().position(|record| &record.id == id)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl ExpenseStore for ExpenseBook {
    fn add(&mut self, record: ExpenseRecord) -> Result<()> {
        if self.position(&record.id).is_some() {
            return Err(FluxoError::DuplicateExpense(record.id));
        }
        info!(
            id = %record.id,
            category = %record.category,
            amount = record.amount,
            "expense added"
        );
        self.expenses.push(record);
        self.touch();
        Ok(())
    }

    fn update(&mut self, record: ExpenseRecord) -> Result<()> {
        let index = self
            .position(&record.id)
            .ok_or_else(|| FluxoError::ExpenseNotFound(record.id.clone()))?;
        info!(id = %record.id, "expense updated");
        self.expenses[index] = record;
        self.touch();
        Ok(())
    }

    fn remove(&mut self, id: &ExpenseId) -> Result<ExpenseRecord> {
        let index = self
            .position(id)
            .ok_or_else(|| FluxoError::ExpenseNotFound(id.clone()))?;
        let removed = self.expenses.remove(index);
        info!(id = %removed.id, "expense removed");
        self.touch();
        Ok(removed)
    }

    fn get(&self, id: &ExpenseId) -> Option<ExpenseRecord> {
        self.position(id).map(|index| self.expenses[index].clone())
    }

    fn list(&self) -> Vec<ExpenseRecord> {
        self.expenses.clone()
    }

    fn len(&self) -> usize {
        self.expenses.len()
    }
}

/// Cloneable handle to one collection, passed explicitly to every view that
/// reads or writes expenses.
#[derive(Debug, Clone, Default)]
pub struct SharedExpenses {
    inner: Rc<RefCell<ExpenseBook>>,
}

impl SharedExpenses {
    pub fn new(book: ExpenseBook) -> Self {
        Self {
            inner: Rc::new(RefCell::new(book)),
        }
    }

    /// Runs `f` against the underlying book without cloning it.
    pub fn with_book<R>(&self, f: impl FnOnce(&ExpenseBook) -> R) -> R {
        f(&self.inner.borrow())
    }

    /// Swaps in a different book, e.g. after loading from disk.
    pub fn replace(&self, book: ExpenseBook) -> ExpenseBook {
        self.inner.replace(book)
    }
}

impl ExpenseStore for SharedExpenses {
    fn add(&mut self, record: ExpenseRecord) -> Result<()> {
        self.inner.borrow_mut().add(record)
    }

    fn update(&mut self, record: ExpenseRecord) -> Result<()> {
        self.inner.borrow_mut().update(record)
    }

    fn remove(&mut self, id: &ExpenseId) -> Result<ExpenseRecord> {
        self.inner.borrow_mut().remove(id)
    }

    fn get(&self, id: &ExpenseId) -> Option<ExpenseRecord> {
        self.inner.borrow().get(id)
    }

    fn list(&self) -> Vec<ExpenseRecord> {
        self.inner.borrow().list()
    }

    fn len(&self) -> usize {
        self.inner.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expense::NewExpense;

    fn record(id: &str, name: &str) -> ExpenseRecord {
        NewExpense::new(name, 10.0, "Food", "#117554").with_id(id.into())
    }

    #[test]
    fn add_rejects_duplicate_ids() {
        let mut book = ExpenseBook::new();
        book.add(record("a", "Lunch")).unwrap();
        let err = book.add(record("a", "Dinner")).unwrap_err();
        assert!(matches!(err, FluxoError::DuplicateExpense(id) if id.as_str() == "a"));
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn list_keeps_insertion_order() {
        let mut book = ExpenseBook::new();
        book.add(record("b", "Second")).unwrap();
        book.add(record("a", "First")).unwrap();
        let names: Vec<_> = book.list().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Second", "First"]);
    }

    #[test]
    fn update_and_remove_require_existing_id() {
        let mut book = ExpenseBook::new();
        assert!(matches!(
            book.update(record("z", "Ghost")),
            Err(FluxoError::ExpenseNotFound(_))
        ));
        assert!(book.remove(&"z".into()).is_err());

        book.add(record("a", "Lunch")).unwrap();
        book.update(record("a", "Brunch")).unwrap();
        assert_eq!(book.get(&"a".into()).map(|r| r.name), Some("Brunch".into()));
        let removed = book.remove(&"a".into()).unwrap();
        assert_eq!(removed.name, "Brunch");
        assert!(book.is_empty());
    }

    #[test]
    fn shared_handles_see_the_same_book() {
        let mut writer = SharedExpenses::default();
        let reader = writer.clone();
        writer.add(record("a", "Lunch")).unwrap();
        assert_eq!(reader.len(), 1);
        assert_eq!(reader.with_book(|book| book.ids().count()), 1);
    }
}
