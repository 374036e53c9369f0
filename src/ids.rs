//! Identifier generation for accepted expenses.

use uuid::Uuid;

use crate::expense::ExpenseId;

/// Source of identifiers for records entering the collection.
pub trait IdGenerator {
    fn next_id(&mut self) -> ExpenseId;
}

/// Random v4 UUIDs. The default generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> ExpenseId {
        ExpenseId::new(Uuid::new_v4().to_string())
    }
}

/// Monotonic `exp-N` identifiers, deterministic across runs.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continues numbering after `last`, so reloaded books do not collide.
    pub fn starting_after(last: u64) -> Self {
        Self { next: last }
    }

    /// Picks up after the highest `exp-N` id already in use. An id with no
    /// successor (`exp-18446744073709551615`) is ignored.
    pub fn resume<'a>(existing: impl IntoIterator<Item = &'a ExpenseId>) -> Self {
        let last = existing
            .into_iter()
            .filter_map(|id| id.as_str().strip_prefix("exp-"))
            .filter_map(|suffix| suffix.parse::<u64>().ok())
            .filter(|n| n.checked_add(1).is_some())
            .max()
            .unwrap_or(0);
        Self::starting_after(last)
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> ExpenseId {
        // Once exhausted the last id repeats and the store rejects it as a duplicate.
        self.next = self.next.saturating_add(1);
        ExpenseId::new(format!("exp-{}", self.next))
    }
}
