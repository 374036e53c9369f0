use tracing::debug;

use crate::expense::{ExpenseId, ExpenseRecord, NewExpense};

use super::{parse_amount, validate, ExpenseDraft, FormField, ValidationErrors};

/// What a submission attempt did.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The draft passed validation and was handed to the submit callback.
    Submitted(NewExpense),
    /// At least one field failed; the form kept every entered value.
    Rejected(ValidationErrors),
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted(_))
    }
}

/// State of one mounted expense entry form.
#[derive(Debug, Clone, Default)]
pub struct ExpenseForm {
    draft: ExpenseDraft,
    errors: ValidationErrors,
    target: Option<ExpenseId>,
}

impl ExpenseForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mounts the form, pre-filled from `initial` when editing an existing record.
    pub fn with_initial(initial: Option<&ExpenseRecord>) -> Self {
        let mut form = Self::new();
        form.sync_initial_data(initial);
        form
    }

    pub fn draft(&self) -> &ExpenseDraft {
        &self.draft
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Identity of the record the fields were last seeded from.
    pub fn target(&self) -> Option<&ExpenseId> {
        self.target.as_ref()
    }

    pub fn value(&self, field: FormField) -> &str {
        self.draft.get(field)
    }

    /// Records the latest user input for `field`. Errors are left untouched.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        self.draft.set(field, value);
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.set(FormField::Name, value);
    }

    pub fn set_amount(&mut self, value: impl Into<String>) {
        self.set(FormField::Amount, value);
    }

    pub fn set_category(&mut self, value: impl Into<String>) {
        self.set(FormField::Category, value);
    }

    pub fn set_color(&mut self, value: impl Into<String>) {
        self.set(FormField::Color, value);
    }

    /// Re-seeds the fields when the edit target changes identity.
    ///
    /// Passing the same record again, or `None`, leaves the user's edits in
    /// place. Returns `true` when the fields were overwritten.
    pub fn sync_initial_data(&mut self, initial: Option<&ExpenseRecord>) -> bool {
        let Some(record) = initial else {
            return false;
        };
        if self.target.as_ref() == Some(&record.id) {
            return false;
        }
        self.draft = ExpenseDraft::from_record(record);
        self.target = Some(record.id.clone());
        true
    }

    /// Runs validation and, when it passes, hands the record to `on_submit`,
    /// clears the fields, and requests closure through `on_close`.
    ///
    /// On failure neither callback runs and the entered values stay put.
    pub fn submit<S, C>(&mut self, on_submit: S, on_close: C) -> SubmitOutcome
    where
        S: FnOnce(NewExpense),
        C: FnOnce(),
    {
        let validation = validate(&self.draft);
        self.errors = validation.errors;
        if !self.errors.is_empty() {
            debug!(fields = ?self.errors.failed_fields(), "expense form rejected");
            return SubmitOutcome::Rejected(self.errors.clone());
        }

        let Some(amount) = parse_amount(&self.draft.amount) else {
            return SubmitOutcome::Rejected(self.errors.clone());
        };
        let expense = NewExpense {
            name: self.draft.name.clone(),
            amount,
            category: self.draft.category.clone(),
            color: self.draft.color.clone(),
        };

        on_submit(expense.clone());
        self.reset();
        on_close();
        SubmitOutcome::Submitted(expense)
    }

    /// The cancel action: close without submitting anything.
    pub fn cancel<C: FnOnce()>(&self, on_close: C) {
        on_close();
    }

    /// Restores every field to its default. The edit target is kept so the
    /// same record is not re-seeded on the next sync.
    pub fn reset(&mut self) {
        self.draft = ExpenseDraft::default();
    }
}
