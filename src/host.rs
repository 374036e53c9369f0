//! The home page: owns the entry modal and accepts submitted expenses into
//! the collection.

use tracing::{debug, info};

use crate::{
    errors::{FluxoError, Result},
    expense::{ExpenseId, ExpenseRecord, NewExpense},
    forms::{ExpenseForm, SubmitOutcome, ValidationErrors},
    ids::{IdGenerator, UuidIds},
    store::ExpenseStore,
    summary::{self, ExpenseSummary},
};

/// What happened when the open modal's form was submitted.
#[derive(Debug, Clone, PartialEq)]
pub enum ModalSubmit {
    /// The record entered the collection and the modal closed.
    Accepted(ExpenseRecord),
    /// Validation failed; the modal stays open with these messages.
    Rejected(ValidationErrors),
}

pub struct HomePage<S: ExpenseStore> {
    store: S,
    ids: Box<dyn IdGenerator>,
    modal: Option<ExpenseForm>,
    editing: Option<ExpenseId>,
}

impl<S: ExpenseStore> HomePage<S> {
    pub fn new(store: S) -> Self {
        Self::with_ids(store, UuidIds)
    }

    pub fn with_ids(store: S, ids: impl IdGenerator + 'static) -> Self {
        Self {
            store,
            ids: Box::new(ids),
            modal: None,
            editing: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replaces the identifier source, e.g. after a configuration change.
    pub fn set_id_generator(&mut self, ids: impl IdGenerator + 'static) {
        self.ids = Box::new(ids);
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal.is_some()
    }

    /// Shows the entry modal with a fresh form. Does nothing if already open.
    pub fn open_modal(&mut self) {
        if self.modal.is_none() {
            debug!("expense modal opened");
            self.modal = Some(ExpenseForm::new());
            self.editing = None;
        }
    }

    /// Shows the modal pre-filled from an existing record.
    pub fn open_edit(&mut self, id: &ExpenseId) -> Result<()> {
        let record = self
            .store
            .get(id)
            .ok_or_else(|| FluxoError::ExpenseNotFound(id.clone()))?;
        match self.modal.as_mut() {
            Some(form) => {
                form.sync_initial_data(Some(&record));
            }
            None => self.modal = Some(ExpenseForm::with_initial(Some(&record))),
        }
        debug!(id = %id, "expense modal opened for edit");
        self.editing = Some(record.id);
        Ok(())
    }

    pub fn close_modal(&mut self) {
        if self.modal.take().is_some() {
            debug!("expense modal closed");
        }
        self.editing = None;
    }

    /// Record being edited by the open modal, if any.
    pub fn editing(&self) -> Option<&ExpenseId> {
        self.editing.as_ref()
    }

    pub fn form(&self) -> Option<&ExpenseForm> {
        self.modal.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut ExpenseForm> {
        self.modal.as_mut()
    }

    /// The form's cancel action.
    pub fn cancel_modal(&mut self) {
        let mut close_requested = false;
        if let Some(form) = self.modal.as_ref() {
            form.cancel(|| close_requested = true);
        }
        if close_requested {
            self.close_modal();
        }
    }

    /// Submits the open form. Its submit callback assigns the id and writes
    /// the record to the collection, then its close callback shuts the modal.
    ///
    /// A store error is returned after the modal has closed.
    pub fn submit_modal(&mut self) -> Result<ModalSubmit> {
        let Self {
            store,
            ids,
            modal,
            editing,
        } = &mut *self;
        let form = modal.as_mut().ok_or(FluxoError::ModalClosed)?;

        let mut accepted = None;
        let mut close_requested = false;
        let outcome = form.submit(
            |expense| {
                accepted = Some(match editing.clone() {
                    Some(id) => update_record(store, expense.with_id(id)),
                    None => add_record(store, expense.with_id(ids.next_id())),
                });
            },
            || close_requested = true,
        );

        if close_requested {
            self.close_modal();
        }
        match (outcome, accepted) {
            (SubmitOutcome::Rejected(errors), _) => Ok(ModalSubmit::Rejected(errors)),
            (SubmitOutcome::Submitted(_), Some(result)) => result.map(ModalSubmit::Accepted),
            (SubmitOutcome::Submitted(_), None) => Err(FluxoError::ModalClosed),
        }
    }

    /// Gives an already validated expense its identifier and adds it to the
    /// collection without going through the modal.
    pub fn accept(&mut self, expense: NewExpense) -> Result<ExpenseRecord> {
        add_record(&mut self.store, expense.with_id(self.ids.next_id()))
    }

    pub fn remove(&mut self, id: &ExpenseId) -> Result<ExpenseRecord> {
        if self.editing.as_ref() == Some(id) {
            self.close_modal();
        }
        self.store.remove(id)
    }

    pub fn expenses(&self) -> Vec<ExpenseRecord> {
        self.store.list()
    }

    pub fn summary(&self) -> ExpenseSummary {
        summary::summarize(&self.store.list())
    }
}

fn add_record<S: ExpenseStore>(store: &mut S, record: ExpenseRecord) -> Result<ExpenseRecord> {
    store.add(record.clone())?;
    info!(id = %record.id, name = %record.name, "expense accepted");
    Ok(record)
}

fn update_record<S: ExpenseStore>(store: &mut S, record: ExpenseRecord) -> Result<ExpenseRecord> {
    store.update(record.clone())?;
    info!(id = %record.id, name = %record.name, "expense edited");
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        expense::DEFAULT_COLOR,
        forms::FormField,
        ids::SequentialIds,
        store::{ExpenseBook, SharedExpenses},
    };

    fn page() -> HomePage<ExpenseBook> {
        HomePage::with_ids(ExpenseBook::new(), SequentialIds::new())
    }

    fn fill(page: &mut HomePage<ExpenseBook>, name: &str, amount: &str, category: &str) {
        let form = page.form_mut().expect("modal open");
        form.set_name(name);
        form.set_amount(amount);
        form.set_category(category);
    }

    #[test]
    fn modal_toggles_without_side_effects() {
        let mut page = page();
        assert!(!page.is_modal_open());
        page.open_modal();
        page.open_modal();
        assert!(page.is_modal_open());
        page.close_modal();
        assert!(!page.is_modal_open());
        assert!(page.expenses().is_empty());
    }

    #[test]
    fn accepted_submission_gets_an_id_and_closes() {
        let mut page = page();
        page.open_modal();
        fill(&mut page, "Rent", "1200", "Housing");

        let outcome = page.submit_modal().unwrap();

        let expected = NewExpense::new("Rent", 1200.0, "Housing", DEFAULT_COLOR)
            .with_id(ExpenseId::from("exp-1"));
        assert_eq!(outcome, ModalSubmit::Accepted(expected.clone()));
        assert!(!page.is_modal_open());
        assert_eq!(page.expenses(), vec![expected]);
    }

    #[test]
    fn rejected_submission_keeps_modal_and_collection() {
        let mut page = page();
        page.open_modal();
        fill(&mut page, "Lunch", "abc", "Food");

        let outcome = page.submit_modal().unwrap();

        assert!(matches!(outcome, ModalSubmit::Rejected(ref errors) if !errors.amount.is_empty()));
        assert!(page.is_modal_open());
        assert!(page.expenses().is_empty());
        let form = page.form().unwrap();
        assert_eq!(form.value(FormField::Amount), "abc");
    }

    #[test]
    fn store_error_from_submit_callback_is_surfaced_after_close() {
        let mut book = ExpenseBook::new();
        let rent = NewExpense::new("Rent", 1200.0, "Housing", DEFAULT_COLOR);
        book.add(rent.with_id("exp-1".into())).unwrap();
        let mut page = HomePage::with_ids(book, SequentialIds::new());
        page.open_modal();
        fill(&mut page, "Bus", "3", "Transport");

        let err = page.submit_modal().unwrap_err();

        assert!(matches!(err, FluxoError::DuplicateExpense(ref id) if id.as_str() == "exp-1"));
        assert!(!page.is_modal_open());
        assert_eq!(page.expenses().len(), 1);
    }

    #[test]
    fn submit_without_modal_is_an_error() {
        let mut page = page();
        assert!(matches!(page.submit_modal(), Err(FluxoError::ModalClosed)));
    }

    #[test]
    fn edit_keeps_the_existing_id() {
        let mut page = page();
        let record = page
            .accept(NewExpense::new("Coffee", 4.5, "Food", "#ff0000"))
            .unwrap();

        page.open_edit(&record.id).unwrap();
        let form = page.form_mut().unwrap();
        assert_eq!(form.value(FormField::Name), "Coffee");
        form.set_amount("5");
        let outcome = page.submit_modal().unwrap();

        let ModalSubmit::Accepted(updated) = outcome else {
            panic!("edit should be accepted");
        };
        assert_eq!(updated.id, record.id);
        assert_eq!(updated.amount, 5.0);
        assert_eq!(page.expenses().len(), 1);
        assert!(page.editing().is_none());
    }

    #[test]
    fn cancel_discards_the_draft() {
        let mut page = page();
        page.open_modal();
        fill(&mut page, "Rent", "1200", "Housing");
        page.cancel_modal();
        assert!(!page.is_modal_open());

        page.open_modal();
        assert_eq!(page.form().unwrap().value(FormField::Name), "");
    }

    #[test]
    fn shared_handle_observes_host_writes() {
        let expenses = SharedExpenses::default();
        let mut page = HomePage::with_ids(expenses.clone(), SequentialIds::new());
        page.accept(NewExpense::new("Rent", 1200.0, "Housing", DEFAULT_COLOR))
            .unwrap();
        page.accept(NewExpense::new("Bus", 3.0, "Transport", DEFAULT_COLOR))
            .unwrap();

        assert_eq!(expenses.len(), 2);
        assert_eq!(page.summary().per_category.len(), 2);
    }
}
