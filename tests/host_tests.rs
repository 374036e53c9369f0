use std::collections::HashSet;

use fluxo::{
    expense::{ExpenseRecord, NewExpense},
    host::{HomePage, ModalSubmit},
    ids::SequentialIds,
    store::{json, ExpenseStore, SharedExpenses},
};
use tempfile::TempDir;

fn submit(
    page: &mut HomePage<SharedExpenses>,
    name: &str,
    amount: &str,
    category: &str,
) -> ModalSubmit {
    page.open_modal();
    let form = page.form_mut().expect("modal open");
    form.set_name(name);
    form.set_amount(amount);
    form.set_category(category);
    page.submit_modal().expect("submit")
}

fn accepted(outcome: ModalSubmit) -> ExpenseRecord {
    match outcome {
        ModalSubmit::Accepted(record) => record,
        ModalSubmit::Rejected(errors) => panic!("unexpected rejection: {errors:?}"),
    }
}

#[test]
fn sequential_submissions_get_independent_ids() {
    let expenses = SharedExpenses::default();
    let mut page = HomePage::new(expenses.clone());

    let first = accepted(submit(&mut page, "Rent", "1200", "Housing"));
    let second = accepted(submit(&mut page, "Bus", "3", "Transport"));

    assert_ne!(first.id, second.id);
    let stored: HashSet<_> = expenses.list().into_iter().map(|record| record.id).collect();
    assert!(stored.contains(&first.id));
    assert!(stored.contains(&second.id));
    assert_eq!(stored.len(), 2);
}

#[test]
fn rejected_records_never_reach_the_collection() {
    let expenses = SharedExpenses::default();
    let mut page = HomePage::new(expenses.clone());

    let outcome = submit(&mut page, "", "abc", "");

    assert!(matches!(outcome, ModalSubmit::Rejected(_)));
    assert!(expenses.is_empty());
    assert!(page.is_modal_open());
}

#[test]
fn collection_survives_a_save_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("expenses.json");
    let expenses = SharedExpenses::default();
    let mut page = HomePage::with_ids(expenses.clone(), SequentialIds::new());
    page.accept(NewExpense::new("Rent", 1200.0, "Housing", "#117554"))
        .unwrap();
    page.accept(NewExpense::new("Coffee", 4.5, "Food", "#ff0000"))
        .unwrap();

    expenses.with_book(|book| json::save_book(book, &path)).unwrap();
    let reloaded = json::load_book(&path).unwrap();

    assert_eq!(reloaded.list(), expenses.list());
    let summary = page.summary();
    assert_eq!(summary.total, 1204.5);
    assert_eq!(summary.per_category[0].category, "Housing");
}
