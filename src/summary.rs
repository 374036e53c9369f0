//! Aggregated totals that feed the expense chart.

use serde::Serialize;

use crate::expense::ExpenseRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
    pub count: usize,
    /// Color of the first expense seen in this category.
    pub color: String,
}

impl CategoryTotal {
    /// Fraction of `overall` this category accounts for; zero when nothing is spent.
    pub fn share(&self, overall: f64) -> f64 {
        if overall == 0.0 {
            0.0
        } else {
            self.total / overall
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExpenseSummary {
    pub total: f64,
    pub count: usize,
    pub per_category: Vec<CategoryTotal>,
}

/// Groups expenses by trimmed category name, in first-appearance order.
pub fn summarize(expenses: &[ExpenseRecord]) -> ExpenseSummary {
    let mut summary = ExpenseSummary::default();
    for expense in expenses {
        summary.total += expense.amount;
        summary.count += 1;

        let category = expense.category.trim();
        match summary
            .per_category
            .iter_mut()
            .find(|entry| entry.category == category)
        {
            Some(entry) => {
                entry.total += expense.amount;
                entry.count += 1;
            }
            None => summary.per_category.push(CategoryTotal {
                category: category.to_string(),
                total: expense.amount,
                count: 1,
                color: expense.color.clone(),
            }),
        }
    }
    summary
}
