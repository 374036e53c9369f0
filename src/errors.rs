use std::result::Result as StdResult;

use thiserror::Error;

use crate::expense::ExpenseId;

/// Error type for the expense collection, host page, and persistence layers.
///
/// Field validation failures are not represented here: they stay inside the
/// form as [`crate::forms::ValidationErrors`].
#[derive(Debug, Error)]
pub enum FluxoError {
    #[error("Expense already exists: {0}")]
    DuplicateExpense(ExpenseId),
    #[error("Expense not found: {0}")]
    ExpenseNotFound(ExpenseId),
    #[error("No expense form is open")]
    ModalClosed,
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = StdResult<T, FluxoError>;

impl From<std::io::Error> for FluxoError {
    fn from(err: std::io::Error) -> Self {
        FluxoError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for FluxoError {
    fn from(err: serde_json::Error) -> Self {
        FluxoError::Storage(err.to_string())
    }
}
