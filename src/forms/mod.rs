//! Expense entry form: field state, validation rules, and submission.
//!
//! The form never talks to the expense collection directly. A successful
//! submission hands a [`NewExpense`](crate::expense::NewExpense) to the
//! caller-supplied callback; a failed one leaves a [`ValidationErrors`] set
//! on the form and nothing else.

mod expense_form;

use std::fmt;

use crate::expense::{ExpenseRecord, NewExpense, DEFAULT_COLOR};

pub use expense_form::{ExpenseForm, SubmitOutcome};

pub const NAME_REQUIRED: &str = "name is required";
pub const AMOUNT_INVALID: &str = "must be a valid number";
pub const CATEGORY_REQUIRED: &str = "category is required";

/// Editable inputs rendered by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Amount,
    Category,
    Color,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Name,
        FormField::Amount,
        FormField::Category,
        FormField::Color,
    ];

    /// Fields that carry a validation rule. Color is never validated.
    pub const VALIDATED: [FormField; 3] = [FormField::Name, FormField::Amount, FormField::Category];

    pub fn key(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Amount => "amount",
            FormField::Category => "category",
            FormField::Color => "color",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Expense name",
            FormField::Amount => "Amount",
            FormField::Category => "Category",
            FormField::Color => "Color",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let normalized = key.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|field| field.key() == normalized)
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// In-progress field values. No invariant holds until a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub name: String,
    pub amount: String,
    pub category: String,
    pub color: String,
}

impl Default for ExpenseDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            amount: String::new(),
            category: String::new(),
            color: DEFAULT_COLOR.to_string(),
        }
    }
}

impl ExpenseDraft {
    /// Seeds every field from an existing record, for edit mode.
    pub fn from_record(record: &ExpenseRecord) -> Self {
        let NewExpense {
            name,
            amount,
            category,
            color,
        } = record.without_id();
        Self {
            name,
            amount: amount.to_string(),
            category,
            color,
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Amount => &self.amount,
            FormField::Category => &self.category,
            FormField::Color => &self.color,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Name => self.name = value,
            FormField::Amount => self.amount = value,
            FormField::Category => self.category = value,
            FormField::Color => self.color = value,
        }
    }
}

/// Per-field messages from the latest submission attempt. Empty means passed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub name: String,
    pub amount: String,
    pub category: String,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.amount.is_empty() && self.category.is_empty()
    }

    /// Message attached to `field`, if any.
    pub fn message(&self, field: FormField) -> Option<&str> {
        let message = match field {
            FormField::Name => &self.name,
            FormField::Amount => &self.amount,
            FormField::Category => &self.category,
            FormField::Color => return None,
        };
        if message.is_empty() {
            None
        } else {
            Some(message)
        }
    }

    pub fn failed_fields(&self) -> Vec<FormField> {
        FormField::VALIDATED
            .into_iter()
            .filter(|field| self.message(*field).is_some())
            .collect()
    }

    fn record(&mut self, field: FormField, message: &str) {
        match field {
            FormField::Name => self.name = message.to_string(),
            FormField::Amount => self.amount = message.to_string(),
            FormField::Category => self.category = message.to_string(),
            FormField::Color => {}
        }
    }
}

/// Result of running every rule against a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    pub errors: ValidationErrors,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Built-in rules a field can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    NonEmpty(&'static str),
    Number(&'static str),
}

impl Rule {
    fn for_field(field: FormField) -> Option<Rule> {
        match field {
            FormField::Name => Some(Rule::NonEmpty(NAME_REQUIRED)),
            FormField::Amount => Some(Rule::Number(AMOUNT_INVALID)),
            FormField::Category => Some(Rule::NonEmpty(CATEGORY_REQUIRED)),
            FormField::Color => None,
        }
    }

    fn check(self, input: &str) -> Result<(), &'static str> {
        match self {
            Rule::NonEmpty(message) => {
                if input.trim().is_empty() {
                    Err(message)
                } else {
                    Ok(())
                }
            }
            Rule::Number(message) => parse_amount(input).map(|_| ()).ok_or(message),
        }
    }
}

/// Parses amount text into a finite number.
///
/// The whole trimmed text must be a number: `"12abc"` is rejected. The same
/// function backs both validation and the stored value.
pub fn parse_amount(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Evaluates every field rule. Rules are independent and never short-circuit.
pub fn validate(draft: &ExpenseDraft) -> Validation {
    let mut errors = ValidationErrors::default();
    for field in FormField::VALIDATED {
        let Some(rule) = Rule::for_field(field) else {
            continue;
        };
        if let Err(message) = rule.check(draft.get(field)) {
            errors.record(field, message);
        }
    }
    Validation { errors }
}
