//! JSON snapshots of an [`ExpenseBook`].

use std::{fs, path::Path};

use tracing::{debug, info};

use crate::{
    errors::{FluxoError, Result},
    utils::fs::{ensure_dir, tmp_path, write_atomic},
};

use super::{ExpenseBook, CURRENT_SCHEMA_VERSION};

/// Writes the book through a temporary sibling file and renames it into place.
pub fn save_book(book: &ExpenseBook, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let json = serde_json::to_string_pretty(book)?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    info!(path = %path.display(), expenses = book.expenses.len(), "expense book saved");
    Ok(())
}

pub fn load_book(path: &Path) -> Result<ExpenseBook> {
    let data = fs::read_to_string(path)?;
    let book: ExpenseBook = serde_json::from_str(&data)?;
    if book.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(FluxoError::Storage(format!(
            "expense file `{}` is from a newer schema version",
            path.display()
        )));
    }
    debug!(path = %path.display(), expenses = book.expenses.len(), "expense book loaded");
    Ok(book)
}

/// Loads the book at `path`, or starts an empty one when nothing is there yet.
pub fn load_or_default(path: &Path) -> Result<ExpenseBook> {
    if path.exists() {
        load_book(path)
    } else {
        Ok(ExpenseBook::new())
    }
}
