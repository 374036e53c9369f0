use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::{CommandEntry, Completion};
use crate::expense::ExpenseId;
use crate::forms::FormField;
use crate::host::ModalSubmit;
use crate::store::ExpenseStore;

const ADD_USAGE: &str = "add <name> <amount> <category> [color]";
const EDIT_USAGE: &str = "edit <id> [field=value ...]";
const CHART_WIDTH: usize = 30;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("add", "Record a new expense", ADD_USAGE, cmd_add),
        CommandEntry::new("edit", "Change an existing expense", EDIT_USAGE, cmd_edit)
            .completing(Completion::ExpenseFields),
        CommandEntry::new("list", "List recorded expenses", "list", cmd_list).aliases(&["ls"]),
        CommandEntry::new("remove", "Delete an expense", "remove <id>", cmd_remove)
            .aliases(&["rm"])
            .completing(Completion::ExpenseId),
        CommandEntry::new(
            "summary",
            "Show totals per category",
            "summary",
            cmd_summary,
        ),
        CommandEntry::new("save", "Write expenses to the data file", "save", cmd_save),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] if context.can_prompt() => {
            context.page.open_modal();
            prompt_until_done(context)
        }
        [name, amount, category, rest @ ..] if rest.len() <= 1 => {
            context.page.open_modal();
            if let Some(form) = context.page.form_mut() {
                form.set_name(*name);
                form.set_amount(*amount);
                form.set_category(*category);
                if let Some(color) = rest.first() {
                    form.set_color(*color);
                }
            }
            submit_once(context)
        }
        _ => Err(CommandError::InvalidArguments(format!("usage: {}", ADD_USAGE))),
    }
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((raw_id, assignments)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(format!("usage: {}", EDIT_USAGE)));
    };
    if assignments.is_empty() && !context.can_prompt() {
        return Err(CommandError::InvalidArguments(format!("usage: {}", EDIT_USAGE)));
    }

    let updates = parse_assignments(assignments)?;
    context.page.open_edit(&ExpenseId::from(*raw_id))?;
    if updates.is_empty() {
        return prompt_until_done(context);
    }
    if let Some(form) = context.page.form_mut() {
        for (field, value) in updates {
            form.set(field, value);
        }
    }
    submit_once(context)
}

fn parse_assignments(assignments: &[&str]) -> Result<Vec<(FormField, String)>, CommandError> {
    assignments
        .iter()
        .map(|assignment| {
            let (key, value) = assignment.split_once('=').ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "expected field=value, got `{}`",
                    assignment
                ))
            })?;
            let field = FormField::from_key(key).ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "unknown field `{}` (use name, amount, category, or color)",
                    key
                ))
            })?;
            Ok((field, value.to_string()))
        })
        .collect()
}

/// Submits the open form once; a rejection closes the modal after reporting.
fn submit_once(context: &mut ShellContext) -> CommandResult {
    if !submit_and_report(context)? {
        context.page.cancel_modal();
    }
    Ok(())
}

/// Returns `true` when the expense was accepted.
fn submit_and_report(context: &mut ShellContext) -> Result<bool, CommandError> {
    match context.page.submit_modal()? {
        ModalSubmit::Accepted(record) => {
            io::print_success(format!(
                "Saved `{}` ({}) as {}.",
                record.name,
                context.format_amount(record.amount),
                record.id
            ));
            context.autosave()?;
            Ok(true)
        }
        ModalSubmit::Rejected(errors) => {
            context.print_field_errors(&errors);
            Ok(false)
        }
    }
}

/// Walks the user through every field, re-prompting with the entered values
/// kept after a rejected submission.
fn prompt_until_done(context: &mut ShellContext) -> CommandResult {
    let result = prompt_loop(context);
    if result.is_err() {
        context.page.cancel_modal();
    }
    result
}

fn prompt_loop(context: &mut ShellContext) -> CommandResult {
    loop {
        for field in FormField::ALL {
            let current = context
                .page
                .form()
                .map(|form| form.value(field).to_string())
                .unwrap_or_default();
            let value = io::prompt_field(&context.theme, field.label(), &current)?;
            if let Some(form) = context.page.form_mut() {
                form.set(field, value);
            }
        }

        if submit_and_report(context)? {
            return Ok(());
        }
        if !io::confirm_action(&context.theme, "Fix the fields above?", true)? {
            context.page.cancel_modal();
            io::print_info("Expense discarded.");
            return Ok(());
        }
    }
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let expenses = context.page.expenses();
    if expenses.is_empty() {
        io::print_info("No expenses recorded yet. Use `add` to create one.");
        return Ok(());
    }
    output::section("Expenses");
    let rows: Vec<Vec<String>> = expenses
        .iter()
        .map(|record| {
            vec![
                record.id.to_string(),
                record.name.clone(),
                context.format_amount(record.amount),
                record.category.clone(),
                record.color.clone(),
            ]
        })
        .collect();
    output::render_table(&["ID", "Name", "Amount", "Category", "Color"], &rows);
    Ok(())
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [raw_id] = args else {
        return Err(CommandError::InvalidArguments("usage: remove <id>".into()));
    };
    let removed = context.page.remove(&ExpenseId::from(*raw_id))?;
    io::print_success(format!("Removed `{}` ({}).", removed.name, removed.id));
    context.autosave()
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let summary = context.page.summary();
    if summary.count == 0 {
        io::print_info("No expenses recorded yet.");
        return Ok(());
    }
    output::section("Expenses by category");
    let rows: Vec<Vec<String>> = summary
        .per_category
        .iter()
        .map(|entry| {
            let share = entry.share(summary.total);
            let bar_len = (share.abs() * CHART_WIDTH as f64).round() as usize;
            vec![
                entry.category.clone(),
                context.format_amount(entry.total),
                format!("{:.1}%", share * 100.0),
                "#".repeat(bar_len.min(CHART_WIDTH)),
                entry.count.to_string(),
            ]
        })
        .collect();
    output::render_table(&["Category", "Total", "Share", "Chart", "Count"], &rows);
    io::print_info(format!(
        "Total: {} across {} expenses",
        context.format_amount(summary.total),
        summary.count
    ));
    Ok(())
}

fn cmd_save(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.save_expenses()?;
    io::print_success(format!(
        "Saved {} expenses to {}.",
        context.expenses.len(),
        context.data_file.display()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignments_map_to_fields() {
        let parsed = parse_assignments(&["amount=5", "Color=#00ff00", "name=Cold brew"]).unwrap();
        assert_eq!(
            parsed,
            vec![
                (FormField::Amount, "5".to_string()),
                (FormField::Color, "#00ff00".to_string()),
                (FormField::Name, "Cold brew".to_string()),
            ]
        );
    }

    #[test]
    fn malformed_assignments_are_rejected() {
        assert!(parse_assignments(&["amount"]).is_err());
        assert!(parse_assignments(&["id=exp-9"]).is_err());
    }
}
