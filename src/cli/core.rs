//! Shell context, command dispatch, and CLI error types.

use std::{io, path::PathBuf};

use dialoguer::theme::ColorfulTheme;
use rustyline::error::ReadlineError;
use strsim::levenshtein;

use crate::{
    config::{Config, ConfigManager, IdStyle},
    errors::FluxoError,
    forms::ValidationErrors,
    host::HomePage,
    ids::{SequentialIds, UuidIds},
    store::{json, ExpenseStore, SharedExpenses},
};

use super::commands;
use super::io as cli_io;
use super::registry::{CommandEntry, CommandRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub page: HomePage<SharedExpenses>,
    pub expenses: SharedExpenses,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub data_file: PathBuf,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::from_manager(mode, ConfigManager::new()?)
    }

    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        Self::from_manager(mode, ConfigManager::with_base_dir(base)?)
    }

    fn from_manager(mode: CliMode, config_manager: ConfigManager) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config = config_manager.load()?;
        let data_file = config_manager.data_file(&config);
        let expenses = SharedExpenses::new(json::load_or_default(&data_file)?);
        let page = HomePage::new(expenses.clone());

        let mut context = ShellContext {
            mode,
            registry,
            page,
            expenses,
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            data_file,
            running: true,
        };
        context.apply_id_style();
        Ok(context)
    }

    /// Points the host page at the identifier scheme named in the config.
    pub(crate) fn apply_id_style(&mut self) {
        match self.config.id_style {
            IdStyle::Uuid => self.page.set_id_generator(UuidIds),
            IdStyle::Sequential => {
                let ids = self
                    .expenses
                    .with_book(|book| SequentialIds::resume(book.ids()));
                self.page.set_id_generator(ids);
            }
        }
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn prompt(&self) -> String {
        format!("fluxo ({} expenses) > ", self.page.store().len())
    }

    pub(crate) fn can_prompt(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    /// Writes the collection to the data file.
    pub(crate) fn save_expenses(&self) -> CommandResult {
        self.expenses
            .with_book(|book| json::save_book(book, &self.data_file))
            .map_err(CommandError::from)
    }

    /// Saves after a mutating command when autosave is on.
    pub(crate) fn autosave(&self) -> CommandResult {
        if self.config.autosave {
            self.save_expenses()?;
        }
        Ok(())
    }

    /// Validates `updated`, saves it, and makes it the active configuration.
    ///
    /// When the data file changes, the new book is loaded before anything is
    /// written, so a file that cannot be read leaves both the session and the
    /// stored configuration on the previous settings.
    pub(crate) fn apply_config(&mut self, updated: Config) -> CommandResult {
        let data_file = self.config_manager.data_file(&updated);
        let book = if data_file != self.data_file {
            Some(json::load_or_default(&data_file)?)
        } else {
            None
        };
        self.config_manager.save(&updated)?;

        let style_changed = updated.id_style != self.config.id_style;
        self.config = updated;
        if let Some(book) = book {
            self.page.close_modal();
            self.expenses.replace(book);
            self.data_file = data_file;
            self.apply_id_style();
        } else if style_changed {
            self.apply_id_style();
        }
        Ok(())
    }

    pub(crate) fn format_amount(&self, amount: f64) -> String {
        format!("{:.2} {}", amount, self.config.currency)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.get(command).map(|entry| entry.handler) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    /// Splits one input line and runs it. An `exit` also stops the shell.
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = shell_words::split(line)?;
        let Some((raw, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        let control = self.dispatch(&raw.to_lowercase(), raw, &args)?;
        if control == LoopControl::Exit {
            self.running = false;
        }
        Ok(control)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = self
            .registry
            .words()
            .map(|key| (levenshtein(key, input), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true).map_err(CliError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Parse(err) => {
                self.print_error(&format!("Could not read the line: {}", err));
                cli_io::print_hint(r#"Quote values that contain spaces: add "Flat white" 4.5 Food"#);
                Ok(())
            }
            other => {
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    /// Prints each failed field's message, in form order.
    pub(crate) fn print_field_errors(&self, errors: &ValidationErrors) {
        for field in errors.failed_fields() {
            if let Some(message) = errors.message(field) {
                cli_io::print_error(format!("{}: {}", field.label(), message));
            }
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        cli_io::print_error(message);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Parse(#[from] shell_words::ParseError),
    #[error(transparent)]
    Core(#[from] FluxoError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

/// User-facing CLI error wrapper.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] FluxoError),
    #[error("Readline error: {0}")]
    Readline(#[from] ReadlineError),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Core(inner) => CliError::Core(inner),
            other => CliError::Command(other.to_string()),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

#[cfg(test)]
pub(crate) fn process_script(base: PathBuf, lines: &[&str]) -> Result<ShellContext, CliError> {
    let mut app = ShellContext::with_base_dir(CliMode::Script, base)?;
    for line in lines {
        match app.process_line(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => app.report_error(err)?,
        }
    }
    Ok(app)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn script_add_list_remove_flow() {
        let dir = TempDir::new().unwrap();
        let app = process_script(
            dir.path().to_path_buf(),
            &[
                "config id_style sequential",
                "add Rent 1200 Housing",
                "add Coffee 4.5 Food '#ff0000'",
                "remove exp-1",
            ],
        )
        .unwrap();

        let remaining = app.expenses.list();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id.as_str(), "exp-2");
        assert_eq!(remaining[0].color, "#ff0000");
        assert!(dir.path().join("expenses.json").exists());
    }

    #[test]
    fn rejected_add_leaves_collection_untouched() {
        let dir = TempDir::new().unwrap();
        let app = process_script(dir.path().to_path_buf(), &["add Lunch abc Food"]).unwrap();
        assert!(app.expenses.is_empty());
        assert!(!app.page.is_modal_open());
    }

    #[test]
    fn sequential_ids_resume_after_reload() {
        let dir = TempDir::new().unwrap();
        process_script(
            dir.path().to_path_buf(),
            &["config id_style sequential", "add Rent 1200 Housing"],
        )
        .unwrap();

        let app = process_script(dir.path().to_path_buf(), &["add Bus 3 Transport"]).unwrap();
        let ids: Vec<_> = app
            .expenses
            .list()
            .into_iter()
            .map(|record| record.id.to_string())
            .collect();
        assert_eq!(ids, vec!["exp-1", "exp-2"]);
    }

    #[test]
    fn edit_updates_fields_in_place() {
        let dir = TempDir::new().unwrap();
        let app = process_script(
            dir.path().to_path_buf(),
            &[
                "config id_style sequential",
                "add Coffee 4.5 Food",
                "edit exp-1 amount=5 color=#00ff00",
            ],
        )
        .unwrap();
        let record = app.expenses.get(&"exp-1".into()).unwrap();
        assert_eq!(record.amount, 5.0);
        assert_eq!(record.color, "#00ff00");
        assert_eq!(record.name, "Coffee");
    }

    #[test]
    fn unreadable_data_file_keeps_previous_config() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("bad.json"), "not json").unwrap();
        let app = process_script(
            dir.path().to_path_buf(),
            &["add Rent 1200 Housing", "config data_file bad.json"],
        )
        .unwrap();

        assert_eq!(app.config.data_file, None);
        assert_eq!(app.data_file, dir.path().join("expenses.json"));
        assert_eq!(app.expenses.len(), 1);

        let restarted = ShellContext::with_base_dir(CliMode::Script, dir.path().to_path_buf())
            .expect("stored config still loads");
        assert_eq!(restarted.config.data_file, None);
        assert_eq!(restarted.expenses.len(), 1);
    }

    #[test]
    fn switching_data_file_loads_the_other_book() {
        let dir = TempDir::new().unwrap();
        let app = process_script(
            dir.path().to_path_buf(),
            &["add Rent 1200 Housing", "config data_file other.json"],
        )
        .unwrap();

        assert_eq!(app.data_file, dir.path().join("other.json"));
        assert!(app.expenses.is_empty());
    }

    #[test]
    fn unbalanced_quotes_skip_only_that_line() {
        let dir = TempDir::new().unwrap();
        let app = process_script(
            dir.path().to_path_buf(),
            &["add \"Flat white 4.5 Food", "add Rent 1200 Housing"],
        )
        .unwrap();
        assert!(app.running);
        assert_eq!(app.expenses.len(), 1);
    }

    #[test]
    fn aliases_dispatch_and_exit_stops_the_shell() {
        let dir = TempDir::new().unwrap();
        let mut app = process_script(
            dir.path().to_path_buf(),
            &["config id_style sequential", "add Rent 1200 Housing", "rm exp-1"],
        )
        .unwrap();
        assert!(app.expenses.is_empty());

        assert_eq!(app.process_line("quit").unwrap(), LoopControl::Exit);
        assert!(!app.running);
    }

    #[test]
    fn unknown_command_keeps_running() {
        let dir = TempDir::new().unwrap();
        let app = process_script(dir.path().to_path_buf(), &["ad Rent 1200 Housing"]).unwrap();
        assert!(app.running);
        assert!(app.expenses.is_empty());
    }
}
