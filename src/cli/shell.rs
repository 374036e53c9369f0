use std::{
    io::{self, BufRead},
    path::PathBuf,
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use tracing::debug;

use crate::cli::core::{CliError, CliMode, LoopControl, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::registry::{CommandRegistry, Completion};
use crate::config::Config;
use crate::forms::FormField;
use crate::store::SharedExpenses;
use crate::utils::paths;

pub const SCRIPT_ENV: &str = "FLUXO_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    if std::env::var_os(SCRIPT_ENV).is_some() {
        colored::control::set_override(false);
        let mut context = ShellContext::new(CliMode::Script)?;
        return run_script(&mut context, io::stdin().lock());
    }
    let mut context = ShellContext::new(CliMode::Interactive)?;
    run_interactive(&mut context)
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<ExpenseHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(ExpenseHelper::new(
        &context.registry,
        context.expenses.clone(),
    )));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    let history = paths::history_file_in(context.config_manager.base_dir());
    if editor.load_history(&history).is_err() {
        debug!(path = %history.display(), "no shell history yet");
    }

    cli_io::print_info("Type `add` to record an expense or `help` for every command.");

    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                editor.add_history_entry(line).ok();
                match context.process_line(line) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => break,
                    Err(err) => context.report_error(err)?,
                }
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }

    save_history(&mut editor, history);
    Ok(())
}

fn save_history(editor: &mut Editor<ExpenseHelper, DefaultHistory>, path: PathBuf) {
    if let Err(err) = editor.save_history(&path) {
        cli_io::print_warning(format!(
            "Could not save shell history to {}: {}",
            path.display(),
            err
        ));
    }
}

/// Runs one command per line until input ends or a line asks to exit.
/// Failures are reported with their line number and do not stop the run.
fn run_script(context: &mut ShellContext, input: impl BufRead) -> Result<(), CliError> {
    for (index, line) in input.lines().enumerate() {
        let line = line?;
        match context.process_line(&line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => {
                cli_io::print_info(format!("line {}: {}", index + 1, line.trim()));
                context.report_error(err)?;
            }
        }
    }
    Ok(())
}

/// Tab completion for command words and their arguments.
struct ExpenseHelper {
    commands: Vec<(&'static str, Completion)>,
    expenses: SharedExpenses,
}

impl ExpenseHelper {
    fn new(registry: &CommandRegistry, expenses: SharedExpenses) -> Self {
        let commands = registry
            .list()
            .flat_map(|entry| entry.words().map(move |word| (word, entry.completion)))
            .collect();
        Self { commands, expenses }
    }

    fn candidates(&self, words: &[&str]) -> Vec<String> {
        let Some((command, args)) = words.split_first() else {
            return self.commands.iter().map(|(word, _)| word.to_string()).collect();
        };
        let completion = self
            .commands
            .iter()
            .find(|(word, _)| word.eq_ignore_ascii_case(command))
            .map(|(_, completion)| *completion)
            .unwrap_or_default();

        match (completion, args.len()) {
            (Completion::ExpenseId | Completion::ExpenseFields, 0) => self
                .expenses
                .with_book(|book| book.ids().map(ToString::to_string).collect()),
            (Completion::ExpenseFields, _) => FormField::ALL
                .iter()
                .map(|field| format!("{}=", field.key()))
                .collect(),
            (Completion::ConfigKey, 0) => Config::KEYS.iter().map(|key| key.to_string()).collect(),
            _ => Vec::new(),
        }
    }
}

impl Helper for ExpenseHelper {}

impl Completer for ExpenseHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let before = &line[..pos];
        let start = before
            .rfind(char::is_whitespace)
            .map_or(0, |idx| idx + 1);
        let partial = &before[start..];
        let words: Vec<&str> = before[..start].split_whitespace().collect();

        let matches = self
            .candidates(&words)
            .into_iter()
            .filter(|candidate| candidate.starts_with(partial))
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate,
            })
            .collect();
        Ok((start, matches))
    }
}

impl Hinter for ExpenseHelper {
    type Hint = String;
}

impl Highlighter for ExpenseHelper {}

impl Validator for ExpenseHelper {}
