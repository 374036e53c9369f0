use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::{CommandEntry, Completion};
use crate::config::IdStyle;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "Show or change settings",
        "config [currency|data_file|autosave|id_style <value>]",
        cmd_config,
    )
    .completing(Completion::ConfigKey)]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            show_config(context);
            Ok(())
        }
        [key, value] => set_config_value(context, &key.to_lowercase(), value),
        _ => Err(CommandError::InvalidArguments(
            "usage: config [key value]".into(),
        )),
    }
}

fn show_config(context: &ShellContext) {
    output::section("Configuration");
    for (key, value) in context.config.entries() {
        io::print_info(format!("  {:<10} {}", key, value));
    }
    io::print_info(format!("  Config file: {}", context.config_manager.path().display()));
    io::print_info(format!("  Data file:   {}", context.data_file.display()));
}

fn set_config_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let mut updated = context.config.clone();
    updated.set(key, value)?;
    let previous_file = context.data_file.clone();
    context.apply_config(updated)?;

    if context.data_file != previous_file {
        io::print_info(format!(
            "Using expense file {}.",
            context.data_file.display()
        ));
    }
    if context.config.id_style == IdStyle::Sequential && key == "id_style" {
        io::print_info("New expenses will receive sequential ids.");
    }
    io::print_success("Configuration updated.");
    Ok(())
}
