use crate::cli::core::{CommandResult, ShellContext};

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// What the line editor offers after a command word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Completion {
    #[default]
    Nothing,
    /// An expense id in the first argument.
    ExpenseId,
    /// An expense id, then `field=` assignments.
    ExpenseFields,
    /// A configuration key in the first argument.
    ConfigKey,
}

pub struct CommandEntry {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub usage: &'static str,
    pub completion: Completion,
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            aliases: &[],
            description,
            usage,
            completion: Completion::Nothing,
            handler,
        }
    }

    pub fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn completing(mut self, completion: Completion) -> Self {
        self.completion = completion;
        self
    }

    pub fn answers_to(&self, word: &str) -> bool {
        self.name == word || self.aliases.contains(&word)
    }

    /// Name followed by aliases.
    pub fn words(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(self.name).chain(self.aliases.iter().copied())
    }
}

/// The shell's command table. A handful of entries, so lookups scan.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `entry`, replacing an earlier entry with the same name.
    pub fn register(&mut self, entry: CommandEntry) {
        match self.entries.iter_mut().find(|known| known.name == entry.name) {
            Some(slot) => *slot = entry,
            None => self.entries.push(entry),
        }
    }

    /// Looks a command up by name or alias.
    pub fn get(&self, word: &str) -> Option<&CommandEntry> {
        self.entries.iter().find(|entry| entry.answers_to(word))
    }

    pub fn list(&self) -> impl Iterator<Item = &CommandEntry> + '_ {
        self.entries.iter()
    }

    /// Every word that dispatches to a command, aliases included.
    pub fn words(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().flat_map(CommandEntry::words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
        Ok(())
    }

    #[test]
    fn aliases_resolve_to_their_command() {
        let mut registry = CommandRegistry::new();
        let remove = CommandEntry::new("remove", "Delete", "remove <id>", noop).aliases(&["rm"]);
        registry.register(remove);

        assert_eq!(registry.get("rm").map(|entry| entry.name), Some("remove"));
        assert!(registry.get("delete").is_none());
        assert_eq!(registry.words().collect::<Vec<_>>(), vec!["remove", "rm"]);
    }

    #[test]
    fn re_registering_replaces_in_place() {
        let mut registry = CommandRegistry::new();
        registry.register(CommandEntry::new("list", "old", "list", noop));
        registry.register(CommandEntry::new("save", "Save", "save", noop));
        registry.register(
            CommandEntry::new("list", "new", "list", noop).completing(Completion::ExpenseId),
        );

        let names: Vec<_> = registry.list().map(|entry| entry.name).collect();
        assert_eq!(names, vec!["list", "save"]);
        let list = registry.get("list").unwrap();
        assert_eq!(list.description, "new");
        assert_eq!(list.completion, Completion::ExpenseId);
    }
}
