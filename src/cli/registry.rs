//! Command table for the shell: lookup, typo suggestions and the words
//! offered by tab completion.

use strsim::levenshtein;

use crate::cli::core::CommandResult;
use crate::cli::shell_context::ShellContext;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// Unknown input this close to a command name gets a "did you mean" hint.
const SUGGESTION_DISTANCE: usize = 3;

pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    /// One line per form; lines starting with the name and an action word
    /// (`goal fund <id> <amount>`) also drive action completion.
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }

    /// Action words in usage order, without duplicates.
    pub fn actions(&self) -> Vec<&'static str> {
        let mut actions = Vec::new();
        for line in self.usage.lines() {
            let mut words = line.split_whitespace();
            if words.next() != Some(self.name) {
                continue;
            }
            let action = words
                .next()
                .filter(|word| word.starts_with(|c: char| c.is_ascii_alphabetic()));
            if let Some(action) = action {
                if !actions.contains(&action) {
                    actions.push(action);
                }
            }
        }
        actions
    }
}

/// Commands in registration order. Re-registering a name replaces the entry in place.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entry: CommandEntry) {
        match self.entries.iter_mut().find(|known| known.name == entry.name) {
            Some(slot) => *slot = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.get(name).map(|entry| entry.handler)
    }

    /// Nearest command name by edit distance, if any is close enough.
    pub fn closest(&self, input: &str) -> Option<&'static str> {
        let input = input.to_lowercase();
        self.names()
            .map(|name| (levenshtein(name, &input), name))
            .min_by_key(|(distance, _)| *distance)
            .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
            .map(|(_, name)| name)
    }

    /// Words that may follow `typed` and start with `partial`. The first word
    /// completes to a command, the second to one of its actions, or to a
    /// command name after `help`.
    pub fn completions(&self, typed: &[&str], partial: &str) -> Vec<&'static str> {
        let partial = partial.to_lowercase();
        let pool: Vec<&'static str> = match typed {
            [] => self.names().collect(),
            [command] if command.eq_ignore_ascii_case("help") => self.names().collect(),
            [command] => self
                .get(&command.to_lowercase())
                .map(CommandEntry::actions)
                .unwrap_or_default(),
            _ => Vec::new(),
        };
        pool.into_iter()
            .filter(|word| word.starts_with(&partial))
            .collect()
    }
}
