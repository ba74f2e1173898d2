//! Line-oriented front end: an interactive rustyline prompt, or commands
//! piped on stdin when `SMARTSPEND_CLI_SCRIPT` is set.

use std::io::{self, BufRead};

use rustyline::{
    completion::Completer, error::ReadlineError, history::DefaultHistory, Context, Editor,
    Helper, Highlighter, Hinter, Validator,
};

use crate::cli::commands;
use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandRegistry;

/// Reads commands from stdin instead of an interactive prompt when set.
pub const SCRIPT_ENV: &str = "SMARTSPEND_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };
    if mode == CliMode::Script {
        colored::control::set_override(false);
    }

    let mut context = ShellContext::new(mode)?;
    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandCompleter, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandCompleter {
        registry: commands::registry(),
    }));

    output::info("SmartSpend. Type `help` for commands, `exit` to quit.");
    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    editor.add_history_entry(line.trim()).ok();
                }
                execute(context, &line);
            }
            Err(ReadlineError::Interrupted) => {
                output::info("Interrupted. Type `exit` to quit.");
            }
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

/// Runs stdin line by line. `#` starts a comment line.
fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim_start().starts_with('#') {
            continue;
        }
        execute(context, &line);
        if !context.running {
            break;
        }
    }
    Ok(())
}

/// Runs one input line and reports any failure; `exit` stops the session.
fn execute(context: &mut ShellContext, line: &str) {
    let outcome = tokenize(line).and_then(|tokens| {
        let Some((raw, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };
        let command = raw.to_lowercase();
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        tracing::debug!(%command, args = args.len(), "dispatching command");
        context.dispatch(&command, raw, &args)
    });
    match outcome {
        Ok(LoopControl::Continue) => {}
        Ok(LoopControl::Exit) => context.running = false,
        Err(err) => context.report_error(err),
    }
}

/// Shell-style word splitting, so quoted merchants stay one argument.
pub(crate) fn tokenize(line: &str) -> Result<Vec<String>, CommandError> {
    shell_words::split(line)
        .map_err(|err| CommandError::InvalidArguments(format!("Could not read that line: {}", err)))
}

#[derive(Helper, Hinter, Highlighter, Validator)]
struct CommandCompleter {
    registry: CommandRegistry,
}

impl Completer for CommandCompleter {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        Ok(completion_candidates(&self.registry, &line[..pos]))
    }
}

/// Replacement start and candidates for the word ending at the cursor.
fn completion_candidates(registry: &CommandRegistry, before_cursor: &str) -> (usize, Vec<String>) {
    let partial = before_cursor
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or("");
    let start = before_cursor.len() - partial.len();
    let typed: Vec<&str> = before_cursor[..start].split_whitespace().collect();
    let candidates = registry
        .completions(&typed, partial)
        .into_iter()
        .map(String::from)
        .collect();
    (start, candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_arguments_stay_together() {
        let tokens = tokenize(r#"transaction add "Corner Shop" 12.50"#).unwrap();
        assert_eq!(tokens, vec!["transaction", "add", "Corner Shop", "12.50"]);
        assert!(matches!(
            tokenize(r#"goal add "unterminated"#),
            Err(CommandError::InvalidArguments(_))
        ));
    }

    #[test]
    fn completes_command_names_then_actions() {
        let registry = commands::registry();
        assert_eq!(
            completion_candidates(&registry, "bu"),
            (0, vec!["budget".to_string()])
        );
        assert_eq!(
            completion_candidates(&registry, "goal f"),
            (5, vec!["fund".to_string()])
        );
        assert_eq!(
            completion_candidates(&registry, "  transaction re"),
            (14, vec!["remove".to_string()])
        );
        assert_eq!(
            completion_candidates(&registry, "help tr"),
            (5, vec!["transaction".to_string()])
        );
    }

    #[test]
    fn arguments_past_the_action_get_no_candidates() {
        let registry = commands::registry();
        assert_eq!(completion_candidates(&registry, "goal fund "), (10, Vec::new()));
        assert_eq!(completion_candidates(&registry, "nonsense a"), (9, Vec::new()));
    }
}
