use crate::cli::core::{usage_error, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::config::Config;

const USAGE: &str = "config show
config set <key> <value>
config keys";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "Show or change settings",
        USAGE,
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = super::split_action(args, USAGE)?;
    match action.as_str() {
        "show" => show(context),
        "set" => set(context, rest),
        "keys" => {
            output::info(Config::KEYS.join(", "));
            Ok(())
        }
        _ => Err(usage_error(USAGE)),
    }
}

fn show(context: &ShellContext) -> CommandResult {
    output::section(format!("Config ({})", context.config_manager.path().display()));
    let rows: Vec<Vec<String>> = context
        .config
        .entries()
        .into_iter()
        .map(|(key, value)| vec![key.to_string(), value])
        .collect();
    output::table(&["Key", "Value"], &rows);
    Ok(())
}

fn set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((key, value)) = args.split_first() else {
        return Err(usage_error(USAGE));
    };
    let value = value.join(" ");
    let mut config = context.config.clone();
    config.set_value(key, &value)?;
    context.apply_config(config)?;
    if *key == "data_dir" {
        output::hint("The new data directory is used the next time the shell starts.");
    }
    output::success(format!("{} updated.", key));
    Ok(())
}
