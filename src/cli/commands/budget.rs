use crate::cli::core::{
    parse_amount_arg, report_persist, resolve_id, short_id, usage_error, CommandResult,
    ShellContext,
};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::presentation::{budget_rows, format_percent, progress_bar};

const USAGE: &str = "budget add <category> <monthly limit>
budget remove <id>
budget list";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "budget",
        "Manage monthly category budgets",
        USAGE,
        cmd_budget,
    )]
}

fn cmd_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = super::split_action(args, USAGE)?;
    match action.as_str() {
        "add" => add(context, rest),
        "remove" | "rm" | "delete" => remove(context, rest),
        "list" | "ls" => list(context),
        _ => Err(usage_error(USAGE)),
    }
}

fn add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [category, limit] = args else {
        return Err(usage_error(USAGE));
    };
    let limit = parse_amount_arg(limit)?;
    let mutation = context.manager.add_budget(category, limit)?;
    output::success(format!(
        "Budget for {} set to {} per month [{}]",
        category.trim(),
        context.money.format(limit),
        short_id(&mutation.value)
    ));
    report_persist(&mutation.persisted);
    Ok(())
}

fn remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(input) = args.first() else {
        return Err(usage_error(USAGE));
    };
    let id = resolve_id(context.manager.ledger().budgets(), input)?.map(|b| b.id.clone());
    let Some(id) = id else {
        output::warning(format!("No budget with id `{}`; nothing removed.", input));
        return Ok(());
    };
    let mutation = context.manager.remove_budget(&id);
    output::success(format!("Budget {} removed.", short_id(&id)));
    report_persist(&mutation.persisted);
    Ok(())
}

fn list(context: &mut ShellContext) -> CommandResult {
    let rows = budget_rows(context.manager.ledger(), context.today())?;
    output::section(format!("Budgets ({})", rows.len()));
    if rows.is_empty() {
        output::info("  No budgets yet. Add one with `budget add <category> <limit>`.");
        return Ok(());
    }
    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                short_id(&row.id).to_string(),
                row.category.clone(),
                context.money.format(row.spent),
                context.money.format(row.limit),
                format_percent(row.percent),
                progress_bar(row.bar_percent, 10),
                row.state.to_string(),
            ]
        })
        .collect();
    output::table(
        &["Id", "Category", "Spent", "Limit", "Used", "Progress", "Status"],
        &table,
    );
    Ok(())
}
