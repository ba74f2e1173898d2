use chrono::NaiveDate;

use crate::cli::core::{
    parse_amount_arg, parse_date_arg, report_persist, resolve_id, short_id, usage_error,
    CommandError, CommandResult, ShellContext,
};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::presentation::{format_percent, goal_rows, progress_bar};

const USAGE: &str = "goal add <name> <target> [deadline YYYY-MM-DD]
goal remove <id>
goal list
goal set <id> <amount>
goal fund <id> <amount>
goal withdraw <id> <amount>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "goal",
        "Manage savings goals and move money in or out",
        USAGE,
        cmd_goal,
    )]
}

fn cmd_goal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = super::split_action(args, USAGE)?;
    match action.as_str() {
        "add" => add(context, rest),
        "remove" | "rm" | "delete" => remove(context, rest),
        "list" | "ls" => list(context),
        "set" | "fund" | "withdraw" => adjust(context, &action, rest),
        _ => Err(usage_error(USAGE)),
    }
}

fn add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (name, target, deadline) = match args {
        [name, target] => (name, target, None),
        [name, target, deadline] => (name, target, Some(parse_date_arg(deadline)?)),
        _ => return Err(usage_error(USAGE)),
    };
    let target = parse_amount_arg(target)?;
    let mutation = context.manager.add_goal(name, target, deadline)?;
    let color = context
        .manager
        .ledger()
        .goal(&mutation.value)
        .map(|goal| goal.color.to_string())
        .unwrap_or_default();
    output::success(format!(
        "Goal `{}` created with target {} ({}) [{}]",
        name.trim(),
        context.money.format(target),
        color,
        short_id(&mutation.value)
    ));
    report_persist(&mutation.persisted);
    Ok(())
}

fn remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(input) = args.first() else {
        return Err(usage_error(USAGE));
    };
    let Some(id) = goal_id(context, input)? else {
        output::warning(format!("No goal with id `{}`; nothing removed.", input));
        return Ok(());
    };
    let mutation = context.manager.remove_goal(&id);
    output::success(format!("Goal {} removed.", short_id(&id)));
    report_persist(&mutation.persisted);
    Ok(())
}

fn adjust(context: &mut ShellContext, action: &str, args: &[&str]) -> CommandResult {
    let [input, amount] = args else {
        return Err(usage_error(USAGE));
    };
    let Some(id) = goal_id(context, input)? else {
        output::warning(format!("No goal with id `{}`; nothing changed.", input));
        return Ok(());
    };
    let mutation = match action {
        "set" => {
            let amount = parse_amount_arg(amount)?;
            context.manager.update_goal_amount(&id, amount)?
        }
        "fund" => context.manager.add_funds(&id, amount)?,
        _ => context.manager.withdraw_funds(&id, amount)?,
    };
    if let (Some(saved), Some(goal)) = (mutation.value, context.manager.ledger().goal(&id)) {
        output::success(format!(
            "Goal `{}` now has {} of {} ({})",
            goal.name,
            context.money.format(saved),
            context.money.format(goal.target_amount),
            format_percent(goal.progress_percent())
        ));
    }
    report_persist(&mutation.persisted);
    Ok(())
}

fn list(context: &mut ShellContext) -> CommandResult {
    let rows = goal_rows(context.manager.ledger());
    output::section(format!("Savings goals ({})", rows.len()));
    if rows.is_empty() {
        output::info("  No goals yet. Add one with `goal add <name> <target>`.");
        return Ok(());
    }
    let today = context.today();
    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                short_id(&row.id).to_string(),
                row.name.clone(),
                context.money.format(row.current),
                context.money.format(row.target),
                progress_bar(row.bar_percent, 10),
                row.color.to_string(),
                deadline_label(row.deadline, today, row.complete),
            ]
        })
        .collect();
    output::table(
        &["Id", "Name", "Saved", "Target", "Progress", "Color", "Deadline"],
        &table,
    );
    Ok(())
}

fn goal_id(context: &ShellContext, input: &str) -> Result<Option<String>, CommandError> {
    Ok(resolve_id(context.manager.ledger().goals(), input)?.map(|goal| goal.id.clone()))
}

fn deadline_label(deadline: Option<NaiveDate>, today: NaiveDate, complete: bool) -> String {
    match deadline {
        None => "-".into(),
        Some(date) if complete => date.to_string(),
        Some(date) => {
            let days = (date - today).num_days();
            if days < 0 {
                format!("{} (overdue)", date)
            } else {
                format!("{} ({} days left)", date, days)
            }
        }
    }
}
