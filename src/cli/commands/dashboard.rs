use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::domain::{AlertFeed, BudgetState, BudgetStatus};
use crate::presentation::{format_percent, DashboardView, MoneyFormat};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "dashboard",
            "Show balance, savings rate, category breakdown, trend, and alerts",
            "dashboard",
            cmd_dashboard,
        ),
        CommandEntry::new(
            "alerts",
            "List budgets at or above 80% of their limit this month",
            "alerts",
            cmd_alerts,
        ),
    ]
}

fn cmd_dashboard(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let view = DashboardView::build(context.manager.ledger(), context.today())?;
    let money = &context.money;

    output::section("Dashboard");
    output::info(format!("  Total balance : {}", money.format(view.stats.total_balance)));
    output::info(format!("  Income        : {}", money.format(view.stats.total_income)));
    output::info(format!("  Expenses      : {}", money.format(view.stats.total_expenses)));
    output::info(format!("  Savings rate  : {}", format_percent(view.stats.savings_rate)));

    output::section("Spending by category");
    if view.categories.is_empty() {
        output::info("  No expenses recorded yet.");
    } else {
        let rows: Vec<Vec<String>> = view
            .categories
            .iter()
            .map(|slice| {
                vec![
                    slice.label.clone(),
                    money.format(slice.amount),
                    slice.color.to_string(),
                ]
            })
            .collect();
        output::table(&["Category", "Amount", "Color"], &rows);
    }

    output::section("Monthly spending");
    if view.trend.is_empty() {
        output::info("  No expenses recorded yet.");
    } else {
        let rows: Vec<Vec<String>> = view
            .trend
            .iter()
            .map(|point| vec![point.period.clone(), money.format(point.amount)])
            .collect();
        output::table(&["Month", "Spent"], &rows);
    }

    output::section("Budget alerts");
    print_alerts(&view.alerts, money);
    Ok(())
}

fn cmd_alerts(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let view = DashboardView::build(context.manager.ledger(), context.today())?;
    output::section("Budget alerts");
    print_alerts(&view.alerts, &context.money);
    Ok(())
}

fn print_alerts(feed: &AlertFeed, money: &MoneyFormat) {
    match feed {
        AlertFeed::NoAlerts => output::info("  No alerts. All budgets are on track."),
        AlertFeed::Alerts(statuses) => {
            for status in statuses {
                print_alert(status, money);
            }
        }
    }
}

fn print_alert(status: &BudgetStatus, money: &MoneyFormat) {
    let line = format!(
        "{}: {} of {} ({})",
        status.budget.category,
        money.format(status.spent),
        money.format(status.budget.limit),
        format_percent(status.percent)
    );
    match status.state {
        BudgetState::Over => output::error(format!("Over budget - {}", line)),
        _ => output::warning(format!("Nearing limit - {}", line)),
    }
}
