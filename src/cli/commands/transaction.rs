use crate::assistant::suggest_category_or_default;
use crate::cli::core::{
    parse_date_arg, report_persist, resolve_id, short_id, usage_error, CommandError,
    CommandResult, ParsedArgs, ShellContext,
};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::core::services::TransactionService;
use crate::domain::{EnrichmentOutcome, Transaction, TransactionDraft, TransactionKind};

const USAGE: &str = "transaction add <merchant> <amount> [--type expense|income] [--category <name>] [--date YYYY-MM-DD] [--description <text>] [--suggest]
transaction remove <id>
transaction list [count]
transaction search <text>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "transaction",
        "Add, remove, list, or search transactions",
        USAGE,
        cmd_transaction,
    )]
}

fn cmd_transaction(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = super::split_action(args, USAGE)?;
    match action.as_str() {
        "add" => add(context, rest),
        "remove" | "rm" | "delete" => remove(context, rest),
        "list" | "ls" => list(context, rest),
        "search" | "find" => search(context, rest),
        _ => Err(usage_error(USAGE)),
    }
}

fn add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["suggest"])?;
    let (Some(merchant), Some(amount)) = (parsed.positional(0), parsed.positional(1)) else {
        return Err(usage_error(USAGE));
    };

    let mut draft = TransactionDraft::new(context.today());
    draft.set_merchant(merchant);
    draft.set_amount(amount);
    if let Some(kind) = parsed.option("type") {
        draft.set_kind(kind.parse::<TransactionKind>()?);
    }
    if let Some(date) = parsed.option("date") {
        draft.set_date(parse_date_arg(date)?);
    }
    if let Some(description) = parsed.option("description") {
        draft.set_description(description);
    }
    match parsed.option("category") {
        Some(category) => draft.set_category(category),
        None if parsed.has("suggest") => {
            let ticket = draft.begin_enrichment();
            let description = Some(draft.description()).filter(|text| !text.is_empty());
            let suggestion =
                suggest_category_or_default(context.assistant.as_ref(), draft.merchant(), description);
            if draft.apply_category_suggestion(ticket, &suggestion) == EnrichmentOutcome::Applied {
                output::info(format!("Suggested category: {}", suggestion));
            }
        }
        None => {}
    }

    let mutation = context.manager.add_draft(&draft)?;
    let stored = context
        .manager
        .ledger()
        .transaction(&mutation.value)
        .map(|txn| describe(context, txn))
        .unwrap_or_default();
    output::success(format!("Transaction added: {} [{}]", stored, short_id(&mutation.value)));
    report_persist(&mutation.persisted);
    Ok(())
}

fn remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(input) = args.first() else {
        return Err(usage_error(USAGE));
    };
    let id = resolve_id(context.manager.ledger().transactions(), input)?.map(|txn| txn.id.clone());
    let Some(id) = id else {
        output::warning(format!("No transaction with id `{}`; nothing removed.", input));
        return Ok(());
    };
    let mutation = context.manager.delete_transaction(&id);
    output::success(format!("Transaction {} removed.", short_id(&id)));
    report_persist(&mutation.persisted);
    Ok(())
}

fn list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let limit = match args.first() {
        Some(raw) => Some(raw.parse::<usize>().map_err(|_| {
            CommandError::InvalidArguments(format!("`{}` is not a valid count", raw))
        })?),
        None => None,
    };
    let transactions = TransactionService::list(context.manager.ledger());
    let shown: Vec<&Transaction> = transactions
        .iter()
        .take(limit.unwrap_or(transactions.len()))
        .collect();
    output::section(format!("Transactions ({} of {})", shown.len(), transactions.len()));
    print_rows(context, &shown);
    Ok(())
}

fn search(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(usage_error(USAGE));
    }
    let needle = args.join(" ");
    let matches = TransactionService::search(context.manager.ledger().transactions(), &needle);
    output::section(format!("Search `{}` ({} found)", needle, matches.len()));
    print_rows(context, &matches);
    Ok(())
}

fn print_rows(context: &ShellContext, transactions: &[&Transaction]) {
    if transactions.is_empty() {
        output::info("  No transactions.");
        return;
    }
    let rows: Vec<Vec<String>> = transactions
        .iter()
        .map(|txn| {
            let amount = context.money.format(txn.signed_amount());
            vec![
                short_id(&txn.id).to_string(),
                txn.date.to_string(),
                txn.merchant.clone(),
                txn.category.clone(),
                amount,
                txn.description.clone().unwrap_or_default(),
            ]
        })
        .collect();
    output::table(
        &["Id", "Date", "Merchant", "Category", "Amount", "Description"],
        &rows,
    );
}

fn describe(context: &ShellContext, txn: &Transaction) -> String {
    format!(
        "{} {} {} ({}, {})",
        txn.date,
        txn.merchant,
        context.money.format(txn.amount),
        txn.category,
        txn.kind
    )
}
