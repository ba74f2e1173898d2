use std::{fs, path::Path};

use rust_decimal::Decimal;

use crate::assistant::{extract_or_empty, insights_or_default, mime_for_path, suggest_category_or_default};
use crate::cli::core::{
    parse_date_arg, report_persist, short_id, usage_error, CommandError, CommandResult,
    ParsedArgs, ShellContext,
};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::domain::{EnrichmentOutcome, TransactionDraft, TransactionKind};

const RECEIPT_USAGE: &str = "receipt <image path> [--merchant <name>] [--amount <value>] [--date YYYY-MM-DD] [--category <name>] [--type expense|income] [--description <text>] [--save]";
const SUGGEST_USAGE: &str = "suggest <merchant> [description]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "receipt",
            "Read a receipt image into a transaction draft (--save to record it)",
            RECEIPT_USAGE,
            cmd_receipt,
        ),
        CommandEntry::new(
            "suggest",
            "Ask the assistant for a one-word category",
            SUGGEST_USAGE,
            cmd_suggest,
        ),
        CommandEntry::new(
            "insights",
            "Ask the assistant for spending advice based on recent transactions",
            "insights",
            cmd_insights,
        ),
    ]
}

fn cmd_receipt(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["save"])?;
    let Some(raw_path) = parsed.positional(0) else {
        return Err(usage_error(RECEIPT_USAGE));
    };
    let path = Path::new(raw_path);
    let image = fs::read(path).map_err(|err| {
        CommandError::Message(format!("Could not read `{}`: {}", path.display(), err))
    })?;

    let mut draft = TransactionDraft::new(context.today());
    let ticket = draft.begin_enrichment();
    let extraction = extract_or_empty(context.assistant.as_ref(), &image, mime_for_path(path));
    if extraction.is_empty() {
        output::warning("No details could be read from the receipt.");
    } else if draft.apply_extraction(ticket, &extraction) == EnrichmentOutcome::Applied {
        output::success("Receipt read.");
    }
    apply_overrides(&mut draft, &parsed)?;

    print_draft(context, &draft);
    if !parsed.has("save") {
        output::hint("Re-run with --save to record this transaction.");
        return Ok(());
    }
    let mutation = context.manager.add_draft(&draft)?;
    output::success(format!("Transaction added [{}]", short_id(&mutation.value)));
    report_persist(&mutation.persisted);
    Ok(())
}

/// Fields given on the command line win over whatever the receipt yielded.
fn apply_overrides(draft: &mut TransactionDraft, parsed: &ParsedArgs) -> Result<(), CommandError> {
    if let Some(merchant) = parsed.option("merchant") {
        draft.set_merchant(merchant);
    }
    if let Some(amount) = parsed.option("amount") {
        draft.set_amount(amount);
    }
    if let Some(date) = parsed.option("date") {
        draft.set_date(parse_date_arg(date)?);
    }
    if let Some(category) = parsed.option("category") {
        draft.set_category(category);
    }
    if let Some(kind) = parsed.option("type") {
        draft.set_kind(kind.parse::<TransactionKind>()?);
    }
    if let Some(description) = parsed.option("description") {
        draft.set_description(description);
    }
    Ok(())
}

fn cmd_suggest(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((merchant, rest)) = args.split_first() else {
        return Err(usage_error(SUGGEST_USAGE));
    };
    let description = rest.join(" ");
    let description = Some(description.as_str()).filter(|text| !text.is_empty());
    let category = suggest_category_or_default(context.assistant.as_ref(), merchant, description);
    output::info(format!("Suggested category: {}", category));
    Ok(())
}

fn cmd_insights(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let transactions = context.manager.ledger().transactions();
    let text = insights_or_default(context.assistant.as_ref(), transactions);
    output::section("Insights");
    output::info(text);
    Ok(())
}

fn print_draft(context: &ShellContext, draft: &TransactionDraft) {
    output::section("Draft transaction");
    let amount = match draft.amount() {
        "" => "-".to_string(),
        raw => match raw.parse::<Decimal>() {
            Ok(value) => context.money.format(value),
            Err(_) => raw.to_string(),
        },
    };
    let rows = vec![
        vec!["Date".to_string(), draft.date().to_string()],
        vec!["Merchant".to_string(), or_dash(draft.merchant())],
        vec!["Amount".to_string(), amount],
        vec!["Category".to_string(), or_dash(draft.category())],
        vec!["Type".to_string(), draft.kind().to_string()],
        vec!["Description".to_string(), or_dash(draft.description())],
    ];
    output::table(&["Field", "Value"], &rows);
}

fn or_dash(value: &str) -> String {
    if value.trim().is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}
