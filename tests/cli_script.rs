use std::path::Path;

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn cli(home: &Path, script: &str) -> assert_cmd::assert::Assert {
    Command::cargo_bin("smartspend_cli")
        .unwrap()
        .env("SMARTSPEND_CLI_SCRIPT", "1")
        .env("SMARTSPEND_HOME", home)
        .env("SMARTSPEND_TODAY", "2024-01-20")
        .env_remove("SMARTSPEND_API_KEY")
        .env_remove("RUST_LOG")
        .write_stdin(script.to_string())
        .assert()
}

#[test]
fn dashboard_reflects_recorded_activity() {
    let home = TempDir::new().unwrap();
    let script = "\
transaction add Grocer 50 --category Food --date 2024-01-05
transaction add Bakery 30 --category Food --date 2024-01-12
transaction add Employer 1000 --type income --date 2024-01-01
budget add Food 100
dashboard
exit
";
    cli(home.path(), script)
        .success()
        .stdout(contains("Transaction added: 2024-01-05 Grocer $50.00 (Food, expense)"))
        .stdout(contains("Total balance : $920.00"))
        .stdout(contains("Savings rate  : 92.0%"))
        .stdout(contains("Nearing limit - Food: $80.00 of $100.00 (80.0%)"))
        .stdout(contains("1/2024"));
}

#[test]
fn records_persist_between_sessions() {
    let home = TempDir::new().unwrap();
    cli(home.path(), "goal add Bike 400 2024-06-01\nbudget add Rent 900\n")
        .success()
        .stdout(contains("Goal `Bike` created with target $400.00 (indigo)"));

    assert!(home.path().join("data").join("goals.json").exists());

    cli(home.path(), "goal list\nbudget list\n")
        .success()
        .stdout(contains("Bike"))
        .stdout(contains("133 days left"))
        .stdout(contains("Rent"))
        .stdout(contains("on-track"));
}

#[test]
fn empty_ledger_reports_no_alerts() {
    let home = TempDir::new().unwrap();
    cli(home.path(), "alerts\n")
        .success()
        .stdout(contains("No alerts. All budgets are on track."));
}

#[test]
fn search_matches_merchant_or_category_ignoring_case() {
    let home = TempDir::new().unwrap();
    let script = "\
transaction add \"Corner Cafe\" 4.50 --category Dining
transaction add Metro 2.75 --category Transport
transaction search cafe
";
    cli(home.path(), script)
        .success()
        .stdout(contains("Search `cafe` (1 found)"))
        .stdout(contains("Corner Cafe"));
}

#[test]
fn offline_assistant_falls_back_to_defaults() {
    let home = TempDir::new().unwrap();
    cli(home.path(), "suggest Starbucks coffee\ninsights\n")
        .success()
        .stdout(contains("Suggested category: Uncategorized"))
        .stdout(contains("Unable to generate insights at this moment."));
}

#[test]
fn invalid_input_is_reported_and_the_session_continues() {
    let home = TempDir::new().unwrap();
    let script = "\
transaction add Grocer abc
budget add Food 0
dashbord
transaction remove zzzzzz
version
";
    cli(home.path(), script)
        .success()
        .stdout(contains("ERROR: Invalid input"))
        .stdout(contains("Suggestion: `dashboard`?"))
        .stdout(contains("No transaction with id `zzzzzz`; nothing removed."))
        .stdout(contains("SmartSpend"));
}

#[test]
fn config_changes_apply_immediately() {
    let home = TempDir::new().unwrap();
    let script = "\
config set currency eur
transaction add Bakery 3 --category Food
config show
";
    cli(home.path(), script)
        .success()
        .stdout(contains("currency updated."))
        .stdout(contains("€3.00"))
        .stdout(contains("EUR"));
    let saved = std::fs::read_to_string(home.path().join("config.json")).unwrap();
    assert!(saved.contains("\"EUR\""));
}

#[test]
fn receipt_fields_can_be_overridden_before_saving() {
    let home = TempDir::new().unwrap();
    let image = home.path().join("receipt.png");
    std::fs::write(&image, b"not really a png").unwrap();
    let script = format!(
        "receipt \"{path}\" --merchant Kiosk --amount 12.50 --date 2024-01-05 --category Food --description snacks --save
receipt \"{path}\" --merchant Kiosk --amount 0.001 --save
transaction list
",
        path = image.display()
    );
    cli(home.path(), &script)
        .success()
        .stdout(contains("No details could be read from the receipt."))
        .stdout(contains("Transaction added ["))
        .stdout(contains("ERROR: Invalid input"))
        .stdout(contains("Kiosk"))
        .stdout(contains("$12.50"));
}
