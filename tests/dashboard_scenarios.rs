mod common;

use common::{date, dec, memory_manager};
use rust_decimal::Decimal;
use smartspend_core::{
    core::{
        errors::SpendError,
        ledger_manager::LedgerManager,
        services::{BudgetService, ServiceError, SummaryService},
    },
    domain::{AlertFeed, BudgetState, Transaction},
    presentation::{budget_rows, DashboardView},
    storage::MemoryStorage,
};

fn january_activity() -> Vec<Transaction> {
    vec![
        Transaction::expense(date(2024, 1, 5), "Grocer", dec(50), "Food"),
        Transaction::expense(date(2024, 1, 12), "Bakery", dec(30), "Food"),
        Transaction::income(date(2024, 1, 1), "Employer", dec(1000), ""),
    ]
}

#[test]
fn totals_and_savings_rate_for_january() {
    let (mut manager, _) = memory_manager();
    for txn in january_activity() {
        manager.add_transaction(txn).unwrap();
    }

    let stats = SummaryService::dashboard_stats(manager.ledger().transactions()).unwrap();
    assert_eq!(stats.total_income, dec(1000));
    assert_eq!(stats.total_expenses, dec(80));
    assert_eq!(stats.total_balance, dec(920));
    assert_eq!(stats.savings_rate, dec(92));
}

#[test]
fn budget_at_eighty_percent_is_nearing_and_alerted() {
    let (mut manager, _) = memory_manager();
    for txn in january_activity() {
        manager.add_transaction(txn).unwrap();
    }
    manager.add_budget("Food", dec(100)).unwrap();

    let view = DashboardView::build(manager.ledger(), date(2024, 1, 20)).unwrap();
    let alerts = view.alerts.alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].spent, dec(80));
    assert_eq!(alerts[0].percent, dec(80));
    assert_eq!(alerts[0].state, BudgetState::Nearing);
}

#[test]
fn budget_category_matches_regardless_of_case() {
    let (mut manager, _) = memory_manager();
    manager
        .add_transaction(Transaction::expense(date(2024, 3, 2), "Diner", dec(60), "Food"))
        .unwrap();
    manager.add_budget("food", dec(50)).unwrap();

    let statuses = BudgetService::statuses(
        manager.ledger().budgets(),
        manager.ledger().transactions(),
        date(2024, 3, 28),
    )
    .unwrap();
    assert_eq!(statuses[0].spent, dec(60));
    assert_eq!(statuses[0].state, BudgetState::Over);
}

#[test]
fn negative_goal_amount_clamps_to_zero() {
    let (mut manager, _) = memory_manager();
    let id = manager.add_goal("Vacation", dec(1000), None).unwrap().value;

    let mutation = manager.update_goal_amount(&id, dec(-50)).unwrap();
    assert_eq!(mutation.value, Some(Decimal::ZERO));
    assert_eq!(manager.ledger().goal(&id).unwrap().current_amount, Decimal::ZERO);
}

#[test]
fn empty_ledger_reports_zeros_and_no_alerts() {
    let (manager, _) = memory_manager();
    let view = DashboardView::build(manager.ledger(), date(2024, 1, 1)).unwrap();

    assert_eq!(view.stats.total_balance, Decimal::ZERO);
    assert_eq!(view.stats.total_income, Decimal::ZERO);
    assert_eq!(view.stats.total_expenses, Decimal::ZERO);
    assert_eq!(view.stats.savings_rate, Decimal::ZERO);
    assert!(view.categories.is_empty());
    assert!(view.trend.is_empty());
    assert_eq!(view.alerts, AlertFeed::NoAlerts);
}

#[test]
fn budget_spend_ignores_other_months_and_income() {
    let (mut manager, _) = memory_manager();
    manager
        .add_transaction(Transaction::expense(date(2024, 2, 28), "Grocer", dec(40), "Food"))
        .unwrap();
    manager
        .add_transaction(Transaction::expense(date(2023, 3, 10), "Grocer", dec(40), "Food"))
        .unwrap();
    manager
        .add_transaction(Transaction::income(date(2024, 3, 3), "Refund", dec(25), "Food"))
        .unwrap();
    manager
        .add_transaction(Transaction::expense(date(2024, 3, 4), "Grocer", dec(10), "FOOD"))
        .unwrap();

    let spent = BudgetService::spent_for_category(
        manager.ledger().transactions(),
        "food",
        date(2024, 3, 15),
    )
    .unwrap();
    assert_eq!(spent, dec(10));
}

#[test]
fn breakdown_keeps_six_largest_and_splits_case_variants() {
    let (mut manager, _) = memory_manager();
    let amounts = [
        ("Food", 10),
        ("food", 5),
        ("Rent", 900),
        ("Fun", 40),
        ("Travel", 300),
        ("Health", 60),
        ("Gifts", 20),
        ("Books", 15),
    ];
    for (category, amount) in amounts {
        manager
            .add_transaction(Transaction::expense(date(2024, 4, 1), "Shop", dec(amount), category))
            .unwrap();
    }

    let breakdown = SummaryService::category_breakdown(manager.ledger().transactions()).unwrap();
    let labels: Vec<&str> = breakdown.iter().map(|total| total.category.as_str()).collect();
    assert_eq!(labels, vec!["Rent", "Travel", "Health", "Fun", "Gifts", "Books"]);
    assert!(breakdown.windows(2).all(|pair| pair[0].amount >= pair[1].amount));
}

#[test]
fn trend_keeps_last_six_months_with_expenses() {
    let (mut manager, _) = memory_manager();
    for month in 1..=8 {
        manager
            .add_transaction(Transaction::expense(
                date(2024, month, 3),
                "Shop",
                dec(i64::from(month) * 10),
                "Misc",
            ))
            .unwrap();
    }
    manager
        .add_transaction(Transaction::income(date(2024, 9, 1), "Employer", dec(500), "Salary"))
        .unwrap();

    let trend = SummaryService::spending_trend(manager.ledger().transactions()).unwrap();
    let periods: Vec<&str> = trend.iter().map(|point| point.period.as_str()).collect();
    assert_eq!(periods, vec!["3/2024", "4/2024", "5/2024", "6/2024", "7/2024", "8/2024"]);
    assert_eq!(trend[5].amount, dec(80));
}

#[test]
fn balance_identity_holds_after_removals() {
    let (mut manager, _) = memory_manager();
    let mut ids = Vec::new();
    for txn in january_activity() {
        ids.push(manager.add_transaction(txn).unwrap().value);
    }
    assert!(manager.delete_transaction(&ids[0]).value);
    assert!(!manager.delete_transaction(&ids[0]).value);

    let stats = SummaryService::dashboard_stats(manager.ledger().transactions()).unwrap();
    assert_eq!(stats.total_balance, stats.total_income - stats.total_expenses);
    assert_eq!(stats.total_expenses, dec(30));
}

fn seeded_manager(entries: &[(&str, &str)]) -> LedgerManager {
    let storage = entries
        .iter()
        .fold(MemoryStorage::new(), |storage, (key, value)| storage.with_entry(key, value));
    LedgerManager::open(Box::new(storage))
}

#[test]
fn stored_totals_beyond_decimal_range_are_reported_not_panicked() {
    let manager = seeded_manager(&[(
        "transactions",
        r#"[
            {"id":"t1","date":"2024-01-05","merchant":"A","amount":5e28,
             "category":"Food","type":"expense"},
            {"id":"t2","date":"2024-01-06","merchant":"B","amount":5e28,
             "category":"Food","type":"expense"}
        ]"#,
    )]);
    assert!(manager.load_warnings().is_empty());
    assert_eq!(manager.ledger().transactions().len(), 2);

    let err = DashboardView::build(manager.ledger(), date(2024, 1, 20)).unwrap_err();
    assert!(matches!(err, ServiceError::Core(SpendError::Invariant(_))));
}

#[test]
fn stored_budget_with_tiny_limit_reports_overflow() {
    let manager = seeded_manager(&[
        (
            "transactions",
            r#"[{"id":"t1","date":"2024-01-05","merchant":"A","amount":10000000,
                 "category":"Food","type":"expense"}]"#,
        ),
        ("budgets", r#"[{"id":"b1","category":"Food","limit":1e-22}]"#),
    ]);
    assert!(manager.load_warnings().is_empty());

    let err = budget_rows(manager.ledger(), date(2024, 1, 20)).unwrap_err();
    assert!(matches!(err, ServiceError::Core(SpendError::Invariant(_))));
}
