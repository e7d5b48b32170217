use hazina_core::{Category, Direction};
use hazina_finance::{SpendingInsights, StatementParser};
use rust_decimal::Decimal;
use std::path::PathBuf;

fn statement_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("mpesa_statement.txt")
}

fn statement_text() -> String {
    std::fs::read_to_string(statement_path()).expect("fixture statement should exist")
}

fn kes(whole: i64) -> Decimal {
    Decimal::from(whole)
}

/// Real-layout regression: full M-Pesa export with headers, a wrapped row,
/// page furniture and one unreadable row.
#[test]
fn test_full_statement_totals() {
    let summary = StatementParser::with_default_rules().unwrap().parse(&statement_text());

    assert_eq!(summary.transactions().len(), 9);
    assert_eq!(summary.total_inflow(), kes(16_200));
    assert_eq!(summary.total_outflow(), kes(9_530));

    assert_eq!(summary.spent_on(Category::Betting), kes(700));
    assert_eq!(summary.spent_on(Category::Airtime), kes(100));
    assert_eq!(summary.spent_on(Category::FulizaMshwari), kes(2_030));
    assert_eq!(summary.spent_on(Category::BarsRestaurants), kes(1_450));
    assert_eq!(summary.spent_on(Category::TillWithdrawal), kes(3_000));
    assert_eq!(summary.spent_on(Category::Other), kes(2_250));
}

#[test]
fn test_category_totals_add_up_to_outflow() {
    let parser = StatementParser::with_default_rules().unwrap();
    let inputs = [
        statement_text(),
        String::new(),
        "15/01/2024 mystery -12.34\n16/01/2024 deposit 99.99\n17/01/2024 (45.10)\n".to_string(),
    ];
    for text in &inputs {
        let summary = parser.parse(text);
        let sum: Decimal = summary.total_spent_by_category().values().copied().sum();
        assert_eq!(sum, summary.total_outflow());
    }
}

#[test]
fn test_parsing_is_idempotent() {
    let parser = StatementParser::with_default_rules().unwrap();
    let text = statement_text();
    assert_eq!(parser.parse(&text), parser.parse(&text));

    // a fresh parser with the same rules gives the same answer
    let other = StatementParser::with_default_rules().unwrap();
    assert_eq!(parser.parse(&text), other.parse(&text));
}

#[test]
fn test_document_order_and_wrapped_row() {
    let summary = StatementParser::with_default_rules().unwrap().parse(&statement_text());
    let refs: Vec<_> = summary
        .transactions()
        .iter()
        .map(|t| t.reference.clone().unwrap_or_default())
        .collect();
    assert_eq!(refs.first().map(String::as_str), Some("SA12BC34DE"));
    assert_eq!(refs.last().map(String::as_str), Some("SA20BC34DM"));
    assert!(!refs.contains(&"SA21BC34DN".to_string()), "row without amount must be skipped");

    let pub_row = summary
        .transactions()
        .iter()
        .find(|t| t.reference.as_deref() == Some("SA15BC34DH"))
        .unwrap();
    assert_eq!(pub_row.counterparty_description, "Merchant Payment to 5432100 - TUSKER PUB KILIMANI");
    assert_eq!(pub_row.category, Category::BarsRestaurants);
    assert_eq!(pub_row.balance, Some(kes(12_950)));
}

#[test]
fn test_every_transaction_has_one_category() {
    let summary = StatementParser::with_default_rules().unwrap().parse(&statement_text());
    for t in summary.transactions() {
        assert!(Category::ALL.contains(&t.category));
    }
    let inflows: Vec<_> = summary
        .transactions()
        .iter()
        .filter(|t| t.direction == Direction::Inflow)
        .collect();
    assert_eq!(inflows.len(), 2);
}

#[test]
fn test_insights_over_statement() {
    let summary = StatementParser::with_default_rules().unwrap().parse(&statement_text());
    let insights = SpendingInsights::from_summary(&summary, "KES");

    assert_eq!(insights.net_amount, kes(6_670));
    assert_eq!(insights.top_category, Some(Category::TillWithdrawal));
    assert_eq!(insights.period_months, 3);
    assert_eq!(
        insights.callouts.first().map(String::as_str),
        Some("You spent KES 3,000.00 on till & paybill payments (31.5% of spending)")
    );
}

#[test]
fn test_summary_serializes_for_display() {
    let summary = StatementParser::with_default_rules()
        .unwrap()
        .parse("2024-03-01 12:00:00 Pay Bill to SportPesa -500.00 1,500.00\n");
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["total_spent_by_category"]["BETTING"], "500.00");
    assert_eq!(json["transactions"][0]["category"], "BETTING");
    assert_eq!(json["transactions"][0]["direction"], "outflow");
}
