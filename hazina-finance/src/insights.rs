//! Spending insights derived from a statement summary: net position,
//! category shares, ranked callouts and the period the statement covers.

use chrono::{Datelike, NaiveDate};
use hazina_core::{Category, StatementSummary};
use rust_decimal::Decimal;
use serde::Serialize;

/// One category's outflow and its share of total outflow
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: Category,
    pub amount: Decimal,
    /// Percent of total outflow, one decimal place
    pub percent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingInsights {
    pub net_amount: Decimal,
    /// Every category, in category order
    pub shares: Vec<CategoryShare>,
    pub top_category: Option<Category>,
    /// "You spent KES 1,200.00 on betting", largest first
    pub callouts: Vec<String>,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    /// Calendar months touched by the statement, at least 1
    pub period_months: u32,
}

impl SpendingInsights {
    pub fn from_summary(summary: &StatementSummary, currency: &str) -> Self {
        let outflow = summary.total_outflow();

        let shares: Vec<CategoryShare> = Category::ALL
            .iter()
            .map(|&category| {
                let amount = summary.spent_on(category);
                let percent = if outflow.is_zero() {
                    Decimal::ZERO
                } else {
                    // ratio first: it is at most 1, so scaling cannot overflow
                    (amount / outflow * Decimal::ONE_HUNDRED).round_dp(1)
                };
                CategoryShare {
                    category,
                    amount,
                    percent,
                }
            })
            .collect();

        // stable sort keeps category order among equal amounts
        let mut ranked: Vec<&CategoryShare> = shares.iter().filter(|s| !s.amount.is_zero()).collect();
        ranked.sort_by(|a, b| b.amount.cmp(&a.amount));

        let top_category = ranked.first().map(|s| s.category);
        let callouts = ranked
            .iter()
            .filter(|s| s.category != Category::Other)
            .map(|s| {
                format!(
                    "You spent {} on {} ({:.1}% of spending)",
                    format_money(s.amount, currency),
                    s.category.label(),
                    s.percent
                )
            })
            .collect();

        let dates = summary.transactions().iter().filter_map(|t| t.date());
        let first_date = dates.clone().min();
        let last_date = dates.max();
        let period_months = match (first_date, last_date) {
            (Some(a), Some(b)) => months_touched(a, b),
            _ => 1,
        };

        Self {
            net_amount: summary.total_inflow() - outflow,
            shares,
            top_category,
            callouts,
            first_date,
            last_date,
            period_months,
        }
    }
}

fn months_touched(first: NaiveDate, last: NaiveDate) -> u32 {
    let index = |d: NaiveDate| d.year() * 12 + d.month0() as i32;
    (index(last) - index(first) + 1).max(1) as u32
}

/// "KES 1,234,567.89"; negative amounts as "KES -1,200.00"
pub fn format_money(amount: Decimal, currency: &str) -> String {
    let fixed = format!("{:.2}", amount.round_dp(2).abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };
    if currency.is_empty() {
        format!("{sign}{grouped}.{frac}")
    } else {
        format!("{currency} {sign}{grouped}.{frac}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hazina_core::{Direction, TransactionRecord};

    fn txn(date: (i32, u32, u32), amount: i64, direction: Direction, category: Category) -> TransactionRecord {
        TransactionRecord {
            timestamp: NaiveDate::from_ymd_opt(date.0, date.1, date.2).and_then(|d| d.and_hms_opt(0, 0, 0)),
            raw_date: String::new(),
            amount: Decimal::from(amount),
            direction,
            counterparty_description: String::new(),
            category,
            reference: None,
            balance: None,
        }
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(Decimal::new(123456789, 2), "KES"), "KES 1,234,567.89");
        assert_eq!(format_money(Decimal::from(500), "KES"), "KES 500.00");
        assert_eq!(format_money(Decimal::new(-12000, 1), ""), "-1,200.00");
        assert_eq!(format_money(Decimal::ZERO, "KES"), "KES 0.00");
    }

    #[test]
    fn test_insights_from_summary() {
        let summary = StatementSummary::from_transactions(vec![
            txn((2024, 1, 30), 5000, Direction::Inflow, Category::Other),
            txn((2024, 1, 31), 1200, Direction::Outflow, Category::Betting),
            txn((2024, 2, 2), 300, Direction::Outflow, Category::Airtime),
            txn((2024, 3, 1), 1500, Direction::Outflow, Category::Other),
        ]);
        let ins = SpendingInsights::from_summary(&summary, "KES");

        assert_eq!(ins.net_amount, Decimal::from(2000));
        assert_eq!(ins.top_category, Some(Category::Other));
        assert_eq!(
            ins.callouts,
            vec![
                "You spent KES 1,200.00 on betting (40.0% of spending)".to_string(),
                "You spent KES 300.00 on airtime (10.0% of spending)".to_string(),
            ]
        );
        let total_pct: Decimal = ins.shares.iter().map(|s| s.percent).sum();
        assert_eq!(total_pct, Decimal::ONE_HUNDRED);
        assert_eq!(ins.first_date, NaiveDate::from_ymd_opt(2024, 1, 30));
        assert_eq!(ins.last_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(ins.period_months, 3);
    }

    #[test]
    fn test_shares_of_very_large_totals() {
        let big = Decimal::from_str_exact("1000000000000000000000000000").unwrap();
        let summary = StatementSummary::from_transactions(vec![
            TransactionRecord {
                amount: big,
                ..txn((2024, 1, 3), 0, Direction::Outflow, Category::Betting)
            },
            TransactionRecord {
                amount: big,
                ..txn((2024, 1, 4), 0, Direction::Outflow, Category::Airtime)
            },
        ]);
        let ins = SpendingInsights::from_summary(&summary, "KES");
        let pct: Vec<_> = ins.shares.iter().map(|s| s.percent).collect();
        assert_eq!(pct[0], Decimal::new(500, 1));
        assert_eq!(pct[1], Decimal::new(500, 1));
        assert!(pct[2..].iter().all(|p| p.is_zero()));
        assert_eq!(ins.callouts.len(), 2);
    }

    #[test]
    fn test_insights_for_empty_summary() {
        let ins = SpendingInsights::from_summary(&StatementSummary::empty(), "KES");
        assert_eq!(ins.net_amount, Decimal::ZERO);
        assert_eq!(ins.top_category, None);
        assert!(ins.callouts.is_empty());
        assert!(ins.shares.iter().all(|s| s.percent.is_zero()));
        assert_eq!(ins.period_months, 1);
    }
}
