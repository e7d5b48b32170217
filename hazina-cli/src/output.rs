//! Rendering parsed statements for the terminal

use hazina_core::StatementSummary;
use hazina_finance::{format_money, SpendingInsights};
use serde::Serialize;
use std::fmt::Write;

/// One parsed input file
#[derive(Debug, Serialize)]
pub struct StatementReport {
    pub source: String,
    pub summary: StatementSummary,
    pub insights: SpendingInsights,
}

pub fn render_table(report: &StatementReport, currency: &str) -> String {
    let mut s = String::new();
    let summary = &report.summary;
    let insights = &report.insights;

    let _ = writeln!(s, "== {} ==", report.source);
    if summary.is_empty() {
        let _ = writeln!(
            s,
            "We couldn't read any transactions from this statement. \
             Make sure it is an M-Pesa statement exported as text."
        );
        return s;
    }

    let period = match (insights.first_date, insights.last_date) {
        (Some(a), Some(b)) => format!("{a} to {b} ({} month(s))", insights.period_months),
        _ => "unknown".to_string(),
    };
    let _ = writeln!(s, "Transactions: {}", summary.transactions().len());
    let _ = writeln!(s, "Period:       {period}");
    let _ = writeln!(s, "Money in:     {}", format_money(summary.total_inflow(), currency));
    let _ = writeln!(s, "Money out:    {}", format_money(summary.total_outflow(), currency));
    let _ = writeln!(s, "Net:          {}", format_money(insights.net_amount, currency));
    let _ = writeln!(s);

    let _ = writeln!(s, "{:<18} {:>18} {:>7}", "CATEGORY", "SPENT", "SHARE");
    for share in &insights.shares {
        let _ = writeln!(
            s,
            "{:<18} {:>18} {:>6.1}%",
            share.category.as_str(),
            format_money(share.amount, currency),
            share.percent
        );
    }

    if !insights.callouts.is_empty() {
        let _ = writeln!(s);
        for c in &insights.callouts {
            let _ = writeln!(s, "- {c}");
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use hazina_finance::StatementParser;

    fn report(text: &str) -> StatementReport {
        let summary = StatementParser::with_default_rules().unwrap().parse(text);
        let insights = SpendingInsights::from_summary(&summary, "KES");
        StatementReport {
            source: "jan.txt".to_string(),
            summary,
            insights,
        }
    }

    #[test]
    fn test_table_lists_every_category() {
        let out = render_table(
            &report("2024-01-03 12:10:00 Pay Bill to SPORTPESA -500.00 14,500.00\n"),
            "KES",
        );
        assert!(out.starts_with("== jan.txt ==\n"));
        assert!(out.contains("Money out:    KES 500.00"));
        for name in ["BETTING", "AIRTIME", "FULIZA_MSHWARI", "BARS_RESTAURANTS", "TILL_WITHDRAWAL", "OTHER"] {
            assert!(out.contains(name), "missing {name} in\n{out}");
        }
        assert!(out.contains("- You spent KES 500.00 on betting (100.0% of spending)"));
    }

    #[test]
    fn test_empty_statement_message() {
        let out = render_table(&report("not a statement"), "KES");
        assert!(out.contains("couldn't read any transactions"));
        assert!(!out.contains("CATEGORY"));
    }

    #[test]
    fn test_report_serializes() {
        let json = serde_json::to_value(report("15/01/2024 Airtime -50.00\n")).unwrap();
        assert_eq!(json["source"], "jan.txt");
        assert_eq!(json["insights"]["top_category"], "AIRTIME");
        assert_eq!(json["summary"]["total_outflow"], "50.00");
    }
}
