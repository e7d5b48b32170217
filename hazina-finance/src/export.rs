//! CSV export of parsed transactions

use anyhow::Result;
use hazina_core::StatementSummary;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    date: &'a str,
    timestamp: String,
    reference: &'a str,
    description: &'a str,
    category: &'static str,
    direction: &'static str,
    amount: String,
    signed_amount: String,
    balance: String,
}

/// Write one row per transaction, in document order, with a header row
pub fn write_transactions_csv<W: Write>(summary: &StatementSummary, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for t in summary.transactions() {
        wtr.serialize(CsvRow {
            date: &t.raw_date,
            timestamp: t
                .timestamp
                .map(|ts| ts.format("%Y-%m-%dT%H:%M:%S").to_string())
                .unwrap_or_default(),
            reference: t.reference.as_deref().unwrap_or(""),
            description: &t.counterparty_description,
            category: t.category.as_str(),
            direction: if t.is_inflow() { "in" } else { "out" },
            amount: format!("{:.2}", t.amount),
            signed_amount: format!("{:.2}", t.signed_amount()),
            balance: t.balance.map(|b| format!("{b:.2}")).unwrap_or_default(),
        })?;
    }
    wtr.flush()?;
    Ok(())
}
