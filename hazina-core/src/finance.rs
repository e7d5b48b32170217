//! Statement record types: categorized transactions and the per-statement summary

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Spending categories, declared in default rule priority order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Betting,
    Airtime,
    FulizaMshwari,
    BarsRestaurants,
    TillWithdrawal,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Betting,
        Category::Airtime,
        Category::FulizaMshwari,
        Category::BarsRestaurants,
        Category::TillWithdrawal,
        Category::Other,
    ];

    /// Stable identifier, identical to the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Betting => "BETTING",
            Category::Airtime => "AIRTIME",
            Category::FulizaMshwari => "FULIZA_MSHWARI",
            Category::BarsRestaurants => "BARS_RESTAURANTS",
            Category::TillWithdrawal => "TILL_WITHDRAWAL",
            Category::Other => "OTHER",
        }
    }

    /// Human label used in callouts ("you spent X on <label>")
    pub fn label(&self) -> &'static str {
        match self {
            Category::Betting => "betting",
            Category::Airtime => "airtime",
            Category::FulizaMshwari => "Fuliza & M-Shwari",
            Category::BarsRestaurants => "bars & restaurants",
            Category::TillWithdrawal => "till & paybill payments",
            Category::Other => "other spending",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Money direction relative to the statement owner
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Credit: money received
    Inflow,
    /// Debit: money spent or sent
    Outflow,
}

/// One transaction recovered from statement text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    /// Parsed date/time, absent when the statement's date text is ambiguous
    pub timestamp: Option<NaiveDateTime>,
    /// Date text exactly as it appeared
    pub raw_date: String,
    /// Magnitude, never negative
    pub amount: Decimal,
    pub direction: Direction,
    pub counterparty_description: String,
    pub category: Category,
    /// M-Pesa receipt number
    pub reference: Option<String>,
    /// Running balance when the row carries one
    pub balance: Option<Decimal>,
}

impl TransactionRecord {
    /// Negative for outflows, positive for inflows
    pub fn signed_amount(&self) -> Decimal {
        match self.direction {
            Direction::Inflow => self.amount,
            Direction::Outflow => -self.amount,
        }
    }

    pub fn is_inflow(&self) -> bool {
        self.direction == Direction::Inflow
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.timestamp.map(|ts| ts.date())
    }
}

/// Totals and transactions for one parsed statement.
///
/// Built only through [`StatementSummary::from_transactions`], so the
/// per-category totals always add up to `total_outflow`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatementSummary {
    total_spent_by_category: BTreeMap<Category, Decimal>,
    total_inflow: Decimal,
    total_outflow: Decimal,
    transactions: Vec<TransactionRecord>,
}

impl StatementSummary {
    /// Summary with zero totals and no transactions
    pub fn empty() -> Self {
        Self::from_transactions(Vec::new())
    }

    /// Accumulate totals over transactions kept in document order.
    ///
    /// A transaction whose amount would push a total past the `Decimal`
    /// range is left out of both the totals and the transaction list.
    pub fn from_transactions(transactions: Vec<TransactionRecord>) -> Self {
        let mut total_spent_by_category: BTreeMap<Category, Decimal> =
            Category::ALL.iter().map(|c| (*c, Decimal::ZERO)).collect();
        let mut total_inflow = Decimal::ZERO;
        let mut total_outflow = Decimal::ZERO;
        let mut kept = Vec::with_capacity(transactions.len());

        for txn in transactions {
            let added = match txn.direction {
                Direction::Inflow => match total_inflow.checked_add(txn.amount) {
                    Some(inflow) => {
                        total_inflow = inflow;
                        Some(())
                    }
                    None => None,
                },
                Direction::Outflow => {
                    let spent = total_spent_by_category
                        .get(&txn.category)
                        .copied()
                        .unwrap_or(Decimal::ZERO);
                    // both sums must fit before either is updated
                    match (
                        total_outflow.checked_add(txn.amount),
                        spent.checked_add(txn.amount),
                    ) {
                        (Some(outflow), Some(spent)) => {
                            total_outflow = outflow;
                            total_spent_by_category.insert(txn.category, spent);
                            Some(())
                        }
                        _ => None,
                    }
                }
            };

            match added {
                Some(()) => kept.push(txn),
                None => debug!(
                    raw_date = %txn.raw_date,
                    amount = %txn.amount,
                    "skipping transaction that overflows statement totals"
                ),
            }
        }

        Self {
            total_spent_by_category,
            total_inflow,
            total_outflow,
            transactions: kept,
        }
    }

    pub fn total_spent_by_category(&self) -> &BTreeMap<Category, Decimal> {
        &self.total_spent_by_category
    }

    /// Outflow total for a single category
    pub fn spent_on(&self, category: Category) -> Decimal {
        self.total_spent_by_category
            .get(&category)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn total_inflow(&self) -> Decimal {
        self.total_inflow
    }

    pub fn total_outflow(&self) -> Decimal {
        self.total_outflow
    }

    pub fn transactions(&self) -> &[TransactionRecord] {
        &self.transactions
    }

    /// True when nothing could be read from the statement
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

impl Default for StatementSummary {
    fn default() -> Self {
        Self::empty()
    }
}
