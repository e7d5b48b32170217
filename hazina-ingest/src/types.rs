use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How the statement marked an amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmountSign {
    /// Leading `-` or wrapped in parentheses
    Debit,
    /// Leading `+`
    Credit,
    /// No marker; direction has to come from the description
    Unsigned,
}

/// One transaction block recovered from statement text, before categorization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    pub timestamp: Option<NaiveDateTime>,
    pub raw_date: String,
    /// Magnitude, never negative
    pub amount: Decimal,
    pub sign: AmountSign,
    pub description: String,
    pub reference: Option<String>,
    pub balance: Option<Decimal>,
}
