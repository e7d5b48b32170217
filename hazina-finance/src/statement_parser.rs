//! Statement text → categorized [`StatementSummary`].

use anyhow::Result;
use hazina_core::{StatementSummary, TransactionRecord};
use hazina_ingest::{MpesaTextParser, RawTransaction};
use tracing::{info, warn};

use crate::category_rules::RuleTable;

/// Parses extracted statement text and classifies every transaction.
///
/// Construction compiles patterns and can fail; parsing cannot. Instances
/// hold no mutable state, so one parser can serve many statements at once.
#[derive(Debug, Clone)]
pub struct StatementParser {
    text: MpesaTextParser,
    rules: RuleTable,
}

impl StatementParser {
    pub fn new(rules: RuleTable) -> Result<Self> {
        Ok(Self {
            text: MpesaTextParser::new()?,
            rules,
        })
    }

    pub fn with_default_rules() -> Result<Self> {
        Self::new(RuleTable::builtin()?)
    }

    /// Build the summary for one statement. Unreadable text gives an empty
    /// summary; callers should report that as "no transactions found".
    pub fn parse(&self, text: &str) -> StatementSummary {
        let transactions: Vec<TransactionRecord> = self
            .text
            .parse(text)
            .into_iter()
            .map(|raw| self.classify(raw))
            .collect();

        let summary = StatementSummary::from_transactions(transactions);
        if summary.is_empty() {
            warn!(bytes = text.len(), "no transactions recognised in statement text");
        } else {
            info!(
                transactions = summary.transactions().len(),
                inflow = %summary.total_inflow(),
                outflow = %summary.total_outflow(),
                "parsed statement"
            );
        }
        summary
    }

    fn classify(&self, raw: RawTransaction) -> TransactionRecord {
        let direction = self.rules.direction(raw.sign, &raw.description);
        let category = self.rules.categorize(&raw.description);
        TransactionRecord {
            timestamp: raw.timestamp,
            raw_date: raw.raw_date,
            amount: raw.amount,
            direction,
            counterparty_description: raw.description,
            category,
            reference: raw.reference,
            balance: raw.balance,
        }
    }
}
