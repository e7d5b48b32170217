//! M-Pesa statement text parser
//!
//! Works on text already extracted from the PDF. Typical rows:
//!   QFT4Z8K2LM 2024-01-15 10:23:45 Customer Transfer to 0712XXX456 - JOHN DOE Completed -300.00 1,700.00
//!   15/01/2024 Airtime Purchase 50.00
//!
//! A line carrying a date opens a new transaction block. Lines without a
//! date continue the open block until its amount has been seen, so wrapped
//! descriptions and amounts printed on the following line are picked up.
//! Text before the first date (statement headers) is ignored, and a block
//! that never yields an amount is dropped.

use anyhow::Result;
use chrono::NaiveDateTime;
use regex::{RegexSet, RegexSetBuilder};
use rust_decimal::Decimal;
use tracing::debug;

use super::fields::{remove_spans, AmountMatch, FieldExtractor};
use crate::types::{AmountSign, RawTransaction};

/// Whole page-layout lines (headers, footers, summary totals). Anchored on
/// the layout text itself so merchant names such as "TotalEnergies" or
/// "Pagemart" on a wrapped line are kept.
const PAGE_LAYOUT: &[&str] = &[
    r"^page\s+\d+(?:\s+of\s+\d+)?\s*$",
    r"^statement\s+period\b",
    r"^date\s+of\s+statement\b",
    r"^request\s+date\b",
    r"^receipt\s+no\b",
    r"^disclaimer\b",
    r"^total\s*:",
    r"^total\s+(?:paid\s+in|paid\s+out|withdrawn)\b",
];

#[derive(Debug)]
struct OpenBlock {
    line_no: usize,
    raw_date: String,
    timestamp: Option<NaiveDateTime>,
    reference: Option<String>,
    description: Vec<String>,
    amount: Option<(Decimal, AmountSign)>,
    balance: Option<Decimal>,
}

impl OpenBlock {
    fn into_transaction(self) -> Option<RawTransaction> {
        let Some((amount, sign)) = self.amount else {
            debug!(line = self.line_no, raw_date = %self.raw_date, "skipping block without an amount");
            return None;
        };
        Some(RawTransaction {
            timestamp: self.timestamp,
            raw_date: self.raw_date,
            amount,
            sign,
            description: self.description.join(" "),
            reference: self.reference,
            balance: self.balance,
        })
    }
}

/// Parser for M-Pesa (and similar line-per-transaction) statement text
#[derive(Debug, Clone)]
pub struct MpesaTextParser {
    fields: FieldExtractor,
    page_layout: RegexSet,
}

impl MpesaTextParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            fields: FieldExtractor::new()?,
            page_layout: RegexSetBuilder::new(PAGE_LAYOUT)
                .case_insensitive(true)
                .build()?,
        })
    }

    /// Recover transaction blocks in document order. Never fails: text that
    /// does not look like a statement simply yields no transactions.
    pub fn parse(&self, text: &str) -> Vec<RawTransaction> {
        let mut out = Vec::new();
        let mut open: Option<OpenBlock> = None;

        for (idx, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || self.page_layout.is_match(line) {
                continue;
            }

            let mut rest = line.to_string();
            if let Some(date) = self.fields.find_date(line) {
                if let Some(block) = open.take() {
                    out.extend(block.into_transaction());
                }

                let mut reference = None;
                let mut spans = vec![(date.start, date.end)];
                if let Some((r, end)) = self.fields.find_reference(line) {
                    if end <= date.start {
                        spans.insert(0, (0, end));
                        reference = Some(r);
                    }
                }
                rest = remove_spans(line, &spans);

                open = Some(OpenBlock {
                    line_no: idx + 1,
                    raw_date: date.raw,
                    timestamp: date.timestamp,
                    reference,
                    description: Vec::new(),
                    amount: None,
                    balance: None,
                });
            }

            let Some(block) = open.as_mut() else {
                continue;
            };
            if block.amount.is_some() {
                // trailing lines after the amount belong to no block
                continue;
            }

            let amounts = self.fields.find_amounts(&rest);
            let spans: Vec<_> = amounts.iter().map(|a| (a.start, a.end)).collect();
            let text = self.fields.clean_description(&remove_spans(&rest, &spans));
            if !text.is_empty() {
                block.description.push(text);
            }

            if let Some((amount, balance)) = pick_amount(&amounts) {
                block.amount = Some((amount.value, amount.sign));
                block.balance = balance;
            }
        }

        if let Some(block) = open.take() {
            out.extend(block.into_transaction());
        }

        debug!(count = out.len(), "recovered statement transactions");
        out
    }
}

/// Choose the transaction amount and optional running balance from the
/// amounts on one line. The last of several amounts is the balance; with
/// paid-in and withdrawn columns both printed, the first non-zero wins.
fn pick_amount(amounts: &[AmountMatch]) -> Option<(&AmountMatch, Option<Decimal>)> {
    match amounts {
        [] => None,
        [only] => Some((only, None)),
        [head @ .., last] => {
            let amount = head
                .iter()
                .find(|a| !a.value.is_zero())
                .unwrap_or(&head[0]);
            Some((amount, Some(last.value)))
        }
    }
}
