//! Field extraction from single statement lines: dates, amounts, receipt
//! numbers, and the leftover description text.
//!
//! Handled date shapes:
//!   2024-01-15 10:23:45     (M-Pesa full statement)
//!   15/01/2024 14:05        (day first; 2-digit years are 20xx)
//!   15-01-24
//!
//! Amounts must carry two decimals unless they use thousands separators:
//!   -300.00   1,700.00   KES 2,500.00   Ksh.50.00   (120.00)   +1,000
//! and have at most ten digits before the decimal point, as M-Pesa stores
//! them. Longer digit runs are not amounts.

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use rust_decimal::Decimal;
use tracing::debug;

use crate::types::AmountSign;

/// Whole-number digits an amount may carry
const MAX_WHOLE_DIGITS: usize = 10;

/// A date found on a line, with its byte span
#[derive(Debug, Clone, PartialEq)]
pub struct DateMatch {
    pub raw: String,
    pub timestamp: Option<NaiveDateTime>,
    pub start: usize,
    pub end: usize,
}

/// An amount found on a line, with its byte span
#[derive(Debug, Clone, PartialEq)]
pub struct AmountMatch {
    pub value: Decimal,
    pub sign: AmountSign,
    pub start: usize,
    pub end: usize,
}

/// Compiled line patterns shared by the statement parsers
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    iso_date: Regex,
    dmy_date: Regex,
    amount: Regex,
    reference: Regex,
    status: Regex,
    whitespace: Regex,
}

impl FieldExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            iso_date: Regex::new(concat!(
                r"\b(?P<date>\d{4}-\d{1,2}-\d{1,2})",
                r"(?:[ T]+(?P<time>\d{1,2}:\d{2}(?::\d{2})?))?"
            ))?,
            dmy_date: Regex::new(concat!(
                r"\b(?P<date>\d{1,2}[/-]\d{1,2}[/-](?:\d{4}|\d{2}))\b",
                r"(?:\s+(?P<time>\d{1,2}:\d{2}(?::\d{2})?(?:\s?[AaPp][Mm])?))?"
            ))?,
            amount: Regex::new(concat!(
                r"(?:^|[\s:=])(?P<open>\()?(?P<sign>[-+−])?\s?",
                r"(?:(?i:kshs|ksh|kes)\.?\s?)?(?P<sign2>[-+−])?",
                r"(?P<num>\d{1,3}(?:,\d{3})+(?:\.\d{2})?|\d{1,10}\.\d{2})\b(?P<close>\))?"
            ))?,
            reference: Regex::new(r"^\s*(?P<ref>[A-Z0-9]{10})\b")?,
            status: Regex::new(r"(?i)\bcompleted?\b")?,
            whitespace: Regex::new(r"\s+")?,
        })
    }

    /// First date on the line. ISO dates win over day/month/year ones.
    pub fn find_date(&self, line: &str) -> Option<DateMatch> {
        if let Some(caps) = self.iso_date.captures(line) {
            let whole = caps.get(0)?;
            let date = NaiveDate::parse_from_str(&caps["date"], "%Y-%m-%d").ok();
            return Some(DateMatch {
                raw: whole.as_str().trim().to_string(),
                timestamp: date.map(|d| d.and_time(parse_time(caps.name("time").map(|m| m.as_str())))),
                start: whole.start(),
                end: whole.end(),
            });
        }

        let caps = self.dmy_date.captures(line)?;
        let whole = caps.get(0)?;
        let date = parse_day_first(&caps["date"]);
        Some(DateMatch {
            raw: whole.as_str().trim().to_string(),
            timestamp: date.map(|d| d.and_time(parse_time(caps.name("time").map(|m| m.as_str())))),
            start: whole.start(),
            end: whole.end(),
        })
    }

    /// All amounts on the line, left to right
    pub fn find_amounts(&self, line: &str) -> Vec<AmountMatch> {
        self.amount
            .captures_iter(line)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let digits = caps["num"].replace(',', "");
                let whole_len = digits.split('.').next().map_or(0, str::len);
                if whole_len > MAX_WHOLE_DIGITS {
                    debug!(num = &caps["num"], "ignoring oversized amount");
                    return None;
                }
                let value: Decimal = digits.parse().ok()?;

                let marker = caps
                    .name("sign")
                    .or_else(|| caps.name("sign2"))
                    .map(|m| m.as_str());
                let parenthesized = caps.name("open").is_some() && caps.name("close").is_some();
                let sign = match marker {
                    Some("+") => AmountSign::Credit,
                    Some(_) => AmountSign::Debit,
                    None if parenthesized => AmountSign::Debit,
                    None => AmountSign::Unsigned,
                };

                Some(AmountMatch {
                    value,
                    sign,
                    start: whole.start(),
                    end: whole.end(),
                })
            })
            .collect()
    }

    /// Leading M-Pesa receipt number (10 upper-case letters and digits, mixed)
    pub fn find_reference(&self, line: &str) -> Option<(String, usize)> {
        let caps = self.reference.captures(line)?;
        let r = caps.name("ref")?;
        let s = r.as_str();
        let has_digit = s.chars().any(|c| c.is_ascii_digit());
        let has_alpha = s.chars().any(|c| c.is_ascii_alphabetic());
        if has_digit && has_alpha {
            Some((s.to_string(), r.end()))
        } else {
            None
        }
    }

    /// Collapse whitespace, drop status words and stray separators
    pub fn clean_description(&self, text: &str) -> String {
        let without_status = self.status.replace_all(text, " ");
        let collapsed = self.whitespace.replace_all(&without_status, " ");
        collapsed
            .trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '|' | ':' | ','))
            .to_string()
    }
}

/// `text` with the given byte spans blanked out
pub fn remove_spans(text: &str, spans: &[(usize, usize)]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for &(start, end) in spans {
        if start < cursor {
            continue;
        }
        out.push_str(&text[cursor..start]);
        out.push(' ');
        cursor = end;
    }
    out.push_str(&text[cursor..]);
    out
}

fn parse_day_first(s: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = s.split(['/', '-']).collect();
    if parts.len() != 3 {
        return None;
    }
    let a: u32 = parts[0].parse().ok()?;
    let b: u32 = parts[1].parse().ok()?;
    let mut year: i32 = parts[2].parse().ok()?;
    if parts[2].len() == 2 {
        year += 2000;
    }

    // day first; fall back to month first when that is the only valid reading
    NaiveDate::from_ymd_opt(year, b, a).or_else(|| NaiveDate::from_ymd_opt(year, a, b))
}

fn parse_time(s: Option<&str>) -> NaiveTime {
    let Some(s) = s else {
        return NaiveTime::MIN;
    };
    let s = s.trim().to_uppercase().replace(' ', "");
    for fmt in ["%H:%M:%S", "%H:%M", "%I:%M:%S%p", "%I:%M%p"] {
        if let Ok(t) = NaiveTime::parse_from_str(&s, fmt) {
            return t;
        }
    }
    NaiveTime::MIN
}
