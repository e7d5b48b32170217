//! Savings helpers: target calculator and the daily check-in streak.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SavingsError {
    #[error("saving amount must be at least 0.01, got {0}")]
    AmountTooSmall(Decimal),
    #[error("target and monthly amount must both be greater than zero")]
    NotPositive,
    #[error("amounts are too large to calculate with")]
    Overflow,
}

/// Amounts needed to close the gap to a savings target
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SavingsPlan {
    pub remaining: Decimal,
    pub months: Decimal,
    pub days: Decimal,
    pub weekly: Decimal,
    pub daily: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CalculatorOutcome {
    AlreadyReached,
    Plan(SavingsPlan),
}

/// Months, days and per-period amounts to reach `target` from `current`
/// at `monthly` per month. A month counts as 30 days and 4 weeks.
///
/// Both `target` and `monthly` must be positive.
pub fn savings_plan(
    target: Decimal,
    current: Decimal,
    monthly: Decimal,
) -> Result<CalculatorOutcome, SavingsError> {
    if target <= Decimal::ZERO || monthly <= Decimal::ZERO {
        return Err(SavingsError::NotPositive);
    }

    let remaining = target.checked_sub(current).ok_or(SavingsError::Overflow)?;
    if remaining <= Decimal::ZERO {
        return Ok(CalculatorOutcome::AlreadyReached);
    }

    let months = remaining.checked_div(monthly).ok_or(SavingsError::Overflow)?;
    let days = months.checked_mul(Decimal::from(30)).ok_or(SavingsError::Overflow)?;
    Ok(CalculatorOutcome::Plan(SavingsPlan {
        remaining,
        months,
        days,
        weekly: monthly / Decimal::from(4),
        daily: monthly / Decimal::from(30),
    }))
}

/// What a check-in did to the streak
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckIn {
    Started,
    Extended,
    AlreadyCheckedIn,
    Reset,
}

/// Consecutive-day check-in streak
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub current: u32,
    pub longest: u32,
    pub last_checkin: Option<NaiveDate>,
}

impl Streak {
    pub fn check_in(&mut self, today: NaiveDate) -> CheckIn {
        let outcome = match self.last_checkin {
            None => {
                self.current = 1;
                CheckIn::Started
            }
            Some(last) => match (today - last).num_days() {
                1 => {
                    self.current += 1;
                    CheckIn::Extended
                }
                d if d > 1 => {
                    self.current = 1;
                    CheckIn::Reset
                }
                // same day, or a clock that went backwards
                _ => return CheckIn::AlreadyCheckedIn,
            },
        };

        self.last_checkin = Some(today);
        self.longest = self.longest.max(self.current);
        outcome
    }
}

/// One day's saving; a day holds at most one entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySaving {
    pub date: NaiveDate,
    pub amount: Decimal,
    #[serde(default)]
    pub note: String,
}

/// File-backed savings history with its streak
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavingsLog {
    #[serde(default)]
    pub entries: Vec<DailySaving>,
    #[serde(default)]
    pub streak: Streak,
}

impl SavingsLog {
    /// Record a saving for `date`. Repeated savings on the same day are
    /// added to that day's entry; a non-empty note replaces the old one.
    pub fn record(&mut self, date: NaiveDate, amount: Decimal, note: &str) -> Result<CheckIn, SavingsError> {
        if amount < Decimal::new(1, 2) {
            return Err(SavingsError::AmountTooSmall(amount));
        }

        // the log total must stay representable too
        self.total_saved().checked_add(amount).ok_or(SavingsError::Overflow)?;

        match self.entries.iter_mut().find(|e| e.date == date) {
            Some(existing) => {
                existing.amount += amount;
                if !note.trim().is_empty() {
                    existing.note = note.trim().to_string();
                }
            }
            None => {
                self.entries.push(DailySaving {
                    date,
                    amount,
                    note: note.trim().to_string(),
                });
                self.entries.sort_by(|a, b| b.date.cmp(&a.date));
            }
        }

        let outcome = self.streak.check_in(date);
        debug!(%date, %amount, streak = self.streak.current, "recorded saving");
        Ok(outcome)
    }

    pub fn total_saved(&self) -> Decimal {
        self.entries
            .iter()
            .fold(Decimal::ZERO, |acc, e| acc.saturating_add(e.amount))
    }

    pub fn saved_on(&self, date: NaiveDate) -> Option<Decimal> {
        self.entries.iter().find(|e| e.date == date).map(|e| e.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_plan_for_remaining_gap() {
        let out = savings_plan(Decimal::from(12000), Decimal::from(2000), Decimal::from(2000)).unwrap();
        let CalculatorOutcome::Plan(plan) = out else {
            panic!("expected a plan, got {out:?}");
        };
        assert_eq!(plan.remaining, Decimal::from(10000));
        assert_eq!(plan.months, Decimal::from(5));
        assert_eq!(plan.days, Decimal::from(150));
        assert_eq!(plan.weekly, Decimal::from(500));
        assert_eq!(plan.daily.round_dp(2), Decimal::new(6667, 2));
    }

    #[test]
    fn test_plan_already_reached() {
        let out = savings_plan(Decimal::from(5000), Decimal::from(5000), Decimal::from(100));
        assert_eq!(out, Ok(CalculatorOutcome::AlreadyReached));
    }

    #[test]
    fn test_plan_rejects_non_positive_inputs() {
        assert_eq!(
            savings_plan(Decimal::ZERO, Decimal::ZERO, Decimal::from(100)),
            Err(SavingsError::NotPositive)
        );
        assert_eq!(
            savings_plan(Decimal::from(100), Decimal::ZERO, Decimal::ZERO),
            Err(SavingsError::NotPositive)
        );
    }

    #[test]
    fn test_plan_with_huge_target_is_an_error() {
        let target = Decimal::from_str_exact("10000000000000000000000000000").unwrap();
        assert_eq!(
            savings_plan(target, Decimal::ZERO, Decimal::new(1, 2)),
            Err(SavingsError::Overflow)
        );
        assert_eq!(
            savings_plan(Decimal::MAX, Decimal::MIN, Decimal::ONE),
            Err(SavingsError::Overflow)
        );
    }

    #[test]
    fn test_streak_progression() {
        let mut s = Streak::default();
        assert_eq!(s.check_in(d(2026, 3, 1)), CheckIn::Started);
        assert_eq!(s.check_in(d(2026, 3, 2)), CheckIn::Extended);
        assert_eq!(s.check_in(d(2026, 3, 2)), CheckIn::AlreadyCheckedIn);
        assert_eq!(s.current, 2);
        assert_eq!(s.check_in(d(2026, 3, 5)), CheckIn::Reset);
        assert_eq!(s.current, 1);
        assert_eq!(s.longest, 2);
    }

    #[test]
    fn test_log_merges_same_day() {
        let mut log = SavingsLog::default();
        log.record(d(2026, 3, 1), Decimal::from(100), "lunch skipped").unwrap();
        log.record(d(2026, 3, 1), Decimal::from(50), "").unwrap();
        log.record(d(2026, 3, 2), Decimal::from(200), "").unwrap();

        assert_eq!(log.entries.len(), 2);
        assert_eq!(log.saved_on(d(2026, 3, 1)), Some(Decimal::from(150)));
        assert_eq!(log.entries[1].note, "lunch skipped");
        assert_eq!(log.total_saved(), Decimal::from(350));
        assert_eq!(log.streak.current, 2);
        // newest first
        assert_eq!(log.entries[0].date, d(2026, 3, 2));
    }

    #[test]
    fn test_log_rejects_tiny_amounts() {
        let mut log = SavingsLog::default();
        let err = log.record(d(2026, 3, 1), Decimal::ZERO, "").unwrap_err();
        assert_eq!(err, SavingsError::AmountTooSmall(Decimal::ZERO));
        assert!(log.entries.is_empty());
        assert_eq!(log.streak, Streak::default());
    }

    #[test]
    fn test_log_refuses_savings_past_decimal_range() {
        let mut log = SavingsLog::default();
        log.record(d(2026, 3, 1), Decimal::MAX, "").unwrap();
        let err = log.record(d(2026, 3, 2), Decimal::ONE, "").unwrap_err();
        assert_eq!(err, SavingsError::Overflow);
        assert_eq!(log.entries.len(), 1);
        assert_eq!(log.total_saved(), Decimal::MAX);
        assert_eq!(log.streak.current, 1);
    }
}
