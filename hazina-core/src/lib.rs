//! hazina-core: statement record types, savings helpers and time utilities

pub mod finance;
pub mod savings;
pub mod time;

pub use finance::{Category, Direction, StatementSummary, TransactionRecord};
pub use savings::{
    savings_plan, CalculatorOutcome, CheckIn, DailySaving, SavingsError, SavingsLog, SavingsPlan,
    Streak,
};
