//! hazina-finance: category rules, statement parsing, spending insights and CSV export

pub mod category_rules;
pub mod export;
pub mod insights;
pub mod statement_parser;

pub use category_rules::{CategoryRule, RuleConfig, RuleError, RuleTable};
pub use export::write_transactions_csv;
pub use insights::{format_money, CategoryShare, SpendingInsights};
pub use statement_parser::StatementParser;
