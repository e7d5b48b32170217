//! hazina-ingest: statement text ingestion and line-level field extraction.

pub mod types;
pub mod parsers;

pub use types::{AmountSign, RawTransaction};
pub use parsers::mpesa::MpesaTextParser;
