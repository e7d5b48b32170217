//! Statement text parsers

pub mod fields;
pub mod mpesa;

pub use mpesa::MpesaTextParser;
