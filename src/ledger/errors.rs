use rust_decimal::Decimal;

use crate::domain::{CardId, FirmId, TransactionId};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("Amount must not be negative, got {0}")]
    NegativeAmount(Decimal),
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    #[error("{field} must be a day of month between 1 and 31, got {value}")]
    InvalidDay { field: &'static str, value: u8 },
    #[error("Card {0} not found")]
    CardNotFound(CardId),
    #[error("Firm {0} not found")]
    FirmNotFound(FirmId),
    #[error("Transaction {0} not found")]
    TransactionNotFound(TransactionId),
    #[error("A firm settlement must be paid from a card")]
    SettlementRequiresCard,
}
