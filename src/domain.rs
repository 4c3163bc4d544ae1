//! Core domain types: cards, firms, transactions and their balances.

use std::fmt;

use chrono::{DateTime, Utc};
use derive_more::{Display, From, FromStr, Into};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Newtype wrapper for card identifiers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, From, Into, Display, FromStr,
)]
pub struct CardId(Uuid);

/// Newtype wrapper for firm identifiers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, From, Into, Display, FromStr,
)]
pub struct FirmId(Uuid);

/// Newtype wrapper for transaction identifiers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, From, Into, Display, FromStr,
)]
pub struct TransactionId(Uuid);

impl CardId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl FirmId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl TransactionId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Unknown spending category: {0}")]
    UnknownCategory(String),
}

/// A credit line with a limit, a current balance and a monthly due date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub card_name: String,
    pub bank: String,
    pub total_limit: Decimal,
    pub used_amount: Decimal,
    pub due_day: u8,
    pub statement_day: u8,
}

impl Card {
    pub fn remaining(&self) -> Decimal {
        self.total_limit - self.used_amount
    }
    /// Spending or a firm settlement funded by this card.
    pub fn charge(&mut self, amount: Decimal) {
        self.used_amount += amount;
    }
    /// Pays down the balance. Overpayment is absorbed, never kept as credit.
    pub fn pay_down(&mut self, amount: Decimal) {
        self.used_amount = floored_sub(self.used_amount, amount);
    }
}

/// Card form data: everything but the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCard {
    pub card_name: String,
    pub bank: String,
    pub total_limit: Decimal,
    /// Initial debt. Only read when the card is created.
    pub used_amount: Decimal,
    pub due_day: u8,
    pub statement_day: u8,
}

impl NewCard {
    pub fn new(card_name: impl Into<String>, bank: impl Into<String>, total_limit: Decimal) -> Self {
        Self {
            card_name: card_name.into(),
            bank: bank.into(),
            total_limit,
            used_amount: Decimal::ZERO,
            due_day: 1,
            statement_day: 1,
        }
    }
    pub fn with_debt(mut self, used_amount: Decimal) -> Self {
        self.used_amount = used_amount;
        self
    }
    pub fn due_on(mut self, due_day: u8) -> Self {
        self.due_day = due_day;
        self
    }
    pub fn statement_on(mut self, statement_day: u8) -> Self {
        self.statement_day = statement_day;
        self
    }
}

/// A supplier or counterparty the business owes money to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Firm {
    pub id: FirmId,
    pub name: String,
    pub total_debt: Decimal,
}

impl Firm {
    pub fn add_debt(&mut self, amount: Decimal) {
        self.total_debt += amount;
    }
    /// Settles part of the debt. Overpayment is absorbed.
    pub fn settle(&mut self, amount: Decimal) {
        self.total_debt = floored_sub(self.total_debt, amount);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Spending,
    Payment,
    FirmSettlement,
}

impl TransactionKind {
    /// Label used in the CSV report.
    pub fn label(self) -> &'static str {
        match self {
            TransactionKind::Spending => "Harcama",
            TransactionKind::Payment => "Kart Ödemesi",
            TransactionKind::FirmSettlement => "Firma Ödemesi",
        }
    }

    /// Signed effect of `amount` on the referenced card's used amount.
    pub fn card_effect(self, amount: Decimal) -> Decimal {
        match self {
            TransactionKind::Spending | TransactionKind::FirmSettlement => amount,
            TransactionKind::Payment => -amount,
        }
    }

    /// Signed effect of `amount` on the referenced firm's debt.
    pub fn firm_effect(self, amount: Decimal) -> Decimal {
        match self {
            TransactionKind::Spending => amount,
            TransactionKind::Payment => Decimal::ZERO,
            TransactionKind::FirmSettlement => -amount,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpendingCategory {
    #[serde(rename = "Tedarikçi")]
    Supplier,
    #[serde(rename = "Vergi/Resmi Harç")]
    Tax,
    #[serde(rename = "Personel")]
    Personnel,
    #[serde(rename = "Lojistik/Ulaşım")]
    Logistics,
    #[serde(rename = "Ofis/Kira")]
    OfficeRent,
    #[serde(rename = "Pazarlama")]
    Marketing,
    #[serde(rename = "Yazılım/SaaS")]
    Software,
    #[serde(rename = "Diğer")]
    Other,
}

impl SpendingCategory {
    pub const ALL: [SpendingCategory; 8] = [
        SpendingCategory::Supplier,
        SpendingCategory::Tax,
        SpendingCategory::Personnel,
        SpendingCategory::Logistics,
        SpendingCategory::OfficeRent,
        SpendingCategory::Marketing,
        SpendingCategory::Software,
        SpendingCategory::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SpendingCategory::Supplier => "Tedarikçi",
            SpendingCategory::Tax => "Vergi/Resmi Harç",
            SpendingCategory::Personnel => "Personel",
            SpendingCategory::Logistics => "Lojistik/Ulaşım",
            SpendingCategory::OfficeRent => "Ofis/Kira",
            SpendingCategory::Marketing => "Pazarlama",
            SpendingCategory::Software => "Yazılım/SaaS",
            SpendingCategory::Other => "Diğer",
        }
    }

    fn slug(self) -> &'static str {
        match self {
            SpendingCategory::Supplier => "supplier",
            SpendingCategory::Tax => "tax",
            SpendingCategory::Personnel => "personnel",
            SpendingCategory::Logistics => "logistics",
            SpendingCategory::OfficeRent => "office-rent",
            SpendingCategory::Marketing => "marketing",
            SpendingCategory::Software => "software",
            SpendingCategory::Other => "other",
        }
    }
}

impl fmt::Display for SpendingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts either the Turkish label or the English slug.
impl std::str::FromStr for SpendingCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        SpendingCategory::ALL
            .into_iter()
            .find(|c| c.label() == s || c.slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::UnknownCategory(s.to_string()))
    }
}

/// A single ledger entry. Immutable once recorded; only deletion is allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_id: Option<CardId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firm_id: Option<FirmId>,
    pub amount: Decimal,
    pub description: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<SpendingCategory>,
}

fn floored_sub(balance: Decimal, amount: Decimal) -> Decimal {
    (balance - amount).max(Decimal::ZERO)
}
