//! Stateful ledger store.
//!
//! Holds cards, firms and the transaction log, and applies every mutation so
//! that card balances and firm debts track the net effect of the transactions
//! referencing them. Balances are stored, not recomputed: each recording
//! operation applies its effect once and [`Ledger::delete_transaction`]
//! applies the matching reversal.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::{
    domain::{
        Card, CardId, Firm, FirmId, NewCard, SpendingCategory, Transaction, TransactionId,
        TransactionKind,
    },
    ledger::errors::LedgerError,
};
pub use filter::TransactionFilter;
pub use types::{Cards, Firms, TransactionLog};

pub mod errors;
mod filter;
mod types;

/// Description given to card payments recorded without one.
pub const DEFAULT_PAYMENT_DESCRIPTION: &str = "Kart Borç Ödemesi";

/// Source of transaction timestamps.
pub type Clock = fn() -> DateTime<Utc>;

#[derive(Debug, Clone)]
pub struct Ledger {
    cards: Cards,
    firms: Firms,
    transactions: TransactionLog,
    clock: Clock,
}

/// A spending to record. Card and firm are both optional and may both be set
/// (a card-funded purchase attributed to a firm).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spending {
    pub amount: Decimal,
    pub description: String,
    pub category: Option<SpendingCategory>,
    pub card_id: Option<CardId>,
    pub firm_id: Option<FirmId>,
}

impl Spending {
    pub fn new(amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            amount,
            description: description.into(),
            category: None,
            card_id: None,
            firm_id: None,
        }
    }
    pub fn on_card(mut self, card_id: CardId) -> Self {
        self.card_id = Some(card_id);
        self
    }
    pub fn for_firm(mut self, firm_id: FirmId) -> Self {
        self.firm_id = Some(firm_id);
        self
    }
    pub fn category(mut self, category: SpendingCategory) -> Self {
        self.category = Some(category);
        self
    }
}

/// Raised when a charge would exceed a card's remaining limit. Advisory only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitWarning {
    pub card_id: CardId,
    pub remaining: Decimal,
    pub requested: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionTarget {
    Card(CardId),
    Firm(FirmId),
    Transaction(TransactionId),
}

/// Proof that a deletion was requested for an existing record. Pass it to
/// [`Ledger::confirm_delete`] to carry it out, or drop it to decline.
#[must_use = "a pending deletion does nothing until confirmed"]
#[derive(Debug, PartialEq, Eq)]
pub struct PendingDeletion {
    target: DeletionTarget,
}

impl PendingDeletion {
    pub fn target(&self) -> DeletionTarget {
        self.target
    }
}

/// The record removed by a confirmed deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deleted {
    Card(Card),
    Firm(Firm),
    Transaction(Transaction),
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Ledger {
    fn eq(&self, other: &Self) -> bool {
        self.cards == other.cards
            && self.firms == other.firms
            && self.transactions == other.transactions
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::from_parts(Vec::new(), Vec::new(), Vec::new())
    }

    pub fn from_parts(cards: Vec<Card>, firms: Vec<Firm>, transactions: Vec<Transaction>) -> Self {
        Self {
            cards: Cards::new(cards),
            firms: Firms::new(firms),
            transactions: TransactionLog::new(transactions),
            clock: Utc::now,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }

    pub fn cards(&self) -> &[Card] {
        self.cards.as_slice()
    }
    pub fn firms(&self) -> &[Firm] {
        self.firms.as_slice()
    }
    pub fn transactions(&self) -> &[Transaction] {
        self.transactions.as_slice()
    }
    pub fn card(&self, id: &CardId) -> Option<&Card> {
        self.cards.get(id)
    }
    pub fn firm(&self, id: &FirmId) -> Option<&Firm> {
        self.firms.get(id)
    }
    pub fn transaction(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions.get(id)
    }

    /// Transactions matching `filter`, newest first. Transactions with the
    /// same timestamp keep their log order.
    pub fn history(&self, filter: &TransactionFilter) -> Vec<&Transaction> {
        let mut list: Vec<&Transaction> = self
            .transactions()
            .iter()
            .filter(|tx| filter.matches(tx))
            .collect();
        list.sort_by(|a, b| b.date.cmp(&a.date));
        list
    }
}

// Cards and firms.
impl Ledger {
    pub fn add_card(&mut self, data: NewCard) -> Result<CardId, LedgerError> {
        validate_card(&data)?;
        check_not_negative(data.used_amount)?;

        let id = CardId::random();
        info!(card = %id, name = %data.card_name, "Adding card");
        self.cards.push(Card {
            id,
            card_name: data.card_name,
            bank: data.bank,
            total_limit: data.total_limit,
            used_amount: data.used_amount,
            due_day: data.due_day,
            statement_day: data.statement_day,
        });
        Ok(id)
    }

    /// Replaces the card's details. The balance is owned by the transaction
    /// log, so `data.used_amount` is ignored and the current one is kept.
    pub fn edit_card(&mut self, id: CardId, data: NewCard) -> Result<(), LedgerError> {
        validate_card(&data)?;
        let card = self
            .cards
            .get_mut(&id)
            .ok_or(LedgerError::CardNotFound(id))?;

        info!(card = %id, "Editing card");
        card.card_name = data.card_name;
        card.bank = data.bank;
        card.total_limit = data.total_limit;
        card.due_day = data.due_day;
        card.statement_day = data.statement_day;
        Ok(())
    }

    /// Removes the card. Transactions referencing it are kept as they are.
    pub fn delete_card(&mut self, id: CardId) -> Result<Card, LedgerError> {
        let card = self
            .cards
            .remove(&id)
            .ok_or(LedgerError::CardNotFound(id))?;
        info!(card = %id, "Deleted card");
        Ok(card)
    }

    pub fn add_firm(
        &mut self,
        name: impl Into<String>,
        initial_debt: Decimal,
    ) -> Result<FirmId, LedgerError> {
        let name = name.into();
        check_not_empty("Firm name", &name)?;
        check_not_negative(initial_debt)?;

        let id = FirmId::random();
        info!(firm = %id, %name, debt = %initial_debt, "Adding firm");
        self.firms.push(Firm {
            id,
            name,
            total_debt: initial_debt,
        });
        Ok(id)
    }

    /// Removes the firm. Transactions referencing it are kept as they are.
    pub fn delete_firm(&mut self, id: FirmId) -> Result<Firm, LedgerError> {
        let firm = self
            .firms
            .remove(&id)
            .ok_or(LedgerError::FirmNotFound(id))?;
        info!(firm = %id, "Deleted firm");
        Ok(firm)
    }

    /// Returns a warning when charging `amount` would exceed the card's
    /// remaining limit. Unknown cards never warn.
    pub fn limit_warning(&self, card_id: CardId, amount: Decimal) -> Option<LimitWarning> {
        let card = self.cards.get(&card_id)?;
        (amount > card.remaining()).then(|| LimitWarning {
            card_id,
            remaining: card.remaining(),
            requested: amount,
        })
    }
}

// Transactions.
impl Ledger {
    pub fn record_spending(&mut self, spending: Spending) -> Result<TransactionId, LedgerError> {
        check_positive(spending.amount)?;
        check_not_empty("Description", &spending.description)?;
        // Resolve both sides before touching either balance.
        if let Some(card_id) = spending.card_id {
            self.cards
                .get(&card_id)
                .ok_or(LedgerError::CardNotFound(card_id))?;
        }
        if let Some(firm_id) = spending.firm_id {
            self.firms
                .get(&firm_id)
                .ok_or(LedgerError::FirmNotFound(firm_id))?;
        }

        if let Some(card) = spending.card_id.and_then(|id| self.cards.get_mut(&id)) {
            card.charge(spending.amount);
        }
        if let Some(firm) = spending.firm_id.and_then(|id| self.firms.get_mut(&id)) {
            firm.add_debt(spending.amount);
        }

        let id = TransactionId::random();
        info!(tx = %id, amount = %spending.amount, "Recorded spending");
        self.transactions.push(Transaction {
            id,
            card_id: spending.card_id,
            firm_id: spending.firm_id,
            amount: spending.amount,
            description: spending.description,
            date: (self.clock)(),
            kind: TransactionKind::Spending,
            category: spending.category,
        });
        Ok(id)
    }

    pub fn record_card_payment(
        &mut self,
        card_id: CardId,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<TransactionId, LedgerError> {
        check_positive(amount)?;
        let card = self
            .cards
            .get_mut(&card_id)
            .ok_or(LedgerError::CardNotFound(card_id))?;

        card.pay_down(amount);

        let id = TransactionId::random();
        info!(tx = %id, card = %card_id, %amount, "Recorded card payment");
        self.transactions.push(Transaction {
            id,
            card_id: Some(card_id),
            firm_id: None,
            amount,
            description: description
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PAYMENT_DESCRIPTION.to_string()),
            date: (self.clock)(),
            kind: TransactionKind::Payment,
            category: None,
        });
        Ok(id)
    }

    /// Pays down a firm's debt using a card: the firm's debt shrinks and the
    /// card's balance grows by the same amount.
    pub fn record_firm_settlement(
        &mut self,
        firm_id: FirmId,
        card_id: Option<CardId>,
        amount: Decimal,
    ) -> Result<TransactionId, LedgerError> {
        check_positive(amount)?;
        let card_id = card_id.ok_or(LedgerError::SettlementRequiresCard)?;
        let card_name = self
            .cards
            .get(&card_id)
            .ok_or(LedgerError::CardNotFound(card_id))?
            .card_name
            .clone();
        let firm = self
            .firms
            .get_mut(&firm_id)
            .ok_or(LedgerError::FirmNotFound(firm_id))?;

        firm.settle(amount);
        let description = format!("{} Ödemesi ({})", firm.name, card_name);
        if let Some(card) = self.cards.get_mut(&card_id) {
            card.charge(amount);
        }

        let id = TransactionId::random();
        info!(tx = %id, firm = %firm_id, card = %card_id, %amount, "Recorded firm settlement");
        self.transactions.push(Transaction {
            id,
            card_id: Some(card_id),
            firm_id: Some(firm_id),
            amount,
            description,
            date: (self.clock)(),
            kind: TransactionKind::FirmSettlement,
            category: Some(SpendingCategory::Supplier),
        });
        Ok(id)
    }

    /// Reverses the transaction's effect on its card and firm, then removes it.
    /// A side whose card or firm no longer exists is left alone.
    pub fn delete_transaction(&mut self, id: TransactionId) -> Result<Transaction, LedgerError> {
        let tx = self
            .transactions
            .remove(&id)
            .ok_or(LedgerError::TransactionNotFound(id))?;

        if let Some(card_id) = tx.card_id {
            match self.cards.get_mut(&card_id) {
                Some(card) => match tx.kind {
                    TransactionKind::Spending | TransactionKind::FirmSettlement => {
                        card.pay_down(tx.amount)
                    }
                    TransactionKind::Payment => card.charge(tx.amount),
                },
                None => warn!(tx = %id, card = %card_id, "Card no longer exists, skipping reversal"),
            }
        }
        if let Some(firm_id) = tx.firm_id {
            match self.firms.get_mut(&firm_id) {
                Some(firm) => match tx.kind {
                    TransactionKind::Spending => firm.settle(tx.amount),
                    TransactionKind::FirmSettlement => firm.add_debt(tx.amount),
                    TransactionKind::Payment => {}
                },
                None => warn!(tx = %id, firm = %firm_id, "Firm no longer exists, skipping reversal"),
            }
        }

        info!(tx = %id, kind = ?tx.kind, amount = %tx.amount, "Deleted transaction");
        Ok(tx)
    }
}

// Two-phase deletion.
impl Ledger {
    /// Checks that the target exists without changing anything.
    pub fn request_delete(&self, target: DeletionTarget) -> Result<PendingDeletion, LedgerError> {
        match target {
            DeletionTarget::Card(id) => {
                self.cards.get(&id).ok_or(LedgerError::CardNotFound(id))?;
            }
            DeletionTarget::Firm(id) => {
                self.firms.get(&id).ok_or(LedgerError::FirmNotFound(id))?;
            }
            DeletionTarget::Transaction(id) => {
                self.transactions
                    .get(&id)
                    .ok_or(LedgerError::TransactionNotFound(id))?;
            }
        }
        Ok(PendingDeletion { target })
    }

    pub fn confirm_delete(&mut self, pending: PendingDeletion) -> Result<Deleted, LedgerError> {
        match pending.target {
            DeletionTarget::Card(id) => self.delete_card(id).map(Deleted::Card),
            DeletionTarget::Firm(id) => self.delete_firm(id).map(Deleted::Firm),
            DeletionTarget::Transaction(id) => {
                self.delete_transaction(id).map(Deleted::Transaction)
            }
        }
    }
}

fn validate_card(data: &NewCard) -> Result<(), LedgerError> {
    check_not_empty("Card name", &data.card_name)?;
    check_not_negative(data.total_limit)?;
    check_day("Due day", data.due_day)?;
    check_day("Statement day", data.statement_day)?;
    Ok(())
}

fn check_positive(amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        warn!(%amount, "Rejected non-positive amount");
        return Err(LedgerError::NonPositiveAmount(amount));
    }
    Ok(())
}

fn check_not_negative(amount: Decimal) -> Result<(), LedgerError> {
    if amount < Decimal::ZERO {
        return Err(LedgerError::NegativeAmount(amount));
    }
    Ok(())
}

fn check_not_empty(field: &'static str, value: &str) -> Result<(), LedgerError> {
    if value.trim().is_empty() {
        return Err(LedgerError::EmptyField(field));
    }
    Ok(())
}

fn check_day(field: &'static str, value: u8) -> Result<(), LedgerError> {
    if !(1..=31).contains(&value) {
        return Err(LedgerError::InvalidDay { field, value });
    }
    Ok(())
}
