use crate::domain::{Card, CardId, Firm, FirmId, Transaction, TransactionId};

/// All cards, in the order they were added.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Cards(Vec<Card>);

impl Cards {
    pub fn new(cards: Vec<Card>) -> Self {
        Self(cards)
    }
    pub fn as_slice(&self) -> &[Card] {
        &self.0
    }
    pub fn get(&self, id: &CardId) -> Option<&Card> {
        self.0.iter().find(|card| &card.id == id)
    }
    pub fn get_mut(&mut self, id: &CardId) -> Option<&mut Card> {
        self.0.iter_mut().find(|card| &card.id == id)
    }
    pub fn push(&mut self, card: Card) {
        self.0.push(card);
    }
    pub fn remove(&mut self, id: &CardId) -> Option<Card> {
        let index = self.0.iter().position(|card| &card.id == id)?;
        Some(self.0.remove(index))
    }
}

/// All firms, in the order they were added.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Firms(Vec<Firm>);

impl Firms {
    pub fn new(firms: Vec<Firm>) -> Self {
        Self(firms)
    }
    pub fn as_slice(&self) -> &[Firm] {
        &self.0
    }
    pub fn get(&self, id: &FirmId) -> Option<&Firm> {
        self.0.iter().find(|firm| &firm.id == id)
    }
    pub fn get_mut(&mut self, id: &FirmId) -> Option<&mut Firm> {
        self.0.iter_mut().find(|firm| &firm.id == id)
    }
    pub fn push(&mut self, firm: Firm) {
        self.0.push(firm);
    }
    pub fn remove(&mut self, id: &FirmId) -> Option<Firm> {
        let index = self.0.iter().position(|firm| &firm.id == id)?;
        Some(self.0.remove(index))
    }
}

/// Recorded transactions in chronological (insertion) order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TransactionLog(Vec<Transaction>);

impl TransactionLog {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self(transactions)
    }
    pub fn as_slice(&self) -> &[Transaction] {
        &self.0
    }
    pub fn get(&self, id: &TransactionId) -> Option<&Transaction> {
        self.0.iter().find(|tx| &tx.id == id)
    }
    pub fn push(&mut self, transaction: Transaction) {
        self.0.push(transaction);
    }
    pub fn remove(&mut self, id: &TransactionId) -> Option<Transaction> {
        let index = self.0.iter().position(|tx| &tx.id == id)?;
        Some(self.0.remove(index))
    }
}
