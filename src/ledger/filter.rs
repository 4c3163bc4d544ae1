use crate::domain::{CardId, SpendingCategory, Transaction};

/// Narrows the history view. Every criterion left unset matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub card: Option<CardId>,
    /// Case-insensitive substring of the description.
    pub search: Option<String>,
    pub category: Option<SpendingCategory>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn on_card(mut self, card: CardId) -> Self {
        self.card = Some(card);
        self
    }
    pub fn containing(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }
    pub fn category(mut self, category: SpendingCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        if self.card.is_some_and(|card| tx.card_id != Some(card)) {
            return false;
        }
        if self.category.is_some_and(|category| tx.category != Some(category)) {
            return false;
        }
        match &self.search {
            Some(text) => tx
                .description
                .to_lowercase()
                .contains(&text.to_lowercase()),
            None => true,
        }
    }
}
