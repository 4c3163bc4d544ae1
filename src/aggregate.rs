//! Derived figures over a ledger snapshot: limit totals, firm debt, and the
//! cards whose payment date is close.
//!
//! Nothing here mutates; everything is recomputed from the current ledger.

use std::collections::HashMap;

use chrono::{Datelike, Days, Months, NaiveDate};
use rust_decimal::Decimal;

use crate::{
    domain::{CardId, FirmId},
    ledger::Ledger,
};

/// Cards due within this many days are flagged.
pub const DUE_SOON_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total_limit: Decimal,
    pub total_used: Decimal,
    pub total_remaining: Decimal,
    pub total_firm_debt: Decimal,
    /// Soonest first.
    pub alerts: Vec<DueAlert>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueAlert {
    pub card_id: CardId,
    pub card_name: String,
    pub used_amount: Decimal,
    pub due_day: u8,
    pub days_left: i64,
}

impl Summary {
    pub fn of(ledger: &Ledger, today: NaiveDate) -> Self {
        let total_limit: Decimal = ledger.cards().iter().map(|c| c.total_limit).sum();
        let total_used: Decimal = ledger.cards().iter().map(|c| c.used_amount).sum();
        let total_firm_debt = ledger.firms().iter().map(|f| f.total_debt).sum();

        let mut alerts: Vec<DueAlert> = ledger
            .cards()
            .iter()
            .filter(|card| card.used_amount > Decimal::ZERO)
            .map(|card| DueAlert {
                card_id: card.id,
                card_name: card.card_name.clone(),
                used_amount: card.used_amount,
                due_day: card.due_day,
                days_left: days_until_due(card.due_day, today),
            })
            .filter(|alert| alert.days_left <= DUE_SOON_DAYS)
            .collect();
        alerts.sort_by_key(|alert| alert.days_left);

        Self {
            total_limit,
            total_used,
            total_remaining: total_limit - total_used,
            total_firm_debt,
            alerts,
        }
    }
}

/// Whole days from `today` to the next `due_day`.
///
/// The due date is in the current month unless today's day of month is past
/// `due_day`, in which case it is in the following month. Days beyond the end
/// of a month spill into the next one (day 31 of April is May 1st).
pub fn days_until_due(due_day: u8, today: NaiveDate) -> i64 {
    let mut month_start = today - Days::new(u64::from(today.day0()));
    if today.day() > u32::from(due_day) {
        month_start = month_start + Months::new(1);
    }
    let due = month_start + Days::new(u64::from(due_day.saturating_sub(1)));
    (due - today).num_days()
}

/// Net effect of the transaction log on each referenced card and firm,
/// folded without the zero floor the stored balances use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetEffects {
    pub cards: HashMap<CardId, Decimal>,
    pub firms: HashMap<FirmId, Decimal>,
}

impl NetEffects {
    pub fn of(ledger: &Ledger) -> Self {
        let mut effects = Self::default();
        for tx in ledger.transactions() {
            if let Some(card_id) = tx.card_id {
                *effects.cards.entry(card_id).or_default() += tx.kind.card_effect(tx.amount);
            }
            if let Some(firm_id) = tx.firm_id {
                *effects.firms.entry(firm_id).or_default() += tx.kind.firm_effect(tx.amount);
            }
        }
        effects
    }

    pub fn card(&self, id: &CardId) -> Decimal {
        self.cards.get(id).copied().unwrap_or_default()
    }

    pub fn firm(&self, id: &FirmId) -> Decimal {
        self.firms.get(id).copied().unwrap_or_default()
    }
}
