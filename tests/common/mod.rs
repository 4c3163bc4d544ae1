use chrono::{DateTime, TimeZone, Utc};
use firma_asistan::{
    domain::{CardId, FirmId, NewCard},
    ledger::Ledger,
};
use rust_decimal::Decimal;

#[allow(dead_code)]
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap()
}

/// Empty ledger whose transactions are all stamped 2024-03-15.
pub fn ledger() -> Ledger {
    Ledger::new().with_clock(fixed_now)
}

#[allow(dead_code)]
pub fn add_card(
    ledger: &mut Ledger,
    name: &str,
    limit: Decimal,
    used: Decimal,
    due_day: u8,
) -> CardId {
    ledger
        .add_card(
            NewCard::new(name, "Garanti", limit)
                .with_debt(used)
                .due_on(due_day),
        )
        .unwrap()
}

#[allow(dead_code)]
pub fn add_firm(ledger: &mut Ledger, name: &str, debt: Decimal) -> FirmId {
    ledger.add_firm(name, debt).unwrap()
}

#[allow(dead_code)]
pub fn used(ledger: &Ledger, id: CardId) -> Decimal {
    ledger.card(&id).unwrap().used_amount
}

#[allow(dead_code)]
pub fn debt(ledger: &Ledger, id: FirmId) -> Decimal {
    ledger.firm(&id).unwrap().total_debt
}
