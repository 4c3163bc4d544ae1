mod common;

use common::{add_card, add_firm, debt, ledger, used};
use firma_asistan::{
    aggregate::NetEffects,
    domain::TransactionId,
    ledger::{Deleted, DeletionTarget, Spending, errors::LedgerError},
};
use rust_decimal::dec;

/// Deleting a spending takes its amount back off the card.
#[test]
fn deleting_spending_restores_card_balance() {
    let mut ledger = ledger();
    let card = add_card(&mut ledger, "Bonus", dec!(10000), dec!(0), 15);

    let tx = ledger
        .record_spending(Spending::new(dec!(3000), "Office rent").on_card(card))
        .unwrap();
    assert_eq!(used(&ledger, card), dec!(3000));

    ledger.delete_transaction(tx).unwrap();

    assert_eq!(used(&ledger, card), dec!(0));
    assert!(ledger.transactions().is_empty());
}

/// Deleting a spending takes its amount back off the firm.
#[test]
fn deleting_spending_restores_firm_debt() {
    let mut ledger = ledger();
    let firm = add_firm(&mut ledger, "Acme", dec!(100));

    let tx = ledger
        .record_spending(Spending::new(dec!(40), "Parts").for_firm(firm))
        .unwrap();
    ledger.delete_transaction(tx).unwrap();

    assert_eq!(debt(&ledger, firm), dec!(100));
}

/// Deleting a card payment puts the paid amount back on the card.
#[test]
fn deleting_payment_adds_amount_back() {
    let mut ledger = ledger();
    let card = add_card(&mut ledger, "Bonus", dec!(10000), dec!(900), 15);

    let tx = ledger.record_card_payment(card, dec!(400), None).unwrap();
    ledger.delete_transaction(tx).unwrap();

    assert_eq!(used(&ledger, card), dec!(900));
}

/// Deleting a settlement restores the firm's debt and lowers the card's balance.
#[test]
fn deleting_settlement_reverses_both_sides() {
    let mut ledger = ledger();
    let firm = add_firm(&mut ledger, "Acme", dec!(5000));
    let card = add_card(&mut ledger, "Bonus", dec!(10000), dec!(1000), 15);

    let tx = ledger
        .record_firm_settlement(firm, Some(card), dec!(2000))
        .unwrap();
    ledger.delete_transaction(tx).unwrap();

    assert_eq!(debt(&ledger, firm), dec!(5000));
    assert_eq!(used(&ledger, card), dec!(1000));
}

/// Recording a mix of operations and deleting them newest first returns every balance to where it started.
#[test]
fn deleting_everything_in_reverse_order_restores_all_balances() {
    let mut ledger = ledger();
    let bonus = add_card(&mut ledger, "Bonus", dec!(10000), dec!(1500), 15);
    let axess = add_card(&mut ledger, "Axess", dec!(20000), dec!(0), 3);
    let acme = add_firm(&mut ledger, "Acme", dec!(5000));
    let globex = add_firm(&mut ledger, "Globex", dec!(0));
    let before = ledger.clone();

    let transactions: Vec<TransactionId> = vec![
        ledger
            .record_spending(Spending::new(dec!(700), "Stock").on_card(bonus).for_firm(acme))
            .unwrap(),
        ledger
            .record_spending(Spending::new(dec!(1200.50), "Freight").for_firm(globex))
            .unwrap(),
        ledger.record_card_payment(bonus, dec!(2000), None).unwrap(),
        ledger
            .record_firm_settlement(acme, Some(axess), dec!(3000))
            .unwrap(),
        ledger
            .record_spending(Spending::new(dec!(89.99), "Software").on_card(axess))
            .unwrap(),
        ledger
            .record_firm_settlement(globex, Some(bonus), dec!(1000))
            .unwrap(),
    ];

    for tx in transactions.into_iter().rev() {
        ledger.delete_transaction(tx).unwrap();
    }

    assert_eq!(ledger, before);
}

/// Stored balances agree with the net effect folded from the log.
#[test]
fn stored_balances_match_folded_log() {
    let mut ledger = ledger();
    let card = add_card(&mut ledger, "Bonus", dec!(10000), dec!(0), 15);
    let firm = add_firm(&mut ledger, "Acme", dec!(0));

    ledger
        .record_spending(Spending::new(dec!(700), "Stock").on_card(card).for_firm(firm))
        .unwrap();
    ledger.record_card_payment(card, dec!(200), None).unwrap();
    ledger
        .record_firm_settlement(firm, Some(card), dec!(300))
        .unwrap();

    let effects = NetEffects::of(&ledger);
    assert_eq!(effects.card(&card), used(&ledger, card));
    assert_eq!(effects.firm(&firm), debt(&ledger, firm));
    assert_eq!(used(&ledger, card), dec!(800));
    assert_eq!(debt(&ledger, firm), dec!(400));
}

/// Deleting a transaction whose card is gone only reverses the firm side.
#[test]
fn reversal_for_deleted_card_is_a_no_op() {
    let mut ledger = ledger();
    let card = add_card(&mut ledger, "Bonus", dec!(10000), dec!(0), 15);
    let firm = add_firm(&mut ledger, "Acme", dec!(0));

    let tx = ledger
        .record_spending(Spending::new(dec!(700), "Stock").on_card(card).for_firm(firm))
        .unwrap();
    ledger.delete_card(card).unwrap();

    // The transaction is orphaned on the card side but still deletable.
    assert_eq!(ledger.transaction(&tx).unwrap().card_id, Some(card));
    ledger.delete_transaction(tx).unwrap();

    assert!(ledger.card(&card).is_none());
    assert_eq!(debt(&ledger, firm), dec!(0));
}

/// Deleting a transaction whose firm is gone only reverses the card side.
#[test]
fn reversal_for_deleted_firm_is_a_no_op() {
    let mut ledger = ledger();
    let card = add_card(&mut ledger, "Bonus", dec!(10000), dec!(0), 15);
    let firm = add_firm(&mut ledger, "Acme", dec!(5000));

    let tx = ledger
        .record_firm_settlement(firm, Some(card), dec!(1000))
        .unwrap();
    ledger.delete_firm(firm).unwrap();
    ledger.delete_transaction(tx).unwrap();

    assert!(ledger.firm(&firm).is_none());
    assert_eq!(used(&ledger, card), dec!(0));
}

/// Deleting an id that is not in the log is an error.
#[test]
fn deleting_unknown_transaction_fails() {
    let mut ledger = ledger();
    let missing = TransactionId::random();

    assert_eq!(
        ledger.delete_transaction(missing),
        Err(LedgerError::TransactionNotFound(missing))
    );
}

/// Requesting a deletion alone mutates nothing.
#[test]
fn pending_deletion_changes_nothing_until_confirmed() {
    let mut ledger = ledger();
    let card = add_card(&mut ledger, "Bonus", dec!(10000), dec!(0), 15);
    let tx = ledger
        .record_spending(Spending::new(dec!(3000), "Office rent").on_card(card))
        .unwrap();

    let pending = ledger
        .request_delete(DeletionTarget::Transaction(tx))
        .unwrap();
    assert_eq!(pending.target(), DeletionTarget::Transaction(tx));
    assert_eq!(used(&ledger, card), dec!(3000));

    let deleted = ledger.confirm_delete(pending).unwrap();

    assert!(matches!(deleted, Deleted::Transaction(t) if t.id == tx));
    assert_eq!(used(&ledger, card), dec!(0));
}

/// Dropping a pending deletion is the same as declining it.
#[test]
fn declined_deletion_leaves_state_untouched() {
    let mut ledger = ledger();
    let card = add_card(&mut ledger, "Bonus", dec!(10000), dec!(0), 15);
    let before = ledger.clone();

    let pending = ledger.request_delete(DeletionTarget::Card(card)).unwrap();
    drop(pending);

    assert_eq!(ledger, before);
}

/// A deletion cannot be requested for a record that does not exist.
#[test]
fn requesting_deletion_of_missing_record_fails() {
    let ledger = ledger();
    let missing = TransactionId::random();

    assert_eq!(
        ledger.request_delete(DeletionTarget::Transaction(missing)),
        Err(LedgerError::TransactionNotFound(missing))
    );
}
