use firma_asistan::domain::{DomainError, SpendingCategory, Transaction, TransactionKind};
use rust_decimal::dec;

/// Categories parse from their Turkish label or an English slug.
#[test]
fn category_parses_from_label_or_slug() {
    assert_eq!(
        "Ofis/Kira".parse::<SpendingCategory>().unwrap(),
        SpendingCategory::OfficeRent
    );
    assert_eq!(
        "office-rent".parse::<SpendingCategory>().unwrap(),
        SpendingCategory::OfficeRent
    );
    assert_eq!(
        "Software".parse::<SpendingCategory>().unwrap(),
        SpendingCategory::Software
    );
    assert!(matches!(
        "groceries".parse::<SpendingCategory>(),
        Err(DomainError::UnknownCategory(name)) if name == "groceries"
    ));
}

/// Each category's label parses back to the same category.
#[test]
fn every_category_round_trips_through_its_label() {
    for category in SpendingCategory::ALL {
        assert_eq!(category.label().parse::<SpendingCategory>().unwrap(), category);
        assert_eq!(category.to_string(), category.label());
    }
}

/// Each kind moves the card and firm balances in its own direction.
#[test]
fn effects_follow_the_transaction_kind() {
    let amount = dec!(100);

    assert_eq!(TransactionKind::Spending.card_effect(amount), dec!(100));
    assert_eq!(TransactionKind::Spending.firm_effect(amount), dec!(100));
    assert_eq!(TransactionKind::Payment.card_effect(amount), dec!(-100));
    assert_eq!(TransactionKind::Payment.firm_effect(amount), dec!(0));
    assert_eq!(TransactionKind::FirmSettlement.card_effect(amount), dec!(100));
    assert_eq!(TransactionKind::FirmSettlement.firm_effect(amount), dec!(-100));
}

/// Transactions stored by the web app deserialize as they are.
#[test]
fn transaction_written_by_the_web_app_is_readable() {
    let json = r#"{
        "id": "3d5e8b7c-9a1f-4f36-8a77-6b2c1d0e9f11",
        "cardId": "7a1c2b3d-4e5f-4a6b-8c7d-9e0f1a2b3c4d",
        "amount": 1500,
        "description": "Office rent",
        "date": "2024-03-15T10:30:00.000Z",
        "type": "spending",
        "category": "Ofis/Kira"
    }"#;

    let tx: Transaction = serde_json::from_str(json).unwrap();

    assert_eq!(tx.amount, dec!(1500));
    assert_eq!(tx.kind, TransactionKind::Spending);
    assert_eq!(tx.firm_id, None);
    assert_eq!(tx.category, Some(SpendingCategory::OfficeRent));
}
