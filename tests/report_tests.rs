mod common;

use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
use common::{add_card, add_firm, ledger};
use firma_asistan::{
    domain::SpendingCategory,
    ledger::{Spending, TransactionFilter},
    report::{self, CSV_HEADER},
};
use rust_decimal::dec;

const EXPECTED: &str = include_str!("report_tests/expected.csv");

fn render(ledger: &firma_asistan::ledger::Ledger) -> anyhow::Result<String> {
    let mut output = Vec::new();
    report::write_csv(ledger, ledger.transactions(), &mut output)?;
    Ok(String::from_utf8(output)?)
}

/// Every transaction becomes one row, names resolved and fields quoted where needed.
#[test]
fn report_lists_every_transaction() -> anyhow::Result<()> {
    let mut ledger = ledger();
    let card = add_card(&mut ledger, "Bonus", dec!(10000), dec!(0), 15);
    let firm = add_firm(&mut ledger, "Acme", dec!(1000));
    ledger.record_spending(
        Spending::new(dec!(1500), "Office rent")
            .on_card(card)
            .category(SpendingCategory::OfficeRent),
    )?;
    ledger.record_card_payment(card, dec!(250.50), None)?;
    ledger.record_firm_settlement(firm, Some(card), dec!(700))?;
    ledger.record_spending(Spending::new(dec!(42), "Parts, bolts").for_firm(firm))?;

    let output = render(&ledger)?;

    assert_eq!(output.strip_prefix('\u{feff}'), Some(EXPECTED));
    Ok(())
}

/// A 1500 spending on Bonus ends its row with `Harcama,1500`.
#[test]
fn single_spending_row_ends_with_label_and_amount() -> anyhow::Result<()> {
    let mut ledger = ledger();
    let card = add_card(&mut ledger, "Bonus", dec!(10000), dec!(0), 15);
    ledger.record_spending(Spending::new(dec!(1500), "Stock").on_card(card))?;

    let output = render(&ledger)?;
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], format!("\u{feff}{}", CSV_HEADER.join(",")));
    assert!(lines[1].ends_with("Harcama,1500"));
    assert_eq!(lines[1].split(',').nth(1), Some("Bonus"));
    Ok(())
}

/// A transaction whose card was deleted shows `-` in the card column.
#[test]
fn deleted_card_shows_as_dash() -> anyhow::Result<()> {
    let mut ledger = ledger();
    let card = add_card(&mut ledger, "Bonus", dec!(10000), dec!(0), 15);
    ledger.record_spending(Spending::new(dec!(10), "Fuel").on_card(card))?;
    ledger.delete_card(card)?;

    let output = render(&ledger)?;

    assert!(output.lines().nth(1).unwrap().starts_with("15.03.2024,-,-,Fuel"));
    Ok(())
}

/// An empty log still writes the BOM and header line.
#[test]
fn empty_log_writes_only_header() -> anyhow::Result<()> {
    let output = render(&ledger())?;

    assert_eq!(
        output,
        "\u{feff}Tarih,Kart,Firma,Açıklama,Kategori,Tip,Tutar\n"
    );
    Ok(())
}

/// Report and backup file names carry the day they were written.
#[test]
fn file_names_carry_the_date() {
    let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();

    assert_eq!(report::report_file_name(day), "firma_asistan_rapor_2024-03-05.csv");
    assert_eq!(report::backup_file_name(day), "firma_asistan_yedek_2024-03-05.json");
}

/// The report covers only the rows it is handed, such as a filtered history.
#[test]
fn filtered_history_report_holds_only_matching_rows() -> anyhow::Result<()> {
    let mut ledger = ledger();
    let bonus = add_card(&mut ledger, "Bonus", dec!(10000), dec!(0), 15);
    let axess = add_card(&mut ledger, "Axess", dec!(10000), dec!(0), 15);
    ledger.record_spending(Spending::new(dec!(10), "Fuel").on_card(bonus))?;
    ledger.record_spending(Spending::new(dec!(20), "Toner").on_card(axess))?;
    ledger.record_spending(Spending::new(dec!(30), "Fuel again").on_card(bonus))?;

    let mut output = Vec::new();
    let history = ledger.history(&TransactionFilter::new().on_card(bonus));
    report::write_csv(&ledger, history, &mut output)?;
    let output = String::from_utf8(output)?;
    let lines: Vec<&str> = output.lines().skip(1).collect();

    assert_eq!(
        lines,
        [
            "15.03.2024,Bonus,-,Fuel,-,Harcama,10",
            "15.03.2024,Bonus,-,Fuel again,-,Harcama,30",
        ]
    );
    Ok(())
}

/// Dates are printed on the local calendar, so a late-evening UTC timestamp
/// is already the next day in Türkiye.
#[test]
fn dates_follow_the_local_calendar() {
    let istanbul = FixedOffset::east_opt(3 * 3600).unwrap();
    let late = Utc.with_ymd_and_hms(2024, 3, 14, 22, 30, 0).unwrap();

    assert_eq!(report::format_date_in(&late, &istanbul), "15.03.2024");
    assert_eq!(report::format_date_in(&late, &Utc), "14.03.2024");
}
