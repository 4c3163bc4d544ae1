//! Spreadsheet report of the transaction log.

use std::fmt::Display;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};

use crate::{domain::Transaction, ledger::Ledger};

pub const CSV_HEADER: [&str; 7] = [
    "Tarih",
    "Kart",
    "Firma",
    "Açıklama",
    "Kategori",
    "Tip",
    "Tutar",
];

/// Written first so spreadsheet programs detect UTF-8.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const MISSING: &str = "-";

/// Writes one row per transaction, in the order given. Names are looked up
/// in `ledger`. Card and firm columns show the name, or `-` when the
/// transaction has none or it was deleted.
pub fn write_csv<'a>(
    ledger: &Ledger,
    transactions: impl IntoIterator<Item = &'a Transaction>,
    mut writer: impl std::io::Write,
) -> anyhow::Result<()> {
    writer.write_all(UTF8_BOM)?;
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    wtr.write_record(CSV_HEADER)?;
    for tx in transactions {
        wtr.write_record(row(ledger, tx))?;
    }
    wtr.flush()?;
    Ok(())
}

fn row(ledger: &Ledger, tx: &Transaction) -> [String; 7] {
    let card = tx
        .card_id
        .and_then(|id| ledger.card(&id))
        .map_or(MISSING, |card| card.card_name.as_str());
    let firm = tx
        .firm_id
        .and_then(|id| ledger.firm(&id))
        .map_or(MISSING, |firm| firm.name.as_str());
    let category = tx.category.map_or(MISSING, |c| c.label());

    [
        format_date(&tx.date),
        card.to_string(),
        firm.to_string(),
        tx.description.clone(),
        category.to_string(),
        tx.kind.label().to_string(),
        tx.amount.normalize().to_string(),
    ]
}

/// Calendar date of a timestamp on the local clock, as `dd.mm.yyyy`.
pub fn format_date(date: &DateTime<Utc>) -> String {
    format_date_in(date, &Local)
}

pub fn format_date_in<Tz: TimeZone>(date: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    date.with_timezone(tz).format("%d.%m.%Y").to_string()
}

pub fn report_file_name(today: NaiveDate) -> String {
    format!("firma_asistan_rapor_{}.csv", today.format("%Y-%m-%d"))
}

pub fn backup_file_name(today: NaiveDate) -> String {
    format!("firma_asistan_yedek_{}.json", today.format("%Y-%m-%d"))
}
