use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

use firma_asistan::advisor::{self, GeminiClient};
use firma_asistan::aggregate::Summary;
use firma_asistan::config::{Config, DEFAULT_DATA_DIR, DEFAULT_MODEL};
use firma_asistan::domain::{CardId, FirmId, NewCard, SpendingCategory, TransactionId};
use firma_asistan::ledger::{DeletionTarget, Ledger, Spending, TransactionFilter};
use firma_asistan::report;
use firma_asistan::storage::{self, FileStore, Session};

fn main() -> anyhow::Result<()> {
    let args = Arguments::parse();
    if let Some(log_level) = args.log_level {
        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_writer(io::stderr)
            .init();
    }

    let config = Config {
        data_dir: args.data_dir,
        api_key: args.api_key,
        model: args.model,
    };
    let mut session = Session::open(FileStore::new(&config.data_dir))
        .with_context(|| format!("Failed to load data from {}", config.data_dir.display()))?;

    run(args.command, &mut session, &config)
}

#[derive(Parser)]
#[command(name = "firma-asistan", version, about = "Kart, firma ve işlem takibi")]
struct Arguments {
    /// Directory holding the ledger files.
    #[arg(long, global = true, env = "FIRMA_ASISTAN_DATA", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,
    #[arg(long, global = true)]
    log_level: Option<tracing::Level>,
    #[arg(long, global = true, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    #[arg(long, global = true, env = "FIRMA_ASISTAN_MODEL", default_value = DEFAULT_MODEL)]
    model: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage credit cards.
    #[command(subcommand)]
    Card(CardCommand),
    /// Manage firms.
    #[command(subcommand)]
    Firm(FirmCommand),
    /// Manage recorded transactions.
    #[command(subcommand)]
    Tx(TxCommand),
    /// Record a spending.
    Spend {
        #[arg(long)]
        amount: Decimal,
        #[arg(long)]
        description: String,
        #[arg(long)]
        category: Option<SpendingCategory>,
        #[arg(long)]
        card: Option<CardId>,
        #[arg(long)]
        firm: Option<FirmId>,
        /// Record even if the card's remaining limit is exceeded.
        #[arg(long)]
        force: bool,
    },
    /// Record a payment towards a card's balance.
    Pay {
        #[arg(long)]
        card: CardId,
        #[arg(long)]
        amount: Decimal,
        #[arg(long)]
        description: Option<String>,
    },
    /// Pay a firm's debt using a card.
    Settle {
        #[arg(long)]
        firm: FirmId,
        #[arg(long)]
        card: Option<CardId>,
        #[arg(long)]
        amount: Decimal,
    },
    /// Show totals and due-date alerts.
    Summary,
    /// Write the transaction report as CSV, newest first.
    Report {
        #[arg(long, short)]
        output: Option<PathBuf>,
        #[command(flatten)]
        filter: HistoryFilter,
    },
    /// Write a JSON backup of everything.
    Export {
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Replace everything with a JSON backup.
    Import {
        path: PathBuf,
        #[arg(long)]
        yes: bool,
    },
    /// Ask for a short piece of financial advice.
    Advise,
}

#[derive(Subcommand)]
enum CardCommand {
    Add {
        #[command(flatten)]
        form: CardForm,
        /// Debt already on the card.
        #[arg(long, default_value = "0")]
        debt: Decimal,
    },
    /// Edit a card's details. The balance is not changed.
    Edit {
        id: CardId,
        #[command(flatten)]
        form: CardForm,
    },
    Delete {
        id: CardId,
        #[arg(long)]
        yes: bool,
    },
    List,
}

#[derive(Args)]
struct CardForm {
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    bank: String,
    #[arg(long)]
    limit: Decimal,
    #[arg(long)]
    due_day: u8,
    #[arg(long, default_value_t = 1)]
    statement_day: u8,
}

impl CardForm {
    fn into_new_card(self) -> NewCard {
        NewCard::new(self.name, self.bank, self.limit)
            .due_on(self.due_day)
            .statement_on(self.statement_day)
    }
}

#[derive(Subcommand)]
enum FirmCommand {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "0")]
        debt: Decimal,
    },
    Delete {
        id: FirmId,
        #[arg(long)]
        yes: bool,
    },
    List,
}

#[derive(Subcommand)]
enum TxCommand {
    /// Delete a transaction and reverse its effect on balances.
    Delete {
        id: TransactionId,
        #[arg(long)]
        yes: bool,
    },
    /// List transactions, newest first.
    List {
        #[command(flatten)]
        filter: HistoryFilter,
    },
}

#[derive(Args)]
struct HistoryFilter {
    /// Only transactions on this card.
    #[arg(long)]
    card: Option<CardId>,
    /// Only transactions whose description contains this text.
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    category: Option<SpendingCategory>,
}

impl From<HistoryFilter> for TransactionFilter {
    fn from(args: HistoryFilter) -> Self {
        TransactionFilter {
            card: args.card,
            search: args.search,
            category: args.category,
        }
    }
}

fn run(command: Command, session: &mut Session<FileStore>, config: &Config) -> anyhow::Result<()> {
    let today = Local::now().date_naive();
    match command {
        Command::Card(command) => run_card(command, session),
        Command::Firm(command) => run_firm(command, session),
        Command::Tx(command) => run_tx(command, session),
        Command::Spend {
            amount,
            description,
            category,
            card,
            firm,
            force,
        } => {
            if let Some(warning) = card.and_then(|id| session.ledger().limit_warning(id, amount))
            {
                println!(
                    "Kalan limit {}, harcama {}.",
                    warning.remaining, warning.requested
                );
                if !confirm("Kurumsal kredi limiti aşılıyor. Onaylıyor musunuz?", force)? {
                    return Ok(());
                }
            }
            let mut spending = Spending::new(amount, description);
            spending.category = category;
            spending.card_id = card;
            spending.firm_id = firm;
            let id = session.apply(|ledger| ledger.record_spending(spending))?;
            println!("{id}");
            Ok(())
        }
        Command::Pay {
            card,
            amount,
            description,
        } => {
            let id = session.apply(|ledger| ledger.record_card_payment(card, amount, description))?;
            println!("{id}");
            Ok(())
        }
        Command::Settle { firm, card, amount } => {
            let id = session.apply(|ledger| ledger.record_firm_settlement(firm, card, amount))?;
            println!("{id}");
            Ok(())
        }
        Command::Summary => {
            print_summary(&Summary::of(session.ledger(), today));
            Ok(())
        }
        Command::Report { output, filter } => {
            let path = output.unwrap_or_else(|| PathBuf::from(report::report_file_name(today)));
            let file = BufWriter::new(File::create(&path)?);
            let ledger = session.ledger();
            report::write_csv(ledger, ledger.history(&filter.into()), file)?;
            println!("{}", path.display());
            Ok(())
        }
        Command::Export { output } => {
            let path = output.unwrap_or_else(|| PathBuf::from(report::backup_file_name(today)));
            fs::write(&path, storage::export_all(session.ledger()).to_json()?)?;
            println!("{}", path.display());
            Ok(())
        }
        Command::Import { path, yes } => {
            let text = fs::read_to_string(&path)?;
            let pending = storage::prepare_import(&text)?;
            let bundle = pending.bundle();
            println!(
                "{} kart, {} firma, {} işlem",
                bundle.cards.len(),
                bundle.firms.len(),
                bundle.transactions.len()
            );
            if confirm(
                "Veriler silinecek ve yedek yüklenecek. Onaylıyor musunuz?",
                yes,
            )? {
                session.import(pending)?;
                println!("Yedek yüklendi.");
            }
            Ok(())
        }
        Command::Advise => {
            let summary = Summary::of(session.ledger(), today);
            let client = GeminiClient::from_config(config);
            match advisor::advise_with(client, session.ledger(), &summary) {
                Some(advice) => println!("{advice}"),
                None => println!("Önce bir kart ekleyin."),
            }
            Ok(())
        }
    }
}

fn run_card(command: CardCommand, session: &mut Session<FileStore>) -> anyhow::Result<()> {
    match command {
        CardCommand::Add { form, debt } => {
            let data = form.into_new_card().with_debt(debt);
            let id = session.apply(|ledger| ledger.add_card(data))?;
            println!("{id}");
        }
        CardCommand::Edit { id, form } => {
            session.apply(|ledger| ledger.edit_card(id, form.into_new_card()))?;
        }
        CardCommand::Delete { id, yes } => {
            let pending = session.ledger().request_delete(DeletionTarget::Card(id))?;
            if confirm("Silsin mi?", yes)? {
                session.apply(|ledger| ledger.confirm_delete(pending))?;
            }
        }
        CardCommand::List => print_cards(session.ledger()),
    }
    Ok(())
}

fn run_firm(command: FirmCommand, session: &mut Session<FileStore>) -> anyhow::Result<()> {
    match command {
        FirmCommand::Add { name, debt } => {
            let id = session.apply(|ledger| ledger.add_firm(name, debt))?;
            println!("{id}");
        }
        FirmCommand::Delete { id, yes } => {
            let pending = session.ledger().request_delete(DeletionTarget::Firm(id))?;
            if confirm("Silsin mi?", yes)? {
                session.apply(|ledger| ledger.confirm_delete(pending))?;
            }
        }
        FirmCommand::List => {
            for firm in session.ledger().firms() {
                println!("{}  {}  {}", firm.id, firm.name, firm.total_debt);
            }
        }
    }
    Ok(())
}

fn run_tx(command: TxCommand, session: &mut Session<FileStore>) -> anyhow::Result<()> {
    match command {
        TxCommand::Delete { id, yes } => {
            let pending = session
                .ledger()
                .request_delete(DeletionTarget::Transaction(id))?;
            if confirm(
                "İşlemi silmek bakiyeleri de güncelleyecektir. Emin misiniz?",
                yes,
            )? {
                session.apply(|ledger| ledger.confirm_delete(pending))?;
            }
        }
        TxCommand::List { filter } => print_history(session.ledger(), &filter.into()),
    }
    Ok(())
}

fn print_cards(ledger: &Ledger) {
    for card in ledger.cards() {
        println!(
            "{}  {} ({})  {}/{}  son ödeme: {}",
            card.id, card.card_name, card.bank, card.used_amount, card.total_limit, card.due_day
        );
    }
}

fn print_history(ledger: &Ledger, filter: &TransactionFilter) {
    let history = ledger.history(filter);
    println!("{} kayıt bulundu", history.len());
    for tx in history {
        let card = tx
            .card_id
            .and_then(|id| ledger.card(&id))
            .map_or("-", |card| card.card_name.as_str());
        let category = tx.category.map_or("-", |c| c.label());
        println!(
            "{}  {}  {:<12}  {:<16}  {:<13}  {:>12}  {}",
            tx.id,
            report::format_date(&tx.date),
            card,
            category,
            tx.kind.label(),
            tx.amount,
            tx.description
        );
    }
}

fn print_summary(summary: &Summary) {
    println!("Toplam limit:  {}", summary.total_limit);
    println!("Kullanılan:    {}", summary.total_used);
    println!("Kalan:         {}", summary.total_remaining);
    println!("Firma borcu:   {}", summary.total_firm_debt);
    for alert in &summary.alerts {
        println!(
            "! {} ödemesine {} gün kaldı ({})",
            alert.card_name, alert.days_left, alert.used_amount
        );
    }
}

/// Asks on stdin unless `assume_yes` is set. Anything but yes declines.
fn confirm(question: &str, assume_yes: bool) -> anyhow::Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    eprint!("{question} [e/H] ");
    io::stderr().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "e" | "evet" | "y" | "yes"
    ))
}
