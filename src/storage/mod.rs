//! Persistence of the three ledger collections as independent JSON blobs,
//! plus the single-document backup format.
//!
//! Each collection lives under its own key in a [`BlobStore`]. All three are
//! written together whenever the ledger changes; an absent key loads as an
//! empty collection.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, info, warn};

use crate::{
    domain::{Card, Firm, Transaction},
    ledger::Ledger,
};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use session::{Session, SessionError};

mod file;
mod memory;
mod session;

pub const CARDS_KEY: &str = "firmaasistan_v12_cards";
pub const TRANSACTIONS_KEY: &str = "firmaasistan_v12_tx";
pub const FIRMS_KEY: &str = "firmaasistan_v12_firms";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Stored data under {key} is malformed: {source}")]
    Json {
        key: &'static str,
        source: serde_json::Error,
    },
    #[error("Invalid backup file")]
    InvalidBackup,
}

/// Key-value storage of text blobs.
pub trait BlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Reads all three collections. A missing key yields an empty collection.
pub fn load(store: &impl BlobStore) -> Result<Ledger, StorageError> {
    let cards: Vec<Card> = read_list(store, CARDS_KEY)?;
    let transactions: Vec<Transaction> = read_list(store, TRANSACTIONS_KEY)?;
    let firms: Vec<Firm> = read_list(store, FIRMS_KEY)?;
    debug!(
        cards = cards.len(),
        firms = firms.len(),
        transactions = transactions.len(),
        "Loaded ledger"
    );
    Ok(Ledger::from_parts(cards, firms, transactions))
}

/// Writes all three collections.
pub fn save(store: &mut impl BlobStore, ledger: &Ledger) -> Result<(), StorageError> {
    write_list(store, CARDS_KEY, ledger.cards())?;
    write_list(store, TRANSACTIONS_KEY, ledger.transactions())?;
    write_list(store, FIRMS_KEY, ledger.firms())?;
    debug!("Saved ledger");
    Ok(())
}

fn read_list<T: DeserializeOwned>(
    store: &impl BlobStore,
    key: &'static str,
) -> Result<Vec<T>, StorageError> {
    match store.get(key)? {
        Some(text) => {
            serde_json::from_str(&text).map_err(|source| StorageError::Json { key, source })
        }
        None => Ok(Vec::new()),
    }
}

fn write_list<T: Serialize>(
    store: &mut impl BlobStore,
    key: &'static str,
    items: &[T],
) -> Result<(), StorageError> {
    let text = serde_json::to_string(items).map_err(|source| StorageError::Json { key, source })?;
    store.set(key, &text)
}

/// Full backup of the ledger as one JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    pub cards: Vec<Card>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub firms: Vec<Firm>,
}

impl Bundle {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

pub fn export_all(ledger: &Ledger) -> Bundle {
    Bundle {
        cards: ledger.cards().to_vec(),
        transactions: ledger.transactions().to_vec(),
        firms: ledger.firms().to_vec(),
    }
}

/// A parsed backup waiting for confirmation. Dropping it leaves the store
/// untouched.
#[must_use = "an import does nothing until committed"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingImport {
    bundle: Bundle,
}

/// Parses a backup document. Anything that is not a JSON object with a
/// `cards` field is rejected as an invalid file.
pub fn prepare_import(text: &str) -> Result<PendingImport, StorageError> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(|e| {
        warn!("Backup is not valid JSON: {e}");
        StorageError::InvalidBackup
    })?;
    if value.get("cards").is_none() {
        warn!("Backup has no cards field");
        return Err(StorageError::InvalidBackup);
    }
    // Typed parse from the text so amounts keep every digit.
    let bundle = serde_json::from_str(text).map_err(|e| {
        warn!("Backup does not match the ledger schema: {e}");
        StorageError::InvalidBackup
    })?;
    Ok(PendingImport { bundle })
}

impl PendingImport {
    pub fn bundle(&self) -> &Bundle {
        &self.bundle
    }

    /// Overwrites all three blobs, then reloads the ledger from the store.
    pub fn commit(self, store: &mut impl BlobStore) -> Result<Ledger, StorageError> {
        let Bundle {
            cards,
            transactions,
            firms,
        } = self.bundle;
        info!(
            cards = cards.len(),
            firms = firms.len(),
            transactions = transactions.len(),
            "Importing backup"
        );
        write_list(store, CARDS_KEY, &cards)?;
        write_list(store, TRANSACTIONS_KEY, &transactions)?;
        write_list(store, FIRMS_KEY, &firms)?;
        load(store)
    }
}
