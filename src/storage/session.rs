use tracing::warn;

use super::{BlobStore, PendingImport, StorageError, load, save};
use crate::ledger::{Clock, Ledger, errors::LedgerError};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A ledger bound to the store it was loaded from. Every successful mutation
/// is written back before [`Session::apply`] returns.
#[derive(Debug)]
pub struct Session<S: BlobStore> {
    store: S,
    ledger: Ledger,
}

impl<S: BlobStore> Session<S> {
    pub fn open(store: S) -> Result<Self, StorageError> {
        let ledger = load(&store)?;
        Ok(Self { store, ledger })
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stamps transactions recorded through this session with `clock`.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.ledger = self.ledger.with_clock(clock);
        self
    }

    /// Runs `op` against a copy of the ledger and keeps the copy only once it
    /// is saved. If either the operation or the save fails, the ledger in
    /// memory stays as it was.
    pub fn apply<T>(
        &mut self,
        op: impl FnOnce(&mut Ledger) -> Result<T, LedgerError>,
    ) -> Result<T, SessionError> {
        let mut draft = self.ledger.clone();
        let output = op(&mut draft).inspect_err(|e| warn!("Operation rejected: {e}"))?;
        save(&mut self.store, &draft).inspect_err(|e| warn!("Save failed: {e}"))?;
        self.ledger = draft;
        Ok(output)
    }

    /// Replaces the whole state with a confirmed backup. The session's clock
    /// is kept.
    pub fn import(&mut self, pending: PendingImport) -> Result<(), StorageError> {
        let clock = self.ledger.clock();
        self.ledger = pending.commit(&mut self.store)?.with_clock(clock);
        Ok(())
    }
}
