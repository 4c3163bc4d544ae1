//! Card, firm and transaction ledger for a small business.
//!
//! The [`ledger::Ledger`] owns the three collections and keeps card balances,
//! firm debts and the transaction log consistent. [`aggregate`] derives the
//! dashboard numbers, [`storage`] persists the collections as JSON blobs, and
//! [`report`] and [`advisor`] produce the CSV report and the advisory text.

pub mod advisor;
pub mod aggregate;
pub mod config;
pub mod domain;
pub mod ledger;
pub mod report;
pub mod storage;
