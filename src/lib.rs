//! expense-tracker - per-owner expense aggregation and savings goals
//!
//! This library is the core of a personal finance tracker. It answers
//! spending questions over one owner's ledger and manages the lifecycle of
//! that owner's savings goals. Authentication happens elsewhere: every
//! operation takes an already-resolved `OwnerId`.
//!
//! # Architecture
//!
//! - `config`: data directory resolution and user settings
//! - `error`: the `TrackerError` hierarchy
//! - `models`: money, IDs, transactions and savings goals
//! - `storage`: the `LedgerStore` trait and its JSON file implementation
//! - `reports`: read-only aggregation over a `LedgerStore`
//! - `services`: the savings goal lifecycle
//! - `audit`: append-only log of every mutation
//! - `cli`: command handlers for the `tracker` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use expense_tracker::config::TrackerPaths;
//! use expense_tracker::reports::ExpenseSummary;
//! use expense_tracker::storage::Storage;
//!
//! let mut storage = Storage::new(TrackerPaths::new()?)?;
//! storage.load_all()?;
//! let summary = ExpenseSummary::generate(&storage, owner, chrono::Utc::now())?;
//! ```

pub mod audit;
pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{TrackerError, TrackerResult};
