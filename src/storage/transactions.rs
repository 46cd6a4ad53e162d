//! Transaction repository for JSON storage
//!
//! Manages loading and saving expenses to transactions.json, with an
//! owner index so every query touches only that owner's records.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;

use crate::error::TrackerError;
use crate::models::{Money, OwnerId, Transaction, TransactionId, TransactionUpdate};

use super::file_io::{read_json, write_json_atomic};
use super::ledger::{rank_categories, CategoryTotal};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    #[serde(default)]
    transactions: Vec<Transaction>,
}

#[derive(Clone, Default)]
struct Ledger {
    data: HashMap<TransactionId, Transaction>,
    /// Index: owner_id -> transaction_ids
    by_owner: HashMap<OwnerId, Vec<TransactionId>>,
}

impl Ledger {
    fn owned(&self, owner: OwnerId) -> impl Iterator<Item = &Transaction> {
        self.by_owner
            .get(&owner)
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(move |id| self.data.get(id))
    }

    fn owned_by(&self, owner: OwnerId, id: TransactionId) -> Option<&Transaction> {
        self.data.get(&id).filter(|t| t.owner_id == owner)
    }

    fn insert(&mut self, txn: Transaction) {
        if let Some(old) = self.data.get(&txn.id) {
            if let Some(ids) = self.by_owner.get_mut(&old.owner_id) {
                ids.retain(|&id| id != txn.id);
            }
        }
        self.by_owner.entry(txn.owner_id).or_default().push(txn.id);
        self.data.insert(txn.id, txn);
    }
}

/// Repository for expense persistence with an owner index
pub struct TransactionRepository {
    path: PathBuf,
    ledger: RwLock<Ledger>,
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            ledger: RwLock::new(Ledger::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Ledger>, TrackerError> {
        self.ledger.read().map_err(|e| {
            TrackerError::StorageUnavailable(format!("Failed to acquire read lock: {}", e))
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Ledger>, TrackerError> {
        self.ledger.write().map_err(|e| {
            TrackerError::StorageUnavailable(format!("Failed to acquire write lock: {}", e))
        })
    }

    /// Load transactions from disk and rebuild the owner index
    pub fn load(&self) -> Result<(), TrackerError> {
        let file_data: TransactionData = read_json(&self.path)?;
        let mut ledger = self.write()?;

        *ledger = Ledger::default();
        for txn in file_data.transactions {
            ledger.insert(txn);
        }

        Ok(())
    }

    fn persist(&self, ledger: &Ledger) -> Result<(), TrackerError> {
        let mut transactions: Vec<_> = ledger.data.values().cloned().collect();
        transactions.sort_by(|a, b| {
            b.occurred_on
                .cmp(&a.occurred_on)
                .then(b.recorded_at.cmp(&a.recorded_at))
        });
        write_json_atomic(&self.path, &TransactionData { transactions })
    }

    /// Write `next` to disk, then make it the in-memory ledger
    ///
    /// A failed write leaves `current` exactly as it was.
    fn commit(&self, current: &mut Ledger, next: Ledger) -> Result<(), TrackerError> {
        self.persist(&next)?;
        *current = next;
        Ok(())
    }

    /// Save transactions to disk
    pub fn save(&self) -> Result<(), TrackerError> {
        let ledger = self.read()?;
        self.persist(&ledger)
    }

    /// Get one of the owner's transactions
    pub fn get(
        &self,
        owner: OwnerId,
        id: TransactionId,
    ) -> Result<Option<Transaction>, TrackerError> {
        let ledger = self.read()?;
        Ok(ledger.owned_by(owner, id).cloned())
    }

    /// All of an owner's transactions, newest first
    pub fn get_by_owner(&self, owner: OwnerId) -> Result<Vec<Transaction>, TrackerError> {
        let ledger = self.read()?;
        let mut transactions: Vec<_> = ledger.owned(owner).cloned().collect();
        transactions.sort_by(|a, b| {
            b.occurred_on
                .cmp(&a.occurred_on)
                .then(b.recorded_at.cmp(&a.recorded_at))
        });
        Ok(transactions)
    }

    /// Sum of the owner's amounts with `start <= occurred_on < end`
    pub fn sum_between(
        &self,
        owner: OwnerId,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Money, TrackerError> {
        let ledger = self.read()?;
        let total = ledger
            .owned(owner)
            .filter(|t| start.map_or(true, |s| t.occurred_on >= s))
            .filter(|t| end.map_or(true, |e| t.occurred_on < e))
            .try_fold(Money::zero(), |acc, t| {
                acc.checked_add(t.amount)
                    .ok_or_else(|| TrackerError::amount_overflow("Expense total"))
            });
        total
    }

    /// Per-category totals for the owner, ranked
    pub fn category_totals(
        &self,
        owner: OwnerId,
        limit: Option<usize>,
    ) -> Result<Vec<CategoryTotal>, TrackerError> {
        let ledger = self.read()?;

        let mut by_category: HashMap<&str, (Money, usize)> = HashMap::new();
        for txn in ledger.owned(owner) {
            let entry = by_category
                .entry(txn.category.as_str())
                .or_insert((Money::zero(), 0));
            entry.0 = entry.0.checked_add(txn.amount).ok_or_else(|| {
                TrackerError::amount_overflow(&format!("Total for category '{}'", txn.category))
            })?;
            entry.1 += 1;
        }

        let mut totals: Vec<_> = by_category
            .into_iter()
            .map(|(category, (total, count))| CategoryTotal {
                category: category.to_string(),
                total,
                count,
            })
            .collect();
        rank_categories(&mut totals);

        if let Some(limit) = limit {
            totals.truncate(limit);
        }
        Ok(totals)
    }

    /// Insert or update a transaction and persist
    ///
    /// An id already held by another owner is `NotFound`; ownership never
    /// moves.
    pub fn upsert(&self, txn: Transaction) -> Result<(), TrackerError> {
        let mut ledger = self.write()?;

        match ledger.data.get(&txn.id) {
            Some(existing) if existing.owner_id != txn.owner_id => {
                return Err(TrackerError::transaction_not_found(txn.id.to_string()));
            }
            _ => {}
        }

        let mut next = ledger.clone();
        next.insert(txn);
        self.commit(&mut ledger, next)
    }

    /// Apply an edit to one of the owner's transactions and persist
    ///
    /// The edited transaction is validated before anything is written.
    /// Returns the transaction as it was and as it is now.
    pub fn update(
        &self,
        owner: OwnerId,
        id: TransactionId,
        update: &TransactionUpdate,
    ) -> Result<(Transaction, Transaction), TrackerError> {
        let mut ledger = self.write()?;

        let previous = ledger
            .owned_by(owner, id)
            .cloned()
            .ok_or_else(|| TrackerError::transaction_not_found(id.to_string()))?;
        let mut txn = previous.clone();
        update.apply_to(&mut txn);
        txn.validate()
            .map_err(|e| TrackerError::InvalidInput(e.to_string()))?;

        let mut next = ledger.clone();
        next.insert(txn.clone());
        self.commit(&mut ledger, next)?;
        Ok((previous, txn))
    }

    /// Delete one of the owner's transactions and persist
    ///
    /// Returns the removed transaction, or `None` if the owner has no such id.
    pub fn delete(
        &self,
        owner: OwnerId,
        id: TransactionId,
    ) -> Result<Option<Transaction>, TrackerError> {
        let mut ledger = self.write()?;

        let Some(removed) = ledger.owned_by(owner, id).cloned() else {
            return Ok(None);
        };

        let mut next = ledger.clone();
        next.data.remove(&id);
        if let Some(ids) = next.by_owner.get_mut(&owner) {
            ids.retain(|&tid| tid != id);
        }
        self.commit(&mut ledger, next)?;
        Ok(Some(removed))
    }

    /// Count all transactions across owners
    pub fn count(&self) -> Result<usize, TrackerError> {
        Ok(self.read()?.data.len())
    }
}
