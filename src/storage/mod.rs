//! Storage layer for the expense tracker
//!
//! Provides JSON file storage with atomic writes and owner-scoped
//! repositories, exposed to the rest of the crate through `LedgerStore`.

pub mod file_io;
pub mod goals;
pub mod ledger;
pub mod transactions;

pub use file_io::{read_json, write_json_atomic};
pub use goals::GoalRepository;
pub use ledger::{rank_categories, CategoryTotal, GoalAmountChange, LedgerStore};
pub use transactions::TransactionRepository;

use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, warn};

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::TrackerPaths;
use crate::error::{TrackerError, TrackerResult};
use crate::models::{
    GoalId, GoalStatus, Money, OwnerId, SavingsGoal, Transaction, TransactionId,
    TransactionUpdate,
};

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: TrackerPaths,
    pub transactions: TransactionRepository,
    pub goals: GoalRepository,
    audit: AuditLogger,
}

impl Storage {
    pub fn new(paths: TrackerPaths) -> Result<Self, TrackerError> {
        paths.ensure_directories()?;

        Ok(Self {
            transactions: TransactionRepository::new(paths.transactions_file()),
            goals: GoalRepository::new(paths.goals_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    pub fn paths(&self) -> &TrackerPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), TrackerError> {
        self.transactions.load()?;
        self.goals.load()?;
        debug!(
            "loaded ledger from {}",
            self.paths.data_dir().display()
        );
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), TrackerError> {
        self.transactions.save()?;
        self.goals.save()?;
        Ok(())
    }

    /// Record an expense for its owner
    ///
    /// Expense bookkeeping lives outside the aggregation core; this is the
    /// plain CRUD entry point the CLI and tests use to fill the ledger.
    pub fn record_transaction(&self, txn: Transaction) -> TrackerResult<Transaction> {
        txn.validate()
            .map_err(|e| TrackerError::InvalidInput(e.to_string()))?;
        self.transactions.upsert(txn.clone())?;

        self.audit_expense(AuditEntry::create(
            txn.recorded_at,
            EntityType::Transaction,
            txn.id.to_string(),
            txn.owner_id,
            &txn,
        ));
        Ok(txn)
    }

    /// Change an owner's expense in place
    ///
    /// Another owner's expense is `NotFound`; the edited expense must still
    /// validate.
    pub fn update_transaction(
        &self,
        owner: OwnerId,
        id: TransactionId,
        update: &TransactionUpdate,
    ) -> TrackerResult<Transaction> {
        let (before, after) = self.transactions.update(owner, id, update)?;

        self.audit_expense(AuditEntry::update(
            Utc::now(),
            EntityType::Transaction,
            id.to_string(),
            owner,
            &before,
            &after,
        ));
        Ok(after)
    }

    /// Delete one of an owner's expenses
    pub fn delete_transaction(&self, owner: OwnerId, id: TransactionId) -> TrackerResult<()> {
        let removed = self
            .transactions
            .delete(owner, id)?
            .ok_or_else(|| TrackerError::transaction_not_found(id.to_string()))?;

        self.audit_expense(AuditEntry::delete(
            Utc::now(),
            EntityType::Transaction,
            id.to_string(),
            owner,
            &removed,
        ));
        Ok(())
    }

    /// The expense is already saved; a lost audit line is only logged
    fn audit_expense(&self, entry: AuditEntry) {
        if let Err(e) = self.audit.log(&entry) {
            warn!("failed to write audit entry for expense {}: {}", entry.entity_id, e);
        }
    }

    /// All of an owner's expenses, newest first
    pub fn list_transactions(&self, owner: OwnerId) -> TrackerResult<Vec<Transaction>> {
        self.transactions.get_by_owner(owner)
    }
}

impl LedgerStore for Storage {
    fn sum_by_window(
        &self,
        owner: OwnerId,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> TrackerResult<Money> {
        self.transactions.sum_between(owner, start, end)
    }

    fn group_by_category(
        &self,
        owner: OwnerId,
        limit: Option<usize>,
    ) -> TrackerResult<Vec<CategoryTotal>> {
        self.transactions.category_totals(owner, limit)
    }

    fn recent_transactions(
        &self,
        owner: OwnerId,
        limit: usize,
    ) -> TrackerResult<Vec<Transaction>> {
        let mut transactions = self.transactions.get_by_owner(owner)?;
        transactions.truncate(limit);
        Ok(transactions)
    }

    fn get_goal(&self, owner: OwnerId, id: GoalId) -> TrackerResult<SavingsGoal> {
        self.goals.get(owner, id)
    }

    fn list_goals(
        &self,
        owner: OwnerId,
        status: Option<GoalStatus>,
    ) -> TrackerResult<Vec<SavingsGoal>> {
        self.goals.list(owner, status)
    }

    fn put_goal(&self, goal: SavingsGoal, expected_version: Option<u64>) -> TrackerResult<()> {
        self.goals.put(goal, expected_version)
    }

    fn compare_and_set_goal_amount(
        &self,
        owner: OwnerId,
        id: GoalId,
        new_amount: Money,
        now: DateTime<Utc>,
    ) -> TrackerResult<GoalAmountChange> {
        self.goals.set_amount(owner, id, new_amount, now)
    }

    fn delete_goal(&self, owner: OwnerId, id: GoalId) -> TrackerResult<bool> {
        self.goals.delete(owner, id)
    }

    fn record_audit(&self, entry: &AuditEntry) -> TrackerResult<()> {
        self.audit.log(entry)
    }
}
