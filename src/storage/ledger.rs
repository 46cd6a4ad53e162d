//! The ledger store abstraction
//!
//! Everything the aggregation reports and the goal lifecycle need from
//! persistence goes through `LedgerStore`. Every method is scoped by owner:
//! a record belonging to another owner behaves exactly like a missing one.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::audit::AuditEntry;
use crate::error::TrackerResult;
use crate::models::{GoalId, GoalStatus, Money, OwnerId, SavingsGoal, Transaction};

/// Summed spending for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Money,
    pub count: usize,
}

/// A goal on either side of one amount update
#[derive(Debug, Clone, PartialEq)]
pub struct GoalAmountChange {
    pub previous: SavingsGoal,
    pub updated: SavingsGoal,
}

/// Sort totals descending by amount, ties by category name
pub fn rank_categories(totals: &mut [CategoryTotal]) {
    totals.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });
}

pub trait LedgerStore: Send + Sync {
    /// Sum of the owner's expenses with `start <= occurred_on` and, when
    /// given, `occurred_on < end`
    fn sum_by_window(
        &self,
        owner: OwnerId,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> TrackerResult<Money>;

    /// Per-category totals, ranked by `rank_categories`, optionally truncated
    fn group_by_category(
        &self,
        owner: OwnerId,
        limit: Option<usize>,
    ) -> TrackerResult<Vec<CategoryTotal>>;

    /// Most recent expenses, newest `occurred_on` first, then newest `recorded_at`
    fn recent_transactions(&self, owner: OwnerId, limit: usize)
        -> TrackerResult<Vec<Transaction>>;

    /// Fetch one goal; `NotFound` if it is missing or owned by someone else
    fn get_goal(&self, owner: OwnerId, id: GoalId) -> TrackerResult<SavingsGoal>;

    /// The owner's goals, newest first, optionally filtered by status
    fn list_goals(
        &self,
        owner: OwnerId,
        status: Option<GoalStatus>,
    ) -> TrackerResult<Vec<SavingsGoal>>;

    /// Create or fully replace a goal
    ///
    /// With `expected_version`, the write only happens if the stored goal
    /// still has that version; otherwise `Conflict`. Replacing a goal that is
    /// missing for this owner is `NotFound`.
    fn put_goal(&self, goal: SavingsGoal, expected_version: Option<u64>) -> TrackerResult<()>;

    /// Atomically set a goal's saved amount and derive its status
    ///
    /// Read, status decision and write happen as one unit per goal, so
    /// concurrent calls cannot lose each other's update. `previous` is the
    /// state this call replaced.
    fn compare_and_set_goal_amount(
        &self,
        owner: OwnerId,
        id: GoalId,
        new_amount: Money,
        now: DateTime<Utc>,
    ) -> TrackerResult<GoalAmountChange>;

    /// Delete a goal; `false` if there was nothing to delete for this owner
    fn delete_goal(&self, owner: OwnerId, id: GoalId) -> TrackerResult<bool>;

    /// Append an entry to the audit trail, if the store keeps one
    fn record_audit(&self, _entry: &AuditEntry) -> TrackerResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(category: &str, minor: i64) -> CategoryTotal {
        CategoryTotal {
            category: category.into(),
            total: Money::from_minor(minor),
            count: 1,
        }
    }

    #[test]
    fn test_rank_categories_breaks_ties_by_name() {
        let mut totals = vec![total("Rent", 100), total("Food", 300), total("Bills", 100)];
        rank_categories(&mut totals);

        let names: Vec<_> = totals.iter().map(|t| t.category.as_str()).collect();
        assert_eq!(names, vec!["Food", "Bills", "Rent"]);
    }
}
