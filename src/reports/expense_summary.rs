//! Expense Summary
//!
//! Spending totals for today, the trailing week, the current month and all
//! time, plus the owner's largest spending categories.

use std::thread;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::TrackerResult;
use crate::models::{Money, OwnerId};
use crate::storage::{CategoryTotal, LedgerStore};

use super::window::WindowBounds;

/// How many categories the summary ranks
pub const TOP_CATEGORIES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseSummary {
    pub owner_id: OwnerId,
    pub generated_at: DateTime<Utc>,
    #[serde(skip)]
    pub bounds: WindowBounds,
    pub today_total: Money,
    pub week_total: Money,
    pub month_total: Money,
    pub all_time_total: Money,
    /// At most `TOP_CATEGORIES` entries, largest total first
    pub top_categories: Vec<CategoryTotal>,
}

impl ExpenseSummary {
    /// Build the summary for `owner` as of `now`
    ///
    /// The five store queries are independent and run concurrently. The
    /// first store error fails the whole summary.
    pub fn generate<S>(store: &S, owner: OwnerId, now: DateTime<Utc>) -> TrackerResult<Self>
    where
        S: LedgerStore + ?Sized,
    {
        let bounds = WindowBounds::from_now(now);

        let (today, week, month, all_time, top) = thread::scope(|s| {
            let today = s.spawn(|| store.sum_by_window(owner, Some(bounds.today), None));
            let week = s.spawn(|| store.sum_by_window(owner, Some(bounds.week), None));
            let month = s.spawn(|| store.sum_by_window(owner, Some(bounds.month), None));
            let all_time = s.spawn(|| store.sum_by_window(owner, None, None));
            let top = s.spawn(|| store.group_by_category(owner, Some(TOP_CATEGORIES)));
            (
                join(today),
                join(week),
                join(month),
                join(all_time),
                join(top),
            )
        });

        let mut top_categories = top?;
        top_categories.truncate(TOP_CATEGORIES);

        Ok(Self {
            owner_id: owner,
            generated_at: now,
            bounds,
            today_total: today?,
            week_total: week?,
            month_total: month?,
            all_time_total: all_time?,
            top_categories,
        })
    }

    /// Format the summary for terminal display
    pub fn format_terminal(&self, symbol: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Expense Summary as of {}\n",
            self.generated_at.format("%Y-%m-%d %H:%M UTC")
        ));
        output.push_str(&"=".repeat(50));
        output.push('\n');

        let rows = [
            ("Today", self.today_total),
            ("Last 7 days", self.week_total),
            ("This month", self.month_total),
            ("All time", self.all_time_total),
        ];
        for (label, total) in rows {
            output.push_str(&format!(
                "{:<30} {:>15}\n",
                label,
                total.format_with_symbol(symbol)
            ));
        }

        output.push_str("\nTop Categories\n");
        output.push_str(&"-".repeat(50));
        output.push('\n');
        if self.top_categories.is_empty() {
            output.push_str("  (no expenses recorded)\n");
        }
        for (rank, entry) in self.top_categories.iter().enumerate() {
            output.push_str(&format!(
                "{}. {:<27} {:>15}\n",
                rank + 1,
                entry.category,
                entry.total.format_with_symbol(symbol)
            ));
        }

        output
    }
}

fn join<T>(handle: thread::ScopedJoinHandle<'_, TrackerResult<T>>) -> TrackerResult<T> {
    handle
        .join()
        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TrackerPaths;
    use crate::error::TrackerError;
    use crate::models::{GoalId, GoalStatus, SavingsGoal, Transaction};
    use crate::storage::{GoalAmountChange, Storage};
    use chrono::{NaiveDate, TimeZone};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn spend(storage: &Storage, owner: OwnerId, minor: i64, category: &str, date: NaiveDate) {
        storage
            .record_transaction(Transaction::new(
                owner,
                Money::from_minor(minor),
                category,
                date,
            ))
            .unwrap();
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    #[test]
    fn test_window_totals() {
        let (_temp_dir, storage) = create_test_storage();
        let owner = OwnerId::new();
        let now = Utc.with_ymd_and_hms(2025, 3, 20, 9, 0, 0).unwrap();

        spend(&storage, owner, 100, "Food", date(3, 20));
        spend(&storage, owner, 200, "Food", date(3, 15));
        spend(&storage, owner, 400, "Rent", date(3, 2));
        spend(&storage, owner, 800, "Rent", date(2, 10));
        spend(&storage, OwnerId::new(), 10_000, "Food", date(3, 20));

        let summary = ExpenseSummary::generate(&storage, owner, now).unwrap();
        assert_eq!(summary.today_total.minor(), 100);
        assert_eq!(summary.week_total.minor(), 300);
        assert_eq!(summary.month_total.minor(), 700);
        assert_eq!(summary.all_time_total.minor(), 1500);
        assert_eq!(summary.top_categories[0].category, "Rent");
        assert_eq!(summary.top_categories[0].total.minor(), 1200);
    }

    #[test]
    fn test_future_dated_expense_counts_in_every_window() {
        let (_temp_dir, storage) = create_test_storage();
        let owner = OwnerId::new();
        let now = Utc.with_ymd_and_hms(2025, 3, 20, 9, 0, 0).unwrap();
        spend(&storage, owner, 500, "Travel", date(4, 1));

        let summary = ExpenseSummary::generate(&storage, owner, now).unwrap();
        assert_eq!(summary.today_total.minor(), 500);
        assert_eq!(summary.month_total.minor(), 500);
    }

    #[test]
    fn test_overflowing_totals_are_an_error() {
        let (_temp_dir, storage) = create_test_storage();
        let owner = OwnerId::new();
        let largest = Money::parse("92233720368547758.07").unwrap();
        spend(&storage, owner, largest.minor(), "Food", date(3, 1));
        spend(&storage, owner, 1, "Food", date(3, 2));

        let now = Utc.with_ymd_and_hms(2025, 3, 20, 9, 0, 0).unwrap();
        let err = ExpenseSummary::generate(&storage, owner, now).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_empty_ledger() {
        let (_temp_dir, storage) = create_test_storage();
        let summary = ExpenseSummary::generate(&storage, OwnerId::new(), Utc::now()).unwrap();

        assert!(summary.today_total.is_zero());
        assert!(summary.all_time_total.is_zero());
        assert!(summary.top_categories.is_empty());
        assert!(summary.format_terminal("$").contains("no expenses recorded"));
    }

    #[test]
    fn test_top_categories_capped_at_five() {
        let (_temp_dir, storage) = create_test_storage();
        let owner = OwnerId::new();
        for (i, category) in ["A", "B", "C", "D", "E", "F", "G"].iter().enumerate() {
            spend(&storage, owner, 100 * (i as i64 + 1), category, date(1, 1));
        }

        let summary = ExpenseSummary::generate(&storage, owner, Utc::now()).unwrap();
        let names: Vec<_> = summary
            .top_categories
            .iter()
            .map(|c| c.category.as_str())
            .collect();
        assert_eq!(names, vec!["G", "F", "E", "D", "C"]);
    }

    struct Unavailable;

    impl LedgerStore for Unavailable {
        fn sum_by_window(
            &self,
            _: OwnerId,
            _: Option<NaiveDate>,
            _: Option<NaiveDate>,
        ) -> TrackerResult<Money> {
            Ok(Money::zero())
        }
        fn group_by_category(
            &self,
            _: OwnerId,
            _: Option<usize>,
        ) -> TrackerResult<Vec<CategoryTotal>> {
            Err(TrackerError::StorageUnavailable("ledger offline".into()))
        }
        fn recent_transactions(&self, _: OwnerId, _: usize) -> TrackerResult<Vec<Transaction>> {
            Ok(Vec::new())
        }
        fn get_goal(&self, _: OwnerId, id: GoalId) -> TrackerResult<SavingsGoal> {
            Err(TrackerError::goal_not_found(id.to_string()))
        }
        fn list_goals(
            &self,
            _: OwnerId,
            _: Option<GoalStatus>,
        ) -> TrackerResult<Vec<SavingsGoal>> {
            Ok(Vec::new())
        }
        fn put_goal(&self, _: SavingsGoal, _: Option<u64>) -> TrackerResult<()> {
            Ok(())
        }
        fn compare_and_set_goal_amount(
            &self,
            _: OwnerId,
            id: GoalId,
            _: Money,
            _: DateTime<Utc>,
        ) -> TrackerResult<GoalAmountChange> {
            Err(TrackerError::goal_not_found(id.to_string()))
        }
        fn delete_goal(&self, _: OwnerId, _: GoalId) -> TrackerResult<bool> {
            Ok(false)
        }
    }

    #[test]
    fn test_store_failure_fails_whole_summary() {
        let err = ExpenseSummary::generate(&Unavailable, OwnerId::new(), Utc::now()).unwrap_err();
        assert!(matches!(err, TrackerError::StorageUnavailable(_)));
    }
}
