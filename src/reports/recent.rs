//! Recent expenses list

use serde::Serialize;

use crate::error::TrackerResult;
use crate::models::{OwnerId, Transaction};
use crate::storage::LedgerStore;

pub const DEFAULT_RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentExpenses {
    pub owner_id: OwnerId,
    /// Newest `occurred_on` first, then newest `recorded_at`
    pub transactions: Vec<Transaction>,
}

impl RecentExpenses {
    pub fn generate<S>(store: &S, owner: OwnerId, limit: usize) -> TrackerResult<Self>
    where
        S: LedgerStore + ?Sized,
    {
        Ok(Self {
            owner_id: owner,
            transactions: store.recent_transactions(owner, limit)?,
        })
    }

    pub fn format_terminal(&self, symbol: &str, date_format: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{:<12} {:<12} {:<20} {:<30} {:>12}\n",
            "ID", "Date", "Category", "Description", "Amount"
        ));
        output.push_str(&"-".repeat(90));
        output.push('\n');

        if self.transactions.is_empty() {
            output.push_str("  (no expenses recorded)\n");
        }
        for txn in &self.transactions {
            output.push_str(&format!(
                "{:<12} {:<12} {:<20} {:<30} {:>12}\n",
                txn.id.to_string(),
                txn.occurred_on.format(date_format).to_string(),
                truncate(&txn.category, 20),
                truncate(&txn.description, 30),
                txn.amount.format_with_symbol(symbol)
            ));
        }

        output
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max - 1).collect();
        format!("{}…", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TrackerPaths;
    use crate::models::Money;
    use crate::storage::Storage;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_newest_first_with_limit() {
        let (_temp_dir, storage) = create_test_storage();
        let owner = OwnerId::new();
        for day in [3, 9, 1, 7] {
            let date = NaiveDate::from_ymd_opt(2025, 5, day).unwrap();
            storage
                .record_transaction(
                    Transaction::new(owner, Money::from_minor(250), "Coffee", date)
                        .with_description(format!("day {}", day)),
                )
                .unwrap();
        }

        let recent = RecentExpenses::generate(&storage, owner, 3).unwrap();
        let days: Vec<_> = recent
            .transactions
            .iter()
            .map(|t| t.description.as_str())
            .collect();
        assert_eq!(days, vec!["day 9", "day 7", "day 3"]);

        let output = recent.format_terminal("$", "%Y-%m-%d");
        assert!(output.contains("2025-05-09"));
        assert!(output.contains("$2.50"));
    }

    #[test]
    fn test_truncate_long_text() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 5).chars().count(), 5);
    }
}
