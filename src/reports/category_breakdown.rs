//! Category Breakdown
//!
//! Every category the owner has spent in, with its total and expense count.

use std::io::Write;

use serde::Serialize;

use crate::error::{TrackerError, TrackerResult};
use crate::models::{percent_of, Money, OwnerId};
use crate::storage::{CategoryTotal, LedgerStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryBreakdown {
    pub owner_id: OwnerId,
    /// Largest total first, ties by category name
    pub categories: Vec<CategoryTotal>,
    total: Money,
}

#[derive(Serialize)]
struct CsvRow<'a> {
    category: &'a str,
    total: String,
    count: usize,
    share_percent: i64,
}

impl CategoryBreakdown {
    pub fn generate<S>(store: &S, owner: OwnerId) -> TrackerResult<Self>
    where
        S: LedgerStore + ?Sized,
    {
        let categories = store.group_by_category(owner, None)?;
        let total = categories.iter().try_fold(Money::zero(), |acc, c| {
            acc.checked_add(c.total)
                .ok_or_else(|| TrackerError::amount_overflow("Expense total"))
        })?;

        Ok(Self {
            owner_id: owner,
            categories,
            total,
        })
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Format the breakdown for terminal display
    pub fn format_terminal(&self, symbol: &str) -> String {
        let total = self.total();
        let mut output = String::new();

        output.push_str("Spending by Category\n");
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{:<30} {:>15} {:>6} {:>5}\n",
            "Category", "Amount", "Count", "%"
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        for entry in &self.categories {
            output.push_str(&format!(
                "{:<30} {:>15} {:>6} {:>4}%\n",
                entry.category,
                entry.total.format_with_symbol(symbol),
                entry.count,
                percent_of(entry.total, total)
            ));
        }

        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{:<30} {:>15} {:>6}\n",
            "TOTAL",
            total.format_with_symbol(symbol),
            self.categories.iter().map(|c| c.count).sum::<usize>()
        ));

        output
    }

    /// Export the breakdown as CSV with a header row
    pub fn export_csv<W: Write>(&self, writer: W) -> TrackerResult<()> {
        let total = self.total();
        let mut csv = csv::Writer::from_writer(writer);

        for entry in &self.categories {
            csv.serialize(CsvRow {
                category: &entry.category,
                total: entry.total.format_with_symbol(""),
                count: entry.count,
                share_percent: percent_of(entry.total, total),
            })?;
        }

        csv.flush()
            .map_err(|e| TrackerError::Export(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TrackerPaths;
    use crate::models::Transaction;
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

    fn seed(storage: &Storage, owner: OwnerId) {
        let date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        for (minor, category) in [(50, "Food"), (30, "Food"), (20, "Transport")] {
            storage
                .record_transaction(Transaction::new(
                    owner,
                    Money::from_minor(minor),
                    category,
                    date,
                ))
                .unwrap();
        }
    }

    #[test]
    fn test_groups_and_ranks() {
        let (_temp_dir, storage) = create_test_storage();
        let owner = OwnerId::new();
        seed(&storage, owner);

        let breakdown = CategoryBreakdown::generate(&storage, owner).unwrap();
        assert_eq!(
            breakdown.categories,
            vec![
                CategoryTotal {
                    category: "Food".into(),
                    total: Money::from_minor(80),
                    count: 2,
                },
                CategoryTotal {
                    category: "Transport".into(),
                    total: Money::from_minor(20),
                    count: 1,
                },
            ]
        );
        assert_eq!(breakdown.total().minor(), 100);
    }

    #[test]
    fn test_overflowing_total_is_an_error() {
        let (_temp_dir, storage) = create_test_storage();
        let owner = OwnerId::new();
        let date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        for category in ["Rent", "Travel"] {
            storage
                .record_transaction(Transaction::new(
                    owner,
                    Money::from_minor(i64::MAX),
                    category,
                    date,
                ))
                .unwrap();
        }

        let err = CategoryBreakdown::generate(&storage, owner).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_empty_breakdown() {
        let (_temp_dir, storage) = create_test_storage();
        let breakdown = CategoryBreakdown::generate(&storage, OwnerId::new()).unwrap();
        assert!(breakdown.is_empty());
        assert!(breakdown.total().is_zero());
    }

    #[test]
    fn test_export_csv() {
        let (_temp_dir, storage) = create_test_storage();
        let owner = OwnerId::new();
        seed(&storage, owner);

        let breakdown = CategoryBreakdown::generate(&storage, owner).unwrap();
        let mut buffer = Vec::new();
        breakdown.export_csv(&mut buffer).unwrap();

        let csv = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "category,total,count,share_percent");
        assert_eq!(lines[1], "Food,0.80,2,80");
        assert_eq!(lines[2], "Transport,0.20,1,20");
    }

    #[test]
    fn test_format_terminal() {
        let (_temp_dir, storage) = create_test_storage();
        let owner = OwnerId::new();
        seed(&storage, owner);

        let output = CategoryBreakdown::generate(&storage, owner)
            .unwrap()
            .format_terminal("$");
        assert!(output.contains("Food"));
        assert!(output.contains("$0.80"));
        assert!(output.contains("TOTAL"));
    }
}
