//! Goal Summary
//!
//! Totals and progress across all of an owner's savings goals, overall and
//! per goal category.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{TrackerError, TrackerResult};
use crate::models::{percent_of, GoalCategory, GoalStatus, Money, OwnerId};
use crate::storage::LedgerStore;

/// Saved and target amounts for one goal category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryProgress {
    pub category: GoalCategory,
    pub saved: Money,
    pub target: Money,
    pub progress_percent: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalSummary {
    pub owner_id: OwnerId,
    pub total_saved: Money,
    pub total_target: Money,
    pub active_count: usize,
    pub completed_count: usize,
    pub paused_count: usize,
    /// Rounded half-up, not clamped: over-saving reports above 100
    pub progress_percent: i64,
    /// Largest saved amount first
    pub per_category: Vec<CategoryProgress>,
}

impl GoalSummary {
    pub fn generate<S>(store: &S, owner: OwnerId) -> TrackerResult<Self>
    where
        S: LedgerStore + ?Sized,
    {
        let goals = store.list_goals(owner, None)?;

        let mut total_saved = Money::zero();
        let mut total_target = Money::zero();
        let (mut active_count, mut completed_count, mut paused_count) = (0, 0, 0);
        let mut by_category: BTreeMap<GoalCategory, (Money, Money)> = BTreeMap::new();

        let add = |acc: Money, amount: Money, what: &str| {
            acc.checked_add(amount)
                .ok_or_else(|| TrackerError::amount_overflow(what))
        };

        for goal in &goals {
            total_saved = add(total_saved, goal.saved, "Total saved")?;
            total_target = add(total_target, goal.target, "Total target")?;
            match goal.status {
                GoalStatus::Active => active_count += 1,
                GoalStatus::Completed => completed_count += 1,
                GoalStatus::Paused => paused_count += 1,
            }

            let entry = by_category
                .entry(goal.category)
                .or_insert((Money::zero(), Money::zero()));
            entry.0 = add(entry.0, goal.saved, "Saved per category")?;
            entry.1 = add(entry.1, goal.target, "Target per category")?;
        }

        let mut per_category: Vec<_> = by_category
            .into_iter()
            .map(|(category, (saved, target))| CategoryProgress {
                category,
                saved,
                target,
                progress_percent: percent_of(saved, target),
            })
            .collect();
        // Stable sort keeps category order among equal amounts
        per_category.sort_by(|a, b| b.saved.cmp(&a.saved));

        Ok(Self {
            owner_id: owner,
            total_saved,
            total_target,
            active_count,
            completed_count,
            paused_count,
            progress_percent: percent_of(total_saved, total_target),
            per_category,
        })
    }

    /// Format the summary for terminal display
    pub fn format_terminal(&self, symbol: &str) -> String {
        let mut output = String::new();

        output.push_str("Savings Goals Summary\n");
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "Saved {} of {} ({}%)\n",
            self.total_saved.format_with_symbol(symbol),
            self.total_target.format_with_symbol(symbol),
            self.progress_percent
        ));
        output.push_str(&format!(
            "Active: {}  Completed: {}  Paused: {}\n\n",
            self.active_count, self.completed_count, self.paused_count
        ));

        output.push_str(&format!(
            "{:<20} {:>15} {:>15} {:>6}\n",
            "Category", "Saved", "Target", "%"
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');
        for row in &self.per_category {
            output.push_str(&format!(
                "{:<20} {:>15} {:>15} {:>5}%\n",
                row.category.label(),
                row.saved.format_with_symbol(symbol),
                row.target.format_with_symbol(symbol),
                row.progress_percent
            ));
        }

        output
    }
}
