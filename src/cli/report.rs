//! CLI commands for the aggregation reports and the audit trail

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use chrono::Utc;

use crate::config::Settings;
use crate::error::{TrackerError, TrackerResult};
use crate::models::OwnerId;
use crate::reports::{CategoryBreakdown, ExpenseSummary, RecentExpenses};
use crate::storage::Storage;

use super::print_json;

/// Spending totals by window plus top categories
pub fn handle_summary(
    storage: &Storage,
    settings: &Settings,
    owner: OwnerId,
    json: bool,
) -> TrackerResult<()> {
    let summary = ExpenseSummary::generate(storage, owner, Utc::now())?;

    if json {
        print_json(&summary)
    } else {
        print!("{}", summary.format_terminal(&settings.currency_symbol));
        Ok(())
    }
}

/// Every category with its total, optionally exported as CSV
pub fn handle_breakdown(
    storage: &Storage,
    settings: &Settings,
    owner: OwnerId,
    output: Option<PathBuf>,
    json: bool,
) -> TrackerResult<()> {
    let breakdown = CategoryBreakdown::generate(storage, owner)?;

    if let Some(path) = output {
        let file = File::create(&path).map_err(|e| {
            TrackerError::Export(format!(
                "Failed to create file {}: {}",
                path.display(),
                e
            ))
        })?;
        breakdown.export_csv(BufWriter::new(file))?;
        println!("Category breakdown exported to: {}", path.display());
    } else if json {
        print_json(&breakdown)?;
    } else if breakdown.is_empty() {
        println!("No expenses recorded.");
    } else {
        print!("{}", breakdown.format_terminal(&settings.currency_symbol));
    }

    Ok(())
}

pub fn handle_recent(
    storage: &Storage,
    settings: &Settings,
    owner: OwnerId,
    limit: Option<usize>,
    json: bool,
) -> TrackerResult<()> {
    let recent =
        RecentExpenses::generate(storage, owner, limit.unwrap_or(settings.recent_limit))?;

    if json {
        print_json(&recent)
    } else {
        print!(
            "{}",
            recent.format_terminal(&settings.currency_symbol, &settings.date_format)
        );
        Ok(())
    }
}

/// The owner's most recent audit entries, oldest first
pub fn handle_audit(storage: &Storage, owner: OwnerId, limit: usize) -> TrackerResult<()> {
    let mut entries: Vec<_> = storage
        .audit()
        .read_all()?
        .into_iter()
        .filter(|e| e.owner_id == owner)
        .collect();
    let start = entries.len().saturating_sub(limit);
    let entries = entries.split_off(start);

    if entries.is_empty() {
        println!("No audit entries.");
    }
    for entry in entries {
        println!("{}", entry.format_human_readable());
    }

    Ok(())
}
