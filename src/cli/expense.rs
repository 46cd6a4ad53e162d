//! Expense CLI commands
//!
//! Recording and removing expenses. The reports read what these write.

use chrono::Utc;
use clap::Subcommand;

use crate::config::Settings;
use crate::error::{TrackerError, TrackerResult};
use crate::models::{OwnerId, Transaction, TransactionId, TransactionUpdate};
use crate::reports::RecentExpenses;
use crate::storage::Storage;

use super::{parse_date, parse_money, print_json};

/// Expense subcommands
#[derive(Subcommand, Debug)]
pub enum ExpenseCommands {
    /// Record an expense
    Add {
        /// Amount spent (e.g., "12.50")
        #[arg(allow_negative_numbers = true)]
        amount: String,
        /// Category label (e.g., "Food")
        category: String,
        /// Date of the expense (YYYY-MM-DD), defaults to today (UTC)
        #[arg(short, long)]
        date: Option<String>,
        /// What the money was spent on
        #[arg(short = 'm', long)]
        description: Option<String>,
    },
    /// List expenses, newest first
    List {
        /// Number of expenses to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Change an expense's amount, category, date or description
    Edit {
        /// Expense ID (full UUID or the short form from `list`)
        id: String,
        #[arg(short, long, allow_negative_numbers = true)]
        amount: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short = 'm', long)]
        description: Option<String>,
    },
    /// Delete an expense
    Delete {
        /// Expense ID (full UUID or the short form from `list`)
        id: String,
    },
}

pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    owner: OwnerId,
    cmd: ExpenseCommands,
) -> TrackerResult<()> {
    match cmd {
        ExpenseCommands::Add {
            amount,
            category,
            date,
            description,
        } => {
            let amount = parse_money(&amount)?;
            let occurred_on = match date {
                Some(d) => parse_date(&d)?,
                None => Utc::now().date_naive(),
            };

            let mut txn = Transaction::new(owner, amount, category, occurred_on);
            if let Some(description) = description {
                txn = txn.with_description(description);
            }

            let txn = storage.record_transaction(txn)?;
            println!(
                "Recorded {} in {} on {} ({})",
                txn.amount.format_with_symbol(&settings.currency_symbol),
                txn.category,
                txn.occurred_on,
                txn.id
            );
        }
        ExpenseCommands::List { limit, json } => {
            let recent = RecentExpenses::generate(storage, owner, limit)?;
            if json {
                print_json(&recent)?;
            } else {
                print!(
                    "{}",
                    recent.format_terminal(&settings.currency_symbol, &settings.date_format)
                );
            }
        }
        ExpenseCommands::Edit {
            id,
            amount,
            category,
            date,
            description,
        } => {
            let update = TransactionUpdate {
                amount: amount.as_deref().map(parse_money).transpose()?,
                category,
                description,
                occurred_on: date.as_deref().map(parse_date).transpose()?,
            };
            if update.is_empty() {
                println!("No changes specified.");
                return Ok(());
            }

            let txn = find_transaction(storage, owner, &id)?;
            let txn = storage.update_transaction(owner, txn.id, &update)?;
            println!(
                "Updated expense {}: {} in {} on {}",
                txn.id,
                txn.amount.format_with_symbol(&settings.currency_symbol),
                txn.category,
                txn.occurred_on
            );
        }
        ExpenseCommands::Delete { id } => {
            let txn = find_transaction(storage, owner, &id)?;
            storage.delete_transaction(owner, txn.id)?;
            println!("Deleted expense {} ({})", txn.id, txn);
        }
    }

    Ok(())
}

/// Resolve a full or short expense ID among the owner's expenses
fn find_transaction(
    storage: &Storage,
    owner: OwnerId,
    identifier: &str,
) -> TrackerResult<Transaction> {
    let identifier = identifier.trim();
    if let Ok(id) = identifier.parse::<TransactionId>() {
        return storage
            .transactions
            .get(owner, id)?
            .ok_or_else(|| TrackerError::transaction_not_found(identifier));
    }

    let prefix = identifier.strip_prefix("txn-").unwrap_or(identifier);
    let mut matches: Vec<_> = storage
        .list_transactions(owner)?
        .into_iter()
        .filter(|t| !prefix.is_empty() && t.id.as_uuid().to_string().starts_with(prefix))
        .collect();

    match matches.len() {
        0 => Err(TrackerError::transaction_not_found(identifier)),
        1 => Ok(matches.remove(0)),
        n => Err(TrackerError::InvalidInput(format!(
            "'{}' matches {} expenses; use a longer ID",
            identifier, n
        ))),
    }
}
