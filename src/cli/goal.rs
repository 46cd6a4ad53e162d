//! Savings goal CLI commands

use clap::Subcommand;

use crate::clock::SystemClock;
use crate::config::Settings;
use crate::error::{TrackerError, TrackerResult};
use crate::models::{GoalCategory, GoalStatus, OwnerId, SavingsGoal};
use crate::reports::GoalSummary;
use crate::services::{CreateGoalInput, GoalService, GoalUpdate};
use crate::storage::Storage;

use super::{parse_date, parse_money, print_json};

/// Goal subcommands
#[derive(Subcommand, Debug)]
pub enum GoalCommands {
    /// List goals, newest first
    List {
        /// Only goals with this status (active, completed, paused)
        #[arg(short, long)]
        status: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one goal in full
    Show {
        /// Goal ID (full UUID or the short form from `list`)
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Create a goal
    Create {
        /// Goal title
        title: String,
        /// Target amount (e.g., "5000.00")
        target: String,
        /// Date to reach the target by (YYYY-MM-DD)
        #[arg(short, long)]
        by: String,
        /// Category (Emergency Fund, Vacation, House, Car, Education, Wedding, Retirement, Other)
        #[arg(short, long, default_value = "Other")]
        category: String,
        /// Amount already saved
        #[arg(long)]
        saved: Option<String>,
        /// Priority (high, medium, low)
        #[arg(short, long)]
        priority: Option<String>,
        /// Initial status (active, completed, paused)
        #[arg(long)]
        status: Option<String>,
        /// Reminder frequency (weekly, monthly)
        #[arg(long)]
        reminder: Option<String>,
        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Set the amount saved toward a goal
    Amount {
        /// Goal ID
        id: String,
        /// New saved amount
        #[arg(allow_negative_numbers = true)]
        amount: String,
    },
    /// Edit any field of a goal
    Edit {
        /// Goal ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        saved: Option<String>,
        #[arg(long)]
        target: Option<String>,
        /// New target date (YYYY-MM-DD)
        #[arg(long)]
        by: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        reminder: Option<String>,
        /// Enable or disable milestone alerts
        #[arg(long)]
        milestone_alerts: Option<bool>,
        /// Enable or disable the target date reminder
        #[arg(long)]
        date_reminder: Option<bool>,
    },
    /// Delete a goal
    Delete {
        /// Goal ID
        id: String,
    },
    /// Totals and progress across all goals
    Summary {
        #[arg(long)]
        json: bool,
    },
}

pub fn handle_goal_command(
    storage: &Storage,
    settings: &Settings,
    owner: OwnerId,
    cmd: GoalCommands,
) -> TrackerResult<()> {
    let clock = SystemClock;
    let service = GoalService::new(storage, &clock);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        GoalCommands::List { status, json } => {
            let status = status.as_deref().map(parse_enum::<GoalStatus>).transpose()?;
            let goals = service.list_goals(owner, status)?;

            if json {
                print_json(&goals)?;
            } else if goals.is_empty() {
                println!("No goals found.");
            } else {
                print!("{}", format_goal_list(&goals, symbol));
            }
        }
        GoalCommands::Show { id, json } => {
            let goal = service.find(owner, &id)?;
            if json {
                print_json(&goal)?;
            } else {
                print!("{}", format_goal_details(&goal, settings));
            }
        }
        GoalCommands::Create {
            title,
            target,
            by,
            category,
            saved,
            priority,
            status,
            reminder,
            notes,
        } => {
            let mut input = CreateGoalInput::new(
                title,
                parse_enum::<GoalCategory>(&category)?,
                parse_money(&target)?,
                parse_date(&by)?,
            );
            if let Some(saved) = saved {
                input.saved = parse_money(&saved)?;
            }
            if let Some(priority) = priority {
                input.priority = parse_enum(&priority)?;
            }
            if let Some(status) = status {
                input.status = parse_enum(&status)?;
            }
            if let Some(reminder) = reminder {
                input.alerts.reminder_frequency = parse_enum(&reminder)?;
            }
            if let Some(notes) = notes {
                input.notes = notes;
            }

            let goal = service.create_goal(owner, input)?;
            println!("Created goal: {} ({})", goal.title, goal.id);
            println!("  ID: {}", goal.id.as_uuid());
        }
        GoalCommands::Amount { id, amount } => {
            let goal = service.find(owner, &id)?;
            let updated = service.update_goal_amount(owner, goal.id, parse_money(&amount)?)?;
            println!(
                "{}: {} of {} ({}%) [{}]",
                updated.title,
                updated.saved.format_with_symbol(symbol),
                updated.target.format_with_symbol(symbol),
                updated.progress_percent(),
                updated.status
            );
            if updated.status != goal.status {
                println!("Status changed: {} -> {}", goal.status, updated.status);
            }
        }
        GoalCommands::Edit {
            id,
            title,
            category,
            saved,
            target,
            by,
            priority,
            status,
            notes,
            reminder,
            milestone_alerts,
            date_reminder,
        } => {
            let goal = service.find(owner, &id)?;
            let update = GoalUpdate {
                title,
                category: category.as_deref().map(parse_enum).transpose()?,
                saved: saved.as_deref().map(parse_money).transpose()?,
                target: target.as_deref().map(parse_money).transpose()?,
                target_date: by.as_deref().map(parse_date).transpose()?,
                priority: priority.as_deref().map(parse_enum).transpose()?,
                status: status.as_deref().map(parse_enum).transpose()?,
                notes,
                reminder_frequency: reminder.as_deref().map(parse_enum).transpose()?,
                milestone_alerts,
                target_date_reminder: date_reminder,
            };

            if update.is_empty() {
                println!("No changes specified.");
                return Ok(());
            }

            let edited = service.edit_goal(owner, goal.id, &update)?;
            println!("Updated goal: {} ({})", edited.title, edited.id);
        }
        GoalCommands::Delete { id } => {
            let goal = service.find(owner, &id)?;
            let deleted = service.delete_goal(owner, goal.id)?;
            println!("Deleted goal: {} ({})", deleted.title, deleted.id);
        }
        GoalCommands::Summary { json } => {
            let summary = GoalSummary::generate(storage, owner)?;
            if json {
                print_json(&summary)?;
            } else {
                print!("{}", summary.format_terminal(symbol));
            }
        }
    }

    Ok(())
}

fn parse_enum<T>(s: &str) -> TrackerResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    s.parse()
        .map_err(|e: T::Err| TrackerError::InvalidInput(e.to_string()))
}

fn format_goal_list(goals: &[SavingsGoal], symbol: &str) -> String {
    let mut output = format!(
        "{:<14} {:<24} {:<15} {:>13} {:>13} {:>5} {:<10}\n",
        "ID", "Title", "Category", "Saved", "Target", "%", "Status"
    );
    output.push_str(&"-".repeat(100));
    output.push('\n');

    for goal in goals {
        output.push_str(&format!(
            "{:<14} {:<24} {:<15} {:>13} {:>13} {:>4}% {:<10}\n",
            goal.id.to_string(),
            goal.title,
            goal.category.label(),
            goal.saved.format_with_symbol(symbol),
            goal.target.format_with_symbol(symbol),
            goal.progress_percent(),
            goal.status.to_string()
        ));
    }

    output
}

fn format_goal_details(goal: &SavingsGoal, settings: &Settings) -> String {
    let symbol = settings.currency_symbol.as_str();
    let yes_no = |b: bool| if b { "on" } else { "off" };

    let mut output = format!("Goal: {}\n", goal.title);
    output.push_str(&format!("  ID:          {}\n", goal.id.as_uuid()));
    output.push_str(&format!("  Category:    {}\n", goal.category));
    output.push_str(&format!("  Status:      {}\n", goal.status));
    output.push_str(&format!("  Priority:    {}\n", goal.priority));
    output.push_str(&format!(
        "  Progress:    {} of {} ({}%)\n",
        goal.saved.format_with_symbol(symbol),
        goal.target.format_with_symbol(symbol),
        goal.progress_percent()
    ));
    output.push_str(&format!(
        "  Remaining:   {}\n",
        goal.remaining().format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "  Target date: {}\n",
        goal.target_date.format(&settings.date_format)
    ));
    output.push_str(&format!(
        "  Reminders:   {}, milestones {}, target date {}\n",
        goal.alerts.reminder_frequency,
        yes_no(goal.alerts.milestone_alerts),
        yes_no(goal.alerts.target_date_reminder)
    ));
    if !goal.notes.is_empty() {
        output.push_str(&format!("  Notes:       {}\n", goal.notes));
    }
    output.push_str(&format!(
        "  Updated:     {}\n",
        goal.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output
}
