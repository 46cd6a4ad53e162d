use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::debug;

use expense_tracker::cli::{
    handle_audit, handle_breakdown, handle_expense_command, handle_goal_command, handle_recent,
    handle_summary, resolve_owner, ExpenseCommands, GoalCommands,
};
use expense_tracker::config::{paths::DATA_DIR_ENV, Settings, TrackerPaths};
use expense_tracker::models::OwnerId;
use expense_tracker::storage::Storage;

#[derive(Parser)]
#[command(
    name = "tracker",
    version,
    about = "Personal expense tracking and savings goals",
    long_about = "Track expenses, see where the money goes by day, week, month and \
                  category, and follow progress toward savings goals."
)]
struct Cli {
    /// Owner to act for (UUID); defaults to the configured default owner
    #[arg(long, global = true, env = "TRACKER_OWNER")]
    owner: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Expense management commands
    #[command(subcommand, alias = "exp")]
    Expense(ExpenseCommands),

    /// Spending totals for today, the last 7 days, this month and all time
    Summary {
        #[arg(long)]
        json: bool,
    },

    /// Spending per category
    Breakdown {
        /// Export to a CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },

    /// Most recent expenses
    Recent {
        /// Number of expenses to show (defaults to the configured limit)
        #[arg(short, long)]
        limit: Option<usize>,
        #[arg(long)]
        json: bool,
    },

    /// Savings goal commands
    #[command(subcommand)]
    Goal(GoalCommands),

    /// Show recent audit log entries
    Audit {
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show configuration and paths, or change settings
    Config {
        /// Owner used when --owner is not given
        #[arg(long)]
        default_owner: Option<String>,
        /// Currency symbol for printed amounts
        #[arg(long)]
        currency: Option<String>,
        /// Default number of recent expenses to show
        #[arg(long)]
        recent_limit: Option<usize>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let paths = TrackerPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    debug!("using data directory {}", paths.base_dir().display());

    let Some(command) = cli.command else {
        println!("tracker - expense tracking and savings goals");
        println!();
        println!("Run 'tracker --help' for usage information.");
        return Ok(());
    };

    let command = match command {
        Commands::Config {
            default_owner,
            currency,
            recent_limit,
        } => {
            return show_config(&paths, &mut settings, default_owner, currency, recent_limit)
        }
        other => other,
    };

    let owner = resolve_owner(cli.owner.as_deref(), &settings)?;

    let mut storage = Storage::new(paths)?;
    storage.load_all()?;

    match command {
        Commands::Expense(cmd) => handle_expense_command(&storage, &settings, owner, cmd)?,
        Commands::Summary { json } => handle_summary(&storage, &settings, owner, json)?,
        Commands::Breakdown { output, json } => {
            handle_breakdown(&storage, &settings, owner, output, json)?
        }
        Commands::Recent { limit, json } => {
            handle_recent(&storage, &settings, owner, limit, json)?
        }
        Commands::Goal(cmd) => handle_goal_command(&storage, &settings, owner, cmd)?,
        Commands::Audit { limit } => handle_audit(&storage, owner, limit)?,
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn show_config(
    paths: &TrackerPaths,
    settings: &mut Settings,
    default_owner: Option<String>,
    currency: Option<String>,
    recent_limit: Option<usize>,
) -> Result<()> {
    let changed = default_owner.is_some() || currency.is_some() || recent_limit.is_some();
    if let Some(owner) = default_owner {
        let owner: OwnerId = owner
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid owner ID: {}", owner))?;
        settings.default_owner = Some(owner.as_uuid().to_string());
    }
    if let Some(currency) = currency {
        settings.currency_symbol = currency;
    }
    if let Some(limit) = recent_limit {
        settings.recent_limit = limit;
    }
    if changed {
        settings.save(paths)?;
        println!("Settings saved.");
    }

    println!("Tracker Configuration");
    println!("=====================");
    println!("Base directory: {}", paths.base_dir().display());
    println!("Data directory: {}", paths.data_dir().display());
    println!("Audit log:      {}", paths.audit_log().display());
    println!("(override with {})", DATA_DIR_ENV);
    println!();
    println!("Settings:");
    println!("  Currency symbol: {}", settings.currency_symbol);
    println!("  Date format:     {}", settings.date_format);
    println!("  Recent limit:    {}", settings.recent_limit);
    println!(
        "  Default owner:   {}",
        settings.default_owner.as_deref().unwrap_or("(none)")
    );
    Ok(())
}
