//! CLI command handlers
//!
//! Bridges the clap argument parsing in `main.rs` with the reports, the
//! goal service and the storage layer.

pub mod expense;
pub mod goal;
pub mod report;

pub use expense::{handle_expense_command, ExpenseCommands};
pub use goal::{handle_goal_command, GoalCommands};
pub use report::{handle_audit, handle_breakdown, handle_recent, handle_summary};

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::Settings;
use crate::error::{TrackerError, TrackerResult};
use crate::models::{Money, OwnerId};

/// The owner to act for: the `--owner` flag, else the configured default
pub fn resolve_owner(flag: Option<&str>, settings: &Settings) -> TrackerResult<OwnerId> {
    let raw = flag
        .or(settings.default_owner.as_deref())
        .ok_or_else(|| {
            TrackerError::InvalidInput(
                "No owner given. Pass --owner <uuid> or run `tracker config --default-owner <uuid>`"
                    .into(),
            )
        })?;

    raw.trim()
        .parse()
        .map_err(|_| TrackerError::InvalidInput(format!("Invalid owner ID: {}", raw)))
}

pub(crate) fn parse_money(s: &str) -> TrackerResult<Money> {
    Money::parse(s).map_err(|e| TrackerError::InvalidInput(e.to_string()))
}

pub(crate) fn parse_date(s: &str) -> TrackerResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        TrackerError::InvalidInput(format!("Invalid date '{}'. Use YYYY-MM-DD", s))
    })
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> TrackerResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_owner_prefers_flag() {
        let mut settings = Settings::default();
        settings.default_owner = Some("550e8400-e29b-41d4-a716-446655440000".into());

        let flag = "6ba7b810-9dad-11d1-80b4-00c04fd430c8";
        let owner = resolve_owner(Some(flag), &settings).unwrap();
        assert_eq!(owner.as_uuid().to_string(), flag);

        let fallback = resolve_owner(None, &settings).unwrap();
        assert_eq!(
            fallback.as_uuid().to_string(),
            "550e8400-e29b-41d4-a716-446655440000"
        );
    }

    #[test]
    fn test_resolve_owner_requires_some_owner() {
        let err = resolve_owner(None, &Settings::default()).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(resolve_owner(Some("nobody"), &Settings::default())
            .unwrap_err()
            .is_invalid_input());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-02-28").unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
        assert!(parse_date("28/02/2025").is_err());
    }
}
