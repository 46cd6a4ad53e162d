//! Savings goal model
//!
//! A savings goal tracks how much an owner has put aside toward a target
//! amount. Its status follows the saved amount (Active until the target is
//! reached, then Completed) unless the owner has paused it.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{GoalId, OwnerId};
use super::money::{percent_of, Money};

/// Normalize an enum label for lenient parsing ("Emergency Fund" == "emergency-fund")
fn normalize_label(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// What the owner is saving for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GoalCategory {
    #[serde(rename = "Emergency Fund")]
    EmergencyFund,
    Vacation,
    House,
    Car,
    Education,
    Wedding,
    Retirement,
    Other,
}

impl GoalCategory {
    pub fn all() -> &'static [GoalCategory] {
        &[
            Self::EmergencyFund,
            Self::Vacation,
            Self::House,
            Self::Car,
            Self::Education,
            Self::Wedding,
            Self::Retirement,
            Self::Other,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::EmergencyFund => "Emergency Fund",
            Self::Vacation => "Vacation",
            Self::House => "House",
            Self::Car => "Car",
            Self::Education => "Education",
            Self::Wedding => "Wedding",
            Self::Retirement => "Retirement",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for GoalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for GoalCategory {
    type Err = GoalValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        Self::all()
            .iter()
            .find(|c| normalize_label(c.label()) == wanted)
            .copied()
            .ok_or_else(|| GoalValidationError::UnknownCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "High"),
            Self::Medium => write!(f, "Medium"),
            Self::Low => write!(f, "Low"),
        }
    }
}

impl FromStr for Priority {
    type Err = GoalValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(GoalValidationError::UnknownPriority(s.to_string())),
        }
    }
}

/// Lifecycle state of a savings goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
    /// Manual override; amount updates never enter or leave this state
    Paused,
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Completed => write!(f, "Completed"),
            Self::Paused => write!(f, "Paused"),
        }
    }
}

impl FromStr for GoalStatus {
    type Err = GoalValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "paused" => Ok(Self::Paused),
            _ => Err(GoalValidationError::UnknownStatus(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ReminderFrequency {
    Weekly,
    #[default]
    Monthly,
}

impl fmt::Display for ReminderFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weekly => write!(f, "Weekly"),
            Self::Monthly => write!(f, "Monthly"),
        }
    }
}

impl FromStr for ReminderFrequency {
    type Err = GoalValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(GoalValidationError::UnknownReminderFrequency(
                s.to_string(),
            )),
        }
    }
}

/// Reminder preferences attached to a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertConfig {
    #[serde(default)]
    pub reminder_frequency: ReminderFrequency,
    #[serde(default = "default_true")]
    pub milestone_alerts: bool,
    #[serde(default = "default_true")]
    pub target_date_reminder: bool,
}

fn default_true() -> bool {
    true
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            reminder_frequency: ReminderFrequency::Monthly,
            milestone_alerts: true,
            target_date_reminder: true,
        }
    }
}

/// A savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: GoalId,
    pub owner_id: OwnerId,
    pub title: String,
    pub category: GoalCategory,
    /// Amount saved so far
    pub saved: Money,
    /// Amount the owner wants to reach
    pub target: Money,
    pub target_date: NaiveDate,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: GoalStatus,
    #[serde(default)]
    pub alerts: AlertConfig,
    #[serde(default)]
    pub notes: String,
    /// Bumped on every stored mutation; used for optimistic writes
    #[serde(default)]
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SavingsGoal {
    /// Create a new active goal with nothing saved yet
    pub fn new(
        owner_id: OwnerId,
        title: impl Into<String>,
        category: GoalCategory,
        target: Money,
        target_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: GoalId::new(),
            owner_id,
            title: title.into().trim().to_string(),
            category,
            saved: Money::zero(),
            target,
            target_date,
            priority: Priority::default(),
            status: GoalStatus::default(),
            alerts: AlertConfig::default(),
            notes: String::new(),
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the saved amount has reached the target
    pub fn is_reached(&self) -> bool {
        self.saved >= self.target
    }

    /// Rounded saved/target percentage, unclamped
    pub fn progress_percent(&self) -> i64 {
        percent_of(self.saved, self.target)
    }

    /// Amount still missing to reach the target (zero once reached)
    pub fn remaining(&self) -> Money {
        if self.is_reached() {
            Money::zero()
        } else {
            self.target - self.saved
        }
    }

    /// Set the saved amount and derive the status from it
    ///
    /// Only Active and Completed move automatically; Paused is left alone.
    /// Returns the previous status when it changed.
    pub fn apply_amount(
        &mut self,
        amount: Money,
        now: DateTime<Utc>,
    ) -> Result<Option<GoalStatus>, GoalValidationError> {
        if amount.is_negative() {
            return Err(GoalValidationError::NegativeSaved);
        }

        self.saved = amount;
        let previous = self.status;
        self.status = match (self.status, self.is_reached()) {
            (GoalStatus::Active, true) => GoalStatus::Completed,
            (GoalStatus::Completed, false) => GoalStatus::Active,
            (status, _) => status,
        };
        self.touch(now);

        Ok((previous != self.status).then_some(previous))
    }

    /// Record a mutation: bump version and move `updated_at` strictly forward
    pub fn touch(&mut self, now: DateTime<Utc>) {
        let floor = self.updated_at + Duration::microseconds(1);
        self.updated_at = now.max(floor);
        self.version += 1;
    }

    pub fn validate(&self) -> Result<(), GoalValidationError> {
        if self.title.trim().is_empty() {
            return Err(GoalValidationError::MissingTitle);
        }
        if !self.target.is_positive() {
            return Err(GoalValidationError::NonPositiveTarget);
        }
        if self.saved.is_negative() {
            return Err(GoalValidationError::NegativeSaved);
        }
        Ok(())
    }
}

impl fmt::Display for SavingsGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {} of {} [{}]",
            self.title, self.category, self.saved, self.target, self.status
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalValidationError {
    MissingTitle,
    NonPositiveTarget,
    NegativeSaved,
    UnknownCategory(String),
    UnknownPriority(String),
    UnknownStatus(String),
    UnknownReminderFrequency(String),
}

impl fmt::Display for GoalValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTitle => write!(f, "Goal title is required"),
            Self::NonPositiveTarget => write!(f, "Goal target must be greater than zero"),
            Self::NegativeSaved => write!(f, "Saved amount cannot be negative"),
            Self::UnknownCategory(s) => write!(f, "Unknown goal category: {}", s),
            Self::UnknownPriority(s) => write!(f, "Unknown priority: {}", s),
            Self::UnknownStatus(s) => write!(f, "Unknown goal status: {}", s),
            Self::UnknownReminderFrequency(s) => write!(f, "Unknown reminder frequency: {}", s),
        }
    }
}

impl std::error::Error for GoalValidationError {}
