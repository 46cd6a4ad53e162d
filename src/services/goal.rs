//! Savings goal service
//!
//! Owns every mutation of a savings goal: creation, amount updates with
//! their automatic status transitions, full-field edits and deletion. All
//! operations are scoped to one owner; a goal owned by someone else is
//! reported as not found.

use chrono::NaiveDate;
use log::{debug, info, warn};

use crate::audit::{AuditEntry, EntityType};
use crate::clock::Clock;
use crate::error::{TrackerError, TrackerResult};
use crate::models::{
    AlertConfig, GoalCategory, GoalId, GoalStatus, Money, OwnerId, Priority, ReminderFrequency,
    SavingsGoal,
};
use crate::storage::{GoalAmountChange, LedgerStore};

/// Input for creating a goal
#[derive(Debug, Clone)]
pub struct CreateGoalInput {
    pub title: String,
    pub category: GoalCategory,
    pub target: Money,
    pub target_date: NaiveDate,
    pub saved: Money,
    pub priority: Priority,
    /// Taken as given, even when `saved` already reaches `target`
    pub status: GoalStatus,
    pub alerts: AlertConfig,
    pub notes: String,
}

impl CreateGoalInput {
    pub fn new(
        title: impl Into<String>,
        category: GoalCategory,
        target: Money,
        target_date: NaiveDate,
    ) -> Self {
        Self {
            title: title.into(),
            category,
            target,
            target_date,
            saved: Money::zero(),
            priority: Priority::default(),
            status: GoalStatus::default(),
            alerts: AlertConfig::default(),
            notes: String::new(),
        }
    }
}

/// A full-field edit: `Some` overwrites, `None` keeps the stored value
///
/// Alert settings are merged field by field, so changing the reminder
/// frequency leaves the two toggles alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalUpdate {
    pub title: Option<String>,
    pub category: Option<GoalCategory>,
    pub saved: Option<Money>,
    pub target: Option<Money>,
    pub target_date: Option<NaiveDate>,
    pub priority: Option<Priority>,
    pub status: Option<GoalStatus>,
    pub notes: Option<String>,
    pub reminder_frequency: Option<ReminderFrequency>,
    pub milestone_alerts: Option<bool>,
    pub target_date_reminder: Option<bool>,
}

impl GoalUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn apply_to(&self, goal: &mut SavingsGoal) {
        if let Some(title) = &self.title {
            goal.title = title.trim().to_string();
        }
        if let Some(category) = self.category {
            goal.category = category;
        }
        if let Some(saved) = self.saved {
            goal.saved = saved;
        }
        if let Some(target) = self.target {
            goal.target = target;
        }
        if let Some(target_date) = self.target_date {
            goal.target_date = target_date;
        }
        if let Some(priority) = self.priority {
            goal.priority = priority;
        }
        if let Some(status) = self.status {
            goal.status = status;
        }
        if let Some(notes) = &self.notes {
            goal.notes = notes.trim().to_string();
        }
        if let Some(frequency) = self.reminder_frequency {
            goal.alerts.reminder_frequency = frequency;
        }
        if let Some(enabled) = self.milestone_alerts {
            goal.alerts.milestone_alerts = enabled;
        }
        if let Some(enabled) = self.target_date_reminder {
            goal.alerts.target_date_reminder = enabled;
        }
    }
}

/// Service for the savings goal lifecycle
pub struct GoalService<'a, S: LedgerStore + ?Sized> {
    store: &'a S,
    clock: &'a dyn Clock,
}

impl<'a, S: LedgerStore + ?Sized> GoalService<'a, S> {
    pub fn new(store: &'a S, clock: &'a dyn Clock) -> Self {
        Self { store, clock }
    }

    /// The owner's goals, newest first
    pub fn list_goals(
        &self,
        owner: OwnerId,
        status: Option<GoalStatus>,
    ) -> TrackerResult<Vec<SavingsGoal>> {
        self.store.list_goals(owner, status)
    }

    pub fn get_goal(&self, owner: OwnerId, id: GoalId) -> TrackerResult<SavingsGoal> {
        self.store.get_goal(owner, id)
    }

    /// Find a goal by full ID or by the short form shown in listings
    ///
    /// A short form that matches more than one of the owner's goals is
    /// rejected as ambiguous.
    pub fn find(&self, owner: OwnerId, identifier: &str) -> TrackerResult<SavingsGoal> {
        let identifier = identifier.trim();
        if let Ok(id) = identifier.parse::<GoalId>() {
            return self.store.get_goal(owner, id);
        }

        let prefix = identifier.strip_prefix("goal-").unwrap_or(identifier);
        if prefix.is_empty() {
            return Err(TrackerError::goal_not_found(identifier));
        }

        let mut matches: Vec<_> = self
            .store
            .list_goals(owner, None)?
            .into_iter()
            .filter(|g| g.id.as_uuid().to_string().starts_with(prefix))
            .collect();

        match matches.len() {
            0 => Err(TrackerError::goal_not_found(identifier)),
            1 => Ok(matches.remove(0)),
            n => Err(TrackerError::InvalidInput(format!(
                "'{}' matches {} goals; use a longer ID",
                identifier, n
            ))),
        }
    }

    /// Create a goal for `owner`
    pub fn create_goal(&self, owner: OwnerId, input: CreateGoalInput) -> TrackerResult<SavingsGoal> {
        let now = self.clock.now();
        let mut goal = SavingsGoal::new(
            owner,
            input.title,
            input.category,
            input.target,
            input.target_date,
            now,
        );
        goal.saved = input.saved;
        goal.priority = input.priority;
        goal.status = input.status;
        goal.alerts = input.alerts;
        goal.notes = input.notes.trim().to_string();

        goal.validate()
            .map_err(|e| TrackerError::InvalidInput(e.to_string()))?;

        self.store.put_goal(goal.clone(), None)?;
        info!("created goal {} for owner {}", goal.id, owner);

        self.audit(
            AuditEntry::create(now, EntityType::SavingsGoal, goal.id.to_string(), owner, &goal)
                .with_name(goal.title.clone()),
        );

        Ok(goal)
    }

    /// Set a goal's saved amount
    ///
    /// Reaching the target completes an active goal; falling below it
    /// reactivates a completed one. Paused goals keep their status. Setting
    /// the same amount twice leaves the goal in the same state.
    pub fn update_goal_amount(
        &self,
        owner: OwnerId,
        id: GoalId,
        amount: Money,
    ) -> TrackerResult<SavingsGoal> {
        if amount.is_negative() {
            return Err(TrackerError::InvalidInput(
                "Saved amount cannot be negative".into(),
            ));
        }

        let now = self.clock.now();
        let GoalAmountChange {
            previous: before,
            updated,
        } = self
            .store
            .compare_and_set_goal_amount(owner, id, amount, now)?;

        if updated.status != before.status {
            info!(
                "goal {} moved from {} to {}",
                updated.id, before.status, updated.status
            );
        } else {
            debug!("goal {} saved amount set to {}", updated.id, updated.saved);
        }

        self.audit(
            AuditEntry::update(
                now,
                EntityType::SavingsGoal,
                updated.id.to_string(),
                owner,
                &before,
                &updated,
            )
            .with_name(updated.title.clone()),
        );

        Ok(updated)
    }

    /// Apply a full-field edit
    ///
    /// The status is stored as given and not re-derived from the amounts.
    /// If the goal changed between the read and the write, the edit is
    /// rejected with `Conflict` and nothing is written.
    pub fn edit_goal(
        &self,
        owner: OwnerId,
        id: GoalId,
        update: &GoalUpdate,
    ) -> TrackerResult<SavingsGoal> {
        let before = self.store.get_goal(owner, id)?;
        if update.is_empty() {
            return Ok(before);
        }

        let mut goal = before.clone();
        update.apply_to(&mut goal);
        goal.validate()
            .map_err(|e| TrackerError::InvalidInput(e.to_string()))?;

        let now = self.clock.now();
        goal.touch(now);
        self.store.put_goal(goal.clone(), Some(before.version))?;
        info!("edited goal {} for owner {}", goal.id, owner);

        self.audit(
            AuditEntry::update(
                now,
                EntityType::SavingsGoal,
                goal.id.to_string(),
                owner,
                &before,
                &goal,
            )
            .with_name(goal.title.clone()),
        );

        Ok(goal)
    }

    pub fn delete_goal(&self, owner: OwnerId, id: GoalId) -> TrackerResult<SavingsGoal> {
        let goal = self.store.get_goal(owner, id)?;
        if !self.store.delete_goal(owner, id)? {
            return Err(TrackerError::goal_not_found(id.to_string()));
        }
        info!("deleted goal {} for owner {}", id, owner);

        self.audit(
            AuditEntry::delete(
                self.clock.now(),
                EntityType::SavingsGoal,
                id.to_string(),
                owner,
                &goal,
            )
            .with_name(goal.title.clone()),
        );

        Ok(goal)
    }

    /// The mutation is already durable; a failed audit append must not undo it
    fn audit(&self, entry: AuditEntry) {
        if let Err(e) = self.store.record_audit(&entry) {
            warn!(
                "failed to record audit entry for {} {}: {}",
                entry.entity_type, entry.entity_id, e
            );
        }
    }
}
