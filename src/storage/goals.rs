//! Savings goal repository for JSON storage
//!
//! Every mutation holds the write lock from the lookup through the write to
//! goals.json, so one goal's read-decide-write cannot interleave with another
//! writer. Changes are built on a copy of the map and only become visible
//! once the file write succeeded.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use crate::error::{TrackerError, TrackerResult};
use crate::models::{GoalId, GoalStatus, Money, OwnerId, SavingsGoal};

use super::file_io::{read_json, write_json_atomic};
use super::ledger::GoalAmountChange;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct GoalData {
    #[serde(default)]
    goals: Vec<SavingsGoal>,
}

type GoalMap = HashMap<GoalId, SavingsGoal>;

/// Look up a goal only if it belongs to `owner`
fn owned(goals: &GoalMap, owner: OwnerId, id: GoalId) -> TrackerResult<&SavingsGoal> {
    goals
        .get(&id)
        .filter(|g| g.owner_id == owner)
        .ok_or_else(|| TrackerError::goal_not_found(id.to_string()))
}

pub struct GoalRepository {
    path: PathBuf,
    goals: RwLock<GoalMap>,
}

impl GoalRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            goals: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> TrackerResult<RwLockReadGuard<'_, GoalMap>> {
        self.goals.read().map_err(|e| {
            TrackerError::StorageUnavailable(format!("Failed to acquire read lock: {}", e))
        })
    }

    fn write(&self) -> TrackerResult<RwLockWriteGuard<'_, GoalMap>> {
        self.goals.write().map_err(|e| {
            TrackerError::StorageUnavailable(format!("Failed to acquire write lock: {}", e))
        })
    }

    pub fn load(&self) -> TrackerResult<()> {
        let file_data: GoalData = read_json(&self.path)?;
        let mut goals = self.write()?;

        goals.clear();
        for goal in file_data.goals {
            goals.insert(goal.id, goal);
        }

        Ok(())
    }

    fn persist(&self, goals: &GoalMap) -> TrackerResult<()> {
        let mut goal_list: Vec<_> = goals.values().cloned().collect();
        goal_list.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        write_json_atomic(&self.path, &GoalData { goals: goal_list })
    }

    /// Write `next` to disk, then make it the in-memory map
    fn commit(&self, current: &mut GoalMap, next: GoalMap) -> TrackerResult<()> {
        self.persist(&next)?;
        *current = next;
        Ok(())
    }

    pub fn save(&self) -> TrackerResult<()> {
        let goals = self.read()?;
        self.persist(&goals)
    }

    pub fn get(&self, owner: OwnerId, id: GoalId) -> TrackerResult<SavingsGoal> {
        let goals = self.read()?;
        owned(&goals, owner, id).cloned()
    }

    /// The owner's goals, newest first
    pub fn list(
        &self,
        owner: OwnerId,
        status: Option<GoalStatus>,
    ) -> TrackerResult<Vec<SavingsGoal>> {
        let goals = self.read()?;

        let mut list: Vec<_> = goals
            .values()
            .filter(|g| g.owner_id == owner)
            .filter(|g| status.map_or(true, |s| g.status == s))
            .cloned()
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    /// Insert a new goal or replace an existing one
    ///
    /// Replacement must keep the owner; with `expected_version` the stored
    /// version has to match.
    pub fn put(&self, goal: SavingsGoal, expected_version: Option<u64>) -> TrackerResult<()> {
        let mut goals = self.write()?;

        match goals.get(&goal.id) {
            Some(existing) if existing.owner_id != goal.owner_id => {
                return Err(TrackerError::goal_not_found(goal.id.to_string()));
            }
            Some(existing) => {
                if let Some(expected) = expected_version {
                    if existing.version != expected {
                        return Err(TrackerError::Conflict(format!(
                            "goal {} changed concurrently (expected version {}, found {})",
                            goal.id, expected, existing.version
                        )));
                    }
                }
            }
            None if expected_version.is_some() => {
                return Err(TrackerError::goal_not_found(goal.id.to_string()));
            }
            None => {}
        }

        let mut next = goals.clone();
        next.insert(goal.id, goal);
        self.commit(&mut goals, next)
    }

    /// Set the saved amount and apply the status transition under one lock
    ///
    /// The returned `previous` is the goal this update replaced, read under
    /// the same lock.
    pub fn set_amount(
        &self,
        owner: OwnerId,
        id: GoalId,
        amount: Money,
        now: DateTime<Utc>,
    ) -> TrackerResult<GoalAmountChange> {
        let mut goals = self.write()?;

        let previous = owned(&goals, owner, id)?.clone();
        let mut updated = previous.clone();
        updated
            .apply_amount(amount, now)
            .map_err(|e| TrackerError::InvalidInput(e.to_string()))?;

        let mut next = goals.clone();
        next.insert(id, updated.clone());
        self.commit(&mut goals, next)?;
        Ok(GoalAmountChange { previous, updated })
    }

    pub fn delete(&self, owner: OwnerId, id: GoalId) -> TrackerResult<bool> {
        let mut goals = self.write()?;

        if owned(&goals, owner, id).is_err() {
            return Ok(false);
        }

        let mut next = goals.clone();
        next.remove(&id);
        self.commit(&mut goals, next)?;
        Ok(true)
    }

    pub fn count(&self) -> TrackerResult<usize> {
        Ok(self.read()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GoalCategory;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, GoalRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = GoalRepository::new(temp_dir.path().join("goals.json"));
        repo.load().unwrap();
        (temp_dir, repo)
    }

    fn new_goal(owner: OwnerId, target: i64) -> SavingsGoal {
        SavingsGoal::new(
            owner,
            "New car",
            GoalCategory::Car,
            Money::from_minor(target),
            NaiveDate::from_ymd_opt(2027, 1, 1).unwrap(),
            Utc::now(),
        )
    }

    #[test]
    fn test_put_and_get() {
        let (_temp_dir, repo) = create_test_repo();
        let owner = OwnerId::new();
        let goal = new_goal(owner, 1000);
        let id = goal.id;
        repo.put(goal, None).unwrap();

        assert_eq!(repo.get(owner, id).unwrap().title, "New car");
        assert!(repo.get(OwnerId::new(), id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_put_rejects_stale_version() {
        let (_temp_dir, repo) = create_test_repo();
        let owner = OwnerId::new();
        let goal = new_goal(owner, 1000);
        repo.put(goal.clone(), None).unwrap();

        repo.set_amount(owner, goal.id, Money::from_minor(10), Utc::now())
            .unwrap();

        let mut stale = goal.clone();
        stale.title = "Stale edit".into();
        let err = repo.put(stale, Some(0)).unwrap_err();
        assert!(matches!(err, TrackerError::Conflict(_)));

        let current = repo.get(owner, goal.id).unwrap();
        let mut fresh = current.clone();
        fresh.title = "Fresh edit".into();
        repo.put(fresh, Some(current.version)).unwrap();
        assert_eq!(repo.get(owner, goal.id).unwrap().title, "Fresh edit");
    }

    #[test]
    fn test_put_cannot_take_over_another_owners_goal() {
        let (_temp_dir, repo) = create_test_repo();
        let owner = OwnerId::new();
        let goal = new_goal(owner, 1000);
        repo.put(goal.clone(), None).unwrap();

        let mut hijack = goal.clone();
        hijack.owner_id = OwnerId::new();
        assert!(repo.put(hijack, None).unwrap_err().is_not_found());
        assert_eq!(repo.get(owner, goal.id).unwrap().owner_id, owner);
    }

    #[test]
    fn test_set_amount_persists() {
        let (temp_dir, repo) = create_test_repo();
        let owner = OwnerId::new();
        let goal = new_goal(owner, 1000);
        repo.put(goal.clone(), None).unwrap();

        let change = repo
            .set_amount(owner, goal.id, Money::from_minor(1000), Utc::now())
            .unwrap();
        assert_eq!(change.previous, goal);
        assert_eq!(change.updated.status, GoalStatus::Completed);

        let reloaded = GoalRepository::new(temp_dir.path().join("goals.json"));
        reloaded.load().unwrap();
        let stored = reloaded.get(owner, goal.id).unwrap();
        assert_eq!(stored.saved.minor(), 1000);
        assert_eq!(stored.status, GoalStatus::Completed);
    }

    #[test]
    fn test_set_amount_negative_leaves_goal_untouched() {
        let (_temp_dir, repo) = create_test_repo();
        let owner = OwnerId::new();
        let goal = new_goal(owner, 1000);
        repo.put(goal.clone(), None).unwrap();

        let err = repo
            .set_amount(owner, goal.id, Money::from_minor(-5), Utc::now())
            .unwrap_err();
        assert!(err.is_invalid_input());
        assert_eq!(repo.get(owner, goal.id).unwrap(), goal);
    }

    #[test]
    fn test_failed_write_leaves_goals_unchanged() {
        let (temp_dir, repo) = create_test_repo();
        let owner = OwnerId::new();
        let goal = new_goal(owner, 1000);
        repo.put(goal.clone(), None).unwrap();

        let path = temp_dir.path().join("goals.json");
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        let err = repo
            .set_amount(owner, goal.id, Money::from_minor(1000), Utc::now())
            .unwrap_err();
        assert!(matches!(err, TrackerError::StorageUnavailable(_)));

        let mut renamed = goal.clone();
        renamed.title = "Renamed".into();
        assert!(matches!(
            repo.put(renamed, Some(goal.version)),
            Err(TrackerError::StorageUnavailable(_))
        ));
        assert!(matches!(
            repo.put(new_goal(owner, 500), None),
            Err(TrackerError::StorageUnavailable(_))
        ));
        assert!(matches!(
            repo.delete(owner, goal.id),
            Err(TrackerError::StorageUnavailable(_))
        ));

        assert_eq!(repo.get(owner, goal.id).unwrap(), goal);
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_list_filters_and_orders() {
        let (_temp_dir, repo) = create_test_repo();
        let owner = OwnerId::new();

        let mut older = new_goal(owner, 1000);
        older.created_at = Utc::now() - chrono::Duration::days(2);
        let mut paused = new_goal(owner, 2000);
        paused.status = GoalStatus::Paused;
        repo.put(older.clone(), None).unwrap();
        repo.put(paused.clone(), None).unwrap();
        repo.put(new_goal(OwnerId::new(), 500), None).unwrap();

        let all = repo.list(owner, None).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, paused.id);
        assert_eq!(all[1].id, older.id);

        let only_paused = repo.list(owner, Some(GoalStatus::Paused)).unwrap();
        assert_eq!(only_paused.len(), 1);
    }

    #[test]
    fn test_delete_is_owner_scoped() {
        let (_temp_dir, repo) = create_test_repo();
        let owner = OwnerId::new();
        let goal = new_goal(owner, 1000);
        repo.put(goal.clone(), None).unwrap();

        assert!(!repo.delete(OwnerId::new(), goal.id).unwrap());
        assert!(repo.delete(owner, goal.id).unwrap());
        assert!(!repo.delete(owner, goal.id).unwrap());
        assert_eq!(repo.count().unwrap(), 0);
    }
}
