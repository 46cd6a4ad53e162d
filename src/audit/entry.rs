//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::OwnerId;

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Transaction,
    SavingsGoal,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Transaction => write!(f, "Transaction"),
            EntityType::SavingsGoal => write!(f, "SavingsGoal"),
        }
    }
}

/// A single audit log entry
///
/// One mutation of one owner's record, with JSON snapshots of the record
/// before and after where they exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,
    pub operation: Operation,
    pub entity_type: EntityType,
    pub entity_id: String,
    /// Owner whose record changed
    pub owner_id: OwnerId,
    /// Human-readable label, e.g. the goal title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn new(
        timestamp: DateTime<Utc>,
        operation: Operation,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        owner_id: OwnerId,
    ) -> Self {
        Self {
            timestamp,
            operation,
            entity_type,
            entity_id: entity_id.into(),
            owner_id,
            entity_name: None,
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    pub fn create<T: Serialize>(
        timestamp: DateTime<Utc>,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        owner_id: OwnerId,
        entity: &T,
    ) -> Self {
        Self {
            after: serde_json::to_value(entity).ok(),
            ..Self::new(timestamp, Operation::Create, entity_type, entity_id, owner_id)
        }
    }

    /// Update entry; the diff summary is derived from the two snapshots
    pub fn update<T: Serialize>(
        timestamp: DateTime<Utc>,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        owner_id: OwnerId,
        before: &T,
        after: &T,
    ) -> Self {
        let before = serde_json::to_value(before).ok();
        let after = serde_json::to_value(after).ok();
        let diff_summary = match (&before, &after) {
            (Some(b), Some(a)) => super::generate_diff(b, a),
            _ => None,
        };
        Self {
            before,
            after,
            diff_summary,
            ..Self::new(timestamp, Operation::Update, entity_type, entity_id, owner_id)
        }
    }

    pub fn delete<T: Serialize>(
        timestamp: DateTime<Utc>,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        owner_id: OwnerId,
        entity: &T,
    ) -> Self {
        Self {
            before: serde_json::to_value(entity).ok(),
            ..Self::new(timestamp, Operation::Delete, entity_type, entity_id, owner_id)
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.entity_name = Some(name.into());
        self
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }
        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_entry() {
        let owner = OwnerId::new();
        let entry = AuditEntry::create(
            Utc::now(),
            EntityType::SavingsGoal,
            "goal-12345678",
            owner,
            &json!({"title": "Vacation", "saved": 0}),
        )
        .with_name("Vacation");

        assert_eq!(entry.operation, Operation::Create);
        assert_eq!(entry.owner_id, owner);
        assert!(entry.before.is_none());
        assert!(entry.after.is_some());
        assert_eq!(entry.entity_name.as_deref(), Some("Vacation"));
    }

    #[test]
    fn test_update_entry_derives_diff() {
        let entry = AuditEntry::update(
            Utc::now(),
            EntityType::SavingsGoal,
            "goal-12345678",
            OwnerId::new(),
            &json!({"saved": 400, "status": "Active"}),
            &json!({"saved": 1000, "status": "Completed"}),
        );

        let diff = entry.diff_summary.unwrap();
        assert!(diff.contains("saved: 400 -> 1000"));
        assert!(diff.contains("status: \"Active\" -> \"Completed\""));
    }

    #[test]
    fn test_delete_entry() {
        let entry = AuditEntry::delete(
            Utc::now(),
            EntityType::SavingsGoal,
            "goal-12345678",
            OwnerId::new(),
            &json!({"title": "Old goal"}),
        );

        assert_eq!(entry.operation, Operation::Delete);
        assert!(entry.before.is_some());
        assert!(entry.after.is_none());
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditEntry::create(
            Utc::now(),
            EntityType::SavingsGoal,
            "goal-12345678",
            OwnerId::new(),
            &json!({}),
        )
        .with_name("House deposit");

        let formatted = entry.format_human_readable();
        assert!(formatted.contains("CREATE SavingsGoal goal-12345678"));
        assert!(formatted.contains("House deposit"));
    }
}
