//! Audit trail for goal and expense mutations
//!
//! Every create, update and delete is appended to `audit.log` as one JSON
//! line carrying the owner, the entity and its before/after snapshots.
//! Update entries also carry a short field-level change summary.

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
