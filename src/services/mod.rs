//! Service layer for the expense tracker
//!
//! Business logic on top of a `LedgerStore`: validation, status
//! transitions, optimistic writes and audit recording.

pub mod goal;

pub use goal::{CreateGoalInput, GoalService, GoalUpdate};
