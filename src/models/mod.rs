//! Core data models for the expense tracker
//!
//! This module contains the data structures of the tracking domain:
//! owners, expense transactions, savings goals and money amounts.

pub mod goal;
pub mod ids;
pub mod money;
pub mod transaction;

pub use goal::{
    AlertConfig, GoalCategory, GoalStatus, GoalValidationError, Priority, ReminderFrequency,
    SavingsGoal,
};
pub use ids::{GoalId, OwnerId, TransactionId};
pub use money::{percent_of, Money};
pub use transaction::{Transaction, TransactionUpdate, TransactionValidationError};
