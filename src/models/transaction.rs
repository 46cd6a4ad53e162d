//! Expense transaction model
//!
//! A transaction is a single recorded expense owned by exactly one user. The
//! aggregation reports only ever read transactions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{OwnerId, TransactionId};
use super::money::Money;

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// The user this expense belongs to
    pub owner_id: OwnerId,

    /// Amount spent, always positive
    pub amount: Money,

    /// Free-form category label ("Food", "Transport", ...)
    pub category: String,

    /// What the money was spent on
    #[serde(default)]
    pub description: String,

    /// Calendar day the expense happened
    pub occurred_on: NaiveDate,

    /// When the expense was entered into the ledger
    pub recorded_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction recorded now
    pub fn new(
        owner_id: OwnerId,
        amount: Money,
        category: impl Into<String>,
        occurred_on: NaiveDate,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            owner_id,
            amount,
            category: category.into().trim().to_string(),
            description: String::new(),
            occurred_on,
            recorded_at: Utc::now(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into().trim().to_string();
        self
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if !self.amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount);
        }
        if self.category.trim().is_empty() {
            return Err(TransactionValidationError::MissingCategory);
        }
        Ok(())
    }
}

/// Field changes for an existing expense; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionUpdate {
    pub amount: Option<Money>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub occurred_on: Option<NaiveDate>,
}

impl TransactionUpdate {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.occurred_on.is_none()
    }

    /// Apply the changes; the id, owner and `recorded_at` never change
    pub fn apply_to(&self, txn: &mut Transaction) {
        if let Some(amount) = self.amount {
            txn.amount = amount;
        }
        if let Some(category) = &self.category {
            txn.category = category.trim().to_string();
        }
        if let Some(description) = &self.description {
            txn.description = description.trim().to_string();
        }
        if let Some(occurred_on) = self.occurred_on {
            txn.occurred_on = occurred_on;
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.occurred_on, self.category, self.amount)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NonPositiveAmount,
    MissingCategory,
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount => write!(f, "Expense amount must be positive"),
            Self::MissingCategory => write!(f, "Expense category is required"),
        }
    }
}

impl std::error::Error for TransactionValidationError {}
