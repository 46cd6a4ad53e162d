//! Aggregation reports for the expense tracker
//!
//! Read-only views over one owner's ledger: spending summaries by window,
//! per-category breakdowns, savings goal progress and recent expenses.
//! Each report is generated against any `LedgerStore` and never writes.

pub mod category_breakdown;
pub mod expense_summary;
pub mod goal_summary;
pub mod recent;
pub mod window;

pub use category_breakdown::CategoryBreakdown;
pub use expense_summary::{ExpenseSummary, TOP_CATEGORIES};
pub use goal_summary::{CategoryProgress, GoalSummary};
pub use recent::{RecentExpenses, DEFAULT_RECENT_LIMIT};
pub use window::WindowBounds;
