//! Dotori Core Library
//!
//! Shared functionality for the Dotori personal finance analytics tool:
//! - Encrypted SQLite database access and migrations
//! - Ledger recording with goal propagation
//! - Goal progress and timeline analysis calculators
//! - Budget deviation analysis with mood classification
//! - Pluggable local AI backends (Ollama, mock)
//! - Once-per-day advice and monthly report orchestrators
//! - Personal spending analysis aggregations

pub mod advice;
pub mod ai;
pub mod analysis;
pub mod db;
pub mod deviation;
pub mod error;
pub mod goals;
pub mod models;
pub mod prompts;
pub mod report;

pub use advice::AdviceEngine;
pub use ai::{AIClient, MockBackend, OllamaBackend, TextGenerator};
pub use analysis::{personal_analysis, CategoryShare, PersonalAnalysis, WeekdayBreakdown};
pub use db::Database;
pub use deviation::DeviationReport;
pub use error::{Error, Result};
pub use goals::{GoalAnalysis, GoalProgress, GoalStatus};
pub use models::{
    AdviceOutcome, BudgetGoal, Category, EntryType, Goal, GoalCategory, LedgerDetail, LedgerEntry,
    Mood, NewGoal, NewLedgerEntry, PropagationPolicy,
};
pub use prompts::{Prompt, PromptId};
pub use report::ReportEngine;
