//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Dotori - Goal-driven spending tracker with local AI advice
#[derive(Parser)]
#[command(name = "dotori")]
#[command(about = "Goal tracking, budget deviation analytics, and AI advice", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "dotori.db", global = true)]
    pub db: PathBuf,

    /// User ID to operate as
    #[arg(short, long, default_value = "1", global = true)]
    pub user: i64,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set DOTORI_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Show database status (encryption, size, AI backend)
    Status,

    /// Manage savings goals
    Goal {
        #[command(subcommand)]
        action: GoalAction,
    },

    /// Manage ledger entries (expenses and income)
    Ledger {
        #[command(subcommand)]
        action: LedgerAction,
    },

    /// Manage monthly budget caps
    Budget {
        #[command(subcommand)]
        action: Option<BudgetAction>,
    },

    /// Generate (or reuse) today's AI spending advice
    Advice {
        /// Print the full outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate this month's AI spending report
    Report {
        /// Write the report HTML to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Name to address the reader by
        #[arg(long, default_value = "사용자")]
        name: String,
    },

    /// Show personal spending analysis (monthly shares, weekly pattern)
    Analysis,
}

#[derive(Subcommand)]
pub enum GoalAction {
    /// Create a goal
    Add {
        /// Goal title
        #[arg(short, long)]
        title: String,

        /// Category scope: food, transport, leisure, fixed, or all
        #[arg(short, long, default_value = "all")]
        category: String,

        /// Target amount in KRW
        #[arg(long)]
        target: i64,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: String,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end: String,

        /// Optional memo
        #[arg(short, long)]
        memo: Option<String>,
    },

    /// List goals with drift status
    List {
        /// Only goals whose window contains today
        #[arg(long)]
        active: bool,
    },

    /// Analyze one goal's schedule drift in detail
    Analyze {
        /// Goal ID
        id: i64,
    },

    /// Update a goal (accumulated spend is preserved)
    Update {
        /// Goal ID
        id: i64,

        #[arg(short, long)]
        title: String,

        #[arg(short, long)]
        category: String,

        #[arg(long)]
        target: i64,

        #[arg(long)]
        start: String,

        #[arg(long)]
        end: String,

        #[arg(short, long)]
        memo: Option<String>,
    },

    /// Delete a goal
    Delete {
        /// Goal ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum LedgerAction {
    /// Record an expense or income
    Add {
        /// Amount in KRW
        #[arg(short, long)]
        amount: i64,

        /// Category: food, transport, leisure, fixed
        #[arg(short, long)]
        category: String,

        /// Entry type: expense or income
        #[arg(short = 't', long = "type", default_value = "expense")]
        entry_type: String,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,

        /// Time (HH:MM), defaults to now
        #[arg(long)]
        time: Option<String>,

        /// Optional memo
        #[arg(short, long)]
        memo: Option<String>,

        /// Propagate only into goals whose window contains the entry date
        #[arg(long)]
        active_only: bool,
    },

    /// List recent entries
    List {
        /// Maximum entries to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Update an entry (goal accumulations are not rewritten)
    Update {
        /// Entry ID
        id: i64,

        #[arg(short, long)]
        amount: i64,

        #[arg(short, long)]
        category: String,

        #[arg(short = 't', long = "type", default_value = "expense")]
        entry_type: String,

        #[arg(long)]
        date: String,

        #[arg(long)]
        time: String,

        #[arg(short, long)]
        memo: Option<String>,
    },

    /// Delete an entry
    Delete {
        /// Entry ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum BudgetAction {
    /// Set the monthly caps (replaces any existing budget)
    Set {
        /// Food cap in KRW
        #[arg(long)]
        food: i64,

        /// Transport cap in KRW
        #[arg(long)]
        transport: i64,

        /// Leisure cap in KRW
        #[arg(long)]
        leisure: i64,

        /// Fixed-costs cap in KRW
        #[arg(long)]
        fixed: i64,
    },

    /// Show the caps and this month's deviation
    Show,
}
