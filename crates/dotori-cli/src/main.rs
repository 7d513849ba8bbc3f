//! Dotori CLI - Goal-driven spending tracker
//!
//! Usage:
//!   dotori init                          Initialize database
//!   dotori ledger add --amount 12000 --category food
//!   dotori goal list                     Show goals with drift status
//!   dotori advice                        Generate today's AI advice
//!   dotori report --output report.html   Generate the monthly report

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Status => commands::cmd_status(&cli.db, cli.no_encrypt).await,
        Commands::Goal { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                GoalAction::Add {
                    title,
                    category,
                    target,
                    start,
                    end,
                    memo,
                } => commands::cmd_goal_add(
                    &db,
                    cli.user,
                    &title,
                    &category,
                    target,
                    &start,
                    &end,
                    memo.as_deref(),
                ),
                GoalAction::List { active } => commands::cmd_goal_list(&db, cli.user, active),
                GoalAction::Analyze { id } => commands::cmd_goal_analyze(&db, id),
                GoalAction::Update {
                    id,
                    title,
                    category,
                    target,
                    start,
                    end,
                    memo,
                } => commands::cmd_goal_update(
                    &db,
                    id,
                    &title,
                    &category,
                    target,
                    &start,
                    &end,
                    memo.as_deref(),
                ),
                GoalAction::Delete { id } => commands::cmd_goal_delete(&db, id),
            }
        }
        Commands::Ledger { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                LedgerAction::Add {
                    amount,
                    category,
                    entry_type,
                    date,
                    time,
                    memo,
                    active_only,
                } => commands::cmd_ledger_add(
                    &db,
                    cli.user,
                    amount,
                    &category,
                    &entry_type,
                    date.as_deref(),
                    time.as_deref(),
                    memo.as_deref(),
                    active_only,
                ),
                LedgerAction::List { limit } => commands::cmd_ledger_list(&db, cli.user, limit),
                LedgerAction::Update {
                    id,
                    amount,
                    category,
                    entry_type,
                    date,
                    time,
                    memo,
                } => commands::cmd_ledger_update(
                    &db,
                    id,
                    amount,
                    &category,
                    &entry_type,
                    &date,
                    &time,
                    memo.as_deref(),
                ),
                LedgerAction::Delete { id } => commands::cmd_ledger_delete(&db, id),
            }
        }
        Commands::Budget { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(BudgetAction::Show) => commands::cmd_budget_show(&db, cli.user),
                Some(BudgetAction::Set {
                    food,
                    transport,
                    leisure,
                    fixed,
                }) => commands::cmd_budget_set(&db, cli.user, food, transport, leisure, fixed),
            }
        }
        Commands::Advice { json } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let ai = commands::ai_from_env()?;
            commands::cmd_advice(&db, cli.user, ai, json).await
        }
        Commands::Report { output, name } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let ai = commands::ai_from_env()?;
            commands::cmd_report(&db, cli.user, &name, ai, output.as_deref()).await
        }
        Commands::Analysis => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_analysis(&db, cli.user)
        }
    }
}
