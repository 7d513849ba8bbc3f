//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - Argument parsers for dates, times, and categories
//! - `cmd_init` - Initialize the database
//! - `cmd_status` - Show database and AI backend status

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};

use dotori_core::ai::{AIClient, TextGenerator};
use dotori_core::db::{Database, DB_KEY_ENV};
use dotori_core::models::{today_kst, Category, EntryType, GoalCategory};

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

/// Resolve the AI backend from environment variables
pub fn ai_from_env() -> Result<AIClient> {
    AIClient::from_env().context("No AI backend configured. Set OLLAMA_HOST (or AI_BACKEND=mock)")
}

/// Parse a YYYY-MM-DD argument
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}' (use YYYY-MM-DD)", s))
}

/// Parse an HH:MM or HH:MM:SS argument
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .with_context(|| format!("Invalid time '{}' (use HH:MM)", s))
}

/// Parse a spending category argument (English or Korean)
pub fn parse_category(s: &str) -> Result<Category> {
    s.parse::<Category>().map_err(|e| anyhow::anyhow!(e))
}

/// Parse a goal scope argument, including the "all" sentinel
pub fn parse_goal_category(s: &str) -> Result<GoalCategory> {
    s.parse::<GoalCategory>().map_err(|e| anyhow::anyhow!(e))
}

/// Parse an entry type argument
pub fn parse_entry_type(s: &str) -> Result<EntryType> {
    s.parse::<EntryType>().map_err(|e| anyhow::anyhow!(e))
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    open_db(db_path, no_encrypt)?;

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Set a budget: dotori budget set --food 300000 --transport 100000 --leisure 150000 --fixed 450000");
    println!("  2. Record spending: dotori ledger add --amount 12000 --category food");
    println!("  3. Get advice: dotori advice");

    Ok(())
}

pub async fn cmd_status(db_path: &Path, no_encrypt: bool) -> Result<()> {
    use std::fs;

    println!();
    println!("📊 Dotori Status");
    println!("   ─────────────────────────────────────────────");
    println!("   Database: {}", db_path.display());

    if db_path.exists() {
        if let Ok(metadata) = fs::metadata(db_path) {
            let size_kb = metadata.len() as f64 / 1024.0;
            if size_kb < 1024.0 {
                println!("   Size: {:.1} KB", size_kb);
            } else {
                println!("   Size: {:.1} MB", size_kb / 1024.0);
            }
        }
    } else {
        println!("   Size: (database not initialized)");
    }

    let has_key = std::env::var(DB_KEY_ENV).is_ok();
    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else if has_key {
        println!("   🔒 Encryption: ENABLED ({}=***)", DB_KEY_ENV);
    } else {
        println!("   ❌ Encryption: REQUIRED but {} not set", DB_KEY_ENV);
    }

    println!("   Today (KST): {}", today_kst());

    match AIClient::from_env() {
        Some(ai) => {
            let healthy = ai.health_check().await;
            let mark = if healthy { "🤖" } else { "❌" };
            println!(
                "   {} AI backend: {} ({}) - {}",
                mark,
                ai.host(),
                ai.model(),
                if healthy { "reachable" } else { "unreachable" }
            );
        }
        None => {
            println!("   💡 AI backend: not configured (set OLLAMA_HOST)");
        }
    }

    Ok(())
}
