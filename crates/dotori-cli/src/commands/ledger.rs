//! Ledger entry commands (add, list, update, delete)

use anyhow::{Context, Result};
use chrono::{FixedOffset, NaiveTime, Utc};

use dotori_core::db::Database;
use dotori_core::models::{today_kst, NewLedgerEntry, PropagationPolicy};

use super::{format_krw, parse_category, parse_date, parse_entry_type, parse_time};

/// Current wall-clock time in the business timezone
fn now_kst_time() -> NaiveTime {
    let kst = FixedOffset::east_opt(9 * 3600).expect("valid fixed offset");
    Utc::now().with_timezone(&kst).time()
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_ledger_add(
    db: &Database,
    user_id: i64,
    amount: i64,
    category: &str,
    entry_type: &str,
    date: Option<&str>,
    time: Option<&str>,
    memo: Option<&str>,
    active_only: bool,
) -> Result<()> {
    let entry = NewLedgerEntry {
        amount,
        category: parse_category(category)?,
        memo: memo.map(str::to_string),
        entry_type: parse_entry_type(entry_type)?,
        date: date.map(parse_date).transpose()?.unwrap_or_else(today_kst),
        time: time.map(parse_time).transpose()?.unwrap_or_else(now_kst_time),
    };

    let policy = if active_only {
        PropagationPolicy::ActiveOnly
    } else {
        PropagationPolicy::AllGoals
    };

    let id = db
        .record_entry(user_id, &entry, policy)
        .context("Failed to record ledger entry")?;

    println!(
        "✅ Entry #{} recorded: {} {} ({})",
        id,
        entry.entry_type,
        format_krw(entry.amount),
        entry.category.label()
    );

    Ok(())
}

pub fn cmd_ledger_list(db: &Database, user_id: i64, limit: i64) -> Result<()> {
    let entries = db.list_entries(user_id, limit)?;

    if entries.is_empty() {
        println!("No ledger entries yet. Record one with 'dotori ledger add'.");
        return Ok(());
    }

    println!();
    println!("📒 Ledger (showing {})", entries.len());
    println!("   ─────────────────────────────────────────────");

    for entry in &entries {
        let sign = match entry.entry_type {
            dotori_core::models::EntryType::Expense => "-",
            dotori_core::models::EntryType::Income => "+",
        };
        println!(
            "   #{} {} {} {}{} [{}] {}",
            entry.id,
            entry.date,
            entry.time.format("%H:%M"),
            sign,
            format_krw(entry.amount),
            entry.category.label(),
            entry.memo.as_deref().unwrap_or("")
        );
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_ledger_update(
    db: &Database,
    id: i64,
    amount: i64,
    category: &str,
    entry_type: &str,
    date: &str,
    time: &str,
    memo: Option<&str>,
) -> Result<()> {
    let entry = NewLedgerEntry {
        amount,
        category: parse_category(category)?,
        memo: memo.map(str::to_string),
        entry_type: parse_entry_type(entry_type)?,
        date: parse_date(date)?,
        time: parse_time(time)?,
    };

    db.update_entry(id, &entry)
        .with_context(|| format!("Failed to update entry #{}", id))?;
    println!("✅ Entry #{} updated", id);
    println!("   Note: goal accumulations are not rewritten for edits.");

    Ok(())
}

pub fn cmd_ledger_delete(db: &Database, id: i64) -> Result<()> {
    db.delete_entry(id)
        .with_context(|| format!("Failed to delete entry #{}", id))?;
    println!("✅ Entry #{} deleted", id);
    Ok(())
}
