//! Ledger entry operations and goal propagation
//!
//! `record_entry` is the single write path for new transactions: the entry
//! insert and the matching-goal updates run inside one SQLite transaction,
//! so a propagation failure rolls back the ledger write and vice versa.

use chrono::{NaiveDate, NaiveTime};
use rusqlite::params;
use tracing::debug;

use super::Database;
use crate::error::{Error, Result};
use crate::models::{
    Category, EntryType, GoalCategory, LedgerDetail, LedgerEntry, NewLedgerEntry,
    PropagationPolicy,
};

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| Error::InvalidData(format!("Bad date '{}': {}", s, e)))
}

fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .map_err(|e| Error::InvalidData(format!("Bad time '{}': {}", s, e)))
}

fn parse_category(s: &str) -> Result<Category> {
    s.parse::<Category>().map_err(Error::InvalidData)
}

fn parse_entry_type(s: &str) -> Result<EntryType> {
    s.parse::<EntryType>().map_err(Error::InvalidData)
}

/// Raw row before enum/date conversion
type RawEntry = (i64, i64, i64, String, Option<String>, String, String, String);

fn entry_from_raw(raw: RawEntry) -> Result<LedgerEntry> {
    let (id, user_id, amount, category, memo, entry_type, date, time) = raw;
    Ok(LedgerEntry {
        id,
        user_id,
        amount,
        category: parse_category(&category)?,
        memo,
        entry_type: parse_entry_type(&entry_type)?,
        date: parse_date(&date)?,
        time: parse_time(&time)?,
    })
}

impl Database {
    /// Record a ledger entry and propagate an expense into matching goals
    ///
    /// For an Expense entry, every goal of the writing user whose category
    /// equals the entry's category (or is the "all" sentinel) gets the
    /// amount added to its accumulated spend. `ActiveOnly` restricts this
    /// to goals whose window contains the entry date. Income entries never
    /// propagate. Both writes share one transaction.
    pub fn record_entry(
        &self,
        user_id: i64,
        entry: &NewLedgerEntry,
        policy: PropagationPolicy,
    ) -> Result<i64> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO ledger_entries (user_id, amount, category, memo, entry_type, date, time)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                entry.amount,
                entry.category.as_str(),
                entry.memo,
                entry.entry_type.as_str(),
                entry.date.to_string(),
                entry.time.format("%H:%M:%S").to_string(),
            ],
        )?;
        let entry_id = tx.last_insert_rowid();

        if entry.entry_type == EntryType::Expense {
            let candidates: Vec<(i64, String, String, String)> = {
                let mut stmt = tx.prepare(
                    "SELECT id, category, start_date, end_date FROM goals WHERE user_id = ?",
                )?;
                let rows = stmt.query_map(params![user_id], |row| {
                    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
                })?;
                rows.collect::<rusqlite::Result<_>>()?
            };

            let mut updated = 0;
            for (goal_id, category, start_date, end_date) in candidates {
                let goal_category = category
                    .parse::<GoalCategory>()
                    .map_err(Error::InvalidData)?;
                if !goal_category.matches(entry.category) {
                    continue;
                }
                if policy == PropagationPolicy::ActiveOnly {
                    let start = parse_date(&start_date)?;
                    let end = parse_date(&end_date)?;
                    if entry.date < start || entry.date > end {
                        continue;
                    }
                }
                tx.execute(
                    "UPDATE goals SET current_amount = current_amount + ? WHERE id = ?",
                    params![entry.amount, goal_id],
                )?;
                updated += 1;
            }
            debug!(entry_id, goals_updated = updated, "Expense propagated");
        }

        tx.commit()?;
        Ok(entry_id)
    }

    /// Get one ledger entry
    pub fn get_entry(&self, id: i64) -> Result<Option<LedgerEntry>> {
        let conn = self.conn()?;
        let raw: Option<RawEntry> = conn
            .query_row(
                "SELECT id, user_id, amount, category, memo, entry_type, date, time \
                 FROM ledger_entries WHERE id = ?",
                params![id],
                |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                        row.get(5)?,
                        row.get(6)?,
                        row.get(7)?,
                    ))
                },
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })?;

        raw.map(entry_from_raw).transpose()
    }

    /// Update an existing entry
    ///
    /// Does not retroactively adjust goals; propagation applies only to
    /// new expense writes.
    pub fn update_entry(&self, id: i64, entry: &NewLedgerEntry) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            r#"
            UPDATE ledger_entries
            SET amount = ?, category = ?, memo = ?, entry_type = ?, date = ?, time = ?
            WHERE id = ?
            "#,
            params![
                entry.amount,
                entry.category.as_str(),
                entry.memo,
                entry.entry_type.as_str(),
                entry.date.to_string(),
                entry.time.format("%H:%M:%S").to_string(),
                id,
            ],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("Ledger entry {} not found", id)));
        }
        Ok(())
    }

    /// Delete an entry (goals keep their accumulated spend)
    pub fn delete_entry(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM ledger_entries WHERE id = ?", params![id])?;
        if changed == 0 {
            return Err(Error::NotFound(format!("Ledger entry {} not found", id)));
        }
        Ok(())
    }

    /// List all entries of a user, newest first
    pub fn list_entries(&self, user_id: i64, limit: i64) -> Result<Vec<LedgerEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, amount, category, memo, entry_type, date, time \
             FROM ledger_entries WHERE user_id = ? \
             ORDER BY date DESC, time DESC LIMIT ?",
        )?;
        let raw: Vec<RawEntry> = stmt
            .query_map(params![user_id, limit], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                    row.get(7)?,
                ))
            })?
            .collect::<rusqlite::Result<_>>()?;

        raw.into_iter().map(entry_from_raw).collect()
    }

    /// Per-category expense sums for a date range
    pub fn category_sums(
        &self,
        user_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<std::collections::HashMap<Category, i64>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT category, SUM(amount) FROM ledger_entries \
             WHERE user_id = ? AND entry_type = 'expense' AND date >= ? AND date <= ? \
             GROUP BY category",
        )?;
        let rows: Vec<(String, i64)> = stmt
            .query_map(
                params![user_id, from.to_string(), to.to_string()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?
            .collect::<rusqlite::Result<_>>()?;

        let mut sums = std::collections::HashMap::new();
        for (category, total) in rows {
            sums.insert(parse_category(&category)?, total);
        }
        Ok(sums)
    }

    /// Most recent expense details in a date range, newest first
    pub fn expense_details(
        &self,
        user_id: i64,
        from: NaiveDate,
        to: NaiveDate,
        limit: i64,
    ) -> Result<Vec<LedgerDetail>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT category, amount, date, time FROM ledger_entries \
             WHERE user_id = ? AND entry_type = 'expense' AND date >= ? AND date <= ? \
             ORDER BY date DESC, time DESC LIMIT ?",
        )?;
        let rows: Vec<(String, i64, String, String)> = stmt
            .query_map(
                params![user_id, from.to_string(), to.to_string(), limit],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )?
            .collect::<rusqlite::Result<_>>()?;

        rows.into_iter()
            .map(|(category, amount, date, time)| {
                Ok(LedgerDetail {
                    category: parse_category(&category)?,
                    amount,
                    date: parse_date(&date)?,
                    time: parse_time(&time)?,
                })
            })
            .collect()
    }

    /// All expense entries in a date range (for personal analysis)
    pub fn expenses_between(
        &self,
        user_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<LedgerEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, amount, category, memo, entry_type, date, time \
             FROM ledger_entries \
             WHERE user_id = ? AND entry_type = 'expense' AND date >= ? AND date <= ? \
             ORDER BY date, time",
        )?;
        let raw: Vec<RawEntry> = stmt
            .query_map(
                params![user_id, from.to_string(), to.to_string()],
                |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                        row.get(5)?,
                        row.get(6)?,
                        row.get(7)?,
                    ))
                },
            )?
            .collect::<rusqlite::Result<_>>()?;

        raw.into_iter().map(entry_from_raw).collect()
    }
}
