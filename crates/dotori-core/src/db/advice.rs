//! Advice history operations
//!
//! The UNIQUE(user_id, created_at) constraint is the authoritative
//! de-duplication point for once-per-day advice: two racing requests may
//! both pass the existence check, but only one insert can win.

use chrono::NaiveDate;
use rusqlite::params;

use super::Database;
use crate::error::{Error, Result};

impl Database {
    /// Find the cached advice message for (user, date)
    pub fn find_advice(&self, user_id: i64, date: NaiveDate) -> Result<Option<String>> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT advice_message FROM advice_history WHERE user_id = ? AND created_at = ?",
            params![user_id, date.to_string()],
            |row| row.get(0),
        )
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(Error::Database(other)),
        })
    }

    /// Insert an advice row; Conflict when one already exists for the day
    pub fn insert_advice(&self, user_id: i64, date: NaiveDate, message: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO advice_history (user_id, created_at, advice_message) VALUES (?, ?, ?)",
            params![user_id, date.to_string(), message],
        )
        .map(|_| ())
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Error::Conflict(format!("Advice already exists for user {} on {}", user_id, date))
            }
            other => Error::Database(other),
        })
    }
}
