//! Goal CRUD operations
//!
//! The derived daily allowance is recomputed on every create/update so it
//! can never drift from the target amount and period.

use chrono::NaiveDate;
use rusqlite::params;

use super::Database;
use crate::error::{Error, Result};
use crate::models::{Goal, GoalCategory, NewGoal};

/// Raw row before enum/date conversion
type RawGoal = (
    i64,
    i64,
    String,
    String,
    i64,
    i64,
    String,
    String,
    Option<String>,
    f64,
);

fn goal_from_raw(raw: RawGoal) -> Result<Goal> {
    let (id, user_id, title, category, target, current, start, end, memo, allowance) = raw;
    Ok(Goal {
        id,
        user_id,
        title,
        category: category.parse::<GoalCategory>().map_err(Error::InvalidData)?,
        target_amount: target,
        current_amount: current,
        start_date: NaiveDate::parse_from_str(&start, "%Y-%m-%d")
            .map_err(|e| Error::InvalidData(format!("Bad date '{}': {}", start, e)))?,
        end_date: NaiveDate::parse_from_str(&end, "%Y-%m-%d")
            .map_err(|e| Error::InvalidData(format!("Bad date '{}': {}", end, e)))?,
        memo,
        daily_allowance: allowance,
    })
}

const GOAL_COLUMNS: &str = "id, user_id, title, category, target_amount, current_amount, \
                            start_date, end_date, memo, daily_allowance";

impl Database {
    /// Create a goal; current_amount starts at zero
    pub fn create_goal(&self, user_id: i64, goal: &NewGoal) -> Result<i64> {
        goal.validate().map_err(Error::InvalidData)?;
        let allowance =
            Goal::daily_allowance_for(goal.target_amount, goal.start_date, goal.end_date);

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO goals (user_id, title, category, target_amount, current_amount,
                               start_date, end_date, memo, daily_allowance)
            VALUES (?, ?, ?, ?, 0, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                goal.title,
                goal.category.as_str(),
                goal.target_amount,
                goal.start_date.to_string(),
                goal.end_date.to_string(),
                goal.memo,
                allowance,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get one goal
    pub fn get_goal(&self, id: i64) -> Result<Option<Goal>> {
        let conn = self.conn()?;
        let raw: Option<RawGoal> = conn
            .query_row(
                &format!("SELECT {} FROM goals WHERE id = ?", GOAL_COLUMNS),
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
                        row.get(8)?,
                        row.get(9)?,
                    ))
                },
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })?;

        raw.map(goal_from_raw).transpose()
    }

    /// List all goals of a user
    pub fn list_goals(&self, user_id: i64) -> Result<Vec<Goal>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM goals WHERE user_id = ? ORDER BY start_date, id",
            GOAL_COLUMNS
        ))?;
        let raw: Vec<RawGoal> = stmt
            .query_map(params![user_id], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                    row.get(7)?,
                    row.get(8)?,
                    row.get(9)?,
                ))
            })?
            .collect::<rusqlite::Result<_>>()?;

        raw.into_iter().map(goal_from_raw).collect()
    }

    /// List goals whose window contains `date` (read-side active filter)
    pub fn active_goals(&self, user_id: i64, date: NaiveDate) -> Result<Vec<Goal>> {
        let goals = self.list_goals(user_id)?;
        Ok(goals.into_iter().filter(|g| g.is_active_on(date)).collect())
    }

    /// Update a goal and recompute its daily allowance
    ///
    /// The accumulated spend is preserved; only the user-editable fields
    /// and the derived allowance change.
    pub fn update_goal(&self, id: i64, goal: &NewGoal) -> Result<()> {
        goal.validate().map_err(Error::InvalidData)?;
        let allowance =
            Goal::daily_allowance_for(goal.target_amount, goal.start_date, goal.end_date);

        let conn = self.conn()?;
        let changed = conn.execute(
            r#"
            UPDATE goals
            SET title = ?, category = ?, target_amount = ?, start_date = ?, end_date = ?,
                memo = ?, daily_allowance = ?
            WHERE id = ?
            "#,
            params![
                goal.title,
                goal.category.as_str(),
                goal.target_amount,
                goal.start_date.to_string(),
                goal.end_date.to_string(),
                goal.memo,
                allowance,
                id,
            ],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("Goal {} not found", id)));
        }
        Ok(())
    }

    /// Delete a goal; past ledger entries are unaffected
    pub fn delete_goal(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM goals WHERE id = ?", params![id])?;
        if changed == 0 {
            return Err(Error::NotFound(format!("Goal {} not found", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn new_goal(start: NaiveDate, end: NaiveDate) -> NewGoal {
        NewGoal {
            title: "한달 식비 줄이기".to_string(),
            category: GoalCategory::Category(Category::Food),
            target_amount: 300_000,
            start_date: start,
            end_date: end,
            memo: Some("점심 도시락".to_string()),
        }
    }

    #[test]
    fn test_create_computes_allowance() {
        let db = Database::in_memory().unwrap();
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();

        let id = db.create_goal(1, &new_goal(start, end)).unwrap();
        let goal = db.get_goal(id).unwrap().unwrap();

        assert_eq!(goal.daily_allowance, 10_000.0);
        assert_eq!(goal.current_amount, 0);
        assert_eq!(goal.category, GoalCategory::Category(Category::Food));
    }

    #[test]
    fn test_update_recomputes_allowance() {
        let db = Database::in_memory().unwrap();
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        let id = db.create_goal(1, &new_goal(start, end)).unwrap();

        // Halve the period: allowance doubles
        let shorter = NewGoal {
            end_date: NaiveDate::from_ymd_opt(2026, 1, 16).unwrap(),
            ..new_goal(start, end)
        };
        db.update_goal(id, &shorter).unwrap();

        let goal = db.get_goal(id).unwrap().unwrap();
        assert_eq!(goal.daily_allowance, 20_000.0);
    }

    #[test]
    fn test_invalid_goal_rejected() {
        let db = Database::in_memory().unwrap();
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();

        let bad = NewGoal {
            target_amount: -5,
            ..new_goal(start, start + chrono::Duration::days(10))
        };
        assert!(matches!(db.create_goal(1, &bad), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_active_goals_filter() {
        let db = Database::in_memory().unwrap();
        let jan = new_goal(
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        );
        let feb = new_goal(
            NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(),
        );
        db.create_goal(1, &jan).unwrap();
        db.create_goal(1, &feb).unwrap();

        let active = db
            .active_goals(1, NaiveDate::from_ymd_opt(2026, 2, 10).unwrap())
            .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].start_date, feb.start_date);
    }

    #[test]
    fn test_delete_missing_goal() {
        let db = Database::in_memory().unwrap();
        assert!(matches!(db.delete_goal(42), Err(Error::NotFound(_))));
    }
}
