//! Budget cap configuration

use rusqlite::params;

use super::Database;
use crate::error::{Error, Result};
use crate::models::BudgetGoal;

impl Database {
    /// Get a user's budget caps; NotFound when none are configured
    pub fn get_budget(&self, user_id: i64) -> Result<BudgetGoal> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT user_id, food_amount, transport_amount, leisure_amount, fixed_amount, \
             total_amount FROM budget_goals WHERE user_id = ?",
            params![user_id],
            |row| {
                Ok(BudgetGoal {
                    user_id: row.get(0)?,
                    food_amount: row.get(1)?,
                    transport_amount: row.get(2)?,
                    leisure_amount: row.get(3)?,
                    fixed_amount: row.get(4)?,
                    total_amount: row.get(5)?,
                })
            },
        )
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Err(Error::NotFound(format!(
                "No budget configured for user {}",
                user_id
            ))),
            other => Err(Error::Database(other)),
        })
    }

    /// Set (upsert) a user's budget caps
    pub fn set_budget(&self, budget: &BudgetGoal) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO budget_goals (user_id, food_amount, transport_amount, leisure_amount,
                                      fixed_amount, total_amount)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                food_amount = excluded.food_amount,
                transport_amount = excluded.transport_amount,
                leisure_amount = excluded.leisure_amount,
                fixed_amount = excluded.fixed_amount,
                total_amount = excluded.total_amount
            "#,
            params![
                budget.user_id,
                budget.food_amount,
                budget.transport_amount,
                budget.leisure_amount,
                budget.fixed_amount,
                budget.total_amount,
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_budget_is_not_found() {
        let db = Database::in_memory().unwrap();
        assert!(matches!(db.get_budget(1), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_set_and_update_budget() {
        let db = Database::in_memory().unwrap();
        let budget = BudgetGoal {
            user_id: 1,
            food_amount: 300_000,
            transport_amount: 100_000,
            leisure_amount: 150_000,
            fixed_amount: 500_000,
            total_amount: 1_050_000,
        };
        db.set_budget(&budget).unwrap();
        assert_eq!(db.get_budget(1).unwrap().food_amount, 300_000);

        // Upsert keeps one row per user
        let updated = BudgetGoal {
            food_amount: 250_000,
            ..budget
        };
        db.set_budget(&updated).unwrap();
        assert_eq!(db.get_budget(1).unwrap().food_amount, 250_000);
    }
}
