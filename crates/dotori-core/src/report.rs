//! Monthly report orchestration
//!
//! Long-form HTML spending report built from the user's budget, goals,
//! and recent transactions. Generation is retried a bounded number of
//! times with a growing delay; after the last attempt the error is
//! terminal and there is no canned fallback text.

use std::collections::HashMap;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use crate::ai::{AIClient, TextGenerator};
use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{month_range, today_kst, Goal};
use crate::prompts::{Prompt, PromptId};

/// Generation attempts before giving up
const MAX_ATTEMPTS: u32 = 3;

/// Most recent transaction details included in the LLM context
const DETAIL_LIMIT: i64 = 50;

/// Goal fields exposed to the LLM context: title, target, and deadline
#[derive(Debug, Serialize)]
struct GoalContext<'a> {
    title: &'a str,
    #[serde(rename = "targetAmount")]
    target_amount: i64,
    #[serde(rename = "endDate")]
    end_date: String,
}

impl<'a> GoalContext<'a> {
    fn from_goal(goal: &'a Goal) -> Self {
        Self {
            title: &goal.title,
            target_amount: goal.target_amount,
            end_date: goal.end_date.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Monthly report orchestrator
pub struct ReportEngine {
    db: Database,
    ai: AIClient,
    retry_delay: Duration,
}

impl ReportEngine {
    pub fn new(db: Database, ai: AIClient) -> Self {
        Self {
            db,
            ai,
            retry_delay: Duration::from_secs(1),
        }
    }

    /// Override the base retry delay (used by tests)
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Generate this month's report for a user
    pub async fn generate(&self, user_id: i64, user_name: &str) -> Result<String> {
        self.generate_for_date(user_id, user_name, today_kst()).await
    }

    /// Generate a report for the month containing `today`
    pub async fn generate_for_date(
        &self,
        user_id: i64,
        user_name: &str,
        today: NaiveDate,
    ) -> Result<String> {
        let user_prompt = self.build_prompt(user_id, user_name, today)?;
        let prompt = Prompt::get(PromptId::GenerateReport);

        let mut last_error = String::new();
        for attempt in 1..=MAX_ATTEMPTS {
            match self.ai.generate(prompt.system(), &user_prompt).await {
                Ok(raw) => {
                    info!(user_id, attempt, "Report generated");
                    return Ok(strip_code_fences(&raw));
                }
                Err(e) => {
                    warn!(user_id, attempt, error = %e, "Report generation attempt failed");
                    last_error = e.to_string();
                    if attempt < MAX_ATTEMPTS {
                        tokio::time::sleep(self.retry_delay * attempt).await;
                    }
                }
            }
        }

        Err(Error::ReportGeneration(format!(
            "Report generation failed after {} attempts: {}",
            MAX_ATTEMPTS, last_error
        )))
    }

    fn build_prompt(&self, user_id: i64, user_name: &str, today: NaiveDate) -> Result<String> {
        let (month_start, month_end) = month_range(today);

        let budget = self.db.get_budget(user_id)?;
        let goals = self.db.list_goals(user_id)?;
        let details = self
            .db
            .expense_details(user_id, month_start, month_end, DETAIL_LIMIT)?;

        let goal_contexts: Vec<GoalContext> = goals.iter().map(GoalContext::from_goal).collect();

        let budget_json = serde_json::to_string(&budget)?;
        let goals_json = serde_json::to_string(&goal_contexts)?;
        let details_json = serde_json::to_string(&details)?;

        let prompt = Prompt::get(PromptId::GenerateReport);
        let vars = HashMap::from([
            ("userName", user_name),
            ("budgetJson", budget_json.as_str()),
            ("goalsJson", goals_json.as_str()),
            ("detailsJson", details_json.as_str()),
        ]);

        Ok(prompt.render_user(&vars))
    }
}

/// Strip markdown code fences the model tends to wrap HTML output in
fn strip_code_fences(raw: &str) -> String {
    raw.replace("```html", "").replace("```", "").trim().to_string()
}
