//! Advice orchestration
//!
//! Once-per-day advice generation: check the cache, build the deviation
//! context, call the generator once, persist, and fall back to a fixed
//! user-safe message on any failure. The advice path never surfaces a raw
//! internal error to the caller.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::ai::{AIClient, TextGenerator};
use crate::db::Database;
use crate::deviation;
use crate::error::{Error, Result};
use crate::models::{month_range, today_kst, AdviceOutcome, Mood};
use crate::prompts::{Prompt, PromptId};

/// Most recent transaction details included in the LLM context
const DETAIL_LIMIT: i64 = 20;

/// Fixed fallback message when advice generation fails
const FALLBACK_MESSAGE: &str = "소비 분석 중 오류가 발생했어요. 잠시 후 다시 시도해주세요.";

/// Advice generation orchestrator
pub struct AdviceEngine {
    db: Database,
    ai: AIClient,
}

impl AdviceEngine {
    pub fn new(db: Database, ai: AIClient) -> Self {
        Self { db, ai }
    }

    /// Generate (or reuse) today's advice for a user
    ///
    /// Infallible by design: every failure degrades to the ERROR outcome
    /// with a fixed message and highlights, and no partial state is
    /// persisted on that path.
    pub async fn generate(&self, user_id: i64) -> AdviceOutcome {
        self.generate_for_date(user_id, today_kst()).await
    }

    /// Generate advice for an explicit "today" (separated for testing)
    pub async fn generate_for_date(&self, user_id: i64, today: NaiveDate) -> AdviceOutcome {
        // Cache check: at most one generation per (user, day)
        match self.db.find_advice(user_id, today) {
            Ok(Some(message)) => {
                info!(user_id, %today, "Advice already generated today");
                return AdviceOutcome::Existing {
                    message,
                    mood: Mood::Positive,
                };
            }
            Ok(None) => {}
            Err(e) => {
                warn!(user_id, error = %e, "Advice cache check failed");
                return Self::error_outcome();
            }
        }

        match self.try_generate(user_id, today).await {
            Ok(outcome) => outcome,
            // Lost the check-then-act race: another request committed first.
            // The unique constraint is the authoritative de-duplication
            // point, so recover the committed row instead of erroring.
            Err(Error::Conflict(_)) => match self.db.find_advice(user_id, today) {
                Ok(Some(message)) => AdviceOutcome::Existing {
                    message,
                    mood: Mood::Positive,
                },
                _ => Self::error_outcome(),
            },
            Err(e) => {
                warn!(user_id, error = %e, "Advice generation failed");
                Self::error_outcome()
            }
        }
    }

    async fn try_generate(&self, user_id: i64, today: NaiveDate) -> Result<AdviceOutcome> {
        let (month_start, month_end) = month_range(today);

        let budget = self.db.get_budget(user_id)?;
        let sums = self.db.category_sums(user_id, month_start, month_end)?;
        let details = self
            .db
            .expense_details(user_id, month_start, month_end, DETAIL_LIMIT)?;

        let report = deviation::analyze(&budget, &sums);

        let percents_json = serde_json::to_string(&labeled_map(report.labeled_percents()))?;
        let spends_json = serde_json::to_string(&labeled_map(
            sums.iter().map(|(c, v)| (c.label(), *v)).collect(),
        ))?;
        let details_json = serde_json::to_string(&details)?;

        let prompt = Prompt::get(PromptId::GenerateAdvice);
        let mood_name = report.mood.as_str();
        let vars = HashMap::from([
            ("mood", mood_name),
            ("percentsJson", percents_json.as_str()),
            ("spendsJson", spends_json.as_str()),
            ("detailsJson", details_json.as_str()),
        ]);

        // Single attempt, no retry: the fallback path covers failures
        let message = self
            .ai
            .generate(prompt.system(), &prompt.render_user(&vars))
            .await?;

        let highlights = deviation::extract_highlights(&report, &details);

        self.db.insert_advice(user_id, today, &message)?;
        info!(user_id, %today, mood = %report.mood, "Advice generated");

        Ok(AdviceOutcome::Success {
            message,
            mood: report.mood,
            highlights,
        })
    }

    /// Fixed user-safe fallback outcome
    fn error_outcome() -> AdviceOutcome {
        AdviceOutcome::Error {
            message: FALLBACK_MESSAGE.to_string(),
            mood: Mood::Negative,
            highlights: vec!["분석 실패".to_string(), "잠시 후 재시도".to_string()],
        }
    }
}

fn labeled_map(pairs: Vec<(&'static str, i64)>) -> serde_json::Map<String, serde_json::Value> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), serde_json::Value::from(v)))
        .collect()
}
