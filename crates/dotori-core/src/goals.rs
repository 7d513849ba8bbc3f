//! Goal progress calculation
//!
//! Pure functions over a goal and an evaluation date. Drift is the gap
//! between actual accumulated spend and the ideal linear-allowance spend;
//! `evaluate` reports it for list views, `analyze` for the single-goal
//! detail view.
//!
//! The two entry points intentionally differ by one day in the evaluation
//! boundary: `evaluate` measures as of the start of today, `analyze` as of
//! the end of today (`today + 1`). This mirrors the upstream behavior and
//! is kept rather than unified.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::Goal;

/// Spend above `cumulative_allowance * RISK_FACTOR` is classified 위험
const RISK_FACTOR: f64 = 1.1;

/// Drift status of a goal against its linear spending path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Safe,
    Caution,
    AtRisk,
}

impl GoalStatus {
    /// Korean display label shown to the user
    pub fn label(&self) -> &'static str {
        match self {
            Self::Safe => "안전",
            Self::Caution => "주의",
            Self::AtRisk => "위험",
        }
    }
}

impl std::fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Drift assessment of one goal at a point in time
#[derive(Debug, Clone, Serialize)]
pub struct GoalProgress {
    pub status: GoalStatus,
    /// Percentage in [0, 100], one decimal place
    pub success_rate: f64,
    /// Days of schedule slip (delayed) or days gained (ahead)
    pub changed_days: i64,
    pub is_delayed: bool,
    pub current_spend: i64,
}

/// Kind of single-goal analysis result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AnalysisKind {
    Delayed,
    Shortened,
}

/// Single-goal detail analysis with a rendered message
#[derive(Debug, Clone, Serialize)]
pub struct GoalAnalysis {
    pub goal_id: i64,
    pub changed_days: i64,
    pub kind: AnalysisKind,
    pub success_rate: f64,
    pub message: String,
}

/// Evaluate a goal's drift as of the start of `today`
pub fn evaluate(goal: &Goal, today: NaiveDate) -> GoalProgress {
    let passed_days = (today - goal.start_date).num_days().max(0);
    let cumulative_allowance = goal.daily_allowance * passed_days as f64;

    let diff = goal.current_amount as f64 - cumulative_allowance;
    let changed_days = changed_days(diff, goal.daily_allowance);

    GoalProgress {
        status: determine_status(goal.current_amount, cumulative_allowance),
        success_rate: success_rate(goal, diff, changed_days),
        changed_days,
        is_delayed: diff > 0.0,
        current_spend: goal.current_amount,
    }
}

/// Analyze a single goal as of the end of `today` and render a message
pub fn analyze(goal: &Goal, today: NaiveDate) -> GoalAnalysis {
    // Evaluation boundary is today + 1: the detail view counts today's
    // allowance as already granted.
    let passed_days = (today + chrono::Duration::days(1) - goal.start_date).num_days();
    let diff = goal.current_amount as f64 - goal.daily_allowance * passed_days as f64;
    let changed_days = changed_days(diff, goal.daily_allowance);
    let success_rate = success_rate(goal, diff, changed_days);

    let (kind, message) = if diff > 0.0 {
        (
            AnalysisKind::Delayed,
            format!(
                "목표 기간 중 소비로 인해 약 {}일이 사라졌어요. 달성까지 {}일이 더 필요해요.",
                changed_days, changed_days
            ),
        )
    } else {
        (
            AnalysisKind::Shortened,
            format!(
                "오늘의 절약으로 목표 성공률을 {:.1}%로 유지하고 있어요! 목표일을 {}일 단축시켰습니다.",
                success_rate, changed_days
            ),
        )
    };

    GoalAnalysis {
        goal_id: goal.id,
        changed_days,
        kind,
        success_rate,
        message,
    }
}

/// Days of schedule change implied by a drift amount
///
/// A zero allowance only occurs for a misconfigured goal; guard it as
/// zero changed days instead of dividing.
fn changed_days(diff: f64, daily_allowance: f64) -> i64 {
    if daily_allowance == 0.0 {
        return 0;
    }
    (diff / daily_allowance).abs().round() as i64
}

fn determine_status(spent: i64, cumulative_allowance: f64) -> GoalStatus {
    let spent = spent as f64;
    if spent > cumulative_allowance * RISK_FACTOR {
        GoalStatus::AtRisk
    } else if spent > cumulative_allowance {
        GoalStatus::Caution
    } else {
        GoalStatus::Safe
    }
}

/// Success rate in [0, 100] with one decimal place
///
/// Only slip (positive drift) reduces the rate; days gained never push
/// it above 100.
fn success_rate(goal: &Goal, diff: f64, changed_days: i64) -> f64 {
    let total_period = (goal.end_date - goal.start_date).num_days().max(1);
    let delayed_days = if diff > 0.0 { changed_days } else { 0 };

    let rate = (total_period - delayed_days) as f64 / total_period as f64 * 100.0;
    ((rate * 10.0).round() / 10.0).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, GoalCategory};

    fn goal(target: i64, start: (i32, u32, u32), end: (i32, u32, u32), current: i64) -> Goal {
        let start_date = NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap();
        let end_date = NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap();
        Goal {
            id: 1,
            user_id: 1,
            title: "테스트 목표".to_string(),
            category: GoalCategory::Category(Category::Food),
            target_amount: target,
            current_amount: current,
            start_date,
            end_date,
            memo: None,
            daily_allowance: Goal::daily_allowance_for(target, start_date, end_date),
        }
    }

    #[test]
    fn test_on_track_scenario() {
        // 300,000 over Jan 1..Jan 31 => 10,000/day; on Jan 16, 15 passed
        // days => cumulative 150,000; spend equals allowance exactly.
        let g = goal(300_000, (2026, 1, 1), (2026, 1, 31), 150_000);
        assert_eq!(g.daily_allowance, 10_000.0);

        let p = evaluate(&g, NaiveDate::from_ymd_opt(2026, 1, 16).unwrap());
        assert_eq!(p.status, GoalStatus::Safe);
        assert!(!p.is_delayed);
        assert_eq!(p.changed_days, 0);
        assert_eq!(p.current_spend, 150_000);
        assert_eq!(p.success_rate, 100.0);
    }

    #[test]
    fn test_status_thresholds() {
        // Cumulative allowance on day 10 is 100,000
        let today = NaiveDate::from_ymd_opt(2026, 1, 11).unwrap();

        let safe = evaluate(&goal(300_000, (2026, 1, 1), (2026, 1, 31), 100_000), today);
        assert_eq!(safe.status, GoalStatus::Safe);

        let caution = evaluate(&goal(300_000, (2026, 1, 1), (2026, 1, 31), 105_000), today);
        assert_eq!(caution.status, GoalStatus::Caution);

        // Above cumulative * 1.1 = 110,000
        let risk = evaluate(&goal(300_000, (2026, 1, 1), (2026, 1, 31), 120_000), today);
        assert_eq!(risk.status, GoalStatus::AtRisk);
    }

    #[test]
    fn test_success_rate_decreases_with_delay() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 16).unwrap();
        let mut last_rate = 101.0;
        for overspend in [0, 20_000, 40_000, 80_000] {
            let p = evaluate(
                &goal(300_000, (2026, 1, 1), (2026, 1, 31), 150_000 + overspend),
                today,
            );
            assert!(p.success_rate <= last_rate);
            assert!((0.0..=100.0).contains(&p.success_rate));
            last_rate = p.success_rate;
        }
    }

    #[test]
    fn test_days_gained_does_not_inflate_rate() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 16).unwrap();
        let p = evaluate(&goal(300_000, (2026, 1, 1), (2026, 1, 31), 50_000), today);
        assert!(!p.is_delayed);
        assert_eq!(p.success_rate, 100.0);
        assert_eq!(p.changed_days, 10); // 100,000 under / 10,000 per day
    }

    #[test]
    fn test_before_start_clamps_passed_days() {
        let p = evaluate(
            &goal(300_000, (2026, 2, 1), (2026, 2, 28), 0),
            NaiveDate::from_ymd_opt(2026, 1, 20).unwrap(),
        );
        assert_eq!(p.status, GoalStatus::Safe);
        assert_eq!(p.changed_days, 0);
    }

    #[test]
    fn test_zero_allowance_guard() {
        let mut g = goal(300_000, (2026, 1, 1), (2026, 1, 31), 150_000);
        g.daily_allowance = 0.0;
        let p = evaluate(&g, NaiveDate::from_ymd_opt(2026, 1, 16).unwrap());
        assert_eq!(p.changed_days, 0);
    }

    #[test]
    fn test_analyze_uses_next_day_boundary() {
        // On Jan 16, evaluate sees 15 passed days but analyze sees 16,
        // so an exactly-on-track goal reads as ahead by one day there.
        let g = goal(300_000, (2026, 1, 1), (2026, 1, 31), 150_000);
        let today = NaiveDate::from_ymd_opt(2026, 1, 16).unwrap();

        let p = evaluate(&g, today);
        assert!(!p.is_delayed);

        let a = analyze(&g, today);
        assert_eq!(a.kind, AnalysisKind::Shortened);
        assert_eq!(a.changed_days, 1);
        assert!(a.message.contains("단축"));
    }

    #[test]
    fn test_analyze_delayed_message() {
        let g = goal(300_000, (2026, 1, 1), (2026, 1, 31), 200_000);
        let a = analyze(&g, NaiveDate::from_ymd_opt(2026, 1, 16).unwrap());
        assert_eq!(a.kind, AnalysisKind::Delayed);
        assert!(a.changed_days > 0);
        assert!(a.message.contains("더 필요해요"));
    }
}
