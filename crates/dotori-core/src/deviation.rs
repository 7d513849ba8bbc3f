//! Budget deviation analysis
//!
//! Turns current-month category spend into signed percent deviations from
//! the configured caps, a discrete mood, and rule-based highlight strings.
//! Fully deterministic: same inputs, same output.

use std::collections::HashMap;

use chrono::Timelike;
use serde::Serialize;

use crate::models::{BudgetGoal, Category, LedgerDetail, Mood};

/// Mood flips to Negative when any category percent drops below this
const NEGATIVE_THRESHOLD: i64 = -20;

/// Transactions at or after this hour count as late-night spending
const LATE_NIGHT_START_HOUR: u32 = 21;

/// Minimum late-night transactions in a month to trigger the highlight
const LATE_NIGHT_MIN_COUNT: usize = 3;

/// Signed percent deviations per category plus the derived mood
#[derive(Debug, Clone, Serialize)]
pub struct DeviationReport {
    /// (category, percent) in fixed category order; negative = overspent
    pub percents: Vec<(Category, i64)>,
    pub mood: Mood,
}

impl DeviationReport {
    /// Percent for one category
    pub fn percent(&self, category: Category) -> i64 {
        self.percents
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, p)| *p)
            .unwrap_or(0)
    }

    /// Percent map keyed by Korean label, for the LLM context blob
    pub fn labeled_percents(&self) -> Vec<(&'static str, i64)> {
        self.percents.iter().map(|(c, p)| (c.label(), *p)).collect()
    }
}

/// Remaining-budget percentage for one category
///
/// `round(((cap - spend) / cap) * 100)`; overspending yields a negative
/// percent. A zero cap means "not budgeted" and reads as 0 regardless of
/// spend.
pub fn spend_percent(cap: i64, spend: i64) -> i64 {
    if cap == 0 {
        return 0;
    }
    ((cap - spend) as f64 / cap as f64 * 100.0).round() as i64
}

/// Compare monthly category sums against budget caps
pub fn analyze(budget: &BudgetGoal, monthly_sums: &HashMap<Category, i64>) -> DeviationReport {
    let percents: Vec<(Category, i64)> = Category::ALL
        .iter()
        .map(|&c| {
            let spend = monthly_sums.get(&c).copied().unwrap_or(0);
            (c, spend_percent(budget.cap(c), spend))
        })
        .collect();

    let min_percent = percents.iter().map(|(_, p)| *p).min().unwrap_or(0);
    let mood = if min_percent < NEGATIVE_THRESHOLD {
        Mood::Negative
    } else {
        Mood::Positive
    };

    DeviationReport { percents, mood }
}

/// Extract salient-fact highlight strings, order-preserving
///
/// One entry per overspent category, plus a late-night highlight when the
/// month has three or more transactions at 21:00 or later.
pub fn extract_highlights(report: &DeviationReport, details: &[LedgerDetail]) -> Vec<String> {
    let mut highlights = Vec::new();

    for (category, percent) in &report.percents {
        if *percent < 0 {
            highlights.push(format!("{} 예산 초과 {}%", category.label(), percent.abs()));
        }
    }

    let late_night = details
        .iter()
        .filter(|d| d.time.hour() >= LATE_NIGHT_START_HOUR)
        .count();
    if late_night >= LATE_NIGHT_MIN_COUNT {
        highlights.push(format!("21시 이후 심야 소비 {}회", late_night));
    }

    highlights
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn budget(food: i64, transport: i64, leisure: i64, fixed: i64) -> BudgetGoal {
        BudgetGoal {
            user_id: 1,
            food_amount: food,
            transport_amount: transport,
            leisure_amount: leisure,
            fixed_amount: fixed,
            total_amount: food + transport + leisure + fixed,
        }
    }

    fn detail(category: Category, amount: i64, hour: u32) -> LedgerDetail {
        LedgerDetail {
            category,
            amount,
            date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            time: NaiveTime::from_hms_opt(hour, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_spend_percent_sign_convention() {
        // Under budget => positive
        assert_eq!(spend_percent(100_000, 80_000), 20);
        // Exactly at cap => 0
        assert_eq!(spend_percent(100_000, 100_000), 0);
        // Over budget => negative
        assert_eq!(spend_percent(100_000, 125_000), -25);
        // Zero cap => 0 regardless of spend
        assert_eq!(spend_percent(0, 999_999), 0);
    }

    #[test]
    fn test_mood_threshold() {
        let b = budget(100_000, 100_000, 100_000, 100_000);

        // transport at -25 => Negative
        let sums = HashMap::from([
            (Category::Food, 90_000),
            (Category::Transport, 125_000),
            (Category::Leisure, 95_000),
            (Category::Fixed, 98_000),
        ]);
        let report = analyze(&b, &sums);
        assert_eq!(report.mood, Mood::Negative);
        assert_eq!(report.percent(Category::Transport), -25);

        // transport at -10 only => still Positive (threshold is < -20)
        let sums = HashMap::from([
            (Category::Food, 90_000),
            (Category::Transport, 110_000),
            (Category::Leisure, 95_000),
            (Category::Fixed, 98_000),
        ]);
        assert_eq!(analyze(&b, &sums).mood, Mood::Positive);
    }

    #[test]
    fn test_missing_category_counts_as_zero_spend() {
        let b = budget(100_000, 100_000, 100_000, 100_000);
        let report = analyze(&b, &HashMap::new());
        assert_eq!(report.mood, Mood::Positive);
        for (_, p) in &report.percents {
            assert_eq!(*p, 100);
        }
    }

    #[test]
    fn test_highlights_overspent_categories_only() {
        let b = budget(100_000, 100_000, 0, 0);
        let sums = HashMap::from([
            (Category::Food, 90_000),     // +10, no highlight
            (Category::Transport, 110_000), // -10, highlight
        ]);
        let report = analyze(&b, &sums);
        let highlights = extract_highlights(&report, &[]);
        assert_eq!(highlights, vec!["교통비 예산 초과 10%".to_string()]);
    }

    #[test]
    fn test_late_night_highlight() {
        let b = budget(100_000, 0, 0, 0);
        let report = analyze(&b, &HashMap::new());

        // Two late-night transactions: below threshold
        let details = vec![
            detail(Category::Food, 12_000, 22),
            detail(Category::Food, 8_000, 23),
            detail(Category::Food, 9_000, 14),
        ];
        assert!(extract_highlights(&report, &details).is_empty());

        // Three at 21:00 or later: highlight fires
        let details = vec![
            detail(Category::Food, 12_000, 22),
            detail(Category::Food, 8_000, 23),
            detail(Category::Leisure, 15_000, 21),
        ];
        let highlights = extract_highlights(&report, &details);
        assert_eq!(highlights, vec!["21시 이후 심야 소비 3회".to_string()]);
    }

    #[test]
    fn test_highlight_order_is_stable() {
        let b = budget(100_000, 100_000, 100_000, 100_000);
        let sums = HashMap::from([
            (Category::Food, 130_000),
            (Category::Transport, 110_000),
            (Category::Fixed, 150_000),
        ]);
        let report = analyze(&b, &sums);
        let highlights = extract_highlights(&report, &[]);
        assert_eq!(
            highlights,
            vec![
                "식비 예산 초과 30%".to_string(),
                "교통비 예산 초과 10%".to_string(),
                "고정비 예산 초과 50%".to_string(),
            ]
        );
    }
}
