//! Personal spending analysis
//!
//! Pure aggregation over ledger reads: per-category share of the current
//! month's spending, and a weekday breakdown for the current week. No
//! LLM involvement.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;

use crate::db::Database;
use crate::error::Result;
use crate::models::{month_range, today_kst, Category};

/// Korean single-character day labels, Monday first
const DAY_LABELS: [&str; 7] = ["월", "화", "수", "목", "금", "토", "일"];

/// One category's slice of the month
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryShare {
    pub category: Category,
    pub label: &'static str,
    pub total: i64,
    /// Share of the month's total spend, 1 decimal place
    pub percent: f64,
}

/// One category's spend per weekday for the current week
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeekdayBreakdown {
    pub category: Category,
    pub label: &'static str,
    /// Amounts Monday through Sunday
    pub by_day: [i64; 7],
}

/// Personal analysis result
#[derive(Debug, Clone, Serialize)]
pub struct PersonalAnalysis {
    /// Monthly shares, largest spend first
    pub monthly_shares: Vec<CategoryShare>,
    pub monthly_total: i64,
    /// Week start (Monday) the breakdown covers
    pub week_start: NaiveDate,
    pub weekly_breakdown: Vec<WeekdayBreakdown>,
}

/// Korean label for a weekday
pub fn day_label(weekday: Weekday) -> &'static str {
    DAY_LABELS[weekday.num_days_from_monday() as usize]
}

/// Monday of the week containing `date`
fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Run the personal analysis for the month and week containing today
pub fn personal_analysis(db: &Database, user_id: i64) -> Result<PersonalAnalysis> {
    personal_analysis_for_date(db, user_id, today_kst())
}

/// Run the personal analysis anchored at an explicit date
pub fn personal_analysis_for_date(
    db: &Database,
    user_id: i64,
    today: NaiveDate,
) -> Result<PersonalAnalysis> {
    let (month_start, month_end) = month_range(today);
    let sums = db.category_sums(user_id, month_start, month_end)?;

    let monthly_total: i64 = sums.values().sum();
    let mut monthly_shares: Vec<CategoryShare> = Category::ALL
        .iter()
        .map(|&category| {
            let total = sums.get(&category).copied().unwrap_or(0);
            let percent = if monthly_total == 0 {
                0.0
            } else {
                (total as f64 / monthly_total as f64 * 1000.0).round() / 10.0
            };
            CategoryShare {
                category,
                label: category.label(),
                total,
                percent,
            }
        })
        .collect();
    monthly_shares.sort_by(|a, b| b.total.cmp(&a.total));

    let monday = week_start(today);
    let sunday = monday + Duration::days(6);
    let week_entries = db.expenses_between(user_id, monday, sunday)?;

    let mut by_category: HashMap<Category, [i64; 7]> = HashMap::new();
    for entry in &week_entries {
        let day = entry.date.weekday().num_days_from_monday() as usize;
        by_category.entry(entry.category).or_default()[day] += entry.amount;
    }

    let weekly_breakdown = Category::ALL
        .iter()
        .map(|&category| WeekdayBreakdown {
            category,
            label: category.label(),
            by_day: by_category.get(&category).copied().unwrap_or_default(),
        })
        .collect();

    Ok(PersonalAnalysis {
        monthly_shares,
        monthly_total,
        week_start: monday,
        weekly_breakdown,
    })
}
