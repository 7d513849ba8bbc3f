//! Domain models for dotori
//!
//! All money amounts are integer KRW. The business timezone is fixed to
//! Asia/Seoul (UTC+9); `today_kst` is the single source of "today" for
//! every analytics operation.

use chrono::{FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Seconds east of UTC for the fixed business timezone (Asia/Seoul)
const KST_OFFSET_SECS: i32 = 9 * 3600;

/// Today's date in the business timezone
pub fn today_kst() -> NaiveDate {
    let kst = FixedOffset::east_opt(KST_OFFSET_SECS).expect("valid fixed offset");
    Utc::now().with_timezone(&kst).date_naive()
}

/// First and last day of the month containing `date`
pub fn month_range(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    use chrono::Datelike;
    let first = NaiveDate::from_ymd_opt(date.year(), date.month(), 1).expect("valid month start");
    let next_month = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };
    let last = next_month.expect("valid next month") - chrono::Duration::days(1);
    (first, last)
}

/// Spending categories tracked against budget caps
///
/// A closed set: the analyzer matches exhaustively on these, so a typo in a
/// category name is a compile error rather than a silently ignored map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Transport,
    Leisure,
    Fixed,
}

impl Category {
    /// All categories in display order (stable for highlight extraction)
    pub const ALL: [Category; 4] = [
        Category::Food,
        Category::Transport,
        Category::Leisure,
        Category::Fixed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Transport => "transport",
            Self::Leisure => "leisure",
            Self::Fixed => "fixed",
        }
    }

    /// Korean display label, used in highlights and LLM context
    pub fn label(&self) -> &'static str {
        match self {
            Self::Food => "식비",
            Self::Transport => "교통비",
            Self::Leisure => "여가비",
            Self::Fixed => "고정비",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "food" | "식비" => Ok(Self::Food),
            "transport" | "교통비" => Ok(Self::Transport),
            "leisure" | "여가비" => Ok(Self::Leisure),
            "fixed" | "고정비" => Ok(Self::Fixed),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Category scope of a goal: one spending category, or the "all" sentinel
/// that accumulates every expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalCategory {
    All,
    Category(Category),
}

impl GoalCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Category(c) => c.as_str(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "전체",
            Self::Category(c) => c.label(),
        }
    }

    /// Whether an expense in `category` counts toward this goal
    pub fn matches(&self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Category(c) => *c == category,
        }
    }
}

impl std::str::FromStr for GoalCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" | "전체" => Ok(Self::All),
            other => other.parse::<Category>().map(Self::Category),
        }
    }
}

impl std::fmt::Display for GoalCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transaction type of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Expense,
    Income,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }
}

impl std::str::FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "expense" | "지출" => Ok(Self::Expense),
            "income" | "수입" => Ok(Self::Income),
            _ => Err(format!("Unknown entry type: {}", s)),
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A savings/spending goal with a time window and linear daily allowance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub category: GoalCategory,
    pub target_amount: i64,
    /// Accumulated expense amount; mutated only by ledger propagation
    pub current_amount: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub memo: Option<String>,
    /// target_amount / max(1, period days); derived, recomputed on update
    pub daily_allowance: f64,
}

impl Goal {
    /// Derive the daily allowance for a target over a period
    ///
    /// A zero or negative period is clamped to one day so the allowance is
    /// never a division by zero.
    pub fn daily_allowance_for(target_amount: i64, start: NaiveDate, end: NaiveDate) -> f64 {
        let days = (end - start).num_days().max(1);
        target_amount as f64 / days as f64
    }

    /// Whether the goal window contains `date`
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// Fields for creating or updating a goal
#[derive(Debug, Clone)]
pub struct NewGoal {
    pub title: String,
    pub category: GoalCategory,
    pub target_amount: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub memo: Option<String>,
}

impl NewGoal {
    /// Validate goal invariants: positive target, end after start
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.target_amount <= 0 {
            return Err("target_amount must be positive".to_string());
        }
        if self.end_date <= self.start_date {
            return Err("end_date must be after start_date".to_string());
        }
        Ok(())
    }
}

/// One financial transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: i64,
    pub user_id: i64,
    pub amount: i64,
    pub category: Category,
    pub memo: Option<String>,
    pub entry_type: EntryType,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

/// Fields for writing a ledger entry
#[derive(Debug, Clone)]
pub struct NewLedgerEntry {
    pub amount: i64,
    pub category: Category,
    pub memo: Option<String>,
    pub entry_type: EntryType,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

/// Transaction detail fed to the LLM context and the late-night rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerDetail {
    pub category: Category,
    pub amount: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

/// Per-user monthly budget caps, one row per user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetGoal {
    pub user_id: i64,
    pub food_amount: i64,
    pub transport_amount: i64,
    pub leisure_amount: i64,
    pub fixed_amount: i64,
    pub total_amount: i64,
}

impl BudgetGoal {
    /// Cap for a category
    pub fn cap(&self, category: Category) -> i64 {
        match category {
            Category::Food => self.food_amount,
            Category::Transport => self.transport_amount,
            Category::Leisure => self.leisure_amount,
            Category::Fixed => self.fixed_amount,
        }
    }
}

/// Which goals a new expense propagates into
///
/// `AllGoals` mirrors the write-side behavior of the original system (no
/// date filtering); `ActiveOnly` restricts propagation to goals whose
/// window contains the entry date, matching the read-side active filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropagationPolicy {
    #[default]
    AllGoals,
    ActiveOnly,
}

/// POSITIVE/NEGATIVE classification of a user's budget deviation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mood {
    Positive,
    Negative,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "POSITIVE",
            Self::Negative => "NEGATIVE",
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of a once-per-day advice request
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "UPPERCASE")]
pub enum AdviceOutcome {
    /// Fresh advice was generated and persisted
    Success {
        message: String,
        mood: Mood,
        highlights: Vec<String>,
    },
    /// Advice already existed for (user, today); cached message returned
    #[serde(rename = "EXIST")]
    Existing { message: String, mood: Mood },
    /// Generation failed; fixed user-safe fallback
    Error {
        message: String,
        mood: Mood,
        highlights: Vec<String>,
    },
}

impl AdviceOutcome {
    pub fn message(&self) -> &str {
        match self {
            Self::Success { message, .. }
            | Self::Existing { message, .. }
            | Self::Error { message, .. } => message,
        }
    }

    pub fn mood(&self) -> Mood {
        match self {
            Self::Success { mood, .. }
            | Self::Existing { mood, .. }
            | Self::Error { mood, .. } => *mood,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_str_both_languages() {
        assert_eq!("food".parse::<Category>().unwrap(), Category::Food);
        assert_eq!("식비".parse::<Category>().unwrap(), Category::Food);
        assert_eq!("교통비".parse::<Category>().unwrap(), Category::Transport);
        assert!("shopping".parse::<Category>().is_err());
    }

    #[test]
    fn test_goal_category_matches() {
        assert!(GoalCategory::All.matches(Category::Food));
        assert!(GoalCategory::All.matches(Category::Fixed));
        assert!(GoalCategory::Category(Category::Food).matches(Category::Food));
        assert!(!GoalCategory::Category(Category::Food).matches(Category::Leisure));
    }

    #[test]
    fn test_goal_category_from_str_sentinel() {
        assert_eq!("all".parse::<GoalCategory>().unwrap(), GoalCategory::All);
        assert_eq!("전체".parse::<GoalCategory>().unwrap(), GoalCategory::All);
        assert_eq!(
            "leisure".parse::<GoalCategory>().unwrap(),
            GoalCategory::Category(Category::Leisure)
        );
    }

    #[test]
    fn test_daily_allowance_clamps_period() {
        let d = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        // Zero-length period clamps to one day
        assert_eq!(Goal::daily_allowance_for(30_000, d, d), 30_000.0);

        let end = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        assert_eq!(Goal::daily_allowance_for(300_000, d, end), 10_000.0);
    }

    #[test]
    fn test_month_range() {
        let (first, last) = month_range(NaiveDate::from_ymd_opt(2026, 2, 15).unwrap());
        assert_eq!(first, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());

        let (first, last) = month_range(NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());
        assert_eq!(first, NaiveDate::from_ymd_opt(2026, 12, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());
    }

    #[test]
    fn test_new_goal_validation() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let goal = NewGoal {
            title: "커피 줄이기".to_string(),
            category: GoalCategory::Category(Category::Food),
            target_amount: 0,
            start_date: start,
            end_date: start + chrono::Duration::days(30),
            memo: None,
        };
        assert!(goal.validate().is_err());

        let goal = NewGoal {
            target_amount: 100_000,
            end_date: start,
            ..goal
        };
        assert!(goal.validate().is_err());
    }
}
