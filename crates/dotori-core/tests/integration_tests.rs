//! Integration tests for dotori-core
//!
//! These tests exercise the full record → propagate → evaluate → advise
//! workflow against an in-memory encrypted database.

use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};

use dotori_core::{
    advice::AdviceEngine,
    ai::{AIClient, MockBackend},
    analysis::personal_analysis_for_date,
    db::Database,
    deviation, goals,
    models::{
        AdviceOutcome, BudgetGoal, Category, EntryType, GoalCategory, Mood, NewGoal,
        NewLedgerEntry, PropagationPolicy,
    },
    report::ReportEngine,
    Error,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn expense(category: Category, amount: i64, date: NaiveDate, hour: u32) -> NewLedgerEntry {
    NewLedgerEntry {
        amount,
        category,
        memo: Some("테스트 지출".to_string()),
        entry_type: EntryType::Expense,
        date,
        time: NaiveTime::from_hms_opt(hour, 30, 0).unwrap(),
    }
}

fn march_budget(user_id: i64) -> BudgetGoal {
    BudgetGoal {
        user_id,
        food_amount: 300_000,
        transport_amount: 100_000,
        leisure_amount: 150_000,
        fixed_amount: 450_000,
        total_amount: 1_000_000,
    }
}

// =============================================================================
// Record → Propagate → Evaluate Workflow
// =============================================================================

#[test]
fn test_full_ledger_to_goal_workflow() {
    let db = Database::in_memory().expect("Failed to create in-memory database");

    // A month-long food goal plus an all-categories goal
    let food_goal = db
        .create_goal(
            1,
            &NewGoal {
                title: "3월 식비 30만원".to_string(),
                category: GoalCategory::Category(Category::Food),
                target_amount: 300_000,
                start_date: date(2026, 3, 1),
                end_date: date(2026, 3, 31),
                memo: None,
            },
        )
        .unwrap();
    let all_goal = db
        .create_goal(
            1,
            &NewGoal {
                title: "3월 전체 소비".to_string(),
                category: GoalCategory::All,
                target_amount: 1_000_000,
                start_date: date(2026, 3, 1),
                end_date: date(2026, 3, 31),
                memo: None,
            },
        )
        .unwrap();

    // Expenses propagate to matching goals, income to none
    db.record_entry(
        1,
        &expense(Category::Food, 12_000, date(2026, 3, 5), 12),
        PropagationPolicy::AllGoals,
    )
    .unwrap();
    db.record_entry(
        1,
        &expense(Category::Transport, 3_000, date(2026, 3, 5), 8),
        PropagationPolicy::AllGoals,
    )
    .unwrap();
    db.record_entry(
        1,
        &NewLedgerEntry {
            amount: 500_000,
            category: Category::Fixed,
            memo: Some("급여".to_string()),
            entry_type: EntryType::Income,
            date: date(2026, 3, 5),
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        },
        PropagationPolicy::AllGoals,
    )
    .unwrap();

    let food = db.get_goal(food_goal).unwrap().unwrap();
    let all = db.get_goal(all_goal).unwrap().unwrap();
    assert_eq!(food.current_amount, 12_000);
    assert_eq!(all.current_amount, 15_000);

    // The goal still tracks well under its daily allowance
    let progress = goals::evaluate(&food, date(2026, 3, 5));
    assert_eq!(food.daily_allowance, 300_000.0 / 30.0);
    assert!(!progress.is_delayed);
    assert_eq!(progress.success_rate, 100.0);
}

#[test]
fn test_progress_scenario_half_spent_mid_month() {
    let db = Database::in_memory().unwrap();
    let id = db
        .create_goal(
            1,
            &NewGoal {
                title: "1월 절약".to_string(),
                category: GoalCategory::All,
                target_amount: 300_000,
                start_date: date(2026, 1, 1),
                end_date: date(2026, 1, 31),
                memo: None,
            },
        )
        .unwrap();

    db.record_entry(
        1,
        &expense(Category::Leisure, 150_000, date(2026, 1, 10), 15),
        PropagationPolicy::AllGoals,
    )
    .unwrap();

    let goal = db.get_goal(id).unwrap().unwrap();
    let progress = goals::evaluate(&goal, date(2026, 1, 16));

    // 150,000 spent vs 15 passed days at 10,000/day: exactly on track
    assert_eq!(progress.status, goals::GoalStatus::Safe);
    assert_eq!(progress.success_rate, 100.0);
}

// =============================================================================
// Deviation → Advice Workflow
// =============================================================================

#[tokio::test]
async fn test_advice_success_then_existing() {
    let db = Database::in_memory().unwrap();
    db.set_budget(&march_budget(1)).unwrap();
    db.record_entry(
        1,
        &expense(Category::Transport, 125_000, date(2026, 3, 10), 22),
        PropagationPolicy::AllGoals,
    )
    .unwrap();

    let mock = MockBackend::new().with_reply("교통비를 줄여보세요.");
    let engine = AdviceEngine::new(db.clone(), AIClient::Mock(mock.clone()));

    let first = engine.generate_for_date(1, date(2026, 3, 15)).await;
    match &first {
        AdviceOutcome::Success {
            message,
            mood,
            highlights,
        } => {
            assert_eq!(message, "교통비를 줄여보세요.");
            assert_eq!(*mood, Mood::Negative);
            assert!(highlights.contains(&"교통비 예산 초과 25%".to_string()));
        }
        other => panic!("expected Success, got {:?}", other),
    }

    // Second call the same day reuses the stored message without a model call
    let second = engine.generate_for_date(1, date(2026, 3, 15)).await;
    match second {
        AdviceOutcome::Existing { message, mood } => {
            assert_eq!(message, "교통비를 줄여보세요.");
            assert_eq!(mood, Mood::Positive);
        }
        other => panic!("expected Existing, got {:?}", other),
    }
    assert_eq!(mock.calls(), 1);

    // A different day generates fresh advice
    let next_day = engine.generate_for_date(1, date(2026, 3, 16)).await;
    assert!(matches!(next_day, AdviceOutcome::Success { .. }));
    assert_eq!(mock.calls(), 2);
}

#[tokio::test]
async fn test_advice_failure_never_panics_or_persists() {
    let db = Database::in_memory().unwrap();
    db.set_budget(&march_budget(1)).unwrap();

    let engine = AdviceEngine::new(db.clone(), AIClient::Mock(MockBackend::failing(1)));

    let outcome = engine.generate_for_date(1, date(2026, 3, 15)).await;
    match outcome {
        AdviceOutcome::Error { mood, .. } => assert_eq!(mood, Mood::Negative),
        other => panic!("expected Error, got {:?}", other),
    }
    assert!(db.find_advice(1, date(2026, 3, 15)).unwrap().is_none());

    // The next attempt succeeds once the backend recovers
    let retry = engine.generate_for_date(1, date(2026, 3, 15)).await;
    assert!(matches!(retry, AdviceOutcome::Success { .. }));
}

#[test]
fn test_deviation_highlights_from_stored_entries() {
    let db = Database::in_memory().unwrap();
    db.set_budget(&march_budget(1)).unwrap();

    // Three late-night leisure expenses and a food overrun
    for day in [10, 11, 12] {
        db.record_entry(
            1,
            &expense(Category::Leisure, 20_000, date(2026, 3, day), 22),
            PropagationPolicy::AllGoals,
        )
        .unwrap();
    }
    db.record_entry(
        1,
        &expense(Category::Food, 390_000, date(2026, 3, 13), 12),
        PropagationPolicy::AllGoals,
    )
    .unwrap();

    let sums = db
        .category_sums(1, date(2026, 3, 1), date(2026, 3, 31))
        .unwrap();
    let details = db
        .expense_details(1, date(2026, 3, 1), date(2026, 3, 31), 50)
        .unwrap();

    let report = deviation::analyze(&march_budget(1), &sums);
    assert_eq!(report.mood, Mood::Negative);

    let highlights = deviation::extract_highlights(&report, &details);
    assert!(highlights.contains(&"식비 예산 초과 30%".to_string()));
    assert!(highlights.contains(&"21시 이후 심야 소비 3회".to_string()));
}

// =============================================================================
// Report Workflow
// =============================================================================

#[tokio::test]
async fn test_report_retry_then_terminal_error() {
    let db = Database::in_memory().unwrap();
    db.set_budget(&march_budget(1)).unwrap();

    // Transient failures are retried
    let flaky = MockBackend::failing(2).with_reply("```html\n<h1>3월</h1>\n```");
    let engine = ReportEngine::new(db.clone(), AIClient::Mock(flaky.clone()))
        .with_retry_delay(Duration::from_millis(1));
    let html = engine
        .generate_for_date(1, "도토리", date(2026, 3, 15))
        .await
        .unwrap();
    assert_eq!(html, "<h1>3월</h1>");
    assert_eq!(flaky.calls(), 3);

    // A dead backend exhausts all attempts and surfaces a terminal error
    let dead = MockBackend::failing(10);
    let engine = ReportEngine::new(db, AIClient::Mock(dead.clone()))
        .with_retry_delay(Duration::from_millis(1));
    let err = engine
        .generate_for_date(1, "도토리", date(2026, 3, 15))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ReportGeneration(_)));
    assert_eq!(dead.calls(), 3);
}

// =============================================================================
// Personal Analysis
// =============================================================================

#[test]
fn test_personal_analysis_over_recorded_month() {
    let db = Database::in_memory().unwrap();
    db.record_entry(
        1,
        &expense(Category::Food, 60_000, date(2026, 3, 9), 12),
        PropagationPolicy::AllGoals,
    )
    .unwrap();
    db.record_entry(
        1,
        &expense(Category::Fixed, 40_000, date(2026, 3, 11), 9),
        PropagationPolicy::AllGoals,
    )
    .unwrap();

    let analysis = personal_analysis_for_date(&db, 1, date(2026, 3, 11)).unwrap();
    assert_eq!(analysis.monthly_total, 100_000);
    assert_eq!(analysis.monthly_shares[0].category, Category::Food);
    assert_eq!(analysis.monthly_shares[0].percent, 60.0);
    assert_eq!(analysis.week_start, date(2026, 3, 9));

    let food_week = analysis
        .weekly_breakdown
        .iter()
        .find(|b| b.category == Category::Food)
        .unwrap();
    assert_eq!(food_week.by_day[0], 60_000);
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_encrypted_database_reopens_with_same_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dotori.db");
    let path_str = path.to_str().unwrap();

    {
        let db = Database::new_with_key(path_str, Some("호두알")).unwrap();
        db.set_budget(&march_budget(1)).unwrap();
    }

    let db = Database::new_with_key(path_str, Some("호두알")).unwrap();
    let budget = db.get_budget(1).unwrap();
    assert_eq!(budget.total_amount, 1_000_000);

    // The wrong key cannot read the file
    assert!(Database::new_with_key(path_str, Some("다른키")).is_err());
}
