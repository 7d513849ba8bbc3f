//! Budget cap commands (set, show)

use anyhow::{Context, Result};

use dotori_core::db::Database;
use dotori_core::deviation;
use dotori_core::models::{month_range, today_kst, BudgetGoal, Category};

use super::format_krw;

pub fn cmd_budget_set(
    db: &Database,
    user_id: i64,
    food: i64,
    transport: i64,
    leisure: i64,
    fixed: i64,
) -> Result<()> {
    let budget = BudgetGoal {
        user_id,
        food_amount: food,
        transport_amount: transport,
        leisure_amount: leisure,
        fixed_amount: fixed,
        total_amount: food + transport + leisure + fixed,
    };

    db.set_budget(&budget).context("Failed to save budget")?;

    println!("✅ Monthly budget saved");
    println!("   Total: {}", format_krw(budget.total_amount));

    Ok(())
}

pub fn cmd_budget_show(db: &Database, user_id: i64) -> Result<()> {
    let budget = db
        .get_budget(user_id)
        .context("No budget set. Run 'dotori budget set' first")?;

    let (from, to) = month_range(today_kst());
    let sums = db.category_sums(user_id, from, to)?;
    let report = deviation::analyze(&budget, &sums);

    println!();
    println!("💰 Budget ({} ~ {})", from, to);
    println!("   ─────────────────────────────────────────────");

    for category in Category::ALL {
        let cap = budget.cap(category);
        let spend = sums.get(&category).copied().unwrap_or(0);
        let percent = report.percent(category);
        let mark = if percent < 0 { "⚠️ " } else { "  " };
        println!(
            "   {}{}: {} / {} ({}% remaining)",
            mark,
            category.label(),
            format_krw(spend),
            format_krw(cap),
            percent
        );
    }

    println!("   ─────────────────────────────────────────────");
    println!("   Mood: {}", report.mood);

    Ok(())
}
