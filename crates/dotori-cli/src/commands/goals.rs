//! Goal management commands (add, list, analyze, update, delete)

use anyhow::{Context, Result};

use dotori_core::db::Database;
use dotori_core::goals;
use dotori_core::models::{today_kst, NewGoal};

use super::{format_krw, parse_date, parse_goal_category};

#[allow(clippy::too_many_arguments)]
pub fn cmd_goal_add(
    db: &Database,
    user_id: i64,
    title: &str,
    category: &str,
    target: i64,
    start: &str,
    end: &str,
    memo: Option<&str>,
) -> Result<()> {
    let goal = NewGoal {
        title: title.to_string(),
        category: parse_goal_category(category)?,
        target_amount: target,
        start_date: parse_date(start)?,
        end_date: parse_date(end)?,
        memo: memo.map(str::to_string),
    };

    let id = db.create_goal(user_id, &goal).context("Failed to create goal")?;
    let created = db
        .get_goal(id)?
        .context("Goal vanished immediately after creation")?;

    println!("✅ Goal #{} created: {}", id, created.title);
    println!("   Scope: {}", created.category.label());
    println!(
        "   Target: {} over {} ~ {}",
        format_krw(created.target_amount),
        created.start_date,
        created.end_date
    );
    println!("   Daily allowance: {}", format_krw(created.daily_allowance as i64));

    Ok(())
}

pub fn cmd_goal_list(db: &Database, user_id: i64, active_only: bool) -> Result<()> {
    let today = today_kst();
    let goals_list = if active_only {
        db.active_goals(user_id, today)?
    } else {
        db.list_goals(user_id)?
    };

    if goals_list.is_empty() {
        println!("No goals yet. Create one with 'dotori goal add'.");
        return Ok(());
    }

    println!();
    println!("🎯 Goals ({})", goals_list.len());
    println!("   ─────────────────────────────────────────────");

    for goal in &goals_list {
        let progress = goals::evaluate(goal, today);
        println!(
            "   #{} {} [{}] {}",
            goal.id,
            goal.title,
            goal.category.label(),
            progress.status.label()
        );
        println!(
            "      {} / {} spent | success rate {:.1}%",
            format_krw(progress.current_spend),
            format_krw(goal.target_amount),
            progress.success_rate
        );
        if progress.is_delayed {
            println!("      ⚠️  {} day(s) behind schedule", progress.changed_days);
        }
    }

    Ok(())
}

pub fn cmd_goal_analyze(db: &Database, id: i64) -> Result<()> {
    let goal = db
        .get_goal(id)?
        .with_context(|| format!("Goal #{} not found", id))?;

    let analysis = goals::analyze(&goal, today_kst());

    println!();
    println!("🔍 {} [{}]", goal.title, goal.category.label());
    println!("   ─────────────────────────────────────────────");
    println!(
        "   Spent {} of {} ({} ~ {})",
        format_krw(goal.current_amount),
        format_krw(goal.target_amount),
        goal.start_date,
        goal.end_date
    );
    println!("   Success rate: {:.1}%", analysis.success_rate);
    println!("   {}", analysis.message);

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_goal_update(
    db: &Database,
    id: i64,
    title: &str,
    category: &str,
    target: i64,
    start: &str,
    end: &str,
    memo: Option<&str>,
) -> Result<()> {
    let goal = NewGoal {
        title: title.to_string(),
        category: parse_goal_category(category)?,
        target_amount: target,
        start_date: parse_date(start)?,
        end_date: parse_date(end)?,
        memo: memo.map(str::to_string),
    };

    db.update_goal(id, &goal)
        .with_context(|| format!("Failed to update goal #{}", id))?;
    println!("✅ Goal #{} updated", id);

    Ok(())
}

pub fn cmd_goal_delete(db: &Database, id: i64) -> Result<()> {
    db.delete_goal(id)
        .with_context(|| format!("Failed to delete goal #{}", id))?;
    println!("✅ Goal #{} deleted", id);
    Ok(())
}
