//! Personal spending analysis command

use anyhow::Result;
use chrono::Weekday;

use dotori_core::analysis::{day_label, personal_analysis};
use dotori_core::db::Database;

use super::format_krw;

pub fn cmd_analysis(db: &Database, user_id: i64) -> Result<()> {
    let analysis = personal_analysis(db, user_id)?;

    println!();
    println!("📈 Monthly spending by category");
    println!("   ─────────────────────────────────────────────");
    if analysis.monthly_total == 0 {
        println!("   No expenses recorded this month.");
    } else {
        for share in &analysis.monthly_shares {
            println!(
                "   {}: {} ({:.1}%)",
                share.label,
                format_krw(share.total),
                share.percent
            );
        }
        println!("   Total: {}", format_krw(analysis.monthly_total));
    }

    println!();
    println!("📅 This week (from {})", analysis.week_start);
    println!("   ─────────────────────────────────────────────");

    let days = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];
    let header: Vec<String> = days.iter().map(|d| day_label(*d).to_string()).collect();
    println!("   {:<6} {}", "", header.join("        "));

    for breakdown in &analysis.weekly_breakdown {
        let cells: Vec<String> = breakdown
            .by_day
            .iter()
            .map(|amount| {
                if *amount == 0 {
                    "-".to_string()
                } else {
                    (*amount / 1000).to_string() + "k"
                }
            })
            .collect();
        println!("   {:<6} {}", breakdown.label, cells.join("\t"));
    }

    Ok(())
}
