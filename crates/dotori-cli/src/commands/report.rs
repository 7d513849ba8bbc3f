//! Monthly AI report command

use std::path::Path;

use anyhow::{Context, Result};

use dotori_core::ai::AIClient;
use dotori_core::db::Database;
use dotori_core::report::ReportEngine;

pub async fn cmd_report(
    db: &Database,
    user_id: i64,
    user_name: &str,
    ai: AIClient,
    output: Option<&Path>,
) -> Result<()> {
    println!("📝 Generating this month's report...");

    let engine = ReportEngine::new(db.clone(), ai);
    let html = engine
        .generate(user_id, user_name)
        .await
        .context("Report generation failed")?;

    match output {
        Some(path) => {
            std::fs::write(path, &html)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            println!("✅ Report written to {}", path.display());
        }
        None => {
            println!();
            println!("{}", html);
        }
    }

    Ok(())
}
