//! Daily AI advice command

use anyhow::Result;

use dotori_core::advice::AdviceEngine;
use dotori_core::ai::AIClient;
use dotori_core::db::Database;
use dotori_core::models::AdviceOutcome;

pub async fn cmd_advice(db: &Database, user_id: i64, ai: AIClient, json: bool) -> Result<()> {
    let engine = AdviceEngine::new(db.clone(), ai);
    let outcome = engine.generate(user_id).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match &outcome {
        AdviceOutcome::Success {
            message,
            mood,
            highlights,
        } => {
            println!();
            println!("🐿️  Today's advice ({})", mood);
            println!("   {}", message);
            for highlight in highlights {
                println!("   • {}", highlight);
            }
        }
        AdviceOutcome::Existing { message, .. } => {
            println!();
            println!("🐿️  Today's advice (already generated)");
            println!("   {}", message);
        }
        AdviceOutcome::Error { message, .. } => {
            println!();
            println!("❌ {}", message);
        }
    }

    Ok(())
}
