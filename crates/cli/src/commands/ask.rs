//! `baubot ask` — Run one question through the pipeline from the terminal.
//!
//! Manual smoke-testing without the chat UI.

use std::sync::Arc;

use baubot_answer::{AnswerPipeline, ChatClient};
use baubot_config::AppConfig;
use baubot_retrieval::SearchClient;

pub async fn run(question: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let index = SearchClient::from_config(&config)?;
    let chat = ChatClient::from_config(&config)?;
    let pipeline = AnswerPipeline::new(Arc::new(index), Arc::new(chat))
        .with_top_k(config.search.top_k);

    let answer = pipeline.answer(question).await?;

    println!("{}\n", answer.text);
    println!("  Tier: {}", answer.tier);
    for (i, source) in answer.sources.iter().enumerate() {
        println!(
            "  [{}] {} (score {:.2})",
            i + 1,
            source.label(i + 1),
            source.score
        );
    }

    Ok(())
}
