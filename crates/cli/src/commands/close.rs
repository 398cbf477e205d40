//! `baubot close` — Close a support case from the terminal.

use std::sync::Arc;

use baubot_cases::{FeedbackCloser, FileCaseStore, IncomingFeedback};
use baubot_config::AppConfig;

pub async fn run(
    case_id: &str,
    success: bool,
    rating: Option<u8>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let store = Arc::new(FileCaseStore::from_config(&config));
    let closer = FeedbackCloser::new(store);

    let mut incoming = IncomingFeedback::default();
    if success {
        incoming
            .resolution
            .insert("success".into(), serde_json::json!(true));
    }
    if let Some(rating) = rating {
        incoming
            .feedback
            .insert("rating".into(), serde_json::json!(rating));
    }

    let closed = closer.close(case_id, incoming).await?;

    println!("✅ Case {} closed", closed.case.case_id);
    if closed.auto_approved {
        println!("   Promoted to the approved partition");
    }

    Ok(())
}
