//! Tests that make real API calls.
//!
//! Gated behind the `api` marker feature; run with
//! `cargo test -p chalkboard_models --features api`. Each test skips when
//! no key is configured.

#![cfg(feature = "api")]

use chalkboard_core::{GenerateRequest, Message, Role};
use chalkboard_interface::Driver;
use chalkboard_models::GeminiClient;

fn client_or_skip() -> Option<GeminiClient> {
    dotenvy::dotenv().ok();
    if !GeminiClient::available() {
        eprintln!("GEMINI_API_KEY not set, skipping API test");
        return None;
    }
    Some(GeminiClient::new().expect("client construction with key present"))
}

#[tokio::test]
async fn generates_text_from_a_simple_prompt() -> anyhow::Result<()> {
    let Some(client) = client_or_skip() else {
        return Ok(());
    };

    let request = GenerateRequest {
        messages: vec![Message::text(Role::User, "Reply with the single word: ready")],
        max_tokens: Some(16),
        ..Default::default()
    };

    let response = client.generate(&request).await?;
    assert!(!response.text().is_empty());
    Ok(())
}
