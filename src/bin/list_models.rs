//! Prints the language models the configured `GEMINI_API_KEY` can use.

use anyhow::{anyhow, Result};
use eslatma_bot::services::llm::GeminiModel;
use std::env;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    dotenvy::dotenv().ok();

    let api_key = env::var("GEMINI_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| anyhow!("GEMINI_API_KEY must be set"))?;

    let client = GeminiModel::new(api_key, String::new(), Duration::from_secs(30))?;
    let models = client.list_models().await?;

    println!("🔍 Gemini models ({}):", models.len());
    for model in models {
        println!("—");
        println!("NAME:    {}", model.name);
        println!("DISPLAY: {}", model.display_name);
        println!("METHODS: {}", model.supported_generation_methods.join(", "));
    }

    Ok(())
}
