use finance_insight_engine::{api::start_server, gemini::GeminiClient};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let gemini_api_key = std::env::var("GEMINI_API_KEY").unwrap_or_else(|_| {
        eprintln!("⚠️  GEMINI_API_KEY not set in .env");
        eprintln!("📌 AI insights and chat will fail until a key is configured");
        String::new()
    });

    let api_port: u16 = std::env::var("PORT")
        .or_else(|_| std::env::var("API_PORT"))
        .unwrap_or_else(|_| "8080".to_string())
        .parse()?;

    info!("🚀 Finance Insight Engine - API Server");
    info!("📍 Port: {}", api_port);

    let model = Arc::new(GeminiClient::new(gemini_api_key));

    info!("📡 Starting API server...");

    // Start API server
    start_server(model, api_port).await?;

    Ok(())
}
