//! REST API Server for the Finance Insight Engine
//!
//! Exposes the summarizer and AI cycles via HTTP endpoints
//! Integrates with the dashboard frontend UI

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::chat;
use crate::gemini::TextModel;
use crate::insights;
use crate::models::{Account, Category, ChatSnapshot, Transaction};
use crate::summary::summarize;

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerRequest {
    pub accounts: Vec<Account>,
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub question: String,
    pub snapshot: ChatSnapshot,
}

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub model: Arc<dyn TextModel>,
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Summary Endpoint
/// =============================

async fn summary_handler(Json(req): Json<LedgerRequest>) -> (StatusCode, Json<ApiResponse>) {
    info!(
        accounts = req.accounts.len(),
        transactions = req.transactions.len(),
        "Received summary request"
    );

    let summary = summarize(&req.accounts, &req.transactions, &req.categories);

    (StatusCode::OK, Json(ApiResponse::success(summary)))
}

/// =============================
/// Insights Endpoint
/// =============================

async fn insights_handler(
    State(state): State<ApiState>,
    Json(req): Json<LedgerRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    info!(
        accounts = req.accounts.len(),
        transactions = req.transactions.len(),
        "Received insights request"
    );

    let summary = summarize(&req.accounts, &req.transactions, &req.categories);

    match insights::generate_insights(state.model.as_ref(), &summary).await {
        Ok(analysis) => (
            StatusCode::OK,
            Json(ApiResponse::success(serde_json::json!({
                "insights": analysis,
                "summary": summary,
            }))),
        ),
        // A failed AI call leaves the summary unaffected on the client; the
        // response carries insights=null and a single user-facing message.
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!(
                "Insight generation failed: {}",
                e
            ))),
        ),
    }
}

/// =============================
/// Chat Endpoint
/// =============================

async fn chat_handler(
    State(state): State<ApiState>,
    Json(req): Json<ChatRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    info!("Received chat question ({} chars)", req.question.len());

    match chat::answer_question(state.model.as_ref(), &req.question, &req.snapshot).await {
        Ok(reply) => (StatusCode::OK, Json(ApiResponse::success(reply))),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Chat request failed: {}", e))),
        ),
    }
}

/// =============================
/// Router
/// =============================

pub fn create_router(model: Arc<dyn TextModel>) -> Router {
    let state = ApiState { model };

    Router::new()
        .route("/health", axum::routing::get(health))
        .route("/api/summary", post(summary_handler))
        .route("/api/insights", post(insights_handler))
        .route("/api/chat", post(chat_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    model: Arc<dyn TextModel>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(model);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
