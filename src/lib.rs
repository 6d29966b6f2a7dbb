//! Finance Insight Engine
//!
//! Backend for a personal-finance dashboard that:
//! - Aggregates raw accounts/transactions into net worth and cashflow summaries
//! - Shapes those summaries into prompts for a generative-language model
//! - Serves analysis + chat endpoints consumed by the dashboard UI
//!
//! PIPELINE:
//! LEDGER → SUMMARIZE → (PROMPT → MODEL → PARSE) → RENDER

pub mod api;
pub mod chat;
pub mod error;
pub mod gemini;
pub mod insights;
pub mod models;
pub mod summary;

pub use error::Result;

// Re-export common types
pub use models::*;
pub use summary::{summarize, summarize_at};
