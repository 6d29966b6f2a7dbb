//! Chat assistant cycle
//!
//! Answers free-text questions about the user's finances by embedding a
//! reduced JSON snapshot of the ledgers into a natural-language prompt.
//! Model responses are returned verbatim; transport failures degrade to a
//! canned fallback message instead of an error state.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::gemini::TextModel;
use crate::models::{Category, ChatSnapshot, DatasetSnapshot, Transaction};

/// Only this many of the most recent transactions per dataset are sent.
pub const MAX_SNAPSHOT_TRANSACTIONS: usize = 50;

/// Shown when the model cannot be reached; the UI displays it verbatim.
pub const CHAT_FALLBACK_MESSAGE: &str =
    "Sorry, I couldn't reach the assistant right now. Please try again in a moment.";

const CHAT_SYSTEM_PROMPT: &str = "\
You are a friendly personal-finance assistant embedded in a dashboard.

Guidelines:
- Answer only from the financial snapshot provided in the prompt
- Quote amounts in the user's currency
- Be concise; plain text only, no markdown tables
- If the snapshot does not contain the answer, say so
- Never invent transactions or balances";

/// Reply handed back to the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub answer: String,
    pub source: String,
}

//
// ================= Snapshot Pruning =================
//

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrunedAccount {
    name: String,
    #[serde(rename = "type")]
    account_type: crate::models::AccountType,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrunedTransaction {
    amount: f64,
    date: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category_id: Option<String>,
    is_transfer: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrunedDataset {
    accounts: Vec<PrunedAccount>,
    transactions: Vec<PrunedTransaction>,
    categories: Vec<Category>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrunedSnapshot {
    currency: String,
    personal: PrunedDataset,
    home: PrunedDataset,
}

fn prune_transactions(transactions: &[Transaction]) -> Vec<PrunedTransaction> {
    let start = transactions.len().saturating_sub(MAX_SNAPSHOT_TRANSACTIONS);
    transactions[start..]
        .iter()
        .map(|tx| PrunedTransaction {
            amount: tx.amount,
            date: tx.date,
            category_id: tx.category_id.clone(),
            is_transfer: tx.is_transfer,
        })
        .collect()
}

fn prune_dataset(dataset: &DatasetSnapshot) -> PrunedDataset {
    PrunedDataset {
        accounts: dataset
            .accounts
            .iter()
            .map(|a| PrunedAccount {
                name: a.name.clone(),
                account_type: a.account_type,
            })
            .collect(),
        transactions: prune_transactions(&dataset.transactions),
        categories: dataset.categories.clone(),
    }
}

fn build_chat_prompt(question: &str, snapshot: &ChatSnapshot) -> crate::Result<String> {
    let pruned = PrunedSnapshot {
        currency: snapshot.currency.clone(),
        personal: prune_dataset(&snapshot.personal),
        home: prune_dataset(&snapshot.home),
    };
    let context = serde_json::to_string(&pruned)?;

    Ok(format!(
        "Financial snapshot (JSON):\n{}\n\nQuestion: {}",
        context, question
    ))
}

/// Answer a question against the (pruned) snapshot.
///
/// Errors only on prompt serialization; model failures are absorbed into
/// the fallback reply so the chat never shows an error banner.
pub async fn answer_question(
    model: &dyn TextModel,
    question: &str,
    snapshot: &ChatSnapshot,
) -> crate::Result<ChatReply> {
    let prompt = build_chat_prompt(question, snapshot)?;

    match model.generate_text(&prompt, CHAT_SYSTEM_PROMPT).await {
        Ok(answer) => Ok(ChatReply {
            answer,
            source: "model".to_string(),
        }),
        Err(e) => {
            warn!("Chat model call failed, returning fallback: {}", e);
            Ok(ChatReply {
                answer: CHAT_FALLBACK_MESSAGE.to_string(),
                source: "fallback".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, AccountType};
    use chrono::{Duration, Utc};

    fn snapshot_with_transactions(count: usize) -> ChatSnapshot {
        let base = Utc::now() - Duration::days(90);
        let transactions = (0..count)
            .map(|i| Transaction {
                id: format!("t{}", i),
                account_id: "a1".to_string(),
                amount: i as f64,
                date: base + Duration::hours(i as i64),
                category_id: None,
                is_transfer: false,
                classification: Some("expense".to_string()),
            })
            .collect();

        ChatSnapshot {
            currency: "EUR".to_string(),
            personal: DatasetSnapshot {
                accounts: vec![Account {
                    id: "a1".to_string(),
                    name: "Checking".to_string(),
                    account_type: AccountType::Bank,
                    credit_limit: None,
                    archived: false,
                }],
                transactions,
                categories: vec![],
            },
            home: DatasetSnapshot::default(),
        }
    }

    #[test]
    fn snapshot_keeps_only_last_fifty_transactions() {
        let snapshot = snapshot_with_transactions(80);
        let pruned = prune_dataset(&snapshot.personal);

        assert_eq!(pruned.transactions.len(), MAX_SNAPSHOT_TRANSACTIONS);
        // Most recent survive, in original order.
        assert_eq!(pruned.transactions[0].amount, 30.0);
        assert_eq!(pruned.transactions[49].amount, 79.0);
    }

    #[test]
    fn pruned_transactions_drop_internal_fields() {
        let snapshot = snapshot_with_transactions(1);
        let pruned = prune_dataset(&snapshot.personal);
        let json = serde_json::to_value(&pruned).unwrap();

        let tx = &json["transactions"][0];
        assert!(tx.get("amount").is_some());
        assert!(tx.get("id").is_none());
        assert!(tx.get("accountId").is_none());
        assert!(tx.get("classification").is_none());
    }

    #[test]
    fn prompt_embeds_currency_and_question() {
        let snapshot = snapshot_with_transactions(2);
        let prompt = build_chat_prompt("How much did I spend on food?", &snapshot).unwrap();

        assert!(prompt.contains("\"currency\":\"EUR\""));
        assert!(prompt.contains("Question: How much did I spend on food?"));
    }

    struct FailingModel;

    #[async_trait::async_trait]
    impl TextModel for FailingModel {
        async fn generate_text(
            &self,
            _prompt: &str,
            _system_instruction: &str,
        ) -> crate::Result<String> {
            Err(crate::error::InsightError::ModelError(
                "connection refused".to_string(),
            ))
        }

        async fn generate_structured(
            &self,
            _prompt: &str,
            _system_instruction: &str,
            _schema: serde_json::Value,
        ) -> crate::Result<serde_json::Value> {
            Err(crate::error::InsightError::ModelError(
                "connection refused".to_string(),
            ))
        }
    }

    struct EchoModel;

    #[async_trait::async_trait]
    impl TextModel for EchoModel {
        async fn generate_text(
            &self,
            prompt: &str,
            _system_instruction: &str,
        ) -> crate::Result<String> {
            Ok(format!("echo: {} chars", prompt.len()))
        }

        async fn generate_structured(
            &self,
            _prompt: &str,
            _system_instruction: &str,
            _schema: serde_json::Value,
        ) -> crate::Result<serde_json::Value> {
            unimplemented!()
        }
    }

    #[tokio::test]
    async fn transport_failure_yields_canned_fallback() {
        let snapshot = snapshot_with_transactions(3);
        let reply = answer_question(&FailingModel, "Am I saving enough?", &snapshot)
            .await
            .unwrap();

        assert_eq!(reply.answer, CHAT_FALLBACK_MESSAGE);
        assert_eq!(reply.source, "fallback");
    }

    #[tokio::test]
    async fn model_answer_returned_verbatim() {
        let snapshot = snapshot_with_transactions(3);
        let reply = answer_question(&EchoModel, "hi", &snapshot).await.unwrap();

        assert!(reply.answer.starts_with("echo: "));
        assert_eq!(reply.source, "model");
    }
}
