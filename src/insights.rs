//! AI financial analysis cycle
//!
//! Shapes a `Summary` into the `FinancialData` payload, requests a
//! structured analysis from the model, and normalizes the response
//! (missing disclaimer gets a fixed default). No retries: a failed call
//! surfaces one error and leaves the computed summary untouched.

use serde_json::json;
use tracing::info;

use crate::error::InsightError;
use crate::gemini::TextModel;
use crate::models::{FinancialAnalysis, FinancialData, Summary};

/// Substituted when the model omits (or blanks) the disclaimer field.
pub const DEFAULT_DISCLAIMER: &str =
    "This analysis is for informational purposes only and is not financial advice. \
     Consult a qualified professional before making financial decisions.";

const ANALYSIS_SYSTEM_PROMPT: &str = "\
You are a professional personal-finance analyst.

Guidelines:
- Base every statement strictly on the figures provided
- Be structured and concise
- Point out concrete patterns in income, spending and net worth
- Emphasize risk awareness; never promise returns
- Use plain, non-judgmental language";

/// Fixed structured-output schema for the analysis response.
/// Disclaimer is intentionally not required; a default is substituted.
fn analysis_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "overview": { "type": "STRING" },
            "keyObservations": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            },
            "actionableAdvice": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            },
            "disclaimer": { "type": "STRING" }
        },
        "required": ["overview", "keyObservations", "actionableAdvice"]
    })
}

fn build_analysis_prompt(data: &FinancialData) -> crate::Result<String> {
    let payload = serde_json::to_string_pretty(data)?;

    Ok(format!(
        r#"Analyze this personal financial snapshot and respond with the requested JSON.

Financial data (all amounts in the user's home currency):
{}

Produce:
- overview: 2-3 sentence summary of the overall financial position
- keyObservations: the most notable patterns in these numbers
- actionableAdvice: specific, realistic next steps for this situation
- disclaimer: one sentence noting this is not professional financial advice
"#,
        payload
    ))
}

/// Run the full analysis cycle for an already-computed summary.
pub async fn generate_insights(
    model: &dyn TextModel,
    summary: &Summary,
) -> crate::Result<FinancialAnalysis> {
    let data = FinancialData::from(summary);
    let prompt = build_analysis_prompt(&data)?;

    let value = model
        .generate_structured(&prompt, ANALYSIS_SYSTEM_PROMPT, analysis_schema())
        .await?;

    let mut analysis: FinancialAnalysis = serde_json::from_value(value).map_err(|e| {
        InsightError::MalformedResponse(format!("Analysis response did not match schema: {}", e))
    })?;

    if analysis.disclaimer.trim().is_empty() {
        analysis.disclaimer = DEFAULT_DISCLAIMER.to_string();
    }

    info!(
        observations = analysis.key_observations.len(),
        advice = analysis.actionable_advice.len(),
        "Financial analysis generated"
    );

    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountSlice, CategorySlice};
    use serde_json::json;
    use std::sync::Mutex;

    fn sample_summary() -> Summary {
        Summary {
            assets: 800.0,
            liabilities: 500.0,
            net_worth: 300.0,
            income: 1000.0,
            expenses: 200.0,
            cashflow: 800.0,
            asset_data: vec![AccountSlice {
                name: "Checking".to_string(),
                value: 800.0,
            }],
            liability_data: vec![],
            income_data: vec![],
            expense_data: vec![CategorySlice {
                name: "Food".to_string(),
                value: 200.0,
                color: "#0088FE".to_string(),
            }],
        }
    }

    /// Scripted model: returns a fixed value or error, records prompts.
    struct ScriptedModel {
        reply: std::result::Result<serde_json::Value, String>,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl TextModel for ScriptedModel {
        async fn generate_text(
            &self,
            _prompt: &str,
            _system_instruction: &str,
        ) -> crate::Result<String> {
            unimplemented!("analysis uses structured output only")
        }

        async fn generate_structured(
            &self,
            prompt: &str,
            _system_instruction: &str,
            _schema: serde_json::Value,
        ) -> crate::Result<serde_json::Value> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply
                .clone()
                .map_err(crate::error::InsightError::ModelError)
        }
    }

    #[tokio::test]
    async fn parses_full_analysis() {
        let model = ScriptedModel {
            reply: Ok(json!({
                "overview": "Healthy month.",
                "keyObservations": ["Income exceeds spending"],
                "actionableAdvice": ["Keep building the emergency fund"],
                "disclaimer": "Not financial advice."
            })),
            prompts: Mutex::new(vec![]),
        };

        let analysis = generate_insights(&model, &sample_summary()).await.unwrap();

        assert_eq!(analysis.overview, "Healthy month.");
        assert_eq!(analysis.key_observations.len(), 1);
        assert_eq!(analysis.disclaimer, "Not financial advice.");
    }

    #[tokio::test]
    async fn missing_disclaimer_gets_default() {
        let model = ScriptedModel {
            reply: Ok(json!({
                "overview": "Fine.",
                "keyObservations": [],
                "actionableAdvice": []
            })),
            prompts: Mutex::new(vec![]),
        };

        let analysis = generate_insights(&model, &sample_summary()).await.unwrap();

        assert_eq!(analysis.disclaimer, DEFAULT_DISCLAIMER);
    }

    #[tokio::test]
    async fn prompt_embeds_camel_case_payload() {
        let model = ScriptedModel {
            reply: Ok(json!({
                "overview": "ok",
                "keyObservations": [],
                "actionableAdvice": []
            })),
            prompts: Mutex::new(vec![]),
        };

        generate_insights(&model, &sample_summary()).await.unwrap();

        let prompts = model.prompts.lock().unwrap();
        assert!(prompts[0].contains("\"netWorth\": 300.0"));
        assert!(prompts[0].contains("\"monthlyCashflow\": 800.0"));
        assert!(prompts[0].contains("\"category\": \"Food\""));
    }

    #[tokio::test]
    async fn model_failure_propagates() {
        let model = ScriptedModel {
            reply: Err("503 from upstream".to_string()),
            prompts: Mutex::new(vec![]),
        };

        let result = generate_insights(&model, &sample_summary()).await;

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("503"));
    }

    #[tokio::test]
    async fn schema_mismatch_is_malformed_response() {
        let model = ScriptedModel {
            reply: Ok(json!({ "keyObservations": "not an array" })),
            prompts: Mutex::new(vec![]),
        };

        let result = generate_insights(&model, &sample_summary()).await;

        assert!(matches!(
            result,
            Err(crate::error::InsightError::MalformedResponse(_))
        ));
    }

    #[test]
    fn expense_breakdown_maps_from_summary() {
        let data = FinancialData::from(&sample_summary());
        assert_eq!(data.assets, 800.0);
        assert_eq!(data.monthly_income, 1000.0);
        assert_eq!(data.expense_breakdown.len(), 1);
        assert_eq!(data.expense_breakdown[0].category, "Food");
        assert_eq!(data.expense_breakdown[0].amount, 200.0);
    }
}
