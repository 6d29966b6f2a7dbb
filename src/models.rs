//! Core data models for the finance insight engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//
// ================= Ledger Inputs =================
//

/// Account classification as it arrives from the data-entry layer.
///
/// The wire names match the dashboard's stored values, including the
/// space in "Credit Card". Anything else deserializes to `Unknown` and
/// contributes to neither assets nor liabilities.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AccountType {
    Bank,
    Investment,
    Cash,
    #[serde(rename = "Credit Card")]
    CreditCard,
    Loan,
    #[serde(other)]
    Unknown,
}

impl AccountType {
    pub fn is_asset(self) -> bool {
        matches!(self, AccountType::Bank | AccountType::Investment | AccountType::Cash)
    }

    pub fn is_liability(self) -> bool {
        matches!(self, AccountType::CreditCard | AccountType::Loan)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    #[serde(default)]
    pub credit_limit: Option<f64>,
    #[serde(default)]
    pub archived: bool,
}

/// Immutable transaction record. Positive amount = inflow, negative = outflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub account_id: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub is_transfer: bool,
    /// Auxiliary tag from upstream data entry; not used by the summarizer.
    #[serde(default)]
    pub classification: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

//
// ================= Summary =================
//

/// Per-account chart entry (asset/liability breakdowns).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSlice {
    pub name: String,
    pub value: f64,
}

/// Per-category chart entry with a stable display color assigned by
/// first-seen insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySlice {
    pub name: String,
    pub value: f64,
    pub color: String,
}

/// Derived, ephemeral summary of a ledger at an evaluation instant.
///
/// `liabilities` and `expenses` are reported as non-negative magnitudes;
/// `net_worth` is assets plus the signed sum of liability balances.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub assets: f64,
    pub liabilities: f64,
    pub net_worth: f64,
    pub income: f64,
    pub expenses: f64,
    pub cashflow: f64,
    pub asset_data: Vec<AccountSlice>,
    pub liability_data: Vec<AccountSlice>,
    pub income_data: Vec<CategorySlice>,
    pub expense_data: Vec<CategorySlice>,
}

//
// ================= AI Payloads =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseBreakdownEntry {
    pub category: String,
    pub amount: f64,
}

/// Payload sent to the model for financial analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialData {
    pub assets: f64,
    pub liabilities: f64,
    pub net_worth: f64,
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub monthly_cashflow: f64,
    pub expense_breakdown: Vec<ExpenseBreakdownEntry>,
}

impl From<&Summary> for FinancialData {
    fn from(summary: &Summary) -> Self {
        Self {
            assets: summary.assets,
            liabilities: summary.liabilities,
            net_worth: summary.net_worth,
            monthly_income: summary.income,
            monthly_expenses: summary.expenses,
            monthly_cashflow: summary.cashflow,
            expense_breakdown: summary
                .expense_data
                .iter()
                .map(|slice| ExpenseBreakdownEntry {
                    category: slice.name.clone(),
                    amount: slice.value,
                })
                .collect(),
        }
    }
}

/// Structured analysis returned by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialAnalysis {
    pub overview: String,
    #[serde(default)]
    pub key_observations: Vec<String>,
    #[serde(default)]
    pub actionable_advice: Vec<String>,
    #[serde(default)]
    pub disclaimer: String,
}

//
// ================= Chat Snapshot =================
//

/// One dataset (personal or home) as the dashboard holds it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSnapshot {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// Full snapshot embedded (pruned) into chat prompts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSnapshot {
    pub currency: String,
    #[serde(default)]
    pub personal: DatasetSnapshot,
    #[serde(default)]
    pub home: DatasetSnapshot,
}
