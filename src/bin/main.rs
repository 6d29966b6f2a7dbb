use chrono::{Duration, Utc};
use finance_insight_engine::{
    gemini::GeminiClient,
    insights::generate_insights,
    models::{Account, AccountType, Category, Transaction},
    summarize,
};
use tracing::info;

fn sample_ledger() -> (Vec<Account>, Vec<Transaction>, Vec<Category>) {
    let accounts = vec![
        Account {
            id: "checking".to_string(),
            name: "Checking".to_string(),
            account_type: AccountType::Bank,
            credit_limit: None,
            archived: false,
        },
        Account {
            id: "brokerage".to_string(),
            name: "Brokerage".to_string(),
            account_type: AccountType::Investment,
            credit_limit: None,
            archived: false,
        },
        Account {
            id: "visa".to_string(),
            name: "Visa".to_string(),
            account_type: AccountType::CreditCard,
            credit_limit: Some(3000.0),
            archived: false,
        },
    ];

    let now = Utc::now();
    let transactions = vec![
        Transaction {
            id: "t1".to_string(),
            account_id: "checking".to_string(),
            amount: 3200.0,
            date: now - Duration::hours(2),
            category_id: Some("salary".to_string()),
            is_transfer: false,
            classification: Some("income".to_string()),
        },
        Transaction {
            id: "t2".to_string(),
            account_id: "checking".to_string(),
            amount: -840.5,
            date: now - Duration::hours(1),
            category_id: Some("rent".to_string()),
            is_transfer: false,
            classification: Some("expense".to_string()),
        },
        Transaction {
            id: "t3".to_string(),
            account_id: "visa".to_string(),
            amount: -220.0,
            date: now,
            category_id: Some("groceries".to_string()),
            is_transfer: false,
            classification: Some("expense".to_string()),
        },
        Transaction {
            id: "t4".to_string(),
            account_id: "brokerage".to_string(),
            amount: 500.0,
            date: now,
            category_id: None,
            is_transfer: true,
            classification: None,
        },
    ];

    let categories = vec![
        Category {
            id: "salary".to_string(),
            name: "Salary".to_string(),
        },
        Category {
            id: "rent".to_string(),
            name: "Rent".to_string(),
        },
        Category {
            id: "groceries".to_string(),
            name: "Groceries".to_string(),
        },
    ];

    (accounts, transactions, categories)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    dotenv::dotenv().ok();

    info!("Finance Insight Engine demo starting");

    let (accounts, transactions, categories) = sample_ledger();
    let summary = summarize(&accounts, &transactions, &categories);

    println!("\n=== FINANCIAL SUMMARY ===");
    println!("Assets:      {:.2}", summary.assets);
    println!("Liabilities: {:.2}", summary.liabilities);
    println!("Net worth:   {:.2}", summary.net_worth);
    println!("Income:      {:.2}", summary.income);
    println!("Expenses:    {:.2}", summary.expenses);
    println!("Cashflow:    {:.2}", summary.cashflow);
    println!("\nExpenses by category:");
    for slice in &summary.expense_data {
        println!("  {} {:>10.2}  {}", slice.color, slice.value, slice.name);
    }

    let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
    if api_key.is_empty() {
        println!("\nGEMINI_API_KEY not set; skipping AI analysis.");
        return Ok(());
    }

    let model = GeminiClient::new(api_key);
    match generate_insights(&model, &summary).await {
        Ok(analysis) => {
            println!("\n=== AI ANALYSIS ===");
            println!("{}", analysis.overview);
            println!("\nKey observations:");
            for (i, obs) in analysis.key_observations.iter().enumerate() {
                println!("  {}: {}", i + 1, obs);
            }
            println!("\nActionable advice:");
            for (i, advice) in analysis.actionable_advice.iter().enumerate() {
                println!("  {}: {}", i + 1, advice);
            }
            println!("\n{}", analysis.disclaimer);
            Ok(())
        }
        Err(e) => {
            eprintln!("AI analysis failed: {}", e);
            Err(Box::new(e) as Box<dyn std::error::Error>)
        }
    }
}
