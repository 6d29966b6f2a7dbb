//! Financial summarizer
//!
//! Pure aggregation of a ledger (accounts, transactions, categories) into
//! the figures the dashboard renders: assets, liabilities, net worth,
//! month-to-date income/expenses/cashflow, and chart breakdowns.
//!
//! This module never fails: malformed references degrade to fallback
//! labels or zero contributions, never to errors.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Local, NaiveTime};

use crate::models::{Account, AccountSlice, Category, CategorySlice, Summary, Transaction};

/// Fixed chart palette. Category slices take `PALETTE[index % len]` by
/// first-seen insertion order, so colors are stable for a given ledger.
pub const CHART_PALETTE: &[&str] = &[
    "#0088FE", "#00C49F", "#FFBB28", "#FF8042", "#8884D8", "#82CA9D", "#FF6699", "#A4DE6C",
];

const UNCATEGORIZED: &str = "Uncategorized";

/// Summarize a ledger as of now (local time).
pub fn summarize(
    accounts: &[Account],
    transactions: &[Transaction],
    categories: &[Category],
) -> Summary {
    summarize_at(accounts, transactions, categories, Local::now())
}

/// Summarize a ledger as of an explicit evaluation instant.
///
/// "Current month" means calendar-month-to-date in the timezone of `now`,
/// not a rolling 30-day window.
pub fn summarize_at(
    accounts: &[Account],
    transactions: &[Transaction],
    categories: &[Category],
    now: DateTime<Local>,
) -> Summary {
    // Balance per account = sum of signed amounts of its transactions.
    // No stored running balance is trusted. Transfers count here.
    let mut balances: HashMap<&str, f64> = HashMap::new();
    for tx in transactions {
        *balances.entry(tx.account_id.as_str()).or_insert(0.0) += tx.amount;
    }

    let mut assets = 0.0;
    // Accumulates signed, negative-leaning. The displayed magnitude is the
    // absolute value; net worth uses the signed sum as-is, so unexpected
    // sign conventions are reported, not "fixed".
    let mut liabilities_signed = 0.0;
    let mut asset_data = Vec::new();
    let mut liability_data = Vec::new();

    for account in accounts {
        let balance = balances.get(account.id.as_str()).copied().unwrap_or(0.0);

        if account.account_type.is_asset() {
            assets += balance;
            if balance > 0.0 {
                asset_data.push(AccountSlice {
                    name: account.name.clone(),
                    value: balance,
                });
            }
        } else if account.account_type.is_liability() {
            liabilities_signed += balance;
            if balance.abs() > 0.0 {
                liability_data.push(AccountSlice {
                    name: account.name.clone(),
                    value: balance.abs(),
                });
            }
        }
        // Unknown account types contribute to neither total.
    }

    let net_worth = assets + liabilities_signed;

    // Month-to-date flows, transfers excluded.
    let category_names: HashMap<&str, &str> = categories
        .iter()
        .map(|c| (c.id.as_str(), c.name.as_str()))
        .collect();

    let start_of_month = now
        .date_naive()
        .with_day(1)
        .expect("day 1 is valid for every month")
        .and_time(NaiveTime::MIN);

    let mut income = 0.0;
    let mut expenses = 0.0;
    let mut income_data: Vec<CategorySlice> = Vec::new();
    let mut expense_data: Vec<CategorySlice> = Vec::new();

    for tx in transactions {
        if tx.is_transfer {
            continue;
        }
        // Compare in local wall-clock terms so the month boundary matches
        // what the user sees.
        let local_date = tx.date.with_timezone(&now.timezone()).naive_local();
        if local_date < start_of_month || local_date > now.naive_local() {
            continue;
        }

        let category = tx
            .category_id
            .as_deref()
            .and_then(|id| category_names.get(id).copied())
            .unwrap_or(UNCATEGORIZED);

        if tx.amount > 0.0 {
            income += tx.amount;
            accumulate(&mut income_data, category, tx.amount);
        } else if tx.amount < 0.0 {
            expenses += -tx.amount;
            accumulate(&mut expense_data, category, -tx.amount);
        }
    }

    Summary {
        assets,
        liabilities: liabilities_signed.abs(),
        net_worth,
        income,
        expenses,
        cashflow: income - expenses,
        asset_data,
        liability_data,
        income_data,
        expense_data,
    }
}

/// Add into an ordered per-category map, assigning a palette color on first
/// insertion. Linear scan keeps insertion order without another index.
fn accumulate(slices: &mut Vec<CategorySlice>, name: &str, amount: f64) {
    if let Some(slice) = slices.iter_mut().find(|s| s.name == name) {
        slice.value += amount;
    } else {
        let color = CHART_PALETTE[slices.len() % CHART_PALETTE.len()];
        slices.push(CategorySlice {
            name: name.to_string(),
            value: amount,
            color: color.to_string(),
        });
    }
}
