//! Spend summaries and transaction categorisation.

use super::models::Transaction;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpendCategory {
    Groceries,
    Dining,
    CashWithdrawal,
    MoneyTransfer,
    Other,
}

impl SpendCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpendCategory::Groceries => "groceries",
            SpendCategory::Dining => "dining",
            SpendCategory::CashWithdrawal => "cash_withdrawal",
            SpendCategory::MoneyTransfer => "money_transfer",
            SpendCategory::Other => "other",
        }
    }

    pub fn from_mcc(mcc: &str) -> Self {
        match mcc {
            "5411" => SpendCategory::Groceries,
            "5812" => SpendCategory::Dining,
            "6011" => SpendCategory::CashWithdrawal,
            "4829" => SpendCategory::MoneyTransfer,
            _ => SpendCategory::Other,
        }
    }
}

/// Category by MCC, overridden by merchant keywords
pub fn categorize(transaction: &Transaction) -> SpendCategory {
    let merchant = transaction.merchant.to_lowercase();
    if merchant.contains("atm") {
        SpendCategory::CashWithdrawal
    } else if merchant.contains("restaurant") || merchant.contains("cafe") {
        SpendCategory::Dining
    } else {
        SpendCategory::from_mcc(&transaction.mcc)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendSummary {
    pub count: usize,
    /// Sum of absolute amounts
    pub total: f64,
    pub average: f64,
}

pub fn summarize(transactions: &[Transaction]) -> SpendSummary {
    let total: f64 = transactions.iter().map(|t| t.amount.abs()).sum();
    let count = transactions.len();
    SpendSummary {
        count,
        total,
        average: if count == 0 { 0.0 } else { total / count as f64 },
    }
}
