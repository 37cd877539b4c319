//! Common types for the ledger loader

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Row type as written in the spreadsheet's `Type` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryType {
    Income,
    Expense,
    Saving,
    NetWorth,
}

impl std::str::FromStr for EntryType {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "entrée" | "entree" => Ok(EntryType::Income),
            "expense" | "expenses" | "sortie" => Ok(EntryType::Expense),
            "saving" | "savings" | "épargne" | "epargne" => Ok(EntryType::Saving),
            "networth" | "net worth" | "net_worth" | "patrimoine" => Ok(EntryType::NetWorth),
            _ => Err(()),
        }
    }
}

/// One spreadsheet row: a category and its amount per month column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedRow {
    pub category: String,
    pub entry_type: EntryType,
    /// Aligned with `ParsedLedger::months`
    pub amounts: Vec<Decimal>,
    /// 1-based line in the source file
    pub line: usize,
}

/// A whole ledger export, month columns in file order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedLedger {
    pub months: Vec<String>,
    pub rows: Vec<ParsedRow>,
}
