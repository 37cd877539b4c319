//! Report structures for API responses

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::aggregate::{CategoryShare, MonthAggregate};
use crate::evolution::{CategoryEvolution, TrendSummary};
use crate::score::Grade;
use crate::types::RowKind;

/// Shape of the loaded ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub category_count: usize,
    pub month_count: usize,
    pub months: Vec<String>,
    pub first_month: Option<String>,
    pub last_month: Option<String>,
    pub rows_by_kind: BTreeMap<String, usize>,
}

/// A category name with its kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub category: String,
    pub kind: RowKind,
}

/// Categories list response for API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<CategoryInfo>,
    pub total_count: usize,
}

/// Months list response for API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthsResponse {
    pub months: Vec<String>,
    pub default_month: Option<String>,
}

/// Month aggregate with per-kind shares
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthReport {
    #[serde(flatten)]
    pub aggregate: MonthAggregate,
    pub income_shares: Vec<CategoryShare>,
    pub expense_shares: Vec<CategoryShare>,
    pub saving_shares: Vec<CategoryShare>,
}

impl MonthReport {
    pub fn new(aggregate: MonthAggregate) -> Self {
        Self {
            income_shares: aggregate.ranked(RowKind::Income),
            expense_shares: aggregate.ranked(RowKind::Expense),
            saving_shares: aggregate.ranked(RowKind::Saving),
            aggregate,
        }
    }
}

/// Category series with its trend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionResponse {
    pub evolution: CategoryEvolution,
    pub trend: TrendSummary,
}

/// Score report with its grade band
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResponse {
    #[serde(flatten)]
    pub report: crate::score::ScoreReport,
    pub grade: Grade,
}

/// Reload outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub success: bool,
    pub message: String,
    pub summary: Option<LedgerSummary>,
}
