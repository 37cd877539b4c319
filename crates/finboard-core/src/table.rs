//! In-memory ledger table (categories x months)
//!
//! Rows live in an arena; category, kind and month lookups are indexed
//! once at construction so per-month and per-category queries never
//! scan the whole table.

pub use finboard_parser::is_month_key;
use finboard_parser::ParsedLedger;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::{CoreError, CoreResult};
use crate::types::RowKind;

/// One ledger row: a category and its amount for every month column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub category: String,
    pub kind: RowKind,
    amounts: Vec<Decimal>,
}

impl LedgerRow {
    pub fn new(category: impl Into<String>, kind: RowKind, amounts: Vec<Decimal>) -> Self {
        Self {
            category: category.into(),
            kind,
            amounts,
        }
    }

    /// Amounts aligned with `LedgerTable::months`
    pub fn amounts(&self) -> &[Decimal] {
        &self.amounts
    }
}

/// Immutable ledger snapshot
#[derive(Debug, Clone, Default)]
pub struct LedgerTable {
    months: Vec<String>,
    month_index: HashMap<String, usize>,
    rows: Vec<LedgerRow>,
    by_category: HashMap<String, usize>,
    by_kind: HashMap<RowKind, Vec<usize>>,
}

impl LedgerTable {
    /// Build a table, sorting month columns chronologically
    ///
    /// Rejects malformed or duplicate month keys, duplicate category names
    /// and rows whose amount count differs from the month count.
    pub fn new(months: Vec<String>, rows: Vec<LedgerRow>) -> CoreResult<Self> {
        let mut seen = HashSet::new();
        for month in &months {
            if !is_month_key(month) {
                return Err(CoreError::InvalidFormat {
                    message: format!("'{}' is not a YYYY-MM month", month),
                });
            }
            if !seen.insert(month.as_str()) {
                return Err(CoreError::InvalidFormat {
                    message: format!("duplicate month '{}'", month),
                });
            }
        }

        let mut order: Vec<usize> = (0..months.len()).collect();
        order.sort_by(|a, b| months[*a].cmp(&months[*b]));
        let sorted_months: Vec<String> = order.iter().map(|i| months[*i].clone()).collect();

        let mut by_category = HashMap::with_capacity(rows.len());
        let mut by_kind: HashMap<RowKind, Vec<usize>> = HashMap::new();
        let mut arena = Vec::with_capacity(rows.len());

        for (idx, row) in rows.into_iter().enumerate() {
            if row.amounts.len() != months.len() {
                return Err(CoreError::InvalidFormat {
                    message: format!(
                        "row '{}' has {} amounts for {} months",
                        row.category,
                        row.amounts.len(),
                        months.len()
                    ),
                });
            }
            if by_category.insert(row.category.clone(), idx).is_some() {
                return Err(CoreError::DuplicateCategory { name: row.category });
            }
            by_kind.entry(row.kind).or_default().push(idx);

            let amounts = order.iter().map(|i| row.amounts[*i]).collect();
            arena.push(LedgerRow { amounts, ..row });
        }

        let month_index = sorted_months
            .iter()
            .enumerate()
            .map(|(i, m)| (m.clone(), i))
            .collect();

        Ok(Self {
            months: sorted_months,
            month_index,
            rows: arena,
            by_category,
            by_kind,
        })
    }

    /// Build a table from a parsed ledger file
    pub fn from_parsed(parsed: ParsedLedger) -> CoreResult<Self> {
        let rows = parsed
            .rows
            .into_iter()
            .map(|r| LedgerRow::new(r.category, r.entry_type.into(), r.amounts))
            .collect();
        Self::new(parsed.months, rows)
    }

    /// Month keys in chronological order
    pub fn months(&self) -> &[String] {
        &self.months
    }

    pub fn month_count(&self) -> usize {
        self.months.len()
    }

    /// Most recent month, the default selection
    pub fn latest_month(&self) -> Option<&str> {
        self.months.last().map(|m| m.as_str())
    }

    /// Column index of a month
    pub fn month_position(&self, month: &str) -> CoreResult<usize> {
        self.month_index
            .get(month)
            .copied()
            .ok_or_else(|| CoreError::InvalidMonth { month: month.to_string() })
    }

    /// All rows in ledger order
    pub fn rows(&self) -> &[LedgerRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row lookup by exact category name
    pub fn row(&self, category: &str) -> CoreResult<&LedgerRow> {
        self.by_category
            .get(category)
            .map(|idx| &self.rows[*idx])
            .ok_or_else(|| CoreError::CategoryNotFound { name: category.to_string() })
    }

    /// Amount of one category in one month
    pub fn amount(&self, category: &str, month: &str) -> CoreResult<Decimal> {
        let col = self.month_position(month)?;
        Ok(self.row(category)?.amounts[col])
    }

    /// Rows of one kind, in ledger order
    pub fn rows_of_kind(&self, kind: RowKind) -> impl Iterator<Item = &LedgerRow> + '_ {
        self.by_kind
            .get(&kind)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(move |idx| &self.rows[*idx])
    }

    pub fn count_of_kind(&self, kind: RowKind) -> usize {
        self.by_kind.get(&kind).map(|v| v.len()).unwrap_or(0)
    }

    /// Sum of every amount of one kind across all months
    pub fn kind_total(&self, kind: RowKind) -> Decimal {
        self.rows_of_kind(kind)
            .flat_map(|row| row.amounts.iter().copied())
            .sum()
    }

    /// Sum of one kind for each month, aligned with `months`
    pub fn kind_totals_by_month(&self, kind: RowKind) -> Vec<Decimal> {
        let mut totals = vec![Decimal::ZERO; self.months.len()];
        for row in self.rows_of_kind(kind) {
            for (total, amount) in totals.iter_mut().zip(row.amounts.iter()) {
                *total += *amount;
            }
        }
        totals
    }

    /// Point-in-time valuation of the net worth rows for a month
    pub fn net_worth(&self, month: &str) -> CoreResult<NetWorthSnapshot> {
        let col = self.month_position(month)?;
        let rows: Vec<(String, Decimal)> = self
            .rows_of_kind(RowKind::NetWorth)
            .map(|r| (r.category.clone(), r.amounts[col]))
            .collect();
        let total = rows.iter().map(|(_, amount)| *amount).sum();

        Ok(NetWorthSnapshot {
            month: month.to_string(),
            rows,
            total,
        })
    }
}

/// Net worth rows valued at one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetWorthSnapshot {
    pub month: String,
    pub rows: Vec<(String, Decimal)>,
    pub total: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amounts(values: &[i64]) -> Vec<Decimal> {
        values.iter().map(|v| Decimal::from(*v)).collect()
    }

    fn sample_table() -> LedgerTable {
        LedgerTable::new(
            vec!["2024-02".to_string(), "2024-01".to_string()],
            vec![
                LedgerRow::new("Salary", RowKind::Income, amounts(&[3000, 2800])),
                LedgerRow::new("Rent", RowKind::Expense, amounts(&[950, 950])),
                LedgerRow::new("Food", RowKind::Expense, amounts(&[400, 450])),
                LedgerRow::new("Home", RowKind::NetWorth, amounts(&[181000, 180000])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_months_sorted_with_amounts() {
        let table = sample_table();
        assert_eq!(table.months(), &["2024-01".to_string(), "2024-02".to_string()]);
        assert_eq!(table.row("Salary").unwrap().amounts(), &amounts(&[2800, 3000])[..]);
        assert_eq!(table.latest_month(), Some("2024-02"));
    }

    #[test]
    fn test_rows_of_kind_keeps_ledger_order() {
        let table = sample_table();
        let names: Vec<&str> = table
            .rows_of_kind(RowKind::Expense)
            .map(|r| r.category.as_str())
            .collect();
        assert_eq!(names, vec!["Rent", "Food"]);
        assert_eq!(table.rows_of_kind(RowKind::Saving).count(), 0);
        assert_eq!(table.count_of_kind(RowKind::Expense), 2);
    }

    #[test]
    fn test_kind_totals() {
        let table = sample_table();
        assert_eq!(table.kind_total(RowKind::Expense), Decimal::from(2750));
        assert_eq!(table.kind_totals_by_month(RowKind::Expense), amounts(&[1400, 1350]));
        assert_eq!(table.kind_totals_by_month(RowKind::Saving), amounts(&[0, 0]));
    }

    #[test]
    fn test_unknown_lookups() {
        let table = sample_table();
        assert!(matches!(table.month_position("2023-12"), Err(CoreError::InvalidMonth { .. })));
        assert!(matches!(table.row("Loyer"), Err(CoreError::CategoryNotFound { .. })));
    }

    #[test]
    fn test_amount_lookup() {
        let table = sample_table();
        assert_eq!(table.amount("Food", "2024-01").unwrap(), Decimal::from(450));
        assert!(matches!(table.amount("Food", "2023-01"), Err(CoreError::InvalidMonth { .. })));
        assert!(matches!(table.amount("Gym", "2024-01"), Err(CoreError::CategoryNotFound { .. })));
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let result = LedgerTable::new(
            vec!["2024-01".to_string()],
            vec![
                LedgerRow::new("Rent", RowKind::Expense, amounts(&[950])),
                LedgerRow::new("Rent", RowKind::Expense, amounts(&[900])),
            ],
        );
        assert!(matches!(result, Err(CoreError::DuplicateCategory { .. })));
    }

    #[test]
    fn test_misaligned_row_rejected() {
        let result = LedgerTable::new(
            vec!["2024-01".to_string(), "2024-02".to_string()],
            vec![LedgerRow::new("Rent", RowKind::Expense, amounts(&[950]))],
        );
        assert!(matches!(result, Err(CoreError::InvalidFormat { .. })));
    }

    #[test]
    fn test_bad_months_rejected() {
        let bad = LedgerTable::new(vec!["2024-1".to_string()], vec![]);
        assert!(matches!(bad, Err(CoreError::InvalidFormat { .. })));
        let dup = LedgerTable::new(vec!["2024-01".to_string(), "2024-01".to_string()], vec![]);
        assert!(matches!(dup, Err(CoreError::InvalidFormat { .. })));
    }

    #[test]
    fn test_net_worth_snapshot() {
        let table = sample_table();
        let snapshot = table.net_worth("2024-01").unwrap();
        assert_eq!(snapshot.total, Decimal::from(180000));
        assert_eq!(snapshot.rows.len(), 1);
    }

    #[test]
    fn test_empty_table() {
        let table = LedgerTable::new(vec![], vec![]).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.latest_month(), None);
        assert_eq!(table.kind_total(RowKind::Saving), Decimal::ZERO);
    }

    #[test]
    fn test_is_month_key() {
        assert!(is_month_key("2024-12"));
        assert!(!is_month_key("2024-13"));
        assert!(!is_month_key("2024-1"));
        assert!(!is_month_key("24-01-01"));
    }

    #[test]
    fn test_table_accepts_exactly_the_month_keys() {
        for key in ["2024-01", "2024-12", "2024-00", "2024-13", "2024-1", "2024-01-01", "٢٠٢٤-01"] {
            let built = LedgerTable::new(vec![key.to_string()], vec![]);
            assert_eq!(built.is_ok(), is_month_key(key), "{}", key);
        }
    }
}
