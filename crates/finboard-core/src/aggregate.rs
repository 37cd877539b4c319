//! Month aggregator
//!
//! Partitions one month column by row kind and derives the totals,
//! savings rate and balance. Net worth rows never enter a total.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::table::LedgerTable;
use crate::types::RowKind;

/// A category with its amount for the aggregated month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAmount {
    pub category: String,
    pub amount: Decimal,
}

/// A category's share of its kind's total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount: Decimal,
    pub percentage: Decimal,
}

/// Totals for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthAggregate {
    pub month: String,
    pub income_rows: Vec<CategoryAmount>,
    pub expense_rows: Vec<CategoryAmount>,
    pub saving_rows: Vec<CategoryAmount>,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub total_saving: Decimal,
    /// total_saving / total_income * 100, or 0 without positive income
    pub savings_rate: Decimal,
    /// total_income - total_expense - total_saving
    pub balance: Decimal,
}

impl MonthAggregate {
    /// Aggregate one month of the ledger
    pub fn compute(table: &LedgerTable, month: &str) -> CoreResult<Self> {
        let col = table.month_position(month)?;

        let project = |kind: RowKind| -> Vec<CategoryAmount> {
            table
                .rows_of_kind(kind)
                .map(|row| CategoryAmount {
                    category: row.category.clone(),
                    amount: row.amounts()[col],
                })
                .collect()
        };

        let [income_rows, expense_rows, saving_rows] = RowKind::FLOWS.map(project);

        let aggregate = Self::from_rows(month, income_rows, expense_rows, saving_rows);
        log::debug!(
            "Aggregated {}: income={} expense={} saving={} balance={}",
            month,
            aggregate.total_income,
            aggregate.total_expense,
            aggregate.total_saving,
            aggregate.balance
        );
        Ok(aggregate)
    }

    /// Derive totals, savings rate and balance from already projected rows
    pub fn from_rows(
        month: &str,
        income_rows: Vec<CategoryAmount>,
        expense_rows: Vec<CategoryAmount>,
        saving_rows: Vec<CategoryAmount>,
    ) -> Self {
        let total = |rows: &[CategoryAmount]| rows.iter().map(|r| r.amount).sum::<Decimal>();
        let total_income = total(&income_rows);
        let total_expense = total(&expense_rows);
        let total_saving = total(&saving_rows);

        let savings_rate = if total_income > Decimal::ZERO {
            finboard_utils::percentage(total_saving, total_income)
        } else {
            Decimal::ZERO
        };

        Self {
            month: month.to_string(),
            income_rows,
            expense_rows,
            saving_rows,
            total_income,
            total_expense,
            total_saving,
            savings_rate,
            balance: total_income - total_expense - total_saving,
        }
    }

    /// Projected rows of a kind; empty for net worth
    pub fn rows_of(&self, kind: RowKind) -> &[CategoryAmount] {
        match kind {
            RowKind::Income => &self.income_rows,
            RowKind::Expense => &self.expense_rows,
            RowKind::Saving => &self.saving_rows,
            RowKind::NetWorth => &[],
        }
    }

    pub fn total_of(&self, kind: RowKind) -> Decimal {
        match kind {
            RowKind::Income => self.total_income,
            RowKind::Expense => self.total_expense,
            RowKind::Saving => self.total_saving,
            RowKind::NetWorth => Decimal::ZERO,
        }
    }

    /// Each row's share of its kind's total, in ledger order
    pub fn breakdown(&self, kind: RowKind) -> Vec<CategoryShare> {
        let total = self.total_of(kind);
        self.rows_of(kind)
            .iter()
            .map(|r| CategoryShare {
                category: r.category.clone(),
                amount: r.amount,
                percentage: finboard_utils::percentage(r.amount, total),
            })
            .collect()
    }

    /// Breakdown sorted by amount, largest first
    pub fn ranked(&self, kind: RowKind) -> Vec<CategoryShare> {
        let mut shares = self.breakdown(kind);
        shares.sort_by(|a, b| b.amount.cmp(&a.amount));
        shares
    }
}
