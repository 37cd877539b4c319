//! Category evolution analyzer
//!
//! Extracts a category's full monthly series with summary statistics,
//! and classifies its first-to-last trend.

use finboard_config::StdDevMode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::table::LedgerTable;
use crate::types::{Favorability, RowKind, Trend};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionStats {
    pub min: Decimal,
    pub max: Decimal,
    pub mean: Decimal,
    pub median: Decimal,
    pub std_dev: Decimal,
    pub sum: Decimal,
}

impl EvolutionStats {
    pub fn of(values: &[Decimal], mode: StdDevMode) -> Self {
        let std_dev = match mode {
            StdDevMode::Sample => finboard_utils::sample_std_dev(values),
            StdDevMode::Population => finboard_utils::population_std_dev(values),
        };
        Self {
            min: finboard_utils::min(values),
            max: finboard_utils::max(values),
            mean: finboard_utils::mean(values),
            median: finboard_utils::median(values),
            std_dev,
            sum: finboard_utils::sum(values),
        }
    }
}

/// One category over every ledger month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryEvolution {
    pub category: String,
    pub kind: RowKind,
    pub months: Vec<String>,
    /// Aligned with `months`
    pub values: Vec<Decimal>,
    pub stats: EvolutionStats,
}

impl CategoryEvolution {
    pub fn compute(table: &LedgerTable, category: &str, mode: StdDevMode) -> CoreResult<Self> {
        let row = table.row(category)?;
        let values = row.amounts().to_vec();
        let stats = EvolutionStats::of(&values, mode);

        Ok(Self {
            category: row.category.clone(),
            kind: row.kind,
            months: table.months().to_vec(),
            values,
            stats,
        })
    }
}

/// First-to-last movement of a series, judged for its kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    pub trend: Trend,
    pub favorability: Favorability,
    pub first: Decimal,
    pub last: Decimal,
    pub change: Decimal,
    /// change / |first| * 100, or 0 when first is 0
    pub change_percentage: Decimal,
}

/// Compare the last value with the first
pub fn classify_trend(evolution: &CategoryEvolution) -> TrendSummary {
    let first = evolution.values.first().copied().unwrap_or(Decimal::ZERO);
    let last = evolution.values.last().copied().unwrap_or(Decimal::ZERO);

    let trend = match last.cmp(&first) {
        std::cmp::Ordering::Greater => Trend::Rising,
        std::cmp::Ordering::Less => Trend::Falling,
        std::cmp::Ordering::Equal => Trend::Flat,
    };
    let change = last.checked_sub(first).unwrap_or(Decimal::ZERO);

    TrendSummary {
        trend,
        favorability: Favorability::of(evolution.kind, trend),
        first,
        last,
        change,
        change_percentage: finboard_utils::percentage(change, first.abs()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::table::LedgerRow;

    fn d(v: i64) -> Decimal {
        Decimal::from(v)
    }

    fn table() -> LedgerTable {
        LedgerTable::new(
            vec!["2024-01".to_string(), "2024-02".to_string(), "2024-03".to_string()],
            vec![
                LedgerRow::new("Salaire", RowKind::Income, vec![d(2800), d(2850), d(2900)]),
                LedgerRow::new("Loyer", RowKind::Expense, vec![d(950), d(950), d(950)]),
                LedgerRow::new("Nourriture", RowKind::Expense, vec![d(500), d(420), d(400)]),
                LedgerRow::new("Livret A", RowKind::Saving, vec![d(300), d(250), d(200)]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_constant_series() {
        let evo = CategoryEvolution::compute(&table(), "Loyer", StdDevMode::Sample).unwrap();
        assert_eq!(evo.kind, RowKind::Expense);
        assert_eq!(evo.months.len(), 3);
        assert_eq!(evo.values, vec![d(950), d(950), d(950)]);
        assert_eq!(evo.stats.min, d(950));
        assert_eq!(evo.stats.max, d(950));
        assert_eq!(evo.stats.mean, d(950));
        assert_eq!(evo.stats.median, d(950));
        assert_eq!(evo.stats.std_dev, Decimal::ZERO);
        assert_eq!(evo.stats.sum, d(2850));

        let trend = classify_trend(&evo);
        assert_eq!(trend.trend, Trend::Flat);
        assert_eq!(trend.favorability, Favorability::Neutral);
        assert_eq!(trend.change, Decimal::ZERO);
    }

    #[test]
    fn test_falling_expense_is_favorable() {
        let evo = CategoryEvolution::compute(&table(), "Nourriture", StdDevMode::Population).unwrap();
        let trend = classify_trend(&evo);
        assert_eq!(trend.trend, Trend::Falling);
        assert_eq!(trend.favorability, Favorability::Favorable);
        assert_eq!(trend.change, d(-100));
        assert_eq!(trend.change_percentage, d(-20));
        assert_eq!(evo.stats.median, d(420));
    }

    #[test]
    fn test_rising_income_is_favorable() {
        let evo = CategoryEvolution::compute(&table(), "Salaire", StdDevMode::Sample).unwrap();
        let trend = classify_trend(&evo);
        assert_eq!(trend.trend, Trend::Rising);
        assert_eq!(trend.favorability, Favorability::Favorable);
        // sample std-dev of 2800, 2850, 2900 is exactly 50
        assert!((evo.stats.std_dev - d(50)).abs() < Decimal::new(1, 10));
    }

    #[test]
    fn test_falling_saving_is_unfavorable() {
        let evo = CategoryEvolution::compute(&table(), "Livret A", StdDevMode::Sample).unwrap();
        assert_eq!(classify_trend(&evo).favorability, Favorability::Unfavorable);
    }

    #[test]
    fn test_large_net_worth_swing() {
        let table = LedgerTable::new(
            vec!["2024-01".to_string(), "2024-02".to_string()],
            vec![LedgerRow::new(
                "Holding",
                RowKind::NetWorth,
                vec![Decimal::ZERO, Decimal::from(1_000_000_000_000_000i64)],
            )],
        )
        .unwrap();
        let evo = CategoryEvolution::compute(&table, "Holding", StdDevMode::Population).unwrap();
        assert_eq!(evo.stats.mean, Decimal::from(500_000_000_000_000i64));
        assert!((evo.stats.std_dev - Decimal::from(500_000_000_000_000i64)).abs() < Decimal::ONE);
        assert_eq!(classify_trend(&evo).trend, Trend::Rising);
    }

    #[test]
    fn test_unknown_category() {
        let result = CategoryEvolution::compute(&table(), "Vacances", StdDevMode::Sample);
        assert!(matches!(result, Err(CoreError::CategoryNotFound { name }) if name == "Vacances"));
    }

    #[test]
    fn test_zero_month_series_is_flat() {
        let table = LedgerTable::new(
            vec![],
            vec![LedgerRow::new("Loyer", RowKind::Expense, vec![])],
        )
        .unwrap();
        let evo = CategoryEvolution::compute(&table, "Loyer", StdDevMode::Sample).unwrap();
        assert!(evo.values.is_empty());
        assert_eq!(evo.stats.sum, Decimal::ZERO);
        let trend = classify_trend(&evo);
        assert_eq!(trend.trend, Trend::Flat);
        assert_eq!(trend.change_percentage, Decimal::ZERO);
    }
}
