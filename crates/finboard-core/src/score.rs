//! Financial score engine
//!
//! A fixed 100-point rubric over six categories. The rubric is a static
//! table; each entry names the rule that scores it. Entries with
//! `Rule::Manual` cannot be computed from the ledger and always earn 0.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::aggregate::MonthAggregate;
use crate::classifier::{CategoryClassifier, Tag};
use crate::table::LedgerTable;
use crate::types::RowKind;

/// Maximum score of the rubric
pub const TOTAL_MAX_POINTS: u32 = 100;

/// Savings rate (percent) that earns the full savings criterion
const TARGET_SAVINGS_RATE: i64 = 10;
/// Coverage band, in months of average expense, that earns the full cushion
const COVERAGE_MIN_MONTHS: i64 = 3;
const COVERAGE_MAX_MONTHS: i64 = 6;
/// Points for a cushion above the band
const TOO_LIQUID_POINTS: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
    Budget,
    Cushion,
    Equities,
    RealEstate,
    Crypto,
    Habits,
}

impl ScoreCategory {
    pub const ALL: [ScoreCategory; 6] = [
        ScoreCategory::Budget,
        ScoreCategory::Cushion,
        ScoreCategory::Equities,
        ScoreCategory::RealEstate,
        ScoreCategory::Crypto,
        ScoreCategory::Habits,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreCategory::Budget => "budget",
            ScoreCategory::Cushion => "cushion",
            ScoreCategory::Equities => "equities",
            ScoreCategory::RealEstate => "real_estate",
            ScoreCategory::Crypto => "crypto",
            ScoreCategory::Habits => "habits",
        }
    }
}

impl std::fmt::Display for ScoreCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a rubric entry is scored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Income strictly above expense (savings not counted as expense)
    IncomeExceedsExpense,
    /// Savings rate of at least 10%, partial below
    MinimumSavingsRate,
    /// Accumulated savings cover 3 to 6 months of average expense
    ExpenseCoverage,
    /// Any saving row is a brokerage account
    HasBrokerage,
    HasTaxAdvantagedAccount,
    HasStandardBrokerage,
    /// Not derivable from the ledger
    Manual,
}

/// One rubric entry
#[derive(Debug, Clone, Copy)]
pub struct RubricEntry {
    pub category: ScoreCategory,
    pub name: &'static str,
    pub max_points: u32,
    pub rule: Rule,
}

const fn entry(category: ScoreCategory, name: &'static str, max_points: u32, rule: Rule) -> RubricEntry {
    RubricEntry { category, name, max_points, rule }
}

use ScoreCategory::{Budget, Crypto, Cushion, Equities, Habits, RealEstate};

pub const RUBRIC: &[RubricEntry] = &[
    entry(Budget, "Income exceeds expense", 20, Rule::IncomeExceedsExpense),
    entry(Budget, "Minimum savings rate of 10%", 20, Rule::MinimumSavingsRate),
    entry(Cushion, "3 to 6 months of expenses saved", 15, Rule::ExpenseCoverage),
    entry(Equities, "Invests through a brokerage account", 10, Rule::HasBrokerage),
    entry(Equities, "Prioritizes a tax-advantaged account (PEA)", 3, Rule::HasTaxAdvantagedAccount),
    entry(Equities, "Holds a standard brokerage account (CTO)", 1, Rule::HasStandardBrokerage),
    entry(Equities, "Diversified world index exposure", 3, Rule::Manual),
    entry(Equities, "Low fees (under 0.5% per year)", 2, Rule::Manual),
    entry(Equities, "Invests every month", 2, Rule::Manual),
    entry(Equities, "Long-term horizon (over 5 years)", 2, Rule::Manual),
    entry(Equities, "No single stock above 10% of the portfolio", 1, Rule::Manual),
    entry(Equities, "Rebalances at least once a year", 1, Rule::Manual),
    entry(RealEstate, "Owns main residence", 5, Rule::Manual),
    entry(RealEstate, "Holds rental property or real estate funds", 5, Rule::Manual),
    entry(Crypto, "Crypto below 5% of net worth", 2, Rule::Manual),
    entry(Crypto, "Self-custody of crypto assets", 1, Rule::Manual),
    entry(Crypto, "Buys on a fixed schedule", 1, Rule::Manual),
    entry(Habits, "Reviews the budget every month", 2, Rule::Manual),
    entry(Habits, "No consumer credit", 1, Rule::Manual),
    entry(Habits, "Automatic transfer to savings", 1, Rule::Manual),
    entry(Habits, "Yearly review of contracts and subscriptions", 1, Rule::Manual),
    entry(Habits, "Documented plan for emergencies", 1, Rule::Manual),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub name: String,
    pub max_points: u32,
    pub earned_points: u32,
    pub satisfied: bool,
    pub explanation: String,
    pub is_computable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub max_points: u32,
    pub earned_points: u32,
    pub criteria: Vec<Criterion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreTotal {
    pub earned: u32,
    pub max: u32,
    pub percentage: f64,
}

/// Qualitative band of the total percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Excellent,
    Good,
    Fair,
    NeedsWork,
}

impl Grade {
    pub fn of(percentage: f64) -> Self {
        if percentage >= 80.0 {
            Grade::Excellent
        } else if percentage >= 60.0 {
            Grade::Good
        } else if percentage >= 40.0 {
            Grade::Fair
        } else {
            Grade::NeedsWork
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub month: String,
    /// Accumulated savings in months of average expense
    pub coverage: Decimal,
    pub categories: BTreeMap<ScoreCategory, CategoryScore>,
    pub total: ScoreTotal,
}

impl ScoreReport {
    pub fn grade(&self) -> Grade {
        Grade::of(self.total.percentage)
    }

    pub fn category(&self, category: ScoreCategory) -> Option<&CategoryScore> {
        self.categories.get(&category)
    }

    /// Look up a criterion by exact name
    pub fn criterion(&self, name: &str) -> Option<&Criterion> {
        self.categories
            .values()
            .flat_map(|c| c.criteria.iter())
            .find(|c| c.name == name)
    }
}

/// Ledger-wide figures the rubric needs beyond the scored month
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreInputs {
    /// Sum of every saving row over every month
    pub accumulated_saving: Decimal,
    /// Mean over all months of the monthly expense total, for display
    pub avg_monthly_expense: Decimal,
    pub coverage: Decimal,
    /// Tags found among saving row names
    pub saving_tags: BTreeSet<Tag>,
}

impl ScoreInputs {
    pub fn gather(table: &LedgerTable, classifier: &dyn CategoryClassifier) -> Self {
        let accumulated_saving = table.kind_total(RowKind::Saving);
        let avg_monthly_expense = finboard_utils::mean(&table.kind_totals_by_month(RowKind::Expense));
        // Months covered: total saving over total expense, scaled by the month count
        let coverage = accumulated_saving
            .checked_mul(Decimal::from(table.month_count()))
            .map(|scaled| finboard_utils::ratio(scaled, table.kind_total(RowKind::Expense)))
            .unwrap_or(Decimal::ZERO);

        let saving_tags = table
            .rows_of_kind(RowKind::Saving)
            .flat_map(|row| classifier.classify(&row.category))
            .collect();

        Self {
            accumulated_saving,
            avg_monthly_expense,
            coverage,
            saving_tags,
        }
    }
}

/// Score a month against the rubric
pub fn score_report(
    aggregate: &MonthAggregate,
    table: &LedgerTable,
    classifier: &dyn CategoryClassifier,
) -> ScoreReport {
    let inputs = ScoreInputs::gather(table, classifier);
    score_with_inputs(aggregate, &inputs)
}

/// Score a month given precomputed ledger-wide inputs
pub fn score_with_inputs(aggregate: &MonthAggregate, inputs: &ScoreInputs) -> ScoreReport {
    let mut categories: BTreeMap<ScoreCategory, CategoryScore> = ScoreCategory::ALL
        .iter()
        .map(|c| {
            (
                *c,
                CategoryScore {
                    max_points: 0,
                    earned_points: 0,
                    criteria: Vec::new(),
                },
            )
        })
        .collect();

    for entry in RUBRIC {
        let criterion = evaluate(entry, aggregate, inputs);
        if let Some(score) = categories.get_mut(&entry.category) {
            score.max_points += criterion.max_points;
            score.earned_points += criterion.earned_points;
            score.criteria.push(criterion);
        }
    }

    let earned: u32 = categories.values().map(|c| c.earned_points).sum();
    let total = ScoreTotal {
        earned,
        max: TOTAL_MAX_POINTS,
        percentage: f64::from(earned) * 100.0 / f64::from(TOTAL_MAX_POINTS),
    };

    log::debug!(
        "Score {}: {}/{} (coverage {})",
        aggregate.month,
        total.earned,
        total.max,
        inputs.coverage.round_dp(2)
    );

    ScoreReport {
        month: aggregate.month.clone(),
        coverage: inputs.coverage,
        categories,
        total,
    }
}

fn evaluate(entry: &RubricEntry, aggregate: &MonthAggregate, inputs: &ScoreInputs) -> Criterion {
    let max = entry.max_points;
    let full = |satisfied: bool| if satisfied { max } else { 0 };

    let (earned, satisfied, explanation) = match entry.rule {
        Rule::IncomeExceedsExpense => {
            let ok = aggregate.total_income > aggregate.total_expense;
            (
                full(ok),
                ok,
                format!(
                    "Income {} vs expense {}",
                    aggregate.total_income.round_dp(2),
                    aggregate.total_expense.round_dp(2)
                ),
            )
        }
        Rule::MinimumSavingsRate => {
            let rate = aggregate.savings_rate;
            let target = Decimal::from(TARGET_SAVINGS_RATE);
            if rate >= target {
                (max, true, format!("Savings rate {}% meets the {}% target", rate.round_dp(1), target))
            } else {
                let partial = floor_points(rate / target * Decimal::from(max), max);
                (partial, false, format!("Savings rate {}% is below the {}% target", rate.round_dp(1), target))
            }
        }
        Rule::ExpenseCoverage => {
            let coverage = inputs.coverage;
            let low = Decimal::from(COVERAGE_MIN_MONTHS);
            let high = Decimal::from(COVERAGE_MAX_MONTHS);
            let months = coverage.round_dp(1);
            if coverage >= low && coverage <= high {
                (max, true, format!("Savings cover {} months of expenses", months))
            } else if coverage > high {
                (
                    TOO_LIQUID_POINTS.min(max),
                    false,
                    format!("Savings cover {} months of expenses: too liquid, consider investing the excess", months),
                )
            } else {
                let partial = floor_points(coverage / low * Decimal::from(max), max);
                (partial, false, format!("Savings cover only {} months of expenses", months))
            }
        }
        Rule::HasBrokerage => {
            let ok = inputs.saving_tags.contains(&Tag::TaxAdvantagedBrokerage)
                || inputs.saving_tags.contains(&Tag::StandardBrokerage);
            (full(ok), ok, found_or_missing(ok, "brokerage account"))
        }
        Rule::HasTaxAdvantagedAccount => {
            let ok = inputs.saving_tags.contains(&Tag::TaxAdvantagedBrokerage);
            (full(ok), ok, found_or_missing(ok, "tax-advantaged account"))
        }
        Rule::HasStandardBrokerage => {
            let ok = inputs.saving_tags.contains(&Tag::StandardBrokerage);
            (full(ok), ok, found_or_missing(ok, "standard brokerage account"))
        }
        Rule::Manual => {
            return Criterion {
                name: entry.name.to_string(),
                max_points: max,
                earned_points: 0,
                satisfied: false,
                explanation: "Not computable from ledger data; assess manually".to_string(),
                is_computable: false,
            };
        }
    };

    Criterion {
        name: entry.name.to_string(),
        max_points: max,
        earned_points: earned.min(max),
        satisfied,
        explanation,
        is_computable: true,
    }
}

/// Floor a point value into `[0, max]`
fn floor_points(value: Decimal, max: u32) -> u32 {
    let floored = value.floor();
    if floored <= Decimal::ZERO {
        0
    } else {
        floored.to_u32().unwrap_or(max).min(max)
    }
}

fn found_or_missing(found: bool, what: &str) -> String {
    if found {
        format!("Found a {} among saving categories", what)
    } else {
        format!("No {} among saving categories", what)
    }
}
