//! Basic enumerations shared by the analytics modules

use finboard_parser::EntryType;
use serde::{Deserialize, Serialize};

/// Ledger row kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    /// Monthly inflow (salary, rent received)
    Income,
    /// Monthly outflow (rent, food)
    Expense,
    /// Monthly amount moved to savings or investments
    Saving,
    /// Point-in-time valuation; never part of monthly flows
    NetWorth,
}

impl RowKind {
    /// Kinds that take part in monthly money flows
    pub const FLOWS: [RowKind; 3] = [RowKind::Income, RowKind::Expense, RowKind::Saving];

    pub const ALL: [RowKind; 4] = [
        RowKind::Income,
        RowKind::Expense,
        RowKind::Saving,
        RowKind::NetWorth,
    ];
}

impl From<EntryType> for RowKind {
    fn from(entry: EntryType) -> Self {
        match entry {
            EntryType::Income => RowKind::Income,
            EntryType::Expense => RowKind::Expense,
            EntryType::Saving => RowKind::Saving,
            EntryType::NetWorth => RowKind::NetWorth,
        }
    }
}

impl std::str::FromStr for RowKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<EntryType>()
            .map(RowKind::from)
            .map_err(|_| format!("Invalid row kind: {}", s))
    }
}

impl std::fmt::Display for RowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowKind::Income => write!(f, "income"),
            RowKind::Expense => write!(f, "expense"),
            RowKind::Saving => write!(f, "saving"),
            RowKind::NetWorth => write!(f, "net_worth"),
        }
    }
}

/// Role of a node in the flow graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Income,
    /// The single hub every income flows into
    Total,
    Expense,
    Saving,
    /// Income left over after expenses and savings
    Unallocated,
}

impl Tier {
    /// Flow tier of a row kind; net worth rows have none
    pub fn of_kind(kind: RowKind) -> Option<Tier> {
        match kind {
            RowKind::Income => Some(Tier::Income),
            RowKind::Expense => Some(Tier::Expense),
            RowKind::Saving => Some(Tier::Saving),
            RowKind::NetWorth => None,
        }
    }
}

/// Direction of a series between its first and last month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Rising,
    Falling,
    Flat,
}

/// Whether a trend is good news for the category's kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Favorability {
    Favorable,
    Unfavorable,
    Neutral,
}

impl Favorability {
    /// Rising is good for income, savings and net worth; falling is good for expenses
    pub fn of(kind: RowKind, trend: Trend) -> Self {
        match (trend, kind) {
            (Trend::Flat, _) => Favorability::Neutral,
            (Trend::Rising, RowKind::Expense) => Favorability::Unfavorable,
            (Trend::Falling, RowKind::Expense) => Favorability::Favorable,
            (Trend::Rising, _) => Favorability::Favorable,
            (Trend::Falling, _) => Favorability::Unfavorable,
        }
    }
}
