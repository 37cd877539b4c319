//! Flow graph builder
//!
//! Routes a month's money through a single hub node: every income row
//! flows into `Total`, and `Total` flows out to every expense and saving
//! row, plus an `Unallocated` node when the balance is positive.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregate::MonthAggregate;
use crate::types::{RowKind, Tier};

/// Label of the hub node
pub const TOTAL_LABEL: &str = "Total Income";
/// Label of the leftover-balance node
pub const UNALLOCATED_LABEL: &str = "Unallocated";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    pub label: String,
    pub amount: Decimal,
    pub tier: Tier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowEdge {
    pub source: usize,
    pub target: usize,
    pub amount: Decimal,
    /// Tier of the non-hub endpoint
    pub tier: Tier,
}

/// Directed acyclic graph of one month's money movement
///
/// Node order: income rows, the hub, expense rows, saving rows, then the
/// optional unallocated node. Rows keep ledger order within a tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowGraph {
    pub month: String,
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
}

impl FlowGraph {
    /// Build the graph for an aggregated month
    pub fn build(aggregate: &MonthAggregate) -> Self {
        let mut nodes = Vec::with_capacity(
            aggregate.income_rows.len()
                + aggregate.expense_rows.len()
                + aggregate.saving_rows.len()
                + 2,
        );
        let mut edges = Vec::new();

        for row in &aggregate.income_rows {
            nodes.push(FlowNode {
                label: row.category.clone(),
                amount: row.amount,
                tier: Tier::Income,
            });
        }

        let hub = nodes.len();
        nodes.push(FlowNode {
            label: TOTAL_LABEL.to_string(),
            amount: aggregate.total_income,
            tier: Tier::Total,
        });

        for (source, row) in aggregate.income_rows.iter().enumerate() {
            edges.push(FlowEdge {
                source,
                target: hub,
                amount: row.amount,
                tier: Tier::Income,
            });
        }

        for kind in [RowKind::Expense, RowKind::Saving] {
            let tier = match Tier::of_kind(kind) {
                Some(tier) => tier,
                None => continue,
            };
            for row in aggregate.rows_of(kind) {
                let target = nodes.len();
                nodes.push(FlowNode {
                    label: row.category.clone(),
                    amount: row.amount,
                    tier,
                });
                edges.push(FlowEdge {
                    source: hub,
                    target,
                    amount: row.amount,
                    tier,
                });
            }
        }

        if aggregate.balance > Decimal::ZERO {
            let target = nodes.len();
            nodes.push(FlowNode {
                label: UNALLOCATED_LABEL.to_string(),
                amount: aggregate.balance,
                tier: Tier::Unallocated,
            });
            edges.push(FlowEdge {
                source: hub,
                target,
                amount: aggregate.balance,
                tier: Tier::Unallocated,
            });
        }

        log::debug!(
            "Flow graph {}: {} nodes, {} edges",
            aggregate.month,
            nodes.len(),
            edges.len()
        );

        Self {
            month: aggregate.month.clone(),
            nodes,
            edges,
        }
    }

    /// Index of the hub node
    pub fn total_index(&self) -> Option<usize> {
        self.nodes.iter().position(|n| n.tier == Tier::Total)
    }

    pub fn has_unallocated(&self) -> bool {
        self.nodes.iter().any(|n| n.tier == Tier::Unallocated)
    }

    /// Sum of edge amounts entering a node
    pub fn inflow(&self, node: usize) -> Decimal {
        self.edges.iter().filter(|e| e.target == node).map(|e| e.amount).sum()
    }

    /// Sum of edge amounts leaving a node
    pub fn outflow(&self, node: usize) -> Decimal {
        self.edges.iter().filter(|e| e.source == node).map(|e| e.amount).sum()
    }

    /// Sum of edge amounts leaving the hub toward one tier
    pub fn outflow_to_tier(&self, tier: Tier) -> Decimal {
        match self.total_index() {
            Some(hub) => self
                .edges
                .iter()
                .filter(|e| e.source == hub && e.tier == tier)
                .map(|e| e.amount)
                .sum(),
            None => Decimal::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::CategoryAmount;

    fn rows(items: &[(&str, i64)]) -> Vec<CategoryAmount> {
        items
            .iter()
            .map(|(c, a)| CategoryAmount { category: c.to_string(), amount: Decimal::from(*a) })
            .collect()
    }

    fn surplus_month() -> MonthAggregate {
        MonthAggregate::from_rows(
            "2024-01",
            rows(&[("Salary", 2800), ("Rente", 450)]),
            rows(&[("Rent", 950), ("Food", 450)]),
            rows(&[("Livret A", 300), ("PEA ETF World", 150)]),
        )
    }

    #[test]
    fn test_node_order() {
        let graph = FlowGraph::build(&surplus_month());
        let tiers: Vec<Tier> = graph.nodes.iter().map(|n| n.tier).collect();
        assert_eq!(
            tiers,
            vec![
                Tier::Income,
                Tier::Income,
                Tier::Total,
                Tier::Expense,
                Tier::Expense,
                Tier::Saving,
                Tier::Saving,
                Tier::Unallocated,
            ]
        );
        assert_eq!(graph.nodes[0].label, "Salary");
        assert_eq!(graph.nodes[3].label, "Rent");
        assert_eq!(graph.nodes[6].label, "PEA ETF World");
    }

    #[test]
    fn test_conservation() {
        let agg = surplus_month();
        let graph = FlowGraph::build(&agg);
        let hub = graph.total_index().unwrap();

        assert_eq!(graph.inflow(hub), agg.total_income);
        assert_eq!(graph.outflow_to_tier(Tier::Expense), agg.total_expense);
        assert_eq!(graph.outflow_to_tier(Tier::Saving), agg.total_saving);
        assert_eq!(graph.outflow_to_tier(Tier::Unallocated), agg.balance);
        assert_eq!(
            graph.outflow(hub),
            agg.total_expense + agg.total_saving + agg.balance
        );
        assert_eq!(graph.inflow(hub), graph.outflow(hub));
    }

    #[test]
    fn test_no_unallocated_when_balance_not_positive() {
        let exact = MonthAggregate::from_rows(
            "2024-01",
            rows(&[("Salary", 1000)]),
            rows(&[("Rent", 600)]),
            rows(&[("Livret A", 400)]),
        );
        assert!(!FlowGraph::build(&exact).has_unallocated());

        let deficit = MonthAggregate::from_rows(
            "2024-01",
            rows(&[("Salary", 1000)]),
            rows(&[("Rent", 1200)]),
            vec![],
        );
        let graph = FlowGraph::build(&deficit);
        assert!(!graph.has_unallocated());
        assert!(graph.edges.iter().all(|e| e.amount > Decimal::ZERO));
    }

    #[test]
    fn test_empty_tiers_degrade() {
        let agg = MonthAggregate::from_rows("2024-01", rows(&[("Salary", 1000)]), vec![], vec![]);
        let graph = FlowGraph::build(&agg);
        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.edges.len(), 2);
        assert_eq!(graph.nodes[2].amount, Decimal::from(1000));
    }

    #[test]
    fn test_empty_month_has_only_hub() {
        let agg = MonthAggregate::from_rows("2024-01", vec![], vec![], vec![]);
        let graph = FlowGraph::build(&agg);
        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.edges.is_empty());
        assert_eq!(graph.total_index(), Some(0));
    }

    #[test]
    fn test_edge_tiers_follow_target() {
        let graph = FlowGraph::build(&surplus_month());
        let hub = graph.total_index().unwrap();
        for edge in &graph.edges {
            if edge.target == hub {
                assert_eq!(edge.tier, Tier::Income);
            } else {
                assert_eq!(graph.nodes[edge.target].tier, edge.tier);
            }
        }
    }
}
