//! Core ledger analytics and business logic

pub mod aggregate;
pub mod classifier;
pub mod error;
pub mod evolution;
pub mod flow;
pub mod reports;
pub mod score;
pub mod table;
pub mod types;

use finboard_config::Config;
use finboard_parser::ParserRef;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

pub use aggregate::{CategoryAmount, CategoryShare, MonthAggregate};
pub use classifier::{CategoryClassifier, PrefixClassifier, Tag};
pub use error::{
    CoreError, CoreResult, DefaultErrorLogger, ErrorCode, ErrorContext, ErrorDetails, ErrorLogger,
    ErrorSeverity,
};
pub use evolution::{classify_trend, CategoryEvolution, EvolutionStats, TrendSummary};
pub use flow::{FlowEdge, FlowGraph, FlowNode};
pub use reports::{
    CategoriesResponse, CategoryInfo, EvolutionResponse, LedgerSummary, MonthReport, MonthsResponse,
    ReloadResponse, ScoreResponse,
};
pub use score::{Grade, ScoreCategory, ScoreReport};
pub use table::{LedgerRow, LedgerTable, NetWorthSnapshot};
pub use types::{Favorability, RowKind, Tier, Trend};

/// Main ledger structure
///
/// Holds the current table snapshot; every analysis is computed on demand
/// from it. A failed load leaves the previous snapshot in place.
pub struct Ledger {
    config: Config,
    parser: ParserRef,
    table: LedgerTable,
    classifier: Arc<dyn CategoryClassifier>,
    entry: Option<PathBuf>,
}

impl Ledger {
    /// Create an empty ledger with config and parser
    pub fn new(config: Config, parser: ParserRef) -> Self {
        let classifier = Arc::new(PrefixClassifier::from_config(&config.scoring));
        Self {
            config,
            parser,
            table: LedgerTable::default(),
            classifier,
            entry: None,
        }
    }

    /// Replace the category classifier used by scoring
    pub fn with_classifier(mut self, classifier: Arc<dyn CategoryClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Load the ledger from a file
    ///
    /// The path is remembered even when loading fails, so a fixed file can
    /// be picked up by `reload`.
    pub async fn load(&mut self, path: PathBuf) -> CoreResult<()> {
        self.entry = Some(path.clone());
        let parsed = self.parser.parse_file(path.clone()).await?;
        self.table = LedgerTable::from_parsed(parsed)?;

        log::info!(
            "Loaded {}: {} categories over {} months",
            path.display(),
            self.table.len(),
            self.table.month_count()
        );
        Ok(())
    }

    /// Load the ledger from in-memory text
    pub async fn load_content(&mut self, content: &str) -> CoreResult<()> {
        let parsed = self.parser.parse(content).await?;
        self.table = LedgerTable::from_parsed(parsed)?;

        log::info!(
            "Loaded ledger: {} categories over {} months",
            self.table.len(),
            self.table.month_count()
        );
        Ok(())
    }

    /// Re-read the last loaded file
    pub async fn reload(&mut self) -> CoreResult<()> {
        match self.entry.clone() {
            Some(path) => self.load(path).await,
            None => Err(CoreError::NotLoaded),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Path of the last loaded file
    pub fn entry(&self) -> Option<&PathBuf> {
        self.entry.as_ref()
    }

    pub fn table(&self) -> &LedgerTable {
        &self.table
    }

    pub fn months(&self) -> &[String] {
        self.table.months()
    }

    /// The most recent month
    pub fn default_month(&self) -> CoreResult<String> {
        self.table
            .latest_month()
            .map(|m| m.to_string())
            .ok_or(CoreError::EmptyLedger)
    }

    pub fn month_aggregate(&self, month: &str) -> CoreResult<MonthAggregate> {
        MonthAggregate::compute(&self.table, month)
    }

    pub fn flow_graph(&self, month: &str) -> CoreResult<FlowGraph> {
        let aggregate = self.month_aggregate(month)?;
        Ok(FlowGraph::build(&aggregate))
    }

    pub fn category_evolution(&self, category: &str) -> CoreResult<CategoryEvolution> {
        CategoryEvolution::compute(&self.table, category, self.config.statistics.std_dev)
    }

    pub fn trend(&self, category: &str) -> CoreResult<TrendSummary> {
        let evolution = self.category_evolution(category)?;
        Ok(classify_trend(&evolution))
    }

    pub fn score_report(&self, month: &str) -> CoreResult<ScoreReport> {
        let aggregate = self.month_aggregate(month)?;
        Ok(score::score_report(&aggregate, &self.table, self.classifier.as_ref()))
    }

    pub fn net_worth(&self, month: &str) -> CoreResult<NetWorthSnapshot> {
        self.table.net_worth(month)
    }

    /// Every category with its kind, in ledger order
    pub fn categories(&self) -> Vec<CategoryInfo> {
        self.table
            .rows()
            .iter()
            .map(|row| CategoryInfo {
                category: row.category.clone(),
                kind: row.kind,
            })
            .collect()
    }

    pub fn summary(&self) -> LedgerSummary {
        let rows_by_kind: BTreeMap<String, usize> = RowKind::ALL
            .iter()
            .map(|kind| (kind.to_string(), self.table.count_of_kind(*kind)))
            .collect();

        LedgerSummary {
            category_count: self.table.len(),
            month_count: self.table.month_count(),
            months: self.table.months().to_vec(),
            first_month: self.table.months().first().cloned(),
            last_month: self.table.latest_month().map(|m| m.to_string()),
            rows_by_kind,
        }
    }
}
