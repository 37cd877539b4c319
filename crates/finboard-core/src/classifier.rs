//! Category-name classification for scoring
//!
//! Account types are detected from the category name; the rule is
//! swappable through the `CategoryClassifier` trait.

use finboard_config::ScoringConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    /// Tax-advantaged equity account (PEA)
    TaxAdvantagedBrokerage,
    /// Ordinary securities account (CTO)
    StandardBrokerage,
}

pub trait CategoryClassifier: Send + Sync {
    fn classify(&self, category: &str) -> BTreeSet<Tag>;
}

/// Case-sensitive name-prefix classifier
#[derive(Debug, Clone)]
pub struct PrefixClassifier {
    rules: Vec<(String, Tag)>,
}

impl PrefixClassifier {
    pub fn new(rules: Vec<(String, Tag)>) -> Self {
        Self { rules }
    }

    pub fn from_config(config: &ScoringConfig) -> Self {
        let tax = config
            .tax_advantaged_prefixes
            .iter()
            .map(|p| (p.clone(), Tag::TaxAdvantagedBrokerage));
        let standard = config
            .standard_brokerage_prefixes
            .iter()
            .map(|p| (p.clone(), Tag::StandardBrokerage));
        Self::new(tax.chain(standard).collect())
    }
}

impl Default for PrefixClassifier {
    fn default() -> Self {
        Self::from_config(&ScoringConfig::default())
    }
}

impl CategoryClassifier for PrefixClassifier {
    fn classify(&self, category: &str) -> BTreeSet<Tag> {
        self.rules
            .iter()
            .filter(|(prefix, _)| category.starts_with(prefix.as_str()))
            .map(|(_, tag)| *tag)
            .collect()
    }
}
