//! Ledger spreadsheet loader
//!
//! Reads the CSV export of the monthly ledger (categories x months).

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

pub mod error;
pub mod types;
pub mod parser;

pub use error::ParseError;
pub use parser::{is_month_key, SimpleLedgerParser};
pub use types::{EntryType, ParsedLedger, ParsedRow};

// ==================== Parser Trait ====================

/// Parser reference type
pub type ParserRef = Arc<dyn LedgerParserTrait>;

/// Trait for ledger loaders
#[async_trait]
pub trait LedgerParserTrait: Send + Sync {
    /// Parse ledger text
    async fn parse(&self, content: &str) -> Result<ParsedLedger, ParseError>;

    /// Parse from a file path
    async fn parse_file(&self, path: PathBuf) -> Result<ParsedLedger, ParseError>;
}

/// Default parser implementation
#[derive(Debug, Default)]
pub struct DefaultLedgerParser;

#[async_trait]
impl LedgerParserTrait for DefaultLedgerParser {
    async fn parse(&self, content: &str) -> Result<ParsedLedger, ParseError> {
        SimpleLedgerParser::parse(content)
    }

    async fn parse_file(&self, path: PathBuf) -> Result<ParsedLedger, ParseError> {
        let content = tokio::fs::read_to_string(&path).await?;
        let source = path.to_string_lossy().to_string();

        SimpleLedgerParser::parse(&content).map_err(|e| match e {
            ParseError::ValidationError { message } => ParseError::ValidationError {
                message: format!("{}: {}", source, message),
            },
            other => other,
        })
    }
}
