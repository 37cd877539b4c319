//! Error types for finboard-core
//!
//! Every failure here is a data or programming error surfaced to the
//! caller as-is. Zero denominators are not errors: the computations
//! return 0 for them.

use thiserror::Error;
use serde::{Deserialize, Serialize};
use std::io;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No ledger file has been loaded
    NotLoaded,
    /// Requested month is not a ledger column
    InvalidMonth,
    /// Requested category is not a ledger row
    CategoryNotFound,
    /// Ledger has no month columns
    EmptyLedger,
    /// Two rows share a category name
    DuplicateCategory,
    /// Ledger file could not be parsed
    ParseError,
    /// Malformed table shape
    InvalidFormat,
    ConfigError,
    IoError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::NotLoaded => write!(f, "NOT_LOADED"),
            ErrorCode::InvalidMonth => write!(f, "INVALID_MONTH"),
            ErrorCode::CategoryNotFound => write!(f, "CATEGORY_NOT_FOUND"),
            ErrorCode::EmptyLedger => write!(f, "EMPTY_LEDGER"),
            ErrorCode::DuplicateCategory => write!(f, "DUPLICATE_CATEGORY"),
            ErrorCode::ParseError => write!(f, "PARSE_ERROR"),
            ErrorCode::InvalidFormat => write!(f, "INVALID_FORMAT"),
            ErrorCode::ConfigError => write!(f, "CONFIG_ERROR"),
            ErrorCode::IoError => write!(f, "IO_ERROR"),
        }
    }
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Debug => write!(f, "debug"),
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for finboard-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Ledger not loaded")]
    NotLoaded,

    #[error("Invalid month: {month}")]
    InvalidMonth { month: String },

    #[error("Category not found: {name}")]
    CategoryNotFound { name: String },

    #[error("Ledger has no months")]
    EmptyLedger,

    #[error("Duplicate category: {name}")]
    DuplicateCategory { name: String },

    #[error("Parse error: {message}")]
    ParseError { message: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("IO error occurred")]
    IoError,
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::NotLoaded => ErrorCode::NotLoaded,
            CoreError::InvalidMonth { .. } => ErrorCode::InvalidMonth,
            CoreError::CategoryNotFound { .. } => ErrorCode::CategoryNotFound,
            CoreError::EmptyLedger => ErrorCode::EmptyLedger,
            CoreError::DuplicateCategory { .. } => ErrorCode::DuplicateCategory,
            CoreError::ParseError { .. } => ErrorCode::ParseError,
            CoreError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            CoreError::ConfigError { .. } => ErrorCode::ConfigError,
            CoreError::IoError => ErrorCode::IoError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::NotLoaded => ErrorSeverity::Warning,
            CoreError::InvalidMonth { .. } => ErrorSeverity::Info,
            CoreError::CategoryNotFound { .. } => ErrorSeverity::Info,
            CoreError::EmptyLedger => ErrorSeverity::Warning,
            CoreError::DuplicateCategory { .. } => ErrorSeverity::Error,
            CoreError::ParseError { .. } => ErrorSeverity::Error,
            CoreError::InvalidFormat { .. } => ErrorSeverity::Error,
            CoreError::ConfigError { .. } => ErrorSeverity::Critical,
            CoreError::IoError => ErrorSeverity::Error,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::NotLoaded => {
                details = details.with_suggestion(
                    "Check data.path and data.main_file in the config, then POST /api/reload.".to_string()
                );
            }
            CoreError::InvalidMonth { month } => {
                details = details.with_detail(serde_json::json!({ "month": month }));
                details = details.with_suggestion(
                    "Months use the YYYY-MM form; GET /api/months lists the available ones.".to_string()
                );
            }
            CoreError::CategoryNotFound { name } => {
                details = details.with_suggestion(format!(
                    "Check that '{}' is spelled exactly as in the ledger's category column.", name
                ));
                details = details.with_suggestion(
                    "GET /api/categories lists all categories.".to_string()
                );
            }
            CoreError::EmptyLedger => {
                details = details.with_suggestion(
                    "Add at least one YYYY-MM column to the ledger file.".to_string()
                );
            }
            CoreError::DuplicateCategory { name } => {
                details = details.with_suggestion(format!(
                    "Rename or merge the rows named '{}'; category names must be unique.", name
                ));
            }
            CoreError::ParseError { message } => {
                details = details.with_detail(serde_json::json!({ "parse_message": message }));
                details = details.with_suggestion(
                    "The ledger needs a Category column, a Type column and YYYY-MM month columns.".to_string()
                );
            }
            _ => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<io::Error> for CoreError {
    fn from(_error: io::Error) -> Self {
        CoreError::IoError
    }
}

impl From<finboard_parser::ParseError> for CoreError {
    fn from(error: finboard_parser::ParseError) -> Self {
        match error {
            finboard_parser::ParseError::IoError(_) => CoreError::IoError,
            other => CoreError::ParseError { message: other.to_string() },
        }
    }
}

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Request ID for tracing
    pub request_id: Option<String>,
    /// Operation being performed
    pub operation: String,
    /// Additional context data
    pub data: serde_json::Value,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(operation: String) -> Self {
        Self {
            request_id: None,
            operation,
            data: serde_json::json!({}),
        }
    }

    /// Add request ID
    pub fn with_request_id(mut self, request_id: String) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add context data
    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger {
    /// Log an error
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        match error.severity() {
            ErrorSeverity::Debug | ErrorSeverity::Info => log::debug!(
                target: "finboard::error",
                "{} - Operation: {} - Data: {}",
                error.to_details(),
                context.operation,
                context.data
            ),
            ErrorSeverity::Warning => log::warn!(
                target: "finboard::error",
                "{} - Operation: {} - Data: {}",
                error.to_details(),
                context.operation,
                context.data
            ),
            ErrorSeverity::Error | ErrorSeverity::Critical => log::error!(
                target: "finboard::error",
                "ERROR [{}] {} - Operation: {} - Request: {:?}",
                error.code(),
                error.to_details(),
                context.operation,
                context.request_id
            ),
        }
    }
}

// ==================== Tests ====================
