//! Error types for finboard-parser

use thiserror::Error;
use std::io;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Syntax error at {location}: {message}")]
    SyntaxError {
        location: String,
        message: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Missing column: {column}")]
    MissingColumn { column: String },

    #[error("IO error")]
    IoError(#[from] io::Error),
}

impl From<csv::Error> for ParseError {
    fn from(e: csv::Error) -> Self {
        let location = e
            .position()
            .map(|p| format!("line {}", p.line()))
            .unwrap_or_else(|| "input".to_string());
        ParseError::SyntaxError {
            location,
            message: e.to_string(),
        }
    }
}
