//! CSV ledger parser
//!
//! Reads the spreadsheet export: a category column, a `Type` column and
//! one `YYYY-MM` column per month.

use csv::{ReaderBuilder, StringRecord, Trim};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::str::FromStr;

use crate::error::ParseError;
use crate::types::{EntryType, ParsedLedger, ParsedRow};

static MONTH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}-(0[1-9]|1[0-2])$").unwrap());

const CATEGORY_HEADERS: [&str; 3] = ["category", "catégorie", "categorie"];
const TYPE_HEADER: &str = "type";

/// Check a `YYYY-MM` month key with ASCII digits and a month in 01..=12
pub fn is_month_key(s: &str) -> bool {
    MONTH_RE.is_match(s)
}

/// Synchronous ledger parser
pub struct SimpleLedgerParser;

impl SimpleLedgerParser {
    /// Parse CSV content into a ledger
    pub fn parse(content: &str) -> Result<ParsedLedger, ParseError> {
        let content = content.trim_start_matches('\u{feff}');
        let delimiter = Self::detect_delimiter(content);

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(content.as_bytes());

        let headers = reader.headers()?.clone();
        let (category_col, type_col, month_cols) = Self::parse_header(&headers)?;
        let months: Vec<String> = month_cols.iter().map(|(_, m)| m.clone()).collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            if record.iter().all(|field| field.is_empty()) {
                continue;
            }
            let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
            rows.push(Self::parse_row(&record, line, category_col, type_col, &month_cols)?);
        }

        log::debug!("Parsed ledger: {} rows x {} months", rows.len(), months.len());

        Ok(ParsedLedger { months, rows })
    }

    /// Pick the delimiter that appears most in the header line
    pub fn detect_delimiter(content: &str) -> u8 {
        let header = content.lines().next().unwrap_or("");
        // max_by_key keeps the last maximum, so ties fall back to comma
        [b';', b'\t', b',']
            .into_iter()
            .max_by_key(|d| header.bytes().filter(|b| b == d).count())
            .unwrap_or(b',')
    }

    /// Locate the category and type columns; every other column must be a month
    fn parse_header(
        headers: &StringRecord,
    ) -> Result<(usize, usize, Vec<(usize, String)>), ParseError> {
        let mut category_col = None;
        let mut type_col = None;
        let mut month_cols = Vec::new();
        let mut seen = HashSet::new();

        for (idx, raw) in headers.iter().enumerate() {
            let name = raw.trim_start_matches('\u{feff}').trim();
            let lowered = name.to_lowercase();
            if CATEGORY_HEADERS.contains(&lowered.as_str()) {
                category_col = Some(idx);
            } else if lowered == TYPE_HEADER {
                type_col = Some(idx);
            } else if is_month_key(name) {
                if !seen.insert(name.to_string()) {
                    return Err(ParseError::ValidationError {
                        message: format!("duplicate month column '{}'", name),
                    });
                }
                month_cols.push((idx, name.to_string()));
            } else {
                return Err(ParseError::ValidationError {
                    message: format!("column '{}' is not a YYYY-MM month", name),
                });
            }
        }

        let category_col = category_col.ok_or_else(|| ParseError::MissingColumn {
            column: "Category".to_string(),
        })?;
        let type_col = type_col.ok_or_else(|| ParseError::MissingColumn {
            column: "Type".to_string(),
        })?;

        Ok((category_col, type_col, month_cols))
    }

    fn parse_row(
        record: &StringRecord,
        line: usize,
        category_col: usize,
        type_col: usize,
        month_cols: &[(usize, String)],
    ) -> Result<ParsedRow, ParseError> {
        let category = record.get(category_col).unwrap_or("").to_string();
        if category.is_empty() {
            return Err(ParseError::ValidationError {
                message: format!("line {}: empty category", line),
            });
        }

        let type_label = record.get(type_col).unwrap_or("");
        let entry_type = EntryType::from_str(type_label).map_err(|_| ParseError::ValidationError {
            message: format!("line {}: unknown type '{}' for '{}'", line, type_label, category),
        })?;

        let mut amounts = Vec::with_capacity(month_cols.len());
        for (idx, month) in month_cols {
            let raw = record.get(*idx).unwrap_or("");
            let amount = Self::parse_amount(raw).ok_or_else(|| ParseError::ValidationError {
                message: format!("line {}: invalid amount '{}' for '{}' in {}", line, raw, category, month),
            })?;
            amounts.push(amount);
        }

        Ok(ParsedRow {
            category,
            entry_type,
            amounts,
            line,
        })
    }

    /// Parse a spreadsheet amount cell. Empty cells read as zero.
    ///
    /// The right-most of `,` and `.` is the decimal separator when both
    /// appear; a lone comma is a decimal comma.
    pub fn parse_amount(raw: &str) -> Option<Decimal> {
        let cleaned: String = raw
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '€')
            .collect();
        if cleaned.is_empty() {
            return Some(Decimal::ZERO);
        }
        let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
            (Some(comma), Some(dot)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
            (Some(_), None) if cleaned.matches(',').count() == 1 => cleaned.replace(',', "."),
            _ => cleaned.replace(',', ""),
        };
        Decimal::from_str(&normalized).ok()
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_ledger() {
        let input = "Category,Type,2024-01,2024-02\n\
                     Salary,Income,2800,2850.50\n\
                     Rent,Expense,950,950\n";
        let ledger = SimpleLedgerParser::parse(input).unwrap();
        assert_eq!(ledger.months, vec!["2024-01", "2024-02"]);
        assert_eq!(ledger.rows.len(), 2);
        assert_eq!(ledger.rows[0].category, "Salary");
        assert_eq!(ledger.rows[0].entry_type, EntryType::Income);
        assert_eq!(ledger.rows[0].amounts[1], Decimal::new(285050, 2));
        assert_eq!(ledger.rows[1].entry_type, EntryType::Expense);
    }

    #[test]
    fn test_parse_french_semicolon_export() {
        let input = "Catégorie;Type;2024-01\n\
                     Salaire;Entrée;2 800,00\n\
                     Livret A;Épargne;300,5 €\n\
                     Résidence principale;Patrimoine;180000\n";
        let ledger = SimpleLedgerParser::parse(input).unwrap();
        assert_eq!(ledger.rows.len(), 3);
        assert_eq!(ledger.rows[0].amounts[0], Decimal::from(2800));
        assert_eq!(ledger.rows[1].entry_type, EntryType::Saving);
        assert_eq!(ledger.rows[1].amounts[0], Decimal::new(3005, 1));
        assert_eq!(ledger.rows[2].entry_type, EntryType::NetWorth);
    }

    #[test]
    fn test_empty_cell_is_zero() {
        let input = "Category,Type,2024-01,2024-02\nBonus,Income,,200\n";
        let ledger = SimpleLedgerParser::parse(input).unwrap();
        assert_eq!(ledger.rows[0].amounts[0], Decimal::ZERO);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let input = "Category,Type,2024-01\nRent,Expense,950\n\nFood,Expense,450\n";
        let ledger = SimpleLedgerParser::parse(input).unwrap();
        assert_eq!(ledger.rows.len(), 2);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let input = "Category,Type,2024-01\nRent,Outflow,950\n";
        let err = SimpleLedgerParser::parse(input).unwrap_err();
        assert!(matches!(err, ParseError::ValidationError { .. }));
        assert!(err.to_string().contains("Outflow"));
    }

    #[test]
    fn test_non_month_column_rejected() {
        let input = "Category,Type,January\nRent,Expense,950\n";
        assert!(matches!(
            SimpleLedgerParser::parse(input),
            Err(ParseError::ValidationError { .. })
        ));
        let input = "Category,Type,2024-13\nRent,Expense,950\n";
        assert!(SimpleLedgerParser::parse(input).is_err());
    }

    #[test]
    fn test_duplicate_month_rejected() {
        let input = "Category,Type,2024-01,2024-01\nRent,Expense,950,950\n";
        assert!(SimpleLedgerParser::parse(input).is_err());
    }

    #[test]
    fn test_missing_type_column() {
        let input = "Category,2024-01\nRent,950\n";
        assert!(matches!(
            SimpleLedgerParser::parse(input),
            Err(ParseError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_invalid_amount_rejected() {
        let input = "Category,Type,2024-01\nRent,Expense,abc\n";
        let err = SimpleLedgerParser::parse(input).unwrap_err();
        assert!(err.to_string().contains("2024-01"));
    }

    #[test]
    fn test_ragged_row_is_syntax_error() {
        let input = "Category,Type,2024-01\nRent,Expense,950,12\n";
        assert!(matches!(
            SimpleLedgerParser::parse(input),
            Err(ParseError::SyntaxError { .. })
        ));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(SimpleLedgerParser::detect_delimiter("a;b;c\n1;2;3"), b';');
        assert_eq!(SimpleLedgerParser::detect_delimiter("a\tb\tc"), b'\t');
        assert_eq!(SimpleLedgerParser::detect_delimiter("a,b,c"), b',');
        assert_eq!(SimpleLedgerParser::detect_delimiter("single"), b',');
    }

    #[test]
    fn test_month_key_shape() {
        assert!(is_month_key("2024-01"));
        assert!(!is_month_key("2024-00"));
        assert!(!is_month_key(" 2024-01"));
        // non-ASCII digits
        assert!(!is_month_key("٢٠٢٤-01"));
    }

    #[test]
    fn test_parse_amount_formats() {
        assert_eq!(SimpleLedgerParser::parse_amount("1,234.56"), Some(Decimal::new(123456, 2)));
        assert_eq!(SimpleLedgerParser::parse_amount("12,5"), Some(Decimal::new(125, 1)));
        assert_eq!(SimpleLedgerParser::parse_amount("1.234,56"), Some(Decimal::new(123456, 2)));
        assert_eq!(SimpleLedgerParser::parse_amount("1 234,56 €"), Some(Decimal::new(123456, 2)));
        assert_eq!(SimpleLedgerParser::parse_amount("1.234.567,8"), Some(Decimal::new(12345678, 1)));
        assert_eq!(SimpleLedgerParser::parse_amount("1,234,567"), Some(Decimal::from(1234567)));
        assert_eq!(SimpleLedgerParser::parse_amount("  "), Some(Decimal::ZERO));
        assert_eq!(SimpleLedgerParser::parse_amount("-40"), Some(Decimal::from(-40)));
        assert_eq!(SimpleLedgerParser::parse_amount("n/a"), None);
    }
}
