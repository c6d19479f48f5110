//! CSV ingestion for the two source datasets
//!
//! Parses the monthly production table and the fracture adjunct table into
//! typed records. Both loaders follow the same discipline:
//!
//! - The header row is mapped to known column names; missing a *required*
//!   column is a hard [`IngestError::MissingColumns`].
//! - Malformed data rows (empty well id, non-numeric or negative volumes,
//!   month outside 1-12) are dropped and counted, never fatal — analysis
//!   proceeds on the valid subset.
//! - A summary line is logged per source with columns found and row counts.
//!
//! Zero valid rows is *not* an ingest error; the report layer decides that
//! an empty snapshot is fatal.

mod fracture;
mod production;

pub use fracture::{load_fracture_csv, parse_fracture, FractureTable};
pub use production::{load_production_csv, parse_production, ProductionTable};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ingestion failure for a whole source (not a single row)
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read source: {0}")]
    Io(#[from] std::io::Error),

    #[error("source has no header row")]
    EmptyFile,

    #[error("missing required columns: {0}")]
    MissingColumns(String),
}

/// Row-level quality counters returned with every parsed table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestDiagnostics {
    /// Data rows seen (header excluded)
    pub rows_read: usize,
    /// Rows dropped as malformed
    pub rows_dropped: usize,
    /// Rows discarded as duplicates of an earlier key
    pub duplicate_rows: usize,
}

// ============================================================================
// CSV Quote-Aware Parsing
// ============================================================================

/// Split a CSV line respecting quoted fields (handles commas inside quotes).
/// Returns owned strings because quoted fields need unquoting.
pub(crate) fn csv_split(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    // Check for escaped quote ("")
                    if chars.peek() == Some(&'"') {
                        current.push('"');
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            ',' if !in_quotes => {
                fields.push(current.clone());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

/// Trimmed string field by optional column index; `""` when absent.
pub(crate) fn str_field<'a>(fields: &'a [String], idx: Option<usize>) -> &'a str {
    idx.and_then(|i| fields.get(i))
        .map_or("", |s| s.trim())
}

/// Parse a numeric field. Empty and the portal's null spellings read as 0.0;
/// anything else must parse to a finite number or the row is rejected.
pub(crate) fn num_field(fields: &[String], idx: Option<usize>) -> Result<f64, String> {
    let raw = str_field(fields, idx);
    if raw.is_empty()
        || raw.eq_ignore_ascii_case("nan")
        || raw.eq_ignore_ascii_case("null")
        || raw == "-"
    {
        return Ok(0.0);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        Ok(_) => Err(format!("non-finite value '{raw}'")),
        Err(_) => Err(format!("non-numeric value '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_split_plain() {
        assert_eq!(csv_split("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(csv_split("a,,c"), vec!["a", "", "c"]);
    }

    #[test]
    fn test_csv_split_quoted() {
        assert_eq!(
            csv_split(r#"X-1,"ACME, S.A.",10.5"#),
            vec!["X-1", "ACME, S.A.", "10.5"]
        );
        assert_eq!(csv_split(r#""say ""hi""",2"#), vec![r#"say "hi""#, "2"]);
    }

    #[test]
    fn test_num_field_null_spellings() {
        let fields: Vec<String> = ["1.5", "NaN", "", "null", "-", "bogus"]
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        assert_eq!(num_field(&fields, Some(0)), Ok(1.5));
        assert_eq!(num_field(&fields, Some(1)), Ok(0.0));
        assert_eq!(num_field(&fields, Some(2)), Ok(0.0));
        assert_eq!(num_field(&fields, Some(3)), Ok(0.0));
        assert_eq!(num_field(&fields, Some(4)), Ok(0.0));
        assert!(num_field(&fields, Some(5)).is_err());
        assert_eq!(num_field(&fields, None), Ok(0.0));
    }
}
