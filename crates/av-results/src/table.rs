//! Whitespace-separated numeric tables with fixed row and column offsets.
//!
//! The solver writes plain text with a fixed number of header lines followed
//! by rows of numbers. Columns are selected by zero-based index; a row that is
//! too short for a requested column is an error rather than a silent misparse.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{ResultsError, ResultsResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    /// Lines skipped before the first data row.
    pub skip_rows: usize,
    /// Cap on the number of data rows read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rows: Option<usize>,
}

impl TableSpec {
    pub fn skip(skip_rows: usize) -> Self {
        Self {
            skip_rows,
            max_rows: None,
        }
    }

    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }
}

/// A column index, optionally checked against a token on the header line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
}

impl ColumnSpec {
    pub fn at(index: usize) -> Self {
        Self {
            index,
            header: None,
        }
    }

    pub fn with_header(mut self, token: impl Into<String>) -> Self {
        self.header = Some(token.into());
        self
    }
}

impl From<usize> for ColumnSpec {
    fn from(index: usize) -> Self {
        ColumnSpec::at(index)
    }
}

/// Read the requested columns of `text`, one vector per column.
///
/// The header line is the last skipped line. Blank lines are ignored and do
/// not count toward `max_rows`.
pub fn read_columns(text: &str, spec: TableSpec, columns: &[ColumnSpec]) -> ResultsResult<Vec<Vec<f64>>> {
    let mut lines = text.lines().enumerate();
    let mut header = None;
    for got in 0..spec.skip_rows {
        match lines.next() {
            Some((_, line)) => header = Some(line),
            None => {
                return Err(ResultsError::Truncated {
                    needed: spec.skip_rows,
                    got,
                });
            }
        }
    }

    if let Some(header) = header {
        check_header(header, columns)?;
    }

    let mut out = vec![Vec::new(); columns.len()];
    let mut rows = 0;
    for (i, line) in lines {
        if spec.max_rows.is_some_and(|max| rows >= max) {
            break;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        for (col, values) in columns.iter().zip(out.iter_mut()) {
            let token = tokens.get(col.index).ok_or(ResultsError::MissingColumn {
                line: i + 1,
                column: col.index,
                width: tokens.len(),
            })?;
            let value = token.parse::<f64>().map_err(|_| ResultsError::Parse {
                line: i + 1,
                column: col.index,
                token: token.to_string(),
            })?;
            values.push(value);
        }
        rows += 1;
    }
    Ok(out)
}

pub fn read_columns_from_file(
    path: &Path,
    spec: TableSpec,
    columns: &[ColumnSpec],
) -> ResultsResult<Vec<Vec<f64>>> {
    let text = std::fs::read_to_string(path).map_err(|source| ResultsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    read_columns(&text, spec, columns)
}

fn check_header(header: &str, columns: &[ColumnSpec]) -> ResultsResult<()> {
    let tokens: Vec<&str> = header.split_whitespace().collect();
    for col in columns {
        if let Some(expected) = &col.header {
            let found = tokens.get(col.index).copied().unwrap_or("");
            if found != expected {
                return Err(ResultsError::HeaderMismatch {
                    column: col.index,
                    expected: expected.clone(),
                    found: found.to_string(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "# a b c\n x y z\n1 2 3\n\n4 5 6\n7 8 9\n";

    #[test]
    fn skips_header_and_selects_columns() {
        let cols = read_columns(TEXT, TableSpec::skip(2), &[2.into(), 0.into()]).unwrap();
        assert_eq!(cols[0], vec![3.0, 6.0, 9.0]);
        assert_eq!(cols[1], vec![1.0, 4.0, 7.0]);
    }

    #[test]
    fn max_rows_counts_data_rows_only() {
        let cols = read_columns(TEXT, TableSpec::skip(2).with_max_rows(2), &[1.into()]).unwrap();
        assert_eq!(cols[0], vec![2.0, 5.0]);
    }

    #[test]
    fn short_row_names_line_and_column() {
        let err = read_columns("h\n1 2\n", TableSpec::skip(1), &[4.into()]).unwrap_err();
        assert!(matches!(
            err,
            ResultsError::MissingColumn {
                line: 2,
                column: 4,
                width: 2
            }
        ));
    }

    #[test]
    fn bad_token_is_a_parse_error() {
        let err = read_columns("h\n1 x\n", TableSpec::skip(1), &[1.into()]).unwrap_err();
        assert!(matches!(err, ResultsError::Parse { line: 2, column: 1, .. }));
    }

    #[test]
    fn header_token_is_checked() {
        let ok = read_columns(TEXT, TableSpec::skip(2), &[ColumnSpec::at(1).with_header("y")]);
        assert!(ok.is_ok());
        let err = read_columns(TEXT, TableSpec::skip(2), &[ColumnSpec::at(1).with_header("CL")])
            .unwrap_err();
        assert!(matches!(err, ResultsError::HeaderMismatch { column: 1, .. }));
    }

    #[test]
    fn truncated_header_is_reported() {
        let err = read_columns("only\n", TableSpec::skip(3), &[0.into()]).unwrap_err();
        assert!(matches!(err, ResultsError::Truncated { needed: 3, got: 1 }));
    }
}
