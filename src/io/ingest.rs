//! Delimited-text ingest of numeric matrices.
//!
//! Every record becomes one row of `f64`. Empty lines are skipped by the
//! reader; anything that does not parse is reported with its line number
//! (exit code 2). Row widths are not checked here: the fitting and criteria
//! code validate shape and report ragged rows themselves.

use std::fs::File;
use std::io::Read;

use crate::domain::{InputSpec, Matrix};
use crate::error::AppError;

/// Ingest output: the parsed matrix and, if present, its header row.
#[derive(Debug, Clone)]
pub struct IngestedMatrix {
    pub rows: Matrix,
    /// Header names, when the input has a header row.
    pub headers: Option<Vec<String>>,
}

impl IngestedMatrix {
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }
}

/// Load the matrix described by `spec`.
pub fn load_matrix(spec: &InputSpec) -> Result<IngestedMatrix, AppError> {
    let file = File::open(&spec.path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to open input '{}': {e}", spec.path.display()),
        )
    })?;
    let matrix = read_matrix(file, spec.delimiter, spec.has_header)?;
    log::info!(
        "loaded {} rows x {} columns from {}",
        matrix.rows.len(),
        matrix.width(),
        spec.path.display()
    );
    Ok(matrix)
}

/// Parse a matrix from any reader.
pub fn read_matrix<R: Read>(
    reader: R,
    delimiter: u8,
    has_header: bool,
) -> Result<IngestedMatrix, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(has_header)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = if has_header {
        let record = reader
            .headers()
            .map_err(|e| AppError::new(2, format!("Failed to read header row: {e}")))?;
        Some(record.iter().map(normalize_header_name).collect())
    } else {
        None
    };

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| AppError::new(2, format!("Parse error: {e}")))?;
        let line = record
            .position()
            .map_or(idx + 1 + usize::from(has_header), |p| p.line() as usize);

        let row = record
            .iter()
            .enumerate()
            .map(|(col, field)| parse_cell(field, line, col))
            .collect::<Result<Vec<f64>, AppError>>()?;
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(AppError::new(2, "Input contains no data rows."));
    }

    Ok(IngestedMatrix { rows, headers })
}

/// Delimiter argument -> single byte. Accepts `tab` / `\t` for tabs.
pub fn parse_delimiter(raw: &str) -> Result<u8, String> {
    match raw {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        s if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        s => Err(format!("delimiter must be a single ASCII character, got '{s}'")),
    }
}

fn normalize_header_name(name: &str) -> String {
    // Some spreadsheet exports prefix the first header with a BOM.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

fn parse_cell(field: &str, line: usize, col: usize) -> Result<f64, AppError> {
    let value = field.parse::<f64>().map_err(|_| {
        AppError::new(
            2,
            format!("line {line}, column {}: '{field}' is not a number", col + 1),
        )
    })?;
    if !value.is_finite() {
        return Err(AppError::new(
            2,
            format!("line {line}, column {}: value must be finite", col + 1),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_headerless_rows() {
        let text = "5,1,6\n7,7,8\n9, 4 ,2\n3,3,5\n";
        let m = read_matrix(text.as_bytes(), b',', false).unwrap();
        assert_eq!(m.rows.len(), 4);
        assert_eq!(m.rows[2], vec![9.0, 4.0, 2.0]);
        assert!(m.headers.is_none());
        assert_eq!(m.width(), 3);
    }

    #[test]
    fn reads_header_and_custom_delimiter() {
        let text = "\u{feff}y;x1;x2\n5;1;6\n7;7;8\n";
        let m = read_matrix(text.as_bytes(), b';', true).unwrap();
        assert_eq!(
            m.headers,
            Some(vec!["y".to_string(), "x1".to_string(), "x2".to_string()])
        );
        assert_eq!(m.rows, vec![vec![5.0, 1.0, 6.0], vec![7.0, 7.0, 8.0]]);
    }

    #[test]
    fn ragged_rows_are_passed_through() {
        let m = read_matrix("1,2\n3\n".as_bytes(), b',', false).unwrap();
        assert_eq!(m.rows[1], vec![3.0]);
    }

    #[test]
    fn bad_cell_reports_line_and_column() {
        let err = read_matrix("1,2\n3,abc\n".as_bytes(), b',', false).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "line 2, column 2: 'abc' is not a number");
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = read_matrix("y,x\n".as_bytes(), b',', true).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn delimiter_names() {
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert_eq!(parse_delimiter(";"), Ok(b';'));
        assert!(parse_delimiter(";;").is_err());
    }
}
