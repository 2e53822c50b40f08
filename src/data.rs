//! Benchmark table loading.
//!
//! A benchmark sweep is stored as a CSV file: one header row, then one row
//! per tween count with one elapsed-time column per sprite count. The loader
//! turns it into a rectangular [`Grid`] of `f64` values and refuses anything
//! that is not a complete, finite, rectangular table.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Rectangular grid of finite values in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    values: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl Grid {
    /// Load a grid from a CSV file with a header row.
    ///
    /// The file is read to completion and closed before this returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or unreadable, a cell is not
    /// a finite number, a row's length differs from the header's, or there
    /// are no data rows.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        crate::time_scope!("data", format!("load {}", path.display()));

        let file = File::open(path)?;
        let grid = Self::from_reader(file)?;

        crate::info!("data", "loaded {}x{} grid from {}", grid.rows, grid.cols, path.display());
        Ok(grid)
    }

    /// Parse a grid from any CSV source with a header row.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Grid::from_path`], minus opening the file.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let expected = reader.headers().map_err(csv_error)?.len();
        if expected == 0 {
            return Err(Error::EmptyData);
        }

        let mut values = Vec::new();
        let mut rows = 0;
        for result in reader.records() {
            let record = result.map_err(csv_error)?;
            let line = record.position().map_or(0, csv::Position::line);

            if record.len() != expected {
                return Err(Error::NonRectangular { line, expected, found: record.len() });
            }

            for (idx, cell) in record.iter().enumerate() {
                values.push(parse_cell(cell, line, idx + 1)?);
            }
            rows += 1;
        }

        if rows == 0 {
            return Err(Error::EmptyData);
        }

        Ok(Self { values, rows, cols: expected })
    }

    /// Build a grid from nested rows.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no rows or columns, rows differ in
    /// length, or a value is not finite.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.is_empty() || cols == 0 {
            return Err(Error::EmptyData);
        }

        let mut values = Vec::with_capacity(rows.len() * cols);
        for (r, row) in rows.iter().enumerate() {
            // Header occupies line 1, so data row r sits on line r + 2.
            let line = r as u64 + 2;
            if row.len() != cols {
                return Err(Error::NonRectangular { line, expected: cols, found: row.len() });
            }
            for (c, &v) in row.iter().enumerate() {
                if !v.is_finite() {
                    return Err(Error::NonNumeric { line, column: c + 1, value: v.to_string() });
                }
                values.push(v);
            }
        }

        Ok(Self { values, rows: rows.len(), cols })
    }

    /// Number of data rows (tween sweep points).
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (sprite sweep points).
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows * self.cols
    }

    /// Grids always hold at least one cell.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at `(row, col)`.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.values.get(row * self.cols + col).copied()
    }

    /// One row as a slice.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        Some(&self.values[start..start + self.cols])
    }

    /// All values, row-major.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Copy into nested rows.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.values.chunks(self.cols).map(<[f64]>::to_vec).collect()
    }

    /// Smallest and largest value.
    #[must_use]
    pub fn extent(&self) -> (f64, f64) {
        self.values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }
}

fn parse_cell(cell: &str, line: u64, column: usize) -> Result<f64> {
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(Error::NonNumeric { line, column, value: cell.to_string() }),
    }
}

fn csv_error(err: csv::Error) -> Error {
    let line = err.position().map_or(0, csv::Position::line);
    match err.into_kind() {
        csv::ErrorKind::Io(io) => Error::Io(io),
        csv::ErrorKind::Utf8 { err, .. } => {
            Error::Csv { line, message: format!("invalid UTF-8 in column {}", err.field() + 1) }
        }
        kind => Error::Csv { line, message: format!("{kind:?}") },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Grid> {
        Grid::from_reader(text.as_bytes())
    }

    #[test]
    fn test_two_by_three() {
        let grid = parse("a,b,c\n1,2,3\n4,5,6\n").unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.to_rows(), vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
    }

    #[test]
    fn test_header_only_is_empty() {
        assert!(matches!(parse("a,b,c\n"), Err(Error::EmptyData)));
        assert!(matches!(parse(""), Err(Error::EmptyData)));
    }

    #[test]
    fn test_short_row_rejected() {
        let err = parse("a,b,c\n1,2,3\n4,5\n").unwrap_err();
        assert!(matches!(err, Error::NonRectangular { line: 3, expected: 3, found: 2 }));
    }

    #[test]
    fn test_long_row_rejected() {
        let err = parse("a,b\n1,2,3\n").unwrap_err();
        assert!(matches!(err, Error::NonRectangular { line: 2, expected: 2, found: 3 }));
    }

    #[test]
    fn test_non_numeric_rejected() {
        let err = parse("a,b\n1,x\n").unwrap_err();
        match err {
            Error::NonNumeric { line, column, value } => {
                assert_eq!(line, 2);
                assert_eq!(column, 2);
                assert_eq!(value, "x");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_and_nan_cells_rejected() {
        assert!(matches!(parse("a,b\n1,\n"), Err(Error::NonNumeric { .. })));
        assert!(matches!(parse("a,b\n1,NaN\n"), Err(Error::NonNumeric { .. })));
        assert!(matches!(parse("a,b\n1,inf\n"), Err(Error::NonNumeric { .. })));
    }

    #[test]
    fn test_whitespace_and_exponents() {
        let grid = parse("s1, s2\n 0.5 , 1e-3\r\n2,3\n").unwrap();
        assert_eq!(grid.get(0, 1), Some(1e-3));
        assert_eq!(grid.get(1, 0), Some(2.0));
    }

    #[test]
    fn test_blank_lines_skipped() {
        let grid = parse("a,b\n1,2\n\n3,4\n").unwrap();
        assert_eq!(grid.rows(), 2);
    }

    #[test]
    fn test_accessors() {
        let grid = parse("a,b\n1,2\n3,-4\n").unwrap();
        assert_eq!(grid.len(), 4);
        assert!(!grid.is_empty());
        assert_eq!(grid.row(1), Some(&[3.0, -4.0][..]));
        assert_eq!(grid.row(2), None);
        assert_eq!(grid.get(0, 2), None);
        assert_eq!(grid.values(), &[1.0, 2.0, 3.0, -4.0]);
        assert_eq!(grid.extent(), (-4.0, 3.0));
    }

    #[test]
    fn test_from_rows() {
        let grid = Grid::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(grid, parse("a,b\n1,2\n3,4\n").unwrap());

        assert!(matches!(Grid::from_rows(&[]), Err(Error::EmptyData)));
        assert!(matches!(Grid::from_rows(&[vec![]]), Err(Error::EmptyData)));
        assert!(matches!(
            Grid::from_rows(&[vec![1.0, 2.0], vec![3.0]]),
            Err(Error::NonRectangular { line: 3, .. })
        ));
        assert!(matches!(
            Grid::from_rows(&[vec![f64::NAN]]),
            Err(Error::NonNumeric { line: 2, column: 1, .. })
        ));
    }

    #[test]
    fn test_invalid_utf8_is_csv_error() {
        match Grid::from_reader(&b"a,b\n1,\xff\n"[..]) {
            Err(Error::Csv { line, message }) => {
                assert_eq!(line, 2);
                assert_eq!(message, "invalid UTF-8 in column 2");
            }
            other => panic!("expected Csv error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = Grid::from_path("definitely/not/here/bench-results.csv").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
