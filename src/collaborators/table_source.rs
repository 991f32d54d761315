//! Raw record table sources.
//!
//! A table source produces column names plus rows of optional cells. Cells
//! holding one of the conventional null markers are normalized to `None`
//! here so that downstream validation only ever sees present values.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::LoadError;

/// Cell contents treated as missing values.
const NULL_MARKERS: &[&str] = &["NaN", "nan", "NA", "N/A", "null", "NULL", "None", "<NA>"];

/// One raw row, cells aligned with [`RawTable::columns`].
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based line number in the backing resource (header is line 1).
    pub line: u64,
    pub cells: Vec<Option<String>>,
}

impl RawRow {
    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).and_then(|c| c.as_deref())
    }
}

/// An untyped table: header plus rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    /// Index of a named column.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Builds a table from string cells, normalizing null markers.
    /// Rows are numbered as if the header occupied line 1.
    pub fn from_cells<S: AsRef<str>>(columns: &[S], rows: &[Vec<S>]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.as_ref().trim().to_string()).collect(),
            rows: rows
                .iter()
                .enumerate()
                .map(|(i, cells)| RawRow {
                    line: i as u64 + 2,
                    cells: cells.iter().map(|c| normalize_cell(c.as_ref())).collect(),
                })
                .collect(),
        }
    }
}

/// Anything that can produce the raw record table.
///
/// Implementations must be side-effect free and report an absent backing
/// resource as [`LoadError::NotFound`].
pub trait TableSource {
    /// Human-readable location, used in logs.
    fn location(&self) -> String;

    fn read_table(&self) -> Result<RawTable, LoadError>;
}

impl TableSource for RawTable {
    fn location(&self) -> String {
        "<in-memory table>".to_string()
    }

    fn read_table(&self) -> Result<RawTable, LoadError> {
        Ok(self.clone())
    }
}

/// Reads the record table from a CSV file with a header row.
#[derive(Debug, Clone)]
pub struct CsvTableSource {
    path: PathBuf,
}

impl CsvTableSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TableSource for CsvTableSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn read_table(&self) -> Result<RawTable, LoadError> {
        let file = File::open(&self.path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => LoadError::NotFound {
                path: self.path.clone(),
            },
            _ => LoadError::Unreadable {
                path: self.path.clone(),
                source,
            },
        })?;

        let table = parse_csv(file)?;
        debug!(
            path = %self.path.display(),
            columns = table.columns.len(),
            rows = table.rows.len(),
            "Read record table"
        );
        Ok(table)
    }
}

/// Parses CSV data with a header row into a [`RawTable`].
///
/// Ragged rows and invalid UTF-8 are reported as [`LoadError::Malformed`].
pub fn parse_csv<R: Read>(reader: R) -> Result<RawTable, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns: Vec<String> = rdr
        .headers()
        .map_err(|e| LoadError::malformed(1, format!("unreadable header: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let fallback_line = i as u64 + 2;
        let record = result.map_err(|e| {
            let line = e.position().map(|p| p.line()).unwrap_or(fallback_line);
            LoadError::malformed(line, e.to_string())
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(fallback_line);
        rows.push(RawRow {
            line,
            cells: record.iter().map(normalize_cell).collect(),
        });
    }

    Ok(RawTable { columns, rows })
}

fn normalize_cell(raw: &str) -> Option<String> {
    let cell = raw.trim();
    if cell.is_empty() || NULL_MARKERS.contains(&cell) {
        None
    } else {
        Some(cell.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_parse_csv_header_and_rows() {
        let data = "filename,species,quality\nIMG_1,Osprey,0.8\nIMG_2,Kestrel,0.4\n";
        let table = parse_csv(data.as_bytes()).unwrap();

        assert_eq!(table.columns, vec!["filename", "species", "quality"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].get(1), Some("Osprey"));
        assert_eq!(table.rows[1].line, 3);
    }

    #[test]
    fn test_null_markers_become_missing() {
        let data = "a,b,c,d\n,NaN, x ,None\n";
        let table = parse_csv(data.as_bytes()).unwrap();
        let row = &table.rows[0];

        assert_eq!(row.get(0), None);
        assert_eq!(row.get(1), None);
        assert_eq!(row.get(2), Some("x"));
        assert_eq!(row.get(3), None);
    }

    #[test]
    fn test_ragged_row_is_malformed() {
        let data = "a,b\n1,2\n3\n";
        let err = parse_csv(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }), "got {err:?}");
    }

    #[test]
    fn test_quoted_fields() {
        let data = "filename,species\nIMG_1,\"Hawk, Red-tailed\"\n";
        let table = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(table.rows[0].get(1), Some("Hawk, Red-tailed"));
    }

    #[test]
    fn test_csv_source_missing_file() {
        let dir = tempdir().unwrap();
        let source = CsvTableSource::new(dir.path().join("absent.csv"));
        let err = source.read_table().unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }

    #[test]
    fn test_csv_source_reads_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "filename,quality").unwrap();
        writeln!(file, "IMG_9,0.5").unwrap();

        let table = CsvTableSource::new(&path).read_table().unwrap();
        assert_eq!(table.column("quality"), Some(1));
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_from_cells_numbers_rows_after_header() {
        let table = RawTable::from_cells(&["a"], &[vec!["1"], vec![""]]);
        assert_eq!(table.rows[0].line, 2);
        assert_eq!(table.rows[1].get(0), None);
    }
}
