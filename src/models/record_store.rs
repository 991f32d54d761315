//! Typed, immutable view over the record table.
//!
//! `RecordStore` validates a [`RawTable`] into [`ImageRecord`]s once at load
//! time. Rows with a missing value in any column of the table, extra columns
//! included, are dropped entirely; a present but unparsable numeric field
//! fails the whole load.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, trace};

use crate::collaborators::{CsvTableSource, RawRow, RawTable, TableSource};
use crate::error::LoadError;
use crate::models::{ImageRecord, SceneId};

/// Default location of the record table, relative to the selected root.
pub const DEFAULT_TABLE_PATH: &str = ".kestrel/kestrel_database.csv";

const COL_FILENAME: &str = "filename";
const COL_EXPORT_PATH: &str = "export_path";
const COL_CROP_PATH: &str = "crop_path";
const COL_SPECIES: &str = "species";
const COL_SPECIES_CONFIDENCE: &str = "species_confidence";
const COL_QUALITY: &str = "quality";
const COL_SCENE: &str = "scene_count";

/// Resolved column positions for one table.
struct Columns {
    filename: usize,
    export_path: usize,
    crop_path: Option<usize>,
    species: usize,
    species_confidence: usize,
    quality: usize,
    scene: usize,
}

impl Columns {
    fn resolve(table: &RawTable) -> Result<Self, LoadError> {
        let required = |name: &str| {
            table
                .column(name)
                .ok_or_else(|| LoadError::malformed(1, format!("missing required column `{name}`")))
        };

        Ok(Self {
            filename: required(COL_FILENAME)?,
            export_path: required(COL_EXPORT_PATH)?,
            crop_path: table.column(COL_CROP_PATH),
            species: required(COL_SPECIES)?,
            species_confidence: required(COL_SPECIES_CONFIDENCE)?,
            quality: required(COL_QUALITY)?,
            scene: required(COL_SCENE)?,
        })
    }
}

/// The loaded record table.
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Vec<ImageRecord>,
    dropped_rows: usize,
    source: String,
}

impl RecordStore {
    /// Loads the table at `root/relative_table_path` through the CSV source.
    pub fn open_dir(root: &Path, relative_table_path: &Path) -> Result<Self, LoadError> {
        let source = CsvTableSource::new(root.join(relative_table_path));
        Self::load(&source)
    }

    /// Reads and validates a table from any source.
    pub fn load(source: &dyn TableSource) -> Result<Self, LoadError> {
        let table = source.read_table()?;
        let columns = Columns::resolve(&table)?;
        let width = table.columns.len();

        let mut records = Vec::with_capacity(table.rows.len());
        let mut dropped_rows = 0usize;

        for row in &table.rows {
            if (0..width).any(|idx| row.get(idx).is_none()) {
                trace!(line = row.line, "Dropping row with missing values");
                dropped_rows += 1;
                continue;
            }
            records.push(parse_record(row, &columns)?);
        }

        if records.is_empty() {
            return Err(LoadError::Empty {
                dropped: dropped_rows,
            });
        }

        info!(
            source = %source.location(),
            records = records.len(),
            dropped_rows,
            "Loaded record table"
        );

        Ok(Self {
            records,
            dropped_rows,
            source: source.location(),
        })
    }

    /// All records in table order.
    pub fn all_records(&self) -> &[ImageRecord] {
        &self.records
    }

    /// Every species name appearing in the table, regardless of confidence.
    pub fn distinct_species(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.species.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of rows discarded for missing values.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    pub fn source_location(&self) -> &str {
        &self.source
    }
}

fn parse_record(row: &RawRow, columns: &Columns) -> Result<ImageRecord, LoadError> {
    // Presence of every cell is checked by the caller.
    let cell = |idx: usize| row.get(idx).unwrap_or_default();

    let filename = cell(columns.filename).to_string();
    let species_confidence = parse_number(
        row,
        COL_SPECIES_CONFIDENCE,
        cell(columns.species_confidence),
    )?;
    let quality = parse_number(row, COL_QUALITY, cell(columns.quality))?;
    let scene_id = SceneId::parse(cell(columns.scene))
        .ok_or_else(|| LoadError::malformed(row.line, "blank scene_count"))?;

    Ok(ImageRecord {
        filename,
        export_path: PathBuf::from(cell(columns.export_path)),
        crop_path: columns
            .crop_path
            .and_then(|idx| row.get(idx))
            .map(PathBuf::from),
        species: cell(columns.species).to_string(),
        species_confidence,
        quality,
        scene_id,
    })
}

fn parse_number(row: &RawRow, field: &str, raw: &str) -> Result<f64, LoadError> {
    match raw.parse::<f64>() {
        Ok(v) if !v.is_nan() => Ok(v),
        _ => {
            debug!(line = row.line, field, raw, "Unparsable numeric field");
            Err(LoadError::malformed(
                row.line,
                format!("field `{field}` is not a number: {raw:?}"),
            ))
        }
    }
}
