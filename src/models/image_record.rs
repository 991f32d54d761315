use std::fmt;
use std::path::{Path, PathBuf};

/// Identifier of the capture session a record belongs to.
///
/// The `scene_count` column is numeric in most tables, but some exports carry
/// free-form labels, so both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SceneId {
    Number(i64),
    Label(String),
}

impl SceneId {
    /// Parses a raw `scene_count` cell.
    ///
    /// Integers and integral floats (`"3.0"`, written by dataframe exports of
    /// columns that once held nulls) become numbers; anything else is kept as
    /// a trimmed label. Returns `None` for a blank cell.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(n) = raw.parse::<i64>() {
            return Some(Self::Number(n));
        }
        if let Ok(f) = raw.parse::<f64>() {
            if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                return Some(Self::Number(f as i64));
            }
        }
        Some(Self::Label(raw.to_string()))
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Label(s) => f.write_str(s),
        }
    }
}

impl From<i64> for SceneId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for SceneId {
    fn from(s: &str) -> Self {
        Self::Label(s.to_string())
    }
}

/// One row of the record table: a detected wildlife photo.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRecord {
    pub filename: String,
    pub export_path: PathBuf,
    pub crop_path: Option<PathBuf>,
    pub species: String,
    pub species_confidence: f64,
    pub quality: f64,
    pub scene_id: SceneId,
}

impl ImageRecord {
    /// Path of the viewable rendition used for tiles.
    pub fn export_path(&self) -> &Path {
        &self.export_path
    }

    /// Path of the detail crop, if the table provides one.
    pub fn crop_path(&self) -> Option<&Path> {
        self.crop_path.as_deref()
    }

    /// Tile caption: file name and quality.
    pub fn caption(&self) -> String {
        format!("{}  Q: {:.3}", self.filename, self.quality)
    }

    pub fn tooltip(&self) -> String {
        format!(
            "File: {}\nSpecies: {}\nQuality: {:.3}",
            self.filename, self.species, self.quality
        )
    }
}

#[cfg(test)]
pub(crate) fn make_record(
    filename: &str,
    species: &str,
    confidence: f64,
    quality: f64,
    scene: i64,
) -> ImageRecord {
    ImageRecord {
        filename: filename.to_string(),
        export_path: PathBuf::from(format!("/exports/{filename}.jpg")),
        crop_path: None,
        species: species.to_string(),
        species_confidence: confidence,
        quality,
        scene_id: SceneId::Number(scene),
    }
}
