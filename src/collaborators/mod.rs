//! Seams to the capabilities the presentation layer provides.
//!
//! - `table_source` - raw record table access, with a CSV implementation
//! - `image_probe` - tri-state image availability for tiles and crops
//! - `editor` - launching a base file in an external program

pub mod editor;
pub mod image_probe;
pub mod table_source;

pub use editor::{CommandLauncher, EditorLauncher, DEFAULT_EDITOR};
pub use image_probe::{DecodingProbe, ImageAvailability, ImageProbe, TileKind};
pub use table_source::{parse_csv, CsvTableSource, RawRow, RawTable, TableSource};
