//! Scene hierarchy built from the flat record table.
//!
//! - `aggregator` - groups records into `SceneSummary` values, once per load
//! - `species_filter` - keyword filtering that borrows from the aggregation

pub mod aggregator;
pub mod species_filter;

pub use aggregator::{aggregate, SPECIES_CONFIDENCE_THRESHOLD};
pub use species_filter::{filter_scenes, FilteredSceneView};
