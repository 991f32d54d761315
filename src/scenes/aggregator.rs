//! Groups records into scenes.
//!
//! Scenes keep the order in which their id first appears in the table, which
//! is the capture order users browse in. A single pass builds every group;
//! per-scene statistics are folded in as records arrive.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::EmptyInputError;
use crate::models::{ImageRecord, SceneId, SceneSummary};

/// Species detected at or below this confidence are left out of a scene's
/// species list (they still count towards its images).
pub const SPECIES_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// Running state for one scene while scanning the table.
struct SceneBuilder {
    scene_id: SceneId,
    images: Vec<ImageRecord>,
    representative: usize,
    species_list: Vec<String>,
    seen_species: HashSet<String>,
    max_quality: f64,
}

impl SceneBuilder {
    fn new(scene_id: SceneId) -> Self {
        Self {
            scene_id,
            images: Vec::new(),
            representative: 0,
            species_list: Vec::new(),
            seen_species: HashSet::new(),
            max_quality: f64::NEG_INFINITY,
        }
    }

    fn push(&mut self, record: &ImageRecord) {
        // Strictly greater: ties keep the first occurrence.
        if self.images.is_empty() || record.quality > self.max_quality {
            self.representative = self.images.len();
            self.max_quality = record.quality;
        }

        if record.species_confidence > SPECIES_CONFIDENCE_THRESHOLD
            && self.seen_species.insert(record.species.clone())
        {
            self.species_list.push(record.species.clone());
        }

        self.images.push(record.clone());
    }

    fn finish(self) -> SceneSummary {
        SceneSummary {
            scene_id: self.scene_id,
            images: self.images,
            representative: self.representative,
            species_list: self.species_list,
            max_quality: self.max_quality,
        }
    }
}

/// Groups `records` by scene id, in order of first appearance.
///
/// Fails only when `records` is empty.
pub fn aggregate(records: &[ImageRecord]) -> Result<Vec<SceneSummary>, EmptyInputError> {
    if records.is_empty() {
        return Err(EmptyInputError);
    }

    let mut index: HashMap<&SceneId, usize> = HashMap::new();
    let mut builders: Vec<SceneBuilder> = Vec::new();

    for record in records {
        let slot = *index.entry(&record.scene_id).or_insert_with(|| {
            builders.push(SceneBuilder::new(record.scene_id.clone()));
            builders.len() - 1
        });
        builders[slot].push(record);
    }

    let scenes: Vec<SceneSummary> = builders.into_iter().map(SceneBuilder::finish).collect();
    debug!(
        records = records.len(),
        scenes = scenes.len(),
        "Aggregated records into scenes"
    );
    Ok(scenes)
}
