//! Keyword filtering over scene species lists.

use crate::models::SceneSummary;

/// An ordered subset of scenes, borrowed from the aggregation output.
#[derive(Debug, Clone)]
pub struct FilteredSceneView<'a> {
    scenes: Vec<&'a SceneSummary>,
    total_scenes: usize,
}

impl<'a> FilteredSceneView<'a> {
    pub fn scenes(&self) -> &[&'a SceneSummary] {
        &self.scenes
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a SceneSummary> + '_ {
        self.scenes.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Number of scenes the view was filtered from.
    pub fn total_scenes(&self) -> usize {
        self.total_scenes
    }

    pub fn is_filtered(&self) -> bool {
        self.scenes.len() < self.total_scenes
    }

    /// Sum of image counts over the visible scenes.
    pub fn total_images(&self) -> usize {
        self.scenes.iter().map(|s| s.image_count()).sum()
    }

    /// Status bar text for the scene grid.
    pub fn status_line(&self) -> String {
        let mut status = format!(
            "Showing {} scenes with {} total images",
            self.len(),
            self.total_images()
        );
        if self.is_filtered() {
            status.push_str(&format!(" (filtered from {} scenes)", self.total_scenes));
        }
        status
    }
}

/// Keeps the scenes whose species list contains `keyword`.
///
/// The keyword is trimmed and matched as a case-insensitive substring of any
/// species name; a blank keyword keeps every scene. Relative order is
/// preserved.
pub fn filter_scenes<'a>(scenes: &'a [SceneSummary], keyword: &str) -> FilteredSceneView<'a> {
    let needle = keyword.trim().to_lowercase();

    let kept = if needle.is_empty() {
        scenes.iter().collect()
    } else {
        scenes
            .iter()
            .filter(|scene| {
                scene
                    .species_list()
                    .iter()
                    .any(|species| species.to_lowercase().contains(&needle))
            })
            .collect()
    };

    FilteredSceneView {
        scenes: kept,
        total_scenes: scenes.len(),
    }
}
