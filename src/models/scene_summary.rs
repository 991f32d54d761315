use crate::models::{ImageRecord, SceneId};

/// A burst of images sharing one scene id, with its derived statistics.
///
/// Built once per load by the aggregator and never mutated afterwards;
/// filtered views borrow summaries instead of copying them.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSummary {
    pub(crate) scene_id: SceneId,
    pub(crate) images: Vec<ImageRecord>,
    pub(crate) representative: usize,
    pub(crate) species_list: Vec<String>,
    pub(crate) max_quality: f64,
}

impl SceneSummary {
    pub fn scene_id(&self) -> &SceneId {
        &self.scene_id
    }

    /// Member records in table order.
    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    /// The highest-quality record, used as the scene thumbnail.
    pub fn representative_image(&self) -> &ImageRecord {
        &self.images[self.representative]
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Species detected with confidence above the threshold, first-seen order.
    pub fn species_list(&self) -> &[String] {
        &self.species_list
    }

    pub fn max_quality(&self) -> f64 {
        self.max_quality
    }

    /// Caption listing the first `preview` species, e.g. `"Osprey, Heron + 2 more"`.
    pub fn species_caption(&self, preview: usize) -> String {
        let shown = preview.min(self.species_list.len());
        let mut caption = self.species_list[..shown].join(", ");
        let hidden = self.species_list.len() - shown;
        if hidden > 0 {
            caption.push_str(&format!(" + {hidden} more"));
        }
        caption
    }

    /// Tile heading plus statistics line.
    pub fn headline(&self) -> String {
        format!(
            "Scene {}  |  {} images  |  Max Quality: {:.3}",
            self.scene_id,
            self.image_count(),
            self.max_quality
        )
    }
}
