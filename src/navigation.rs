//! Scene detail navigation.
//!
//! Opening a scene lists its images best-first; selecting an image resolves
//! its base file against the root directory the table was loaded from. The
//! root is passed in explicitly rather than kept in process-wide state.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::models::{ImageRecord, SceneId, SceneSummary};

/// Images of `scene` sorted by quality, best first. Equal qualities keep
/// table order.
pub fn images_by_quality(scene: &SceneSummary) -> Vec<ImageRecord> {
    let mut images = scene.images().to_vec();
    images.sort_by(|a, b| b.quality.total_cmp(&a.quality));
    images
}

/// The detail panel for one selected image.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub record: ImageRecord,
    /// `root.join(record.filename)`; existence is not checked.
    pub resolved_base_file: PathBuf,
}

impl DetailView {
    fn resolve(root: &Path, record: &ImageRecord) -> Self {
        Self {
            record: record.clone(),
            resolved_base_file: root.join(&record.filename),
        }
    }

    /// Text lines for the detail panel.
    pub fn info_lines(&self) -> Vec<String> {
        vec![
            format!("File: {}", self.record.filename),
            format!("Species: {}", self.record.species),
            format!("Species Confidence: {:.3}", self.record.species_confidence),
            format!("Quality Score: {:.3}", self.record.quality),
            format!("Scene: {}", self.record.scene_id),
        ]
    }
}

#[derive(Debug, Clone)]
struct OpenScene {
    scene_id: SceneId,
    images: Vec<ImageRecord>,
}

/// Tracks the scene (if any) currently open for detail viewing.
#[derive(Debug, Clone)]
pub struct NavigationModel {
    root: PathBuf,
    open: Option<OpenScene>,
}

impl NavigationModel {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            open: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Opens `scene`, replacing any open scene, and returns its images
    /// sorted by quality descending.
    pub fn open_scene(&mut self, scene: &SceneSummary) -> &[ImageRecord] {
        debug!(scene = %scene.scene_id(), images = scene.image_count(), "Opening scene");
        let open = self.open.insert(OpenScene {
            scene_id: scene.scene_id().clone(),
            images: images_by_quality(scene),
        });
        &open.images
    }

    /// Closes the open scene. Does nothing when no scene is open.
    pub fn close_scene(&mut self) {
        if let Some(open) = self.open.take() {
            debug!(scene = %open.scene_id, "Closed scene");
        }
    }

    pub fn open_scene_id(&self) -> Option<&SceneId> {
        self.open.as_ref().map(|o| &o.scene_id)
    }

    /// Images of the open scene, best first; empty when nothing is open.
    pub fn open_images(&self) -> &[ImageRecord] {
        match &self.open {
            Some(open) => &open.images,
            None => &[],
        }
    }

    pub fn select_image(&self, record: &ImageRecord) -> DetailView {
        DetailView::resolve(&self.root, record)
    }
}

/// Detail views currently open, keyed by scene id.
///
/// Each entry lives until it is closed; there is no other owner.
#[derive(Debug, Clone)]
pub struct DetailViews {
    root: PathBuf,
    views: HashMap<SceneId, NavigationModel>,
}

impl DetailViews {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            views: HashMap::new(),
        }
    }

    /// Opens a view for `scene`, or returns the existing one.
    pub fn open(&mut self, scene: &SceneSummary) -> &mut NavigationModel {
        let root = &self.root;
        self.views
            .entry(scene.scene_id().clone())
            .or_insert_with(|| {
                let mut nav = NavigationModel::new(root.clone());
                nav.open_scene(scene);
                nav
            })
    }

    pub fn get(&self, scene_id: &SceneId) -> Option<&NavigationModel> {
        self.views.get(scene_id)
    }

    /// Closes the view for `scene_id`. Returns false if none was open.
    pub fn close(&mut self, scene_id: &SceneId) -> bool {
        match self.views.remove(scene_id) {
            Some(mut nav) => {
                nav.close_scene();
                true
            }
            None => false,
        }
    }

    /// Closes every view, e.g. when a new table replaces the current one.
    pub fn close_all(&mut self) {
        self.views.clear();
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::image_record::make_record;
    use crate::scenes::aggregate;

    fn scene(records: Vec<ImageRecord>) -> SceneSummary {
        aggregate(&records).unwrap().remove(0)
    }

    fn names(images: &[ImageRecord]) -> Vec<&str> {
        images.iter().map(|r| r.filename.as_str()).collect()
    }

    #[test]
    fn test_open_scene_sorts_by_quality() {
        let s = scene(vec![
            make_record("a", "Osprey", 0.9, 0.2, 1),
            make_record("b", "Osprey", 0.9, 0.9, 1),
            make_record("c", "Osprey", 0.9, 0.5, 1),
        ]);
        let mut nav = NavigationModel::new("/photos");
        assert_eq!(names(nav.open_scene(&s)), vec!["b", "c", "a"]);
        assert_eq!(nav.open_scene_id(), Some(&SceneId::Number(1)));
    }

    #[test]
    fn test_open_scene_stable_on_ties() {
        let s = scene(vec![
            make_record("first", "Osprey", 0.9, 0.6, 1),
            make_record("top", "Osprey", 0.9, 0.8, 1),
            make_record("second", "Osprey", 0.9, 0.6, 1),
        ]);
        let mut nav = NavigationModel::new("/photos");
        assert_eq!(names(nav.open_scene(&s)), vec!["top", "first", "second"]);
    }

    #[test]
    fn test_close_scene() {
        let s = scene(vec![make_record("a", "Osprey", 0.9, 0.2, 1)]);
        let mut nav = NavigationModel::new("/photos");

        nav.close_scene();
        assert!(nav.open_scene_id().is_none());

        nav.open_scene(&s);
        assert_eq!(nav.open_images().len(), 1);
        nav.close_scene();
        assert!(nav.open_scene_id().is_none());
        assert!(nav.open_images().is_empty());
    }

    #[test]
    fn test_select_image_joins_root() {
        let record = make_record("IMG_0042.CR3", "Osprey", 0.9, 0.2, 1);
        let nav = NavigationModel::new("/photos/2024-05-01");
        let view = nav.select_image(&record);

        assert_eq!(
            view.resolved_base_file,
            PathBuf::from("/photos/2024-05-01/IMG_0042.CR3")
        );
        assert_eq!(view.record, record);
    }

    #[test]
    fn test_detail_info_lines() {
        let record = make_record("IMG_7", "Osprey", 0.91234, 0.5, 3);
        let view = NavigationModel::new("/p").select_image(&record);
        let lines = view.info_lines();

        assert_eq!(lines[0], "File: IMG_7");
        assert_eq!(lines[2], "Species Confidence: 0.912");
        assert_eq!(lines[3], "Quality Score: 0.500");
        assert_eq!(lines[4], "Scene: 3");
    }

    #[test]
    fn test_detail_views_keyed_by_scene() {
        let scenes = aggregate(&[
            make_record("a", "Osprey", 0.9, 0.2, 1),
            make_record("b", "Heron", 0.9, 0.4, 2),
        ])
        .unwrap();
        let mut views = DetailViews::new("/photos");

        views.open(&scenes[0]);
        views.open(&scenes[1]);
        views.open(&scenes[0]);
        assert_eq!(views.len(), 2);
        assert_eq!(
            views.get(&SceneId::Number(2)).unwrap().open_images()[0].filename,
            "b"
        );

        assert!(views.close(&SceneId::Number(1)));
        assert!(!views.close(&SceneId::Number(1)));
        assert_eq!(views.len(), 1);

        views.close_all();
        assert!(views.is_empty());
    }
}
