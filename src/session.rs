//! The currently loaded table and its scene hierarchy.
//!
//! A [`Snapshot`] is built completely before it is published, and readers
//! hold an `Arc` to the snapshot they started with. Reloading swaps the
//! pointer, so nobody observes a half-built table; a failed load leaves the
//! previous snapshot in place.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::collaborators::TableSource;
use crate::config::BrowserConfig;
use crate::error::LoadError;
use crate::models::{RecordStore, SceneId, SceneSummary};
use crate::navigation::{DetailViews, NavigationModel};
use crate::scenes::{aggregate, filter_scenes, FilteredSceneView};

/// One loaded table: records plus their scenes, read-only once built.
#[derive(Debug)]
pub struct Snapshot {
    root: PathBuf,
    store: RecordStore,
    scenes: Vec<SceneSummary>,
}

impl Snapshot {
    pub fn build(root: impl Into<PathBuf>, store: RecordStore) -> Result<Self, LoadError> {
        // A loaded store always has records; map the aggregator's only
        // failure onto the load taxonomy anyway.
        let scenes = aggregate(store.all_records()).map_err(|_| LoadError::Empty {
            dropped: store.dropped_rows(),
        })?;
        Ok(Self {
            root: root.into(),
            store,
            scenes,
        })
    }

    /// Directory base files are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn scenes(&self) -> &[SceneSummary] {
        &self.scenes
    }

    pub fn filter(&self, keyword: &str) -> FilteredSceneView<'_> {
        filter_scenes(&self.scenes, keyword)
    }

    pub fn find_scene(&self, scene_id: &SceneId) -> Option<&SceneSummary> {
        self.scenes.iter().find(|s| s.scene_id() == scene_id)
    }

    pub fn navigation(&self) -> NavigationModel {
        NavigationModel::new(self.root.clone())
    }

    pub fn detail_views(&self) -> DetailViews {
        DetailViews::new(self.root.clone())
    }
}

/// Owns the published snapshot.
pub struct BrowserSession {
    config: BrowserConfig,
    current: RwLock<Option<Arc<Snapshot>>>,
}

impl BrowserSession {
    pub fn new(config: BrowserConfig) -> Self {
        Self {
            config,
            current: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    /// Loads `<root>/<table_path>` and publishes it.
    pub fn load_dir(&self, root: &Path) -> Result<Arc<Snapshot>, LoadError> {
        let result = RecordStore::open_dir(root, &self.config.table_path);
        self.publish(root, result)
    }

    /// Loads from an arbitrary table source and publishes it.
    pub fn load_from(
        &self,
        root: &Path,
        source: &dyn TableSource,
    ) -> Result<Arc<Snapshot>, LoadError> {
        let result = RecordStore::load(source);
        self.publish(root, result)
    }

    fn publish(
        &self,
        root: &Path,
        store: Result<RecordStore, LoadError>,
    ) -> Result<Arc<Snapshot>, LoadError> {
        let snapshot = store
            .and_then(|store| Snapshot::build(root, store))
            .map_err(|e| {
                warn!(root = %root.display(), error = %e, "Load failed");
                e
            })?;

        let snapshot = Arc::new(snapshot);
        *self.current.write() = Some(Arc::clone(&snapshot));
        info!(
            root = %root.display(),
            records = snapshot.store().len(),
            scenes = snapshot.scenes().len(),
            "Published snapshot"
        );
        Ok(snapshot)
    }

    /// The published snapshot, if any load has succeeded.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.current.read().clone()
    }
}
