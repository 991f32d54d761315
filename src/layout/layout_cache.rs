use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;
use tracing::trace;
use xxhash_rust::xxh3::xxh3_64;

use crate::layout::grid::{GridConfig, GridPlanner};

/// Maximum number of cached grid shapes to keep in memory.
const MAX_CACHE_ENTRIES: NonZeroUsize = match NonZeroUsize::new(8) {
    Some(n) => n,
    None => panic!("cache capacity must be non-zero"),
};

/// Key for the layout cache: the column count plus a hash of the item list.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
struct CacheKey {
    columns: usize,
    list_hash: u64,
}

/// Positions for every item of one list at one column count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridShape {
    pub columns: usize,
    pub rows: usize,
    /// `(row, col)` per item, in item order.
    pub positions: Vec<(usize, usize)>,
}

impl GridShape {
    fn build(columns: usize, item_count: usize) -> Self {
        let positions = (0..item_count).map(|i| (i / columns, i % columns)).collect();
        Self {
            columns,
            rows: item_count.div_ceil(columns),
            positions,
        }
    }

    pub fn item_count(&self) -> usize {
        self.positions.len()
    }

    /// Pairs `items` with their positions. `items` must be the list the
    /// shape was computed for.
    pub fn cells<'a, T>(
        &'a self,
        items: &'a [T],
    ) -> impl Iterator<Item = (&'a T, usize, usize)> + 'a {
        items
            .iter()
            .zip(self.positions.iter())
            .map(|(item, &(row, col))| (item, row, col))
    }
}

/// Layout cache for storing and retrieving grid shapes.
///
/// Shapes are keyed by (column count, list hash). Many container widths map to
/// the same column count, so a resize that does not cross a column boundary is
/// a cache hit and returns the very same `Arc<GridShape>`.
///
/// The list hash covers the ordered item keys, so a filter change or reload
/// misses the cache.
pub struct LayoutCache {
    cache: Mutex<LruCache<CacheKey, Arc<GridShape>>>,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            cache: Mutex::new(LruCache::new(MAX_CACHE_ENTRIES)),
        }
    }

    /// Computes a fast hash of the ordered item keys.
    ///
    /// Each key is length-prefixed so that `["ab", "c"]` and `["a", "bc"]`
    /// hash differently.
    pub fn compute_list_hash<K, I>(keys: I) -> u64
    where
        K: AsRef<[u8]>,
        I: IntoIterator<Item = K>,
    {
        let mut hasher_input = Vec::new();
        for key in keys {
            let key = key.as_ref();
            hasher_input.extend_from_slice(&(key.len() as u64).to_le_bytes());
            hasher_input.extend_from_slice(key);
        }
        xxh3_64(&hasher_input)
    }

    /// Returns the cached shape, or None on a miss or an item-count mismatch.
    pub fn get(&self, columns: usize, list_hash: u64, item_count: usize) -> Option<Arc<GridShape>> {
        let key = CacheKey { columns, list_hash };
        let mut cache = self.cache.lock();
        let shape = cache.get(&key)?;
        if shape.item_count() != item_count {
            return None;
        }
        Some(Arc::clone(shape))
    }

    /// Stores a shape, evicting the least recently used entry when full.
    pub fn set(&self, list_hash: u64, shape: Arc<GridShape>) {
        let key = CacheKey {
            columns: shape.columns,
            list_hash,
        };
        self.cache.lock().put(key, shape);
    }

    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Combines column planning with shape caching.
pub struct CachedGridPlanner {
    pub planner: GridPlanner,
    pub cache: LayoutCache,
}

impl CachedGridPlanner {
    pub fn new(config: GridConfig) -> Self {
        Self {
            planner: GridPlanner::new(config),
            cache: LayoutCache::new(),
        }
    }

    /// Computes the grid shape for `keys` at `container_width`.
    ///
    /// O(1) on a cache hit, O(n) on a miss.
    pub fn compute<K: AsRef<[u8]>>(&self, keys: &[K], container_width: f32) -> Arc<GridShape> {
        let columns = self.planner.columns_for(container_width);
        let list_hash = LayoutCache::compute_list_hash(keys);

        if let Some(shape) = self.cache.get(columns, list_hash, keys.len()) {
            trace!(columns, items = keys.len(), "Grid shape cache hit");
            return shape;
        }

        let shape = Arc::new(GridShape::build(columns, keys.len()));
        self.cache.set(list_hash, Arc::clone(&shape));
        trace!(columns, items = keys.len(), "Grid shape cache miss");
        shape
    }

    pub fn invalidate(&self) {
        self.cache.clear();
    }
}
