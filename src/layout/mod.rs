//! Responsive tile-grid layout.
//!
//! - `grid` - column planning and row-major placement
//! - `layout_cache` - grid shapes cached by column count and item list
//! - `debounce` - coalesces resize bursts into one relayout
//! - `responsive` - a grid handle wiring the three together

pub mod debounce;
pub mod grid;
pub mod layout_cache;
pub mod responsive;

pub use debounce::{RelayoutDebouncer, DEFAULT_RELAYOUT_WINDOW};
pub use grid::{place_items, plan_columns, GridCell, GridConfig, GridPlacement, GridPlanner};
pub use layout_cache::{CachedGridPlanner, GridShape, LayoutCache};
pub use responsive::ResponsiveGrid;
