use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// Configuration for a responsive tile grid.
///
/// Items are placed row-major in equal-width columns. The column count grows
/// with the available width, one column per `min_item_width` pixels, up to
/// `target_columns`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Maximum number of columns (default: 5)
    pub target_columns: usize,
    /// Narrowest tile width in pixels before a column is dropped (default: 280)
    pub min_item_width: f32,
    /// Container width taken by margins and the scrollbar (default: 40)
    pub margin: f32,
}

impl GridConfig {
    /// Scene overview grid.
    pub const SCENES: Self = Self {
        target_columns: 5,
        min_item_width: 280.0,
        margin: 40.0,
    };

    /// Image grid inside an opened scene.
    pub const SCENE_IMAGES: Self = Self {
        target_columns: 3,
        min_item_width: 200.0,
        margin: 40.0,
    };
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::SCENES
    }
}

/// Number of columns that fit in `available_width`.
///
/// Returns 1 when even a single minimum-width tile does not fit (including
/// non-finite widths), otherwise `floor(available_width / min_item_width)`
/// capped at `target_columns`. Never returns 0.
pub fn plan_columns(available_width: f32, min_item_width: f32, target_columns: usize) -> usize {
    let target = target_columns.max(1);
    if min_item_width <= 0.0 || min_item_width.is_nan() {
        return target;
    }
    if !(available_width >= min_item_width) {
        return 1;
    }
    let fit = (available_width / min_item_width).floor();
    if fit >= target as f32 {
        target
    } else {
        (fit as usize).max(1)
    }
}

/// One placed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell<T> {
    pub item: T,
    pub row: usize,
    pub col: usize,
}

/// Assigns row-major grid positions to `items`.
///
/// Fails with [`GridError::InvalidColumnCount`] when `columns` is 0.
pub fn place_items<T, I>(items: I, columns: usize) -> Result<Vec<GridCell<T>>, GridError>
where
    I: IntoIterator<Item = T>,
{
    if columns < 1 {
        return Err(GridError::InvalidColumnCount(columns));
    }
    Ok(place_row_major(items, columns))
}

fn place_row_major<T, I>(items: I, columns: usize) -> Vec<GridCell<T>>
where
    I: IntoIterator<Item = T>,
{
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| GridCell {
            item,
            row: i / columns,
            col: i % columns,
        })
        .collect()
}

/// The result of one layout pass. Rebuilt on every layout-affecting event.
#[derive(Debug, Clone, PartialEq)]
pub struct GridPlacement<T> {
    pub columns: usize,
    pub rows: usize,
    pub cells: Vec<GridCell<T>>,
}

/// Plans grids for one [`GridConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GridPlanner {
    pub config: GridConfig,
}

impl GridPlanner {
    pub fn new(config: GridConfig) -> Self {
        Self { config }
    }

    /// Width left for tiles once margins are taken out of the container.
    pub fn available_width(&self, container_width: f32) -> f32 {
        (container_width - self.config.margin).max(0.0)
    }

    pub fn columns_for(&self, container_width: f32) -> usize {
        plan_columns(
            self.available_width(container_width),
            self.config.min_item_width,
            self.config.target_columns,
        )
    }

    /// Places `items` for a container of `container_width` pixels.
    pub fn plan<T, I>(&self, items: I, container_width: f32) -> GridPlacement<T>
    where
        I: IntoIterator<Item = T>,
    {
        let columns = self.columns_for(container_width);
        let cells = place_row_major(items, columns);
        GridPlacement {
            columns,
            rows: cells.len().div_ceil(columns),
            cells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_columns_reference_points() {
        assert_eq!(plan_columns(1000.0, 200.0, 4), 4);
        assert_eq!(plan_columns(150.0, 200.0, 4), 1);
        assert_eq!(plan_columns(450.0, 200.0, 4), 2);
    }

    #[test]
    fn test_plan_columns_exact_fit() {
        assert_eq!(plan_columns(200.0, 200.0, 4), 1);
        assert_eq!(plan_columns(799.9, 200.0, 4), 3);
        assert_eq!(plan_columns(800.0, 200.0, 4), 4);
    }

    #[test]
    fn test_plan_columns_never_zero() {
        assert_eq!(plan_columns(0.0, 200.0, 4), 1);
        assert_eq!(plan_columns(-50.0, 200.0, 4), 1);
        assert_eq!(plan_columns(f32::NAN, 200.0, 4), 1);
        assert_eq!(plan_columns(1000.0, 200.0, 0), 1);
        assert_eq!(plan_columns(1000.0, 0.0, 3), 3);
        assert_eq!(plan_columns(f32::INFINITY, 200.0, 6), 6);
    }

    #[test]
    fn test_place_items_row_major() {
        let cells = place_items(0..7, 3).unwrap();
        let positions: Vec<(usize, usize)> = cells.iter().map(|c| (c.row, c.col)).collect();
        assert_eq!(
            positions,
            vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2), (2, 0)]
        );
        let order: Vec<i32> = cells.iter().map(|c| c.item).collect();
        assert_eq!(order, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn test_place_items_rejects_zero_columns() {
        assert_eq!(
            place_items(["a", "b"], 0),
            Err(GridError::InvalidColumnCount(0))
        );
    }

    #[test]
    fn test_place_items_empty() {
        let cells = place_items(Vec::<u8>::new(), 2).unwrap();
        assert!(cells.is_empty());
    }

    #[test]
    fn test_planner_subtracts_margin() {
        let planner = GridPlanner::new(GridConfig::SCENES);
        // 1440 - 40 = 1400 -> five 280px tiles
        assert_eq!(planner.columns_for(1440.0), 5);
        // 1439 - 40 = 1399 -> four
        assert_eq!(planner.columns_for(1439.0), 4);
        assert_eq!(planner.columns_for(10.0), 1);
    }

    #[test]
    fn test_planner_plan_counts_rows() {
        let planner = GridPlanner::new(GridConfig::SCENE_IMAGES);
        let placement = planner.plan(0..7, 700.0);
        assert_eq!(placement.columns, 3);
        assert_eq!(placement.rows, 3);
        assert_eq!(placement.cells.len(), 7);

        let empty = planner.plan(Vec::<u8>::new(), 700.0);
        assert_eq!(empty.rows, 0);
    }
}
