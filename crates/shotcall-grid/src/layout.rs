//! Grid geometry and the mapping between intervals and grid placements.

use serde::{Deserialize, Serialize};
use shotcall_core::{GridConfig, Interval, Rect, Result, Vec2};

/// A grid cell under a scene point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub row: u32,
    pub column: usize,
    /// The point lies in the lower half of the cell.
    pub bottom_half: bool,
}

/// Where a block sits on the grid, in whole rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPlacement {
    pub column: usize,
    pub row: u32,
    /// Always at least one row.
    pub row_span: u32,
}

impl GridPlacement {
    /// Place an interval on the grid.
    ///
    /// `row = round(begin * cells)`, `span = max(1, round((end - begin) * cells))`.
    /// Intervals reaching before zero (padded camera shots) are clipped to the grid:
    /// the block starts at row 0 and only covers the part at or after count 0.
    pub fn for_interval(interval: Interval, column: usize, cells_per_count: u32) -> Self {
        let cells = f64::from(cells_per_count.max(1));
        let visible_begin = interval.begin().max(0.0);
        let row = (visible_begin * cells).round() as u32;
        let row_span = ((interval.end() - visible_begin) * cells).round().max(1.0) as u32;
        Self {
            column,
            row,
            row_span,
        }
    }

    /// Begin count: `row / cells`.
    pub fn begin_count(self, cells_per_count: u32) -> f64 {
        f64::from(self.row) / f64::from(cells_per_count.max(1))
    }

    /// End count: `begin + span / cells`.
    pub fn end_count(self, cells_per_count: u32) -> f64 {
        self.begin_count(cells_per_count) + f64::from(self.row_span) / f64::from(cells_per_count.max(1))
    }

    /// Convert back to model units.
    pub fn to_interval(self, cells_per_count: u32) -> Result<Interval> {
        Interval::new(
            self.begin_count(cells_per_count),
            self.end_count(cells_per_count),
        )
    }
}

/// Scene-space layout of one grid: where it starts, how many columns and rows it has.
#[derive(Debug, Clone, PartialEq)]
pub struct GridGeometry {
    /// Scene position of the grid's top-left corner.
    pub origin: Vec2,
    pub columns: usize,
    pub rows: u32,
    pub config: GridConfig,
}

impl GridGeometry {
    pub fn new(origin: Vec2, columns: usize, rows: u32, config: GridConfig) -> Self {
        Self {
            origin,
            columns,
            rows,
            config,
        }
    }

    /// Scene rectangle covered by the whole grid.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.origin.x,
            self.origin.y,
            self.columns as f64 * self.config.column_width,
            f64::from(self.rows) * self.config.vertical_element_size,
        )
    }

    /// Grid cell under a scene point, or `None` outside the grid.
    pub fn cell_at(&self, point: Vec2) -> Option<GridCell> {
        if !self.bounds().contains(point) {
            return None;
        }
        let local = point - self.origin;
        let row_height = self.config.vertical_element_size;
        let column = (local.x / self.config.column_width).floor() as usize;
        let row = (local.y / row_height).floor() as u32;
        if column >= self.columns || row >= self.rows {
            return None;
        }
        let within = local.y - f64::from(row) * row_height;
        Some(GridCell {
            row,
            column,
            bottom_half: within > row_height / 2.0,
        })
    }

    /// Scene rectangle of a placed block.
    pub fn placement_rect(&self, placement: GridPlacement) -> Rect {
        Rect::new(
            self.origin.x + placement.column as f64 * self.config.column_width,
            self.origin.y + f64::from(placement.row) * self.config.vertical_element_size,
            self.config.column_width,
            f64::from(placement.row_span) * self.config.vertical_element_size,
        )
    }
}
