//! ShotCall Core - Foundation types for shoot scheduling
//!
//! This crate provides the leaf types used throughout ShotCall:
//! - Count intervals (`Interval`) with ordering and overlap rules
//! - Count text parsing and grid quantisation
//! - Geometric primitives for the grid editor
//! - Configuration and the shared error type

pub mod config;
pub mod count;
pub mod error;
pub mod geometry;
pub mod interval;

pub use config::{GridConfig, ShotCallConfig};
pub use count::{format_count, parse_count, parse_padding, quantize};
pub use error::{InstrumentId, Result, ShotCallError, ShotId};
pub use geometry::{Rect, Vec2};
pub use interval::Interval;

/// Grid defaults used when no configuration file is supplied.
pub mod defaults {
    /// Grid rows per one unit on the count axis (quarter counts).
    pub const CELLS_PER_COUNT: u32 = 4;

    /// Height in pixels of a single grid row.
    pub const VERTICAL_ELEMENT_SIZE: f64 = 10.0;

    /// Width in pixels of a single timeline column.
    pub const COLUMN_WIDTH: f64 = 120.0;

    /// Thickness of the grab zone along a block's edges.
    pub const EDGE_MARGIN: f64 = 5.0;
}
