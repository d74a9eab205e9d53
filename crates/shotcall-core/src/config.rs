//! Configuration for a shoot schedule and its grid editor.
//!
//! Stored as JSON. Every field has a default, so a partial file (or none at
//! all) yields a usable configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::defaults;
use crate::error::{Result, ShotCallError};

/// Grid geometry constants supplied by the layout layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Grid rows per one unit of the count axis.
    pub cells_per_count: u32,
    /// Height in pixels of one grid row.
    pub vertical_element_size: f64,
    /// Width in pixels of one timeline column.
    pub column_width: f64,
    /// Grab zone along block edges that starts a resize instead of a move.
    pub edge_margin: f64,
}

impl GridConfig {
    /// Check that the geometry can be used for snapping.
    pub fn validate(&self) -> Result<()> {
        if self.cells_per_count == 0 {
            return Err(ShotCallError::Config(
                "cells_per_count must be at least 1".into(),
            ));
        }
        if !(self.vertical_element_size.is_finite() && self.vertical_element_size > 0.0) {
            return Err(ShotCallError::Config(format!(
                "vertical_element_size must be positive, got {}",
                self.vertical_element_size
            )));
        }
        if !(self.column_width.is_finite() && self.column_width > 0.0) {
            return Err(ShotCallError::Config(format!(
                "column_width must be positive, got {}",
                self.column_width
            )));
        }
        if !(self.edge_margin.is_finite() && self.edge_margin >= 0.0) {
            return Err(ShotCallError::Config(format!(
                "edge_margin must be non-negative, got {}",
                self.edge_margin
            )));
        }
        Ok(())
    }

    /// Height in pixels of one full count.
    #[inline]
    pub fn count_height(&self) -> f64 {
        self.vertical_element_size * f64::from(self.cells_per_count)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cells_per_count: defaults::CELLS_PER_COUNT,
            vertical_element_size: defaults::VERTICAL_ELEMENT_SIZE,
            column_width: defaults::COLUMN_WIDTH,
            edge_margin: defaults::EDGE_MARGIN,
        }
    }
}

/// Top-level configuration: camera tracks and grid geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotCallConfig {
    /// One camera timeline is created per entry, in order.
    pub cameras: Vec<String>,
    pub grid: GridConfig,
}

impl ShotCallConfig {
    /// Deserialize from JSON bytes and validate.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let config: Self = serde_json::from_slice(data)
            .map_err(|e| ShotCallError::Serialization(format!("Invalid config: {}", e)))?;
        config.grid.validate()?;
        Ok(config)
    }

    /// Load configuration from a file path.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let config = Self::from_json(&data)?;
        tracing::info!(
            path = %path.display(),
            cameras = config.cameras.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Serialize to pretty JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| ShotCallError::Serialization(format!("Failed to serialize config: {}", e)))
    }
}

impl Default for ShotCallConfig {
    fn default() -> Self {
        Self {
            cameras: vec!["Camera 1".to_string(), "Camera 2".to_string()],
            grid: GridConfig::default(),
        }
    }
}
