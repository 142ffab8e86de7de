use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use crate::error::GridError;

/// Largest figure side, in pixels.
pub const MAX_FIGURE_SIDE: u32 = 16_384;
/// Largest figure area, in pixels.
pub const MAX_FIGURE_PIXELS: u64 = 64 * 1024 * 1024;

/// Layout parameters for [`plot_grid`](crate::grid::plot_grid).
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GridConfig {
    /// Grid side length; the figure shows `k * k` images.
    pub k: usize,
    /// Figure (width, height) in figure units.
    pub figsize: (f64, f64),
    /// Pixels per figure unit.
    pub dpi: f64,
    /// Fraction of each cell left blank on every side of its tile.
    pub spacing: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            k: 3,
            figsize: (10.0, 10.0),
            dpi: 100.0,
            spacing: 0.05,
        }
    }
}

impl GridConfig {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Self::default()
        }
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn with_figsize(mut self, width: f64, height: f64) -> Self {
        self.figsize = (width, height);
        self
    }

    pub fn with_dpi(mut self, dpi: f64) -> Self {
        self.dpi = dpi;
        self
    }

    /// Load a grid configuration from a JSON file. Missing fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Number of images the grid consumes.
    pub fn cells(&self) -> usize {
        self.k * self.k
    }

    /// Figure size in whole pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        let w = (self.figsize.0 * self.dpi).round() as u32;
        let h = (self.figsize.1 * self.dpi).round() as u32;
        (w, h)
    }

    pub fn validate(&self) -> Result<(), GridError> {
        if self.k == 0 {
            return Err(GridError::InvalidGrid("k must be at least 1".to_string()));
        }
        let (w, h) = self.figsize;
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            return Err(GridError::InvalidGrid(format!(
                "figsize must be positive, got ({}, {})",
                w, h
            )));
        }
        if !(self.dpi.is_finite() && self.dpi > 0.0) {
            return Err(GridError::InvalidGrid(format!(
                "dpi must be positive, got {}",
                self.dpi
            )));
        }
        if !(0.0..0.5).contains(&self.spacing) {
            return Err(GridError::InvalidGrid(format!(
                "spacing must lie in [0, 0.5), got {}",
                self.spacing
            )));
        }
        let (fw, fh) = ((w * self.dpi).round(), (h * self.dpi).round());
        let max_side = MAX_FIGURE_SIDE as f64;
        if fw > max_side || fh > max_side || fw * fh > MAX_FIGURE_PIXELS as f64 {
            return Err(GridError::InvalidGrid(format!(
                "a {}x{} px figure exceeds the {} px side / {} px area limit",
                fw, fh, MAX_FIGURE_SIDE, MAX_FIGURE_PIXELS
            )));
        }
        let (pw, ph) = self.pixel_size();
        if (pw as usize) < self.k || (ph as usize) < self.k {
            return Err(GridError::InvalidGrid(format!(
                "a {}x{} px figure cannot hold a {}x{} grid",
                pw, ph, self.k, self.k
            )));
        }
        Ok(())
    }
}
