//! Cell metrics
//!
//! Maps between device pixels and grid cells for a given font size.

use control::{GridSize, Size};

/// Default font size in pixels
pub const DEFAULT_FONT_SIZE: f32 = 14.0;

/// Size of one character cell in device pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellMetrics {
    pub width: u32,
    pub height: u32,
}

impl CellMetrics {
    /// Approximate monospace metrics: advance ~0.6em, line height ~1.2em
    pub fn for_font_size(size: f32) -> Self {
        let size = if size.is_finite() && size > 0.0 { size } else { DEFAULT_FONT_SIZE };
        Self {
            width: ((size * 0.6).ceil() as u32).max(1),
            height: ((size * 1.2).ceil() as u32).max(1),
        }
    }

    /// Whole cells that fit in `size`, at least 1x1
    pub fn grid_for(&self, size: Size) -> GridSize {
        let columns = (size.width.max(0.0) / self.width as f64).floor() as u32;
        let rows = (size.height.max(0.0) / self.height as f64).floor() as u32;
        GridSize::new(rows.max(1), columns.max(1))
    }

    /// Pixel footprint of a grid
    pub fn pixel_size(&self, grid: GridSize) -> Size {
        Size::new(
            grid.columns as f64 * self.width as f64,
            grid.rows as f64 * self.height as f64,
        )
    }
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self::for_font_size(DEFAULT_FONT_SIZE)
    }
}
