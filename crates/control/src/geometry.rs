//! Geometry types and margin math
//!
//! The host lays the control out in device-independent units (DIPs) while the
//! terminal core measures itself in device pixels. Everything crossing that
//! boundary goes through a [`DpiScale`]:
//! - DIP -> device: multiply by the scale
//! - device -> DIP: divide by the scale

use serde::{Deserialize, Serialize};

/// Width and height, in DIPs or device pixels depending on the caller
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size { width: 0.0, height: 0.0 };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when neither axis has been established yet
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

/// Per-axis DPI scale of the display the control lives on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DpiScale {
    pub x: f64,
    pub y: f64,
}

impl DpiScale {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Same scale on both axes
    pub fn uniform(scale: f64) -> Self {
        Self { x: scale, y: scale }
    }
}

impl Default for DpiScale {
    fn default() -> Self {
        Self::uniform(1.0)
    }
}

/// Layout margin around the terminal panel, in DIPs
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Thickness {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Thickness {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self { left, top, right, bottom }
    }
}

/// Character grid dimensions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridSize {
    pub rows: u32,
    pub columns: u32,
}

impl GridSize {
    pub fn new(rows: u32, columns: u32) -> Self {
        Self { rows, columns }
    }
}

/// Which DPI axis converts the renderer height back to DIPs for the bottom margin.
///
/// `Horizontal` keeps the long-standing behavior of dividing the height by the
/// X scale. It only differs from `Vertical` on displays with non-square DPI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeightMarginScale {
    #[default]
    Horizontal,
    Vertical,
}

impl HeightMarginScale {
    fn pick(self, dpi: DpiScale) -> f64 {
        match self {
            HeightMarginScale::Horizontal => dpi.x,
            HeightMarginScale::Vertical => dpi.y,
        }
    }
}

/// Scale a DIP size to device pixels
pub fn scale_to_device(size: Size, dpi: DpiScale) -> Size {
    Size {
        width: size.width * dpi.x,
        height: size.height * dpi.y,
    }
}

/// Pixel size the renderer should occupy for a given host size.
///
/// The scrollbar track is reserved on both axes before scaling. Axes are
/// floored at zero for hosts narrower than the track.
pub fn renderer_target_size(host: Size, scrollbar_width: f64, dpi: DpiScale) -> Size {
    let available = Size {
        width: (host.width - scrollbar_width).max(0.0),
        height: (host.height - scrollbar_width).max(0.0),
    };
    scale_to_device(available, dpi)
}

/// Margin that pads the space the renderer's cell grid does not use.
///
/// `control` is in DIPs, `renderer` in device pixels. The renderer is anchored
/// top-left so all slack goes right and bottom. A zero renderer axis means the
/// renderer has not sized itself yet and contributes no margin.
pub fn compute_margins(
    control: Size,
    renderer: Size,
    dpi: DpiScale,
    scrollbar_width: f64,
    height_scale: HeightMarginScale,
) -> Thickness {
    let mut right = 0.0;
    let mut bottom = 0.0;

    if renderer.width != 0.0 {
        right = control.width - renderer.width / dpi.x;
    }

    if renderer.height != 0.0 {
        bottom = control.height - renderer.height / height_scale.pick(dpi);
    }

    right -= scrollbar_width;

    Thickness {
        left: 0.0,
        top: 0.0,
        right: right.max(0.0),
        bottom: bottom.max(0.0),
    }
}
