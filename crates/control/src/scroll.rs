//! Scrollbar model and wheel quantization
//!
//! The scrollbar describes a window `[value, value + viewport_size]` over a
//! total extent `[minimum, maximum + viewport_size]`. Only renderer viewport
//! reports change the range; user input only moves `value`.

/// Viewport reported by the terminal core
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    /// First visible buffer line
    pub view_top: i32,
    /// Number of visible lines
    pub view_height: i32,
    /// Total scrollable lines
    pub buffer_size: i32,
}

impl Viewport {
    pub fn new(view_top: i32, view_height: i32, buffer_size: i32) -> Self {
        Self { view_top, view_height, buffer_size }
    }

    /// Largest valid `view_top`
    pub fn max_top(&self) -> i32 {
        self.buffer_size - self.view_height
    }
}

/// Range model for the vertical scrollbar widget.
///
/// Setters coerce like a range widget: `maximum >= minimum` and
/// `minimum <= value <= maximum` hold after every call.
#[derive(Debug, Clone, PartialEq)]
pub struct Scrollbar {
    minimum: f64,
    maximum: f64,
    value: f64,
    viewport_size: f64,
    width: f64,
}

impl Scrollbar {
    pub fn new(width: f64) -> Self {
        Self {
            minimum: 0.0,
            maximum: 0.0,
            value: 0.0,
            viewport_size: 0.0,
            width,
        }
    }

    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn viewport_size(&self) -> f64 {
        self.viewport_size
    }

    /// Width of the scrollbar track in DIPs
    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn set_minimum(&mut self, minimum: f64) {
        self.minimum = minimum;
        self.maximum = self.maximum.max(minimum);
        self.value = self.coerce(self.value);
    }

    pub fn set_maximum(&mut self, maximum: f64) {
        self.maximum = maximum.max(self.minimum);
        self.value = self.coerce(self.value);
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = self.coerce(value);
    }

    pub fn set_viewport_size(&mut self, viewport_size: f64) {
        self.viewport_size = viewport_size.max(0.0);
    }

    /// Overwrite the whole range from a renderer viewport report
    pub fn apply_viewport(&mut self, viewport: Viewport) {
        self.set_minimum(0.0);
        self.set_maximum(viewport.max_top() as f64);
        self.set_value(viewport.view_top as f64);
        self.set_viewport_size(viewport.view_height as f64);
    }

    fn coerce(&self, value: f64) -> f64 {
        value.clamp(self.minimum, self.maximum)
    }
}

/// Accumulates raw wheel deltas until they amount to at least one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WheelAccumulator {
    accumulated: i32,
    line_threshold: i32,
}

impl WheelAccumulator {
    /// `delta_per_notch` raw units make one notch, which scrolls `lines_per_notch` lines
    pub fn new(delta_per_notch: u32, lines_per_notch: u32) -> Self {
        let threshold = delta_per_notch / lines_per_notch.max(1);
        Self {
            accumulated: 0,
            line_threshold: threshold.clamp(1, i32::MAX as u32) as i32,
        }
    }

    /// Raw units that make up one line
    pub fn line_threshold(&self) -> i32 {
        self.line_threshold
    }

    /// Raw units not yet converted to lines
    pub fn accumulated(&self) -> i32 {
        self.accumulated
    }

    /// Add a delta; returns true once at least one full line is pending
    pub fn push(&mut self, delta: i32) -> bool {
        self.accumulated = self.accumulated.saturating_add(delta);
        self.has_line()
    }

    pub fn has_line(&self) -> bool {
        self.accumulated.unsigned_abs() >= self.line_threshold as u32
    }

    /// Convert everything accumulated into lines and reset.
    ///
    /// Wheel-up deltas are positive but move the view toward smaller line
    /// numbers, hence the sign flip. Division truncates toward zero.
    pub fn take_lines(&mut self) -> i32 {
        let lines = (self.accumulated / self.line_threshold).saturating_neg();
        self.accumulated = 0;
        lines
    }
}
