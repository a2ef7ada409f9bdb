//! Scroll synchronization
//!
//! Three inputs move the view: wheel deltas, scrollbar drags and the core's
//! own viewport reports. User input turns into a `user_scroll` request; the
//! core answers with a viewport report, which is the only thing that writes
//! the scrollbar range. Nothing here calls back into another entry point.

use super::TerminalControl;
use crate::dispatch::UiTask;
use crate::host::HostSurface;
use crate::renderer::TerminalCore;
use crate::scroll::Viewport;

impl<C: TerminalCore, H: HostSurface> TerminalControl<C, H> {
    /// Raw wheel movement over the scrollbar.
    ///
    /// Partial lines accumulate silently; a full line schedules the scroll
    /// on the UI queue.
    pub fn on_wheel_delta(&mut self, delta: i32) {
        if !self.wheel.push(delta) {
            tracing::trace!(delta, accumulated = self.wheel.accumulated(), "partial wheel line");
            return;
        }

        self.ui.post(UiTask::ApplyWheel);
    }

    /// Wheel movement the core saw over its render surface
    pub fn on_user_scrolled(&mut self, delta: i32) {
        self.on_wheel_delta(delta);
    }

    /// User dragged the scrollbar thumb or clicked the track
    pub fn on_scrollbar_drag(&mut self, new_value: f64) {
        self.scrollbar.set_value(new_value);

        let view_top = new_value as i32;
        tracing::debug!(view_top, "scrollbar drag");
        self.core.user_scroll(view_top);
    }

    /// The core's viewport moved
    pub fn on_terminal_scrolled(&mut self, viewport: Viewport) {
        self.ui.post(UiTask::ApplyViewport(viewport));
    }

    pub(super) fn apply_wheel(&mut self) {
        // An earlier task may already have consumed the delta
        if !self.wheel.has_line() {
            tracing::trace!(accumulated = self.wheel.accumulated(), "wheel already applied");
            return;
        }

        let lines = self.wheel.take_lines();
        self.scrollbar.set_value(self.scrollbar.value() + lines as f64);

        let view_top = self.scrollbar.value() as i32;
        tracing::debug!(lines, view_top, "wheel scroll");
        self.core.user_scroll(view_top);
    }

    pub(super) fn apply_viewport(&mut self, viewport: Viewport) {
        self.scrollbar.apply_viewport(viewport);
        tracing::trace!(
            view_top = viewport.view_top,
            view_height = viewport.view_height,
            buffer_size = viewport.buffer_size,
            "scrollbar synced to viewport"
        );
    }
}
