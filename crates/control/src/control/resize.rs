//! Geometry reconciliation
//!
//! Keeps the core's pixel footprint and the terminal panel margin consistent
//! as the host resizes or its DPI changes.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::oneshot;

use super::{ResizeError, TerminalControl};
use crate::cancel::CancellationToken;
use crate::dispatch::UiTask;
use crate::geometry::{self, GridSize, Size, Thickness};
use crate::host::HostSurface;
use crate::renderer::TerminalCore;

/// Resolves once the margin step of [`TerminalControl::resize_async`] ran
#[derive(Debug)]
#[must_use = "the margin step runs regardless, but its outcome is only visible by awaiting"]
pub struct ResizeCompletion {
    done: oneshot::Receiver<Result<(), ResizeError>>,
}

impl Future for ResizeCompletion {
    type Output = Result<(), ResizeError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.done)
            .poll(cx)
            .map(|reply| reply.unwrap_or(Err(ResizeError::Detached)))
    }
}

impl<C: TerminalCore, H: HostSurface> TerminalControl<C, H> {
    /// Host layout size changed (DIPs)
    pub fn on_host_size_changed(&mut self, new_size: Size) {
        let dpi = self.host.dpi_scale();
        let target = geometry::renderer_target_size(new_size, self.scrollbar.width(), dpi);

        tracing::debug!(
            width = new_size.width,
            height = new_size.height,
            target_width = target.width,
            target_height = target.height,
            "host size changed"
        );
        self.core.set_control_size(target);

        if !self.core.auto_fill() {
            let margin = self.compute_margins(Some(new_size));
            self.host.set_terminal_margin(margin);

            // A margin change swallows the size notification that would
            // normally grow the core, so probe once explicitly.
            self.core.raise_resized_if_draw_space_increased();
        }
    }

    /// Margin around the terminal panel for `control_size` (DIPs), or for the
    /// control's current size when `None`
    pub fn compute_margins(&self, control_size: Option<Size>) -> Thickness {
        let control = control_size.unwrap_or_else(|| self.host.actual_size());

        geometry::compute_margins(
            control,
            self.core.size(),
            self.host.dpi_scale(),
            self.scrollbar.width(),
            self.config.geometry.height_margin_scale,
        )
    }

    /// Resize the grid, then recompute margins on the UI loop.
    ///
    /// The core resize happens immediately and is never rolled back. If
    /// `cancel` fires before the margin step runs, the step is skipped and
    /// the completion yields [`ResizeError::Cancelled`].
    pub fn resize_async(&mut self, rows: u32, columns: u32, cancel: CancellationToken) -> ResizeCompletion {
        tracing::debug!(rows, columns, "resizing terminal grid");
        self.core.resize(rows, columns);

        let (reply, done) = oneshot::channel();
        self.ui.post(UiTask::RecomputeMargins { cancel, reply });
        ResizeCompletion { done }
    }

    /// Resize to a render size in DIPs and report the resulting grid.
    ///
    /// Synchronous, for drag-resize where the answer is needed right away.
    pub fn trigger_resize(&mut self, render_size: Size) -> GridSize {
        let size = geometry::scale_to_device(render_size, self.host.dpi_scale());
        self.core.resize_to_pixels(size);

        GridSize::new(self.core.rows(), self.core.columns())
    }

    pub(super) fn finish_resize(
        &mut self,
        cancel: CancellationToken,
        reply: oneshot::Sender<Result<(), ResizeError>>,
    ) {
        let result = if cancel.is_cancelled() {
            tracing::debug!("resize cancelled, margins unchanged");
            Err(ResizeError::Cancelled)
        } else {
            let margin = self.compute_margins(None);
            self.host.set_terminal_margin(margin);
            Ok(())
        };

        // Nobody may be awaiting the completion
        let _ = reply.send(result);
    }
}
