//! UI task queue
//!
//! Deferred work is posted to a `calloop` channel living on the same loop as
//! the control. Posting never blocks and tasks run in FIFO order on a later
//! dispatch, outside whatever input or layout callback posted them.

use calloop::channel::{self, Channel, Sender};
use futures::channel::oneshot;

use crate::cancel::CancellationToken;
use crate::control::ResizeError;
use crate::scroll::Viewport;

/// Work deferred onto the UI loop
#[derive(Debug)]
pub(crate) enum UiTask {
    /// Turn accumulated wheel delta into a scroll request
    ApplyWheel,

    /// Copy a renderer viewport into the scrollbar
    ApplyViewport(Viewport),

    /// Second half of an async resize
    RecomputeMargins {
        cancel: CancellationToken,
        reply: oneshot::Sender<Result<(), ResizeError>>,
    },
}

/// Posting side of the UI queue
pub(crate) struct UiQueue {
    sender: Sender<UiTask>,
}

impl UiQueue {
    /// Create the queue and the event source to insert into the loop
    pub(crate) fn new() -> (Self, Channel<UiTask>) {
        let (sender, channel) = channel::channel();
        (Self { sender }, channel)
    }

    pub(crate) fn post(&self, task: UiTask) {
        if let Err(e) = self.sender.send(task) {
            tracing::warn!(task = ?e.0, "UI loop gone, dropping task");
        }
    }
}
