//! The terminal control
//!
//! Owns the scrollbar model, the wheel accumulator and a share of the
//! terminal core. Behavior is split by responsibility:
//! - `scroll_sync`: wheel deltas, scrollbar drags and core viewport reports
//! - `resize`: host size changes, margins and grid resizes
//!
//! Everything runs on the `calloop` loop the control was registered with.
//! Core notifications and deferred work arrive as channel messages on that
//! loop, so no entry point ever calls another re-entrantly.

mod resize;
mod scroll_sync;

use calloop::channel::Event as ChannelEvent;
use calloop::LoopHandle;
use thiserror::Error;

use crate::config::ControlConfig;
use crate::dispatch::{UiQueue, UiTask};
use crate::host::{HostSurface, RoutedEvent};
use crate::renderer::{Connection, CoreEvent, CoreEventSink, SubscriptionId, TerminalCore, TerminalTheme};
use crate::scroll::{Scrollbar, WheelAccumulator};

pub use resize::ResizeCompletion;

#[derive(Error, Debug)]
pub enum ControlError {
    #[error("failed to register with event loop: {0}")]
    EventLoop(#[from] calloop::Error),
}

/// Why an async resize finished without recomputing margins
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeError {
    #[error("resize cancelled before margins were recomputed")]
    Cancelled,

    #[error("control dropped before margins were recomputed")]
    Detached,
}

/// A terminal core embedded in a host surface with a vertical scrollbar
pub struct TerminalControl<C: TerminalCore, H: HostSurface> {
    /// Terminal core (shared with the caller)
    core: C,

    /// Host surface the control is laid out in
    host: H,

    config: ControlConfig,

    /// Scrollbar widget model, only written by the scroll synchronizer
    scrollbar: Scrollbar,

    /// Wheel delta not yet converted to lines
    wheel: WheelAccumulator,

    /// Deferred work queue on the UI loop
    ui: UiQueue,

    /// Our registration with the core's notifications
    subscription: SubscriptionId,
}

impl<C, H> TerminalControl<C, H>
where
    C: TerminalCore + 'static,
    H: HostSurface + 'static,
{
    /// Create a control and register its queues with the UI loop.
    ///
    /// The loop's data must be the control itself; pass it to
    /// `EventLoop::dispatch` so deferred work and core notifications run.
    pub fn new(
        mut core: C,
        host: H,
        config: ControlConfig,
        handle: &LoopHandle<'_, Self>,
    ) -> Result<Self, ControlError> {
        let (ui, ui_channel) = UiQueue::new();
        handle
            .insert_source(ui_channel, |event, _, control: &mut Self| {
                if let ChannelEvent::Msg(task) = event {
                    control.run_ui_task(task);
                }
            })
            .map_err(|e| e.error)?;

        let (sender, core_channel) = calloop::channel::channel();
        handle
            .insert_source(core_channel, |event, _, control: &mut Self| {
                if let ChannelEvent::Msg(event) = event {
                    control.handle_core_event(event);
                }
            })
            .map_err(|e| e.error)?;

        let subscription = core.subscribe(CoreEventSink::new(sender));
        core.set_auto_fill(config.auto_fill);

        tracing::debug!(
            auto_fill = config.auto_fill,
            scrollbar_width = config.scrollbar_width,
            "terminal control created"
        );

        Ok(Self {
            scrollbar: Scrollbar::new(config.scrollbar_width),
            wheel: WheelAccumulator::new(config.wheel.delta_per_notch, config.wheel.lines_per_notch),
            core,
            host,
            config,
            ui,
            subscription,
        })
    }
}

impl<C: TerminalCore, H: HostSurface> TerminalControl<C, H> {
    /// Character rows currently available to the terminal
    pub fn rows(&self) -> u32 {
        self.core.rows()
    }

    /// Character columns currently available to the terminal
    pub fn columns(&self) -> u32 {
        self.core.columns()
    }

    /// Whether the core resizes itself to fill the control
    pub fn auto_fill(&self) -> bool {
        self.core.auto_fill()
    }

    pub fn set_auto_fill(&mut self, auto_fill: bool) {
        self.core.set_auto_fill(auto_fill);
    }

    /// Attach the terminal to a backend connection
    pub fn set_connection(&mut self, connection: Box<dyn Connection>) {
        self.core.set_connection(connection);
    }

    /// Set colours and font. Does nothing while the control is not presented.
    pub fn set_theme(&mut self, theme: &TerminalTheme, font_family: &str, font_size: i16) {
        if !self.host.is_presented() {
            tracing::debug!("no presentation surface, theme not applied");
            return;
        }

        self.core.set_theme(theme, font_family, font_size);
        self.host.set_background(theme.background_rgb());
    }

    /// Selected text, clearing the selection. Empty if nothing is selected.
    pub fn selected_text(&mut self) -> String {
        self.core.selected_text()
    }

    /// Keyboard focus reached the control: hand it to the core
    pub fn on_got_focus(&mut self, event: &mut RoutedEvent) {
        event.handled = true;
        self.core.focus();
    }

    pub fn scrollbar(&self) -> &Scrollbar {
        &self.scrollbar
    }

    /// Raw wheel units carried toward the next line
    pub fn accumulated_delta(&self) -> i32 {
        self.wheel.accumulated()
    }

    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    pub fn core(&self) -> &C {
        &self.core
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    fn handle_core_event(&mut self, event: CoreEvent) {
        match event {
            CoreEvent::TerminalScrolled(viewport) => self.on_terminal_scrolled(viewport),
            CoreEvent::UserScrolled(delta) => self.on_user_scrolled(delta),
        }
    }

    fn run_ui_task(&mut self, task: UiTask) {
        match task {
            UiTask::ApplyWheel => self.apply_wheel(),
            UiTask::ApplyViewport(viewport) => self.apply_viewport(viewport),
            UiTask::RecomputeMargins { cancel, reply } => self.finish_resize(cancel, reply),
        }
    }
}

impl<C: TerminalCore, H: HostSurface> Drop for TerminalControl<C, H> {
    fn drop(&mut self) {
        self.core.unsubscribe(self.subscription);
    }
}
