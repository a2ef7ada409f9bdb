//! Terminal control
//!
//! Embeds an external terminal core in a host surface, keeps a scrollbar in
//! sync with the core's viewport, and reconciles the host's pixel geometry
//! (including DPI scaling) with the core's character grid.

pub mod cancel;
pub mod config;
pub mod control;
mod dispatch;
pub mod geometry;
pub mod host;
pub mod renderer;
pub mod scroll;

pub use cancel::{CancellationSource, CancellationToken};
pub use config::ControlConfig;
pub use control::{ControlError, ResizeCompletion, ResizeError, TerminalControl};
pub use geometry::{DpiScale, GridSize, HeightMarginScale, Size, Thickness};
pub use host::{HostSurface, RoutedEvent};
pub use renderer::{
    Connection, CoreEvent, CoreEventSink, CursorStyle, Rgb, Subscribers, SubscriptionId,
    TerminalCore, TerminalTheme,
};
pub use scroll::{Scrollbar, Viewport, WheelAccumulator};
