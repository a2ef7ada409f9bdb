//! Terminal core implementation using alacritty_terminal
//!
//! This crate provides a terminal core the control can embed: it owns the
//! VT state machine and scrollback, reports its viewport, and maps pixel
//! sizes to a character grid.

pub mod metrics;
pub mod state;

pub use metrics::CellMetrics;
pub use state::AlacrittyCore;
