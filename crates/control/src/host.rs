//! Host surface contract
//!
//! The host UI owns layout and presentation. The control reads DPI and size
//! from it and writes back the terminal panel margin and background.

use std::cell::RefCell;
use std::rc::Rc;

use crate::geometry::{DpiScale, Size, Thickness};
use crate::renderer::Rgb;

pub trait HostSurface {
    /// DPI scale of the display showing the control
    fn dpi_scale(&self) -> DpiScale;

    /// Current layout size of the control in DIPs
    fn actual_size(&self) -> Size;

    /// Whether the control is attached to a presentation surface
    fn is_presented(&self) -> bool;

    /// Margin of the panel containing the terminal
    fn set_terminal_margin(&mut self, margin: Thickness);

    /// Background painted behind the terminal panel (visible in the margins)
    fn set_background(&mut self, color: Rgb);
}

impl<T: HostSurface> HostSurface for Rc<RefCell<T>> {
    fn dpi_scale(&self) -> DpiScale {
        self.borrow().dpi_scale()
    }

    fn actual_size(&self) -> Size {
        self.borrow().actual_size()
    }

    fn is_presented(&self) -> bool {
        self.borrow().is_presented()
    }

    fn set_terminal_margin(&mut self, margin: Thickness) {
        self.borrow_mut().set_terminal_margin(margin)
    }

    fn set_background(&mut self, color: Rgb) {
        self.borrow_mut().set_background(color)
    }
}

/// Host event argument; set `handled` to stop further routing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoutedEvent {
    pub handled: bool,
}
