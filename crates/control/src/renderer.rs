//! Terminal core (renderer) contract
//!
//! The terminal core owns VT parsing, the character grid and the backend
//! connection. The control only talks to it through [`TerminalCore`] and
//! listens to it through a [`CoreEventSink`].

use std::cell::RefCell;
use std::rc::Rc;

use calloop::channel::Sender;

use crate::geometry::{GridSize, Size};
use crate::scroll::Viewport;

/// Notifications raised by a terminal core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreEvent {
    /// The core's viewport moved, for any reason
    TerminalScrolled(Viewport),

    /// The user turned the wheel over the render surface (raw delta units)
    UserScrolled(i32),
}

/// Where a core delivers its notifications.
///
/// Backed by a `calloop` channel, so sending marshals the event onto the
/// loop that owns the control. Cores on other threads may hold a clone.
#[derive(Clone)]
pub struct CoreEventSink {
    sender: Sender<CoreEvent>,
}

impl std::fmt::Debug for CoreEventSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreEventSink").finish_non_exhaustive()
    }
}

impl CoreEventSink {
    pub fn new(sender: Sender<CoreEvent>) -> Self {
        Self { sender }
    }

    pub fn terminal_scrolled(&self, viewport: Viewport) {
        self.send(CoreEvent::TerminalScrolled(viewport));
    }

    pub fn user_scrolled(&self, delta: i32) {
        self.send(CoreEvent::UserScrolled(delta));
    }

    fn send(&self, event: CoreEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!(?event, "core event dropped, control is gone");
        }
    }
}

/// Handle returned by [`TerminalCore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Registry of sinks for core implementations
#[derive(Debug, Default)]
pub struct Subscribers {
    next_id: u64,
    sinks: Vec<(SubscriptionId, CoreEventSink)>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, sink: CoreEventSink) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.sinks.push((id, sink));
        id
    }

    /// Returns false if the id was unknown
    pub fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.sinks.len();
        self.sinks.retain(|(sid, _)| *sid != id);
        self.sinks.len() != before
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn terminal_scrolled(&self, viewport: Viewport) {
        for (_, sink) in &self.sinks {
            sink.terminal_scrolled(viewport);
        }
    }

    pub fn user_scrolled(&self, delta: i32) {
        for (_, sink) in &self.sinks {
            sink.user_scrolled(delta);
        }
    }
}

/// Backend connection feeding the terminal (process, pipe, socket, ...)
pub trait Connection {
    fn start(&mut self);

    fn write_input(&mut self, data: &str);

    fn resize(&mut self, rows: u32, columns: u32);

    fn close(&mut self);

    /// Output received since the last call, empty when none
    fn drain_output(&mut self) -> Vec<u8>;
}

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Decode a COLORREF (0x00BBGGRR)
    pub fn from_colorref(value: u32) -> Self {
        Self {
            r: (value & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: ((value >> 16) & 0xff) as u8,
        }
    }
}

/// Cursor shape requested by a theme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CursorStyle {
    #[default]
    Block,
    Underline,
    Bar,
}

/// Colours handed to the terminal core. All colours are COLORREF (0x00BBGGRR).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalTheme {
    pub default_background: u32,
    pub default_foreground: u32,
    pub default_selection_background: u32,
    /// Selection opacity, 0..=255
    pub selection_background_alpha: u8,
    pub cursor_style: CursorStyle,
    pub color_table: [u32; 16],
}

impl TerminalTheme {
    pub fn background_rgb(&self) -> Rgb {
        Rgb::from_colorref(self.default_background)
    }
}

impl Default for TerminalTheme {
    fn default() -> Self {
        // Campbell
        Self {
            default_background: 0x000c_0c0c,
            default_foreground: 0x00cc_cccc,
            default_selection_background: 0x00ff_ffff,
            selection_background_alpha: 0x7f,
            cursor_style: CursorStyle::Block,
            color_table: [
                0x000c_0c0c, 0x001f_0fc5, 0x000e_a113, 0x0000_9cc1,
                0x00da_3700, 0x0098_1788, 0x00dd_963a, 0x00cc_cccc,
                0x0076_7676, 0x0056_48e7, 0x000c_c616, 0x00a5_f1f9,
                0x00ff_783b, 0x009e_00b4, 0x00d6_d661, 0x00f2_f2f2,
            ],
        }
    }
}

/// Capabilities the control needs from a terminal core.
///
/// Pixel sizes are device pixels. Every call is treated as infallible; a
/// core that can fail handles that internally.
pub trait TerminalCore {
    fn set_connection(&mut self, connection: Box<dyn Connection>);

    /// Resize the character grid
    fn resize(&mut self, rows: u32, columns: u32);

    /// Resize to fit a pixel size, returning the resulting grid
    fn resize_to_pixels(&mut self, size: Size) -> GridSize;

    /// Pixel footprint of the current grid; zero before the first resize
    fn size(&self) -> Size;

    fn rows(&self) -> u32;

    fn columns(&self) -> u32;

    fn auto_fill(&self) -> bool;

    fn set_auto_fill(&mut self, auto_fill: bool);

    /// Pixel space the host currently offers the core
    fn set_control_size(&mut self, size: Size);

    /// Selected text, clearing the selection. Empty when nothing is selected.
    fn selected_text(&mut self) -> String;

    fn set_theme(&mut self, theme: &TerminalTheme, font_family: &str, font_size: i16);

    /// Move the viewport so `view_top` is the first visible line
    fn user_scroll(&mut self, view_top: i32);

    /// Resize if the offered space now fits more cells than the grid uses
    fn raise_resized_if_draw_space_increased(&mut self);

    /// Take keyboard focus
    fn focus(&mut self);

    fn subscribe(&mut self, sink: CoreEventSink) -> SubscriptionId;

    fn unsubscribe(&mut self, id: SubscriptionId);
}

impl<T: TerminalCore> TerminalCore for Rc<RefCell<T>> {
    fn set_connection(&mut self, connection: Box<dyn Connection>) {
        self.borrow_mut().set_connection(connection)
    }

    fn resize(&mut self, rows: u32, columns: u32) {
        self.borrow_mut().resize(rows, columns)
    }

    fn resize_to_pixels(&mut self, size: Size) -> GridSize {
        self.borrow_mut().resize_to_pixels(size)
    }

    fn size(&self) -> Size {
        self.borrow().size()
    }

    fn rows(&self) -> u32 {
        self.borrow().rows()
    }

    fn columns(&self) -> u32 {
        self.borrow().columns()
    }

    fn auto_fill(&self) -> bool {
        self.borrow().auto_fill()
    }

    fn set_auto_fill(&mut self, auto_fill: bool) {
        self.borrow_mut().set_auto_fill(auto_fill)
    }

    fn set_control_size(&mut self, size: Size) {
        self.borrow_mut().set_control_size(size)
    }

    fn selected_text(&mut self) -> String {
        self.borrow_mut().selected_text()
    }

    fn set_theme(&mut self, theme: &TerminalTheme, font_family: &str, font_size: i16) {
        self.borrow_mut().set_theme(theme, font_family, font_size)
    }

    fn user_scroll(&mut self, view_top: i32) {
        self.borrow_mut().user_scroll(view_top)
    }

    fn raise_resized_if_draw_space_increased(&mut self) {
        self.borrow_mut().raise_resized_if_draw_space_increased()
    }

    fn focus(&mut self) {
        self.borrow_mut().focus()
    }

    fn subscribe(&mut self, sink: CoreEventSink) -> SubscriptionId {
        self.borrow_mut().subscribe(sink)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.borrow_mut().unsubscribe(id)
    }
}
