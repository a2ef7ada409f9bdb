//! Terminal state and management
//!
//! Wraps alacritty_terminal as a [`TerminalCore`]: connection output feeds
//! the VT parser, the grid follows pixel and cell resizes, and viewport
//! movement is reported to subscribers.

use std::sync::mpsc;

use alacritty_terminal::event::{Event, EventListener};
use alacritty_terminal::grid::{Dimensions, Scroll};
use alacritty_terminal::index::{Column, Line, Point, Side};
use alacritty_terminal::selection::{Selection, SelectionType};
use alacritty_terminal::term::Config as TermConfig;
use alacritty_terminal::term::Term;
use alacritty_terminal::vte::ansi;

use control::{
    Connection, CoreEventSink, GridSize, Size, Subscribers, SubscriptionId, TerminalCore,
    TerminalTheme, Viewport,
};

use crate::metrics::{CellMetrics, DEFAULT_FONT_SIZE};

/// Scrollback kept above the visible screen
const SCROLLBACK_LINES: usize = 10_000;

/// Event listener for terminal events
pub struct TerminalEventProxy {
    sender: mpsc::Sender<Event>,
}

impl EventListener for TerminalEventProxy {
    fn send_event(&self, event: Event) {
        let _ = self.sender.send(event);
    }
}

/// Simple size struct implementing Dimensions
struct GridDimensions {
    cols: usize,
    rows: usize,
}

impl Dimensions for GridDimensions {
    fn total_lines(&self) -> usize {
        self.rows
    }

    fn screen_lines(&self) -> usize {
        self.rows
    }

    fn columns(&self) -> usize {
        self.cols
    }
}

impl From<GridSize> for GridDimensions {
    fn from(grid: GridSize) -> Self {
        Self {
            cols: grid.columns.max(1) as usize,
            rows: grid.rows.max(1) as usize,
        }
    }
}

/// A terminal core backed by alacritty_terminal
pub struct AlacrittyCore {
    /// Terminal state from alacritty
    term: Term<TerminalEventProxy>,

    /// VTE parser
    parser: ansi::Processor,

    /// Events raised by the terminal (query responses, title, bell, ...)
    events: mpsc::Receiver<Event>,

    /// Backend feeding the terminal
    connection: Option<Box<dyn Connection>>,

    subscribers: Subscribers,

    metrics: CellMetrics,

    theme: TerminalTheme,

    font_family: String,

    /// Whether a resize has established the pixel footprint.
    /// Until then `size()` reports zero.
    sized: bool,

    auto_fill: bool,

    /// Pixel space the host offers, zero until told
    control_size: Size,

    /// Last viewport reported to subscribers
    last_viewport: Viewport,
}

impl AlacrittyCore {
    /// Create a core with the default font size
    pub fn new(grid: GridSize) -> Self {
        Self::with_font_size(grid, DEFAULT_FONT_SIZE)
    }

    pub fn with_font_size(grid: GridSize, font_size: f32) -> Self {
        let (sender, events) = mpsc::channel();
        let config = TermConfig {
            scrolling_history: SCROLLBACK_LINES,
            ..TermConfig::default()
        };
        let term = Term::new(config, &GridDimensions::from(grid), TerminalEventProxy { sender });

        let mut core = Self {
            term,
            parser: ansi::Processor::new(),
            events,
            connection: None,
            subscribers: Subscribers::new(),
            metrics: CellMetrics::for_font_size(font_size),
            theme: TerminalTheme::default(),
            font_family: String::new(),
            sized: false,
            auto_fill: false,
            control_size: Size::ZERO,
            last_viewport: Viewport::default(),
        };
        core.last_viewport = core.viewport();
        core
    }

    pub fn metrics(&self) -> CellMetrics {
        self.metrics
    }

    pub fn theme(&self) -> &TerminalTheme {
        &self.theme
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn is_focused(&self) -> bool {
        self.term.is_focused
    }

    /// Current viewport over the scrollback
    pub fn viewport(&self) -> Viewport {
        let grid = self.term.grid();
        let history = grid.history_size() as i32;
        let screen = self.term.screen_lines() as i32;
        Viewport {
            view_top: history - grid.display_offset() as i32,
            view_height: screen,
            buffer_size: history + screen,
        }
    }

    /// Feed pending connection output through the VT parser.
    ///
    /// Returns the number of bytes processed.
    pub fn process_output(&mut self) -> usize {
        let Some(connection) = self.connection.as_mut() else {
            return 0;
        };

        let data = connection.drain_output();
        for byte in &data {
            self.parser.advance(&mut self.term, *byte);
        }

        // Process terminal events (e.g., PtyWrite for terminal query responses)
        for event in self.events.try_iter() {
            if let Event::PtyWrite(text) = event {
                tracing::debug!(len = text.len(), "writing terminal response to connection");
                if let Some(connection) = self.connection.as_mut() {
                    connection.write_input(&text);
                }
            }
        }

        if !data.is_empty() {
            self.report_viewport_if_moved();
        }
        data.len()
    }

    /// Feed bytes straight into the VT parser, bypassing the connection
    pub fn inject_bytes(&mut self, data: &[u8]) {
        for byte in data {
            self.parser.advance(&mut self.term, *byte);
        }
        self.report_viewport_if_moved();
    }

    /// Send keyboard input to the backend
    pub fn send_input(&mut self, data: &str) {
        match self.connection.as_mut() {
            Some(connection) => connection.write_input(data),
            None => tracing::debug!(len = data.len(), "no connection, input dropped"),
        }
    }

    /// Wheel turned over the render surface
    pub fn wheel(&mut self, delta: i32) {
        self.subscribers.user_scrolled(delta);
    }

    /// Select from `start` to `end` (column, screen row), inclusive
    pub fn select(&mut self, start: (usize, i32), end: (usize, i32)) {
        let start = Point::new(Line(start.1), Column(start.0));
        let end = Point::new(Line(end.1), Column(end.0));
        let mut selection = Selection::new(SelectionType::Simple, start, Side::Left);
        selection.update(end, Side::Right);
        self.term.selection = Some(selection);
    }

    pub fn has_selection(&self) -> bool {
        self.term.selection.is_some()
    }

    /// Text of one screen row, trailing blanks trimmed
    pub fn row_text(&self, row: i32) -> String {
        let grid = self.term.grid();
        let line = &grid[Line(row)];
        let text: String = line
            .into_iter()
            .map(|cell| if cell.c == '\0' { ' ' } else { cell.c })
            .collect();
        text.trim_end().to_string()
    }

    fn grid_size(&self) -> GridSize {
        GridSize::new(self.term.screen_lines() as u32, self.term.columns() as u32)
    }

    fn resize_grid(&mut self, grid: GridSize) {
        let grid = GridSize::new(grid.rows.max(1), grid.columns.max(1));
        let unchanged = self.sized && grid == self.grid_size();
        self.sized = true;
        if unchanged {
            return;
        }

        tracing::debug!(rows = grid.rows, columns = grid.columns, "resizing terminal grid");
        self.term.resize(GridDimensions::from(grid));

        if let Some(connection) = self.connection.as_mut() {
            connection.resize(grid.rows, grid.columns);
        }

        self.report_viewport_if_moved();
    }

    fn report_viewport(&mut self) {
        let viewport = self.viewport();
        self.last_viewport = viewport;
        self.subscribers.terminal_scrolled(viewport);
    }

    fn report_viewport_if_moved(&mut self) {
        if self.viewport() != self.last_viewport {
            self.report_viewport();
        }
    }
}

impl TerminalCore for AlacrittyCore {
    fn set_connection(&mut self, mut connection: Box<dyn Connection>) {
        if let Some(mut old) = self.connection.take() {
            old.close();
        }

        let grid = self.grid_size();
        connection.start();
        connection.resize(grid.rows, grid.columns);
        self.connection = Some(connection);
    }

    fn resize(&mut self, rows: u32, columns: u32) {
        self.resize_grid(GridSize::new(rows, columns));
    }

    fn resize_to_pixels(&mut self, size: Size) -> GridSize {
        let grid = self.metrics.grid_for(size);
        self.resize_grid(grid);
        self.grid_size()
    }

    fn size(&self) -> Size {
        if !self.sized {
            return Size::ZERO;
        }
        self.metrics.pixel_size(self.grid_size())
    }

    fn rows(&self) -> u32 {
        self.term.screen_lines() as u32
    }

    fn columns(&self) -> u32 {
        self.term.columns() as u32
    }

    fn auto_fill(&self) -> bool {
        self.auto_fill
    }

    fn set_auto_fill(&mut self, auto_fill: bool) {
        self.auto_fill = auto_fill;
    }

    fn set_control_size(&mut self, size: Size) {
        self.control_size = size;
        if self.auto_fill && !size.is_empty() {
            self.resize_to_pixels(size);
        }
    }

    fn selected_text(&mut self) -> String {
        let text = self.term.selection_to_string().unwrap_or_default();
        self.term.selection = None;
        text
    }

    fn set_theme(&mut self, theme: &TerminalTheme, font_family: &str, font_size: i16) {
        self.theme = theme.clone();
        self.font_family = font_family.to_string();
        self.metrics = CellMetrics::for_font_size(font_size as f32);
        tracing::debug!(font_family, font_size, ?self.metrics, "theme applied");
    }

    fn user_scroll(&mut self, view_top: i32) {
        let history = self.term.grid().history_size() as i32;
        let target_offset = history - view_top.clamp(0, history);
        let delta = target_offset - self.term.grid().display_offset() as i32;

        if delta != 0 {
            self.term.scroll_display(Scroll::Delta(delta));
        }

        // Always answer so the scrollbar settles on the clamped position
        self.report_viewport();
    }

    fn raise_resized_if_draw_space_increased(&mut self) {
        if self.control_size.is_empty() {
            return;
        }

        let fits = self.metrics.grid_for(self.control_size);
        let current = self.grid_size();
        if fits.rows > current.rows || fits.columns > current.columns {
            tracing::debug!(
                rows = fits.rows,
                columns = fits.columns,
                "draw space increased, resizing"
            );
            self.resize_grid(fits);
        }
    }

    fn focus(&mut self) {
        self.term.is_focused = true;
    }

    fn subscribe(&mut self, sink: CoreEventSink) -> SubscriptionId {
        self.subscribers.add(sink)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.remove(id);
    }
}

impl Drop for AlacrittyCore {
    fn drop(&mut self) {
        if let Some(mut connection) = self.connection.take() {
            connection.close();
        }
    }
}
