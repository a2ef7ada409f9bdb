//! Recording terminal core for tests

use control::{
    Connection, CoreEventSink, GridSize, Size, Subscribers, SubscriptionId, TerminalCore,
    TerminalTheme, Viewport,
};

/// Cell size used by [`FakeCore`] (device pixels)
pub const FAKE_CELL_WIDTH: f64 = 8.0;
pub const FAKE_CELL_HEIGHT: f64 = 16.0;

/// A call the control made into the core
#[derive(Debug, Clone, PartialEq)]
pub enum CoreCall {
    SetConnection,
    Resize { rows: u32, columns: u32 },
    ResizeToPixels(Size),
    SetAutoFill(bool),
    SetControlSize(Size),
    SelectedText,
    SetTheme { background: u32, font_family: String, font_size: i16 },
    UserScroll(i32),
    RaiseResizedIfDrawSpaceIncreased,
    Focus,
}

/// Terminal core that records every call and emits events on demand.
///
/// With a viewport set, `user_scroll` behaves like a real core: it clamps
/// the request, moves the viewport and reports it back.
pub struct FakeCore {
    calls: Vec<CoreCall>,
    subscribers: Subscribers,
    grid: GridSize,
    pixel_size: Size,
    auto_fill: bool,
    focused: bool,
    selection: Option<String>,
    viewport: Option<Viewport>,
    connection: Option<Box<dyn Connection>>,
}

impl Default for FakeCore {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeCore {
    /// A core that has not sized itself yet
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            subscribers: Subscribers::new(),
            grid: GridSize::default(),
            pixel_size: Size::ZERO,
            auto_fill: false,
            focused: false,
            selection: None,
            viewport: None,
            connection: None,
        }
    }

    pub fn calls(&self) -> &[CoreCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Every `user_scroll` target, in order
    pub fn user_scrolls(&self) -> Vec<i32> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                CoreCall::UserScroll(top) => Some(*top),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, call: &CoreCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    /// Force the reported pixel size without touching the grid
    pub fn set_pixel_size(&mut self, size: Size) {
        self.pixel_size = size;
    }

    pub fn set_grid(&mut self, grid: GridSize) {
        self.grid = grid;
    }

    pub fn select(&mut self, text: &str) {
        self.selection = Some(text.to_string());
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn has_connection(&self) -> bool {
        self.connection.is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Move the viewport on the core's own initiative (new output, ...)
    pub fn scroll_to(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
        self.subscribers.terminal_scrolled(viewport);
    }

    /// Wheel turned over the render surface
    pub fn wheel(&mut self, delta: i32) {
        self.subscribers.user_scrolled(delta);
    }

    fn resize_grid(&mut self, grid: GridSize) {
        self.grid = grid;
        self.pixel_size = Size::new(
            grid.columns as f64 * FAKE_CELL_WIDTH,
            grid.rows as f64 * FAKE_CELL_HEIGHT,
        );
    }
}

impl TerminalCore for FakeCore {
    fn set_connection(&mut self, connection: Box<dyn Connection>) {
        self.calls.push(CoreCall::SetConnection);
        self.connection = Some(connection);
    }

    fn resize(&mut self, rows: u32, columns: u32) {
        self.calls.push(CoreCall::Resize { rows, columns });
        self.resize_grid(GridSize::new(rows, columns));
    }

    fn resize_to_pixels(&mut self, size: Size) -> GridSize {
        self.calls.push(CoreCall::ResizeToPixels(size));
        let grid = GridSize::new(
            ((size.height / FAKE_CELL_HEIGHT).floor() as u32).max(1),
            ((size.width / FAKE_CELL_WIDTH).floor() as u32).max(1),
        );
        self.resize_grid(grid);
        grid
    }

    fn size(&self) -> Size {
        self.pixel_size
    }

    fn rows(&self) -> u32 {
        self.grid.rows
    }

    fn columns(&self) -> u32 {
        self.grid.columns
    }

    fn auto_fill(&self) -> bool {
        self.auto_fill
    }

    fn set_auto_fill(&mut self, auto_fill: bool) {
        self.calls.push(CoreCall::SetAutoFill(auto_fill));
        self.auto_fill = auto_fill;
    }

    fn set_control_size(&mut self, size: Size) {
        self.calls.push(CoreCall::SetControlSize(size));
    }

    fn selected_text(&mut self) -> String {
        self.calls.push(CoreCall::SelectedText);
        self.selection.take().unwrap_or_default()
    }

    fn set_theme(&mut self, theme: &TerminalTheme, font_family: &str, font_size: i16) {
        self.calls.push(CoreCall::SetTheme {
            background: theme.default_background,
            font_family: font_family.to_string(),
            font_size,
        });
    }

    fn user_scroll(&mut self, view_top: i32) {
        self.calls.push(CoreCall::UserScroll(view_top));

        if let Some(mut viewport) = self.viewport {
            viewport.view_top = view_top.clamp(0, viewport.max_top().max(0));
            self.scroll_to(viewport);
        }
    }

    fn raise_resized_if_draw_space_increased(&mut self) {
        self.calls.push(CoreCall::RaiseResizedIfDrawSpaceIncreased);
    }

    fn focus(&mut self) {
        self.calls.push(CoreCall::Focus);
        self.focused = true;
    }

    fn subscribe(&mut self, sink: CoreEventSink) -> SubscriptionId {
        self.subscribers.add(sink)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.remove(id);
    }
}
