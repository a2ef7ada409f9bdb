//! In-memory connection

use std::cell::RefCell;
use std::rc::Rc;

use control::Connection;

/// What the terminal side did to a [`LoopbackConnection`]
#[derive(Debug, Default)]
pub struct LoopbackState {
    pub started: bool,
    pub closed: bool,
    pub input: String,
    pub sizes: Vec<(u32, u32)>,
    pending_output: Vec<u8>,
}

impl LoopbackState {
    /// Queue bytes as if the backend had written them
    pub fn push_output(&mut self, data: &[u8]) {
        self.pending_output.extend_from_slice(data);
    }
}

/// Connection whose backend is the test itself
#[derive(Debug, Clone, Default)]
pub struct LoopbackConnection {
    state: Rc<RefCell<LoopbackState>>,
}

impl LoopbackConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared view of the connection, stays valid after the core takes it
    pub fn state(&self) -> Rc<RefCell<LoopbackState>> {
        self.state.clone()
    }
}

impl Connection for LoopbackConnection {
    fn start(&mut self) {
        self.state.borrow_mut().started = true;
    }

    fn write_input(&mut self, data: &str) {
        self.state.borrow_mut().input.push_str(data);
    }

    fn resize(&mut self, rows: u32, columns: u32) {
        self.state.borrow_mut().sizes.push((rows, columns));
    }

    fn close(&mut self) {
        self.state.borrow_mut().closed = true;
    }

    fn drain_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.state.borrow_mut().pending_output)
    }
}
