//! Control driving a real alacritty-backed core
//!
//! Output flows from a loopback connection through the VT parser, and the
//! scrollbar follows the terminal's real scrollback.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use calloop::EventLoop;
use control::{
    CancellationToken, ControlConfig, GridSize, Size, TerminalControl, TerminalCore, Thickness,
};
use terminal::AlacrittyCore;
use test_harness::assertions::assert_scrollbar_matches;
use test_harness::loopback::LoopbackState;
use test_harness::{init_tracing, LoopbackConnection, TestHost};

type SharedCore = Rc<RefCell<AlacrittyCore>>;
type SharedHost = Rc<RefCell<TestHost>>;
type Control = TerminalControl<SharedCore, SharedHost>;

struct Setup {
    event_loop: EventLoop<'static, Control>,
    control: Control,
    core: SharedCore,
    host: SharedHost,
    backend: Rc<RefCell<LoopbackState>>,
}

impl Setup {
    fn new(config: ControlConfig) -> Self {
        init_tracing();
        let event_loop: EventLoop<'static, Control> = EventLoop::try_new().unwrap();
        let core = Rc::new(RefCell::new(AlacrittyCore::new(GridSize::new(24, 80))));
        let host = Rc::new(RefCell::new(TestHost::new(Size::new(800.0, 600.0))));
        let mut control =
            TerminalControl::new(core.clone(), host.clone(), config, &event_loop.handle()).unwrap();

        let connection = LoopbackConnection::new();
        let backend = connection.state();
        control.set_connection(Box::new(connection));

        Self {
            event_loop,
            control,
            core,
            host,
            backend,
        }
    }

    fn pump(&mut self) {
        for _ in 0..16 {
            self.event_loop
                .dispatch(Some(Duration::ZERO), &mut self.control)
                .unwrap();
        }
    }

    /// Backend writes `count` numbered lines and the core consumes them
    fn print_lines(&mut self, count: usize) {
        let mut output = String::new();
        for i in 0..count {
            output.push_str(&format!("line {}\r\n", i));
        }
        self.backend.borrow_mut().push_output(output.as_bytes());
        self.core.borrow_mut().process_output();
        self.pump();
    }
}

#[test]
fn connection_started_and_sized() {
    let setup = Setup::new(ControlConfig::default());

    let backend = setup.backend.borrow();
    assert!(backend.started);
    assert_eq!(backend.sizes.last(), Some(&(24, 80)));
}

#[test]
fn scrollbar_follows_scrollback() {
    let mut setup = Setup::new(ControlConfig::default());

    setup.print_lines(100);

    let viewport = setup.core.borrow().viewport();
    assert!(viewport.buffer_size > viewport.view_height, "scrollback expected: {:?}", viewport);
    assert_eq!(viewport.view_top, viewport.buffer_size - viewport.view_height);
    assert_scrollbar_matches(setup.control.scrollbar(), viewport);
}

#[test]
fn wheel_up_scrolls_terminal_history() {
    let mut setup = Setup::new(ControlConfig::default());
    setup.print_lines(100);
    let bottom = setup.core.borrow().viewport();

    // One notch: three lines up
    setup.control.on_wheel_delta(120);
    setup.pump();

    let viewport = setup.core.borrow().viewport();
    assert_eq!(viewport.view_top, bottom.view_top - 3);
    assert_scrollbar_matches(setup.control.scrollbar(), viewport);
}

#[test]
fn drag_to_top_then_new_output_keeps_history_view() {
    let mut setup = Setup::new(ControlConfig::default());
    setup.print_lines(100);

    setup.control.on_scrollbar_drag(0.0);
    setup.pump();
    assert_eq!(setup.core.borrow().viewport().view_top, 0);
    assert_eq!(setup.control.scrollbar().value(), 0.0);

    setup.print_lines(1);

    // Whatever the core decided, the scrollbar mirrors it
    let viewport = setup.core.borrow().viewport();
    assert_scrollbar_matches(setup.control.scrollbar(), viewport);
}

#[test]
fn drag_past_history_clamps() {
    let mut setup = Setup::new(ControlConfig::default());
    setup.print_lines(100);
    let bottom = setup.core.borrow().viewport();

    setup.control.on_scrollbar_drag(10_000.0);
    setup.pump();

    assert_eq!(setup.core.borrow().viewport(), bottom);
    assert_scrollbar_matches(setup.control.scrollbar(), bottom);
}

#[test]
fn resize_async_pads_cell_remainder() {
    let mut setup = Setup::new(ControlConfig::default());

    let completion = setup.control.resize_async(20, 60, CancellationToken::none());
    setup.pump();

    assert_eq!(futures::executor::block_on(completion), Ok(()));
    assert_eq!(setup.control.rows(), 20);
    assert_eq!(setup.control.columns(), 60);
    assert_eq!(setup.backend.borrow().sizes.last(), Some(&(20, 60)));

    let pixels = setup.core.borrow().metrics().pixel_size(GridSize::new(20, 60));
    let expected = Thickness::new(0.0, 0.0, 800.0 - pixels.width - 17.0, 600.0 - pixels.height);
    assert_eq!(setup.host.borrow().margin(), Some(expected));
}

#[test]
fn auto_fill_sizes_grid_to_host() {
    let config = ControlConfig {
        auto_fill: true,
        ..ControlConfig::default()
    };
    let mut setup = Setup::new(config);

    setup.control.on_host_size_changed(Size::new(800.0, 600.0));

    let expected = setup.core.borrow().metrics().grid_for(Size::new(783.0, 583.0));
    assert_eq!(GridSize::new(setup.control.rows(), setup.control.columns()), expected);
    assert_eq!(setup.host.borrow().margin_count(), 0);
}

#[test]
fn trigger_resize_reports_core_grid() {
    let mut setup = Setup::new(ControlConfig::default());

    let grid = setup.control.trigger_resize(Size::new(400.0, 300.0));

    assert_eq!(grid, setup.core.borrow().metrics().grid_for(Size::new(400.0, 300.0)));
    assert_eq!(setup.core.borrow().rows(), grid.rows);
}

#[test]
fn selection_is_copied_once() {
    let mut setup = Setup::new(ControlConfig::default());
    setup.core.borrow_mut().inject_bytes(b"hello world");
    setup.core.borrow_mut().select((0, 0), (4, 0));

    assert_eq!(setup.control.selected_text(), "hello");
    assert!(!setup.core.borrow().has_selection());
}

#[test]
fn terminal_queries_answered_through_connection() {
    let mut setup = Setup::new(ControlConfig::default());

    // Primary device attributes
    setup.backend.borrow_mut().push_output(b"\x1b[c");
    setup.core.borrow_mut().process_output();

    assert!(!setup.backend.borrow().input.is_empty());
}

#[test]
fn dropping_control_and_core_closes_connection() {
    let setup = Setup::new(ControlConfig::default());
    let backend = setup.backend.clone();

    drop(setup);

    assert!(backend.borrow().closed);
}
