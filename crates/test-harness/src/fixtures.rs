//! Test fixtures for common test scenarios

use control::{ControlConfig, Size, Viewport};

use crate::fake_core::FakeCore;
use crate::headless::{ControlHarness, TestHost};

/// Standard control dimensions (DIPs)
pub const TEST_WIDTH: f64 = 800.0;
pub const TEST_HEIGHT: f64 = 600.0;

/// Control with default configuration and an unsized core
pub fn default_control() -> ControlHarness {
    ControlHarness::new(ControlConfig::default(), TestHost::new(Size::new(TEST_WIDTH, TEST_HEIGHT)))
        .expect("control harness")
}

/// Control whose core already reports a scrollable viewport and follows
/// scroll requests like a real terminal
///
/// Buffer: 100 lines, view: 25 lines, scrolled to line 10.
pub fn scrollable_control() -> ControlHarness {
    let mut core = FakeCore::new();
    core.scroll_to(Viewport::new(10, 25, 100));

    let mut harness = ControlHarness::with_core(
        core,
        ControlConfig::default(),
        TestHost::new(Size::new(TEST_WIDTH, TEST_HEIGHT)),
    )
    .expect("control harness");

    // The fake reported before the control subscribed
    harness.control.on_terminal_scrolled(Viewport::new(10, 25, 100));
    harness.pump().expect("pump");
    harness.core.borrow_mut().clear_calls();
    harness
}

/// Control with margin computation disabled
pub fn auto_fill_control() -> ControlHarness {
    let config = ControlConfig {
        auto_fill: true,
        ..ControlConfig::default()
    };
    ControlHarness::new(config, TestHost::new(Size::new(TEST_WIDTH, TEST_HEIGHT)))
        .expect("control harness")
}
