//! Geometry reconciliation tests
//!
//! Host size changes, margins, DPI scaling and grid resizes.

use control::{
    CancellationSource, CancellationToken, ControlConfig, DpiScale, GridSize, HeightMarginScale,
    ResizeError, RoutedEvent, Rgb, Size, TerminalControl, TerminalCore, TerminalTheme, Thickness,
};
use test_harness::assertions::assert_margin_anchored;
use test_harness::fake_core::{FAKE_CELL_HEIGHT, FAKE_CELL_WIDTH};
use test_harness::fixtures::{auto_fill_control, default_control};
use test_harness::{init_tracing, ControlHarness, CoreCall, FakeCore, LoopbackConnection, TestHost};

// ========== Host size changes ==========

#[test]
fn size_change_applies_margin_for_renderer_footprint() {
    init_tracing();
    let mut h = default_control();
    h.core.borrow_mut().set_pixel_size(Size::new(760.0, 580.0));

    h.control.on_host_size_changed(Size::new(800.0, 600.0));

    assert_eq!(h.host.borrow().margin(), Some(Thickness::new(0.0, 0.0, 23.0, 20.0)));
}

#[test]
fn size_change_pushes_scaled_target_size() {
    let mut h = default_control();
    h.host.borrow_mut().dpi = DpiScale::new(1.5, 2.0);

    h.control.on_host_size_changed(Size::new(817.0, 617.0));

    let target = Size::new(800.0 * 1.5, 600.0 * 2.0);
    assert!(h.core.borrow().calls().contains(&CoreCall::SetControlSize(target)));
}

#[test]
fn size_change_probes_for_more_draw_space_after_margin() {
    let mut h = default_control();
    h.core.borrow_mut().clear_calls();

    h.control.on_host_size_changed(Size::new(800.0, 600.0));

    let calls = h.core.borrow().calls().to_vec();
    assert_eq!(
        calls,
        vec![
            CoreCall::SetControlSize(Size::new(783.0, 583.0)),
            CoreCall::RaiseResizedIfDrawSpaceIncreased,
        ]
    );
    assert_eq!(h.host.borrow().margin_count(), 1);
}

#[test]
fn auto_fill_skips_margins() {
    let mut h = auto_fill_control();
    h.core.borrow_mut().set_pixel_size(Size::new(760.0, 580.0));
    h.core.borrow_mut().clear_calls();

    h.control.on_host_size_changed(Size::new(800.0, 600.0));

    assert_eq!(h.host.borrow().margin_count(), 0);
    assert_eq!(h.core.borrow().count(&CoreCall::RaiseResizedIfDrawSpaceIncreased), 0);
    assert_eq!(h.core.borrow().calls(), &[CoreCall::SetControlSize(Size::new(783.0, 583.0))]);
}

#[test]
fn config_auto_fill_pushed_to_core() {
    let h = auto_fill_control();

    assert!(h.control.auto_fill());
    assert!(h.core.borrow().calls().contains(&CoreCall::SetAutoFill(true)));
}

#[test]
fn toggling_auto_fill_forwards_to_core() {
    let mut h = default_control();
    assert!(!h.control.auto_fill());

    h.control.set_auto_fill(true);
    assert!(h.control.auto_fill());
    assert!(h.core.borrow().auto_fill());
}

#[test]
fn margin_zero_before_renderer_sized() {
    let mut h = default_control();

    h.control.on_host_size_changed(Size::new(1024.0, 768.0));

    assert_eq!(h.host.borrow().margin(), Some(Thickness::default()));
}

#[test]
fn margin_converts_device_pixels_at_high_dpi() {
    let mut h = default_control();
    h.host.borrow_mut().dpi = DpiScale::uniform(2.0);
    h.core.borrow_mut().set_pixel_size(Size::new(1520.0, 1160.0));

    h.control.on_host_size_changed(Size::new(800.0, 600.0));

    assert_eq!(h.host.borrow().margin(), Some(Thickness::new(0.0, 0.0, 23.0, 20.0)));
}

#[test]
fn height_margin_uses_horizontal_scale_by_default() {
    let mut h = default_control();
    h.host.borrow_mut().dpi = DpiScale::new(1.0, 2.0);
    h.core.borrow_mut().set_pixel_size(Size::new(760.0, 580.0));

    let margin = h.control.compute_margins(Some(Size::new(800.0, 600.0)));

    assert_eq!(margin.bottom, 20.0);
}

#[test]
fn height_margin_scale_is_configurable() {
    let mut config = ControlConfig::default();
    config.geometry.height_margin_scale = HeightMarginScale::Vertical;
    let mut host = TestHost::new(Size::new(800.0, 600.0));
    host.dpi = DpiScale::new(1.0, 2.0);
    let h = ControlHarness::new(config, host).unwrap();
    h.core.borrow_mut().set_pixel_size(Size::new(760.0, 580.0));

    let margin = h.control.compute_margins(Some(Size::new(800.0, 600.0)));

    assert_eq!(margin.bottom, 310.0);
}

#[test]
fn compute_margins_defaults_to_actual_size() {
    let h = default_control();
    h.host.borrow_mut().size = Size::new(500.0, 400.0);
    h.core.borrow_mut().set_pixel_size(Size::new(400.0, 300.0));

    let margin = h.control.compute_margins(None);

    assert_eq!(margin, Thickness::new(0.0, 0.0, 83.0, 100.0));
    assert_margin_anchored(margin);
}

#[test]
fn oversized_renderer_gets_no_negative_margin() {
    let mut h = default_control();
    h.core.borrow_mut().set_pixel_size(Size::new(2000.0, 2000.0));

    h.control.on_host_size_changed(Size::new(800.0, 600.0));

    assert_eq!(h.host.borrow().margin(), Some(Thickness::default()));
}

// ========== Grid resizes ==========

#[test]
fn resize_async_recomputes_margin_on_ui_loop() {
    let mut h = default_control();

    let completion = h.control.resize_async(30, 90, CancellationToken::none());

    // The grid resize is immediate, the margin waits for the loop
    assert!(h.core.borrow().calls().contains(&CoreCall::Resize { rows: 30, columns: 90 }));
    assert_eq!(h.host.borrow().margin_count(), 0);

    let result = h.block_on(completion).unwrap();
    assert_eq!(result, Ok(()));

    // 90 x 8 = 720 wide, 30 x 16 = 480 tall, in an 800 x 600 control
    assert_eq!(h.host.borrow().margin(), Some(Thickness::new(0.0, 0.0, 63.0, 120.0)));
}

#[test]
fn resize_async_cancelled_skips_margin() {
    let mut h = default_control();
    let source = CancellationSource::new();

    let completion = h.control.resize_async(30, 90, source.token());
    source.cancel();

    let result = h.block_on(completion).unwrap();
    assert_eq!(result, Err(ResizeError::Cancelled));
    assert_eq!(h.host.borrow().margin_count(), 0);

    // The core resize already happened and stays
    assert_eq!(h.control.rows(), 30);
    assert_eq!(h.control.columns(), 90);
}

#[test]
fn resize_async_cancelled_after_margin_step_still_succeeds() {
    let mut h = default_control();
    let source = CancellationSource::new();

    let completion = h.control.resize_async(30, 90, source.token());
    h.pump().unwrap();
    source.cancel();

    assert_eq!(h.block_on(completion).unwrap(), Ok(()));
    assert_eq!(h.host.borrow().margin_count(), 1);
}

#[test]
fn resize_async_detached_when_loop_dropped() {
    let mut h = default_control();
    let completion = h.control.resize_async(30, 90, CancellationToken::none());

    drop(h);

    assert_eq!(futures::executor::block_on(completion), Err(ResizeError::Detached));
}

#[test]
fn trigger_resize_scales_and_reports_grid() {
    let mut h = default_control();
    h.host.borrow_mut().dpi = DpiScale::uniform(2.0);

    let grid = h.control.trigger_resize(Size::new(400.0, 240.0));

    assert!(h.core.borrow().calls().contains(&CoreCall::ResizeToPixels(Size::new(800.0, 480.0))));
    assert_eq!(
        grid,
        GridSize::new((480.0 / FAKE_CELL_HEIGHT) as u32, (800.0 / FAKE_CELL_WIDTH) as u32)
    );
    assert_eq!(grid, GridSize::new(h.control.rows(), h.control.columns()));
}

// ========== Forwarded surface ==========

#[test]
fn set_theme_forwards_and_paints_background() {
    let mut h = default_control();
    let theme = TerminalTheme {
        default_background: 0x0030_2010,
        ..TerminalTheme::default()
    };

    h.control.set_theme(&theme, "Cascadia Mono", 12);

    assert!(h.core.borrow().calls().contains(&CoreCall::SetTheme {
        background: 0x0030_2010,
        font_family: "Cascadia Mono".to_string(),
        font_size: 12,
    }));
    assert_eq!(h.host.borrow().background(), Some(Rgb::new(0x10, 0x20, 0x30)));
}

#[test]
fn set_theme_ignored_without_presentation() {
    let mut h = default_control();
    h.host.borrow_mut().presented = false;
    h.core.borrow_mut().clear_calls();

    h.control.set_theme(&TerminalTheme::default(), "Consolas", 12);

    assert!(h.core.borrow().calls().is_empty());
    assert_eq!(h.host.borrow().background(), None);
}

#[test]
fn focus_is_forwarded_and_handled() {
    let mut h = default_control();
    let mut event = RoutedEvent::default();

    h.control.on_got_focus(&mut event);

    assert!(event.handled);
    assert!(h.core.borrow().is_focused());
}

#[test]
fn selected_text_comes_from_core_once() {
    let mut h = default_control();
    h.core.borrow_mut().select("hello");

    assert_eq!(h.control.selected_text(), "hello");
    assert_eq!(h.control.selected_text(), "");
}

#[test]
fn connection_is_handed_to_core() {
    let mut h = default_control();

    h.control.set_connection(Box::new(LoopbackConnection::new()));

    assert!(h.core.borrow().has_connection());
}

#[test]
fn control_reports_core_grid() {
    let mut core = FakeCore::new();
    core.set_grid(GridSize::new(24, 80));
    let h = ControlHarness::with_core(core, ControlConfig::default(), TestHost::new(Size::new(800.0, 600.0)))
        .unwrap();

    assert_eq!(h.control.rows(), 24);
    assert_eq!(h.control.columns(), 80);
}

#[test]
fn control_can_own_its_core() {
    let event_loop: calloop::EventLoop<'static, TerminalControl<FakeCore, TestHost>> =
        calloop::EventLoop::try_new().unwrap();
    let control = TerminalControl::new(
        FakeCore::new(),
        TestHost::new(Size::new(800.0, 600.0)),
        ControlConfig::default(),
        &event_loop.handle(),
    )
    .unwrap();

    assert_eq!(control.core().subscriber_count(), 1);
    assert_eq!(control.host().margin_count(), 0);
}
