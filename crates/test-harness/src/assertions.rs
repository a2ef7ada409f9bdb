//! Test assertions for control state

use control::{Scrollbar, Thickness, Viewport};

/// Assert the scrollbar mirrors a viewport report exactly
pub fn assert_scrollbar_matches(scrollbar: &Scrollbar, viewport: Viewport) {
    assert_eq!(scrollbar.minimum(), 0.0, "scrollbar minimum");
    assert_eq!(
        scrollbar.maximum(),
        (viewport.buffer_size - viewport.view_height) as f64,
        "scrollbar maximum for {:?}",
        viewport
    );
    assert_eq!(scrollbar.value(), viewport.view_top as f64, "scrollbar value for {:?}", viewport);
    assert_eq!(
        scrollbar.viewport_size(),
        viewport.view_height as f64,
        "scrollbar viewport size for {:?}",
        viewport
    );
}

/// Assert a margin only pads right and bottom, and never negatively
pub fn assert_margin_anchored(margin: Thickness) {
    assert_eq!(margin.left, 0.0, "left margin must be 0: {:?}", margin);
    assert_eq!(margin.top, 0.0, "top margin must be 0: {:?}", margin);
    assert!(margin.right >= 0.0, "right margin negative: {:?}", margin);
    assert!(margin.bottom >= 0.0, "bottom margin negative: {:?}", margin);
}
