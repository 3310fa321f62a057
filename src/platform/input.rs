//! Pointer input helpers

use glam::Vec2;

pub use crate::sim::hit::{PointerDown, PointerSource};

/// Convert client (viewport) coordinates to canvas-local pixels.
///
/// `scale` is the canvas backing-store width divided by its CSS width, so
/// hits line up on high-DPI displays.
pub fn canvas_local(client_x: f32, client_y: f32, rect_left: f32, rect_top: f32, scale: f32) -> Vec2 {
    let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
    Vec2::new((client_x - rect_left) * scale, (client_y - rect_top) * scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_by_canvas_rect() {
        assert_eq!(canvas_local(150.0, 80.0, 50.0, 30.0, 1.0), Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_applies_backing_scale() {
        assert_eq!(canvas_local(60.0, 40.0, 10.0, 20.0, 2.0), Vec2::new(100.0, 40.0));
        // Degenerate scale falls back to CSS pixels
        assert_eq!(canvas_local(60.0, 40.0, 10.0, 20.0, 0.0), Vec2::new(50.0, 20.0));
    }
}
