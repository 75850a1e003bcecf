//! World-space cameras
//!
//! A camera watches a rectangular region of the world and projects it onto
//! a target region of the screen (its viewport, or the whole screen). Zoom
//! shrinks the watched region around the camera's center; it never goes
//! below 1 so the view can't grow past the camera's nominal size.

use macroquad::logging::warn;
use macroquad::prelude::{vec2, Rect, Vec2};

use crate::layer::LayerMask;

/// A view into world space.
#[derive(Debug, Clone)]
pub struct Camera {
    /// World position the view is centered on.
    pub position: Vec2,
    /// Nominal view size in world units, at zoom 1.
    pub size: Vec2,
    zoom: f32,
    /// Screen region this camera draws into. `None` means the full screen.
    pub viewport: Option<Rect>,
    /// Layers this camera skips.
    pub mask: LayerMask,
}

impl Camera {
    /// Camera of the given world size, centered on its own half-size, so
    /// that world origin sits at the view's top-left corner.
    pub fn new(size: Vec2) -> Self {
        Self::at(size, size * 0.5)
    }

    /// Camera of the given world size centered on `position`.
    pub fn at(size: Vec2, position: Vec2) -> Self {
        Self {
            position,
            size,
            zoom: 1.0,
            viewport: None,
            mask: LayerMask::NONE,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set the zoom factor. Values below 1 are clamped to 1.
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom < 1.0 {
            warn!("camera zoom {} clamped to 1", zoom);
            self.zoom = 1.0;
        } else {
            self.zoom = zoom;
        }
    }

    /// The world region currently visible: `size / zoom`, centered on
    /// `position`.
    pub fn view_rect(&self) -> Rect {
        let extent = self.size / self.zoom;
        Rect::new(
            self.position.x - extent.x * 0.5,
            self.position.y - extent.y * 0.5,
            extent.x,
            extent.y,
        )
    }

    /// Whether a world rect is at least partly visible.
    ///
    /// Zero-size rects are treated as points.
    pub fn in_view(&self, rect: &Rect) -> bool {
        let view = self.view_rect();
        if rect.w <= 0.0 || rect.h <= 0.0 {
            view.contains(rect.point())
        } else {
            view.overlaps(rect)
        }
    }

    /// Map a world point to a screen point within `target`.
    pub fn world_to_screen(&self, point: Vec2, target: Rect) -> Vec2 {
        let view = self.view_rect();
        vec2(
            target.x + (point.x - view.x) / view.w * target.w,
            target.y + (point.y - view.y) / view.h * target.h,
        )
    }

    /// Map a screen point within `target` back to world space.
    pub fn screen_to_world(&self, point: Vec2, target: Rect) -> Vec2 {
        let view = self.view_rect();
        vec2(
            view.x + (point.x - target.x) / target.w * view.w,
            view.y + (point.y - target.y) / target.h * view.h,
        )
    }

    /// Map a world rect to its on-screen rect within `target`.
    pub fn project(&self, rect: &Rect, target: Rect) -> Rect {
        let view = self.view_rect();
        let scale_x = target.w / view.w;
        let scale_y = target.h / view.h;
        Rect::new(
            target.x + (rect.x - view.x) * scale_x,
            target.y + (rect.y - view.y) * scale_y,
            rect.w * scale_x,
            rect.h * scale_y,
        )
    }

    /// Horizontal scale factor from world units to pixels within `target`.
    ///
    /// Used to scale text, which has no world-space extent of its own.
    pub fn pixel_scale(&self, target: Rect) -> f32 {
        target.w / self.view_rect().w
    }

    /// Move the camera toward `target` with exponential smoothing.
    ///
    /// `stiffness` controls how quickly the camera catches up; the blend
    /// factor is framerate-independent.
    pub fn follow(&mut self, target: Vec2, stiffness: f32, delta_time: f32) {
        let blend = 1.0 - (-stiffness * delta_time).exp();
        self.position += (target - self.position) * blend;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::Layer;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_default_view_covers_origin_rect() {
        let camera = Camera::new(vec2(800.0, 600.0));
        let view = camera.view_rect();
        assert!(close(view.x, 0.0) && close(view.y, 0.0));
        assert!(close(view.w, 800.0) && close(view.h, 600.0));
    }

    #[test]
    fn test_identity_projection_at_zoom_one() {
        let camera = Camera::new(vec2(800.0, 600.0));
        let target = Rect::new(0.0, 0.0, 800.0, 600.0);
        let p = camera.world_to_screen(vec2(123.0, 456.0), target);
        assert!(close(p.x, 123.0) && close(p.y, 456.0));
    }

    #[test]
    fn test_zoom_scales_around_center() {
        let mut camera = Camera::new(vec2(800.0, 600.0));
        camera.set_zoom(2.0);
        let target = Rect::new(0.0, 0.0, 800.0, 600.0);

        // The center is a fixed point of zoom.
        let center = camera.world_to_screen(vec2(400.0, 300.0), target);
        assert!(close(center.x, 400.0) && close(center.y, 300.0));

        // A point 100 world units right of center lands 200 pixels right.
        let p = camera.world_to_screen(vec2(500.0, 300.0), target);
        assert!(close(p.x, 600.0));
    }

    #[test]
    fn test_screen_to_world_roundtrip() {
        let mut camera = Camera::at(vec2(640.0, 360.0), vec2(1000.0, -250.0));
        camera.set_zoom(3.0);
        let target = Rect::new(40.0, 20.0, 320.0, 180.0);

        let world = vec2(1010.0, -260.0);
        let back = camera.screen_to_world(camera.world_to_screen(world, target), target);
        assert!(close(back.x, world.x) && close(back.y, world.y));
    }

    #[test]
    fn test_project_matches_corner_mapping() {
        let camera = Camera::at(vec2(200.0, 100.0), vec2(0.0, 0.0));
        let target = Rect::new(0.0, 0.0, 400.0, 200.0);

        let rect = Rect::new(-50.0, -25.0, 20.0, 10.0);
        let projected = camera.project(&rect, target);
        let top_left = camera.world_to_screen(rect.point(), target);
        assert!(close(projected.x, top_left.x) && close(projected.y, top_left.y));
        assert!(close(projected.w, 40.0) && close(projected.h, 20.0));
    }

    #[test]
    fn test_in_view_culling() {
        let camera = Camera::new(vec2(100.0, 100.0));
        assert!(camera.in_view(&Rect::new(10.0, 10.0, 20.0, 20.0)));
        assert!(camera.in_view(&Rect::new(90.0, 90.0, 50.0, 50.0)));
        assert!(!camera.in_view(&Rect::new(200.0, 200.0, 20.0, 20.0)));

        // Zero-size rects cull as points.
        assert!(camera.in_view(&Rect::new(50.0, 50.0, 0.0, 0.0)));
        assert!(!camera.in_view(&Rect::new(150.0, 50.0, 0.0, 0.0)));
    }

    #[test]
    fn test_zoom_clamps_below_one() {
        let mut camera = Camera::new(vec2(100.0, 100.0));
        camera.set_zoom(0.25);
        assert!(close(camera.zoom(), 1.0));
        camera.set_zoom(4.0);
        assert!(close(camera.zoom(), 4.0));
    }

    #[test]
    fn test_follow_converges() {
        let mut camera = Camera::at(vec2(100.0, 100.0), vec2(0.0, 0.0));
        let target = vec2(500.0, -300.0);
        for _ in 0..300 {
            camera.follow(target, 5.0, 1.0 / 60.0);
        }
        assert!((camera.position - target).length() < 1.0);
    }

    #[test]
    fn test_mask_defaults_open() {
        let camera = Camera::new(vec2(100.0, 100.0));
        for layer in Layer::WORLD {
            assert!(camera.mask.allows(layer));
        }
    }
}
