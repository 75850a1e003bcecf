//! Sprites
//!
//! A ready-made renderable that places a texture in the world by position
//! and anchor. Games with custom drawing needs implement `Renderable`
//! directly; `Sprite` covers the common case.

use macroquad::prelude::{vec2, Color, Rect, Texture2D, Vec2, WHITE};

use crate::entity::Entity;
use crate::layer::Layer;
use crate::renderable::{DrawCall, DrawKind, Renderable};

/// Which point of the sprite's rect sits at its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Anchor {
    /// Fractional offset of the anchor point within the rect.
    pub fn factors(self) -> Vec2 {
        match self {
            Anchor::TopLeft => vec2(0.0, 0.0),
            Anchor::TopCenter => vec2(0.5, 0.0),
            Anchor::TopRight => vec2(1.0, 0.0),
            Anchor::CenterLeft => vec2(0.0, 0.5),
            Anchor::Center => vec2(0.5, 0.5),
            Anchor::CenterRight => vec2(1.0, 0.5),
            Anchor::BottomLeft => vec2(0.0, 1.0),
            Anchor::BottomCenter => vec2(0.5, 1.0),
            Anchor::BottomRight => vec2(1.0, 1.0),
        }
    }

    /// The rect of the given size whose anchor point sits at `position`.
    pub fn place(self, position: Vec2, size: Vec2) -> Rect {
        let offset = self.factors() * size;
        Rect::new(position.x - offset.x, position.y - offset.y, size.x, size.y)
    }
}

/// A textured rectangle in the world.
pub struct Sprite {
    pub texture: Texture2D,
    /// World position of the anchor point.
    pub position: Vec2,
    pub anchor: Anchor,
    /// Override for the drawn size; defaults to the texture size (or the
    /// source sub-rect size, if set).
    pub size: Option<Vec2>,
    /// Sub-rect of the texture to draw, in pixels.
    pub source: Option<Rect>,
    pub tint: Color,
    pub layer: Layer,
    pub draw_index: i32,
    /// Rotation around the rect center, in radians.
    pub rotation: f32,
    pub flip_x: bool,
    pub flip_y: bool,
}

impl Sprite {
    pub fn new(texture: Texture2D, position: Vec2) -> Self {
        Self {
            texture,
            position,
            anchor: Anchor::Center,
            size: None,
            source: None,
            tint: WHITE,
            layer: Layer::Midground,
            draw_index: 0,
            rotation: 0.0,
            flip_x: false,
            flip_y: false,
        }
    }

    /// The sprite's world rect, from position, anchor, and size.
    pub fn rect(&self) -> Rect {
        let size = self.size.unwrap_or_else(|| match &self.source {
            Some(src) => vec2(src.w, src.h),
            None => vec2(self.texture.width(), self.texture.height()),
        });
        self.anchor.place(self.position, size)
    }
}

impl Entity for Sprite {}

impl Renderable for Sprite {
    fn layer(&self) -> Layer {
        self.layer
    }

    fn draw_index(&self) -> i32 {
        self.draw_index
    }

    fn render(&self, _delta_time: f32) -> Option<DrawCall> {
        Some(DrawCall {
            dest: self.rect(),
            color: self.tint,
            kind: DrawKind::Texture {
                texture: self.texture.clone(),
                source: self.source,
                rotation: self.rotation,
                flip_x: self.flip_x,
                flip_y: self.flip_y,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_top_left() {
        let rect = Anchor::TopLeft.place(vec2(10.0, 20.0), vec2(40.0, 30.0));
        assert_eq!(rect, Rect::new(10.0, 20.0, 40.0, 30.0));
    }

    #[test]
    fn test_anchor_center() {
        let rect = Anchor::Center.place(vec2(10.0, 20.0), vec2(40.0, 30.0));
        assert_eq!(rect, Rect::new(-10.0, 5.0, 40.0, 30.0));
    }

    #[test]
    fn test_anchor_bottom_right() {
        let rect = Anchor::BottomRight.place(vec2(10.0, 20.0), vec2(40.0, 30.0));
        assert_eq!(rect, Rect::new(-30.0, -10.0, 40.0, 30.0));
    }

    #[test]
    fn test_anchor_edges() {
        let size = vec2(10.0, 10.0);
        let origin = vec2(0.0, 0.0);
        assert_eq!(Anchor::TopCenter.place(origin, size).x, -5.0);
        assert_eq!(Anchor::TopCenter.place(origin, size).y, 0.0);
        assert_eq!(Anchor::CenterLeft.place(origin, size).y, -5.0);
        assert_eq!(Anchor::BottomCenter.place(origin, size).y, -10.0);
        assert_eq!(Anchor::CenterRight.place(origin, size).x, -10.0);
    }
}
