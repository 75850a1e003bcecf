//! Renderable objects and draw calls
//!
//! A `Renderable` is queried once per render phase for a `DrawCall`: a
//! placement rectangle plus what to put there. World-layer placements are
//! in world space and go through the cameras; UI-layer placements are in
//! screen space and draw as-is.

use macroquad::prelude::{Color, Rect, Texture2D, WHITE};

use crate::layer::Layer;

/// What a draw call puts on screen.
#[derive(Clone)]
pub enum DrawKind {
    /// A filled rectangle in the call's color.
    Solid,
    /// A texture (or sub-rect of one), stretched to the destination.
    Texture {
        texture: Texture2D,
        /// Optional source sub-rect within the texture, in pixels.
        source: Option<Rect>,
        /// Rotation around the destination center, in radians.
        rotation: f32,
        flip_x: bool,
        flip_y: bool,
    },
    /// A text string. The destination's position is the text baseline;
    /// its size is ignored.
    Text { text: String, font_size: f32 },
}

/// One item of output from a renderable: placement plus payload.
#[derive(Clone)]
pub struct DrawCall {
    /// Placement rectangle, in world space for world layers and screen
    /// space for the UI layer.
    pub dest: Rect,
    /// Color, or tint for textured calls.
    pub color: Color,
    pub kind: DrawKind,
}

impl DrawCall {
    /// A filled rectangle.
    pub fn solid(dest: Rect, color: Color) -> Self {
        Self {
            dest,
            color,
            kind: DrawKind::Solid,
        }
    }

    /// A texture stretched over `dest`, untinted.
    pub fn texture(texture: Texture2D, dest: Rect) -> Self {
        Self {
            dest,
            color: WHITE,
            kind: DrawKind::Texture {
                texture,
                source: None,
                rotation: 0.0,
                flip_x: false,
                flip_y: false,
            },
        }
    }

    /// A text string with its baseline at `(x, y)`.
    pub fn text(text: impl Into<String>, x: f32, y: f32, font_size: f32, color: Color) -> Self {
        Self {
            dest: Rect::new(x, y, 0.0, 0.0),
            color,
            kind: DrawKind::Text {
                text: text.into(),
                font_size,
            },
        }
    }
}

/// A drawable object, queried once per render phase.
pub trait Renderable {
    /// The layer this object draws into.
    fn layer(&self) -> Layer {
        Layer::Midground
    }

    /// Draw order within the layer.
    ///
    /// Non-negative indices draw in ascending order; negative indices
    /// draw after all non-negative ones, with more negative values on
    /// top. So `-1` means "first thing above everything normal".
    fn draw_index(&self) -> i32 {
        0
    }

    /// Produce this frame's draw call, or `None` to draw nothing.
    fn render(&self, _delta_time: f32) -> Option<DrawCall> {
        None
    }
}
