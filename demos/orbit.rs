//! Camera demo: a player square wanders a field of markers while the
//! camera chases it. Arrow keys move, mouse wheel zooms, Escape quits.

use std::cell::Cell;
use std::rc::Rc;

use macroquad::prelude::*;

use kiln::{
    Anchor, Camera, Context, DrawCall, Entity, Event, Game, GameConfig, Layer, Renderable, Sprite,
};

const VIEW: Vec2 = vec2(960.0, 540.0);
const FIELD: f32 = 3000.0;
const PLAYER_SPEED: f32 = 350.0;

struct Player {
    position: Rc<Cell<Vec2>>,
}

impl Entity for Player {
    fn update(&mut self, dt: f32, _ctx: &mut Context) {
        let mut dir = Vec2::ZERO;
        if is_key_down(KeyCode::Left) {
            dir.x -= 1.0;
        }
        if is_key_down(KeyCode::Right) {
            dir.x += 1.0;
        }
        if is_key_down(KeyCode::Up) {
            dir.y -= 1.0;
        }
        if is_key_down(KeyCode::Down) {
            dir.y += 1.0;
        }
        if dir != Vec2::ZERO {
            let next = self.position.get() + dir.normalize() * PLAYER_SPEED * dt;
            self.position
                .set(next.clamp(Vec2::ZERO, vec2(FIELD, FIELD)));
        }
    }

    fn post_update(&mut self, dt: f32, ctx: &mut Context) {
        let target = self.position.get();
        if let Some(camera) = ctx.camera_mut(0) {
            camera.follow(target, 5.0, dt);
        }
    }
}

impl Renderable for Player {
    fn layer(&self) -> Layer {
        Layer::Foreground
    }

    fn render(&self, _dt: f32) -> Option<DrawCall> {
        let p = self.position.get();
        Some(DrawCall::solid(
            Rect::new(p.x - 16.0, p.y - 16.0, 32.0, 32.0),
            GOLD,
        ))
    }
}

/// Adjusts camera zoom from wheel events, quits on Escape.
struct CameraControls;

impl Entity for CameraControls {
    fn on_event(&mut self, event: &Event, ctx: &mut Context) {
        match event {
            Event::MouseWheel { delta } => {
                if let Some(camera) = ctx.camera_mut(0) {
                    let zoom = camera.zoom() * if delta.y > 0.0 { 1.1 } else { 1.0 / 1.1 };
                    camera.set_zoom(zoom);
                }
            }
            Event::KeyPressed { key: KeyCode::Escape } => ctx.quit(),
            _ => {}
        }
    }
}

impl Renderable for CameraControls {}

struct Hud {
    position: Rc<Cell<Vec2>>,
}

impl Entity for Hud {}

impl Renderable for Hud {
    fn layer(&self) -> Layer {
        Layer::Ui
    }

    fn render(&self, _dt: f32) -> Option<DrawCall> {
        let p = self.position.get();
        Some(DrawCall::text(
            format!("x {:.0}  y {:.0}  (arrows move, wheel zooms)", p.x, p.y),
            16.0,
            28.0,
            24.0,
            WHITE,
        ))
    }
}

/// A 1x1 white texture, scaled up by sprites that use it.
fn white_pixel() -> Texture2D {
    Texture2D::from_rgba8(1, 1, &[255, 255, 255, 255])
}

fn marker(texture: &Texture2D, position: Vec2, side: f32, tint: Color) -> Sprite {
    let mut sprite = Sprite::new(texture.clone(), position);
    sprite.size = Some(vec2(side, side));
    sprite.anchor = Anchor::Center;
    sprite.tint = tint;
    sprite.layer = Layer::Background;
    sprite
}

fn config() -> GameConfig {
    GameConfig {
        title: "orbit".to_string(),
        width: VIEW.x as i32,
        height: VIEW.y as i32,
        fps_cap: 120,
        ..Default::default()
    }
}

fn window_conf() -> Conf {
    config().window_conf()
}

#[macroquad::main(window_conf)]
async fn main() {
    let mut game = Game::new(config());
    game.add_camera(Camera::at(VIEW, vec2(FIELD, FIELD) * 0.5));

    let texture = white_pixel();
    let palette = [DARKGRAY, GRAY, DARKGREEN, DARKBLUE];
    for i in 0..200 {
        let position = vec2(
            macroquad::rand::gen_range(0.0, FIELD),
            macroquad::rand::gen_range(0.0, FIELD),
        );
        let side = macroquad::rand::gen_range(8.0, 40.0);
        let tint = palette[i % palette.len()];
        game.spawn(Box::new(marker(&texture, position, side, tint)));
    }

    let position = Rc::new(Cell::new(vec2(FIELD, FIELD) * 0.5));
    game.spawn(Box::new(Player {
        position: Rc::clone(&position),
    }));
    game.spawn(Box::new(Hud { position }));
    game.spawn(Box::new(CameraControls));

    game.run().await;
}
