//! Pong. Left paddle: W/S, right paddle: Up/Down, Space serves,
//! Escape quits. No cameras: everything draws in screen space.

use std::cell::RefCell;
use std::rc::Rc;

use macroquad::prelude::*;

use kiln::{Context, DrawCall, Entity, Event, Game, GameConfig, Layer, Renderable};

const COURT_W: f32 = 800.0;
const COURT_H: f32 = 500.0;
const PADDLE_SIZE: Vec2 = vec2(12.0, 80.0);
const PADDLE_SPEED: f32 = 420.0;
const BALL_SIZE: f32 = 12.0;
const BALL_SPEED: f32 = 380.0;

/// State shared between the ball, the paddles, and the scoreboard.
struct Court {
    left_paddle: Rect,
    right_paddle: Rect,
    left_score: u32,
    right_score: u32,
    serving: bool,
}

type Shared = Rc<RefCell<Court>>;

fn new_court() -> Shared {
    let margin = 24.0;
    let y = (COURT_H - PADDLE_SIZE.y) * 0.5;
    Rc::new(RefCell::new(Court {
        left_paddle: Rect::new(margin, y, PADDLE_SIZE.x, PADDLE_SIZE.y),
        right_paddle: Rect::new(COURT_W - margin - PADDLE_SIZE.x, y, PADDLE_SIZE.x, PADDLE_SIZE.y),
        left_score: 0,
        right_score: 0,
        serving: true,
    }))
}

enum Side {
    Left,
    Right,
}

struct Paddle {
    court: Shared,
    side: Side,
    velocity: f32,
}

impl Paddle {
    fn keys(&self) -> (KeyCode, KeyCode) {
        match self.side {
            Side::Left => (KeyCode::W, KeyCode::S),
            Side::Right => (KeyCode::Up, KeyCode::Down),
        }
    }

    fn rect(&self) -> Rect {
        let court = self.court.borrow();
        match self.side {
            Side::Left => court.left_paddle,
            Side::Right => court.right_paddle,
        }
    }
}

impl Entity for Paddle {
    fn pre_update(&mut self, _dt: f32, _ctx: &mut Context) {
        let (up, down) = self.keys();
        self.velocity = 0.0;
        if is_key_down(up) {
            self.velocity -= PADDLE_SPEED;
        }
        if is_key_down(down) {
            self.velocity += PADDLE_SPEED;
        }
    }

    fn update(&mut self, dt: f32, _ctx: &mut Context) {
        let mut court = self.court.borrow_mut();
        let rect = match self.side {
            Side::Left => &mut court.left_paddle,
            Side::Right => &mut court.right_paddle,
        };
        rect.y = (rect.y + self.velocity * dt).clamp(0.0, COURT_H - rect.h);
    }
}

impl Renderable for Paddle {
    fn render(&self, _dt: f32) -> Option<DrawCall> {
        Some(DrawCall::solid(self.rect(), WHITE))
    }
}

struct Ball {
    court: Shared,
    position: Vec2,
    velocity: Vec2,
}

impl Ball {
    fn new(court: Shared) -> Self {
        Self {
            court,
            position: vec2(COURT_W * 0.5, COURT_H * 0.5),
            velocity: Vec2::ZERO,
        }
    }

    fn reset(&mut self) {
        self.position = vec2(COURT_W * 0.5, COURT_H * 0.5);
        self.velocity = Vec2::ZERO;
    }

    fn rect(&self) -> Rect {
        Rect::new(
            self.position.x - BALL_SIZE * 0.5,
            self.position.y - BALL_SIZE * 0.5,
            BALL_SIZE,
            BALL_SIZE,
        )
    }
}

impl Entity for Ball {
    fn on_event(&mut self, event: &Event, _ctx: &mut Context) {
        if let Event::KeyPressed { key: KeyCode::Space } = event {
            let mut court = self.court.borrow_mut();
            if court.serving {
                court.serving = false;
                let dir_x = if macroquad::rand::gen_range(0, 2) == 0 { -1.0 } else { 1.0 };
                let dir_y = macroquad::rand::gen_range(-0.6, 0.6);
                self.velocity = vec2(dir_x, dir_y).normalize() * BALL_SPEED;
            }
        }
    }

    // Physics runs on the fixed clock so ball speed is framerate-proof.
    fn const_update(&mut self, timestep: f32, _ctx: &mut Context) {
        let mut court = self.court.borrow_mut();
        if court.serving {
            return;
        }

        self.position += self.velocity * timestep;

        let half = BALL_SIZE * 0.5;
        if self.position.y < half && self.velocity.y < 0.0 {
            self.velocity.y = -self.velocity.y;
        }
        if self.position.y > COURT_H - half && self.velocity.y > 0.0 {
            self.velocity.y = -self.velocity.y;
        }

        let rect = self.rect();
        if rect.overlaps(&court.left_paddle) && self.velocity.x < 0.0 {
            self.velocity.x = -self.velocity.x;
        }
        if rect.overlaps(&court.right_paddle) && self.velocity.x > 0.0 {
            self.velocity.x = -self.velocity.x;
        }

        if self.position.x < -BALL_SIZE {
            court.right_score += 1;
            court.serving = true;
        } else if self.position.x > COURT_W + BALL_SIZE {
            court.left_score += 1;
            court.serving = true;
        }
        if court.serving {
            drop(court);
            self.reset();
        }
    }
}

impl Renderable for Ball {
    fn render(&self, _dt: f32) -> Option<DrawCall> {
        if self.court.borrow().serving {
            return None;
        }
        Some(DrawCall::solid(self.rect(), WHITE))
    }
}

/// One dash of the center net line.
struct NetSegment {
    y: f32,
}

impl Entity for NetSegment {}

impl Renderable for NetSegment {
    fn layer(&self) -> Layer {
        Layer::Background
    }

    fn render(&self, _dt: f32) -> Option<DrawCall> {
        Some(DrawCall::solid(
            Rect::new(COURT_W * 0.5 - 2.0, self.y, 4.0, 30.0),
            GRAY,
        ))
    }
}

struct Scoreboard {
    court: Shared,
}

impl Entity for Scoreboard {}

impl Renderable for Scoreboard {
    fn layer(&self) -> Layer {
        Layer::Ui
    }

    fn render(&self, _dt: f32) -> Option<DrawCall> {
        let court = self.court.borrow();
        let line = if court.serving {
            format!("{}   press space   {}", court.left_score, court.right_score)
        } else {
            format!("{}        {}", court.left_score, court.right_score)
        };
        Some(DrawCall::text(line, COURT_W * 0.5 - 90.0, 40.0, 32.0, WHITE))
    }
}

struct QuitOnEscape;

impl Entity for QuitOnEscape {
    fn on_event(&mut self, event: &Event, ctx: &mut Context) {
        if let Event::KeyPressed { key: KeyCode::Escape } = event {
            ctx.quit();
        }
    }
}

impl Renderable for QuitOnEscape {}

fn window_conf() -> Conf {
    config().window_conf()
}

fn config() -> GameConfig {
    GameConfig {
        title: "pong".to_string(),
        width: COURT_W as i32,
        height: COURT_H as i32,
        resizable: false,
        tick_rate: 120.0,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let mut game = Game::new(config());
    let court = new_court();

    game.spawn(Box::new(Paddle {
        court: Rc::clone(&court),
        side: Side::Left,
        velocity: 0.0,
    }));
    game.spawn(Box::new(Paddle {
        court: Rc::clone(&court),
        side: Side::Right,
        velocity: 0.0,
    }));
    game.spawn(Box::new(Ball::new(Rc::clone(&court))));
    game.spawn(Box::new(Scoreboard {
        court: Rc::clone(&court),
    }));
    for i in 0..8 {
        game.spawn(Box::new(NetSegment {
            y: 20.0 + i as f32 * 60.0,
        }));
    }
    game.spawn(Box::new(QuitOnEscape));

    game.run().await;
}
