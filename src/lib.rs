//! kiln - a thin game-loop framework for macroquad
//!
//! kiln supplies the loop scaffolding a small 2D game needs and stays out
//! of the way otherwise. Each frame runs six phases over every enabled
//! object: events, const_update (fixed timestep), pre_update, update,
//! post_update, render. Objects implement [`Entity`] for behavior and
//! [`Renderable`] for drawing; the [`Container`] holds them and defers
//! structural changes to frame boundaries; [`Camera`]s project the world
//! layers onto the screen, and the UI layer composites on top.
//!
//! ```no_run
//! use kiln::{Game, GameConfig};
//!
//! #[macroquad::main("kiln game")]
//! async fn main() {
//!     let game = Game::new(GameConfig::default());
//!     game.run().await;
//! }
//! ```

pub mod camera;
pub mod config;
pub mod container;
pub mod entity;
pub mod event;
pub mod game;
pub mod layer;
pub mod renderable;
pub mod sprite;
pub mod time;

pub use camera::Camera;
pub use config::{ConfigError, GameConfig};
pub use container::{Container, Context, ObjectId};
pub use entity::{Entity, GameObject, Phase};
pub use event::{Event, EventPump};
pub use game::Game;
pub use layer::{Layer, LayerMask};
pub use renderable::{DrawCall, DrawKind, Renderable};
pub use sprite::{Anchor, Sprite};
pub use time::{FpsCap, FrameClock};

/// Crate version, from Cargo.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
