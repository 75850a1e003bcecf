//! Entity behavior hooks
//!
//! An `Entity` is any object with per-frame behavior. The game loop calls
//! one hook per phase on every enabled object; all hooks default to no-ops,
//! so implementors only override the phases they care about.
//!
//! Phase order within a frame:
//! 1. events        - input and window events, one `on_event` call each
//! 2. const_update  - zero or more fixed-timestep steps (physics-friendly)
//! 3. pre_update    - logic that must run before the main update
//! 4. update        - the main game logic phase
//! 5. post_update   - logic that must run after the main update
//! 6. render        - see the `renderable` module

use crate::container::Context;
use crate::event::Event;
use crate::renderable::Renderable;

/// The six stages of a single loop iteration, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Events,
    ConstUpdate,
    PreUpdate,
    Update,
    PostUpdate,
    Render,
}

/// Per-frame behavior hooks. All hooks are optional.
///
/// Structural changes (spawning, despawning, enabling) go through the
/// [`Context`] and take effect at the next container flush, so hooks may
/// freely issue them while dispatch is in progress.
pub trait Entity {
    /// Called once per input/window event, before any update phase.
    fn on_event(&mut self, _event: &Event, _ctx: &mut Context) {}

    /// Called at a fixed timestep, zero or more times per frame.
    ///
    /// `timestep` is the fixed logical step length in seconds, not the
    /// real frame time. Use this for anything sensitive to frame-time
    /// variation, such as physics integration.
    fn const_update(&mut self, _timestep: f32, _ctx: &mut Context) {}

    /// Early update, before the main update phase.
    fn pre_update(&mut self, _delta_time: f32, _ctx: &mut Context) {}

    /// Main update phase.
    fn update(&mut self, _delta_time: f32, _ctx: &mut Context) {}

    /// Late update, after the main update phase.
    fn post_update(&mut self, _delta_time: f32, _ctx: &mut Context) {}
}

/// A live game object: behavior plus (optional) drawing.
///
/// Blanket-implemented for anything that implements both [`Entity`] and
/// [`Renderable`]. Both traits default every method, so a logic-only
/// object adds an empty `impl Renderable for T {}` and a draw-only object
/// an empty `impl Entity for T {}`.
pub trait GameObject: Entity + Renderable {}

impl<T: Entity + Renderable> GameObject for T {}
