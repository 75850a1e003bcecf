//! Object container
//!
//! The container holds every live game object and drives phase dispatch.
//! Object slots use generational indices so a stale [`ObjectId`] can never
//! alias a reused slot.
//!
//! All structural mutation (spawn, despawn, enable/disable) is deferred:
//! commands queue up during the frame and land at `flush()`, which the game
//! loop runs once per frame before event processing. This keeps dispatch
//! iteration safe while objects spawn siblings or remove themselves.

use crate::camera::Camera;
use crate::entity::{GameObject, Phase};
use crate::event::Event;
use crate::layer::Layer;
use crate::renderable::DrawCall;

/// A unique handle to a container slot.
///
/// Consists of a slot index and a generation. The generation increments
/// when a slot is reused, so ids held past a despawn simply stop matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId {
    index: u32,
    generation: u32,
}

impl ObjectId {
    fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index of this id.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Generation of this id.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// Allocates and tracks object slot lifetimes.
///
/// Freed slots are reused with an incremented generation, invalidating
/// any ids that still point at them.
struct ObjectAllocator {
    generations: Vec<u32>,
    free_indices: Vec<u32>,
    next_fresh: u32,
    alive_count: u32,
}

impl ObjectAllocator {
    fn new() -> Self {
        Self {
            generations: Vec::new(),
            free_indices: Vec::new(),
            next_fresh: 0,
            alive_count: 0,
        }
    }

    fn allocate(&mut self) -> ObjectId {
        self.alive_count += 1;

        if let Some(index) = self.free_indices.pop() {
            // Reuse a freed slot - generation was already incremented on free
            ObjectId::new(index, self.generations[index as usize])
        } else {
            let index = self.next_fresh;
            self.next_fresh += 1;
            self.generations.push(0);
            ObjectId::new(index, 0)
        }
    }

    /// Free a slot. Returns false if the id was already stale.
    fn free(&mut self, id: ObjectId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        self.generations[id.index as usize] += 1;
        self.free_indices.push(id.index);
        self.alive_count -= 1;
        true
    }

    fn is_alive(&self, id: ObjectId) -> bool {
        let idx = id.index as usize;
        idx < self.generations.len() && self.generations[idx] == id.generation
    }
}

/// A deferred structural mutation.
enum Command {
    Spawn {
        id: ObjectId,
        object: Box<dyn GameObject>,
    },
    Despawn(ObjectId),
    SetEnabled(ObjectId, bool),
}

/// One sorted entry of the render queue.
#[derive(Clone)]
pub struct QueuedDraw {
    pub layer: Layer,
    pub draw_index: i32,
    pub call: DrawCall,
}

/// Registry of all live game objects.
pub struct Container {
    alloc: ObjectAllocator,
    /// Slot storage, index-aligned with the allocator.
    objects: Vec<Option<Box<dyn GameObject>>>,
    enabled: Vec<bool>,
    pending: Vec<Command>,
}

impl Container {
    pub fn new() -> Self {
        Self {
            alloc: ObjectAllocator::new(),
            objects: Vec::new(),
            enabled: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Queue an object for insertion. The id is valid immediately, but the
    /// object joins dispatch only after the next flush.
    pub fn spawn(&mut self, object: Box<dyn GameObject>) -> ObjectId {
        let id = self.alloc.allocate();
        self.pending.push(Command::Spawn { id, object });
        id
    }

    /// Queue an object for removal at the next flush.
    pub fn despawn(&mut self, id: ObjectId) {
        self.pending.push(Command::Despawn(id));
    }

    /// Queue an enable/disable toggle. Disabled objects stay alive but are
    /// skipped by every phase, including render.
    pub fn set_enabled(&mut self, id: ObjectId, enabled: bool) {
        self.pending.push(Command::SetEnabled(id, enabled));
    }

    /// Whether `id` refers to a live object, counting pending commands.
    pub fn is_alive(&self, id: ObjectId) -> bool {
        for command in self.pending.iter().rev() {
            match command {
                Command::Spawn { id: other, .. } if *other == id => return true,
                Command::Despawn(other) if *other == id => return false,
                _ => {}
            }
        }
        self.alloc.is_alive(id)
    }

    /// Whether `id` will be enabled once pending commands land.
    pub fn is_enabled(&self, id: ObjectId) -> bool {
        for command in self.pending.iter().rev() {
            match command {
                Command::Spawn { id: other, .. } if *other == id => return true,
                Command::Despawn(other) if *other == id => return false,
                Command::SetEnabled(other, value) if *other == id => {
                    return *value && self.alloc.is_alive(id);
                }
                _ => {}
            }
        }
        // The slot itself may be empty mid-dispatch (the object is taken
        // out while its hook runs), so enabledness comes from the flag,
        // not from slot occupancy.
        let idx = id.index as usize;
        self.alloc.is_alive(id) && idx < self.enabled.len() && self.enabled[idx]
    }

    /// Number of live objects, counting pending spawns and despawns.
    pub fn len(&self) -> usize {
        self.alloc.alive_count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply all pending commands, in the order they were issued.
    ///
    /// The game loop calls this once per frame, before event dispatch.
    pub fn flush(&mut self) {
        for command in std::mem::take(&mut self.pending) {
            match command {
                Command::Spawn { id, object } => {
                    // A despawn queued after the spawn frees the id first,
                    // in which case the object is dropped here.
                    if !self.alloc.is_alive(id) {
                        continue;
                    }
                    let idx = id.index as usize;
                    if idx >= self.objects.len() {
                        self.objects.resize_with(idx + 1, || None);
                        self.enabled.resize(idx + 1, false);
                    }
                    self.objects[idx] = Some(object);
                    self.enabled[idx] = true;
                }
                Command::Despawn(id) => {
                    if self.alloc.free(id) {
                        let idx = id.index as usize;
                        if idx < self.objects.len() {
                            self.objects[idx] = None;
                            self.enabled[idx] = false;
                        }
                    }
                }
                Command::SetEnabled(id, value) => {
                    let idx = id.index as usize;
                    if self.alloc.is_alive(id) && idx < self.objects.len() {
                        self.enabled[idx] = value;
                    }
                }
            }
        }
    }

    /// Run one update phase over every enabled object.
    ///
    /// `Phase::Events` and `Phase::Render` have dedicated entry points
    /// (`dispatch_event` and `render_queue`) and are no-ops here.
    pub fn dispatch(
        &mut self,
        phase: Phase,
        delta_time: f32,
        cameras: &mut Vec<Camera>,
        quit: &mut bool,
    ) {
        for index in 0..self.objects.len() {
            if !self.enabled[index] {
                continue;
            }
            // Take the object out of its slot so the context can borrow
            // the container while the hook runs.
            let Some(mut object) = self.objects[index].take() else {
                continue;
            };
            {
                let mut ctx = Context {
                    container: self,
                    cameras,
                    quit,
                };
                match phase {
                    Phase::ConstUpdate => object.const_update(delta_time, &mut ctx),
                    Phase::PreUpdate => object.pre_update(delta_time, &mut ctx),
                    Phase::Update => object.update(delta_time, &mut ctx),
                    Phase::PostUpdate => object.post_update(delta_time, &mut ctx),
                    Phase::Events | Phase::Render => {}
                }
            }
            self.objects[index] = Some(object);
        }
    }

    /// Deliver one event to every enabled object.
    pub fn dispatch_event(&mut self, event: &Event, cameras: &mut Vec<Camera>, quit: &mut bool) {
        for index in 0..self.objects.len() {
            if !self.enabled[index] {
                continue;
            }
            let Some(mut object) = self.objects[index].take() else {
                continue;
            };
            {
                let mut ctx = Context {
                    container: self,
                    cameras,
                    quit,
                };
                object.on_event(event, &mut ctx);
            }
            self.objects[index] = Some(object);
        }
    }

    /// Collect every enabled object's draw call, sorted by
    /// `(layer order, draw index)`.
    pub fn render_queue(&self, delta_time: f32) -> Vec<QueuedDraw> {
        let mut queue: Vec<QueuedDraw> = Vec::new();
        for (index, slot) in self.objects.iter().enumerate() {
            if !self.enabled[index] {
                continue;
            }
            let Some(object) = slot else { continue };
            if let Some(call) = object.render(delta_time) {
                queue.push(QueuedDraw {
                    layer: object.layer(),
                    draw_index: object.draw_index(),
                    call,
                });
            }
        }
        queue.sort_by_key(|item| (item.layer.order(), draw_order_key(item.draw_index)));
        queue
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

/// Sort key for draw indices within a layer.
///
/// Orders `0, 1, 2, ... then -1, -2, -3, ...`: negative indices draw after
/// all non-negative ones, more negative later (higher on screen).
fn draw_order_key(index: i32) -> (u8, i64) {
    if index >= 0 {
        (0, index as i64)
    } else {
        (1, -(index as i64))
    }
}

/// Dispatch handle passed to every entity hook.
///
/// Structural changes issued here are deferred to the next container
/// flush; camera access and the quit request are immediate.
pub struct Context<'a> {
    container: &'a mut Container,
    cameras: &'a mut Vec<Camera>,
    quit: &'a mut bool,
}

impl Context<'_> {
    /// Queue an object for insertion; see [`Container::spawn`].
    pub fn spawn(&mut self, object: Box<dyn GameObject>) -> ObjectId {
        self.container.spawn(object)
    }

    /// Queue an object for removal at the next flush.
    pub fn despawn(&mut self, id: ObjectId) {
        self.container.despawn(id);
    }

    /// Queue an enable/disable toggle.
    pub fn set_enabled(&mut self, id: ObjectId, enabled: bool) {
        self.container.set_enabled(id, enabled);
    }

    /// Whether `id` will be enabled once pending commands land.
    pub fn is_enabled(&self, id: ObjectId) -> bool {
        self.container.is_enabled(id)
    }

    /// Whether `id` refers to a live object, counting pending commands.
    pub fn is_alive(&self, id: ObjectId) -> bool {
        self.container.is_alive(id)
    }

    /// The game's cameras, in the order they were added.
    pub fn cameras(&mut self) -> &mut Vec<Camera> {
        self.cameras
    }

    /// Camera by index, if present.
    pub fn camera_mut(&mut self, index: usize) -> Option<&mut Camera> {
        self.cameras.get_mut(index)
    }

    /// Request that the game loop stop after this frame.
    pub fn quit(&mut self) {
        *self.quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use crate::renderable::Renderable;
    use macroquad::prelude::{Rect, WHITE};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    type TraceLog = Rc<RefCell<Vec<String>>>;

    /// Records which hooks ran on it.
    struct Probe {
        name: &'static str,
        log: TraceLog,
    }

    impl Entity for Probe {
        fn update(&mut self, _dt: f32, _ctx: &mut Context) {
            self.log.borrow_mut().push(format!("{}:update", self.name));
        }

        fn const_update(&mut self, _ts: f32, _ctx: &mut Context) {
            self.log.borrow_mut().push(format!("{}:const", self.name));
        }
    }

    impl Renderable for Probe {}

    /// Draw-only object with a fixed layer and draw index.
    struct Shape {
        layer: Layer,
        draw_index: i32,
    }

    impl Entity for Shape {}

    impl Renderable for Shape {
        fn layer(&self) -> Layer {
            self.layer
        }

        fn draw_index(&self) -> i32 {
            self.draw_index
        }

        fn render(&self, _dt: f32) -> Option<DrawCall> {
            Some(DrawCall::solid(
                Rect::new(0.0, 0.0, 1.0, 1.0),
                WHITE,
            ))
        }
    }

    /// Spawns a probe sibling and then removes itself, once.
    struct Mitosis {
        own_id: ObjectId,
        log: TraceLog,
    }

    impl Entity for Mitosis {
        fn update(&mut self, _dt: f32, ctx: &mut Context) {
            ctx.spawn(Box::new(Probe {
                name: "child",
                log: Rc::clone(&self.log),
            }));
            ctx.despawn(self.own_id);
        }
    }

    impl Renderable for Mitosis {}

    fn dispatch_update(container: &mut Container) {
        let mut cameras = Vec::new();
        let mut quit = false;
        container.dispatch(Phase::Update, 0.016, &mut cameras, &mut quit);
    }

    #[test]
    fn test_spawn_is_deferred_until_flush() {
        let mut container = Container::new();
        let log: TraceLog = Rc::default();

        let id = container.spawn(Box::new(Probe {
            name: "a",
            log: Rc::clone(&log),
        }));
        assert!(container.is_enabled(id));

        // Not flushed yet: dispatch sees nothing.
        dispatch_update(&mut container);
        assert!(log.borrow().is_empty());

        container.flush();
        dispatch_update(&mut container);
        assert_eq!(log.borrow().as_slice(), ["a:update"]);
    }

    #[test]
    fn test_stale_id_does_not_alias_reused_slot() {
        let mut container = Container::new();
        let log: TraceLog = Rc::default();

        let first = container.spawn(Box::new(Probe {
            name: "first",
            log: Rc::clone(&log),
        }));
        container.flush();
        container.despawn(first);
        container.flush();

        let second = container.spawn(Box::new(Probe {
            name: "second",
            log: Rc::clone(&log),
        }));
        container.flush();

        // Same slot, different generation.
        assert_eq!(second.index(), first.index());
        assert_ne!(second.generation(), first.generation());
        assert!(!container.is_alive(first));
        assert!(container.is_alive(second));

        // Commands addressed to the stale id must not touch the new object.
        container.set_enabled(first, false);
        container.flush();
        assert!(container.is_enabled(second));
    }

    #[test]
    fn test_disable_skips_dispatch() {
        let mut container = Container::new();
        let log: TraceLog = Rc::default();

        let id = container.spawn(Box::new(Probe {
            name: "a",
            log: Rc::clone(&log),
        }));
        container.flush();

        container.set_enabled(id, false);
        assert!(!container.is_enabled(id));
        assert!(container.is_alive(id));
        container.flush();

        dispatch_update(&mut container);
        assert!(log.borrow().is_empty());

        container.set_enabled(id, true);
        container.flush();
        dispatch_update(&mut container);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_spawn_and_despawn_during_dispatch() {
        let mut container = Container::new();
        let log: TraceLog = Rc::default();

        // Two-step spawn so the object can know its own id.
        let id = container.alloc.allocate();
        container.pending.push(Command::Spawn {
            id,
            object: Box::new(Mitosis {
                own_id: id,
                log: Rc::clone(&log),
            }),
        });
        container.flush();

        dispatch_update(&mut container);
        container.flush();
        assert!(!container.is_alive(id));
        assert_eq!(container.len(), 1);

        // Only the child remains.
        dispatch_update(&mut container);
        assert_eq!(log.borrow().as_slice(), ["child:update"]);
    }

    #[test]
    fn test_is_enabled_during_own_update() {
        struct SelfCheck {
            own_id: ObjectId,
            saw: Rc<Cell<Option<bool>>>,
        }
        impl Entity for SelfCheck {
            fn update(&mut self, _dt: f32, ctx: &mut Context) {
                self.saw.set(Some(ctx.is_enabled(self.own_id)));
            }
        }
        impl Renderable for SelfCheck {}

        let mut container = Container::new();
        let saw: Rc<Cell<Option<bool>>> = Rc::default();

        let id = container.alloc.allocate();
        container.pending.push(Command::Spawn {
            id,
            object: Box::new(SelfCheck {
                own_id: id,
                saw: Rc::clone(&saw),
            }),
        });
        container.flush();

        // An enabled object with no pending commands must see itself as
        // enabled even while its own hook is running.
        dispatch_update(&mut container);
        assert_eq!(saw.get(), Some(true));
    }

    #[test]
    fn test_spawn_then_despawn_same_frame() {
        let mut container = Container::new();

        let id = container.spawn(Box::new(Shape {
            layer: Layer::Midground,
            draw_index: 0,
        }));
        container.despawn(id);
        assert!(!container.is_alive(id));

        container.flush();
        assert_eq!(container.len(), 0);
        assert!(container.render_queue(0.0).is_empty());
    }

    #[test]
    fn test_render_queue_layer_order() {
        let mut container = Container::new();
        container.spawn(Box::new(Shape {
            layer: Layer::Ui,
            draw_index: 0,
        }));
        container.spawn(Box::new(Shape {
            layer: Layer::Background,
            draw_index: 5,
        }));
        container.spawn(Box::new(Shape {
            layer: Layer::Foreground,
            draw_index: -2,
        }));
        container.spawn(Box::new(Shape {
            layer: Layer::Midground,
            draw_index: 0,
        }));
        container.flush();

        let layers: Vec<Layer> = container
            .render_queue(0.0)
            .iter()
            .map(|item| item.layer)
            .collect();
        assert_eq!(
            layers,
            [Layer::Background, Layer::Midground, Layer::Foreground, Layer::Ui]
        );
    }

    #[test]
    fn test_negative_draw_indices_draw_last() {
        let mut container = Container::new();
        for draw_index in [3, -1, 0, -5, 1] {
            container.spawn(Box::new(Shape {
                layer: Layer::Midground,
                draw_index,
            }));
        }
        container.flush();

        let order: Vec<i32> = container
            .render_queue(0.0)
            .iter()
            .map(|item| item.draw_index)
            .collect();
        assert_eq!(order, [0, 1, 3, -1, -5]);
    }

    #[test]
    fn test_disabled_objects_do_not_render() {
        let mut container = Container::new();
        let id = container.spawn(Box::new(Shape {
            layer: Layer::Midground,
            draw_index: 0,
        }));
        container.flush();
        assert_eq!(container.render_queue(0.0).len(), 1);

        container.set_enabled(id, false);
        container.flush();
        assert!(container.render_queue(0.0).is_empty());
    }

    #[test]
    fn test_draw_order_key() {
        let mut indices = vec![-5, -1, 0, 2, 7, -3, 1];
        indices.sort_by_key(|i| draw_order_key(*i));
        assert_eq!(indices, [0, 1, 2, 7, -1, -3, -5]);
    }

    #[test]
    fn test_quit_signal() {
        struct Quitter;
        impl Entity for Quitter {
            fn update(&mut self, _dt: f32, ctx: &mut Context) {
                ctx.quit();
            }
        }
        impl Renderable for Quitter {}

        let mut container = Container::new();
        container.spawn(Box::new(Quitter));
        container.flush();

        let mut cameras = Vec::new();
        let mut quit = false;
        container.dispatch(Phase::Update, 0.016, &mut cameras, &mut quit);
        assert!(quit);
    }
}
