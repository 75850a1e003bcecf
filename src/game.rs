//! The game loop
//!
//! `Game` ties the pieces together: it owns the container, the cameras,
//! and the clocks, and runs the six phases each frame until something
//! requests a quit.
//!
//! Render order per frame: for each world layer (background, midground,
//! foreground), each camera draws its visible slice into its viewport;
//! with no cameras the screen itself acts as an identity camera. The UI
//! layer then draws last, directly in screen space.

use macroquad::logging::{info, warn};
use macroquad::prelude::{
    clear_background, draw_rectangle, draw_text, draw_texture_ex, get_frame_time, get_time,
    next_frame, prevent_quit, screen_height, screen_width, vec2, Color, DrawTextureParams, Rect,
};

use crate::camera::Camera;
use crate::config::GameConfig;
use crate::container::{Container, ObjectId};
use crate::entity::{GameObject, Phase};
use crate::event::{Event, EventPump};
use crate::layer::Layer;
use crate::renderable::{DrawCall, DrawKind};
use crate::time::{FpsCap, FrameClock};

/// A running game: container, cameras, clocks, and the loop itself.
pub struct Game {
    config: GameConfig,
    container: Container,
    cameras: Vec<Camera>,
    clock: FrameClock,
    fps_cap: FpsCap,
    clear_color: Color,
    quit: bool,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        if config.tick_rate < 0.0 {
            warn!("negative tick_rate {} treated as disabled", config.tick_rate);
        }
        info!("kiln {} starting: {}", crate::VERSION, config.title);

        let clock = FrameClock::new(config.tick_rate, config.max_accumulated_time);
        let fps_cap = FpsCap::new(config.fps_cap);
        let clear_color = config.clear_color();
        Self {
            config,
            container: Container::new(),
            cameras: Vec::new(),
            clock,
            fps_cap,
            clear_color,
            quit: false,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Queue an object for insertion; it joins dispatch at the start of
    /// the next frame.
    pub fn spawn(&mut self, object: Box<dyn GameObject>) -> ObjectId {
        self.container.spawn(object)
    }

    pub fn container(&mut self) -> &mut Container {
        &mut self.container
    }

    /// Add a camera. Cameras draw the world layers in the order added.
    pub fn add_camera(&mut self, camera: Camera) -> usize {
        self.cameras.push(camera);
        self.cameras.len() - 1
    }

    pub fn cameras(&mut self) -> &mut Vec<Camera> {
        &mut self.cameras
    }

    /// Stop the loop after the current frame.
    pub fn quit(&mut self) {
        self.quit = true;
    }

    /// Run the loop until quit. Must be called from a macroquad context.
    pub async fn run(mut self) {
        prevent_quit();
        let mut pump = EventPump::new();

        loop {
            let frame_start = get_time();
            let delta_time = get_frame_time();

            self.container.flush();

            for event in pump.poll() {
                if event == Event::Quit {
                    self.quit = true;
                }
                self.container
                    .dispatch_event(&event, &mut self.cameras, &mut self.quit);
            }

            let steps = self.clock.advance(delta_time);
            let timestep = self.clock.timestep();
            for _ in 0..steps {
                self.container
                    .dispatch(Phase::ConstUpdate, timestep, &mut self.cameras, &mut self.quit);
            }

            for phase in [Phase::PreUpdate, Phase::Update, Phase::PostUpdate] {
                self.container
                    .dispatch(phase, delta_time, &mut self.cameras, &mut self.quit);
            }

            self.render(delta_time);

            if self.quit {
                info!("quit requested, stopping loop");
                break;
            }

            self.wait_for_frame_cap(frame_start);
            next_frame().await;
        }
    }

    fn render(&self, delta_time: f32) {
        clear_background(self.clear_color);

        let queue = self.container.render_queue(delta_time);
        let screen = Rect::new(0.0, 0.0, screen_width(), screen_height());

        for layer in Layer::WORLD {
            let items = queue.iter().filter(|item| item.layer == layer);
            if self.cameras.is_empty() {
                // No cameras: the screen is an identity view of the world.
                for item in items {
                    draw_call(&item.call, item.call.dest, 1.0);
                }
            } else {
                for camera in &self.cameras {
                    if camera.mask.excludes(layer) {
                        continue;
                    }
                    let target = camera.viewport.unwrap_or(screen);
                    let scale = camera.pixel_scale(target);
                    for item in items.clone() {
                        if culled(&item.call, camera) {
                            continue;
                        }
                        let dest = camera.project(&item.call.dest, target);
                        draw_call_clipped(&item.call, dest, target, scale);
                    }
                }
            }
        }

        for item in queue.iter().filter(|item| item.layer == Layer::Ui) {
            draw_call(&item.call, item.call.dest, 1.0);
        }
    }

    fn wait_for_frame_cap(&self, frame_start: f64) {
        let Some(target_frame_time) = self.fps_cap.frame_time() else {
            return;
        };
        let elapsed = get_time() - frame_start;
        if target_frame_time - elapsed <= 0.0 {
            return;
        }
        // Native: sleep for the bulk, then spin-wait for precision
        #[cfg(not(target_arch = "wasm32"))]
        {
            let spin_margin = 0.002; // 2ms
            while get_time() - frame_start + spin_margin < target_frame_time {
                std::thread::sleep(std::time::Duration::from_millis(1));
            }
            while get_time() - frame_start < target_frame_time {
                std::hint::spin_loop();
            }
        }
        // WASM: spin only (no thread::sleep available)
        #[cfg(target_arch = "wasm32")]
        {
            while get_time() - frame_start < target_frame_time {}
        }
    }
}

/// Whether a camera skips this call entirely.
///
/// Text has no world-space extent, only a baseline point, so it is never
/// view-culled; everything else culls against the camera's view rect.
fn culled(call: &DrawCall, camera: &Camera) -> bool {
    !matches!(call.kind, DrawKind::Text { .. }) && !camera.in_view(&call.dest)
}

/// Issue one draw call clipped to a camera's target region.
///
/// A projected rect that straddles the target edge is cut down to the
/// overlap, with texture sources narrowed to the visible portion, so one
/// camera never paints into another's viewport. Text can only be drawn
/// whole and is dropped when its baseline falls outside the target.
fn draw_call_clipped(call: &DrawCall, dest: Rect, target: Rect, text_scale: f32) {
    match &call.kind {
        DrawKind::Solid => {
            if let Some(visible) = dest.intersect(target) {
                draw_rectangle(visible.x, visible.y, visible.w, visible.h, call.color);
            }
        }
        DrawKind::Texture {
            texture,
            source,
            rotation,
            flip_x,
            flip_y,
        } => {
            let Some(visible) = dest.intersect(target) else {
                return;
            };
            let base = source
                .unwrap_or_else(|| Rect::new(0.0, 0.0, texture.width(), texture.height()));
            // Rotation is applied to the visible rect, so a rotated call
            // clips approximately once it crosses the target edge.
            draw_texture_ex(
                texture,
                visible.x,
                visible.y,
                call.color,
                DrawTextureParams {
                    dest_size: Some(vec2(visible.w, visible.h)),
                    source: Some(clip_source(base, dest, visible, *flip_x, *flip_y)),
                    rotation: *rotation,
                    flip_x: *flip_x,
                    flip_y: *flip_y,
                    ..Default::default()
                },
            );
        }
        DrawKind::Text { text, font_size } => {
            if target.contains(dest.point()) {
                draw_text(text, dest.x, dest.y, font_size * text_scale, call.color);
            }
        }
    }
}

/// Sub-rect of `base` that corresponds to the `visible` portion of
/// `dest`, mirrored when the draw is flipped.
fn clip_source(base: Rect, dest: Rect, visible: Rect, flip_x: bool, flip_y: bool) -> Rect {
    if dest.w <= 0.0 || dest.h <= 0.0 {
        return base;
    }
    let fx0 = (visible.x - dest.x) / dest.w;
    let fx1 = fx0 + visible.w / dest.w;
    let fy0 = (visible.y - dest.y) / dest.h;
    let fy1 = fy0 + visible.h / dest.h;
    let (sx0, sx1) = if flip_x { (1.0 - fx1, 1.0 - fx0) } else { (fx0, fx1) };
    let (sy0, sy1) = if flip_y { (1.0 - fy1, 1.0 - fy0) } else { (fy0, fy1) };
    Rect::new(
        base.x + sx0 * base.w,
        base.y + sy0 * base.h,
        (sx1 - sx0) * base.w,
        (sy1 - sy0) * base.h,
    )
}

/// Issue one draw call at the given screen rect, unclipped.
///
/// `text_scale` converts world-space font sizes to pixels; screen-space
/// calls pass 1.
fn draw_call(call: &DrawCall, dest: Rect, text_scale: f32) {
    match &call.kind {
        DrawKind::Solid => {
            draw_rectangle(dest.x, dest.y, dest.w, dest.h, call.color);
        }
        DrawKind::Texture {
            texture,
            source,
            rotation,
            flip_x,
            flip_y,
        } => {
            draw_texture_ex(
                texture,
                dest.x,
                dest.y,
                call.color,
                DrawTextureParams {
                    dest_size: Some(vec2(dest.w, dest.h)),
                    source: *source,
                    rotation: *rotation,
                    flip_x: *flip_x,
                    flip_y: *flip_y,
                    ..Default::default()
                },
            );
        }
        DrawKind::Text { text, font_size } => {
            draw_text(text, dest.x, dest.y, font_size * text_scale, call.color);
        }
    }
}
