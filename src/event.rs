//! Input and window events
//!
//! macroquad exposes input as immediate-mode polling; the event pump turns
//! that into a per-frame list of edge events so entities can react in their
//! `on_event` hook instead of polling every update.

use macroquad::prelude::{
    get_keys_pressed, get_keys_released, is_mouse_button_pressed, is_mouse_button_released,
    is_quit_requested, mouse_position, mouse_wheel, screen_height, screen_width, vec2, KeyCode,
    MouseButton, Vec2,
};

/// One input or window event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The user asked to close the window.
    Quit,
    KeyPressed { key: KeyCode },
    KeyReleased { key: KeyCode },
    MousePressed { button: MouseButton, position: Vec2 },
    MouseReleased { button: MouseButton, position: Vec2 },
    MouseMoved { position: Vec2 },
    MouseWheel { delta: Vec2 },
    /// The window size changed.
    Resized { width: f32, height: f32 },
}

const BUTTONS: [MouseButton; 3] = [MouseButton::Left, MouseButton::Right, MouseButton::Middle];

/// Collects the frame's events from macroquad's input state.
///
/// Mouse movement and window resizes are edge-detected against the
/// previous frame, so the pump must be polled exactly once per frame.
pub struct EventPump {
    last_mouse: Vec2,
    last_size: (f32, f32),
}

impl EventPump {
    pub fn new() -> Self {
        let (mx, my) = mouse_position();
        Self {
            last_mouse: vec2(mx, my),
            last_size: (screen_width(), screen_height()),
        }
    }

    /// Drain this frame's events, in a stable order: quit, keys, mouse
    /// buttons, mouse motion, wheel, resize.
    pub fn poll(&mut self) -> Vec<Event> {
        let mut events = Vec::new();

        if is_quit_requested() {
            events.push(Event::Quit);
        }

        for key in get_keys_pressed() {
            events.push(Event::KeyPressed { key });
        }
        for key in get_keys_released() {
            events.push(Event::KeyReleased { key });
        }

        let (mx, my) = mouse_position();
        let mouse = vec2(mx, my);
        for button in BUTTONS {
            if is_mouse_button_pressed(button) {
                events.push(Event::MousePressed {
                    button,
                    position: mouse,
                });
            }
            if is_mouse_button_released(button) {
                events.push(Event::MouseReleased {
                    button,
                    position: mouse,
                });
            }
        }

        if mouse != self.last_mouse {
            self.last_mouse = mouse;
            events.push(Event::MouseMoved { position: mouse });
        }

        let (wx, wy) = mouse_wheel();
        if wx != 0.0 || wy != 0.0 {
            events.push(Event::MouseWheel {
                delta: vec2(wx, wy),
            });
        }

        let size = (screen_width(), screen_height());
        if size != self.last_size {
            self.last_size = size;
            events.push(Event::Resized {
                width: size.0,
                height: size.1,
            });
        }

        events
    }
}

impl Default for EventPump {
    fn default() -> Self {
        Self::new()
    }
}
