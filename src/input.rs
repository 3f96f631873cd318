//! Keyboard tracking and the key-to-event mapping.
//!
//! [`Input`] accumulates raw winit keyboard state; [`Input::events`]
//! translates it once per frame into the named [`InputEvent`]s the state
//! machine consumes. No raw device detail crosses into the core.
//!
//! Bindings:
//!
//! | Key         | Event                        |
//! |-------------|------------------------------|
//! | `W` / `S`   | wireframe / filled rendering |
//! | `1`–`4`     | camera presets               |
//! | `A` / `D`   | drive the tank (held)        |
//! | `↑` / `↓`   | cannon pitch (held)          |
//! | `←` / `→`   | turret yaw (held)            |
//! | `Space`     | fire                         |

use std::collections::HashSet;

use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::camera::CameraPreset;
use crate::state::{Direction, InputEvent, RenderMode};

/// Tracks which keys are held and which were pressed this frame.
#[derive(Default)]
pub struct Input {
    keys_down: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call at the start of each frame to reset per-frame state.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
    }

    /// Process a window event and update keyboard state.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        if let WindowEvent::KeyboardInput { event, .. } = event {
            if let PhysicalKey::Code(key) = event.physical_key {
                match event.state {
                    ElementState::Pressed => {
                        if !self.keys_down.contains(&key) {
                            self.keys_pressed.insert(key);
                        }
                        self.keys_down.insert(key);
                    }
                    ElementState::Released => {
                        self.keys_down.remove(&key);
                    }
                }
            }
        }
    }

    /// Returns true if the key is currently held down.
    pub fn key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Returns true if the key was pressed this frame.
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// The frame's named input events, in a fixed order.
    ///
    /// One-shot actions (mode, preset, fire) trigger on the press edge;
    /// motion keys emit one event per frame while held, which is what
    /// gives the tank its steady drive and turret sweep rates.
    pub fn events(&self) -> Vec<InputEvent> {
        let mut events = Vec::new();

        if self.key_pressed(KeyCode::KeyW) {
            events.push(InputEvent::SetRenderMode(RenderMode::Wireframe));
        }
        if self.key_pressed(KeyCode::KeyS) {
            events.push(InputEvent::SetRenderMode(RenderMode::Filled));
        }

        for (key, preset) in [
            (KeyCode::Digit1, CameraPreset::Isometric),
            (KeyCode::Digit2, CameraPreset::Front),
            (KeyCode::Digit3, CameraPreset::Side),
            (KeyCode::Digit4, CameraPreset::TopDown),
        ] {
            if self.key_pressed(key) {
                events.push(InputEvent::SetCameraPreset(preset));
            }
        }

        if self.key_down(KeyCode::KeyD) {
            events.push(InputEvent::AdvanceLinear(Direction::Positive));
        }
        if self.key_down(KeyCode::KeyA) {
            events.push(InputEvent::AdvanceLinear(Direction::Negative));
        }
        if self.key_down(KeyCode::ArrowUp) {
            events.push(InputEvent::AdjustPitch(Direction::Positive));
        }
        if self.key_down(KeyCode::ArrowDown) {
            events.push(InputEvent::AdjustPitch(Direction::Negative));
        }
        if self.key_down(KeyCode::ArrowLeft) {
            events.push(InputEvent::AdjustYaw(Direction::Positive));
        }
        if self.key_down(KeyCode::ArrowRight) {
            events.push(InputEvent::AdjustYaw(Direction::Negative));
        }

        if self.key_pressed(KeyCode::Space) {
            events.push(InputEvent::FireOnce);
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(input: &mut Input, key: KeyCode) {
        // Drive the state directly; synthesizing winit events in tests is
        // more ceremony than it is worth.
        if !input.keys_down.contains(&key) {
            input.keys_pressed.insert(key);
        }
        input.keys_down.insert(key);
    }

    #[test]
    fn one_shot_keys_fire_only_on_the_press_edge() {
        let mut input = Input::new();
        press(&mut input, KeyCode::Space);
        assert_eq!(input.events(), vec![InputEvent::FireOnce]);

        // Still held next frame: no repeat.
        input.begin_frame();
        assert!(input.events().is_empty());
    }

    #[test]
    fn held_motion_keys_repeat_every_frame() {
        let mut input = Input::new();
        press(&mut input, KeyCode::KeyD);
        assert_eq!(
            input.events(),
            vec![InputEvent::AdvanceLinear(Direction::Positive)]
        );

        input.begin_frame();
        assert_eq!(
            input.events(),
            vec![InputEvent::AdvanceLinear(Direction::Positive)]
        );
    }

    #[test]
    fn event_order_is_stable() {
        let mut input = Input::new();
        press(&mut input, KeyCode::Space);
        press(&mut input, KeyCode::KeyW);
        press(&mut input, KeyCode::ArrowUp);

        assert_eq!(
            input.events(),
            vec![
                InputEvent::SetRenderMode(RenderMode::Wireframe),
                InputEvent::AdjustPitch(Direction::Positive),
                InputEvent::FireOnce,
            ]
        );
    }
}
