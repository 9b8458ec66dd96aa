//! Keyboard input handling and the mapping to per-tick control intents.

use engine_core::Controls;
use std::collections::HashSet;

/// Manages keyboard state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,
    /// Keys released this frame.
    keys_released: HashSet<KeyCode>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call at the start of each frame.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.keys_held.contains(&key) {
                    self.keys_pressed.insert(key);
                }
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
                self.keys_released.insert(key);
            }
        }
    }

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a key was released this frame.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    /// Check if quit was pressed (Escape).
    pub fn is_quit_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::Escape)
    }

    /// Snapshot the current key state into the simulation's control intents.
    ///
    /// Bindings: arrow keys fly the carrier, Q/A drive the left winch
    /// (extend/retract), E/D the right winch. The snapshot is a plain value;
    /// the simulation never reads the key state directly.
    pub fn controls(&self) -> Controls {
        Controls {
            left: self.is_key_held(KeyCode::ArrowLeft),
            right: self.is_key_held(KeyCode::ArrowRight),
            ascend: self.is_key_held(KeyCode::ArrowUp),
            descend: self.is_key_held(KeyCode::ArrowDown),
            left_extend: self.is_key_held(KeyCode::KeyQ),
            left_retract: self.is_key_held(KeyCode::KeyA),
            right_extend: self.is_key_held(KeyCode::KeyE),
            right_retract: self.is_key_held(KeyCode::KeyD),
        }
    }
}

// Re-export for convenience
pub use winit::event::ElementState;
pub use winit::keyboard::KeyCode;
