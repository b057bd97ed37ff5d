//! Input facts consumed by the runtime
//!
//! Device polling lives outside the runtime. A host samples its keyboard and
//! mouse once per frame and hands the runtime already-debounced facts through
//! [`InputState`]: which keys are held, which were pressed or released this
//! frame, the mouse look delta and the scroll delta.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec2;

/// Keys the runtime and its hosts bind to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// W
    W,
    /// A
    A,
    /// S
    S,
    /// D
    D,
    /// Q
    Q,
    /// E
    E,
    /// R
    R,
    /// C
    C,
    /// Space bar
    Space,
    /// Tab
    Tab,
    /// Escape
    Escape,
    /// Up arrow
    ArrowUp,
    /// Down arrow
    ArrowDown,
    /// Left arrow
    ArrowLeft,
    /// Right arrow
    ArrowRight,
}

/// Per-frame input queries
pub trait InputState {
    /// Whether `key` is currently held down
    fn is_held(&self, key: Key) -> bool;

    /// Whether `key` went down this frame
    fn was_pressed(&self, key: Key) -> bool;

    /// Whether `key` went up this frame
    fn was_released(&self, key: Key) -> bool;

    /// Mouse movement since the previous frame, in device units
    fn mouse_delta(&self) -> Vec2;

    /// Scroll wheel notches since the previous frame
    fn scroll_delta(&self) -> i32;

    /// Whether any of `keys` is held
    fn any_held(&self, keys: &[Key]) -> bool {
        keys.iter().any(|key| self.is_held(*key))
    }
}

/// A plain snapshot of one frame's input facts
#[derive(Debug, Clone)]
pub struct FrameInput {
    held: HashSet<Key>,
    pressed: HashSet<Key>,
    released: HashSet<Key>,
    mouse_delta: Vec2,
    scroll_delta: i32,
}

impl Default for FrameInput {
    fn default() -> Self {
        Self {
            held: HashSet::new(),
            pressed: HashSet::new(),
            released: HashSet::new(),
            mouse_delta: Vec2::zeros(),
            scroll_delta: 0,
        }
    }
}

impl FrameInput {
    /// Create an empty snapshot (nothing held, no motion)
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: mark a key as held
    pub fn with_held(mut self, key: Key) -> Self {
        self.held.insert(key);
        self
    }

    /// Builder pattern: mark a key as pressed this frame (and therefore held)
    pub fn with_pressed(mut self, key: Key) -> Self {
        self.pressed.insert(key);
        self.held.insert(key);
        self
    }

    /// Builder pattern: mark a key as released this frame
    pub fn with_released(mut self, key: Key) -> Self {
        self.released.insert(key);
        self.held.remove(&key);
        self
    }

    /// Builder pattern: set the mouse look delta
    pub fn with_mouse_delta(mut self, dx: f32, dy: f32) -> Self {
        self.mouse_delta = Vec2::new(dx, dy);
        self
    }

    /// Builder pattern: set the scroll delta
    pub fn with_scroll(mut self, notches: i32) -> Self {
        self.scroll_delta = notches;
        self
    }

    /// Advance to the next frame
    ///
    /// Held keys stay held; edge facts and deltas are cleared.
    pub fn next_frame(&mut self) {
        self.pressed.clear();
        self.released.clear();
        self.mouse_delta = Vec2::zeros();
        self.scroll_delta = 0;
    }
}

impl InputState for FrameInput {
    fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    fn was_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    fn was_released(&self, key: Key) -> bool {
        self.released.contains(&key)
    }

    fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    fn scroll_delta(&self) -> i32 {
        self.scroll_delta
    }
}
