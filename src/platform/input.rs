//! Keyboard state and key edges
//!
//! Hosts feed raw key down/up notifications; the game reads edges, one per
//! up-to-down transition. Auto-repeat while a key is held does not produce
//! more edges.

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Jump,
    CycleColor,
    Autopilot,
    Restart,
}

impl Key {
    pub const ALL: [Key; 4] = [Key::Jump, Key::CycleColor, Key::Autopilot, Key::Restart];

    #[inline]
    fn bit(self) -> u8 {
        match self {
            Key::Jump => 1,
            Key::CycleColor => 1 << 1,
            Key::Autopilot => 1 << 2,
            Key::Restart => 1 << 3,
        }
    }

    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key {
            " " | "ArrowUp" | "w" | "W" => Some(Key::Jump),
            "c" | "C" => Some(Key::CycleColor),
            "a" | "A" => Some(Key::Autopilot),
            "r" | "R" => Some(Key::Restart),
            _ => None,
        }
    }
}

/// Set of keys pressed during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyEdges(u8);

impl KeyEdges {
    pub fn none() -> Self {
        Self(0)
    }

    pub fn with(mut self, key: Key) -> Self {
        self.insert(key);
        self
    }

    pub fn insert(&mut self, key: Key) {
        self.0 |= key.bit();
    }

    #[inline]
    pub fn pressed(&self, key: Key) -> bool {
        self.0 & key.bit() != 0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Tracks which keys are held and which went down since the last frame
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: KeyEdges,
    pressed: KeyEdges,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key went down (repeats while held are ignored)
    pub fn key_down(&mut self, key: Key) {
        if !self.held.pressed(key) {
            self.held.insert(key);
            self.pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.0 &= !key.bit();
    }

    /// A press without a matching release (clicks, taps)
    pub fn tap(&mut self, key: Key) {
        self.pressed.insert(key);
    }

    #[inline]
    pub fn is_held(&self, key: Key) -> bool {
        self.held.pressed(key)
    }

    /// Edges collected since the previous call
    pub fn take_pressed(&mut self) -> KeyEdges {
        std::mem::take(&mut self.pressed)
    }

    /// Forget everything (focus lost)
    pub fn release_all(&mut self) {
        self.held = KeyEdges::none();
    }
}
