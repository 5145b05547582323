/// Keys the game cares about, independent of any windowing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Space,
    Escape,
    /// A letter key, by its character. Case is not significant.
    Letter(char),
    /// Anything else the backend reported.
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyPhase {
    Press,
    Release,
    /// Auto-repeat while the key is held.
    Repeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// A raw input event as delivered by the window collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key { key: Key, phase: KeyPhase },
    /// Text input, after keyboard layout translation.
    Char(char),
    MouseButton { button: MouseButton, pressed: bool },
    CloseRequested,
}

impl InputEvent {
    pub fn key(key: Key, phase: KeyPhase) -> Self {
        Self::Key { key, phase }
    }
}
