use std::collections::VecDeque;
use tilehop_common::{CameraMode, ControlsConfig, Direction, Intent};

use crate::event::{InputEvent, Key, KeyPhase};

/// Letter keys that select each camera mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    follow: char,
    top: char,
    tower: char,
    adventure: char,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_config(&ControlsConfig::default())
    }
}

impl KeyBindings {
    pub fn from_config(controls: &ControlsConfig) -> Self {
        Self {
            follow: controls.follow.to_ascii_lowercase(),
            top: controls.top.to_ascii_lowercase(),
            tower: controls.tower.to_ascii_lowercase(),
            adventure: controls.adventure.to_ascii_lowercase(),
        }
    }

    /// Camera mode bound to `letter`, if any.
    pub fn camera_for(&self, letter: char) -> Option<CameraMode> {
        let c = letter.to_ascii_lowercase();
        [
            (self.follow, CameraMode::Follow),
            (self.top, CameraMode::Top),
            (self.tower, CameraMode::Tower),
            (self.adventure, CameraMode::Adventure),
        ]
        .into_iter()
        .find(|(bound, _)| *bound == c)
        .map(|(_, mode)| mode)
    }
}

fn arrow(key: Key) -> Option<Direction> {
    match key {
        Key::ArrowUp => Some(Direction::Up),
        Key::ArrowDown => Some(Direction::Down),
        Key::ArrowLeft => Some(Direction::Left),
        Key::ArrowRight => Some(Direction::Right),
        _ => None,
    }
}

/// Maps raw input events to intents. Holds no game state.
#[derive(Debug, Clone, Default)]
pub struct InputDispatcher {
    bindings: KeyBindings,
}

impl InputDispatcher {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    /// Translate one event. Unbound input yields `None`.
    ///
    /// Arrows step on release (turning the player) and on repeat (not
    /// turning). Space and camera letters act on release, Escape on press.
    pub fn translate(&self, event: &InputEvent) -> Option<Intent> {
        match *event {
            InputEvent::Key { key, phase } => {
                if let Some(direction) = arrow(key) {
                    return match phase {
                        KeyPhase::Release => Some(Intent::step(direction)),
                        KeyPhase::Repeat => Some(Intent::repeat(direction)),
                        KeyPhase::Press => None,
                    };
                }
                match (phase, key) {
                    (KeyPhase::Release, Key::Space) => Some(Intent::Jump),
                    (KeyPhase::Release, Key::Letter(c)) => {
                        self.bindings.camera_for(c).map(Intent::SwitchCamera)
                    }
                    (KeyPhase::Press, Key::Escape) => Some(Intent::Quit),
                    _ => None,
                }
            }
            InputEvent::Char('q' | 'Q') => Some(Intent::Quit),
            InputEvent::Char(_) | InputEvent::MouseButton { .. } => None,
            InputEvent::CloseRequested => Some(Intent::Quit),
        }
    }
}

/// Single-consumer FIFO of intents, filled by input handlers and drained once
/// per frame.
#[derive(Debug, Default)]
pub struct IntentQueue {
    pending: VecDeque<Intent>,
}

impl IntentQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, intent: Intent) {
        self.pending.push_back(intent);
    }

    /// Translate `event` and enqueue the result. Returns whether anything was
    /// queued.
    pub fn dispatch(&mut self, dispatcher: &InputDispatcher, event: &InputEvent) -> bool {
        match dispatcher.translate(event) {
            Some(intent) => {
                tracing::debug!(?intent, "intent queued");
                self.push(intent);
                true
            }
            None => {
                tracing::trace!(?event, "input ignored");
                false
            }
        }
    }

    /// Take everything queued so far, oldest first.
    pub fn drain(&mut self) -> Vec<Intent> {
        self.pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::MouseButton;

    fn release(key: Key) -> InputEvent {
        InputEvent::key(key, KeyPhase::Release)
    }

    #[test]
    fn arrows_step_on_release_and_repeat() {
        let d = InputDispatcher::default();
        assert_eq!(
            d.translate(&release(Key::ArrowRight)),
            Some(Intent::step(Direction::Right))
        );
        assert_eq!(
            d.translate(&InputEvent::key(Key::ArrowUp, KeyPhase::Repeat)),
            Some(Intent::repeat(Direction::Up))
        );
        assert_eq!(d.translate(&InputEvent::key(Key::ArrowLeft, KeyPhase::Press)), None);
    }

    #[test]
    fn space_jumps_on_release() {
        let d = InputDispatcher::default();
        assert_eq!(d.translate(&release(Key::Space)), Some(Intent::Jump));
        assert_eq!(d.translate(&InputEvent::key(Key::Space, KeyPhase::Press)), None);
    }

    #[test]
    fn camera_letters_switch_modes() {
        let d = InputDispatcher::default();
        let cases = [
            ('F', CameraMode::Follow),
            ('p', CameraMode::Top),
            ('T', CameraMode::Tower),
            ('a', CameraMode::Adventure),
        ];
        for (c, mode) in cases {
            assert_eq!(
                d.translate(&release(Key::Letter(c))),
                Some(Intent::SwitchCamera(mode))
            );
        }
        assert_eq!(d.translate(&release(Key::Letter('z'))), None);
    }

    #[test]
    fn custom_bindings_apply() {
        let controls = ControlsConfig {
            top: 'o',
            ..ControlsConfig::default()
        };
        let d = InputDispatcher::new(KeyBindings::from_config(&controls));
        assert_eq!(
            d.translate(&release(Key::Letter('O'))),
            Some(Intent::SwitchCamera(CameraMode::Top))
        );
        assert_eq!(d.translate(&release(Key::Letter('p'))), None);
    }

    #[test]
    fn quit_sources() {
        let d = InputDispatcher::default();
        assert_eq!(
            d.translate(&InputEvent::key(Key::Escape, KeyPhase::Press)),
            Some(Intent::Quit)
        );
        assert_eq!(d.translate(&release(Key::Escape)), None);
        assert_eq!(d.translate(&InputEvent::Char('q')), Some(Intent::Quit));
        assert_eq!(d.translate(&InputEvent::Char('Q')), Some(Intent::Quit));
        assert_eq!(d.translate(&InputEvent::CloseRequested), Some(Intent::Quit));
    }

    #[test]
    fn mouse_and_unknown_input_ignored() {
        let d = InputDispatcher::default();
        let ignored = [
            InputEvent::MouseButton {
                button: MouseButton::Left,
                pressed: true,
            },
            InputEvent::MouseButton {
                button: MouseButton::Other(7),
                pressed: false,
            },
            InputEvent::Char('x'),
            release(Key::Other),
        ];
        for e in ignored {
            assert_eq!(d.translate(&e), None, "{e:?}");
        }
    }

    #[test]
    fn queue_preserves_arrival_order() {
        let d = InputDispatcher::default();
        let mut q = IntentQueue::new();
        assert!(q.dispatch(&d, &release(Key::ArrowDown)));
        assert!(!q.dispatch(&d, &InputEvent::Char('x')));
        assert!(q.dispatch(&d, &release(Key::Space)));
        q.push(Intent::Quit);
        assert_eq!(q.len(), 3);
        assert_eq!(
            q.drain(),
            vec![Intent::step(Direction::Down), Intent::Jump, Intent::Quit]
        );
        assert!(q.is_empty());
    }
}
