//! Input Handling
//!
//! Keyboard state for the simulation. The host forwards key-down/key-up events
//! with a key identifier; the physics step polls the held set once per tick and
//! consumes one-shot actions (jump, interact) so holding a key does not retrigger.

use ahash::AHashSet;

use crate::period::TimePeriod;

/// Input event types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Keyboard key pressed
    KeyPressed(KeyCode),
    /// Keyboard key released
    KeyReleased(KeyCode),
}

/// Keyboard key codes the game binds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    // Letters
    W, A, S, D, E,

    // Numbers
    Key1, Key2, Key3,

    // Special keys
    Space,

    // Arrow keys
    Left, Right, Up, Down,

    // Other
    Unknown,
}

impl KeyCode {
    /// Map a host key identifier (DOM `KeyboardEvent.key` style) to a key code
    pub fn from_key_id(id: &str) -> Self {
        match id {
            "ArrowUp" => Self::Up,
            "ArrowDown" => Self::Down,
            "ArrowLeft" => Self::Left,
            "ArrowRight" => Self::Right,
            " " | "Space" | "Spacebar" => Self::Space,
            "1" => Self::Key1,
            "2" => Self::Key2,
            "3" => Self::Key3,
            _ if id.eq_ignore_ascii_case("w") => Self::W,
            _ if id.eq_ignore_ascii_case("a") => Self::A,
            _ if id.eq_ignore_ascii_case("s") => Self::S,
            _ if id.eq_ignore_ascii_case("d") => Self::D,
            _ if id.eq_ignore_ascii_case("e") => Self::E,
            _ => Self::Unknown,
        }
    }

    /// Period selected directly by the number row
    pub fn time_period(self) -> Option<TimePeriod> {
        match self {
            Self::Key1 => Some(TimePeriod::Past),
            Self::Key2 => Some(TimePeriod::Present),
            Self::Key3 => Some(TimePeriod::Future),
            _ => None,
        }
    }
}

/// Gameplay actions and the keys bound to them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Move towards -z
    MoveForward,
    /// Move towards +z
    MoveBack,
    /// Move towards -x
    MoveLeft,
    /// Move towards +x
    MoveRight,
    Jump,
    /// Use a nearby portal
    Interact,
}

impl Action {
    /// Keys bound to this action
    pub fn keys(self) -> &'static [KeyCode] {
        match self {
            Self::MoveForward => &[KeyCode::W, KeyCode::Up],
            Self::MoveBack => &[KeyCode::S, KeyCode::Down],
            Self::MoveLeft => &[KeyCode::A, KeyCode::Left],
            Self::MoveRight => &[KeyCode::D, KeyCode::Right],
            Self::Jump => &[KeyCode::Space],
            Self::Interact => &[KeyCode::E],
        }
    }
}

/// Complete keyboard state
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Currently pressed keys
    keys_pressed: AHashSet<KeyCode>,
}

impl InputState {
    /// Create a new input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a key is currently pressed
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if any key bound to an action is held
    pub fn is_action_held(&self, action: Action) -> bool {
        action.keys().iter().any(|key| self.keys_pressed.contains(key))
    }

    /// Release every key bound to an action until it is pressed again
    pub fn consume_action(&mut self, action: Action) {
        for key in action.keys() {
            self.keys_pressed.remove(key);
        }
    }

    /// Handle an input event. Returns true when a key went from released to held.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::KeyPressed(KeyCode::Unknown) | InputEvent::KeyReleased(KeyCode::Unknown) => false,
            InputEvent::KeyPressed(key) => self.keys_pressed.insert(*key),
            InputEvent::KeyReleased(key) => {
                self.keys_pressed.remove(key);
                false
            }
        }
    }

    /// Release every key; a new playthrough starts with nothing held
    pub fn clear(&mut self) {
        self.keys_pressed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_ids() {
        assert_eq!(KeyCode::from_key_id("w"), KeyCode::W);
        assert_eq!(KeyCode::from_key_id("W"), KeyCode::W);
        assert_eq!(KeyCode::from_key_id("ArrowLeft"), KeyCode::Left);
        assert_eq!(KeyCode::from_key_id(" "), KeyCode::Space);
        assert_eq!(KeyCode::from_key_id("Space"), KeyCode::Space);
        assert_eq!(KeyCode::from_key_id("2"), KeyCode::Key2);
        assert_eq!(KeyCode::from_key_id("Escape"), KeyCode::Unknown);
    }

    #[test]
    fn test_number_row_selects_period() {
        assert_eq!(KeyCode::Key1.time_period(), Some(TimePeriod::Past));
        assert_eq!(KeyCode::Key2.time_period(), Some(TimePeriod::Present));
        assert_eq!(KeyCode::Key3.time_period(), Some(TimePeriod::Future));
        assert_eq!(KeyCode::E.time_period(), None);
    }

    #[test]
    fn test_key_input() {
        let mut input = InputState::new();

        assert!(input.handle_event(&InputEvent::KeyPressed(KeyCode::Space)));
        assert!(input.is_key_pressed(KeyCode::Space));

        // Auto-repeat while held is not a new press
        assert!(!input.handle_event(&InputEvent::KeyPressed(KeyCode::Space)));
        assert!(input.is_key_pressed(KeyCode::Space));

        input.handle_event(&InputEvent::KeyReleased(KeyCode::Space));
        assert!(!input.is_key_pressed(KeyCode::Space));
    }

    #[test]
    fn test_actions_use_either_binding() {
        let mut input = InputState::new();

        input.handle_event(&InputEvent::KeyPressed(KeyCode::Right));
        assert!(input.is_action_held(Action::MoveRight));
        assert!(!input.is_action_held(Action::MoveLeft));

        input.handle_event(&InputEvent::KeyReleased(KeyCode::Right));
        input.handle_event(&InputEvent::KeyPressed(KeyCode::D));
        assert!(input.is_action_held(Action::MoveRight));
    }

    #[test]
    fn test_consume_action_releases_keys() {
        let mut input = InputState::new();

        input.handle_event(&InputEvent::KeyPressed(KeyCode::E));
        input.consume_action(Action::Interact);
        assert!(!input.is_action_held(Action::Interact));

        // A fresh key-down re-arms the action
        input.handle_event(&InputEvent::KeyPressed(KeyCode::E));
        assert!(input.is_action_held(Action::Interact));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let mut input = InputState::new();
        assert!(!input.handle_event(&InputEvent::KeyPressed(KeyCode::Unknown)));
        assert!(!input.is_key_pressed(KeyCode::Unknown));
    }
}
