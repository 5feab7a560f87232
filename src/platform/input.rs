//! Keyboard mapping
//!
//! Physical keys map to logical [`Action`]s; the simulation only ever sees
//! the resulting [`TickInput`].

use crate::sim::{Actions, TickInput};

/// A logical game input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    RotateLeft,
    RotateRight,
    Fire,
    Special,
    Pause,
}

impl Action {
    /// Level-triggered flag for this action (`None` for one-shot actions)
    pub fn held_flag(self) -> Option<Actions> {
        match self {
            Action::RotateLeft => Some(Actions::ROTATE_LEFT),
            Action::RotateRight => Some(Actions::ROTATE_RIGHT),
            Action::Fire => Some(Actions::FIRE),
            Action::Special => Some(Actions::SPECIAL),
            Action::Pause => None,
        }
    }
}

/// Map a DOM `KeyboardEvent.key` value to an action
pub fn action_for_key(key: &str) -> Option<Action> {
    match key {
        "a" | "A" => Some(Action::RotateLeft),
        "d" | "D" => Some(Action::RotateRight),
        "w" | "W" => Some(Action::Fire),
        " " => Some(Action::Special),
        "Escape" | "p" | "P" => Some(Action::Pause),
        _ => None,
    }
}

/// Held-key tracker fed by keydown/keyup events
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: Actions,
    pause_down: bool,
    pause_pending: bool,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, action: Action) {
        match action.held_flag() {
            Some(flag) => self.held.insert(flag),
            None => {
                // Auto-repeat keydowns must not toggle pause again
                if !self.pause_down {
                    self.pause_pending = true;
                }
                self.pause_down = true;
            }
        }
    }

    pub fn release(&mut self, action: Action) {
        match action.held_flag() {
            Some(flag) => self.held.remove(flag),
            None => self.pause_down = false,
        }
    }

    /// Handle a keydown; returns whether the key is bound
    pub fn key_down(&mut self, key: &str) -> bool {
        match action_for_key(key) {
            Some(action) => {
                self.press(action);
                true
            }
            None => false,
        }
    }

    /// Handle a keyup; returns whether the key is bound
    pub fn key_up(&mut self, key: &str) -> bool {
        match action_for_key(key) {
            Some(action) => {
                self.release(action);
                true
            }
            None => false,
        }
    }

    /// Forget all held keys (focus loss drops keyup events)
    pub fn release_all(&mut self) {
        self.held = Actions::empty();
        self.pause_down = false;
    }

    pub fn held(&self) -> Actions {
        self.held
    }

    /// Input for the next tick; consumes a pending pause toggle
    pub fn take_input(&mut self) -> TickInput {
        TickInput {
            held: self.held,
            pause: std::mem::take(&mut self.pause_pending),
        }
    }

    /// Queue a pause toggle without a key (e.g. tab hidden)
    pub fn request_pause(&mut self) {
        self.pause_pending = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping_is_case_insensitive() {
        assert_eq!(action_for_key("a"), Some(Action::RotateLeft));
        assert_eq!(action_for_key("A"), Some(Action::RotateLeft));
        assert_eq!(action_for_key("D"), Some(Action::RotateRight));
        assert_eq!(action_for_key("w"), Some(Action::Fire));
        assert_eq!(action_for_key(" "), Some(Action::Special));
        assert_eq!(action_for_key("Escape"), Some(Action::Pause));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let mut keys = KeyState::new();
        assert_eq!(action_for_key("q"), None);
        assert_eq!(action_for_key("ArrowLeft"), None);
        assert!(!keys.key_down("x"));
        assert_eq!(keys.take_input(), TickInput::default());
    }

    #[test]
    fn test_held_state() {
        let mut keys = KeyState::new();
        keys.key_down("a");
        keys.key_down("W");
        assert_eq!(keys.held(), Actions::ROTATE_LEFT | Actions::FIRE);

        // Input stays held across ticks until keyup
        assert_eq!(keys.take_input().held, Actions::ROTATE_LEFT | Actions::FIRE);
        assert_eq!(keys.take_input().held, Actions::ROTATE_LEFT | Actions::FIRE);

        keys.key_up("A");
        assert_eq!(keys.held(), Actions::FIRE);
        keys.release_all();
        assert!(keys.held().is_empty());
    }

    #[test]
    fn test_pause_is_one_shot() {
        let mut keys = KeyState::new();
        keys.key_down("Escape");
        keys.key_down("Escape"); // auto-repeat
        assert!(keys.take_input().pause);
        assert!(!keys.take_input().pause);

        keys.key_up("Escape");
        keys.key_down("p");
        assert!(keys.take_input().pause);
    }
}
