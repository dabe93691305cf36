use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Identifier for a logical keyboard key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Named(NamedKey),
    Character(char),
    Digit(u8),
    Function(u8),
    /// Any key name the runtime has no dedicated variant for.
    Other(String),
}

impl KeyCode {
    /// Maps a key name as reported by the UI layer (`"w"`, `"Space"`,
    /// `"F3"`, ...). Unrecognised names are preserved verbatim.
    pub fn from_name(name: &str) -> Self {
        if let Some(key) = parse_named_key(name) {
            return key;
        }
        let mut chars = name.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            if ch.is_ascii_alphabetic() {
                return Self::Character(ch.to_ascii_uppercase());
            }
            if let Some(digit) = ch.to_digit(10) {
                return Self::Digit(digit as u8);
            }
        }
        if let Some(function) = name.strip_prefix('F').or_else(|| name.strip_prefix('f')) {
            if let Ok(index) = function.parse::<u8>() {
                if (1..=25).contains(&index) {
                    return Self::Function(index);
                }
            }
        }
        Self::Other(name.to_string())
    }
}

fn parse_named_key(name: &str) -> Option<KeyCode> {
    use NamedKey::*;
    let key = match name {
        "Space" | " " => Space,
        "Enter" | "Return" => Enter,
        "Tab" => Tab,
        "Left" | "ArrowLeft" => Left,
        "Right" | "ArrowRight" => Right,
        "Up" | "ArrowUp" => Up,
        "Down" | "ArrowDown" => Down,
        "Escape" | "Esc" => Escape,
        "Backspace" => Backspace,
        "LeftShift" | "LShift" | "Shift" => LeftShift,
        "RightShift" | "RShift" => RightShift,
        "LeftCtrl" | "LControl" | "Control" => LeftCtrl,
        "RightCtrl" | "RControl" => RightCtrl,
        _ => return None,
    };
    Some(KeyCode::Named(key))
}

/// Friendly names for the non-printable keys the sandbox cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamedKey {
    Space,
    Enter,
    Tab,
    Left,
    Right,
    Up,
    Down,
    Escape,
    Backspace,
    LeftShift,
    RightShift,
    LeftCtrl,
    RightCtrl,
}

/// The six camera motions driven from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
    Ascend,
    Descend,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::Forward,
        Direction::Backward,
        Direction::StrafeLeft,
        Direction::StrafeRight,
        Direction::Ascend,
        Direction::Descend,
    ];
}

/// Key bound to each camera motion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub forward: KeyCode,
    pub backward: KeyCode,
    pub strafe_left: KeyCode,
    pub strafe_right: KeyCode,
    pub ascend: KeyCode,
    pub descend: KeyCode,
}

impl KeyBindings {
    pub fn key_for(&self, direction: Direction) -> &KeyCode {
        match direction {
            Direction::Forward => &self.forward,
            Direction::Backward => &self.backward,
            Direction::StrafeLeft => &self.strafe_left,
            Direction::StrafeRight => &self.strafe_right,
            Direction::Ascend => &self.ascend,
            Direction::Descend => &self.descend,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: KeyCode::Character('W'),
            backward: KeyCode::Character('S'),
            strafe_left: KeyCode::Character('A'),
            strafe_right: KeyCode::Character('D'),
            ascend: KeyCode::Character('E'),
            descend: KeyCode::Character('Q'),
        }
    }
}

/// Pressed/released map fed by the UI layer and read by the scheduler.
#[derive(Debug, Default, Clone)]
pub struct InputState {
    keys: HashMap<KeyCode, bool>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_key_change(&mut self, key: KeyCode, pressed: bool) {
        self.keys.insert(key, pressed);
    }

    pub fn set_key_down(&mut self, key: KeyCode) {
        self.on_key_change(key, true);
    }

    pub fn set_key_up(&mut self, key: KeyCode) {
        self.on_key_change(key, false);
    }

    pub fn is_down(&self, key: &KeyCode) -> bool {
        self.keys.get(key).copied().unwrap_or(false)
    }

    pub fn is_down_by_name(&self, name: &str) -> bool {
        self.is_down(&KeyCode::from_name(name))
    }

    /// Number of keys ever reported, pressed or not.
    pub fn tracked_keys(&self) -> usize {
        self.keys.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_and_character_keys() {
        assert_eq!(
            KeyCode::from_name("Space"),
            KeyCode::Named(NamedKey::Space)
        );
        assert_eq!(KeyCode::from_name("w"), KeyCode::Character('W'));
        assert_eq!(KeyCode::from_name("3"), KeyCode::Digit(3));
        assert_eq!(KeyCode::from_name("F12"), KeyCode::Function(12));
        assert_eq!(
            KeyCode::from_name("MediaPlay"),
            KeyCode::Other("MediaPlay".into())
        );
    }

    #[test]
    fn input_state_tracks_keys() {
        let mut state = InputState::new();
        state.set_key_down(KeyCode::Character('W'));
        assert!(state.is_down_by_name("w"));
        state.set_key_up(KeyCode::Character('W'));
        assert!(!state.is_down_by_name("w"));
    }

    #[test]
    fn unknown_keys_are_stored_but_never_pressed_by_default() {
        let mut state = InputState::new();
        assert!(!state.is_down(&KeyCode::Other("Dead".into())));
        state.on_key_change(KeyCode::Other("Dead".into()), true);
        assert!(state.is_down(&KeyCode::Other("Dead".into())));
        assert_eq!(state.tracked_keys(), 1);
    }

    #[test]
    fn default_bindings_cover_every_direction() {
        let bindings = KeyBindings::default();
        let keys: Vec<_> = Direction::ALL
            .iter()
            .map(|direction| bindings.key_for(*direction).clone())
            .collect();
        assert_eq!(keys[0], KeyCode::Character('W'));
        assert_eq!(keys[5], KeyCode::Character('Q'));
    }
}
