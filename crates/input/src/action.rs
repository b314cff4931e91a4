use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tilescape_common::Direction;

/// A high-level action produced from input. The session consumes actions,
/// never raw key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Step the player one tile.
    Move(Direction),
    /// Key is not bound to anything.
    Noop,
}

/// Keys the game reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    W,
    A,
    S,
    D,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Unknown,
}

impl Key {
    /// Parse a DOM-style key identifier such as `"ArrowUp"` or `"w"`.
    /// Letter keys ignore case.
    pub fn from_identifier(identifier: &str) -> Self {
        match identifier {
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "w" | "W" => Key::W,
            "a" | "A" => Key::A,
            "s" | "S" => Key::S,
            "d" | "D" => Key::D,
            other => {
                tracing::trace!("unbound key identifier: {other}");
                Key::Unknown
            }
        }
    }
}

/// Key to direction bindings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings(BTreeMap<Key, Direction>);

impl Default for KeyBindings {
    fn default() -> Self {
        Self(BTreeMap::from([
            (Key::ArrowUp, Direction::North),
            (Key::W, Direction::North),
            (Key::ArrowDown, Direction::South),
            (Key::S, Direction::South),
            (Key::ArrowLeft, Direction::West),
            (Key::A, Direction::West),
            (Key::ArrowRight, Direction::East),
            (Key::D, Direction::East),
        ]))
    }
}

impl KeyBindings {
    pub fn action(&self, key: Key) -> Action {
        self.0
            .get(&key)
            .map(|dir| Action::Move(*dir))
            .unwrap_or(Action::Noop)
    }

    pub fn bind(&mut self, key: Key, direction: Direction) {
        self.0.insert(key, direction);
    }

    pub fn unbind(&mut self, key: Key) {
        self.0.remove(&key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_parse() {
        assert_eq!(Key::from_identifier("ArrowUp"), Key::ArrowUp);
        assert_eq!(Key::from_identifier("w"), Key::W);
        assert_eq!(Key::from_identifier("D"), Key::D);
        assert_eq!(Key::from_identifier("Enter"), Key::Unknown);
    }

    #[test]
    fn default_bindings_cover_wasd_and_arrows() {
        let b = KeyBindings::default();
        assert_eq!(b.action(Key::W), Action::Move(Direction::North));
        assert_eq!(b.action(Key::ArrowUp), Action::Move(Direction::North));
        assert_eq!(b.action(Key::S), Action::Move(Direction::South));
        assert_eq!(b.action(Key::A), Action::Move(Direction::West));
        assert_eq!(b.action(Key::ArrowRight), Action::Move(Direction::East));
        assert_eq!(b.action(Key::Unknown), Action::Noop);
    }

    #[test]
    fn rebinding() {
        let mut b = KeyBindings::default();
        b.unbind(Key::W);
        b.bind(Key::A, Direction::North);
        assert_eq!(b.action(Key::W), Action::Noop);
        assert_eq!(b.action(Key::A), Action::Move(Direction::North));
    }

    #[test]
    fn bindings_deserialize_from_json() {
        let b: KeyBindings =
            serde_json::from_str(r#"{ "arrow_up": "south", "d": "west" }"#).unwrap();
        assert_eq!(b.action(Key::ArrowUp), Action::Move(Direction::South));
        assert_eq!(b.action(Key::D), Action::Move(Direction::West));
        assert_eq!(b.action(Key::W), Action::Noop);
    }
}
