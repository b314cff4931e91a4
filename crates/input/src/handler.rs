use std::time::{Duration, Instant};

use tilescape_kernel::Session;

use crate::{Action, Key, KeyBindings, MoveGate};

/// Turns key presses into session mutations.
///
/// Each call runs to completion, so the render loop never observes a
/// half-applied move.
#[derive(Debug, Clone, Default)]
pub struct InputHandler {
    bindings: KeyBindings,
    gate: MoveGate,
}

impl InputHandler {
    pub fn new(bindings: KeyBindings, cooldown: Duration) -> Self {
        Self {
            bindings,
            gate: MoveGate::new(cooldown),
        }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Apply a key press at `now`. Returns `true` if the player moved.
    ///
    /// Unbound keys never touch the cooldown.
    pub fn handle_key(&mut self, session: &mut Session, key: Key, now: Instant) -> bool {
        match self.bindings.action(key) {
            Action::Move(direction) => {
                if !self.gate.try_acquire(now) {
                    tracing::trace!(?key, "move dropped during cooldown");
                    return false;
                }
                session.move_player(direction);
                true
            }
            Action::Noop => false,
        }
    }

    /// [`Self::handle_key`] for a DOM-style key identifier.
    pub fn handle_identifier(&mut self, session: &mut Session, identifier: &str, now: Instant) -> bool {
        self.handle_key(session, Key::from_identifier(identifier), now)
    }
}
