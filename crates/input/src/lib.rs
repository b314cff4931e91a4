//! Keyboard input mapped to player actions.
//!
//! # Invariants
//! - The session is only mutated through [`Action`]s, never raw key events.
//! - After a successful move, further moves are dropped (not queued) until
//!   the cooldown elapses.

pub mod action;
mod gate;
mod handler;

pub use action::{Action, Key, KeyBindings};
pub use gate::MoveGate;
pub use handler::InputHandler;

pub fn crate_info() -> &'static str {
    "tilescape-input v0.1.0"
}
