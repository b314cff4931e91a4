//! Streaming: the square tile window around the player and frame pacing.
//!
//! # Invariants
//! - The window is a square in tile space, enumerated row-major.
//! - Nothing is cached between frames; the window is walked afresh each time.

mod frame;
mod window;

pub use frame::{FrameClock, FrameStats, FrameTimer, fake_ping};
pub use window::VisibleWindow;

pub fn crate_info() -> &'static str {
    "tilescape-stream v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("stream"));
    }
}
