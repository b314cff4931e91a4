use std::time::{Duration, Instant};

/// Movement debounce.
///
/// A successful acquire locks the gate for `cooldown`; attempts during the
/// lock are rejected and do not extend it.
#[derive(Debug, Clone)]
pub struct MoveGate {
    cooldown: Duration,
    locked_until: Option<Instant>,
}

impl MoveGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            locked_until: None,
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn is_locked(&self, now: Instant) -> bool {
        self.locked_until.is_some_and(|until| now < until)
    }

    /// Try to take the gate at `now`. On success the gate stays locked until
    /// `now + cooldown`.
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        if self.is_locked(now) {
            return false;
        }
        self.locked_until = Some(now + self.cooldown);
        true
    }
}

impl Default for MoveGate {
    fn default() -> Self {
        Self::new(Duration::from_millis(110))
    }
}
