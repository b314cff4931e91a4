/// Counting completion gate.
///
/// Tracks a fixed number of outstanding loads. Each load reports once, on
/// success or failure; the report that brings the count to zero opens the
/// gate. The gate opens exactly once.
#[derive(Debug, Clone)]
pub struct LoadGate {
    total: usize,
    settled: usize,
    open: bool,
}

impl LoadGate {
    /// A gate over `total` loads. With nothing to wait for it starts open.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            settled: 0,
            open: total == 0,
        }
    }

    /// Record one settled load. Returns `true` only for the report that
    /// opens the gate.
    pub fn settle(&mut self) -> bool {
        if self.open {
            return false;
        }
        self.settled += 1;
        if self.settled >= self.total {
            self.open = true;
            tracing::info!(total = self.total, "all assets settled");
            return true;
        }
        false
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Loads still outstanding.
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.settled)
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_on_last_settle() {
        let mut gate = LoadGate::new(3);
        assert!(!gate.settle());
        assert!(!gate.settle());
        assert!(!gate.is_open());
        assert_eq!(gate.remaining(), 1);
        assert!(gate.settle());
        assert!(gate.is_open());
        assert_eq!(gate.remaining(), 0);
    }

    #[test]
    fn opens_exactly_once() {
        let mut gate = LoadGate::new(1);
        assert!(gate.settle());
        assert!(!gate.settle());
        assert!(!gate.settle());
        assert!(gate.is_open());
    }

    #[test]
    fn empty_gate_starts_open() {
        let mut gate = LoadGate::new(0);
        assert!(gate.is_open());
        assert!(!gate.settle());
    }
}
