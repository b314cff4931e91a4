use std::time::{Duration, Instant};

use tilescape_kernel::splitmix64;

/// Ring buffer of recent frame times.
#[derive(Debug)]
pub struct FrameTimer {
    history: Vec<Duration>,
    capacity: usize,
    index: usize,
    filled: bool,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: vec![Duration::ZERO; capacity],
            capacity,
            index: 0,
            filled: false,
        }
    }

    pub fn record(&mut self, dt: Duration) {
        self.history[self.index] = dt;
        self.index = (self.index + 1) % self.capacity;
        if self.index == 0 {
            self.filled = true;
        }
    }

    fn recorded(&self) -> &[Duration] {
        &self.history[..self.count()]
    }

    pub fn average(&self) -> Duration {
        let count = self.count();
        if count == 0 {
            return Duration::ZERO;
        }
        self.recorded().iter().sum::<Duration>() / count as u32
    }

    pub fn max(&self) -> Duration {
        self.recorded().iter().copied().max().unwrap_or(Duration::ZERO)
    }

    pub fn min(&self) -> Duration {
        self.recorded().iter().copied().min().unwrap_or(Duration::ZERO)
    }

    pub fn count(&self) -> usize {
        if self.filled { self.capacity } else { self.index }
    }
}

/// What the status overlay shows for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub frame: u64,
    pub delta: Duration,
    /// Instantaneous rate from the last frame delta, rounded.
    pub fps: u32,
    pub average: Duration,
    /// Cosmetic latency figure. There is no network; see [`fake_ping`].
    pub ping_ms: u32,
}

/// Stand-in latency in `[30, 50]` ms, derived from the frame number.
///
/// Purely decorative. Real networking would replace this outright.
pub fn fake_ping(frame: u64) -> u32 {
    30 + (splitmix64(frame) % 21) as u32
}

/// Measures frame-to-frame time for the overlay.
#[derive(Debug)]
pub struct FrameClock {
    last: Option<Instant>,
    frame: u64,
    timer: FrameTimer,
}

impl FrameClock {
    pub fn new(history: usize) -> Self {
        Self {
            last: None,
            frame: 0,
            timer: FrameTimer::new(history),
        }
    }

    /// Mark the start of a frame at `now`.
    pub fn tick(&mut self, now: Instant) -> FrameStats {
        let delta = self
            .last
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last = Some(now);
        self.frame += 1;

        let fps = if delta.is_zero() {
            0
        } else {
            self.timer.record(delta);
            (1.0 / delta.as_secs_f64()).round() as u32
        };

        let stats = FrameStats {
            frame: self.frame,
            delta,
            fps,
            average: self.timer.average(),
            ping_ms: fake_ping(self.frame),
        };
        tracing::trace!(frame = stats.frame, fps = stats.fps, "frame tick");
        stats
    }

    pub fn timer(&self) -> &FrameTimer {
        &self.timer
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(120)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_timer_tracks_history() {
        let mut timer = FrameTimer::new(3);
        timer.record(Duration::from_millis(10));
        timer.record(Duration::from_millis(20));
        timer.record(Duration::from_millis(30));

        assert_eq!(timer.count(), 3);
        assert_eq!(timer.average(), Duration::from_millis(20));
        assert_eq!(timer.max(), Duration::from_millis(30));
        assert_eq!(timer.min(), Duration::from_millis(10));
    }

    #[test]
    fn frame_timer_wraps_around() {
        let mut timer = FrameTimer::new(2);
        timer.record(Duration::from_millis(10));
        timer.record(Duration::from_millis(20));
        timer.record(Duration::from_millis(30));

        assert_eq!(timer.count(), 2);
        assert_eq!(timer.average(), Duration::from_millis(25));
    }

    #[test]
    fn empty_timer_reports_zero() {
        let timer = FrameTimer::new(4);
        assert_eq!(timer.average(), Duration::ZERO);
        assert_eq!(timer.max(), Duration::ZERO);
    }

    #[test]
    fn clock_reports_fps_from_delta() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(8);
        let first = clock.tick(t0);
        assert_eq!(first.fps, 0);
        assert_eq!(first.frame, 1);

        let second = clock.tick(t0 + Duration::from_millis(20));
        assert_eq!(second.fps, 50);
        assert_eq!(second.delta, Duration::from_millis(20));

        let third = clock.tick(t0 + Duration::from_millis(45));
        assert_eq!(third.fps, 40);
        assert_eq!(third.average, Duration::from_micros(22_500));
    }

    #[test]
    fn ping_stays_in_range() {
        for frame in 0..1000 {
            let ping = fake_ping(frame);
            assert!((30..=50).contains(&ping), "ping {ping}");
        }
        assert_eq!(fake_ping(7), fake_ping(7));
    }
}
