use std::time::Duration;

/// Fixed-period repeating timer driven by externally supplied elapsed time.
///
/// The timer never reads a clock itself; the host feeds it wall-clock deltas,
/// which keeps tests deterministic.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    period: Duration,
    armed: bool,
    accumulated: Duration,
}

impl IntervalTimer {
    /// A zero period is bumped to one millisecond.
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            armed: false,
            accumulated: Duration::ZERO,
        }
    }

    /// Arms the timer; the first firing happens one full period later.
    pub fn start(&mut self) {
        self.armed = true;
        self.accumulated = Duration::ZERO;
    }

    /// Disarms and discards any partial period.
    pub fn stop(&mut self) {
        self.armed = false;
        self.accumulated = Duration::ZERO;
    }

    /// Feeds `elapsed` and returns how many periods completed, saturating at
    /// `u32::MAX`. The partial period is carried over.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if !self.armed {
            return 0;
        }
        let total = self.accumulated.as_nanos().saturating_add(elapsed.as_nanos());
        let period = self.period.as_nanos();
        self.accumulated = nanos_to_duration(total % period);
        u32::try_from(total / period).unwrap_or(u32::MAX)
    }
}

// The remainder is always below one period, so it fits a `Duration`.
fn nanos_to_duration(nanos: u128) -> Duration {
    let secs = u64::try_from(nanos / 1_000_000_000).unwrap_or(u64::MAX);
    Duration::new(secs, (nanos % 1_000_000_000) as u32)
}

#[cfg(test)]
mod tests {
    use super::IntervalTimer;
    use std::time::Duration;

    #[test]
    fn unarmed_timer_never_fires() {
        let mut t = IntervalTimer::new(Duration::from_millis(20));
        assert_eq!(t.advance(Duration::from_secs(1)), 0);
    }

    #[test]
    fn fires_once_per_period_and_carries_remainder() {
        let mut t = IntervalTimer::new(Duration::from_millis(20));
        t.start();
        assert_eq!(t.advance(Duration::from_millis(15)), 0);
        assert_eq!(t.advance(Duration::from_millis(15)), 1);
        assert_eq!(t.advance(Duration::from_millis(50)), 3);
        t.stop();
        t.start();
        assert_eq!(t.advance(Duration::from_millis(19)), 0);
    }

    #[test]
    fn long_stall_fires_in_one_step_without_overflow() {
        let mut t = IntervalTimer::new(Duration::from_millis(20));
        t.start();
        assert_eq!(t.advance(Duration::from_millis(10_005)), 500);
        assert_eq!(t.advance(Duration::from_millis(15)), 1);
        assert_eq!(t.advance(Duration::MAX), u32::MAX);
        assert_eq!(t.advance(Duration::MAX), u32::MAX);
    }
}
