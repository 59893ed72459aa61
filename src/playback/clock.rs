use std::time::{Duration, Instant};

/// Periodic "fire every Δt" scheduler.
///
/// Pure bookkeeping over caller-provided instants, so the media tick loop
/// and the preview sequencer can share it and tests can drive it with
/// fabricated time.
#[derive(Debug)]
pub struct TickScheduler {
    interval: Duration,
    last_fire: Option<Instant>,
}

impl TickScheduler {
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fire: None,
        }
    }

    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of whole intervals elapsed at `now`.
    ///
    /// The first call arms the scheduler and reports zero. The cursor
    /// advances by whole intervals only, so partial progress carries over
    /// to the next call instead of drifting.
    pub fn due_ticks(&mut self, now: Instant) -> u32 {
        let Some(last) = self.last_fire else {
            self.last_fire = Some(now);
            return 0;
        };
        if self.interval.is_zero() {
            return 0;
        }
        let elapsed = now.saturating_duration_since(last);
        let ticks = (elapsed.as_nanos() / self.interval.as_nanos()) as u32;
        if ticks > 0 {
            self.last_fire = Some(last + self.interval * ticks);
        }
        ticks
    }

    /// Forget elapsed time, e.g. when resuming after a pause.
    pub fn reset(&mut self) {
        self.last_fire = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_poll_arms_without_firing() {
        let mut scheduler = TickScheduler::new(Duration::from_millis(100));
        let base = Instant::now();
        assert_eq!(scheduler.due_ticks(base), 0);
    }

    #[test]
    fn test_whole_intervals_due() {
        let mut scheduler = TickScheduler::new(Duration::from_millis(100));
        let base = Instant::now();
        scheduler.due_ticks(base);
        assert_eq!(scheduler.due_ticks(base + Duration::from_millis(250)), 2);
        // the half interval left over carries into the next poll
        assert_eq!(scheduler.due_ticks(base + Duration::from_millis(300)), 1);
        assert_eq!(scheduler.due_ticks(base + Duration::from_millis(390)), 0);
        assert_eq!(scheduler.due_ticks(base + Duration::from_millis(400)), 1);
    }

    #[test]
    fn test_reset_rearms() {
        let mut scheduler = TickScheduler::new(Duration::from_millis(100));
        let base = Instant::now();
        scheduler.due_ticks(base);
        scheduler.reset();
        // a long pause does not burst after a reset
        assert_eq!(scheduler.due_ticks(base + Duration::from_secs(60)), 0);
        assert_eq!(
            scheduler.due_ticks(base + Duration::from_secs(60) + Duration::from_millis(100)),
            1
        );
    }
}
