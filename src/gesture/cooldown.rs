use std::time::{Duration, Instant};

/// 最後の発火時刻と最小間隔を持つタイマー
///
/// `now - last > interval` のときだけ発火可能。未発火なら常に可能。
#[derive(Debug, Clone)]
pub struct CooldownTimer {
    interval: Duration,
    last_fired: Option<Instant>,
}

impl CooldownTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
        }
    }

    pub fn last_fired(&self) -> Option<Instant> {
        self.last_fired
    }

    pub fn is_ready(&self, now: Instant) -> bool {
        match self.last_fired {
            Some(last) => now.saturating_duration_since(last) > self.interval,
            None => true,
        }
    }

    pub fn fire(&mut self, now: Instant) {
        self.last_fired = Some(now);
    }

    /// 発火可能なら発火して true
    pub fn try_fire(&mut self, now: Instant) -> bool {
        if self.is_ready(now) {
            self.fire(now);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_before_first_fire() {
        let timer = CooldownTimer::new(Duration::from_secs(2));
        assert!(timer.is_ready(Instant::now()));
        assert!(timer.last_fired().is_none());
    }

    #[test]
    fn test_blocks_within_interval() {
        let t0 = Instant::now();
        let mut timer = CooldownTimer::new(Duration::from_millis(400));
        assert!(timer.try_fire(t0));
        assert!(!timer.try_fire(t0 + Duration::from_millis(399)));
        assert_eq!(timer.last_fired(), Some(t0));
    }

    #[test]
    fn test_exact_interval_is_not_ready() {
        let t0 = Instant::now();
        let mut timer = CooldownTimer::new(Duration::from_millis(400));
        timer.fire(t0);
        assert!(!timer.is_ready(t0 + Duration::from_millis(400)));
        assert!(timer.is_ready(t0 + Duration::from_millis(401)));
    }
}
