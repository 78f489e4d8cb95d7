//! Interval timer for periodic spawns

/// Accumulates frame time and fires once per interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnTimer {
    interval: f32,
    elapsed: f32,
}

impl SpawnTimer {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            elapsed: 0.0,
        }
    }

    /// Advance by `dt`; on reaching the interval, fire and restart from zero.
    /// Leftover time past the interval is dropped.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        if self.elapsed >= self.interval {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_when_crossing_interval() {
        let mut timer = SpawnTimer::new(1.5);
        assert!(!timer.tick(1.0));
        assert!(!timer.tick(0.4));
        assert!(timer.tick(0.2));
        assert_eq!(timer.elapsed, 0.0);
    }

    #[test]
    fn test_resets_to_zero_not_remainder() {
        let mut timer = SpawnTimer::new(1.0);
        assert!(timer.tick(1.9));
        // a decrementing timer would fire again after 0.1s
        assert!(!timer.tick(0.2));
    }

    #[test]
    fn test_fires_once_per_tick_even_for_huge_dt() {
        let mut timer = SpawnTimer::new(0.5);
        assert!(timer.tick(10.0));
        assert!(!timer.tick(0.0));
    }
}
