use std::thread;
use std::time::{Duration, Instant};

/// Holds a loop to a fixed number of iterations per second by sleeping off whatever is
/// left of each period.
pub struct Pacer {
    period: Duration,
    last: Instant,
}

impl Pacer {
    pub fn new(hz: u32) -> Self {
        Pacer {
            period: Duration::from_nanos(1_000_000_000 / u64::from(hz.max(1))),
            last: Instant::now(),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Sleeps until a full period has passed since the previous call.
    pub fn wait(&mut self) {
        let elapsed = self.last.elapsed();
        if self.period > elapsed {
            thread::sleep(self.period - elapsed);
        }
        self.last = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period() {
        assert_eq!(Pacer::new(500).period(), Duration::from_millis(2));
        assert_eq!(Pacer::new(1).period(), Duration::from_secs(1));
        assert_eq!(Pacer::new(0).period(), Duration::from_secs(1));
    }

    #[test]
    fn test_waits_out_the_period() {
        let mut pacer = Pacer::new(200);
        let start = Instant::now();
        pacer.wait();
        pacer.wait();
        assert!(start.elapsed() >= Duration::from_millis(9));
    }
}
