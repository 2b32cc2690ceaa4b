/// # Timers
/// Two 8-bit countdown registers that run independently of instruction execution.
///
/// - `delay` is readable and writable by programs and is mostly used for pacing
/// - `sound` is write-only for programs; a tone should sound while it runs down
///
/// Both are decremented by one on every `tick` while above zero, conventionally at 60Hz.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    pub fn new() -> Self {
        Timers::default()
    }

    /// Counts both timers down by one, stopping at zero.
    ///
    /// Returns whether the tone should sound, which is the case only on the tick that takes
    /// the sound timer from 1 to 0.
    pub fn tick(&mut self) -> bool {
        self.delay = self.delay.saturating_sub(1);
        let expiring = self.sound == 1;
        self.sound = self.sound.saturating_sub(1);
        expiring
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_down_to_zero_and_stops() {
        let mut timers = Timers {
            delay: 5,
            sound: 0,
        };
        for _ in 0..5 {
            timers.tick();
        }
        assert_eq!(timers.delay, 0);
        timers.tick();
        assert_eq!(timers.delay, 0);
    }

    #[test]
    fn test_timers_are_independent() {
        let mut timers = Timers {
            delay: 2,
            sound: 10,
        };
        timers.tick();
        timers.tick();
        timers.tick();
        assert_eq!(timers.delay, 0);
        assert_eq!(timers.sound, 7);
    }

    #[test]
    fn test_tone_only_on_expiry() {
        let mut timers = Timers {
            delay: 0,
            sound: 3,
        };
        assert!(!timers.tick());
        assert!(!timers.tick());
        assert!(timers.tick());
        assert_eq!(timers.sound, 0);
        assert!(!timers.tick());
    }
}
