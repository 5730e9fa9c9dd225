//! Match clock: whole elapsed seconds, advanced by an external ticker.

/// Elapsed-seconds counter with pause and a one-way halt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clock {
    elapsed: u32,
    paused: bool,
    halted: bool,
}

impl Clock {
    /// Advance one second unless paused or halted. Returns whether it moved.
    pub fn tick(&mut self) -> bool {
        if self.paused || self.halted {
            return false;
        }
        self.elapsed += 1;
        true
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Flip the pause state, returning the new value.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Stop for good. Used when the match ends.
    pub fn halt(&mut self) {
        self.halted = true;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_only_while_running() {
        let mut clock = Clock::default();
        assert!(clock.tick());
        assert!(clock.tick());
        assert_eq!(clock.elapsed(), 2);

        clock.pause();
        assert!(!clock.tick());
        assert_eq!(clock.elapsed(), 2);

        clock.resume();
        assert!(clock.tick());
        assert_eq!(clock.elapsed(), 3);
    }

    #[test]
    fn toggle_pause_flips_state() {
        let mut clock = Clock::default();
        assert!(clock.toggle_pause());
        assert!(clock.is_paused());
        assert!(!clock.toggle_pause());
        assert!(!clock.is_paused());
    }

    #[test]
    fn halt_is_permanent_until_reset() {
        let mut clock = Clock::default();
        clock.tick();
        clock.halt();
        clock.resume();
        assert!(!clock.tick());
        assert_eq!(clock.elapsed(), 1);

        clock.reset();
        assert_eq!(clock, Clock::default());
        assert!(clock.tick());
    }
}
