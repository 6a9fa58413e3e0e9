//! Simulated tick clock
//!
//! The engine only ever sees timestamps; this drives them deterministically
//! for headless runs and tests.

use crate::core::types::Millis;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimClock {
    now: Millis,
    step: Millis,
}

impl SimClock {
    pub fn new(start: Millis, step: Millis) -> Self {
        Self { now: start, step }
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    /// Move forward one period and return the new time
    pub fn advance(&mut self) -> Millis {
        self.now += self.step;
        self.now
    }

    /// Jump forward by an arbitrary span (a stall or a pause)
    pub fn skip(&mut self, span: Millis) -> Millis {
        self.now += span;
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_and_skip() {
        let mut clock = SimClock::new(1_000, 100);
        assert_eq!(clock.advance(), 1_100);
        assert_eq!(clock.skip(5_000), 6_100);
        assert_eq!(clock.now(), 6_100);
    }
}
