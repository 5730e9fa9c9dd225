//! Held-ball counter. Gates shots and misses before they reach the ledger.

use crate::model::ActionKind;

use super::MatchError;

/// Number of balls the robot is holding, bounded by its capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BallCounter {
    count: u32,
    capacity: u32,
}

impl BallCounter {
    /// A counter starting at `preload`. Fails if the preload does not fit.
    pub fn new(preload: u32, capacity: u32) -> Result<Self, MatchError> {
        if preload > capacity {
            return Err(MatchError::Validation(format!(
                "preload of {preload} exceeds ball capacity of {capacity}"
            )));
        }
        Ok(Self {
            count: preload,
            capacity,
        })
    }

    /// Take one ball. Rejected at capacity, leaving the count unchanged.
    pub fn try_pickup(&mut self) -> Result<u32, MatchError> {
        if self.count >= self.capacity {
            return Err(MatchError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        self.count += 1;
        Ok(self.count)
    }

    /// Spend one ball on `kind`. Rejected when empty, leaving the count unchanged.
    pub fn try_consume(&mut self, kind: ActionKind) -> Result<u32, MatchError> {
        if self.count == 0 {
            return Err(MatchError::InsufficientResource { kind });
        }
        self.count -= 1;
        Ok(self.count)
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }
}
