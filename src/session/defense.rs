//! Defense mode: an overlay on normal scouting that times defensive play.

/// Whether the robot is currently defending, and how long it has so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefenseState {
    started_at: Option<u32>,
    total: u32,
}

impl DefenseState {
    /// Start defending at `now`. Returns false if already defending.
    pub fn enter(&mut self, now: u32) -> bool {
        if self.started_at.is_some() {
            return false;
        }
        self.started_at = Some(now);
        true
    }

    /// Stop defending at `now`, returning the length of the stint.
    ///
    /// `None` if not defending. The total only grows here.
    pub fn exit(&mut self, now: u32) -> Option<u32> {
        let start = self.started_at.take()?;
        let duration = now.saturating_sub(start);
        self.total += duration;
        Some(duration)
    }

    pub fn is_active(&self) -> bool {
        self.started_at.is_some()
    }

    /// Seconds into the current stint, 0 when not defending.
    pub fn current(&self, now: u32) -> u32 {
        self.started_at.map_or(0, |start| now.saturating_sub(start))
    }

    /// Seconds accumulated over completed stints.
    pub fn total(&self) -> u32 {
        self.total
    }
}
