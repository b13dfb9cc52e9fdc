//! Playhead frame loop.

/// Cooperative frame scheduler for follower cursor updates.
///
/// The host ticks as often as it likes (typically once per animation frame);
/// [`poll`](Self::poll) reports whether a playhead frame is due. Frames that
/// were missed are skipped rather than replayed.
#[derive(Debug, Clone)]
pub struct PlayheadLoop {
    interval: f64,
    next_due: Option<f64>,
    frames: u64,
}

impl PlayheadLoop {
    pub fn new(frame_rate_hz: f64) -> Self {
        Self {
            interval: 1.0 / frame_rate_hz.max(1.0),
            next_due: None,
            frames: 0,
        }
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Schedules the first frame at `now`. Restarting a running loop keeps
    /// its schedule.
    pub fn start(&mut self, now: f64) {
        if self.next_due.is_none() {
            self.next_due = Some(now);
        }
    }

    /// Cancels the pending continuation. Takes effect before the next poll.
    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Frames produced since creation.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Returns `true` if a frame is due at `now` and schedules the next one.
    pub fn poll(&mut self, now: f64) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }
        let mut next = due + self.interval;
        if next <= now {
            next = now + self.interval;
        }
        self.next_due = Some(next);
        self.frames += 1;
        true
    }
}
