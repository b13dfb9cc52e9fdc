//! Per-track audio players.
//!
//! Two variants implement [`AudioPlayer`]:
//!
//! - [`MediaElementPlayer`]: adapts an external media element that keeps its
//!   own position; segment bounds are enforced from [`AudioPlayer::poll`].
//! - [`SchedulerBackedPlayer`]: derives its position from the shared
//!   [`AudioClock`], the way a buffer source scheduled on an audio context
//!   does.

use crate::clock::AudioClock;
use crate::view::Segment;
use std::sync::Arc;

/// Playback operations the transport issues to a track.
pub trait AudioPlayer: Send {
    fn play(&mut self);
    fn pause(&mut self);
    /// Positions the player. Out-of-range times are clamped to the track.
    fn seek(&mut self, time: f64);
    /// Starts playback of `segment` from its start, looping when `looped`.
    fn play_segment(&mut self, segment: &Segment, looped: bool);
    fn is_playing(&self) -> bool;
    fn current_time(&self) -> f64;
    fn duration(&self) -> f64;

    /// Called once per session tick for the audible player.
    fn poll(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct SegmentBounds {
    start: f64,
    end: f64,
    looped: bool,
}

impl SegmentBounds {
    fn from_segment(segment: &Segment, looped: bool) -> Self {
        Self {
            start: segment.start_time,
            end: segment.end_time.max(segment.start_time),
            looped,
        }
    }
}

// ---------------------------------------------------------------------------
// Media element adapter
// ---------------------------------------------------------------------------

/// An external media element (decoder + output) with its own clock.
pub trait MediaElement: Send {
    fn play(&mut self);
    fn pause(&mut self);
    fn set_current_time(&mut self, time: f64);
    fn current_time(&self) -> f64;
    fn duration(&self) -> f64;
    fn paused(&self) -> bool;
}

/// [`AudioPlayer`] over a [`MediaElement`].
pub struct MediaElementPlayer<M: MediaElement> {
    element: M,
    bounds: Option<SegmentBounds>,
}

impl<M: MediaElement> MediaElementPlayer<M> {
    pub fn new(element: M) -> Self {
        Self {
            element,
            bounds: None,
        }
    }

    pub fn element(&self) -> &M {
        &self.element
    }

    pub fn element_mut(&mut self) -> &mut M {
        &mut self.element
    }
}

impl<M: MediaElement> AudioPlayer for MediaElementPlayer<M> {
    fn play(&mut self) {
        self.bounds = None;
        self.element.play();
    }

    fn pause(&mut self) {
        self.bounds = None;
        self.element.pause();
    }

    fn seek(&mut self, time: f64) {
        let time = time.clamp(0.0, self.element.duration().max(0.0));
        self.element.set_current_time(time);
    }

    fn play_segment(&mut self, segment: &Segment, looped: bool) {
        let bounds = SegmentBounds::from_segment(segment, looped);
        self.element.set_current_time(bounds.start);
        self.element.play();
        self.bounds = Some(bounds);
    }

    fn is_playing(&self) -> bool {
        !self.element.paused()
    }

    fn current_time(&self) -> f64 {
        self.element.current_time()
    }

    fn duration(&self) -> f64 {
        self.element.duration()
    }

    fn poll(&mut self) {
        let Some(bounds) = self.bounds else {
            return;
        };
        if self.element.paused() || self.element.current_time() < bounds.end {
            return;
        }
        if bounds.looped {
            self.element.set_current_time(bounds.start);
        } else {
            self.element.pause();
            self.bounds = None;
        }
    }
}

// ---------------------------------------------------------------------------
// Clock-scheduled player
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
enum PlayState {
    Paused { position: f64 },
    Playing { anchor_clock: f64, anchor_position: f64 },
}

/// [`AudioPlayer`] whose position is a pure function of the audio clock.
pub struct SchedulerBackedPlayer {
    clock: Arc<dyn AudioClock>,
    duration: f64,
    state: PlayState,
    bounds: Option<SegmentBounds>,
}

impl SchedulerBackedPlayer {
    pub fn new(clock: Arc<dyn AudioClock>, duration: f64) -> Self {
        Self {
            clock,
            duration: duration.max(0.0),
            state: PlayState::Paused { position: 0.0 },
            bounds: None,
        }
    }

    /// Position and rolling flag at clock time `now`.
    fn position_at(&self, now: f64) -> (f64, bool) {
        let (anchor_clock, anchor_position) = match self.state {
            PlayState::Paused { position } => return (position, false),
            PlayState::Playing {
                anchor_clock,
                anchor_position,
            } => (anchor_clock, anchor_position),
        };
        let raw = anchor_position + (now - anchor_clock).max(0.0);

        if let Some(b) = self.bounds {
            if raw >= b.end {
                let len = b.end - b.start;
                if b.looped && len > 0.0 {
                    return (b.start + (raw - b.end) % len, true);
                }
                return (b.end.min(self.duration), false);
            }
        }

        if raw >= self.duration {
            (self.duration, false)
        } else {
            (raw, true)
        }
    }

    fn anchor(&mut self, position: f64) {
        self.state = PlayState::Playing {
            anchor_clock: self.clock.now(),
            anchor_position: position,
        };
    }
}

impl AudioPlayer for SchedulerBackedPlayer {
    fn play(&mut self) {
        let (position, rolling) = self.position_at(self.clock.now());
        self.bounds = None;
        if rolling {
            return;
        }
        // An ended track restarts from the top
        let position = if position >= self.duration { 0.0 } else { position };
        self.anchor(position);
    }

    fn pause(&mut self) {
        let (position, _) = self.position_at(self.clock.now());
        self.state = PlayState::Paused { position };
        self.bounds = None;
    }

    fn seek(&mut self, time: f64) {
        let time = time.clamp(0.0, self.duration);
        match self.state {
            PlayState::Paused { .. } => self.state = PlayState::Paused { position: time },
            PlayState::Playing { .. } => self.anchor(time),
        }
    }

    fn play_segment(&mut self, segment: &Segment, looped: bool) {
        let bounds = SegmentBounds::from_segment(segment, looped);
        self.bounds = Some(bounds);
        self.anchor(bounds.start.clamp(0.0, self.duration));
    }

    fn is_playing(&self) -> bool {
        self.position_at(self.clock.now()).1
    }

    fn current_time(&self) -> f64 {
        self.position_at(self.clock.now()).0
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn poll(&mut self) {
        if let PlayState::Playing { .. } = self.state {
            let (position, rolling) = self.position_at(self.clock.now());
            if !rolling {
                self.state = PlayState::Paused { position };
                self.bounds = None;
            }
        }
    }
}
