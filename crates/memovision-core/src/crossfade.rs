//! Declick queue around discontinuous playback operations.
//!
//! Any operation that would be audible as a click (seek, pause, source swap)
//! is handed to [`Crossfader::fade_out_then`]. The output gain ramps to
//! silence, and only then does [`Crossfader::update`] hand the operations back
//! for execution. The caller restores the volume afterwards with
//! [`Crossfader::fade_in`].
//!
//! Requests are serialized:
//! - a fade-out requested while fading out joins the queue without restarting
//!   the ramp;
//! - a fade-out requested while fading in starts from the current gain;
//! - the gain rests at silence until the next fade-in.

use crate::gain::{FadeCurve, GainRamp, OutputGain};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadePhase {
    Silent,
    FadingIn,
    Audible,
    FadingOut,
}

/// Result of advancing the crossfader to a clock time.
#[derive(Debug, PartialEq)]
pub enum FadeEvent<Op> {
    Idle,
    Ramping,
    /// The output just reached silence; run these operations now, in order.
    Silent(Vec<Op>),
    /// A fade-in just reached the target volume.
    Restored,
}

pub struct Crossfader<Op> {
    gain: OutputGain,
    volume: f32,
    fade_secs: f64,
    curve: FadeCurve,
    ramp: Option<GainRamp>,
    phase: FadePhase,
    pending: Vec<Op>,
}

impl<Op> Crossfader<Op> {
    /// Creates a crossfader writing to `gain`, starting silent.
    pub fn new(gain: OutputGain, volume: f32, fade_secs: f64, curve: FadeCurve) -> Self {
        gain.set(0.0);
        Self {
            gain,
            volume: volume.clamp(0.0, 1.0),
            fade_secs,
            curve,
            ramp: None,
            phase: FadePhase::Silent,
            pending: Vec::new(),
        }
    }

    pub fn output(&self) -> &OutputGain {
        &self.gain
    }

    pub fn phase(&self) -> FadePhase {
        self.phase
    }

    /// User target volume.
    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn pending(&self) -> &[Op] {
        &self.pending
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn is_fading_out(&self) -> bool {
        self.phase == FadePhase::FadingOut
    }

    /// Gain the output would carry at clock time `now`.
    pub fn level(&self, now: f64) -> f32 {
        match self.ramp {
            Some(ramp) => ramp.value_at(now),
            None => self.gain.get(),
        }
    }

    /// Ramps to silence and defers `op` until silence is reached.
    pub fn fade_out_then(&mut self, now: f64, op: Op) {
        self.pending.push(op);
        match self.phase {
            FadePhase::FadingOut => {}
            FadePhase::Silent => {
                // Already silent: the op runs on the next update
                self.ramp = None;
                self.phase = FadePhase::FadingOut;
            }
            FadePhase::FadingIn | FadePhase::Audible => {
                let from = self.level(now);
                self.ramp = Some(GainRamp::new(from, 0.0, now, self.fade_secs, self.curve));
                self.phase = FadePhase::FadingOut;
            }
        }
    }

    /// Ramps from the current gain back to the user volume.
    ///
    /// Refused (returns `false`) while operations are still waiting for
    /// silence.
    pub fn fade_in(&mut self, now: f64) -> bool {
        if self.has_pending() {
            return false;
        }
        let from = self.level(now);
        self.gain.set(from);
        self.ramp = Some(GainRamp::new(from, self.volume, now, self.fade_secs, self.curve));
        self.phase = FadePhase::FadingIn;
        true
    }

    /// Advances the ramp to `now`, writing the output gain.
    pub fn update(&mut self, now: f64) -> FadeEvent<Op> {
        match self.phase {
            FadePhase::Silent | FadePhase::Audible => FadeEvent::Idle,
            FadePhase::FadingOut => match self.ramp {
                Some(ramp) if !ramp.is_complete(now) => {
                    self.gain.set(ramp.value_at(now));
                    FadeEvent::Ramping
                }
                _ => {
                    self.ramp = None;
                    self.gain.set(0.0);
                    self.phase = FadePhase::Silent;
                    FadeEvent::Silent(std::mem::take(&mut self.pending))
                }
            },
            FadePhase::FadingIn => match self.ramp {
                Some(ramp) if !ramp.is_complete(now) => {
                    self.gain.set(ramp.value_at(now));
                    FadeEvent::Ramping
                }
                _ => {
                    self.ramp = None;
                    self.gain.set(self.volume);
                    self.phase = FadePhase::Audible;
                    FadeEvent::Restored
                }
            },
        }
    }

    /// Drops queued operations that fail `keep`.
    pub fn retain_pending(&mut self, keep: impl FnMut(&Op) -> bool) {
        self.pending.retain(keep);
    }

    /// Updates the target volume. Applied at once while audible, folded into
    /// the ramp while fading in, and kept for later otherwise.
    pub fn set_volume(&mut self, now: f64, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        match self.phase {
            FadePhase::Audible => self.gain.set(self.volume),
            FadePhase::FadingIn => {
                let from = self.level(now);
                self.ramp = Some(GainRamp::new(from, self.volume, now, self.fade_secs, self.curve));
            }
            FadePhase::Silent | FadePhase::FadingOut => {}
        }
    }

    /// Drops everything in flight and rests at silence.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.ramp = None;
        self.phase = FadePhase::Silent;
        self.gain.set(0.0);
    }
}
