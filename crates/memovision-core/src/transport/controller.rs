//! Transport controller.
//!
//! Owns the per-track players, the declick queue, the state machine and the
//! time relay. Every discontinuous audio operation on the audible track is
//! routed through the crossfader so it executes at silence.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use super::fsm::{LocateTarget, MotionState, TransitionResult, TransportEvent, TransportFsm};
use super::playhead::PlayheadLoop;
use super::relay::{Subscription, TimeRelay};
use crate::clock::AudioClock;
use crate::config::PlayerConfig;
use crate::crossfade::{Crossfader, FadeEvent};
use crate::gain::OutputGain;
use crate::measure::MeasureTable;
use crate::player::AudioPlayer;
use crate::registry::TrackRegistry;
use crate::sync::SyncMapper;
use crate::view::WaveformView;

/// Session state the transport reads and writes but does not own.
pub struct TrackContext<'a> {
    pub registry: &'a mut TrackRegistry,
    pub mapper: &'a SyncMapper,
    pub measures: &'a MeasureTable,
    pub views: &'a mut [Box<dyn WaveformView>],
}

impl TrackContext<'_> {
    /// All views have loaded; before that every operation is a no-op.
    pub fn is_ready(&self) -> bool {
        self.registry.all_ready()
    }
}

/// Operations waiting for the output to reach silence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    Pause,
    Locate,
    Switch,
}

pub struct Transport {
    clock: Arc<dyn AudioClock>,
    players: Vec<Box<dyn AudioPlayer>>,
    fsm: TransportFsm,
    crossfader: Crossfader<Deferred>,
    relay: TimeRelay,
    subscription: Option<Subscription>,
    playhead: PlayheadLoop,
    active: usize,
}

impl Transport {
    pub fn new(
        clock: Arc<dyn AudioClock>,
        players: Vec<Box<dyn AudioPlayer>>,
        gain: OutputGain,
        config: &PlayerConfig,
    ) -> Self {
        Self {
            clock,
            players,
            fsm: TransportFsm::new(),
            crossfader: Crossfader::new(
                gain,
                config.initial_volume,
                config.fade_secs,
                config.fade_curve,
            ),
            relay: TimeRelay::new(),
            subscription: None,
            playhead: PlayheadLoop::new(config.frame_rate_hz),
            active: 0,
        }
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Index of the audible track.
    pub fn active(&self) -> usize {
        self.active
    }

    pub fn motion(&self) -> MotionState {
        self.fsm.motion()
    }

    /// `true` while rolling, including declicks that resume rolling.
    pub fn is_playing(&self) -> bool {
        self.fsm.motion().is_rolling()
    }

    pub fn output_gain(&self) -> &OutputGain {
        self.crossfader.output()
    }

    pub fn volume(&self) -> f32 {
        self.crossfader.volume()
    }

    /// Track currently driving the follower cursors.
    pub fn relay_source(&self) -> Option<usize> {
        self.relay.source()
    }

    pub fn player(&self, track: usize) -> Option<&dyn AudioPlayer> {
        self.players.get(track).map(|p| p.as_ref())
    }

    pub fn track_count(&self) -> usize {
        self.players.len()
    }

    pub fn playhead_frames(&self) -> u64 {
        self.playhead.frames()
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    fn gated(&self, ctx: &TrackContext<'_>, op: &str) -> bool {
        if ctx.is_ready() {
            return false;
        }
        warn!(op, "transport not ready, ignoring");
        true
    }

    // =========================================================================
    // Source attachment
    // =========================================================================

    /// Attaches the active track as relay source once every view is ready.
    pub fn activate(&mut self, ctx: &mut TrackContext<'_>) {
        if self.subscription.is_some() {
            return;
        }
        match self.relay.attach(self.active) {
            Ok(sub) => self.subscription = Some(sub),
            Err(e) => {
                warn!(error = %e, "could not attach relay source");
                return;
            }
        }
        ctx.registry.set_playing(Some(self.active));
        self.publish_positions(ctx);
        debug!(active = self.active, "transport activated");
    }

    /// Moves the audible role to `to`. Only called at silence.
    fn swap_source(&mut self, ctx: &mut TrackContext<'_>, to: usize) {
        let from = self.active;
        if to == from || to >= self.players.len() {
            return;
        }
        let time = self.players[from].current_time();
        self.players[from].pause();

        if let Some(sub) = self.subscription.take() {
            self.relay.detach(sub);
        }
        self.active = to;
        ctx.registry.set_playing(Some(to));
        match self.relay.attach(to) {
            Ok(sub) => self.subscription = Some(sub),
            Err(e) => warn!(error = %e, "could not attach relay source"),
        }

        let mapped = ctx.mapper.to_other_track(from, to, time);
        self.players[to].seek(mapped);
        self.publish_positions(ctx);
        debug!(from, to, time, mapped, "source track switched");
    }

    /// Pushes the source time and the mapped follower times to the registry
    /// and every view.
    pub(crate) fn publish_positions(&mut self, ctx: &mut TrackContext<'_>) {
        let Some(sub) = self.subscription.as_ref() else {
            return;
        };
        let time = self.players[self.active].current_time();
        let mapper = ctx.mapper;
        let registry = &*ctx.registry;
        let views = &mut *ctx.views;
        self.relay.publish(sub, time, mapper, |track, t| {
            registry.set_time(track, t);
            if let Some(view) = views.get_mut(track) {
                view.set_playhead(t);
            }
        });
    }

    // =========================================================================
    // Motion
    // =========================================================================

    pub fn play_pause(&mut self, ctx: &mut TrackContext<'_>) {
        if self.gated(ctx, "play_pause") {
            return;
        }
        match self.fsm.motion() {
            MotionState::Stopped | MotionState::DeclickToStop => self.play(ctx),
            _ => self.stop(ctx),
        }
    }

    pub fn play(&mut self, ctx: &mut TrackContext<'_>) {
        if self.gated(ctx, "play") {
            return;
        }
        let now = self.clock.now();
        let was = self.fsm.motion();
        let TransitionResult::MotionChanged(motion) = self.fsm.transition(TransportEvent::Play)
        else {
            return;
        };
        debug!(?was, ?motion, "transport play");

        if was == MotionState::Stopped {
            self.start_rolling(ctx, now);
        } else {
            // Stop cancelled before silence: the pause never runs
            self.crossfader.retain_pending(|op| *op != Deferred::Pause);
            if !self.crossfader.has_pending() {
                self.crossfader.fade_in(now);
            }
            self.playhead.start(now);
        }
    }

    /// Pauses after a fade-out. Cancels the playhead loop immediately.
    pub fn stop(&mut self, ctx: &mut TrackContext<'_>) {
        if self.gated(ctx, "stop") {
            return;
        }
        let now = self.clock.now();
        match self.fsm.transition(TransportEvent::StopWithDeclick) {
            TransitionResult::DeclickStarted | TransitionResult::Queued => {
                self.playhead.cancel();
                self.crossfader.fade_out_then(now, Deferred::Pause);
                debug!(active = self.active, "transport stopping");
            }
            _ => {}
        }
    }

    /// Starts the audible track, honouring its selected region.
    fn start_rolling(&mut self, ctx: &mut TrackContext<'_>, now: f64) {
        let active = self.active;
        let player = &mut self.players[active];
        match ctx.registry.selection(active) {
            Some(region) => {
                let position = player.current_time();
                player.play_segment(region, true);
                if region.contains(position) {
                    player.seek(position);
                }
            }
            None => player.play(),
        }
        ctx.registry.set_playing(Some(active));
        self.crossfader.fade_in(now);
        self.playhead.start(now);
    }

    // =========================================================================
    // Switching
    // =========================================================================

    /// Makes `track` the audible track.
    ///
    /// While rolling the switch is declicked; a second request arriving
    /// before the fade-out completes replaces the pending target, so the
    /// intermediate track is never heard.
    pub fn select_track(&mut self, ctx: &mut TrackContext<'_>, track: usize) {
        if self.gated(ctx, "select_track") {
            return;
        }
        if track >= self.players.len() {
            warn!(track, tracks = self.players.len(), "select_track out of range");
            return;
        }
        if track == self.active && self.fsm.pending_switch().is_none() {
            return;
        }
        let now = self.clock.now();
        match self.fsm.transition(TransportEvent::SwitchWithDeclick(track)) {
            TransitionResult::Immediate => self.swap_source(ctx, track),
            TransitionResult::DeclickStarted | TransitionResult::Queued => {
                self.crossfader.fade_out_then(now, Deferred::Switch);
            }
            TransitionResult::Superseded => debug!(track, "pending switch superseded"),
            _ => {}
        }
    }

    // =========================================================================
    // Locating
    // =========================================================================

    /// Seeks the audible track to `time`, declicked while rolling.
    pub fn locate(&mut self, ctx: &mut TrackContext<'_>, time: f64) {
        let track = self.active;
        self.locate_to(ctx, LocateTarget::Time { track, time });
    }

    /// Locates to `target`, resolved on whichever track is audible when the
    /// seek runs.
    ///
    /// Dropped while another locate is waiting for silence.
    pub fn locate_to(&mut self, ctx: &mut TrackContext<'_>, target: LocateTarget) {
        if self.gated(ctx, "locate") {
            return;
        }
        let now = self.clock.now();
        match self.fsm.transition(TransportEvent::LocateWithDeclick(target)) {
            TransitionResult::Immediate => {
                self.seek_to(ctx, target);
                self.publish_positions(ctx);
            }
            TransitionResult::DeclickStarted | TransitionResult::Queued => {
                self.crossfader.fade_out_then(now, Deferred::Locate);
            }
            _ => warn!(?target, "locate dropped, another locate is pending"),
        }
    }

    /// Seeks to the start of the active track's selected region, or to 0.
    pub fn rewind(&mut self, ctx: &mut TrackContext<'_>) {
        self.locate_to(ctx, LocateTarget::RegionStart);
    }

    /// Seeks to the start of `measure` on the active track.
    pub fn go_to_measure(&mut self, ctx: &mut TrackContext<'_>, measure: usize) {
        if ctx.measures.get(self.active).is_none() {
            warn!(track = self.active, "no measure map for active track");
            return;
        }
        self.locate_to(ctx, LocateTarget::MeasureStart(measure));
    }

    fn resolve(&self, ctx: &TrackContext<'_>, target: LocateTarget) -> Option<f64> {
        match target {
            LocateTarget::Time { track, time } => {
                Some(ctx.mapper.to_other_track(track, self.active, time))
            }
            LocateTarget::MeasureStart(measure) => ctx
                .measures
                .get(self.active)
                .map(|map| map.start_of(measure)),
            LocateTarget::RegionStart => Some(
                ctx.registry
                    .selection(self.active)
                    .map_or(0.0, |region| region.start_time),
            ),
        }
    }

    fn seek_to(&mut self, ctx: &TrackContext<'_>, target: LocateTarget) {
        match self.resolve(ctx, target) {
            Some(time) => self.players[self.active].seek(time),
            None => warn!(track = self.active, ?target, "locate target unavailable"),
        }
    }

    // =========================================================================
    // Volume
    // =========================================================================

    pub fn set_volume(&mut self, volume: f32) {
        let now = self.clock.now();
        self.crossfader.set_volume(now, volume);
    }

    // =========================================================================
    // Tick
    // =========================================================================

    /// Advances fades, runs deferred operations and the playhead loop.
    pub fn tick(&mut self, ctx: &mut TrackContext<'_>) {
        let now = self.clock.now();

        if let FadeEvent::Silent(ops) = self.crossfader.update(now) {
            self.run_deferred(ctx, ops, now);
        }

        if let Some(player) = self.players.get_mut(self.active) {
            player.poll();
        }
        if self.fsm.motion() == MotionState::Rolling
            && !self.crossfader.has_pending()
            && !self.players[self.active].is_playing()
        {
            debug!(track = self.active, "active track ended");
            self.stop(ctx);
        }

        if self.playhead.poll(now) {
            trace!(now, frame = self.playhead.frames(), "playhead frame");
            self.publish_positions(ctx);
        }
    }

    fn run_deferred(&mut self, ctx: &mut TrackContext<'_>, ops: Vec<Deferred>, now: f64) {
        for op in ops {
            match op {
                Deferred::Pause => self.players[self.active].pause(),
                Deferred::Locate => {
                    if let Some(target) = self.fsm.take_pending_locate() {
                        self.seek_to(ctx, target);
                    }
                }
                Deferred::Switch => {
                    if let Some(track) = self.fsm.take_pending_switch() {
                        self.swap_source(ctx, track);
                    }
                }
            }
        }

        let result = self.fsm.transition(TransportEvent::DeclickComplete);
        debug!(?result, "declick complete");
        if self.fsm.motion() == MotionState::Rolling {
            self.start_rolling(ctx, now);
        } else {
            self.playhead.cancel();
        }
        self.publish_positions(ctx);
    }

    // =========================================================================
    // Reset
    // =========================================================================

    /// Stops everything without fades and rewinds every player.
    pub fn reset(&mut self) {
        self.fsm.transition(TransportEvent::Reset);
        self.crossfader.reset();
        self.playhead.cancel();
        for player in &mut self.players {
            player.pause();
            player.seek(0.0);
        }
        self.relay.clear();
        self.subscription = None;
        self.active = 0;
    }
}
