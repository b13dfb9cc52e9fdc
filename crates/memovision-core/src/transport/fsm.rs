//! Transport state machine.
//!
//! Tracks motion and which declicked operation is waiting for silence. The
//! machine only decides; the controller performs the audio side effects.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionState {
    #[default]
    Stopped,
    Rolling,
    DeclickToStop,
    DeclickToLocate,
    DeclickToSwitch,
}

impl MotionState {
    /// Audio is (or is about to keep) rolling.
    pub fn is_rolling(self) -> bool {
        matches!(
            self,
            MotionState::Rolling | MotionState::DeclickToLocate | MotionState::DeclickToSwitch
        )
    }

    pub fn is_declicking(self) -> bool {
        matches!(
            self,
            MotionState::DeclickToStop | MotionState::DeclickToLocate | MotionState::DeclickToSwitch
        )
    }
}

/// Where a locate lands. Resolved against the audible track when it runs,
/// so a switch completing first moves the target into the new timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocateTarget {
    /// Local time on `track`, mapped onto the audible track.
    Time { track: usize, time: f64 },
    /// Start of a measure on the audible track's own measure map.
    MeasureStart(usize),
    /// Start of the audible track's selected region, or 0 without one.
    RegionStart,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransportEvent {
    Play,
    StopWithDeclick,
    LocateWithDeclick(LocateTarget),
    SwitchWithDeclick(usize),
    /// The fade-out finished and the deferred operations ran.
    DeclickComplete,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionResult {
    None,
    MotionChanged(MotionState),
    /// A fade-out must start; the operation runs once it completes.
    DeclickStarted,
    /// Nothing is audible; perform the operation right away.
    Immediate,
    /// A fade-out is already running; append the operation to it.
    Queued,
    /// A pending switch now targets a different track.
    Superseded,
}

#[derive(Debug, Default)]
pub struct TransportFsm {
    motion: MotionState,
    /// Motion to return to when a pending stop is cancelled by `Play`.
    resume: MotionState,
    pending_locate: Option<LocateTarget>,
    pending_switch: Option<usize>,
}

impl TransportFsm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn motion(&self) -> MotionState {
        self.motion
    }

    pub fn pending_locate(&self) -> Option<LocateTarget> {
        self.pending_locate
    }

    pub fn pending_switch(&self) -> Option<usize> {
        self.pending_switch
    }

    pub fn take_pending_locate(&mut self) -> Option<LocateTarget> {
        self.pending_locate.take()
    }

    pub fn take_pending_switch(&mut self) -> Option<usize> {
        self.pending_switch.take()
    }

    pub fn transition(&mut self, event: TransportEvent) -> TransitionResult {
        use TransportEvent::*;

        match event {
            Play => match self.motion {
                MotionState::Stopped => {
                    self.motion = MotionState::Rolling;
                    TransitionResult::MotionChanged(MotionState::Rolling)
                }
                MotionState::DeclickToStop => {
                    self.motion = self.resume;
                    TransitionResult::MotionChanged(self.motion)
                }
                _ => TransitionResult::None,
            },

            StopWithDeclick => match self.motion {
                MotionState::Rolling => {
                    self.resume = MotionState::Rolling;
                    self.motion = MotionState::DeclickToStop;
                    TransitionResult::DeclickStarted
                }
                MotionState::DeclickToLocate | MotionState::DeclickToSwitch => {
                    self.resume = self.motion;
                    self.motion = MotionState::DeclickToStop;
                    TransitionResult::Queued
                }
                MotionState::Stopped | MotionState::DeclickToStop => TransitionResult::None,
            },

            LocateWithDeclick(target) => {
                if self.pending_locate.is_some() {
                    return TransitionResult::None;
                }
                match self.motion {
                    MotionState::Stopped => TransitionResult::Immediate,
                    MotionState::Rolling => {
                        self.pending_locate = Some(target);
                        self.motion = MotionState::DeclickToLocate;
                        TransitionResult::DeclickStarted
                    }
                    _ => {
                        self.pending_locate = Some(target);
                        TransitionResult::Queued
                    }
                }
            }

            SwitchWithDeclick(track) => {
                if self.pending_switch.is_some() {
                    self.pending_switch = Some(track);
                    return TransitionResult::Superseded;
                }
                match self.motion {
                    MotionState::Stopped => TransitionResult::Immediate,
                    MotionState::Rolling => {
                        self.pending_switch = Some(track);
                        self.motion = MotionState::DeclickToSwitch;
                        TransitionResult::DeclickStarted
                    }
                    _ => {
                        self.pending_switch = Some(track);
                        TransitionResult::Queued
                    }
                }
            }

            DeclickComplete => {
                self.pending_locate = None;
                self.pending_switch = None;
                match self.motion {
                    MotionState::DeclickToStop => {
                        self.motion = MotionState::Stopped;
                        TransitionResult::MotionChanged(MotionState::Stopped)
                    }
                    MotionState::DeclickToLocate | MotionState::DeclickToSwitch => {
                        self.motion = MotionState::Rolling;
                        TransitionResult::MotionChanged(MotionState::Rolling)
                    }
                    MotionState::Stopped | MotionState::Rolling => TransitionResult::None,
                }
            }

            Reset => {
                let was = self.motion;
                *self = Self::default();
                if was == MotionState::Stopped {
                    TransitionResult::None
                } else {
                    TransitionResult::MotionChanged(MotionState::Stopped)
                }
            }
        }
    }
}
