pub(crate) mod controller;
pub(crate) mod fsm;
pub(crate) mod playhead;
pub(crate) mod relay;

pub use controller::{TrackContext, Transport};
pub use fsm::{LocateTarget, MotionState, TransitionResult, TransportEvent, TransportFsm};
pub use playhead::PlayheadLoop;
pub use relay::{Subscription, TimeRelay};
