//! Cross-thread command queue.
//!
//! UI and input threads never touch the session directly. They push
//! [`TransportCommand`]s through a [`CommandSender`]; the session drains the
//! queue at the start of every tick, on its own thread.

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::measure::MeasureSpan;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransportCommand {
    PlayPause,
    Rewind,
    SelectPrevious,
    SelectNext,
    SelectTrack(usize),
    PreviousMeasure,
    NextMeasure,
    GoToMeasure(usize),
    ToggleMeasures,
    ClearSelection,
    /// `None` restores the full views.
    ZoomOnMeasures(Option<MeasureSpan>),
    SetVolume(f32),
}

impl TransportCommand {
    /// Keyboard binding of the player page. `key` is a DOM-style key name.
    pub fn from_key(key: &str) -> Option<Self> {
        let command = match key {
            " " | "Space" | "Spacebar" => Self::PlayPause,
            "Home" => Self::Rewind,
            "ArrowUp" => Self::SelectPrevious,
            "ArrowDown" => Self::SelectNext,
            "ArrowLeft" => Self::PreviousMeasure,
            "ArrowRight" => Self::NextMeasure,
            "m" | "M" => Self::ToggleMeasures,
            "Escape" => Self::ClearSelection,
            _ => return None,
        };
        Some(command)
    }
}

/// Cloneable handle for queueing commands from any thread.
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: Sender<TransportCommand>,
}

impl CommandSender {
    /// Queues `command`. Returns `false` once the session is gone.
    pub fn send(&self, command: TransportCommand) -> bool {
        self.tx.send(command).is_ok()
    }

    /// Queues the command bound to `key`, if any.
    pub fn send_key(&self, key: &str) -> bool {
        TransportCommand::from_key(key).is_some_and(|command| self.send(command))
    }
}

pub(crate) struct CommandQueue {
    tx: Sender<TransportCommand>,
    rx: Receiver<TransportCommand>,
}

impl CommandQueue {
    pub(crate) fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub(crate) fn sender(&self) -> CommandSender {
        CommandSender {
            tx: self.tx.clone(),
        }
    }

    /// Everything queued so far, in send order.
    pub(crate) fn drain(&self) -> Vec<TransportCommand> {
        self.rx.try_iter().collect()
    }
}
