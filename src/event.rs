//! Observable sequencer events.
//!
//! The sequencer queues these instead of printing; the platform shell drains
//! and formats them with whatever clock and output it has.

use crate::direction::Direction;

/// Why a trigger was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The cooldown after the previous sequence has not elapsed yet.
    Cooldown,
    /// A sequence is already running.
    Busy,
}

impl IgnoreReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cooldown => "system is in cooldown",
            Self::Busy => "a sequence is already running",
        }
    }
}

/// Events emitted by [`crate::CascadeSequencer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RailEvent {
    /// A trigger was received from a sensor.
    Triggered(Direction),
    /// The trigger was dropped without touching any light.
    TriggerIgnored {
        direction: Direction,
        reason: IgnoreReason,
    },
    /// The trigger was accepted and a cascade started.
    SequenceStarted(Direction),
    /// The sequence ran to completion; the cooldown started.
    SequenceFinished(Direction),
    /// The sequence was cut short by a hardware write failure.
    ///
    /// The cooldown still starts, so this is always followed by
    /// [`RailEvent::SequenceFinished`].
    SequenceAborted(Direction),
}
