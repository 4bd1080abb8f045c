#![no_std]

pub mod config;
pub mod debounce;
pub mod direction;
pub mod event;
pub mod rail;
pub mod sensor;
pub mod sequencer;
pub mod step_scheduler;
pub mod trigger;

pub use config::RailConfig;
pub use debounce::{DebouncedInput, InputState};
pub use direction::Direction;
pub use event::{IgnoreReason, RailEvent};
pub use rail::{AcquireError, LightRail, LineIoError};
pub use sensor::SensorGate;
pub use sequencer::{CascadeSequencer, SequencePhase};
pub use step_scheduler::{StepResult, StepScheduler};
pub use trigger::{TriggerChannel, TriggerReceiver, TriggerSender};

pub use embassy_time::{Duration, Instant};

/// Abstract handle to one physical light output.
///
/// Implement this trait to support different hardware platforms; one value
/// per staircase step. [`rail::LightRail`] is generic over this trait.
pub trait LightLine {
    /// Hardware write error, surfaced together with the line index.
    type Error;

    /// Drive the output on or off.
    fn set(&mut self, on: bool) -> Result<(), Self::Error>;

    /// Release the underlying hardware handle.
    ///
    /// Called at most once per line by [`rail::LightRail`].
    fn release(&mut self);
}

/// Abstract handle to one motion sensor input.
pub trait SensorLine {
    /// Current raw, un-debounced level. `true` means asserted.
    fn is_active(&mut self) -> bool;

    /// Release the underlying hardware handle.
    fn release(&mut self);
}
