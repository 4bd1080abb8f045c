//! Bridge from motion sensors to the trigger channel.

use embassy_time::{Duration, Instant};

use crate::SensorLine;
use crate::debounce::DebouncedInput;
use crate::direction::Direction;
use crate::trigger::TriggerSender;

/// Two debounced motion inputs, one per end of the staircase.
///
/// The `up` sensor sits at the bottom of the stairs and requests the
/// bottom-to-top cascade; the `down` sensor sits at the top. Each stable
/// assertion publishes exactly one trigger into the channel. The gate never
/// calls into the sequencer directly.
pub struct SensorGate<'a, S: SensorLine, const SIZE: usize> {
    up: S,
    down: S,
    up_debounce: DebouncedInput,
    down_debounce: DebouncedInput,
    triggers: TriggerSender<'a, SIZE>,
    released: bool,
}

impl<'a, S: SensorLine, const SIZE: usize> SensorGate<'a, S, SIZE> {
    pub fn new(
        up: S,
        down: S,
        bounce_window: Duration,
        triggers: TriggerSender<'a, SIZE>,
    ) -> Self {
        Self {
            up,
            down,
            up_debounce: DebouncedInput::new(bounce_window),
            down_debounce: DebouncedInput::new(bounce_window),
            triggers,
            released: false,
        }
    }

    /// Sample both inputs once.
    ///
    /// A full channel drops the trigger; the bounded queue is the backstop
    /// against a stuck sensor flooding the executor.
    pub fn sample(&mut self, now: Instant) {
        if self.released {
            return;
        }
        if self.up_debounce.update(self.up.is_active(), now) {
            let _ = self.triggers.send(Direction::Up);
        }
        if self.down_debounce.update(self.down.is_active(), now) {
            let _ = self.triggers.send(Direction::Down);
        }
    }

    /// Release both input handles. Idempotent.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.up.release();
        self.down.release();
    }
}
