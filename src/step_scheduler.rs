//! Fixed-period pacing for the sensor/sequencer/rail loop.
//!
//! Portable pacing without async/await or platform timers. The scheduler
//! tells the caller how long to sleep; the caller owns the actual wait, so
//! the same loop runs on a bare-metal target, a host process, or a test
//! with synthetic time.

use embassy_time::{Duration, Instant};

use crate::rail::{LightRail, LineIoError};
use crate::sensor::SensorGate;
use crate::sequencer::CascadeSequencer;
use crate::{LightLine, RailEvent, SensorLine};

/// Default sensor sampling rate (100 Hz).
pub const DEFAULT_SAMPLE_HZ: u32 = 100;

/// Default tick period based on the sampling rate.
pub const DEFAULT_SAMPLE_PERIOD: Duration = Duration::from_millis(1000 / DEFAULT_SAMPLE_HZ as u64);

/// Result of one scheduler tick.
#[derive(Debug, Clone, Copy)]
pub struct StepResult {
    /// The deadline for the next tick.
    pub next_deadline: Instant,
    /// How long to wait until the next tick (zero if behind schedule).
    pub sleep_duration: Duration,
}

/// Drives the sensors, the sequencer and the rail at a fixed sampling
/// period with drift correction.
///
/// A tick samples both sensors, advances the cascade state machine and
/// writes the resulting frame to the hardware. A line write failure aborts
/// the running sequence and is propagated for the platform loop to log;
/// the loop itself is expected to keep ticking.
pub struct StepScheduler<'a, L, S, const MAX_LIGHTS: usize, const CHANNEL_SIZE: usize>
where
    L: LightLine,
    S: SensorLine,
{
    sensors: SensorGate<'a, S, CHANNEL_SIZE>,
    sequencer: CascadeSequencer<'a, MAX_LIGHTS, CHANNEL_SIZE>,
    rail: LightRail<L, MAX_LIGHTS>,
    next_tick: Instant,
    period: Duration,
    released: bool,
}

impl<'a, L, S, const MAX_LIGHTS: usize, const CHANNEL_SIZE: usize>
    StepScheduler<'a, L, S, MAX_LIGHTS, CHANNEL_SIZE>
where
    L: LightLine,
    S: SensorLine,
{
    /// Create a scheduler ticking at [`DEFAULT_SAMPLE_PERIOD`].
    ///
    /// # Panics
    ///
    /// Panics if the rail does not hold exactly the number of lights the
    /// sequencer was configured for.
    pub fn new(
        sensors: SensorGate<'a, S, CHANNEL_SIZE>,
        sequencer: CascadeSequencer<'a, MAX_LIGHTS, CHANNEL_SIZE>,
        rail: LightRail<L, MAX_LIGHTS>,
    ) -> Self {
        Self::with_period(sensors, sequencer, rail, DEFAULT_SAMPLE_PERIOD)
    }

    /// Create a scheduler with a custom sampling period.
    pub fn with_period(
        sensors: SensorGate<'a, S, CHANNEL_SIZE>,
        sequencer: CascadeSequencer<'a, MAX_LIGHTS, CHANNEL_SIZE>,
        rail: LightRail<L, MAX_LIGHTS>,
        period: Duration,
    ) -> Self {
        assert!(rail.len() == sequencer.config().light_count as usize);
        Self {
            sensors,
            sequencer,
            rail,
            next_tick: Instant::from_ticks(0),
            period,
            released: false,
        }
    }

    /// Process one tick and return timing for the next.
    ///
    /// On a write failure the running sequence is aborted (its cooldown
    /// still starts) and the error is returned; the next tick carries on
    /// with a dark target frame.
    pub fn tick(&mut self, now: Instant) -> Result<StepResult, LineIoError<L::Error>> {
        // Drift correction: after a long stall, skip the backlog instead of
        // replaying it as a burst.
        let max_drift_ms = self.period.as_millis() * 2;
        if now.as_millis() > self.next_tick.as_millis() + max_drift_ms {
            self.next_tick = now;
        }

        self.sensors.sample(now);
        let frame = self.sequencer.tick(now);
        let applied = self.rail.apply(frame);

        self.next_tick += self.period;
        if let Err(err) = applied {
            self.sequencer.abort(now);
            return Err(err);
        }

        let sleep_duration = if self.next_tick.as_millis() > now.as_millis() {
            Duration::from_millis(self.next_tick.as_millis() - now.as_millis())
        } else {
            Duration::from_millis(0)
        };

        Ok(StepResult {
            next_deadline: self.next_tick,
            sleep_duration,
        })
    }

    /// Pop the oldest pending sequencer event for logging.
    pub fn next_event(&mut self) -> Option<RailEvent> {
        self.sequencer.next_event()
    }

    pub fn sequencer(&self) -> &CascadeSequencer<'a, MAX_LIGHTS, CHANNEL_SIZE> {
        &self.sequencer
    }

    pub fn rail(&self) -> &LightRail<L, MAX_LIGHTS> {
        &self.rail
    }

    /// Release all hardware handles: sensors first, then lights.
    /// Idempotent; after this, ticking is harmless but drives nothing.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.sensors.release();
        self.rail.release();
    }
}
