//! The cascade sequence executor.

use embassy_time::{Duration, Instant};
use heapless::Deque;

use crate::config::RailConfig;
use crate::direction::Direction;
use crate::event::{IgnoreReason, RailEvent};
use crate::trigger::TriggerReceiver;

/// Pending events kept between ticks; the oldest is dropped on overflow.
const EVENT_QUEUE_SIZE: usize = 8;

/// Phase of the cascade state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequencePhase {
    /// No sequence running.
    Idle,
    /// Lights turning on, one per cascade delay.
    CascadeOn,
    /// All lights on.
    Hold,
    /// Lights turning off, last-on first.
    CascadeOff,
}

/// Single executor for cascade sequences.
///
/// Owns all mutable sequence state, including the cooldown timestamp, and
/// mutates it only inside [`CascadeSequencer::tick`]. Triggers reach it
/// through the bounded channel, so sensor events firing in another context
/// can never interleave two cascades against the same rail.
///
/// Real-time sleeps of the installation are modelled as phase deadlines:
/// `tick(now)` applies every transition that is due and the caller sleeps
/// until [`CascadeSequencer::next_deadline`]. Tests drive it with synthetic
/// `Instant`s and never wait.
pub struct CascadeSequencer<'a, const MAX_LIGHTS: usize, const CHANNEL_SIZE: usize> {
    triggers: TriggerReceiver<'a, CHANNEL_SIZE>,
    config: RailConfig,

    frame: [bool; MAX_LIGHTS],
    phase: SequencePhase,
    direction: Direction,
    /// Next transition within the current phase.
    step: u8,
    /// When that transition is due.
    deadline: Instant,
    /// End of the previous sequence; `None` until the first one finishes.
    last_finished: Option<Instant>,

    events: Deque<RailEvent, EVENT_QUEUE_SIZE>,
}

impl<'a, const MAX_LIGHTS: usize, const CHANNEL_SIZE: usize>
    CascadeSequencer<'a, MAX_LIGHTS, CHANNEL_SIZE>
{
    /// # Panics
    ///
    /// Panics if `config.light_count` is zero or exceeds `MAX_LIGHTS`.
    pub fn new(triggers: TriggerReceiver<'a, CHANNEL_SIZE>, config: RailConfig) -> Self {
        assert!(config.light_count >= 1);
        assert!(config.light_count as usize <= MAX_LIGHTS);
        Self {
            triggers,
            config,
            frame: [false; MAX_LIGHTS],
            phase: SequencePhase::Idle,
            direction: Direction::Down,
            step: 0,
            deadline: Instant::from_ticks(0),
            last_finished: None,
            events: Deque::new(),
        }
    }

    /// One executor step: finish due work, judge fresh triggers, apply the
    /// transitions they cause. Returns the target frame, top to bottom.
    pub fn tick(&mut self, now: Instant) -> &[bool] {
        // Settle anything already due first, so a trigger arriving in the
        // same tick a sequence finishes is judged against the updated
        // cooldown timestamp.
        self.advance(now);
        self.drain_triggers(now);
        self.advance(now);

        &self.frame[..self.config.light_count as usize]
    }

    /// Abandon the running sequence after a hardware write failure.
    ///
    /// The remaining steps are skipped, the frame is forced dark so the next
    /// successful write clears the rail, and the cooldown timestamp still
    /// advances. A failed cascade must not leave the rail with cooldown
    /// enforcement stuck in the past.
    pub fn abort(&mut self, now: Instant) {
        if self.phase == SequencePhase::Idle {
            return;
        }
        self.frame = [false; MAX_LIGHTS];
        self.phase = SequencePhase::Idle;
        self.step = 0;
        self.last_finished = Some(now);
        self.push_event(RailEvent::SequenceAborted(self.direction));
        self.push_event(RailEvent::SequenceFinished(self.direction));
    }

    pub const fn phase(&self) -> SequencePhase {
        self.phase
    }

    pub const fn config(&self) -> &RailConfig {
        &self.config
    }

    /// When the next transition is due, if a sequence is running.
    pub fn next_deadline(&self) -> Option<Instant> {
        (self.phase != SequencePhase::Idle).then_some(self.deadline)
    }

    /// Time left before a new sequence may start; zero when ready.
    pub fn cooldown_remaining(&self, now: Instant) -> Duration {
        let Some(finished) = self.last_finished else {
            return Duration::from_ticks(0);
        };
        let end = finished.as_millis() + self.config.cooldown.as_millis();
        Duration::from_millis(end.saturating_sub(now.as_millis()))
    }

    /// Pop the oldest pending event.
    pub fn next_event(&mut self) -> Option<RailEvent> {
        self.events.pop_front()
    }

    fn in_cooldown(&self, now: Instant) -> bool {
        self.cooldown_remaining(now).as_ticks() > 0
    }

    fn drain_triggers(&mut self, now: Instant) {
        while let Some(direction) = self.triggers.receive() {
            self.push_event(RailEvent::Triggered(direction));
            if self.phase != SequencePhase::Idle {
                self.push_event(RailEvent::TriggerIgnored {
                    direction,
                    reason: IgnoreReason::Busy,
                });
            } else if self.in_cooldown(now) {
                self.push_event(RailEvent::TriggerIgnored {
                    direction,
                    reason: IgnoreReason::Cooldown,
                });
            } else {
                self.start(direction, now);
            }
        }
    }

    fn start(&mut self, direction: Direction, now: Instant) {
        self.direction = direction;
        self.phase = SequencePhase::CascadeOn;
        self.step = 0;
        // The first light switches within this very tick.
        self.deadline = now;
        self.push_event(RailEvent::SequenceStarted(direction));
    }

    /// Apply every transition that is due. After a stall this catches up in
    /// one call, snapping the frame to where the cascade should be by `now`.
    fn advance(&mut self, now: Instant) {
        while self.phase != SequencePhase::Idle && now >= self.deadline {
            self.step_once();
        }
    }

    fn step_once(&mut self) {
        let count = self.config.light_count;
        match self.phase {
            SequencePhase::Idle => {}
            SequencePhase::CascadeOn => {
                let index = self.direction.on_index(self.step, count);
                self.frame[index as usize] = true;
                self.step += 1;
                if self.step == count {
                    // The last light settles for one cascade delay before
                    // the hold starts counting.
                    self.phase = SequencePhase::Hold;
                    self.deadline += self.config.cascade_delay + self.config.stay_on;
                } else {
                    self.deadline += self.config.cascade_delay;
                }
            }
            SequencePhase::Hold => {
                // The first off-switch is due right at the hold deadline.
                self.phase = SequencePhase::CascadeOff;
                self.step = 0;
            }
            SequencePhase::CascadeOff => {
                if self.step == count {
                    self.finish();
                } else {
                    // Reverse of the on order: the wave collapses from the
                    // far end back toward where it entered the stairs.
                    let index = self.direction.on_index(count - 1 - self.step, count);
                    self.frame[index as usize] = false;
                    self.step += 1;
                    self.deadline += self.config.cascade_delay;
                }
            }
        }
    }

    fn finish(&mut self) {
        // Stamp the nominal end of the sequence, not the tick that observed
        // it, so the cooldown length does not depend on sampling jitter.
        self.last_finished = Some(self.deadline);
        self.phase = SequencePhase::Idle;
        self.step = 0;
        self.push_event(RailEvent::SequenceFinished(self.direction));
    }

    fn push_event(&mut self, event: RailEvent) {
        if self.events.is_full() {
            self.events.pop_front();
        }
        let _ = self.events.push_back(event);
    }
}
