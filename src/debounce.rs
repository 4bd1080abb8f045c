//! Time-based debouncing for a single digital input.

use embassy_time::{Duration, Instant};

/// Debounce states for one sensor input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputState {
    /// Signal at rest.
    Idle,
    /// Raw edge seen; waiting for the signal to prove stable.
    Debouncing,
    /// Trigger fired; waiting for the signal to release.
    Triggered,
}

/// Debouncer for one digital input, sampled on every tick.
///
/// A raw rising edge opens the bounce window; the input must stay asserted
/// for the whole window before a trigger fires. Electrical chatter inside
/// the window therefore produces at most one logical event, and a held
/// signal fires exactly once until it releases.
#[derive(Debug)]
pub struct DebouncedInput {
    state: InputState,
    window: Duration,
    asserted_at: Instant,
}

impl DebouncedInput {
    pub const fn new(window: Duration) -> Self {
        Self {
            state: InputState::Idle,
            window,
            asserted_at: Instant::from_ticks(0),
        }
    }

    pub const fn state(&self) -> InputState {
        self.state
    }

    /// Feed one raw sample. Returns `true` exactly once per stable assertion.
    pub fn update(&mut self, raw: bool, now: Instant) -> bool {
        match self.state {
            InputState::Idle => {
                if raw {
                    self.state = InputState::Debouncing;
                    self.asserted_at = now;
                }
                false
            }
            InputState::Debouncing => {
                if !raw {
                    self.state = InputState::Idle;
                    false
                } else if now.as_millis() - self.asserted_at.as_millis()
                    >= self.window.as_millis()
                {
                    self.state = InputState::Triggered;
                    true
                } else {
                    false
                }
            }
            InputState::Triggered => {
                if !raw {
                    self.state = InputState::Idle;
                }
                false
            }
        }
    }
}
