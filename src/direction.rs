//! Cascade direction over the staircase.

const DIRECTION_NAME_UP: &str = "go_up";
const DIRECTION_NAME_DOWN: &str = "go_down";

/// Direction of a cascade.
///
/// Lights are stored in physical top-to-bottom order, so `Down` animates in
/// stored order and `Up` in reverse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Bottom-to-top, for someone walking up the stairs.
    Up,
    /// Top-to-bottom, for someone walking down the stairs.
    Down,
}

impl Direction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => DIRECTION_NAME_UP,
            Self::Down => DIRECTION_NAME_DOWN,
        }
    }

    /// Index of the light that switches at `step` of the cascade-on for a
    /// rail of `count` lights.
    ///
    /// Cascade-off runs this order backwards: the light turned on last turns
    /// off first, so the wave collapses toward where it started.
    pub(crate) const fn on_index(self, step: u8, count: u8) -> u8 {
        match self {
            Self::Down => step,
            Self::Up => count - 1 - step,
        }
    }
}
