//! Static sequencing parameters, read once at startup.

use embassy_time::Duration;

/// Timing and sizing configuration for one staircase rail.
#[derive(Clone, Copy, Debug)]
pub struct RailConfig {
    /// Number of lights on the rail, ordered top to bottom.
    pub light_count: u8,
    /// Delay between switching consecutive lights during a cascade.
    pub cascade_delay: Duration,
    /// How long the rail stays fully lit between cascade-on and cascade-off.
    pub stay_on: Duration,
    /// Minimum time after a sequence ends before a new one may start.
    pub cooldown: Duration,
    /// How long a sensor must stay asserted before it counts as a trigger.
    pub bounce_window: Duration,
}

impl RailConfig {
    /// Configuration with the stock timings for `light_count` lights.
    pub const fn new(light_count: u8) -> Self {
        Self {
            light_count,
            cascade_delay: Duration::from_millis(300),
            stay_on: Duration::from_secs(5),
            cooldown: Duration::from_secs(10),
            bounce_window: Duration::from_secs(1),
        }
    }
}
