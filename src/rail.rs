//! The ordered run of physical light lines.

use heapless::Vec;

use crate::LightLine;

/// Startup acquisition failure.
///
/// By the time this is returned, every line acquired before the failing one
/// has already been released.
#[derive(Debug, PartialEq, Eq)]
pub struct AcquireError<E> {
    /// Index of the line that failed to acquire, in storage order.
    pub line: u8,
    /// Underlying hardware error.
    pub source: E,
}

/// Write failure on a single line.
#[derive(Debug, PartialEq, Eq)]
pub struct LineIoError<E> {
    /// Index of the line that failed to switch.
    pub line: u8,
    /// Underlying hardware error.
    pub source: E,
}

/// Ordered collection of light lines, top of the stairs first.
///
/// Keeps a shadow of each line's on/off state so [`LightRail::apply`] only
/// touches lines that actually change.
pub struct LightRail<L: LightLine, const MAX_LIGHTS: usize> {
    lines: Vec<L, MAX_LIGHTS>,
    states: Vec<bool, MAX_LIGHTS>,
    released: bool,
}

impl<L: LightLine, const MAX_LIGHTS: usize> LightRail<L, MAX_LIGHTS> {
    /// Acquire one line per identifier, preserving order. All lines start
    /// off.
    ///
    /// On failure every line acquired so far is released before the error
    /// propagates, so a half-built rail never leaks hardware handles.
    ///
    /// # Panics
    ///
    /// Panics if `line_ids` holds more than `MAX_LIGHTS` entries.
    pub fn acquire(
        line_ids: &[u8],
        mut open: impl FnMut(u8) -> Result<L, L::Error>,
    ) -> Result<Self, AcquireError<L::Error>> {
        assert!(line_ids.len() <= MAX_LIGHTS);

        let mut lines: Vec<L, MAX_LIGHTS> = Vec::new();
        for (index, &id) in line_ids.iter().enumerate() {
            match open(id) {
                Ok(line) => {
                    // Capacity was asserted above.
                    let _ = lines.push(line);
                }
                Err(source) => {
                    for acquired in &mut lines {
                        acquired.release();
                    }
                    #[allow(clippy::cast_possible_truncation)]
                    return Err(AcquireError {
                        line: index as u8,
                        source,
                    });
                }
            }
        }

        let mut states = Vec::new();
        states.resize(lines.len(), false).ok();

        Ok(Self {
            lines,
            states,
            released: false,
        })
    }

    /// Number of lights on the rail.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Shadow of the current on/off states, top to bottom.
    pub fn states(&self) -> &[bool] {
        &self.states
    }

    /// Drive every line whose state differs from `frame`.
    ///
    /// Stops at the first failing line; lines written before the failure
    /// keep their new state, the failing one keeps its old shadow state.
    /// After [`LightRail::release`] this is a no-op, so a shutdown
    /// mid-cascade cannot touch dead handles.
    pub fn apply(&mut self, frame: &[bool]) -> Result<(), LineIoError<L::Error>> {
        if self.released {
            return Ok(());
        }

        for (index, (line, shadow)) in
            self.lines.iter_mut().zip(self.states.iter_mut()).enumerate()
        {
            let target = frame.get(index).copied().unwrap_or(false);
            if *shadow == target {
                continue;
            }
            #[allow(clippy::cast_possible_truncation)]
            line.set(target).map_err(|source| LineIoError {
                line: index as u8,
                source,
            })?;
            *shadow = target;
        }

        Ok(())
    }

    /// Release every line's hardware handle. Idempotent; later calls are
    /// no-ops.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        for line in &mut self.lines {
            line.release();
        }
    }
}
