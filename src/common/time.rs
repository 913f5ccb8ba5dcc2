//! Stage timing helpers.

use std::time::Instant;

/// Monotonic stopwatch started at construction.
#[derive(Copy, Clone, Debug)]
pub struct Stopwatch(Instant);

impl Stopwatch {
    pub fn start() -> Self {
        Self(Instant::now())
    }

    /// Milliseconds elapsed since `start`.
    pub fn elapsed_ms(&self) -> u128 {
        self.0.elapsed().as_millis()
    }
}
