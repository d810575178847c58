//! Time management utilities

use std::time::{Duration, Instant};

/// Counter for the discrete simulation loop.
///
/// The engine is tick-driven rather than frame-time driven; consumers that
/// care about wall time (study timers, UI) layer a [`Stopwatch`] on top.
#[derive(Debug, Default, Clone, Copy)]
pub struct TickClock {
    tick: u64,
}

impl TickClock {
    /// Create a clock at tick zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to the next tick and return its number
    pub fn advance(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    /// Get the current tick number
    pub fn current(&self) -> u64 {
        self.tick
    }
}

/// Simple stopwatch for measuring elapsed wall time
pub struct Stopwatch {
    start_time: Option<Instant>,
    elapsed: Duration,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    /// Create a new stopped stopwatch
    pub fn new() -> Self {
        Self {
            start_time: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Create a new stopwatch and start it immediately
    pub fn start_new() -> Self {
        let mut stopwatch = Self::new();
        stopwatch.start();
        stopwatch
    }

    /// Start the stopwatch
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Stop the stopwatch and accumulate elapsed time
    pub fn stop(&mut self) {
        if let Some(start) = self.start_time {
            self.elapsed += start.elapsed();
            self.start_time = None;
        }
    }

    /// Reset the stopwatch to zero
    pub fn reset(&mut self) {
        self.start_time = None;
        self.elapsed = Duration::ZERO;
    }

    /// Get the elapsed time
    pub fn elapsed(&self) -> Duration {
        let current_elapsed = if let Some(start) = self.start_time {
            start.elapsed()
        } else {
            Duration::ZERO
        };
        self.elapsed + current_elapsed
    }

    /// Get the elapsed time in seconds
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed().as_secs_f32()
    }

    /// Check if the stopwatch is currently running
    pub fn is_running(&self) -> bool {
        self.start_time.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_clock_advances() {
        let mut clock = TickClock::new();
        assert_eq!(clock.current(), 0);
        assert_eq!(clock.advance(), 1);
        assert_eq!(clock.advance(), 2);
        assert_eq!(clock.current(), 2);
    }

    #[test]
    fn test_stopwatch_accumulates_across_stops() {
        let mut sw = Stopwatch::start_new();
        assert!(sw.is_running());
        sw.stop();
        let first = sw.elapsed();
        sw.start();
        sw.stop();
        assert!(sw.elapsed() >= first);
    }
}
