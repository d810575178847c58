//! Completion timing and result recording
//!
//! A [`SessionTimer`] runs while the participant assembles the puzzle and
//! latches the elapsed time the first time the board is full. A
//! [`CompletionLog`] appends one CSV row per completed condition; the file
//! gets a header when first created. Recording failures are surfaced as
//! errors for the caller to log, never allowed to take the session down.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use snap_engine::foundation::time::Stopwatch;
use snap_engine::session::PuzzleSession;

use crate::config::CONDITION_COUNT;

/// Result recording errors
#[derive(thiserror::Error, Debug)]
pub enum StudyError {
    /// Condition indices are 1-based and bounded
    #[error("invalid condition index {0}, must be 1-{CONDITION_COUNT}")]
    InvalidCondition(u8),

    /// The results file could not be written
    #[error("failed to write results: {0}")]
    Io(#[from] std::io::Error),
}

/// Appends completion rows to a per-participant CSV file
pub struct CompletionLog {
    path: PathBuf,
    participant_id: String,
}

impl CompletionLog {
    /// Create a log writing to `path` for the given participant
    pub fn new(path: impl Into<PathBuf>, participant_id: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            participant_id: participant_id.into(),
        }
    }

    /// Record one completed condition.
    ///
    /// Writes the CSV header first if the file does not exist yet.
    pub fn record(
        &self,
        condition: u8,
        snap_distance: f32,
        time_seconds: f32,
    ) -> Result<(), StudyError> {
        if !(1..=CONDITION_COUNT).contains(&condition) {
            return Err(StudyError::InvalidCondition(condition));
        }

        let new_file = !Path::new(&self.path).exists();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        if new_file {
            writeln!(
                file,
                "timestamp,participant,condition,snap_distance,time_seconds"
            )?;
        }

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        writeln!(
            file,
            "{timestamp},{},{condition},{snap_distance:.3},{time_seconds:.2}",
            self.participant_id
        )?;

        log::info!(
            "recorded condition {condition}: {time_seconds:.2}s at snap distance {snap_distance:.3}"
        );
        Ok(())
    }
}

/// Wall-clock timer that latches the completion time of a session
pub struct SessionTimer {
    stopwatch: Stopwatch,
    final_time: Option<f32>,
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionTimer {
    /// Create a stopped timer
    pub fn new() -> Self {
        Self {
            stopwatch: Stopwatch::new(),
            final_time: None,
        }
    }

    /// Start (or restart) timing a fresh attempt
    pub fn start(&mut self) {
        self.stopwatch.reset();
        self.stopwatch.start();
        self.final_time = None;
    }

    /// Observe the session once per tick.
    ///
    /// Returns the completion time exactly once, on the tick the board
    /// first becomes full.
    pub fn observe(&mut self, session: &PuzzleSession) -> Option<f32> {
        if self.final_time.is_some() || !self.stopwatch.is_running() {
            return None;
        }
        if session.is_complete() {
            self.stopwatch.stop();
            let elapsed = self.stopwatch.elapsed_secs();
            self.final_time = Some(elapsed);
            return Some(elapsed);
        }
        None
    }

    /// Elapsed time so far, or the latched final time after completion
    pub fn elapsed_secs(&self) -> f32 {
        self.final_time.unwrap_or_else(|| self.stopwatch.elapsed_secs())
    }

    /// Whether a completion time has been latched
    pub fn is_finished(&self) -> bool {
        self.final_time.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes;
    use snap_engine::prelude::*;

    fn temp_csv(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("blockfit_{name}_{}.csv", std::process::id()));
        let _ = std::fs::remove_file(&path);
        path
    }

    #[test]
    fn test_record_writes_header_once() {
        let path = temp_csv("header");
        let log = CompletionLog::new(&path, "P01");
        log.record(2, 0.10, 12.34).unwrap();
        log.record(3, 0.25, 8.5).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "timestamp,participant,condition,snap_distance,time_seconds"
        );
        assert!(lines[1].ends_with(",P01,2,0.100,12.34"));
        assert!(lines[2].ends_with(",P01,3,0.250,8.50"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_record_rejects_out_of_range_condition() {
        let log = CompletionLog::new(temp_csv("range"), "P01");
        assert!(matches!(log.record(0, 0.1, 1.0), Err(StudyError::InvalidCondition(0))));
        assert!(matches!(log.record(5, 0.1, 1.0), Err(StudyError::InvalidCondition(5))));
    }

    #[test]
    fn test_timer_latches_completion_once() {
        let grid = GridSpace::lattice(Vec3::zeros(), 1.0, (2, 1, 2)).unwrap();
        let mut session = PuzzleSession::new(grid, SnapConfig::default()).unwrap();
        shapes::square().spawn(&mut session, Pose::identity()).unwrap();

        let mut timer = SessionTimer::new();
        timer.start();
        assert!(timer.observe(&session).is_none());

        session.tick();
        assert!(session.is_complete());
        let first = timer.observe(&session);
        assert!(first.is_some());
        assert!(timer.is_finished());

        // Further observations do not fire again
        session.tick();
        assert!(timer.observe(&session).is_none());
    }
}
