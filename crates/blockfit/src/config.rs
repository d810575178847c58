//! Study configuration
//!
//! The puzzle doubles as a user-study rig: four conditions, each with a
//! different snap distance, and a per-participant results file.

use serde::{Deserialize, Serialize};
use snap_engine::config::Config;

/// Number of study conditions
pub const CONDITION_COUNT: u8 = 4;

/// Study setup: participant, conditions, and result recording
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyConfig {
    /// Unique participant identifier, e.g. "P01"
    pub participant_id: String,

    /// CSV file completion times are appended to
    pub results_file: String,

    /// Snap distance per condition, indexed by condition 1 to 4
    pub condition_snap_distances: [f32; CONDITION_COUNT as usize],

    /// Snap distance used before any condition is selected
    pub default_snap_distance: f32,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            participant_id: "P01".to_string(),
            results_file: "user_study_results.csv".to_string(),
            condition_snap_distances: [0.05, 0.10, 0.25, 0.40],
            default_snap_distance: 0.10,
        }
    }
}

impl StudyConfig {
    /// Snap distance for a condition index (1-based), if in range
    pub fn snap_distance_for(&self, condition: u8) -> Option<f32> {
        if (1..=CONDITION_COUNT).contains(&condition) {
            Some(self.condition_snap_distances[usize::from(condition - 1)])
        } else {
            None
        }
    }
}

impl Config for StudyConfig {}
