//! # Snap Engine
//!
//! A grid occupancy and placement resolution engine for spatial
//! assembly puzzles: rigid multi-cell shapes are manipulated in 3D space
//! and, when released near a discrete grid, validated and snapped into
//! unoccupied cells. The puzzle is solved when every cell is occupied.
//!
//! ## Features
//!
//! - **GridSpace**: discrete grid addressing, occupancy storage, nearest-cell lookup
//! - **PlacementResolver**: anchor selection, rigid snap delta, rotation quantization
//! - **OverlapDetector**: cell proximity test against committed shapes
//! - **PuzzleSession**: per-tick grab/free/snap lifecycle over a shape registry
//! - **Events**: snap and completion notifications for presentation collaborators
//!
//! ## Quick Start
//!
//! ```rust
//! use snap_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let grid = GridSpace::lattice(Vec3::zeros(), 1.0, (2, 1, 2))?;
//!     let mut session = PuzzleSession::new(grid, SnapConfig::default())?;
//!
//!     let key = session.add_shape(
//!         "domino",
//!         vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)],
//!         Pose::identity(),
//!     )?;
//!
//!     session.tick();
//!     assert_eq!(session.state(key), Some(ShapeState::Snapped));
//!     Ok(())
//! }
//! ```
//!
//! Rendering, audio, input devices, and UI are deliberately out of scope;
//! collaborators feed grab signals and poses in, and observe state,
//! previews, and events out.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod events;
pub mod foundation;
pub mod grid;
pub mod overlap;
pub mod placement;
pub mod session;
pub mod shape;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, SnapConfig},
        events::{Event, EventArg, EventHandler, EventSystem, EventType},
        foundation::math::{Pose, Quat, Vec3},
        grid::{GridCoord, GridError, GridSpace, NearestCell},
        overlap::OverlapDetector,
        placement::{PlacementCandidate, PlacementRejection},
        session::PuzzleSession,
        shape::{Shape, ShapeError, ShapeKey, ShapeState},
    };
}
