//! Rigid puzzle shapes and their grid ownership
//!
//! A [`Shape`] is a rigid body made of fixed local cell offsets. Its pose is
//! driven externally by a manipulation collaborator; the coordinates it owns
//! on the grid are mutated only by the session's commit/release path, so a
//! shape always owns either none or exactly one coordinate per cell.

use crate::foundation::math::{Pose, Quat, Vec3};
use crate::grid::GridCoord;
use crate::placement::PlacementCandidate;

slotmap::new_key_type! {
    /// Stable handle to a shape in a session's registry
    pub struct ShapeKey;
}

/// Shape construction errors
#[derive(thiserror::Error, Debug)]
pub enum ShapeError {
    /// A shape must be authored with at least one cell
    #[error("shape '{0}' has no cells")]
    NoCells(String),
}

/// Lifecycle state of a shape, re-evaluated every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeState {
    /// The external grab signal reports active manipulation
    Held,

    /// Released with no current valid placement; rendered at its raw pose
    Free,

    /// Committed to the grid: owns a non-empty coordinate set and its pose
    /// is exactly the snapped pose
    Snapped,
}

/// A rigid multi-cell shape tracked by a [`crate::session::PuzzleSession`]
#[derive(Debug)]
pub struct Shape {
    name: String,
    pose: Pose,
    cells: Vec<Vec3>,
    owned: Vec<GridCoord>,
    state: ShapeState,
    pub(crate) grab_signal: bool,
    pub(crate) was_grabbed: bool,
    pub(crate) preview: Option<PlacementCandidate>,
}

impl Shape {
    /// Create a shape from authored local cell offsets.
    ///
    /// Offsets are in shape-local space, pre-rotation, and are expected to
    /// be spaced one grid cell apart.
    pub fn new(
        name: impl Into<String>,
        cells: Vec<Vec3>,
        pose: Pose,
    ) -> Result<Self, ShapeError> {
        let name = name.into();
        if cells.is_empty() {
            return Err(ShapeError::NoCells(name));
        }
        Ok(Self {
            name,
            pose,
            cells,
            owned: Vec::new(),
            state: ShapeState::Free,
            grab_signal: false,
            was_grabbed: false,
            preview: None,
        })
    }

    /// Display name of the shape
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current world pose. While `Snapped` this is exactly the committed pose.
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Local cell offsets, immutable for the shape's lifetime
    pub fn cells(&self) -> &[Vec3] {
        &self.cells
    }

    /// Current lifecycle state
    pub fn state(&self) -> ShapeState {
        self.state
    }

    /// Grid coordinates currently owned by this shape (empty unless committed)
    pub fn owned_coords(&self) -> &[GridCoord] {
        &self.owned
    }

    /// Whether this shape currently owns the given coordinate
    pub fn owns(&self, coord: GridCoord) -> bool {
        self.owned.contains(&coord)
    }

    /// The placement candidate computed on the most recent tick, if any.
    ///
    /// Ephemeral; intended for ghost-preview rendering collaborators.
    pub fn preview(&self) -> Option<&PlacementCandidate> {
        self.preview.as_ref()
    }

    /// World positions of all cells with the given rotation substituted for
    /// the pose's own. Used by the resolver to test the quantized orientation
    /// without committing it.
    pub fn world_cells_with_rotation(&self, rotation: &Quat) -> Vec<Vec3> {
        self.cells
            .iter()
            .map(|&offset| self.pose.position + rotation * offset)
            .collect()
    }

    /// World positions of all cells at the shape's actual pose
    pub fn world_cells(&self) -> Vec<Vec3> {
        self.cells
            .iter()
            .map(|&offset| self.pose.transform_offset(offset))
            .collect()
    }

    pub(crate) fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    pub(crate) fn set_state(&mut self, state: ShapeState) {
        self.state = state;
    }

    pub(crate) fn apply_snap(&mut self, delta: Vec3, rotation: Quat) {
        self.pose.position += delta;
        self.pose.rotation = rotation;
    }

    pub(crate) fn take_owned(&mut self) -> Vec<GridCoord> {
        std::mem::take(&mut self.owned)
    }

    pub(crate) fn set_owned(&mut self, coords: Vec<GridCoord>) {
        self.owned = coords;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_cell_shape_is_rejected() {
        let err = Shape::new("empty", vec![], Pose::identity()).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_new_shape_owns_nothing() {
        let shape = Shape::new(
            "domino",
            vec![Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0)],
            Pose::identity(),
        )
        .unwrap();
        assert_eq!(shape.state(), ShapeState::Free);
        assert!(shape.owned_coords().is_empty());
        assert!(shape.preview().is_none());
    }

    #[test]
    fn test_world_cells_follow_pose() {
        let shape = Shape::new(
            "domino",
            vec![Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0)],
            Pose::from_position(Vec3::new(0.0, 2.0, 0.0)),
        )
        .unwrap();
        let cells = shape.world_cells();
        assert_relative_eq!(cells[0].y, 2.0);
        assert_relative_eq!(cells[1].x, 1.0);
        assert_relative_eq!(cells[1].y, 2.0);
    }

    #[test]
    fn test_world_cells_with_substituted_rotation() {
        let shape = Shape::new(
            "domino",
            vec![Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0)],
            Pose::identity(),
        )
        .unwrap();
        let quarter = Quat::from_euler_angles(0.0, 90.0_f32.to_radians(), 0.0);
        let cells = shape.world_cells_with_rotation(&quarter);
        // +X offset swings to -Z under a quarter turn about Y
        assert_relative_eq!(cells[1].x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(cells[1].z, -1.0, epsilon = 1e-5);
    }
}
