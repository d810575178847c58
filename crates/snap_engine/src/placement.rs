//! Placement resolution: deciding whether and where a shape can snap
//!
//! Given a shape's current world pose, the resolver quantizes its
//! orientation to right angles, picks the cell closest to any valid grid
//! cell as the anchor, derives one rigid translation from that anchor, and
//! validates every cell of the shape under that same translation. The
//! shape's internal geometry is never deformed: one delta moves the whole
//! body, which is what keeps snapped shapes exactly on the lattice.
//!
//! Every failure here is an ordinary per-tick outcome, not an error; the
//! caller simply tries again next tick.

use crate::foundation::math::{quantize_right_angles, Quat, Vec3};
use crate::grid::{GridCoord, GridSpace};
use crate::shape::Shape;

/// Ephemeral result of one successful resolution pass.
///
/// Valid for the tick it was computed on; the session re-resolves every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementCandidate {
    /// Rigid translation that aligns the whole shape with the grid
    pub delta: Vec3,

    /// The quantized orientation used for all geometry in this pass
    pub rotation: Quat,

    /// Target coordinate per cell, in authored cell order
    pub targets: Vec<GridCoord>,
}

/// Why a resolution pass produced no candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacementRejection {
    /// No cell of the shape has a valid grid cell within the search radius
    NoAnchor,

    /// Some cell, translated by the anchor delta, lands outside the grid
    OffGrid {
        /// Index of the offending cell in the shape's authored cell list
        cell_index: usize,
    },

    /// A target coordinate is already owned by a different shape
    CellOccupied(GridCoord),

    /// A candidate exists but the snap delta exceeds the commit threshold
    BeyondSnapDistance {
        /// Magnitude of the computed delta
        distance: f32,
        /// The configured snap threshold
        limit: f32,
    },
}

/// Resolve whether `shape` can snap onto `grid` from its current pose.
///
/// `snap_distance` is the final commit gate on the delta magnitude; it is
/// distinct from the grid's per-cell search radius. Occupancy is acceptable
/// when a target is free or already owned by this same shape, so a snapped
/// shape can be nudged and re-settle onto its own cells.
pub fn resolve(
    grid: &GridSpace,
    shape: &Shape,
    snap_distance: f32,
) -> Result<PlacementCandidate, PlacementRejection> {
    // All geometry in this pass uses the quantized orientation; the shape's
    // actual orientation is only replaced if the placement commits.
    let rotation = quantize_right_angles(&shape.pose().rotation);
    let hypothetical = shape.world_cells_with_rotation(&rotation);

    // Anchor: the cell whose hypothetical position sits closest to any
    // valid grid cell. Cells with nothing within radius are excluded.
    let mut anchor: Option<(Vec3, Vec3, f32)> = None;
    for world in &hypothetical {
        if let Some(near) = grid.nearest_valid_cell(*world) {
            let better = anchor.map_or(true, |(_, _, best)| near.distance < best);
            if better {
                anchor = Some((*world, near.center, near.distance));
            }
        }
    }
    let (anchor_world, anchor_center, _) = anchor.ok_or(PlacementRejection::NoAnchor)?;

    // One rigid translation for the whole shape, never per-cell.
    let delta = anchor_center - anchor_world;

    // Predict every cell's landing under the same delta and validate it.
    let mut targets = Vec::with_capacity(hypothetical.len());
    for (cell_index, world) in hypothetical.iter().enumerate() {
        let predicted = world + delta;
        let near = grid
            .nearest_valid_cell(predicted)
            .ok_or(PlacementRejection::OffGrid { cell_index })?;

        let acceptable = !grid.is_occupied(near.coord) || shape.owns(near.coord);
        if !acceptable {
            return Err(PlacementRejection::CellOccupied(near.coord));
        }
        targets.push(near.coord);
    }

    let distance = delta.magnitude();
    if distance > snap_distance {
        return Err(PlacementRejection::BeyondSnapDistance {
            distance,
            limit: snap_distance,
        });
    }

    Ok(PlacementCandidate {
        delta,
        rotation,
        targets,
    })
}
