//! Authored puzzle pieces
//!
//! A blueprint describes a rigid piece as integer lattice offsets, one per
//! cell, spaced one cell apart. Offsets are scaled by the grid's cell size
//! when the piece is spawned into a session.

use snap_engine::prelude::*;

/// An authored piece: a name and its lattice offsets
#[derive(Debug, Clone)]
pub struct ShapeBlueprint {
    /// Display name of the piece
    pub name: &'static str,

    /// Cell offsets on the unit lattice
    pub offsets: Vec<(i32, i32, i32)>,
}

impl ShapeBlueprint {
    /// Local cell offsets in world units for a grid with the given cell size
    #[allow(clippy::cast_precision_loss)]
    pub fn cells(&self, cell_size: f32) -> Vec<Vec3> {
        self.offsets
            .iter()
            .map(|&(x, y, z)| Vec3::new(x as f32, y as f32, z as f32) * cell_size)
            .collect()
    }

    /// Number of cells in the piece
    pub fn cell_count(&self) -> usize {
        self.offsets.len()
    }

    /// Spawn this piece into a session at the given pose
    pub fn spawn(&self, session: &mut PuzzleSession, pose: Pose) -> Result<ShapeKey, ShapeError> {
        let cell_size = session.grid().cell_size();
        session.add_shape(self.name, self.cells(cell_size), pose)
    }
}

/// Single cell
pub fn monomino() -> ShapeBlueprint {
    ShapeBlueprint {
        name: "monomino",
        offsets: vec![(0, 0, 0)],
    }
}

/// Two cells in a row
pub fn domino() -> ShapeBlueprint {
    ShapeBlueprint {
        name: "domino",
        offsets: vec![(0, 0, 0), (1, 0, 0)],
    }
}

/// Three cells in a row
pub fn bar3() -> ShapeBlueprint {
    ShapeBlueprint {
        name: "bar3",
        offsets: vec![(0, 0, 0), (1, 0, 0), (2, 0, 0)],
    }
}

/// Two-by-two flat square
pub fn square() -> ShapeBlueprint {
    ShapeBlueprint {
        name: "square",
        offsets: vec![(0, 0, 0), (1, 0, 0), (0, 0, 1), (1, 0, 1)],
    }
}

/// L-shaped tromino in the ground plane
pub fn l_tromino() -> ShapeBlueprint {
    ShapeBlueprint {
        name: "l-tromino",
        offsets: vec![(0, 0, 0), (1, 0, 0), (0, 0, 1)],
    }
}

/// T-shaped tetromino in the ground plane
pub fn t_tetromino() -> ShapeBlueprint {
    ShapeBlueprint {
        name: "t-tetromino",
        offsets: vec![(0, 0, 0), (1, 0, 0), (2, 0, 0), (1, 0, 1)],
    }
}
