//! Discrete grid addressing, occupancy storage, and nearest-cell lookup
//!
//! [`GridSpace`] is the leaf of the engine: a fixed set of valid integer
//! coordinates laid out on a world-space lattice, each carrying exactly one
//! occupancy flag. The valid set is immutable after construction; only the
//! flags change, and only through the session's commit/release path.

use crate::foundation::math::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fmt::Write as _;

/// Default nearest-cell acceptance radius as a fraction of the cell size
pub const DEFAULT_SEARCH_RADIUS_FACTOR: f32 = 0.6;

/// An integer grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    /// Column along the world X axis
    pub x: i32,
    /// Layer along the world Y axis
    pub y: i32,
    /// Row along the world Z axis
    pub z: i32,
}

impl GridCoord {
    /// Create a new grid coordinate
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The coordinate as a float vector (units of cells, not world units)
    #[allow(clippy::cast_precision_loss)]
    pub fn to_vec(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.x, self.y, self.z)
    }
}

/// Grid construction errors
#[derive(thiserror::Error, Debug)]
pub enum GridError {
    /// Cell size was zero, negative, or not finite
    #[error("cell size must be a positive finite number, got {0}")]
    InvalidCellSize(f32),

    /// The valid coordinate set was empty
    #[error("grid must contain at least one valid cell")]
    Empty,
}

/// Result of a nearest-valid-cell query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestCell {
    /// The nearest valid coordinate
    pub coord: GridCoord,
    /// World-space center of that cell
    pub center: Vec3,
    /// Distance from the query point to the cell center
    pub distance: f32,
}

/// A discrete grid: valid coordinate set, occupancy flags, and the
/// world-space lattice they live on.
pub struct GridSpace {
    origin: Vec3,
    cell_size: f32,
    search_radius: f32,
    /// Valid coordinates in insertion order; scanned linearly so that
    /// nearest-cell tie-breaks are deterministic.
    coords: Vec<GridCoord>,
    occupied: HashMap<GridCoord, bool>,
}

impl GridSpace {
    /// Create a grid from an explicit set of valid coordinates.
    ///
    /// Duplicate coordinates are collapsed; the first occurrence fixes the
    /// scan position. Fails if `cell_size` is not a positive finite number
    /// or if no coordinates are given.
    pub fn new(
        origin: Vec3,
        cell_size: f32,
        coords: impl IntoIterator<Item = GridCoord>,
    ) -> Result<Self, GridError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(GridError::InvalidCellSize(cell_size));
        }

        let mut ordered = Vec::new();
        let mut occupied = HashMap::new();
        for coord in coords {
            if occupied.insert(coord, false).is_none() {
                ordered.push(coord);
            }
        }
        if ordered.is_empty() {
            return Err(GridError::Empty);
        }

        Ok(Self {
            origin,
            cell_size,
            search_radius: cell_size * DEFAULT_SEARCH_RADIUS_FACTOR,
            coords: ordered,
            occupied,
        })
    }

    /// Create a solid box lattice of `nx * ny * nz` cells starting at the origin
    pub fn lattice(
        origin: Vec3,
        cell_size: f32,
        (nx, ny, nz): (u32, u32, u32),
    ) -> Result<Self, GridError> {
        let mut coords = Vec::with_capacity(nx as usize * ny as usize * nz as usize);
        for y in 0..ny {
            for z in 0..nz {
                for x in 0..nx {
                    #[allow(clippy::cast_possible_wrap)]
                    coords.push(GridCoord::new(x as i32, y as i32, z as i32));
                }
            }
        }
        Self::new(origin, cell_size, coords)
    }

    /// Create a grid from authored cell-center world positions.
    ///
    /// Each center is mapped onto the lattice by rounding; this mirrors how
    /// a scene full of authored cell markers is registered at startup.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_cell_centers(
        origin: Vec3,
        cell_size: f32,
        centers: &[Vec3],
    ) -> Result<Self, GridError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(GridError::InvalidCellSize(cell_size));
        }
        let coords = centers.iter().map(|center| {
            let local = (center - origin) / cell_size;
            GridCoord::new(
                local.x.round() as i32,
                local.y.round() as i32,
                local.z.round() as i32,
            )
        });
        Self::new(origin, cell_size, coords)
    }

    /// Override the nearest-cell acceptance radius as a fraction of cell size
    pub fn set_search_radius_factor(&mut self, factor: f32) {
        self.search_radius = self.cell_size * factor;
    }

    /// The world-space origin of the lattice
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// The edge length of one cell in world units
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// The current nearest-cell acceptance radius in world units
    pub fn search_radius(&self) -> f32 {
        self.search_radius
    }

    /// Map a world point to fractional grid coordinates (no rounding).
    ///
    /// Fractional values are meaningful during placement testing; use
    /// [`GridSpace::nearest_valid_cell`] to land on an actual cell.
    pub fn world_to_grid(&self, world: Vec3) -> Vec3 {
        (world - self.origin) / self.cell_size
    }

    /// World-space center of a grid coordinate
    pub fn grid_to_world(&self, coord: GridCoord) -> Vec3 {
        self.origin + coord.to_vec() * self.cell_size
    }

    /// Whether a coordinate belongs to the valid set
    pub fn contains(&self, coord: GridCoord) -> bool {
        self.occupied.contains_key(&coord)
    }

    /// Find the valid cell nearest to a world point, if any lies within the
    /// search radius.
    ///
    /// Linear scan over the valid set in insertion order; ties keep the
    /// first coordinate encountered. Callers must not rely on tie-break
    /// semantics beyond "some nearest cell within radius".
    pub fn nearest_valid_cell(&self, world: Vec3) -> Option<NearestCell> {
        let mut best: Option<NearestCell> = None;
        for &coord in &self.coords {
            let center = self.grid_to_world(coord);
            let distance = (world - center).magnitude();
            if best.map_or(true, |b| distance < b.distance) {
                best = Some(NearestCell {
                    coord,
                    center,
                    distance,
                });
            }
        }
        best.filter(|b| b.distance <= self.search_radius)
    }

    /// Whether a coordinate is currently occupied.
    ///
    /// Coordinates outside the valid set are never occupied.
    pub fn is_occupied(&self, coord: GridCoord) -> bool {
        self.occupied.get(&coord).copied().unwrap_or(false)
    }

    /// Set the occupancy flag of a coordinate.
    ///
    /// Silently ignores coordinates outside the valid set so that callers
    /// need not pre-validate.
    pub fn set_occupied(&mut self, coord: GridCoord, value: bool) {
        if let Some(flag) = self.occupied.get_mut(&coord) {
            *flag = value;
        }
    }

    /// Whether every valid coordinate is occupied
    pub fn is_full(&self) -> bool {
        self.coords.iter().all(|&coord| self.is_occupied(coord))
    }

    /// Number of valid coordinates
    pub fn cell_count(&self) -> usize {
        self.coords.len()
    }

    /// Number of occupied coordinates
    pub fn occupied_count(&self) -> usize {
        self.coords
            .iter()
            .filter(|&&coord| self.is_occupied(coord))
            .count()
    }

    /// Iterate over all valid coordinates in scan order
    pub fn coords(&self) -> impl Iterator<Item = GridCoord> + '_ {
        self.coords.iter().copied()
    }

    /// Render a layered occupancy dump for debugging.
    ///
    /// One section per Y layer, cells sorted by z then x, `1` for occupied.
    pub fn occupancy_report(&self, label: &str) -> String {
        let mut sorted = self.coords.clone();
        sorted.sort_by_key(|c| (c.y, c.z, c.x));

        let mut out = String::new();
        if !label.is_empty() {
            let _ = writeln!(out, "[grid] {label}");
        }
        let _ = writeln!(
            out,
            "cell_size={}, cells={}",
            self.cell_size,
            self.coords.len()
        );

        let mut current_layer: Option<i32> = None;
        for coord in &sorted {
            if current_layer != Some(coord.y) {
                current_layer = Some(coord.y);
                let _ = writeln!(out, "=== layer y={} ===", coord.y);
            }
            let flag = u8::from(self.is_occupied(*coord));
            let _ = writeln!(out, "({},{}): {}", coord.x, coord.z, flag);
        }

        let _ = writeln!(
            out,
            "filled: {}/{} | full: {}",
            self.occupied_count(),
            self.coords.len(),
            self.is_full()
        );
        out
    }
}
