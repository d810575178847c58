//! Inter-shape overlap detection
//!
//! A shape that physically interpenetrates an already-committed shape may
//! never produce a placement candidate that tick, regardless of what the
//! resolver would say. The test is a pairwise cell-to-cell proximity scan
//! using squared distances; shape and board sizes are small (tens of cells,
//! single-digit shape counts), so the full O(n * m) scan per shape per tick
//! is acceptable and deliberately not built to scale past that.

use crate::foundation::math::Vec3;

/// Default overlap tolerance as a fraction of the cell size
pub const DEFAULT_OVERLAP_FACTOR: f32 = 0.08;

/// Pairwise proximity test between the cells of two shapes
#[derive(Debug, Clone, Copy)]
pub struct OverlapDetector {
    min_separation_sq: f32,
}

impl OverlapDetector {
    /// Create a detector for a grid with the given cell size.
    ///
    /// Two cells closer than `overlap_factor * cell_size` count as
    /// interpenetrating.
    pub fn new(cell_size: f32, overlap_factor: f32) -> Self {
        let min_separation = cell_size * overlap_factor;
        Self {
            min_separation_sq: min_separation * min_separation,
        }
    }

    /// Whether any cell of `a` sits too close to any cell of `b`
    pub fn cells_overlap(&self, a: &[Vec3], b: &[Vec3]) -> bool {
        a.iter().any(|ca| {
            b.iter()
                .any(|cb| (ca - cb).magnitude_squared() < self.min_separation_sq)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coincident_cells_overlap() {
        let detector = OverlapDetector::new(1.0, DEFAULT_OVERLAP_FACTOR);
        let a = [Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0)];
        let b = [Vec3::new(1.0, 0.0, 0.0)];
        assert!(detector.cells_overlap(&a, &b));
    }

    #[test]
    fn test_cells_just_inside_tolerance_overlap() {
        let detector = OverlapDetector::new(1.0, DEFAULT_OVERLAP_FACTOR);
        let a = [Vec3::zeros()];
        let b = [Vec3::new(0.079, 0.0, 0.0)];
        assert!(detector.cells_overlap(&a, &b));
    }

    #[test]
    fn test_cells_at_tolerance_do_not_overlap() {
        let detector = OverlapDetector::new(1.0, DEFAULT_OVERLAP_FACTOR);
        let a = [Vec3::zeros()];
        // Strict less-than: exactly at the separation is not an overlap
        let b = [Vec3::new(0.08, 0.0, 0.0)];
        assert!(!detector.cells_overlap(&a, &b));
    }

    #[test]
    fn test_adjacent_grid_cells_do_not_overlap() {
        let detector = OverlapDetector::new(1.0, DEFAULT_OVERLAP_FACTOR);
        let a = [Vec3::zeros()];
        let b = [Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)];
        assert!(!detector.cells_overlap(&a, &b));
    }

    #[test]
    fn test_tolerance_scales_with_cell_size() {
        let detector = OverlapDetector::new(0.5, DEFAULT_OVERLAP_FACTOR);
        let a = [Vec3::zeros()];
        assert!(detector.cells_overlap(&a, &[Vec3::new(0.039, 0.0, 0.0)]));
        assert!(!detector.cells_overlap(&a, &[Vec3::new(0.041, 0.0, 0.0)]));
    }
}
