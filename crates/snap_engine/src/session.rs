//! Per-tick puzzle session: shape registry, lifecycle, and occupancy commits
//!
//! [`PuzzleSession`] is the explicit context object that ties the grid, the
//! shapes, and the snap configuration together; there is no global
//! "current puzzle" singleton. One call to [`PuzzleSession::tick`] runs the
//! full resolve-and-commit pass over every shape, in stable registration
//! order, to completion. Because occupancy is shared mutable state, a shape
//! processed earlier can claim cells that make a later shape's placement
//! fail this tick; that shape simply retries next tick. Release-then-claim
//! for one shape is a single uninterrupted step, which preserves the
//! at-most-one-owner-per-cell invariant.
//!
//! Collaborators drive the session with per-shape grab signals and poses,
//! and observe state, previews, occupancy counts, and events.

use slotmap::SlotMap;

use crate::config::{ConfigError, SnapConfig};
use crate::events::{Event, EventArg, EventSystem, EventType};
use crate::foundation::math::{Pose, Vec3};
use crate::foundation::time::TickClock;
use crate::grid::GridSpace;
use crate::overlap::OverlapDetector;
use crate::placement::{self, PlacementCandidate};
use crate::shape::{Shape, ShapeError, ShapeKey, ShapeState};

/// A running puzzle: grid, shapes, tuning, and event delivery
pub struct PuzzleSession {
    grid: GridSpace,
    config: SnapConfig,
    detector: OverlapDetector,
    shapes: SlotMap<ShapeKey, Shape>,
    /// Registration order; defines the per-tick processing sequence
    order: Vec<ShapeKey>,
    events: EventSystem,
    clock: TickClock,
}

impl PuzzleSession {
    /// Create a session over a grid with the given tuning.
    ///
    /// Fails if the configuration carries non-positive tuning values.
    pub fn new(mut grid: GridSpace, config: SnapConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        grid.set_search_radius_factor(config.search_radius_factor);
        let detector = OverlapDetector::new(grid.cell_size(), config.overlap_factor);
        Ok(Self {
            grid,
            config,
            detector,
            shapes: SlotMap::with_key(),
            order: Vec::new(),
            events: EventSystem::new(),
            clock: TickClock::new(),
        })
    }

    /// Register a shape from authored local cell offsets
    pub fn add_shape(
        &mut self,
        name: impl Into<String>,
        cells: Vec<Vec3>,
        pose: Pose,
    ) -> Result<ShapeKey, ShapeError> {
        let shape = Shape::new(name, cells, pose)?;
        let key = self.shapes.insert(shape);
        self.order.push(key);
        Ok(key)
    }

    /// Update the externally reported grab signal for a shape.
    ///
    /// Unknown keys are ignored.
    pub fn set_grab(&mut self, key: ShapeKey, grabbed: bool) {
        if let Some(shape) = self.shapes.get_mut(key) {
            shape.grab_signal = grabbed;
        }
    }

    /// Update a shape's pose from the manipulation collaborator.
    ///
    /// Unknown keys are ignored.
    pub fn set_pose(&mut self, key: ShapeKey, pose: Pose) {
        if let Some(shape) = self.shapes.get_mut(key) {
            shape.set_pose(pose);
        }
    }

    /// Run one full simulation tick over all shapes, then dispatch events
    pub fn tick(&mut self) {
        let tick = self.clock.advance();
        self.events.update_tick(tick);

        let order = self.order.clone();
        for key in order {
            self.step_shape(key, tick);
        }

        self.events.dispatch();
    }

    /// The grid this session plays on
    pub fn grid(&self) -> &GridSpace {
        &self.grid
    }

    /// Whether every valid grid cell is occupied (the win condition)
    pub fn is_complete(&self) -> bool {
        self.grid.is_full()
    }

    /// Lifecycle state of a shape
    pub fn state(&self, key: ShapeKey) -> Option<ShapeState> {
        self.shapes.get(key).map(Shape::state)
    }

    /// Borrow a shape for inspection
    pub fn shape(&self, key: ShapeKey) -> Option<&Shape> {
        self.shapes.get(key)
    }

    /// Iterate over all shapes in registration order
    pub fn shapes(&self) -> impl Iterator<Item = (ShapeKey, &Shape)> + '_ {
        self.order
            .iter()
            .filter_map(move |&key| self.shapes.get(key).map(|shape| (key, shape)))
    }

    /// The placement candidate a shape produced on the most recent tick,
    /// for ghost-preview collaborators
    pub fn placement_preview(&self, key: ShapeKey) -> Option<&PlacementCandidate> {
        self.shapes.get(key).and_then(Shape::preview)
    }

    /// Mutable access to the event system for handler registration
    pub fn events_mut(&mut self) -> &mut EventSystem {
        &mut self.events
    }

    /// The current simulation tick number
    pub fn current_tick(&self) -> u64 {
        self.clock.current()
    }

    fn step_shape(&mut self, key: ShapeKey, tick: u64) {
        let Some(shape) = self.shapes.get(key) else {
            return;
        };
        let grabbed = shape.grab_signal;
        let was_grabbed = shape.was_grabbed;

        if grabbed {
            if !was_grabbed {
                // Grabbing always evicts the prior placement, before any
                // other state change this tick.
                self.release_ownership(key);
                self.events.send(
                    Event::new(EventType::ShapeGrabbed, tick).with_arg("shape", EventArg::Shape(key)),
                );
            }
            if let Some(shape) = self.shapes.get_mut(key) {
                shape.set_state(ShapeState::Held);
                shape.was_grabbed = true;
                shape.preview = None;
            }
            return;
        }

        if was_grabbed {
            self.events.send(
                Event::new(EventType::ShapeReleased, tick).with_arg("shape", EventArg::Shape(key)),
            );
        }

        // Overlap with any committed shape gates resolution entirely.
        let outcome = {
            let Some(shape) = self.shapes.get(key) else {
                return;
            };
            if self.overlaps_committed(key, shape) {
                None
            } else {
                Some(placement::resolve(&self.grid, shape, self.config.snap_distance))
            }
        };

        match outcome {
            Some(Ok(candidate)) => self.commit(key, candidate, tick),
            Some(Err(rejection)) => {
                if let Some(shape) = self.shapes.get(key) {
                    log::trace!("shape '{}' not placeable: {rejection:?}", shape.name());
                }
                self.demote(key);
            }
            None => {
                if let Some(shape) = self.shapes.get(key) {
                    log::trace!("shape '{}' overlaps a committed shape", shape.name());
                }
                self.demote(key);
            }
        }
    }

    /// Pairwise cell proximity against committed shapes, at actual poses
    fn overlaps_committed(&self, key: ShapeKey, shape: &Shape) -> bool {
        let own_cells = shape.world_cells();
        self.shapes.iter().any(|(other_key, other)| {
            other_key != key
                && other.state() == ShapeState::Snapped
                && self.detector.cells_overlap(&own_cells, &other.world_cells())
        })
    }

    /// A non-matching tick: the shape reverts to `Free`. Owned coordinates
    /// are deliberately not released here; only a grab or a successful
    /// commit elsewhere moves them.
    fn demote(&mut self, key: ShapeKey) {
        if let Some(shape) = self.shapes.get_mut(key) {
            shape.set_state(ShapeState::Free);
            shape.was_grabbed = false;
            shape.preview = None;
        }
    }

    /// Atomic release-then-claim commit of a resolved candidate
    fn commit(&mut self, key: ShapeKey, candidate: PlacementCandidate, tick: u64) {
        let targets = candidate.targets.clone();
        debug_assert!(
            {
                let mut sorted = targets.clone();
                sorted.sort_by_key(|c| (c.x, c.y, c.z));
                sorted.windows(2).all(|w| w[0] != w[1])
            },
            "authored cell spacing must keep targets unique"
        );

        let (old, was_snapped, name, delta_magnitude) = {
            let Some(shape) = self.shapes.get_mut(key) else {
                return;
            };
            let was_snapped = shape.state() == ShapeState::Snapped;
            let old = shape.take_owned();
            shape.apply_snap(candidate.delta, candidate.rotation);
            shape.set_owned(targets.clone());
            shape.set_state(ShapeState::Snapped);
            shape.was_grabbed = false;
            let name = shape.name().to_string();
            let delta_magnitude = candidate.delta.magnitude();
            shape.preview = Some(candidate);
            (old, was_snapped, name, delta_magnitude)
        };

        // Release old, claim new, with no other shape's read in between.
        for coord in old {
            self.grid.set_occupied(coord, false);
        }
        for &coord in &targets {
            self.grid.set_occupied(coord, true);
        }

        if !was_snapped {
            log::debug!("{}", self.grid.occupancy_report(&format!("after place: {name}")));
            self.events.send(
                Event::new(EventType::ShapeSnapped, tick)
                    .with_arg("shape", EventArg::Shape(key))
                    .with_arg("cells", EventArg::CellCount(targets.len()))
                    .with_arg("snap_delta", EventArg::SnapDelta(delta_magnitude)),
            );
            if self.grid.is_full() {
                self.events.send(
                    Event::new(EventType::PuzzleCompleted, tick)
                        .with_arg("cells", EventArg::CellCount(self.grid.cell_count())),
                );
            }
        }
    }

    /// Free every coordinate a shape owns
    fn release_ownership(&mut self, key: ShapeKey) {
        let Some(shape) = self.shapes.get_mut(key) else {
            return;
        };
        let old = shape.take_owned();
        if old.is_empty() {
            return;
        }
        let name = shape.name().to_string();
        for coord in old {
            self.grid.set_occupied(coord, false);
        }
        log::debug!("{}", self.grid.occupancy_report(&format!("after clear: {name}")));
    }
}
