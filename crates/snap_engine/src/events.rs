//! Event system for collaborator notification
//! Key principles:
//! - Key-value arguments (no order dependency)
//! - Handler returns bool (true = consumed, stops forwarding)
//! - Registration system (only notify interested handlers)
//! - Queuing support (immediate + tick-deferred delivery)
//!
//! The session emits a `ShapeSnapped` event on the false-to-true edge of a
//! shape's snapped state (the audio/haptic feedback hook) and
//! `PuzzleCompleted` when a commit fills the board (the win-condition hook).

use crate::shape::ShapeKey;
use std::collections::HashMap;

/// Event type identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// A shape entered manipulation; its prior placement was evicted
    ShapeGrabbed,
    /// The grab signal for a shape fell without an immediate snap
    ShapeReleased,
    /// A shape transitioned into the snapped state this tick
    ShapeSnapped,
    /// A commit filled every valid grid cell
    PuzzleCompleted,
}

/// Variant for type-safe event arguments
/// Uses key-value pairs to avoid order dependency problems
#[derive(Debug, Clone)]
pub enum EventArg {
    /// Shape registry handle
    Shape(ShapeKey),
    /// Number of grid cells involved
    CellCount(usize),
    /// Magnitude of the snap delta that committed
    SnapDelta(f32),
}

/// Event with type ID and key-value arguments
#[derive(Debug, Clone)]
pub struct Event {
    /// Type of event
    pub event_type: EventType,
    /// Simulation tick on which the event was emitted
    pub tick: u64,
    args: HashMap<&'static str, EventArg>,
}

impl Event {
    /// Create a new event with the given type and tick
    pub fn new(event_type: EventType, tick: u64) -> Self {
        Self {
            event_type,
            tick,
            args: HashMap::new(),
        }
    }

    /// Add an argument to the event (builder pattern)
    #[must_use]
    pub fn with_arg(mut self, key: &'static str, value: EventArg) -> Self {
        self.args.insert(key, value);
        self
    }

    /// Get an argument by key
    pub fn get_arg(&self, key: &str) -> Option<&EventArg> {
        self.args.get(key)
    }

    /// Get the shape argument if present
    pub fn get_shape(&self) -> Option<ShapeKey> {
        if let Some(EventArg::Shape(key)) = self.get_arg("shape") {
            Some(*key)
        } else {
            None
        }
    }

    /// Get the cell count argument if present
    pub fn get_cell_count(&self) -> Option<usize> {
        if let Some(EventArg::CellCount(count)) = self.get_arg("cells") {
            Some(*count)
        } else {
            None
        }
    }

    /// Get the snap delta argument if present
    pub fn get_snap_delta(&self) -> Option<f32> {
        if let Some(EventArg::SnapDelta(delta)) = self.get_arg("snap_delta") {
            Some(*delta)
        } else {
            None
        }
    }
}

/// Event handler trait
/// Returns true if event was consumed (stops forwarding)
/// Returns false to allow forwarding to other handlers
pub trait EventHandler {
    /// Handle an event, return true if consumed
    fn on_event(&mut self, event: &Event) -> bool;
}

/// Event system with registration and queuing
/// Follows chain of responsibility pattern
pub struct EventSystem {
    immediate_queue: Vec<Event>,
    deferred_queue: Vec<(u64, Event)>,
    handlers: HashMap<EventType, Vec<Box<dyn EventHandler>>>,
    current_tick: u64,
}

impl EventSystem {
    /// Create a new empty event system
    pub fn new() -> Self {
        Self {
            immediate_queue: Vec::new(),
            deferred_queue: Vec::new(),
            handlers: HashMap::new(),
            current_tick: 0,
        }
    }

    /// Update the current simulation tick
    pub fn update_tick(&mut self, tick: u64) {
        self.current_tick = tick;
    }

    /// Register a handler for a specific event type
    /// Only handlers registered for this type will be notified
    pub fn register_handler(&mut self, event_type: EventType, handler: Box<dyn EventHandler>) {
        self.handlers.entry(event_type).or_default().push(handler);
    }

    /// Send event for immediate handling this tick
    pub fn send(&mut self, event: Event) {
        self.immediate_queue.push(event);
    }

    /// Post event for deferred delivery at the specified tick
    pub fn post(&mut self, delivery_tick: u64, event: Event) {
        self.deferred_queue.push((delivery_tick, event));
    }

    /// Dispatch all pending events
    /// Processes the immediate queue first, then due deferred events
    pub fn dispatch(&mut self) {
        let immediate = std::mem::take(&mut self.immediate_queue);
        for event in immediate {
            self.dispatch_event(&event);
        }

        let mut i = 0;
        while i < self.deferred_queue.len() {
            if self.deferred_queue[i].0 <= self.current_tick {
                let (_, event) = self.deferred_queue.remove(i);
                self.dispatch_event(&event);
            } else {
                i += 1;
            }
        }
    }

    /// Dispatch single event to registered handlers
    /// Stops on first handler that returns true (consumed)
    fn dispatch_event(&mut self, event: &Event) {
        if let Some(handlers) = self.handlers.get_mut(&event.event_type) {
            for handler in handlers.iter_mut() {
                if handler.on_event(event) {
                    // Event consumed, stop forwarding
                    break;
                }
            }
        }
    }
}

impl Default for EventSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct RecordingHandler {
        seen: Rc<RefCell<Vec<EventType>>>,
        consume: bool,
    }

    impl EventHandler for RecordingHandler {
        fn on_event(&mut self, event: &Event) -> bool {
            self.seen.borrow_mut().push(event.event_type);
            self.consume
        }
    }

    #[test]
    fn test_immediate_dispatch_reaches_registered_handler() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut system = EventSystem::new();
        system.register_handler(
            EventType::ShapeSnapped,
            Box::new(RecordingHandler {
                seen: Rc::clone(&seen),
                consume: false,
            }),
        );

        system.send(Event::new(EventType::ShapeSnapped, 3).with_arg("cells", EventArg::CellCount(2)));
        system.dispatch();

        assert_eq!(*seen.borrow(), vec![EventType::ShapeSnapped]);
    }

    #[test]
    fn test_unregistered_type_is_ignored() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut system = EventSystem::new();
        system.register_handler(
            EventType::PuzzleCompleted,
            Box::new(RecordingHandler {
                seen: Rc::clone(&seen),
                consume: false,
            }),
        );

        system.send(Event::new(EventType::ShapeGrabbed, 1));
        system.dispatch();

        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_deferred_dispatch_waits_for_tick() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut system = EventSystem::new();
        system.register_handler(
            EventType::PuzzleCompleted,
            Box::new(RecordingHandler {
                seen: Rc::clone(&seen),
                consume: false,
            }),
        );

        system.post(5, Event::new(EventType::PuzzleCompleted, 5));
        system.update_tick(4);
        system.dispatch();
        assert!(seen.borrow().is_empty());

        system.update_tick(5);
        system.dispatch();
        assert_eq!(*seen.borrow(), vec![EventType::PuzzleCompleted]);
    }

    #[test]
    fn test_consumed_event_stops_forwarding() {
        let first = Rc::new(RefCell::new(Vec::new()));
        let second = Rc::new(RefCell::new(Vec::new()));
        let mut system = EventSystem::new();
        system.register_handler(
            EventType::ShapeSnapped,
            Box::new(RecordingHandler {
                seen: Rc::clone(&first),
                consume: true,
            }),
        );
        system.register_handler(
            EventType::ShapeSnapped,
            Box::new(RecordingHandler {
                seen: Rc::clone(&second),
                consume: false,
            }),
        );

        system.send(Event::new(EventType::ShapeSnapped, 0));
        system.dispatch();

        assert_eq!(first.borrow().len(), 1);
        assert!(second.borrow().is_empty());
    }

    #[test]
    fn test_event_args_round_trip() {
        let event = Event::new(EventType::ShapeSnapped, 7)
            .with_arg("cells", EventArg::CellCount(4))
            .with_arg("snap_delta", EventArg::SnapDelta(0.05));
        assert_eq!(event.get_cell_count(), Some(4));
        assert_eq!(event.get_snap_delta(), Some(0.05));
        assert_eq!(event.get_shape(), None);
        assert_eq!(event.tick, 7);
    }
}
