//! Gesture recognition for the sortable admin lists.
//!
//! The sensor turns raw pointer and keyboard events into at most one
//! [`DragOutcome::Dropped`] per gesture. A pointer drag only starts once the
//! pointer has travelled further than the activation distance, so plain clicks
//! on a row never reorder anything. The keyboard path gives the same
//! single-element move without a pointer: pick up with Space/Enter, move with
//! the arrow keys, drop with Space/Enter, cancel with Escape.

pub const DEFAULT_ACTIVATION_DISTANCE: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Enter,
    ArrowUp,
    ArrowDown,
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorEvent {
    PointerDown { index: usize, at: Point },
    /// `over` is the row under the pointer, `None` outside the list.
    PointerMove { at: Point, over: Option<usize> },
    PointerUp,
    /// Key pressed while the row at `index` has focus.
    KeyDown { index: usize, key: Key },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    Ignored,
    Started { index: usize },
    Over { index: Option<usize> },
    Dropped { from: usize, to: usize },
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragState {
    Idle,
    Pressed { index: usize, origin: Point },
    Dragging { index: usize, over: Option<usize> },
    KeyboardDragging { index: usize, over: usize },
}

#[derive(Debug, Clone)]
pub struct DragSensor {
    len: usize,
    activation_distance: f64,
    state: DragState,
}

impl DragSensor {
    pub fn new(len: usize) -> Self {
        Self::with_activation_distance(len, DEFAULT_ACTIVATION_DISTANCE)
    }

    pub fn with_activation_distance(len: usize, activation_distance: f64) -> Self {
        Self {
            len,
            activation_distance,
            state: DragState::Idle,
        }
    }

    /// Updates the number of rows after the list reloads. Any gesture in flight is dropped.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.state = DragState::Idle;
    }

    pub fn is_dragging(&self) -> bool {
        matches!(
            self.state,
            DragState::Dragging { .. } | DragState::KeyboardDragging { .. }
        )
    }

    fn target(&self, over: Option<usize>) -> Option<usize> {
        over.filter(|index| *index < self.len)
    }

    pub fn handle(&mut self, event: SensorEvent) -> DragOutcome {
        match (self.state, event) {
            (DragState::Idle, SensorEvent::PointerDown { index, at }) if index < self.len => {
                self.state = DragState::Pressed { index, origin: at };
                DragOutcome::Ignored
            }
            (DragState::Pressed { index, origin }, SensorEvent::PointerMove { at, over }) => {
                if origin.distance_to(&at) > self.activation_distance {
                    let over = self.target(over);
                    self.state = DragState::Dragging { index, over };
                    DragOutcome::Started { index }
                } else {
                    DragOutcome::Ignored
                }
            }
            (DragState::Pressed { .. }, SensorEvent::PointerUp) => {
                self.state = DragState::Idle;
                DragOutcome::Ignored
            }
            (DragState::Dragging { index, .. }, SensorEvent::PointerMove { over, .. }) => {
                let over = self.target(over);
                self.state = DragState::Dragging { index, over };
                DragOutcome::Over { index: over }
            }
            (DragState::Dragging { index, over }, SensorEvent::PointerUp) => {
                self.state = DragState::Idle;
                match over {
                    Some(to) => DragOutcome::Dropped { from: index, to },
                    None => DragOutcome::Cancelled,
                }
            }
            (DragState::Dragging { .. }, SensorEvent::KeyDown { key: Key::Escape, .. }) => {
                self.state = DragState::Idle;
                DragOutcome::Cancelled
            }
            (DragState::Idle, SensorEvent::KeyDown { index, key: Key::Space | Key::Enter })
                if index < self.len =>
            {
                self.state = DragState::KeyboardDragging { index, over: index };
                DragOutcome::Started { index }
            }
            (DragState::KeyboardDragging { index, over }, SensorEvent::KeyDown { key, .. }) => {
                match key {
                    Key::ArrowUp => {
                        let over = over.saturating_sub(1);
                        self.state = DragState::KeyboardDragging { index, over };
                        DragOutcome::Over { index: Some(over) }
                    }
                    Key::ArrowDown => {
                        let over = (over + 1).min(self.len.saturating_sub(1));
                        self.state = DragState::KeyboardDragging { index, over };
                        DragOutcome::Over { index: Some(over) }
                    }
                    Key::Space | Key::Enter => {
                        self.state = DragState::Idle;
                        DragOutcome::Dropped { from: index, to: over }
                    }
                    Key::Escape => {
                        self.state = DragState::Idle;
                        DragOutcome::Cancelled
                    }
                    Key::Other => DragOutcome::Ignored,
                }
            }
            _ => DragOutcome::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(index: usize) -> SensorEvent {
        SensorEvent::PointerDown {
            index,
            at: Point::new(0.0, 0.0),
        }
    }

    fn move_to(y: f64, over: Option<usize>) -> SensorEvent {
        SensorEvent::PointerMove {
            at: Point::new(0.0, y),
            over,
        }
    }

    #[test]
    fn test_pointer_drag_drops_on_target() {
        let mut sensor = DragSensor::new(3);
        assert_eq!(sensor.handle(down(2)), DragOutcome::Ignored);
        assert_eq!(sensor.handle(move_to(20.0, Some(1))), DragOutcome::Started { index: 2 });
        assert_eq!(sensor.handle(move_to(40.0, Some(0))), DragOutcome::Over { index: Some(0) });
        assert_eq!(
            sensor.handle(SensorEvent::PointerUp),
            DragOutcome::Dropped { from: 2, to: 0 }
        );
        assert!(!sensor.is_dragging());
    }

    #[test]
    fn test_small_movement_does_not_activate() {
        let mut sensor = DragSensor::new(3);
        sensor.handle(down(0));
        assert_eq!(sensor.handle(move_to(8.0, Some(1))), DragOutcome::Ignored);
        assert_eq!(sensor.handle(SensorEvent::PointerUp), DragOutcome::Ignored);
        assert!(!sensor.is_dragging());
    }

    #[test]
    fn test_release_outside_list_cancels() {
        let mut sensor = DragSensor::new(3);
        sensor.handle(down(0));
        sensor.handle(move_to(30.0, Some(1)));
        sensor.handle(move_to(500.0, None));
        assert_eq!(sensor.handle(SensorEvent::PointerUp), DragOutcome::Cancelled);
    }

    #[test]
    fn test_target_past_end_of_list_is_not_valid() {
        let mut sensor = DragSensor::new(3);
        sensor.handle(down(0));
        sensor.handle(move_to(30.0, Some(7)));
        assert_eq!(sensor.handle(SensorEvent::PointerUp), DragOutcome::Cancelled);
    }

    #[test]
    fn test_keyboard_move() {
        let mut sensor = DragSensor::new(3);
        let key = |key| SensorEvent::KeyDown { index: 0, key };

        assert_eq!(sensor.handle(key(Key::Space)), DragOutcome::Started { index: 0 });
        assert_eq!(sensor.handle(key(Key::ArrowDown)), DragOutcome::Over { index: Some(1) });
        assert_eq!(sensor.handle(key(Key::ArrowDown)), DragOutcome::Over { index: Some(2) });
        assert_eq!(sensor.handle(key(Key::ArrowDown)), DragOutcome::Over { index: Some(2) });
        assert_eq!(sensor.handle(key(Key::Enter)), DragOutcome::Dropped { from: 0, to: 2 });
    }

    #[test]
    fn test_keyboard_escape_cancels() {
        let mut sensor = DragSensor::new(3);
        let key = |key| SensorEvent::KeyDown { index: 1, key };

        sensor.handle(key(Key::Enter));
        sensor.handle(key(Key::ArrowUp));
        assert_eq!(sensor.handle(key(Key::Escape)), DragOutcome::Cancelled);
        assert!(!sensor.is_dragging());
    }

    #[test]
    fn test_events_for_missing_rows_are_ignored() {
        let mut sensor = DragSensor::new(0);
        assert_eq!(sensor.handle(down(0)), DragOutcome::Ignored);
        assert_eq!(
            sensor.handle(SensorEvent::KeyDown { index: 0, key: Key::Space }),
            DragOutcome::Ignored
        );
    }
}
