//! Mission waypoint queue

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use std::collections::VecDeque;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The ordered sequence of relative waypoint offsets the agent must visit.
///
/// The mission is strictly first-in-first-out: offsets are consumed from the
/// front in the order they were loaded, with no reordering or deduplication.
#[derive(Debug, Default, Clone)]
pub struct Mission {
    offsets_m: VecDeque<Vector2<f64>>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur when operating on a mission.
#[derive(Debug, thiserror::Error)]
pub enum MissionError {
    /// All waypoints have been consumed. The caller decides whether this is
    /// the end of the mission or a fault.
    #[error("Attempted to take a waypoint from an exhausted mission")]
    Empty,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Mission {
    /// Build a mission from a list of `[x, y]` offsets, preserving order.
    pub fn from_offsets(offsets_m: &[[f64; 2]]) -> Self {
        let mut mission = Self::default();

        for offset_m in offsets_m {
            mission.enqueue(Vector2::new(offset_m[0], offset_m[1]));
        }

        mission
    }

    /// Append an offset to the back of the mission.
    pub fn enqueue(&mut self, offset_m: Vector2<f64>) {
        self.offsets_m.push_back(offset_m);
    }

    /// Remove and return the offset at the front of the mission.
    pub fn dequeue(&mut self) -> Result<Vector2<f64>, MissionError> {
        self.offsets_m.pop_front().ok_or(MissionError::Empty)
    }

    /// Return true if no waypoints remain.
    pub fn is_empty(&self) -> bool {
        self.offsets_m.is_empty()
    }

    /// Get the number of waypoints remaining.
    pub fn len(&self) -> usize {
        self.offsets_m.len()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut mission =
            Mission::from_offsets(&[[0.0, 0.5], [0.5, 0.0], [0.0, 1.0]]);

        assert_eq!(mission.len(), 3);

        // Offsets come back in the order they were loaded
        assert_eq!(mission.dequeue().unwrap(), Vector2::new(0.0, 0.5));
        assert_eq!(mission.dequeue().unwrap(), Vector2::new(0.5, 0.0));
        assert_eq!(mission.dequeue().unwrap(), Vector2::new(0.0, 1.0));

        // A further dequeue fails as the mission is exhausted
        assert!(mission.is_empty());
        assert!(matches!(mission.dequeue(), Err(MissionError::Empty)));
    }

    #[test]
    fn test_enqueue_appends() {
        let mut mission = Mission::from_offsets(&[[0.0, 0.5]]);
        mission.enqueue(Vector2::new(1.0, 0.0));

        assert_eq!(mission.dequeue().unwrap(), Vector2::new(0.0, 0.5));
        assert_eq!(mission.dequeue().unwrap(), Vector2::new(1.0, 0.0));
    }
}
