//! # Localisation module
//!
//! This module provides the pose type used by the control system. The pose is
//! a belief about the agent's position, it is only ever written from received
//! pose telemetry.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::agent::PoseTm;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The pose (2D position and heading) of the agent in the world frame.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, Default)]
pub struct Pose {
    /// The position in the world frame
    pub position_m: Vector2<f64>,

    /// The heading (angle to the world frame +ve X axis) of the agent.
    ///
    /// The heading is carried through composition and telemetry but plays no
    /// part in any control decision.
    pub heading_rad: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose {
    pub fn new(x_m: f64, y_m: f64, heading_rad: f64) -> Self {
        Self {
            position_m: Vector2::new(x_m, y_m),
            heading_rad,
        }
    }

    /// Return true if `self` and `other` are at the same position, to within
    /// `tol_m` on each axis independently.
    ///
    /// The comparison is non-strict, a difference of exactly `tol_m` counts
    /// as being at the same position. Heading is excluded.
    pub fn is_at(&self, other: &Pose, tol_m: f64) -> bool {
        (self.position_m[0] - other.position_m[0]).abs() <= tol_m
            && (self.position_m[1] - other.position_m[1]).abs() <= tol_m
    }

    /// Return a new pose displaced from `self` by the given offset.
    ///
    /// The heading of the new pose is carried over from `self`, the offset
    /// contributes position only. Neither operand is modified.
    pub fn offset_by(&self, offset_m: Vector2<f64>) -> Self {
        Self {
            position_m: self.position_m + offset_m,
            heading_rad: self.heading_rad,
        }
    }
}

impl From<PoseTm> for Pose {
    fn from(tm: PoseTm) -> Self {
        Self::new(tm.x_m, tm.y_m, tm.heading_rad)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_is_at() {
        let origin = Pose::new(0.0, 0.0, 0.0);

        assert!(origin.is_at(&Pose::new(0.05, -0.05, 0.0), 0.1));

        // The comparison is non-strict, exactly the tolerance counts as at
        assert!(origin.is_at(&Pose::new(0.1, 0.1, 0.0), 0.1));

        // Exceeding the tolerance on either axis alone is enough to differ
        assert!(!origin.is_at(&Pose::new(0.2, 0.0, 0.0), 0.1));
        assert!(!origin.is_at(&Pose::new(0.0, 0.2, 0.0), 0.1));

        // Heading plays no part in the comparison
        assert!(origin.is_at(&Pose::new(0.0, 0.0, 3.0), 0.1));
    }

    #[test]
    fn test_offset_by() {
        let pose = Pose::new(1.0, 2.0, 0.5);
        let new_pose = pose.offset_by(Vector2::new(0.5, 0.0));

        assert_relative_eq!(new_pose.position_m[0], 1.5);
        assert_relative_eq!(new_pose.position_m[1], 2.0);
        assert_relative_eq!(new_pose.heading_rad, 0.5);

        // The original pose is untouched
        assert_relative_eq!(pose.position_m[0], 1.0);
        assert_relative_eq!(pose.position_m[1], 2.0);
    }
}
