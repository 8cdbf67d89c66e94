//! Core domain types: integer 3-vectors, observed points, and trajectories

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Integer 3-vector used for positions and velocities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0, y: 0, z: 0 };

    pub fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// Sum of the three components (the reported puzzle scalar)
    pub fn component_sum(&self) -> i64 {
        self.x + self.y + self.z
    }

    /// Cross product in i128 so products of puzzle-scale coordinates cannot overflow
    pub fn cross_wide(&self, other: &Vec3) -> (i128, i128, i128) {
        let (ax, ay, az) = (self.x as i128, self.y as i128, self.z as i128);
        let (bx, by, bz) = (other.x as i128, other.y as i128, other.z as i128);
        (ay * bz - az * by, az * bx - ax * bz, ax * by - ay * bx)
    }

    /// Whether this vector is parallel to another (cross product vanishes)
    pub fn is_parallel_to(&self, other: &Vec3) -> bool {
        self.cross_wide(other) == (0, 0, 0)
    }

    pub fn to_f64(&self) -> Vector3<f64> {
        Vector3::new(self.x as f64, self.y as f64, self.z as f64)
    }

    pub fn components(&self) -> [i64; 3] {
        [self.x, self.y, self.z]
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.x, self.y, self.z)
    }
}

/// A moving point with known position at time zero and constant velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObservedPoint {
    pub position: Vec3,
    pub velocity: Vec3,
}

impl ObservedPoint {
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self { position, velocity }
    }

    /// Position along the motion line at time `t`
    pub fn position_at(&self, t: f64) -> Vector3<f64> {
        self.position.to_f64() + self.velocity.to_f64() * t
    }
}

impl fmt::Display for ObservedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.position, self.velocity)
    }
}

/// The solved unknown: the single trajectory intersecting every observed point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trajectory {
    pub position: Vec3,
    pub velocity: Vec3,
}

impl Trajectory {
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self { position, velocity }
    }

    /// The scalar the puzzle asks for: px + py + pz
    pub fn position_sum(&self) -> i64 {
        self.position.component_sum()
    }
}

impl fmt::Display for Trajectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.position, self.velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_sum() {
        assert_eq!(Vec3::new(24, 13, 10).component_sum(), 47);
        assert_eq!(Vec3::new(-1, 1, 0).component_sum(), 0);
    }

    #[test]
    fn test_cross_wide() {
        let x = Vec3::new(1, 0, 0);
        let y = Vec3::new(0, 1, 0);
        assert_eq!(x.cross_wide(&y), (0, 0, 1));
        assert_eq!(y.cross_wide(&x), (0, 0, -1));
    }

    #[test]
    fn test_cross_wide_no_overflow() {
        // Components near the scale of real puzzle inputs
        let a = Vec3::new(300_000_000_000_000, -250_000_000_000_000, 1);
        let b = Vec3::new(-7, 11, 200_000_000_000_000);
        let (cx, _, _) = a.cross_wide(&b);
        assert_eq!(
            cx,
            -250_000_000_000_000i128 * 200_000_000_000_000i128 - 11
        );
    }

    #[test]
    fn test_parallel_detection() {
        let v = Vec3::new(2, -4, 6);
        assert!(v.is_parallel_to(&Vec3::new(-1, 2, -3)));
        assert!(!v.is_parallel_to(&Vec3::new(1, 2, 3)));
    }

    #[test]
    fn test_position_at() {
        let point = ObservedPoint::new(Vec3::new(19, 13, 30), Vec3::new(-2, 1, -2));
        let at5 = point.position_at(5.0);
        assert_eq!(at5, Vector3::new(9.0, 18.0, 20.0));
    }

    #[test]
    fn test_display_round_format() {
        let point = ObservedPoint::new(Vec3::new(19, 13, 30), Vec3::new(-2, 1, -2));
        assert_eq!(point.to_string(), "19, 13, 30 @ -2, 1, -2");
    }
}
