//! Geometry primitives: vectors, axis-aligned boxes, and textured quads.
//!
//! The vertical axis increases downward: a room's floor sits at a larger `y`
//! than its ceiling.

pub mod polygon;

use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

pub use polygon::{Polygon, Vertex};

/// A 3D vector / point in level units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn scale(self, s: f64) -> Vec3 {
        Vec3::new(self.x * s, self.y * s, self.z * s)
    }

    pub fn dot(self, other: Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Component-wise approximate equality.
    pub fn approx_eq(self, other: Vec3, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.z - other.z).abs() <= epsilon
    }

    pub fn min(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    pub fn max(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f64) -> Vec3 {
        self.scale(s)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Overlap test. Boxes that merely touch within `epsilon` count as intersecting,
    /// so flush rooms are compared.
    pub fn intersects(&self, other: &BoundingBox, epsilon: f64) -> bool {
        self.min.x <= other.max.x + epsilon
            && self.max.x >= other.min.x - epsilon
            && self.min.y <= other.max.y + epsilon
            && self.max.y >= other.min.y - epsilon
            && self.min.z <= other.max.z + epsilon
            && self.max.z >= other.min.z - epsilon
    }

    pub fn contains_point(&self, p: Vec3, epsilon: f64) -> bool {
        p.x >= self.min.x - epsilon
            && p.x <= self.max.x + epsilon
            && p.y >= self.min.y - epsilon
            && p.y <= self.max.y + epsilon
            && p.z >= self.min.z - epsilon
            && p.z <= self.max.z + epsilon
    }
}
