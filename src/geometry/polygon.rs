//! Textured quads: the unit of room geometry handed to the exporter.

use serde::{Deserialize, Serialize};

use super::{BoundingBox, Vec3};
use crate::room::texture::Texture;

/// A polygon corner with its texture coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Vec3,
    pub uv: (f64, f64),
}

impl Vertex {
    pub fn new(position: Vec3, u: f64, v: f64) -> Self {
        Self {
            position,
            uv: (u, v),
        }
    }
}

/// A textured quad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: [Vertex; 4],
    pub normal: Vec3,
    pub texture: Texture,
}

impl Polygon {
    pub fn new(vertices: [Vertex; 4], normal: Vec3, texture: Texture) -> Self {
        Self {
            vertices,
            normal,
            texture,
        }
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices.iter().map(|v| v.position)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let p = self.vertices[0].position;
        self.positions()
            .fold(BoundingBox::new(p, p), |bb, q| bb.union(&BoundingBox::new(q, q)))
    }

    /// All corners lie inside `bb` (with tolerance).
    pub fn is_within(&self, bb: &BoundingBox, epsilon: f64) -> bool {
        self.positions().all(|p| bb.contains_point(p, epsilon))
    }

    /// Geometric equality: every corner of `self` has a matching corner in
    /// `other`. Winding, normal, texture and UVs are ignored, so the two sides
    /// of a shared wall compare equal.
    pub fn coincides_with(&self, other: &Polygon, epsilon: f64) -> bool {
        self.positions()
            .all(|p| other.positions().any(|q| p.approx_eq(q, epsilon)))
            && other
                .positions()
                .all(|q| self.positions().any(|p| p.approx_eq(q, epsilon)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(corners: [Vec3; 4], normal: Vec3) -> Polygon {
        Polygon::new(
            corners.map(|p| Vertex::new(p, 0.0, 0.0)),
            normal,
            Texture::Missing,
        )
    }

    fn unit_wall() -> [Vec3; 4] {
        [
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(1.0, 0.0, 5.0),
            Vec3::new(1.0, -1.0, 5.0),
            Vec3::new(0.0, -1.0, 5.0),
        ]
    }

    #[test]
    fn opposite_winding_coincides() {
        let a = quad(unit_wall(), Vec3::new(0.0, 0.0, -1.0));
        let mut reversed = unit_wall();
        reversed.reverse();
        let b = quad(reversed, Vec3::new(0.0, 0.0, 1.0));
        assert!(a.coincides_with(&b, 1e-4));
        assert!(b.coincides_with(&a, 1e-4));
    }

    #[test]
    fn shifted_quad_does_not_coincide() {
        let a = quad(unit_wall(), Vec3::new(0.0, 0.0, -1.0));
        let b = quad(unit_wall().map(|p| p + Vec3::new(0.5, 0.0, 0.0)), Vec3::ZERO);
        assert!(!a.coincides_with(&b, 1e-4));
    }

    #[test]
    fn tolerance_absorbs_rounding() {
        let a = quad(unit_wall(), Vec3::ZERO);
        let b = quad(unit_wall().map(|p| p + Vec3::new(1e-6, 0.0, 0.0)), Vec3::ZERO);
        assert!(a.coincides_with(&b, 1e-4));
        assert!(!a.coincides_with(&b, 1e-9));
    }

    #[test]
    fn bounds_cover_corners() {
        let a = quad(unit_wall(), Vec3::ZERO);
        let bb = a.bounding_box();
        assert_eq!(bb.min, Vec3::new(0.0, -1.0, 5.0));
        assert_eq!(bb.max, Vec3::new(1.0, 0.0, 5.0));
    }
}
