//! Room builder: turns extents and a texture definition into a closed box.
//!
//! The anchor of a room is the center of its floor. Each face is split into
//! equal sub-quads no larger than the tile size, laid out from the face's own
//! corner, so two flush faces of equal size produce identical quads.

use crate::geometry::{Polygon, Vec3, Vertex};

use super::definition::{Face, RoomTextureDefinition, TextureAssignment};
use super::Room;

/// Tile size used when no configuration is given.
pub const DEFAULT_TILE_SIZE: f64 = 100.0;

/// Most sub-quads a face may have along one direction. A room needing more
/// is rejected before any geometry is built.
pub const MAX_TILES_PER_AXIS: usize = 256;

const X: Vec3 = Vec3::new(1.0, 0.0, 0.0);
const Y: Vec3 = Vec3::new(0.0, 1.0, 0.0);
const Z: Vec3 = Vec3::new(0.0, 0.0, 1.0);

/// Builds room volumes with a fixed tile size.
#[derive(Debug, Clone, Copy)]
pub struct RoomBuilder {
    tile_size: f64,
}

impl RoomBuilder {
    pub fn new(tile_size: f64) -> Self {
        Self { tile_size }
    }

    /// Sub-quads per axis a room of extent `size` would be cut into.
    pub fn tile_counts(&self, size: Vec3) -> [usize; 3] {
        [
            segments(size.x, self.tile_size),
            segments(size.y, self.tile_size),
            segments(size.z, self.tile_size),
        ]
    }

    /// Build a room of extent `size` whose floor center sits at `origin`.
    pub fn build(&self, origin: Vec3, size: Vec3, definition: &RoomTextureDefinition) -> Room {
        let mut polygons = Vec::new();
        for face in Face::ALL {
            let assignment = definition.face(face);
            if assignment.is_removed {
                continue;
            }
            let layout = FaceLayout::for_face(face, origin, size);
            self.tile_face(&layout, assignment, &mut polygons);
        }
        Room::new(origin, size, polygons)
    }

    fn tile_face(&self, layout: &FaceLayout, assignment: &TextureAssignment, out: &mut Vec<Polygon>) {
        let segs_u = segments(layout.width, self.tile_size);
        let segs_v = segments(layout.height, self.tile_size);
        let repeat_u = if assignment.fit_x || self.tile_size <= 0.0 {
            layout.width
        } else {
            self.tile_size
        };
        let repeat_v = if assignment.fit_y || self.tile_size <= 0.0 {
            layout.height
        } else {
            self.tile_size
        };
        let flip = layout.u_dir.cross(layout.v_dir).dot(layout.normal) < 0.0;

        for i in 0..segs_u {
            let u0 = layout.width * i as f64 / segs_u as f64;
            let u1 = layout.width * (i + 1) as f64 / segs_u as f64;
            for j in 0..segs_v {
                let v0 = layout.height * j as f64 / segs_v as f64;
                let v1 = layout.height * (j + 1) as f64 / segs_v as f64;

                let corner = |u: f64, v: f64| {
                    Vertex::new(
                        layout.start + layout.u_dir * u + layout.v_dir * v,
                        u / repeat_u,
                        v / repeat_v,
                    )
                };
                let mut vertices = [corner(u0, v0), corner(u1, v0), corner(u1, v1), corner(u0, v1)];
                if flip {
                    vertices.reverse();
                }
                out.push(Polygon::new(
                    vertices,
                    layout.normal,
                    assignment.texture.clone(),
                ));
            }
        }
    }
}

impl Default for RoomBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_TILE_SIZE)
    }
}

/// Where a face starts, which way it spans, and which way it faces.
struct FaceLayout {
    start: Vec3,
    u_dir: Vec3,
    v_dir: Vec3,
    width: f64,
    height: f64,
    normal: Vec3,
}

impl FaceLayout {
    /// Normals point into the room. North is +z, east is +x, down is +y.
    fn for_face(face: Face, origin: Vec3, size: Vec3) -> Self {
        let x0 = origin.x - size.x / 2.0;
        let x1 = origin.x + size.x / 2.0;
        let z0 = origin.z - size.z / 2.0;
        let z1 = origin.z + size.z / 2.0;
        let floor = origin.y;
        let ceiling = origin.y - size.y;

        match face {
            Face::Floor => Self {
                start: Vec3::new(x0, floor, z0),
                u_dir: X,
                v_dir: Z,
                width: size.x,
                height: size.z,
                normal: -Y,
            },
            Face::Ceiling => Self {
                start: Vec3::new(x0, ceiling, z0),
                u_dir: X,
                v_dir: Z,
                width: size.x,
                height: size.z,
                normal: Y,
            },
            Face::WallNorth => Self {
                start: Vec3::new(x0, floor, z1),
                u_dir: X,
                v_dir: -Y,
                width: size.x,
                height: size.y,
                normal: -Z,
            },
            Face::WallSouth => Self {
                start: Vec3::new(x0, floor, z0),
                u_dir: X,
                v_dir: -Y,
                width: size.x,
                height: size.y,
                normal: Z,
            },
            Face::WallEast => Self {
                start: Vec3::new(x1, floor, z0),
                u_dir: Z,
                v_dir: -Y,
                width: size.z,
                height: size.y,
                normal: -X,
            },
            Face::WallWest => Self {
                start: Vec3::new(x0, floor, z0),
                u_dir: Z,
                v_dir: -Y,
                width: size.z,
                height: size.y,
                normal: X,
            },
        }
    }
}

/// Number of equal sub-quads needed so none exceeds `tile`.
fn segments(length: f64, tile: f64) -> usize {
    if tile <= 0.0 || !tile.is_finite() || length <= 0.0 {
        return 1;
    }
    ((length / tile - 1e-9).ceil() as usize).max(1)
}
