//! Rooms: placed, textured box volumes and their lights.

pub mod builder;
pub mod definition;
pub mod light;
pub mod rooms;
pub mod texture;

use serde::{Deserialize, Serialize};

use crate::geometry::{BoundingBox, Polygon, Vec3};

pub use builder::RoomBuilder;
pub use definition::{DefinitionTable, Face, RoomTextureDefinition, TextureAssignment};
pub use light::{Light, LightModifier};
pub use rooms::Rooms;
pub use texture::{FsTextureProvider, Texture, TextureProvider};

/// A placed room. Its position never changes; the union pass may only remove
/// polygons from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    origin: Vec3,
    size: Vec3,
    bounds: BoundingBox,
    polygons: Vec<Polygon>,
    lights: Vec<Light>,
}

impl Room {
    pub fn new(origin: Vec3, size: Vec3, polygons: Vec<Polygon>) -> Self {
        let bounds = BoundingBox::new(
            Vec3::new(origin.x - size.x / 2.0, origin.y - size.y, origin.z - size.z / 2.0),
            Vec3::new(origin.x + size.x / 2.0, origin.y, origin.z + size.z / 2.0),
        );
        Self {
            origin,
            size,
            bounds,
            polygons,
            lights: Vec::new(),
        }
    }

    /// Center of the floor.
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn size(&self) -> Vec3 {
        self.size
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bounds
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Drop the polygons at the given indices. Indices may repeat.
    pub(crate) fn remove_polygons(&mut self, indices: &[usize]) -> usize {
        let mut doomed = vec![false; self.polygons.len()];
        for &i in indices {
            if let Some(slot) = doomed.get_mut(i) {
                *slot = true;
            }
        }
        let before = self.polygons.len();
        let mut idx = 0;
        self.polygons.retain(|_| {
            let keep = !doomed[idx];
            idx += 1;
            keep
        });
        before - self.polygons.len()
    }
}
