//! YAML export of compiled rooms.
//!
//! The bundle is a flat, engine-neutral snapshot: positions, UVs, normals and
//! texture references per polygon, plus lights. Downstream tools convert it to
//! their own level format.

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::geometry::Polygon;
use crate::room::{Light, Room, Rooms};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonRecord {
    pub positions: [[f64; 3]; 4],
    pub uvs: [[f64; 2]; 4],
    pub normal: [f64; 3],
    pub texture: String,
}

impl From<&Polygon> for PolygonRecord {
    fn from(polygon: &Polygon) -> Self {
        let mut positions = [[0.0; 3]; 4];
        let mut uvs = [[0.0; 2]; 4];
        for (i, vertex) in polygon.vertices.iter().enumerate() {
            let p = vertex.position;
            positions[i] = [p.x, p.y, p.z];
            uvs[i] = [vertex.uv.0, vertex.uv.1];
        }
        let n = polygon.normal;
        Self {
            positions,
            uvs,
            normal: [n.x, n.y, n.z],
            texture: polygon.texture.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomBundle {
    /// Floor center.
    pub origin: [f64; 3],
    pub size: [f64; 3],
    pub polygons: Vec<PolygonRecord>,
    #[serde(default)]
    pub lights: Vec<Light>,
}

impl From<&Room> for RoomBundle {
    fn from(room: &Room) -> Self {
        let (o, s) = (room.origin(), room.size());
        Self {
            origin: [o.x, o.y, o.z],
            size: [s.x, s.y, s.z],
            polygons: room.polygons().iter().map(PolygonRecord::from).collect(),
            lights: room.lights().to_vec(),
        }
    }
}

/// Everything one compile produced.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LevelBundle {
    pub rooms: Vec<RoomBundle>,
    /// Distinct textures referenced by the exported polygons, sorted.
    pub textures: Vec<String>,
}

impl LevelBundle {
    pub fn from_rooms(rooms: &Rooms) -> Self {
        let rooms: Vec<RoomBundle> = rooms.iter().map(RoomBundle::from).collect();
        let mut textures: Vec<String> = rooms
            .iter()
            .flat_map(|r| r.polygons.iter().map(|p| p.texture.clone()))
            .collect();
        textures.sort();
        textures.dedup();
        Self { rooms, textures }
    }

    pub fn polygon_count(&self) -> usize {
        self.rooms.iter().map(|r| r.polygons.len()).sum()
    }
}

/// Serialize `rooms` as a YAML level bundle.
pub fn export_yaml(rooms: &Rooms) -> Result<String, io::Error> {
    serde_yaml::to_string(&LevelBundle::from_rooms(rooms)).map_err(io::Error::other)
}

/// Write `rooms` to `path` as YAML, creating parent directories as needed.
pub fn write_yaml(path: &Path, rooms: &Rooms) -> Result<(), io::Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let yaml = export_yaml(rooms)?;
    std::fs::write(path, yaml)
}

/// Read a bundle written by [`write_yaml`].
pub fn read_yaml(path: &Path) -> Result<LevelBundle, io::Error> {
    let content = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
