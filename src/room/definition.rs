//! Room texture definitions: named macros assigning textures to a room's faces.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::texture::Texture;

/// Name of the definition that always exists.
pub const DEFAULT_DEFINITION: &str = "default";

/// One of the six faces of a room box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    Floor,
    Ceiling,
    WallNorth,
    WallEast,
    WallSouth,
    WallWest,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Floor,
        Face::Ceiling,
        Face::WallNorth,
        Face::WallEast,
        Face::WallSouth,
        Face::WallWest,
    ];

    pub const WALLS: [Face; 4] = [
        Face::WallNorth,
        Face::WallEast,
        Face::WallSouth,
        Face::WallWest,
    ];
}

/// How a texture covers a face.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextureAssignment {
    pub texture: Texture,
    /// Stretch once across the face horizontally instead of tiling.
    pub fit_x: bool,
    /// Stretch once across the face vertically instead of tiling.
    pub fit_y: bool,
    /// The face is not generated at all.
    pub is_removed: bool,
}

impl TextureAssignment {
    pub fn new(texture: Texture) -> Self {
        Self {
            texture,
            ..Self::default()
        }
    }

    pub fn removed() -> Self {
        Self {
            is_removed: true,
            ..Self::default()
        }
    }

    pub fn with_fit(mut self, fit_x: bool, fit_y: bool) -> Self {
        self.fit_x = fit_x;
        self.fit_y = fit_y;
        self
    }
}

/// Texture assignments for all six faces of a room.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoomTextureDefinition {
    pub floor: TextureAssignment,
    pub ceiling: TextureAssignment,
    pub wall_north: TextureAssignment,
    pub wall_east: TextureAssignment,
    pub wall_south: TextureAssignment,
    pub wall_west: TextureAssignment,
}

impl RoomTextureDefinition {
    pub fn face(&self, face: Face) -> &TextureAssignment {
        match face {
            Face::Floor => &self.floor,
            Face::Ceiling => &self.ceiling,
            Face::WallNorth => &self.wall_north,
            Face::WallEast => &self.wall_east,
            Face::WallSouth => &self.wall_south,
            Face::WallWest => &self.wall_west,
        }
    }

    pub fn face_mut(&mut self, face: Face) -> &mut TextureAssignment {
        match face {
            Face::Floor => &mut self.floor,
            Face::Ceiling => &mut self.ceiling,
            Face::WallNorth => &mut self.wall_north,
            Face::WallEast => &mut self.wall_east,
            Face::WallSouth => &mut self.wall_south,
            Face::WallWest => &mut self.wall_west,
        }
    }

    pub fn set(&mut self, face: Face, assignment: TextureAssignment) {
        *self.face_mut(face) = assignment;
    }

    /// Assign the same texture to all four walls.
    pub fn set_walls(&mut self, assignment: TextureAssignment) {
        for face in Face::WALLS {
            self.set(face, assignment.clone());
        }
    }

    /// Number of faces that will produce geometry.
    pub fn present_faces(&self) -> usize {
        Face::ALL
            .iter()
            .filter(|&&f| !self.face(f).is_removed)
            .count()
    }
}

/// Named definitions, seeded with `default`.
#[derive(Debug, Clone)]
pub struct DefinitionTable {
    definitions: HashMap<String, RoomTextureDefinition>,
}

impl DefinitionTable {
    pub fn new() -> Self {
        let mut definitions = HashMap::new();
        definitions.insert(
            DEFAULT_DEFINITION.to_string(),
            RoomTextureDefinition::default(),
        );
        Self { definitions }
    }

    pub fn get(&self, name: &str) -> Option<&RoomTextureDefinition> {
        self.definitions.get(name)
    }

    /// The `default` definition. Always present.
    pub fn default_definition(&self) -> RoomTextureDefinition {
        self.definitions
            .get(DEFAULT_DEFINITION)
            .cloned()
            .unwrap_or_default()
    }

    /// Insert or replace a definition.
    pub fn insert(&mut self, name: impl Into<String>, definition: RoomTextureDefinition) {
        self.definitions.insert(name.into(), definition);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for DefinitionTable {
    fn default() -> Self {
        Self::new()
    }
}
