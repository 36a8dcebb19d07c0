//! Compiler configuration: tiling, union tolerance and lighting defaults,
//! loaded from ~/.roomcraft/config.yaml.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::room::builder::DEFAULT_TILE_SIZE;
use crate::room::rooms::DEFAULT_UNION_EPSILON;

/// Compiler configuration. Every field falls back to its default when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileConfig {
    /// Largest sub-quad edge and the base UV repeat length.
    pub tile_size: f64,
    /// Tolerance for polygon equality during union.
    pub union_epsilon: f64,
    /// Run the union pass after all rooms are placed.
    pub stitch_rooms: bool,
    /// Intensity of a plain `with light`.
    pub light_intensity: f64,
    /// Multiplier applied by `with light dim`.
    pub dim_factor: f64,
    /// Light radius as a multiple of the room's larger horizontal extent.
    pub light_radius_scale: f64,
    /// Folder custom textures are resolved against. None = next to the DSL file.
    pub texture_root: Option<PathBuf>,
    /// Require custom texture files to exist.
    pub check_textures: bool,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            union_epsilon: DEFAULT_UNION_EPSILON,
            stitch_rooms: true,
            light_intensity: 1.0,
            dim_factor: 0.5,
            light_radius_scale: 1.0,
            texture_root: None,
            check_textures: true,
        }
    }
}

/// Default path for the config file.
pub fn default_config_path() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(".roomcraft");
    path.push("config.yaml");
    path
}

/// Load configuration from a YAML file. Returns defaults if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<CompileConfig, io::Error> {
    if !path.exists() {
        return Ok(CompileConfig::default());
    }
    let content = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Save configuration to a YAML file, creating parent directories as needed.
pub fn save_config(path: &Path, config: &CompileConfig) -> Result<(), io::Error> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let yaml = serde_yaml::to_string(config).map_err(io::Error::other)?;
    std::fs::write(path, yaml)
}
