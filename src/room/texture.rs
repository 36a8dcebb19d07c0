//! Texture handles and the provider that resolves them.
//!
//! The compiler never looks at pixel data. A [`Texture`] is an opaque handle that
//! gets copied onto every polygon it covers.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// An opaque texture reference.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Texture {
    /// Placeholder used by the `default` definition and as a fallback.
    #[default]
    Missing,
    /// A texture shipped with the game, referenced by name.
    Builtin { name: String },
    /// A project-supplied image file.
    Custom { folder: String, filename: String },
}

impl fmt::Display for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Texture::Missing => write!(f, "<missing>"),
            Texture::Builtin { name } => write!(f, "arx:{name}"),
            Texture::Custom { folder, filename } => write!(f, "custom:{folder}/{filename}"),
        }
    }
}

/// Resolves texture names from the DSL into handles.
///
/// Returning `None` means the texture could not be found; the caller reports
/// it and keeps the placeholder.
pub trait TextureProvider {
    fn builtin(&mut self, name: &str) -> Option<Texture>;
    fn custom(&mut self, folder: &str, filename: &str) -> Option<Texture>;
}

/// Provider backed by the filesystem: custom textures must exist under `root`.
#[derive(Debug, Clone)]
pub struct FsTextureProvider {
    root: PathBuf,
    check_files: bool,
}

impl FsTextureProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            check_files: true,
        }
    }

    /// Accept every custom texture without touching the disk.
    pub fn unchecked(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            check_files: false,
        }
    }

    fn resolve(&self, folder: &str, filename: &str) -> PathBuf {
        self.root.join(folder).join(filename)
    }
}

impl TextureProvider for FsTextureProvider {
    fn builtin(&mut self, name: &str) -> Option<Texture> {
        if name.is_empty() {
            return None;
        }
        Some(Texture::Builtin {
            name: name.to_string(),
        })
    }

    fn custom(&mut self, folder: &str, filename: &str) -> Option<Texture> {
        if filename.is_empty() {
            return None;
        }
        if self.check_files && !self.resolve(folder, filename).is_file() {
            return None;
        }
        Some(Texture::Custom {
            folder: folder.to_string(),
            filename: filename.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_accepts_any_name() {
        let mut provider = FsTextureProvider::new(".");
        assert_eq!(
            provider.builtin("stone-wall"),
            Some(Texture::Builtin {
                name: "stone-wall".into()
            })
        );
        assert_eq!(provider.builtin(""), None);
    }

    #[test]
    fn custom_requires_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("textures")).unwrap();
        std::fs::write(dir.path().join("textures").join("brick.jpg"), b"jpg").unwrap();

        let mut provider = FsTextureProvider::new(dir.path());
        assert!(provider.custom("textures", "brick.jpg").is_some());
        assert!(provider.custom("textures", "marble.jpg").is_none());
    }

    #[test]
    fn unchecked_skips_disk() {
        let mut provider = FsTextureProvider::unchecked("/nonexistent");
        assert_eq!(
            provider.custom("a", "b.png"),
            Some(Texture::Custom {
                folder: "a".into(),
                filename: "b.png".into()
            })
        );
    }

    #[test]
    fn display_names() {
        assert_eq!(Texture::Missing.to_string(), "<missing>");
        assert_eq!(
            Texture::Custom {
                folder: "f".into(),
                filename: "x.bmp".into()
            }
            .to_string(),
            "custom:f/x.bmp"
        );
    }
}
