//! Compile session. Holds everything one compile owns besides the parse
//! state: configuration, the texture provider, the set of textures actually
//! used, and the diagnostics log.
//!
//! Nothing here is global, so independent compiles can run side by side.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::CompileConfig;
use crate::room::{FsTextureProvider, Texture, TextureProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// A fallback was applied; output is still complete.
    Warning,
    /// A statement was dropped.
    Error,
}

/// A non-fatal problem found while compiling, tagged with its source line.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub line: usize,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "line {}: {tag}: {}", self.line, self.message)
    }
}

/// Ordered log of diagnostics.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and forward it to `tracing`.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Warning => {
                tracing::warn!(line = diagnostic.line, "{}", diagnostic.message)
            }
            Severity::Error => {
                tracing::error!(line = diagnostic.line, "{}", diagnostic.message)
            }
        }
        self.entries.push(diagnostic);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Entries ordered by line, keeping emission order within a line.
    pub fn sorted(&self) -> Vec<&Diagnostic> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by_key(|d| d.line);
        entries
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

pub struct CompileSession {
    config: CompileConfig,
    textures: Box<dyn TextureProvider>,
    used_textures: BTreeSet<Texture>,
    diagnostics: Diagnostics,
}

impl CompileSession {
    /// Session resolving custom textures under the configured root (or the
    /// working directory).
    pub fn new(config: CompileConfig) -> Self {
        let root = config
            .texture_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        Self::with_root(config, root)
    }

    /// Session for compiling `path`: custom textures resolve next to the file
    /// unless the config names a root.
    pub fn for_file(path: &Path, config: CompileConfig) -> Self {
        let root = config.texture_root.clone().unwrap_or_else(|| {
            path.parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        });
        Self::with_root(config, root)
    }

    fn with_root(config: CompileConfig, root: PathBuf) -> Self {
        let provider = if config.check_textures {
            FsTextureProvider::new(root)
        } else {
            FsTextureProvider::unchecked(root)
        };
        Self::with_provider(config, Box::new(provider))
    }

    pub fn with_provider(config: CompileConfig, textures: Box<dyn TextureProvider>) -> Self {
        Self {
            config,
            textures,
            used_textures: BTreeSet::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn config(&self) -> &CompileConfig {
        &self.config
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn warn(&mut self, line: usize, message: impl Into<String>) {
        self.report(Diagnostic::warning(line, message));
    }

    pub fn error(&mut self, line: usize, message: impl Into<String>) {
        self.report(Diagnostic::error(line, message));
    }

    /// Resolve a built-in texture, falling back to the placeholder.
    pub fn builtin_texture(&mut self, line: usize, name: &str) -> Texture {
        match self.textures.builtin(name) {
            Some(texture) => texture,
            None => {
                self.warn(line, format!("unknown texture '{name}', using placeholder"));
                Texture::Missing
            }
        }
    }

    /// Resolve a custom texture file, falling back to the placeholder.
    pub fn custom_texture(&mut self, line: usize, folder: &str, filename: &str) -> Texture {
        match self.textures.custom(folder, filename) {
            Some(texture) => texture,
            None => {
                self.warn(
                    line,
                    format!("texture file '{folder}/{filename}' not found, using placeholder"),
                );
                Texture::Missing
            }
        }
    }

    pub fn mark_used(&mut self, texture: &Texture) {
        if *texture != Texture::Missing && !self.used_textures.contains(texture) {
            self.used_textures.insert(texture.clone());
        }
    }

    /// Textures placed on at least one polygon, sorted.
    pub fn used_textures(&self) -> impl Iterator<Item = &Texture> {
        self.used_textures.iter()
    }
}

impl Default for CompileSession {
    fn default() -> Self {
        Self::new(CompileConfig::default())
    }
}

impl fmt::Debug for CompileSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompileSession")
            .field("config", &self.config)
            .field("used_textures", &self.used_textures)
            .field("diagnostics", &self.diagnostics)
            .finish_non_exhaustive()
    }
}
