//! Roomcraft: compiles a line-oriented room DSL into textured, stitched level geometry.

pub mod config;
pub mod cursor;
pub mod dsl;
pub mod export;
pub mod geometry;
pub mod room;
pub mod session;

pub use config::CompileConfig;
pub use dsl::{load_rooms, CompileError, Compiler};
pub use room::{Room, Rooms};
pub use session::{CompileSession, Diagnostic, Severity};
