//! Room DSL compiler: source text → tokens → statements → placed, stitched rooms.

pub mod ast;
pub mod compile;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::*;
pub use error::{CompileError, ErrorKind};

use std::path::Path;

use compile::compile_program;
use lexer::Lexer;
use parser::Parser;
use token::Token;

use crate::room::Rooms;
use crate::session::CompileSession;

/// The DSL compiler.
///
/// Only lexical errors abort a compile. Everything the parser or interpreter
/// rejects is recorded on the session and skipped.
pub struct Compiler;

impl Compiler {
    /// Tokenize DSL source, trivia removed.
    pub fn tokenize(source: &str) -> Result<Vec<Token>, CompileError> {
        Lexer::new(source).tokenize()
    }

    /// Parse DSL source into a Program, reporting line-level problems to `session`.
    pub fn parse(source: &str, session: &mut CompileSession) -> Result<Program, CompileError> {
        let tokens = Self::tokenize(source)?;
        let mut parser = Parser::new(tokens);
        let program = parser.parse();
        for diagnostic in parser.take_diagnostics() {
            session.report(diagnostic);
        }
        Ok(program)
    }

    /// Parse and run DSL source.
    pub fn compile(source: &str, session: &mut CompileSession) -> Result<Rooms, CompileError> {
        let program = Self::parse(source, session)?;
        Ok(compile_program(&program, session))
    }

    /// Read and compile a DSL file.
    pub fn compile_file(path: &Path, session: &mut CompileSession) -> Result<Rooms, CompileError> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| CompileError::io(format!("cannot read {}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), bytes = source.len(), "compiling room file");
        Self::compile(&source, session)
    }
}

/// Compile the DSL file at `path` with a fresh session.
///
/// Custom textures resolve next to the file unless `config` names a root.
/// Returns the rooms together with the session holding diagnostics and the
/// used-texture set.
pub fn load_rooms(
    path: &Path,
    config: crate::config::CompileConfig,
) -> Result<(Rooms, CompileSession), CompileError> {
    let mut session = CompileSession::for_file(path, config);
    let rooms = Compiler::compile_file(path, &mut session)?;
    Ok((rooms, session))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexical_error_aborts_compile() {
        let mut session = CompileSession::default();
        let err = Compiler::compile("room add 1 1 1 default\nroom @", &mut session).unwrap_err();
        assert_eq!(err.kind, ErrorKind::SyntaxError);
        assert_eq!((err.line, err.col), (2, 6));
    }

    #[test]
    fn parser_diagnostics_reach_session() {
        let mut session = CompileSession::default();
        let rooms = Compiler::compile("jump 3\nroom add 100 100 100 default", &mut session).unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(session.diagnostics().len(), 1);
        assert!(session.diagnostics().has_errors());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_rooms(&dir.path().join("nope.room"), Default::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Io);
    }

    #[test]
    fn empty_source_compiles_to_nothing() {
        let mut session = CompileSession::default();
        let rooms = Compiler::compile("", &mut session).unwrap();
        assert!(rooms.is_empty());
        assert!(session.diagnostics().is_empty());
    }
}
