//! Error types for the room DSL compiler.
//!
//! Only input the lexer cannot classify, and files that cannot be read, stop a
//! compile. Everything else is a [`crate::session::Diagnostic`].

/// An error that aborted compilation.
#[derive(Debug, Clone, thiserror::Error)]
#[error("[{line}:{col}] {kind:?}: {message}")]
pub struct CompileError {
    pub message: String,
    pub line: usize,
    pub col: usize,
    pub kind: ErrorKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    SyntaxError,
    Io,
}

impl CompileError {
    pub fn syntax(message: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            message: message.into(),
            line,
            col,
            kind: ErrorKind::SyntaxError,
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: 0,
            col: 0,
            kind: ErrorKind::Io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_position() {
        let err = CompileError::syntax("unexpected character: '@'", 3, 7);
        assert_eq!(
            err.to_string(),
            "[3:7] SyntaxError: unexpected character: '@'"
        );
    }

    #[test]
    fn io_errors_have_no_position() {
        let err = CompileError::io("missing.rooms: not found");
        assert_eq!(err.kind, ErrorKind::Io);
        assert_eq!((err.line, err.col), (0, 0));
    }
}
