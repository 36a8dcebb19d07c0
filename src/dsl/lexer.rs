//! Lexer for the room DSL.
//!
//! A maximal-munch scanner: characters are appended to a buffer for as long as
//! some token pattern still matches (fully or as a prefix), and the token is
//! cut at the longest buffer that matched fully. Pattern matching lives in the
//! pure [`match_longest`]; line/column bookkeeping lives in [`Lexer::consume`].

use super::error::CompileError;
use super::token::{Token, TokenKind, KEYWORDS, SYMBOLS};

/// How far a buffer gets against one pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Match {
    None,
    /// The buffer is a proper prefix of something the pattern accepts.
    Partial,
    Full,
}

/// Result of testing a buffer against every pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct Scan {
    /// Highest-priority pattern matching the whole buffer.
    pub full: Option<TokenKind>,
    /// Whether a longer buffer could still match something.
    pub viable: bool,
}

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Tokenize the whole source. Whitespace and comments are dropped.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, CompileError> {
        let mut tokens = Vec::new();

        while !self.is_at_end() {
            let (kind, len) = self.longest_at(self.pos).ok_or_else(|| {
                CompileError::syntax(
                    format!("unexpected character: '{}'", self.chars[self.pos]),
                    self.line,
                    self.col,
                )
            })?;

            let line = self.line;
            let col = self.col;
            self.check_number(&kind, len)?;
            self.consume(len);

            if kind != TokenKind::Whitespace {
                tokens.push(Token { kind, line, col });
            }
        }

        tokens.retain(|t| !t.kind.is_trivia());
        Ok(tokens)
    }

    /// Grow a buffer from `start` while any pattern is still viable and
    /// remember the longest full match.
    fn longest_at(&self, start: usize) -> Option<(TokenKind, usize)> {
        let mut buffer = String::new();
        let mut best = None;

        for (offset, &ch) in self.chars[start..].iter().enumerate() {
            buffer.push(ch);
            let scan = match_longest(&buffer);
            if let Some(kind) = scan.full {
                best = Some((kind, offset + 1));
            }
            if !scan.viable {
                break;
            }
        }

        best
    }

    /// Numeric literals must fit in an `i64`; `match_longest` only checks
    /// their shape.
    fn check_number(&self, kind: &TokenKind, len: usize) -> Result<(), CompileError> {
        let text: String = self.chars[self.pos..self.pos + len].iter().collect();
        let digits = match kind {
            TokenKind::Integer(_) => text.as_str(),
            TokenKind::Percentage(_) => text.trim_end_matches('%'),
            _ => return Ok(()),
        };
        match digits.parse::<i64>() {
            Ok(_) => Ok(()),
            Err(_) => Err(CompileError::syntax(
                format!("number out of range: '{text}'"),
                self.line,
                self.col,
            )),
        }
    }

    /// Advance over `len` characters, keeping line and column in step.
    fn consume(&mut self, len: usize) {
        for _ in 0..len {
            let ch = self.chars[self.pos];
            self.pos += 1;
            if ch == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }
}

/// Tokenize `source` in one call.
pub fn tokenize(source: &str) -> Result<Vec<Token>, CompileError> {
    Lexer::new(source).tokenize()
}

/// Test `buffer` against every token pattern.
///
/// Earlier patterns win ties: keywords beat the generic string, alignment
/// codes beat strings, integers beat strings.
pub fn match_longest(buffer: &str) -> Scan {
    let mut full = None;
    let mut viable = false;

    let mut consider = |m: Match, kind: &dyn Fn() -> TokenKind| {
        match m {
            Match::Full => {
                viable = true;
                if full.is_none() {
                    full = Some(kind());
                }
            }
            Match::Partial => viable = true,
            Match::None => {}
        }
    };

    consider(match_whitespace(buffer), &|| TokenKind::Whitespace);
    consider(match_literal(buffer, "\n"), &|| TokenKind::Newline);
    consider(match_comment(buffer), &|| TokenKind::Comment);
    for (text, kind) in KEYWORDS.iter().chain(SYMBOLS) {
        consider(match_literal(buffer, text), &|| kind.clone());
    }
    consider(match_alignment(buffer), &|| {
        TokenKind::Alignment(buffer.to_string())
    });
    consider(match_variable(buffer), &|| {
        TokenKind::Variable(buffer[1..].to_string())
    });
    consider(match_integer(buffer), &|| {
        TokenKind::Integer(buffer.parse().unwrap_or(i64::MAX))
    });
    consider(match_percentage(buffer), &|| {
        let digits = &buffer[..buffer.len() - 1];
        TokenKind::Percentage(digits.parse().unwrap_or(i64::MAX))
    });
    consider(match_string(buffer), &|| TokenKind::String(buffer.to_string()));

    Scan { full, viable }
}

fn match_literal(buffer: &str, literal: &str) -> Match {
    if buffer == literal {
        Match::Full
    } else if literal.starts_with(buffer) {
        Match::Partial
    } else {
        Match::None
    }
}

fn match_whitespace(buffer: &str) -> Match {
    if !buffer.is_empty() && buffer.chars().all(|c| matches!(c, ' ' | '\t' | '\r')) {
        Match::Full
    } else {
        Match::None
    }
}

fn match_comment(buffer: &str) -> Match {
    if buffer.starts_with('#') && !buffer.contains('\n') {
        Match::Full
    } else {
        Match::None
    }
}

// [xyz](--|-|\+|\+\+)?
fn match_alignment(buffer: &str) -> Match {
    let mut chars = buffer.chars();
    match chars.next() {
        Some('x' | 'y' | 'z') => {}
        _ => return Match::None,
    }
    match chars.as_str() {
        "" | "-" | "--" | "+" | "++" => Match::Full,
        _ => Match::None,
    }
}

// \$[A-Za-z_][A-Za-z0-9_]*
fn match_variable(buffer: &str) -> Match {
    let Some(name) = buffer.strip_prefix('$') else {
        return Match::None;
    };
    let mut chars = name.chars();
    match chars.next() {
        None => Match::Partial,
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            if chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
                Match::Full
            } else {
                Match::None
            }
        }
        Some(_) => Match::None,
    }
}

// -?[0-9]+
fn match_integer(buffer: &str) -> Match {
    let digits = buffer.strip_prefix('-').unwrap_or(buffer);
    if digits.is_empty() {
        return if buffer == "-" {
            Match::Partial
        } else {
            Match::None
        };
    }
    if digits.chars().all(|c| c.is_ascii_digit()) {
        Match::Full
    } else {
        Match::None
    }
}

// [0-9]+%
fn match_percentage(buffer: &str) -> Match {
    if buffer.is_empty() {
        return Match::None;
    }
    match buffer.strip_suffix('%') {
        Some(digits) if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) => {
            Match::Full
        }
        Some(_) => Match::None,
        None if buffer.chars().all(|c| c.is_ascii_digit()) => Match::Partial,
        None => Match::None,
    }
}

fn is_string_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | '\\' | '[' | ']' | '(' | ')' | ':' | ',' | '\'')
}

fn match_string(buffer: &str) -> Match {
    if !buffer.is_empty() && buffer.chars().all(is_string_char) {
        Match::Full
    } else {
        Match::None
    }
}
