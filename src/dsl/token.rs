//! Token types for the room DSL lexer.

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub col: usize,
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Keywords
    Room,
    Add,
    Define,
    Ceiling,
    Wall,
    WallNorth,
    WallSouth,
    WallEast,
    WallWest,
    Floor,
    Custom,
    Arx,
    With,
    Light,
    Cursor,
    Save,
    Restore,
    Off,
    FitX,
    FitY,
    Stretch,
    Dim,
    Default,

    // Symbols
    LBrace,
    RBrace,
    Eq,

    // Literals
    /// Alignment code such as `x++` or `y`.
    Alignment(String),
    /// `$name`, stored without the `$`.
    Variable(String),
    Integer(i64),
    /// `50%`, stored as the number before the sign.
    Percentage(i64),
    String(String),

    // Layout
    Newline,
    /// Discarded by the lexer.
    Whitespace,
    /// Filtered out of the final stream.
    Comment,
}

/// Keyword spellings, in the order they are tried.
pub const KEYWORDS: &[(&str, TokenKind)] = &[
    ("room", TokenKind::Room),
    ("add", TokenKind::Add),
    ("define", TokenKind::Define),
    ("ceiling", TokenKind::Ceiling),
    ("wall", TokenKind::Wall),
    ("wall-north", TokenKind::WallNorth),
    ("wall-south", TokenKind::WallSouth),
    ("wall-east", TokenKind::WallEast),
    ("wall-west", TokenKind::WallWest),
    ("floor", TokenKind::Floor),
    ("custom", TokenKind::Custom),
    ("arx", TokenKind::Arx),
    ("with", TokenKind::With),
    ("light", TokenKind::Light),
    ("cursor", TokenKind::Cursor),
    ("save", TokenKind::Save),
    ("restore", TokenKind::Restore),
    ("off", TokenKind::Off),
    ("fit-x", TokenKind::FitX),
    ("fit-y", TokenKind::FitY),
    ("stretch", TokenKind::Stretch),
    ("dim", TokenKind::Dim),
    ("default", TokenKind::Default),
];

pub const SYMBOLS: &[(&str, TokenKind)] = &[
    ("{", TokenKind::LBrace),
    ("}", TokenKind::RBrace),
    ("=", TokenKind::Eq),
];

impl TokenKind {
    /// Source spelling of a keyword or symbol.
    pub fn keyword_text(&self) -> Option<&'static str> {
        KEYWORDS
            .iter()
            .chain(SYMBOLS)
            .find(|(_, kind)| kind == self)
            .map(|(text, _)| *text)
    }

    /// The token read as a bare word, for positions that take a name
    /// (definition ids, texture names, file names, snapshot names).
    pub fn as_word(&self) -> Option<String> {
        match self {
            TokenKind::String(s) | TokenKind::Alignment(s) => Some(s.clone()),
            TokenKind::Integer(n) => Some(n.to_string()),
            TokenKind::LBrace | TokenKind::RBrace | TokenKind::Eq => None,
            other => other.keyword_text().map(str::to_string),
        }
    }

    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }
}
