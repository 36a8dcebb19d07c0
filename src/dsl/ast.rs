//! Statements of the room DSL: one per logical line (a `define` block counts
//! as one).

use crate::cursor::Alignment;
use crate::room::Face;

/// A parsed DSL file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub line: usize,
    pub kind: StatementKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    /// `define <name> { ... }`
    Define { name: String, rules: Vec<FaceRule> },
    /// `room add <x> <y> <z> <definition> [alignment...]`
    RoomAdd {
        size: [Number; 3],
        definition: String,
        alignments: Vec<Alignment>,
    },
    /// `with light [dim|NN%]`
    WithLight(LightArg),
    /// `cursor save <name>`
    CursorSave(String),
    /// `cursor restore <name>`
    CursorRestore(String),
    /// `$name = value`
    Assign { name: String, value: Value },
}

/// A numeric argument: literal or variable reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    Literal(i64),
    Variable(String),
}

/// A value stored in the variable table.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Percentage(i64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LightArg {
    Full,
    Dim,
    Percentage(i64),
    Variable(String),
}

/// One line inside a `define` block.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceRule {
    pub line: usize,
    pub target: FaceTarget,
    pub source: FaceSource,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FaceTarget {
    Floor,
    Ceiling,
    /// Plain `wall`: all four walls.
    Walls,
    Wall(Face),
}

impl FaceTarget {
    pub fn faces(self) -> Vec<Face> {
        match self {
            FaceTarget::Floor => vec![Face::Floor],
            FaceTarget::Ceiling => vec![Face::Ceiling],
            FaceTarget::Walls => Face::WALLS.to_vec(),
            FaceTarget::Wall(face) => vec![face],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FaceSource {
    Off,
    Arx { name: String, fit: Fit },
    Custom { folder: String, filename: String, fit: Fit },
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Fit {
    pub x: bool,
    pub y: bool,
}
