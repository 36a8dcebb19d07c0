//! Parser for the room DSL.
//!
//! Turns the token stream into one [`Statement`] per line. Problems with a
//! line never abort the parse: the line (or the offending part of it) is
//! dropped and a [`Diagnostic`] is recorded.

use super::ast::*;
use super::token::{Token, TokenKind};
use crate::cursor::{Alignment, Axis};
use crate::room::definition::DEFAULT_DEFINITION;
use crate::room::Face;
use crate::session::Diagnostic;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn parse(&mut self) -> Program {
        let mut statements = Vec::new();

        while let Some(line) = self.next_line() {
            if let Some(statement) = self.parse_line(&line) {
                statements.push(statement);
            }
        }

        Program { statements }
    }

    /// Diagnostics collected so far, leaving the parser's list empty.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    fn parse_line(&mut self, line: &[Token]) -> Option<Statement> {
        let first = &line[0];
        let line_no = first.line;
        let kind = match &first.kind {
            TokenKind::Define => return self.parse_define(line),
            TokenKind::Room => self.parse_room(line)?,
            TokenKind::With => self.parse_light(line)?,
            TokenKind::Cursor => self.parse_cursor(line)?,
            TokenKind::Variable(name) => self.parse_assign(name, line)?,
            TokenKind::RBrace => {
                self.error(line_no, "unexpected '}' outside a define block");
                return None;
            }
            other => {
                self.error(
                    line_no,
                    format!("unrecognized command '{}'", describe(other)),
                );
                return None;
            }
        };
        Some(Statement {
            line: line_no,
            kind,
        })
    }

    /// `define <name> {` … `}`
    fn parse_define(&mut self, line: &[Token]) -> Option<Statement> {
        let line_no = line[0].line;
        let (name, rest) = match line.get(1) {
            Some(t) if t.kind == TokenKind::LBrace => (None, &line[1..]),
            Some(t) => (t.kind.as_word(), &line[2..]),
            None => (None, &line[1..]),
        };
        let closed_inline = match rest.first().map(|t| &t.kind) {
            Some(TokenKind::LBrace) => {
                let closed = matches!(rest.get(1).map(|t| &t.kind), Some(TokenKind::RBrace));
                let used = if closed { 2 } else { 1 };
                if rest.len() > used {
                    self.warn(line_no, "ignoring tokens after '{'");
                }
                closed
            }
            _ => {
                if self.peek_line_is(&[TokenKind::LBrace]) {
                    self.next_line();
                } else {
                    self.warn(line_no, "expected '{' after define name");
                }
                false
            }
        };

        let mut rules = Vec::new();
        if !closed_inline {
            loop {
                let Some(body) = self.next_line() else {
                    self.warn(line_no, "define block is never closed");
                    break;
                };
                if body[0].kind == TokenKind::RBrace {
                    if body.len() > 1 {
                        self.warn(body[0].line, "ignoring tokens after '}'");
                    }
                    break;
                }
                if let Some(rule) = self.parse_face_rule(&body) {
                    rules.push(rule);
                }
            }
        }

        match name {
            Some(name) => Some(Statement {
                line: line_no,
                kind: StatementKind::Define { name, rules },
            }),
            None => {
                self.error(line_no, "define needs a name");
                None
            }
        }
    }

    /// `floor|ceiling|wall|wall-<dir>` followed by `off`, `arx …` or `custom …`.
    fn parse_face_rule(&mut self, line: &[Token]) -> Option<FaceRule> {
        let line_no = line[0].line;
        let target = match &line[0].kind {
            TokenKind::Floor => FaceTarget::Floor,
            TokenKind::Ceiling => FaceTarget::Ceiling,
            TokenKind::Wall => FaceTarget::Walls,
            TokenKind::WallNorth => FaceTarget::Wall(Face::WallNorth),
            TokenKind::WallEast => FaceTarget::Wall(Face::WallEast),
            TokenKind::WallSouth => FaceTarget::Wall(Face::WallSouth),
            TokenKind::WallWest => FaceTarget::Wall(Face::WallWest),
            other => {
                self.warn(line_no, format!("unknown face '{}'", describe(other)));
                return None;
            }
        };

        let word = |i: usize| line.get(i).and_then(|t| t.kind.as_word());
        let source = match line.get(1).map(|t| &t.kind) {
            Some(TokenKind::Off) => {
                if line.len() > 2 {
                    self.warn(line_no, "ignoring tokens after 'off'");
                }
                FaceSource::Off
            }
            Some(TokenKind::Arx) => {
                let Some(name) = word(2) else {
                    self.warn(line_no, "arx texture needs a name");
                    return None;
                };
                let fit = self.parse_fit(&line[3..]);
                FaceSource::Arx { name, fit }
            }
            Some(TokenKind::Custom) => {
                let (Some(folder), Some(filename)) = (word(2), word(3)) else {
                    self.warn(line_no, "custom texture needs a folder and a filename");
                    return None;
                };
                let fit = self.parse_fit(&line[4..]);
                FaceSource::Custom {
                    folder,
                    filename,
                    fit,
                }
            }
            Some(other) => {
                self.warn(
                    line_no,
                    format!("unknown texture mode '{}'", describe(other)),
                );
                return None;
            }
            None => {
                self.warn(line_no, "face needs a texture mode");
                return None;
            }
        };

        Some(FaceRule {
            line: line_no,
            target,
            source,
        })
    }

    fn parse_fit(&mut self, tokens: &[Token]) -> Fit {
        let mut fit = Fit::default();
        for t in tokens {
            match &t.kind {
                TokenKind::FitX => fit.x = true,
                TokenKind::FitY => fit.y = true,
                TokenKind::Stretch => {
                    fit.x = true;
                    fit.y = true;
                }
                other => self.warn(
                    t.line,
                    format!("unknown fit mode '{}', ignored", describe(other)),
                ),
            }
        }
        fit
    }

    /// `room add <x> <y> <z> <definition> [alignment...]`
    fn parse_room(&mut self, line: &[Token]) -> Option<StatementKind> {
        let line_no = line[0].line;
        if !matches!(line.get(1).map(|t| &t.kind), Some(TokenKind::Add)) {
            self.error(line_no, "expected 'add' after 'room'");
            return None;
        }

        let mut size = Vec::with_capacity(3);
        for (i, axis) in ["x", "y", "z"].iter().enumerate() {
            match line.get(2 + i).map(|t| &t.kind) {
                Some(TokenKind::Integer(n)) => size.push(Number::Literal(*n)),
                Some(TokenKind::Variable(v)) => size.push(Number::Variable(v.clone())),
                Some(other) => {
                    self.error(
                        line_no,
                        format!("expected a number for {axis}, got '{}'", describe(other)),
                    );
                    return None;
                }
                None => {
                    self.error(line_no, format!("room add is missing the {axis} size"));
                    return None;
                }
            }
        }
        let size: [Number; 3] = size.try_into().ok()?;

        let (definition, aligns_from) = match line.get(5).map(|t| &t.kind) {
            None | Some(TokenKind::Alignment(_)) => {
                self.warn(line_no, "room add has no definition, using 'default'");
                (DEFAULT_DEFINITION.to_string(), 5)
            }
            Some(kind) => match kind.as_word() {
                Some(name) => (name, 6),
                None => {
                    self.warn(
                        line_no,
                        format!("invalid definition name '{}', using 'default'", describe(kind)),
                    );
                    (DEFAULT_DEFINITION.to_string(), 6)
                }
            },
        };

        let rest = line.get(aligns_from..).unwrap_or(&[]);
        let alignments = self.parse_alignments(line_no, rest);
        Some(StatementKind::RoomAdd {
            size,
            definition,
            alignments,
        })
    }

    fn parse_alignments(&mut self, line_no: usize, tokens: &[Token]) -> Vec<Alignment> {
        let mut alignments: Vec<Alignment> = Vec::new();
        for t in tokens {
            let TokenKind::Alignment(code) = &t.kind else {
                self.warn(
                    line_no,
                    format!("ignoring '{}', expected an alignment", describe(&t.kind)),
                );
                continue;
            };
            match code.parse::<Alignment>() {
                Ok(alignment) => {
                    if alignments.iter().any(|a| a.axis == alignment.axis) {
                        self.warn(
                            line_no,
                            format!(
                                "{} axis aligned more than once, '{code}' wins",
                                axis_name(alignment.axis)
                            ),
                        );
                    }
                    alignments.push(alignment);
                }
                Err(e) => self.warn(line_no, e),
            }
        }
        alignments
    }

    /// `with light [dim|NN%|$var]`
    fn parse_light(&mut self, line: &[Token]) -> Option<StatementKind> {
        let line_no = line[0].line;
        if !matches!(line.get(1).map(|t| &t.kind), Some(TokenKind::Light)) {
            self.error(line_no, "expected 'light' after 'with'");
            return None;
        }
        let arg = match line.get(2).map(|t| &t.kind) {
            None => LightArg::Full,
            Some(TokenKind::Dim) => LightArg::Dim,
            Some(TokenKind::Percentage(p)) => LightArg::Percentage(*p),
            Some(TokenKind::Variable(v)) => LightArg::Variable(v.clone()),
            Some(other) => {
                self.warn(
                    line_no,
                    format!(
                        "unknown light modifier '{}', using full intensity",
                        describe(other)
                    ),
                );
                LightArg::Full
            }
        };
        if line.len() > 3 {
            self.warn(line_no, "ignoring tokens after light modifier");
        }
        Some(StatementKind::WithLight(arg))
    }

    /// `cursor save <name>` / `cursor restore <name>`
    fn parse_cursor(&mut self, line: &[Token]) -> Option<StatementKind> {
        let line_no = line[0].line;
        let name = line.get(2).and_then(|t| t.kind.as_word());
        let kind = match (line.get(1).map(|t| &t.kind), name) {
            (Some(TokenKind::Save), Some(name)) => StatementKind::CursorSave(name),
            (Some(TokenKind::Restore), Some(name)) => StatementKind::CursorRestore(name),
            (Some(TokenKind::Save | TokenKind::Restore), None) => {
                self.error(line_no, "cursor snapshot needs a name");
                return None;
            }
            _ => {
                self.error(line_no, "expected 'save' or 'restore' after 'cursor'");
                return None;
            }
        };
        if line.len() > 3 {
            self.warn(line_no, "ignoring tokens after snapshot name");
        }
        Some(kind)
    }

    /// `$name = value`
    fn parse_assign(&mut self, name: &str, line: &[Token]) -> Option<StatementKind> {
        let line_no = line[0].line;
        if !matches!(line.get(1).map(|t| &t.kind), Some(TokenKind::Eq)) {
            self.error(line_no, format!("expected '=' after '${name}'"));
            return None;
        }
        let value = match line.get(2).map(|t| &t.kind) {
            Some(TokenKind::Integer(n)) => Value::Integer(*n),
            Some(TokenKind::Percentage(p)) => Value::Percentage(*p),
            Some(other) => match other.as_word() {
                Some(text) => Value::Text(text),
                None => {
                    self.error(
                        line_no,
                        format!("cannot assign '{}' to '${name}'", describe(other)),
                    );
                    return None;
                }
            },
            None => {
                self.error(line_no, format!("'${name}' needs a value"));
                return None;
            }
        };
        if line.len() > 3 {
            self.warn(line_no, "ignoring tokens after assigned value");
        }
        Some(StatementKind::Assign {
            name: name.to_string(),
            value,
        })
    }

    // --- Utility methods ---

    /// Tokens of the next non-empty line, without the newline.
    fn next_line(&mut self) -> Option<Vec<Token>> {
        loop {
            if self.pos >= self.tokens.len() {
                return None;
            }
            let start = self.pos;
            while self.pos < self.tokens.len() && self.tokens[self.pos].kind != TokenKind::Newline {
                self.pos += 1;
            }
            let line = self.tokens[start..self.pos].to_vec();
            if self.pos < self.tokens.len() {
                self.pos += 1; // newline
            }
            if !line.is_empty() {
                return Some(line);
            }
        }
    }

    /// Whether the next non-empty line consists of exactly `kinds`.
    fn peek_line_is(&mut self, kinds: &[TokenKind]) -> bool {
        let saved = self.pos;
        let matches = self
            .next_line()
            .is_some_and(|line| line.iter().map(|t| &t.kind).eq(kinds.iter()));
        self.pos = saved;
        matches
    }

    fn warn(&mut self, line: usize, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::warning(line, message));
    }

    fn error(&mut self, line: usize, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::error(line, message));
    }
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Variable(v) => format!("${v}"),
        TokenKind::Percentage(p) => format!("{p}%"),
        TokenKind::Newline => "newline".to_string(),
        other => other
            .as_word()
            .or_else(|| other.keyword_text().map(str::to_string))
            .unwrap_or_else(|| format!("{other:?}")),
    }
}

fn axis_name(axis: Axis) -> &'static str {
    match axis {
        Axis::X => "x",
        Axis::Y => "y",
        Axis::Z => "z",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::AxisAlignment;
    use crate::dsl::lexer::tokenize;
    use crate::session::Severity;

    fn parse(src: &str) -> (Program, Vec<Diagnostic>) {
        let mut parser = Parser::new(tokenize(src).unwrap());
        let program = parser.parse();
        (program, parser.take_diagnostics())
    }

    #[test]
    fn parse_room_add() {
        let (prog, diags) = parse("room add 500 300 $depth office x++ y-\n");
        assert!(diags.is_empty());
        assert_eq!(prog.statements.len(), 1);
        assert_eq!(
            prog.statements[0].kind,
            StatementKind::RoomAdd {
                size: [
                    Number::Literal(500),
                    Number::Literal(300),
                    Number::Variable("depth".into())
                ],
                definition: "office".into(),
                alignments: vec![
                    Alignment::new(Axis::X, AxisAlignment::PlusPlus),
                    Alignment::new(Axis::Y, AxisAlignment::Minus),
                ],
            }
        );
    }

    #[test]
    fn parse_room_add_default_keyword() {
        let (prog, diags) = parse("room add 100 200 100 default");
        assert!(diags.is_empty());
        match &prog.statements[0].kind {
            StatementKind::RoomAdd { definition, .. } => assert_eq!(definition, "default"),
            other => panic!("expected RoomAdd, got {other:?}"),
        }
    }

    #[test]
    fn room_add_without_definition_uses_default() {
        let (prog, diags) = parse("room add 100 200 100 z++");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Warning);
        match &prog.statements[0].kind {
            StatementKind::RoomAdd {
                definition,
                alignments,
                ..
            } => {
                assert_eq!(definition, "default");
                assert_eq!(alignments.len(), 1);
            }
            other => panic!("expected RoomAdd, got {other:?}"),
        }
    }

    #[test]
    fn room_add_with_bad_size_is_dropped() {
        let (prog, diags) = parse("room add 100 wide 100 office\nroom add 1 1 1 default");
        assert_eq!(prog.statements.len(), 1);
        assert_eq!(prog.statements[0].line, 2);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].line, 1);
        assert_eq!(diags[0].severity, Severity::Error);
    }

    #[test]
    fn repeated_axis_warns() {
        let (_, diags) = parse("room add 1 1 1 default x++ x--");
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("'x--' wins"));
    }

    #[test]
    fn parse_define_block() {
        let src = "\
define office {
  floor arx stone-floor fit-x
  wall custom textures brick.jpg stretch
  wall-east off
  ceiling arx wood
}
";
        let (prog, diags) = parse(src);
        assert!(diags.is_empty(), "{diags:?}");
        assert_eq!(prog.statements.len(), 1);
        let StatementKind::Define { name, rules } = &prog.statements[0].kind else {
            panic!("expected Define");
        };
        assert_eq!(name, "office");
        assert_eq!(rules.len(), 4);
        assert_eq!(rules[0].target, FaceTarget::Floor);
        assert_eq!(
            rules[0].source,
            FaceSource::Arx {
                name: "stone-floor".into(),
                fit: Fit { x: true, y: false }
            }
        );
        assert_eq!(rules[1].target, FaceTarget::Walls);
        assert_eq!(
            rules[1].source,
            FaceSource::Custom {
                folder: "textures".into(),
                filename: "brick.jpg".into(),
                fit: Fit { x: true, y: true }
            }
        );
        assert_eq!(rules[2].target, FaceTarget::Wall(Face::WallEast));
        assert_eq!(rules[2].source, FaceSource::Off);
        assert_eq!(rules[3].line, 5);
    }

    #[test]
    fn define_brace_on_next_line() {
        let (prog, diags) = parse("define hall\n{\n  floor off\n}\n");
        assert!(diags.is_empty(), "{diags:?}");
        let StatementKind::Define { rules, .. } = &prog.statements[0].kind else {
            panic!("expected Define");
        };
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn empty_inline_define() {
        let (prog, diags) = parse("define nothing { }\nroom add 1 1 1 nothing");
        assert!(diags.is_empty(), "{diags:?}");
        assert_eq!(prog.statements.len(), 2);
    }

    #[test]
    fn unknown_face_and_mode_are_skipped() {
        let src = "\
define odd {
  roof arx slate
  floor paint red
  ceiling arx wood shiny
}
room add 1 1 1 odd
";
        let (prog, diags) = parse(src);
        assert_eq!(prog.statements.len(), 2);
        let StatementKind::Define { rules, .. } = &prog.statements[0].kind else {
            panic!("expected Define");
        };
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].target, FaceTarget::Ceiling);
        let lines: Vec<_> = diags.iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![2, 3, 4]);
        assert!(diags.iter().all(|d| d.severity == Severity::Warning));
    }

    #[test]
    fn unterminated_define_keeps_rules() {
        let (prog, diags) = parse("define open {\n  floor off\n");
        assert_eq!(prog.statements.len(), 1);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("never closed"));
    }

    #[test]
    fn parse_light_variants() {
        let (prog, diags) = parse("with light\nwith light dim\nwith light 40%\nwith light $glow\nwith light bright");
        let args: Vec<_> = prog
            .statements
            .iter()
            .map(|s| match &s.kind {
                StatementKind::WithLight(arg) => arg.clone(),
                other => panic!("expected WithLight, got {other:?}"),
            })
            .collect();
        assert_eq!(
            args,
            vec![
                LightArg::Full,
                LightArg::Dim,
                LightArg::Percentage(40),
                LightArg::Variable("glow".into()),
                LightArg::Full,
            ]
        );
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].line, 5);
    }

    #[test]
    fn parse_cursor_commands() {
        let (prog, diags) = parse("cursor save hub\ncursor restore hub\ncursor jump hub\ncursor save");
        assert_eq!(prog.statements.len(), 2);
        assert_eq!(prog.statements[0].kind, StatementKind::CursorSave("hub".into()));
        assert_eq!(prog.statements[1].kind, StatementKind::CursorRestore("hub".into()));
        assert_eq!(diags.len(), 2);
    }

    #[test]
    fn parse_assignments() {
        let (prog, diags) = parse("$w = 400\n$glow = 30%\n$name = office\n$bad 4");
        assert_eq!(prog.statements.len(), 3);
        assert_eq!(
            prog.statements[0].kind,
            StatementKind::Assign {
                name: "w".into(),
                value: Value::Integer(400)
            }
        );
        assert_eq!(
            prog.statements[1].kind,
            StatementKind::Assign {
                name: "glow".into(),
                value: Value::Percentage(30)
            }
        );
        assert_eq!(
            prog.statements[2].kind,
            StatementKind::Assign {
                name: "name".into(),
                value: Value::Text("office".into())
            }
        );
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].line, 4);
    }

    #[test]
    fn unknown_command_is_skipped() {
        let (prog, diags) = parse("teleport 1 2 3\nroom add 1 1 1 default\n}\n");
        assert_eq!(prog.statements.len(), 1);
        assert_eq!(diags.len(), 2);
        assert_eq!(diags[0].line, 1);
        assert!(diags[0].message.contains("teleport"));
        assert_eq!(diags[1].line, 3);
    }

    #[test]
    fn blank_lines_and_comments_ignored() {
        let src = "\n\n# header\n\nroom add 1 1 1 default # first\n\n";
        let (prog, diags) = parse(src);
        assert!(diags.is_empty());
        assert_eq!(prog.statements.len(), 1);
        assert_eq!(prog.statements[0].line, 5);
    }
}
