//! Interpreter: runs parsed statements against the cursor, the definition
//! table and the room builder, producing the finished [`Rooms`].
//!
//! Statements run strictly in document order: later lines may depend on
//! definitions, variables and cursor snapshots from earlier ones.

use std::collections::HashMap;

use super::ast::*;
use crate::cursor::Cursor;
use crate::geometry::Vec3;
use crate::room::definition::{DefinitionTable, RoomTextureDefinition, TextureAssignment, DEFAULT_DEFINITION};
use crate::room::builder::MAX_TILES_PER_AXIS;
use crate::room::{Light, LightModifier, RoomBuilder, Rooms};
use crate::session::CompileSession;

/// Per-compile interpreter state.
pub struct Interpreter<'s> {
    session: &'s mut CompileSession,
    variables: HashMap<String, Value>,
    definitions: DefinitionTable,
    cursor: Cursor,
    builder: RoomBuilder,
    rooms: Rooms,
}

impl<'s> Interpreter<'s> {
    pub fn new(session: &'s mut CompileSession) -> Self {
        let builder = RoomBuilder::new(session.config().tile_size);
        Self {
            session,
            variables: HashMap::new(),
            definitions: DefinitionTable::new(),
            cursor: Cursor::new(),
            builder,
            rooms: Rooms::new(),
        }
    }

    /// Execute every statement and return the placed rooms, not yet stitched.
    pub fn run(mut self, program: &Program) -> Rooms {
        for statement in &program.statements {
            self.execute(statement);
        }
        self.rooms
    }

    fn execute(&mut self, statement: &Statement) {
        let line = statement.line;
        match &statement.kind {
            StatementKind::Define { name, rules } => self.define(name, rules),
            StatementKind::RoomAdd {
                size,
                definition,
                alignments,
            } => {
                let Some(size) = self.resolve_size(line, size) else {
                    return;
                };
                self.add_room(line, size, definition, alignments);
            }
            StatementKind::WithLight(arg) => self.add_light(line, arg),
            StatementKind::CursorSave(name) => self.cursor.save_as(name.clone()),
            StatementKind::CursorRestore(name) => {
                if !self.cursor.restore(name) {
                    self.session.warn(
                        line,
                        format!("cursor snapshot '{name}' was never saved, ignoring restore"),
                    );
                }
            }
            StatementKind::Assign { name, value } => {
                self.variables.insert(name.clone(), value.clone());
            }
        }
    }

    fn define(&mut self, name: &str, rules: &[FaceRule]) {
        let mut definition = RoomTextureDefinition::default();
        for rule in rules {
            let assignment = match &rule.source {
                FaceSource::Off => TextureAssignment::removed(),
                FaceSource::Arx { name, fit } => {
                    let texture = self.session.builtin_texture(rule.line, name);
                    TextureAssignment::new(texture).with_fit(fit.x, fit.y)
                }
                FaceSource::Custom {
                    folder,
                    filename,
                    fit,
                } => {
                    let texture = self.session.custom_texture(rule.line, folder, filename);
                    TextureAssignment::new(texture).with_fit(fit.x, fit.y)
                }
            };
            for face in rule.target.faces() {
                definition.set(face, assignment.clone());
            }
        }
        tracing::debug!(name, faces = definition.present_faces(), "defined room textures");
        self.definitions.insert(name, definition);
    }

    fn add_room(
        &mut self,
        line: usize,
        size: Vec3,
        definition_name: &str,
        alignments: &[crate::cursor::Alignment],
    ) {
        let definition = match self.definitions.get(definition_name) {
            Some(def) => def.clone(),
            None => {
                self.session.warn(
                    line,
                    format!("unknown definition '{definition_name}', using '{DEFAULT_DEFINITION}'"),
                );
                self.definitions.default_definition()
            }
        };

        self.cursor.set_new_size(size);
        self.cursor.move_by(alignments);
        let room = self.builder.build(self.cursor.position(), size, &definition);
        self.cursor.commit();

        tracing::debug!(
            line,
            x = room.origin().x,
            y = room.origin().y,
            z = room.origin().z,
            polygons = room.polygon_count(),
            "placed room"
        );
        self.rooms.add_room(room);
    }

    fn add_light(&mut self, line: usize, arg: &LightArg) {
        let Some(modifier) = self.resolve_light(line, arg) else {
            return;
        };
        let config = self.session.config();
        let intensity = config.light_intensity * modifier.factor(config.dim_factor);
        let radius_scale = config.light_radius_scale;

        let Some(room) = self.rooms.last_mut() else {
            self.session
                .warn(line, "'with light' before any room was added, ignoring");
            return;
        };
        // Anchored at the cursor, lifted to half the height of the last room.
        let anchor = self.cursor.position();
        let height = self.cursor.old_size().y;
        let size = room.size();
        let light = Light {
            position: Vec3::new(anchor.x, anchor.y - height / 2.0, anchor.z),
            radius: radius_scale * size.x.max(size.z),
            intensity,
        };
        room.add_light(light);
    }

    fn resolve_light(&mut self, line: usize, arg: &LightArg) -> Option<LightModifier> {
        let percent = |p: i64| LightModifier::Percent(p.max(0) as f64 / 100.0);
        match arg {
            LightArg::Full => Some(LightModifier::Full),
            LightArg::Dim => Some(LightModifier::Dim),
            LightArg::Percentage(p) => Some(percent(*p)),
            LightArg::Variable(name) => match self.variables.get(name) {
                Some(Value::Percentage(p)) => Some(percent(*p)),
                Some(Value::Text(t)) if t == "dim" => Some(LightModifier::Dim),
                Some(_) => {
                    self.session.warn(
                        line,
                        format!("'${name}' is not a light modifier, using full intensity"),
                    );
                    Some(LightModifier::Full)
                }
                None => {
                    self.session
                        .error(line, format!("undefined variable '${name}', light skipped"));
                    None
                }
            },
        }
    }

    fn resolve_size(&mut self, line: usize, size: &[Number; 3]) -> Option<Vec3> {
        let mut values = [0.0; 3];
        for (slot, number) in values.iter_mut().zip(size) {
            let value = match number {
                Number::Literal(n) => *n,
                Number::Variable(name) => match self.variables.get(name) {
                    Some(Value::Integer(n)) => *n,
                    Some(_) => {
                        self.session.error(
                            line,
                            format!("'${name}' does not hold an integer, room skipped"),
                        );
                        return None;
                    }
                    None => {
                        self.session
                            .error(line, format!("undefined variable '${name}', room skipped"));
                        return None;
                    }
                },
            };
            if value <= 0 {
                self.session.error(
                    line,
                    format!("room extents must be positive, got {value}, room skipped"),
                );
                return None;
            }
            *slot = value as f64;
        }
        let size = Vec3::new(values[0], values[1], values[2]);

        let counts = self.builder.tile_counts(size);
        if let Some(axis) = (0..3).find(|&i| counts[i] > MAX_TILES_PER_AXIS) {
            self.session.error(
                line,
                format!(
                    "room needs {} tiles along {}, more than {MAX_TILES_PER_AXIS}, room skipped",
                    counts[axis],
                    ["x", "y", "z"][axis]
                ),
            );
            return None;
        }
        Some(size)
    }
}

/// Run `program` and stitch the result according to the session config.
pub fn compile_program(program: &Program, session: &mut CompileSession) -> Rooms {
    let mut rooms = Interpreter::new(session).run(program);
    if session.config().stitch_rooms {
        rooms.union_all_with_epsilon(session.config().union_epsilon);
    }
    for polygon in rooms.iter().flat_map(|room| room.polygons()) {
        session.mark_used(&polygon.texture);
    }
    tracing::info!(
        rooms = rooms.len(),
        polygons = rooms.polygon_count(),
        lights = rooms.light_count(),
        diagnostics = session.diagnostics().len(),
        "compiled room layout"
    );
    rooms
}
