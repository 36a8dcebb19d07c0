//! Cursor: the anchor at which the next room is placed.
//!
//! Placement is always relative: an alignment code says how the next room sits
//! against the previous one along one axis. The cursor holds the floor center
//! of the last placed room, its extent (`old_size`) and the extent of the room
//! being placed (`new_size`).

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::geometry::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Placement of the new room relative to the previous one on one axis.
///
/// For X and Z, `PlusPlus` puts the new room flush against the previous room's
/// far side, `Plus` aligns their far edges, `Center` aligns centers, `Minus`
/// aligns near edges and `MinusMinus` puts it flush against the near side.
/// For Y, `PlusPlus` stacks the new floor on the previous ceiling and
/// `MinusMinus` hangs the new ceiling under the previous floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisAlignment {
    MinusMinus,
    Minus,
    Center,
    Plus,
    PlusPlus,
}

/// A parsed alignment code such as `x++` or `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alignment {
    pub axis: Axis,
    pub align: AxisAlignment,
}

impl Alignment {
    pub fn new(axis: Axis, align: AxisAlignment) -> Self {
        Self { axis, align }
    }
}

impl FromStr for Alignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let axis = match chars.next() {
            Some('x') => Axis::X,
            Some('y') => Axis::Y,
            Some('z') => Axis::Z,
            _ => return Err(format!("invalid alignment axis in '{s}'")),
        };
        let align = match chars.as_str() {
            "--" => AxisAlignment::MinusMinus,
            "-" => AxisAlignment::Minus,
            "" => AxisAlignment::Center,
            "+" => AxisAlignment::Plus,
            "++" => AxisAlignment::PlusPlus,
            other => return Err(format!("invalid alignment suffix '{other}'")),
        };
        Ok(Alignment { axis, align })
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let axis = match self.axis {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        let suffix = match self.align {
            AxisAlignment::MinusMinus => "--",
            AxisAlignment::Minus => "-",
            AxisAlignment::Center => "",
            AxisAlignment::Plus => "+",
            AxisAlignment::PlusPlus => "++",
        };
        write!(f, "{axis}{suffix}")
    }
}

/// The full cursor state. Snapshots copy it by value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CursorState {
    pub position: Vec3,
    pub old_size: Vec3,
    pub new_size: Vec3,
}

#[derive(Debug, Clone, Default)]
pub struct Cursor {
    state: CursorState,
    saved: HashMap<String, CursorState>,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Vec3 {
        self.state.position
    }

    pub fn old_size(&self) -> Vec3 {
        self.state.old_size
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    /// Set the extent of the room about to be placed. Must precede [`Cursor::move_by`].
    pub fn set_new_size(&mut self, size: Vec3) {
        self.state.new_size = size;
    }

    /// The room was placed: its extent becomes the reference for the next one.
    pub fn commit(&mut self) {
        self.state.old_size = self.state.new_size;
    }

    /// Move the cursor for the next room. Each axis moves once, using the last
    /// alignment given for it. Y defaults to `y-` (floors level).
    pub fn move_by(&mut self, alignments: &[Alignment]) {
        let last_for = |axis: Axis| {
            alignments
                .iter()
                .rev()
                .find(|a| a.axis == axis)
                .map(|a| a.align)
        };

        if let Some(align) = last_for(Axis::X) {
            self.state.position.x +=
                horizontal_offset(align, self.state.old_size.x, self.state.new_size.x);
        }
        let y_align = last_for(Axis::Y).unwrap_or(AxisAlignment::Minus);
        self.state.position.y +=
            vertical_offset(y_align, self.state.old_size.y, self.state.new_size.y);
        if let Some(align) = last_for(Axis::Z) {
            self.state.position.z +=
                horizontal_offset(align, self.state.old_size.z, self.state.new_size.z);
        }
    }

    /// Snapshot the whole state under `name`, replacing any earlier snapshot.
    pub fn save_as(&mut self, name: impl Into<String>) {
        self.saved.insert(name.into(), self.state);
    }

    /// Replace the live state with a snapshot. Returns `false` (and changes
    /// nothing) if no snapshot has that name.
    pub fn restore(&mut self, name: &str) -> bool {
        match self.saved.get(name) {
            Some(state) => {
                self.state = *state;
                true
            }
            None => false,
        }
    }
}

fn horizontal_offset(align: AxisAlignment, old: f64, new: f64) -> f64 {
    match align {
        AxisAlignment::PlusPlus => old / 2.0 + new / 2.0,
        AxisAlignment::Plus => old / 2.0 - new / 2.0,
        AxisAlignment::Center => 0.0,
        AxisAlignment::Minus => -(old / 2.0 - new / 2.0),
        AxisAlignment::MinusMinus => -(old / 2.0 + new / 2.0),
    }
}

// The anchor is the floor and y grows downward.
fn vertical_offset(align: AxisAlignment, old: f64, new: f64) -> f64 {
    match align {
        AxisAlignment::PlusPlus => -old,
        AxisAlignment::Plus => -(old - new),
        AxisAlignment::Center => -(old / 2.0 - new / 2.0),
        AxisAlignment::Minus => 0.0,
        AxisAlignment::MinusMinus => new,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aligns(codes: &[&str]) -> Vec<Alignment> {
        codes.iter().map(|c| c.parse().unwrap()).collect()
    }

    fn place(cursor: &mut Cursor, size: Vec3, codes: &[&str]) {
        cursor.set_new_size(size);
        cursor.move_by(&aligns(codes));
        cursor.commit();
    }

    #[test]
    fn parse_alignment_codes() {
        assert_eq!(
            "x++".parse::<Alignment>().unwrap(),
            Alignment::new(Axis::X, AxisAlignment::PlusPlus)
        );
        assert_eq!(
            "y".parse::<Alignment>().unwrap(),
            Alignment::new(Axis::Y, AxisAlignment::Center)
        );
        assert_eq!(
            "z-".parse::<Alignment>().unwrap(),
            Alignment::new(Axis::Z, AxisAlignment::Minus)
        );
        assert!("w+".parse::<Alignment>().is_err());
        assert!("x+++".parse::<Alignment>().is_err());
        assert_eq!("z--".parse::<Alignment>().unwrap().to_string(), "z--");
    }

    #[test]
    fn first_room_stays_at_origin() {
        let mut cursor = Cursor::new();
        place(&mut cursor, Vec3::new(500.0, 300.0, 500.0), &[]);
        assert_eq!(cursor.position(), Vec3::ZERO);
        assert_eq!(cursor.old_size(), Vec3::new(500.0, 300.0, 500.0));
    }

    #[test]
    fn flush_along_z() {
        let mut cursor = Cursor::new();
        place(&mut cursor, Vec3::new(500.0, 300.0, 500.0), &[]);
        place(&mut cursor, Vec3::new(1000.0, 300.0, 300.0), &["y-", "z++"]);
        assert_eq!(cursor.position(), Vec3::new(0.0, 0.0, 400.0));
    }

    #[test]
    fn horizontal_rules() {
        let old = 400.0;
        let new = 100.0;
        assert_eq!(horizontal_offset(AxisAlignment::PlusPlus, old, new), 250.0);
        assert_eq!(horizontal_offset(AxisAlignment::Plus, old, new), 150.0);
        assert_eq!(horizontal_offset(AxisAlignment::Center, old, new), 0.0);
        assert_eq!(horizontal_offset(AxisAlignment::Minus, old, new), -150.0);
        assert_eq!(horizontal_offset(AxisAlignment::MinusMinus, old, new), -250.0);
    }

    #[test]
    fn vertical_rules() {
        let mut cursor = Cursor::new();
        place(&mut cursor, Vec3::new(100.0, 300.0, 100.0), &[]);

        // next floor on the previous ceiling
        let mut up = cursor.clone();
        place(&mut up, Vec3::new(100.0, 200.0, 100.0), &["y++"]);
        assert_eq!(up.position().y, -300.0);

        // ceilings level
        let mut top = cursor.clone();
        place(&mut top, Vec3::new(100.0, 200.0, 100.0), &["y+"]);
        assert_eq!(top.position().y, -100.0);

        // centers level
        let mut mid = cursor.clone();
        place(&mut mid, Vec3::new(100.0, 200.0, 100.0), &["y"]);
        assert_eq!(mid.position().y, -50.0);

        // next ceiling on the previous floor
        let mut down = cursor.clone();
        place(&mut down, Vec3::new(100.0, 200.0, 100.0), &["y--"]);
        assert_eq!(down.position().y, 200.0);
    }

    #[test]
    fn last_alignment_per_axis_wins() {
        let mut cursor = Cursor::new();
        place(&mut cursor, Vec3::new(200.0, 100.0, 200.0), &[]);
        place(&mut cursor, Vec3::new(200.0, 100.0, 200.0), &["x++", "x--"]);
        assert_eq!(cursor.position().x, -200.0);
    }

    #[test]
    fn save_and_restore_round_trip() {
        let mut cursor = Cursor::new();
        place(&mut cursor, Vec3::new(500.0, 300.0, 500.0), &[]);
        cursor.set_new_size(Vec3::new(10.0, 20.0, 30.0));
        cursor.save_as("a");
        let saved = cursor.state();

        place(&mut cursor, Vec3::new(700.0, 100.0, 300.0), &["x++", "y++"]);
        place(&mut cursor, Vec3::new(100.0, 100.0, 100.0), &["z--"]);
        assert_ne!(cursor.state(), saved);

        assert!(cursor.restore("a"));
        assert_eq!(cursor.state(), saved);
        assert_eq!(cursor.state().new_size, Vec3::new(10.0, 20.0, 30.0));
    }

    #[test]
    fn restore_unknown_is_noop() {
        let mut cursor = Cursor::new();
        place(&mut cursor, Vec3::new(100.0, 100.0, 100.0), &["x++"]);
        let before = cursor.state();
        assert!(!cursor.restore("nope"));
        assert_eq!(cursor.state(), before);
    }
}
