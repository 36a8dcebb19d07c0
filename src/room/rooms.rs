//! The rooms collection and the union pass that stitches touching rooms.
//!
//! Union compares every pair of rooms whose boxes intersect and deletes the
//! polygons both rooms share, which opens a passage where two walls meet.
//! Only polygons lying entirely inside the other room's box are considered;
//! a polygon that straddles the box boundary is kept even if part of it
//! overlaps. Nothing is clipped.

use serde::{Deserialize, Serialize};

use crate::geometry::BoundingBox;

use super::Room;

/// Default tolerance for polygon equality during union, about 1.2e-4.
///
/// Flush faces of two rooms are computed from different anchors, so their
/// corners can differ by a few ulps. Far from the origin an f64 ulp is around
/// 1e-12, which `f64::EPSILON * 1e3` would not absorb. The f32 epsilon
/// scaled the same way does.
pub const DEFAULT_UNION_EPSILON: f64 = f32::EPSILON as f64 * 1e3;

/// All rooms placed by one compile, in placement order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rooms {
    rooms: Vec<Room>,
}

impl Rooms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_room(&mut self, room: Room) {
        self.rooms.push(room);
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Room> {
        self.rooms.get(index)
    }

    pub fn last_mut(&mut self) -> Option<&mut Room> {
        self.rooms.last_mut()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Room> {
        self.rooms.iter()
    }

    pub fn polygon_count(&self) -> usize {
        self.rooms.iter().map(Room::polygon_count).sum()
    }

    pub fn light_count(&self) -> usize {
        self.rooms.iter().map(|r| r.lights().len()).sum()
    }

    /// Box around every room. `None` when empty.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut iter = self.rooms.iter().map(Room::bounding_box);
        let first = iter.next()?;
        Some(iter.fold(first, |acc, bb| acc.union(&bb)))
    }

    /// Stitch touching rooms with the default tolerance.
    pub fn union_all(&mut self) -> usize {
        self.union_all_with_epsilon(DEFAULT_UNION_EPSILON)
    }

    /// Stitch touching rooms. Returns the number of polygons removed.
    ///
    /// Running it twice removes nothing the second time.
    pub fn union_all_with_epsilon(&mut self, epsilon: f64) -> usize {
        let mut removed = 0;
        let n = self.rooms.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (head, tail) = self.rooms.split_at_mut(j);
                removed += union_pair(&mut head[i], &mut tail[0], epsilon);
            }
        }
        tracing::debug!(rooms = n, removed, "union pass finished");
        removed
    }
}

impl<'a> IntoIterator for &'a Rooms {
    type Item = &'a Room;
    type IntoIter = std::slice::Iter<'a, Room>;

    fn into_iter(self) -> Self::IntoIter {
        self.rooms.iter()
    }
}

/// Remove the polygons `a` and `b` have in common from both rooms.
fn union_pair(a: &mut Room, b: &mut Room, epsilon: f64) -> usize {
    let a_box = a.bounding_box();
    let b_box = b.bounding_box();
    if !a_box.intersects(&b_box, epsilon) {
        return 0;
    }

    let mut from_a = Vec::new();
    let mut from_b = Vec::new();
    for (ia, pa) in a.polygons().iter().enumerate() {
        if !pa.is_within(&b_box, epsilon) {
            continue;
        }
        let matches = b
            .polygons()
            .iter()
            .enumerate()
            .filter(|(_, pb)| pb.is_within(&a_box, epsilon) && pa.coincides_with(pb, epsilon))
            .map(|(ib, _)| ib)
            .collect::<Vec<_>>();
        if !matches.is_empty() {
            from_a.push(ia);
            from_b.extend(matches);
        }
    }

    if from_a.is_empty() {
        return 0;
    }
    a.remove_polygons(&from_a) + b.remove_polygons(&from_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec3;
    use crate::room::{Face, RoomBuilder, RoomTextureDefinition, TextureAssignment};

    fn box_room(origin: Vec3, size: Vec3) -> Room {
        RoomBuilder::default().build(origin, size, &RoomTextureDefinition::default())
    }

    #[test]
    fn flush_rooms_lose_shared_wall() {
        let size = Vec3::new(500.0, 300.0, 500.0);
        let mut rooms = Rooms::new();
        rooms.add_room(box_room(Vec3::ZERO, size));
        rooms.add_room(box_room(Vec3::new(0.0, 0.0, 500.0), size));

        let removed = rooms.union_all();
        assert_eq!(removed, 30);

        let a = rooms.get(0).unwrap();
        let b = rooms.get(1).unwrap();
        assert_eq!(a.polygon_count(), 110 - 15);
        assert_eq!(b.polygon_count(), 110 - 15);
        // a's north wall and b's south wall are gone
        assert!(a.polygons().iter().all(|p| p.normal != Vec3::new(0.0, 0.0, -1.0)));
        assert!(b.polygons().iter().all(|p| p.normal != Vec3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn union_is_idempotent() {
        let size = Vec3::new(500.0, 300.0, 500.0);
        let mut rooms = Rooms::new();
        rooms.add_room(box_room(Vec3::ZERO, size));
        rooms.add_room(box_room(Vec3::new(500.0, 0.0, 0.0), size));
        rooms.union_all();
        let snapshot = rooms.clone();
        assert_eq!(rooms.union_all(), 0);
        assert_eq!(rooms, snapshot);
    }

    #[test]
    fn distant_rooms_are_untouched() {
        let size = Vec3::new(100.0, 100.0, 100.0);
        let mut rooms = Rooms::new();
        rooms.add_room(box_room(Vec3::ZERO, size));
        rooms.add_room(box_room(Vec3::new(1000.0, 0.0, 0.0), size));
        assert_eq!(rooms.union_all(), 0);
        assert_eq!(rooms.polygon_count(), 12);
    }

    #[test]
    fn narrower_room_opens_matching_tiles_only() {
        // 300 wide corridor against a 500 wide room: the middle three tiles
        // of each row line up.
        let mut rooms = Rooms::new();
        rooms.add_room(box_room(Vec3::ZERO, Vec3::new(500.0, 300.0, 500.0)));
        rooms.add_room(box_room(
            Vec3::new(0.0, 0.0, 400.0),
            Vec3::new(300.0, 300.0, 300.0),
        ));
        assert_eq!(rooms.union_all(), 18);
        let a = rooms.get(0).unwrap();
        let north = a
            .polygons()
            .iter()
            .filter(|p| p.normal == Vec3::new(0.0, 0.0, -1.0))
            .count();
        assert_eq!(north, 6);
    }

    #[test]
    fn misaligned_tiles_are_kept() {
        // 200 wide against 500 wide: tile edges never coincide.
        let mut rooms = Rooms::new();
        rooms.add_room(box_room(Vec3::ZERO, Vec3::new(500.0, 300.0, 500.0)));
        rooms.add_room(box_room(
            Vec3::new(0.0, 0.0, 350.0),
            Vec3::new(200.0, 300.0, 200.0),
        ));
        assert_eq!(rooms.union_all(), 0);
    }

    #[test]
    fn removed_face_leaves_counterpart_alone() {
        let size = Vec3::new(200.0, 200.0, 200.0);
        let mut open = RoomTextureDefinition::default();
        open.set(Face::WallSouth, TextureAssignment::removed());

        let mut rooms = Rooms::new();
        rooms.add_room(box_room(Vec3::ZERO, size));
        rooms.add_room(RoomBuilder::default().build(Vec3::new(0.0, 0.0, 200.0), size, &open));
        assert_eq!(rooms.union_all(), 0);
        assert_eq!(rooms.polygon_count(), 24 + 20);
    }

    #[test]
    fn bounding_box_and_counts() {
        let mut rooms = Rooms::new();
        assert!(rooms.bounding_box().is_none());
        rooms.add_room(box_room(Vec3::ZERO, Vec3::new(100.0, 100.0, 100.0)));
        rooms.add_room(box_room(
            Vec3::new(300.0, 0.0, 0.0),
            Vec3::new(100.0, 100.0, 100.0),
        ));
        let bb = rooms.bounding_box().unwrap();
        assert_eq!(bb.min, Vec3::new(-50.0, -100.0, -50.0));
        assert_eq!(bb.max, Vec3::new(350.0, 0.0, 50.0));
        assert_eq!(rooms.len(), 2);
        assert_eq!((&rooms).into_iter().count(), 2);
        assert_eq!(rooms.light_count(), 0);
    }

    #[test]
    fn stitches_far_from_origin() {
        let size = Vec3::new(300.0, 100.0, 300.0);
        let a = Vec3::new(12345.6, -0.3, 777.7);
        let b = Vec3::new(12345.6 + 300.0, -0.3, 777.7);
        let mut rooms = Rooms::new();
        rooms.add_room(box_room(a, size));
        rooms.add_room(box_room(b, size));
        assert_eq!(rooms.union_all(), 2 * 3);
    }
}
