//! Multiblock geometry: facings, offset normalization, interaction routing.
//!
//! Stations occupy several world cells. Cell data (selection boxes, which
//! box is the seat) is authored for a North-facing structure; offsets
//! observed in the world are normalized back into that canonical space
//! before any lookup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Absolute world cell position of a station's control cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    /// World X.
    pub x: i32,
    /// World Y.
    pub y: i32,
    /// World Z.
    pub z: i32,
}

impl BlockPos {
    /// Create a new position.
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// Offset of a structure cell relative to the control cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellOffset {
    /// X delta from the control cell.
    pub x: i32,
    /// Y delta from the control cell.
    pub y: i32,
    /// Z delta from the control cell.
    pub z: i32,
}

impl CellOffset {
    /// Create a new offset.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// The four horizontal orientations a station can be placed in.
///
/// North is the authoring orientation; all canonical cell offsets are
/// expressed relative to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// -Z, the authoring orientation.
    North,
    /// +X.
    East,
    /// +Z.
    South,
    /// -X.
    West,
}

impl Facing {
    /// Parse a facing from its block-code suffix.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "north" => Some(Self::North),
            "east" => Some(Self::East),
            "south" => Some(Self::South),
            "west" => Some(Self::West),
            _ => None,
        }
    }

    /// Parse a facing, falling back to North for unrecognized codes.
    ///
    /// The fallback keeps geometry total: an unknown facing means the
    /// identity transform, never a failure.
    pub fn from_code_or_north(code: &str) -> Self {
        Self::from_code(code).unwrap_or_else(|| {
            warn!("unknown facing code {code:?}, defaulting to north");
            Self::North
        })
    }

    /// The block-code suffix for this facing.
    pub fn code(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
        }
    }

    /// Unit horizontal step in this direction.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// The opposite direction.
    pub fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Clockwise neighbor (viewed from above).
    pub fn clockwise(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    /// Counterclockwise neighbor (viewed from above).
    pub fn counterclockwise(self) -> Self {
        self.clockwise().opposite()
    }

    /// Candidate directions for placing a dismounting occupant: front
    /// first, then the two laterals, then behind.
    pub fn dismount_order(self) -> [Self; 4] {
        [
            self,
            self.counterclockwise(),
            self.clockwise(),
            self.opposite(),
        ]
    }
}

/// Rotate a canonical (North-authored) offset into world space for `facing`.
pub fn rotate(offset: CellOffset, facing: Facing) -> CellOffset {
    let CellOffset { x, y, z } = offset;
    match facing {
        Facing::North => offset,
        Facing::East => CellOffset::new(-z, y, x),
        Facing::South => CellOffset::new(-x, y, -z),
        Facing::West => CellOffset::new(z, y, -x),
    }
}

/// Map a raw world-space offset back to its canonical North-authored key.
///
/// This is the exact inverse of [`rotate`]; both are total and
/// side-effect free.
pub fn normalize(offset: CellOffset, facing: Facing) -> CellOffset {
    let CellOffset { x, y, z } = offset;
    match facing {
        Facing::North => offset,
        Facing::East => CellOffset::new(z, y, -x),
        Facing::South => CellOffset::new(-x, y, -z),
        Facing::West => CellOffset::new(-z, y, x),
    }
}

/// Axis-aligned box within a cell, in fractional cell units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub x1: f32,
    /// Minimum corner.
    pub y1: f32,
    /// Minimum corner.
    pub z1: f32,
    /// Maximum corner.
    pub x2: f32,
    /// Maximum corner.
    pub y2: f32,
    /// Maximum corner.
    pub z2: f32,
}

impl Aabb {
    /// Create a new box from min/max corners.
    pub const fn new(x1: f32, y1: f32, z1: f32, x2: f32, y2: f32, z2: f32) -> Self {
        Self {
            x1,
            y1,
            z1,
            x2,
            y2,
            z2,
        }
    }

    /// A full 1x1x1 cell box.
    pub const fn full_cell() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0)
    }
}

/// Per-cell data authored in canonical (North-facing) space.
#[derive(Debug, Clone)]
pub struct CellSpec {
    /// Selection boxes for this cell, indexed by selection-box index.
    pub boxes: Vec<Aabb>,
    /// Which box index, if any, mounts the occupant when interacted with.
    pub seat_box: Option<usize>,
}

impl CellSpec {
    /// A cell whose boxes all open the station interface.
    pub fn interface(boxes: Vec<Aabb>) -> Self {
        Self {
            boxes,
            seat_box: None,
        }
    }

    /// A cell where interacting with `seat_box` seats the actor.
    pub fn with_seat(boxes: Vec<Aabb>, seat_box: usize) -> Self {
        Self {
            boxes,
            seat_box: Some(seat_box),
        }
    }
}

/// What an interaction anywhere on the structure resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// Seat the actor at the station.
    Mount,
    /// Open the crafting interface.
    OpenInterface,
}

/// Canonical cell map for one station family.
#[derive(Debug, Clone, Default)]
pub struct MultiblockLayout {
    cells: HashMap<CellOffset, CellSpec>,
}

impl MultiblockLayout {
    /// Create an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a cell at its canonical offset.
    pub fn insert_cell(&mut self, offset: CellOffset, spec: CellSpec) {
        self.cells.insert(offset, spec);
    }

    /// Look up a cell by canonical offset.
    pub fn cell(&self, offset: CellOffset) -> Option<&CellSpec> {
        self.cells.get(&offset)
    }

    /// Selection boxes for a raw world-space offset.
    ///
    /// Unknown offsets fall back to the control cell's boxes.
    pub fn boxes_at(&self, raw: CellOffset, facing: Facing) -> &[Aabb] {
        let key = normalize(raw, facing);
        self.cells
            .get(&key)
            .or_else(|| self.cells.get(&CellOffset::new(0, 0, 0)))
            .map_or(&[], |cell| &cell.boxes)
    }

    /// Route a raw interaction offset to seat handling or the interface.
    ///
    /// Offsets outside the known cell map open the interface, matching the
    /// control-cell fallback used for box lookups.
    pub fn route_interaction(
        &self,
        raw: CellOffset,
        facing: Facing,
        box_index: usize,
    ) -> Interaction {
        let key = normalize(raw, facing);
        match self.cells.get(&key) {
            Some(cell) if cell.seat_box == Some(box_index) => Interaction::Mount,
            _ => Interaction::OpenInterface,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FACINGS: [Facing; 4] = [Facing::North, Facing::East, Facing::South, Facing::West];

    #[test]
    fn normalize_inverts_rotate_on_representative_offsets() {
        let offsets = [
            CellOffset::new(0, 0, 0),
            CellOffset::new(1, 0, 0),
            CellOffset::new(0, 0, -1),
            CellOffset::new(-1, 0, -1),
            CellOffset::new(1, 1, -1),
            CellOffset::new(2, 0, 3),
        ];
        for facing in FACINGS {
            for offset in offsets {
                assert_eq!(normalize(rotate(offset, facing), facing), offset);
            }
        }
    }

    proptest! {
        #[test]
        fn normalize_round_trips_for_any_offset(
            x in -8i32..8,
            y in -2i32..3,
            z in -8i32..8,
            facing_idx in 0usize..4,
        ) {
            let facing = FACINGS[facing_idx];
            let offset = CellOffset::new(x, y, z);
            prop_assert_eq!(normalize(rotate(offset, facing), facing), offset);
            prop_assert_eq!(rotate(normalize(offset, facing), facing), offset);
        }
    }

    #[test]
    fn unknown_facing_defaults_to_identity() {
        let facing = Facing::from_code_or_north("upside-down");
        assert_eq!(facing, Facing::North);

        let offset = CellOffset::new(1, 0, -1);
        assert_eq!(normalize(offset, facing), offset);
    }

    #[test]
    fn known_facing_codes_round_trip() {
        for facing in FACINGS {
            assert_eq!(Facing::from_code(facing.code()), Some(facing));
        }
    }

    fn bench_layout() -> MultiblockLayout {
        // Loom-like: a 3-wide frame at z=0, a 3-wide bench at z=-1 whose
        // box index 1 is the seat.
        let mut layout = MultiblockLayout::new();
        for x in -1..=1 {
            layout.insert_cell(
                CellOffset::new(x, 0, 0),
                CellSpec::interface(vec![Aabb::full_cell()]),
            );
            layout.insert_cell(
                CellOffset::new(x, 0, -1),
                CellSpec::with_seat(
                    vec![Aabb::full_cell(), Aabb::new(0.0, 0.0, 0.0, 1.0, 0.5, 1.0)],
                    1,
                ),
            );
        }
        layout
    }

    #[test]
    fn routing_finds_seat_across_rotations() {
        let layout = bench_layout();
        for facing in FACINGS {
            let raw = rotate(CellOffset::new(1, 0, -1), facing);
            assert_eq!(
                layout.route_interaction(raw, facing, 1),
                Interaction::Mount,
                "facing {:?}",
                facing
            );
            // Other box on the same cell is not the seat.
            assert_eq!(
                layout.route_interaction(raw, facing, 0),
                Interaction::OpenInterface
            );
        }
    }

    #[test]
    fn routing_defaults_to_interface_off_structure() {
        let layout = bench_layout();
        let raw = CellOffset::new(5, 0, 5);
        assert_eq!(
            layout.route_interaction(raw, Facing::North, 0),
            Interaction::OpenInterface
        );
    }

    #[test]
    fn box_lookup_falls_back_to_control_cell() {
        let mut layout = MultiblockLayout::new();
        let control = vec![Aabb::full_cell()];
        layout.insert_cell(CellOffset::new(0, 0, 0), CellSpec::interface(control));

        assert_eq!(layout.boxes_at(CellOffset::new(7, 0, 0), Facing::East).len(), 1);
    }
}
