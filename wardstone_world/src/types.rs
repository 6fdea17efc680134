// Core spatial types shared across the visualization engine.
//
// Defines block coordinates (`BlockCoord`), inclusive axis-aligned boxes
// (`BoundingBox`), cardinal facings, and compact identifier newtypes for
// players and worlds. All types derive `Serialize` and `Deserialize` so
// boundary snapshots and config values can cross process boundaries.
//
// The coordinate system uses the usual voxel-game conventions:
// - X: east  (positive) / west  (negative)
// - Y: up    (positive) / down  (negative)
// - Z: south (positive) / north (negative)

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Block coordinates
// ---------------------------------------------------------------------------

/// A position in the world's block grid. Immutable value type; equality,
/// hashing, and ordering are by component value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The coordinate offset by the given deltas on each axis.
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// The coordinate `n` blocks above this one.
    pub const fn up(self, n: i32) -> Self {
        self.offset(0, n, 0)
    }

    /// The coordinate `n` blocks below this one.
    pub const fn down(self, n: i32) -> Self {
        self.offset(0, -n, 0)
    }

    /// This coordinate with its Y component replaced.
    pub const fn with_y(self, y: i32) -> Self {
        Self::new(self.x, y, self.z)
    }

    /// Squared Euclidean distance between two coordinates. Avoids the float
    /// conversion when only comparisons against a squared radius are needed.
    pub fn distance_squared(self, other: Self) -> i64 {
        let dx = i64::from(self.x - other.x);
        let dy = i64::from(self.y - other.y);
        let dz = i64::from(self.z - other.z);
        dx * dx + dy * dy + dz * dz
    }
}

impl fmt::Display for BlockCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// Bounding boxes
// ---------------------------------------------------------------------------

/// An axis-aligned box of blocks, inclusive on both ends.
///
/// Invariant: `min <= max` component-wise. The constructor normalizes its
/// arguments, so any two opposite corners produce a valid box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    min: BlockCoord,
    max: BlockCoord,
}

impl BoundingBox {
    /// Build a box from two opposite corners, in any order.
    pub fn new(a: BlockCoord, b: BlockCoord) -> Self {
        Self {
            min: BlockCoord::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: BlockCoord::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    pub const fn min(&self) -> BlockCoord {
        self.min
    }

    pub const fn max(&self) -> BlockCoord {
        self.max
    }

    /// Number of blocks spanned on the X axis (inclusive).
    pub const fn width(&self) -> i32 {
        self.max.x - self.min.x + 1
    }

    /// Number of blocks spanned on the Z axis (inclusive).
    pub const fn length(&self) -> i32 {
        self.max.z - self.min.z + 1
    }

    /// Number of blocks spanned on the Y axis (inclusive).
    pub const fn height(&self) -> i32 {
        self.max.y - self.min.y + 1
    }

    /// Whether the coordinate lies inside the box (inclusive).
    pub fn contains(&self, coord: BlockCoord) -> bool {
        coord.x >= self.min.x
            && coord.x <= self.max.x
            && coord.y >= self.min.y
            && coord.y <= self.max.y
            && coord.z >= self.min.z
            && coord.z <= self.max.z
    }

    /// The overlap of two boxes. Returns `None` when they are disjoint on
    /// any axis.
    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        let min = BlockCoord::new(
            self.min.x.max(other.min.x),
            self.min.y.max(other.min.y),
            self.min.z.max(other.min.z),
        );
        let max = BlockCoord::new(
            self.max.x.min(other.max.x),
            self.max.y.min(other.max.y),
            self.max.z.min(other.max.z),
        );
        if min.x > max.x || min.y > max.y || min.z > max.z {
            return None;
        }
        Some(BoundingBox { min, max })
    }
}

// ---------------------------------------------------------------------------
// Cardinal facings
// ---------------------------------------------------------------------------

/// Horizontal cardinal direction, used to orient directional display blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

// ---------------------------------------------------------------------------
// Identifier newtypes
// ---------------------------------------------------------------------------

/// Compact identifier for a connected player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

/// Compact identifier for a loaded world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorldId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player({})", self.0)
    }
}
