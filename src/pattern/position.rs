use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer block coordinates in world space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockPosition {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPosition {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Position shifted by `(dx, dy, dz)`, saturating at the i32 range
    pub fn offset(self, (dx, dy, dz): (i32, i32, i32)) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            z: self.z.saturating_add(dz),
        }
    }
}

impl From<(i32, i32, i32)> for BlockPosition {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for BlockPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// One of the three grid axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// True if `pos` lies on the line through `origin` parallel to this axis
    pub fn is_aligned(self, origin: BlockPosition, pos: BlockPosition) -> bool {
        match self {
            Axis::X => pos.y == origin.y && pos.z == origin.z,
            Axis::Y => pos.x == origin.x && pos.z == origin.z,
            Axis::Z => pos.x == origin.x && pos.y == origin.y,
        }
    }
}

/// Grid adjacency used when expanding a vein
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    /// 6 face-adjacent neighbours
    #[default]
    Face,
    /// All 26 surrounding positions (faces, edges and corners)
    Full,
}

const FACE_OFFSETS: [(i32, i32, i32); 6] = [
    (1, 0, 0),
    (-1, 0, 0),
    (0, 1, 0),
    (0, -1, 0),
    (0, 0, 1),
    (0, 0, -1),
];

const FULL_OFFSETS: [(i32, i32, i32); 26] = full_offsets();

const fn full_offsets() -> [(i32, i32, i32); 26] {
    let mut offsets = [(0, 0, 0); 26];
    let mut i = 0;
    let mut dx = -1;
    while dx <= 1 {
        let mut dy = -1;
        while dy <= 1 {
            let mut dz = -1;
            while dz <= 1 {
                if dx != 0 || dy != 0 || dz != 0 {
                    offsets[i] = (dx, dy, dz);
                    i += 1;
                }
                dz += 1;
            }
            dy += 1;
        }
        dx += 1;
    }
    offsets
}

impl Connectivity {
    /// Neighbour offsets in a fixed order, so traversal order is deterministic
    pub fn offsets(self) -> &'static [(i32, i32, i32)] {
        match self {
            Connectivity::Face => &FACE_OFFSETS,
            Connectivity::Full => &FULL_OFFSETS,
        }
    }
}
