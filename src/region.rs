//! Region Enumerator
//!
//! Turns an operator-supplied block rectangle into an inclusive rectangle of
//! tile coordinates, and enumerates those tiles in row-major order (x varies
//! fastest, then z). Enumeration can restart from any cursor, which is how a
//! job resumes between batches.

use crate::host::WorldRef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A tile coordinate (chunk position).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TilePos {
    pub x: i32,
    pub z: i32,
}

impl TilePos {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

impl fmt::Display for TilePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Raw block-granularity bounds as typed by the operator.
///
/// Min and max are not required to be ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockBounds {
    pub min_x: i32,
    pub min_z: i32,
    pub max_x: i32,
    pub max_z: i32,
}

impl BlockBounds {
    pub fn new(min_x: i32, min_z: i32, max_x: i32, max_z: i32) -> Self {
        Self {
            min_x,
            min_z,
            max_x,
            max_z,
        }
    }
}

/// How block coordinates map onto tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    /// Alignment granularity in blocks.
    pub granularity: i32,
    /// Arithmetic right shift converting aligned blocks to tile units.
    pub shift: u32,
}

impl Default for TileGrid {
    fn default() -> Self {
        Self {
            granularity: 16,
            shift: 4,
        }
    }
}

/// Round `n` down to a multiple of `m` (towards negative infinity).
pub fn align_floor(n: i64, m: i64) -> i64 {
    n.div_euclid(m) * m
}

/// Round `n` up to a multiple of `m` (towards positive infinity).
pub fn align_ceil(n: i64, m: i64) -> i64 {
    let floor = align_floor(n, m);
    if floor == n {
        floor
    } else {
        floor + m
    }
}

/// An immutable, inclusive rectangle of tiles in one world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    world: WorldRef,
    min: TilePos,
    max: TilePos,
}

impl Region {
    /// Build a region directly from inclusive tile bounds, swapping reversed axes.
    pub fn from_tiles(world: WorldRef, a: TilePos, b: TilePos) -> Self {
        Self {
            world,
            min: TilePos::new(a.x.min(b.x), a.z.min(b.z)),
            max: TilePos::new(a.x.max(b.x), a.z.max(b.z)),
        }
    }

    /// Align operator block bounds to the tile grid.
    ///
    /// Minimums are floored and maximums ceiled to the grid granularity, so
    /// every block the operator named lies inside the resulting region.
    pub fn from_blocks(world: WorldRef, bounds: BlockBounds, grid: TileGrid) -> Self {
        let g = i64::from(grid.granularity.max(1));
        let (lo_x, hi_x) = ordered(bounds.min_x, bounds.max_x);
        let (lo_z, hi_z) = ordered(bounds.min_z, bounds.max_z);

        let min_x = align_floor(lo_x, g) >> grid.shift;
        let min_z = align_floor(lo_z, g) >> grid.shift;
        // The ceiling of the exclusive edge, minus one, is the inclusive last tile.
        let max_x = (align_ceil(hi_x + 1, g) >> grid.shift) - 1;
        let max_z = (align_ceil(hi_z + 1, g) >> grid.shift) - 1;

        Self::from_tiles(
            world,
            TilePos::new(clamp_i32(min_x), clamp_i32(min_z)),
            TilePos::new(clamp_i32(max_x.max(min_x)), clamp_i32(max_z.max(min_z))),
        )
    }

    pub fn world(&self) -> &WorldRef {
        &self.world
    }

    pub fn min(&self) -> TilePos {
        self.min
    }

    pub fn max(&self) -> TilePos {
        self.max
    }

    pub fn width(&self) -> u64 {
        (i64::from(self.max.x) - i64::from(self.min.x) + 1) as u64
    }

    pub fn depth(&self) -> u64 {
        (i64::from(self.max.z) - i64::from(self.min.z) + 1) as u64
    }

    /// Total number of tiles; always at least one. Saturates for the full i32 plane.
    pub fn total_tiles(&self) -> u64 {
        self.width().saturating_mul(self.depth())
    }

    pub fn contains(&self, pos: TilePos) -> bool {
        (self.min.x..=self.max.x).contains(&pos.x) && (self.min.z..=self.max.z).contains(&pos.z)
    }

    /// The first tile in enumeration order.
    pub fn start(&self) -> TilePos {
        self.min
    }

    /// The tile after `pos` in row-major order, or `None` past the last row.
    pub fn successor(&self, pos: TilePos) -> Option<TilePos> {
        if pos.x < self.max.x {
            Some(TilePos::new(pos.x + 1, pos.z))
        } else if pos.z < self.max.z {
            Some(TilePos::new(self.min.x, pos.z + 1))
        } else {
            None
        }
    }

    /// Enumerate every tile from the start of the region.
    pub fn tiles(&self) -> RegionTiles<'_> {
        self.tiles_from(Some(self.start()))
    }

    /// Resume enumeration at `cursor`; `None` yields nothing.
    pub fn tiles_from(&self, cursor: Option<TilePos>) -> RegionTiles<'_> {
        RegionTiles {
            region: self,
            cursor,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}..{}", self.world, self.min, self.max)
    }
}

/// Row-major tile iterator over a [`Region`].
#[derive(Debug, Clone)]
pub struct RegionTiles<'a> {
    region: &'a Region,
    cursor: Option<TilePos>,
}

impl RegionTiles<'_> {
    /// Next tile that would be yielded; `None` once exhausted.
    pub fn cursor(&self) -> Option<TilePos> {
        self.cursor
    }
}

impl Iterator for RegionTiles<'_> {
    type Item = TilePos;

    fn next(&mut self) -> Option<TilePos> {
        let current = self.cursor?;
        self.cursor = self.region.successor(current);
        Some(current)
    }
}

fn ordered(a: i32, b: i32) -> (i64, i64) {
    if a <= b {
        (i64::from(a), i64::from(b))
    } else {
        (i64::from(b), i64::from(a))
    }
}

fn clamp_i32(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
