//! Tile coordinates in the XYZ (slippy map) scheme.

use std::fmt;
use std::ops::RangeInclusive;

/// Highest zoom level accepted when enumerating tiles.
pub const MAX_ZOOM: u8 = 24;

/// A tile in the XYZ grid.
///
/// - `x` increases eastward from the antimeridian
/// - `y` increases southward from the north edge
/// - both are in `0..2^z`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl TileCoord {
    /// Create a tile coordinate. No range check is done; see [`is_valid`](Self::is_valid).
    pub fn new(x: u32, y: u32, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Number of tiles along one axis at zoom `z`.
    pub fn grid_size(z: u8) -> u64 {
        1u64 << z.min(MAX_ZOOM)
    }

    /// Whether `x` and `y` fall inside the grid for `z`.
    pub fn is_valid(&self) -> bool {
        self.z <= MAX_ZOOM
            && u64::from(self.x) < Self::grid_size(self.z)
            && u64::from(self.y) < Self::grid_size(self.z)
    }

    /// Clip a block to the grid at zoom `z`.
    ///
    /// Returns `None` when no part of the block lies inside the grid.
    pub fn clip(
        z: u8,
        xs: RangeInclusive<u32>,
        ys: RangeInclusive<u32>,
    ) -> Option<(RangeInclusive<u32>, RangeInclusive<u32>)> {
        if z > MAX_ZOOM {
            return None;
        }
        // MAX_ZOOM keeps the last index within u32.
        let max = (Self::grid_size(z) - 1) as u32;
        let clip_axis = |r: RangeInclusive<u32>| {
            let (start, end) = r.into_inner();
            let end = end.min(max);
            (start <= end).then_some(start..=end)
        };
        Some((clip_axis(xs)?, clip_axis(ys)?))
    }

    /// Number of in-grid tiles in a block, without enumerating it.
    pub fn count(z: u8, xs: RangeInclusive<u32>, ys: RangeInclusive<u32>) -> u64 {
        match Self::clip(z, xs, ys) {
            Some((xs, ys)) => {
                let span = |r: &RangeInclusive<u32>| u64::from(r.end() - r.start()) + 1;
                span(&xs) * span(&ys)
            }
            None => 0,
        }
    }

    /// Enumerate a rectangular block of tiles at one zoom level, row by row.
    ///
    /// The block is clipped to the grid first; see [`count`](Self::count) to
    /// size it before allocating.
    pub fn range(z: u8, xs: RangeInclusive<u32>, ys: RangeInclusive<u32>) -> Vec<TileCoord> {
        let Some((xs, ys)) = Self::clip(z, xs, ys) else {
            return Vec::new();
        };
        ys.flat_map(|y| xs.clone().map(move |x| TileCoord::new(x, y, z)))
            .collect()
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.x, self.y, self.z)
    }
}
