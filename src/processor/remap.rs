//! Global tile id → tileset-local id.

use crate::model::{FLIP_DIAG, FLIP_HORZ, FLIP_MASK, FLIP_VERT, Tileset};

/// A raw tile value split into its masked gid and flip flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tile {
    pub gid: u32,
    pub flip_h: bool,
    pub flip_v: bool,
    pub flip_d: bool,
}

impl Tile {
    pub fn from_raw(raw: u32) -> Self {
        Self {
            gid: raw & !FLIP_MASK,
            flip_h: raw & FLIP_HORZ != 0,
            flip_v: raw & FLIP_VERT != 0,
            flip_d: raw & FLIP_DIAG != 0,
        }
    }
}

/// Sorted `[first_gid, last_gid]` ranges of every tileset in a map.
///
/// Ranges are kept in ascending `first_gid` order, so should a malformed
/// map have overlapping tilesets the one starting lowest wins.
#[derive(Debug, Clone, Default)]
pub struct GidTable {
    ranges: Vec<(u32, u32)>,
}

impl GidTable {
    pub fn new(tilesets: &[Tileset]) -> Self {
        let mut ranges: Vec<(u32, u32)> =
            tilesets.iter().map(|t| (t.first_gid, t.last_gid)).collect();
        ranges.sort_unstable();
        Self { ranges }
    }

    /// Local id of a masked gid, 1-based within its tileset. Gids outside
    /// every range pass through unchanged.
    pub fn lid_from_gid(&self, gid: u32) -> u32 {
        self.ranges
            .iter()
            .find(|&&(first, last)| first <= gid && gid <= last)
            .map_or(gid, |&(first, _)| gid - first + 1)
    }
}
