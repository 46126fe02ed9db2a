//! Packing decoded layers into the GBA's output records.
//!
//! Graphics (screen entries, 16 bit):
//!
//! ```text
//!  15..12    11   10   9..0
//! palette-1  V    H    tile index
//! ```
//!
//! Collision is one byte per tile, objects are `(id, x, y)` word triples with
//! coordinates in 8.8 fixed point.

use std::collections::BTreeMap;

use crate::model::{Layer, Object};

use super::remap::{GidTable, Tile};

const TILE_INDEX_MASK: u16 = 0x03FF;
const SE_FLIP_H: u16 = 0x0400;
const SE_FLIP_V: u16 = 0x0800;

/// Pack one screen entry. `palette` is 1-based (1..=16).
pub fn pack_screen_entry(index: u16, flip_h: bool, flip_v: bool, palette: u32) -> u16 {
    let mut entry = index & TILE_INDEX_MASK;
    if flip_h {
        entry |= SE_FLIP_H;
    }
    if flip_v {
        entry |= SE_FLIP_V;
    }
    entry | ((palette.wrapping_sub(1) & 0xF) as u16) << 12
}

/// Graphics layer → screen entries, one per map tile.
///
/// Palette number (1-based) comes from `palette_layer` at the same position
/// when that tile is set, `default_palette` otherwise.
pub fn convert_charmap(
    graphics: &Layer,
    palette_layer: Option<&Layer>,
    tile_count: usize,
    table: &GidTable,
    offset: i32,
    default_palette: u32,
) -> Vec<u16> {
    (0..tile_count)
        .map(|i| {
            let tile = Tile::from_raw(graphics.tile(i));
            let index = (i64::from(table.lid_from_gid(tile.gid)) + i64::from(offset)).max(0);

            let palette = palette_layer
                .map(|layer| table.lid_from_gid(Tile::from_raw(layer.tile(i)).gid))
                .filter(|&lid| lid != 0)
                .unwrap_or(default_palette);

            pack_screen_entry(index as u16, tile.flip_h, tile.flip_v, palette)
        })
        .collect()
}

/// Collision layer → one byte per map tile.
pub fn convert_collision(collision: &Layer, tile_count: usize, table: &GidTable) -> Vec<u8> {
    (0..tile_count)
        .map(|i| table.lid_from_gid(Tile::from_raw(collision.tile(i)).gid) as u8)
        .collect()
}

/// 8.8 fixed point, rounded toward zero.
pub fn to_fixed(value: f64) -> u32 {
    (value * 256.0) as i32 as u32
}

/// Objects whose name appears in `mapping` → `(id, x, y)` triples.
pub fn convert_objects<'a>(
    objects: impl IntoIterator<Item = &'a Object>,
    mapping: &BTreeMap<String, u32>,
) -> Vec<u32> {
    objects
        .into_iter()
        .filter_map(|obj| {
            let &id = mapping.get(&obj.name)?;
            Some([id, to_fixed(obj.x), to_fixed(obj.y)])
        })
        .flatten()
        .collect()
}
