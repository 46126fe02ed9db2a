//! In-memory map model built by [`crate::parser`].
//!
//! Everything here is plain owned data: tile buffers are moved in from the
//! decoder and handed on to the converter, nothing points back at its map.

/// Raw tile value flags (three most significant bits of a gid).
pub const FLIP_HORZ: u32 = 0x8000_0000;
pub const FLIP_VERT: u32 = 0x4000_0000;
pub const FLIP_DIAG: u32 = 0x2000_0000;
pub const FLIP_MASK: u32 = FLIP_HORZ | FLIP_VERT | FLIP_DIAG;

/// A tileset's slot in the shared gid space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tileset {
    pub name: String,
    pub source: String,
    /// Inclusive range `[first_gid, last_gid]`
    pub first_gid: u32,
    pub last_gid: u32,
}

impl Tileset {
    /// Builds a tileset covering `tile_count` ids, or `None` when it holds no
    /// tiles at all.
    pub fn new(name: &str, source: &str, first_gid: u32, tile_count: u32) -> Option<Self> {
        if tile_count == 0 {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            source: source.to_string(),
            first_gid,
            last_gid: first_gid.checked_add(tile_count - 1)?,
        })
    }

    pub fn contains(&self, gid: u32) -> bool {
        (self.first_gid..=self.last_gid).contains(&gid)
    }
}

/// One tile grid, row-major, raw gids including flip flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub tiles: Vec<u32>,
}

impl Layer {
    /// Tile at `index`, or 0 (no tile) past the end of a short layer.
    pub fn tile(&self, index: usize) -> u32 {
        self.tiles.get(index).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub id: u32,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectGroup {
    pub name: String,
    pub objects: Vec<Object>,
}

/// Entire map as read from a `.tmx` document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TiledMap {
    /// Size in tiles
    pub width: u32,
    pub height: u32,
    pub tilesets: Vec<Tileset>,
    pub layers: Vec<Layer>,
    pub object_groups: Vec<ObjectGroup>,
}

impl TiledMap {
    pub fn tile_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    pub fn objects(&self) -> impl Iterator<Item = &Object> {
        self.object_groups.iter().flat_map(|g| g.objects.iter())
    }
}
