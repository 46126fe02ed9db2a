//! The functional core: layer selection and conversion.
//!
//! Picks the graphics / palette / collision layers the caller asked for out
//! of a loaded [`TiledMap`] and packs them into the output arrays.
pub mod convert;
pub mod remap;

use log::info;
use thiserror::Error;

use crate::config::Params;
use crate::model::TiledMap;
use crate::parser::{self, LoadError};
use remap::GidTable;

/// Why a conversion could not produce output.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Failed to load input file: {0}")]
    LoadFailed(#[from] LoadError),
    #[error("No tile layer found")]
    NoLayers,
    #[error("Graphics layer `{0}` not found")]
    GraphicsNotFound(String),
    #[error("Palette layer `{0}` not found")]
    PaletteNotFound(String),
    #[error("Collision layer `{0}` not found")]
    CollisionNotFound(String),
}

/// Fully converted map handed to `writer`.
#[derive(Debug, Clone, PartialEq)]
pub struct Converted {
    /// Map size in tiles
    pub width: u32,
    pub height: u32,
    pub tiles: Vec<u16>,
    pub collision: Option<Vec<u8>>,
    pub objects: Option<Vec<u32>>,
}

/// Load `params.input` and convert it.
pub fn run(params: &Params) -> Result<Converted, ConvertError> {
    let map = parser::load(&params.input)?;
    convert_map(&map, params)
}

/// Runs every conversion pass over an already loaded map.
pub fn convert_map(map: &TiledMap, params: &Params) -> Result<Converted, ConvertError> {
    if map.layers.is_empty() {
        return Err(ConvertError::NoLayers);
    }

    let graphics = match &params.graphics_layer {
        Some(name) => map
            .layer(name)
            .ok_or_else(|| ConvertError::GraphicsNotFound(name.clone()))?,
        None => &map.layers[0],
    };
    let palette = params
        .palette_layer
        .as_deref()
        .map(|name| map.layer(name).ok_or_else(|| ConvertError::PaletteNotFound(name.to_string())))
        .transpose()?;
    let collision = params
        .collision_layer
        .as_deref()
        .map(|name| map.layer(name).ok_or_else(|| ConvertError::CollisionNotFound(name.to_string())))
        .transpose()?;

    let table = GidTable::new(&map.tilesets);
    let count = map.tile_count();

    info!("Converting layer `{}` ({count} tiles)", graphics.name);
    let tiles = convert::convert_charmap(
        graphics,
        palette,
        count,
        &table,
        params.offset,
        u32::from(params.palette) + 1,
    );

    let collision = collision.map(|layer| {
        info!("Converting collision layer `{}`", layer.name);
        convert::convert_collision(layer, count, &table)
    });

    let objects = params.objects.as_ref().map(|mapping| {
        let objects = convert::convert_objects(map.objects(), mapping);
        info!("Converted {} objects", objects.len() / 3);
        objects
    });

    Ok(Converted {
        width: map.width,
        height: map.height,
        tiles,
        collision,
        objects,
    })
}
