//! `.tmx` document → [`TiledMap`].
//!
//! The document is walked once; each top-level child of `<map>` goes to a
//! small reader by tag name. Readers are tolerant: a tileset, layer or object
//! group that cannot be read is dropped and the rest of the map still loads.
//! Only an unreadable file or a document without a `<map>` root fails.

pub mod decode;
pub mod gzip;
pub mod node;
pub mod numeric;

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use roxmltree::Document;
use thiserror::Error;

use crate::model::{Layer, Object, ObjectGroup, TiledMap, Tileset};
use node::XmlNode;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed document: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("document has no <map> root element")]
    NoMap,
}

/// Read and parse the map at `path`. External tilesets are resolved relative
/// to the map's directory.
pub fn load(path: &Path) -> Result<TiledMap, LoadError> {
    let xml = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("File loaded, size: {} bytes", xml.len());
    load_from_str(&xml, path.parent())
}

pub fn load_from_str(xml: &str, base_dir: Option<&Path>) -> Result<TiledMap, LoadError> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();
    if root.tag_name().name() != "map" {
        return Err(LoadError::NoMap);
    }
    let map_node = XmlNode::new(root);

    let mut map = TiledMap {
        width: map_node.attr_uint("width"),
        height: map_node.attr_uint("height"),
        ..Default::default()
    };

    for child in map_node.elements() {
        match child.tag() {
            "tileset" => {
                if let Some(tileset) = read_tileset(child, base_dir) {
                    map.tilesets.push(tileset);
                }
            }
            "layer" => {
                if let Some(layer) = read_layer(child) {
                    map.layers.push(layer);
                }
            }
            "objectgroup" => {
                if let Some(group) = read_object_group(child) {
                    map.object_groups.push(group);
                }
            }
            _ => {}
        }
    }

    info!(
        "Map {}x{}: {} tilesets, {} layers, {} object groups",
        map.width,
        map.height,
        map.tilesets.len(),
        map.layers.len(),
        map.object_groups.len()
    );
    Ok(map)
}

fn read_tileset(node: XmlNode, base_dir: Option<&Path>) -> Option<Tileset> {
    let source = node.attr("source");
    let first_gid = node.attr_uint("firstgid");
    let mut name = node.attr("name").to_string();

    let tile_count = if node.has_attr("lastgid") {
        let last_gid = node.attr_uint("lastgid");
        last_gid.checked_sub(first_gid).map_or(0, |n| n + 1)
    } else if node.has_attr("tilecount") || source.is_empty() {
        node.attr_uint("tilecount")
    } else {
        // Tile count lives in the external .tsx
        match read_external_tileset(source, base_dir) {
            Some((external_name, count)) => {
                if name.is_empty() {
                    name = external_name;
                }
                count
            }
            None => 0,
        }
    };

    let tileset = Tileset::new(&name, source, first_gid, tile_count);
    if tileset.is_none() {
        debug!("Skipping tileset `{name}`: no tiles");
    }
    tileset
}

fn read_external_tileset(source: &str, base_dir: Option<&Path>) -> Option<(String, u32)> {
    let path = match base_dir {
        Some(dir) => dir.join(source),
        None => PathBuf::from(source),
    };
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) => {
            debug!("Cannot read external tileset {}: {e}", path.display());
            return None;
        }
    };
    let doc = match Document::parse(&text) {
        Ok(doc) => doc,
        Err(e) => {
            debug!("Malformed external tileset {}: {e}", path.display());
            return None;
        }
    };
    let root = XmlNode::new(doc.root_element());
    if root.tag() != "tileset" {
        return None;
    }
    Some((root.attr("name").to_string(), root.attr_uint("tilecount")))
}

fn read_layer(node: XmlNode) -> Option<Layer> {
    let name = node.attr("name").to_string();
    let width = node.attr_uint("width");
    let height = node.attr_uint("height");

    let data = node.first_child("data").filter(|d| !d.is_empty());
    let Some(data) = data else {
        debug!("Skipping layer `{name}`: no tile data");
        return None;
    };

    // The decoded grid must stay byte-addressable
    let expected = (width as usize)
        .checked_mul(height as usize)
        .filter(|n| n.checked_mul(4).is_some());
    let Some(expected) = expected else {
        debug!("Skipping layer `{name}`: {width}x{height} is too large");
        return None;
    };
    match decode::decode_data(data, expected) {
        Ok(tiles) => Some(Layer {
            name,
            width,
            height,
            tiles,
        }),
        Err(e) => {
            debug!("Skipping layer `{name}`: {e}");
            None
        }
    }
}

fn read_object_group(node: XmlNode) -> Option<ObjectGroup> {
    let name = node.attr("name").to_string();
    let objects: Vec<Object> = node
        .children_named("object")
        .map(|obj| Object {
            id: obj.attr_uint("id"),
            name: obj.attr("name").to_string(),
            x: obj.attr_float("x"),
            y: obj.attr_float("y"),
            width: obj.attr_float("width"),
            height: obj.attr_float("height"),
        })
        .collect();

    if objects.is_empty() {
        debug!("Skipping object group `{name}`: no objects");
        return None;
    }
    Some(ObjectGroup { name, objects })
}
