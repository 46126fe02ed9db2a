use std::io::Write;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::write::{GzEncoder, ZlibEncoder};

use tmx2gba::parser::{load, load_from_str};

const TILES: [u32; 4] = [1, 0x8000_0002, 33, 0];

fn tile_bytes() -> Vec<u8> {
    TILES.iter().flat_map(|t| t.to_le_bytes()).collect()
}

fn map_with_data(encoding: &str, compression: &str, payload: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<map version="1.10" width="2" height="2">
 <tileset firstgid="1" name="t" tilecount="64"/>
 <layer id="1" name="Layer 1" width="2" height="2">
  <data encoding="{encoding}" compression="{compression}">
   {payload}
  </data>
 </layer>
</map>"#
    )
}

fn load_tiles(xml: &str) -> Vec<u32> {
    let map = load_from_str(xml, None).expect("valid map");
    assert_eq!(map.layers.len(), 1, "layer should decode");
    map.layers[0].tiles.clone()
}

#[test]
fn loads_fixture_map() {
    let map = load(Path::new("tests/level.tmx")).expect("fixture loads");
    assert_eq!((map.width, map.height), (4, 2));

    // first tileset resolved through tiles.tsx
    assert_eq!(map.tilesets.len(), 3);
    assert_eq!(map.tilesets[0].name, "terrain");
    assert_eq!((map.tilesets[0].first_gid, map.tilesets[0].last_gid), (1, 32));

    // brotli layer "Sky" is dropped
    let names: Vec<_> = map.layers.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, ["Ground", "Palette", "Walls"]);

    assert_eq!(
        map.layer("Ground").unwrap().tiles,
        vec![1, 2, 3, 0, 0x8000_0005, 5, 6, 7]
    );
    assert_eq!(
        map.layer("Palette").unwrap().tiles,
        vec![35, 0, 0, 0, 0, 0, 0, 34]
    );

    let objects: Vec<_> = map.objects().map(|o| (o.name.as_str(), o.x, o.y)).collect();
    assert_eq!(
        objects,
        [("Spawn", 16.0, 8.0), ("Coin", 24.5, 0.0), ("Tree", 0.0, 0.0)]
    );
}

#[test]
fn decodes_csv_and_xml() {
    let csv = map_with_data("csv", "", "1,2147483650,\n33,0");
    assert_eq!(load_tiles(&csv), TILES);

    let xml = r#"<map width="2" height="2">
 <layer name="x" width="2" height="2">
  <data><tile gid="1"/><tile gid="2147483650"/><tile gid="33"/><tile/></data>
 </layer>
</map>"#;
    assert_eq!(load_tiles(xml), TILES);
}

#[test]
fn decodes_plain_base64() {
    let xml = map_with_data("base64", "", &STANDARD.encode(tile_bytes()));
    assert_eq!(load_tiles(&xml), TILES);
}

#[test]
fn decodes_gzip() {
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(&tile_bytes()).unwrap();
    let xml = map_with_data("base64", "gzip", &STANDARD.encode(enc.finish().unwrap()));
    assert_eq!(load_tiles(&xml), TILES);
}

#[test]
fn decodes_zlib() {
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::best());
    enc.write_all(&tile_bytes()).unwrap();
    let xml = map_with_data("base64", "zlib", &STANDARD.encode(enc.finish().unwrap()));
    assert_eq!(load_tiles(&xml), TILES);
}

#[test]
fn decodes_zstd() {
    let packed = zstd::bulk::compress(&tile_bytes(), 3).unwrap();
    let xml = map_with_data("base64", "zstd", &STANDARD.encode(packed));
    assert_eq!(load_tiles(&xml), TILES);
}

#[test]
fn corrupt_gzip_drops_layer() {
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(&tile_bytes()).unwrap();
    let mut gz = enc.finish().unwrap();
    // CRC32 in the footer
    let crc = gz.len() - 8;
    gz[crc] ^= 0xFF;

    let xml = map_with_data("base64", "gzip", &STANDARD.encode(gz));
    let map = load_from_str(&xml, None).expect("document still loads");
    assert!(map.layers.is_empty());
    assert_eq!(map.tilesets.len(), 1);
}

#[test]
fn unsupported_compression_drops_layer() {
    let xml = map_with_data("base64", "brotli", "AQAAAAIAAAA=");
    let map = load_from_str(&xml, None).expect("document still loads");
    assert!(map.layers.is_empty());
}
