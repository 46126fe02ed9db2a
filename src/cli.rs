use clap::Parser;
use std::path::PathBuf;

use crate::config::{parse_object_mapping, parse_offset};

#[derive(Parser, Debug)]
#[command(name = "tmx2gba", author, version)]
#[command(about = "Convert Tiled .tmx maps to GBA charmap, collision and object data")]
#[command(after_help = "Examples:\n  \
  tmx2gba -i level.tmx -o build/level              first layer, palette 0\n  \
  tmx2gba -i level.tmx -o build/level -l Ground -c Walls -p 2\n  \
  tmx2gba -f level.json -m Spawn@1 -m Coin@2       parameters from file")]
pub struct Cli {
    /// Path to input TMX file
    #[arg(short = 'i', value_name = "inpath")]
    pub input: Option<PathBuf>,

    /// Path to output files (stem names the symbols)
    #[arg(short = 'o', value_name = "outpath")]
    pub output: Option<PathBuf>,

    /// Name of layer to use (default first layer in TMX)
    #[arg(short = 'l', value_name = "name")]
    pub layer: Option<String>,

    /// Output a separate 8bit collision map of the specified layer
    #[arg(short = 'c', value_name = "name")]
    pub collision: Option<String>,

    /// Layer to use for selecting the 16 colour palette per-tile
    #[arg(short = 'y', value_name = "name")]
    pub palette_layer: Option<String>,

    /// Offset tile indices (default 0)
    #[arg(
        short = 'r',
        value_name = "offset",
        allow_negative_numbers = true,
        value_parser = parse_offset
    )]
    pub offset: Option<i32>,

    /// Select which palette to use for 4-bit tilesets
    #[arg(short = 'p', value_name = "0-15", value_parser = clap::value_parser!(u8).range(0..=15))]
    pub palette: Option<u8>,

    /// Map an object name to an ID, will enable object exports
    #[arg(short = 'm', value_name = "name@id", value_parser = parse_object_mapping)]
    pub objects: Vec<(String, u32)>,

    /// Read parameters from a JSON file, e.g. {"input": "a.tmx", "layer": "bg"}.
    /// Files holding a plain list of command line flags are not accepted
    #[arg(short = 'f', value_name = "file")]
    pub param_file: Option<PathBuf>,

    /// Also write raw little-endian .bin files
    #[arg(short = 'b')]
    pub binary: bool,

    /// Verbose logging
    #[arg(short = 'v')]
    pub verbose: bool,
}
