//! Conversion parameters: command line merged over an optional JSON
//! parameter file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::cli::Cli;
use crate::parser::numeric::{int_from_str, uint_from_str};

/// Parameter file contents (`-f`). Every field is optional; command line
/// values take precedence.
///
/// ```json
/// { "input": "level1.tmx", "output": "build/level1", "palette": 2,
///   "objects": { "Spawn": 1, "Coin": 2 } }
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParamFile {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub layer: Option<String>,
    pub collision: Option<String>,
    pub palette_layer: Option<String>,
    pub offset: Option<i32>,
    pub palette: Option<u8>,
    pub objects: BTreeMap<String, u32>,
    pub binary: bool,
}

impl ParamFile {
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Reading parameter file {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Parsing {}", path.display()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Fully resolved parameters for one conversion run.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    pub input: PathBuf,
    pub output: PathBuf,
    /// `None` selects the first layer in the map
    pub graphics_layer: Option<String>,
    pub palette_layer: Option<String>,
    pub collision_layer: Option<String>,
    pub offset: i32,
    /// 0-based default palette (0..=15)
    pub palette: u8,
    /// `None` disables object output
    pub objects: Option<BTreeMap<String, u32>>,
    pub binary: bool,
}

impl Params {
    pub fn resolve(cli: Cli) -> Result<Self> {
        let file = match &cli.param_file {
            Some(path) => ParamFile::load(path)?,
            None => ParamFile::default(),
        };
        Self::merge(cli, file)
    }

    /// Command line over parameter file.
    pub fn merge(cli: Cli, file: ParamFile) -> Result<Self> {
        let Some(input) = cli.input.or(file.input) else {
            bail!("No input file specified (-i)");
        };
        let Some(output) = cli.output.or(file.output) else {
            bail!("No output file specified (-o)");
        };

        let palette = cli.palette.or(file.palette).unwrap_or(0);
        if palette > 15 {
            bail!("Invalid palette index {palette} (expected 0-15)");
        }

        let mut objects = file.objects;
        objects.extend(cli.objects);

        Ok(Self {
            input,
            output,
            graphics_layer: non_empty(cli.layer.or(file.layer)),
            palette_layer: non_empty(cli.palette_layer.or(file.palette_layer)),
            collision_layer: non_empty(cli.collision.or(file.collision)),
            offset: cli.offset.or(file.offset).unwrap_or(0),
            palette,
            objects: (!objects.is_empty()).then_some(objects),
            binary: cli.binary || file.binary,
        })
    }
}

fn non_empty(name: Option<String>) -> Option<String> {
    name.filter(|n| !n.is_empty())
}

/// `name@id` → `(name, id)`; the id may be written in any C integer base.
pub fn parse_object_mapping(arg: &str) -> Result<(String, u32), String> {
    let (name, id) = arg
        .rsplit_once('@')
        .ok_or_else(|| format!("`{arg}` is not of the form name@id"))?;
    if name.is_empty() {
        return Err(format!("`{arg}` has an empty object name"));
    }
    let id = uint_from_str::<u32>(id, 0).ok_or_else(|| format!("`{id}` is not a valid object id"))?;
    Ok((name.to_string(), id))
}

/// Tile offset in any C integer base, e.g. `-16` or `0x100`.
pub fn parse_offset(arg: &str) -> Result<i32, String> {
    int_from_str::<i32>(arg, 0).ok_or_else(|| format!("`{arg}` is not a valid offset"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("tmx2gba").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_object_mapping() {
        assert_eq!(parse_object_mapping("Spawn@9"), Ok(("Spawn".into(), 9)));
        assert_eq!(parse_object_mapping("a@b@0x10"), Ok(("a@b".into(), 16)));
        assert!(parse_object_mapping("Spawn").is_err());
        assert!(parse_object_mapping("@3").is_err());
        assert!(parse_object_mapping("Spawn@x").is_err());
    }

    #[test]
    fn test_offset_bases() {
        assert_eq!(parse_offset("-16"), Ok(-16));
        assert_eq!(parse_offset("0x100"), Ok(256));
        assert!(parse_offset("x").is_err());
        assert!(parse_offset("0x80000000").is_err());
        assert_eq!(cli(&["-i", "a", "-o", "b", "-r", "0x10"]).offset, Some(16));
    }

    #[test]
    fn test_param_file_help_names_json() {
        use clap::CommandFactory;
        let cmd = Cli::command();
        let help = cmd
            .get_arguments()
            .find(|a| a.get_id().as_str() == "param_file")
            .and_then(|a| a.get_help())
            .unwrap()
            .to_string();
        assert!(help.contains("JSON"));
        assert!(help.contains("not accepted"));
    }

    #[test]
    fn test_cli_only() {
        let params = Params::merge(
            cli(&["-i", "map.tmx", "-o", "out/map", "-r", "-2", "-p", "3", "-m", "Spawn@1", "-c", "walls"]),
            ParamFile::default(),
        )
        .unwrap();

        assert_eq!(params.input, PathBuf::from("map.tmx"));
        assert_eq!(params.offset, -2);
        assert_eq!(params.palette, 3);
        assert_eq!(params.graphics_layer, None);
        assert_eq!(params.collision_layer.as_deref(), Some("walls"));
        assert_eq!(params.objects, Some(BTreeMap::from([("Spawn".into(), 1)])));
        assert!(!params.binary);
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = ParamFile::from_json(
            r#"{ "input": "a.tmx", "output": "a", "layer": "bg", "palette": 5,
                 "objects": { "Spawn": 1, "Coin": 2 }, "binary": true }"#,
        )
        .unwrap();
        let params = Params::merge(cli(&["-o", "b", "-p", "1", "-m", "Coin@7"]), file).unwrap();

        assert_eq!(params.input, PathBuf::from("a.tmx"));
        assert_eq!(params.output, PathBuf::from("b"));
        assert_eq!(params.graphics_layer.as_deref(), Some("bg"));
        assert_eq!(params.palette, 1);
        assert_eq!(
            params.objects,
            Some(BTreeMap::from([("Spawn".into(), 1), ("Coin".into(), 7)]))
        );
        assert!(params.binary);
    }

    #[test]
    fn test_missing_paths_and_bad_palette() {
        assert!(Params::merge(cli(&["-o", "x"]), ParamFile::default()).is_err());
        assert!(Params::merge(cli(&["-i", "x"]), ParamFile::default()).is_err());

        let file = ParamFile::from_json(r#"{ "palette": 16 }"#).unwrap();
        assert!(Params::merge(cli(&["-i", "x", "-o", "y"]), file).is_err());
    }

    #[test]
    fn test_palette_range_on_cli() {
        assert!(Cli::try_parse_from(["tmx2gba", "-i", "x", "-o", "y", "-p", "16"]).is_err());
    }

    #[test]
    fn test_unknown_param_file_field() {
        assert!(ParamFile::from_json(r#"{ "pallete": 1 }"#).is_err());
    }
}
