//! Emit the C header declaring the converted arrays.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::processor::Converted;

use super::{collision, objects, sibling};

pub fn emit(map: &Converted, name: &str, output: &Path) -> io::Result<()> {
    let mut h = BufWriter::new(File::create(sibling(output, "", "h"))?);
    write_header(&mut h, map, name)?;
    h.flush()
}

pub fn write_header<W: Write>(h: &mut W, map: &Converted, name: &str) -> io::Result<()> {
    let guard = format!("TMX2GBA_{}", name.to_ascii_uppercase());

    writeln!(h, "#ifndef {guard}")?;
    writeln!(h, "#define {guard}")?;
    writeln!(h)?;
    writeln!(h, "#define {name}Width {}", map.width)?;
    writeln!(h, "#define {name}Height {}", map.height)?;
    writeln!(h)?;

    writeln!(h, "#define {name}TilesLen {}", map.tiles.len() * 2)?;
    writeln!(h, "extern const unsigned short {name}Tiles[{}];", map.tiles.len())?;

    if let Some(cls) = collision(map) {
        writeln!(h)?;
        writeln!(h, "#define {name}CollisionLen {}", cls.len())?;
        writeln!(h, "extern const unsigned char {name}Collision[{}];", cls.len())?;
    }

    if let Some(obj) = objects(map) {
        writeln!(h)?;
        writeln!(h, "#define {name}ObjCount {}", obj.len() / 3)?;
        writeln!(h, "#define {name}ObjdatLen {}", obj.len() * 4)?;
        writeln!(h, "extern const unsigned int {name}Objdat[{}];", obj.len())?;
    }

    writeln!(h)?;
    writeln!(h, "#endif//{guard}")?;
    Ok(())
}
