//! Dump the converted arrays as raw little-endian blobs.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::processor::Converted;

use super::{collision, objects, sibling};

pub fn emit(map: &Converted, output: &Path) -> io::Result<()> {
    let mut f = BufWriter::new(File::create(sibling(output, "", "bin"))?);
    write_tiles(&mut f, &map.tiles)?;
    f.flush()?;

    if let Some(cls) = collision(map) {
        File::create(sibling(output, "_collision", "bin"))?.write_all(cls)?;
    }

    if let Some(obj) = objects(map) {
        let mut f = BufWriter::new(File::create(sibling(output, "_objects", "bin"))?);
        write_words(&mut f, obj)?;
        f.flush()?;
    }
    Ok(())
}

pub fn write_tiles<W: Write>(w: &mut W, tiles: &[u16]) -> io::Result<()> {
    tiles
        .iter()
        .try_for_each(|&t| w.write_u16::<LittleEndian>(t))
}

pub fn write_words<W: Write>(w: &mut W, words: &[u32]) -> io::Result<()> {
    words
        .iter()
        .try_for_each(|&v| w.write_u32::<LittleEndian>(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiles_little_endian() {
        let mut out = Vec::new();
        write_tiles(&mut out, &[0x2405, 0x0001]).unwrap();
        assert_eq!(out, [0x05, 0x24, 0x01, 0x00]);
    }

    #[test]
    fn test_object_words() {
        let mut out = Vec::new();
        write_words(&mut out, &[9, 3200, 1792]).unwrap();
        assert_eq!(out, [9, 0, 0, 0, 0x80, 0x0C, 0, 0, 0x00, 0x07, 0, 0]);
    }
}
