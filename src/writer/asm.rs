//! Emit GNU assembler data for the converted arrays.

use std::fmt::{self, Display};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::processor::Converted;

use super::{collision, objects, sibling};

/// Compact C integer literal: decimal up to 9, `0x..` upper-case hex above.
pub struct CHex(pub u32);

impl Display for CHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 > 9 {
            write!(f, "0x{:X}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

pub fn emit(map: &Converted, name: &str, output: &Path) -> io::Result<()> {
    let mut s = BufWriter::new(File::create(sibling(output, "", "s"))?);
    write_source(&mut s, map, name)?;
    s.flush()
}

pub fn write_source<W: Write>(s: &mut W, map: &Converted, name: &str) -> io::Result<()> {
    write_array(s, &format!("{name}Tiles"), ".hword", 16, &map.tiles)?;

    if let Some(cls) = collision(map) {
        writeln!(s)?;
        write_array(s, &format!("{name}Collision"), ".byte", 32, cls)?;
    }

    if let Some(obj) = objects(map) {
        writeln!(s)?;
        write_array(s, &format!("{name}Objdat"), ".word", 3, obj)?;
    }
    Ok(())
}

fn write_array<W: Write, T: Copy + Into<u32>>(
    s: &mut W,
    label: &str,
    directive: &str,
    per_row: usize,
    data: &[T],
) -> io::Result<()> {
    writeln!(s, "\t.section .rodata")?;
    writeln!(s, "\t.align 2")?;
    writeln!(s, "\t.global {label}")?;
    writeln!(s, "\t.hidden {label}")?;
    writeln!(s, "{label}:")?;

    for row in data.chunks(per_row) {
        write!(s, "\t{directive} ")?;
        for (i, &v) in row.iter().enumerate() {
            if i > 0 {
                write!(s, ",")?;
            }
            write!(s, "{}", CHex(v.into()))?;
        }
        writeln!(s)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(map: &Converted) -> String {
        let mut out = Vec::new();
        write_source(&mut out, map, "level").unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_chex() {
        assert_eq!(CHex(0).to_string(), "0");
        assert_eq!(CHex(9).to_string(), "9");
        assert_eq!(CHex(10).to_string(), "0xA");
        assert_eq!(CHex(0x2405).to_string(), "0x2405");
        assert_eq!(CHex(0xFFFF_FE80).to_string(), "0xFFFFFE80");
    }

    #[test]
    fn test_tiles_rows_of_sixteen() {
        let map = Converted {
            width: 17,
            height: 1,
            tiles: (0..17).collect(),
            collision: None,
            objects: None,
        };
        assert_eq!(
            render(&map),
            "\t.section .rodata\n\
             \t.align 2\n\
             \t.global levelTiles\n\
             \t.hidden levelTiles\n\
             levelTiles:\n\
             \t.hword 0,1,2,3,4,5,6,7,8,9,0xA,0xB,0xC,0xD,0xE,0xF\n\
             \t.hword 0x10\n"
        );
    }

    #[test]
    fn test_collision_and_objects() {
        let map = Converted {
            width: 2,
            height: 1,
            tiles: vec![0x2405, 1],
            collision: Some(vec![0, 44]),
            objects: Some(vec![9, 3200, 1792]),
        };
        let s = render(&map);
        assert!(s.contains("\t.hword 0x2405,1\n\n\t.section .rodata\n"));
        assert!(s.contains("levelCollision:\n\t.byte 0,0x2C\n"));
        assert!(s.contains("levelObjdat:\n\t.word 9,0xC80,0x700\n"));
    }
}
