//! Minimal in-memory gzip reader.
//!
//! Only what Tiled writes is supported: a single member, DEFLATE method.
//! The header is walked by hand so every optional field can be bounds
//! checked against the buffer; the body is inflated with raw `flate2`
//! and validated against the footer in [`GzipReader::check`].
//!
//! ## Member layout
//!
//! ```text
//! +----+----+----+-----+-------+-----+----+
//! | 1F | 8B | CM | FLG | MTIME | XFL | OS |   10 bytes
//! +----+----+----+-----+-------+-----+----+
//! [FEXTRA: u16 len + data] [FNAME\0] [FCOMMENT\0] [FHCRC: u16]
//! ... deflate stream ...
//! +-------+-------+
//! | CRC32 | ISIZE |                             8 bytes
//! +-------+-------+
//! ```

use byteorder::{ByteOrder, LittleEndian};
use flate2::{Crc, Decompress, FlushDecompress, Status};
use thiserror::Error;

pub const MAGIC: [u8; 2] = [0x1F, 0x8B];
pub const CM_DEFLATE: u8 = 8;

/// Header + footer of the smallest member we accept.
pub const MIN_SIZE: usize = 20;
const FIXED_HEADER_SIZE: usize = 10;
const FOOTER_SIZE: usize = 8;

pub const FHCRC: u8 = 0x02;
pub const FEXTRA: u8 = 0x04;
pub const FNAME: u8 = 0x08;
pub const FCOMMENT: u8 = 0x10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GzipError {
    #[error("gzip member too short ({0} bytes)")]
    TooShort(usize),
    #[error("bad gzip magic")]
    BadMagic,
    #[error("unsupported gzip compression method {0}")]
    UnsupportedMethod(u8),
    #[error("gzip header field `{0}` runs past end of input")]
    Truncated(&'static str),
    #[error("inflate failed: {0}")]
    Inflate(String),
    #[error("inflate did not finish within {0} bytes")]
    Incomplete(usize),
}

/// Reader over a single in-memory gzip member.
///
/// Constructed by [`GzipReader::open_memory`] (header parsed), then driven
/// with [`read`](GzipReader::read) and finally verified with
/// [`check`](GzipReader::check).
pub struct GzipReader<'a> {
    /// Deflate stream still to be consumed
    body: &'a [u8],
    inflater: Decompress,
    crc: Crc,
    bytes_read: u64,
    finished: bool,

    pub flags: u8,
    pub modification_time: u32,
    pub xflags: u8,
    pub os_id: u8,
    pub header_crc16: Option<u16>,

    footer_crc: u32,
    footer_size: u32,
}

impl<'a> GzipReader<'a> {
    /// Parse the header and footer of `source`.
    pub fn open_memory(source: &'a [u8]) -> Result<Self, GzipError> {
        if source.len() < MIN_SIZE {
            return Err(GzipError::TooShort(source.len()));
        }
        if source[0..2] != MAGIC {
            return Err(GzipError::BadMagic);
        }
        if source[2] != CM_DEFLATE {
            return Err(GzipError::UnsupportedMethod(source[2]));
        }

        let flags = source[3];
        let modification_time = LittleEndian::read_u32(&source[4..8]);
        let xflags = source[8];
        let os_id = source[9];

        // Everything after the fixed header up to the footer
        let end = source.len() - FOOTER_SIZE;
        let mut pos = FIXED_HEADER_SIZE;

        if flags & FEXTRA != 0 {
            if pos + 2 > end {
                return Err(GzipError::Truncated("extra"));
            }
            let extra_len = LittleEndian::read_u16(&source[pos..pos + 2]) as usize;
            pos += 2;
            if pos + extra_len > end {
                return Err(GzipError::Truncated("extra"));
            }
            pos += extra_len;
        }
        if flags & FNAME != 0 {
            pos = skip_cstring(source, pos, end).ok_or(GzipError::Truncated("name"))?;
        }
        if flags & FCOMMENT != 0 {
            pos = skip_cstring(source, pos, end).ok_or(GzipError::Truncated("comment"))?;
        }
        let mut header_crc16 = None;
        if flags & FHCRC != 0 {
            if pos + 2 > end {
                return Err(GzipError::Truncated("hcrc"));
            }
            header_crc16 = Some(LittleEndian::read_u16(&source[pos..pos + 2]));
            pos += 2;
        }

        let footer = &source[end..];
        Ok(Self {
            body: &source[pos..end],
            inflater: Decompress::new(false),
            crc: Crc::new(),
            bytes_read: 0,
            finished: false,
            flags,
            modification_time,
            xflags,
            os_id,
            header_crc16,
            footer_crc: LittleEndian::read_u32(&footer[0..4]),
            footer_size: LittleEndian::read_u32(&footer[4..8]),
        })
    }

    /// Inflate the remaining body into `out`.
    ///
    /// `out` is a whole, non-sliding output buffer: the stream must reach its
    /// end without needing more room than `out` provides. Returns the number
    /// of bytes produced. Once the stream has ended further reads produce 0.
    pub fn read(&mut self, out: &mut [u8]) -> Result<usize, GzipError> {
        if self.finished {
            return Ok(0);
        }
        let in_before = self.inflater.total_in();
        let out_before = self.inflater.total_out();

        let status = self
            .inflater
            .decompress(self.body, out, FlushDecompress::Finish)
            .map_err(|e| GzipError::Inflate(e.to_string()))?;

        let consumed = (self.inflater.total_in() - in_before) as usize;
        let produced = (self.inflater.total_out() - out_before) as usize;
        self.body = &self.body[consumed..];

        if status != Status::StreamEnd {
            return Err(GzipError::Incomplete(out.len()));
        }
        self.finished = true;

        self.crc.update(&out[..produced]);
        self.bytes_read += produced as u64;
        Ok(produced)
    }

    /// True when everything inflated so far matches the footer's CRC32 and
    /// size (mod 2^32).
    pub fn check(&self) -> bool {
        self.crc.sum() == self.footer_crc && self.bytes_read as u32 == self.footer_size
    }

    pub fn footer_crc(&self) -> u32 {
        self.footer_crc
    }

    pub fn footer_size(&self) -> u32 {
        self.footer_size
    }
}

/// Skip a null-terminated string starting at `pos`, returning the offset just
/// past the terminator.
fn skip_cstring(source: &[u8], pos: usize, end: usize) -> Option<usize> {
    let field = source.get(pos..end)?;
    let nul = field.iter().position(|&b| b == 0)?;
    Some(pos + nul + 1)
}
