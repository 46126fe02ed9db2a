//! Layer `<data>` decoding.
//!
//! Tiled stores a layer's tile grid in one of three encodings (per-tile XML
//! elements, CSV text, base64 text) and, for base64 only, one of four
//! compressions. Every path yields raw 32-bit tile values in row-major order.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use byteorder::{ByteOrder, LittleEndian};
use flate2::{Decompress, FlushDecompress, Status};
use thiserror::Error;

use super::gzip::{GzipError, GzipReader};
use super::node::XmlNode;
use super::numeric::uint_from_str;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Xml,
    Base64,
    Csv,
}

impl Encoding {
    pub fn from_attr(value: &str) -> Result<Self, DecodeError> {
        match value {
            "" => Ok(Encoding::Xml),
            "base64" => Ok(Encoding::Base64),
            "csv" => Ok(Encoding::Csv),
            other => Err(DecodeError::UnsupportedEncoding(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Zlib,
    Zstd,
}

impl Compression {
    pub fn from_attr(value: &str) -> Result<Self, DecodeError> {
        match value {
            "" => Ok(Compression::None),
            "gzip" => Ok(Compression::Gzip),
            "zlib" => Ok(Compression::Zlib),
            "zstd" => Ok(Compression::Zstd),
            other => Err(DecodeError::UnsupportedCompression(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unsupported encoding `{0}`")]
    UnsupportedEncoding(String),
    #[error("unsupported compression `{0}`")]
    UnsupportedCompression(String),
    #[error("base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("base64 payload decoded to nothing")]
    Empty,
    #[error("zlib: {0}")]
    Zlib(String),
    #[error("gzip: {0}")]
    Gzip(#[from] GzipError),
    #[error("gzip footer mismatch (expected crc {crc:08x}, size {size})")]
    GzipCheck { crc: u32, size: u32 },
    #[error("layer of {0} tiles is too large to decode")]
    TooLarge(usize),
    #[error("zstd: {0}")]
    Zstd(#[from] std::io::Error),
}

/// Decode the tile values held by a layer's `<data>` element.
///
/// `expected` is the layer's width × height and sizes the decompression
/// buffer. XML and CSV output is not padded and may come back shorter.
pub fn decode_data(data: XmlNode, expected: usize) -> Result<Vec<u32>, DecodeError> {
    let encoding = Encoding::from_attr(data.attr("encoding"))?;
    let compression = Compression::from_attr(data.attr("compression"))?;

    match encoding {
        Encoding::Xml => Ok(decode_xml(data)),
        Encoding::Csv => Ok(decode_csv(&data.text())),
        Encoding::Base64 => decode_base64(&data.text(), compression, expected),
    }
}

fn decode_xml(data: XmlNode) -> Vec<u32> {
    data.children_named("tile")
        .map(|tile| tile.attr_uint("gid"))
        .collect()
}

/// Comma separated tile values; tokens that are not numbers are skipped.
pub fn decode_csv(text: &str) -> Vec<u32> {
    text.split(',')
        .filter_map(|token| uint_from_str::<u32>(token, 10))
        .collect()
}

pub fn decode_base64(
    text: &str,
    compression: Compression,
    expected: usize,
) -> Result<Vec<u32>, DecodeError> {
    // Pretty printers may wrap the payload across lines.
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD.decode(compact)?;
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    match compression {
        Compression::None => Ok(tiles_from_le_bytes(&bytes)),
        Compression::Zlib => {
            let mut out = output_buffer(expected)?;
            let produced = inflate_zlib(&bytes, &mut out)?;
            Ok(tiles_from_le_bytes(&out[..produced]))
        }
        Compression::Gzip => {
            let mut out = output_buffer(expected)?;
            let mut reader = GzipReader::open_memory(&bytes)?;
            let produced = reader.read(&mut out)?;
            if !reader.check() {
                return Err(DecodeError::GzipCheck {
                    crc: reader.footer_crc(),
                    size: reader.footer_size(),
                });
            }
            Ok(tiles_from_le_bytes(&out[..produced]))
        }
        Compression::Zstd => {
            let mut out = output_buffer(expected)?;
            let produced = zstd::bulk::decompress_to_buffer(&bytes, &mut out[..])?;
            Ok(tiles_from_le_bytes(&out[..produced]))
        }
    }
}

/// Zeroed 4×`expected` byte buffer, or `TooLarge` when that cannot be sized
/// or allocated.
fn output_buffer(expected: usize) -> Result<Vec<u8>, DecodeError> {
    let size = expected
        .checked_mul(4)
        .ok_or(DecodeError::TooLarge(expected))?;
    let mut out = Vec::new();
    out.try_reserve_exact(size)
        .map_err(|_| DecodeError::TooLarge(expected))?;
    out.resize(size, 0);
    Ok(out)
}

fn inflate_zlib(input: &[u8], out: &mut [u8]) -> Result<usize, DecodeError> {
    let mut inflater = Decompress::new(true);
    let status = inflater
        .decompress(input, out, FlushDecompress::Finish)
        .map_err(|e| DecodeError::Zlib(e.to_string()))?;
    if status != Status::StreamEnd {
        return Err(DecodeError::Zlib(format!(
            "stream did not finish within {} bytes",
            out.len()
        )));
    }
    Ok(inflater.total_out() as usize)
}

/// Little-endian u32 per tile; a trailing partial tile is dropped.
fn tiles_from_le_bytes(bytes: &[u8]) -> Vec<u32> {
    bytes.chunks_exact(4).map(LittleEndian::read_u32).collect()
}
