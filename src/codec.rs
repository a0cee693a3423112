//! Framing and compression of chunk records.
//!
//! A frame is a big-endian `u32` length, one compression scheme byte and
//! `length - 1` bytes of compressed data. Padding to the sector boundary is
//! left to the caller.

use crate::error::ChunkReadError;
use crate::sector::SECTOR_BYTES;
use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use flate2::read::{GzDecoder, ZlibDecoder};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io;
use std::io::{Read, Write};

/// Length and compression scheme bytes preceding chunk data.
pub const CHUNK_HEADER_BYTES: usize = 5;
/// Chunk sector count is stored in a single byte.
pub const MAXIMUM_CHUNK_SECTORS: usize = 255;

/// Compression scheme stored in the frame version byte.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CompressionScheme {
    Gzip = 1,
    /// Every chunk written by this crate uses zlib.
    Zlib = 2,
}

impl CompressionScheme {
    pub fn from_id(compression_scheme: u8) -> Result<Self, ChunkReadError> {
        match compression_scheme {
            1 => Ok(CompressionScheme::Gzip),
            2 => Ok(CompressionScheme::Zlib),
            _ => Err(ChunkReadError::UnsupportedCompressionScheme { compression_scheme }),
        }
    }

    pub fn id(self) -> u8 {
        self as u8
    }
}

/// Emits the frame header followed by `data`, without trailing padding.
pub fn frame(data: &[u8], compression_scheme: u8) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(CHUNK_HEADER_BYTES + data.len());

    // Length counts the scheme byte as well. Writing into a `Vec` cannot fail.
    let _ = buffer.write_u32::<BigEndian>(data.len() as u32 + 1);
    buffer.push(compression_scheme);
    buffer.extend_from_slice(data);

    buffer
}

/// Splits sector bytes into the compressed data and the compression scheme byte.
pub fn unframe(bytes: &[u8]) -> Result<(&[u8], u8), ChunkReadError> {
    if bytes.len() < CHUNK_HEADER_BYTES {
        return Err(ChunkReadError::TruncatedFrame {
            length: bytes.len(),
        });
    }

    let length = BigEndian::read_u32(&bytes[..4]);
    let maximum_length = (bytes.len() - 4) as u32;

    if length == 0 || length > maximum_length {
        return Err(ChunkReadError::LengthExceedsMaximum {
            length,
            maximum_length,
        });
    }

    let compression_scheme = bytes[4];
    let data = &bytes[CHUNK_HEADER_BYTES..CHUNK_HEADER_BYTES + length as usize - 1];

    Ok((data, compression_scheme))
}

/// Sectors needed to store a frame holding `data_length` compressed bytes.
pub fn sectors_required(data_length: usize) -> usize {
    (CHUNK_HEADER_BYTES + data_length + SECTOR_BYTES - 1) / SECTOR_BYTES
}

pub fn compress(data: &[u8], level: Compression) -> io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), level);
    encoder.write_all(data)?;
    encoder.finish()
}

pub fn decompress(data: &[u8], compression_scheme: u8) -> Result<Vec<u8>, ChunkReadError> {
    let mut decompressed = Vec::new();

    let result = match CompressionScheme::from_id(compression_scheme)? {
        CompressionScheme::Gzip => GzDecoder::new(data).read_to_end(&mut decompressed),
        CompressionScheme::Zlib => ZlibDecoder::new(data).read_to_end(&mut decompressed),
    };

    match result {
        Ok(_) => Ok(decompressed),
        Err(io_error) => Err(ChunkReadError::DecompressionFailed { io_error }),
    }
}
