use crate::position::RegionChunkPosition;
use nbt::decode::TagDecodeError;
use std::{error::Error, fmt::Display, io};

/// Possible errors while loading the chunk.
#[derive(Debug)]
pub enum ChunkReadError {
    /// Chunk at specified coordinates inside region not found.
    ChunkNotFound { position: RegionChunkPosition },
    /// Chunk sectors are too short to hold the 5 byte frame header.
    ///
    /// Region file are corrupted.
    TruncatedFrame {
        /// Amount of bytes available for the frame.
        length: usize,
    },
    /// Chunk length overlaps the sectors allocated for it.
    ///
    /// This should not occur under normal conditions.
    ///
    /// Region file are corrupted.
    LengthExceedsMaximum {
        /// Chunk length.
        length: u32,
        /// Chunk maximum expected length.
        maximum_length: u32,
    },
    /// Currently are only 2 types of compression: Gzip and Zlib.
    ///
    /// This should not occur under normal conditions.
    ///
    /// Region file are corrupted or was introduced new compression type.
    UnsupportedCompressionScheme {
        /// Compression scheme type id.
        compression_scheme: u8,
    },
    /// Compressed chunk data could not be inflated.
    DecompressionFailed { io_error: io::Error },
    /// I/O Error which happened while were reading chunk data from region file.
    IOError { io_error: io::Error },
    /// Error while decoding binary data to NBT tag.
    ///
    /// Region file are corrupted or a developer error in the NBT library.
    TagDecodeError { tag_decode_error: TagDecodeError },
}

impl ChunkReadError {
    /// Returns true when the stored bytes cannot be interpreted.
    pub fn is_malformed(&self) -> bool {
        use ChunkReadError::*;
        match self {
            TruncatedFrame { .. }
            | LengthExceedsMaximum { .. }
            | UnsupportedCompressionScheme { .. }
            | DecompressionFailed { .. }
            | TagDecodeError { .. } => true,
            ChunkNotFound { .. } | IOError { .. } => false,
        }
    }
}

impl From<io::Error> for ChunkReadError {
    fn from(io_error: io::Error) -> Self {
        ChunkReadError::IOError { io_error }
    }
}

impl From<TagDecodeError> for ChunkReadError {
    fn from(tag_decode_error: TagDecodeError) -> Self {
        ChunkReadError::TagDecodeError { tag_decode_error }
    }
}

impl Error for ChunkReadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        use ChunkReadError::*;
        match self {
            IOError { io_error } | DecompressionFailed { io_error } => Some(io_error),
            // Tag decode errors do not implement `Error`.
            _ => None,
        }
    }
}

impl Display for ChunkReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ChunkReadError::*;
        match self {
            ChunkNotFound { position } => {
                write!(f, "Chunk {}, {} not found", position.x, position.z)
            }
            TruncatedFrame { length } => write!(
                f,
                "Chunk data is only {} bytes long (expected at least 5)",
                length
            ),
            LengthExceedsMaximum {
                length,
                maximum_length,
            } => write!(
                f,
                "Chunk length of {} exceeds maximum ({})",
                length, maximum_length
            ),
            UnsupportedCompressionScheme { compression_scheme } => {
                write!(f, "Unsupported compression scheme: {}", compression_scheme)
            }
            DecompressionFailed { .. } => write!(f, "Failed to decompress chunk data"),
            IOError { .. } => write!(f, "IO Error"),
            TagDecodeError { .. } => write!(f, "Failed to decode nbt"),
        }
    }
}

/// Possible errors while saving the chunk.
#[derive(Debug)]
pub enum ChunkWriteError {
    /// Framed chunk needs 256 sectors or more (1 MB).
    ///
    /// Nothing was written.
    LengthExceedsMaximum {
        /// Framed chunk length.
        length: u32,
        /// Sectors the chunk would need.
        sectors: u32,
    },
    /// I/O Error which happened while were writing chunk data to region.
    IOError { io_error: io::Error },
}

impl From<io::Error> for ChunkWriteError {
    fn from(io_error: io::Error) -> Self {
        ChunkWriteError::IOError { io_error }
    }
}

impl Error for ChunkWriteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ChunkWriteError::IOError { io_error } => Some(io_error),
            _ => None,
        }
    }
}

impl Display for ChunkWriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ChunkWriteError::*;
        match self {
            LengthExceedsMaximum { length, sectors } => write!(
                f,
                "Chunk length of {} needs {} sectors, exceeds maximum (255)",
                length, sectors
            ),
            IOError { .. } => write!(f, "IO Error"),
        }
    }
}

/// Sector bookkeeping violations.
///
/// Outside of region loading these indicate a developer error.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum SectorError {
    /// Sector is already used by another run.
    Overlap { sector: usize },
    /// Run ends past the last sector of the file.
    OutOfFile { sector: usize, total_sectors: usize },
}

impl Error for SectorError {}

impl Display for SectorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use SectorError::*;
        match self {
            Overlap { sector } => write!(f, "Sector {} is already in use", sector),
            OutOfFile {
                sector,
                total_sectors,
            } => write!(
                f,
                "Sector {} is past the end of the file ({} sectors)",
                sector, total_sectors
            ),
        }
    }
}

/// Possible errors while copying a raw chunk between regions.
#[derive(Debug)]
pub enum ChunkCopyError {
    /// Source chunk frame could not be read.
    Read(ChunkReadError),
    /// Frame could not be stored in the destination region.
    Write(ChunkWriteError),
}

impl From<ChunkReadError> for ChunkCopyError {
    fn from(error: ChunkReadError) -> Self {
        ChunkCopyError::Read(error)
    }
}

impl From<ChunkWriteError> for ChunkCopyError {
    fn from(error: ChunkWriteError) -> Self {
        ChunkCopyError::Write(error)
    }
}

impl Error for ChunkCopyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ChunkCopyError::Read(error) => Some(error),
            ChunkCopyError::Write(error) => Some(error),
        }
    }
}

impl Display for ChunkCopyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChunkCopyError::Read(error) => write!(f, "Failed to read source chunk: {}", error),
            ChunkCopyError::Write(error) => write!(f, "Failed to write chunk copy: {}", error),
        }
    }
}
