//! Chunk storage in region files.
//!
//! A region file keeps up to 1024 chunks of a 32x32 area in 4096 byte
//! sectors, behind an offset table and a timestamp table. Damaged offset
//! tables are repaired on load. A [`RegionStore`] spreads a world over many
//! region files and [`copy_blocks_from`] moves block ranges between chunk
//! stores.

pub mod block_copy;
pub mod bounding_box;
pub mod chunk;
pub mod codec;
pub mod error;
pub mod file;
pub mod identity;
pub mod options;
pub mod position;
pub mod provider;
pub mod region;
pub mod region_chunks;
pub mod sector;
pub mod store;

pub use crate::block_copy::{
    adjust_copy_parameters, copy_blocks_from, BlockConverter, BlockIdMap, BlockMask, CopyBlocks,
    CopyOptions, CopyStats, IdentityConverter,
};
pub use crate::bounding_box::{BoundingBox, FloatBox, Vector};
pub use crate::chunk::{BlockChunk, ChunkStore, Entity, MemoryStore, TileEntity};
pub use crate::codec::CompressionScheme;
pub use crate::error::{ChunkCopyError, ChunkReadError, ChunkWriteError, SectorError};
pub use crate::file::{RegionFile, RegionFileSource};
pub use crate::identity::{ChunkIdentity, LevelTagIdentity};
pub use crate::options::{FilePolicy, IntegrityCheck, RegionOptions};
pub use crate::position::{RegionChunkPosition, RegionPosition};
pub use crate::provider::{FolderRegionProvider, RegionProvider};
pub use crate::region::{Region, RepairReport};
pub use crate::region_chunks::{ChunkSerializer, RegionChunkStore};
pub use crate::sector::SectorAllocator;
pub use crate::store::RegionStore;
