use crate::codec::{
    compress, decompress, frame, sectors_required, unframe, CompressionScheme,
    CHUNK_HEADER_BYTES, MAXIMUM_CHUNK_SECTORS,
};
use crate::error::{ChunkCopyError, ChunkReadError, ChunkWriteError, SectorError};
use crate::identity::{ChunkIdentity, LevelTagIdentity};
use crate::options::{IntegrityCheck, RegionOptions};
use crate::position::{RegionChunkPosition, RegionPosition};
use crate::sector::{SectorAllocator, HEADER_SECTORS, SECTOR_BYTES};
use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use flate2::Compression;
use log::{debug, info, warn};
use nbt::decode::read_compound_tag;
use nbt::encode::write_compound_tag;
use nbt::CompoundTag;
use std::io::{Cursor, Error, Read, Seek, SeekFrom, Write};
use std::time::{SystemTime, UNIX_EPOCH};
use std::{fmt, io};

/// Amount of chunks in region.
pub const REGION_CHUNKS: usize = 1024;
/// Region header length in bytes.
pub const REGION_HEADER_BYTES_LENGTH: u64 = (HEADER_SECTORS * SECTOR_BYTES) as u64;

/// Region represents a 32x32 group of chunks stored in a single source.
///
/// Chunks are addressed by world chunk coordinates; only the low five bits
/// of each coordinate select the slot.
pub struct Region<S> {
    /// Region coordinates, used for repair and diagnostics.
    position: RegionPosition,
    /// Source in which region are stored.
    source: S,
    /// Array of chunks metadata.
    chunks_metadata: [ChunkMetadata; REGION_CHUNKS],
    /// Used sectors for header and chunks data.
    sectors: SectorAllocator,
    /// Level used to compress written chunks.
    compression: Compression,
    /// Outcome of the repair that ran while loading, if any.
    repair_report: Option<RepairReport>,
}

impl<S> Region<S> {
    pub fn position(&self) -> RegionPosition {
        self.position
    }

    /// Returns chunk metadata at specified slot.
    fn get_metadata(&self, position: RegionChunkPosition) -> ChunkMetadata {
        self.chunks_metadata[position.metadata_index()]
    }

    pub fn contains_chunk(&self, chunk_x: i32, chunk_z: i32) -> bool {
        let position = RegionChunkPosition::from_chunk_position(chunk_x, chunk_z);

        !self.get_metadata(position).is_empty()
    }

    /// Starting sector and sector count of a chunk, `(0, 0)` when absent.
    pub fn chunk_sectors(&self, chunk_x: i32, chunk_z: i32) -> (u32, u8) {
        let metadata =
            self.get_metadata(RegionChunkPosition::from_chunk_position(chunk_x, chunk_z));

        (metadata.start_sector_index, metadata.sectors)
    }

    /// Last time in seconds when chunk was written, advisory only.
    pub fn last_modified(&self, chunk_x: i32, chunk_z: i32) -> u32 {
        self.get_metadata(RegionChunkPosition::from_chunk_position(chunk_x, chunk_z))
            .last_modified_timestamp
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks_metadata
            .iter()
            .filter(|metadata| !metadata.is_empty())
            .count()
    }

    pub fn used_sectors(&self) -> usize {
        self.sectors.used()
    }

    pub fn total_sectors(&self) -> usize {
        self.sectors.total()
    }

    /// Report of the repair pass that ran while loading.
    pub fn repair_report(&self) -> Option<RepairReport> {
        self.repair_report
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub(crate) fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: Read + Write + Seek> Region<S> {
    /// Loads region with default options, repairing the offset table if needed.
    pub fn load(position: RegionPosition, source: S) -> Result<Self, io::Error> {
        Self::load_with(
            position,
            source,
            &RegionOptions::default(),
            &LevelTagIdentity,
        )
    }

    /// Loads region from source.
    ///
    /// Source is padded to a whole number of sectors and to at least the
    /// header length. Corrupt offset tables are repaired in place.
    pub fn load_with(
        position: RegionPosition,
        mut source: S,
        options: &RegionOptions,
        identity: &dyn ChunkIdentity,
    ) -> Result<Self, io::Error> {
        let source_len = source.len()?;
        let sector_bytes = SECTOR_BYTES as u64;
        let padded_len = ((source_len + sector_bytes - 1) / sector_bytes * sector_bytes)
            .max(REGION_HEADER_BYTES_LENGTH);

        if padded_len != source_len {
            debug!(
                target: "region-store",
                "Padding region {} source from {} to {} bytes", position, source_len, padded_len
            );
            source.extend_len(padded_len)?;
        }

        let chunks_metadata = Self::read_header(&mut source)?;
        let total_sectors = (padded_len / sector_bytes) as usize;

        let mut region = Region {
            position,
            source,
            chunks_metadata,
            sectors: SectorAllocator::new(total_sectors),
            compression: options.compression,
            repair_report: None,
        };

        let mut needs_repair = !region.claim_sectors();

        if !needs_repair && options.integrity_check == IntegrityCheck::Full {
            needs_repair = region.has_misplaced_chunks(identity)?;
        }

        if needs_repair {
            region.repair_report = Some(region.repair(identity)?);
        }

        info!(
            target: "region-store",
            "Found region file {} with {}/{} sectors used and {} chunks present",
            region.position,
            region.used_sectors(),
            region.total_sectors(),
            region.chunk_count()
        );

        Ok(region)
    }

    /// First 8KB of source are header of 1024 offsets and 1024 timestamps.
    fn read_header(source: &mut S) -> Result<[ChunkMetadata; REGION_CHUNKS], io::Error> {
        let mut chunks_metadata = [ChunkMetadata::default(); REGION_CHUNKS];
        let mut buffer = vec![0u8; REGION_HEADER_BYTES_LENGTH as usize];

        source.seek(SeekFrom::Start(0))?;
        source.read_exact(&mut buffer)?;

        let mut values = [0u32; 2 * REGION_CHUNKS];
        BigEndian::read_u32_into(&buffer, &mut values);

        for index in 0..REGION_CHUNKS {
            let offset = values[index];
            let last_modified_timestamp = values[REGION_CHUNKS + index];

            chunks_metadata[index] = ChunkMetadata::from_offset(offset, last_modified_timestamp);
        }

        Ok(chunks_metadata)
    }

    /// Marks sectors of every present chunk as used.
    ///
    /// Returns false when some chunk points outside the file, has no
    /// sectors or shares a sector with another chunk.
    fn claim_sectors(&mut self) -> bool {
        let mut valid = true;

        for (index, metadata) in self.chunks_metadata.iter().enumerate() {
            if metadata.is_empty() {
                continue;
            }

            if metadata.sectors == 0 {
                info!(
                    target: "region-store",
                    "Region {} offset table has empty sector run at index {}", self.position, index
                );
                valid = false;
                continue;
            }

            let start = metadata.start_sector_index as usize;

            match self.sectors.reserve(start, metadata.sectors as usize) {
                Ok(()) => {}
                Err(SectorError::OutOfFile { sector, .. }) => {
                    info!(
                        target: "region-store",
                        "Region {} offset table points to sector {} past end of file",
                        self.position, sector
                    );
                    valid = false;
                }
                Err(SectorError::Overlap { sector }) => {
                    info!(
                        target: "region-store",
                        "Region {} offset table index {} overlaps used sector {}",
                        self.position, index, sector
                    );
                    valid = false;
                }
            }
        }

        valid
    }

    /// Decodes every present chunk and checks that it sits in its own slot.
    ///
    /// Chunks without a recognizable position are accepted.
    fn has_misplaced_chunks(&mut self, identity: &dyn ChunkIdentity) -> Result<bool, io::Error> {
        for index in 0..REGION_CHUNKS {
            let position = RegionChunkPosition::from_metadata_index(index);

            if self.get_metadata(position).is_empty() {
                continue;
            }

            // Malformed chunks surface when read, they do not trigger repair.
            let payload = match self.read_payload(position) {
                Ok(payload) => payload,
                Err(ChunkReadError::IOError { io_error }) => return Err(io_error),
                Err(_) => continue,
            };

            if let Some(found) = identity.chunk_position(&payload) {
                if found != self.position.chunk_position(position) {
                    return Ok(true);
                }
            }
        }

        Ok(false)
    }

    /// Rebuilds the offset table from chunk data.
    ///
    /// Slots are visited in index order. A slot is kept when its frame
    /// decodes, its embedded position matches the slot and its sectors are
    /// not claimed by an earlier slot. Other slots are cleared; decoded
    /// chunks are then written into the slot their position names, if that
    /// slot is empty.
    pub fn repair(&mut self, identity: &dyn ChunkIdentity) -> Result<RepairReport, io::Error> {
        let mut claimed_sectors = SectorAllocator::new(self.sectors.total());
        let mut lost_and_found = Vec::new();
        let mut report = RepairReport::default();

        info!(
            target: "region-store",
            "Beginning repairs on region {} ({} chunks)", self.position, self.chunk_count()
        );

        for index in 0..REGION_CHUNKS {
            let position = RegionChunkPosition::from_metadata_index(index);
            let metadata = self.get_metadata(position);

            if metadata.is_empty() {
                continue;
            }

            let problem = match self.inspect_slot(position, &mut claimed_sectors, identity)? {
                None => continue,
                Some(problem) => problem,
            };

            info!(
                target: "region-store",
                "Unexpected chunk data at sector {} ({})", metadata.start_sector_index, problem
            );

            self.chunks_metadata[index] = ChunkMetadata::default();
            report.deleted += 1;

            match problem {
                SlotProblem::Misplaced { found, payload, .. } => {
                    lost_and_found.push((found, payload))
                }
                SlotProblem::Overlapping { payload, .. } => {
                    lost_and_found.push((self.position.chunk_position(position), payload))
                }
                _ => {}
            }
        }

        self.sectors = claimed_sectors;
        self.write_offsets()?;

        for ((chunk_x, chunk_z), payload) in lost_and_found {
            if !self.position.contains_chunk(chunk_x, chunk_z) {
                warn!(
                    target: "region-store",
                    "Found chunk ({}, {}) belonging to another region, dropping it",
                    chunk_x, chunk_z
                );
                continue;
            }

            if self.contains_chunk(chunk_x, chunk_z) {
                info!(
                    target: "region-store",
                    "Found chunk ({}, {}) but its slot is taken, dropping it", chunk_x, chunk_z
                );
                continue;
            }

            info!(
                target: "region-store",
                "Found chunk ({}, {}) and its slot is empty, recovering it", chunk_x, chunk_z
            );

            match self.write_chunk(chunk_x, chunk_z, &payload) {
                Ok(()) => report.recovered += 1,
                Err(ChunkWriteError::IOError { io_error }) => return Err(io_error),
                Err(error) => warn!(
                    target: "region-store",
                    "Failed to recover chunk ({}, {}): {}", chunk_x, chunk_z, error
                ),
            }
        }

        info!(
            target: "region-store",
            "Repair of region {} complete: {}", self.position, report
        );

        Ok(report)
    }

    /// Checks one slot during repair, claiming its sectors when it is kept.
    fn inspect_slot(
        &mut self,
        position: RegionChunkPosition,
        claimed_sectors: &mut SectorAllocator,
        identity: &dyn ChunkIdentity,
    ) -> Result<Option<SlotProblem>, io::Error> {
        let metadata = self.get_metadata(position);
        let start = metadata.start_sector_index as usize;
        let sectors = metadata.sectors as usize;

        if sectors == 0 || start + sectors > claimed_sectors.total() {
            return Ok(Some(SlotProblem::OutOfFile {
                start,
                end: start + sectors,
            }));
        }

        let payload = match self.read_payload(position) {
            Ok(payload) => payload,
            Err(ChunkReadError::IOError { io_error }) => return Err(io_error),
            Err(error) => return Ok(Some(SlotProblem::Unreadable(error))),
        };

        let expected = self.position.chunk_position(position);

        if let Some(found) = identity.chunk_position(&payload) {
            if found != expected {
                return Ok(Some(SlotProblem::Misplaced {
                    found,
                    expected,
                    payload,
                }));
            }
        }

        match claimed_sectors.reserve(start, sectors) {
            Ok(()) => Ok(None),
            Err(_) => Ok(Some(SlotProblem::Overlapping { expected, payload })),
        }
    }

    /// Reads and decompresses chunk data.
    pub fn read_chunk(&mut self, chunk_x: i32, chunk_z: i32) -> Result<Vec<u8>, ChunkReadError> {
        self.read_payload(RegionChunkPosition::from_chunk_position(chunk_x, chunk_z))
    }

    /// Reads chunk data and decodes it as a NBT compound tag.
    pub fn read_compound_tag(
        &mut self,
        chunk_x: i32,
        chunk_z: i32,
    ) -> Result<CompoundTag, ChunkReadError> {
        let payload = self.read_chunk(chunk_x, chunk_z)?;
        let mut cursor = Cursor::new(&payload);

        Ok(read_compound_tag(&mut cursor)?)
    }

    fn read_payload(&mut self, position: RegionChunkPosition) -> Result<Vec<u8>, ChunkReadError> {
        let (data, compression_scheme) = self.read_frame(position)?;

        decompress(&data, compression_scheme)
    }

    /// Reads compressed chunk data together with its compression scheme byte.
    fn read_frame(
        &mut self,
        position: RegionChunkPosition,
    ) -> Result<(Vec<u8>, u8), ChunkReadError> {
        let metadata = self.get_metadata(position);
        let start = metadata.start_sector_index as usize;
        let sectors = metadata.sectors as usize;

        if metadata.is_empty() || sectors == 0 || start + sectors > self.sectors.total() {
            return Err(ChunkReadError::ChunkNotFound { position });
        }

        let mut buffer = vec![0u8; sectors * SECTOR_BYTES];

        self.source
            .seek(SeekFrom::Start((start * SECTOR_BYTES) as u64))?;
        self.source.read_exact(&mut buffer)?;

        let (data, compression_scheme) = unframe(&buffer)?;

        Ok((data.to_vec(), compression_scheme))
    }

    /// Compresses chunk data with zlib and stores it.
    ///
    /// Chunks needing 256 sectors or more are not written.
    pub fn write_chunk(
        &mut self,
        chunk_x: i32,
        chunk_z: i32,
        payload: &[u8],
    ) -> Result<(), ChunkWriteError> {
        let data = compress(payload, self.compression)?;
        let position = RegionChunkPosition::from_chunk_position(chunk_x, chunk_z);

        self.write_frame(position, &data, CompressionScheme::Zlib.id())
    }

    /// Encodes a NBT compound tag and stores it as chunk data.
    pub fn write_compound_tag(
        &mut self,
        chunk_x: i32,
        chunk_z: i32,
        chunk_compound_tag: CompoundTag,
    ) -> Result<(), ChunkWriteError> {
        let mut buffer = Vec::new();
        write_compound_tag(&mut buffer, chunk_compound_tag)?;

        self.write_chunk(chunk_x, chunk_z, &buffer)
    }

    /// Copies the compressed frame of a chunk from another region without
    /// recompressing it.
    ///
    /// Returns false, writing nothing, when the other region lacks the chunk.
    pub fn copy_chunk_from<T: Read + Write + Seek>(
        &mut self,
        other: &mut Region<T>,
        chunk_x: i32,
        chunk_z: i32,
    ) -> Result<bool, ChunkCopyError> {
        let position = RegionChunkPosition::from_chunk_position(chunk_x, chunk_z);

        let (data, compression_scheme) = match other.read_frame(position) {
            Ok(frame) => frame,
            Err(ChunkReadError::ChunkNotFound { .. }) => return Ok(false),
            Err(error) => return Err(error.into()),
        };

        self.write_frame(position, &data, compression_scheme)?;

        Ok(true)
    }

    /// Removes chunk from region, freeing its sectors.
    ///
    /// Returns false when there was no chunk.
    pub fn delete_chunk(&mut self, chunk_x: i32, chunk_z: i32) -> Result<bool, io::Error> {
        let position = RegionChunkPosition::from_chunk_position(chunk_x, chunk_z);
        let metadata = self.get_metadata(position);

        if metadata.is_empty() {
            return Ok(false);
        }

        self.update_metadata(position, ChunkMetadata::default())?;
        self.sectors.release(
            metadata.start_sector_index as usize,
            metadata.sectors as usize,
        );

        debug!(
            target: "region-store",
            "Region {} chunk {} deleted, sectors {}..{} released",
            self.position,
            position,
            metadata.start_sector_index,
            metadata.start_sector_index + metadata.sectors as u32
        );

        Ok(true)
    }

    /// Stores compressed chunk data in its slot.
    ///
    /// The frame is written before the offset table points at it and old
    /// sectors are released only after that. A failed in-place rewrite
    /// clears the slot.
    fn write_frame(
        &mut self,
        position: RegionChunkPosition,
        data: &[u8],
        compression_scheme: u8,
    ) -> Result<(), ChunkWriteError> {
        let sectors_required = sectors_required(data.len());

        if sectors_required > MAXIMUM_CHUNK_SECTORS {
            let length = (data.len() + CHUNK_HEADER_BYTES) as u32;

            warn!(
                target: "region-store",
                "Region {} chunk {} with length {} needs {} sectors, not written",
                self.position, position, length, sectors_required
            );

            return Err(ChunkWriteError::LengthExceedsMaximum {
                length,
                sectors: sectors_required as u32,
            });
        }

        let mut buffer = frame(data, compression_scheme);
        // Padding to align sector.
        buffer.resize(sectors_required * SECTOR_BYTES, 0);

        let metadata = self.get_metadata(position);

        // Chunk still fits in the old place.
        if !metadata.is_empty() && metadata.sectors as usize >= sectors_required {
            debug!(
                target: "region-store",
                "Region {} chunk {} with length {} rewritten in place at sector {}",
                self.position, position, data.len(), metadata.start_sector_index
            );

            if let Err(io_error) = self.write_sectors(metadata.start_sector_index as usize, &buffer)
            {
                // Old frame is partly overwritten, the slot cannot be trusted anymore.
                warn!(
                    target: "region-store",
                    "Region {} chunk {} rewrite failed, clearing slot", self.position, position
                );

                if self.update_metadata(position, ChunkMetadata::default()).is_ok() {
                    self.sectors.release(
                        metadata.start_sector_index as usize,
                        metadata.sectors as usize,
                    );
                }

                return Err(io_error.into());
            }

            self.update_metadata(position, metadata.touched())?;

            return Ok(());
        }

        let start = self.sectors.allocate(sectors_required);

        debug!(
            target: "region-store",
            "Region {} chunk {} with length {} placed at sectors {}..{}",
            self.position, position, data.len(), start, start + sectors_required
        );

        let placed = ChunkMetadata::new(start as u32, sectors_required as u8, 0).touched();
        let result = self
            .write_sectors(start, &buffer)
            .and_then(|_| self.update_metadata(position, placed));

        if let Err(io_error) = result {
            self.sectors.release(start, sectors_required);
            return Err(io_error.into());
        }

        if !metadata.is_empty() {
            self.sectors.release(
                metadata.start_sector_index as usize,
                metadata.sectors as usize,
            );
        }

        Ok(())
    }

    fn write_sectors(&mut self, start: usize, buffer: &[u8]) -> Result<(), io::Error> {
        self.source
            .seek(SeekFrom::Start((start * SECTOR_BYTES) as u64))?;
        self.source.write_all(buffer)?;
        self.source.flush()
    }

    /// Updates chunk metadata in memory and in the header.
    ///
    /// The timestamp is written first; the offset table last, so memory only
    /// keeps the new metadata once the offset table on disk points at it.
    fn update_metadata(
        &mut self,
        position: RegionChunkPosition,
        metadata: ChunkMetadata,
    ) -> Result<(), io::Error> {
        let metadata_index = position.metadata_index();
        let previous = self.chunks_metadata[metadata_index];
        let timestamp_offset = REGION_HEADER_BYTES_LENGTH / 2 + metadata_index as u64 * 4;

        self.source.seek(SeekFrom::Start(timestamp_offset))?;
        self.source
            .write_u32::<BigEndian>(metadata.last_modified_timestamp)?;

        self.chunks_metadata[metadata_index] = metadata;

        if let Err(io_error) = self.write_offsets().and_then(|_| self.source.flush()) {
            self.chunks_metadata[metadata_index] = previous;

            // Best effort to put the previous table back after a torn write.
            if let Err(restore_error) = self.write_offsets() {
                warn!(
                    target: "region-store",
                    "Region {} offset table may not match memory: {}", self.position, restore_error
                );
            }

            return Err(io_error);
        }

        Ok(())
    }

    /// Rewrites the whole offset table.
    fn write_offsets(&mut self) -> Result<(), io::Error> {
        let mut buffer = Vec::with_capacity(SECTOR_BYTES);

        for metadata in self.chunks_metadata.iter() {
            buffer.write_u32::<BigEndian>(metadata.offset())?;
        }

        self.source.seek(SeekFrom::Start(0))?;
        self.source.write_all(&buffer)
    }
}

/// Counts of a finished repair pass.
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq)]
pub struct RepairReport {
    /// Slots cleared.
    pub deleted: usize,
    /// Chunks written back into their own slot.
    pub recovered: usize,
}

impl fmt::Display for RepairReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} deleted, {} recovered, net {}",
            self.deleted,
            self.recovered,
            self.recovered as i64 - self.deleted as i64
        )
    }
}

/// Reason a slot is cleared during repair.
enum SlotProblem {
    OutOfFile {
        start: usize,
        end: usize,
    },
    Unreadable(ChunkReadError),
    Misplaced {
        found: (i32, i32),
        expected: (i32, i32),
        payload: Vec<u8>,
    },
    Overlapping {
        expected: (i32, i32),
        payload: Vec<u8>,
    },
}

impl fmt::Display for SlotProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotProblem::OutOfFile { start, end } => {
                write!(f, "sectors {}..{} point outside of the file", start, end)
            }
            SlotProblem::Unreadable(error) => write!(f, "{}", error),
            SlotProblem::Misplaced {
                found, expected, ..
            } => write!(
                f,
                "chunk {:?} found in slot reserved for {:?}",
                found, expected
            ),
            SlotProblem::Overlapping { expected, .. } => write!(
                f,
                "chunk {:?} has sectors overlapping another chunk",
                expected
            ),
        }
    }
}

/// Chunk metadata are stored in header.
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq)]
struct ChunkMetadata {
    /// Sector index from which starts chunk data.
    start_sector_index: u32,
    /// Amount of sectors used to store chunk.
    sectors: u8,
    /// Last time in seconds when chunk was modified.
    last_modified_timestamp: u32,
}

impl ChunkMetadata {
    fn new(start_sector_index: u32, sectors: u8, last_modified_timestamp: u32) -> Self {
        ChunkMetadata {
            start_sector_index,
            sectors,
            last_modified_timestamp,
        }
    }

    fn from_offset(offset: u32, last_modified_timestamp: u32) -> Self {
        ChunkMetadata::new(offset >> 8, (offset & 0xFF) as u8, last_modified_timestamp)
    }

    /// Offset table word: starting sector in the high 24 bits, count in the low 8.
    fn offset(&self) -> u32 {
        (self.start_sector_index << 8) | self.sectors as u32
    }

    /// Copy of this metadata stamped with the current time.
    fn touched(self) -> Self {
        let last_modified_timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|time| time.as_secs() as u32)
            .unwrap_or_default();

        ChunkMetadata {
            last_modified_timestamp,
            ..self
        }
    }

    fn is_empty(&self) -> bool {
        self.offset() == 0
    }
}

/// Trait adds additional helper methods for `Seek`.
pub(crate) trait SeekExt {
    fn len(&mut self) -> Result<u64, io::Error>;
}

impl<S: Seek> SeekExt for S {
    fn len(&mut self) -> Result<u64, Error> {
        let old_pos = self.seek(SeekFrom::Current(0))?;
        let len = self.seek(SeekFrom::End(0))?;

        if old_pos != len {
            self.seek(SeekFrom::Start(old_pos))?;
        }

        Ok(len)
    }
}

/// Trait adds additional helper methods for `Seek+Write`.
pub(crate) trait SeekWriteExt {
    fn extend_len(&mut self, new_len: u64) -> Result<(), io::Error>;
}

impl<S: Seek + Write> SeekWriteExt for S {
    fn extend_len(&mut self, new_len: u64) -> Result<(), Error> {
        let old_pos = self.seek(SeekFrom::Current(0))?;
        let len = self.seek(SeekFrom::End(0))?;

        if new_len > len {
            let padding_len = new_len - len;
            self.write_all(&vec![0; padding_len as usize])?;
        }

        if old_pos != len {
            self.seek(SeekFrom::Start(old_pos))?;
        }

        Ok(())
    }
}
