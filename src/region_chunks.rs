use crate::bounding_box::BoundingBox;
use crate::chunk::{BlockChunk, ChunkStore};
use crate::error::{ChunkReadError, ChunkWriteError};
use crate::provider::RegionProvider;
use crate::store::RegionStore;
use log::debug;
use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use std::io;
use std::io::{Read, Seek, Write};

/// Converts chunk payloads stored in regions to block chunks and back.
pub trait ChunkSerializer {
    fn decode(
        &self,
        chunk_x: i32,
        chunk_z: i32,
        height: i32,
        payload: &[u8],
    ) -> Result<BlockChunk, io::Error>;

    fn encode(&self, chunk: &BlockChunk) -> Vec<u8>;
}

/// Block chunks backed by a [`RegionStore`].
///
/// Only loaded chunks are visible to [`ChunkStore`] callers: load the
/// areas a block copy touches on both sides with [`load_area`] and
/// [`save`] the destination afterwards.
///
/// [`load_area`]: RegionChunkStore::load_area
/// [`save`]: RegionChunkStore::save
pub struct RegionChunkStore<S, P, Z> {
    regions: RegionStore<S, P>,
    serializer: Z,
    height: i32,
    chunks: HashMap<(i32, i32), BlockChunk>,
    changed: BTreeSet<(i32, i32)>,
}

impl<S, P, Z> RegionChunkStore<S, P, Z>
where
    S: Read + Write + Seek,
    P: RegionProvider<S>,
    Z: ChunkSerializer,
{
    pub fn new(regions: RegionStore<S, P>, serializer: Z, height: i32) -> Self {
        RegionChunkStore {
            regions,
            serializer,
            height,
            chunks: HashMap::new(),
            changed: BTreeSet::new(),
        }
    }

    /// Decodes every stored chunk touched by `area` that is not loaded yet.
    ///
    /// Returns the amount of chunks loaded.
    pub fn load_area(&mut self, area: &BoundingBox) -> Result<usize, ChunkReadError> {
        let mut loaded = 0;

        for (chunk_x, chunk_z) in area.chunk_positions() {
            if self.chunks.contains_key(&(chunk_x, chunk_z)) {
                continue;
            }

            let payload = match self.regions.read_chunk(chunk_x, chunk_z) {
                Ok(payload) => payload,
                Err(ChunkReadError::ChunkNotFound { .. }) => continue,
                Err(error) => return Err(error),
            };

            let chunk = self
                .serializer
                .decode(chunk_x, chunk_z, self.height, &payload)?;

            self.chunks.insert((chunk_x, chunk_z), chunk);
            loaded += 1;
        }

        debug!(target: "region-store", "Loaded {} chunks for {}", loaded, area);

        Ok(loaded)
    }

    /// Writes every created or changed chunk back to its region.
    ///
    /// Returns the amount of chunks written.
    pub fn save(&mut self) -> Result<usize, ChunkWriteError> {
        let mut saved = 0;

        while let Some(&(chunk_x, chunk_z)) = self.changed.iter().next() {
            if let Some(chunk) = self.chunks.get(&(chunk_x, chunk_z)) {
                let payload = self.serializer.encode(chunk);
                self.regions.write_chunk(chunk_x, chunk_z, &payload)?;
                saved += 1;
            }

            self.changed.remove(&(chunk_x, chunk_z));
        }

        Ok(saved)
    }

    /// Amount of chunks waiting for [`RegionChunkStore::save`].
    pub fn unsaved_chunks(&self) -> usize {
        self.changed.len()
    }

    pub fn regions(&mut self) -> &mut RegionStore<S, P> {
        &mut self.regions
    }

    /// Drops loaded chunks, discarding unsaved changes.
    pub fn into_inner(self) -> RegionStore<S, P> {
        self.regions
    }
}

impl<S, P, Z> ChunkStore for RegionChunkStore<S, P, Z>
where
    S: Read + Write + Seek,
    P: RegionProvider<S>,
    Z: ChunkSerializer,
{
    /// Region stores have no horizontal limit.
    fn bounds(&self) -> BoundingBox {
        BoundingBox::default()
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn contains_chunk(&self, chunk_x: i32, chunk_z: i32) -> bool {
        self.chunks.contains_key(&(chunk_x, chunk_z))
    }

    fn chunk(&self, chunk_x: i32, chunk_z: i32) -> Option<&BlockChunk> {
        self.chunks.get(&(chunk_x, chunk_z))
    }

    fn chunk_mut(&mut self, chunk_x: i32, chunk_z: i32) -> Option<&mut BlockChunk> {
        self.chunks.get_mut(&(chunk_x, chunk_z))
    }

    fn create_chunk(&mut self, chunk_x: i32, chunk_z: i32) -> &mut BlockChunk {
        let chunk = BlockChunk::new(chunk_x, chunk_z, self.height);

        self.changed.insert((chunk_x, chunk_z));

        match self.chunks.entry((chunk_x, chunk_z)) {
            Entry::Occupied(entry) => {
                let slot = entry.into_mut();
                *slot = chunk;
                slot
            }
            Entry::Vacant(entry) => entry.insert(chunk),
        }
    }

    fn chunk_changed(&mut self, chunk_x: i32, chunk_z: i32) {
        self.changed.insert((chunk_x, chunk_z));
    }
}
