use crate::error::{ChunkCopyError, ChunkReadError, ChunkWriteError};
use crate::position::{RegionChunkPosition, RegionPosition};
use crate::provider::RegionProvider;
use crate::region::Region;
use log::debug;
use std::collections::HashMap;
use std::io;
use std::io::{Read, Seek, Write};

/// Chunks of a whole world, addressed by world chunk coordinates.
///
/// Regions are opened on first use and kept until [`RegionStore::close`].
pub struct RegionStore<S, P> {
    provider: P,
    regions: HashMap<RegionPosition, Region<S>>,
}

impl<S, P> RegionStore<S, P>
where
    S: Read + Write + Seek,
    P: RegionProvider<S>,
{
    pub fn new(provider: P) -> Self {
        RegionStore {
            provider,
            regions: HashMap::new(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Region covering the chunk, created when missing.
    pub fn region(&mut self, chunk_x: i32, chunk_z: i32) -> Result<&mut Region<S>, io::Error> {
        let position = RegionPosition::from_chunk_position(chunk_x, chunk_z);

        if !self.regions.contains_key(&position) {
            debug!(target: "region-store", "Opening region {}", position);

            let region = self.provider.get_region(position)?;
            self.regions.insert(position, region);
        }

        match self.regions.get_mut(&position) {
            Some(region) => Ok(region),
            None => Err(io::ErrorKind::NotFound.into()),
        }
    }

    /// Region covering the chunk, if it already exists.
    fn existing_region(
        &mut self,
        chunk_x: i32,
        chunk_z: i32,
    ) -> Result<Option<&mut Region<S>>, io::Error> {
        let position = RegionPosition::from_chunk_position(chunk_x, chunk_z);

        if !self.regions.contains_key(&position) && !self.provider.has_region(position) {
            return Ok(None);
        }

        self.region(chunk_x, chunk_z).map(Some)
    }

    pub fn contains_chunk(&mut self, chunk_x: i32, chunk_z: i32) -> Result<bool, io::Error> {
        Ok(self
            .existing_region(chunk_x, chunk_z)?
            .map_or(false, |region| region.contains_chunk(chunk_x, chunk_z)))
    }

    pub fn read_chunk(&mut self, chunk_x: i32, chunk_z: i32) -> Result<Vec<u8>, ChunkReadError> {
        match self.existing_region(chunk_x, chunk_z)? {
            Some(region) => region.read_chunk(chunk_x, chunk_z),
            None => Err(ChunkReadError::ChunkNotFound {
                position: RegionChunkPosition::from_chunk_position(chunk_x, chunk_z),
            }),
        }
    }

    pub fn write_chunk(
        &mut self,
        chunk_x: i32,
        chunk_z: i32,
        payload: &[u8],
    ) -> Result<(), ChunkWriteError> {
        self.region(chunk_x, chunk_z)?
            .write_chunk(chunk_x, chunk_z, payload)
    }

    pub fn delete_chunk(&mut self, chunk_x: i32, chunk_z: i32) -> Result<bool, io::Error> {
        match self.existing_region(chunk_x, chunk_z)? {
            Some(region) => region.delete_chunk(chunk_x, chunk_z),
            None => Ok(false),
        }
    }

    /// Copies the compressed chunk from another store without recompressing.
    ///
    /// Returns false when the other store lacks the chunk.
    pub fn copy_chunk_from<T, Q>(
        &mut self,
        other: &mut RegionStore<T, Q>,
        chunk_x: i32,
        chunk_z: i32,
    ) -> Result<bool, ChunkCopyError>
    where
        T: Read + Write + Seek,
        Q: RegionProvider<T>,
    {
        let source = match other
            .existing_region(chunk_x, chunk_z)
            .map_err(ChunkReadError::from)?
        {
            Some(source) if source.contains_chunk(chunk_x, chunk_z) => source,
            _ => return Ok(false),
        };

        let destination = self
            .region(chunk_x, chunk_z)
            .map_err(ChunkWriteError::from)?;

        destination.copy_chunk_from(source, chunk_x, chunk_z)
    }

    /// Amount of regions currently open.
    pub fn open_regions(&self) -> usize {
        self.regions.len()
    }

    /// Drops every open region, releasing file handles.
    pub fn close(&mut self) {
        self.regions.clear();
    }
}
