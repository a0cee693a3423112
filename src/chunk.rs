use crate::bounding_box::{BoundingBox, Vector};
use nbt::CompoundTag;
use std::collections::HashMap;

/// Chunk side length in blocks.
pub const CHUNK_SIDE_BLOCKS: i32 = 16;
/// Default world height in blocks.
pub const DEFAULT_HEIGHT: i32 = 128;

/// Entity record with a world-space position.
#[derive(Debug, Clone)]
pub struct Entity {
    pub position: Vector<f64>,
    /// Remaining entity fields.
    pub tag: CompoundTag,
}

impl Entity {
    pub fn new(position: impl Into<Vector<f64>>, tag: CompoundTag) -> Self {
        Entity {
            position: position.into(),
            tag,
        }
    }

    /// Block containing the entity.
    pub fn block_position(&self) -> Vector<i32> {
        Vector::new(
            self.position.x.floor() as i32,
            self.position.y.floor() as i32,
            self.position.z.floor() as i32,
        )
    }

    pub fn copy_with_offset(&self, offset: Vector<i32>) -> Self {
        let offset = Vector::new(offset.x as f64, offset.y as f64, offset.z as f64);

        Entity {
            position: self.position + offset,
            tag: self.tag.clone(),
        }
    }
}

/// Block entity record, such as a chest or a sign.
#[derive(Debug, Clone)]
pub struct TileEntity {
    pub position: Vector<i32>,
    /// Remaining tile entity fields.
    pub tag: CompoundTag,
}

impl TileEntity {
    pub fn new(position: impl Into<Vector<i32>>, tag: CompoundTag) -> Self {
        TileEntity {
            position: position.into(),
            tag,
        }
    }

    pub fn copy_with_offset(&self, offset: Vector<i32>) -> Self {
        TileEntity {
            position: self.position + offset,
            tag: self.tag.clone(),
        }
    }
}

/// Column of 16x16 blocks with per-block metadata.
///
/// Arrays are indexed `(x * 16 + z) * height + y` with local x and z.
#[derive(Debug, Clone)]
pub struct BlockChunk {
    x: i32,
    z: i32,
    height: i32,
    pub blocks: Vec<u8>,
    pub data: Vec<u8>,
    pub entities: Vec<Entity>,
    pub tile_entities: Vec<TileEntity>,
}

impl BlockChunk {
    /// Creates a chunk filled with air.
    pub fn new(x: i32, z: i32, height: i32) -> Self {
        let volume = (CHUNK_SIDE_BLOCKS * CHUNK_SIDE_BLOCKS * height.max(0)) as usize;

        BlockChunk {
            x,
            z,
            height: height.max(0),
            blocks: vec![0; volume],
            data: vec![0; volume],
            entities: Vec::new(),
            tile_entities: Vec::new(),
        }
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.z)
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// World-space box covered by this chunk.
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(
            (self.x * CHUNK_SIDE_BLOCKS, 0, self.z * CHUNK_SIDE_BLOCKS),
            (CHUNK_SIDE_BLOCKS, self.height, CHUNK_SIDE_BLOCKS),
        )
    }

    /// Array index of a world-space position, if the chunk holds it.
    pub fn index(&self, position: Vector<i32>) -> Option<usize> {
        if !self.bounds().contains(position) {
            return None;
        }

        let x = position.x - self.x * CHUNK_SIDE_BLOCKS;
        let z = position.z - self.z * CHUNK_SIDE_BLOCKS;

        Some(((x * CHUNK_SIDE_BLOCKS + z) * self.height + position.y) as usize)
    }

    /// Block id at a world-space position.
    pub fn block(&self, position: impl Into<Vector<i32>>) -> Option<u8> {
        self.index(position.into()).map(|index| self.blocks[index])
    }

    pub fn block_data(&self, position: impl Into<Vector<i32>>) -> Option<u8> {
        self.index(position.into()).map(|index| self.data[index])
    }

    /// Sets a block; returns false when the position is outside the chunk.
    pub fn set_block(&mut self, position: impl Into<Vector<i32>>, block: u8, data: u8) -> bool {
        match self.index(position.into()) {
            Some(index) => {
                self.blocks[index] = block;
                self.data[index] = data;
                true
            }
            None => false,
        }
    }

    pub fn entities_in_box<'a>(&'a self, area: &'a BoundingBox) -> impl Iterator<Item = &'a Entity> {
        self.entities
            .iter()
            .filter(move |entity| area.contains(entity.block_position()))
    }

    pub fn tile_entities_in_box<'a>(
        &'a self,
        area: &'a BoundingBox,
    ) -> impl Iterator<Item = &'a TileEntity> {
        self.tile_entities
            .iter()
            .filter(move |tile_entity| area.contains(tile_entity.position))
    }
}

/// Chunk-addressable block storage consumed by the block copier.
///
/// [`MemoryStore`] keeps chunks in memory. Region files plug in through
/// [`RegionChunkStore`](crate::region_chunks::RegionChunkStore).
pub trait ChunkStore {
    /// Block area of the store; zero width means unbounded.
    fn bounds(&self) -> BoundingBox;

    fn height(&self) -> i32;

    fn width(&self) -> i32 {
        self.bounds().width()
    }

    fn contains_chunk(&self, chunk_x: i32, chunk_z: i32) -> bool;

    fn chunk(&self, chunk_x: i32, chunk_z: i32) -> Option<&BlockChunk>;

    fn chunk_mut(&mut self, chunk_x: i32, chunk_z: i32) -> Option<&mut BlockChunk>;

    /// Creates an empty chunk, replacing any existing one.
    fn create_chunk(&mut self, chunk_x: i32, chunk_z: i32) -> &mut BlockChunk;

    /// Called after a chunk was modified in place.
    fn chunk_changed(&mut self, _chunk_x: i32, _chunk_z: i32) {}
}

/// Chunks kept in memory.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    bounds: BoundingBox,
    height: i32,
    chunks: HashMap<(i32, i32), BlockChunk>,
    changed: Vec<(i32, i32)>,
}

impl MemoryStore {
    /// Unbounded store.
    pub fn new(height: i32) -> Self {
        Self::with_bounds(BoundingBox::default(), height)
    }

    pub fn with_bounds(bounds: BoundingBox, height: i32) -> Self {
        MemoryStore {
            bounds,
            height,
            chunks: HashMap::new(),
            changed: Vec::new(),
        }
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Chunks reported as changed, in order of notification.
    pub fn changed_chunks(&self) -> &[(i32, i32)] {
        &self.changed
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore::new(DEFAULT_HEIGHT)
    }
}

impl ChunkStore for MemoryStore {
    fn bounds(&self) -> BoundingBox {
        self.bounds
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
        let height = self.height;
        let chunk = self
            .chunks
            .entry((chunk_x, chunk_z))
            .or_insert_with(|| BlockChunk::new(chunk_x, chunk_z, height));

        *chunk = BlockChunk::new(chunk_x, chunk_z, height);
        chunk
    }

    fn chunk_changed(&mut self, chunk_x: i32, chunk_z: i32) {
        self.changed.push((chunk_x, chunk_z));
    }
}

#[cfg(test)]
mod tests {
    use crate::bounding_box::{BoundingBox, Vector};
    use crate::chunk::{BlockChunk, ChunkStore, Entity, MemoryStore, TileEntity};
    use nbt::CompoundTag;

    #[test]
    fn test_block_index_layout() {
        let chunk = BlockChunk::new(0, 0, 128);

        assert_eq!(chunk.blocks.len(), 16 * 16 * 128);
        assert_eq!(chunk.index(Vector::new(0, 0, 0)), Some(0));
        assert_eq!(chunk.index(Vector::new(0, 5, 0)), Some(5));
        assert_eq!(chunk.index(Vector::new(0, 0, 1)), Some(128));
        assert_eq!(chunk.index(Vector::new(1, 0, 0)), Some(16 * 128));
        assert_eq!(chunk.index(Vector::new(16, 0, 0)), None);
        assert_eq!(chunk.index(Vector::new(0, 128, 0)), None);
    }

    #[test]
    fn test_blocks_use_world_coordinates() {
        let mut chunk = BlockChunk::new(-1, 2, 16);

        assert!(chunk.set_block((-1, 3, 40), 7, 3));
        assert!(!chunk.set_block((0, 3, 40), 7, 3));

        assert_eq!(chunk.block((-1, 3, 40)), Some(7));
        assert_eq!(chunk.block_data((-1, 3, 40)), Some(3));
        assert_eq!(chunk.block((-16, 3, 40)), Some(0));
        assert_eq!(chunk.bounds(), BoundingBox::new((-16, 0, 32), (16, 16, 16)));
    }

    #[test]
    fn test_entities_in_box_floor_position() {
        let mut chunk = BlockChunk::new(0, 0, 16);
        chunk
            .entities
            .push(Entity::new((3.9, 1.0, 3.0), CompoundTag::new()));
        chunk
            .entities
            .push(Entity::new((4.0, 1.0, 3.0), CompoundTag::new()));
        chunk
            .tile_entities
            .push(TileEntity::new((2, 2, 2), CompoundTag::new()));

        let area = BoundingBox::new((0, 0, 0), (4, 4, 4));

        assert_eq!(chunk.entities_in_box(&area).count(), 1);
        assert_eq!(chunk.tile_entities_in_box(&area).count(), 1);
    }

    #[test]
    fn test_copy_with_offset() {
        let mut tag = CompoundTag::new();
        tag.insert_str("id", "Pig");

        let entity = Entity::new((1.5, 64.0, -2.25), tag).copy_with_offset(Vector::new(16, 0, -16));
        assert_eq!(entity.position, Vector::new(17.5, 64.0, -18.25));
        assert_eq!(entity.tag.get_str("id").unwrap(), "Pig");

        let tile_entity =
            TileEntity::new((1, 2, 3), CompoundTag::new()).copy_with_offset(Vector::new(-1, 1, 0));
        assert_eq!(tile_entity.position, Vector::new(0, 3, 3));
    }

    #[test]
    fn test_memory_store_create_replaces() {
        let mut store = MemoryStore::new(32);

        store.create_chunk(1, 1).set_block((16, 0, 16), 4, 0);
        assert!(store.contains_chunk(1, 1));
        assert_eq!(store.chunk(1, 1).unwrap().block((16, 0, 16)), Some(4));

        store.create_chunk(1, 1);
        assert_eq!(store.chunk(1, 1).unwrap().block((16, 0, 16)), Some(0));
        assert_eq!(store.chunk_count(), 1);
        assert_eq!(store.width(), 0);
    }
}
