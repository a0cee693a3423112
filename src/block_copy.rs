use crate::bounding_box::{BoundingBox, ChunkPositions, Vector};
use crate::chunk::{BlockChunk, ChunkStore, CHUNK_SIDE_BLOCKS};
use log::{debug, info};
use std::collections::HashMap;
use std::time::Instant;

/// Set of source block ids allowed to be copied.
#[derive(Debug, Clone)]
pub enum BlockMask {
    /// Every block passes.
    All,
    /// Only blocks whose id is flagged pass.
    Only(Box<[bool; 256]>),
}

impl BlockMask {
    pub fn only(blocks: impl IntoIterator<Item = u8>) -> Self {
        let mut table = Box::new([false; 256]);

        for block in blocks {
            table[block as usize] = true;
        }

        BlockMask::Only(table)
    }

    pub fn allows(&self, block: u8) -> bool {
        match self {
            BlockMask::All => true,
            BlockMask::Only(table) => table[block as usize],
        }
    }
}

impl Default for BlockMask {
    fn default() -> Self {
        BlockMask::All
    }
}

/// Translates block ids and metadata between the materials of two stores.
pub trait BlockConverter {
    fn convert(&self, block: u8, data: u8) -> (u8, u8);
}

impl<F> BlockConverter for F
where
    F: Fn(u8, u8) -> (u8, u8),
{
    fn convert(&self, block: u8, data: u8) -> (u8, u8) {
        self(block, data)
    }
}

/// Stores sharing the same materials.
#[derive(Debug, Default, Copy, Clone)]
pub struct IdentityConverter;

impl BlockConverter for IdentityConverter {
    fn convert(&self, block: u8, data: u8) -> (u8, u8) {
        (block, data)
    }
}

/// Block id replacements; unmapped blocks pass unchanged.
#[derive(Debug, Default, Clone)]
pub struct BlockIdMap {
    blocks: HashMap<u8, (u8, Option<u8>)>,
}

impl BlockIdMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the block id, keeping its metadata.
    pub fn insert(&mut self, from: u8, to: u8) {
        self.blocks.insert(from, (to, None));
    }

    pub fn insert_with_data(&mut self, from: u8, to: u8, data: u8) {
        self.blocks.insert(from, (to, Some(data)));
    }
}

impl BlockConverter for BlockIdMap {
    fn convert(&self, block: u8, data: u8) -> (u8, u8) {
        match self.blocks.get(&block) {
            Some((to, Some(to_data))) => (*to, *to_data),
            Some((to, None)) => (*to, data),
            None => (block, data),
        }
    }
}

/// Behaviour of a block copy.
#[derive(Debug, Clone)]
pub struct CopyOptions {
    pub mask: BlockMask,
    /// Entities are copied along with blocks; tile entities always are.
    pub copy_entities: bool,
    /// Missing destination chunks are created when a source chunk covers them.
    pub create_missing: bool,
}

impl CopyOptions {
    pub fn with_mask(mut self, mask: BlockMask) -> Self {
        self.mask = mask;
        self
    }

    pub fn with_copy_entities(mut self, copy_entities: bool) -> Self {
        self.copy_entities = copy_entities;
        self
    }

    pub fn with_create_missing(mut self, create_missing: bool) -> Self {
        self.create_missing = create_missing;
        self
    }
}

impl Default for CopyOptions {
    fn default() -> Self {
        CopyOptions {
            mask: BlockMask::All,
            copy_entities: true,
            create_missing: false,
        }
    }
}

/// Totals of a finished or interrupted copy.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct CopyStats {
    pub chunks: usize,
    pub entities: usize,
    pub tile_entities: usize,
}

/// Moves the destination box inside the destination bounds.
///
/// The source box origin shifts by the same amount so cells keep mapping
/// to the same destination positions. A destination without width is
/// unbounded and the arguments are returned as is.
pub fn adjust_copy_parameters<D>(
    destination: &D,
    source_box: BoundingBox,
    destination_point: Vector<i32>,
) -> (BoundingBox, Vector<i32>)
where
    D: ChunkStore + ?Sized,
{
    debug!(
        target: "region-store",
        "Asked to copy {} blocks from {} to {}",
        source_box.volume(),
        source_box,
        destination_point
    );

    if destination.width() == 0 {
        return (source_box, destination_point);
    }

    let destination_box = BoundingBox::new(destination_point, source_box.size());
    let actual_destination_box = destination_box.intersect(&destination.bounds());

    let actual_source_box = BoundingBox::new(
        source_box.origin() + actual_destination_box.origin() - destination_box.origin(),
        actual_destination_box.size(),
    );

    (actual_source_box, actual_destination_box.origin())
}

/// Block copy between two stores, one destination chunk per step.
///
/// Yields `(chunks_done, chunks_total)` after each destination chunk;
/// dropping the iterator stops the copy.
pub struct CopyBlocks<'a, D: ?Sized, S: ?Sized, C: ?Sized> {
    destination: &'a mut D,
    source: &'a S,
    converter: &'a C,
    options: CopyOptions,
    destination_box: BoundingBox,
    copy_offset: Vector<i32>,
    chunk_positions: ChunkPositions,
    chunks_total: usize,
    stats: CopyStats,
    started: Instant,
    finished: bool,
}

impl<'a, D, S, C> CopyBlocks<'a, D, S, C>
where
    D: ChunkStore + ?Sized,
    S: ChunkStore + ?Sized,
    C: BlockConverter + ?Sized,
{
    pub fn new(
        destination: &'a mut D,
        source: &'a S,
        source_box: BoundingBox,
        destination_point: impl Into<Vector<i32>>,
        converter: &'a C,
        options: CopyOptions,
    ) -> Self {
        let (source_box, destination_point) =
            adjust_copy_parameters(&*destination, source_box, destination_point.into());

        info!(
            target: "region-store",
            "Copying {} blocks from {} to {}",
            source_box.volume(),
            source_box,
            destination_point
        );

        let destination_box = source_box.with_origin(destination_point);

        CopyBlocks {
            destination,
            source,
            converter,
            options,
            destination_box,
            copy_offset: destination_point - source_box.origin(),
            chunk_positions: destination_box.chunk_positions(),
            chunks_total: destination_box.chunk_count(),
            stats: CopyStats::default(),
            started: Instant::now(),
            finished: false,
        }
    }

    pub fn stats(&self) -> CopyStats {
        self.stats
    }

    /// Copies everything mapping into one destination chunk.
    ///
    /// Returns false when the destination chunk was skipped.
    fn copy_chunk(&mut self, chunk_x: i32, chunk_z: i32) -> bool {
        let destination_chunk_box = BoundingBox::new(
            (chunk_x * CHUNK_SIDE_BLOCKS, 0, chunk_z * CHUNK_SIDE_BLOCKS),
            (
                CHUNK_SIDE_BLOCKS,
                self.destination.height(),
                CHUNK_SIDE_BLOCKS,
            ),
        )
        .intersect(&self.destination_box);

        let area = destination_chunk_box.with_origin(destination_chunk_box.origin() - self.copy_offset);

        if !self.destination.contains_chunk(chunk_x, chunk_z) {
            let source = self.source;
            let covered = area
                .chunk_positions()
                .any(|(x, z)| source.contains_chunk(x, z));

            if !(self.options.create_missing && covered) {
                return false;
            }

            debug!(target: "region-store", "Creating destination chunk {}, {}", chunk_x, chunk_z);
            self.destination.create_chunk(chunk_x, chunk_z);
        }

        let destination_chunk = match self.destination.chunk_mut(chunk_x, chunk_z) {
            Some(chunk) => chunk,
            None => return false,
        };

        for (source_x, source_z) in area.chunk_positions() {
            let source_chunk = match self.source.chunk(source_x, source_z) {
                Some(chunk) => chunk,
                None => continue,
            };

            let (entities, tile_entities) = copy_area(
                destination_chunk,
                source_chunk,
                &area,
                self.copy_offset,
                self.converter,
                &self.options,
            );

            self.stats.entities += entities;
            self.stats.tile_entities += tile_entities;
        }

        self.destination.chunk_changed(chunk_x, chunk_z);

        true
    }
}

impl<'a, D, S, C> Iterator for CopyBlocks<'a, D, S, C>
where
    D: ChunkStore + ?Sized,
    S: ChunkStore + ?Sized,
    C: BlockConverter + ?Sized,
{
    type Item = (usize, usize);

    fn next(&mut self) -> Option<(usize, usize)> {
        while let Some((chunk_x, chunk_z)) = self.chunk_positions.next() {
            if !self.copy_chunk(chunk_x, chunk_z) {
                continue;
            }

            self.stats.chunks += 1;

            if self.stats.chunks % 100 == 0 {
                info!(target: "region-store", "Chunk {}...", self.stats.chunks);
            }

            return Some((self.stats.chunks, self.chunks_total));
        }

        if !self.finished {
            self.finished = true;

            info!(target: "region-store", "Duration: {:?}", self.started.elapsed());
            info!(
                target: "region-store",
                "Copied {} entities and {} tile entities",
                self.stats.entities,
                self.stats.tile_entities
            );
        }

        None
    }
}

/// Copies the part of `area` held by the source chunk, translated by `offset`.
///
/// Returns the amount of copied entities and tile entities.
fn copy_area<C: BlockConverter + ?Sized>(
    destination: &mut BlockChunk,
    source: &BlockChunk,
    area: &BoundingBox,
    offset: Vector<i32>,
    converter: &C,
    options: &CopyOptions,
) -> (usize, usize) {
    let source_area = source.bounds().intersect(area);

    for position in source_area.positions() {
        let source_index = match source.index(position) {
            Some(index) => index,
            None => continue,
        };

        let block = source.blocks[source_index];

        if !options.mask.allows(block) {
            continue;
        }

        let destination_index = match destination.index(position + offset) {
            Some(index) => index,
            None => continue,
        };

        let (block, data) = converter.convert(block, source.data[source_index]);

        destination.blocks[destination_index] = block;
        destination.data[destination_index] = data;
    }

    let mut entities = 0;

    if options.copy_entities {
        for entity in source.entities_in_box(area) {
            destination.entities.push(entity.copy_with_offset(offset));
            entities += 1;
        }
    }

    let mut tile_entities = 0;

    for tile_entity in source.tile_entities_in_box(area) {
        destination
            .tile_entities
            .push(tile_entity.copy_with_offset(offset));
        tile_entities += 1;
    }

    (entities, tile_entities)
}

/// Runs a block copy to completion.
pub fn copy_blocks_from<D, S, C>(
    destination: &mut D,
    source: &S,
    source_box: BoundingBox,
    destination_point: impl Into<Vector<i32>>,
    converter: &C,
    options: CopyOptions,
) -> CopyStats
where
    D: ChunkStore + ?Sized,
    S: ChunkStore + ?Sized,
    C: BlockConverter + ?Sized,
{
    let mut copy = CopyBlocks::new(
        destination,
        source,
        source_box,
        destination_point,
        converter,
        options,
    );

    copy.by_ref().for_each(drop);
    copy.stats()
}

#[cfg(test)]
mod tests {
    use crate::block_copy::{
        adjust_copy_parameters, copy_blocks_from, BlockConverter, BlockIdMap, BlockMask,
        CopyBlocks, CopyOptions, CopyStats, IdentityConverter,
    };
    use crate::bounding_box::{BoundingBox, Vector};
    use crate::chunk::{ChunkStore, Entity, MemoryStore, TileEntity};
    use nbt::CompoundTag;

    fn block_at(store: &MemoryStore, position: Vector<i32>) -> Option<u8> {
        store
            .chunk(position.x >> 4, position.z >> 4)
            .and_then(|chunk| chunk.block(position))
    }

    #[test]
    fn test_copy_with_block_filter() {
        let mut source = MemoryStore::default();
        let chunk = source.create_chunk(0, 0);
        chunk.set_block((5, 5, 5), 1, 0);
        chunk.set_block((6, 5, 5), 2, 0);

        let mut destination = MemoryStore::default();
        let options = CopyOptions::default()
            .with_mask(BlockMask::only(vec![1]))
            .with_create_missing(true);

        let stats = copy_blocks_from(
            &mut destination,
            &source,
            BoundingBox::new((0, 0, 0), (16, 16, 16)),
            (0, 0, 0),
            &IdentityConverter,
            options,
        );

        assert_eq!(stats.chunks, 1);
        assert_eq!(block_at(&destination, Vector::new(5, 5, 5)), Some(1));
        assert_eq!(block_at(&destination, Vector::new(6, 5, 5)), Some(0));
    }

    #[test]
    fn test_copy_preserves_everything_once() {
        let mut source = MemoryStore::new(16);

        for &(x, z) in &[(0, 0), (1, 0)] {
            source.create_chunk(x, z);
        }

        for position in BoundingBox::new((0, 0, 0), (32, 16, 16)).positions() {
            let block = ((position.x + position.y + position.z) % 5 + 1) as u8;
            let data = (position.x % 16) as u8;

            let chunk = source.chunk_mut(position.x >> 4, position.z >> 4).unwrap();
            chunk.set_block(position, block, data);
        }

        let chunk = source.chunk_mut(0, 0).unwrap();
        chunk
            .entities
            .push(Entity::new((10.5, 3.25, 5.5), CompoundTag::new()));
        chunk
            .entities
            .push(Entity::new((2.0, 3.0, 5.0), CompoundTag::new()));

        let chunk = source.chunk_mut(1, 0).unwrap();
        chunk
            .tile_entities
            .push(TileEntity::new((20, 5, 11), CompoundTag::new()));
        chunk
            .tile_entities
            .push(TileEntity::new((20, 5, 12), CompoundTag::new()));

        let source_box = BoundingBox::new((8, 2, 4), (16, 8, 8));
        let offset = Vector::new(12, 2, 26);
        let mut destination = MemoryStore::new(16);

        let progress: Vec<_> = CopyBlocks::new(
            &mut destination,
            &source,
            source_box,
            Vector::new(20, 4, 30),
            &IdentityConverter,
            CopyOptions::default().with_create_missing(true),
        )
        .collect();

        assert_eq!(progress, vec![(1, 4), (2, 4), (3, 4), (4, 4)]);

        for position in source_box.positions() {
            let source_chunk = source.chunk(position.x >> 4, position.z >> 4).unwrap();
            let target = position + offset;
            let destination_chunk = destination.chunk(target.x >> 4, target.z >> 4).unwrap();

            assert_eq!(destination_chunk.block(target), source_chunk.block(position));
            assert_eq!(
                destination_chunk.block_data(target),
                source_chunk.block_data(position)
            );
        }

        let mut copied_blocks = 0;
        let mut entities = Vec::new();
        let mut tile_entities = Vec::new();

        for &(x, z) in &[(1, 1), (2, 1), (1, 2), (2, 2)] {
            let chunk = destination.chunk(x, z).unwrap();

            copied_blocks += chunk.blocks.iter().filter(|&&block| block != 0).count();
            entities.extend(chunk.entities.iter().map(|entity| entity.position));
            tile_entities.extend(chunk.tile_entities.iter().map(|tile| tile.position));
        }

        assert_eq!(copied_blocks, source_box.volume() as usize);
        assert_eq!(entities, vec![Vector::new(22.5, 5.25, 31.5)]);
        assert_eq!(tile_entities, vec![Vector::new(32, 7, 37)]);
        assert_eq!(destination.changed_chunks().len(), 4);
    }

    #[test]
    fn test_missing_destination_chunks_skipped() {
        let mut source = MemoryStore::new(16);
        source.create_chunk(0, 0).set_block((1, 1, 1), 3, 0);
        source.create_chunk(1, 0).set_block((17, 1, 1), 3, 0);

        let mut destination = MemoryStore::new(16);
        destination.create_chunk(0, 0);

        let progress: Vec<_> = CopyBlocks::new(
            &mut destination,
            &source,
            BoundingBox::new((0, 0, 0), (32, 16, 16)),
            (0, 0, 0),
            &IdentityConverter,
            CopyOptions::default(),
        )
        .collect();

        assert_eq!(progress, vec![(1, 2)]);
        assert!(!destination.contains_chunk(1, 0));
        assert_eq!(block_at(&destination, Vector::new(1, 1, 1)), Some(3));
    }

    #[test]
    fn test_no_chunk_created_without_source() {
        let source = MemoryStore::new(16);
        let mut destination = MemoryStore::new(16);

        let stats = copy_blocks_from(
            &mut destination,
            &source,
            BoundingBox::new((0, 0, 0), (16, 16, 16)),
            (0, 0, 0),
            &IdentityConverter,
            CopyOptions::default().with_create_missing(true),
        );

        assert_eq!(stats, CopyStats::default());
        assert_eq!(destination.chunk_count(), 0);
    }

    #[test]
    fn test_stopping_early_leaves_remaining_chunks() {
        let mut source = MemoryStore::new(16);
        source.create_chunk(0, 0).set_block((1, 1, 1), 3, 0);
        source.create_chunk(1, 0).set_block((17, 1, 1), 3, 0);

        let mut destination = MemoryStore::new(16);

        {
            let mut copy = CopyBlocks::new(
                &mut destination,
                &source,
                BoundingBox::new((0, 0, 0), (32, 16, 16)),
                (0, 0, 0),
                &IdentityConverter,
                CopyOptions::default().with_create_missing(true),
            );

            assert_eq!(copy.next(), Some((1, 2)));
            assert_eq!(copy.stats().chunks, 1);
        }

        assert_eq!(destination.changed_chunks(), &[(0, 0)]);
        assert!(!destination.contains_chunk(1, 0));
    }

    #[test]
    fn test_clamp_to_destination_bounds() {
        let destination =
            MemoryStore::with_bounds(BoundingBox::new((0, 0, 0), (32, 16, 32)), 16);

        let (source_box, destination_point) = adjust_copy_parameters(
            &destination,
            BoundingBox::new((0, 0, 0), (16, 16, 16)),
            Vector::new(-8, 0, -8),
        );

        assert_eq!(source_box, BoundingBox::new((8, 0, 8), (8, 16, 8)));
        assert_eq!(destination_point, Vector::new(0, 0, 0));
    }

    #[test]
    fn test_unbounded_destination_keeps_parameters() {
        let destination = MemoryStore::new(16);
        let requested = BoundingBox::new((-40, 0, 3), (100, 16, 5));

        let (source_box, destination_point) =
            adjust_copy_parameters(&destination, requested, Vector::new(-1000, 2, 1000));

        assert_eq!(source_box, requested);
        assert_eq!(destination_point, Vector::new(-1000, 2, 1000));
    }

    #[test]
    fn test_clamped_copy_lands_inside_bounds() {
        let mut source = MemoryStore::new(16);
        source.create_chunk(0, 0).set_block((8, 0, 8), 5, 0);
        source.chunk_mut(0, 0).unwrap().set_block((7, 0, 7), 6, 0);

        let mut destination =
            MemoryStore::with_bounds(BoundingBox::new((0, 0, 0), (32, 16, 32)), 16);
        destination.create_chunk(0, 0);

        copy_blocks_from(
            &mut destination,
            &source,
            BoundingBox::new((0, 0, 0), (16, 16, 16)),
            (-8, 0, -8),
            &IdentityConverter,
            CopyOptions::default(),
        );

        let chunk = destination.chunk(0, 0).unwrap();
        assert_eq!(chunk.block((0, 0, 0)), Some(5));
        assert_eq!(chunk.blocks.iter().filter(|&&block| block != 0).count(), 1);
    }

    #[test]
    fn test_entities_optional_tile_entities_always() {
        let mut source = MemoryStore::new(16);
        let chunk = source.create_chunk(0, 0);
        chunk
            .entities
            .push(Entity::new((1.0, 1.0, 1.0), CompoundTag::new()));
        chunk
            .tile_entities
            .push(TileEntity::new((2, 2, 2), CompoundTag::new()));

        let mut destination = MemoryStore::new(16);

        let stats = copy_blocks_from(
            &mut destination,
            &source,
            BoundingBox::new((0, 0, 0), (16, 16, 16)),
            (0, 0, 0),
            &IdentityConverter,
            CopyOptions::default()
                .with_copy_entities(false)
                .with_create_missing(true),
        );

        assert_eq!(stats.entities, 0);
        assert_eq!(stats.tile_entities, 1);

        let chunk = destination.chunk(0, 0).unwrap();
        assert!(chunk.entities.is_empty());
        assert_eq!(chunk.tile_entities.len(), 1);
    }

    #[test]
    fn test_blocks_converted_after_masking() {
        let mut source = MemoryStore::new(16);
        let chunk = source.create_chunk(0, 0);
        chunk.set_block((0, 0, 0), 1, 0);
        chunk.set_block((1, 0, 0), 2, 4);

        let mut mapping = BlockIdMap::new();
        mapping.insert(2, 20);
        mapping.insert_with_data(1, 10, 9);

        let mut destination = MemoryStore::new(16);
        destination.create_chunk(0, 0);

        copy_blocks_from(
            &mut destination,
            &source,
            BoundingBox::new((0, 0, 0), (16, 16, 16)),
            (0, 0, 0),
            &mapping,
            CopyOptions::default().with_mask(BlockMask::only(vec![2])),
        );

        let chunk = destination.chunk(0, 0).unwrap();
        assert_eq!(chunk.block((0, 0, 0)), Some(0));
        assert_eq!(chunk.block((1, 0, 0)), Some(20));
        assert_eq!(chunk.block_data((1, 0, 0)), Some(4));
    }

    #[test]
    fn test_block_mask() {
        let mask = BlockMask::only(vec![1, 255]);

        assert!(mask.allows(1));
        assert!(mask.allows(255));
        assert!(!mask.allows(0));
        assert!((0..=255).all(|block| BlockMask::All.allows(block)));
    }

    #[test]
    fn test_closure_converter() {
        let shift = |block: u8, data: u8| (block.wrapping_add(1), data);

        assert_eq!(shift.convert(255, 3), (0, 3));
        assert_eq!(IdentityConverter.convert(7, 2), (7, 2));
    }
}
