use std::fmt;

/// Amount of chunks along one side of a region.
pub const REGION_SIDE_CHUNKS: i32 = 32;

#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Hash, Copy, Clone)]
pub struct RegionPosition {
    pub x: i32,
    pub z: i32,
}

impl RegionPosition {
    pub fn new(x: i32, z: i32) -> RegionPosition {
        RegionPosition { x, z }
    }

    pub fn from_chunk_position(chunk_x: i32, chunk_z: i32) -> RegionPosition {
        let x = chunk_x >> 5;
        let z = chunk_z >> 5;

        RegionPosition::new(x, z)
    }

    /// World chunk coordinates of a slot inside this region.
    pub fn chunk_position(&self, position: RegionChunkPosition) -> (i32, i32) {
        (
            (self.x << 5) + position.x as i32,
            (self.z << 5) + position.z as i32,
        )
    }

    /// Returns true when the world chunk coordinates fall inside this region.
    pub fn contains_chunk(&self, chunk_x: i32, chunk_z: i32) -> bool {
        RegionPosition::from_chunk_position(chunk_x, chunk_z) == *self
    }
}

impl fmt::Display for RegionPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r.{}.{}", self.x, self.z)
    }
}

/// Slot of a chunk inside a region, both coordinates in `0..32`.
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Hash, Copy, Clone)]
pub struct RegionChunkPosition {
    pub x: u8,
    pub z: u8,
}

impl RegionChunkPosition {
    pub fn new(x: u8, z: u8) -> RegionChunkPosition {
        debug_assert!(32 > x, "Region chunk x coordinate out of bounds");
        debug_assert!(32 > z, "Region chunk z coordinate out of bounds");

        RegionChunkPosition { x, z }
    }

    /// Discards the high bits, so world chunk coordinates may be passed freely.
    pub fn from_chunk_position(chunk_x: i32, chunk_z: i32) -> RegionChunkPosition {
        let x = (chunk_x & 31) as u8;
        let z = (chunk_z & 31) as u8;

        RegionChunkPosition::new(x, z)
    }

    pub(crate) fn from_metadata_index(index: usize) -> RegionChunkPosition {
        RegionChunkPosition::new((index & 31) as u8, (index >> 5) as u8)
    }

    pub(crate) fn metadata_index(&self) -> usize {
        self.x as usize + self.z as usize * 32
    }
}

impl fmt::Display for RegionChunkPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}
