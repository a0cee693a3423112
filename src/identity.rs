use nbt::decode::read_compound_tag;
use std::io::Cursor;

/// Chunk records always start with a compound tag.
const COMPOUND_TAG_TYPE_ID: u8 = 10;

/// Finds the world chunk coordinates a decompressed chunk record claims to hold.
///
/// Repair uses this to detect chunks stored in the wrong slot. Returning
/// `None` means the record carries no recognizable position.
pub trait ChunkIdentity {
    fn chunk_position(&self, payload: &[u8]) -> Option<(i32, i32)>;
}

impl<F> ChunkIdentity for F
where
    F: Fn(&[u8]) -> Option<(i32, i32)>,
{
    fn chunk_position(&self, payload: &[u8]) -> Option<(i32, i32)> {
        self(payload)
    }
}

/// Reads `Level.xPos` and `Level.zPos` from an uncompressed NBT chunk record.
#[derive(Debug, Default, Copy, Clone)]
pub struct LevelTagIdentity;

impl ChunkIdentity for LevelTagIdentity {
    fn chunk_position(&self, payload: &[u8]) -> Option<(i32, i32)> {
        if payload.first() != Some(&COMPOUND_TAG_TYPE_ID) {
            return None;
        }

        let mut cursor = Cursor::new(payload);
        let compound_tag = read_compound_tag(&mut cursor).ok()?;
        let level_tag = compound_tag.get_compound_tag("Level").ok()?;

        let x = level_tag.get_i32("xPos").ok()?;
        let z = level_tag.get_i32("zPos").ok()?;

        Some((x, z))
    }
}
