use super::biome::BiomeId;
use super::block::BlockState;
use super::position::LocalBlockPos;
use std::collections::HashMap;

/// Number of blocks along each axis of a chunk section.
pub const SECTION_SIZE: usize = 16;
/// Total block count in one section.
const SECTION_VOLUME: usize = SECTION_SIZE * SECTION_SIZE * SECTION_SIZE;
/// Columns in one chunk.
const COLUMN_COUNT: usize = SECTION_SIZE * SECTION_SIZE;

/// A 16x16x16 cube of block states.
///
/// Stored flat in YZX order (x fastest) for cache-friendly vertical scans.
/// A section that is entirely air is never allocated (see `Chunk`).
#[derive(Clone)]
pub struct ChunkSection {
    blocks: Box<[BlockState; SECTION_VOLUME]>,
}

impl ChunkSection {
    pub fn new_filled(state: BlockState) -> Self {
        Self {
            blocks: Box::new([state; SECTION_VOLUME]),
        }
    }

    pub fn new_empty() -> Self {
        Self::new_filled(BlockState::AIR)
    }

    #[inline]
    const fn index(x: u8, y: u8, z: u8) -> usize {
        (y as usize) * SECTION_SIZE * SECTION_SIZE + (z as usize) * SECTION_SIZE + (x as usize)
    }

    #[inline]
    pub fn get(&self, x: u8, y: u8, z: u8) -> BlockState {
        self.blocks[Self::index(x, y, z)]
    }

    #[inline]
    pub fn set(&mut self, x: u8, y: u8, z: u8, state: BlockState) {
        self.blocks[Self::index(x, y, z)] = state;
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|b| b.is_air())
    }
}

/// A column of chunk sections keyed by section index (y >> 4), plus one
/// biome per (x, z) column.
///
/// Only non-empty sections are stored (sparse).
pub struct Chunk {
    sections: HashMap<i32, ChunkSection>,
    biomes: Box<[BiomeId; COLUMN_COUNT]>,
}

impl Chunk {
    pub fn new() -> Self {
        Self::with_biome(BiomeId::default())
    }

    pub fn with_biome(biome: BiomeId) -> Self {
        Self {
            sections: HashMap::new(),
            biomes: Box::new([biome; COLUMN_COUNT]),
        }
    }

    pub fn get_block(&self, pos: LocalBlockPos) -> BlockState {
        let section_idx = pos.section_index();
        match self.sections.get(&section_idx) {
            Some(section) => section.get(pos.x, pos.section_local_y(), pos.z),
            None => BlockState::AIR,
        }
    }

    pub fn set_block(&mut self, pos: LocalBlockPos, state: BlockState) {
        let section_idx = pos.section_index();

        if state.is_air() {
            if let Some(section) = self.sections.get_mut(&section_idx) {
                section.set(pos.x, pos.section_local_y(), pos.z, state);
                if section.is_empty() {
                    self.sections.remove(&section_idx);
                }
            }
        } else {
            let section = self
                .sections
                .entry(section_idx)
                .or_insert_with(ChunkSection::new_empty);
            section.set(pos.x, pos.section_local_y(), pos.z, state);
        }
    }

    pub fn biome(&self, x: u8, z: u8) -> BiomeId {
        self.biomes[(z as usize & 0xF) * SECTION_SIZE + (x as usize & 0xF)]
    }

    pub fn set_biome(&mut self, x: u8, z: u8, biome: BiomeId) {
        self.biomes[(z as usize & 0xF) * SECTION_SIZE + (x as usize & 0xF)] = biome;
    }

    /// Y range `(min, max)` covered by allocated sections, inclusive.
    pub fn y_bounds(&self) -> Option<(i32, i32)> {
        let min = *self.sections.keys().min()?;
        let max = *self.sections.keys().max()?;
        Some((min * 16, max * 16 + 15))
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }
}

impl Default for Chunk {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::block::BlockId;

    #[test]
    fn clearing_last_block_frees_section() {
        let mut chunk = Chunk::new();
        let pos = LocalBlockPos { x: 3, y: 70, z: 9 };
        chunk.set_block(pos, BlockState::of(BlockId(4)));
        assert_eq!(chunk.section_count(), 1);
        assert_eq!(chunk.y_bounds(), Some((64, 79)));

        chunk.set_block(pos, BlockState::AIR);
        assert_eq!(chunk.section_count(), 0);
        assert_eq!(chunk.y_bounds(), None);
    }

    #[test]
    fn biomes_are_per_column() {
        let mut chunk = Chunk::with_biome(BiomeId(2));
        chunk.set_biome(15, 0, BiomeId(7));
        assert_eq!(chunk.biome(15, 0), BiomeId(7));
        assert_eq!(chunk.biome(0, 15), BiomeId(2));
    }
}
