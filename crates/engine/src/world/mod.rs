pub mod biome;
pub mod block;
pub mod chunk;
pub mod position;
pub mod provider;
pub mod region;

use std::sync::Arc;

use biome::{Biome, BiomeId};
use block::{Block, BlockId, BlockState};
use chunk::Chunk;
use dashmap::{DashMap, DashSet};
use position::{BlockPos, ChunkPos};
use provider::{ColumnSample, FluidSample, WorldProvider};

use crate::registry::{BiomeRegistry, BlockRegistry};

/// An in-memory block world. Thread-safe, lock-sharded by chunk.
///
/// Implements [`WorldProvider`] by resolving stored block states and biome ids
/// through the shared registries.
pub struct World {
    name: String,
    chunks: DashMap<ChunkPos, Chunk>,
    /// Chunks that have been modified since the last drain.
    dirty: DashSet<ChunkPos>,
    /// Flowers each biome's flora feature can place.
    flora: DashMap<BiomeId, Vec<BlockId>>,
    blocks: Arc<BlockRegistry>,
    biomes: Arc<BiomeRegistry>,
}

impl World {
    pub fn new(name: impl Into<String>, blocks: Arc<BlockRegistry>, biomes: Arc<BiomeRegistry>) -> Self {
        Self {
            name: name.into(),
            chunks: DashMap::new(),
            dirty: DashSet::new(),
            flora: DashMap::new(),
            blocks,
            biomes,
        }
    }

    pub fn blocks(&self) -> &Arc<BlockRegistry> {
        &self.blocks
    }

    pub fn biomes(&self) -> &Arc<BiomeRegistry> {
        &self.biomes
    }

    /// Read a block at an absolute position. Returns AIR for unloaded chunks.
    pub fn get_block(&self, pos: BlockPos) -> BlockState {
        match self.chunks.get(&pos.chunk()) {
            Some(chunk) => chunk.get_block(pos.local()),
            None => BlockState::AIR,
        }
    }

    /// Write a block at an absolute position. Creates the chunk if needed.
    /// Marks the containing chunk as dirty.
    ///
    /// Takes `&self` (not `&mut self`) because `DashMap` provides interior
    /// mutability via per-shard locking.
    pub fn set_block(&self, pos: BlockPos, state: BlockState) {
        let chunk_pos = pos.chunk();
        self.chunks
            .entry(chunk_pos)
            .or_default()
            .set_block(pos.local(), state);
        self.dirty.insert(chunk_pos);
    }

    pub fn set_biome(&self, x: i32, z: i32, biome: BiomeId) {
        let chunk_pos = ChunkPos::of_block(x, z);
        self.chunks
            .entry(chunk_pos)
            .or_default()
            .set_biome((x & 0xF) as u8, (z & 0xF) as u8, biome);
        self.dirty.insert(chunk_pos);
    }

    pub fn set_flora(&self, biome: BiomeId, flowers: Vec<BlockId>) {
        self.flora.insert(biome, flowers);
    }

    pub fn has_chunk(&self, pos: ChunkPos) -> bool {
        self.chunks.contains_key(&pos)
    }

    /// Insert a chunk without marking it dirty (used for generation/loading).
    pub fn insert_chunk(&self, pos: ChunkPos, chunk: Chunk) {
        self.chunks.insert(pos, chunk);
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Drain and return all chunk positions that have been modified since the
    /// last call. After this returns, the dirty set is empty.
    pub fn take_dirty_chunks(&self) -> Vec<ChunkPos> {
        let mut dirty = Vec::new();
        // Collect then remove; a chunk dirtied between the two steps is
        // simply reported again next time.
        for entry in self.dirty.iter() {
            dirty.push(*entry);
        }
        for pos in &dirty {
            self.dirty.remove(pos);
        }
        dirty
    }

    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }

    /// Walk a column top-down: skip air and glass, remember the first fluid,
    /// stop at the first opaque block.
    fn scan_column(&self, x: i32, z: i32) -> Option<(Arc<Biome>, Arc<Block>, i32, Option<FluidSample>)> {
        let chunk = self.chunks.get(&ChunkPos::of_block(x, z))?;
        let (lx, lz) = ((x & 0xF) as u8, (z & 0xF) as u8);
        let (min_y, max_y) = chunk.y_bounds()?;
        let biome = self.biomes.get_by_id(chunk.biome(lx, lz))?;

        let mut fluid: Option<FluidSample> = None;
        for y in (min_y..=max_y).rev() {
            let state = chunk.get_block(position::LocalBlockPos { x: lx, y, z: lz });
            if state.is_air() {
                continue;
            }
            let Some(block) = self.blocks.get_by_id(state.block()) else {
                continue;
            };
            if block.is_air() || block.is_glass() {
                continue;
            }
            if block.is_fluid() {
                if fluid.is_none() {
                    fluid = Some(FluidSample { block, top_y: y });
                }
                continue;
            }
            return Some((biome, block, y, fluid));
        }

        // Bottomless fluid: the fluid itself is the surface.
        let fluid = fluid?;
        Some((biome, fluid.block, fluid.top_y, None))
    }
}

impl WorldProvider for World {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_chunk_loaded(&self, pos: ChunkPos) -> bool {
        self.has_chunk(pos)
    }

    fn sample_column(&self, x: i32, z: i32) -> Option<ColumnSample> {
        let (biome, block, block_y, fluid) = self.scan_column(x, z)?;
        Some(ColumnSample {
            biome,
            block,
            block_y,
            fluid,
        })
    }

    fn surface_height(&self, x: i32, z: i32) -> Option<i32> {
        self.scan_column(x, z).map(|(_, _, y, _)| y)
    }

    fn biome_at(&self, x: i32, z: i32) -> Option<Arc<Biome>> {
        let chunk = self.chunks.get(&ChunkPos::of_block(x, z))?;
        self.biomes
            .get_by_id(chunk.biome((x & 0xF) as u8, (z & 0xF) as u8))
    }

    fn flower_at(&self, biome: &Biome, x: i32, y: i32, z: i32) -> Option<Arc<Block>> {
        let flowers = self.flora.get(&biome.id())?;
        if flowers.is_empty() {
            return None;
        }
        let pick = (position_seed(x, y, z) >> 16).rem_euclid(flowers.len() as i64) as usize;
        self.blocks.get_by_id(flowers[pick])
    }
}

/// Deterministic per-position seed for decoration choices.
fn position_seed(x: i32, y: i32, z: i32) -> i64 {
    let mut seed = (i64::from(x).wrapping_mul(3_129_871)) ^ (i64::from(z).wrapping_mul(116_129_781)) ^ i64::from(y);
    seed = seed
        .wrapping_mul(seed)
        .wrapping_mul(42_317_861)
        .wrapping_add(seed.wrapping_mul(11));
    seed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::biome::BiomeColors;

    fn world() -> World {
        let blocks = Arc::new(BlockRegistry::default());
        let biomes = Arc::new(BiomeRegistry::new());
        biomes.register("minecraft:plains", BiomeColors::default());
        World::new("test", blocks, biomes)
    }

    #[test]
    fn sample_sees_through_glass_and_fluid() {
        let world = world();
        let stone = world.blocks.register("minecraft:stone", 0x707070);
        let water = world.blocks.register("minecraft:water", 0x4040FF);
        let glass = world.blocks.register("minecraft:glass", 0xFFFFFF);

        world.set_block(BlockPos::new(3, 60, 4), stone.default_state());
        for y in 61..=65 {
            world.set_block(BlockPos::new(3, y, 4), water.default_state());
        }
        world.set_block(BlockPos::new(3, 70, 4), glass.default_state());

        let sample = world.sample_column(3, 4).unwrap();
        assert_eq!(sample.block.key(), "minecraft:stone");
        assert_eq!(sample.block_y, 60);
        let fluid = sample.fluid.as_ref().unwrap();
        assert_eq!(fluid.top_y, 65);
        assert_eq!(sample.fluid_depth(), 5);
        assert_eq!(world.surface_height(3, 4), Some(60));
    }

    #[test]
    fn unloaded_columns_are_absent() {
        let world = world();
        assert!(world.sample_column(100, 100).is_none());
        assert!(world.surface_height(100, 100).is_none());
        assert!(world.biome_at(100, 100).is_none());
        assert!(!world.is_chunk_loaded(ChunkPos::new(6, 6)));
    }

    #[test]
    fn dirty_chunks_drain_once() {
        let world = world();
        let stone = world.blocks.register("minecraft:stone", 0x707070);
        world.set_block(BlockPos::new(0, 0, 0), stone.default_state());
        world.set_block(BlockPos::new(16, 0, 0), stone.default_state());
        world.insert_chunk(ChunkPos::new(5, 5), Chunk::new());

        let mut dirty = world.take_dirty_chunks();
        dirty.sort();
        assert_eq!(dirty, vec![ChunkPos::new(0, 0), ChunkPos::new(1, 0)]);
        assert_eq!(world.dirty_count(), 0);
    }

    #[test]
    fn flora_lookup_is_deterministic() {
        let world = world();
        let plains = world.biomes.get("minecraft:plains").unwrap();
        assert!(world.flower_at(&plains, 0, 64, 0).is_none());

        let poppy = world.blocks.register("minecraft:poppy", 0xFF0000);
        let dandelion = world.blocks.register("minecraft:dandelion", 0xFFFF00);
        world.set_flora(plains.id(), vec![poppy.id(), dandelion.id()]);

        let mut seen = std::collections::HashSet::new();
        for x in 0..64 {
            let a = world.flower_at(&plains, x, 64, 7).unwrap();
            let b = world.flower_at(&plains, x, 64, 7).unwrap();
            assert_eq!(a.id(), b.id());
            seen.insert(a.id());
        }
        assert_eq!(seen.len(), 2);
    }
}
