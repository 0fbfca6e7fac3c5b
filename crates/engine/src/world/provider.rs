//! The capability interface a host world implements for the renderer.
//!
//! The engine only ever reads through this trait. Anything that can answer
//! these per-column questions (a live game server, a save-file reader, the
//! in-memory [`World`](super::World)) can be rendered.

use std::sync::Arc;

use super::biome::Biome;
use super::block::Block;
use super::position::ChunkPos;

/// The fluid lying on top of a column's opaque surface.
#[derive(Debug, Clone)]
pub struct FluidSample {
    pub block: Arc<Block>,
    /// Y of the topmost fluid block.
    pub top_y: i32,
}

/// Everything a renderer needs to colour one (x, z) column.
#[derive(Debug, Clone)]
pub struct ColumnSample {
    pub biome: Arc<Biome>,
    /// Topmost opaque (non-air, non-glass, non-fluid) block.
    pub block: Arc<Block>,
    pub block_y: i32,
    pub fluid: Option<FluidSample>,
}

impl ColumnSample {
    /// Blocks of fluid between the fluid top and the opaque surface.
    pub fn fluid_depth(&self) -> i32 {
        self.fluid
            .as_ref()
            .map_or(0, |f| (f.top_y - self.block_y).max(0))
    }
}

/// Read-only view of a world, as consumed by region scans.
///
/// Every accessor returns `None` for unloaded or absent data; the caller
/// renders such columns as transparent and moves on.
pub trait WorldProvider: Send + Sync {
    /// Unique world name, e.g. `minecraft:overworld`.
    fn name(&self) -> &str;

    fn is_chunk_loaded(&self, pos: ChunkPos) -> bool;

    fn sample_column(&self, x: i32, z: i32) -> Option<ColumnSample>;

    /// Y of the opaque surface at (x, z).
    fn surface_height(&self, x: i32, z: i32) -> Option<i32>;

    fn biome_at(&self, x: i32, z: i32) -> Option<Arc<Biome>>;

    /// Decorative plant the biome's flora feature would place at this position.
    fn flower_at(&self, biome: &Biome, x: i32, y: i32, z: i32) -> Option<Arc<Block>>;
}
