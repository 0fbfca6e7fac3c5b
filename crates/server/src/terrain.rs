//! Demo terrain so the renderer has something to draw.
//!
//! Rolling hills from a few summed waves, a sea level, climate bands picking
//! the biome, and the odd tree in forests. Deterministic for a given radius.

use anyhow::{Context, Result};
use voxmap_engine::registry::{BiomeRegistry, BlockRegistry};
use voxmap_engine::world::World;
use voxmap_engine::world::biome::BiomeId;
use voxmap_engine::world::block::BlockState;
use voxmap_engine::world::chunk::Chunk;
use voxmap_engine::world::position::{ChunkPos, LocalBlockPos};

use crate::{biome, block};

pub const SEA_LEVEL: i32 = 62;
const BEDROCK_Y: i32 = 40;

/// Block states used by the generator, resolved once.
struct Palette {
    bedrock: BlockState,
    stone: BlockState,
    dirt: BlockState,
    grass: BlockState,
    sand: BlockState,
    sandstone: BlockState,
    snow: BlockState,
    water: BlockState,
    log: BlockState,
    leaves: BlockState,
}

impl Palette {
    fn resolve(blocks: &BlockRegistry) -> Result<Self> {
        let state = |key: &str| {
            blocks
                .get(key)
                .map(|b| b.default_state())
                .with_context(|| format!("block {key} is not registered"))
        };
        Ok(Self {
            bedrock: state(block::BEDROCK)?,
            stone: state(block::STONE)?,
            dirt: state(block::DIRT)?,
            grass: state(block::GRASS_BLOCK)?,
            sand: state(block::SAND)?,
            sandstone: state(block::SANDSTONE)?,
            snow: state(block::SNOW_BLOCK)?,
            water: state(block::WATER)?,
            log: state(block::OAK_LOG)?,
            leaves: state(block::OAK_LEAVES)?,
        })
    }
}

struct Biomes {
    plains: BiomeId,
    forest: BiomeId,
    flower_forest: BiomeId,
    desert: BiomeId,
    snowy: BiomeId,
    ocean: BiomeId,
}

impl Biomes {
    fn resolve(biomes: &BiomeRegistry) -> Result<Self> {
        let id = |key: &str| {
            biomes
                .get(key)
                .map(|b| b.id())
                .with_context(|| format!("biome {key} is not registered"))
        };
        Ok(Self {
            plains: id(biome::PLAINS)?,
            forest: id(biome::FOREST)?,
            flower_forest: id(biome::FLOWER_FOREST)?,
            desert: id(biome::DESERT)?,
            snowy: id(biome::SNOWY_PLAINS)?,
            ocean: id(biome::OCEAN)?,
        })
    }

    fn at(&self, x: i32, z: i32, height: i32) -> BiomeId {
        if height < SEA_LEVEL {
            return self.ocean;
        }
        let climate = (x as f64 / 97.0).sin() + (z as f64 / 83.0).cos();
        match climate {
            c if c > 1.0 => self.snowy,
            c if c > 0.3 => self.forest,
            c if c > -0.3 => self.plains,
            c if c > -0.9 => self.flower_forest,
            _ => self.desert,
        }
    }
}

/// Surface height of the demo terrain at (x, z).
pub fn height_at(x: i32, z: i32) -> i32 {
    let (fx, fz) = (x as f64, z as f64);
    let wave = 8.0 * (fx / 23.0).sin() + 6.0 * (fz / 17.0).cos() + 3.0 * ((fx + fz) / 9.0).sin();
    64 + wave.round() as i32
}

fn is_tree(x: i32, z: i32) -> bool {
    let h = (x.wrapping_mul(73_856_093) ^ z.wrapping_mul(19_349_663)) as u32;
    h % 61 == 0
}

/// Fill a `(2r)²` square of chunks around the origin. Chunks are inserted
/// without marking them dirty; the caller decides what to render.
/// Returns the generated chunk positions.
pub fn generate(world: &World, blocks: &BlockRegistry, biomes: &BiomeRegistry, chunk_radius: i32) -> Result<Vec<ChunkPos>> {
    let palette = Palette::resolve(blocks)?;
    let climate = Biomes::resolve(biomes)?;
    let mut generated = Vec::new();

    for cx in -chunk_radius..chunk_radius {
        for cz in -chunk_radius..chunk_radius {
            let pos = ChunkPos::new(cx, cz);
            world.insert_chunk(pos, build_chunk(pos, &palette, &climate));
            generated.push(pos);
        }
    }
    Ok(generated)
}

fn build_chunk(pos: ChunkPos, p: &Palette, climate: &Biomes) -> Chunk {
    let mut chunk = Chunk::new();
    let (ox, oz) = pos.block_origin();

    for lx in 0..16u8 {
        for lz in 0..16u8 {
            let (x, z) = (ox + i32::from(lx), oz + i32::from(lz));
            let height = height_at(x, z);
            let biome = climate.at(x, z, height);
            chunk.set_biome(lx, lz, biome);

            let mut set = |y: i32, state: BlockState| {
                chunk.set_block(LocalBlockPos { x: lx, y, z: lz }, state);
            };

            set(BEDROCK_Y, p.bedrock);
            for y in BEDROCK_Y + 1..height - 3 {
                set(y, p.stone);
            }

            let (top, filler) = if biome == climate.desert {
                (p.sand, p.sandstone)
            } else if biome == climate.ocean || height <= SEA_LEVEL + 1 {
                (p.sand, p.sand)
            } else if biome == climate.snowy {
                (p.snow, p.dirt)
            } else {
                (p.grass, p.dirt)
            };
            for y in height - 3..height {
                set(y, filler);
            }
            set(height, top);

            for y in height + 1..=SEA_LEVEL {
                set(y, p.water);
            }

            let wooded = biome == climate.forest || biome == climate.flower_forest || biome == climate.plains;
            if wooded && top == p.grass && is_tree(x, z) {
                for y in height + 1..height + 5 {
                    set(y, p.log);
                }
                set(height + 5, p.leaves);
            }
        }
    }
    chunk
}
