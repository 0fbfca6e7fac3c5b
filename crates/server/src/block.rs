//! Vanilla block ids and their default map colours.
//!
//! Registered into the engine's block registry at startup, after the
//! persisted table has been reloaded, so only ids the registry has never
//! seen get new indices.

use voxmap_engine::registry::BlockRegistry;

pub const AIR: &str = "minecraft:air";
pub const STONE: &str = "minecraft:stone";
pub const DEEPSLATE: &str = "minecraft:deepslate";
pub const BEDROCK: &str = "minecraft:bedrock";
pub const DIRT: &str = "minecraft:dirt";
pub const GRASS_BLOCK: &str = "minecraft:grass_block";
pub const SAND: &str = "minecraft:sand";
pub const SANDSTONE: &str = "minecraft:sandstone";
pub const GRAVEL: &str = "minecraft:gravel";
pub const SNOW_BLOCK: &str = "minecraft:snow_block";
pub const WATER: &str = "minecraft:water";
pub const LAVA: &str = "minecraft:lava";
pub const OAK_LOG: &str = "minecraft:oak_log";
pub const OAK_LEAVES: &str = "minecraft:oak_leaves";
pub const GLASS: &str = "minecraft:glass";

/// Id → 24-bit RGB map colour.
pub const VANILLA_COLORS: &[(&str, u32)] = &[
    (AIR, 0x000000),
    (STONE, 0x707070),
    (DEEPSLATE, 0x646464),
    (BEDROCK, 0x565656),
    (DIRT, 0x976D4D),
    (GRASS_BLOCK, 0x7FB238),
    (SAND, 0xF7E9A3),
    (SANDSTONE, 0xD8CA8C),
    (GRAVEL, 0x838080),
    (SNOW_BLOCK, 0xFFFFFF),
    (WATER, 0x4040FF),
    (LAVA, 0xFF5A00),
    (OAK_LOG, 0x8F7748),
    (OAK_LEAVES, 0x007C00),
    (GLASS, 0xFFFFFF),
    ("minecraft:short_grass", 0x7FB238),
    ("minecraft:dandelion", 0xFFFF00),
    ("minecraft:poppy", 0xFF0000),
    ("minecraft:allium", 0xB27FD8),
    ("minecraft:azure_bluet", 0xE8E8E8),
    ("minecraft:red_tulip", 0xFF4D62),
    ("minecraft:orange_tulip", 0xF9801D),
    ("minecraft:white_tulip", 0xE8E8E8),
    ("minecraft:pink_tulip", 0xF38BAA),
    ("minecraft:oxeye_daisy", 0xE8E8E8),
    ("minecraft:cornflower", 0x3C44AA),
    ("minecraft:lily_of_the_valley", 0xFFFFFF),
    ("minecraft:blue_orchid", 0x3AB3DA),
];

/// Register every vanilla block. Returns how many were new to the registry.
pub fn register_vanilla(blocks: &BlockRegistry) -> usize {
    let before = blocks.len();
    for &(key, color) in VANILLA_COLORS {
        blocks.register(key, color);
    }
    blocks.len() - before
}
