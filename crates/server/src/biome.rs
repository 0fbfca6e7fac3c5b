//! Vanilla biome tints and the flowers each biome's flora feature places.

use voxmap_engine::registry::{BiomeRegistry, BlockRegistry};
use voxmap_engine::world::World;
use voxmap_engine::world::biome::BiomeColors;

pub const PLAINS: &str = "minecraft:plains";
pub const FOREST: &str = "minecraft:forest";
pub const FLOWER_FOREST: &str = "minecraft:flower_forest";
pub const DESERT: &str = "minecraft:desert";
pub const SNOWY_PLAINS: &str = "minecraft:snowy_plains";
pub const OCEAN: &str = "minecraft:ocean";

pub struct VanillaBiome {
    pub key: &'static str,
    pub colors: BiomeColors,
    pub flowers: &'static [&'static str],
}

const fn colors(grass: u32, foliage: u32, water: u32, map: u32) -> BiomeColors {
    BiomeColors {
        grass,
        foliage,
        water,
        map,
    }
}

pub const VANILLA_BIOMES: &[VanillaBiome] = &[
    VanillaBiome {
        key: PLAINS,
        colors: colors(0x91BD59, 0x77AB2F, 0x3F76E4, 0x8DB360),
        flowers: &[
            "minecraft:dandelion",
            "minecraft:poppy",
            "minecraft:azure_bluet",
            "minecraft:oxeye_daisy",
            "minecraft:cornflower",
            "minecraft:red_tulip",
            "minecraft:orange_tulip",
            "minecraft:white_tulip",
            "minecraft:pink_tulip",
        ],
    },
    VanillaBiome {
        key: FOREST,
        colors: colors(0x79C05A, 0x59AE30, 0x3F76E4, 0x056621),
        flowers: &["minecraft:dandelion", "minecraft:poppy", "minecraft:lily_of_the_valley"],
    },
    VanillaBiome {
        key: FLOWER_FOREST,
        colors: colors(0x79C05A, 0x59AE30, 0x3F76E4, 0x2D8E49),
        flowers: &[
            "minecraft:dandelion",
            "minecraft:poppy",
            "minecraft:allium",
            "minecraft:azure_bluet",
            "minecraft:red_tulip",
            "minecraft:orange_tulip",
            "minecraft:white_tulip",
            "minecraft:pink_tulip",
            "minecraft:oxeye_daisy",
            "minecraft:cornflower",
            "minecraft:lily_of_the_valley",
        ],
    },
    VanillaBiome {
        key: DESERT,
        colors: colors(0xBFB755, 0xAEA42A, 0x3F76E4, 0xFA9418),
        flowers: &[],
    },
    VanillaBiome {
        key: SNOWY_PLAINS,
        colors: colors(0x80B497, 0x60A17B, 0x3D57D6, 0xFFFFFF),
        flowers: &[],
    },
    VanillaBiome {
        key: OCEAN,
        colors: colors(0x8EB971, 0x71A74D, 0x3F76E4, 0x000070),
        flowers: &[],
    },
];

/// Register every vanilla biome. Returns the number of biomes now known.
pub fn register_vanilla(biomes: &BiomeRegistry) -> usize {
    for biome in VANILLA_BIOMES {
        biomes.register(biome.key, biome.colors);
    }
    biomes.len()
}

/// Tell `world` which flowers grow in each vanilla biome. Flowers missing
/// from the block registry are skipped.
pub fn install_flora(world: &World, biomes: &BiomeRegistry, blocks: &BlockRegistry) {
    for vanilla in VANILLA_BIOMES {
        let Some(biome) = biomes.get(vanilla.key) else {
            continue;
        };
        let flowers = vanilla
            .flowers
            .iter()
            .filter_map(|key| blocks.get(key))
            .map(|block| block.id())
            .collect();
        world.set_flora(biome.id(), flowers);
    }
}
