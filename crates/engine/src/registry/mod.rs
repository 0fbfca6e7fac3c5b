pub mod biomes;
pub mod blocks;

pub use biomes::BiomeRegistry;
pub use blocks::BlockRegistry;
