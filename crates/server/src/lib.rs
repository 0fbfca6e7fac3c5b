pub mod biome;
pub mod block;
pub mod cli;
pub mod driver;
pub mod terrain;
pub mod tile_store;
