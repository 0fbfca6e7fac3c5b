use std::fmt;
use std::hash::{Hash, Hasher};

use bitflags::bitflags;

/// Registry index of a block. Assigned in first-seen order and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct BlockId(pub u32);

impl BlockId {
    /// By convention the first block registered is air.
    pub const AIR: BlockId = BlockId(0);

    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A placed block value as stored in chunk sections.
///
/// Only default states are tracked; the handle resolves back to its block
/// through the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlockState {
    block: BlockId,
}

impl BlockState {
    pub const AIR: BlockState = BlockState { block: BlockId::AIR };

    pub const fn of(block: BlockId) -> Self {
        Self { block }
    }

    pub const fn block(self) -> BlockId {
        self.block
    }

    pub fn is_air(self) -> bool {
        self.block == BlockId::AIR
    }
}

bitflags! {
    /// Classification bits, packed into a single byte.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BlockFlags: u8 {
        const FLUID   = 1 << 0;
        const GLASS   = 1 << 1;
        const WATER   = 1 << 2;
        const GRASS   = 1 << 3;
        const FOLIAGE = 1 << 4;
        const AIR     = 1 << 5;
    }
}

/// Id of the only non-water fluid.
pub const LAVA: &str = "minecraft:lava";

/// An immutable block definition.
///
/// Equality and hashing cover the key, colour and classification flags but
/// not the registry index: a block re-registered under a different index
/// with the same attributes compares equal.
#[derive(Clone)]
pub struct Block {
    id: BlockId,
    key: String,
    color: u32,
    flags: BlockFlags,
    default_state: BlockState,
}

impl Block {
    /// `color` is a 24-bit RGB value; higher bits are discarded.
    /// The FLUID bit is derived (water or lava) and never taken from `flags`.
    pub fn new(id: BlockId, key: impl Into<String>, color: u32, flags: BlockFlags) -> Self {
        let key = key.into();
        let mut flags = flags - BlockFlags::FLUID;
        if flags.contains(BlockFlags::WATER) || key == LAVA {
            flags |= BlockFlags::FLUID;
        }
        Self {
            id,
            key,
            color: color & 0xFF_FFFF,
            flags,
            default_state: BlockState::of(id),
        }
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Base colour, 24-bit RGB.
    pub fn color(&self) -> u32 {
        self.color
    }

    pub fn flags(&self) -> BlockFlags {
        self.flags
    }

    pub fn default_state(&self) -> BlockState {
        self.default_state
    }

    pub fn is_air(&self) -> bool {
        self.flags.contains(BlockFlags::AIR)
    }

    pub fn is_foliage(&self) -> bool {
        self.flags.contains(BlockFlags::FOLIAGE)
    }

    pub fn is_grass(&self) -> bool {
        self.flags.contains(BlockFlags::GRASS)
    }

    pub fn is_water(&self) -> bool {
        self.flags.contains(BlockFlags::WATER)
    }

    pub fn is_glass(&self) -> bool {
        self.flags.contains(BlockFlags::GLASS)
    }

    pub fn is_fluid(&self) -> bool {
        self.flags.contains(BlockFlags::FLUID)
    }
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && self.color == other.color
            && self.is_fluid() == other.is_fluid()
            && self.is_foliage() == other.is_foliage()
            && self.is_grass() == other.is_grass()
            && self.is_water() == other.is_water()
            && self.is_glass() == other.is_glass()
    }
}

impl Eq for Block {}

impl Hash for Block {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
        self.color.hash(state);
        self.is_fluid().hash(state);
        self.is_foliage().hash(state);
        self.is_grass().hash(state);
        self.is_water().hash(state);
        self.is_glass().hash(state);
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("id", &self.id.0)
            .field("key", &self.key)
            .field("color", &format_args!("#{:06X}", self.color))
            .field("flags", &self.flags)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(block: &Block) -> u64 {
        let mut h = DefaultHasher::new();
        block.hash(&mut h);
        h.finish()
    }

    #[test]
    fn equality_ignores_index() {
        let a = Block::new(BlockId(3), "minecraft:oak_leaves", 0x48B518, BlockFlags::FOLIAGE);
        let b = Block::new(BlockId(97), "minecraft:oak_leaves", 0x48B518, BlockFlags::FOLIAGE);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(a.default_state(), b.default_state());
    }

    #[test]
    fn equality_sees_color_and_flags() {
        let a = Block::new(BlockId(1), "minecraft:stone", 0x707070, BlockFlags::empty());
        let recolored = Block::new(BlockId(1), "minecraft:stone", 0x717171, BlockFlags::empty());
        let glassy = Block::new(BlockId(1), "minecraft:stone", 0x707070, BlockFlags::GLASS);
        assert_ne!(a, recolored);
        assert_ne!(a, glassy);
    }

    #[test]
    fn fluid_is_derived() {
        let water = Block::new(BlockId(1), "minecraft:water", 0x4040FF, BlockFlags::WATER);
        let lava = Block::new(BlockId(2), LAVA, 0xFF0000, BlockFlags::empty());
        let fake = Block::new(BlockId(3), "minecraft:stone", 0x707070, BlockFlags::FLUID);
        assert!(water.is_fluid() && water.is_water());
        assert!(lava.is_fluid() && !lava.is_water());
        assert!(!fake.is_fluid());
    }

    #[test]
    fn color_is_masked_to_rgb() {
        let block = Block::new(BlockId(0), "minecraft:air", 0xFF12_3456, BlockFlags::AIR);
        assert_eq!(block.color(), 0x12_3456);
        assert!(block.is_air());
    }
}
