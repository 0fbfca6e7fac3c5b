use std::collections::HashMap;

use super::{RenderBase, Renderer, RendererKind};
use crate::color;
use crate::tile::TileImage;
use crate::world::provider::ColumnSample;
use crate::world::region::Region;

/// Colour for columns with no flower (or one missing from the swatch).
pub const NO_FLOWER: u32 = 0x7F7F7F;

/// Species → swatch colour.
pub const FLOWER_COLORS: [(&str, u32); 12] = [
    ("minecraft:dandelion", 0xFFFF00),
    ("minecraft:poppy", 0xFF0000),
    ("minecraft:allium", 0x9900FF),
    ("minecraft:azure_bluet", 0xFFFDDD),
    ("minecraft:red_tulip", 0xFF4D62),
    ("minecraft:orange_tulip", 0xFFB55A),
    ("minecraft:white_tulip", 0xDDFFFF),
    ("minecraft:pink_tulip", 0xF5B4FF),
    ("minecraft:oxeye_daisy", 0xFFEEDD),
    ("minecraft:cornflower", 0x4100FF),
    ("minecraft:lily_of_the_valley", 0xFFFFFF),
    ("minecraft:blue_orchid", 0x00BFFF),
];

/// Which flower the biome would grow at each column.
pub struct FlowerRenderer {
    base: RenderBase,
    colors: HashMap<&'static str, u32>,
}

impl FlowerRenderer {
    pub fn new(base: RenderBase) -> Self {
        Self {
            base,
            colors: FLOWER_COLORS.into_iter().collect(),
        }
    }
}

impl Renderer for FlowerRenderer {
    fn kind(&self) -> RendererKind {
        RendererKind::Flower
    }

    fn base(&self) -> &RenderBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut RenderBase {
        &mut self.base
    }

    fn pixel_color(&self, region: &Region, sample: &ColumnSample, x: i32, z: i32) -> u32 {
        let rgb = region
            .world()
            .flower_at(&sample.biome, x, sample.block_y, z)
            .and_then(|flower| self.colors.get(flower.key()).copied())
            .unwrap_or(NO_FLOWER);
        color::opaque(rgb)
    }

    fn into_tile(self: Box<Self>) -> TileImage {
        self.base.into_tile()
    }
}
