use super::{RenderBase, Renderer, RendererKind};
use crate::color;
use crate::tile::TileImage;
use crate::world::provider::ColumnSample;
use crate::world::region::Region;

/// Flat biome map colours.
pub struct BiomeRenderer {
    base: RenderBase,
}

impl BiomeRenderer {
    pub fn new(base: RenderBase) -> Self {
        Self { base }
    }
}

impl Renderer for BiomeRenderer {
    fn kind(&self) -> RendererKind {
        RendererKind::Biome
    }

    fn base(&self) -> &RenderBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut RenderBase {
        &mut self.base
    }

    fn pixel_color(&self, _region: &Region, sample: &ColumnSample, _x: i32, _z: i32) -> u32 {
        color::opaque(sample.biome.map_color())
    }

    fn into_tile(self: Box<Self>) -> TileImage {
        self.base.into_tile()
    }
}
