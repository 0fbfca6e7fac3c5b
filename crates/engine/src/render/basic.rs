use super::{RenderBase, Renderer, RendererKind};
use crate::tile::TileImage;
use crate::world::provider::ColumnSample;
use crate::world::region::Region;

/// The surface block's own colour, biome-tinted for grass, foliage and water.
pub struct BasicRenderer {
    base: RenderBase,
}

impl BasicRenderer {
    pub fn new(base: RenderBase) -> Self {
        Self { base }
    }
}

impl Renderer for BasicRenderer {
    fn kind(&self) -> RendererKind {
        RendererKind::Basic
    }

    fn base(&self) -> &RenderBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut RenderBase {
        &mut self.base
    }

    fn pixel_color(&self, region: &Region, sample: &ColumnSample, x: i32, z: i32) -> u32 {
        self.base
            .compositor()
            .block_color(region, &sample.biome, &sample.block, x, z)
    }

    fn into_tile(self: Box<Self>) -> TileImage {
        self.base.into_tile()
    }
}
