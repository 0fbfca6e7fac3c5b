//! Per-column colouring policies.
//!
//! A [`Renderer`] owns one [`TileImage`] and writes exactly one pixel per
//! scanned column. Variants only decide the column's base colour; relief
//! shading and fluid compositing are shared (see [`RenderBase::composite`]).
//!
//! # Adding a renderer
//!
//! 1. Implement [`Renderer`] for a struct holding a [`RenderBase`].
//! 2. Add a [`RendererKind`] variant and construct it in [`RendererKind::create`].

pub mod basic;
pub mod biome;
pub mod flower;
pub mod heightmap;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::{self, ColorCompositor, FLUID_DEPTH_SCALE};
use crate::config::RenderSettings;
use crate::tile::TileImage;
use crate::world::position::{ChunkPos, RegionPos};
use crate::world::provider::ColumnSample;
use crate::world::region::Region;

pub use basic::BasicRenderer;
pub use biome::BiomeRenderer;
pub use flower::FlowerRenderer;
pub use heightmap::{Heightmap, Relief, ReliefGrid};

/// State shared by every renderer: its tile and the compositing options.
pub struct RenderBase {
    tile: TileImage,
    compositor: ColorCompositor,
    heightmap: Heightmap,
    translucent_fluids: bool,
}

impl RenderBase {
    pub fn new(region: RegionPos, settings: &RenderSettings) -> Self {
        Self {
            tile: TileImage::new(region),
            compositor: ColorCompositor::new(settings.biome_blend()),
            heightmap: settings.heightmap,
            translucent_fluids: settings.translucent_fluids,
        }
    }

    pub fn compositor(&self) -> &ColorCompositor {
        &self.compositor
    }

    pub fn tile(&self) -> &TileImage {
        &self.tile
    }

    pub fn into_tile(self) -> TileImage {
        self.tile
    }

    /// Layer relief shading and fluid over `color`. With translucency off,
    /// any fluid paints the column in the biome's water colour.
    pub fn composite(&self, region: &Region, sample: &ColumnSample, relief: Relief, x: i32, z: i32, color: u32) -> u32 {
        let mut pixel = color::blend(self.heightmap.color(relief), color);

        if let Some(fluid) = &sample.fluid {
            if self.translucent_fluids {
                let depth = (fluid.top_y - sample.block_y) as f32 * FLUID_DEPTH_SCALE;
                let shade = self
                    .compositor
                    .fluid_shade(region, &sample.biome, &fluid.block, x, z, depth);
                pixel = color::blend(shade, pixel);
            } else {
                pixel = self.compositor.water_color(region, &sample.biome, x, z);
            }
        }

        pixel
    }

    pub fn write(&mut self, x: i32, z: i32, argb: u32) {
        self.tile.set_pixel(x, z, argb);
    }
}

pub trait Renderer: Send {
    fn kind(&self) -> RendererKind;

    fn base(&self) -> &RenderBase;

    fn base_mut(&mut self) -> &mut RenderBase;

    /// Column colour before relief shading and fluid are applied.
    fn pixel_color(&self, region: &Region, sample: &ColumnSample, x: i32, z: i32) -> u32;

    /// Hand the finished (or partial) tile over.
    fn into_tile(self: Box<Self>) -> TileImage;

    /// Colour one column and write it into the tile.
    fn scan_block(&mut self, region: &Region, chunk: ChunkPos, sample: &ColumnSample, relief: Relief, x: i32, z: i32) {
        debug_assert_eq!(ChunkPos::of_block(x, z), chunk);
        let color = self.pixel_color(region, sample, x, z);
        let pixel = self.base().composite(region, sample, relief, x, z, color);
        self.base_mut().write(x, z, pixel);
    }

    fn tile_image(&self) -> &TileImage {
        self.base().tile()
    }
}

/// Named renderer variants, as they appear in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RendererKind {
    #[serde(rename = "basic")]
    Basic,
    #[serde(rename = "flowermap")]
    Flower,
    #[serde(rename = "biomes")]
    Biome,
}

impl RendererKind {
    pub const ALL: [RendererKind; 3] = [RendererKind::Basic, RendererKind::Flower, RendererKind::Biome];

    pub fn name(self) -> &'static str {
        match self {
            RendererKind::Basic => "basic",
            RendererKind::Flower => "flowermap",
            RendererKind::Biome => "biomes",
        }
    }

    pub fn create(self, region: RegionPos, settings: &RenderSettings) -> Box<dyn Renderer> {
        let base = RenderBase::new(region, settings);
        match self {
            RendererKind::Basic => Box::new(BasicRenderer::new(base)),
            RendererKind::Flower => Box::new(FlowerRenderer::new(base)),
            RendererKind::Biome => Box::new(BiomeRenderer::new(base)),
        }
    }
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RendererKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RendererKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown renderer {s:?}"))
    }
}
