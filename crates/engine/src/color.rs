//! ARGB colour math: "over" compositing, biome tints and fluid depth shading.
//!
//! Colours are packed `0xAARRGGBB` in a `u32`; 24-bit values are `0x00RRGGBB`.

use crate::world::biome::Biome;
use crate::world::block::Block;
use crate::world::region::Region;

/// Blocks of fluid depth per unit of depth factor.
pub const FLUID_DEPTH_SCALE: f32 = 0.025;

/// Steepness of the fluid opacity curve over the depth factor.
const FLUID_OPACITY_RATE: f32 = 4.0;

// ── Channel helpers ─────────────────────────────────────────────────────

#[inline]
pub const fn alpha(argb: u32) -> u32 {
    argb >> 24
}

#[inline]
pub const fn red(argb: u32) -> u32 {
    (argb >> 16) & 0xFF
}

#[inline]
pub const fn green(argb: u32) -> u32 {
    (argb >> 8) & 0xFF
}

#[inline]
pub const fn blue(argb: u32) -> u32 {
    argb & 0xFF
}

#[inline]
pub const fn argb(a: u32, r: u32, g: u32, b: u32) -> u32 {
    (a & 0xFF) << 24 | (r & 0xFF) << 16 | (g & 0xFF) << 8 | (b & 0xFF)
}

#[inline]
pub const fn with_alpha(alpha: u32, rgb: u32) -> u32 {
    (alpha & 0xFF) << 24 | (rgb & 0xFF_FFFF)
}

#[inline]
pub const fn opaque(rgb: u32) -> u32 {
    with_alpha(0xFF, rgb)
}

/// Parse `#RRGGBB` (the `#` is optional).
pub fn parse_hex(s: &str) -> Option<u32> {
    let digits = s.trim().trim_start_matches('#');
    if digits.len() != 6 {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

pub fn format_hex(rgb: u32) -> String {
    format!("#{:06X}", rgb & 0xFF_FFFF)
}

// ── Compositing ─────────────────────────────────────────────────────────

/// Porter-Duff "over": `overlay` drawn on top of `base`.
///
/// A fully opaque overlay is returned as-is; a fully transparent one leaves
/// `base` untouched.
pub fn blend(overlay: u32, base: u32) -> u32 {
    let a0 = alpha(overlay);
    if a0 == 0xFF {
        return overlay;
    }
    if a0 == 0 {
        return base;
    }

    let fa0 = a0 as f32 / 255.0;
    let fa1 = alpha(base) as f32 / 255.0;
    let a = fa0 + fa1 * (1.0 - fa0);

    let channel = |c0: u32, c1: u32| -> u32 {
        let v = (c0 as f32 * fa0 + c1 as f32 * fa1 * (1.0 - fa0)) / a;
        v.round().clamp(0.0, 255.0) as u32
    };

    argb(
        (a * 255.0).round() as u32,
        channel(red(overlay), red(base)),
        channel(green(overlay), green(base)),
        channel(blue(overlay), blue(base)),
    )
}

/// Channel-wise multiply of two RGB colours; the result is opaque.
pub fn multiply(rgb: u32, tint: u32) -> u32 {
    let mul = |a: u32, b: u32| (a * b + 127) / 255;
    argb(
        0xFF,
        mul(red(rgb), red(tint)),
        mul(green(rgb), green(tint)),
        mul(blue(rgb), blue(tint)),
    )
}

/// Opacity of a fluid column as a function of its depth factor.
///
/// Zero at the surface, strictly increasing, tending to fully opaque.
pub fn fluid_opacity(depth_factor: f32) -> f32 {
    if depth_factor <= 0.0 {
        return 0.0;
    }
    1.0 - (-FLUID_OPACITY_RATE * depth_factor).exp()
}

/// Biome-aware colour functions.
///
/// Tints are averaged over a `(2r+1)²` square of columns when a blend radius
/// is set; neighbour columns without data count as the centre biome.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorCompositor {
    biome_blend: i32,
}

impl ColorCompositor {
    pub fn new(biome_blend: i32) -> Self {
        Self {
            biome_blend: biome_blend.max(0),
        }
    }

    pub fn biome_blend(&self) -> i32 {
        self.biome_blend
    }

    fn biome_tint(&self, region: &Region, biome: &Biome, x: i32, z: i32, pick: fn(&Biome) -> u32) -> u32 {
        let radius = self.biome_blend;
        if radius == 0 {
            return pick(biome);
        }

        let world = region.world();
        let (mut r, mut g, mut b, mut n) = (0u32, 0u32, 0u32, 0u32);
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                let rgb = match world.biome_at(x + dx, z + dz) {
                    Some(neighbor) => pick(&neighbor),
                    None => pick(biome),
                };
                r += red(rgb);
                g += green(rgb);
                b += blue(rgb);
                n += 1;
            }
        }
        argb(0, (r + n / 2) / n, (g + n / 2) / n, (b + n / 2) / n)
    }

    /// Fully opaque, biome-tinted water colour.
    pub fn water_color(&self, region: &Region, biome: &Biome, x: i32, z: i32) -> u32 {
        opaque(self.biome_tint(region, biome, x, z, Biome::water_color))
    }

    pub fn grass_color(&self, region: &Region, biome: &Biome, x: i32, z: i32) -> u32 {
        opaque(self.biome_tint(region, biome, x, z, Biome::grass_color))
    }

    pub fn foliage_color(&self, region: &Region, biome: &Biome, x: i32, z: i32) -> u32 {
        opaque(self.biome_tint(region, biome, x, z, Biome::foliage_color))
    }

    /// Map colour of a block at (x, z): air is transparent, grass/foliage are
    /// multiplied by the biome tint, water takes the biome water colour.
    pub fn block_color(&self, region: &Region, biome: &Biome, block: &Block, x: i32, z: i32) -> u32 {
        if block.is_air() {
            0
        } else if block.is_grass() {
            multiply(block.color(), self.grass_color(region, biome, x, z))
        } else if block.is_foliage() {
            multiply(block.color(), self.foliage_color(region, biome, x, z))
        } else if block.is_water() {
            self.water_color(region, biome, x, z)
        } else {
            opaque(block.color())
        }
    }

    /// Translucent fluid colour for a column whose fluid lies
    /// `depth_factor / FLUID_DEPTH_SCALE` blocks above the opaque surface.
    ///
    /// The alpha channel carries the fluid's weight; blending the result over
    /// the surface colour at depth 0 leaves the surface unchanged.
    pub fn fluid_shade(
        &self,
        region: &Region,
        biome: &Biome,
        fluid: &Block,
        x: i32,
        z: i32,
        depth_factor: f32,
    ) -> u32 {
        let rgb = if fluid.is_water() {
            self.water_color(region, biome, x, z)
        } else {
            fluid.color()
        };
        let alpha = (fluid_opacity(depth_factor) * 255.0).round() as u32;
        with_alpha(alpha, rgb)
    }
}
