use crate::world::position::{REGION_SIZE, RegionPos};

/// Pixels along each axis of a tile (one pixel per block column).
pub const TILE_SIZE: usize = REGION_SIZE as usize;

/// A fixed-size ARGB raster covering exactly one region.
///
/// Pixels are addressed by world column; the tile maps (x, z) onto its local
/// grid by masking with the tile size. Writing a column from another region
/// is a caller bug (checked in debug builds), never a resize.
#[derive(Clone, PartialEq, Eq)]
pub struct TileImage {
    region: RegionPos,
    pixels: Box<[u32]>,
    partial: bool,
}

impl TileImage {
    pub fn new(region: RegionPos) -> Self {
        Self {
            region,
            pixels: vec![0u32; TILE_SIZE * TILE_SIZE].into_boxed_slice(),
            partial: false,
        }
    }

    #[inline]
    fn index(x: i32, z: i32) -> usize {
        let mask = REGION_SIZE - 1;
        ((z & mask) as usize) * TILE_SIZE + ((x & mask) as usize)
    }

    pub fn region(&self) -> RegionPos {
        self.region
    }

    #[inline]
    pub fn set_pixel(&mut self, x: i32, z: i32, argb: u32) {
        debug_assert!(
            self.region.contains_block(x, z),
            "column ({x}, {z}) is outside tile r.{}.{}",
            self.region.x,
            self.region.z,
        );
        self.pixels[Self::index(x, z)] = argb;
    }

    #[inline]
    pub fn get_color(&self, x: i32, z: i32) -> u32 {
        debug_assert!(self.region.contains_block(x, z));
        self.pixels[Self::index(x, z)]
    }

    /// Raw pixels, row-major starting at the region's north-west corner.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Number of pixels that were written with a non-transparent colour.
    pub fn filled(&self) -> usize {
        self.pixels.iter().filter(|&&p| p >> 24 != 0).count()
    }

    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|&p| p >> 24 == 0)
    }

    /// Set when the scan producing this tile stopped early; the region needs
    /// another pass.
    pub fn is_partial(&self) -> bool {
        self.partial
    }

    pub fn mark_partial(&mut self) {
        self.partial = true;
    }
}

impl std::fmt::Debug for TileImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileImage")
            .field("region", &self.region)
            .field("filled", &self.filled())
            .field("partial", &self.partial)
            .finish()
    }
}
