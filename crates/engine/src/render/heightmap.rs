//! Relief shading from the opaque surface height of neighbouring columns.

use serde::{Deserialize, Serialize};

use crate::color;
use crate::world::position::{CHUNK_SIZE, ChunkPos};
use crate::world::provider::WorldProvider;

/// Strongest shade a heightmap overlay may apply.
const MAX_SHADE_ALPHA: u32 = 0x80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Heightmap {
    /// Compares against both the north and west neighbours.
    #[default]
    Modern,
    /// North neighbour only, in coarse steps.
    OldSchool,
    None,
}

impl Heightmap {
    /// ARGB overlay for a column: black when it sits below its neighbours,
    /// white when above, fully transparent on flat ground.
    pub fn color(self, relief: Relief) -> u32 {
        // Unloaded neighbours read as level ground.
        let north = relief.north.unwrap_or(relief.y);
        let west = relief.west.unwrap_or(relief.y);
        match self {
            Heightmap::Modern => shade((relief.y - north) + (relief.y - west), 0x11),
            Heightmap::OldSchool => shade(relief.y - north, 0x22),
            Heightmap::None => 0,
        }
    }
}

/// Opaque surface height of a column and of its north and west neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relief {
    pub y: i32,
    pub north: Option<i32>,
    pub west: Option<i32>,
}

impl Relief {
    /// Look both neighbours up directly. Scans use [`ReliefGrid`] instead.
    pub fn of(world: &dyn WorldProvider, x: i32, z: i32, y: i32) -> Self {
        Self {
            y,
            north: world.surface_height(x, z - 1),
            west: world.surface_height(x - 1, z),
        }
    }
}

const GRID: usize = CHUNK_SIZE as usize + 1;

/// Surface heights of one chunk plus the row north and the column west of
/// it. Columns must be recorded north to south, west to east.
pub struct ReliefGrid {
    origin: (i32, i32),
    heights: [[Option<i32>; GRID]; GRID],
}

impl ReliefGrid {
    /// Walks only the 32 border columns; interior heights come from
    /// [`ReliefGrid::record`].
    pub fn new(world: &dyn WorldProvider, chunk: ChunkPos) -> Self {
        let (ox, oz) = chunk.block_origin();
        let mut heights = [[None; GRID]; GRID];
        for d in 0..CHUNK_SIZE {
            let i = d as usize + 1;
            heights[0][i] = world.surface_height(ox + d, oz - 1);
            heights[i][0] = world.surface_height(ox - 1, oz + d);
        }
        Self { origin: (ox, oz), heights }
    }

    /// Store the surface of (x, z) and return its relief.
    pub fn record(&mut self, x: i32, z: i32, y: i32) -> Relief {
        let col = (x - self.origin.0) as usize + 1;
        let row = (z - self.origin.1) as usize + 1;
        self.heights[row][col] = Some(y);
        Relief {
            y,
            north: self.heights[row - 1][col],
            west: self.heights[row][col - 1],
        }
    }
}

fn shade(diff: i32, step: u32) -> u32 {
    if diff == 0 {
        return 0;
    }
    let alpha = (diff.unsigned_abs() * step).min(MAX_SHADE_ALPHA);
    if diff < 0 {
        color::with_alpha(alpha, 0x000000)
    } else {
        color::with_alpha(alpha, 0xFFFFFF)
    }
}
