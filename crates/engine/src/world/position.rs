/// Blocks along each horizontal axis of a chunk.
pub const CHUNK_SIZE: i32 = 16;
/// Chunks along each axis of a region.
pub const REGION_CHUNKS: i32 = 32;
/// Blocks along each axis of a region (and pixels along each axis of its tile).
pub const REGION_SIZE: i32 = CHUNK_SIZE * REGION_CHUNKS;

/// Absolute block position in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The chunk this block belongs to.
    pub const fn chunk(&self) -> ChunkPos {
        ChunkPos {
            x: self.x >> 4,
            z: self.z >> 4,
        }
    }

    /// Position within the chunk (0..16 on x/z, y unchanged).
    pub const fn local(&self) -> LocalBlockPos {
        LocalBlockPos {
            x: (self.x & 0xF) as u8,
            y: self.y,
            z: (self.z & 0xF) as u8,
        }
    }
}

/// Chunk column position (each chunk is 16x16 blocks horizontally).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    pub const fn of_block(x: i32, z: i32) -> Self {
        Self::new(x >> 4, z >> 4)
    }

    pub const fn region(&self) -> RegionPos {
        RegionPos {
            x: self.x >> 5,
            z: self.z >> 5,
        }
    }

    /// World x/z of the chunk's north-west column.
    pub const fn block_origin(&self) -> (i32, i32) {
        (self.x << 4, self.z << 4)
    }
}

/// Region position: a 32x32 grid of chunks, one tile per region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionPos {
    pub x: i32,
    pub z: i32,
}

impl RegionPos {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    pub const fn of_block(x: i32, z: i32) -> Self {
        Self::new(x >> 9, z >> 9)
    }

    /// World x/z of the region's north-west column.
    pub const fn block_origin(&self) -> (i32, i32) {
        (self.x * REGION_SIZE, self.z * REGION_SIZE)
    }

    pub const fn contains_block(&self, x: i32, z: i32) -> bool {
        (x >> 9) == self.x && (z >> 9) == self.z
    }

    /// Every chunk in this region, row by row (z outer, x inner).
    pub fn chunks(&self) -> impl Iterator<Item = ChunkPos> + use<> {
        let (cx, cz) = (self.x * REGION_CHUNKS, self.z * REGION_CHUNKS);
        (0..REGION_CHUNKS)
            .flat_map(move |dz| (0..REGION_CHUNKS).map(move |dx| ChunkPos::new(cx + dx, cz + dz)))
    }
}

/// Block position local to a chunk (x, z in 0..16).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalBlockPos {
    pub x: u8,
    pub y: i32,
    pub z: u8,
}

impl LocalBlockPos {
    pub const fn section_index(&self) -> i32 {
        self.y >> 4
    }

    pub const fn section_local_y(&self) -> u8 {
        (self.y.rem_euclid(16)) as u8
    }
}
