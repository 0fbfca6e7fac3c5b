use std::fmt;
use std::sync::Arc;

use super::position::{ChunkPos, RegionPos};
use super::provider::WorldProvider;

/// One scan/tile unit: a 32x32 chunk grid of a specific world.
#[derive(Clone)]
pub struct Region {
    pos: RegionPos,
    world: Arc<dyn WorldProvider>,
}

impl Region {
    pub fn new(world: Arc<dyn WorldProvider>, pos: RegionPos) -> Self {
        Self { pos, world }
    }

    pub fn pos(&self) -> RegionPos {
        self.pos
    }

    pub fn world(&self) -> &dyn WorldProvider {
        &*self.world
    }

    pub fn world_name(&self) -> &str {
        self.world.name()
    }

    pub fn chunks(&self) -> impl Iterator<Item = ChunkPos> + use<> {
        self.pos.chunks()
    }
}

impl fmt::Debug for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Region({} r.{}.{})", self.world.name(), self.pos.x, self.pos.z)
    }
}
