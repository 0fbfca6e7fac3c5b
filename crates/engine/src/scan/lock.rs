use std::sync::Arc;

use dashmap::DashSet;

use crate::world::position::RegionPos;

type TileKey = (String, RegionPos);

/// At-most-one active scan per tile.
///
/// Cloning shares the same lock table.
#[derive(Clone, Default)]
pub struct ScanLocks {
    active: Arc<DashSet<TileKey>>,
}

impl ScanLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the tile for `(world, region)`, or `None` if a scan already holds it.
    pub fn try_acquire(&self, world: &str, region: RegionPos) -> Option<ScanGuard> {
        let key = (world.to_string(), region);
        if !self.active.insert(key.clone()) {
            return None;
        }
        Some(ScanGuard {
            active: Arc::clone(&self.active),
            key,
        })
    }

    pub fn is_active(&self, world: &str, region: RegionPos) -> bool {
        self.active.contains(&(world.to_string(), region))
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

/// Releases its tile when dropped.
pub struct ScanGuard {
    active: Arc<DashSet<TileKey>>,
    key: TileKey,
}

impl Drop for ScanGuard {
    fn drop(&mut self) {
        self.active.remove(&self.key);
    }
}
