//! In-memory tile sink: keeps the latest tile per (world, renderer, region).
//! A partial tile never hides a complete one; it only flags the key.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};
use voxmap_engine::render::RendererKind;
use voxmap_engine::scan::TileConsumer;
use voxmap_engine::tile::TileImage;
use voxmap_engine::world::position::RegionPos;

pub type TileKey = (String, RendererKind, RegionPos);

#[derive(Default)]
pub struct TileStore {
    tiles: DashMap<TileKey, TileImage>,
    /// Keys whose latest scan was cancelled.
    partial: DashSet<TileKey>,
    received: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileStoreStats {
    pub tiles: usize,
    pub partial: usize,
    pub received: u64,
}

impl TileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, world: &str, renderer: RendererKind, region: RegionPos) -> Option<TileImage> {
        self.tiles
            .get(&(world.to_string(), renderer, region))
            .map(|t| t.value().clone())
    }

    pub fn is_partial(&self, world: &str, renderer: RendererKind, region: RegionPos) -> bool {
        self.partial.contains(&(world.to_string(), renderer, region))
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn stats(&self) -> TileStoreStats {
        TileStoreStats {
            tiles: self.tiles.len(),
            partial: self.partial.len(),
            received: self.received.load(Ordering::Relaxed),
        }
    }
}

impl TileConsumer for TileStore {
    /// A partial tile only replaces another partial tile (or nothing); a
    /// complete tile already stored stays visible until the re-scan lands.
    fn accept(&self, world: &str, renderer: RendererKind, tile: TileImage) {
        let key = (world.to_string(), renderer, tile.region());
        let partial = tile.is_partial();
        let filled = tile.filled();
        if partial {
            self.partial.insert(key.clone());
        } else {
            self.partial.remove(&key);
        }

        let kept = match self.tiles.entry(key) {
            Entry::Occupied(mut slot) => {
                if partial && !slot.get().is_partial() {
                    true
                } else {
                    slot.insert(tile);
                    false
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(tile);
                false
            }
        };
        self.received.fetch_add(1, Ordering::Relaxed);

        tracing::debug!(
            "Received {} tile of {} ({} pixels{}{})",
            renderer,
            world,
            filled,
            if partial { ", partial" } else { "" },
            if kept { ", kept previous complete tile" } else { "" },
        );
    }
}
