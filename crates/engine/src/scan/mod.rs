//! Region scans: walk every loaded column of a region through a set of
//! renderers and hand the resulting tiles to a [`TileConsumer`].
//!
//! Missing chunks and columns are skipped (their pixels stay transparent).
//! Cancellation is polled at chunk boundaries; a cancelled scan still
//! delivers what it has, with the tile flagged partial so the caller can
//! schedule another pass.

pub mod lock;

use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::config::RenderSettings;
use crate::render::{ReliefGrid, Renderer, RendererKind};
use crate::scheduler::TaskHandle;
use crate::tile::TileImage;
use crate::world::position::CHUNK_SIZE;
use crate::world::region::Region;

pub use lock::{ScanGuard, ScanLocks};

/// Receives finished or partial tiles for encoding and storage.
pub trait TileConsumer: Send + Sync {
    fn accept(&self, world: &str, renderer: RendererKind, tile: TileImage);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub chunks_scanned: usize,
    pub chunks_skipped: usize,
    pub columns: usize,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    Complete(ScanStats),
    /// Cancelled mid-scan; partial tiles were delivered.
    Partial(ScanStats),
    /// Another scan holds this tile; nothing was rendered.
    Busy,
}

impl ScanOutcome {
    /// Whether the region still needs a (re-)scan.
    pub fn needs_rescan(&self) -> bool {
        !matches!(self, ScanOutcome::Complete(_))
    }
}

pub struct RegionScanTask {
    region: Region,
    renderers: Vec<Box<dyn Renderer>>,
    cancel: TaskHandle,
    consumer: Arc<dyn TileConsumer>,
    locks: ScanLocks,
}

impl RegionScanTask {
    /// A scan running every renderer listed in `settings`.
    pub fn new(region: Region, settings: &RenderSettings, consumer: Arc<dyn TileConsumer>, locks: ScanLocks) -> Self {
        let renderers = settings
            .renderers
            .iter()
            .map(|kind| kind.create(region.pos(), settings))
            .collect();
        Self::with_renderers(region, renderers, consumer, locks)
    }

    pub fn with_renderers(
        region: Region,
        renderers: Vec<Box<dyn Renderer>>,
        consumer: Arc<dyn TileConsumer>,
        locks: ScanLocks,
    ) -> Self {
        Self {
            region,
            renderers,
            cancel: TaskHandle::new(),
            consumer,
            locks,
        }
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Handle that stops the scan at its next chunk boundary.
    pub fn handle(&self) -> TaskHandle {
        self.cancel.clone()
    }

    pub fn run(self) -> ScanOutcome {
        let Self {
            region,
            mut renderers,
            cancel,
            consumer,
            locks,
        } = self;

        let Some(_guard) = locks.try_acquire(region.world_name(), region.pos()) else {
            tracing::debug!("{:?} is already being scanned, skipping", region);
            return ScanOutcome::Busy;
        };

        let start = Instant::now();
        let world = region.world();
        let mut stats = ScanStats::default();
        let mut cancelled = false;

        for chunk in region.chunks() {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }
            if !world.is_chunk_loaded(chunk) {
                stats.chunks_skipped += 1;
                continue;
            }

            let (ox, oz) = chunk.block_origin();
            let mut heights = ReliefGrid::new(world, chunk);
            for dz in 0..CHUNK_SIZE {
                for dx in 0..CHUNK_SIZE {
                    let (x, z) = (ox + dx, oz + dz);
                    let Some(sample) = world.sample_column(x, z) else {
                        continue;
                    };
                    let relief = heights.record(x, z, sample.block_y);
                    for renderer in &mut renderers {
                        renderer.scan_block(&region, chunk, &sample, relief, x, z);
                    }
                    stats.columns += 1;
                }
            }
            stats.chunks_scanned += 1;
        }

        stats.elapsed = start.elapsed();

        for renderer in renderers {
            let kind = renderer.kind();
            let mut tile = renderer.into_tile();
            if cancelled {
                tile.mark_partial();
            }
            consumer.accept(region.world_name(), kind, tile);
        }

        if cancelled {
            tracing::info!(
                "Scan of {:?} cancelled after {} chunks ({:.2?}), partial tiles flagged",
                region,
                stats.chunks_scanned,
                stats.elapsed,
            );
            ScanOutcome::Partial(stats)
        } else {
            tracing::debug!(
                "Scanned {:?}: {} chunks, {} skipped, {} columns ({:.2?})",
                region,
                stats.chunks_scanned,
                stats.chunks_skipped,
                stats.columns,
                stats.elapsed,
            );
            ScanOutcome::Complete(stats)
        }
    }
}

/// Run several scans on the rayon pool and wait for all of them.
///
/// Scans of disjoint regions proceed in parallel; two scans of the same tile
/// never overlap (the later one reports [`ScanOutcome::Busy`]).
pub fn scan_regions_parallel(tasks: Vec<RegionScanTask>) -> Vec<ScanOutcome> {
    tasks.into_par_iter().map(RegionScanTask::run).collect()
}
