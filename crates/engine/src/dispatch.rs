//! Dirty-region tracking and background scan dispatch.
//!
//! The host marks chunks dirty as the world changes. A scheduler task calls
//! [`RegionDispatcher::dispatch`] every few ticks; it drains the dirty set and
//! spawns one scan per region on a dedicated rayon pool, so the tick thread
//! never blocks on rendering. Regions whose scan was cancelled, or that were
//! busy, go back into the dirty set for a later pass.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use dashmap::{DashMap, DashSet};

use crate::config::RenderSettings;
use crate::scan::{RegionScanTask, ScanLocks, ScanOutcome, TileConsumer};
use crate::scheduler::TaskHandle;
use crate::world::position::{ChunkPos, RegionPos};
use crate::world::provider::WorldProvider;
use crate::world::region::Region;

type TileKey = (String, RegionPos);

pub struct RegionDispatcher {
    dirty: Arc<DashSet<TileKey>>,
    running: Arc<DashMap<TileKey, TaskHandle>>,
    active: Arc<AtomicUsize>,
    locks: ScanLocks,
    consumer: Arc<dyn TileConsumer>,
    pool: rayon::ThreadPool,
}

impl RegionDispatcher {
    pub fn new(consumer: Arc<dyn TileConsumer>, threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .thread_name(|i| format!("voxmap-render-{i}"))
            .build()
            .context("building render thread pool")?;
        Ok(Self {
            dirty: Arc::new(DashSet::new()),
            running: Arc::new(DashMap::new()),
            active: Arc::new(AtomicUsize::new(0)),
            locks: ScanLocks::new(),
            consumer,
            pool,
        })
    }

    pub fn locks(&self) -> &ScanLocks {
        &self.locks
    }

    pub fn mark_chunk_dirty(&self, world: &str, chunk: ChunkPos) {
        self.mark_region_dirty(world, chunk.region());
    }

    pub fn mark_region_dirty(&self, world: &str, region: RegionPos) {
        self.dirty.insert((world.to_string(), region));
    }

    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }

    /// Forget pending work for a world (e.g. when it unloads).
    pub fn forget_world(&self, world: &str) {
        self.dirty.retain(|(name, _)| name != world);
    }

    pub fn active_scans(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    /// Drain the dirty set and start a background scan for each region.
    ///
    /// `resolve` maps a world name to its provider and render settings;
    /// regions of unknown worlds are dropped. Returns the number of scans started.
    pub fn dispatch<F>(&self, resolve: F) -> usize
    where
        F: Fn(&str) -> Option<(Arc<dyn WorldProvider>, RenderSettings)>,
    {
        let pending: Vec<TileKey> = self.dirty.iter().map(|k| k.key().clone()).collect();
        let mut started = 0;

        for key in pending {
            // Still being scanned: leave it dirty for the next pass.
            if self.running.contains_key(&key) {
                continue;
            }
            self.dirty.remove(&key);

            let Some((world, settings)) = resolve(&key.0) else {
                tracing::debug!("Dropping dirty region r.{}.{} of unknown world {}", key.1.x, key.1.z, key.0);
                continue;
            };

            let task = RegionScanTask::new(
                Region::new(world, key.1),
                &settings,
                Arc::clone(&self.consumer),
                self.locks.clone(),
            );
            self.running.insert(key.clone(), task.handle());
            self.active.fetch_add(1, Ordering::AcqRel);

            let dirty = Arc::clone(&self.dirty);
            let running = Arc::clone(&self.running);
            let active = Arc::clone(&self.active);
            self.pool.spawn(move || {
                let outcome = task.run();
                running.remove(&key);
                if outcome.needs_rescan() {
                    if let ScanOutcome::Partial(_) = outcome {
                        tracing::debug!("Re-queueing r.{}.{} of {} after partial scan", key.1.x, key.1.z, key.0);
                    }
                    dirty.insert(key);
                }
                active.fetch_sub(1, Ordering::AcqRel);
            });
            started += 1;
        }

        if started > 0 {
            tracing::debug!("Dispatched {} region scans ({} still dirty)", started, self.dirty.len());
        }
        started
    }

    /// Ask every in-flight scan to stop at its next chunk boundary.
    pub fn cancel_running(&self) {
        for entry in self.running.iter() {
            entry.value().cancel();
        }
    }

    /// Block until no scans are in flight, up to `timeout`. Returns whether
    /// the dispatcher went idle.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.active_scans() > 0 {
            if Instant::now() >= deadline {
                return false;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        true
    }
}
