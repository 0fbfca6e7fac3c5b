//! The object that bundles everything the renderer needs at runtime.
//!
//! Created once at startup, handed (as `Arc<MapContext>`) to whatever needs
//! registries, worlds or the scheduler, and torn down with [`MapContext::shutdown`].

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use dashmap::DashMap;

use crate::config::{MapConfig, RenderSettings};
use crate::dispatch::RegionDispatcher;
use crate::registry::{BiomeRegistry, BlockRegistry};
use crate::scan::{ScanLocks, TileConsumer};
use crate::scheduler::{Scheduler, TaskHandle};
use crate::world::provider::WorldProvider;

pub const BLOCKS_FILE: &str = "blocks.json";

/// How long `shutdown` waits for cancelled scans to hand back their tiles.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

pub struct MapContext {
    config: MapConfig,
    data_dir: PathBuf,
    blocks: Arc<BlockRegistry>,
    biomes: Arc<BiomeRegistry>,
    scheduler: Scheduler,
    worlds: DashMap<String, Arc<dyn WorldProvider>>,
    dispatcher: RegionDispatcher,
}

impl MapContext {
    /// Build the context and reload the persisted block colours from `data_dir`.
    pub fn new(config: MapConfig, data_dir: impl Into<PathBuf>, consumer: Arc<dyn TileConsumer>) -> Result<Arc<Self>> {
        let data_dir = data_dir.into();
        let blocks = Arc::new(BlockRegistry::new(&config.colors));
        let blocks_path = data_dir.join(BLOCKS_FILE);
        blocks
            .load_from_disk(&blocks_path)
            .with_context(|| format!("loading block registry from {}", blocks_path.display()))?;

        let dispatcher = RegionDispatcher::new(consumer, config.scheduler.render_threads)?;

        Ok(Arc::new(Self {
            config,
            data_dir,
            blocks,
            biomes: Arc::new(BiomeRegistry::new()),
            scheduler: Scheduler::new(),
            worlds: DashMap::new(),
            dispatcher,
        }))
    }

    /// Register the periodic dispatch task. The task holds a weak reference,
    /// so it stops doing work once the context is dropped.
    pub fn start(self: &Arc<Self>) -> TaskHandle {
        let ctx = Arc::downgrade(self);
        let delay = self.config.scheduler.update_interval_ticks.saturating_sub(1);
        self.scheduler.add(delay, true, move || {
            if let Some(ctx) = ctx.upgrade() {
                ctx.dispatch();
            }
        })
    }

    /// Start scans for every dirty region. Returns the number started.
    pub fn dispatch(&self) -> usize {
        self.dispatcher.dispatch(|name| {
            let world = self.world(name)?;
            Some((world, self.render_settings(name).clone()))
        })
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn blocks(&self) -> &Arc<BlockRegistry> {
        &self.blocks
    }

    pub fn biomes(&self) -> &Arc<BiomeRegistry> {
        &self.biomes
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn dispatcher(&self) -> &RegionDispatcher {
        &self.dispatcher
    }

    pub fn locks(&self) -> &ScanLocks {
        self.dispatcher.locks()
    }

    pub fn render_settings(&self, world: &str) -> &RenderSettings {
        self.config.render_settings(world)
    }

    // ── Worlds ──────────────────────────────────────────────────────────

    /// Register a world under its own name. If one is already registered
    /// under that name, the existing one is kept and returned.
    pub fn register_world(&self, world: Arc<dyn WorldProvider>) -> Arc<dyn WorldProvider> {
        let name = world.name().to_string();
        let entry = self.worlds.entry(name.clone()).or_insert_with(|| {
            tracing::info!("Registered world {}", name);
            world
        });
        Arc::clone(entry.value())
    }

    pub fn unregister_world(&self, name: &str) -> Option<Arc<dyn WorldProvider>> {
        let (_, world) = self.worlds.remove(name)?;
        self.dispatcher.forget_world(name);
        tracing::info!("Unregistered world {}", name);
        Some(world)
    }

    pub fn world(&self, name: &str) -> Option<Arc<dyn WorldProvider>> {
        self.worlds.get(name).map(|w| Arc::clone(w.value()))
    }

    /// Like [`world`](Self::world), for callers that know the world must exist.
    pub fn require_world(&self, name: &str) -> Result<Arc<dyn WorldProvider>> {
        match self.world(name) {
            Some(world) => Ok(world),
            None => bail!("world {name} is not registered"),
        }
    }

    pub fn world_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.worlds.iter().map(|w| w.key().clone()).collect();
        names.sort();
        names
    }

    // ── Lifecycle ───────────────────────────────────────────────────────

    pub fn save_blocks(&self) -> Result<usize> {
        self.blocks.save_to_disk(&self.data_dir.join(BLOCKS_FILE))
    }

    /// Cancel all scheduled tasks and in-flight scans, then persist the block registry.
    pub fn shutdown(&self) -> Result<()> {
        let start = Instant::now();
        self.scheduler.cancel_all();
        self.dispatcher.cancel_running();
        if !self.dispatcher.wait_idle(SHUTDOWN_GRACE) {
            tracing::warn!(
                "{} scans still running after {:.2?}",
                self.dispatcher.active_scans(),
                SHUTDOWN_GRACE,
            );
        }
        let saved = self.save_blocks()?;
        tracing::info!(
            "Map context shut down: {} blocks saved, {} regions left dirty ({:.2?})",
            saved,
            self.dispatcher.dirty_count(),
            start.elapsed(),
        );
        Ok(())
    }
}
