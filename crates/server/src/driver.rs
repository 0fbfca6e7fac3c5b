//! Fixed-cadence tick driver.
//!
//! Each tick forwards the worlds' dirty chunks to the dispatcher and then
//! ticks the scheduler once. The scheduler's dispatch task does the rest;
//! scans run on the render pool, never on this task.

use std::sync::Arc;
use std::time::{Duration, Instant};

use voxmap_engine::context::MapContext;
use voxmap_engine::world::World;
use voxmap_engine::world::provider::WorldProvider;

/// 20 ticks per second.
pub const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Ticks between status lines (one minute at 20 TPS).
const STATUS_EVERY: u64 = 20 * 60;

/// Run the tick loop until `max_ticks` ticks have elapsed (forever if `None`).
/// Returns the number of ticks run.
pub async fn run(ctx: Arc<MapContext>, worlds: Vec<Arc<World>>, interval: Duration, max_ticks: Option<u64>) -> u64 {
    let mut timer = tokio::time::interval(interval);
    timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let started = Instant::now();
    let mut ticks = 0u64;

    loop {
        if max_ticks.is_some_and(|max| ticks >= max) {
            break;
        }
        timer.tick().await;

        let forwarded = forward_dirty(&ctx, &worlds);
        let ran = ctx.scheduler().tick();
        ticks += 1;

        if forwarded > 0 || ran > 0 {
            tracing::trace!("Tick {}: {} dirty chunks forwarded, {} tasks ran", ticks, forwarded, ran);
        }
        if ticks % STATUS_EVERY == 0 {
            tracing::info!(
                "Tick {} ({:.2?} up): {} regions dirty, {} scans active",
                ticks,
                started.elapsed(),
                ctx.dispatcher().dirty_count(),
                ctx.dispatcher().active_scans(),
            );
        }
    }

    ticks
}

/// Hand every chunk modified since the last tick to the dispatcher.
pub fn forward_dirty(ctx: &MapContext, worlds: &[Arc<World>]) -> usize {
    let mut forwarded = 0;
    for world in worlds {
        for chunk in world.take_dirty_chunks() {
            ctx.dispatcher().mark_chunk_dirty(world.name(), chunk);
            forwarded += 1;
        }
    }
    forwarded
}
