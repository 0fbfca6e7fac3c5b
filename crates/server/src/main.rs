use std::sync::Arc;

use anyhow::Result;
use voxmap_engine::config::MapConfig;
use voxmap_engine::context::MapContext;
use voxmap_engine::world::World;
use voxmap_server::cli::Args;
use voxmap_server::tile_store::TileStore;
use voxmap_server::{biome, block, driver, terrain};

const WORLD_NAME: &str = "minecraft:overworld";

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("voxmap -- live map renderer");

    let config = MapConfig::load(&args.config)?;
    let tiles = Arc::new(TileStore::new());
    let ctx = MapContext::new(config, &args.data, tiles.clone())?;

    // Persisted blocks are already loaded; this only adds ids never seen before.
    let added = block::register_vanilla(ctx.blocks());
    let biomes = biome::register_vanilla(ctx.biomes());
    tracing::info!("Registries ready: {} blocks ({} new), {} biomes", ctx.blocks().len(), added, biomes);
    ctx.save_blocks()?;

    // ── Demo world ──────────────────────────────────────────────────────
    let world = Arc::new(World::new(WORLD_NAME, Arc::clone(ctx.blocks()), Arc::clone(ctx.biomes())));
    biome::install_flora(&world, ctx.biomes(), ctx.blocks());
    tracing::info!("Generating demo terrain (radius {} chunks)...", args.radius);
    let chunks = terrain::generate(&world, ctx.blocks(), ctx.biomes(), args.radius)?;
    tracing::info!("World ready: {} chunks", world.chunk_count());

    ctx.register_world(world.clone());
    for chunk in chunks {
        ctx.dispatcher().mark_chunk_dirty(WORLD_NAME, chunk);
    }
    tracing::info!(
        "{} regions queued for the initial render of {}",
        ctx.dispatcher().dirty_count(),
        ctx.world_names().join(", "),
    );

    // ── Tick loop ───────────────────────────────────────────────────────
    ctx.start();
    let ticker = driver::run(Arc::clone(&ctx), vec![world], driver::TICK_INTERVAL, args.ticks);

    tokio::select! {
        ticks = ticker => {
            tracing::info!("Stopped after {} ticks", ticks);
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received, shutting down...");
        }
    }

    ctx.shutdown()?;

    let stats = tiles.stats();
    tracing::info!(
        "Rendered {} tiles ({} partial, {} deliveries)",
        stats.tiles,
        stats.partial,
        stats.received,
    );
    Ok(())
}
