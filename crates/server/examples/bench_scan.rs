//! Benchmark: sequential vs parallel region scans.
//!
//! Generates the demo terrain over a grid of regions and renders every region
//! once one after another, then again on the rayon pool.
//! Run with: `cargo run --release -p voxmap-server --example bench_scan`

use std::sync::Arc;
use std::time::Instant;

use voxmap_engine::config::RenderSettings;
use voxmap_engine::render::RendererKind;
use voxmap_engine::scan::{RegionScanTask, ScanLocks, ScanOutcome, scan_regions_parallel};
use voxmap_engine::world::World;
use voxmap_engine::world::position::{REGION_CHUNKS, RegionPos};
use voxmap_engine::world::provider::WorldProvider;
use voxmap_engine::world::region::Region;
use voxmap_engine::{BiomeRegistry, BlockRegistry};
use voxmap_server::tile_store::TileStore;
use voxmap_server::{biome, block, terrain};

fn main() -> anyhow::Result<()> {
    // Regions per side; the world spans side² full regions centred on the origin.
    let side = 4;
    let chunk_radius = side * REGION_CHUNKS / 2;

    println!("=== voxmap: region scan benchmark ===\n");

    let blocks = Arc::new(BlockRegistry::default());
    let biomes = Arc::new(BiomeRegistry::new());
    block::register_vanilla(&blocks);
    biome::register_vanilla(&biomes);
    let world = Arc::new(World::new("bench", Arc::clone(&blocks), Arc::clone(&biomes)));
    biome::install_flora(&world, &biomes, &blocks);

    let t0 = Instant::now();
    terrain::generate(&world, &blocks, &biomes, chunk_radius)?;
    println!("  Generated {} chunks in {:.2?}", world.chunk_count(), t0.elapsed());

    let settings = RenderSettings {
        renderers: RendererKind::ALL.to_vec(),
        ..RenderSettings::default()
    };
    let half = side / 2;
    let regions: Vec<RegionPos> = (-half..half)
        .flat_map(|x| (-half..half).map(move |z| RegionPos::new(x, z)))
        .collect();
    println!("  {} regions x {} renderers\n", regions.len(), settings.renderers.len());

    let provider: Arc<dyn WorldProvider> = world;
    let tasks = |store: &Arc<TileStore>| -> Vec<RegionScanTask> {
        let locks = ScanLocks::new();
        regions
            .iter()
            .map(|&pos| {
                RegionScanTask::new(Region::new(Arc::clone(&provider), pos), &settings, store.clone(), locks.clone())
            })
            .collect()
    };

    // --- Sequential ---
    let seq_store = Arc::new(TileStore::new());
    let seq_tasks = tasks(&seq_store);
    let t0 = Instant::now();
    let seq: Vec<ScanOutcome> = seq_tasks.into_iter().map(RegionScanTask::run).collect();
    let dt_seq = t0.elapsed();
    println!("  Sequential: {:>4} scans in {:>8.2?}", seq.len(), dt_seq);

    // --- Parallel ---
    let par_store = Arc::new(TileStore::new());
    let t0 = Instant::now();
    let par = scan_regions_parallel(tasks(&par_store));
    let dt_par = t0.elapsed();
    println!("  Parallel:   {:>4} scans in {:>8.2?}", par.len(), dt_par);

    let speedup = dt_seq.as_secs_f64() / dt_par.as_secs_f64();
    println!("\n  Speedup: {:.2}x", speedup);

    // --- Verify identical ---
    let mut mismatches = 0;
    for &pos in &regions {
        for kind in &settings.renderers {
            let a = seq_store.get("bench", *kind, pos);
            let b = par_store.get("bench", *kind, pos);
            if a.is_none() || a != b {
                mismatches += 1;
            }
        }
    }

    if mismatches == 0 {
        println!("  Verification: PASS (tiles identical)");
    } else {
        println!("  Verification: FAIL ({} mismatches!)", mismatches);
    }
    Ok(())
}
