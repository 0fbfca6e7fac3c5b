//! End-to-end rendering tests against the in-memory world: renderer colours,
//! fluid compositing, region scans, the dispatcher and the context.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use voxmap_engine::color::{self, blue};
use voxmap_engine::config::{MapConfig, RenderSettings};
use voxmap_engine::context::{BLOCKS_FILE, MapContext};
use voxmap_engine::dispatch::RegionDispatcher;
use voxmap_engine::registry::{BiomeRegistry, BlockRegistry};
use voxmap_engine::render::{BasicRenderer, FlowerRenderer, Relief, RenderBase, Renderer, RendererKind};
use voxmap_engine::scan::{RegionScanTask, ScanLocks, ScanOutcome, TileConsumer, scan_regions_parallel};
use voxmap_engine::tile::TileImage;
use voxmap_engine::world::World;
use voxmap_engine::world::biome::{BiomeColors, BiomeId};
use voxmap_engine::world::block::Block;
use voxmap_engine::world::position::{BlockPos, ChunkPos, RegionPos};
use voxmap_engine::world::provider::{ColumnSample, FluidSample, WorldProvider};
use voxmap_engine::world::region::Region;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Collector {
    tiles: Mutex<Vec<(String, RendererKind, TileImage)>>,
}

impl Collector {
    fn len(&self) -> usize {
        self.tiles.lock().unwrap().len()
    }

    fn take(&self) -> Vec<(String, RendererKind, TileImage)> {
        std::mem::take(&mut *self.tiles.lock().unwrap())
    }
}

impl TileConsumer for Collector {
    fn accept(&self, world: &str, renderer: RendererKind, tile: TileImage) {
        self.tiles.lock().unwrap().push((world.to_string(), renderer, tile));
    }
}

fn registries() -> (Arc<BlockRegistry>, Arc<BiomeRegistry>) {
    let blocks = Arc::new(BlockRegistry::default());
    let biomes = Arc::new(BiomeRegistry::new());
    biomes.register("minecraft:plains", BiomeColors::default());
    (blocks, biomes)
}

fn world(name: &str) -> Arc<World> {
    let (blocks, biomes) = registries();
    Arc::new(World::new(name, blocks, biomes))
}

/// Fill one chunk with a flat layer of `block` at height `y`.
fn fill_chunk(world: &World, chunk: ChunkPos, block: &Block, y: i32) {
    let (ox, oz) = chunk.block_origin();
    for dz in 0..16 {
        for dx in 0..16 {
            world.set_block(BlockPos::new(ox + dx, y, oz + dz), block.default_state());
        }
    }
}

fn stone(world: &World) -> Arc<Block> {
    register(world, "minecraft:stone", 0x707070)
}

fn register(world: &World, key: &str, color: u32) -> Arc<Block> {
    world.blocks().register(key, color)
}

fn region(world: &Arc<World>, pos: RegionPos) -> Region {
    Region::new(Arc::clone(world) as Arc<dyn WorldProvider>, pos)
}

fn relief(region: &Region, sample: &ColumnSample, x: i32, z: i32) -> Relief {
    Relief::of(region.world(), x, z, sample.block_y)
}

// ---------------------------------------------------------------------------
// FlowerRenderer
// ---------------------------------------------------------------------------

#[test]
fn flower_renderer_colours_dandelions_yellow() {
    let world = world("flowers");
    let grass = register(&world, "minecraft:grass_block", 0x7FB238);
    let dandelion = register(&world, "minecraft:dandelion", 0xFFFF00);
    fill_chunk(&world, ChunkPos::new(0, 0), &grass, 64);
    world.set_flora(BiomeId(0), vec![dandelion.id()]);

    let region = region(&world, RegionPos::new(0, 0));
    let settings = RenderSettings::default();
    let mut renderer = FlowerRenderer::new(RenderBase::new(region.pos(), &settings));

    let sample = world.sample_column(5, 5).unwrap();
    assert_eq!(renderer.pixel_color(&region, &sample, 5, 5), 0xFFFF_FF00);

    // Flat ground and no fluid: compositing leaves the swatch untouched.
    renderer.scan_block(&region, ChunkPos::new(0, 0), &sample, relief(&region, &sample, 5, 5), 5, 5);
    assert_eq!(renderer.tile_image().get_color(5, 5), 0xFFFF_FF00);
}

#[test]
fn flower_renderer_falls_back_to_gray() {
    let world = world("barren");
    let grass = register(&world, "minecraft:grass_block", 0x7FB238);
    fill_chunk(&world, ChunkPos::new(0, 0), &grass, 64);

    let region = region(&world, RegionPos::new(0, 0));
    let renderer = FlowerRenderer::new(RenderBase::new(region.pos(), &RenderSettings::default()));
    let sample = world.sample_column(3, 3).unwrap();
    assert_eq!(renderer.pixel_color(&region, &sample, 3, 3), 0xFF7F_7F7F);

    // A species missing from the swatch table is treated the same.
    let rose = register(&world, "minecraft:wither_rose", 0x2A2A2A);
    world.set_flora(BiomeId(0), vec![rose.id()]);
    assert_eq!(renderer.pixel_color(&region, &sample, 3, 3), 0xFF7F_7F7F);
}

// ---------------------------------------------------------------------------
// Fluid compositing
// ---------------------------------------------------------------------------

fn sample_with_fluid(world: &World, surface: &Arc<Block>, water: &Arc<Block>, depth: i32) -> ColumnSample {
    let biome = world.biome_at(8, 8).unwrap();
    ColumnSample {
        biome,
        block: Arc::clone(surface),
        block_y: 64,
        fluid: Some(FluidSample {
            block: Arc::clone(water),
            top_y: 64 + depth,
        }),
    }
}

#[test]
fn zero_depth_fluid_is_invisible() {
    let world = world("shallows");
    let stone = stone(&world);
    let water = register(&world, "minecraft:water", 0x4040FF);
    fill_chunk(&world, ChunkPos::new(0, 0), &stone, 64);

    let region = region(&world, RegionPos::new(0, 0));
    let renderer = BasicRenderer::new(RenderBase::new(region.pos(), &RenderSettings::default()));
    let dry = world.sample_column(8, 8).unwrap();
    assert!(dry.fluid.is_none());

    let base = renderer.pixel_color(&region, &dry, 8, 8);
    let flat = relief(&region, &dry, 8, 8);
    let expected = renderer.base().composite(&region, &dry, flat, 8, 8, base);
    let wet = sample_with_fluid(&world, &stone, &water, 0);
    assert_eq!(renderer.base().composite(&region, &wet, flat, 8, 8, base), expected);
}

#[test]
fn deeper_fluid_weighs_more() {
    let world = world("ocean");
    let stone = stone(&world);
    let water = register(&world, "minecraft:water", 0x4040FF);
    fill_chunk(&world, ChunkPos::new(0, 0), &stone, 64);

    let region = region(&world, RegionPos::new(0, 0));
    let renderer = BasicRenderer::new(RenderBase::new(region.pos(), &RenderSettings::default()));
    let base = color::opaque(stone.color());

    // Plains water (0x3F76E4) is bluer than stone, so weight shows in the blue channel.
    let mut last = blue(base);
    for depth in [1, 5, 10, 20, 40, 80] {
        let sample = sample_with_fluid(&world, &stone, &water, depth);
        let pixel = renderer.base().composite(&region, &sample, relief(&region, &sample, 8, 8), 8, 8, base);
        assert!(blue(pixel) > last, "depth {depth} should be bluer than {last:#x}");
        last = blue(pixel);
    }
}

#[test]
fn flat_fluid_mode_uses_biome_water_colour() {
    let world = world("flat_water");
    let stone = stone(&world);
    let water = register(&world, "minecraft:water", 0x4040FF);
    fill_chunk(&world, ChunkPos::new(0, 0), &stone, 64);

    let region = region(&world, RegionPos::new(0, 0));
    let settings = RenderSettings {
        translucent_fluids: false,
        ..RenderSettings::default()
    };
    let renderer = BasicRenderer::new(RenderBase::new(region.pos(), &settings));
    let sample = sample_with_fluid(&world, &stone, &water, 12);
    let pixel = renderer
        .base()
        .composite(&region, &sample, relief(&region, &sample, 8, 8), 8, 8, color::opaque(stone.color()));
    assert_eq!(pixel, 0xFF3F_76E4);
}

#[test]
fn flat_fluid_mode_paints_lava_as_water() {
    let world = world("flat_lava");
    let stone = stone(&world);
    let lava = register(&world, "minecraft:lava", 0xFF5A00);
    fill_chunk(&world, ChunkPos::new(0, 0), &stone, 64);
    for y in 65..=67 {
        world.set_block(BlockPos::new(8, y, 8), lava.default_state());
    }

    let region = region(&world, RegionPos::new(0, 0));
    let settings = RenderSettings {
        translucent_fluids: false,
        ..RenderSettings::default()
    };
    let collector = Arc::new(Collector::default());
    let task = RegionScanTask::new(region, &settings, collector.clone(), ScanLocks::new());
    assert!(matches!(task.run(), ScanOutcome::Complete(_)));

    let tiles = collector.take();
    let tile = &tiles[0].2;
    assert_eq!(tile.get_color(8, 8), 0xFF3F_76E4);
    assert_eq!(tile.get_color(3, 3), 0xFF70_7070);
}

// ---------------------------------------------------------------------------
// Region scans
// ---------------------------------------------------------------------------

#[test]
fn scan_skips_missing_chunks() {
    let world = world("sparse");
    let stone = stone(&world);
    fill_chunk(&world, ChunkPos::new(0, 0), &stone, 10);

    let collector = Arc::new(Collector::default());
    let task = RegionScanTask::new(
        region(&world, RegionPos::new(0, 0)),
        &RenderSettings::default(),
        collector.clone(),
        ScanLocks::new(),
    );

    let ScanOutcome::Complete(stats) = task.run() else {
        panic!("scan should complete");
    };
    assert_eq!(stats.chunks_scanned, 1);
    assert_eq!(stats.chunks_skipped, 32 * 32 - 1);
    assert_eq!(stats.columns, 256);

    let tiles = collector.take();
    assert_eq!(tiles.len(), 1);
    let (name, kind, tile) = &tiles[0];
    assert_eq!(name, "sparse");
    assert_eq!(*kind, RendererKind::Basic);
    assert!(!tile.is_partial());
    assert_eq!(tile.filled(), 256);
    assert_eq!(tile.get_color(3, 3), 0xFF70_7070);
    assert_eq!(tile.get_color(100, 100), 0);
}

#[test]
fn cancelled_scan_delivers_partial_tile() {
    let world = world("cancelled");
    let stone = stone(&world);
    fill_chunk(&world, ChunkPos::new(0, 0), &stone, 10);

    let collector = Arc::new(Collector::default());
    let task = RegionScanTask::new(
        region(&world, RegionPos::new(0, 0)),
        &RenderSettings::default(),
        collector.clone(),
        ScanLocks::new(),
    );
    task.handle().cancel();

    let outcome = task.run();
    assert!(matches!(outcome, ScanOutcome::Partial(_)));
    assert!(outcome.needs_rescan());

    let tiles = collector.take();
    assert_eq!(tiles.len(), 1);
    assert!(tiles[0].2.is_partial());
}

#[test]
fn busy_tile_is_not_rescanned() {
    let world = world("busy");
    let stone = stone(&world);
    fill_chunk(&world, ChunkPos::new(0, 0), &stone, 10);

    let locks = ScanLocks::new();
    let _held = locks.try_acquire("busy", RegionPos::new(0, 0)).unwrap();

    let collector = Arc::new(Collector::default());
    let task = RegionScanTask::new(
        region(&world, RegionPos::new(0, 0)),
        &RenderSettings::default(),
        collector.clone(),
        locks.clone(),
    );
    assert_eq!(task.run(), ScanOutcome::Busy);
    assert_eq!(collector.len(), 0);
}

#[test]
fn one_pass_feeds_every_renderer() {
    let world = world("multi");
    let stone = stone(&world);
    fill_chunk(&world, ChunkPos::new(0, 0), &stone, 10);

    let settings = RenderSettings {
        renderers: RendererKind::ALL.to_vec(),
        ..RenderSettings::default()
    };
    let collector = Arc::new(Collector::default());
    let task = RegionScanTask::new(region(&world, RegionPos::new(0, 0)), &settings, collector.clone(), ScanLocks::new());
    assert!(matches!(task.run(), ScanOutcome::Complete(_)));

    let tiles = collector.take();
    let kinds: Vec<RendererKind> = tiles.iter().map(|(_, k, _)| *k).collect();
    assert_eq!(kinds, RendererKind::ALL.to_vec());

    let biome_tile = &tiles[2].2;
    assert_eq!(biome_tile.get_color(0, 0), color::opaque(BiomeColors::default().map));
    let flower_tile = &tiles[1].2;
    assert_eq!(flower_tile.get_color(0, 0), 0xFF7F_7F7F);
}

#[test]
fn disjoint_regions_scan_in_parallel() {
    let world = world("parallel");
    let stone = stone(&world);
    let regions = [
        RegionPos::new(0, 0),
        RegionPos::new(-1, 0),
        RegionPos::new(0, -1),
        RegionPos::new(3, 7),
    ];
    for pos in regions {
        let (ox, oz) = pos.block_origin();
        fill_chunk(&world, ChunkPos::of_block(ox, oz), &stone, 20);
    }

    let collector = Arc::new(Collector::default());
    let locks = ScanLocks::new();
    let tasks = regions
        .iter()
        .map(|&pos| RegionScanTask::new(region(&world, pos), &RenderSettings::default(), collector.clone(), locks.clone()))
        .collect();

    let outcomes = scan_regions_parallel(tasks);
    assert_eq!(outcomes.len(), 4);
    assert!(outcomes.iter().all(|o| matches!(o, ScanOutcome::Complete(_))));
    assert_eq!(locks.active_count(), 0);

    let mut scanned: Vec<RegionPos> = collector.take().into_iter().map(|(_, _, t)| t.region()).collect();
    scanned.sort();
    let mut expected = regions.to_vec();
    expected.sort();
    assert_eq!(scanned, expected);
}

// ---------------------------------------------------------------------------
// Dispatcher and context
// ---------------------------------------------------------------------------

#[test]
fn dispatcher_scans_dirty_regions_in_background() {
    let world = world("dispatch");
    let stone = stone(&world);
    fill_chunk(&world, ChunkPos::new(0, 0), &stone, 10);
    fill_chunk(&world, ChunkPos::new(40, 0), &stone, 10);

    let collector = Arc::new(Collector::default());
    let dispatcher = RegionDispatcher::new(collector.clone(), 2).unwrap();
    for chunk in world.take_dirty_chunks() {
        dispatcher.mark_chunk_dirty("dispatch", chunk);
    }
    dispatcher.mark_region_dirty("elsewhere", RegionPos::new(0, 0));
    assert_eq!(dispatcher.dirty_count(), 3);

    let provider: Arc<dyn WorldProvider> = world.clone();
    let started = dispatcher.dispatch(|name| {
        (name == "dispatch").then(|| (Arc::clone(&provider), RenderSettings::default()))
    });
    assert_eq!(started, 2);
    assert!(dispatcher.wait_idle(Duration::from_secs(10)));

    assert_eq!(dispatcher.dirty_count(), 0);
    assert_eq!(collector.len(), 2);
}

#[test]
fn context_drives_scans_from_ticks() {
    let data_dir = std::env::temp_dir().join("voxmap_test_context_ticks");
    let _ = std::fs::remove_dir_all(&data_dir);

    let mut config = MapConfig::default();
    config.scheduler.update_interval_ticks = 3;
    config.scheduler.render_threads = 2;

    let collector = Arc::new(Collector::default());
    let ctx = MapContext::new(config, &data_dir, collector.clone()).unwrap();
    ctx.biomes().register("minecraft:plains", BiomeColors::default());

    let world = Arc::new(World::new("overworld", Arc::clone(ctx.blocks()), Arc::clone(ctx.biomes())));
    ctx.register_world(world.clone());
    assert!(ctx.world("overworld").is_some());
    assert!(ctx.require_world("the_end").is_err());

    let stone = ctx.blocks().register("minecraft:stone", 0x707070);
    fill_chunk(&world, ChunkPos::new(0, 0), &stone, 10);
    for chunk in world.take_dirty_chunks() {
        ctx.dispatcher().mark_chunk_dirty("overworld", chunk);
    }

    ctx.start();
    assert_eq!(ctx.scheduler().tick(), 0);
    assert_eq!(ctx.scheduler().tick(), 0);
    assert_eq!(ctx.scheduler().tick(), 1);
    assert!(ctx.dispatcher().wait_idle(Duration::from_secs(10)));
    assert_eq!(collector.len(), 1);

    ctx.shutdown().unwrap();
    assert!(ctx.scheduler().is_empty());
    let saved = std::fs::read_to_string(data_dir.join(BLOCKS_FILE)).unwrap();
    assert!(saved.contains("minecraft:stone"));

    // A fresh context over the same directory keeps the indices.
    let again = MapContext::new(MapConfig::default(), &data_dir, Arc::new(Collector::default())).unwrap();
    assert_eq!(again.blocks().get("minecraft:stone").unwrap().id(), stone.id());

    let _ = std::fs::remove_dir_all(&data_dir);
}

#[test]
fn unregistering_a_world_drops_its_dirty_regions() {
    let data_dir = std::env::temp_dir().join("voxmap_test_context_unregister");
    let ctx = MapContext::new(MapConfig::default(), &data_dir, Arc::new(Collector::default())).unwrap();
    let world = Arc::new(World::new("nether", Arc::clone(ctx.blocks()), Arc::clone(ctx.biomes())));

    let first = ctx.register_world(world.clone());
    let second = ctx.register_world(Arc::new(World::new("nether", Arc::clone(ctx.blocks()), Arc::clone(ctx.biomes()))));
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(ctx.world_names(), vec!["nether".to_string()]);

    ctx.dispatcher().mark_region_dirty("nether", RegionPos::new(2, 2));
    assert!(ctx.unregister_world("nether").is_some());
    assert_eq!(ctx.dispatcher().dirty_count(), 0);
    assert!(ctx.unregister_world("nether").is_none());
    assert!(ctx.world_names().is_empty());
    assert_eq!(ctx.dispatch(), 0);
}
