//! Renders a voxel world into top-down map tiles.
//!
//! A [`World`](world::World) (or any [`WorldProvider`]) is scanned one
//! region at a time; each column is sampled, coloured by one or more
//! [`Renderer`]s and written into a [`TileImage`] that is handed to a
//! [`TileConsumer`]. A tick-driven [`Scheduler`] triggers the scans.

pub mod color;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod registry;
pub mod render;
pub mod scan;
pub mod scheduler;
pub mod tile;
pub mod world;

pub use color::ColorCompositor;
pub use config::{ColorsConfig, MapConfig, RenderSettings, SchedulerConfig};
pub use context::MapContext;
pub use dispatch::RegionDispatcher;
pub use registry::{BiomeRegistry, BlockRegistry};
pub use render::{Renderer, RendererKind};
pub use scan::{RegionScanTask, ScanOutcome, TileConsumer};
pub use scheduler::{Scheduler, Task, TaskHandle};
pub use tile::TileImage;
pub use world::provider::WorldProvider;
