//! Configuration types. All of them deserialize from JSON with every field
//! optional.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::render::RendererKind;
use crate::render::heightmap::Heightmap;

/// Largest biome blend radius, in blocks.
pub const MAX_BIOME_BLEND: u8 = 7;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub colors: ColorsConfig,
    /// Settings for worlds without an entry in `worlds`.
    pub render: RenderSettings,
    pub worlds: HashMap<String, RenderSettings>,
    pub scheduler: SchedulerConfig,
}

impl MapConfig {
    /// Load from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn render_settings(&self, world: &str) -> &RenderSettings {
        self.worlds.get(world).unwrap_or(&self.render)
    }
}

/// Per-world render options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Depth-shaded translucent fluids; flat biome water colour when off.
    pub translucent_fluids: bool,
    pub heightmap: Heightmap,
    /// Radius in blocks over which biome tints are averaged.
    pub biome_blend: u8,
    pub renderers: Vec<RendererKind>,
}

impl RenderSettings {
    pub fn biome_blend(&self) -> i32 {
        i32::from(self.biome_blend.min(MAX_BIOME_BLEND))
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            translucent_fluids: true,
            heightmap: Heightmap::Modern,
            biome_blend: 0,
            renderers: vec![RendererKind::Basic],
        }
    }
}

/// Block colour overrides and classification lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    /// Block id → `"#RRGGBB"`, replacing the platform's colour.
    pub block_colors: IndexMap<String, String>,
    pub air: Vec<String>,
    pub foliage: Vec<String>,
    pub grass: Vec<String>,
    pub water: Vec<String>,
    pub glass: Vec<String>,
}

fn ids(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| format!("minecraft:{n}")).collect()
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            block_colors: IndexMap::new(),
            air: ids(&["air", "cave_air", "void_air", "light"]),
            foliage: ids(&[
                "oak_leaves",
                "spruce_leaves",
                "birch_leaves",
                "jungle_leaves",
                "acacia_leaves",
                "dark_oak_leaves",
                "mangrove_leaves",
                "vine",
            ]),
            grass: ids(&[
                "grass_block",
                "short_grass",
                "tall_grass",
                "fern",
                "large_fern",
                "sugar_cane",
            ]),
            water: ids(&[
                "water",
                "bubble_column",
                "kelp",
                "kelp_plant",
                "seagrass",
                "tall_seagrass",
            ]),
            glass: ids(&["glass", "glass_pane", "tinted_glass", "barrier"]),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Ticks between dispatcher runs.
    pub update_interval_ticks: u32,
    /// Size of the background scan pool.
    pub render_threads: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        let cores = std::thread::available_parallelism().map_or(1, |n| n.get());
        Self {
            update_interval_ticks: 5,
            render_threads: cores.saturating_sub(1).max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        let config: MapConfig = serde_json::from_str("{}").unwrap();
        assert!(config.render.translucent_fluids);
        assert_eq!(config.render.renderers, vec![RendererKind::Basic]);
        assert!(config.colors.water.contains(&"minecraft:water".to_string()));
        assert_eq!(config.scheduler.update_interval_ticks, 5);
    }

    #[test]
    fn load_reads_file_or_defaults() {
        let dir = std::env::temp_dir().join("voxmap_test_config_load");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();

        let missing = MapConfig::load(&dir.join("absent.json")).unwrap();
        assert_eq!(missing.render, RenderSettings::default());

        let path = dir.join("config.json");
        fs::write(&path, r#"{"scheduler": {"update_interval_ticks": 20}}"#).unwrap();
        let loaded = MapConfig::load(&path).unwrap();
        assert_eq!(loaded.scheduler.update_interval_ticks, 20);

        fs::write(&path, "{ not json").unwrap();
        assert!(MapConfig::load(&path).is_err());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn per_world_settings_fall_back() {
        let config: MapConfig = serde_json::from_str(
            r#"{
                "worlds": {
                    "minecraft:the_nether": {
                        "translucent_fluids": false,
                        "heightmap": "none",
                        "renderers": ["basic", "flowermap"]
                    }
                },
                "render": { "biome_blend": 12 }
            }"#,
        )
        .unwrap();
        let nether = config.render_settings("minecraft:the_nether");
        assert!(!nether.translucent_fluids);
        assert_eq!(nether.heightmap, Heightmap::None);
        assert_eq!(nether.renderers, vec![RendererKind::Basic, RendererKind::Flower]);

        let overworld = config.render_settings("minecraft:overworld");
        assert_eq!(overworld.biome_blend(), i32::from(MAX_BIOME_BLEND));
        assert_eq!(overworld.heightmap, Heightmap::Modern);
    }
}
