//! Canonical catalog of block definitions, persisted to disk.
//!
//! Block indices are handed out in first-seen order and are never reused, so
//! anything keyed by [`BlockId`] stays valid for the life of the registry.
//! The id → colour table is written to a JSON file and reloaded at startup,
//! which keeps rendered colours (and indices) stable across restarts even when
//! the platform reorders its raw ids or changes its default colours.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use anyhow::{Context, Result};
use indexmap::IndexMap;

use crate::color;
use crate::config::ColorsConfig;
use crate::world::block::{Block, BlockFlags, BlockId};

/// Always registered first, so that [`BlockId::AIR`] resolves to it.
pub const AIR_KEY: &str = "minecraft:air";

struct Entry {
    block: Arc<Block>,
    /// Colour as registered, before configuration overrides.
    base_color: u32,
}

/// Thread-safe block registry.
///
/// Uses `std::sync::RwLock`: registration happens in bursts at load time,
/// everything afterwards is lookups from scan threads.
pub struct BlockRegistry {
    entries: RwLock<IndexMap<String, Entry>>,
    overrides: HashMap<String, u32>,
    classes: Vec<(BlockFlags, Vec<String>)>,
}

impl BlockRegistry {
    pub fn new(config: &ColorsConfig) -> Self {
        let mut overrides = HashMap::new();
        for (key, value) in &config.block_colors {
            match color::parse_hex(value) {
                Some(rgb) => {
                    overrides.insert(key.clone(), rgb);
                }
                None => tracing::warn!("Ignoring colour override for {}: bad colour {:?}", key, value),
            }
        }
        let classes = vec![
            (BlockFlags::AIR, config.air.clone()),
            (BlockFlags::FOLIAGE, config.foliage.clone()),
            (BlockFlags::GRASS, config.grass.clone()),
            (BlockFlags::WATER, config.water.clone()),
            (BlockFlags::GLASS, config.glass.clone()),
        ];
        let registry = Self {
            entries: RwLock::new(IndexMap::new()),
            overrides,
            classes,
        };
        registry.register(AIR_KEY, 0);
        registry
    }

    /// Register a block, or return the existing definition if `key` is known.
    ///
    /// A configured colour override replaces `base_color`.
    pub fn register(&self, key: &str, base_color: u32) -> Arc<Block> {
        if let Some(block) = self.get(key) {
            return block;
        }

        let mut entries = self.entries.write().expect("block registry poisoned");
        // Another thread may have registered it between the two locks.
        if let Some(entry) = entries.get(key) {
            return Arc::clone(&entry.block);
        }

        let id = BlockId(entries.len() as u32);
        let color = self.overrides.get(key).copied().unwrap_or(base_color);
        let block = Arc::new(Block::new(id, key, color, self.flags_for(key)));
        entries.insert(
            key.to_string(),
            Entry {
                block: Arc::clone(&block),
                base_color: base_color & 0xFF_FFFF,
            },
        );
        block
    }

    pub fn get(&self, key: &str) -> Option<Arc<Block>> {
        self.entries
            .read()
            .expect("block registry poisoned")
            .get(key)
            .map(|e| Arc::clone(&e.block))
    }

    pub fn get_by_id(&self, id: BlockId) -> Option<Arc<Block>> {
        self.entries
            .read()
            .expect("block registry poisoned")
            .get_index(id.index())
            .map(|(_, e)| Arc::clone(&e.block))
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("block registry poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every block in registration order.
    pub fn iter(&self) -> impl Iterator<Item = Arc<Block>> + use<> {
        let snapshot: Vec<Arc<Block>> = self
            .entries
            .read()
            .expect("block registry poisoned")
            .values()
            .map(|e| Arc::clone(&e.block))
            .collect();
        snapshot.into_iter()
    }

    fn flags_for(&self, key: &str) -> BlockFlags {
        let flags = self
            .classes
            .iter()
            .filter(|(_, keys)| keys.iter().any(|k| k == key))
            .fold(BlockFlags::empty(), |acc, (flag, _)| acc | *flag);
        if key == AIR_KEY { flags | BlockFlags::AIR } else { flags }
    }

    // ── Persistence ─────────────────────────────────────────────────────

    /// Write the full id → colour table to `path` as JSON, in index order.
    pub fn save_to_disk(&self, path: &Path) -> Result<usize> {
        let start = Instant::now();
        let table: IndexMap<String, String> = {
            let entries = self.entries.read().expect("block registry poisoned");
            entries
                .iter()
                .map(|(key, e)| (key.clone(), color::format_hex(e.base_color)))
                .collect()
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&table).context("serializing block colours")?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;

        tracing::info!(
            "Block registry saved: {} blocks to {} ({:.2?})",
            table.len(),
            path.display(),
            start.elapsed(),
        );
        Ok(table.len())
    }

    /// Re-register every block listed in `path`, in file order.
    ///
    /// Call before the platform registers its own blocks: persisted entries
    /// keep their index and colour, platform registration then only adds new
    /// ids. A missing file is not an error. Returns the number of entries loaded.
    pub fn load_from_disk(&self, path: &Path) -> Result<usize> {
        if !path.exists() {
            return Ok(0);
        }
        let start = Instant::now();
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let table: IndexMap<String, String> = serde_json::from_slice(&bytes)
            .with_context(|| format!("parsing {}", path.display()))?;

        let mut loaded = 0usize;
        for (key, value) in &table {
            if !is_block_key(key) {
                tracing::warn!("Skipping unknown block id {:?} in {}", key, path.display());
                continue;
            }
            let Some(rgb) = color::parse_hex(value) else {
                tracing::warn!("Skipping {} in {}: bad colour {:?}", key, path.display(), value);
                continue;
            };
            self.register(key, rgb);
            loaded += 1;
        }

        tracing::info!(
            "Block registry loaded: {} blocks from {} ({:.2?})",
            loaded,
            path.display(),
            start.elapsed(),
        );
        Ok(loaded)
    }
}

/// `namespace:path`, lowercase, as the host game names its blocks.
fn is_block_key(key: &str) -> bool {
    let Some((namespace, path)) = key.split_once(':') else {
        return false;
    };
    let valid = |part: &str, extra: &[char]| {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "_-.".contains(c) || extra.contains(&c))
    };
    valid(namespace, &[]) && valid(path, &['/'])
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new(&ColorsConfig::default())
    }
}
