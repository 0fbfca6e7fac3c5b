use std::sync::{Arc, RwLock};

use indexmap::IndexMap;

use crate::world::biome::{Biome, BiomeColors, BiomeId};

/// Biomes known to the renderer, indexed in first-seen order.
pub struct BiomeRegistry {
    biomes: RwLock<IndexMap<String, Arc<Biome>>>,
}

impl BiomeRegistry {
    pub fn new() -> Self {
        Self {
            biomes: RwLock::new(IndexMap::new()),
        }
    }

    /// Register a biome, or return the existing one if `key` is known.
    pub fn register(&self, key: &str, colors: BiomeColors) -> Arc<Biome> {
        let mut biomes = self.biomes.write().expect("biome registry poisoned");
        if let Some(biome) = biomes.get(key) {
            return Arc::clone(biome);
        }
        let biome = Arc::new(Biome::new(BiomeId(biomes.len() as u16), key, colors));
        biomes.insert(key.to_string(), Arc::clone(&biome));
        biome
    }

    pub fn get(&self, key: &str) -> Option<Arc<Biome>> {
        self.biomes
            .read()
            .expect("biome registry poisoned")
            .get(key)
            .cloned()
    }

    pub fn get_by_id(&self, id: BiomeId) -> Option<Arc<Biome>> {
        self.biomes
            .read()
            .expect("biome registry poisoned")
            .get_index(id.0 as usize)
            .map(|(_, b)| Arc::clone(b))
    }

    pub fn len(&self) -> usize {
        self.biomes.read().expect("biome registry poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for BiomeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_assigns_sequential_ids() {
        let registry = BiomeRegistry::new();
        let plains = registry.register("minecraft:plains", BiomeColors::default());
        let desert = registry.register("minecraft:desert", BiomeColors::default());
        let again = registry.register("minecraft:plains", BiomeColors { water: 0, ..Default::default() });
        assert_eq!(plains.id(), BiomeId(0));
        assert_eq!(desert.id(), BiomeId(1));
        assert!(Arc::ptr_eq(&plains, &again));
        assert_eq!(registry.get_by_id(BiomeId(1)).unwrap().key(), "minecraft:desert");
        assert!(registry.get("minecraft:ocean").is_none());
    }
}
