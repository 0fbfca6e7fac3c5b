/// Registry index of a biome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct BiomeId(pub u16);

/// Tint colours for one biome (all 24-bit RGB).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BiomeColors {
    pub grass: u32,
    pub foliage: u32,
    pub water: u32,
    /// Flat colour used by the biome renderer.
    pub map: u32,
}

impl Default for BiomeColors {
    /// Plains.
    fn default() -> Self {
        Self {
            grass: 0x91BD59,
            foliage: 0x77AB2F,
            water: 0x3F76E4,
            map: 0x8DB360,
        }
    }
}

/// An environmental classification supplied by the world provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Biome {
    id: BiomeId,
    key: String,
    colors: BiomeColors,
}

impl Biome {
    pub fn new(id: BiomeId, key: impl Into<String>, colors: BiomeColors) -> Self {
        Self {
            id,
            key: key.into(),
            colors,
        }
    }

    pub fn id(&self) -> BiomeId {
        self.id
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn colors(&self) -> BiomeColors {
        self.colors
    }

    pub fn grass_color(&self) -> u32 {
        self.colors.grass
    }

    pub fn foliage_color(&self) -> u32 {
        self.colors.foliage
    }

    pub fn water_color(&self) -> u32 {
        self.colors.water
    }

    pub fn map_color(&self) -> u32 {
        self.colors.map
    }
}
