//! Biome registry: ordered biome definitions with name lookup and weighted selection.

use hashbrown::HashMap;
use rand::Rng;

use super::Biome;

/// Index of a biome within its [`BiomeRegistry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BiomeId(pub u16);

/// Errors that can occur when registering biomes.
#[derive(Debug, thiserror::Error)]
pub enum BiomeRegistryError {
    /// A biome with this name is already registered.
    #[error("duplicate biome name: {0}")]
    DuplicateName(String),
    /// The registry cannot address more biomes.
    #[error("too many biomes registered (limit {0})")]
    Full(usize),
}

/// Stores all registered biome definitions with O(1) lookup by ID.
///
/// Biomes are normalized on registration, so every stored biome has an even octave count.
#[derive(Clone, Debug, Default)]
pub struct BiomeRegistry {
    biomes: Vec<Biome>,
    name_to_id: HashMap<String, BiomeId>,
}

impl BiomeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from an ordered list of biomes.
    ///
    /// # Errors
    ///
    /// Returns the first registration error encountered.
    pub fn from_biomes(
        biomes: impl IntoIterator<Item = Biome>,
    ) -> Result<Self, BiomeRegistryError> {
        let mut registry = Self::new();
        for biome in biomes {
            registry.register(biome)?;
        }
        Ok(registry)
    }

    /// Registers a new biome definition, returning its assigned [`BiomeId`].
    ///
    /// # Errors
    ///
    /// Returns [`BiomeRegistryError::DuplicateName`] if a biome with the same name exists.
    pub fn register(&mut self, def: Biome) -> Result<BiomeId, BiomeRegistryError> {
        if self.name_to_id.contains_key(&def.name) {
            return Err(BiomeRegistryError::DuplicateName(def.name));
        }
        let index = u16::try_from(self.biomes.len())
            .map_err(|_| BiomeRegistryError::Full(u16::MAX as usize))?;
        let id = BiomeId(index);
        self.name_to_id.insert(def.name.clone(), id);
        self.biomes.push(def.normalized());
        Ok(id)
    }

    /// Returns the definition for the given biome ID.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn get(&self, id: BiomeId) -> &Biome {
        &self.biomes[id.0 as usize]
    }

    /// Looks up a biome ID by name.
    pub fn lookup_by_name(&self, name: &str) -> Option<BiomeId> {
        self.name_to_id.get(name).copied()
    }

    /// Iterates biomes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (BiomeId, &Biome)> {
        self.biomes
            .iter()
            .enumerate()
            .map(|(i, biome)| (BiomeId(i as u16), biome))
    }

    /// Sum of all spawn weights.
    pub fn total_weight(&self) -> u32 {
        self.biomes.iter().map(|b| b.spawn_weight as u32).sum()
    }

    /// Picks a biome by cumulative spawn weight, with `roll` taken modulo the total weight.
    ///
    /// When every weight is zero the first biome is returned. Returns `None` only for an
    /// empty registry.
    pub fn select(&self, roll: u32) -> Option<BiomeId> {
        if self.biomes.is_empty() {
            return None;
        }
        let total = self.total_weight();
        if total == 0 {
            return Some(BiomeId(0));
        }
        let mut remaining = roll % total;
        for (id, biome) in self.iter() {
            let weight = biome.spawn_weight as u32;
            if remaining < weight {
                return Some(id);
            }
            remaining -= weight;
        }
        None
    }

    /// Picks a biome by spawn weight using `rng`.
    pub fn select_with_rng(&self, rng: &mut impl Rng) -> Option<BiomeId> {
        let total = self.total_weight().max(1);
        self.select(rng.random_range(0..total))
    }

    /// Returns the number of registered biomes.
    pub fn len(&self) -> usize {
        self.biomes.len()
    }

    /// Returns `true` if no biomes are registered.
    pub fn is_empty(&self) -> bool {
        self.biomes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn biome(name: &str, weight: u8) -> Biome {
        Biome {
            spawn_weight: weight,
            ..Biome::new(name)
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = BiomeRegistry::new();
        let id = registry.register(biome("plains", 40)).unwrap();
        assert_eq!(registry.lookup_by_name("plains"), Some(id));
        assert_eq!(registry.get(id).name, "plains");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = BiomeRegistry::new();
        registry.register(biome("plains", 40)).unwrap();
        let err = registry.register(biome("plains", 10)).unwrap_err();
        assert!(matches!(err, BiomeRegistryError::DuplicateName(name) if name == "plains"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_normalizes_octaves() {
        let mut odd = biome("ridges", 10);
        odd.fractal.octaves = 5;
        let registry = BiomeRegistry::from_biomes([odd]).unwrap();
        assert_eq!(registry.get(BiomeId(0)).fractal.octaves, 6);
    }

    #[test]
    fn test_select_by_cumulative_weight() {
        let registry =
            BiomeRegistry::from_biomes([biome("a", 10), biome("b", 0), biome("c", 30)]).unwrap();
        assert_eq!(registry.select(0), Some(BiomeId(0)));
        assert_eq!(registry.select(9), Some(BiomeId(0)));
        assert_eq!(registry.select(10), Some(BiomeId(2)));
        assert_eq!(registry.select(39), Some(BiomeId(2)));
        assert_eq!(registry.select(40), Some(BiomeId(0)), "roll wraps modulo total");
    }

    #[test]
    fn test_select_all_zero_weights_falls_back_to_first() {
        let registry = BiomeRegistry::from_biomes([biome("a", 0), biome("b", 0)]).unwrap();
        assert_eq!(registry.select(17), Some(BiomeId(0)));
    }

    #[test]
    fn test_select_empty_registry() {
        assert_eq!(BiomeRegistry::new().select(3), None);
    }

    #[test]
    fn test_select_with_rng_never_picks_zero_weight() {
        let registry =
            BiomeRegistry::from_biomes([biome("a", 50), biome("never", 0), biome("c", 50)])
                .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..500 {
            let id = registry.select_with_rng(&mut rng).unwrap();
            assert_ne!(id, BiomeId(1), "Zero-weight biome must never be selected");
        }
    }
}
