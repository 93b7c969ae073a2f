//! Biome definitions and the registry that selects among them.

mod def;
mod registry;

pub use def::{Biome, MaterialHandle};
pub use registry::{BiomeId, BiomeRegistry, BiomeRegistryError};
