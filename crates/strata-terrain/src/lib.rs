//! Terrain synthesis pipeline: biomes, terrain configuration, chunk tiling, and
//! background chunk generation.

mod async_generation;
mod chunk;
mod chunk_grid;
mod seed;
mod terrain_config;
mod water;

pub mod biome;

pub use async_generation::{AsyncTerrainGenerator, ChunkTask, GeneratedChunk};
pub use biome::{Biome, BiomeId, BiomeRegistry, BiomeRegistryError, MaterialHandle};
pub use chunk::Chunk;
pub use chunk_grid::{ChunkGrid, generate};
pub use seed::{
    DEFAULT_SEED_SPEED, advance_seed, hash_chunk, hash_chunks, prepare_session, randomized_seed,
    reset, session_rng,
};
pub use terrain_config::TerrainConfig;
pub use water::WaterSurface;
