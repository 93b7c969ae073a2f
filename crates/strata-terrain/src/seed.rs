//! Seed operations and determinism verification.
//!
//! The terrain seed is a 2D sampling offset owned by the host. These functions are the
//! only ways the pipeline changes it: advance it by a host-supplied time step, zero it,
//! or replace it with a random one at session start. Hashing helpers digest generated
//! chunks so identical inputs can be checked for bit-identical output.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use glam::{DVec2, DVec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::chunk::Chunk;
use crate::terrain_config::TerrainConfig;

/// Seed speed (units per second along +x) used by live editor previews.
pub const DEFAULT_SEED_SPEED: f64 = 10.0;

/// Radius of the region random seeds are drawn from.
const RANDOM_SEED_RADIUS: f64 = 100.0;

// ---------------------------------------------------------------------------
// Seed updates
// ---------------------------------------------------------------------------

/// Move `seed` along +x by `delta_time * speed`.
#[inline]
pub fn advance_seed(seed: DVec2, delta_time: f64, speed: f64) -> DVec2 {
    DVec2::new(seed.x + delta_time * speed, seed.y)
}

/// Return `config` with its seed zeroed.
pub fn reset(config: TerrainConfig) -> TerrainConfig {
    TerrainConfig {
        seed: DVec2::ZERO,
        ..config
    }
}

/// A random seed: the xy of a uniform point inside the unit sphere, scaled by 100.
pub fn randomized_seed(rng: &mut impl Rng) -> DVec2 {
    loop {
        let p = DVec3::new(
            rng.random_range(-1.0..=1.0),
            rng.random_range(-1.0..=1.0),
            rng.random_range(-1.0..=1.0),
        );
        if p.length_squared() <= 1.0 {
            return p.truncate() * RANDOM_SEED_RADIUS;
        }
    }
}

/// Apply session-start rules: randomize the seed if `randomize_at_start` is set.
pub fn prepare_session(config: TerrainConfig, rng: &mut impl Rng) -> TerrainConfig {
    if config.randomize_at_start {
        let seed = randomized_seed(rng);
        tracing::debug!(x = seed.x, y = seed.y, "Randomized terrain seed");
        TerrainConfig { seed, ..config }
    } else {
        config
    }
}

/// Deterministic RNG for session setup, reproducible for the same `seed`.
pub fn session_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

fn hash_chunk_into(chunk: &Chunk, hasher: &mut DefaultHasher) {
    chunk.grid_position.x.hash(hasher);
    chunk.grid_position.y.hash(hasher);
    for component in chunk.world_offset.to_array() {
        component.to_bits().hash(hasher);
    }
    for vertex in chunk.vertices() {
        for component in vertex.to_array() {
            component.to_bits().hash(hasher);
        }
    }
    chunk.triangles().hash(hasher);
}

/// Digest of one chunk's position, vertices and triangles.
pub fn hash_chunk(chunk: &Chunk) -> u64 {
    let mut hasher = DefaultHasher::new();
    hash_chunk_into(chunk, &mut hasher);
    hasher.finish()
}

/// Digest of an ordered chunk collection.
pub fn hash_chunks(chunks: &[Chunk]) -> u64 {
    let mut hasher = DefaultHasher::new();
    chunks.len().hash(&mut hasher);
    for chunk in chunks {
        hash_chunk_into(chunk, &mut hasher);
    }
    hasher.finish()
}
