//! Noise kind dispatch over a lazily built permutation table.

use std::sync::OnceLock;

use noise::NoiseFn;
use serde::{Deserialize, Serialize};

use crate::cellular::{voronoi, worley};
use crate::perlin::perlin;
use crate::permutation::PermutationTable;
use crate::simplex::simplex;

/// The noise algorithm to sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoiseKind {
    /// Gradient noise remapped to `[0, 1]`.
    #[default]
    Perlin,
    /// Simplex noise in `[-1, 1]`.
    Simplex,
    /// Squared distance to the nearest Poisson-distributed feature point.
    Voronoi,
    /// Squared distance to the nearest jittered grid point.
    Worley,
}

impl NoiseKind {
    /// All kinds, in declaration order.
    pub const ALL: [NoiseKind; 4] = [
        NoiseKind::Perlin,
        NoiseKind::Simplex,
        NoiseKind::Voronoi,
        NoiseKind::Worley,
    ];
}

/// Noise selection plus the parameters of its permutation table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Which algorithm to evaluate.
    pub kind: NoiseKind,
    /// Number of permutation table entries.
    pub permutation_size: usize,
    /// Largest permutation table value.
    pub permutation_max: i32,
    /// Seed the permutation table is generated from.
    pub permutation_seed: u64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            kind: NoiseKind::Perlin,
            permutation_size: 1024,
            permutation_max: 255,
            permutation_seed: 1,
        }
    }
}

impl NoiseConfig {
    /// Build the permutation table described by this configuration.
    pub fn build_table(&self) -> PermutationTable {
        PermutationTable::build(
            self.permutation_seed,
            self.permutation_size,
            self.permutation_max,
        )
    }
}

/// Evaluate one sample of `kind` at `(x, y)` against `table`.
#[inline]
pub fn evaluate(kind: NoiseKind, table: &PermutationTable, x: f64, y: f64) -> f64 {
    match kind {
        NoiseKind::Perlin => perlin(table, x, y),
        NoiseKind::Simplex => simplex(table, x, y),
        NoiseKind::Voronoi => voronoi(table, x, y),
        NoiseKind::Worley => worley(table, x, y),
    }
}

/// A noise source bound to one [`NoiseConfig`].
///
/// The permutation table is built on the first evaluation and read-only afterwards, so a
/// single field can be shared by reference (or `Arc`) across worker threads. Changing the
/// configuration means building a new field.
#[derive(Clone, Debug)]
pub struct NoiseField {
    config: NoiseConfig,
    table: OnceLock<PermutationTable>,
}

impl NoiseField {
    /// Create a field; the table is not built until first use.
    pub fn new(config: NoiseConfig) -> Self {
        Self {
            config,
            table: OnceLock::new(),
        }
    }

    /// The configuration this field evaluates.
    pub fn config(&self) -> &NoiseConfig {
        &self.config
    }

    /// The permutation table, building it if this is the first access.
    pub fn table(&self) -> &PermutationTable {
        self.table.get_or_init(|| self.config.build_table())
    }

    /// Returns `true` once the permutation table has been built.
    pub fn is_initialized(&self) -> bool {
        self.table.get().is_some()
    }

    /// Sample the configured noise kind at `(x, y)`.
    #[inline]
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        evaluate(self.config.kind, self.table(), x, y)
    }
}

impl Default for NoiseField {
    fn default() -> Self {
        Self::new(NoiseConfig::default())
    }
}

impl NoiseFn<f64, 2> for NoiseField {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.evaluate(point[0], point[1])
    }
}
