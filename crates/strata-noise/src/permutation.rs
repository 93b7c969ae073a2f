//! Deterministic permutation table used as the hash source for every noise kind.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Lattice coordinates are kept within this bound so neighbour offsets never overflow.
const LATTICE_LIMIT: i64 = 1 << 52;

/// Integer lattice cell containing `v`.
#[inline]
pub(crate) fn lattice(v: f64) -> i64 {
    (libm::floor(v) as i64).clamp(-LATTICE_LIMIT, LATTICE_LIMIT)
}

/// A fixed array of pseudo-random integers in `[0, max]`, generated once from a seed.
///
/// Every lookup wraps its index with `rem_euclid`, so any `i64` (negative or far out of
/// range) maps to a valid slot and `lookup(i) == lookup(i + len)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PermutationTable {
    values: Vec<i32>,
    max: i32,
    seed: u64,
}

impl PermutationTable {
    /// Build a table of `size` entries drawn uniformly from `[0, max]`.
    ///
    /// A zero `size` is treated as 1 and a non-positive `max` as 1 so that lookups and
    /// [`inverse`](Self::inverse) are always defined. The same `(seed, size, max)` triple
    /// always produces the same table.
    pub fn build(seed: u64, size: usize, max: i32) -> Self {
        let size = size.max(1);
        let max = max.max(1);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let values = (0..size).map(|_| rng.random_range(0..=max)).collect();
        Self { values, max, seed }
    }

    /// Look up the value at `index`, wrapping modulo the table size.
    #[inline]
    pub fn lookup(&self, index: i64) -> i32 {
        let slot = index.rem_euclid(self.values.len() as i64) as usize;
        self.values[slot]
    }

    /// Two-index lookup: hashes `j` into the value found at `i`.
    #[inline]
    pub fn lookup_2d(&self, i: i64, j: i64) -> i32 {
        self.lookup((self.lookup(i) as i64).wrapping_add(j))
    }

    /// `1.0 / max`, maps a table value onto `[0, 1]`.
    #[inline]
    pub fn inverse(&self) -> f64 {
        1.0 / self.max as f64
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`; a table holds at least one entry.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Largest value an entry can hold.
    pub fn max(&self) -> i32 {
        self.max
    }

    /// Seed the table was built from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Raw entries.
    pub fn as_slice(&self) -> &[i32] {
        &self.values
    }
}
