//! Noise synthesis: permutation hashing, four interchangeable noise kinds,
//! value redistribution with terracing, and multi-octave fractal combination.

mod cellular;
mod field;
mod fractal;
mod perlin;
mod permutation;
mod redistribution;
mod simplex;

pub use cellular::{voronoi, voronoi_distances, worley, worley_distances};
pub use field::{NoiseConfig, NoiseField, NoiseKind, evaluate};
pub use fractal::{FractalParams, FractalSynthesizer, fbm_height};
pub use perlin::perlin;
pub use permutation::PermutationTable;
pub use redistribution::{RedistributionConfig, RedistributionKind, apply, terrace};
pub use simplex::{simplex, simplex_corner_offset};
