//! Command-line argument parsing for terrain generation runs.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use strata_noise::NoiseKind;

use crate::Config;

/// Noise algorithm names accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum NoiseArg {
    Perlin,
    Simplex,
    Voronoi,
    Worley,
}

impl From<NoiseArg> for NoiseKind {
    fn from(arg: NoiseArg) -> Self {
        match arg {
            NoiseArg::Perlin => NoiseKind::Perlin,
            NoiseArg::Simplex => NoiseKind::Simplex,
            NoiseArg::Voronoi => NoiseKind::Voronoi,
            NoiseArg::Worley => NoiseKind::Worley,
        }
    }
}

/// Strata command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "strata", about = "Procedural terrain chunk generator")]
pub struct CliArgs {
    /// Chunks per side of the chunk grid.
    #[arg(long)]
    pub chunk_count: Option<i32>,

    /// Quads per side of each chunk.
    #[arg(long)]
    pub detail_level: Option<i32>,

    /// Noise algorithm.
    #[arg(long, value_enum)]
    pub noise: Option<NoiseArg>,

    /// Seed x offset.
    #[arg(long, allow_negative_numbers = true)]
    pub seed_x: Option<f64>,

    /// Seed y offset.
    #[arg(long, allow_negative_numbers = true)]
    pub seed_y: Option<f64>,

    /// Randomize the seed at session start.
    #[arg(long)]
    pub randomize: bool,

    /// Worker thread count (0 = one per core).
    #[arg(long)]
    pub workers: Option<usize>,

    /// Biome to generate, by name.
    #[arg(long)]
    pub biome: Option<String>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(count) = args.chunk_count {
            self.terrain.chunk_count = count;
        }
        if let Some(detail) = args.detail_level {
            self.terrain.detail_level = detail;
        }
        if let Some(noise) = args.noise {
            self.terrain.noise.kind = noise.into();
        }
        if let Some(x) = args.seed_x {
            self.terrain.seed.x = x;
        }
        if let Some(y) = args.seed_y {
            self.terrain.seed.y = y;
        }
        if args.randomize {
            self.terrain.randomize_at_start = true;
        }
        if let Some(workers) = args.workers {
            self.generation.worker_threads = workers;
        }
        if let Some(ref biome) = args.biome {
            self.generation.active_biome = Some(biome.clone());
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
