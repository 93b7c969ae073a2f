//! Command-line terrain generator: loads `config.ron`, applies CLI overrides,
//! generates one chunk grid and reports what was built.

use std::process::ExitCode;

use clap::Parser;
use glam::DVec2;
use strata_config::{CliArgs, Config, ConfigError, default_config_dir};
use strata_noise::{NoiseConfig, NoiseField, NoiseKind};
use strata_terrain::{Biome, ChunkGrid, hash_chunks, prepare_session, session_rng};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config
        .debug
        .log_file
        .clone()
        .or_else(|| cfg!(debug_assertions).then(|| config_dir.join("logs")));
    strata_log::init_logging(log_dir.as_deref(), Some(&config));

    match run(config.normalized()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "Terrain generation failed");
            ExitCode::FAILURE
        }
    }
}

fn run(config: Config) -> Result<(), ConfigError> {
    let session_seed = config.generation.session_seed.unwrap_or_else(rand::random);
    tracing::debug!(session_seed, "Session RNG seeded");
    let mut rng = session_rng(session_seed);
    let biome = select_biome(&config, &mut rng)?;
    let terrain = prepare_session(config.terrain.clone(), &mut rng);

    tracing::info!(
        biome = %biome.name,
        noise = ?terrain.noise.kind,
        chunk_count = terrain.chunk_count,
        detail_level = terrain.detail_level,
        seed_x = terrain.seed.x,
        seed_y = terrain.seed.y,
        "Generating terrain"
    );

    let mut grid = ChunkGrid::new(&biome, &terrain);
    if config.generation.worker_threads > 0 {
        grid = grid.with_workers(config.generation.worker_threads);
    }

    let start = std::time::Instant::now();
    let chunks = grid.generate();
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    let vertices: usize = chunks.iter().map(|c| c.vertices().len()).sum();
    let min_height = chunks.iter().filter_map(|c| c.min_height()).reduce(f32::min);
    let max_height = chunks.iter().filter_map(|c| c.max_height()).reduce(f32::max);
    tracing::info!(
        chunks = chunks.len(),
        vertices,
        ?min_height,
        ?max_height,
        hash = %format!("{:016x}", hash_chunks(&chunks)),
        elapsed_ms,
        "Terrain generated"
    );

    let waves = NoiseField::new(NoiseConfig {
        kind: NoiseKind::Perlin,
        ..terrain.noise
    });
    let water = config.water.build_displaced(&waves, DVec2::ZERO);
    tracing::info!(
        vertices = water.vertex_count(),
        waves = config.water.use_waves,
        "Water surface built"
    );

    Ok(())
}

/// The configured active biome, or one drawn by spawn weight.
fn select_biome(config: &Config, rng: &mut impl rand::Rng) -> Result<Biome, ConfigError> {
    if let Some(biome) = config.active_biome()? {
        return Ok(biome.clone());
    }
    let registry = config.biome_registry()?;
    let id = registry.select_with_rng(rng).ok_or(ConfigError::NoBiomes)?;
    Ok(registry.get(id).clone())
}
