//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strata_noise::{FractalParams, RedistributionConfig, RedistributionKind};
use strata_terrain::{Biome, BiomeRegistry, MaterialHandle, TerrainConfig, WaterSurface};

use crate::error::ConfigError;

/// Name of the persisted config file inside the config directory.
const CONFIG_FILE: &str = "config.ron";

/// Default config directory: `<platform config dir>/strata`, falling back to `./strata`.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("strata")
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Grid, seed and noise settings.
    pub terrain: TerrainConfig,
    /// Biome definitions in registration order.
    pub biomes: Vec<Biome>,
    /// Water plane settings.
    pub water: WaterSurface,
    /// Worker and biome selection settings.
    pub generation: GenerationConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Generation run settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    /// Worker thread count. `0` uses one per CPU core.
    pub worker_threads: usize,
    /// Name of the biome to generate. `None` picks by spawn weight.
    pub active_biome: Option<String>,
    /// Seed for session setup such as seed randomization and weighted biome choice.
    /// `None` draws a fresh one per run.
    pub session_seed: Option<u64>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Directory that receives a JSON log file next to console output.
    pub log_file: Option<PathBuf>,
}

// --- Default implementations ---

impl Default for Config {
    fn default() -> Self {
        Self {
            terrain: TerrainConfig::default(),
            biomes: default_biomes(),
            water: WaterSurface::default(),
            generation: GenerationConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

fn default_biomes() -> Vec<Biome> {
    vec![
        Biome {
            spawn_weight: 60,
            material: MaterialHandle(0),
            fractal: FractalParams {
                octaves: 4,
                persistence: 0.3,
                lacunarity: 0.5,
                ..Default::default()
            },
            ..Biome::new("plains")
        },
        Biome {
            spawn_weight: 30,
            material: MaterialHandle(1),
            fractal: FractalParams {
                octaves: 6,
                persistence: 0.45,
                lacunarity: 0.6,
                redistribution: RedistributionConfig {
                    kind: RedistributionKind::Power,
                    exponent_or_value: 1.5,
                    terrace_step: 0.0,
                },
                ..Default::default()
            },
            ..Biome::new("hills")
        },
        Biome {
            spawn_weight: 10,
            material: MaterialHandle(2),
            fractal: FractalParams {
                octaves: 4,
                persistence: 0.4,
                lacunarity: 0.4,
                terrace_value: 4.0,
                ..Default::default()
            },
            ..Biome::new("mesas")
        },
    ]
}

// --- Biome access ---

impl Config {
    /// Return a copy with every biome normalized.
    pub fn normalized(mut self) -> Self {
        self.biomes = self.biomes.into_iter().map(Biome::normalized).collect();
        self
    }

    /// Register the biome list, rejecting duplicate names.
    pub fn biome_registry(&self) -> Result<BiomeRegistry, ConfigError> {
        if self.biomes.is_empty() {
            return Err(ConfigError::NoBiomes);
        }
        Ok(BiomeRegistry::from_biomes(self.biomes.iter().cloned())?)
    }

    /// The biome named by `generation.active_biome`, or `None` when no name is set.
    pub fn active_biome(&self) -> Result<Option<&Biome>, ConfigError> {
        if self.biomes.is_empty() {
            return Err(ConfigError::NoBiomes);
        }
        match &self.generation.active_biome {
            Some(name) => self
                .biomes
                .iter()
                .find(|b| &b.name == name)
                .map(Some)
                .ok_or_else(|| ConfigError::UnknownBiome(name.clone())),
            None => Ok(None),
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
