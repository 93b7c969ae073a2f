//! Configuration error types.

use strata_terrain::BiomeRegistryError;

/// Errors that can occur when loading, saving, or interpreting configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the config file from disk.
    #[error("failed to read config: {0}")]
    ReadError(#[source] std::io::Error),

    /// Failed to write the config file to disk.
    #[error("failed to write config: {0}")]
    WriteError(#[source] std::io::Error),

    /// Failed to parse RON content.
    #[error("failed to parse config: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    /// Failed to serialize config to RON.
    #[error("failed to serialize config: {0}")]
    SerializeError(#[source] ron::Error),

    /// The config defines no biomes.
    #[error("config defines no biomes")]
    NoBiomes,

    /// The requested active biome is not defined.
    #[error("unknown biome: {0}")]
    UnknownBiome(String),

    /// The biome list could not be registered.
    #[error(transparent)]
    Registry(#[from] BiomeRegistryError),
}
