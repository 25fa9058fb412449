use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Default tile side length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 32;

/// Smallest accepted tile side length.
pub const MIN_TILE_SIZE: u32 = 8;

/// Largest accepted tile side length.
pub const MAX_TILE_SIZE: u32 = 256;

/// How the spatial grid strategy fills its per-tile item lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexBuild {
    /// Items are appended straight into the shared grid, one lock per tile.
    #[default]
    PerTileLock,
    /// Every worker collects `(tile, item)` pairs locally; the pairs are
    /// scattered into the grid after the parallel phase.
    ThreadLocalMerge,
}

impl fmt::Display for IndexBuild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexBuild::PerTileLock => f.write_str("per-tile-lock"),
            IndexBuild::ThreadLocalMerge => f.write_str("thread-local-merge"),
        }
    }
}

impl FromStr for IndexBuild {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "per-tile-lock" | "lock" => Ok(IndexBuild::PerTileLock),
            "thread-local-merge" | "merge" => Ok(IndexBuild::ThreadLocalMerge),
            other => Err(format!("unknown index build mode `{other}`")),
        }
    }
}

/// Settings shared by every strategy a [`Renderer`](crate::Renderer) creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RendererConfig {
    /// Side length of the square tiles used as the unit of parallel work.
    pub tile_size: u32,
    /// Repack each tile's items into separate circle and rectangle arrays
    /// before shading (spatial grid strategy only).
    pub structure_of_arrays: bool,
    pub index_build: IndexBuild,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            structure_of_arrays: true,
            index_build: IndexBuild::default(),
        }
    }
}

impl RendererConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_tile_size(self.tile_size)
    }

    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    pub fn with_structure_of_arrays(mut self, enabled: bool) -> Self {
        self.structure_of_arrays = enabled;
        self
    }

    pub fn with_index_build(mut self, index_build: IndexBuild) -> Self {
        self.index_build = index_build;
        self
    }
}

/// Tile sizes must be powers of two in `MIN_TILE_SIZE..=MAX_TILE_SIZE`.
pub(crate) fn validate_tile_size(tile_size: u32) -> Result<(), ConfigError> {
    if !tile_size.is_power_of_two() || !(MIN_TILE_SIZE..=MAX_TILE_SIZE).contains(&tile_size) {
        return Err(ConfigError::InvalidTileSize(tile_size));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(RendererConfig::default().validate(), Ok(()));
    }

    #[test]
    fn tile_size_must_be_a_power_of_two() {
        for tile_size in [0, 1, 4, 3, 48, 512] {
            assert_eq!(
                RendererConfig::default().with_tile_size(tile_size).validate(),
                Err(ConfigError::InvalidTileSize(tile_size))
            );
        }
        for tile_size in [MIN_TILE_SIZE, 16, 64, MAX_TILE_SIZE] {
            assert!(RendererConfig::default().with_tile_size(tile_size).validate().is_ok());
        }
    }

    #[test]
    fn index_build_parses_from_cli_names() {
        assert_eq!("lock".parse(), Ok(IndexBuild::PerTileLock));
        assert_eq!(
            IndexBuild::ThreadLocalMerge.to_string().parse(),
            Ok(IndexBuild::ThreadLocalMerge)
        );
        assert!("spin".parse::<IndexBuild>().is_err());
    }
}
