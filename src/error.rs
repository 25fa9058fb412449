use std::path::PathBuf;

use thiserror::Error;

use crate::config::{MAX_TILE_SIZE, MIN_TILE_SIZE};
use crate::image::MAX_DIMENSION;

/// Errors returned by [`Renderer::render`](crate::Renderer::render).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// `render` was called before any strategy was selected.
    #[error("rendering strategy is not set")]
    StrategyNotSet,
}

/// Errors that can occur when creating, accessing or saving an [`Image`](crate::Image).
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("invalid image dimensions {width}x{height}, both must be in 1..={}", MAX_DIMENSION)]
    InvalidDimensions { width: u32, height: u32 },
    #[error("pixel ({x}, {y}) is outside the image")]
    OutOfBounds { x: u32, y: u32 },
    #[error("failed to encode {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: ::image::ImageError,
    },
}

/// Invalid [`RendererConfig`](crate::RendererConfig) values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("tile size {0} must be a power of two between {min} and {max}", min = MIN_TILE_SIZE, max = MAX_TILE_SIZE)]
    InvalidTileSize(u32),
}

/// Errors from the benchmark harness.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("invalid benchmark range: min {min}, max {max}, step {step}")]
    InvalidRange { min: usize, max: usize, step: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error(transparent)]
    Render(#[from] RenderError),
}
