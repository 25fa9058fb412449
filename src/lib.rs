//! Tile-parallel CPU rasterizer for circles and rectangles.
//!
//! Shapes are composited back-to-front by depth, with input order breaking
//! ties, and several interchangeable [`Strategy`] implementations produce
//! byte-identical images.

pub mod bench;
mod color;
pub mod compositor;
mod config;
mod error;
pub mod generator;
mod image;
mod renderer;
pub mod shape;
mod util;

pub use color::{Color, Rgba8};
pub use config::{IndexBuild, RendererConfig, DEFAULT_TILE_SIZE, MAX_TILE_SIZE, MIN_TILE_SIZE};
pub use error::{BenchError, ConfigError, ImageError, RenderError};
pub use generator::ShapeGenerator;
pub use crate::image::{Image, TileTarget, MAX_DIMENSION};
pub use renderer::{
    flatten, flatten_par, DrawOrder, Flattened, Flattener, ItemKind, OptimizedParallel,
    PhaseTimings, PixelSpan, RenderItem, Renderer, Sequential, SimpleParallel,
    SpatialGridParallel, SpatialIndex, Strategy, StrategyKind, TileGrid,
};
pub use shape::{Bounds, CircleBuilder, CircleShape, RectBuilder, RectShape, Shape, ShapeVisitor};
pub use util::normalize_rgba_color;
