use std::fmt;
use std::str::FromStr;

use tracing::{debug, error};

use crate::config::RendererConfig;
use crate::error::{ConfigError, RenderError};
use crate::{Image, Shape};

mod flatten;
mod metrics;
mod optimized_parallel;
mod sequential;
mod simple_parallel;
mod soa;
mod spatial_grid;
mod spatial_index;
mod tile;
mod types;

pub use flatten::{flatten, flatten_par, Flattened, Flattener};
pub use metrics::PhaseTimings;
pub use optimized_parallel::OptimizedParallel;
pub use sequential::Sequential;
pub use simple_parallel::SimpleParallel;
pub use spatial_grid::SpatialGridParallel;
pub use spatial_index::{SpatialIndex, TileGrid};
pub use types::{DrawOrder, ItemKind, PixelSpan, RenderItem};

/// One way of turning a list of shapes into pixels.
///
/// Every implementation must produce the same bytes for the same input. A
/// strategy keeps no state between calls.
pub trait Strategy: fmt::Debug + Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Draws `shapes` into `image`. Pixels the strategy does not write keep
    /// their previous value.
    fn render(&self, image: &mut Image, shapes: &[Shape]) -> PhaseTimings;
}

/// The available [`Strategy`] implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Sequential,
    SimpleParallel,
    OptimizedParallel,
    SpatialGridParallel,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Sequential,
        StrategyKind::SimpleParallel,
        StrategyKind::OptimizedParallel,
        StrategyKind::SpatialGridParallel,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::Sequential => "sequential",
            StrategyKind::SimpleParallel => "simple-parallel",
            StrategyKind::OptimizedParallel => "optimized-parallel",
            StrategyKind::SpatialGridParallel => "spatial-grid-parallel",
        }
    }

    /// Instantiates the strategy with the settings from `config`.
    pub fn create(self, config: RendererConfig) -> Result<Box<dyn Strategy>, ConfigError> {
        config.validate()?;
        Ok(self.create_validated(&config))
    }

    /// `config` must have passed [`RendererConfig::validate`].
    fn create_validated(self, config: &RendererConfig) -> Box<dyn Strategy> {
        match self {
            StrategyKind::Sequential => Box::new(Sequential),
            StrategyKind::SimpleParallel => Box::new(SimpleParallel::from_validated(config)),
            StrategyKind::OptimizedParallel => Box::new(OptimizedParallel::from_validated(config)),
            StrategyKind::SpatialGridParallel => Box::new(SpatialGridParallel::from_validated(config)),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sequential" | "seq" => Ok(StrategyKind::Sequential),
            "simple-parallel" | "simple" => Ok(StrategyKind::SimpleParallel),
            "optimized-parallel" | "optimized" => Ok(StrategyKind::OptimizedParallel),
            "spatial-grid-parallel" | "spatial-grid" | "grid" => {
                Ok(StrategyKind::SpatialGridParallel)
            }
            other => Err(format!("unknown strategy `{other}`")),
        }
    }
}

/// Renders shapes with a selectable [`Strategy`].
///
/// A new renderer has no strategy; [`Renderer::render`] fails until
/// [`Renderer::set_strategy`] is called.
///
/// # Examples
///
/// ```
/// use tilerast::{Color, Image, Renderer, Shape, StrategyKind};
///
/// let mut image = Image::new(4, 4)?;
/// let shapes = [Shape::circle().x(2).y(2).z(5).radius(1).color(Color::rgb(1.0, 0.0, 0.0)).build()];
///
/// let mut renderer = Renderer::new();
/// assert!(renderer.render(&mut image, &shapes).is_err());
///
/// renderer.set_strategy(StrategyKind::SpatialGridParallel);
/// renderer.render(&mut image, &shapes)?;
/// assert_eq!(image.pixel(2, 2).map(|pixel| pixel.0), Some([255, 0, 0, 255]));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Default)]
pub struct Renderer {
    config: RendererConfig,
    strategy: Option<Box<dyn Strategy>>,
    last_phase_timings: PhaseTimings,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RendererConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Replaces the active strategy.
    pub fn set_strategy(&mut self, kind: StrategyKind) {
        debug!(strategy = %kind, "set rendering strategy");
        // Validated in `with_config`.
        self.strategy = Some(kind.create_validated(&self.config));
    }

    /// Returns the renderer to the unset state.
    pub fn clear_strategy(&mut self) {
        self.strategy = None;
    }

    pub fn strategy(&self) -> Option<StrategyKind> {
        self.strategy.as_ref().map(|strategy| strategy.kind())
    }

    /// Draws `shapes` into `image` with the active strategy.
    ///
    /// Later shapes paint over earlier ones at equal depth. Pixels are not
    /// cleared first.
    pub fn render(&mut self, image: &mut Image, shapes: &[Shape]) -> Result<PhaseTimings, RenderError> {
        let Some(strategy) = self.strategy.as_ref() else {
            error!(shapes = shapes.len(), "render called without a strategy");
            return Err(RenderError::StrategyNotSet);
        };

        let timings = strategy.render(image, shapes);
        debug!(
            strategy = %strategy.kind(),
            shapes = shapes.len(),
            width = image.width(),
            height = image.height(),
            flatten_us = timings.flatten.as_micros() as u64,
            index_build_us = timings.index_build.as_micros() as u64,
            tile_render_us = timings.tile_render.as_micros() as u64,
            total_ms = timings.total_ms(),
            "rendered"
        );

        self.last_phase_timings = timings;
        Ok(timings)
    }

    /// Phase breakdown of the last successful render.
    pub fn last_phase_timings(&self) -> PhaseTimings {
        self.last_phase_timings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_names_round_trip() {
        for kind in StrategyKind::ALL {
            assert_eq!(kind.to_string().parse(), Ok(kind));
            assert_eq!(kind.create(RendererConfig::default()).unwrap().kind(), kind);
        }
        assert_eq!("grid".parse(), Ok(StrategyKind::SpatialGridParallel));
        assert!("gpu".parse::<StrategyKind>().is_err());
    }

    #[test]
    fn render_without_strategy_is_an_error() {
        let mut renderer = Renderer::new();
        let mut image = Image::new(2, 2).unwrap();
        let shapes = [Shape::rect().length(10).width(10).color(crate::Color::WHITE).build()];

        assert_eq!(renderer.render(&mut image, &shapes), Err(RenderError::StrategyNotSet));
        assert!(image.pixels().iter().all(|pixel| *pixel == crate::Rgba8::TRANSPARENT));

        renderer.set_strategy(StrategyKind::Sequential);
        assert!(renderer.render(&mut image, &shapes).is_ok());
        renderer.clear_strategy();
        assert_eq!(renderer.strategy(), None);
        assert_eq!(renderer.render(&mut image, &shapes), Err(RenderError::StrategyNotSet));
    }

    #[test]
    fn zero_tile_size_is_rejected_by_every_constructor() {
        let config = RendererConfig::default().with_tile_size(0);
        for kind in StrategyKind::ALL {
            assert_eq!(kind.create(config).err(), Some(ConfigError::InvalidTileSize(0)));
        }
        assert!(SimpleParallel::new(0).is_err());
        assert!(OptimizedParallel::new(0).is_err());
        assert!(SpatialGridParallel::new(config).is_err());
        assert!(Renderer::with_config(config).is_err());
    }

    #[test]
    fn smallest_tile_size_renders_like_the_default() {
        let shapes = crate::generator::ShapeGenerator::new(12).generate(40, 30, 25);
        let mut expected = Image::new(40, 30).unwrap();
        Sequential.render(&mut expected, &shapes);

        let config = RendererConfig::default().with_tile_size(crate::MIN_TILE_SIZE);
        for kind in StrategyKind::ALL {
            let mut image = Image::new(40, 30).unwrap();
            kind.create(config).unwrap().render(&mut image, &shapes);
            assert!(image == expected, "{kind} differs");
        }
        assert!(SimpleParallel::new(crate::MIN_TILE_SIZE / 2).is_err());
    }

    #[test]
    fn with_config_validates() {
        assert!(Renderer::with_config(RendererConfig::default().with_tile_size(24)).is_err());

        let renderer = Renderer::with_config(RendererConfig::default().with_tile_size(64)).unwrap();
        assert_eq!(renderer.config().tile_size, 64);
        assert_eq!(renderer.strategy(), None);
    }

    #[test]
    fn last_phase_timings_follow_the_latest_render() {
        let mut renderer = Renderer::new();
        renderer.set_strategy(StrategyKind::SpatialGridParallel);
        let mut image = Image::new(32, 32).unwrap();
        let shapes = crate::generator::ShapeGenerator::new(1).generate(32, 32, 10);

        let timings = renderer.render(&mut image, &shapes).unwrap();
        assert_eq!(renderer.last_phase_timings(), timings);
        assert!(timings.total >= timings.flatten + timings.index_build + timings.tile_render);
    }
}
