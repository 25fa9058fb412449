use rayon::prelude::*;
use tracing::trace;

use super::flatten::flatten;
use super::metrics::{PhaseClock, PhaseTimings};
use super::tile::shade_tile;
use super::{Strategy, StrategyKind};
use crate::config::{validate_tile_size, RendererConfig};
use crate::error::ConfigError;
use crate::{Image, Shape};

/// Like [`SimpleParallel`](super::SimpleParallel), but shades from a sorted
/// list of flattened [`RenderItem`](super::RenderItem)s instead of the
/// polymorphic shapes.
#[derive(Debug, Clone, Copy)]
pub struct OptimizedParallel {
    tile_size: u32,
}

impl OptimizedParallel {
    pub fn new(tile_size: u32) -> Result<Self, ConfigError> {
        validate_tile_size(tile_size)?;
        Ok(Self { tile_size })
    }

    pub(super) fn from_validated(config: &RendererConfig) -> Self {
        Self {
            tile_size: config.tile_size,
        }
    }
}

impl Strategy for OptimizedParallel {
    fn kind(&self) -> StrategyKind {
        StrategyKind::OptimizedParallel
    }

    fn render(&self, image: &mut Image, shapes: &[Shape]) -> PhaseTimings {
        let mut clock = PhaseClock::start();
        let mut items = flatten(shapes).items;
        items.sort_by_key(|item| item.order());
        let flatten = clock.lap();
        trace!(items = items.len(), ?flatten, "flattened and sorted");

        image
            .tiles_mut(self.tile_size)
            .into_par_iter()
            .for_each(|mut tile| shade_tile(&mut tile, &items));
        let tile_render = clock.lap();

        PhaseTimings {
            flatten,
            tile_render,
            total: clock.total(),
            ..PhaseTimings::default()
        }
    }
}
