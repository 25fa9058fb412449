use rayon::prelude::*;

use super::metrics::{PhaseClock, PhaseTimings};
use super::sequential::sorted_by_depth;
use super::tile::shade_tile;
use super::{Strategy, StrategyKind};
use crate::config::{validate_tile_size, RendererConfig};
use crate::error::ConfigError;
use crate::{Image, Shape};

/// Splits the image into tiles and shades them in parallel, testing every
/// pixel against every shape.
#[derive(Debug, Clone, Copy)]
pub struct SimpleParallel {
    tile_size: u32,
}

impl SimpleParallel {
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

impl Strategy for SimpleParallel {
    fn kind(&self) -> StrategyKind {
        StrategyKind::SimpleParallel
    }

    fn render(&self, image: &mut Image, shapes: &[Shape]) -> PhaseTimings {
        let mut clock = PhaseClock::start();
        let sorted = sorted_by_depth(shapes);
        let flatten = clock.lap();

        image
            .tiles_mut(self.tile_size)
            .into_par_iter()
            .for_each(|mut tile| shade_tile(&mut tile, sorted.iter().copied()));
        let tile_render = clock.lap();

        PhaseTimings {
            flatten,
            tile_render,
            total: clock.total(),
            ..PhaseTimings::default()
        }
    }
}
