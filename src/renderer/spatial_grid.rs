use rayon::prelude::*;
use tracing::debug;

use super::flatten::flatten_par;
use super::metrics::{PhaseClock, PhaseTimings};
use super::soa::TileBatch;
use super::spatial_index::{SpatialIndex, TileGrid};
use super::tile::render_tile;
use super::{Strategy, StrategyKind};
use crate::config::RendererConfig;
use crate::error::ConfigError;
use crate::{Image, Shape};

/// Bins items into the tiles their bounding boxes overlap, then shades each
/// tile against its own items only.
///
/// Tiles without items are not written at all, so they keep whatever the
/// image held before the render.
#[derive(Debug, Clone, Copy)]
pub struct SpatialGridParallel {
    config: RendererConfig,
}

impl SpatialGridParallel {
    pub fn new(config: RendererConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub(super) fn from_validated(config: &RendererConfig) -> Self {
        Self { config: *config }
    }
}

impl Strategy for SpatialGridParallel {
    fn kind(&self) -> StrategyKind {
        StrategyKind::SpatialGridParallel
    }

    fn render(&self, image: &mut Image, shapes: &[Shape]) -> PhaseTimings {
        let mut clock = PhaseClock::start();
        let flattened = flatten_par(shapes);
        let flatten = clock.lap();

        let grid = TileGrid::new(image.width(), image.height(), self.config.tile_size);
        let index = SpatialIndex::build(grid, &flattened.bounds, self.config.index_build);
        let index_build = clock.lap();

        let culled = flattened
            .bounds
            .iter()
            .filter(|bounds| grid.pixel_span(bounds).is_none())
            .count();
        debug!(
            items = flattened.len(),
            culled,
            tiles = grid.tile_count(),
            entries = index.entry_count(),
            empty_tiles = index.empty_tile_count(),
            mode = %self.config.index_build,
            "built spatial index"
        );

        let items = &flattened.items;
        let batched = self.config.structure_of_arrays;
        let written: usize = image
            .tiles_mut(grid.tile_size())
            .into_par_iter()
            .zip(index.into_tiles())
            .map_init(TileBatch::new, |batch, (mut target, mut ids)| {
                render_tile(&mut target, items, &mut ids, batched.then_some(batch)) as usize
            })
            .sum();
        let tile_render = clock.lap();

        debug!(written, skipped = grid.tile_count() - written, "rendered tiles");

        PhaseTimings {
            flatten,
            index_build,
            tile_render,
            total: clock.total(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexBuild;
    use crate::{Color, Rgba8};

    #[test]
    fn skips_tiles_without_items() {
        let mut image = Image::new(64, 64).unwrap();
        image.clear(Rgba8::WHITE);

        let shapes = vec![Shape::rect().x(8).y(8).length(4).width(4).color(Color::BLACK).build()];
        let strategy = SpatialGridParallel::new(RendererConfig::default().with_tile_size(16)).unwrap();
        let timings = strategy.render(&mut image, &shapes);

        assert_eq!(image.pixel(8, 8), Some(Rgba8::BLACK));
        // Same tile, not covered.
        assert_eq!(image.pixel(0, 0), Some(Rgba8::TRANSPARENT));
        // Other tiles keep the background.
        assert_eq!(image.pixel(16, 0), Some(Rgba8::WHITE));
        assert_eq!(image.pixel(63, 63), Some(Rgba8::WHITE));
        assert!(timings.total >= timings.tile_render);
    }

    #[test]
    fn every_configuration_renders_the_same() {
        let shapes = crate::generator::ShapeGenerator::new(99).generate(150, 110, 60);
        let reference = {
            let mut image = Image::new(150, 110).unwrap();
            SpatialGridParallel::new(RendererConfig::default())
                .unwrap()
                .render(&mut image, &shapes);
            image
        };

        for tile_size in [8, 16, 64, 256] {
            for structure_of_arrays in [false, true] {
                for index_build in [IndexBuild::PerTileLock, IndexBuild::ThreadLocalMerge] {
                    let config = RendererConfig {
                        tile_size,
                        structure_of_arrays,
                        index_build,
                    };
                    let mut image = Image::new(150, 110).unwrap();
                    SpatialGridParallel::new(config).unwrap().render(&mut image, &shapes);
                    assert!(image == reference, "{config:?} differs");
                }
            }
        }
    }
}
