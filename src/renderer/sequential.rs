use super::metrics::{PhaseClock, PhaseTimings};
use super::tile::shade_pixel;
use super::types::sample_point;
use super::{Strategy, StrategyKind};
use crate::{Image, Shape};

/// Single-threaded reference renderer.
///
/// Tests every pixel of the image against every shape, calling the shapes'
/// own containment tests. All other strategies must match its output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

impl Strategy for Sequential {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Sequential
    }

    fn render(&self, image: &mut Image, shapes: &[Shape]) -> PhaseTimings {
        let mut clock = PhaseClock::start();
        let sorted = sorted_by_depth(shapes);
        let flatten = clock.lap();

        for y in 0..image.height() {
            for x in 0..image.width() {
                let (px, py) = sample_point(x, y);
                image.set_pixel(x, y, shade_pixel(sorted.iter().copied(), px, py));
            }
        }
        let tile_render = clock.lap();

        PhaseTimings {
            flatten,
            tile_render,
            total: clock.total(),
            ..PhaseTimings::default()
        }
    }
}

/// References to `shapes` in back-to-front order.
///
/// The sort is stable, so shapes of equal depth keep their input order.
pub(super) fn sorted_by_depth(shapes: &[Shape]) -> Vec<&Shape> {
    let mut sorted: Vec<&Shape> = shapes.iter().collect();
    sorted.sort_by_key(|shape| shape.z());
    sorted
}
