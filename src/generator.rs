//! Seedable random scenes for benchmarks and property tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{Color, Shape};

/// Radius range of generated circles, inclusive.
pub const CIRCLE_RADIUS: (u16, u16) = (20, 119);
/// Length and width range of generated rectangles, inclusive.
pub const RECT_EXTENT: (u16, u16) = (20, 169);
/// Largest generated depth.
pub const MAX_DEPTH: u8 = 254;

/// Produces random circles and rectangles from an owned, seedable RNG.
///
/// Two generators created with the same seed yield the same shapes.
#[derive(Debug, Clone)]
pub struct ShapeGenerator {
    rng: StdRng,
}

impl ShapeGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Generates `count` shapes whose centres lie inside a `width × height`
    /// image. Half of them, on average, are circles.
    pub fn generate(&mut self, width: u32, height: u32, count: usize) -> Vec<Shape> {
        let mut shapes = Vec::with_capacity(count);
        for _ in 0..count {
            let shape = if self.rng.gen_bool(0.5) {
                self.circle(width, height)
            } else {
                self.rect(width, height)
            };
            shapes.push(shape);
        }

        tracing::trace!(count, width, height, "generated shapes");
        shapes
    }

    /// A single random circle.
    pub fn circle(&mut self, width: u32, height: u32) -> Shape {
        let (x, y) = self.position(width, height);
        Shape::circle()
            .x(x)
            .y(y)
            .z(self.depth())
            .radius(self.rng.gen_range(CIRCLE_RADIUS.0..=CIRCLE_RADIUS.1))
            .color(self.color())
            .build()
    }

    /// A single random rectangle.
    pub fn rect(&mut self, width: u32, height: u32) -> Shape {
        let (x, y) = self.position(width, height);
        Shape::rect()
            .x(x)
            .y(y)
            .z(self.depth())
            .length(self.rng.gen_range(RECT_EXTENT.0..=RECT_EXTENT.1))
            .width(self.rng.gen_range(RECT_EXTENT.0..=RECT_EXTENT.1))
            .color(self.color())
            .build()
    }

    fn position(&mut self, width: u32, height: u32) -> (u16, u16) {
        let max_x = width.clamp(1, u16::MAX as u32 + 1) - 1;
        let max_y = height.clamp(1, u16::MAX as u32 + 1) - 1;
        (
            self.rng.gen_range(0..=max_x) as u16,
            self.rng.gen_range(0..=max_y) as u16,
        )
    }

    fn depth(&mut self) -> u8 {
        self.rng.gen_range(0..=MAX_DEPTH)
    }

    fn color(&mut self) -> Color {
        Color::rgba(self.rng.gen(), self.rng.gen(), self.rng.gen(), self.rng.gen())
    }
}
