//! Timing harness that renders growing shape counts and records the results
//! as CSV.

use std::collections::BTreeMap;
use std::io::Write;
use std::time::Instant;

use tracing::{debug, info};

use crate::error::BenchError;
use crate::{Image, PhaseTimings, Renderer, Shape, ShapeGenerator};

/// Header of the CSV written by [`run_benchmark`].
pub const CSV_HEADER: &str = "Shapes,RenderTimeMs";

/// Image size and the range of shape counts to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchmarkConfig {
    pub width: u32,
    pub height: u32,
    pub min_shapes: usize,
    pub max_shapes: usize,
    pub step: usize,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            width: 2048,
            height: 2048,
            min_shapes: 100,
            max_shapes: 5000,
            step: 100,
        }
    }
}

impl BenchmarkConfig {
    pub fn validate(&self) -> Result<(), BenchError> {
        if self.step == 0 || self.min_shapes > self.max_shapes {
            return Err(BenchError::InvalidRange {
                min: self.min_shapes,
                max: self.max_shapes,
                step: self.step,
            });
        }
        Ok(())
    }

    /// `min_shapes, min_shapes + step, ...` up to and including `max_shapes`.
    pub fn shape_counts(&self) -> impl Iterator<Item = usize> {
        (self.min_shapes..=self.max_shapes).step_by(self.step.max(1))
    }
}

/// One rendered shape count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchmarkSample {
    pub shapes: usize,
    pub render_time_ms: f64,
    pub timings: PhaseTimings,
}

/// Shape sets keyed by count, generated on first use and reused afterwards so
/// that every strategy renders the same scenes.
#[derive(Debug)]
pub struct ShapeCache {
    generator: ShapeGenerator,
    width: u32,
    height: u32,
    sets: BTreeMap<usize, Vec<Shape>>,
}

impl ShapeCache {
    pub fn new(generator: ShapeGenerator, width: u32, height: u32) -> Self {
        Self {
            generator,
            width,
            height,
            sets: BTreeMap::new(),
        }
    }

    pub fn get_or_generate(&mut self, count: usize) -> &[Shape] {
        let Self {
            generator,
            width,
            height,
            sets,
        } = self;
        sets.entry(count)
            .or_insert_with(|| generator.generate(*width, *height, count))
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

/// Renders every shape count of `config` once into a single reused image and
/// writes one CSV row per count to `out`.
pub fn run_benchmark<W: Write>(
    renderer: &mut Renderer,
    config: &BenchmarkConfig,
    shapes: &mut ShapeCache,
    mut out: W,
) -> Result<Vec<BenchmarkSample>, BenchError> {
    config.validate()?;
    let mut image = Image::new(config.width, config.height)?;

    writeln!(out, "{CSV_HEADER}")?;
    info!(
        strategy = ?renderer.strategy(),
        width = config.width,
        height = config.height,
        "starting benchmark"
    );

    let mut samples = Vec::new();
    for count in config.shape_counts() {
        let scene = shapes.get_or_generate(count);

        let started_at = Instant::now();
        let timings = renderer.render(&mut image, scene)?;
        let render_time_ms = started_at.elapsed().as_secs_f64() * 1_000.0;

        writeln!(out, "{count},{render_time_ms}")?;
        info!(shapes = count, render_time_ms, "benchmark step completed");
        debug!(?timings, "benchmark step phases");

        samples.push(BenchmarkSample {
            shapes: count,
            render_time_ms,
            timings,
        });
    }

    out.flush()?;
    info!(steps = samples.len(), "benchmark finished");
    Ok(samples)
}
