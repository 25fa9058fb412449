use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use structopt::StructOpt;
use tracing::info;

use tilerast::bench::{run_benchmark, BenchmarkConfig, ShapeCache};
use tilerast::{Image, IndexBuild, Renderer, RendererConfig, ShapeGenerator, StrategyKind};

#[derive(StructOpt, Debug)]
#[structopt(name = "tilerast-bench", about = "Benchmarks the rendering strategies")]
struct Opt {
    /// Image width in pixels.
    #[structopt(long = "width", default_value = "2048")]
    width: u32,

    /// Image height in pixels.
    #[structopt(long = "height", default_value = "2048")]
    height: u32,

    /// The smallest number of shapes rendered.
    #[structopt(long = "min-shapes", default_value = "100")]
    min_shapes: usize,

    /// The largest number of shapes rendered.
    #[structopt(long = "max-shapes", default_value = "5000")]
    max_shapes: usize,

    /// Increment between shape counts.
    #[structopt(long = "step", default_value = "100")]
    step: usize,

    /// Number of times every strategy is benchmarked.
    #[structopt(short = "i", long = "iterations", default_value = "10")]
    iterations: usize,

    /// Seed for the shape generator. Random when omitted.
    #[structopt(long = "seed")]
    seed: Option<u64>,

    /// Worker threads. 0 lets rayon decide.
    #[structopt(short = "j", long = "threads", default_value = "8")]
    threads: usize,

    /// Strategies to benchmark, comma separated.
    #[structopt(
        short = "s",
        long = "strategies",
        default_value = "simple-parallel,optimized-parallel,spatial-grid-parallel",
        use_delimiter = true
    )]
    strategies: Vec<StrategyKind>,

    /// Directory the CSV files are written to.
    #[structopt(short = "o", long = "out-dir", default_value = "results", parse(from_os_str))]
    out_dir: PathBuf,

    /// Render one scene with every strategy, check that the outputs match and
    /// save it as a PNG at this path.
    #[structopt(long = "snapshot", parse(from_os_str))]
    snapshot: Option<PathBuf>,

    /// Number of shapes in the snapshot scene.
    #[structopt(long = "snapshot-shapes", default_value = "500")]
    snapshot_shapes: usize,

    /// Tile side length in pixels, a power of two from 8 to 256.
    #[structopt(long = "tile-size", default_value = "32")]
    tile_size: u32,

    /// Shade spatial grid tiles straight from the item list.
    #[structopt(long = "no-soa")]
    no_soa: bool,

    /// How the spatial index is filled: per-tile-lock or thread-local-merge.
    #[structopt(long = "index-build", default_value = "per-tile-lock")]
    index_build: IndexBuild,
}

impl Opt {
    fn generator(&self) -> ShapeGenerator {
        self.seed
            .map(ShapeGenerator::new)
            .unwrap_or_else(ShapeGenerator::from_entropy)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let opt = Opt::from_args();

    rayon::ThreadPoolBuilder::new()
        .num_threads(opt.threads)
        .build_global()
        .context("failed to configure the worker pool")?;
    info!(threads = rayon::current_num_threads(), "worker pool ready");

    let config = RendererConfig::default()
        .with_tile_size(opt.tile_size)
        .with_structure_of_arrays(!opt.no_soa)
        .with_index_build(opt.index_build);
    let mut renderer = Renderer::with_config(config)?;

    if let Some(path) = &opt.snapshot {
        snapshot(&mut renderer, &opt, path)?;
    }

    let bench = BenchmarkConfig {
        width: opt.width,
        height: opt.height,
        min_shapes: opt.min_shapes,
        max_shapes: opt.max_shapes,
        step: opt.step,
    };
    bench.validate()?;

    fs::create_dir_all(&opt.out_dir)
        .with_context(|| format!("failed to create {}", opt.out_dir.display()))?;

    for iteration in 0..opt.iterations {
        // Every strategy of an iteration renders the same scenes.
        let mut shapes = ShapeCache::new(opt.generator(), bench.width, bench.height);

        for &strategy in &opt.strategies {
            renderer.set_strategy(strategy);

            let path = opt
                .out_dir
                .join(format!("{iteration}_{strategy}_benchmark_results.csv"));
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            info!(path = %path.display(), "writing results");

            run_benchmark(&mut renderer, &bench, &mut shapes, BufWriter::new(file))?;
        }
    }

    Ok(())
}

/// Renders one scene with every strategy and saves it once all outputs agree.
fn snapshot(renderer: &mut Renderer, opt: &Opt, path: &Path) -> anyhow::Result<()> {
    let shapes = opt.generator().generate(opt.width, opt.height, opt.snapshot_shapes);

    let mut reference: Option<(StrategyKind, Image)> = None;
    for strategy in StrategyKind::ALL {
        let mut image = Image::new(opt.width, opt.height)?;
        renderer.set_strategy(strategy);
        let timings = renderer.render(&mut image, &shapes)?;
        info!(%strategy, total_ms = timings.total_ms(), "snapshot rendered");

        if let Some((expected_strategy, expected)) = &reference {
            if expected.as_bytes() != image.as_bytes() {
                bail!("{strategy} output differs from {expected_strategy}");
            }
        } else {
            reference = Some((strategy, image));
        }
    }

    if let Some((_, image)) = reference {
        image.save_png(path)?;
        info!(path = %path.display(), "snapshot saved");
    }
    Ok(())
}
