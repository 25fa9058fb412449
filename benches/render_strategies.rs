use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tilerast::{flatten_par, Image, IndexBuild, Renderer, RendererConfig, ShapeGenerator, SpatialIndex, StrategyKind, TileGrid};

const WIDTH: u32 = 1024;
const HEIGHT: u32 = 1024;
const SEED: u64 = 7;
const SHAPE_COUNTS: [usize; 3] = [100, 1_000, 5_000];

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    group.sample_size(10);

    for count in SHAPE_COUNTS {
        let shapes = ShapeGenerator::new(SEED).generate(WIDTH, HEIGHT, count);
        let mut image = Image::new(WIDTH, HEIGHT).unwrap();

        for strategy in StrategyKind::ALL {
            let mut renderer = Renderer::new();
            renderer.set_strategy(strategy);

            group.bench_with_input(BenchmarkId::new(strategy.name(), count), &shapes, |b, shapes| {
                b.iter(|| renderer.render(&mut image, black_box(shapes)).unwrap())
            });
        }
    }
    group.finish();
}

fn bench_spatial_grid_options(c: &mut Criterion) {
    let shapes = ShapeGenerator::new(SEED).generate(WIDTH, HEIGHT, 2_000);
    let mut image = Image::new(WIDTH, HEIGHT).unwrap();
    let mut group = c.benchmark_group("spatial_grid");
    group.sample_size(10);

    for tile_size in [16, 32, 64] {
        for soa in [false, true] {
            let config = RendererConfig::default()
                .with_tile_size(tile_size)
                .with_structure_of_arrays(soa);
            let mut renderer = Renderer::with_config(config).unwrap();
            renderer.set_strategy(StrategyKind::SpatialGridParallel);

            let label = if soa { "soa" } else { "aos" };
            group.bench_function(BenchmarkId::new(label, tile_size), |b| {
                b.iter(|| renderer.render(&mut image, black_box(&shapes)).unwrap())
            });
        }
    }
    group.finish();
}

fn bench_index_build(c: &mut Criterion) {
    let shapes = ShapeGenerator::new(SEED).generate(WIDTH, HEIGHT, 5_000);
    let flattened = flatten_par(&shapes);
    let grid = TileGrid::new(WIDTH, HEIGHT, 32);

    c.bench_function("index_build_per_tile_lock", |b| {
        b.iter(|| SpatialIndex::build(grid, black_box(&flattened.bounds), IndexBuild::PerTileLock))
    });
    c.bench_function("index_build_thread_local_merge", |b| {
        b.iter(|| SpatialIndex::build(grid, black_box(&flattened.bounds), IndexBuild::ThreadLocalMerge))
    });
}

criterion_group!(benches, bench_strategies, bench_spatial_grid_options, bench_index_build);
criterion_main!(benches);
