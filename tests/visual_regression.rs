/// Visual regression tests for the tile rasterizer.
///
/// These tests render the shared scene with every strategy into a pixel
/// buffer, then validate specific pixel locations against expected colors.
///
/// Run with:   cargo test --test visual_regression
use tilerast::{Image, Renderer, Shape, StrategyKind};
use tilerast_test_scenes::{build_main_scene, check_pixels, PixelExpectation, CANVAS_HEIGHT, CANVAS_WIDTH};

fn render(strategy: StrategyKind, shapes: &[Shape]) -> Image {
    let mut renderer = Renderer::new();
    renderer.set_strategy(strategy);

    let mut image = Image::new(CANVAS_WIDTH, CANVAS_HEIGHT).expect("valid canvas size");
    renderer.render(&mut image, shapes).expect("strategy is set");
    image
}

fn assert_expectations(strategy: StrategyKind, image: &Image, expectations: &[PixelExpectation]) {
    let failures = check_pixels(image, expectations);
    if !failures.is_empty() {
        panic!(
            "{strategy}: {} pixel expectation(s) failed:\n{}",
            failures.len(),
            failures.join("\n"),
        );
    }
}

/// Main regression test: renders all 16 cells with each strategy and
/// validates pixel expectations.
#[test]
fn main_scene_pixel_expectations() {
    let scene = build_main_scene();

    for strategy in StrategyKind::ALL {
        let image = render(strategy, &scene.shapes);
        assert_expectations(strategy, &image, &scene.expectations);
    }
}

/// All strategies produce the same bytes for the main scene.
#[test]
fn main_scene_is_identical_across_strategies() {
    let scene = build_main_scene();
    let reference = render(StrategyKind::Sequential, &scene.shapes);

    for strategy in StrategyKind::ALL {
        let image = render(strategy, &scene.shapes);
        assert!(
            image.as_bytes() == reference.as_bytes(),
            "{strategy} differs from the sequential renderer"
        );
    }
}

/// Regression test: an empty shape list leaves a transparent image.
#[test]
fn empty_shape_list() {
    for strategy in StrategyKind::ALL {
        let image = render(strategy, &[]);
        assert!(
            image.as_bytes().iter().all(|&byte| byte == 0),
            "{strategy} wrote pixels for an empty scene",
        );
    }
}

/// Regression test: a single rectangle renders correctly.
#[test]
fn single_rect() {
    let shapes = [Shape::rect()
        .x(55)
        .y(55)
        .length(90)
        .width(90)
        .color(tilerast::Rgba8::rgb(200, 50, 50))
        .build()];

    let expectations = vec![
        PixelExpectation::opaque(55, 55, 200, 50, 50, "center_red"),
        PixelExpectation::transparent(5, 5, "outside_rect"),
    ];

    for strategy in StrategyKind::ALL {
        let image = render(strategy, &shapes);
        assert_expectations(strategy, &image, &expectations);
    }
}
