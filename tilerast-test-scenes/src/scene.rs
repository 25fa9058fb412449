use tilerast::{Color, Rgba8, Shape};

use crate::expectations::PixelExpectation;

// ── Grid layout constants ────────────────────────────────────────────────────

const CELL_SIZE: u32 = 80;
const COLUMNS: u32 = 4;
const ROWS: u32 = 4;

pub const CANVAS_WIDTH: u32 = CELL_SIZE * COLUMNS;
pub const CANVAS_HEIGHT: u32 = CELL_SIZE * ROWS;

/// Shapes to render, in input order, and what the result must look like.
#[derive(Debug, Default)]
pub struct Scene {
    pub shapes: Vec<Shape>,
    pub expectations: Vec<PixelExpectation>,
}

/// Returns the pixel origin (top-left corner) of cell number `n` (1-based).
fn cell_origin(cell_number: u32) -> (u16, u16) {
    let index = cell_number - 1;
    let column = index % COLUMNS;
    let row = index / COLUMNS;
    ((column * CELL_SIZE) as u16, (row * CELL_SIZE) as u16)
}

/// Image coordinates of `(dx, dy)` inside the cell at `(ox, oy)`.
fn at((ox, oy): (u16, u16), dx: u32, dy: u32) -> (u32, u32) {
    (ox as u32 + dx, oy as u32 + dy)
}

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Rgba8::rgb(r, g, b).into()
}

/// Builds the entire main test scene and the pixel expectations it must
/// satisfy when rendered onto a transparent `CANVAS_WIDTH × CANVAS_HEIGHT`
/// image by any strategy.
pub fn build_main_scene() -> Scene {
    let mut scene = Scene::default();
    let shapes = &mut scene.shapes;
    let expectations = &mut scene.expectations;

    expectations.extend(cell_01_rect_solid(shapes));
    expectations.extend(cell_02_circle_solid(shapes));
    expectations.extend(cell_03_depth_order(shapes));
    expectations.extend(cell_04_equal_depth_later_wins(shapes));
    expectations.extend(cell_05_alpha_overlap(shapes));
    expectations.extend(cell_06_fully_transparent(shapes));
    expectations.extend(cell_07_unit_circle(shapes));
    expectations.extend(cell_08_one_pixel_rect(shapes));
    expectations.extend(cell_09_degenerate_shapes(shapes));
    expectations.extend(cell_10_stacked_layers(shapes));
    expectations.extend(cell_11_mixed_kinds_interleaved(shapes));
    expectations.extend(cell_12_equal_depth_mixed_kinds(shapes));
    expectations.extend(cell_13_empty(shapes));
    expectations.extend(cell_14_circle_bounding_box_corners(shapes));
    expectations.extend(cell_15_off_canvas(shapes));
    expectations.extend(cell_16_shape_at_canvas_edge(shapes));

    scene
}

// ── Section A: Basic Shapes ──────────────────────────────────────────────────

fn cell_01_rect_solid(shapes: &mut Vec<Shape>) -> Vec<PixelExpectation> {
    let origin @ (ox, oy) = cell_origin(1);
    shapes.push(
        Shape::rect()
            .x(ox + 40)
            .y(oy + 40)
            .length(60)
            .width(40)
            .color(rgb(220, 50, 50))
            .build(),
    );

    let (x, y) = at(origin, 40, 40);
    let (outside_x, outside_y) = at(origin, 40, 15);
    vec![
        PixelExpectation::opaque(x, y, 220, 50, 50, "c01_interior"),
        // Width runs along y: 20..60
        PixelExpectation::transparent(outside_x, outside_y, "c01_above_is_bg"),
    ]
}

fn cell_02_circle_solid(shapes: &mut Vec<Shape>) -> Vec<PixelExpectation> {
    let origin @ (ox, oy) = cell_origin(2);
    shapes.push(
        Shape::circle()
            .x(ox + 40)
            .y(oy + 40)
            .radius(30)
            .color(rgb(50, 180, 50))
            .build(),
    );

    let (x, y) = at(origin, 40, 40);
    let (inside_x, inside_y) = at(origin, 69, 40);
    let (outside_x, outside_y) = at(origin, 70, 40);
    vec![
        PixelExpectation::opaque(x, y, 50, 180, 50, "c02_interior"),
        // Centre (69.5, 40.5): distance² 870.5 ≤ 900
        PixelExpectation::opaque(inside_x, inside_y, 50, 180, 50, "c02_last_pixel_inside"),
        // Centre (70.5, 40.5): distance² 930.5
        PixelExpectation::transparent(outside_x, outside_y, "c02_first_pixel_outside"),
    ]
}

// ── Section B: Ordering ──────────────────────────────────────────────────────

fn cell_03_depth_order(shapes: &mut Vec<Shape>) -> Vec<PixelExpectation> {
    let origin @ (ox, oy) = cell_origin(3);
    // Submitted first but nearer.
    shapes.push(
        Shape::rect()
            .x(ox + 40)
            .y(oy + 40)
            .z(5)
            .length(60)
            .width(60)
            .color(rgb(220, 50, 50))
            .build(),
    );
    shapes.push(
        Shape::rect()
            .x(ox + 40)
            .y(oy + 40)
            .z(2)
            .length(60)
            .width(60)
            .color(rgb(50, 50, 220))
            .build(),
    );

    let (x, y) = at(origin, 40, 40);
    vec![PixelExpectation::opaque(x, y, 220, 50, 50, "c03_nearer_wins")]
}

fn cell_04_equal_depth_later_wins(shapes: &mut Vec<Shape>) -> Vec<PixelExpectation> {
    let origin @ (ox, oy) = cell_origin(4);
    for color in [rgb(220, 50, 50), rgb(50, 50, 220)] {
        shapes.push(
            Shape::circle()
                .x(ox + 40)
                .y(oy + 40)
                .z(3)
                .radius(30)
                .color(color)
                .build(),
        );
    }

    let (x, y) = at(origin, 40, 40);
    vec![PixelExpectation::opaque(x, y, 50, 50, 220, "c04_later_wins")]
}

// ── Section C: Alpha ─────────────────────────────────────────────────────────

fn cell_05_alpha_overlap(shapes: &mut Vec<Shape>) -> Vec<PixelExpectation> {
    let origin @ (ox, oy) = cell_origin(5);
    // x 10..50
    shapes.push(
        Shape::rect()
            .x(ox + 30)
            .y(oy + 40)
            .z(0)
            .length(40)
            .width(40)
            .color(Color::rgba(1.0, 0.0, 0.0, 0.5))
            .build(),
    );
    // x 30..70
    shapes.push(
        Shape::rect()
            .x(ox + 50)
            .y(oy + 40)
            .z(1)
            .length(40)
            .width(40)
            .color(Color::rgba(0.0, 0.0, 1.0, 0.5))
            .build(),
    );

    let (red_x, red_y) = at(origin, 15, 40);
    let (both_x, both_y) = at(origin, 40, 40);
    let (blue_x, blue_y) = at(origin, 65, 40);
    vec![
        // (0.5, 0, 0, 0.5)
        PixelExpectation::new(red_x, red_y, 128, 0, 0, 128, "c05_red_only").with_tolerance(0),
        // (0.25, 0, 0.5, 0.75)
        PixelExpectation::new(both_x, both_y, 64, 0, 128, 191, "c05_blue_over_red").with_tolerance(0),
        PixelExpectation::new(blue_x, blue_y, 0, 0, 128, 128, "c05_blue_only").with_tolerance(0),
    ]
}

fn cell_06_fully_transparent(shapes: &mut Vec<Shape>) -> Vec<PixelExpectation> {
    let origin @ (ox, oy) = cell_origin(6);
    shapes.push(
        Shape::rect()
            .x(ox + 40)
            .y(oy + 40)
            .z(0)
            .length(60)
            .width(60)
            .color(rgb(50, 50, 220))
            .build(),
    );
    shapes.push(
        Shape::circle()
            .x(ox + 40)
            .y(oy + 40)
            .z(1)
            .radius(20)
            .color(Color::rgba(1.0, 1.0, 1.0, 0.0))
            .build(),
    );

    let (x, y) = at(origin, 40, 40);
    vec![PixelExpectation::opaque(x, y, 50, 50, 220, "c06_transparent_shows_base").with_tolerance(0)]
}

// ── Section D: Pixel-centre sampling ─────────────────────────────────────────

fn cell_07_unit_circle(shapes: &mut Vec<Shape>) -> Vec<PixelExpectation> {
    let origin @ (ox, oy) = cell_origin(7);
    shapes.push(
        Shape::circle()
            .x(ox + 40)
            .y(oy + 40)
            .z(5)
            .radius(1)
            .color(Color::rgba(1.0, 0.0, 0.0, 1.0))
            .build(),
    );

    // The four centres around (40, 40) are at distance² 0.5, the next ring at 2.5.
    let mut expectations = Vec::new();
    for (dx, dy) in [(39, 39), (40, 39), (39, 40), (40, 40)] {
        let (x, y) = at(origin, dx, dy);
        expectations.push(PixelExpectation::opaque(x, y, 255, 0, 0, "c07_inside").with_tolerance(0));
    }
    for (dx, dy) in [(41, 40), (38, 40), (40, 41), (40, 38), (41, 41)] {
        let (x, y) = at(origin, dx, dy);
        expectations.push(PixelExpectation::transparent(x, y, "c07_outside").with_tolerance(0));
    }
    expectations
}

fn cell_08_one_pixel_rect(shapes: &mut Vec<Shape>) -> Vec<PixelExpectation> {
    let origin @ (ox, oy) = cell_origin(8);
    // Extents 39.5..=40.5 touch the centres of two pixels on each axis.
    shapes.push(
        Shape::rect()
            .x(ox + 40)
            .y(oy + 40)
            .length(1)
            .width(1)
            .color(rgb(180, 50, 180))
            .build(),
    );

    let (first_x, first_y) = at(origin, 39, 39);
    let (last_x, last_y) = at(origin, 40, 40);
    let (outside_x, outside_y) = at(origin, 41, 40);
    vec![
        PixelExpectation::opaque(first_x, first_y, 180, 50, 180, "c08_lower_edge_inclusive"),
        PixelExpectation::opaque(last_x, last_y, 180, 50, 180, "c08_upper_edge_inclusive"),
        PixelExpectation::transparent(outside_x, outside_y, "c08_outside"),
    ]
}

fn cell_09_degenerate_shapes(shapes: &mut Vec<Shape>) -> Vec<PixelExpectation> {
    let origin @ (ox, oy) = cell_origin(9);
    shapes.push(Shape::rect().x(ox + 40).y(oy + 40).length(0).width(30).color(Color::WHITE).build());
    shapes.push(Shape::circle().x(ox + 20).y(oy + 20).radius(0).color(Color::WHITE).build());

    let (rect_x, rect_y) = at(origin, 40, 40);
    let (circle_x, circle_y) = at(origin, 20, 20);
    vec![
        PixelExpectation::transparent(rect_x, rect_y, "c09_zero_length_rect"),
        PixelExpectation::transparent(circle_x, circle_y, "c09_zero_radius_circle"),
    ]
}

// ── Section E: Compositing chains ────────────────────────────────────────────

fn cell_10_stacked_layers(shapes: &mut Vec<Shape>) -> Vec<PixelExpectation> {
    let origin @ (ox, oy) = cell_origin(10);
    for z in [30, 10, 20] {
        shapes.push(
            Shape::circle()
                .x(ox + 40)
                .y(oy + 40)
                .z(z)
                .radius(25)
                .color(Color::rgba(1.0, 1.0, 1.0, 0.5))
                .build(),
        );
    }

    let (x, y) = at(origin, 40, 40);
    // Alpha 0.5 → 0.75 → 0.875
    vec![PixelExpectation::new(x, y, 223, 223, 223, 223, "c10_three_half_layers").with_tolerance(0)]
}

fn cell_11_mixed_kinds_interleaved(shapes: &mut Vec<Shape>) -> Vec<PixelExpectation> {
    let origin @ (ox, oy) = cell_origin(11);
    shapes.push(
        Shape::rect()
            .x(ox + 40)
            .y(oy + 40)
            .z(3)
            .length(50)
            .width(50)
            .color(Color::rgba(0.0, 1.0, 0.0, 0.5))
            .build(),
    );
    shapes.push(
        Shape::circle()
            .x(ox + 40)
            .y(oy + 40)
            .z(2)
            .radius(20)
            .color(Color::rgba(1.0, 0.0, 0.0, 0.5))
            .build(),
    );
    shapes.push(
        Shape::rect()
            .x(ox + 40)
            .y(oy + 40)
            .z(1)
            .length(70)
            .width(70)
            .color(Color::rgba(0.0, 0.0, 1.0, 1.0))
            .build(),
    );

    let (x, y) = at(origin, 40, 40);
    let (ring_x, ring_y) = at(origin, 40, 17);
    vec![
        // blue, then red at 0.5 → (0.5, 0, 0.5), then green at 0.5 → (0.25, 0.5, 0.25)
        PixelExpectation::opaque(x, y, 64, 128, 64, "c11_rect_circle_rect").with_tolerance(0),
        // Outside the circle: blue, then green at 0.5
        PixelExpectation::opaque(ring_x, ring_y, 0, 128, 128, "c11_rect_rect").with_tolerance(0),
    ]
}

fn cell_12_equal_depth_mixed_kinds(shapes: &mut Vec<Shape>) -> Vec<PixelExpectation> {
    let origin @ (ox, oy) = cell_origin(12);
    // Left half: circle first, rectangle second.
    shapes.push(Shape::circle().x(ox + 20).y(oy + 40).z(7).radius(15).color(rgb(220, 50, 50)).build());
    shapes.push(
        Shape::rect()
            .x(ox + 20)
            .y(oy + 40)
            .z(7)
            .length(20)
            .width(20)
            .color(rgb(50, 50, 220))
            .build(),
    );
    // Right half: rectangle first, circle second.
    shapes.push(
        Shape::rect()
            .x(ox + 60)
            .y(oy + 40)
            .z(7)
            .length(20)
            .width(20)
            .color(rgb(50, 50, 220))
            .build(),
    );
    shapes.push(Shape::circle().x(ox + 60).y(oy + 40).z(7).radius(15).color(rgb(220, 50, 50)).build());

    let (left_x, left_y) = at(origin, 20, 40);
    let (right_x, right_y) = at(origin, 60, 40);
    vec![
        PixelExpectation::opaque(left_x, left_y, 50, 50, 220, "c12_rect_submitted_last"),
        PixelExpectation::opaque(right_x, right_y, 220, 50, 50, "c12_circle_submitted_last"),
    ]
}

// ── Section F: Culling & edges ───────────────────────────────────────────────

fn cell_13_empty(_shapes: &mut Vec<Shape>) -> Vec<PixelExpectation> {
    let origin = cell_origin(13);
    let (x, y) = at(origin, 40, 40);
    let (corner_x, corner_y) = at(origin, 0, 0);
    vec![
        PixelExpectation::transparent(x, y, "c13_empty_center"),
        PixelExpectation::transparent(corner_x, corner_y, "c13_empty_corner"),
    ]
}

fn cell_14_circle_bounding_box_corners(shapes: &mut Vec<Shape>) -> Vec<PixelExpectation> {
    let origin @ (ox, oy) = cell_origin(14);
    shapes.push(
        Shape::circle()
            .x(ox + 40)
            .y(oy + 40)
            .radius(35)
            .color(rgb(220, 200, 50))
            .build(),
    );

    // Inside the bounding box (5..75) but outside the disc.
    let (corner_x, corner_y) = at(origin, 7, 7);
    let (edge_x, edge_y) = at(origin, 60, 6);
    let (top_x, top_y) = at(origin, 40, 5);
    vec![
        PixelExpectation::transparent(corner_x, corner_y, "c14_box_corner_not_painted"),
        // Centre (60.5, 6.5): distance² 1542.5 > 1225
        PixelExpectation::transparent(edge_x, edge_y, "c14_box_edge_not_painted"),
        // Centre (40.5, 5.5): distance² 1190.5
        PixelExpectation::opaque(top_x, top_y, 220, 200, 50, "c14_top_row_inside"),
    ]
}

fn cell_15_off_canvas(shapes: &mut Vec<Shape>) -> Vec<PixelExpectation> {
    let origin = cell_origin(15);
    // Entirely right of and below the canvas.
    shapes.push(
        Shape::circle()
            .x(CANVAS_WIDTH as u16 + 100)
            .y(CANVAS_HEIGHT as u16 + 100)
            .radius(50)
            .color(Color::WHITE)
            .build(),
    );
    shapes.push(
        Shape::rect()
            .x(CANVAS_WIDTH as u16 + 40)
            .y(40)
            .length(60)
            .width(60)
            .color(Color::WHITE)
            .build(),
    );

    let (x, y) = at(origin, 40, 40);
    vec![PixelExpectation::transparent(x, y, "c15_nothing_drawn")]
}

fn cell_16_shape_at_canvas_edge(shapes: &mut Vec<Shape>) -> Vec<PixelExpectation> {
    let origin @ (ox, oy) = cell_origin(16);
    // Extends beyond the right and bottom edges of the canvas.
    shapes.push(
        Shape::rect()
            .x(ox + 80)
            .y(oy + 80)
            .length(80)
            .width(80)
            .color(rgb(50, 180, 220))
            .build(),
    );

    let (x, y) = at(origin, 60, 60);
    let (last_x, last_y) = (CANVAS_WIDTH - 1, CANVAS_HEIGHT - 1);
    let (outside_x, outside_y) = at(origin, 30, 30);
    vec![
        PixelExpectation::opaque(x, y, 50, 180, 220, "c16_visible_portion"),
        PixelExpectation::opaque(last_x, last_y, 50, 180, 220, "c16_last_pixel"),
        PixelExpectation::transparent(outside_x, outside_y, "c16_outside"),
    ]
}
