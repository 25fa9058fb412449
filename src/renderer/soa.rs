//! Structure-of-arrays layout for one tile's items.
//!
//! Circles and rectangles are split into separate lane arrays so containment
//! can be evaluated for a whole row of candidates with straight-line loops.
//! Each array stays in draw order, and the hits of the two are merged back by
//! comparing [`DrawOrder`]s.

use super::types::{DrawOrder, ItemKind, RenderItem};
use crate::{compositor, Color};

/// Candidates evaluated per step of the containment loops.
const LANES: usize = 8;

#[derive(Debug, Default)]
struct CircleLanes {
    center_x: Vec<f32>,
    center_y: Vec<f32>,
    radius_sq: Vec<f32>,
    color: Vec<Color>,
    order: Vec<DrawOrder>,
    // Per row: (center_y - py)²
    dy_sq: Vec<f32>,
    hits: Vec<bool>,
}

impl CircleLanes {
    fn clear(&mut self) {
        self.center_x.clear();
        self.center_y.clear();
        self.radius_sq.clear();
        self.color.clear();
        self.order.clear();
    }

    fn push(&mut self, item: &RenderItem) {
        let [center_x, center_y, radius_sq, _] = item.params;
        self.center_x.push(center_x);
        self.center_y.push(center_y);
        self.radius_sq.push(radius_sq);
        self.color.push(item.color);
        self.order.push(item.order());
    }

    fn len(&self) -> usize {
        self.order.len()
    }

    fn begin_row(&mut self, py: f32) {
        self.dy_sq.clear();
        self.dy_sq.extend(self.center_y.iter().map(|&center_y| {
            let dy = center_y - py;
            dy * dy
        }));
        self.hits.resize(self.len(), false);
    }

    fn test(&mut self, px: f32) {
        let mut hits = self.hits.chunks_exact_mut(LANES);
        let mut center_x = self.center_x.chunks_exact(LANES);
        let mut dy_sq = self.dy_sq.chunks_exact(LANES);
        let mut radius_sq = self.radius_sq.chunks_exact(LANES);

        for (((hits, center_x), dy_sq), radius_sq) in
            (&mut hits).zip(&mut center_x).zip(&mut dy_sq).zip(&mut radius_sq)
        {
            for lane in 0..LANES {
                let dx = center_x[lane] - px;
                hits[lane] = dx * dx + dy_sq[lane] <= radius_sq[lane];
            }
        }

        let tail = hits
            .into_remainder()
            .iter_mut()
            .zip(center_x.remainder())
            .zip(dy_sq.remainder())
            .zip(radius_sq.remainder());
        for (((hit, center_x), dy_sq), radius_sq) in tail {
            let dx = center_x - px;
            *hit = dx * dx + dy_sq <= *radius_sq;
        }
    }
}

#[derive(Debug, Default)]
struct RectLanes {
    x_min: Vec<f32>,
    y_min: Vec<f32>,
    x_max: Vec<f32>,
    y_max: Vec<f32>,
    color: Vec<Color>,
    order: Vec<DrawOrder>,
    // Per row: whether py lies in [y_min, y_max]
    in_row: Vec<bool>,
    hits: Vec<bool>,
}

impl RectLanes {
    fn clear(&mut self) {
        self.x_min.clear();
        self.y_min.clear();
        self.x_max.clear();
        self.y_max.clear();
        self.color.clear();
        self.order.clear();
    }

    fn push(&mut self, item: &RenderItem) {
        let [x_min, y_min, x_max, y_max] = item.params;
        self.x_min.push(x_min);
        self.y_min.push(y_min);
        self.x_max.push(x_max);
        self.y_max.push(y_max);
        self.color.push(item.color);
        self.order.push(item.order());
    }

    fn len(&self) -> usize {
        self.order.len()
    }

    fn begin_row(&mut self, py: f32) {
        self.in_row.clear();
        self.in_row.extend(
            self.y_min
                .iter()
                .zip(&self.y_max)
                .map(|(&y_min, &y_max)| py >= y_min && py <= y_max),
        );
        self.hits.resize(self.len(), false);
    }

    fn test(&mut self, px: f32) {
        let mut hits = self.hits.chunks_exact_mut(LANES);
        let mut x_min = self.x_min.chunks_exact(LANES);
        let mut x_max = self.x_max.chunks_exact(LANES);
        let mut in_row = self.in_row.chunks_exact(LANES);

        for (((hits, x_min), x_max), in_row) in
            (&mut hits).zip(&mut x_min).zip(&mut x_max).zip(&mut in_row)
        {
            for lane in 0..LANES {
                hits[lane] = in_row[lane] & (px >= x_min[lane]) & (px <= x_max[lane]);
            }
        }

        let tail = hits
            .into_remainder()
            .iter_mut()
            .zip(x_min.remainder())
            .zip(x_max.remainder())
            .zip(in_row.remainder());
        for (((hit, &x_min), &x_max), &in_row) in tail {
            *hit = in_row & (px >= x_min) & (px <= x_max);
        }
    }
}

/// One tile's items split by kind, plus the per-row scratch the shading loop
/// needs.
///
/// A batch is reused across tiles to keep allocations out of the tile loop.
#[derive(Debug, Default)]
pub struct TileBatch {
    circles: CircleLanes,
    rects: RectLanes,
}

impl TileBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the batch contents with `sorted`, a list of ids into `items`
    /// already in ascending draw order.
    pub fn load(&mut self, items: &[RenderItem], sorted: &[u32]) {
        self.circles.clear();
        self.rects.clear();

        for &id in sorted {
            let item = &items[id as usize];
            match item.kind {
                ItemKind::Circle => self.circles.push(item),
                ItemKind::Rect => self.rects.push(item),
            }
        }
    }

    #[cfg(test)]
    pub fn circle_count(&self) -> usize {
        self.circles.len()
    }

    #[cfg(test)]
    pub fn rect_count(&self) -> usize {
        self.rects.len()
    }

    /// Precomputes the terms of the containment tests that depend only on `py`.
    pub fn begin_row(&mut self, py: f32) {
        self.circles.begin_row(py);
        self.rects.begin_row(py);
    }

    /// Composites every item covering `(px, py)`, where `py` is the value last
    /// passed to [`TileBatch::begin_row`].
    pub fn shade(&mut self, px: f32) -> Color {
        self.circles.test(px);
        self.rects.test(px);

        merge_hits(
            (&self.circles.hits, &self.circles.order, &self.circles.color),
            (&self.rects.hits, &self.rects.order, &self.rects.color),
        )
    }
}

type Lane<'a> = (&'a [bool], &'a [DrawOrder], &'a [Color]);

/// Blends the hits of two draw-ordered sequences in their combined draw order.
fn merge_hits(
    (circle_hits, circle_order, circle_color): Lane<'_>,
    (rect_hits, rect_order, rect_color): Lane<'_>,
) -> Color {
    let mut accumulated = Color::TRANSPARENT;
    let (mut circle, mut rect) = (0, 0);

    loop {
        while circle < circle_hits.len() && !circle_hits[circle] {
            circle += 1;
        }
        while rect < rect_hits.len() && !rect_hits[rect] {
            rect += 1;
        }

        let take_circle = match (circle < circle_hits.len(), rect < rect_hits.len()) {
            (true, true) => circle_order[circle] < rect_order[rect],
            (true, false) => true,
            (false, true) => false,
            (false, false) => break,
        };

        if take_circle {
            accumulated = compositor::blend(accumulated, circle_color[circle]);
            circle += 1;
        } else {
            accumulated = compositor::blend(accumulated, rect_color[rect]);
            rect += 1;
        }
    }

    accumulated
}
