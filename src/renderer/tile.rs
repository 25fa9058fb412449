use super::soa::TileBatch;
use super::types::{sample_point, Coverage, RenderItem};
use crate::compositor::{self, to_rgba8};
use crate::image::TileTarget;
use crate::Rgba8;

/// Final colour of a pixel sampled at `(px, py)`.
///
/// `candidates` must be in ascending draw order.
#[inline(always)]
pub(crate) fn shade_pixel<'i, C, I>(candidates: I, px: f32, py: f32) -> Rgba8
where
    C: Coverage + 'i,
    I: IntoIterator<Item = &'i C>,
{
    to_rgba8(compositor::fold(
        candidates
            .into_iter()
            .filter(|candidate| candidate.covers(px, py))
            .map(|candidate| candidate.fill()),
    ))
}

/// Writes every pixel of `target`, testing each against all `candidates`.
pub(crate) fn shade_tile<'i, C, I>(target: &mut TileTarget<'_>, candidates: I)
where
    C: Coverage + 'i,
    I: IntoIterator<Item = &'i C> + Clone,
{
    for y in target.y_range() {
        for x in target.x_range() {
            let (px, py) = sample_point(x, y);
            target.set_pixel(x, y, shade_pixel(candidates.clone(), px, py));
        }
    }
}

/// Sorts item ids into ascending `(depth, id)` order.
#[inline]
pub(crate) fn sort_by_draw_order(items: &[RenderItem], ids: &mut [u32]) {
    ids.sort_by_key(|&id| items[id as usize].order());
}

/// Renders one tile of the spatial grid from the ids registered in it.
///
/// An empty tile is left untouched. With a `batch`, the sorted items are
/// repacked by kind before shading. Returns whether any pixel was written.
pub(crate) fn render_tile(
    target: &mut TileTarget<'_>,
    items: &[RenderItem],
    ids: &mut [u32],
    batch: Option<&mut TileBatch>,
) -> bool {
    if ids.is_empty() {
        return false;
    }

    sort_by_draw_order(items, ids);

    match batch {
        Some(batch) => {
            batch.load(items, ids);
            shade_tile_batched(target, batch);
        }
        None => shade_tile(target, ids.iter().map(|&id| &items[id as usize])),
    }
    true
}

fn shade_tile_batched(target: &mut TileTarget<'_>, batch: &mut TileBatch) {
    for y in target.y_range() {
        let py = y as f32 + 0.5;
        batch.begin_row(py);
        for x in target.x_range() {
            let px = x as f32 + 0.5;
            target.set_pixel(x, y, to_rgba8(batch.shade(px)));
        }
    }
}
