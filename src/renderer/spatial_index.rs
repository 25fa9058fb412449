//! Tile grid and the per-tile item lists of the spatial grid strategy.

use std::sync::{Mutex, PoisonError};

use rayon::prelude::*;

use super::types::PixelSpan;
use crate::config::IndexBuild;
use crate::shape::Bounds;
use crate::util::div_ceil;

/// Square tiles covering a `width × height` image, numbered row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tile_size: u32,
    tiles_x: u32,
    tiles_y: u32,
}

impl TileGrid {
    pub fn new(width: u32, height: u32, tile_size: u32) -> Self {
        Self {
            width,
            height,
            tile_size,
            tiles_x: div_ceil(width, tile_size),
            tiles_y: div_ceil(height, tile_size),
        }
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn tiles_x(&self) -> u32 {
        self.tiles_x
    }

    pub fn tiles_y(&self) -> u32 {
        self.tiles_y
    }

    pub fn tile_count(&self) -> usize {
        self.tiles_x as usize * self.tiles_y as usize
    }

    /// Pixels whose centres may fall inside `bounds`, or `None` when no pixel
    /// of the image can.
    pub fn pixel_span(&self, bounds: &Bounds) -> Option<PixelSpan> {
        let (x_min, x_max) = axis_span(bounds.x_min, bounds.x_max, self.width)?;
        let (y_min, y_max) = axis_span(bounds.y_min, bounds.y_max, self.height)?;
        Some(PixelSpan {
            x_min,
            y_min,
            x_max,
            y_max,
        })
    }

    /// Inclusive tile coordinates overlapping `span`, clamped to the grid.
    pub fn tile_span(&self, span: &PixelSpan) -> PixelSpan {
        PixelSpan {
            x_min: span.x_min / self.tile_size,
            y_min: span.y_min / self.tile_size,
            x_max: (span.x_max / self.tile_size).min(self.tiles_x.saturating_sub(1)),
            y_max: (span.y_max / self.tile_size).min(self.tiles_y.saturating_sub(1)),
        }
    }

    /// Row-major indices of every tile `bounds` may touch.
    pub fn tiles_for(&self, bounds: &Bounds) -> impl Iterator<Item = usize> + '_ {
        let tiles = self.pixel_span(bounds).map(|span| self.tile_span(&span));
        tiles.into_iter().flat_map(move |tiles| {
            (tiles.y_min..=tiles.y_max).flat_map(move |ty| {
                (tiles.x_min..=tiles.x_max)
                    .map(move |tx| ty as usize * self.tiles_x as usize + tx as usize)
            })
        })
    }
}

/// Maps `[min, max]` onto the pixels of one axis whose centre `i + 0.5` may lie
/// inside it.
#[inline]
fn axis_span(min: f32, max: f32, dimension: u32) -> Option<(u32, u32)> {
    if dimension == 0 {
        return None;
    }
    let first = (min - 0.5).ceil().max(0.0);
    let last = (max - 0.5).floor().min((dimension - 1) as f32);
    // Also rejects NaN extents.
    if !(first <= last) {
        return None;
    }
    Some((first as u32, last as u32))
}

/// For every tile, the ids of the items whose bounding box overlaps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpatialIndex {
    grid: TileGrid,
    tiles: Vec<Vec<u32>>,
}

impl SpatialIndex {
    /// Builds the index in parallel over `bounds`, where `bounds[i]` belongs to
    /// item `i`.
    pub fn build(grid: TileGrid, bounds: &[Bounds], mode: IndexBuild) -> Self {
        let tiles = match mode {
            IndexBuild::PerTileLock => build_locked(&grid, bounds),
            IndexBuild::ThreadLocalMerge => build_merged(&grid, bounds),
        };
        Self { grid, tiles }
    }

    /// Single-threaded build. Lists come out in ascending id order.
    pub fn build_sequential(grid: TileGrid, bounds: &[Bounds]) -> Self {
        let mut tiles = vec![Vec::new(); grid.tile_count()];
        for (id, bounds) in bounds.iter().enumerate() {
            for tile in grid.tiles_for(bounds) {
                tiles[tile].push(id as u32);
            }
        }
        Self { grid, tiles }
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Items registered in the tile at row-major index `tile`. Unordered.
    pub fn tile(&self, tile: usize) -> &[u32] {
        &self.tiles[tile]
    }

    pub fn tiles(&self) -> &[Vec<u32>] {
        &self.tiles
    }

    pub fn into_tiles(self) -> Vec<Vec<u32>> {
        self.tiles
    }

    /// Total number of `(tile, item)` registrations.
    pub fn entry_count(&self) -> usize {
        self.tiles.iter().map(Vec::len).sum()
    }

    pub fn empty_tile_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_empty()).count()
    }
}

/// Shared grid with one lock per tile. A worker holds at most one tile lock at
/// a time, for a single push.
fn build_locked(grid: &TileGrid, bounds: &[Bounds]) -> Vec<Vec<u32>> {
    let tiles: Vec<Mutex<Vec<u32>>> = (0..grid.tile_count())
        .map(|_| Mutex::new(Vec::new()))
        .collect();

    bounds.par_iter().enumerate().for_each(|(id, bounds)| {
        for tile in grid.tiles_for(bounds) {
            // The lists are append-only, so a poisoned lock still guards a valid list.
            tiles[tile]
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(id as u32);
        }
    });

    tiles
        .into_iter()
        .map(|tile| tile.into_inner().unwrap_or_else(PoisonError::into_inner))
        .collect()
}

/// Workers collect `(tile, item)` pairs privately; the pairs are scattered into
/// the grid once every worker is done.
fn build_merged(grid: &TileGrid, bounds: &[Bounds]) -> Vec<Vec<u32>> {
    let batches: Vec<Vec<(u32, u32)>> = bounds
        .par_iter()
        .enumerate()
        .fold(Vec::new, |mut pairs, (id, bounds)| {
            pairs.extend(grid.tiles_for(bounds).map(|tile| (tile as u32, id as u32)));
            pairs
        })
        .collect();

    let mut tiles = vec![Vec::new(); grid.tile_count()];
    for (tile, id) in batches.into_iter().flatten() {
        tiles[tile as usize].push(id);
    }
    tiles
}

#[cfg(test)]
mod tests {
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;

    use super::*;
    use crate::generator::ShapeGenerator;
    use crate::renderer::flatten::flatten;

    fn sorted(mut tiles: Vec<Vec<u32>>) -> Vec<Vec<u32>> {
        for tile in &mut tiles {
            tile.sort_unstable();
        }
        tiles
    }

    #[test]
    fn grid_covers_partial_tiles() {
        let grid = TileGrid::new(70, 33, 32);
        assert_eq!((grid.tiles_x(), grid.tiles_y()), (3, 2));
        assert_eq!(grid.tile_count(), 6);
    }

    #[test]
    fn pixel_span_uses_pixel_centres() {
        let grid = TileGrid::new(4, 4, 32);

        // Circle at (2, 2) with radius 1.
        let span = grid.pixel_span(&Bounds::new(1.0, 1.0, 3.0, 3.0)).unwrap();
        assert_eq!(span, PixelSpan { x_min: 1, y_min: 1, x_max: 2, y_max: 2 });

        // Centre 0.5 lies exactly on the edge and is included.
        let span = grid.pixel_span(&Bounds::new(0.5, 0.5, 0.5, 0.5)).unwrap();
        assert_eq!(span, PixelSpan { x_min: 0, y_min: 0, x_max: 0, y_max: 0 });

        // No centre between 0.6 and 1.4.
        assert_eq!(grid.pixel_span(&Bounds::new(0.6, 0.6, 1.4, 1.4)), None);
    }

    #[test]
    fn pixel_span_is_clamped_to_the_image() {
        let grid = TileGrid::new(10, 10, 4);
        let span = grid.pixel_span(&Bounds::new(-20.0, 5.0, 40.0, 50.0)).unwrap();
        assert_eq!(span, PixelSpan { x_min: 0, y_min: 5, x_max: 9, y_max: 9 });

        assert_eq!(grid.pixel_span(&Bounds::new(-20.0, -20.0, -1.0, -1.0)), None);
        assert_eq!(grid.pixel_span(&Bounds::new(12.0, 0.0, 20.0, 5.0)), None);
    }

    #[test]
    fn tiles_for_lists_every_overlapped_tile() {
        let grid = TileGrid::new(100, 100, 32);
        let tiles: Vec<usize> = grid.tiles_for(&Bounds::new(30.0, 30.0, 70.0, 40.0)).collect();
        // Tile columns 0..=2 in tile rows 0..=1.
        assert_eq!(tiles, vec![0, 1, 2, 4, 5, 6]);
    }

    #[test]
    fn off_image_items_are_skipped() {
        let bounds = vec![
            Bounds::new(-50.0, -50.0, -10.0, -10.0),
            Bounds::new(0.0, 0.0, 8.0, 8.0),
        ];
        let index = SpatialIndex::build(TileGrid::new(64, 64, 16), &bounds, IndexBuild::PerTileLock);
        assert_eq!(index.entry_count(), 1);
        assert_eq!(index.tile(0), &[1]);
        assert_eq!(index.empty_tile_count(), 15);
    }

    #[test]
    fn sequential_build_is_in_id_order() {
        let shapes = ShapeGenerator::new(5).generate(256, 256, 300);
        let flattened = flatten(&shapes);
        let index = SpatialIndex::build_sequential(TileGrid::new(256, 256, 32), &flattened.bounds);
        for tile in index.tiles() {
            assert!(tile.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }

    #[quickcheck]
    fn parallel_builds_register_the_same_pairs(seed: u64, count: u8, tile_shift: u8) -> TestResult {
        let tile_size = 1 << (tile_shift % 7 + 2);
        let shapes = ShapeGenerator::new(seed).generate(200, 150, count as usize);
        let flattened = flatten(&shapes);
        let grid = TileGrid::new(200, 150, tile_size);

        let expected = SpatialIndex::build_sequential(grid, &flattened.bounds).into_tiles();
        let locked = SpatialIndex::build(grid, &flattened.bounds, IndexBuild::PerTileLock);
        let merged = SpatialIndex::build(grid, &flattened.bounds, IndexBuild::ThreadLocalMerge);

        TestResult::from_bool(
            sorted(locked.into_tiles()) == expected && sorted(merged.into_tiles()) == expected,
        )
    }

    #[quickcheck]
    fn every_covered_pixel_is_indexed_in_its_tile(seed: u64, count: u8) -> TestResult {
        let (width, height, tile_size) = (96, 80, 16);
        let shapes = ShapeGenerator::new(seed).generate(width, height, count as usize % 24);
        let flattened = flatten(&shapes);
        let grid = TileGrid::new(width, height, tile_size);
        let index = SpatialIndex::build(grid, &flattened.bounds, IndexBuild::PerTileLock);

        for (id, item) in flattened.items.iter().enumerate() {
            for y in 0..height {
                for x in 0..width {
                    if !item.contains(x as f32 + 0.5, y as f32 + 0.5) {
                        continue;
                    }
                    let tile = (y / tile_size * grid.tiles_x() + x / tile_size) as usize;
                    let hits = index.tile(tile).iter().filter(|&&entry| entry == id as u32).count();
                    if hits != 1 {
                        return TestResult::failed();
                    }
                }
            }
        }
        TestResult::passed()
    }
}
