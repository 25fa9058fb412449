//! The RGBA8 pixel buffer renderers draw into.

use std::ops::Range;
use std::path::Path;

use smallvec::SmallVec;

use crate::config::MIN_TILE_SIZE;
use crate::error::ImageError;
use crate::util::div_ceil;
use crate::Rgba8;

/// Largest accepted width or height.
pub const MAX_DIMENSION: u32 = 2048;

/// Row slices a [`TileTarget`] holds without allocating.
const INLINE_TILE_ROWS: usize = MIN_TILE_SIZE as usize;

/// A `width × height` row-major buffer of [`Rgba8`] pixels.
///
/// A new image is fully transparent. Renderers only ever write pixels, so
/// anything a render does not cover keeps its previous value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
}

impl Image {
    /// Creates a transparent image.
    ///
    /// Both dimensions must be in `1..=MAX_DIMENSION`.
    pub fn new(width: u32, height: u32) -> Result<Self, ImageError> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            tracing::error!(width, height, "rejected image dimensions");
            return Err(ImageError::InvalidDimensions { width, height });
        }

        Ok(Self {
            width,
            height,
            pixels: vec![Rgba8::TRANSPARENT; width as usize * height as usize],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Writes one pixel.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the image, like slice indexing.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba8) {
        assert!(
            x < self.width && y < self.height,
            "set_pixel: ({x}, {y}) is outside the {}x{} image",
            self.width,
            self.height
        );
        let index = self.offset(x, y);
        self.pixels[index] = color;
    }

    /// Writes one pixel, reporting out-of-range coordinates as an error.
    pub fn try_set_pixel(&mut self, x: u32, y: u32, color: Rgba8) -> Result<(), ImageError> {
        if x >= self.width || y >= self.height {
            return Err(ImageError::OutOfBounds { x, y });
        }
        let index = self.offset(x, y);
        self.pixels[index] = color;
        Ok(())
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[self.offset(x, y)])
    }

    /// Fills the whole image with `color`.
    pub fn clear(&mut self, color: Rgba8) {
        self.pixels.fill(color);
    }

    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    /// The raw RGBA8 bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Encodes the buffer as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), ImageError> {
        let path = path.as_ref();
        ::image::save_buffer_with_format(
            path,
            self.as_bytes(),
            self.width,
            self.height,
            ::image::ColorType::Rgba8,
            ::image::ImageFormat::Png,
        )
        .map_err(|source| ImageError::Encode {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "saved image");
        Ok(())
    }

    /// Splits the image into disjoint, independently writable square tiles.
    ///
    /// Tiles are returned in row-major tile order, so the tile at grid position
    /// `(tx, ty)` is at index `ty * ceil(width / tile_size) + tx`. Edge tiles are
    /// clipped to the image.
    pub fn tiles_mut(&mut self, tile_size: u32) -> Vec<TileTarget<'_>> {
        assert!(tile_size > 0, "tile size must be positive");

        let width = self.width as usize;
        let tile = tile_size as usize;
        let tiles_x = div_ceil(self.width, tile_size) as usize;
        let tiles_y = div_ceil(self.height, tile_size) as usize;

        let mut tiles: Vec<TileTarget<'_>> = Vec::with_capacity(tiles_x * tiles_y);

        for (tile_y, band) in self.pixels.chunks_mut(width * tile).enumerate() {
            let first = tiles.len();
            let band_height = band.len() / width;
            let y_start = tile_y * tile;

            for tile_x in 0..tiles_x {
                let x_start = tile_x * tile;
                tiles.push(TileTarget {
                    index: tile_y * tiles_x + tile_x,
                    x_start: x_start as u32,
                    y_start: y_start as u32,
                    x_end: (x_start + tile).min(width) as u32,
                    y_end: (y_start + band_height) as u32,
                    rows: SmallVec::new(),
                });
            }

            for row in band.chunks_mut(width) {
                for (target, span) in tiles[first..].iter_mut().zip(row.chunks_mut(tile)) {
                    target.rows.push(span);
                }
            }
        }

        tiles
    }

    #[inline(always)]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Exclusive write access to one tile of an [`Image`].
///
/// Coordinates passed to [`TileTarget::set_pixel`] are image coordinates.
#[derive(Debug)]
pub struct TileTarget<'a> {
    index: usize,
    x_start: u32,
    y_start: u32,
    x_end: u32,
    y_end: u32,
    rows: SmallVec<[&'a mut [Rgba8]; INLINE_TILE_ROWS]>,
}

impl TileTarget<'_> {
    /// Row-major index of this tile in the grid.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn x_range(&self) -> Range<u32> {
        self.x_start..self.x_end
    }

    pub fn y_range(&self) -> Range<u32> {
        self.y_start..self.y_end
    }

    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside this tile.
    #[inline(always)]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba8) {
        debug_assert!(self.x_range().contains(&x) && self.y_range().contains(&y));
        self.rows[(y - self.y_start) as usize][(x - self.x_start) as usize] = color;
    }
}
