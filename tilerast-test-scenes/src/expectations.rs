use tilerast::{Image, Rgba8};

/// The colour one pixel should have after rendering.
#[derive(Debug, Clone, Copy)]
pub struct PixelExpectation {
    pub x: u32,
    pub y: u32,
    pub expected: Rgba8,
    /// Largest accepted difference per channel (default 1).
    pub tolerance: u8,
    pub label: &'static str,
}

impl PixelExpectation {
    pub fn new(x: u32, y: u32, r: u8, g: u8, b: u8, a: u8, label: &'static str) -> Self {
        Self {
            x,
            y,
            expected: Rgba8([r, g, b, a]),
            tolerance: 1,
            label,
        }
    }

    pub fn with_tolerance(mut self, tolerance: u8) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn opaque(x: u32, y: u32, r: u8, g: u8, b: u8, label: &'static str) -> Self {
        Self::new(x, y, r, g, b, 255, label)
    }

    /// A pixel no shape touched.
    pub fn transparent(x: u32, y: u32, label: &'static str) -> Self {
        Self::new(x, y, 0, 0, 0, 0, label)
    }

    fn matches(&self, actual: Rgba8) -> bool {
        actual
            .0
            .iter()
            .zip(self.expected.0)
            .all(|(&actual, expected)| actual.abs_diff(expected) <= self.tolerance)
    }
}

/// Checks every expectation against `image`.
///
/// Returns one message per failed expectation; an empty list means all
/// passed.
pub fn check_pixels(image: &Image, expectations: &[PixelExpectation]) -> Vec<String> {
    expectations
        .iter()
        .filter_map(|expectation| {
            let PixelExpectation { x, y, label, .. } = *expectation;
            match image.pixel(x, y) {
                None => Some(format!(
                    "[{label}] pixel ({x},{y}) is outside the {}×{} image",
                    image.width(),
                    image.height(),
                )),
                Some(actual) if !expectation.matches(actual) => Some(format!(
                    "[{label}] pixel ({x},{y}) expected {:?} ±{} but got {:?}",
                    expectation.expected.0, expectation.tolerance, actual.0,
                )),
                Some(_) => None,
            }
        })
        .collect()
}
