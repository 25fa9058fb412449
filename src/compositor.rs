//! Alpha compositing shared by every render strategy.
//!
//! All strategies fold the colours covering a pixel through [`blend`] in
//! ascending `(depth, id)` order, starting from [`Color::TRANSPARENT`], and
//! encode the result with [`to_rgba8`].

use crate::color::{Color, Rgba8};

/// Alpha values at or below this are treated as fully transparent when
/// unpremultiplying.
pub const ALPHA_EPSILON: f32 = 1.0e-6;

/// "Over" compositing of `new` on top of `old`.
///
/// `new` is a straight-alpha shape colour. The colour channels of the result
/// carry `new.a` already applied, so folding from a transparent base yields
/// a premultiplied accumulator.
#[inline(always)]
pub fn blend(old: Color, new: Color) -> Color {
    let inv_alpha = 1.0 - new.a;

    Color {
        r: new.r * new.a + old.r * inv_alpha,
        g: new.g * new.a + old.g * inv_alpha,
        b: new.b * new.a + old.b * inv_alpha,
        a: new.a + old.a * inv_alpha,
    }
}

/// Folds `colors` back-to-front starting from transparent.
///
/// The iterator must already be in ascending `(depth, id)` order.
#[inline]
pub fn fold<I>(colors: I) -> Color
where
    I: IntoIterator<Item = Color>,
{
    colors.into_iter().fold(Color::TRANSPARENT, blend)
}

/// Scales each channel to `0..=255`, rounding half away from zero.
///
/// Channels outside `[0, 1]` saturate.
#[inline(always)]
pub fn to_rgba8(color: Color) -> Rgba8 {
    Rgba8([
        channel_to_u8(color.r),
        channel_to_u8(color.g),
        channel_to_u8(color.b),
        channel_to_u8(color.a),
    ])
}

/// Divides the colour channels by alpha.
///
/// A colour whose alpha is (nearly) zero maps to [`Color::TRANSPARENT`].
#[inline]
pub fn unpremultiply(color: Color) -> Color {
    if color.a <= ALPHA_EPSILON {
        return Color::TRANSPARENT;
    }

    Color {
        r: color.r / color.a,
        g: color.g / color.a,
        b: color.b / color.a,
        a: color.a,
    }
}

/// [`to_rgba8`] applied after [`unpremultiply`], for consumers that expect
/// straight alpha (e.g. PNG viewers).
#[inline]
pub fn to_rgba8_unpremultiplied(color: Color) -> Rgba8 {
    to_rgba8(unpremultiply(color))
}

#[inline(always)]
fn channel_to_u8(value: f32) -> u8 {
    // `as` saturates, NaN becomes 0.
    (value * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transparent_over_base_leaves_base_unchanged() {
        let base = Color::rgba(0.25, 0.5, 0.75, 0.6);
        let result = blend(base, Color::rgba(1.0, 1.0, 1.0, 0.0));
        assert_eq!(result, base);
    }

    #[test]
    fn opaque_over_base_replaces_it() {
        let base = Color::rgba(0.25, 0.5, 0.75, 0.6);
        let red = Color::rgb(1.0, 0.0, 0.0);
        assert_eq!(blend(base, red), red);
    }

    #[test]
    fn two_half_transparent_layers_follow_the_formula() {
        let first = blend(Color::TRANSPARENT, Color::rgba(1.0, 0.0, 0.0, 0.5));
        assert_eq!(first, Color::rgba(0.5, 0.0, 0.0, 0.5));

        let second = blend(first, Color::rgba(0.0, 0.0, 1.0, 0.5));
        assert_eq!(second, Color::rgba(0.25, 0.0, 0.5, 0.75));
        assert_eq!(to_rgba8(second), Rgba8([64, 0, 128, 191]));
    }

    #[test]
    fn blend_order_matters() {
        let red = Color::rgba(1.0, 0.0, 0.0, 0.5);
        let blue = Color::rgba(0.0, 0.0, 1.0, 0.5);
        assert_ne!(fold([red, blue]), fold([blue, red]));
    }

    #[test]
    fn to_rgba8_rounds_to_nearest() {
        assert_eq!(to_rgba8(Color::rgba(0.5, 1.0 / 255.0 * 0.49, 0.0, 1.0)).0, [128, 0, 0, 255]);
        assert_eq!(to_rgba8(Color::rgba(2.0, -1.0, f32::NAN, 0.0)).0, [255, 0, 0, 0]);
    }

    #[test]
    fn unpremultiply_maps_zero_alpha_to_transparent() {
        assert_eq!(unpremultiply(Color::rgba(0.3, 0.2, 0.1, 0.0)), Color::TRANSPARENT);
        assert_eq!(to_rgba8_unpremultiplied(Color::rgba(0.3, 0.2, 0.1, 1.0e-9)), Rgba8::TRANSPARENT);
    }

    #[test]
    fn unpremultiply_recovers_straight_color() {
        let accumulated = blend(Color::TRANSPARENT, Color::rgba(1.0, 0.0, 0.0, 0.5));
        assert_eq!(to_rgba8_unpremultiplied(accumulated), Rgba8([255, 0, 0, 128]));
    }
}
