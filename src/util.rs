pub fn normalize_rgba_color(color: &[u8; 4]) -> [f32; 4] {
    [
        color[0] as f32 / 255.0,
        color[1] as f32 / 255.0,
        color[2] as f32 / 255.0,
        color[3] as f32 / 255.0,
    ]
}

/// Number of `divisor`-sized cells needed to cover `value`.
#[inline(always)]
pub(crate) fn div_ceil(value: u32, divisor: u32) -> u32 {
    if divisor == 0 {
        return 0;
    }
    value.div_ceil(divisor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn div_ceil_covers_partial_cells() {
        assert_eq!(div_ceil(64, 32), 2);
        assert_eq!(div_ceil(65, 32), 3);
        assert_eq!(div_ceil(1, 32), 1);
        assert_eq!(div_ceil(0, 32), 0);
        assert_eq!(div_ceil(10, 0), 0);
    }
}
