use crate::util::normalize_rgba_color;

/// A floating point colour with straight (non-premultiplied) alpha.
///
/// Each channel is expected to lie in `[0.0, 1.0]`. This is the colour type
/// carried by shapes and accumulated by the compositor.
///
/// # Examples
///
/// ```
/// use tilerast::Color;
///
/// let red = Color::rgb(1.0, 0.0, 0.0);
/// assert_eq!(red.a, 1.0);
///
/// let half_blue = Color::rgba(0.0, 0.0, 1.0, 0.5);
/// assert_eq!(half_blue.to_array(), [0.0, 0.0, 1.0, 0.5]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Fully transparent black. The starting value of every back-to-front fold.
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);

    /// Creates an opaque colour.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Creates a colour from all four channels.
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[f32; 4]> for Color {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Rgba8> for Color {
    fn from(value: Rgba8) -> Self {
        value.normalize().into()
    }
}

/// Represents a color in RGBA8 format, the storage format of [`Image`](crate::Image).
///
/// This struct encapsulates color information using red, green, blue, and alpha (opacity) channels.
/// Each channel is an 8-bit unsigned integer.
///
/// # Examples
///
/// ```
/// use tilerast::Rgba8;
///
/// let red = Rgba8::rgb(255, 0, 0);
/// assert_eq!(red.normalize(), [1.0, 0.0, 0.0, 1.0]);
///
/// let semi_blue = Rgba8::rgba(0, 0, 255, 128);
/// assert_eq!(semi_blue.to_array(), [0, 0, 255, 128]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(transparent)]
pub struct Rgba8(pub [u8; 4]);

impl Rgba8 {
    /// A transparent color.
    ///
    /// All color channels are set to zero. Freshly created images hold this value.
    pub const TRANSPARENT: Self = Self([0, 0, 0, 0]);
    /// A black color.
    ///
    /// Red, green, and blue channels are set to zero, and alpha is fully opaque.
    pub const BLACK: Self = Self([0, 0, 0, 255]);
    /// A white color.
    pub const WHITE: Self = Self([255, 255, 255, 255]);

    /// Creates a new color with the specified RGB values and full opacity.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    /// Creates a new color with the specified RGBA values.
    ///
    /// # Examples
    ///
    /// ```
    /// use tilerast::Rgba8;
    ///
    /// let purple = Rgba8::rgba(128, 0, 128, 128);
    /// assert_eq!(purple, Rgba8([128, 0, 128, 128]));
    /// ```
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    /// Normalizes the color values to the range [0.0, 1.0].
    pub fn normalize(&self) -> [f32; 4] {
        normalize_rgba_color(&self.0)
    }

    pub fn to_array(&self) -> [u8; 4] {
        self.0
    }
}
