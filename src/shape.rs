//! The `shape` module provides the immutable shape values consumed by the
//! renderer: circles and axis-aligned rectangles, each with a position, a
//! depth and a straight-alpha colour.
//!
//! Shapes are built with chained setters and are read-only afterwards.
//!
//! # Examples
//!
//! ```rust
//! use tilerast::{Color, Shape};
//!
//! let circle = Shape::circle()
//!     .x(100)
//!     .y(80)
//!     .z(3)
//!     .radius(25)
//!     .color(Color::rgb(1.0, 0.0, 0.0))
//!     .build();
//!
//! let rect = Shape::rect()
//!     .x(40)
//!     .y(40)
//!     .z(1)
//!     .length(60)
//!     .width(20)
//!     .color(Color::rgba(0.0, 0.0, 1.0, 0.5))
//!     .build();
//!
//! assert!(circle.contains(100.5, 80.5));
//! assert!(rect.contains(69.5, 40.5));
//! assert!(!rect.contains(40.5, 50.5));
//! ```

use crate::Color;

/// Axis-aligned extents in continuous image coordinates.
///
/// Pixel `(x, y)` is sampled at `(x + 0.5, y + 0.5)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl Bounds {
    pub fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Inclusive box test.
    #[inline(always)]
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x_min && px <= self.x_max && py >= self.y_min && py <= self.y_max
    }
}

/// Circle test on a precomputed squared radius.
#[inline(always)]
pub(crate) fn circle_contains(center_x: f32, center_y: f32, radius_sq: f32, px: f32, py: f32) -> bool {
    let dx = center_x - px;
    let dy = center_y - py;
    dx * dx + dy * dy <= radius_sq
}

/// Represents a renderable shape.
///
/// # Variants
///
/// - `Circle(CircleShape)`: a disc given by its centre and radius.
/// - `Rect(RectShape)`: an axis-aligned rectangle given by its centre and size.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle(CircleShape),
    Rect(RectShape),
}

impl Shape {
    /// Creates a [`CircleBuilder`].
    pub fn circle() -> CircleBuilder {
        CircleBuilder::new()
    }

    /// Creates a [`RectBuilder`].
    pub fn rect() -> RectBuilder {
        RectBuilder::new()
    }

    /// Centre x coordinate.
    pub fn x(&self) -> u16 {
        match self {
            Shape::Circle(circle) => circle.x,
            Shape::Rect(rect) => rect.x,
        }
    }

    /// Centre y coordinate.
    pub fn y(&self) -> u16 {
        match self {
            Shape::Circle(circle) => circle.y,
            Shape::Rect(rect) => rect.y,
        }
    }

    /// Depth. Larger values are nearer to the viewer and painted later.
    pub fn z(&self) -> u8 {
        match self {
            Shape::Circle(circle) => circle.z,
            Shape::Rect(rect) => rect.z,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Shape::Circle(circle) => circle.color,
            Shape::Rect(rect) => rect.color,
        }
    }

    /// The smallest axis-aligned box enclosing the shape.
    pub fn bounds(&self) -> Bounds {
        match self {
            Shape::Circle(circle) => circle.bounds(),
            Shape::Rect(rect) => rect.bounds(),
        }
    }

    /// Exact containment test for a sample point.
    #[inline]
    pub fn contains(&self, px: f32, py: f32) -> bool {
        match self {
            Shape::Circle(circle) => circle.contains(px, py),
            Shape::Rect(rect) => rect.contains(px, py),
        }
    }

    /// Dispatches to the visitor method matching this shape's type.
    pub fn accept<V: ShapeVisitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            Shape::Circle(circle) => visitor.visit_circle(circle),
            Shape::Rect(rect) => visitor.visit_rect(rect),
        }
    }
}

impl From<CircleShape> for Shape {
    fn from(value: CircleShape) -> Self {
        Shape::Circle(value)
    }
}

impl From<RectShape> for Shape {
    fn from(value: RectShape) -> Self {
        Shape::Rect(value)
    }
}

/// Operations over every shape type, resolved once per shape through
/// [`Shape::accept`].
pub trait ShapeVisitor {
    type Output;

    fn visit_circle(&mut self, circle: &CircleShape) -> Self::Output;
    fn visit_rect(&mut self, rect: &RectShape) -> Self::Output;
}

/// A circle. You typically get one from [`Shape::circle`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleShape {
    pub(crate) x: u16,
    pub(crate) y: u16,
    pub(crate) z: u8,
    pub(crate) radius: u16,
    pub(crate) color: Color,
}

impl CircleShape {
    pub fn x(&self) -> u16 {
        self.x
    }

    pub fn y(&self) -> u16 {
        self.y
    }

    pub fn z(&self) -> u8 {
        self.z
    }

    pub fn radius(&self) -> u16 {
        self.radius
    }

    pub fn color(&self) -> Color {
        self.color
    }

    #[inline(always)]
    pub(crate) fn center(&self) -> (f32, f32) {
        (self.x as f32, self.y as f32)
    }

    /// The squared radius, computed the same way everywhere it is needed.
    #[inline(always)]
    pub(crate) fn radius_sq(&self) -> f32 {
        let radius = self.radius as f32;
        radius * radius
    }

    pub fn bounds(&self) -> Bounds {
        let (center_x, center_y) = self.center();
        let radius = self.radius as f32;
        Bounds::new(
            center_x - radius,
            center_y - radius,
            center_x + radius,
            center_y + radius,
        )
    }

    #[inline]
    pub fn contains(&self, px: f32, py: f32) -> bool {
        let (center_x, center_y) = self.center();
        circle_contains(center_x, center_y, self.radius_sq(), px, py)
    }
}

/// An axis-aligned rectangle centred on `(x, y)`.
///
/// `length` extends along the x axis and `width` along the y axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectShape {
    pub(crate) x: u16,
    pub(crate) y: u16,
    pub(crate) z: u8,
    pub(crate) length: u16,
    pub(crate) width: u16,
    pub(crate) color: Color,
}

impl RectShape {
    pub fn x(&self) -> u16 {
        self.x
    }

    pub fn y(&self) -> u16 {
        self.y
    }

    pub fn z(&self) -> u8 {
        self.z
    }

    pub fn length(&self) -> u16 {
        self.length
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn bounds(&self) -> Bounds {
        let half_length = self.length as f32 / 2.0;
        let half_width = self.width as f32 / 2.0;
        let (center_x, center_y) = (self.x as f32, self.y as f32);
        Bounds::new(
            center_x - half_length,
            center_y - half_width,
            center_x + half_length,
            center_y + half_width,
        )
    }

    #[inline]
    pub fn contains(&self, px: f32, py: f32) -> bool {
        self.bounds().contains(px, py)
    }
}

/// A builder for [`CircleShape`]s using a fluent interface.
///
/// Unset fields default to zero and a transparent colour.
#[derive(Debug, Clone, Copy, Default)]
pub struct CircleBuilder {
    x: u16,
    y: u16,
    z: u8,
    radius: u16,
    color: Color,
}

impl CircleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn x(mut self, x: u16) -> Self {
        self.x = x;
        self
    }

    pub fn y(mut self, y: u16) -> Self {
        self.y = y;
        self
    }

    pub fn z(mut self, z: u8) -> Self {
        self.z = z;
        self
    }

    pub fn radius(mut self, radius: u16) -> Self {
        self.radius = radius;
        self
    }

    pub fn color(mut self, color: impl Into<Color>) -> Self {
        self.color = color.into();
        self
    }

    /// Builds the [`Shape`].
    pub fn build(self) -> Shape {
        Shape::Circle(CircleShape {
            x: self.x,
            y: self.y,
            z: self.z,
            radius: self.radius,
            color: self.color,
        })
    }
}

impl From<CircleBuilder> for Shape {
    fn from(value: CircleBuilder) -> Self {
        value.build()
    }
}

/// A builder for [`RectShape`]s using a fluent interface.
#[derive(Debug, Clone, Copy, Default)]
pub struct RectBuilder {
    x: u16,
    y: u16,
    z: u8,
    length: u16,
    width: u16,
    color: Color,
}

impl RectBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn x(mut self, x: u16) -> Self {
        self.x = x;
        self
    }

    pub fn y(mut self, y: u16) -> Self {
        self.y = y;
        self
    }

    pub fn z(mut self, z: u8) -> Self {
        self.z = z;
        self
    }

    /// Extent along the x axis.
    pub fn length(mut self, length: u16) -> Self {
        self.length = length;
        self
    }

    /// Extent along the y axis.
    pub fn width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }

    pub fn color(mut self, color: impl Into<Color>) -> Self {
        self.color = color.into();
        self
    }

    /// Builds the [`Shape`].
    pub fn build(self) -> Shape {
        Shape::Rect(RectShape {
            x: self.x,
            y: self.y,
            z: self.z,
            length: self.length,
            width: self.width,
            color: self.color,
        })
    }
}

impl From<RectBuilder> for Shape {
    fn from(value: RectBuilder) -> Self {
        value.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_bounds_enclose_the_disc() {
        let circle = Shape::circle().x(10).y(20).radius(5).build();
        assert_eq!(circle.bounds(), Bounds::new(5.0, 15.0, 15.0, 25.0));
    }

    #[test]
    fn circle_boundary_is_inclusive() {
        let circle = Shape::circle().x(2).y(2).radius(1).build();
        // Sample at distance² = 0.5
        assert!(circle.contains(2.5, 2.5));
        // Sample at distance² = 1.0
        assert!(circle.contains(3.0, 2.0));
        // Sample at distance² = 2.5
        assert!(!circle.contains(3.5, 2.5));
    }

    #[test]
    fn rect_is_centred_with_length_along_x() {
        let rect = Shape::rect().x(50).y(50).length(20).width(10).build();
        assert_eq!(rect.bounds(), Bounds::new(40.0, 45.0, 60.0, 55.0));
        assert!(rect.contains(40.0, 45.0));
        assert!(rect.contains(60.0, 55.0));
        assert!(!rect.contains(39.9, 50.0));
        assert!(!rect.contains(50.0, 55.1));
    }

    #[test]
    fn builders_default_to_zero() {
        let shape = Shape::rect().build();
        assert_eq!((shape.x(), shape.y(), shape.z()), (0, 0, 0));
        assert_eq!(shape.color(), Color::TRANSPARENT);
    }

    #[test]
    fn accept_dispatches_on_type() {
        struct Kind;
        impl ShapeVisitor for Kind {
            type Output = &'static str;
            fn visit_circle(&mut self, _: &CircleShape) -> &'static str {
                "circle"
            }
            fn visit_rect(&mut self, _: &RectShape) -> &'static str {
                "rect"
            }
        }

        assert_eq!(Shape::circle().build().accept(&mut Kind), "circle");
        assert_eq!(Shape::rect().build().accept(&mut Kind), "rect");
    }
}
