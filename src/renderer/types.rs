use crate::shape::{circle_contains, Bounds};
use crate::{Color, Shape};

/// Position of an item in the back-to-front paint order.
///
/// Ordered by depth first and input index second, so items at equal depth are
/// painted in the order they were submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DrawOrder {
    pub z: u8,
    pub id: u32,
}

impl DrawOrder {
    pub fn new(z: u8, id: u32) -> Self {
        Self { z, id }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Circle,
    Rect,
}

/// A shape reduced to a fixed layout for the shading loops.
///
/// `params` holds `[center_x, center_y, radius², 0]` for circles and
/// `[x_min, y_min, x_max, y_max]` for rectangles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderItem {
    pub z: u8,
    /// Index of the source shape in the render input.
    pub id: u32,
    pub kind: ItemKind,
    pub color: Color,
    pub params: [f32; 4],
}

impl RenderItem {
    #[inline(always)]
    pub fn order(&self) -> DrawOrder {
        DrawOrder::new(self.z, self.id)
    }

    /// Exact containment test for a sample point.
    #[inline(always)]
    pub fn contains(&self, px: f32, py: f32) -> bool {
        let [a, b, c, d] = self.params;
        match self.kind {
            ItemKind::Circle => circle_contains(a, b, c, px, py),
            ItemKind::Rect => Bounds::new(a, b, c, d).contains(px, py),
        }
    }
}

/// Inclusive pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelSpan {
    pub x_min: u32,
    pub y_min: u32,
    pub x_max: u32,
    pub y_max: u32,
}

/// Something that covers sample points with a single colour.
///
/// Implemented by both the polymorphic [`Shape`] and the flattened
/// [`RenderItem`] so every strategy shares one shading loop.
pub(crate) trait Coverage {
    fn covers(&self, px: f32, py: f32) -> bool;
    fn fill(&self) -> Color;
}

impl Coverage for RenderItem {
    #[inline(always)]
    fn covers(&self, px: f32, py: f32) -> bool {
        self.contains(px, py)
    }

    #[inline(always)]
    fn fill(&self) -> Color {
        self.color
    }
}

impl Coverage for Shape {
    #[inline(always)]
    fn covers(&self, px: f32, py: f32) -> bool {
        self.contains(px, py)
    }

    #[inline(always)]
    fn fill(&self) -> Color {
        self.color()
    }
}

/// Centre of pixel `(x, y)`.
#[inline(always)]
pub(crate) fn sample_point(x: u32, y: u32) -> (f32, f32) {
    (x as f32 + 0.5, y as f32 + 0.5)
}
