use rayon::prelude::*;

use super::types::{ItemKind, RenderItem};
use crate::shape::{Bounds, CircleShape, RectShape, ShapeVisitor};
use crate::Shape;

/// Flattened render input: one item and one bounding box per shape, both in
/// input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flattened {
    pub items: Vec<RenderItem>,
    pub bounds: Vec<Bounds>,
}

impl Flattened {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Converts one shape into its [`RenderItem`], stamping it with `id`.
#[derive(Debug, Clone, Copy)]
pub struct Flattener {
    id: u32,
}

impl Flattener {
    pub fn new(id: u32) -> Self {
        Self { id }
    }

    pub fn flatten(shape: &Shape, id: u32) -> (RenderItem, Bounds) {
        shape.accept(&mut Flattener::new(id))
    }
}

impl ShapeVisitor for Flattener {
    type Output = (RenderItem, Bounds);

    fn visit_circle(&mut self, circle: &CircleShape) -> Self::Output {
        let (center_x, center_y) = circle.center();
        let item = RenderItem {
            z: circle.z(),
            id: self.id,
            kind: ItemKind::Circle,
            color: circle.color(),
            params: [center_x, center_y, circle.radius_sq(), 0.0],
        };
        (item, circle.bounds())
    }

    fn visit_rect(&mut self, rect: &RectShape) -> Self::Output {
        let bounds = rect.bounds();
        let item = RenderItem {
            z: rect.z(),
            id: self.id,
            kind: ItemKind::Rect,
            color: rect.color(),
            params: [bounds.x_min, bounds.y_min, bounds.x_max, bounds.y_max],
        };
        (item, bounds)
    }
}

/// Flattens `shapes` on the calling thread.
pub fn flatten(shapes: &[Shape]) -> Flattened {
    let (items, bounds) = shapes
        .iter()
        .enumerate()
        .map(|(id, shape)| Flattener::flatten(shape, id as u32))
        .unzip();
    Flattened { items, bounds }
}

/// Flattens `shapes` across the rayon pool. Each item is written by exactly one
/// worker and the output order matches [`flatten`].
pub fn flatten_par(shapes: &[Shape]) -> Flattened {
    let (items, bounds) = shapes
        .par_iter()
        .enumerate()
        .map(|(id, shape)| Flattener::flatten(shape, id as u32))
        .unzip();
    Flattened { items, bounds }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::ShapeGenerator;
    use crate::Color;

    #[test]
    fn circle_stores_squared_radius() {
        let shape = Shape::circle().x(10).y(20).z(4).radius(3).color(Color::WHITE).build();
        let (item, bounds) = Flattener::flatten(&shape, 7);

        assert_eq!(item.kind, ItemKind::Circle);
        assert_eq!((item.z, item.id), (4, 7));
        assert_eq!(item.params, [10.0, 20.0, 9.0, 0.0]);
        assert_eq!(bounds, Bounds::new(7.0, 17.0, 13.0, 23.0));
    }

    #[test]
    fn rect_stores_its_extents() {
        let shape = Shape::rect().x(10).y(10).length(5).width(2).build();
        let (item, bounds) = Flattener::flatten(&shape, 0);

        assert_eq!(item.kind, ItemKind::Rect);
        assert_eq!(item.params, [7.5, 9.0, 12.5, 11.0]);
        assert_eq!(bounds, Bounds::new(7.5, 9.0, 12.5, 11.0));
    }

    #[test]
    fn ids_follow_input_order() {
        let shapes = ShapeGenerator::new(3).generate(128, 128, 500);
        let flattened = flatten_par(&shapes);

        assert_eq!(flattened.len(), shapes.len());
        for (index, item) in flattened.items.iter().enumerate() {
            assert_eq!(item.id as usize, index);
            assert_eq!(item.z, shapes[index].z());
        }
        assert_eq!(flattened, flatten(&shapes));
    }

    #[test]
    fn item_containment_matches_shape() {
        let shapes = ShapeGenerator::new(11).generate(64, 64, 50);
        let flattened = flatten(&shapes);

        for (shape, item) in shapes.iter().zip(&flattened.items) {
            for y in 0..64 {
                for x in 0..64 {
                    let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
                    assert_eq!(shape.contains(px, py), item.contains(px, py));
                }
            }
        }
    }
}
