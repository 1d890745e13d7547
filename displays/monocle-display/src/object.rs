//! The closed set of drawable objects

use alloc::vec::Vec;

use crate::shape::{Line, Polygon, Polyline, Rectangle};
use crate::sprite::Sprite;
use crate::text::Text;
use crate::vector::VectorShape;

/// Anything that can be passed to [`Display::show`](crate::Display::show)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayObject {
    Line(Line),
    Rectangle(Rectangle),
    Polyline(Polyline),
    Polygon(Polygon),
    Text(Text),
    Sprite(Sprite),
    /// Nested objects, drawn in order
    Group(Vec<DisplayObject>),
}

impl DisplayObject {
    /// Translate the object (every member of a group)
    pub fn move_by(&mut self, dx: i32, dy: i32) {
        match self {
            DisplayObject::Line(o) => o.move_by(dx, dy),
            DisplayObject::Rectangle(o) => o.move_by(dx, dy),
            DisplayObject::Polyline(o) => o.move_by(dx, dy),
            DisplayObject::Polygon(o) => o.move_by(dx, dy),
            DisplayObject::Text(o) => o.move_by(dx, dy),
            DisplayObject::Sprite(o) => o.move_by(dx, dy),
            DisplayObject::Group(items) => {
                for item in items {
                    item.move_by(dx, dy);
                }
            }
        }
    }

    /// Recolor the object; sprites carry their own pixels and are left alone
    pub fn set_color(&mut self, color: u32) {
        match self {
            DisplayObject::Line(o) => o.color = color,
            DisplayObject::Rectangle(o) => o.color = color,
            DisplayObject::Polyline(o) => o.color = color,
            DisplayObject::Polygon(o) => o.fill_color = color,
            DisplayObject::Text(o) => o.color = color,
            DisplayObject::Sprite(_) => {}
            DisplayObject::Group(items) => {
                for item in items {
                    item.set_color(color);
                }
            }
        }
    }
}

macro_rules! impl_from {
    ($($variant:ident),*) => {
        $(impl From<$variant> for DisplayObject {
            fn from(o: $variant) -> Self {
                DisplayObject::$variant(o)
            }
        })*
    };
}

impl_from!(Line, Rectangle, Polyline, Polygon, Text, Sprite);

impl From<Vec<DisplayObject>> for DisplayObject {
    fn from(items: Vec<DisplayObject>) -> Self {
        DisplayObject::Group(items)
    }
}

/// Objects of one frame sorted by layer, each in flattened order
#[derive(Debug, Default)]
pub struct Layers<'a> {
    pub shapes: Vec<VectorShape<'a>>,
    pub texts: Vec<&'a Text>,
    pub sprites: Vec<&'a Sprite>,
}

impl<'a> Layers<'a> {
    /// Flatten groups depth-first and split by layer
    pub fn partition(objects: &'a [DisplayObject]) -> Self {
        let mut layers = Self::default();
        layers.collect(objects);
        layers
    }

    fn collect(&mut self, objects: &'a [DisplayObject]) {
        for object in objects {
            match object {
                DisplayObject::Line(o) => self.shapes.push(VectorShape::Line(o)),
                DisplayObject::Rectangle(o) => self.shapes.push(VectorShape::Rectangle(o)),
                DisplayObject::Polyline(o) => self.shapes.push(VectorShape::Polyline(o)),
                DisplayObject::Polygon(o) => self.shapes.push(VectorShape::Polygon(o)),
                DisplayObject::Text(o) => self.texts.push(o),
                DisplayObject::Sprite(o) => self.sprites.push(o),
                DisplayObject::Group(items) => self.collect(items),
            }
        }
    }
}
