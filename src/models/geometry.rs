use serde::{Deserialize, Serialize};

use super::{Point, Size, StyleClass};

/// Smallest width or height a shape or connector box may have.
pub const EPSILON: f64 = 0.01;

/// A rectangle on the page standing for one feature, scenario or step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: u32,
    pub text: String,
    pub center: Point,
    pub size: Size,
    pub style: StyleClass,
}

/// A straight connector from the bottom of one shape to the top of another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: u32,
    pub from: u32,
    pub to: u32,
    pub start: Point,
    pub end: Point,
}

/// Axis-aligned box given by its center and size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub center: Point,
    pub size: Size,
}

impl Edge {
    /// Bounding box of the connector line, never thinner than [`EPSILON`].
    pub fn bounds(&self) -> Bounds {
        let width = (self.end.x - self.start.x).abs().max(EPSILON);
        let height = (self.end.y - self.start.y).abs().max(EPSILON);
        let center = Point::new(
            self.start.x.min(self.end.x) + width / 2.0,
            self.start.y.min(self.end.y) + height / 2.0,
        );
        Bounds {
            center,
            size: Size::new(width, height),
        }
    }
}

/// Output of the geometry stage: shapes in node order, then the connectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub shapes: Vec<Shape>,
    pub edges: Vec<Edge>,
}
