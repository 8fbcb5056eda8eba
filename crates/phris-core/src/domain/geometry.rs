//! Image-plane geometry shared by zones, profiles and tracker input.

use serde::{Deserialize, Serialize};

/// A point in image (pixel) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate (pixels, grows rightwards)
    pub x: f64,
    /// Vertical coordinate (pixels, grows downwards)
    pub y: f64,
}

impl Point {
    /// Create a new point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// True when both coordinates are finite numbers
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box as emitted by the tracker (`x1,y1,x2,y2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x1: i32,
    /// Top edge
    pub y1: i32,
    /// Right edge
    pub x2: i32,
    /// Bottom edge
    pub y2: i32,
}

impl BoundingBox {
    /// Create a bounding box from its corners
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Center of the box.
    ///
    /// Uses floored integer halving so the center stays on the pixel grid.
    pub fn center(&self) -> Point {
        let cx = (i64::from(self.x1) + i64::from(self.x2)).div_euclid(2);
        let cy = (i64::from(self.y1) + i64::from(self.y2)).div_euclid(2);
        Point::new(cx as f64, cy as f64)
    }

    /// Box width (never negative)
    pub fn width(&self) -> u32 {
        self.x2.saturating_sub(self.x1).max(0) as u32
    }

    /// Box height (never negative)
    pub fn height(&self) -> u32 {
        self.y2.saturating_sub(self.y1).max(0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(30.0, 40.0);
        assert!((a.distance(&b) - 50.0).abs() < 1e-9);
        assert!((b.distance(&a) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_point_finiteness() {
        assert!(Point::new(1.0, 2.0).is_finite());
        assert!(!Point::new(f64::NAN, 2.0).is_finite());
        assert!(!Point::new(1.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_bbox_center_floors() {
        let bbox = BoundingBox::new(350, 450, 450, 550);
        assert_eq!(bbox.center(), Point::new(400.0, 500.0));

        let odd = BoundingBox::new(0, 0, 5, 3);
        assert_eq!(odd.center(), Point::new(2.0, 1.0));

        let negative = BoundingBox::new(-5, -5, 0, 0);
        assert_eq!(negative.center(), Point::new(-3.0, -3.0));
    }

    #[test]
    fn test_bbox_dimensions() {
        let bbox = BoundingBox::new(10, 20, 110, 220);
        assert_eq!(bbox.width(), 100);
        assert_eq!(bbox.height(), 200);

        let inverted = BoundingBox::new(10, 10, 5, 5);
        assert_eq!(inverted.width(), 0);
        assert_eq!(inverted.height(), 0);
    }
}
