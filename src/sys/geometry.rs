use std::fmt;

use serde::{Deserialize, Serialize};

/// A point in virtual-screen coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self { Self { x, y } }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self { Self { width, height } }
}

/// Screen rectangle stored as edges, the way the window manager reports it.
/// `right` and `bottom` are exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Far edges saturate at the ends of the coordinate range.
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self {
            left: origin.x,
            top: origin.y,
            right: origin.x.saturating_add(size.width),
            bottom: origin.y.saturating_add(size.height),
        }
    }

    pub const fn width(&self) -> i32 { self.right.saturating_sub(self.left) }

    pub const fn height(&self) -> i32 { self.bottom.saturating_sub(self.top) }

    pub const fn origin(&self) -> Point { Point::new(self.left, self.top) }

    pub const fn size(&self) -> Size { Size::new(self.width(), self.height()) }

    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x < self.right && point.y >= self.top && point.y < self.bottom
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}@({},{})", self.width(), self.height(), self.left, self.top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_round_trip_through_origin_and_size() {
        let rect = Rect::from_origin_size(Point::new(-1920, 40), Size::new(1920, 1040));
        assert_eq!(rect, Rect::new(-1920, 40, 0, 1080));
        assert_eq!(rect.size(), Size::new(1920, 1040));
        assert_eq!(rect.origin(), Point::new(-1920, 40));
    }

    #[test]
    fn contains_excludes_far_edges() {
        let rect = Rect::new(0, 0, 100, 50);
        assert!(rect.contains(Point::new(0, 0)));
        assert!(rect.contains(Point::new(99, 49)));
        assert!(!rect.contains(Point::new(100, 10)));
        assert!(!rect.contains(Point::new(10, 50)));
    }

    #[test]
    fn edges_saturate_instead_of_overflowing() {
        let rect = Rect::from_origin_size(Point::new(i32::MAX - 100, 0), Size::new(800, 600));
        assert_eq!(rect.right, i32::MAX);
        assert_eq!(Rect::new(i32::MIN, 0, i32::MAX, 10).width(), i32::MAX);
    }
}
