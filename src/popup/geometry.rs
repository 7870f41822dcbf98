// SPDX-License-Identifier: GPL-3.0-only

//! Screen-space geometry primitives.
//!
//! Coordinates are integer desktop pixels. A [`Rect`] covers the pixels from
//! `(x, y)` up to and including `(right(), bottom())`, so a point one pixel
//! past `right()` is outside.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A point on the desktop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Width and height of a window or screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Size {
    /// Creates a new size.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Returns `true` if both dimensions are non-negative.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.width >= 0 && self.height >= 0
    }
}

/// An axis-aligned rectangle for bounds calculations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// X coordinate of the top-left corner.
    pub x: i32,
    /// Y coordinate of the top-left corner.
    pub y: i32,
    /// Width of the rectangle.
    pub width: i32,
    /// Height of the rectangle.
    pub height: i32,
}

impl Rect {
    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn from_parts(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Returns the top-left corner.
    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Returns the size.
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Last column covered by the rectangle.
    #[must_use]
    pub fn right(&self) -> i32 {
        self.x + self.width - 1
    }

    /// Last row covered by the rectangle.
    #[must_use]
    pub fn bottom(&self) -> i32 {
        self.y + self.height - 1
    }

    /// Returns `true` if the point lies inside the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Returns the rectangle grown by `margin` pixels on every side.
    #[must_use]
    pub fn expanded(&self, margin: i32) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.width + 2 * margin,
            self.height + 2 * margin,
        )
    }

    /// Returns `true` if the rectangle covers no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Returns the rectangle moved so its top-left corner is at `origin`.
    #[must_use]
    pub fn moved_to(&self, origin: Point) -> Self {
        Self::from_parts(origin, self.size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_includes_edges() {
        let rect = Rect::new(100, 100, 50, 20);
        assert!(rect.contains(Point::new(100, 100)));
        assert!(rect.contains(Point::new(149, 119)));
        assert!(!rect.contains(Point::new(150, 119)));
        assert!(!rect.contains(Point::new(149, 120)));
        assert!(!rect.contains(Point::new(99, 110)));
    }

    #[test]
    fn test_expanded_grows_every_side() {
        let rect = Rect::new(100, 100, 50, 20).expanded(60);
        assert_eq!(rect, Rect::new(40, 40, 170, 140));
        assert!(rect.contains(Point::new(209, 110)));
        assert!(!rect.contains(Point::new(210, 110)));
    }

    #[test]
    fn test_zero_sized_rect_is_empty() {
        assert!(Rect::default().is_empty());
        assert!(Rect::new(10, 10, 0, 20).is_empty());
        assert!(!Rect::new(10, 10, 1, 1).is_empty());
    }

    #[test]
    fn test_point_arithmetic() {
        let delta = Point::new(15, 7) - Point::new(10, 10);
        assert_eq!(delta, Point::new(5, -3));
        assert_eq!(Point::new(1, 1) + delta, Point::new(6, -2));
    }

    #[test]
    fn test_size_validity() {
        assert!(Size::new(0, 0).is_valid());
        assert!(!Size::new(-1, 10).is_valid());
    }
}
