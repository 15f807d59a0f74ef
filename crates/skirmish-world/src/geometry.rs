//! World-space geometry: points, rectangles, and grid cells.
//!
//! All coordinates are in world units with the y axis pointing down the
//! screen, so "top" is the smaller y value.

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Float2
// ---------------------------------------------------------------------------

/// A 2D point or offset in world units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Float2 {
    pub x: f32,
    pub y: f32,
}

impl Float2 {
    pub const ZERO: Float2 = Float2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Linear interpolation from `a` towards `b`; `t = 0` yields `a`.
    #[inline]
    pub fn lerp(a: Float2, b: Float2, t: f32) -> Float2 {
        a + (b - a) * t
    }
}

impl Add for Float2 {
    type Output = Float2;

    #[inline]
    fn add(self, rhs: Float2) -> Float2 {
        Float2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Float2 {
    #[inline]
    fn add_assign(&mut self, rhs: Float2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Float2 {
    type Output = Float2;

    #[inline]
    fn sub(self, rhs: Float2) -> Float2 {
        Float2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Float2 {
    type Output = Float2;

    #[inline]
    fn mul(self, rhs: f32) -> Float2 {
        Float2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Float2 {
    type Output = Float2;

    #[inline]
    fn neg(self) -> Float2 {
        Float2::new(-self.x, -self.y)
    }
}

// ---------------------------------------------------------------------------
// Rect
// ---------------------------------------------------------------------------

/// Axis-aligned rectangle given by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle spanning two arbitrary corners. The result always
    /// has non-negative width and height.
    pub fn from_corners(a: Float2, b: Float2) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self::new(x, y, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    /// Rectangle of the given size centered on `center`.
    pub fn centered(center: Float2, size: Float2) -> Self {
        let half = size * 0.5;
        Self::new(center.x - half.x, center.y - half.y, size.x, size.y)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Whether the two rectangles overlap or touch.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() <= other.right()
            && other.left() <= self.right()
            && self.top() <= other.bottom()
            && other.top() <= self.bottom()
    }
}

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// A discrete grid cell used for pathing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// World position of the cell's center for a grid of `cell_size` units.
    pub fn center(self, cell_size: f32) -> Float2 {
        let half = cell_size / 2.0;
        Float2::new(
            self.x as f32 * cell_size + half,
            self.y as f32 * cell_size + half,
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = Float2::new(0.0, 10.0);
        let b = Float2::new(20.0, 10.0);
        assert_eq!(Float2::lerp(a, b, 0.0), a);
        assert_eq!(Float2::lerp(a, b, 1.0), b);
        assert_eq!(Float2::lerp(a, b, 0.25), Float2::new(5.0, 10.0));
    }

    #[test]
    fn rect_edges() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.right(), 110.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.bottom(), 70.0);
    }

    #[test]
    fn from_corners_normalizes_drag_direction() {
        let r = Rect::from_corners(Float2::new(50.0, 40.0), Float2::new(10.0, 0.0));
        assert_eq!(r, Rect::new(10.0, 0.0, 40.0, 40.0));
    }

    #[test]
    fn centered_rect_spans_half_size_each_way() {
        let r = Rect::centered(Float2::new(50.0, 50.0), Float2::new(20.0, 10.0));
        assert_eq!(r, Rect::new(40.0, 45.0, 20.0, 10.0));
    }

    #[test]
    fn intersects_includes_touching_edges() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(10.0, 10.0, 5.0, 5.0)));
        assert!(a.intersects(&Rect::new(2.0, 2.0, 1.0, 1.0)));
        assert!(!a.intersects(&Rect::new(10.5, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn cell_center_adds_half_cell() {
        assert_eq!(Cell::new(0, 0).center(24.0), Float2::new(12.0, 12.0));
        assert_eq!(Cell::new(2, 3).center(24.0), Float2::new(60.0, 84.0));
    }
}
