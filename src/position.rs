//! Two-dimensional value types used throughout slot positioning.

use std::ops::{Add, AddAssign, Mul, Sub};

use bytemuck::{Pod, Zeroable};
use peniko::kurbo;

/// A point or offset in glyph or device space.
///
/// `#[repr(C)]` so an array of resolved positions can be viewed as a flat
/// `[f32]` via [`bytemuck::cast_slice`].
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    /// The origin.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Position {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Position {
    type Output = Self;

    #[inline]
    fn mul(self, m: f32) -> Self {
        Self::new(self.x * m, self.y * m)
    }
}

impl AddAssign for Position {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl From<Position> for kurbo::Vec2 {
    #[inline]
    fn from(p: Position) -> Self {
        Self::new(f64::from(p.x), f64::from(p.y))
    }
}

impl From<Position> for kurbo::Point {
    #[inline]
    fn from(p: Position) -> Self {
        Self::new(f64::from(p.x), f64::from(p.y))
    }
}

/// Axis-aligned box given by its bottom-left and top-right corners.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub bl: Position,
    pub tr: Position,
}

impl Rect {
    /// Zero-size box at the origin.
    pub const ZERO: Self = Self::new(Position::ZERO, Position::ZERO);

    /// Inverted box: widening it by any box yields that box.
    pub const EMPTY: Self = Self::new(
        Position::new(f32::INFINITY, f32::INFINITY),
        Position::new(f32::NEG_INFINITY, f32::NEG_INFINITY),
    );

    #[inline]
    pub const fn new(bl: Position, tr: Position) -> Self {
        Self { bl, tr }
    }

    /// Smallest box covering both `self` and `other`.
    #[inline]
    pub fn widen(&self, other: &Self) -> Self {
        Self::new(
            Position::new(self.bl.x.min(other.bl.x), self.bl.y.min(other.bl.y)),
            Position::new(self.tr.x.max(other.tr.x), self.tr.y.max(other.tr.y)),
        )
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.tr.x - self.bl.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.tr.y - self.bl.y
    }

    /// True while nothing has widened an [`Rect::EMPTY`] box.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bl.x > self.tr.x || self.bl.y > self.tr.y
    }
}

impl Mul<f32> for Rect {
    type Output = Self;

    #[inline]
    fn mul(self, m: f32) -> Self {
        Self::new(self.bl * m, self.tr * m)
    }
}

impl Add<Position> for Rect {
    type Output = Self;

    #[inline]
    fn add(self, offset: Position) -> Self {
        Self::new(self.bl + offset, self.tr + offset)
    }
}

impl From<Rect> for kurbo::Rect {
    /// Kurbo boxes are y-down; the glyph box keeps its numeric corners.
    fn from(r: Rect) -> Self {
        Self::new(
            f64::from(r.bl.x),
            f64::from(r.bl.y),
            f64::from(r.tr.x),
            f64::from(r.tr.y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic() {
        let a = Position::new(3.0, 4.0);
        let b = Position::new(1.0, -2.0);
        assert_eq!(a + b, Position::new(4.0, 2.0));
        assert_eq!(a - b, Position::new(2.0, 6.0));
        assert_eq!(a * 0.5, Position::new(1.5, 2.0));

        let mut c = a;
        c += b;
        assert_eq!(c, a + b);
    }

    #[test]
    fn widen_from_empty_takes_other() {
        let r = Rect::new(Position::new(-1.0, 0.0), Position::new(5.0, 7.0));
        assert!(Rect::EMPTY.is_empty());
        assert_eq!(Rect::EMPTY.widen(&r), r);
    }

    #[test]
    fn widen_covers_both() {
        let a = Rect::new(Position::new(0.0, 0.0), Position::new(10.0, 10.0));
        let b = Rect::new(Position::new(-5.0, 2.0), Position::new(4.0, 20.0));
        let w = a.widen(&b);
        assert_eq!(w.bl, Position::new(-5.0, 0.0));
        assert_eq!(w.tr, Position::new(10.0, 20.0));
        assert_eq!(w.width(), 15.0);
        assert_eq!(w.height(), 20.0);
    }

    #[test]
    fn scale_then_translate() {
        let r = Rect::new(Position::new(1.0, 2.0), Position::new(3.0, 4.0));
        let moved = r * 2.0 + Position::new(10.0, 0.0);
        assert_eq!(moved.bl, Position::new(12.0, 4.0));
        assert_eq!(moved.tr, Position::new(16.0, 8.0));
    }

    #[test]
    fn flat_view_and_kurbo() {
        let pts = [Position::new(1.0, 2.0), Position::new(3.0, 4.0)];
        let flat: &[f32] = bytemuck::cast_slice(&pts);
        assert_eq!(flat, &[1.0, 2.0, 3.0, 4.0]);

        let v: kurbo::Vec2 = pts[1].into();
        assert_eq!(v, kurbo::Vec2::new(3.0, 4.0));
    }
}
