#![forbid(unsafe_code)]

//! Geometry in logical pixels.
//!
//! All coordinates are `f32` with the origin at the top-left of the viewport.
//! Widths and heights are never negative: constructors clamp them to zero.

/// A point in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(self, other: Self) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Create a size; negative or NaN components become zero.
    #[inline]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: non_negative(width),
            height: non_negative(height),
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a rectangle; negative or NaN extents become zero.
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: non_negative(width),
            height: non_negative(height),
        }
    }

    /// Rectangle at the origin covering `size`.
    #[inline]
    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    /// Rectangle with its top-left corner at `origin`.
    #[inline]
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    #[inline]
    pub fn right(self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    #[inline]
    pub fn origin(self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub fn center(self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Whether `point` lies inside the rectangle (right/bottom edges exclusive).
    #[inline]
    pub fn contains(self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Whether `other` lies entirely inside this rectangle (edges inclusive).
    pub fn contains_rect(self, other: Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Translate by `(dx, dy)`.
    #[inline]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

#[inline]
fn non_negative(value: f32) -> f32 {
    if value > 0.0 { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_extents_clamp_to_zero() {
        let rect = Rect::new(5.0, 5.0, -3.0, f32::NAN);
        assert_eq!(rect.width, 0.0);
        assert_eq!(rect.height, 0.0);
        assert!(rect.is_empty());
        assert_eq!(Size::new(-1.0, 2.0), Size::new(0.0, 2.0));
    }

    #[test]
    fn contains_is_right_bottom_exclusive() {
        let rect = Rect::new(10.0, 10.0, 20.0, 10.0);
        assert!(rect.contains(Point::new(10.0, 10.0)));
        assert!(rect.contains(Point::new(29.9, 19.9)));
        assert!(!rect.contains(Point::new(30.0, 15.0)));
        assert!(!rect.contains(Point::new(15.0, 20.0)));
    }

    #[test]
    fn contains_rect_edges_inclusive() {
        let outer = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert!(outer.contains_rect(Rect::new(0.0, 0.0, 100.0, 50.0)));
        assert!(outer.contains_rect(Rect::new(10.0, 10.0, 5.0, 5.0)));
        assert!(!outer.contains_rect(Rect::new(90.0, 0.0, 20.0, 5.0)));
    }

    #[test]
    fn center_and_edges() {
        let rect = Rect::new(2.0, 4.0, 10.0, 6.0);
        assert_eq!(rect.right(), 12.0);
        assert_eq!(rect.bottom(), 10.0);
        assert_eq!(rect.center(), Point::new(7.0, 7.0));
        assert_eq!(rect.offset(1.0, -1.0), Rect::new(3.0, 3.0, 10.0, 6.0));
    }

    #[test]
    fn point_distance() {
        assert_eq!(Point::ORIGIN.distance(Point::new(3.0, 4.0)), 5.0);
    }

    proptest::proptest! {
        #[test]
        fn rect_contains_itself(
            x in -500.0f32..500.0,
            y in -500.0f32..500.0,
            w in 0.0f32..500.0,
            h in 0.0f32..500.0,
        ) {
            let rect = Rect::new(x, y, w, h);
            proptest::prop_assert!(rect.contains_rect(rect));
        }

        #[test]
        fn offset_preserves_size(
            w in 0.0f32..500.0,
            h in 0.0f32..500.0,
            dx in -100.0f32..100.0,
            dy in -100.0f32..100.0,
        ) {
            let rect = Rect::new(0.0, 0.0, w, h);
            proptest::prop_assert_eq!(rect.offset(dx, dy).size(), rect.size());
        }
    }
}
