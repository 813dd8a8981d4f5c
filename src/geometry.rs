//! Integer pixel geometry used throughout the fit pass.
//!
//! All rectangles are in global (top-level window) coordinates with the
//! origin at the top left. Spans are half-open: a widget occupying
//! `x..x+w` does not overlap one starting at `x+w`.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn cross(self) -> Orientation {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self { Point { x, y } }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self { Size { width, height } }

    pub fn along(self, axis: Orientation) -> i32 {
        match axis {
            Orientation::Horizontal => self.width,
            Orientation::Vertical => self.height,
        }
    }
}

/// Half-open `[lo, hi)` extent of a rectangle along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub lo: i32,
    pub hi: i32,
}

impl Span {
    pub fn new(lo: i32, hi: i32) -> Self {
        debug_assert!(lo <= hi, "inverted span {lo}..{hi}");
        Span { lo, hi }
    }

    pub fn len(self) -> i32 { self.hi - self.lo }

    /// True if the spans share more than a single boundary point.
    pub fn overlaps(self, other: Span) -> bool { self.lo < other.hi && other.lo < self.hi }

    /// True if `self` lies entirely before `other` (touching allowed).
    pub fn precedes(self, other: Span) -> bool { self.hi <= other.lo }

    /// True if `self` lies entirely after `other` (touching allowed).
    pub fn follows(self, other: Span) -> bool { self.lo >= other.hi }

    pub fn union(self, other: Span) -> Span {
        Span::new(self.lo.min(other.lo), self.hi.max(other.hi))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn left(self) -> i32 { self.origin.x }

    pub fn right(self) -> i32 { self.origin.x + self.size.width }

    pub fn top(self) -> i32 { self.origin.y }

    pub fn bottom(self) -> i32 { self.origin.y + self.size.height }

    pub fn span(self, axis: Orientation) -> Span {
        match axis {
            Orientation::Horizontal => Span::new(self.left(), self.right()),
            Orientation::Vertical => Span::new(self.top(), self.bottom()),
        }
    }

    /// True if the rectangles share interior area, not merely an edge.
    pub fn intersects(self, other: Rect) -> bool {
        self.span(Orientation::Horizontal).overlaps(other.span(Orientation::Horizontal))
            && self.span(Orientation::Vertical).overlaps(other.span(Orientation::Vertical))
    }

    /// Smallest rectangle covering both inputs.
    pub fn union(self, other: Rect) -> Rect {
        let h = self.span(Orientation::Horizontal).union(other.span(Orientation::Horizontal));
        let v = self.span(Orientation::Vertical).union(other.span(Orientation::Vertical));
        Rect::new(h.lo, v.lo, h.len(), v.len())
    }

    pub fn translated(self, dx: i32, dy: i32) -> Rect {
        Rect {
            origin: Point::new(self.origin.x + dx, self.origin.y + dy),
            size: self.size,
        }
    }

    /// Same origin, extent along `axis` replaced by `len`.
    pub fn with_len(self, axis: Orientation, len: i32) -> Rect {
        match axis {
            Orientation::Horizontal => Rect::new(self.left(), self.top(), len, self.size.height),
            Orientation::Vertical => Rect::new(self.left(), self.top(), self.size.width, len),
        }
    }

    /// Same size, leading edge along `axis` moved to `lo`.
    pub fn with_lo(self, axis: Orientation, lo: i32) -> Rect {
        match axis {
            Orientation::Horizontal => Rect::new(lo, self.top(), self.size.width, self.size.height),
            Orientation::Vertical => Rect::new(self.left(), lo, self.size.width, self.size.height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: i32, y: i32, w: i32, h: i32) -> Rect { Rect::new(x, y, w, h) }

    #[test]
    fn span_overlap_excludes_shared_edge() {
        assert!(!Span::new(0, 10).overlaps(Span::new(10, 20)));
        assert!(Span::new(0, 11).overlaps(Span::new(10, 20)));
        assert!(Span::new(5, 6).overlaps(Span::new(0, 20)));
    }

    #[test]
    fn span_ordering_predicates() {
        assert!(Span::new(0, 10).precedes(Span::new(10, 20)));
        assert!(!Span::new(0, 11).precedes(Span::new(10, 20)));
        assert!(Span::new(10, 20).follows(Span::new(0, 10)));
    }

    #[test]
    fn rect_union_covers_both() {
        let u = r(0, 0, 10, 10).union(r(20, 5, 10, 10));
        assert_eq!(u, r(0, 0, 30, 15));
    }

    #[test]
    fn rect_intersection_needs_area() {
        // Touching edges do not count as intersection.
        assert!(!r(0, 0, 10, 10).intersects(r(10, 0, 10, 10)));
        assert!(r(0, 0, 11, 10).intersects(r(10, 0, 10, 10)));
    }

    #[test]
    fn with_len_preserves_origin_and_cross_size() {
        let grown = r(3, 4, 50, 20).with_len(Orientation::Horizontal, 90);
        assert_eq!(grown, r(3, 4, 90, 20));
        let grown = r(3, 4, 50, 20).with_len(Orientation::Vertical, 35);
        assert_eq!(grown, r(3, 4, 50, 35));
    }

    #[test]
    fn orientation_cross() {
        assert_eq!(Orientation::Horizontal.cross(), Orientation::Vertical);
        assert_eq!(Orientation::Vertical.cross(), Orientation::Horizontal);
    }
}
