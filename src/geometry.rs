//! Structures used to map areas of the virtual desktop

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================== Point ==============================
// ====================================================================

/// A position on the virtual desktop. When this is used with a
/// [`Rectangle`], it represents the top-left corner
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub(crate) struct Point {
    /// X-coordinate
    pub(crate) x: i32,
    /// Y-coordinate
    pub(crate) y: i32,
}

impl Point {
    /// Create a new [`Point`]
    pub(crate) const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Check if [`Point`] is `(0, 0)`
    pub(crate) const fn is_zero(self) -> bool {
        self.x == 0_i32 && self.y == 0_i32
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "+{}+{}", self.x, self.y)
    }
}

// ============================= Dimension ===========================
// ====================================================================

/// A `width` and a `height`
#[derive(
    Debug, Default, Copy, Clone, PartialOrd, Ord, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub(crate) struct Dimension {
    /// The width of the [`Rectangle`]
    pub(crate) width:  u32,
    /// The height of the [`Rectangle`]
    pub(crate) height: u32,
}

impl Dimension {
    /// Create a new [`Dimension`]
    pub(crate) const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Return the area covered by the [`Dimension`]
    pub(crate) const fn area(self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Does this [`Dimension`] fit inside `other` on both axes?
    pub(crate) const fn fits_within(self, other: Self) -> bool {
        self.width <= other.width && self.height <= other.height
    }

    /// Grow each axis up to the matching axis of `other`
    pub(crate) fn at_least(self, other: Self) -> Self {
        Self {
            width:  self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }

    /// Scale each axis by the ratio `to / from`, as a physical size follows
    /// the pixel size of the screen
    pub(crate) fn scaled(self, from: Self, to: Self) -> Self {
        let scale = |value: u32, from: u32, to: u32| -> u32 {
            if from == 0 {
                return value;
            }
            (f64::from(value) / f64::from(from) * f64::from(to)) as u32
        };

        Self {
            width:  scale(self.width, from.width, to.width),
            height: scale(self.height, from.height, to.height),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// ============================= Rectangle ============================
// ====================================================================

/// An axis-aligned area described by its four edges. The `right` and `bottom`
/// edges are exclusive, so two rectangles sharing an edge coordinate touch
/// without overlapping
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub(crate) struct Rectangle {
    /// The left edge
    pub(crate) left:   i32,
    /// The top edge
    pub(crate) top:    i32,
    /// The right edge
    pub(crate) right:  i32,
    /// The bottom edge
    pub(crate) bottom: i32,
}

impl Rectangle {
    /// Create a new [`Rectangle`] from its edges
    pub(crate) const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Create a [`Rectangle`] from its top-left corner and its size
    pub(crate) const fn from_parts(point: Point, dimension: Dimension) -> Self {
        Self {
            left:   point.x,
            top:    point.y,
            right:  point.x + dimension.width as i32,
            bottom: point.y + dimension.height as i32,
        }
    }

    /// Return the top-left [`Point`]
    pub(crate) const fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Return the width and height
    pub(crate) const fn dimension(&self) -> Dimension {
        Dimension::new(self.width(), self.height())
    }

    /// Return the width
    pub(crate) const fn width(&self) -> u32 {
        (self.right - self.left) as u32
    }

    /// Return the height
    pub(crate) const fn height(&self) -> u32 {
        (self.bottom - self.top) as u32
    }

    /// Check if the [`Rectangle`] covers no area
    pub(crate) const fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    /// Test whether two [`Rectangle`]s share any area. Rectangles that only
    /// touch along an edge do not intersect, and an empty one intersects
    /// nothing
    pub(crate) const fn intersects(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    /// Translate the [`Rectangle`] by `dx` and `dy`
    pub(crate) fn offset(&mut self, dx: i32, dy: i32) {
        self.left += dx;
        self.right += dx;
        self.top += dy;
        self.bottom += dy;
    }

    /// Return the smallest [`Rectangle`] covering both
    pub(crate) fn union(&self, other: &Self) -> Self {
        Self {
            left:   self.left.min(other.left),
            top:    self.top.min(other.top),
            right:  self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Return the bounding box of every [`Rectangle`] given, or `None` when
    /// there are none
    pub(crate) fn bounding<I>(rects: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        rects.into_iter().reduce(|acc, rect| acc.union(&rect))
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.dimension(), self.top_left())
    }
}

// ============================== Tests ===============================
// ====================================================================

#[cfg(test)]
mod tests {
    use super::{Dimension, Point, Rectangle};

    #[test]
    fn touching_rectangles_do_not_intersect() {
        let left = Rectangle::new(0, 0, 1024, 768);
        let right = Rectangle::new(1024, 0, 2048, 768);
        assert!(!left.intersects(&right));
        assert!(!right.intersects(&left));

        let overlapping = Rectangle::new(1000, 700, 1100, 800);
        assert!(left.intersects(&overlapping));
        assert!(right.intersects(&overlapping));
    }

    #[test]
    fn empty_rectangle_intersects_nothing() {
        let area = Rectangle::new(0, 0, 1024, 768);
        let sliver = Rectangle::new(512, 0, 512, 768);
        assert!(sliver.is_empty());
        assert!(!area.intersects(&sliver));
        assert!(!sliver.intersects(&area));

        let flat = Rectangle::new(0, 300, 1024, 300);
        assert!(!flat.intersects(&area));
    }

    #[test]
    fn parts_round_trip() {
        let rect = Rectangle::from_parts(Point::new(1024, 0), Dimension::new(1280, 1024));
        assert_eq!(rect, Rectangle::new(1024, 0, 2304, 1024));
        assert_eq!(rect.top_left(), Point::new(1024, 0));
        assert_eq!(rect.dimension(), Dimension::new(1280, 1024));
        assert_eq!(rect.to_string(), "1280x1024+1024+0");
    }

    #[test]
    fn offset_moves_every_edge() {
        let mut monitor = Rectangle::new(2048, 0, 3072, 768);
        monitor.offset(200, -10);
        assert_eq!(monitor, Rectangle::new(2248, -10, 3272, 758));
        assert_eq!(monitor.dimension(), Dimension::new(1024, 768));
    }

    #[test]
    fn bounding_box_of_layout() {
        let rects = vec![
            Rectangle::new(0, 0, 1024, 768),
            Rectangle::new(1024, 0, 2304, 1024),
            Rectangle::new(0, 768, 1024, 1536),
        ];
        assert_eq!(
            Rectangle::bounding(rects),
            Some(Rectangle::new(0, 0, 2304, 1536))
        );
        assert_eq!(Rectangle::bounding(Vec::new()), None);
    }

    #[test]
    fn physical_size_follows_pixel_size() {
        let mm = Dimension::new(512, 256);
        let scaled = mm.scaled(Dimension::new(1024, 1024), Dimension::new(2048, 1024));
        assert_eq!(scaled, Dimension::new(1024, 256));
        assert!(Dimension::new(800, 600).fits_within(Dimension::new(800, 600)));
        assert_eq!(
            Dimension::new(640, 480).at_least(Dimension::new(320, 600)),
            Dimension::new(640, 600)
        );
    }
}
