//! The four directions a monitor can grow in.
//!
//! Each direction is a zero-sized type implementing [`Strategy`]. They are
//! mirror images of each other: the *head* is the edge leading the movement
//! and the *tail* is the edge trailing it. The reflow algorithms only ever
//! talk in terms of head and tail, so they are written once and instantiated
//! for each direction.

use crate::geometry::Rectangle;

/// Operations along the axis of one cardinal direction
pub(crate) trait Strategy {
    /// Name used in log messages
    const NAME: &'static str;

    /// The strip of `size` directly in front of `base`'s head
    fn area_in_front(base: &Rectangle, size: i32) -> Rectangle;

    /// How far `other` has to move to stop overlapping `fixed`
    fn push_distance(fixed: &Rectangle, other: &Rectangle) -> i32;

    /// Coordinate of the leading edge
    fn head(area: &Rectangle) -> i32;

    /// Coordinate of the trailing edge
    fn tail(area: &Rectangle) -> i32;

    /// Move the leading edge forward by `delta`
    fn move_head(area: &mut Rectangle, delta: i32);

    /// Gap between `other`'s edge facing `fixed`'s tail and that tail.
    /// Negative means they overlap
    fn pull_distance(fixed: &Rectangle, other: &Rectangle) -> i32;

    /// Translate the whole area forward by `delta`
    fn offset(area: &mut Rectangle, delta: i32);

    /// Pull the trailing edge toward the head by `delta`
    fn shrink(area: &mut Rectangle, delta: i32);

    /// How far behind `area`'s head the head of `other` is
    fn distance(area: &Rectangle, other: &Rectangle) -> i32;

    /// Does `other` touch `area`'s tail, with some overlap across the axis?
    fn is_tail_adjacent(area: &Rectangle, other: &Rectangle) -> bool;

    /// Does `other` touch one of `area`'s sides, with some overlap along the
    /// axis?
    fn is_side_adjacent(area: &Rectangle, other: &Rectangle) -> bool;

    /// Sort key putting the area nearest to the start of the movement first
    fn proximity(area: &Rectangle) -> i32;
}

/// Sides are the top and bottom edges when moving horizontally
const fn touches_horizontal_sides(area: &Rectangle, other: &Rectangle) -> bool {
    (other.bottom == area.top || other.top == area.bottom)
        && other.left < area.right
        && other.right > area.left
}

/// Sides are the left and right edges when moving vertically
const fn touches_vertical_sides(area: &Rectangle, other: &Rectangle) -> bool {
    (other.right == area.left || other.left == area.right)
        && other.top < area.bottom
        && other.bottom > area.top
}

// ============================= Leftward =============================

/// Growth toward smaller `x`
#[derive(Debug, Clone, Copy)]
pub(crate) struct Leftward;

impl Strategy for Leftward {
    const NAME: &'static str = "left";

    fn area_in_front(base: &Rectangle, size: i32) -> Rectangle {
        Rectangle::new(base.left - size, base.top, base.left, base.bottom)
    }

    fn push_distance(fixed: &Rectangle, other: &Rectangle) -> i32 {
        other.right - fixed.left
    }

    fn head(area: &Rectangle) -> i32 {
        area.left
    }

    fn tail(area: &Rectangle) -> i32 {
        area.right
    }

    fn move_head(area: &mut Rectangle, delta: i32) {
        area.left -= delta;
        debug_assert!(area.right >= area.left, "inverted area {:?}", area);
    }

    fn pull_distance(fixed: &Rectangle, other: &Rectangle) -> i32 {
        other.left - fixed.right
    }

    fn offset(area: &mut Rectangle, delta: i32) {
        area.offset(-delta, 0);
    }

    fn shrink(area: &mut Rectangle, delta: i32) {
        area.right -= delta;
        debug_assert!(area.right > area.left, "collapsed area {:?}", area);
    }

    fn distance(area: &Rectangle, other: &Rectangle) -> i32 {
        other.left - area.left
    }

    fn is_tail_adjacent(area: &Rectangle, other: &Rectangle) -> bool {
        area.right == other.left && other.top < area.bottom && other.bottom > area.top
    }

    fn is_side_adjacent(area: &Rectangle, other: &Rectangle) -> bool {
        touches_horizontal_sides(area, other)
    }

    fn proximity(area: &Rectangle) -> i32 {
        -area.right
    }
}

// ============================= Rightward ============================

/// Growth toward larger `x`
#[derive(Debug, Clone, Copy)]
pub(crate) struct Rightward;

impl Strategy for Rightward {
    const NAME: &'static str = "right";

    fn area_in_front(base: &Rectangle, size: i32) -> Rectangle {
        Rectangle::new(base.right, base.top, base.right + size, base.bottom)
    }

    fn push_distance(fixed: &Rectangle, other: &Rectangle) -> i32 {
        fixed.right - other.left
    }

    fn head(area: &Rectangle) -> i32 {
        area.right
    }

    fn tail(area: &Rectangle) -> i32 {
        area.left
    }

    fn move_head(area: &mut Rectangle, delta: i32) {
        area.right += delta;
        debug_assert!(area.right >= area.left, "inverted area {:?}", area);
    }

    fn pull_distance(fixed: &Rectangle, other: &Rectangle) -> i32 {
        fixed.left - other.right
    }

    fn offset(area: &mut Rectangle, delta: i32) {
        area.offset(delta, 0);
    }

    fn shrink(area: &mut Rectangle, delta: i32) {
        area.left += delta;
        debug_assert!(area.right > area.left, "collapsed area {:?}", area);
    }

    fn distance(area: &Rectangle, other: &Rectangle) -> i32 {
        area.right - other.right
    }

    fn is_tail_adjacent(area: &Rectangle, other: &Rectangle) -> bool {
        other.right == area.left && other.top < area.bottom && other.bottom > area.top
    }

    fn is_side_adjacent(area: &Rectangle, other: &Rectangle) -> bool {
        touches_horizontal_sides(area, other)
    }

    fn proximity(area: &Rectangle) -> i32 {
        area.left
    }
}

// ============================== Upward ==============================

/// Growth toward smaller `y`
#[derive(Debug, Clone, Copy)]
pub(crate) struct Upward;

impl Strategy for Upward {
    const NAME: &'static str = "up";

    fn area_in_front(base: &Rectangle, size: i32) -> Rectangle {
        Rectangle::new(base.left, base.top - size, base.right, base.top)
    }

    fn push_distance(fixed: &Rectangle, other: &Rectangle) -> i32 {
        other.bottom - fixed.top
    }

    fn head(area: &Rectangle) -> i32 {
        area.top
    }

    fn tail(area: &Rectangle) -> i32 {
        area.bottom
    }

    fn move_head(area: &mut Rectangle, delta: i32) {
        area.top -= delta;
        debug_assert!(area.bottom >= area.top, "inverted area {:?}", area);
    }

    fn pull_distance(fixed: &Rectangle, other: &Rectangle) -> i32 {
        other.top - fixed.bottom
    }

    fn offset(area: &mut Rectangle, delta: i32) {
        area.offset(0, -delta);
    }

    fn shrink(area: &mut Rectangle, delta: i32) {
        area.bottom -= delta;
        debug_assert!(area.bottom > area.top, "collapsed area {:?}", area);
    }

    fn distance(area: &Rectangle, other: &Rectangle) -> i32 {
        other.top - area.top
    }

    fn is_tail_adjacent(area: &Rectangle, other: &Rectangle) -> bool {
        area.bottom == other.top && other.left < area.right && other.right > area.left
    }

    fn is_side_adjacent(area: &Rectangle, other: &Rectangle) -> bool {
        touches_vertical_sides(area, other)
    }

    fn proximity(area: &Rectangle) -> i32 {
        -area.bottom
    }
}

// ============================= Downward =============================

/// Growth toward larger `y`
#[derive(Debug, Clone, Copy)]
pub(crate) struct Downward;

impl Strategy for Downward {
    const NAME: &'static str = "down";

    fn area_in_front(base: &Rectangle, size: i32) -> Rectangle {
        Rectangle::new(base.left, base.bottom, base.right, base.bottom + size)
    }

    fn push_distance(fixed: &Rectangle, other: &Rectangle) -> i32 {
        fixed.bottom - other.top
    }

    fn head(area: &Rectangle) -> i32 {
        area.bottom
    }

    fn tail(area: &Rectangle) -> i32 {
        area.top
    }

    fn move_head(area: &mut Rectangle, delta: i32) {
        area.bottom += delta;
        debug_assert!(area.bottom >= area.top, "inverted area {:?}", area);
    }

    fn pull_distance(fixed: &Rectangle, other: &Rectangle) -> i32 {
        fixed.top - other.bottom
    }

    fn offset(area: &mut Rectangle, delta: i32) {
        area.offset(0, delta);
    }

    fn shrink(area: &mut Rectangle, delta: i32) {
        area.top += delta;
        debug_assert!(area.bottom > area.top, "collapsed area {:?}", area);
    }

    fn distance(area: &Rectangle, other: &Rectangle) -> i32 {
        area.bottom - other.bottom
    }

    fn is_tail_adjacent(area: &Rectangle, other: &Rectangle) -> bool {
        other.bottom == area.top && other.left < area.right && other.right > area.left
    }

    fn is_side_adjacent(area: &Rectangle, other: &Rectangle) -> bool {
        touches_vertical_sides(area, other)
    }

    fn proximity(area: &Rectangle) -> i32 {
        area.top
    }
}

// ============================== Tests ===============================
// ====================================================================

#[cfg(test)]
mod tests {
    use super::{Downward, Leftward, Rightward, Strategy, Upward};
    use crate::geometry::Rectangle;

    const BASE: Rectangle = Rectangle::new(1024, 768, 2048, 1536);

    #[test]
    fn area_in_front_sits_on_the_head() {
        assert_eq!(
            Leftward::area_in_front(&BASE, 100),
            Rectangle::new(924, 768, 1024, 1536)
        );
        assert_eq!(
            Rightward::area_in_front(&BASE, 100),
            Rectangle::new(2048, 768, 2148, 1536)
        );
        assert_eq!(
            Upward::area_in_front(&BASE, 100),
            Rectangle::new(1024, 668, 2048, 768)
        );
        assert_eq!(
            Downward::area_in_front(&BASE, 100),
            Rectangle::new(1024, 1536, 2048, 1636)
        );
    }

    #[test]
    fn push_distance_clears_the_overlap() {
        let sweep = Rightward::area_in_front(&BASE, 200);
        let mut neighbor = Rectangle::new(2048, 768, 3072, 1536);
        let distance = Rightward::push_distance(&sweep, &neighbor);
        assert_eq!(distance, 200);

        Rightward::offset(&mut neighbor, distance);
        assert!(!sweep.intersects(&neighbor));
        assert_eq!(Rightward::tail(&neighbor), Rightward::head(&sweep));

        let sweep = Upward::area_in_front(&BASE, 50);
        let mut neighbor = Rectangle::new(1024, 0, 2048, 768);
        let distance = Upward::push_distance(&sweep, &neighbor);
        assert_eq!(distance, 50);
        Upward::offset(&mut neighbor, distance);
        assert_eq!(neighbor, Rectangle::new(1024, -50, 2048, 718));
    }

    #[test]
    fn head_and_tail_mirror_each_other() {
        assert_eq!((Leftward::head(&BASE), Leftward::tail(&BASE)), (1024, 2048));
        assert_eq!((Rightward::head(&BASE), Rightward::tail(&BASE)), (2048, 1024));
        assert_eq!((Upward::head(&BASE), Upward::tail(&BASE)), (768, 1536));
        assert_eq!((Downward::head(&BASE), Downward::tail(&BASE)), (1536, 768));
    }

    #[test]
    fn move_head_and_shrink_touch_opposite_edges() {
        let mut area = BASE;
        Leftward::move_head(&mut area, 24);
        assert_eq!(area, Rectangle::new(1000, 768, 2048, 1536));
        Leftward::shrink(&mut area, 48);
        assert_eq!(area, Rectangle::new(1000, 768, 2000, 1536));

        let mut area = BASE;
        Downward::move_head(&mut area, 32);
        assert_eq!(area, Rectangle::new(1024, 768, 2048, 1568));
        Downward::shrink(&mut area, 32);
        assert_eq!(area, Rectangle::new(1024, 800, 2048, 1568));
    }

    #[test]
    fn pull_distance_measures_the_gap_behind() {
        let fixed = Rectangle::new(1024, 0, 2048, 768);
        let follower = Rectangle::new(2148, 0, 3172, 768);
        assert_eq!(Leftward::pull_distance(&fixed, &follower), 100);

        let follower = Rectangle::new(0, 0, 924, 768);
        assert_eq!(Rightward::pull_distance(&fixed, &follower), 100);
    }

    #[test]
    fn tail_adjacency_needs_overlap_across_the_axis() {
        let area = Rectangle::new(0, 0, 1024, 768);
        let behind = Rectangle::new(1024, 0, 2048, 768);
        let diagonal = Rectangle::new(1024, 768, 2048, 1536);

        assert!(Leftward::is_tail_adjacent(&area, &behind));
        assert!(!Leftward::is_tail_adjacent(&area, &diagonal));
        assert!(Rightward::is_tail_adjacent(&behind, &area));
        assert!(!Rightward::is_tail_adjacent(&area, &behind));

        let below = Rectangle::new(0, 768, 1024, 1536);
        assert!(Upward::is_tail_adjacent(&area, &below));
        assert!(Downward::is_tail_adjacent(&below, &area));
    }

    #[test]
    fn side_adjacency_is_across_the_axis() {
        let area = Rectangle::new(0, 0, 1024, 768);
        let below = Rectangle::new(512, 768, 1536, 1536);
        let right = Rectangle::new(1024, 0, 2048, 768);

        assert!(Leftward::is_side_adjacent(&area, &below));
        assert!(Rightward::is_side_adjacent(&area, &below));
        assert!(!Leftward::is_side_adjacent(&area, &right));

        assert!(Upward::is_side_adjacent(&area, &right));
        assert!(Downward::is_side_adjacent(&area, &right));
        assert!(!Downward::is_side_adjacent(&area, &below));

        // Corners touching is not adjacency
        let corner = Rectangle::new(1024, 768, 2048, 1536);
        assert!(!Leftward::is_side_adjacent(&area, &corner));
        assert!(!Upward::is_side_adjacent(&area, &corner));
    }

    #[test]
    fn distance_and_proximity() {
        let area = Rectangle::new(0, 0, 1024, 768);
        let below = Rectangle::new(500, 768, 1524, 1536);
        assert_eq!(Leftward::distance(&area, &below), 500);
        assert_eq!(Rightward::distance(&area, &below), -500);

        let mut rects = vec![
            Rectangle::new(2048, 0, 3072, 768),
            Rectangle::new(0, 0, 1024, 768),
            Rectangle::new(1024, 0, 2048, 768),
        ];
        rects.sort_by_key(Rightward::proximity);
        assert_eq!(rects[0].left, 0);
        rects.sort_by_key(Leftward::proximity);
        assert_eq!(rects[0].left, 2048);
    }
}
