//! Working state of a monitor while a reflow is in progress

use crate::{geometry::Rectangle, types::MonitorId};

/// Number of levels a [`Transaction`] can hold: the committed area, the
/// horizontal pass and the vertical pass
pub(crate) const MAX_TRANS_DEPTH: usize = 3;

/// A stack of working rectangles, plus the bookkeeping the reflow algorithms
/// need while they run.
///
/// Level `0` always mirrors the committed area. Each later level starts as a
/// copy of the one before it, so the previous level tells where a monitor sat
/// before the current pass started moving things around.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Transaction {
    /// Working rectangles, one per level
    levels:    [Rectangle; MAX_TRANS_DEPTH],
    /// Index of the current level
    depth:     usize,
    /// Pinned monitors are not displaced again during the current pass
    pin_count: usize,
    /// The monitor that last displaced this one
    pusher:    Option<MonitorId>,
}

impl Transaction {
    /// Start over from `committed`. Everything left from an earlier
    /// transaction is discarded, however that one ended
    pub(crate) fn begin(&mut self, committed: Rectangle) {
        self.levels = [committed; MAX_TRANS_DEPTH];
        self.depth = 1;
        self.pin_count = 0;
        self.pusher = None;
    }

    /// Freeze the current level and start a new one from a copy of it
    pub(crate) fn advance(&mut self) {
        self.depth += 1;
        assert!(
            self.depth < MAX_TRANS_DEPTH,
            "transaction nested deeper than {} levels",
            MAX_TRANS_DEPTH
        );
        self.levels[self.depth] = self.levels[self.depth - 1];
        self.pin_count = 0;
        self.pusher = None;
    }

    /// The working rectangle of the current level
    pub(crate) const fn area(&self) -> &Rectangle {
        &self.levels[self.depth]
    }

    /// Mutable access to the working rectangle of the current level
    pub(crate) fn area_mut(&mut self) -> &mut Rectangle {
        &mut self.levels[self.depth]
    }

    /// The rectangle as it was when the current level started
    pub(crate) const fn prev_area(&self) -> &Rectangle {
        &self.levels[self.depth - 1]
    }

    /// Protect the monitor from further displacement
    pub(crate) fn pin(&mut self) {
        self.pin_count += 1;
    }

    /// Undo one [`pin`](Self::pin)
    #[allow(dead_code)]
    pub(crate) fn unpin(&mut self) {
        assert!(self.pin_count > 0, "unpinning a monitor that is not pinned");
        self.pin_count -= 1;
    }

    /// Is the monitor pinned?
    pub(crate) const fn is_pinned(&self) -> bool {
        self.pin_count > 0
    }

    /// Remember which monitor moved this one
    pub(crate) fn set_pusher(&mut self, pusher: MonitorId) {
        self.pusher = Some(pusher);
    }

    /// The monitor that last moved this one
    pub(crate) const fn pusher(&self) -> Option<MonitorId> {
        self.pusher
    }
}

#[cfg(test)]
mod tests {
    use super::Transaction;
    use crate::geometry::Rectangle;

    #[test]
    fn levels_snapshot_the_previous_pass() {
        let committed = Rectangle::new(0, 0, 1024, 768);
        let mut trans = Transaction::default();
        trans.begin(committed);
        assert_eq!(trans.area(), &committed);
        assert_eq!(trans.prev_area(), &committed);

        trans.area_mut().right += 200;
        trans.pin();
        trans.set_pusher(3);
        trans.advance();

        let widened = Rectangle::new(0, 0, 1224, 768);
        assert_eq!(trans.prev_area(), &widened);
        assert_eq!(trans.area(), &widened);
        assert!(!trans.is_pinned());
        assert_eq!(trans.pusher(), None);
    }

    #[test]
    fn begin_discards_a_stale_transaction() {
        let mut trans = Transaction::default();
        trans.begin(Rectangle::new(0, 0, 10, 10));
        trans.area_mut().offset(5, 5);
        trans.pin();
        trans.pin();
        trans.set_pusher(1);
        trans.advance();
        trans.area_mut().offset(5, 5);

        let committed = Rectangle::new(0, 0, 10, 10);
        trans.begin(committed);
        assert_eq!(trans.area(), &committed);
        assert_eq!(trans.prev_area(), &committed);
        assert!(!trans.is_pinned());
        assert_eq!(trans.pusher(), None);

        // A full pass is still available after restarting
        trans.advance();
        assert_eq!(trans.area(), &committed);
    }

    #[test]
    fn pins_nest() {
        let mut trans = Transaction::default();
        trans.begin(Rectangle::new(0, 0, 10, 10));
        trans.pin();
        trans.pin();
        trans.unpin();
        assert!(trans.is_pinned());
        trans.unpin();
        assert!(!trans.is_pinned());
    }

    #[test]
    #[should_panic(expected = "not pinned")]
    fn unpin_never_goes_negative() {
        let mut trans = Transaction::default();
        trans.begin(Rectangle::new(0, 0, 10, 10));
        trans.unpin();
    }

    #[test]
    #[should_panic(expected = "nested deeper")]
    fn only_two_passes_fit() {
        let mut trans = Transaction::default();
        trans.begin(Rectangle::new(0, 0, 10, 10));
        trans.advance();
        trans.advance();
    }
}
