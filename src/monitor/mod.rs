//! Representation and interaction with the monitors making up the virtual
//! desktop

pub(crate) mod mode;
pub(crate) mod set;
pub(crate) mod transaction;

use crate::{
    geometry::{Dimension, Point, Rectangle},
    types::{CrtcId, DisplayMode, Mode, MonitorId},
};
use serde::Serialize;
use std::fmt;
use transaction::Transaction;

/// One rectangular region of the virtual desktop, scanned out by a controller
/// and possibly mirrored by other controllers (its clones)
#[derive(Debug, Clone, Serialize)]
pub(crate) struct Monitor {
    /// Position of the monitor in its [`MonitorSet`](set::MonitorSet)
    id:             MonitorId,
    /// The controller driving this monitor
    crtc:           CrtcId,
    /// Controllers mirroring this monitor
    clones:         Vec<CrtcId>,
    /// Committed top-left corner
    position:       Point,
    /// Committed size
    size:           Dimension,
    /// Committed mode
    mode:           Mode,
    /// Position found at enumeration
    saved_position: Point,
    /// Size found at enumeration
    saved_size:     Dimension,
    /// Mode found at enumeration
    saved_mode:     Mode,
    /// The last size request could not be honored
    out_of_sync:    bool,
    #[serde(skip)]
    transaction:    Transaction,
}

impl Monitor {
    /// Create a new [`Monitor`] as found on the display server
    pub(crate) fn new(
        id: MonitorId,
        crtc: CrtcId,
        position: Point,
        size: Dimension,
        mode: Mode,
    ) -> Self {
        Self {
            id,
            crtc,
            clones: Vec::new(),
            position,
            size,
            mode,
            saved_position: position,
            saved_size: size,
            saved_mode: mode,
            out_of_sync: false,
            transaction: Transaction::default(),
        }
    }

    // ========================= Accessor ========================= [[[

    /// Position of the monitor in its set
    pub(crate) const fn id(&self) -> MonitorId {
        self.id
    }

    /// The controller and its clones
    pub(crate) fn all_crtcs(&self) -> impl Iterator<Item = CrtcId> + '_ {
        std::iter::once(self.crtc).chain(self.clones.iter().copied())
    }

    /// Committed top-left corner
    pub(crate) const fn position(&self) -> Point {
        self.position
    }

    /// Committed size
    pub(crate) const fn size(&self) -> Dimension {
        self.size
    }

    /// Committed area
    pub(crate) const fn area(&self) -> Rectangle {
        Rectangle::from_parts(self.position, self.size)
    }

    /// Committed mode
    pub(crate) const fn mode(&self) -> Mode {
        self.mode
    }

    /// Size found at enumeration
    pub(crate) const fn saved_size(&self) -> Dimension {
        self.saved_size
    }

    /// Could the last size request not be honored?
    pub(crate) const fn is_out_of_sync(&self) -> bool {
        self.out_of_sync
    }

    /// Working state of the current reflow
    pub(crate) const fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    /// Mutable working state of the current reflow
    pub(crate) fn transaction_mut(&mut self) -> &mut Transaction {
        &mut self.transaction
    }

    // ]]] === Accessor ===

    /// Mirror this monitor on another controller
    pub(crate) fn add_clone(&mut self, crtc: CrtcId) {
        self.clones.push(crtc);
    }

    /// Mark whether the last size request was honored
    pub(crate) fn set_out_of_sync(&mut self, out_of_sync: bool) {
        self.out_of_sync = out_of_sync;
    }

    /// Has the mode changed since enumeration?
    pub(crate) fn mode_changed(&self) -> bool {
        self.size != self.saved_size || self.mode != self.saved_mode
    }

    /// Has the monitor moved since enumeration?
    pub(crate) fn position_changed(&self) -> bool {
        self.position != self.saved_position
    }

    /// Go back to the state found at enumeration
    pub(crate) fn revert(&mut self) {
        self.position = self.saved_position;
        self.size = self.saved_size;
        self.mode = self.saved_mode;
    }

    /// Switch to `mode`
    pub(crate) fn apply_mode(&mut self, mode: &DisplayMode) {
        self.mode = mode.id;
        self.size = mode.dimension();
    }

    // ======================== Transaction ======================= [[[

    /// Open a transaction starting from the committed area
    pub(crate) fn begin_transaction(&mut self) {
        self.transaction.begin(self.area());
    }

    /// Freeze the current pass and start the next one
    pub(crate) fn advance_transaction(&mut self) {
        self.transaction.advance();
    }

    /// Keep the position reached by the transaction
    pub(crate) fn commit_transaction(&mut self) {
        self.position = self.transaction.area().top_left();
    }

    // ]]] === Transaction ===
}

impl fmt::Display for Monitor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "monitor {} {}", self.id, self.area())
    }
}

#[cfg(test)]
mod tests {
    use super::Monitor;
    use crate::{
        geometry::{Dimension, Point, Rectangle},
        types::DisplayMode,
    };

    #[test]
    fn commit_keeps_the_working_position() {
        let mut monitor = Monitor::new(0, 0, Point::new(1024, 0), Dimension::new(1024, 768), 7);
        monitor.begin_transaction();
        monitor.transaction_mut().area_mut().offset(200, 0);
        monitor.advance_transaction();
        monitor.transaction_mut().area_mut().offset(0, 100);
        monitor.commit_transaction();

        assert_eq!(monitor.area(), Rectangle::new(1224, 100, 2248, 868));
        assert!(monitor.position_changed());
        assert!(!monitor.mode_changed());
    }

    #[test]
    fn revert_restores_enumerated_state() {
        let mut monitor = Monitor::new(0, 0, Point::new(0, 0), Dimension::new(1024, 768), 7);
        monitor.add_clone(3);
        monitor.apply_mode(&DisplayMode::new(9, 1280, 1024));
        assert!(monitor.mode_changed());
        assert_eq!(monitor.size(), Dimension::new(1280, 1024));

        monitor.revert();
        assert!(!monitor.mode_changed());
        assert_eq!(monitor.mode(), 7);
        assert_eq!(monitor.all_crtcs().collect::<Vec<_>>(), vec![0, 3]);
    }
}
