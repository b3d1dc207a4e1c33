//! The hardware side of the layout: what the reflow reads from and commits to

use crate::{
    geometry::{Dimension, Point, Rectangle},
    types::{Crtc, CrtcHandle, DisplayMode, Mode, Output},
};
use anyhow::Result;
use std::cell::Cell;

// =========================== ScreenLayout ===========================
// ====================================================================

/// One controller as reported by the display server
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CrtcInfo {
    /// What is needed to drive the controller again
    pub(crate) handle:   CrtcHandle,
    /// Top-left corner inside the screen
    pub(crate) position: Point,
    /// Size of the scanned out area
    pub(crate) size:     Dimension,
    /// Current mode, [`NO_MODE`](crate::types::NO_MODE) when disabled
    pub(crate) mode:     Mode,
}

impl CrtcInfo {
    /// The area scanned out by the controller
    pub(crate) const fn area(&self) -> Rectangle {
        Rectangle::from_parts(self.position, self.size)
    }
}

/// Snapshot of the screen and its controllers
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScreenLayout {
    /// Smallest screen size allowed
    pub(crate) min:     Dimension,
    /// Largest screen size allowed
    pub(crate) max:     Dimension,
    /// Current screen size in pixels
    pub(crate) size:    Dimension,
    /// Current screen size in millimeters
    pub(crate) size_mm: Dimension,
    /// Every controller, enabled or not
    pub(crate) crtcs:   Vec<CrtcInfo>,
}

// ========================== DisplayServer ===========================
// ====================================================================

/// Requests needed to read and rearrange the monitor layout
pub(crate) trait DisplayServer {
    /// Query the screen and every controller
    fn layout(&self) -> Result<ScreenLayout>;

    /// Modes supported by an output, in the order the server lists them
    fn output_modes(&self, output: Output) -> Result<Vec<DisplayMode>>;

    /// Stop a controller from scanning out
    fn disable_crtc(&self, crtc: Crtc) -> Result<()>;

    /// Drive a controller with `mode` at `position`
    fn configure_crtc(&self, crtc: &CrtcHandle, position: Point, mode: Mode) -> Result<()>;

    /// Resize the screen
    fn set_screen_size(&self, size: Dimension, size_mm: Dimension) -> Result<()>;

    /// Wait for the server to process every request sent so far, then
    /// consume the layout notifications that are queued. Returns how many were
    /// consumed
    fn drain_layout_events(&self) -> Result<usize>;
}

// ========================== ChangeTracker ===========================
// ====================================================================

/// Tells apart layout notifications caused by our own requests from the ones
/// caused by another client
#[derive(Debug, Default)]
pub(crate) struct ChangeTracker {
    depth: Cell<usize>,
}

impl ChangeTracker {
    /// Create a new [`ChangeTracker`]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Mark the start of a self-made change. The change ends when the returned
    /// guard is dropped
    pub(crate) fn enter(&self) -> ChangeRef<'_> {
        self.depth.set(self.depth.get() + 1);
        ChangeRef { tracker: self }
    }

    /// Is a self-made change in progress?
    pub(crate) fn is_self_change(&self) -> bool {
        self.depth.get() > 0
    }
}

/// Guard returned by [`ChangeTracker::enter`]
#[derive(Debug)]
pub(crate) struct ChangeRef<'a> {
    tracker: &'a ChangeTracker,
}

impl Drop for ChangeRef<'_> {
    fn drop(&mut self) {
        let depth = self.tracker.depth.get();
        debug_assert!(depth > 0);
        self.tracker.depth.set(depth.saturating_sub(1));
    }
}

// ============================ FakeServer ============================
// ====================================================================

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory [`DisplayServer`] recording every hardware call

    use super::{CrtcInfo, DisplayServer, ScreenLayout};
    use crate::{
        geometry::{Dimension, Point},
        types::{Crtc, CrtcHandle, DisplayMode, Mode, Output},
    };
    use anyhow::{anyhow, Result};
    use std::{
        cell::{Cell, RefCell},
        collections::HashMap,
    };

    /// A request sent to the [`FakeServer`]
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum Call {
        Disable(Crtc),
        Configure(Crtc, Point, Mode),
        ScreenSize(Dimension, Dimension),
        Drain,
    }

    #[derive(Debug)]
    pub(crate) struct FakeServer {
        pub(crate) layout:         ScreenLayout,
        pub(crate) modes:          HashMap<Output, Vec<DisplayMode>>,
        pub(crate) calls:          RefCell<Vec<Call>>,
        /// Notifications waiting to be drained
        pub(crate) pending:        Cell<usize>,
        pub(crate) fail_configure: Cell<bool>,
    }

    impl FakeServer {
        /// A screen allowing up to 8192x8192 with one controller per
        /// rectangle. Controller `n` has xid `0x40 + n` and drives output
        /// `0x80 + n`
        pub(crate) fn new(size: Dimension, crtcs: &[(Point, DisplayMode)]) -> Self {
            let crtcs = crtcs
                .iter()
                .enumerate()
                .map(|(n, (position, mode))| CrtcInfo {
                    handle:   CrtcHandle::new(0x40 + n as u32, vec![0x80 + n as u32], 1),
                    position: *position,
                    size:     mode.dimension(),
                    mode:     mode.id,
                })
                .collect();

            Self {
                layout:         ScreenLayout {
                    min: Dimension::new(320, 200),
                    max: Dimension::new(8192, 8192),
                    size,
                    size_mm: Dimension::new(size.width / 4, size.height / 4),
                    crtcs,
                },
                modes:          HashMap::new(),
                calls:          RefCell::new(Vec::new()),
                pending:        Cell::new(0),
                fail_configure: Cell::new(false),
            }
        }

        /// Give `output` a list of modes
        pub(crate) fn with_modes(mut self, output: Output, modes: &[DisplayMode]) -> Self {
            self.modes.insert(output, modes.to_vec());
            self
        }

        /// Drain the recorded calls
        pub(crate) fn take_calls(&self) -> Vec<Call> {
            self.calls.take()
        }

        fn record(&self, call: Call) {
            self.calls.borrow_mut().push(call);
        }

        fn notify(&self) {
            self.pending.set(self.pending.get() + 1);
        }
    }

    impl DisplayServer for FakeServer {
        fn layout(&self) -> Result<ScreenLayout> {
            Ok(self.layout.clone())
        }

        fn output_modes(&self, output: Output) -> Result<Vec<DisplayMode>> {
            Ok(self.modes.get(&output).cloned().unwrap_or_default())
        }

        fn disable_crtc(&self, crtc: Crtc) -> Result<()> {
            self.record(Call::Disable(crtc));
            self.notify();
            Ok(())
        }

        fn configure_crtc(&self, crtc: &CrtcHandle, position: Point, mode: Mode) -> Result<()> {
            if self.fail_configure.get() {
                return Err(anyhow!("BadMatch configuring crtc {:#x}", crtc.xid));
            }
            self.record(Call::Configure(crtc.xid, position, mode));
            self.notify();
            Ok(())
        }

        fn set_screen_size(&self, size: Dimension, size_mm: Dimension) -> Result<()> {
            self.record(Call::ScreenSize(size, size_mm));
            self.notify();
            Ok(())
        }

        fn drain_layout_events(&self) -> Result<usize> {
            self.record(Call::Drain);
            Ok(self.pending.replace(0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ChangeTracker;

    #[test]
    fn change_guards_nest() {
        let tracker = ChangeTracker::new();
        assert!(!tracker.is_self_change());
        {
            let _outer = tracker.enter();
            {
                let _inner = tracker.enter();
                assert!(tracker.is_self_change());
            }
            assert!(tracker.is_self_change());
        }
        assert!(!tracker.is_self_change());
    }

    #[test]
    fn change_guard_is_released_on_early_return() {
        fn step() -> Result<(), ()> {
            Err(())
        }

        fn fails(tracker: &ChangeTracker) -> Result<(), ()> {
            let _change = tracker.enter();
            step()?;
            Ok(())
        }

        let tracker = ChangeTracker::new();
        assert!(fails(&tracker).is_err());
        assert!(!tracker.is_self_change());
    }
}
