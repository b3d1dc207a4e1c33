//! Base types used throughout `rrflow`

use crate::geometry::Dimension;
use serde::Serialize;
use std::fmt;

// Re-export
pub(crate) use x11rb::protocol::randr::{Crtc, Mode, Output};

/// Index of a monitor inside its [`MonitorSet`](crate::monitor::set::MonitorSet)
pub(crate) type MonitorId = usize;
/// Index of a controller inside its [`MonitorSet`](crate::monitor::set::MonitorSet)
pub(crate) type CrtcId = usize;

/// Mode of a controller that is not scanning out anything
pub(crate) const NO_MODE: Mode = 0;

// =========================== DisplayMode ============================
// ====================================================================

/// A hardware mode an output can be driven at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub(crate) struct DisplayMode {
    /// The RandR identifier of the mode
    pub(crate) id:     Mode,
    /// Horizontal resolution
    pub(crate) width:  u32,
    /// Vertical resolution
    pub(crate) height: u32,
}

impl DisplayMode {
    /// Create a new [`DisplayMode`]
    pub(crate) const fn new(id: Mode, width: u32, height: u32) -> Self {
        Self { id, width, height }
    }

    /// Return the resolution of the mode
    pub(crate) const fn dimension(&self) -> Dimension {
        Dimension::new(self.width, self.height)
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{} ({:#x})", self.width, self.height, self.id)
    }
}

// =========================== CrtcHandle =============================
// ====================================================================

/// The hardware side of a controller: what is needed to switch it off and
/// back on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct CrtcHandle {
    /// The RandR identifier of the controller
    pub(crate) xid:      Crtc,
    /// Outputs driven by the controller
    pub(crate) outputs:  Vec<Output>,
    /// Rotation bits, passed back untouched when re-enabling
    pub(crate) rotation: u16,
}

impl CrtcHandle {
    /// Create a new [`CrtcHandle`]
    pub(crate) fn new(xid: Crtc, outputs: Vec<Output>, rotation: u16) -> Self {
        Self { xid, outputs, rotation }
    }
}
