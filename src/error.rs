//! Errors found throughout this crate

use crate::{geometry::Dimension, types::MonitorId};
use thiserror::Error;
use x11rb::errors::ConnectError;

/// Errors that occur while reflowing the layout or talking to the X-Server
#[derive(Debug, Error)]
pub(crate) enum Error {
    /// None of the hardware modes shared by the monitor's outputs is large
    /// enough
    #[error("monitor {monitor} has no mode of at least {size}")]
    NoEligibleMode { monitor: MonitorId, size: Dimension },

    /// The reflowed layout does not fit inside the screen
    #[error("layout needs {required} but the screen allows at most {max}")]
    BoundsExceeded { required: Dimension, max: Dimension },

    /// The layout was changed behind our back and must be enumerated again
    #[error("the monitor layout changed externally and must be re-enumerated")]
    Broken,

    /// Two controllers cover part of the same area without mirroring each
    /// other
    #[error("controller {0:#x} partially overlaps another controller")]
    PartialOverlap(u32),

    /// No monitor with the given index
    #[error("there is no monitor {0}")]
    UnknownMonitor(MonitorId),

    /// A request to the display server failed
    #[error("display server request failed: {0:#}")]
    Server(#[from] anyhow::Error),

    /// Failure to connect to the server
    #[error("failed to connect to the X11 server: {0}")]
    Connection(#[from] ConnectError),
}

impl Error {
    /// Can the failure be absorbed by marking the monitor out of sync?
    pub(crate) const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NoEligibleMode { .. } | Self::BoundsExceeded { .. } | Self::Broken
        )
    }
}
