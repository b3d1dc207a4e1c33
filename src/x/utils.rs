//! Various utilities specifically dealing with X

use crate::error::Error;
use x11rb::rust_connection::RustConnection;

// ============================= XUtility =============================

/// Wrapper to do basic X11 commands
pub(crate) struct XUtility;

impl XUtility {
    /// Setup the X11 [`Connection`](RustConnection).
    ///
    /// Returns the connection and the screen to work on: `screen` when given,
    /// otherwise the one named by the display
    pub(crate) fn setup_connection(
        screen: Option<usize>,
    ) -> Result<(RustConnection, usize), Error> {
        let (conn, preferred) = RustConnection::connect(None).map_err(Error::Connection)?;
        let screen = screen.unwrap_or(preferred);
        log::debug!("connected to the X-Server, using screen {}", screen);
        Ok((conn, screen))
    }
}
