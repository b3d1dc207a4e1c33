//! [`DisplayServer`] backed by the X11 RandR extension

use crate::{
    geometry::{Dimension, Point},
    rrflow_fatal,
    server::{CrtcInfo, DisplayServer, ScreenLayout},
    types::{Crtc, CrtcHandle, DisplayMode, Mode, Output, NO_MODE},
};
use anyhow::{anyhow, Context, Result};
use std::{cell::Cell, collections::HashMap};
use x11rb::{
    connection::{Connection, RequestConnection},
    protocol::{
        randr::{self, ConnectionExt as _, GetScreenResourcesCurrentReply, NotifyMask, SetConfig},
        xproto::{self, ChangeWindowAttributesAux, ConnectionExt as _, EventMask},
        Event,
    },
    rust_connection::RustConnection,
    wrapper::ConnectionExt as _,
    CURRENT_TIME,
};

/// Rotation used for controllers that are switched off
const ROTATE_0: u16 = 1;

/// Connection to the X-Server, talking RandR on one screen
pub(crate) struct RandrServer {
    /// The actual [`Connection`](RustConnection)
    conn:        RustConnection,
    /// The screen number
    screen:      usize,
    /// Root window of the screen
    root:        xproto::Window,
    /// Configuration timestamp of the last resources queried
    config_time: Cell<xproto::Timestamp>,
}

impl RandrServer {
    /// Create a new [`RandrServer`] and subscribe to layout notifications
    pub(crate) fn new(conn: RustConnection, screen: usize) -> Result<Self> {
        log::trace!("creating a new `RandrServer` on screen {}", screen);
        Self::check_extension(&conn).context("failed to query extensions")?;

        let root = conn
            .setup()
            .roots
            .get(screen)
            .ok_or_else(|| anyhow!("screen {} does not exist", screen))?
            .root;

        conn.randr_select_input(
            root,
            NotifyMask::OUTPUT_CHANGE | NotifyMask::CRTC_CHANGE | NotifyMask::SCREEN_CHANGE,
        )
        .context("failed to select randr input")?
        .check()
        .context("failed to check randr::select_input")?;

        conn.change_window_attributes(
            root,
            &ChangeWindowAttributesAux::new().event_mask(EventMask::STRUCTURE_NOTIFY),
        )
        .context("failed to select root window events")?
        .check()
        .context("failed to check selecting root window events")?;

        Ok(Self {
            conn,
            screen,
            root,
            config_time: Cell::new(CURRENT_TIME),
        })
    }

    /// Check that RandR is installed and that its version is up to date
    fn check_extension(conn: &RustConnection) -> Result<()> {
        log::debug!("checking that extensions are installed");
        if conn.extension_information(randr::X11_EXTENSION_NAME)?.is_none() {
            rrflow_fatal!(
                "{} X11 extension is unsupported",
                randr::X11_EXTENSION_NAME.green().bold()
            );
        }

        let (min, max) = randr::X11_XML_VERSION;
        if let Err(e) = conn.randr_query_version(min, max) {
            rrflow_fatal!(
                "`randr` version is unsupported. Supported versions: {}-{}: {}",
                min,
                max,
                e
            );
        };
        log::debug!("`randr` extension is up to date: {}-{}", min, max);

        Ok(())
    }

    /// Query the screen resources, remembering their configuration timestamp
    fn resources(&self) -> Result<GetScreenResourcesCurrentReply> {
        let resources = self
            .conn
            .randr_get_screen_resources_current(self.root)
            .context("failed to get screen resources")?
            .reply()
            .context("failed to get screen resources reply")?;

        self.config_time.set(resources.config_timestamp);
        Ok(resources)
    }

    /// Check the status of a `SetCrtcConfig` reply
    fn check_status<S: Into<u8>>(crtc: Crtc, status: S) -> Result<()> {
        let status = status.into();
        if status == u8::from(SetConfig::SUCCESS) {
            Ok(())
        } else {
            Err(anyhow!(
                "configuring controller {:#x} failed with status {}",
                crtc,
                status
            ))
        }
    }
}

impl DisplayServer for RandrServer {
    fn layout(&self) -> Result<ScreenLayout> {
        log::debug!("requesting the screen layout");
        let resources = self.resources()?;

        let range = self
            .conn
            .randr_get_screen_size_range(self.root)
            .context("failed to get screen size range")?
            .reply()
            .context("failed to get screen size range reply")?;

        let screen = &self.conn.setup().roots[self.screen];

        let crtcs = resources
            .crtcs
            .iter()
            .map(|&crtc| -> Result<CrtcInfo> {
                let info = self
                    .conn
                    .randr_get_crtc_info(crtc, resources.config_timestamp)
                    .context("failed to get crtc info")?
                    .reply()
                    .with_context(|| format!("failed to get info of crtc {:#x}", crtc))?;

                Ok(CrtcInfo {
                    handle:   CrtcHandle::new(crtc, info.outputs, u16::from(info.rotation)),
                    position: Point::new(info.x.into(), info.y.into()),
                    size:     Dimension::new(info.width.into(), info.height.into()),
                    mode:     info.mode,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ScreenLayout {
            min: Dimension::new(range.min_width.into(), range.min_height.into()),
            max: Dimension::new(range.max_width.into(), range.max_height.into()),
            size: Dimension::new(
                screen.width_in_pixels.into(),
                screen.height_in_pixels.into(),
            ),
            size_mm: Dimension::new(
                screen.width_in_millimeters.into(),
                screen.height_in_millimeters.into(),
            ),
            crtcs,
        })
    }

    fn output_modes(&self, output: Output) -> Result<Vec<DisplayMode>> {
        let resources = self.resources()?;
        let info = self
            .conn
            .randr_get_output_info(output, resources.config_timestamp)
            .context("failed to get output info")?
            .reply()
            .with_context(|| format!("failed to get info of output {:#x}", output))?;

        let known = resources
            .modes
            .iter()
            .map(|m| (m.id, DisplayMode::new(m.id, m.width.into(), m.height.into())))
            .collect::<HashMap<Mode, DisplayMode>>();

        Ok(info
            .modes
            .iter()
            .filter_map(|id| known.get(id).copied())
            .collect())
    }

    fn disable_crtc(&self, crtc: Crtc) -> Result<()> {
        log::trace!("disabling crtc {:#x}", crtc);
        let reply = self
            .conn
            .randr_set_crtc_config(
                crtc,
                CURRENT_TIME,
                self.config_time.get(),
                0,
                0,
                NO_MODE,
                ROTATE_0,
                &[],
            )
            .context("failed to disable crtc")?
            .reply()
            .with_context(|| format!("failed to disable crtc {:#x}", crtc))?;

        Self::check_status(crtc, reply.status)
    }

    fn configure_crtc(&self, crtc: &CrtcHandle, position: Point, mode: Mode) -> Result<()> {
        log::trace!("configuring crtc {:#x} at {}", crtc.xid, position);
        let x = i16::try_from(position.x).context("crtc position out of range")?;
        let y = i16::try_from(position.y).context("crtc position out of range")?;

        let reply = self
            .conn
            .randr_set_crtc_config(
                crtc.xid,
                CURRENT_TIME,
                self.config_time.get(),
                x,
                y,
                mode,
                crtc.rotation,
                &crtc.outputs,
            )
            .context("failed to configure crtc")?
            .reply()
            .with_context(|| format!("failed to configure crtc {:#x}", crtc.xid))?;

        Self::check_status(crtc.xid, reply.status)
    }

    fn set_screen_size(&self, size: Dimension, size_mm: Dimension) -> Result<()> {
        log::trace!("resizing the screen to {} ({} mm)", size, size_mm);
        let width = u16::try_from(size.width).context("screen width out of range")?;
        let height = u16::try_from(size.height).context("screen height out of range")?;

        self.conn
            .randr_set_screen_size(self.root, width, height, size_mm.width, size_mm.height)
            .context("failed to set screen size")?
            .check()
            .with_context(|| format!("failed to set screen size to {}", size))
    }

    fn drain_layout_events(&self) -> Result<usize> {
        self.conn
            .sync()
            .context("failed to sync events with the X-Server")?;

        let mut count = 0;
        while let Some(event) = self
            .conn
            .poll_for_event()
            .context("failed to poll for next event")?
        {
            match event {
                Event::ConfigureNotify(e) if e.window == self.root => count += 1,
                Event::RandrScreenChangeNotify(_) | Event::RandrNotify(_) => count += 1,
                other => log::trace!("skipping unrelated event: {:?}", other),
            }
        }

        log::debug!("drained {} layout notifications", count);
        Ok(count)
    }
}
