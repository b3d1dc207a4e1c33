//! The set of monitors tiling the screen, and the operations keeping it tiled
//! when one of them changes size

use super::Monitor;
use crate::{
    error::Error,
    geometry::{Dimension, Rectangle},
    reflow::{
        self,
        strategy::{Downward, Leftward, Rightward, Upward},
    },
    server::{ChangeTracker, DisplayServer},
    types::{CrtcHandle, CrtcId, DisplayMode, MonitorId, NO_MODE},
};

/// Every enabled monitor of one screen
#[derive(Debug, Clone)]
pub(crate) struct MonitorSet {
    /// The monitors, indexed by [`MonitorId`]
    monitors:      Vec<Monitor>,
    /// The controllers driving the monitors, indexed by [`CrtcId`]
    crtcs:         Vec<CrtcHandle>,
    /// Smallest screen size allowed
    min_bounds:    Dimension,
    /// Largest screen size allowed
    max_bounds:    Dimension,
    /// Current screen size
    size:          Dimension,
    /// Screen size found at enumeration
    saved_size:    Dimension,
    /// Physical screen size found at enumeration
    saved_size_mm: Dimension,
    /// The layout was changed by another client
    broken:        bool,
}

impl MonitorSet {
    /// Build the set from the controllers currently enabled on the server.
    ///
    /// A controller covering exactly the area of an earlier one mirrors it and
    /// becomes its clone. Disabled controllers are skipped.
    pub(crate) fn enumerate(server: &dyn DisplayServer) -> Result<Self, Error> {
        let layout = server.layout()?;
        log::debug!(
            "enumerating {} controllers on a {} screen",
            layout.crtcs.len(),
            layout.size
        );

        let mut monitors: Vec<Monitor> = Vec::new();
        let mut crtcs = Vec::new();

        for info in layout.crtcs {
            if info.mode == NO_MODE || info.area().is_empty() {
                log::trace!("skipping disabled controller {:#x}", info.handle.xid);
                continue;
            }

            let area = info.area();
            let xid = info.handle.xid;
            let crtc: CrtcId = crtcs.len();
            crtcs.push(info.handle);

            match monitors.iter_mut().find(|m| m.area().intersects(&area)) {
                Some(monitor) if monitor.area() == area => {
                    log::debug!("controller {:#x} mirrors {}", xid, monitor);
                    monitor.add_clone(crtc);
                },
                Some(_) => return Err(Error::PartialOverlap(xid)),
                None => {
                    let monitor =
                        Monitor::new(monitors.len(), crtc, info.position, info.size, info.mode);
                    log::debug!("found {} on controller {:#x}", monitor, xid);
                    monitors.push(monitor);
                },
            }
        }

        Ok(Self {
            monitors,
            crtcs,
            min_bounds: layout.min,
            max_bounds: layout.max,
            size: layout.size,
            saved_size: layout.size,
            saved_size_mm: layout.size_mm,
            broken: false,
        })
    }

    // ========================= Accessor ========================= [[[

    /// Every monitor in the set
    pub(crate) fn monitors(&self) -> &[Monitor] {
        &self.monitors
    }

    /// Return the [`Monitor`] with the given id
    pub(crate) fn monitor(&self, id: MonitorId) -> Result<&Monitor, Error> {
        self.monitors.get(id).ok_or(Error::UnknownMonitor(id))
    }

    /// Return the hardware handle of a controller
    pub(crate) fn crtc(&self, crtc: CrtcId) -> &CrtcHandle {
        &self.crtcs[crtc]
    }

    /// Current screen size
    pub(crate) const fn size(&self) -> Dimension {
        self.size
    }

    /// Range of screen sizes allowed
    pub(crate) const fn bounds(&self) -> (Dimension, Dimension) {
        (self.min_bounds, self.max_bounds)
    }

    /// Was the layout changed by another client since enumeration?
    pub(crate) const fn is_broken(&self) -> bool {
        self.broken
    }

    /// Has anything changed since enumeration?
    pub(crate) fn changed(&self) -> bool {
        self.size != self.saved_size
            || self
                .monitors
                .iter()
                .any(|m| m.mode_changed() || m.position_changed())
    }

    // ]]] === Accessor ===

    // ========================== Reflow ========================== [[[

    /// Work out where every monitor goes when monitor `id` takes `target` as
    /// its size. Only the transactions are touched.
    ///
    /// Returns the screen size needed by the new layout
    fn reflow(&mut self, id: MonitorId, target: Dimension) -> Result<Dimension, Error> {
        let current = self.monitors[id].size();

        for monitor in &mut self.monitors {
            monitor.begin_transaction();
        }

        let dx = target.width as i32 - current.width as i32;
        if dx > 0 {
            reflow::expand::<Rightward>(&mut self.monitors, id, dx);
        } else if dx < 0 {
            reflow::shrink::<Leftward>(&mut self.monitors, id, -dx);
        }

        for monitor in &mut self.monitors {
            monitor.advance_transaction();
        }

        let dy = target.height as i32 - current.height as i32;
        if dy > 0 {
            reflow::expand::<Downward>(&mut self.monitors, id, dy);
        } else if dy < 0 {
            reflow::shrink::<Upward>(&mut self.monitors, id, -dy);
        }

        let bounds =
            Rectangle::bounding(self.monitors.iter().map(|m| *m.transaction().area()))
                .unwrap_or_default();

        // Side neighbors can be dragged past the origin
        let origin = bounds.top_left();
        if !origin.is_zero() {
            log::debug!("moving reflowed layout {} back to the origin", bounds);
            for monitor in &mut self.monitors {
                monitor
                    .transaction_mut()
                    .area_mut()
                    .offset(-origin.x, -origin.y);
            }
        }

        let required = bounds.dimension();
        if !required.fits_within(self.max_bounds) {
            log::warn!(
                "{} needs a {} screen, larger than the maximum {}",
                self.monitors[id],
                required,
                self.max_bounds
            );
            return Err(Error::BoundsExceeded {
                required,
                max: self.max_bounds,
            });
        }

        Ok(required.at_least(self.min_bounds))
    }

    /// Switch monitor `id` to `mode` and move every other monitor so that the
    /// layout stays tiled.
    ///
    /// Nothing is sent to the server when the new layout does not fit the
    /// screen. A failed request marks the set as broken.
    pub(crate) fn set_monitor_mode(
        &mut self,
        server: &dyn DisplayServer,
        tracker: &ChangeTracker,
        id: MonitorId,
        mode: &DisplayMode,
    ) -> Result<(), Error> {
        if self.broken {
            return Err(Error::Broken);
        }
        self.monitor(id)?;

        let size = self.reflow(id, mode.dimension())?;
        log::debug!("setting monitor {} to {} on a {} screen", id, mode, size);

        self.commit(server, tracker, id, mode, size).map_err(|e| {
            self.broken = true;
            e
        })
    }

    /// Send the reflowed layout to the server
    fn commit(
        &mut self,
        server: &dyn DisplayServer,
        tracker: &ChangeTracker,
        id: MonitorId,
        mode: &DisplayMode,
        size: Dimension,
    ) -> Result<(), Error> {
        let _change = tracker.enter();

        self.disable(server)?;

        for monitor in &mut self.monitors {
            monitor.commit_transaction();
        }
        self.monitors[id].apply_mode(mode);

        let size_mm = self.saved_size_mm.scaled(self.saved_size, size);
        server.set_screen_size(size, size_mm)?;
        self.size = size;

        self.enable(server)?;
        self.process_layout_events(server, tracker)
    }

    // ]]] === Reflow ===

    // ========================= Hardware ========================= [[[

    /// Turn off every controller, clones included
    fn disable(&self, server: &dyn DisplayServer) -> Result<(), Error> {
        for crtc in self.monitors.iter().flat_map(|m| m.all_crtcs()) {
            server.disable_crtc(self.crtcs[crtc].xid)?;
        }
        Ok(())
    }

    /// Drive every controller with its monitor's committed position and mode
    fn enable(&self, server: &dyn DisplayServer) -> Result<(), Error> {
        for monitor in &self.monitors {
            for crtc in monitor.all_crtcs() {
                server.configure_crtc(&self.crtcs[crtc], monitor.position(), monitor.mode())?;
            }
        }
        Ok(())
    }

    /// Consume the layout notifications sent by the server. Notifications
    /// arriving outside of a self-made change mean another client rearranged
    /// the screen, so the set no longer reflects it
    pub(crate) fn process_layout_events(
        &mut self,
        server: &dyn DisplayServer,
        tracker: &ChangeTracker,
    ) -> Result<(), Error> {
        let count = server.drain_layout_events()?;
        if count == 0 {
            return Ok(());
        }

        if tracker.is_self_change() {
            log::trace!("ignoring {} self-made layout notifications", count);
        } else {
            log::warn!(
                "layout changed by another client ({} notifications)",
                count
            );
            self.broken = true;
        }

        Ok(())
    }

    // ]]] === Hardware ===

    // ========================== Request ========================= [[[

    /// Ask for monitor `id` to be at least `size`.
    ///
    /// When the request cannot be honored the monitor is marked out of sync
    /// and the error is returned. Server failures also mark the set as broken
    pub(crate) fn request_size(
        &mut self,
        server: &dyn DisplayServer,
        tracker: &ChangeTracker,
        id: MonitorId,
        size: Dimension,
    ) -> Result<(), Error> {
        if self.monitor(id)?.size() == size {
            self.monitors[id].set_out_of_sync(false);
            return Ok(());
        }

        let result = self
            .find_mode(server, id, size)
            .and_then(|mode| self.set_monitor_mode(server, tracker, id, &mode));

        match result {
            Ok(()) => {
                self.monitors[id].set_out_of_sync(false);
                Ok(())
            },
            Err(e) if e.is_recoverable() => {
                log::info!("monitor {} is out of sync: {}", id, e);
                self.monitors[id].set_out_of_sync(true);
                Err(e)
            },
            Err(e) => {
                self.broken = true;
                Err(e)
            },
        }
    }

    /// Put monitor `id` back to the size it had at enumeration
    pub(crate) fn restore_monitor(
        &mut self,
        server: &dyn DisplayServer,
        tracker: &ChangeTracker,
        id: MonitorId,
    ) -> Result<(), Error> {
        let monitor = self.monitor(id)?;
        if !monitor.mode_changed() {
            return Ok(());
        }

        let size = monitor.saved_size();
        self.request_size(server, tracker, id, size)
    }

    /// Put the whole layout back the way it was found at enumeration.
    /// A broken set is left alone, since the saved layout is stale
    pub(crate) fn restore(
        &mut self,
        server: &dyn DisplayServer,
        tracker: &ChangeTracker,
    ) -> Result<(), Error> {
        if self.broken {
            log::warn!("not restoring a layout changed by another client");
            return Ok(());
        }
        if !self.changed() {
            log::debug!("layout unchanged, nothing to restore");
            return Ok(());
        }

        log::debug!("restoring the layout to a {} screen", self.saved_size);
        self.restore_committed(server, tracker).map_err(|e| {
            self.broken = true;
            e
        })
    }

    fn restore_committed(
        &mut self,
        server: &dyn DisplayServer,
        tracker: &ChangeTracker,
    ) -> Result<(), Error> {
        let _change = tracker.enter();

        self.disable(server)?;
        server.set_screen_size(self.saved_size, self.saved_size_mm)?;
        self.size = self.saved_size;

        for monitor in &mut self.monitors {
            monitor.revert();
            monitor.set_out_of_sync(false);
        }

        self.enable(server)?;
        self.process_layout_events(server, tracker)
    }

    // ]]] === Request ===
}

// ============================== Tests ===============================
// ====================================================================
