//! Picking the hardware mode a monitor is switched to

use super::set::MonitorSet;
use crate::{
    error::Error,
    geometry::Dimension,
    server::DisplayServer,
    types::{DisplayMode, Mode, MonitorId},
};
use itertools::Itertools;
use std::collections::HashSet;

impl MonitorSet {
    /// Find the smallest mode of at least `min` that every output of monitor
    /// `id` can be driven at, clones included.
    ///
    /// Candidates come from the first output and are tried by area, ties
    /// going to the one the server lists first.
    pub(crate) fn find_mode(
        &self,
        server: &dyn DisplayServer,
        id: MonitorId,
        min: Dimension,
    ) -> Result<DisplayMode, Error> {
        let monitor = self.monitor(id)?;
        let mut outputs = monitor
            .all_crtcs()
            .flat_map(|crtc| self.crtc(crtc).outputs.iter().copied());

        let no_mode = || Error::NoEligibleMode { monitor: id, size: min };
        let first = outputs.next().ok_or_else(no_mode)?;

        let candidates = server
            .output_modes(first)?
            .into_iter()
            .enumerate()
            .filter(|(_, mode)| min.fits_within(mode.dimension()))
            .sorted_by_key(|(idx, mode)| (mode.dimension().area(), *idx))
            .map(|(_, mode)| mode)
            .collect::<Vec<_>>();

        if candidates.is_empty() {
            log::debug!("output {:#x} has no mode of at least {}", first, min);
            return Err(no_mode());
        }

        let others = outputs
            .map(|output| {
                server
                    .output_modes(output)
                    .map(|modes| modes.iter().map(|m| m.id).collect::<HashSet<Mode>>())
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        candidates
            .into_iter()
            .find(|mode| others.iter().all(|supported| supported.contains(&mode.id)))
            .map(|mode| {
                log::debug!("monitor {} can use {}", id, mode);
                mode
            })
            .ok_or_else(no_mode)
    }
}
