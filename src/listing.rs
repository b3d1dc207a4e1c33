//! What `rrflow list` prints

use crate::{
    geometry::Dimension,
    monitor::{set::MonitorSet, Monitor},
    types::CrtcHandle,
};
use colored::Colorize;
use serde::Serialize;
use std::fmt;

/// One monitor and the controllers driving it
#[derive(Debug, Serialize)]
pub(crate) struct MonitorEntry<'a> {
    #[serde(flatten)]
    monitor:     &'a Monitor,
    /// The controller followed by its clones
    controllers: Vec<&'a CrtcHandle>,
}

/// Snapshot of a [`MonitorSet`]
#[derive(Debug, Serialize)]
pub(crate) struct Listing<'a> {
    size:     Dimension,
    min:      Dimension,
    max:      Dimension,
    broken:   bool,
    monitors: Vec<MonitorEntry<'a>>,
}

impl<'a> Listing<'a> {
    /// Describe every monitor of `set`
    pub(crate) fn new(set: &'a MonitorSet) -> Self {
        let (min, max) = set.bounds();
        Self {
            size: set.size(),
            min,
            max,
            broken: set.is_broken(),
            monitors: set
                .monitors()
                .iter()
                .map(|monitor| MonitorEntry {
                    monitor,
                    controllers: monitor.all_crtcs().map(|c| set.crtc(c)).collect(),
                })
                .collect(),
        }
    }
}

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "{} {} (min {}, max {}){}",
            "screen".bright_blue().bold(),
            self.size,
            self.min,
            self.max,
            if self.broken { " [changed externally]" } else { "" }
        )?;

        for entry in &self.monitors {
            let monitor = entry.monitor;
            write!(
                f,
                "{} {}: {} mode {:#x}",
                "monitor".green().bold(),
                monitor.id(),
                monitor.area(),
                monitor.mode()
            )?;

            for crtc in &entry.controllers {
                let outputs = crtc
                    .outputs
                    .iter()
                    .map(|o| format!("{:#x}", o))
                    .collect::<Vec<_>>()
                    .join(",");
                write!(f, " [crtc {:#x} outputs {}]", crtc.xid, outputs)?;
            }

            if monitor.is_out_of_sync() {
                write!(f, " {}", "out of sync".red())?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
