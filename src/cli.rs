//! The command line arguments

use crate::{geometry::Dimension, types::MonitorId, utils::wants_color};
use clap::{crate_description, crate_version, AppSettings, Parser, Subcommand, ValueHint};
use once_cell::sync::Lazy;
use std::{env, fs, path::PathBuf};

/// Options for the `rrflow` program
#[derive(Parser, Clone, Debug, PartialEq)]
#[clap(
    version = crate_version!(),
    about = <String as AsRef<str>>::as_ref(&APP_ABOUT),
    after_help =  <String as AsRef<str>>::as_ref(&AFTER_HELP),
    override_usage =  <String as AsRef<str>>::as_ref(&OVERRIDE_HELP),
    max_term_width = 100,
    color = clap::ColorChoice::Auto,
    global_setting = AppSettings::DeriveDisplayOrder,
    disable_help_subcommand = true,
    hide_possible_values = true,
    infer_subcommands = true,
)]
pub(crate) struct Opts {
    /// Display debugging messages on various levels
    #[clap(
        long,
        short,
        global = true,
        parse(from_occurrences),
        long_help = "
        Set the verbosity level of the program. There are 2 extra levels after the default (INFO). \
                     If `-v` is used, DEBUG messages are displayed, and if `-vv` is used TRACE \
                     messages are displayed. The verbosity can also be set with the `RRFLOW_LOG` \
                     environment variable"
    )]
    pub(crate) verbose: u8,

    /// Location of configuration file
    #[clap(
        long,
        short,
        global = true,
        takes_value = true,
        number_of_values = 1,
        value_name = "file",
        value_hint = ValueHint::FilePath,
        validator = |t| {
            fs::metadata(
                PathBuf::from(t).components()
                    .collect::<Vec<_>>()
                    .len()
                    .gt(&1_usize)
                    .then(|| PathBuf::from(t))
                    .unwrap_or_else(|| env::current_dir().unwrap_or(PathBuf::from(".")).join(PathBuf::from(t))),
            )
            .map_err(|_| "must be a valid path")
            .map(|_| ())
            .map_err(|e| e.to_string())
        },
        long_help = "\
        Specify the location of the configuration file. The default location is \
                `$XDG_CONFIG_HOME/rrflow/rrflow.yml`"
    )]
    pub(crate) config: Option<PathBuf>,

    /// When to colorize output
    #[clap(
        name = "color",
        long = "color",
        short = 'C',
        global = true,
        value_name = "when",
        possible_values = &["never", "auto", "always"],
        long_help = "\
        When to colorize output (usually meant for piping). Valid values are: always, \
                auto, never"
    )]
    pub(crate) color_when: Option<String>,

    #[clap(subcommand)]
    pub(crate) command: Command,
}

/// What to do with the layout
#[derive(Subcommand, Clone, Debug, PartialEq)]
pub(crate) enum Command {
    /// List the monitors and the controllers driving them
    #[clap(visible_alias = "ls")]
    List {
        /// Print the listing as JSON
        #[clap(long, short)]
        json: bool,
    },

    /// Switch a monitor to the smallest mode of at least the given size and
    /// reflow the others around it
    Set {
        /// Index of the monitor, as shown by `list`
        monitor: MonitorId,

        /// Minimum size of the mode, as `WIDTHxHEIGHT`
        #[clap(parse(try_from_str = parse_dimension))]
        size: Dimension,

        /// Keep the new mode until Enter is pressed, then restore the layout
        #[clap(long, short = 'H')]
        hold: bool,
    },

    /// Put every monitor back to the mode and position it has at startup,
    /// or only the given monitor
    Restore {
        /// Index of the monitor, as shown by `list`
        monitor: Option<MonitorId>,
    },
}

impl Opts {
    /// Should the output be colored?
    pub(crate) fn wants_color(&self) -> bool {
        match self.color_when.as_deref() {
            Some("always") => true,
            Some("never") => false,
            _ => wants_color() && colorize_by_default(),
        }
    }
}

/// Does `colored` detect a terminal on standard output?
fn colorize_by_default() -> bool {
    colored::control::SHOULD_COLORIZE.should_colorize()
}

/// Parse a size given as `WIDTHxHEIGHT`
pub(crate) fn parse_dimension(s: &str) -> Result<Dimension, String> {
    let (width, height) = s
        .split_once(|c| c == 'x' || c == 'X')
        .ok_or_else(|| format!("'{}' is not of the form WIDTHxHEIGHT", s))?;

    let parse = |v: &str| {
        v.trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid size '{}': {}", v, e))
    };

    let size = Dimension::new(parse(width)?, parse(height)?);
    if size.width == 0 || size.height == 0 {
        return Err(format!("'{}' has an empty side", s));
    }

    Ok(size)
}

// =============== Prettify Help ==================

/// Yellow ansi code
const YELLOW: &str = "\x1b[0;33m";
/// Green ansi code
const GREEN: &str = "\x1b[0;32m";
/// Bold-red ansi code
const BRED: &str = "\x1b[01;38;5;1m";
/// Reset colors
const RES: &str = "\x1b[0m";

/// Colored options used in the output of `--help`
pub(crate) static APP_ABOUT: Lazy<String> = Lazy::new(|| {
    wants_color()
        .then(|| {
            format!(
                "{}DESCRIPTION: {}{}{}",
                YELLOW,
                GREEN,
                crate_description!(),
                RES
            )
        })
        .unwrap_or_else(|| crate_description!().to_owned())
});

/// Colorized message to override the generated help message
pub(crate) static OVERRIDE_HELP: Lazy<String> = Lazy::new(|| {
    wants_color()
        .then(|| {
            format!(
                "{}rrflow{} [{}FLAGS{}/{}OPTIONS{}] <{}SUBCOMMAND{}>",
                BRED, RES, GREEN, RES, GREEN, RES, GREEN, RES
            )
        })
        .unwrap_or_else(|| String::from("rrflow [FLAGS/OPTIONS] <SUBCOMMAND>"))
});

/// Colorized message displayed after the help message
pub(crate) static AFTER_HELP: Lazy<String> = Lazy::new(|| {
    wants_color()
        .then(|| {
            format!(
                "See {}rrflow{} {}--help{} for longer explanations of some options.",
                BRED, RES, GREEN, RES
            )
        })
        .unwrap_or_else(|| {
            String::from("See rrflow --help for longer explanations of some options.")
        })
});

#[cfg(test)]
mod tests {
    use super::{parse_dimension, Command, Opts};
    use crate::geometry::Dimension;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    #[test]
    fn sizes() {
        assert_eq!(parse_dimension("1280x1024"), Ok(Dimension::new(1280, 1024)));
        assert_eq!(parse_dimension("800X600"), Ok(Dimension::new(800, 600)));
        assert!(parse_dimension("1280").is_err());
        assert!(parse_dimension("0x600").is_err());
        assert!(parse_dimension("axb").is_err());
    }

    #[test]
    fn set_command() {
        let opts = Opts::try_parse_from(&["rrflow", "-vv", "set", "1", "1920x1080"]).unwrap();
        assert_eq!(opts.verbose, 2);
        assert_eq!(opts.command, Command::Set {
            monitor: 1,
            size:    Dimension::new(1920, 1080),
            hold:    false,
        });
    }

    #[test]
    fn restore_everything_by_default() {
        let opts = Opts::try_parse_from(&["rrflow", "restore"]).unwrap();
        assert_eq!(opts.command, Command::Restore { monitor: None });
    }
}
