//! Keep an X11 multi-monitor layout tiled while one monitor changes mode

#![deny(
    clippy::all,
    clippy::complexity,
    clippy::correctness,
    clippy::nursery,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    absolute_paths_not_starting_with_crate,
    anonymous_parameters,
    bad_style,
    ellipsis_inclusive_range_patterns,
    exported_private_dependencies,
    ill_formed_attribute_input,
    improper_ctypes,
    keyword_idents,
    macro_use_extern_crate,
    meta_variable_misuse,
    missing_abi,
    no_mangle_generic_items,
    non_shorthand_field_patterns,
    noop_method_call,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    pub_use_of_private_extern_crate,
    semicolon_in_expressions_from_macros,
    single_use_lifetimes,
    trivial_casts,
    trivial_numeric_casts,
    unconditional_recursion,
    unreachable_pub,
    unsafe_code,
    while_true
)]
#![allow(
    clippy::redundant_pub_crate,
    clippy::module_name_repetitions,
    clippy::doc_markdown,
    clippy::exit,
    clippy::similar_names,
    clippy::too_many_lines,
    clippy::use_debug,
    clippy::print_stdout,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_lossless,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss
)]
#![cfg_attr(
    any(test),
    allow(
        clippy::expect_used,
        clippy::panic,
        clippy::unwrap_used,
        clippy::wildcard_enum_match_arm,
    )
)]

mod cli;
mod config;
mod error;
mod geometry;
mod listing;
mod macros;
mod monitor;
mod reflow;
mod server;
mod types;
mod utils;
mod x;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Command, Opts};
use colored::Colorize;
use config::Config;
use listing::Listing;
use monitor::set::MonitorSet;
use server::{ChangeTracker, DisplayServer};
use std::{io, process};
use x::{randr::RandrServer, utils::XUtility};

fn main() -> Result<()> {
    let opts = Opts::parse();
    colored::control::set_override(opts.wants_color());

    let config = match &opts.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };
    let _logger = utils::initialize_logging(&config, &opts)?;

    log::debug!("{}: {:#?}", "Configuration options".bright_blue(), config);

    if let Err(e) = run(&opts, &config) {
        rrflow_error!("{:#}", e);
        process::exit(1);
    }

    Ok(())
}

/// Connect to the X-Server and carry out the command
fn run(opts: &Opts, config: &Config) -> Result<()> {
    let (conn, screen) = XUtility::setup_connection(config.global.screen)?;
    let server = RandrServer::new(conn, screen)?;
    let tracker = ChangeTracker::new();
    let mut set = MonitorSet::enumerate(&server).context("failed to read the monitor layout")?;

    match opts.command {
        Command::List { json } => {
            let listing = Listing::new(&set);
            if json || config.global.json {
                println!("{}", serde_json::to_string_pretty(&listing)?);
            } else {
                print!("{}", listing);
            }
        },
        Command::Set { monitor, size, hold } => {
            set.request_size(&server, &tracker, monitor, size)?;
            rrflow_info!(
                "monitor {} is now {}, screen is {}",
                monitor,
                set.monitor(monitor)?.area(),
                set.size()
            );

            if hold || config.global.restore_on_exit {
                hold_then_restore(&server, &tracker, &mut set)?;
            }
        },
        Command::Restore { monitor: Some(monitor) } => {
            set.restore_monitor(&server, &tracker, monitor)?;
        },
        Command::Restore { monitor: None } => {
            set.restore(&server, &tracker)?;
        },
    }

    Ok(())
}

/// Wait for Enter, then put the layout back the way it was found
fn hold_then_restore(
    server: &dyn DisplayServer,
    tracker: &ChangeTracker,
    set: &mut MonitorSet,
) -> Result<()> {
    rrflow_info!("press {} to restore the layout", "Enter".green().bold());
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("failed to read from stdin")?;

    set.process_layout_events(server, tracker)?;
    if set.is_broken() {
        rrflow_error!("layout was changed by another client, not restoring it");
        return Ok(());
    }

    set.restore(server, tracker)?;
    Ok(())
}
