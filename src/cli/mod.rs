// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Command-line interface code. More specific options for `aras_spectra`
//! subcommands are contained in modules.
//!
//! Only 3 things should be public in this module: `ArasSpectra`,
//! `ArasSpectra::run`, and `ArasSpectraError`.

mod error;
mod fetch;
mod plot_line;
mod view;

pub use error::ArasSpectraError;

use std::sync::atomic::Ordering;

use clap::{AppSettings, Args, Parser, Subcommand};
use log::info;

use crate::PROGRESS_BARS;

#[derive(Debug, Parser)]
#[clap(
    version,
    about = "Fetch, filter and cache ARAS spectra, and plot spectral lines in velocity space"
)]
#[clap(global_setting(AppSettings::DeriveDisplayOrder))]
#[clap(disable_help_subcommand = true)]
#[clap(infer_subcommands = true)]
#[clap(propagate_version = true)]
#[clap(infer_long_args = true)]
pub struct ArasSpectra {
    #[clap(flatten)]
    global_opts: GlobalArgs,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// Don't draw progress bars.
    #[clap(long)]
    #[clap(global = true)]
    no_progress_bars: bool,

    /// The verbosity of the program. Increase by specifying multiple times
    /// (e.g. -vv). The default is to print only high-level information.
    #[clap(short, long, parse(from_occurrences))]
    #[clap(global = true)]
    verbosity: u8,
}

#[derive(Debug, Subcommand)]
#[clap(arg_required_else_help = true)]
enum Command {
    #[clap(about = "Scrape the catalog page, then download, filter and cache its spectra.")]
    Fetch(fetch::FetchArgs),

    #[clap(
        about = r#"Plot normalized flux against radial velocity for spectral lines in the cached collection. Only available if compiled with the "plotting" feature."#
    )]
    PlotLine(plot_line::PlotLineArgs),

    #[clap(about = "Fetch a single spectrum by URL and plot flux against wavelength.")]
    View(view::ViewArgs),
}

impl ArasSpectra {
    pub fn run(self) -> Result<(), ArasSpectraError> {
        // Set up logging.
        let GlobalArgs {
            verbosity,
            no_progress_bars,
        } = self.global_opts;
        setup_logging(verbosity).expect("Failed to initialise logging.");
        // Enable progress bars if the user didn't say "no progress bars".
        if !no_progress_bars {
            PROGRESS_BARS.store(true, Ordering::Relaxed);
        }

        let sub_command = match &self.command {
            Command::Fetch(_) => "fetch",
            Command::PlotLine(_) => "plot-line",
            Command::View(_) => "view",
        };
        info!("aras_spectra {} {}", sub_command, env!("CARGO_PKG_VERSION"));

        match self.command {
            Command::Fetch(args) => args.run()?,
            Command::PlotLine(args) => args.run()?,
            Command::View(args) => args.run()?,
        }

        info!("aras_spectra {} complete.", sub_command);
        Ok(())
    }
}

/// Activate a logger. All log messages are put onto `stdout`. `env_logger`
/// automatically only uses colours and fancy symbols if we're on a tty (e.g. a
/// terminal); piped output will be formatted sensibly. Source code lines are
/// displayed in log messages when verbosity >= 3.
fn setup_logging(verbosity: u8) -> Result<(), log::SetLoggerError> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.target(env_logger::Target::Stdout);
    builder.format_target(false);
    match verbosity {
        0 => builder.filter_level(log::LevelFilter::Info),
        1 => builder.filter_level(log::LevelFilter::Debug),
        2 => builder.filter_level(log::LevelFilter::Trace),
        _ => {
            builder.filter_level(log::LevelFilter::Trace);
            builder.format(|buf, record| {
                use std::io::Write;

                let timestamp = buf.timestamp();
                let level = record.level();
                let target = record.target();
                let line = record.line().unwrap_or(0);
                let message = record.args();

                writeln!(buf, "[{timestamp} {level} {target}:{line}] {message}")
            })
        }
    };
    builder.init();

    Ok(())
}
