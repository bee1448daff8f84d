//! Linux per-task disk I/O monitor
//!
//! Samples per-thread (or per-process) block I/O accounting from the
//! kernel at a fixed interval and shows read/write bandwidth, swap-in and
//! I/O wait shares, either as a full-screen view or as plain text frames.
//!
//! Controls:
//! - Left/Right: Change sort column
//! - r: Reverse sort order
//! - o: Only tasks doing I/O
//! - p: Processes / threads
//! - a: Accumulated / bandwidth
//! - i: Change I/O priority of the highlighted task
//! - ↑/↓, Home/End: Move highlight
//! - ?: Help
//! - q: Quit
//! - any other key: Refresh now

mod app;
mod constants;
mod logger;
mod system;
mod ui;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use app::{install_signal_handler, Args, CancelToken, Sampler};
use constants::APP_NAME;
use system::{TaskstatsSource, VmstatSource};
use ui::{BatchView, InteractiveView, View};

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("{}: {:#}", APP_NAME, e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let (params, config) = args.into_config()?;
    logger::init(params.log_file.as_deref(), params.batch)?;

    let tasks = TaskstatsSource::open(params.display.full_cmdline)
        .context("cannot open kernel task accounting")?;

    let cancel = CancelToken::new();
    install_signal_handler(&cancel).context("cannot install termination handler")?;

    let view: Box<dyn View> = if params.batch {
        Box::new(BatchView::stdout())
    } else {
        match InteractiveView::enter() {
            Ok(view) => Box::new(view),
            Err(e) => {
                warn!(error = %e, "cannot take over the terminal, using batch output");
                Box::new(BatchView::stdout())
            }
        }
    };

    let mut sampler = Sampler::new(
        Box::new(tasks),
        Box::new(VmstatSource),
        view,
        config,
        params,
        cancel,
    );
    let reason = sampler.run()?;
    info!(?reason, "exiting");
    Ok(())
}
