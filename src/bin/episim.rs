//! Headless driver. Runs a simulation for a fixed number of frames and
//! leaves the statistics history in `history.csv`.
//!
//! Usage: `episim [params.json] [frames]`

use episim_core::logging::enable_logging;
use episim_core::prelude::*;
use log::{info, LevelFilter};
use std::env;
use std::process::ExitCode;

const DEFAULT_FRAMES: u64 = 2000;
const HISTORY_PATH: &str = "history.csv";

fn run() -> Result<(), EpisimError> {
    let mut args = env::args().skip(1);
    let params = match args.next() {
        Some(path) => Params::from_json_file(path)?,
        None => Params::default(),
    };
    let frames = match args.next() {
        Some(count) => count
            .parse()
            .map_err(|_| EpisimError::Validation(format!("invalid frame count `{count}`")))?,
        None => DEFAULT_FRAMES,
    };

    let mut context = Context::new();
    context.initialize(params)?;
    context.run_frames(frames);

    let counts = context.state_counts();
    let totals = context.run_totals();
    info!(
        "finished frame {}: S {} I {} R {} V {} D {}",
        context.frame(),
        counts.susceptible,
        counts.infected,
        counts.recovered,
        counts.immune,
        counts.removed
    );
    info!(
        "totals: {} infections, {} recoveries, {} deaths",
        totals.infections, totals.recoveries, totals.deaths
    );
    context.write_history_csv(HISTORY_PATH)?;
    Ok(())
}

fn main() -> ExitCode {
    enable_logging(LevelFilter::Info);
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("episim: {error}");
            ExitCode::FAILURE
        }
    }
}
