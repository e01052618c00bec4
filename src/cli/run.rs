//! Function for running the command line program.

use super::{
    build, completions::run_completions_subcommand,
    photon_fields::run_photon_fields_subcommand, propagate::run_propagate_subcommand,
    rates::run_rates_subcommand,
};
use clap::ArgMatches;
use std::time::Instant;

/// Runs the `cosmoprop` command line program.
pub fn run() {
    run_with_args(build::build().get_matches());
}

/// Runs the `cosmoprop` command line program with the given parsed arguments.
pub fn run_with_args(arguments: ArgMatches) {
    let start_instant = Instant::now();

    match arguments.subcommand() {
        Some(("propagate", propagate_arguments)) => run_propagate_subcommand(propagate_arguments),
        Some(("photon_fields", photon_fields_arguments)) => {
            run_photon_fields_subcommand(photon_fields_arguments)
        }
        Some(("rates", rates_arguments)) => run_rates_subcommand(rates_arguments),
        Some(("completions", completions_arguments)) => {
            run_completions_subcommand(completions_arguments)
        }
        _ => {}
    }

    if arguments.is_present("timing") {
        println!("Elapsed time: {} s", start_instant.elapsed().as_secs_f64());
    }
}
