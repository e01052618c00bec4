//! Command line interface for writing photon field brightness tables.

use super::utils;
use crate::{exit_on_error, io::utils as io_utils};
use clap::{Arg, ArgMatches, Command};
use std::io::Write;

/// Creates a subcommand for writing the brightness of photon fields.
pub fn create_photon_fields_subcommand() -> Command<'static> {
    let command = Command::new("photon_fields")
        .about("Write the brightness of photon fields to a file")
        .arg(
            Arg::new("output-file")
                .value_name("OUTPUT_FILE")
                .help("Path of the file where the tables should be written")
                .required(true)
                .takes_value(true),
        )
        .arg(utils::create_photon_fields_arg(
            "fields",
            "Photon fields to write (cmb, ebl or path to table file)\n\
             [default: cmb,ebl]",
        ))
        .arg(
            Arg::new("n-points")
                .long("n-points")
                .require_equals(true)
                .value_name("NUMBER")
                .help("Number of photon energies in each table")
                .takes_value(true)
                .default_value("1200"),
        );
    utils::add_verbosity_args(command, false)
}

/// Runs the actions for the `photon_fields` subcommand using the given arguments.
pub fn run_photon_fields_subcommand(arguments: &ArgMatches) {
    let output_file_path: String =
        utils::get_value_from_required_parseable_argument(arguments, "output-file");
    let n_points: usize = utils::get_value_from_required_parseable_argument(arguments, "n-points");
    let verbosity = utils::parse_verbosity(arguments, false);
    let photon_fields = utils::get_photon_fields_from_argument(arguments, "fields", &["cmb", "ebl"]);

    let mut writer = exit_on_error!(
        io_utils::create_file_and_map_err(&output_file_path),
        "Error: Could not create output file: {}"
    );
    for field in &photon_fields {
        if verbosity.print_messages() {
            println!(
                "Writing brightness of {} field to {}",
                field.name(),
                output_file_path
            );
        }
        exit_on_error!(
            field.write_brightness_table(&mut writer, n_points),
            "Error: Could not write brightness table: {}"
        );
    }
    exit_on_error!(writer.flush(), "Error: Could not write brightness table: {}");
}
