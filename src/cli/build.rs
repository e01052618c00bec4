//! Function for building the command line hierarchy.

use super::{
    completions::create_completions_subcommand,
    photon_fields::create_photon_fields_subcommand, propagate::create_propagate_subcommand,
    rates::create_rates_subcommand,
};
use clap::{self, Arg, Command};

/// Build the `cosmoprop` command line hierarchy.
pub fn build() -> Command<'static> {
    Command::new(clap::crate_name!())
        .version(clap::crate_version!())
        .author(clap::crate_authors!())
        .about(clap::crate_description!())
        .disable_help_subcommand(true)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("timing")
                .short('t')
                .long("timing")
                .help("Display elapsed time when done"),
        )
        .subcommand(create_propagate_subcommand())
        .subcommand(create_photon_fields_subcommand())
        .subcommand(create_rates_subcommand())
        .subcommand(create_completions_subcommand())
}
