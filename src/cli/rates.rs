//! Command line interface for tabulating energy loss and interaction rates.

use super::{propagate::construct_cosmology_config_from_options, utils};
use crate::{
    cosmology::Cosmology,
    exit_on_error, exit_on_false,
    interactions::{cross_section::CrossSection, PhotoPionConfig, PhotoPionProduction},
    io::utils as io_utils,
    losses::{
        pair_production::{PairProductionConfig, PairProductionLosses},
        ContinuousLoss,
    },
    math::log_space,
    particle::Pid,
    units::U_MPC,
};
use clap::{Arg, ArgMatches, Command};
use std::io::{self, Write};

/// Creates a subcommand for tabulating rates versus Lorentz factor.
pub fn create_rates_subcommand() -> Command<'static> {
    let command = Command::new("rates")
        .about("Tabulate energy loss and interaction rates versus Lorentz factor")
        .long_about(
            "Tabulate energy loss and interaction rates versus Lorentz factor.\n\
             Columns: Lorentz factor, pair production loss rate [1/s], adiabatic loss\n\
             rate [1/s], photo-pion production rate [1/s], interaction length [Mpc].",
        )
        .arg(
            Arg::new("output-file")
                .value_name("OUTPUT_FILE")
                .help("Path of the file where the table should be written")
                .required(true)
                .takes_value(true),
        )
        .arg(
            Arg::new("species")
                .long("species")
                .require_equals(true)
                .value_name("NAME")
                .help("Species to compute rates for, as a name or PDG code")
                .takes_value(true)
                .default_value("proton"),
        )
        .arg(
            Arg::new("redshift")
                .long("redshift")
                .require_equals(true)
                .value_name("VALUE")
                .help("Redshift to compute rates at")
                .takes_value(true)
                .default_value("0"),
        )
        .arg(
            Arg::new("lorentz-factor-range")
                .long("lorentz-factor-range")
                .require_equals(true)
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .value_names(&["MIN", "MAX"])
                .help("Range of Lorentz factors [default: 1e8,1e13]")
                .takes_value(true)
                .number_of_values(2),
        )
        .arg(
            Arg::new("n-points")
                .long("n-points")
                .require_equals(true)
                .value_name("NUMBER")
                .help("Number of Lorentz factors in the table")
                .takes_value(true)
                .default_value("100"),
        )
        .arg(utils::create_photon_fields_arg(
            "loss-fields",
            "Photon fields causing pair production losses\n\
             (cmb, ebl or path to table file) [default: cmb,ebl]",
        ))
        .arg(utils::create_photon_fields_arg(
            "interaction-fields",
            "Photon fields causing photo-pion production\n\
             (cmb, ebl or path to table file) [default: cmb]",
        ))
        .arg(
            Arg::new("hubble-constant")
                .long("hubble-constant")
                .require_equals(true)
                .value_name("VALUE")
                .help("Hubble constant [km/s/Mpc] [default: 67.4]")
                .takes_value(true),
        )
        .arg(
            Arg::new("omega-matter")
                .long("omega-matter")
                .require_equals(true)
                .value_name("VALUE")
                .help("Matter density parameter [default: 0.315]")
                .takes_value(true),
        )
        .arg(
            Arg::new("omega-lambda")
                .long("omega-lambda")
                .require_equals(true)
                .value_name("VALUE")
                .help("Dark energy density parameter [default: 0.685]")
                .takes_value(true),
        );
    utils::add_verbosity_args(command, false)
}

/// Runs the actions for the `rates` subcommand using the given arguments.
pub fn run_rates_subcommand(arguments: &ArgMatches) {
    let output_file_path: String =
        utils::get_value_from_required_parseable_argument(arguments, "output-file");
    let pid: Pid = utils::get_value_from_required_parseable_argument(arguments, "species");
    let redshift: f64 = utils::get_value_from_required_parseable_argument(arguments, "redshift");
    exit_on_false!(
        redshift >= 0.0,
        "Error: Redshift must be larger than or equal to zero"
    );
    let (min_lorentz_factor, max_lorentz_factor) =
        utils::parse_limits(arguments, "lorentz-factor-range", (1e8, 1e13));
    let n_points: usize = utils::get_value_from_required_parseable_argument(arguments, "n-points");
    let verbosity = utils::parse_verbosity(arguments, false);

    let cosmology = Cosmology::new(construct_cosmology_config_from_options(arguments));
    let pair_production = ContinuousLoss::PairProduction(PairProductionLosses::new(
        PairProductionConfig::default(),
        utils::get_photon_fields_from_argument(arguments, "loss-fields", &["cmb", "ebl"]),
    ));
    let adiabatic = ContinuousLoss::Adiabatic(cosmology);
    let interactions = PhotoPionProduction::new(
        PhotoPionConfig::default(),
        CrossSection::AtoyanDermer,
        utils::get_photon_fields_from_argument(arguments, "interaction-fields", &["cmb"]),
    );

    if verbosity.print_messages() {
        println!(
            "Writing rates for {} at redshift {} to {}",
            pid, redshift, output_file_path
        );
    }

    let lorentz_factors = log_space(min_lorentz_factor, max_lorentz_factor, n_points);
    exit_on_error!(
        write_rate_table(
            &output_file_path,
            pid,
            redshift,
            &lorentz_factors,
            &[pair_production, adiabatic],
            &interactions
        ),
        "Error: Could not write rate table: {}"
    );
}

fn write_rate_table(
    output_file_path: &str,
    pid: Pid,
    redshift: f64,
    lorentz_factors: &[f64],
    losses: &[ContinuousLoss],
    interactions: &PhotoPionProduction,
) -> io::Result<()> {
    let mut writer = io_utils::create_file_and_map_err(output_file_path)?;
    write!(writer, "# Lorentz factor")?;
    for loss in losses {
        write!(writer, " - {} [1/s]", loss.name())?;
    }
    writeln!(writer, " - photo-pion rate [1/s] - interaction length [Mpc]")?;

    for &lorentz_factor in lorentz_factors {
        write!(writer, "{:e}", lorentz_factor)?;
        for loss in losses {
            write!(
                writer,
                " {:e}",
                loss.dln_gamma_dt(pid, lorentz_factor, redshift)
            )?;
        }
        writeln!(
            writer,
            " {:e} {:e}",
            interactions.rate(pid, lorentz_factor, redshift),
            interactions.interaction_length(pid, lorentz_factor, redshift) / U_MPC
        )?;
    }
    writer.flush()
}
