//! Command line interface for running propagation simulations.

use super::utils;
use crate::{
    constants::EEV_TO_ERG,
    cosmology::CosmologyConfig,
    exit_on_error,
    interactions::{
        cross_section::{CrossSection, TabulatedCrossSection},
        PhotoPionConfig,
    },
    losses::pair_production::PairProductionConfig,
    particle::Pid,
    propagation::{output::TextRecordWriter, PropagationConfig},
    simulation::{InitialPopulation, PropagationSimulator},
};
use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;

/// Creates a subcommand for propagating a population of particles.
pub fn create_propagate_subcommand() -> Command<'static> {
    let command = Command::new("propagate")
        .about("Propagate particles through cosmological photon backgrounds")
        .long_about(
            "Propagate particles through cosmological photon backgrounds.\n\
             One line is written to the output file for every step, containing the PDG code,\n\
             redshift and Lorentz factor of the particle before the step and whether the step\n\
             ended in an interaction (1) or not (0).",
        )
        .arg(
            Arg::new("output-file")
                .value_name("OUTPUT_FILE")
                .help("Path of the file where the step records should be written")
                .required(true)
                .takes_value(true),
        )
        .arg(
            Arg::new("final-population-file")
                .long("final-population-file")
                .require_equals(true)
                .value_name("PATH")
                .help("Write the final population of particles to the given file")
                .takes_value(true),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .require_equals(true)
                .value_name("NUMBER")
                .help("Seed for the random number generator")
                .takes_value(true)
                .default_value("10"),
        )
        .arg(
            Arg::new("species")
                .long("species")
                .require_equals(true)
                .value_name("NAME")
                .help("Species of the initial particles, as a name or PDG code")
                .takes_value(true)
                .default_value("proton"),
        )
        .arg(
            Arg::new("particles")
                .short('n')
                .long("particles")
                .require_equals(true)
                .value_name("NUMBER")
                .help("Number of initial particles")
                .takes_value(true)
                .default_value("1"),
        )
        .arg(
            Arg::new("redshift")
                .long("redshift")
                .require_equals(true)
                .value_name("VALUE")
                .help("Initial redshift of the particles")
                .takes_value(true)
                .default_value("1"),
        )
        .arg(
            Arg::new("lorentz-factor")
                .long("lorentz-factor")
                .require_equals(true)
                .value_name("VALUE")
                .help("Initial Lorentz factor of the particles")
                .takes_value(true)
                .default_value("1e12"),
        )
        .arg(
            Arg::new("random-population")
                .long("random-population")
                .help("Draw initial redshifts and energies randomly"),
        )
        .arg(
            Arg::new("max-redshift")
                .long("max-redshift")
                .require_equals(true)
                .value_name("VALUE")
                .help("Largest initial redshift of a random population [default: 1]")
                .takes_value(true)
                .requires("random-population"),
        )
        .arg(
            Arg::new("redshift-power")
                .long("redshift-power")
                .require_equals(true)
                .value_name("VALUE")
                .help("Initial redshifts of a random population are distributed as z^(power - 1)")
                .takes_value(true)
                .requires("random-population"),
        )
        .arg(
            Arg::new("energy-range")
                .long("energy-range")
                .require_equals(true)
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .value_names(&["MIN", "MAX"])
                .help(
                    "Range of initial energies of a random population [EeV]\n\
                     [default: 1,1000]",
                )
                .takes_value(true)
                .number_of_values(2)
                .requires("random-population"),
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
            Arg::new("no-pair-production")
                .long("no-pair-production")
                .help("Ignore energy losses from pair production"),
        )
        .arg(
            Arg::new("no-adiabatic-losses")
                .long("no-adiabatic-losses")
                .help("Ignore energy losses from cosmological expansion"),
        )
        .arg(
            Arg::new("cross-section-file")
                .long("cross-section-file")
                .require_equals(true)
                .value_name("PATH")
                .help(
                    "Table of photo-pion cross section (columns: photon energy [GeV], \n\
                     cross section [μb]) [default: step approximation]",
                )
                .takes_value(true),
        )
        .arg(
            Arg::new("integration-intervals")
                .long("integration-intervals")
                .require_equals(true)
                .value_name("NUMBER")
                .help("Number of subintervals for integrals over photon energy [default: 200]")
                .takes_value(true),
        )
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
        )
        .arg(
            Arg::new("critical-delta-gamma")
                .long("critical-delta-gamma")
                .require_equals(true)
                .value_name("VALUE")
                .help("Largest fractional loss of Lorentz factor in a continuous step [default: 0.1]")
                .takes_value(true),
        )
        .arg(
            Arg::new("max-root-finding-iterations")
                .long("max-root-finding-iterations")
                .require_equals(true)
                .value_name("NUMBER")
                .help("Maximum number of bisections when searching for a continuous step [default: 100]")
                .takes_value(true),
        )
        .arg(
            Arg::new("root-finding-tolerance")
                .long("root-finding-tolerance")
                .require_equals(true)
                .value_name("VALUE")
                .help("Tolerance for the fractional loss of a continuous step [default: 1e-5]")
                .takes_value(true),
        )
        .arg(
            Arg::new("min-redshift")
                .long("min-redshift")
                .require_equals(true)
                .value_name("VALUE")
                .help("Particles at or below this redshift are not propagated [default: 1e-20]")
                .takes_value(true),
        )
        .arg(
            Arg::new("min-lorentz-factor")
                .long("min-lorentz-factor")
                .require_equals(true)
                .value_name("VALUE")
                .help("Particles at or below this Lorentz factor are not propagated [default: 1e7]")
                .takes_value(true),
        )
        .arg(
            Arg::new("max-steps")
                .long("max-steps")
                .require_equals(true)
                .value_name("NUMBER")
                .help("Stop after this number of steps")
                .takes_value(true),
        );

    #[cfg(feature = "json")]
    let command = command.arg(
        Arg::new("final-population-json")
            .long("final-population-json")
            .require_equals(true)
            .value_name("PATH")
            .help("Write the final population of particles to the given JSON file")
            .takes_value(true),
    );

    utils::add_verbosity_args(command, true)
}

/// Runs the actions for the `propagate` subcommand using the given arguments.
pub fn run_propagate_subcommand(arguments: &ArgMatches) {
    let output_file_path =
        PathBuf::from(utils::get_value_from_required_parseable_argument::<String>(
            arguments,
            "output-file",
        ));
    let verbosity = utils::parse_verbosity(arguments, true);
    let max_steps = arguments
        .value_of("max-steps")
        .map(|value_string| utils::parse_value_string::<usize>("max-steps", value_string));

    let simulator = construct_simulator_from_options(arguments);

    let mut writer = exit_on_error!(
        TextRecordWriter::create(&output_file_path),
        "Error: Could not create output file: {}"
    );
    let (summary, stack) = exit_on_error!(
        simulator.run(&mut writer, &verbosity, max_steps),
        "Error: Could not write step records: {}"
    );

    if verbosity.print_messages() {
        println!(
            "Wrote {} step records to {}",
            summary.steps,
            output_file_path.display()
        );
    }

    if let Some(file_path) = arguments.value_of("final-population-file") {
        exit_on_error!(
            stack.dump_to_file(file_path),
            "Error: Could not write final population: {}"
        );
    }

    #[cfg(feature = "json")]
    if let Some(file_path) = arguments.value_of("final-population-json") {
        exit_on_error!(
            stack.save_as_json(file_path),
            "Error: Could not write final population: {}"
        );
    }
}

fn construct_simulator_from_options(arguments: &ArgMatches) -> PropagationSimulator {
    let pid: Pid = utils::get_value_from_required_parseable_argument(arguments, "species");
    let n_particles: usize =
        utils::get_value_from_required_parseable_argument(arguments, "particles");

    let initial_population = if arguments.is_present("random-population") {
        let max_redshift =
            utils::get_finite_float_value_from_parseable_argument_with_default(
                arguments,
                "max-redshift",
                1.0,
            );
        let redshift_power = utils::get_finite_float_value_from_parseable_argument_with_default(
            arguments,
            "redshift-power",
            InitialPopulation::DEFAULT_REDSHIFT_POWER,
        );
        let (min_energy, max_energy) = utils::parse_limits(
            arguments,
            "energy-range",
            (
                InitialPopulation::DEFAULT_MIN_ENERGY / EEV_TO_ERG,
                InitialPopulation::DEFAULT_MAX_ENERGY / EEV_TO_ERG,
            ),
        );
        InitialPopulation::Random {
            pid,
            n_particles,
            max_redshift,
            redshift_power,
            min_energy: min_energy * EEV_TO_ERG,
            max_energy: max_energy * EEV_TO_ERG,
        }
    } else {
        InitialPopulation::Single {
            pid,
            redshift: utils::get_value_from_required_parseable_argument(arguments, "redshift"),
            lorentz_factor: utils::get_value_from_required_parseable_argument(
                arguments,
                "lorentz-factor",
            ),
            n_particles,
        }
    };

    let mut simulator = PropagationSimulator::new(initial_population);
    simulator.seed = utils::get_value_from_required_parseable_argument(arguments, "seed");
    simulator.propagation_config = construct_propagation_config_from_options(arguments);
    simulator.cosmology_config = construct_cosmology_config_from_options(arguments);
    simulator.include_pair_production = !arguments.is_present("no-pair-production");
    simulator.include_adiabatic_losses = !arguments.is_present("no-adiabatic-losses");
    simulator.loss_photon_fields =
        utils::get_photon_fields_from_argument(arguments, "loss-fields", &["cmb", "ebl"]);
    simulator.interaction_photon_fields =
        utils::get_photon_fields_from_argument(arguments, "interaction-fields", &["cmb"]);

    let integration_intervals = utils::get_value_from_parseable_argument_with_default(
        arguments,
        "integration-intervals",
        PairProductionConfig::DEFAULT_INTEGRATION_INTERVALS,
    );
    simulator.pair_production_config = PairProductionConfig {
        integration_intervals,
    };
    simulator.photo_pion_config = PhotoPionConfig {
        integration_intervals,
        ..PhotoPionConfig::default()
    };
    simulator.pair_production_config.validate();
    simulator.photo_pion_config.validate();

    if let Some(file_path) = arguments.value_of("cross-section-file") {
        simulator.cross_section = CrossSection::Tabulated(exit_on_error!(
            TabulatedCrossSection::from_file(file_path),
            "Error: Could not read cross section: {}"
        ));
    }

    simulator
}

/// Determines propagation parameters based on the provided options.
pub fn construct_propagation_config_from_options(arguments: &ArgMatches) -> PropagationConfig {
    let critical_delta_gamma = utils::get_finite_float_value_from_parseable_argument_with_default(
        arguments,
        "critical-delta-gamma",
        PropagationConfig::DEFAULT_CRITICAL_DELTA_GAMMA,
    );
    let max_root_finding_iterations = utils::get_value_from_parseable_argument_with_default(
        arguments,
        "max-root-finding-iterations",
        PropagationConfig::DEFAULT_MAX_ROOT_FINDING_ITERATIONS,
    );
    let root_finding_tolerance = utils::get_finite_float_value_from_parseable_argument_with_default(
        arguments,
        "root-finding-tolerance",
        PropagationConfig::DEFAULT_ROOT_FINDING_TOLERANCE,
    );
    let min_redshift = utils::get_finite_float_value_from_parseable_argument_with_default(
        arguments,
        "min-redshift",
        PropagationConfig::DEFAULT_MIN_REDSHIFT,
    );
    let min_lorentz_factor = utils::get_finite_float_value_from_parseable_argument_with_default(
        arguments,
        "min-lorentz-factor",
        PropagationConfig::DEFAULT_MIN_LORENTZ_FACTOR,
    );

    let config = PropagationConfig {
        critical_delta_gamma,
        max_root_finding_iterations,
        root_finding_tolerance,
        min_redshift,
        min_lorentz_factor,
    };
    config.validate();
    config
}

/// Determines cosmological parameters based on the provided options.
pub fn construct_cosmology_config_from_options(arguments: &ArgMatches) -> CosmologyConfig {
    let config = CosmologyConfig {
        hubble_constant: utils::get_finite_float_value_from_parseable_argument_with_default(
            arguments,
            "hubble-constant",
            CosmologyConfig::DEFAULT_HUBBLE_CONSTANT,
        ),
        omega_matter: utils::get_finite_float_value_from_parseable_argument_with_default(
            arguments,
            "omega-matter",
            CosmologyConfig::DEFAULT_OMEGA_MATTER,
        ),
        omega_lambda: utils::get_finite_float_value_from_parseable_argument_with_default(
            arguments,
            "omega-lambda",
            CosmologyConfig::DEFAULT_OMEGA_LAMBDA,
        ),
    };
    config.validate();
    config
}
