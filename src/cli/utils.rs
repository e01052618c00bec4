//! Utilities for creating the command line interface.

use crate::{
    exit_on_error, exit_on_false, exit_on_none,
    io::Verbosity,
    photon_field::{tabulated::TabulatedPhotonField, PhotonField},
};
use clap::{Arg, ArgMatches, Command};
use indicatif::ProgressStyle;
use lazy_static::lazy_static;
use std::str::FromStr;

lazy_static! {
    pub static ref DEFAULT_PROGRESS_STYLE: ProgressStyle =
        ProgressStyle::default_bar().template("Progress: {bar:40}  {pos}/{len} | ETA: {eta}");
}

pub fn parse_value_string<T>(argument_name: &str, value_string: &str) -> T
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    exit_on_error!(
        value_string.parse(),
        "Error: Could not parse value for {0}: {1}",
        argument_name
    )
}

fn verify_finite_float_value(argument_name: &str, value: f64) {
    exit_on_false!(value.is_finite(), "Error: {} must be finite", argument_name);
}

pub fn get_value_from_required_parseable_argument<T>(
    arguments: &ArgMatches,
    argument_name: &str,
) -> T
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    parse_value_string(
        argument_name,
        exit_on_none!(
            arguments.value_of(argument_name),
            "Error: No value for required argument {}",
            argument_name
        ),
    )
}

pub fn get_value_from_parseable_argument_with_default<T>(
    arguments: &ArgMatches,
    argument_name: &str,
    default: T,
) -> T
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    arguments
        .value_of(argument_name)
        .map(|value_string| parse_value_string(argument_name, value_string))
        .unwrap_or(default)
}

pub fn get_finite_float_value_from_parseable_argument_with_default(
    arguments: &ArgMatches,
    argument_name: &str,
    default: f64,
) -> f64 {
    let value = get_value_from_parseable_argument_with_default(arguments, argument_name, default);
    verify_finite_float_value(argument_name, value);
    value
}

pub fn get_values_from_parseable_argument<T>(
    arguments: &ArgMatches,
    argument_name: &str,
) -> Option<Vec<T>>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    arguments.values_of(argument_name).map(|values| {
        values
            .filter(|value_string| !value_string.is_empty())
            .map(|value_string| parse_value_string(argument_name, value_string))
            .collect()
    })
}

/// Parses a pair of finite, positive and increasing limits.
pub fn parse_limits(
    arguments: &ArgMatches,
    argument_name: &str,
    default: (f64, f64),
) -> (f64, f64) {
    match get_values_from_parseable_argument::<f64>(arguments, argument_name) {
        Some(values) => {
            exit_on_false!(
                values.len() == 2,
                "Error: {} must have 2 values, got {}",
                argument_name,
                values.len()
            );
            values
                .iter()
                .for_each(|&value| verify_finite_float_value(argument_name, value));
            exit_on_false!(
                values[0] > 0.0 && values[1] > values[0],
                "Error: {} must be positive and increasing",
                argument_name
            );
            (values[0], values[1])
        }
        None => default,
    }
}

/// Creates a photon field from its name (`cmb` or `ebl`) or from the path
/// of a file containing a tabulated field.
pub fn parse_photon_field(name: &str) -> PhotonField {
    match name {
        "cmb" => PhotonField::Cmb,
        "ebl" => PhotonField::default_ebl(),
        file_path => PhotonField::Tabulated(exit_on_error!(
            TabulatedPhotonField::from_file(file_path),
            "Error: Could not read photon field: {}"
        )),
    }
}

pub fn get_photon_fields_from_argument(
    arguments: &ArgMatches,
    argument_name: &str,
    default: &[&str],
) -> Vec<PhotonField> {
    match arguments.values_of(argument_name) {
        Some(names) => names
            .filter(|name| !name.is_empty())
            .map(parse_photon_field)
            .collect(),
        None => default.iter().map(|name| parse_photon_field(name)).collect(),
    }
}

pub fn create_photon_fields_arg(name: &'static str, help: &'static str) -> Arg<'static> {
    Arg::new(name)
        .long(name)
        .require_equals(true)
        .use_value_delimiter(true)
        .require_value_delimiter(true)
        .value_name("FIELDS")
        .help(help)
        .takes_value(true)
        .multiple_values(true)
}

pub fn add_verbosity_args(command: Command<'static>, support_progress: bool) -> Command<'static> {
    let command = command.arg(
        Arg::new("verbose")
            .short('v')
            .long("verbose")
            .help("Print status messages"),
    );
    if support_progress {
        command.arg(
            Arg::new("progress")
                .short('p')
                .long("progress")
                .help("Show progress bar (overrides --verbose)"),
        )
    } else {
        command
    }
}

pub fn parse_verbosity(arguments: &ArgMatches, support_progress: bool) -> Verbosity {
    if support_progress && arguments.is_present("progress") {
        Verbosity::Progress(DEFAULT_PROGRESS_STYLE.clone())
    } else if arguments.is_present("verbose") {
        Verbosity::Messages
    } else {
        Verbosity::Quiet
    }
}
