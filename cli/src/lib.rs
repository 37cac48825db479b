// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

//! This crate provides a basic cli for tway.
//!
//! Both binaries share the arguments parsed here: the input file with the SUT, the strength, the result file and
//! whether the constraints of the input file are used.

#![deny(missing_docs, rustdoc::missing_crate_level_docs, future_incompatible)]

use std::fs::read_to_string;
use std::path::PathBuf;

pub use clap::crate_version;
use clap::{App, Arg, ArgMatches};
use tracing::{debug, Level};

use common::MIN_STRENGTH;
use ipog::IpogConfig;
use mca::UnsatisfiablePolicy;
use sut::{parse, SUT};

const INPUT_FILE_ARG: &str = "input_file";
const OUTPUT_FILE_ARG: &str = "output_file";
const STRENGTH_ARG: &str = "strength";
const CONSTRAINTS_ARG: &str = "constraints";
const NO_CONSTRAINTS_ARG: &str = "no-constraints";
const NO_SEEDS_ARG: &str = "no-seeds";
const NO_LOOKAHEAD_ARG: &str = "no-lookahead";
const DROP_UNSATISFIABLE_ARG: &str = "drop-unsatisfiable";
const NO_SORT_ARG: &str = "no-sort";
const VERBOSE_ARG: &str = "verbose";
const BIN_PREFIX: &str = "src/bin/";
const RUST_EXT: &str = ".rs";

/// The parsed command line arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arguments {
    /// The file containing the SUT.
    pub input_path: PathBuf,
    /// The file containing the result.
    pub output_path: PathBuf,
    /// The options for IPOG.
    pub config: IpogConfig,
    /// Whether the `$forbid` statements of the input are used.
    pub constraints: bool,
    /// Whether the `$seed` statements of the input are used.
    pub seeds: bool,
    /// The number of times `-v` was given.
    pub verbosity: u64,
}

fn get_app<'a, 'b>(app_name: &'a str, version: &'a str) -> App<'a, 'b>
where
    'a: 'b,
{
    App::new(app_name)
        .version(version)
        .arg(
            Arg::with_name(INPUT_FILE_ARG)
                .required(true)
                .help("Set the input file with the definition of the system."),
        )
        .arg(
            Arg::with_name(OUTPUT_FILE_ARG)
                .short("o")
                .long("output")
                .required(false)
                .default_value("result.txt")
                .help("Set the result file."),
        )
        .arg(
            Arg::with_name(STRENGTH_ARG)
                .short("s")
                .long("strength")
                .takes_value(true)
                .required(true)
                .help("Set the strength of the resulting test suite."),
        )
        .arg(
            Arg::with_name(CONSTRAINTS_ARG)
                .short("c")
                .long("constraints")
                .conflicts_with(NO_CONSTRAINTS_ARG)
                .required_unless(NO_CONSTRAINTS_ARG)
                .help("Use the constraints in the provided file."),
        )
        .arg(
            Arg::with_name(NO_CONSTRAINTS_ARG)
                .short("n")
                .long("no-constraints")
                .conflicts_with(CONSTRAINTS_ARG)
                .required_unless(CONSTRAINTS_ARG)
                .help("Do not use the constraints in the provided file."),
        )
        .arg(
            Arg::with_name(NO_SEEDS_ARG)
                .long("no-seeds")
                .help("Do not use the seeds in the provided file."),
        )
        .arg(
            Arg::with_name(NO_LOOKAHEAD_ARG)
                .long("no-lookahead")
                .help("Only avoid direct matches with the constraints while building rows."),
        )
        .arg(
            Arg::with_name(DROP_UNSATISFIABLE_ARG)
                .long("drop-unsatisfiable")
                .help("Drop rows that cannot be completed instead of failing."),
        )
        .arg(
            Arg::with_name(NO_SORT_ARG)
                .long("no-sort")
                .help("Add the parameters in the order of the input file instead of by descending level."),
        )
        .arg(
            Arg::with_name(VERBOSE_ARG)
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("Log more details, repeat for even more."),
        )
}

fn validate_args(matches: ArgMatches) -> Result<Arguments, String> {
    let input_path = PathBuf::from(matches.value_of(INPUT_FILE_ARG).ok_or("The input file should be provided")?);

    let output_path = PathBuf::from(matches.value_of(OUTPUT_FILE_ARG).ok_or("The output file should be provided")?);

    if input_path == output_path {
        return Err("Input and output should not be the same!".to_string());
    }

    let strength = matches
        .value_of(STRENGTH_ARG)
        .ok_or("The strength argument is required.")?
        .parse::<usize>()
        .map_err(|_| "The strength argument should be a number.".to_string())?;

    if strength < MIN_STRENGTH {
        return Err(format!("Please provide a strength of at least {}.", MIN_STRENGTH));
    }

    let unsatisfiable = if matches.is_present(DROP_UNSATISFIABLE_ARG) {
        UnsatisfiablePolicy::Drop
    } else {
        UnsatisfiablePolicy::Fail
    };

    Ok(Arguments {
        input_path,
        output_path,
        config: IpogConfig::new(strength)
            .lookahead(!matches.is_present(NO_LOOKAHEAD_ARG))
            .unsatisfiable(unsatisfiable)
            .sort_parameters(!matches.is_present(NO_SORT_ARG)),
        constraints: matches.is_present(CONSTRAINTS_ARG),
        seeds: !matches.is_present(NO_SEEDS_ARG),
        verbosity: matches.occurrences_of(VERBOSE_ARG),
    })
}

/// Parse the given arguments, the first being the name of the executable.
pub fn parse_arguments_from<I, T>(app_name: &str, version: &str, args: I) -> Result<Arguments, String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = get_app(app_name, version).get_matches_from_safe(args).map_err(|e| e.message)?;
    validate_args(matches)
}

/// Parse the commandline arguments.
///
/// Prints the usage and exits on invalid or missing arguments.
pub fn parse_arguments(mut app_name: &str, version: &str) -> Result<Arguments, String> {
    if app_name.ends_with(RUST_EXT) {
        app_name = &app_name[..app_name.len() - RUST_EXT.len()];
    }
    if app_name.starts_with(BIN_PREFIX) {
        app_name = &app_name[BIN_PREFIX.len()..];
    }

    validate_args(get_app(app_name, version).get_matches())
}

/// Read and parse the input file, dropping the constraints and seeds when they are not used.
pub fn load_sut(arguments: &Arguments) -> Result<SUT<String>, String> {
    let contents = read_to_string(&arguments.input_path).map_err(|e| e.to_string())?;
    let mut sut = parse(contents.as_str()).map_err(|e| e.to_string())?;

    if !arguments.constraints {
        sut.clear_constraints();
    }
    if !arguments.seeds {
        sut.clear_seeds();
    }

    sut.validate(arguments.config.strength).map_err(|e| e.to_string())?;
    debug!(
        parameters = sut.parameters.len(),
        constraints = sut.count_constraints(),
        seeds = sut.seeds.len(),
        "loaded {}",
        arguments.input_path.display()
    );
    Ok(sut)
}

/// The log level for the given number of `-v` flags.
pub fn log_level(verbosity: u64) -> Level {
    match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the subscriber writing the logs to stderr.
pub fn init_logging(verbosity: u64) -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_max_level(log_level(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod test_lib;
