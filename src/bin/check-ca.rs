// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

//! This binary checks whether the result file is a covering array of the provided strength for the SUT in the input
//! file.
//!
//! The check builds the set of covered interactions for every parameter combination, so only use this for small
//! arrays or be ready to wait.

use std::fs::read_to_string;

use tracing::info;

use tway::cli::{crate_version, init_logging, load_sut, parse_arguments};
use tway::common::time_it;
use tway::mca::{CheckError, MCA};
use tway::sut::{NoConstraints, SUT};
use tway::writer::read_result;

/// Describe the error using the names of the SUT.
fn describe(sut: &SUT<String>, error: CheckError) -> String {
    match error {
        CheckError::Missing { parameters, values } => {
            let interaction: Vec<String> = parameters
                .iter()
                .zip(values.iter())
                .map(|(&parameter, &value)| format!("{}={}", sut.parameter_names[parameter], sut.values[parameter][value]))
                .collect();
            format!("Interaction not covered: {}", interaction.join(", "))
        }
        error => error.to_string(),
    }
}

fn main() -> Result<(), String> {
    let arguments = parse_arguments(file!(), crate_version!())?;
    init_logging(arguments.verbosity)?;

    let sut = load_sut(&arguments)?;
    let text = read_to_string(&arguments.output_path).map_err(|e| e.to_string())?;
    let rows = read_result(&sut, &text).map_err(|e| e.to_string())?;

    let mut mca = MCA::<usize>::new(sut.parameters.len());
    let row_count = rows.len();
    rows.into_iter().for_each(|row| {
        mca.push_row(row);
    });

    let levels = sut.levels::<usize>();
    let strength = arguments.config.strength;
    let lookahead = arguments.config.lookahead;
    let result = if sut.has_constraints() {
        time_it!(mca.check_coverage(&levels, strength, &sut.get_solver::<usize>(), lookahead), "Checking")
    } else {
        time_it!(mca.check_coverage(&levels, strength, &NoConstraints, lookahead), "Checking")
    };

    result.map_err(|error| describe(&sut, error))?;
    info!("The {} rows cover every interaction of strength {}", row_count, strength);
    Ok(())
}
