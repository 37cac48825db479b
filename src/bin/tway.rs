// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

//! This binary generates a covering array for the SUT in the given input file and writes it to the result file.

use tway::cli::{crate_version, init_logging, load_sut, parse_arguments};
use tway::common::time_it;
use tway::generate_sut;
use tway::writer::write_result_file;

fn main() -> Result<(), String> {
    let arguments = parse_arguments(file!(), crate_version!())?;
    init_logging(arguments.verbosity)?;

    let sut = time_it!(load_sut(&arguments), "Parsing")?;
    let mca = generate_sut(&sut, &arguments.config).map_err(|e| e.to_string())?;
    time_it!(
        write_result_file(&sut, &mca, &arguments.output_path).map_err(|e| e.to_string()),
        "Writing"
    )
}
