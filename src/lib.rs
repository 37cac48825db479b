// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

//! This crate generates t-way covering arrays using the In-Parameter-Order-General (IPOG) strategy.
//!
//! Every combination of values of every `strength` parameters appears in at least one row of the result, except the
//! combinations excluded by forbidden tuples. Seed rows are placed at the start of the result and their coverage is
//! reused.
//!
//! The crates included provide the building blocks:
//!   * [sut] The System Under Test, its text format and the constraint checkers.
//!   * [ipog] The generation itself.
//!   * [mca] The array under construction and its verification.
//!   * [writer] Writing and reading result files.
//!   * [cli] The command line arguments of the binaries.
//!
//! # Features
//! This crate provides the following optional feature:
//!   * `sub-time` Log the timings for all the [common::sub_time_it] calls.
//!
//! # Example
//! ```
//! let rows = tway::generate(2, &[vec!["a", "b"], vec!["x", "y"], vec!["0", "1"]]).unwrap();
//! assert_eq!(rows, vec![vec!["a", "x", "0"], vec!["a", "y", "1"], vec!["b", "x", "1"], vec!["b", "y", "0"]]);
//! ```

#![deny(missing_docs, rustdoc::missing_crate_level_docs, future_incompatible)]

use thiserror::Error;
use tracing::debug;

pub use cli;
pub use cm;
pub use common;
pub use ipog;
pub use mca;
pub use pc_list;
pub use sut;
pub use writer;

use common::{Id, time_it};
use ipog::{DefaultIPOG, IpogConfig};
use mca::{FillError, MCA};
use sut::{NoConstraints, SUT, SutError};

/// The errors returned by the generation functions.
#[derive(Debug, Error)]
pub enum Error {
    /// The parameters, constraints, seeds or strength are not acceptable.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] SutError),
    /// A row could not be completed without matching a constraint.
    #[error("unsatisfiable constraint set: {0}")]
    UnsatisfiableConstraintSet(#[from] FillError),
    /// Reading or writing a file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Generate a covering array of the given strength for the parameters.
///
/// Each parameter is given as its list of values. The rows contain clones of these values.
pub fn generate<V: Clone + PartialEq>(strength: usize, parameters: &[Vec<V>]) -> Result<Vec<Vec<V>>, Error> {
    generate_with(strength, parameters, &[], &[])
}

/// Generate a covering array of the given strength, avoiding the constraints and starting with the seeds.
///
/// Every constraint lists a value index or a wildcard ([None]) per parameter. A row matching every value index of
/// a constraint is never generated. Seeds are given as values and are placed at the start of the result.
pub fn generate_with<V: Clone + PartialEq>(
    strength: usize,
    parameters: &[Vec<V>],
    constraints: &[Vec<Option<usize>>],
    seeds: &[Vec<V>],
) -> Result<Vec<Vec<V>>, Error> {
    generate_with_config(parameters, constraints, seeds, &IpogConfig::new(strength))
}

/// Same as [generate_with] with all the options of IPOG.
pub fn generate_with_config<V: Clone + PartialEq>(
    parameters: &[Vec<V>],
    constraints: &[Vec<Option<usize>>],
    seeds: &[Vec<V>],
    config: &IpogConfig,
) -> Result<Vec<Vec<V>>, Error> {
    let mut sut = SUT::new(parameters.to_vec());
    sut.validate(config.strength)?;

    for constraint in constraints {
        sut.add_constraint(constraint.clone())?;
    }
    for seed in seeds {
        sut.add_seed(seed)?;
    }

    let mca = generate_sut(&sut, config)?;
    Ok(sut.resolve(&mca.array))
}

/// Generate a covering array for the given SUT, returning the value indices.
///
/// The narrowest value index type that fits the levels of the SUT is used during generation.
pub fn generate_sut<V>(sut: &SUT<V>, config: &IpogConfig) -> Result<MCA<usize>, Error> {
    sut.validate(config.strength)?;

    if sut.values_fit::<u8>().is_ok() {
        run::<u8, V>(sut, config)
    } else if sut.values_fit::<u16>().is_ok() {
        run::<u16, V>(sut, config)
    } else {
        sut.values_fit::<usize>()?;
        run::<usize, V>(sut, config)
    }
}

fn run<ValueId: Id, V>(sut: &SUT<V>, config: &IpogConfig) -> Result<MCA<usize>, Error> {
    debug!(value_id = std::any::type_name::<ValueId>(), lookahead = config.lookahead, policy = %config.unsatisfiable);
    let mca = if sut.has_constraints() {
        time_it!(DefaultIPOG::<ValueId>::run(sut, &sut.get_solver::<ValueId>(), config), "Generation")?
    } else {
        time_it!(DefaultIPOG::<ValueId>::run(sut, &NoConstraints, config), "Generation")?
    };
    Ok(mca.convert())
}
