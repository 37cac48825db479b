// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

//! This crate provides a single-threaded implementation of IPOG.
//! It generates Mixed-level Covering Arrays (MCA) for Systems Under Test (SUT) with forbidden tuples and seed rows.
//!
//! The array is built one parameter at a time.
//! The first `strength` parameters are covered exhaustively, after which every next parameter is added by a
//! horizontal extension followed by a vertical extension, see the [extension] module.
//! By default the parameters are added in order of descending level, see the [order] module.
//!
//! # Example
//! ```
//! use ipog::{DefaultIPOG, IpogConfig};
//! use sut::{NoConstraints, SUT};
//!
//! let sut = SUT::new(vec![vec![0, 1], vec![0, 1], vec![0, 1]]);
//! let mca = DefaultIPOG::<u8>::run(&sut, &NoConstraints, &IpogConfig::new(2)).unwrap();
//! assert_eq!(mca.array, vec![vec![0, 0, 0], vec![0, 1, 1], vec![1, 0, 1], vec![1, 1, 0]]);
//! ```

#![deny(missing_docs, rustdoc::missing_crate_level_docs, future_incompatible)]

use std::fmt::{Display, Formatter};
use std::marker::PhantomData;

use tracing::debug;

use cm::CoverageMap;
use common::{Assignment, Id, MIN_STRENGTH, sub_time_it, ValueGenerator};
use mca::{FillError, MCA, UnsatisfiablePolicy};
use pc_list::PCList;
use sut::{Solver, SUT};

use crate::extension::{Extension, GrowthStep, HorizontalExtension, TimedExtension, VerticalExtension};
use crate::order::{ParameterOrder, ReorderedSolver};

pub mod extension;
pub mod merge;
pub mod order;


/// The options of a single run of IPOG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpogConfig {
    /// The interaction strength.
    pub strength: usize,
    /// Require rows to remain completable while they are being built.
    ///
    /// Without lookahead only direct matches with a forbidden tuple are avoided, which may leave rows that cannot be
    /// completed.
    pub lookahead: bool,
    /// What to do with a row that cannot be completed.
    pub unsatisfiable: UnsatisfiablePolicy,
    /// Add the parameters in order of descending level instead of the order of the SUT.
    pub sort_parameters: bool,
}

impl Default for IpogConfig {
    fn default() -> Self {
        Self { strength: MIN_STRENGTH, lookahead: true, unsatisfiable: UnsatisfiablePolicy::Fail, sort_parameters: true }
    }
}

impl IpogConfig {
    /// The default configuration for the given strength.
    pub fn new(strength: usize) -> Self {
        Self { strength, ..Self::default() }
    }

    /// Set whether lookahead is used.
    pub fn lookahead(mut self, lookahead: bool) -> Self {
        self.lookahead = lookahead;
        self
    }

    /// Set the policy for rows that cannot be completed.
    pub fn unsatisfiable(mut self, policy: UnsatisfiablePolicy) -> Self {
        self.unsatisfiable = policy;
        self
    }

    /// Set whether the parameters are added in order of descending level.
    pub fn sort_parameters(mut self, sort_parameters: bool) -> Self {
        self.sort_parameters = sort_parameters;
        self
    }

    /// The order in which the parameters of a SUT with the given levels are added.
    pub fn parameter_order(&self, levels: &[usize]) -> ParameterOrder {
        if self.sort_parameters {
            ParameterOrder::descending(levels)
        } else {
            ParameterOrder::identity(levels.len())
        }
    }
}

/// The phases of a run, used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Setting up the array and the PCs.
    Initializing,
    /// The first `strength` parameters are covered.
    BaseBuilt,
    /// Adding the given parameter.
    GrowingParameter(usize),
    /// Filling the remaining `dont_care` values.
    Finalizing,
    /// The array is complete.
    Done,
}

impl Display for Phase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Initializing => f.write_str("initializing"),
            Phase::BaseBuilt => f.write_str("base built"),
            Phase::GrowingParameter(at_parameter) => write!(f, "growing parameter {}", at_parameter),
            Phase::Finalizing => f.write_str("finalizing"),
            Phase::Done => f.write_str("done"),
        }
    }
}

/// The toplevel of the IPOG method.
///
/// The extensions can be swapped out, which is mainly useful for testing.
pub struct IPOG<
    ValueId: Id,
    Horizontal: Extension<ValueId> = HorizontalExtension,
    Vertical: Extension<ValueId> = VerticalExtension,
> {
    value_id: PhantomData<ValueId>,
    horizontal_extension: PhantomData<Horizontal>,
    vertical_extension: PhantomData<Vertical>,
}

/// IPOG with the horizontal and vertical extensions.
pub type DefaultIPOG<ValueId> = IPOG<ValueId, HorizontalExtension, VerticalExtension>;

impl<ValueId: Id, Horizontal: Extension<ValueId>, Vertical: Extension<ValueId>> IPOG<ValueId, Horizontal, Vertical> {
    /// Performs the IPOG algorithm using the specified extension types.
    ///
    /// The SUT is expected to be validated for the configured strength and its values have to fit in `ValueId`.
    /// The solver has to represent the constraints of the SUT.
    /// The rows of the result are in the parameter order of the SUT, whichever order the parameters are added in.
    pub fn run<V, S: Solver<ValueId>>(sut: &SUT<V>, solver: &S, config: &IpogConfig) -> Result<MCA<ValueId>, FillError> {
        let order = config.parameter_order(&sut.parameters);
        if order.is_identity() {
            return Self::generate(sut.levels(), sut.seed_rows(), solver, config);
        }

        debug!(order = ?order.order(), "sorted parameters");
        let levels = order.to_generation(&sut.levels::<ValueId>());
        let seeds = sut.seed_rows::<ValueId>().iter().map(|seed| order.to_generation(seed)).collect();

        let mut mca = Self::generate(levels, seeds, &ReorderedSolver::new(solver, &order), config)
            .map_err(|error| FillError { row: error.row, parameter: order.parameter(error.parameter) })?;
        mca.array = mca.array.iter().map(|row| order.to_sut(row)).collect();
        Ok(mca)
    }

    fn generate<S: Solver<ValueId>>(
        levels: Vec<ValueId>,
        seeds: Vec<Vec<ValueId>>,
        solver: &S,
        config: &IpogConfig,
    ) -> Result<MCA<ValueId>, FillError> {
        let strength = config.strength;
        debug_assert!(MIN_STRENGTH <= strength && strength <= levels.len());
        debug!(phase = %Phase::Initializing, parameters = levels.len(), strength, solver = %solver);

        let mut mca = MCA::with_seeds(levels.len(), seeds);
        let base_rows = Self::build_base(&levels, strength, solver, config.lookahead, &mut mca);
        debug!(phase = %Phase::BaseBuilt, seeds = mca.seeds, base_rows);

        if strength < levels.len() {
            let pc_list = sub_time_it!(PCList::<usize>::new(strength, levels.len()), "PCList generation");
            let mut coverage_map = CoverageMap::new(levels.clone(), &pc_list);

            for at_parameter in strength..levels.len() {
                debug!(phase = %Phase::GrowingParameter(at_parameter));
                coverage_map.initialise(at_parameter);

                let mut step = GrowthStep {
                    solver,
                    levels: &levels,
                    at_parameter,
                    pc_list: &pc_list,
                    mca: &mut mca,
                    coverage_map: &mut coverage_map,
                    lookahead: config.lookahead,
                };

                let seeded = step.cover_seeds();
                let dropped = step.filter_map();
                let total = step.coverage_map.total();
                let uncovered = step.coverage_map.uncovered;

                TimedExtension::<Horizontal>::extend(&mut step);
                if !step.coverage_map.is_covered() {
                    TimedExtension::<Vertical>::extend(&mut step);
                }
                debug_assert!(step.coverage_map.is_covered());

                debug!(at_parameter, total, seeded, dropped, uncovered, rows = mca.len(), "parameter added");
            }
        }

        debug!(phase = %Phase::Finalizing, rows = mca.len());
        let removed = mca.fill_dont_cares(solver, config.unsatisfiable)?;
        debug!(phase = %Phase::Done, rows = mca.len(), removed);

        Ok(mca)
    }

    /// Add every combination of the first `strength` parameters that is allowed and not held by a seed.
    ///
    /// Returns the number of rows added.
    fn build_base<S: Solver<ValueId>>(
        levels: &[ValueId],
        strength: usize,
        solver: &S,
        lookahead: bool,
        mca: &mut MCA<ValueId>,
    ) -> usize {
        let check_completion = lookahead && solver.has_constraints();
        let mut added = 0;

        for values in ValueGenerator::from_levels(levels[..strength].to_vec()).iter() {
            let mut row = values.clone();
            row.resize(levels.len(), ValueId::dont_care());

            if solver.violates(&row) || (check_completion && !solver.is_satisfiable(&row)) {
                continue;
            }

            let assignments: Vec<Assignment<ValueId>> = values
                .into_iter()
                .enumerate()
                .map(|(parameter, value)| Assignment::new(parameter, value))
                .collect();
            if mca.seeds_contain(&assignments) {
                continue;
            }

            mca.push_row(row);
            added += 1;
        }

        added
    }
}
