// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

//! This crate provides the System Under Test (SUT): the parameters, their values, the forbidden tuples and the seeds.
//! It also provides the constraint checkers used during generation.
//!
//! # Text format
//! A SUT can be parsed from text using [parse]:
//! ```text
//! browser: firefox, chrome, safari;
//! os: linux, windows, macos;
//!
//! $forbid browser=safari, os=linux;
//! $seed browser=firefox, os=linux;
//! ```
//! Every `$forbid` line forbids the listed values from appearing together in a row.
//! Every `$seed` line lists a row, assigning every parameter, that has to be part of the result.
//!
//! # Solvers
//! Rows are checked against the constraints using a [Solver]:
//!   * [ForbiddenTupleSolver] checks the rows against the forbidden tuples.
//!   * [NoConstraints] accepts every row and is used when there are no constraints.
//!
//! # Example
//! ```
//! use sut::Solver;
//!
//! let sut = sut::parse("
//!     p1: 0, 1, 2;
//!     p2: 0, 1;
//!     p3: 0, 1;
//!
//!     $forbid p1=0, p3=1;
//! ").expect("Parsing error occurred");
//! assert_eq!(sut.parameters, vec![3, 2, 2]);
//!
//! let solver = sut.get_solver::<u8>();
//! assert!(!solver.violates(&[0, 0, 0]));
//! assert!(solver.violates(&[0, 0, 1]));
//! assert_eq!(solver.complete(&[0, u8::MAX, u8::MAX]), Some(vec![0, 0, 0]));
//! ```

#![deny(missing_docs, rustdoc::missing_crate_level_docs, future_incompatible)]

use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use thiserror::Error;
use tracing::debug;

use common::{Id, MIN_PARAMETERS, MIN_STRENGTH};
pub use constraints::{apply_fill, ForbiddenTuple, violates};
pub use constraints::solver::Solver;
pub use constraints::solver_fake::NoConstraints;
pub use constraints::solver_forbidden::ForbiddenTupleSolver;
use parser::statements::Statement;

mod constraints;
mod parser;


#[cfg_attr(test, derive(Debug, PartialEq))]
struct TemporaryParameter {
    name: String,
    values: Vec<String>,
}

/// The kind of row a [SutError] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// A forbidden tuple.
    Constraint,
    /// A seed row.
    Seed,
}

impl Display for RowKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RowKind::Constraint => f.write_str("constraint"),
            RowKind::Seed => f.write_str("seed"),
        }
    }
}

/// The ways in which a [SUT] can be invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SutError {
    /// The strength is below [MIN_STRENGTH].
    #[error("the strength should be at least {min}, got {0}", min = MIN_STRENGTH)]
    StrengthTooLow(usize),

    /// There are fewer than [MIN_PARAMETERS] parameters.
    #[error("at least {min} parameters are required, got {0}", min = MIN_PARAMETERS)]
    TooFewParameters(usize),

    /// The strength exceeds the number of parameters.
    #[error("the strength {strength} exceeds the number of parameters {parameters}")]
    StrengthTooHigh {
        /// The requested strength.
        strength: usize,
        /// The number of parameters.
        parameters: usize,
    },

    /// The parameter has no values.
    #[error("parameter {0} has no values")]
    EmptyDomain(usize),

    /// A constraint or seed does not have one entry per parameter.
    #[error("{kind} {index} has {actual} entries, expected {expected}")]
    LengthMismatch {
        /// Whether this is about a constraint or a seed.
        kind: RowKind,
        /// The index of the row.
        index: usize,
        /// The number of parameters.
        expected: usize,
        /// The length of the row.
        actual: usize,
    },

    /// A constraint or seed uses a value index outside the domain of the parameter.
    #[error("{kind} {index} uses value {value} for parameter {parameter}, which has {level} values")]
    ValueOutOfRange {
        /// Whether this is about a constraint or a seed.
        kind: RowKind,
        /// The index of the row.
        index: usize,
        /// The parameter.
        parameter: usize,
        /// The value index used.
        value: usize,
        /// The number of values of the parameter.
        level: usize,
    },

    /// A constraint without any assignment, which would forbid every row.
    #[error("constraint {0} does not constrain any parameter")]
    EmptyConstraint(usize),

    /// A seed holds a value that is not part of the domain of the parameter.
    #[error("seed {seed} holds a value that is not in the domain of parameter {parameter}")]
    UnknownSeedValue {
        /// The index of the seed.
        seed: usize,
        /// The parameter.
        parameter: usize,
    },

    /// A seed contains a forbidden tuple.
    #[error("seed {seed} matches constraint {constraint}")]
    SeedViolatesConstraint {
        /// The index of the seed.
        seed: usize,
        /// The index of the constraint.
        constraint: usize,
    },

    /// The levels do not fit the index type.
    #[error("parameter {parameter} has {level} values, which does not fit the index type")]
    ValueOverflow {
        /// The parameter.
        parameter: usize,
        /// The number of values of the parameter.
        level: usize,
    },

    /// The number of names does not match the number of parameters.
    #[error("got {names} parameter names for {parameters} parameters")]
    NameCount {
        /// The number of names.
        names: usize,
        /// The number of parameters.
        parameters: usize,
    },

    /// The text could not be parsed.
    #[error("could not parse the SUT: {0}")]
    Parse(String),

    /// A statement refers to a parameter that does not exist.
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),

    /// A statement refers to a value that does not exist.
    #[error("parameter '{parameter}' has no value '{value}'")]
    UnknownValue {
        /// The name of the parameter.
        parameter: String,
        /// The name of the value.
        value: String,
    },

    /// A parameter name is used twice, or a value name is used twice within a parameter.
    #[error("'{0}' is defined more than once")]
    Duplicate(String),

    /// A statement assigns the same parameter twice.
    #[error("parameter '{0}' is assigned more than once in a statement")]
    DuplicateAssignment(String),

    /// A `$seed` statement does not assign every parameter.
    #[error("seed {seed} does not assign parameter '{parameter}'")]
    IncompleteSeed {
        /// The index of the seed.
        seed: usize,
        /// The name of the parameter.
        parameter: String,
    },
}

/// This struct represents the System Under Test (SUT) for which to generate a covering array.
///
/// The values are opaque to the generator, which only works with their indices.
/// Parameters keep the order in which they are provided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SUT<V = String> {
    /// The parameter levels of the SUT.
    pub parameters: Vec<usize>,

    /// The names of the parameters.
    pub parameter_names: Vec<String>,

    /// The values.
    ///
    /// The outer vector is indexed by the parameter ID, and the inner vector is indexed by the value ID.
    /// So `sut.values[parameter_id][value_id]`.
    pub values: Vec<Vec<V>>,

    /// The forbidden tuples, with a value index or a wildcard ([None]) per parameter.
    pub constraints: Vec<Vec<Option<usize>>>,

    /// The seeds, with a value index per parameter.
    pub seeds: Vec<Vec<usize>>,
}

impl<V> SUT<V> {
    /// Create a SUT with the given values, naming the parameters `p0`, `p1`, and so on.
    pub fn new(values: Vec<Vec<V>>) -> Self {
        let parameter_names = (0..values.len()).map(|parameter| format!("p{}", parameter)).collect();
        Self {
            parameters: values.iter().map(Vec::len).collect(),
            parameter_names,
            values,
            constraints: vec![],
            seeds: vec![],
        }
    }

    /// Create a SUT with named parameters.
    pub fn with_names(parameter_names: Vec<String>, values: Vec<Vec<V>>) -> Result<Self, SutError> {
        if parameter_names.len() != values.len() {
            return Err(SutError::NameCount { names: parameter_names.len(), parameters: values.len() });
        }
        let mut sut = Self::new(values);
        sut.parameter_names = parameter_names;
        Ok(sut)
    }

    fn check_row_length(&self, kind: RowKind, index: usize, actual: usize) -> Result<(), SutError> {
        if actual != self.parameters.len() {
            Err(SutError::LengthMismatch { kind, index, expected: self.parameters.len(), actual })
        } else {
            Ok(())
        }
    }

    fn check_value(&self, kind: RowKind, index: usize, parameter: usize, value: usize) -> Result<(), SutError> {
        let level = self.parameters[parameter];
        if value >= level {
            Err(SutError::ValueOutOfRange { kind, index, parameter, value, level })
        } else {
            Ok(())
        }
    }

    /// Add a forbidden tuple, given as a value index or wildcard ([None]) per parameter.
    pub fn add_constraint(&mut self, constraint: Vec<Option<usize>>) -> Result<(), SutError> {
        let index = self.constraints.len();
        self.check_row_length(RowKind::Constraint, index, constraint.len())?;
        for (parameter, value) in constraint.iter().enumerate() {
            if let Some(value) = *value {
                self.check_value(RowKind::Constraint, index, parameter, value)?;
            }
        }
        if constraint.iter().all(Option::is_none) {
            return Err(SutError::EmptyConstraint(index));
        }
        self.constraints.push(constraint);
        Ok(())
    }

    /// Add a seed, given as a value index per parameter.
    pub fn add_seed_indices(&mut self, seed: Vec<usize>) -> Result<(), SutError> {
        let index = self.seeds.len();
        self.check_row_length(RowKind::Seed, index, seed.len())?;
        for (parameter, &value) in seed.iter().enumerate() {
            self.check_value(RowKind::Seed, index, parameter, value)?;
        }
        self.seeds.push(seed);
        Ok(())
    }

    /// Add a seed, given as values. The values are resolved to their first equal value in the domain.
    pub fn add_seed(&mut self, seed: &[V]) -> Result<(), SutError> where V: PartialEq {
        let index = self.seeds.len();
        self.check_row_length(RowKind::Seed, index, seed.len())?;
        let indices = seed
            .iter()
            .zip(self.values.iter())
            .enumerate()
            .map(|(parameter, (value, domain))| {
                domain.iter().position(|candidate| candidate == value).ok_or(SutError::UnknownSeedValue { seed: index, parameter })
            })
            .collect::<Result<Vec<usize>, SutError>>()?;
        self.seeds.push(indices);
        Ok(())
    }

    /// Remove all constraints.
    pub fn clear_constraints(&mut self) {
        self.constraints.clear();
    }

    /// Remove all seeds.
    pub fn clear_seeds(&mut self) {
        self.seeds.clear();
    }

    /// Returns true if the SUT has constraints, otherwise returns false.
    pub fn has_constraints(&self) -> bool {
        !self.constraints.is_empty()
    }

    /// Returns the number of constraints listed in the SUT.
    pub fn count_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Check whether an array of the given strength can be generated for this SUT.
    ///
    /// The checks are performed in this order: the strength, the number of parameters, the strength against the
    /// number of parameters, the domains, and finally the seeds against the constraints.
    pub fn validate(&self, strength: usize) -> Result<(), SutError> {
        if strength < MIN_STRENGTH {
            return Err(SutError::StrengthTooLow(strength));
        }
        if self.parameters.len() < MIN_PARAMETERS {
            return Err(SutError::TooFewParameters(self.parameters.len()));
        }
        if strength > self.parameters.len() {
            return Err(SutError::StrengthTooHigh { strength, parameters: self.parameters.len() });
        }
        if let Some(parameter) = self.parameters.iter().position(|&level| level == 0) {
            return Err(SutError::EmptyDomain(parameter));
        }

        for (seed_id, seed) in self.seeds.iter().enumerate() {
            for (constraint_id, constraint) in self.constraints.iter().enumerate() {
                let matches = constraint
                    .iter()
                    .zip(seed.iter())
                    .all(|(required, value)| required.map_or(true, |required| required == *value));
                if matches {
                    return Err(SutError::SeedViolatesConstraint { seed: seed_id, constraint: constraint_id });
                }
            }
        }

        debug!(
            parameters = self.parameters.len(),
            constraints = self.constraints.len(),
            seeds = self.seeds.len(),
            strength,
            "validated SUT"
        );
        Ok(())
    }

    /// Check if the parameter levels fit the given ValueId type.
    pub fn values_fit<ValueId: Id>(&self) -> Result<(), SutError> {
        match self.parameters.iter().position(|&level| level >= ValueId::max_levels()) {
            Some(parameter) => Err(SutError::ValueOverflow { parameter, level: self.parameters[parameter] }),
            None => Ok(()),
        }
    }

    /// The levels converted to the given ValueId type. Use [SUT::values_fit] first.
    pub fn levels<ValueId: Id>(&self) -> Vec<ValueId> {
        self.parameters.iter().map(|&level| ValueId::from_usize(level)).collect()
    }

    /// The seeds converted to the given ValueId type. Use [SUT::values_fit] first.
    pub fn seed_rows<ValueId: Id>(&self) -> Vec<Vec<ValueId>> {
        self.seeds.iter().map(|seed| seed.iter().map(|&value| ValueId::from_usize(value)).collect()).collect()
    }

    /// The constraints converted to [ForbiddenTuple]s. Use [SUT::values_fit] first.
    pub fn forbidden_tuples<ValueId: Id>(&self) -> Vec<ForbiddenTuple<ValueId>> {
        self.constraints.iter().map(|constraint| ForbiddenTuple::from_row(constraint)).collect()
    }

    /// Get a solver with the constraints loaded.
    pub fn get_solver<ValueId: Id>(&self) -> ForbiddenTupleSolver<ValueId> {
        ForbiddenTupleSolver::new(self.levels(), self.forbidden_tuples())
    }

    /// Map each row of value indices to the values of the SUT.
    pub fn resolve<ValueId: Id>(&self, rows: &[Vec<ValueId>]) -> Vec<Vec<V>> where V: Clone {
        rows.iter()
            .map(|row| row.iter().zip(self.values.iter()).map(|(value, domain)| domain[value.as_usize()].clone()).collect())
            .collect()
    }
}

impl SUT<String> {
    fn from_temporary(parameters: Vec<TemporaryParameter>) -> Result<Self, SutError> {
        let mut names = Vec::with_capacity(parameters.len());
        let mut values = Vec::with_capacity(parameters.len());
        for parameter in parameters {
            if names.contains(&parameter.name) {
                return Err(SutError::Duplicate(parameter.name));
            }
            for (index, value) in parameter.values.iter().enumerate() {
                if parameter.values[..index].contains(value) {
                    return Err(SutError::Duplicate(format!("{}={}", parameter.name, value)));
                }
            }
            names.push(parameter.name);
            values.push(parameter.values);
        }
        Self::with_names(names, values)
    }

    fn resolve_pairs(
        &self,
        parameter_to_id: &HashMap<&str, usize>,
        pairs: &[(&str, &str)],
    ) -> Result<Vec<Option<usize>>, SutError> {
        let mut row = vec![None; self.parameters.len()];
        for &(parameter, value) in pairs {
            let parameter_id = *parameter_to_id.get(parameter).ok_or_else(|| SutError::UnknownParameter(parameter.into()))?;
            let value_id = self.values[parameter_id]
                .iter()
                .position(|candidate| candidate == value)
                .ok_or_else(|| SutError::UnknownValue { parameter: parameter.into(), value: value.into() })?;
            if row[parameter_id].replace(value_id).is_some() {
                return Err(SutError::DuplicateAssignment(parameter.into()));
            }
        }
        Ok(row)
    }
}

impl<V: Display> Display for SUT<V> {
    /// Write the SUT in the text format accepted by [parse].
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (parameter_name, values) in self.parameter_names.iter().zip(self.values.iter()) {
            write!(f, "{}: ", parameter_name)?;
            for (index, value) in values.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", value)?;
            }
            f.write_str(";\n")?;
        }

        let write_statement = |f: &mut Formatter<'_>, keyword: &str, row: Vec<(usize, usize)>| -> std::fmt::Result {
            write!(f, "\n{}", keyword)?;
            for (index, (parameter, value)) in row.into_iter().enumerate() {
                let separator = if index > 0 { "," } else { "" };
                write!(f, "{} {}={}", separator, self.parameter_names[parameter], self.values[parameter][value])?;
            }
            f.write_str(";")
        };

        for constraint in self.constraints.iter() {
            let row = constraint.iter().enumerate().filter_map(|(parameter, value)| value.map(|value| (parameter, value))).collect();
            write_statement(f, "$forbid", row)?;
        }
        for seed in self.seeds.iter() {
            write_statement(f, "$seed", seed.iter().copied().enumerate().collect())?;
        }
        f.write_str("\n")
    }
}

/// Parse the given `str` and return the [SUT].
///
/// Parameters are listed first, followed by any `$forbid` and `$seed` statements.
pub fn parse(text: &str) -> Result<SUT<String>, SutError> {
    let (rest, parameters) = parser::parameters::parse(text).map_err(SutError::Parse)?;
    let statements = parser::statements::parse(rest).map_err(SutError::Parse)?;

    let mut sut = SUT::from_temporary(parameters)?;
    let names = sut.parameter_names.clone();
    let parameter_to_id: HashMap<&str, usize> = names.iter().enumerate().map(|(id, name)| (name.as_str(), id)).collect();

    for statement in statements {
        match statement {
            Statement::Forbid(pairs) => {
                let constraint = sut.resolve_pairs(&parameter_to_id, &pairs)?;
                sut.add_constraint(constraint)?;
            }
            Statement::Seed(pairs) => {
                let seed_id = sut.seeds.len();
                let seed = sut
                    .resolve_pairs(&parameter_to_id, &pairs)?
                    .into_iter()
                    .enumerate()
                    .map(|(parameter, value)| {
                        value.ok_or_else(|| SutError::IncompleteSeed { seed: seed_id, parameter: names[parameter].clone() })
                    })
                    .collect::<Result<Vec<usize>, SutError>>()?;
                sut.add_seed_indices(seed)?;
            }
        }
    }

    Ok(sut)
}
