// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

//! This crate provides the (mixed-level) covering array ([MCA]) that is constructed by IPOG.
//!
//! Rows hold value indices, with [Id::dont_care] marking values that have not been chosen yet.
//! The seeds are stored at the start of the array and are never changed.

#![deny(missing_docs, rustdoc::missing_crate_level_docs, future_incompatible)]

use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::ops::Range;

use thiserror::Error;
use tracing::{debug, warn};

use common::{Assignment, Id, ValueGenerator};
use pc_list::Combinations;
use sut::Solver;


/// What to do with a row whose `dont_care` values cannot be filled without violating a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnsatisfiablePolicy {
    /// Abort the generation with a [FillError].
    #[default]
    Fail,
    /// Remove the row from the array and log a warning.
    Drop,
}

impl Display for UnsatisfiablePolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            UnsatisfiablePolicy::Fail => f.write_str("fail"),
            UnsatisfiablePolicy::Drop => f.write_str("drop"),
        }
    }
}

/// A row could not be completed without violating a constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("row {row} cannot be completed without violating a constraint (unassigned parameter: {parameter})")]
pub struct FillError {
    /// The index of the row in the array.
    pub row: usize,
    /// The first parameter of the row without a value, in the order in which the parameters were added.
    pub parameter: usize,
}

/// The ways in which an array can fail verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    /// A row has a `dont_care` value.
    #[error("row {row} has no value for parameter {parameter}")]
    Unassigned {
        /// The index of the row.
        row: usize,
        /// The parameter without a value.
        parameter: usize,
    },

    /// A row violates a constraint.
    #[error("row {0} violates a constraint")]
    ConstraintViolated(usize),

    /// No row contains the interaction.
    #[error("the values {values:?} of parameters {parameters:?} are not covered")]
    Missing {
        /// The parameters of the interaction.
        parameters: Vec<usize>,
        /// The values of the interaction.
        values: Vec<usize>,
    },
}

/// The array under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MCA<ValueId: Id> {
    /// The rows, seeds first.
    pub array: Vec<Vec<ValueId>>,

    /// The number of seed rows at the start of the array.
    pub seeds: usize,
    parameter_count: usize,
}

impl<ValueId: Id> MCA<ValueId> {
    /// Create an empty array for the given number of parameters.
    pub fn new(parameter_count: usize) -> Self {
        Self { array: vec![], seeds: 0, parameter_count }
    }

    /// Create an array starting with the given seeds.
    pub fn with_seeds(parameter_count: usize, seeds: Vec<Vec<ValueId>>) -> Self {
        debug_assert!(seeds.iter().all(|seed| seed.len() == parameter_count));
        Self { seeds: seeds.len(), array: seeds, parameter_count }
    }

    /// The number of rows, seeds included.
    pub fn len(&self) -> usize {
        self.array.len()
    }

    /// Whether there are no rows at all.
    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    /// The number of parameters of every row.
    pub fn parameter_count(&self) -> usize {
        self.parameter_count
    }

    /// The indices of the rows that are not seeds.
    #[inline]
    pub fn generated_rows(&self) -> Range<usize> {
        self.seeds..self.array.len()
    }

    /// Whether any seed holds all of the assignments.
    pub fn seeds_contain(&self, assignments: &[Assignment<ValueId>]) -> bool {
        self.array[..self.seeds].iter().any(|seed| assignments.iter().all(|assignment| assignment.holds(seed)))
    }

    /// Add a row and return its index.
    pub fn push_row(&mut self, row: Vec<ValueId>) -> usize {
        debug_assert_eq!(row.len(), self.parameter_count);
        self.array.push(row);
        self.array.len() - 1
    }

    /// Add a row with only the given assignments and return its index.
    pub fn append_row(&mut self, assignments: &[Assignment<ValueId>]) -> usize {
        let mut row = vec![ValueId::dont_care(); self.parameter_count];
        for assignment in assignments {
            row[assignment.parameter] = assignment.value;
        }
        self.push_row(row)
    }

    /// Replace the `dont_care` values of the generated rows with the first completion that violates no constraint.
    ///
    /// Returns the number of rows that were dropped under [UnsatisfiablePolicy::Drop].
    pub fn fill_dont_cares<S: Solver<ValueId>>(
        &mut self,
        solver: &S,
        policy: UnsatisfiablePolicy,
    ) -> Result<usize, FillError> {
        let mut dropped = Vec::new();

        for row_id in self.generated_rows() {
            let row = &mut self.array[row_id];
            let parameter = match row.iter().position(|value| value.is_dont_care()) {
                Some(parameter) => parameter,
                None => continue,
            };

            match solver.complete(row) {
                Some(completed) => *row = completed,
                None => match policy {
                    UnsatisfiablePolicy::Fail => return Err(FillError { row: row_id, parameter }),
                    UnsatisfiablePolicy::Drop => {
                        warn!(row = row_id, parameter, "dropping a row that cannot be completed without violating a constraint");
                        dropped.push(row_id);
                    }
                },
            }
        }

        if !dropped.is_empty() {
            let mut row_id = 0;
            self.array.retain(|_| {
                let keep = dropped.binary_search(&row_id).is_err();
                row_id += 1;
                keep
            });
        }

        debug!(rows = self.array.len(), dropped = dropped.len(), "filled the dont-care values");
        Ok(dropped.len())
    }

    /// Check that every value is assigned and no row violates a constraint.
    pub fn check_constraints<S: Solver<ValueId>>(&self, solver: &S) -> Result<(), CheckError> {
        for (row_id, row) in self.array.iter().enumerate() {
            if let Some(parameter) = row.iter().position(|value| value.is_dont_care()) {
                return Err(CheckError::Unassigned { row: row_id, parameter });
            }
            if solver.violates(row) {
                return Err(CheckError::ConstraintViolated(row_id));
            }
        }
        Ok(())
    }

    /// Check that the array covers every interaction of the given strength.
    ///
    /// Interactions matching a constraint are skipped.
    /// With `lookahead`, interactions that cannot be part of any row respecting the constraints are skipped as well.
    pub fn check_coverage<S: Solver<ValueId>>(
        &self,
        levels: &[ValueId],
        strength: usize,
        solver: &S,
        lookahead: bool,
    ) -> Result<(), CheckError> {
        self.check_constraints(solver)?;

        let mut partial = vec![ValueId::dont_care(); self.parameter_count];
        for parameters in Combinations::new(self.parameter_count, strength) {
            let covered: HashSet<Vec<ValueId>> = self
                .array
                .iter()
                .map(|row| parameters.iter().map(|&parameter| row[parameter]).collect())
                .collect();

            for values in ValueGenerator::new(levels, &parameters).iter() {
                if covered.contains(&values) {
                    continue;
                }

                for (&parameter, &value) in parameters.iter().zip(values.iter()) {
                    partial[parameter] = value;
                }
                let excluded = solver.violates(&partial)
                    || (lookahead && solver.has_constraints() && !solver.is_satisfiable(&partial));
                for &parameter in parameters.iter() {
                    partial[parameter] = ValueId::dont_care();
                }

                if !excluded {
                    return Err(CheckError::Missing {
                        parameters,
                        values: values.into_iter().map(Id::as_usize).collect(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Convert the array to another value index type, keeping `dont_care` values.
    pub fn convert<Other: Id>(&self) -> MCA<Other> {
        MCA {
            array: self
                .array
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|&value| if value.is_dont_care() { Other::dont_care() } else { Other::from_usize(value.as_usize()) })
                        .collect()
                })
                .collect(),
            seeds: self.seeds,
            parameter_count: self.parameter_count,
        }
    }
}
