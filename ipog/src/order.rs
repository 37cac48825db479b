// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

//! IPOG builds the array on the parameters sorted by descending level, which keeps the arrays small.
//! The parameters are sorted only for the generation: constraints are checked and results are returned in the order
//! of the SUT.

use std::fmt::{Display, Formatter};

use common::{Assignment, Id};
use sut::Solver;

/// The order in which IPOG adds the parameters.
///
/// Position `i` of a generation row holds parameter `order[i]` of the SUT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterOrder {
    order: Vec<usize>,
}

impl ParameterOrder {
    /// Keep the parameters in the order of the SUT.
    pub fn identity(parameter_count: usize) -> Self {
        Self { order: (0..parameter_count).collect() }
    }

    /// Sort the parameters on descending level. Parameters with the same level keep their relative order.
    pub fn descending(levels: &[usize]) -> Self {
        let mut order: Vec<usize> = (0..levels.len()).collect();
        order.sort_by_key(|&parameter| !levels[parameter]);
        Self { order }
    }

    /// The SUT parameter at every generation position.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Whether every parameter keeps its position.
    pub fn is_identity(&self) -> bool {
        self.order.iter().enumerate().all(|(position, &parameter)| position == parameter)
    }

    /// The SUT parameter at the generation position.
    #[inline]
    pub fn parameter(&self, position: usize) -> usize {
        self.order[position]
    }

    /// Rearrange a row in SUT order into generation order.
    pub fn to_generation<T: Copy>(&self, row: &[T]) -> Vec<T> {
        self.order.iter().map(|&parameter| row[parameter]).collect()
    }

    /// Rearrange a row in generation order into SUT order.
    pub fn to_sut<T: Copy + Default>(&self, row: &[T]) -> Vec<T> {
        let mut result = vec![T::default(); row.len()];
        for (position, &parameter) in self.order.iter().enumerate() {
            result[parameter] = row[position];
        }
        result
    }
}

/// Checks rows in generation order against a [Solver] for the SUT order.
pub struct ReorderedSolver<'a, S> {
    solver: &'a S,
    order: &'a ParameterOrder,
}

impl<'a, S> ReorderedSolver<'a, S> {
    /// Wrap the solver.
    pub fn new(solver: &'a S, order: &'a ParameterOrder) -> Self {
        Self { solver, order }
    }
}

impl<'a, S: Display> Display for ReorderedSolver<'a, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (reordered)", self.solver)
    }
}

impl<'a, ValueId: Id, S: Solver<ValueId>> Solver<ValueId> for ReorderedSolver<'a, S> {
    fn has_constraints(&self) -> bool {
        self.solver.has_constraints()
    }

    fn violates(&self, row: &[ValueId]) -> bool {
        self.solver.violates(&self.order.to_sut(row))
    }

    fn would_violate_after_fill(&self, row: &[ValueId], fill: &[Assignment<ValueId>]) -> bool {
        let fill: Vec<Assignment<ValueId>> = fill
            .iter()
            .map(|assignment| Assignment::new(self.order.parameter(assignment.parameter), assignment.value))
            .collect();
        self.solver.would_violate_after_fill(&self.order.to_sut(row), &fill)
    }

    fn complete(&self, row: &[ValueId]) -> Option<Vec<ValueId>> {
        self.solver.complete(&self.order.to_sut(row)).map(|completed| self.order.to_generation(&completed))
    }
}
