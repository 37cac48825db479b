// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

use std::fmt::{Display, Formatter};

use common::{Assignment, Id};

use crate::{ForbiddenTuple, Solver};

/// Checks rows against a list of [ForbiddenTuple]s.
///
/// Completion is a depth-first search over the unassigned slots of constrained parameters.
/// After assigning a slot only the tuples involving that parameter are checked, since no other tuple can become
/// violated by the assignment. The search backtracks as soon as a remaining slot sharing a tuple with the assigned
/// parameter has no allowed value left. Parameters outside every tuple get the first value of their domain.
#[derive(Debug, Clone)]
pub struct ForbiddenTupleSolver<ValueId: Id> {
    levels: Vec<ValueId>,
    constraints: Vec<ForbiddenTuple<ValueId>>,
    by_parameter: Vec<Vec<usize>>,
}

impl<ValueId: Id> ForbiddenTupleSolver<ValueId> {
    /// Create the solver for parameters with the given levels.
    pub fn new(levels: Vec<ValueId>, constraints: Vec<ForbiddenTuple<ValueId>>) -> Self {
        let by_parameter = (0..levels.len())
            .map(|parameter| {
                constraints
                    .iter()
                    .enumerate()
                    .filter(|(_, constraint)| constraint.involves(parameter))
                    .map(|(constraint_id, _)| constraint_id)
                    .collect::<Vec<usize>>()
            })
            .collect();
        Self { levels, constraints, by_parameter }
    }

    /// The constraints loaded in this solver.
    pub fn constraints(&self) -> &[ForbiddenTuple<ValueId>] {
        &self.constraints
    }

    fn is_constrained(&self, parameter: usize) -> bool {
        !self.by_parameter[parameter].is_empty()
    }

    fn violates_at(&self, row: &[ValueId], parameter: usize) -> bool {
        self.by_parameter[parameter].iter().any(|&constraint_id| self.constraints[constraint_id].matches(row))
    }

    fn shares_constraint(&self, parameter: usize, other: usize) -> bool {
        self.by_parameter[parameter].iter().any(|&constraint_id| self.constraints[constraint_id].involves(other))
    }

    /// Whether the unassigned slot can take a value without directly violating a tuple. The slot is left unassigned.
    fn has_allowed_value(&self, row: &mut [ValueId], parameter: usize) -> bool {
        let allowed = (0..self.levels[parameter].as_usize()).any(|value| {
            row[parameter] = ValueId::from_usize(value);
            !self.violates_at(row, parameter)
        });
        row[parameter] = ValueId::dont_care();
        allowed
    }

    fn fill_holes(&self, row: &mut [ValueId], holes: &[usize]) -> bool {
        let (&parameter, rest) = match holes.split_first() {
            Some(split) => split,
            None => return true,
        };

        for value in 0..self.levels[parameter].as_usize() {
            row[parameter] = ValueId::from_usize(value);
            if self.violates_at(row, parameter) {
                continue;
            }
            let consistent = rest
                .iter()
                .filter(|&&other| self.shares_constraint(parameter, other))
                .all(|&other| self.has_allowed_value(row, other));
            if consistent && self.fill_holes(row, rest) {
                return true;
            }
        }

        row[parameter] = ValueId::dont_care();
        false
    }
}

impl<ValueId: Id> Display for ForbiddenTupleSolver<ValueId> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "<ForbiddenTupleSolver: {} constraints>", self.constraints.len())
    }
}

impl<ValueId: Id> Solver<ValueId> for ForbiddenTupleSolver<ValueId> {
    fn has_constraints(&self) -> bool {
        !self.constraints.is_empty()
    }

    fn violates(&self, row: &[ValueId]) -> bool {
        self.constraints.iter().any(|constraint| constraint.matches(row))
    }

    fn would_violate_after_fill(&self, row: &[ValueId], fill: &[Assignment<ValueId>]) -> bool {
        self.constraints.iter().any(|constraint| constraint.matches_after_fill(row, fill))
    }

    fn complete(&self, row: &[ValueId]) -> Option<Vec<ValueId>> {
        if self.violates(row) {
            return None;
        }

        let mut result = row.to_vec();
        let (holes, free): (Vec<usize>, Vec<usize>) = (0..row.len())
            .filter(|&parameter| row[parameter].is_dont_care())
            .partition(|&parameter| self.is_constrained(parameter));

        if !holes.iter().all(|&parameter| self.has_allowed_value(&mut result, parameter)) {
            return None;
        }
        if !self.fill_holes(&mut result, &holes) {
            return None;
        }
        for parameter in free {
            result[parameter] = ValueId::from_usize(0);
        }
        Some(result)
    }
}
