// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

use common::{Assignment, Id};

pub(crate) mod solver;
pub(crate) mod solver_fake;
pub(crate) mod solver_forbidden;


/// A combination of assignments that may never appear together in a row.
///
/// Parameters not mentioned in the tuple act as wildcards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ForbiddenTuple<ValueId: Id> {
    /// The assignments that together are forbidden.
    pub assignments: Vec<Assignment<ValueId>>,
}

impl<ValueId: Id> ForbiddenTuple<ValueId> {
    /// Create the forbidden tuple from its assignments.
    pub fn new(assignments: Vec<Assignment<ValueId>>) -> Self {
        Self { assignments }
    }

    /// Create the forbidden tuple from a row of value indices where [None] is a wildcard.
    pub fn from_row(constraint: &[Option<usize>]) -> Self {
        Self {
            assignments: constraint
                .iter()
                .enumerate()
                .filter_map(|(parameter, value)| value.map(|value| Assignment::new(parameter, ValueId::from_usize(value))))
                .collect(),
        }
    }

    /// Whether the tuple constrains the given parameter.
    pub fn involves(&self, parameter: usize) -> bool {
        self.assignments.iter().any(|assignment| assignment.parameter == parameter)
    }

    /// See [violates].
    #[inline]
    pub fn matches(&self, row: &[ValueId]) -> bool {
        violates(row, self)
    }

    /// Whether the row would match this tuple once the `dont_care` values in the row are replaced by the `fill`.
    ///
    /// Assignments in the `fill` for parameters that already hold a value are ignored.
    pub fn matches_after_fill(&self, row: &[ValueId], fill: &[Assignment<ValueId>]) -> bool {
        self.assignments.iter().all(|assignment| {
            let value = row[assignment.parameter];
            let value = if value.is_dont_care() {
                fill.iter()
                    .find(|filled| filled.parameter == assignment.parameter)
                    .map_or(value, |filled| filled.value)
            } else {
                value
            };
            value == assignment.value
        })
    }
}

/// Returns true iff every assignment of the constraint holds in the row.
///
/// A `dont_care` value in the row never matches, so a partially assigned row only violates a constraint when the
/// assigned values already make up the complete forbidden tuple.
#[inline]
pub fn violates<ValueId: Id>(row: &[ValueId], constraint: &ForbiddenTuple<ValueId>) -> bool {
    constraint.assignments.iter().all(|assignment| assignment.holds(row))
}

/// Write the `fill` into the row, skipping parameters that already hold a value.
pub fn apply_fill<ValueId: Id>(row: &mut [ValueId], fill: &[Assignment<ValueId>]) {
    for assignment in fill {
        if row[assignment.parameter].is_dont_care() {
            row[assignment.parameter] = assignment.value;
        }
    }
}
