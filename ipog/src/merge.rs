// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

//! This module contains the merge engine used by the vertical extension.
//!
//! An interaction is merged into an existing row when the row can hold it without changing any assigned value and
//! without violating a constraint.

use std::fmt::{Display, Formatter};

use common::{Assignment, Id};
use sut::Solver;

/// The reason a row did not accept an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// A slot of the row holds a different value.
    Conflict,
    /// Filling the row would complete a forbidden tuple.
    Forbidden,
    /// Filling the row leaves no way to complete it without violating a constraint.
    Unsatisfiable,
}

/// The result of [merge].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Only the slot of the new parameter had to be written.
    Perfect,
    /// Some `dont_care` slots of the PC were filled as well.
    Partial,
    /// The row was left untouched.
    Rejected(Rejection),
}

impl MergeOutcome {
    /// The numeric code of the outcome: `0` for perfect, `1` for partial and `-1` for rejected.
    pub fn code(&self) -> i8 {
        match self {
            MergeOutcome::Perfect => 0,
            MergeOutcome::Partial => 1,
            MergeOutcome::Rejected(_) => -1,
        }
    }

    /// Whether the interaction is now part of the row.
    pub fn is_merged(&self) -> bool {
        !matches!(self, MergeOutcome::Rejected(_))
    }
}

impl Display for MergeOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MergeOutcome::Perfect => f.write_str("perfect"),
            MergeOutcome::Partial => f.write_str("partial"),
            MergeOutcome::Rejected(rejection) => write!(f, "rejected ({:?})", rejection),
        }
    }
}

/// Check whether the `dont_care` slots of the row may be filled with the given assignments.
///
/// With `lookahead` the filled row also has to remain completable.
pub fn check_fill<ValueId: Id, S: Solver<ValueId>>(
    solver: &S,
    lookahead: bool,
    row: &[ValueId],
    fill: &[Assignment<ValueId>],
) -> Result<(), Rejection> {
    if solver.would_violate_after_fill(row, fill) {
        Err(Rejection::Forbidden)
    } else if lookahead && solver.has_constraints() && !solver.is_satisfiable_after_fill(row, fill) {
        Err(Rejection::Unsatisfiable)
    } else {
        Ok(())
    }
}

/// Try to merge the assignments into the row.
///
/// The assignments consist of the values of the PC followed by the value of `at_parameter`.
/// The row is only changed when the outcome is [MergeOutcome::Perfect] or [MergeOutcome::Partial].
pub fn merge<ValueId: Id, S: Solver<ValueId>>(
    at_parameter: usize,
    assignments: &[Assignment<ValueId>],
    row: &mut [ValueId],
    solver: &S,
    lookahead: bool,
) -> MergeOutcome {
    let mut perfect = true;
    for assignment in assignments {
        let current = row[assignment.parameter];
        if current.is_dont_care() {
            if assignment.parameter != at_parameter {
                perfect = false;
            }
        } else if current != assignment.value {
            return MergeOutcome::Rejected(Rejection::Conflict);
        }
    }

    if let Err(rejection) = check_fill(solver, lookahead, row, assignments) {
        return MergeOutcome::Rejected(rejection);
    }

    for assignment in assignments {
        row[assignment.parameter] = assignment.value;
    }

    if perfect {
        MergeOutcome::Perfect
    } else {
        MergeOutcome::Partial
    }
}
