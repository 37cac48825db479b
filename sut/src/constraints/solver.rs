// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

use std::fmt::Display;

use common::{Assignment, Id};

use super::apply_fill;

/// This trait represents any type of constraint checker and allows for switching between backends without too much effort.
///
/// Rows are slices of value indices where [Id::dont_care] marks an unassigned slot.
pub trait Solver<ValueId: Id>: Display {
    /// Returns false if the checker will accept every row.
    fn has_constraints(&self) -> bool;

    /// Whether the assigned values of the row complete a forbidden combination.
    fn violates(&self, row: &[ValueId]) -> bool;

    /// Whether the row would violate a constraint once its `dont_care` slots are filled with the given assignments.
    ///
    /// The row itself is not changed.
    fn would_violate_after_fill(&self, row: &[ValueId], fill: &[Assignment<ValueId>]) -> bool;

    /// Fill every `dont_care` slot such that no constraint is violated.
    ///
    /// Values are tried in domain order, so the first completion in that order is returned.
    /// Returns [None] if there is no such completion.
    fn complete(&self, row: &[ValueId]) -> Option<Vec<ValueId>>;

    /// Whether the row can be completed without violating a constraint.
    fn is_satisfiable(&self, row: &[ValueId]) -> bool {
        self.complete(row).is_some()
    }

    /// Same as [Solver::is_satisfiable] for the row with the `fill` applied.
    fn is_satisfiable_after_fill(&self, row: &[ValueId], fill: &[Assignment<ValueId>]) -> bool {
        let mut simulated = row.to_vec();
        apply_fill(&mut simulated, fill);
        self.is_satisfiable(&simulated)
    }
}
