// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

use std::fmt::{Display, Formatter};

use common::{Assignment, Id};

use crate::Solver;

/// This solver does not solve, but instead confirms validity whatever the input.
///
/// To be used for SUTs without constraints.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoConstraints;

impl Display for NoConstraints {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("<NoConstraints>")
    }
}

impl<ValueId: Id> Solver<ValueId> for NoConstraints {
    #[inline(always)]
    fn has_constraints(&self) -> bool { false }
    #[inline(always)]
    fn violates(&self, _row: &[ValueId]) -> bool { false }
    #[inline(always)]
    fn would_violate_after_fill(&self, _row: &[ValueId], _fill: &[Assignment<ValueId>]) -> bool { false }
    #[inline(always)]
    fn is_satisfiable(&self, _row: &[ValueId]) -> bool { true }
    #[inline(always)]
    fn is_satisfiable_after_fill(&self, _row: &[ValueId], _fill: &[Assignment<ValueId>]) -> bool { true }

    fn complete(&self, row: &[ValueId]) -> Option<Vec<ValueId>> {
        Some(row.iter().map(|&value| if value.is_dont_care() { ValueId::default() } else { value }).collect())
    }
}
