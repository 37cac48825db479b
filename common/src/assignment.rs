// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

use crate::Id;

/// A single parameter bound to a single value.
///
/// Interactions, forbidden tuples and the requirements handed to the merge engine are all lists of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Assignment<ValueId: Id> {
    /// The index of the parameter.
    pub parameter: usize,
    /// The index of the value within the domain of the parameter.
    pub value: ValueId,
}

impl<ValueId: Id> Assignment<ValueId> {
    /// Bind the given value to the given parameter.
    #[inline]
    pub fn new(parameter: usize, value: ValueId) -> Self {
        Self { parameter, value }
    }

    /// Whether the given row holds this value at this parameter.
    #[inline]
    pub fn holds(&self, row: &[ValueId]) -> bool {
        row[self.parameter] == self.value
    }
}
