// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

//! This module contains the [ValueGenerator], which is used to iterate over the values of a PC.

use crate::Id;

/// This struct is for iterating over the interactions of a given PC.
///
/// The values are generated like an odometer: the last position changes fastest.
///
/// # Example
/// ```
/// # use common::ValueGenerator;
/// let generator = ValueGenerator::new(&[2u8, 3, 2], &[0, 1]);
/// let all: Vec<Vec<u8>> = generator.iter().collect();
/// assert_eq!(all, vec![vec![0, 0], vec![0, 1], vec![0, 2], vec![1, 0], vec![1, 1], vec![1, 2]]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueGenerator<ValueId: Id> {
    /// This vector contains the number of values of each parameter in the PC.
    pub max_values: Vec<ValueId>,
}

impl<ValueId: Id> ValueGenerator<ValueId> {
    /// Initialise the struct for the provided parameters, given the levels of all parameters.
    pub fn new(levels: &[ValueId], parameters: &[usize]) -> Self {
        Self { max_values: parameters.iter().map(|&parameter| levels[parameter]).collect() }
    }

    /// Initialise the struct directly from the number of values per position.
    pub fn from_levels(max_values: Vec<ValueId>) -> Self {
        Self { max_values }
    }

    /// Whether there are no value combinations at all, which happens when a domain is empty.
    pub fn is_empty(&self) -> bool {
        self.max_values.iter().any(|&max| max == ValueId::default())
    }

    /// The number of value combinations.
    pub fn count(&self) -> usize {
        self.max_values.iter().map(|max| max.as_usize()).product()
    }

    /// Set the next values in the given slice.
    ///
    /// Returns false when the values wrapped around, i.e. when all combinations have been visited.
    pub fn next_values(&self, values: &mut [ValueId]) -> bool {
        debug_assert_eq!(values.len(), self.max_values.len());
        if values.is_empty() {
            return false;
        }

        let mut index = values.len() - 1;
        values[index] += ValueId::from_usize(1);

        while 0 < index && values[index] == self.max_values[index] {
            values[index] = ValueId::default();
            values[index - 1] += ValueId::from_usize(1);
            index -= 1;
        }

        values[0] != self.max_values[0]
    }

    /// Iterate over all value combinations in odometer order.
    pub fn iter(&self) -> Values<'_, ValueId> {
        let current = if self.is_empty() {
            None
        } else {
            Some(vec![ValueId::default(); self.max_values.len()])
        };
        Values { generator: self, current }
    }
}

/// The iterator returned by [ValueGenerator::iter].
pub struct Values<'a, ValueId: Id> {
    generator: &'a ValueGenerator<ValueId>,
    current: Option<Vec<ValueId>>,
}

impl<'a, ValueId: Id> Iterator for Values<'a, ValueId> {
    type Item = Vec<ValueId>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.current.take()?;
        let mut next = result.clone();
        if self.generator.next_values(&mut next) {
            self.current = Some(next);
        }
        Some(result)
    }
}

#[cfg(test)]
mod test {
    use super::ValueGenerator;

    #[test]
    fn test_next_values() {
        let generator = ValueGenerator::new(&[3usize, 2, 4, 2], &[0, 1, 3]);
        assert_eq!(generator.max_values, vec![3, 2, 2]);
        assert_eq!(generator.count(), 12);

        let mut values = vec![0usize; 3];
        let mut seen = vec![values.clone()];
        while generator.next_values(&mut values) {
            seen.push(values.clone());
        }

        assert_eq!(seen.len(), 12);
        assert_eq!(seen[1], vec![0, 0, 1]);
        assert_eq!(seen[2], vec![0, 1, 0]);
        assert_eq!(seen[11], vec![2, 1, 1]);
    }

    #[test]
    fn test_iter_matches_count() {
        let generator = ValueGenerator::<u8>::from_levels(vec![2, 2, 3]);
        assert_eq!(generator.iter().count(), generator.count());
        assert_eq!(generator.iter().last(), Some(vec![1, 1, 2]));
    }

    #[test]
    fn test_empty_domain() {
        let generator = ValueGenerator::<u16>::from_levels(vec![2, 0]);
        assert!(generator.is_empty());
        assert_eq!(generator.iter().count(), 0);
    }
}
