// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

//! This crate provides the [PCList], the list of parameter combinations (PCs) used by IPOG.
//!
//! A PC is a sorted list of `strength - 1` parameters.
//! When IPOG extends the array with parameter `at_parameter`, every PC consisting solely of parameters before
//! `at_parameter` is combined with `at_parameter` to form the interactions that need covering.

#![deny(missing_docs, rustdoc::missing_crate_level_docs, future_incompatible)]

use common::Id;

#[cfg(test)]
mod test_gen;

/// The PCs of a system under test, ordered on the largest parameter in each PC.
///
/// # Example
/// ```
/// # use pc_list::PCList;
/// let pc_list = PCList::<u16>::new(3, 5);
/// assert_eq!(pc_list.len_for(3), 3);
/// assert_eq!(pc_list.get(4), &[1, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct PCList<ParameterId: Id> {
    /// The strength of the array these PCs are used for.
    pub strength: usize,

    /// The PCs, each with `strength - 1` parameters in ascending order.
    pub pcs: Vec<Vec<ParameterId>>,

    /// The number of PCs to consider for each `at_parameter`.
    ///
    /// Index with `at_parameter - strength`.
    /// A PC is considered when all of its parameters precede `at_parameter`.
    pub sizes: Vec<usize>,
}

impl<ParameterId: Id> PCList<ParameterId> {
    /// Generate the PCs for the given strength and number of parameters.
    pub fn new(strength: usize, parameter_count: usize) -> Self {
        debug_assert!(strength >= common::MIN_STRENGTH);
        debug_assert!(strength <= parameter_count);

        let pc_len = strength - 1;
        let mut pcs = Vec::with_capacity(calculate_length(strength, parameter_count - 1));
        let mut sizes = Vec::with_capacity(parameter_count - strength);

        for max_parameter in pc_len - 1..parameter_count - 1 {
            for mut pc in Combinations::new(max_parameter, pc_len - 1) {
                pc.push(max_parameter);
                pcs.push(pc.into_iter().map(ParameterId::from_usize).collect());
            }
            if max_parameter + 1 >= strength {
                sizes.push(pcs.len());
            }
        }

        Self { strength, pcs, sizes }
    }

    /// The total number of PCs.
    pub fn len(&self) -> usize {
        self.pcs.len()
    }

    /// Whether there are no PCs at all, which is the case when the strength equals the number of parameters.
    pub fn is_empty(&self) -> bool {
        self.pcs.is_empty()
    }

    /// The number of PCs to consider when extending the array with `at_parameter`.
    #[inline]
    pub fn len_for(&self, at_parameter: usize) -> usize {
        self.sizes[at_parameter - self.strength]
    }

    /// Get the PC with the given index.
    #[inline]
    pub fn get(&self, pc_id: usize) -> &[ParameterId] {
        &self.pcs[pc_id]
    }

    /// Get the parameters of the given PC as indices.
    pub fn parameters(&self, pc_id: usize) -> Vec<usize> {
        self.pcs[pc_id].iter().map(|parameter| parameter.as_usize()).collect()
    }
}

/// Iterate over all combinations of `size` elements drawn from `0..count` in lexicographic order.
///
/// # Example
/// ```
/// # use pc_list::Combinations;
/// let result: Vec<Vec<usize>> = Combinations::new(4, 2).collect();
/// assert_eq!(result, vec![vec![0, 1], vec![0, 2], vec![0, 3], vec![1, 2], vec![1, 3], vec![2, 3]]);
/// ```
#[derive(Debug, Clone)]
pub struct Combinations {
    count: usize,
    indices: Vec<usize>,
    done: bool,
}

impl Combinations {
    /// Start at the first combination.
    pub fn new(count: usize, size: usize) -> Self {
        Self { count, indices: (0..size).collect(), done: size > count }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.indices.clone();

        let size = self.indices.len();
        match (0..size).rev().find(|&index| self.indices[index] != index + self.count - size) {
            Some(index) => {
                self.indices[index] += 1;
                for next in index + 1..size {
                    self.indices[next] = self.indices[next - 1] + 1;
                }
            }
            None => self.done = true,
        }

        Some(result)
    }
}

/// Calculate the number of PCs that are considered for the provided `at_parameter`.
///
/// This is the binomial coefficient of `at_parameter` over `strength - 1`.
pub fn calculate_length(strength: usize, at_parameter: usize) -> usize {
    let mut pc_len = strength - 1;
    if pc_len > at_parameter {
        return 0;
    }
    if pc_len > at_parameter - pc_len {
        pc_len = at_parameter - pc_len;
    }

    let mut result = 1;
    for i in 0..pc_len {
        result *= at_parameter - i;
        result /= i + 1;
    }

    result
}
