// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

//! This module provides the [CoverageMap] used during each iteration of IPOG.
//!
//! Each interaction of a PC with the parameter being added gets a unique index.
//! The index of an interaction is calculated by treating the values of the PC as a mixed radix number, offset by the
//! number of interactions of all preceding PCs, and multiplying by the number of values of the new parameter.
//! Adding the value of the new parameter then gives the final index.

#![deny(missing_docs, rustdoc::missing_crate_level_docs, future_incompatible)]

use std::cmp::max;

use common::Id;
use pc_list::PCList;

#[cfg(test)]
mod test_map;

/// This the type of the elements of the map.
pub type BitArray = u64;

/// The mask used to get the index of the specific bit in the array. This is the [usize] version.
pub const BIT_MASK_U: usize = std::mem::size_of::<BitArray>() * 8 - 1;
/// The mask used to get the index of the specific bit in the array. This is the [BitArray] version.
pub const BIT_MASK: BitArray = BIT_MASK_U as BitArray;
/// The number of bits to shift to get the index of the element in the map.
pub const BIT_SHIFT: usize = BIT_MASK_U.count_ones() as usize;

/// Get the highest scoring value while skipping the blacklisted values.
///
/// The values are visited starting at `previous_value + 1`, cycling around.
/// A value replaces the current best when it covers more interactions, or as many interactions while being used less
/// often. Returns [None] when every value is blacklisted.
pub fn get_highscore(
    scores: &[Vec<usize>],
    uses: &[usize],
    previous_value: usize,
    blacklist: &[bool],
) -> Option<usize> {
    debug_assert_eq!(scores.len(), blacklist.len());
    debug_assert_eq!(scores.len(), uses.len());
    let value_choices = scores.len();

    let mut best: Option<usize> = None;
    for offset in 1..=value_choices {
        let value = (previous_value + offset) % value_choices;
        if blacklist[value] {
            continue;
        }
        best = match best {
            Some(high_value) => {
                let high_score = scores[high_value].len();
                let value_score = scores[value].len();
                if high_score < value_score || (high_score == value_score && uses[value] < uses[high_value]) {
                    Some(value)
                } else {
                    Some(high_value)
                }
            }
            None => Some(value),
        };
    }

    best
}

/// This is the Coverage Map used during the iterations of IPOG.
///
/// Use [CoverageMap::initialise] at the start of each iteration.
///
/// Check whether all interactions are covered using [CoverageMap::is_covered].
///
/// # Examples
/// ```
/// # use cm::CoverageMap;
/// # use pc_list::PCList;
/// let at_parameter = 5;
/// let levels = vec![4u8, 3, 3, 3, 3, 2, 2];
/// let pc_list = PCList::<usize>::new(4, levels.len());
/// let mut coverage_map = CoverageMap::new(levels, &pc_list);
///
/// coverage_map.initialise(at_parameter);
/// assert!(coverage_map.set_covered_row(&pc_list, &[0, 0, 0, 0, 0, 0, 0]) > 0);
/// ```
#[derive(Default, Clone, Debug)]
pub struct CoverageMap<ValueId: Id> {
    /// This is the collection of bit arrays.
    pub map: Vec<BitArray>,

    /// This vector contains the values used to calculate the indices.
    ///
    /// Each PC in the [PCList] has a row at the same index.
    /// The first element is the absolute offset for the PC.
    /// The next elements are the relative offsets for each value in the PC, except the last value which has a
    /// relative offset of one.
    /// See [CoverageMap::get_base_index] for more details.
    ///
    /// Will be generated once in [CoverageMap::new] and is reused throughout the generation.
    pub sizes: Vec<Vec<usize>>,
    sizes_len: usize,
    all_sizes_len: Vec<usize>,
    strength: usize,
    at_parameter: usize,

    /// The number of interactions left to cover.
    pub uncovered: usize,
    total: usize,
    levels: Vec<ValueId>,
    value_choices: usize,
}

impl<ValueId: Id> CoverageMap<ValueId> {
    /// Create a new [CoverageMap] for the provided levels.
    ///
    /// It is assumed that the provided [PCList] is created for the same number of parameters.
    pub fn new<ParameterId: Id>(levels: Vec<ValueId>, pc_list: &PCList<ParameterId>) -> Self {
        let pc_len = pc_list.strength - 1;
        let mut offset = 0;
        let mut sizes = Vec::with_capacity(pc_list.len() + 1);

        for pc in pc_list.pcs.iter() {
            let mut sub_sizes = vec![0; pc_len];
            sub_sizes[0] = offset;
            let mut vec_size = levels[pc[pc_len - 1].as_usize()].as_usize();
            for pc_index in (0..pc_len - 1).rev() {
                sub_sizes[pc_index + 1] = vec_size;
                vec_size *= levels[pc[pc_index].as_usize()].as_usize();
            }

            offset += vec_size;
            sizes.push(sub_sizes);
        }

        sizes.push(vec![offset]);

        let mut max_coverage_map = 0;
        for (value_count, pc_list_len) in levels.iter().skip(pc_list.strength).zip(pc_list.sizes.iter()) {
            max_coverage_map = max(max_coverage_map, value_count.as_usize() * sizes[*pc_list_len][0]);
        }

        Self {
            map: Vec::with_capacity((max_coverage_map >> BIT_SHIFT) + 1),
            sizes,
            sizes_len: 0,
            all_sizes_len: pc_list.sizes.clone(),
            strength: pc_list.strength,
            at_parameter: 0,
            uncovered: 0,
            total: 0,
            levels,
            value_choices: 0,
        }
    }

    /// Initialise the [CoverageMap] for the (next) iteration of IPOG.
    pub fn initialise(&mut self, at_parameter: usize) {
        debug_assert!(at_parameter < self.levels.len());
        self.at_parameter = at_parameter;
        self.value_choices = self.levels[at_parameter].as_usize();
        self.sizes_len = self.all_sizes_len[at_parameter - self.strength];
        self.total = self.sizes[self.sizes_len][0] * self.value_choices;
        self.uncovered = self.total;

        self.map.clear();
        self.map.resize((self.total >> BIT_SHIFT) + 1, 0);
    }

    /// The number of PCs considered in the current iteration.
    #[inline]
    pub fn pc_count(&self) -> usize {
        self.sizes_len
    }

    /// The number of values of the parameter added in the current iteration.
    #[inline]
    pub fn value_choices(&self) -> usize {
        self.value_choices
    }

    /// The number of interactions of the current iteration.
    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Whether the interaction with the given index is covered.
    #[inline]
    pub fn is_index_covered(&self, index: usize) -> bool {
        let bit_index = 1 << (index & BIT_MASK_U);
        self.map[index >> BIT_SHIFT] & bit_index != 0
    }

    /// Returns true iff all interactions are covered.
    #[inline]
    pub fn is_covered(&self) -> bool {
        self.uncovered == 0
    }

    /// Sets the given index. If the index was already covered, then return `false`.
    /// Otherwise decrease [CoverageMap::uncovered] and return `true`.
    #[inline]
    pub fn set_index(&mut self, index: usize) -> bool {
        let array = &mut self.map[index >> BIT_SHIFT];
        let bit = 1 << (index & BIT_MASK_U);
        if *array & bit == 0 {
            *array |= bit;
            self.uncovered -= 1;
            true
        } else {
            false
        }
    }

    /// Set all the indices as covered, returning the number of indices that were not covered yet.
    pub fn set_indices(&mut self, indices: &[usize]) -> usize {
        indices.iter().filter(|&&index| self.set_index(index)).count()
    }

    /// Set all the interactions in the row as covered.
    ///
    /// Interactions involving a `dont_care` value are skipped.
    /// Returns the number of interactions that were not covered before.
    pub fn set_covered_row<ParameterId: Id>(&mut self, pc_list: &PCList<ParameterId>, row: &[ValueId]) -> usize {
        let value = row[self.at_parameter];
        if value.is_dont_care() {
            return 0;
        }
        let mut result = 0;
        for pc_id in 0..self.sizes_len {
            if let Some(base_index) = self.get_base_index(pc_id, pc_list, row) {
                if self.set_index(base_index + value.as_usize()) {
                    result += 1;
                }
            }
        }
        result
    }

    /// Collect the uncovered indices each value would cover if it were chosen for the given row.
    ///
    /// The `scores` should contain an empty vector for each value of the parameter being added.
    pub fn get_high_score<ParameterId: Id>(
        &self,
        pc_list: &PCList<ParameterId>,
        row: &[ValueId],
        scores: &mut [Vec<usize>],
    ) {
        debug_assert_eq!(scores.len(), self.value_choices);
        for pc_id in 0..self.sizes_len {
            if let Some(mut base_index) = self.get_base_index(pc_id, pc_list, row) {
                for score in scores.iter_mut() {
                    if !self.is_index_covered(base_index) {
                        score.push(base_index);
                    }
                    base_index += 1;
                }
            }
        }
    }

    /// Get the base index for an interaction given a parameter_combination and a row.
    ///
    /// Returns [None] if one of the values of the PC in the row is a `dont_care`.
    #[inline]
    pub fn get_base_index<ParameterId: Id>(
        &self,
        pc_id: usize,
        pc_list: &PCList<ParameterId>,
        row: &[ValueId],
    ) -> Option<usize> {
        let sizes = &self.sizes[pc_id];
        let pc = pc_list.get(pc_id);
        let last = pc.len() - 1;

        let mut base_index = sizes[0];
        for index in 1..=last {
            let value = row[pc[index - 1].as_usize()];
            if value.is_dont_care() {
                return None;
            }
            base_index += value.as_usize() * sizes[index];
        }
        let value = row[pc[last].as_usize()];
        if value.is_dont_care() {
            return None;
        }
        base_index += value.as_usize();

        Some(base_index * self.value_choices)
    }

    /// Get the index of the interaction of the given PC with the given values and the value of the new parameter.
    ///
    /// Iterating the values of the PC followed by the new value in odometer order visits consecutive indices.
    #[inline]
    pub fn get_index(&self, pc_id: usize, pc_values: &[ValueId], value: ValueId) -> usize {
        let sizes = &self.sizes[pc_id];
        let last = pc_values.len() - 1;

        let mut base_index = sizes[0];
        for index in 1..=last {
            base_index += pc_values[index - 1].as_usize() * sizes[index];
        }
        base_index += pc_values[last].as_usize();

        base_index * self.value_choices + value.as_usize()
    }
}
