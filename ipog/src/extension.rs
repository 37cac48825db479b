// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

//! This module contains the horizontal and vertical extensions performed for each parameter added by IPOG.

use std::marker::PhantomData;

use tracing::{debug, trace};

use cm::{CoverageMap, get_highscore};
use common::{Assignment, Id, sub_time_it, ValueGenerator};
use mca::MCA;
use pc_list::PCList;
use sut::Solver;

use crate::merge::{check_fill, merge, MergeOutcome};

/// The state shared by the extensions while adding a single parameter.
pub struct GrowthStep<'a, ValueId: Id, S: Solver<ValueId>> {
    /// The constraint checker.
    pub solver: &'a S,
    /// The number of values of each parameter.
    pub levels: &'a [ValueId],
    /// The parameter being added.
    pub at_parameter: usize,
    /// The PCs of the SUT.
    pub pc_list: &'a PCList<usize>,
    /// The array under construction.
    pub mca: &'a mut MCA<ValueId>,
    /// The interactions of `at_parameter` covered so far.
    pub coverage_map: &'a mut CoverageMap<ValueId>,
    /// Whether rows have to remain completable.
    pub lookahead: bool,
}

impl<'a, ValueId: Id, S: Solver<ValueId>> GrowthStep<'a, ValueId, S> {
    /// Mark the interactions of the seeds as covered.
    pub fn cover_seeds(&mut self) -> usize {
        let mut covered = 0;
        for row in self.mca.array[..self.mca.seeds].iter() {
            covered += self.coverage_map.set_covered_row(self.pc_list, row);
        }
        covered
    }

    /// Mark the interactions that can not be part of any valid row as covered.
    ///
    /// Returns the number of interactions dropped this way.
    pub fn filter_map(&mut self) -> usize {
        if !self.solver.has_constraints() {
            return 0;
        }

        let strength = self.pc_list.strength;
        let mut dropped = 0;
        let mut partial = vec![ValueId::dont_care(); self.levels.len()];

        for pc_id in 0..self.coverage_map.pc_count() {
            let mut parameters = self.pc_list.parameters(pc_id);
            parameters.push(self.at_parameter);

            for values in ValueGenerator::new(self.levels, &parameters).iter() {
                for (&parameter, &value) in parameters.iter().zip(values.iter()) {
                    partial[parameter] = value;
                }

                let excluded = self.solver.violates(&partial)
                    || (self.lookahead && !self.solver.is_satisfiable(&partial));
                if excluded {
                    let index = self.coverage_map.get_index(pc_id, &values[..strength - 1], values[strength - 1]);
                    if self.coverage_map.set_index(index) {
                        dropped += 1;
                    }
                }

                for &parameter in parameters.iter() {
                    partial[parameter] = ValueId::dont_care();
                }
            }
        }

        dropped
    }
}

/// This trait allows for the switching of various IPOG extension methods.
pub trait Extension<ValueId: Id> {
    /// Used for debugging purposes.
    const NAME: &'static str;

    /// Does the extension for the parameter of the given step.
    fn extend<S: Solver<ValueId>>(step: &mut GrowthStep<'_, ValueId, S>);
}

/// Do not do anything for the extension.
pub struct NOOPExtension;

impl<ValueId: Id> Extension<ValueId> for NOOPExtension {
    const NAME: &'static str = "NOOP";

    fn extend<S: Solver<ValueId>>(_step: &mut GrowthStep<'_, ValueId, S>) {}
}

/// Run and time the extension if the `sub-time` feature is set. Runs the extension if the feature is not set.
pub struct TimedExtension<SubExtension> {
    phantom: PhantomData<SubExtension>,
}

impl<ValueId: Id, SubExtension: Extension<ValueId>> Extension<ValueId> for TimedExtension<SubExtension> {
    const NAME: &'static str = SubExtension::NAME;

    fn extend<S: Solver<ValueId>>(step: &mut GrowthStep<'_, ValueId, S>) {
        sub_time_it!(SubExtension::extend(step), Self::NAME);
    }
}

/// Assign a value of the new parameter to existing rows, choosing the value covering the most interactions.
pub struct HorizontalExtension;

impl HorizontalExtension {
    fn get_best_value<ValueId: Id, S: Solver<ValueId>>(
        step: &GrowthStep<'_, ValueId, S>,
        row: &[ValueId],
        previous_value: usize,
        scores: &[Vec<usize>],
        blacklist: &mut [bool],
        uses: &[usize],
    ) -> Option<usize> {
        loop {
            let value = get_highscore(scores, uses, previous_value, blacklist)?;
            if scores[value].is_empty() {
                return None;
            }

            let fill = [Assignment::new(step.at_parameter, ValueId::from_usize(value))];
            match check_fill(step.solver, step.lookahead, row, &fill) {
                Ok(()) => return Some(value),
                Err(rejection) => {
                    trace!(value, ?rejection, "value rejected for horizontal extension");
                    blacklist[value] = true;
                }
            }
        }
    }
}

impl<ValueId: Id> Extension<ValueId> for HorizontalExtension {
    const NAME: &'static str = "HE";

    fn extend<S: Solver<ValueId>>(step: &mut GrowthStep<'_, ValueId, S>) {
        let at_parameter = step.at_parameter;
        let value_choices = step.coverage_map.value_choices();
        let mut scores = vec![Vec::new(); value_choices];
        let mut blacklist = vec![false; value_choices];
        let mut uses = vec![0; value_choices];
        let mut previous_value = value_choices - 1;
        let mut extended = 0;

        for row_id in step.mca.generated_rows() {
            if step.coverage_map.is_covered() {
                break;
            }
            if !step.mca.array[row_id][at_parameter].is_dont_care() {
                continue;
            }

            for score in scores.iter_mut() {
                score.clear();
            }
            step.coverage_map.get_high_score(step.pc_list, &step.mca.array[row_id], &mut scores);
            if scores.iter().all(Vec::is_empty) {
                continue;
            }

            for b in blacklist.iter_mut() {
                *b = false;
            }

            let best = Self::get_best_value(step, &step.mca.array[row_id], previous_value, &scores, &mut blacklist, &uses);
            if let Some(value) = best {
                step.mca.array[row_id][at_parameter] = ValueId::from_usize(value);
                uses[value] += 1;
                previous_value = value;
                step.coverage_map.set_indices(&scores[value]);
                extended += 1;
            }
        }

        debug!(at_parameter, extended, uncovered = step.coverage_map.uncovered, "horizontal extension done");
    }
}

/// Cover the remaining interactions by merging them into existing rows or by appending new rows.
pub struct VerticalExtension;

impl VerticalExtension {
    fn fit_in_row<ValueId: Id, S: Solver<ValueId>>(
        step: &mut GrowthStep<'_, ValueId, S>,
        assignments: &[Assignment<ValueId>],
    ) -> Option<MergeOutcome> {
        for row_id in step.mca.generated_rows() {
            let outcome = merge(step.at_parameter, assignments, &mut step.mca.array[row_id], step.solver, step.lookahead);
            if outcome.is_merged() {
                step.coverage_map.set_covered_row(step.pc_list, &step.mca.array[row_id]);
                return Some(outcome);
            }
        }
        None
    }
}

impl<ValueId: Id> Extension<ValueId> for VerticalExtension {
    const NAME: &'static str = "VE";

    fn extend<S: Solver<ValueId>>(step: &mut GrowthStep<'_, ValueId, S>) {
        let at_parameter = step.at_parameter;
        let strength = step.pc_list.strength;
        let (mut perfect, mut partial, mut appended) = (0, 0, 0);
        if step.coverage_map.is_covered() {
            return;
        }

        'pcs: for pc_id in 0..step.coverage_map.pc_count() {
            let mut parameters = step.pc_list.parameters(pc_id);
            parameters.push(at_parameter);

            let value_generator = ValueGenerator::new(step.levels, &parameters);
            let mut values = vec![ValueId::default(); strength];
            loop {
                let index = step.coverage_map.get_index(pc_id, &values[..strength - 1], values[strength - 1]);
                if !step.coverage_map.is_index_covered(index) {
                    let assignments: Vec<Assignment<ValueId>> = parameters
                        .iter()
                        .zip(values.iter())
                        .map(|(&parameter, &value)| Assignment::new(parameter, value))
                        .collect();

                    match Self::fit_in_row(step, &assignments) {
                        Some(MergeOutcome::Perfect) => perfect += 1,
                        Some(_) => partial += 1,
                        None => {
                            let row_id = step.mca.append_row(&assignments);
                            step.coverage_map.set_covered_row(step.pc_list, &step.mca.array[row_id]);
                            appended += 1;
                        }
                    }

                    if step.coverage_map.is_covered() {
                        break 'pcs;
                    }
                }

                if !value_generator.next_values(&mut values) {
                    break;
                }
            }
        }

        debug!(at_parameter, perfect, partial, appended, "vertical extension done");
    }
}
