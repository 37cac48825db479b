// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

use lazy_static::lazy_static;

use common::{Id, ValueGenerator};
use pc_list::PCList;

use crate::{BIT_SHIFT, CoverageMap, get_highscore};

const STRENGTH: usize = 3;
const LEVELS: [usize; 6] = [2, 3, 2, 2, 4, 3];
const DC: usize = !0;

lazy_static! {
    static ref PC_LIST: PCList<usize> = PCList::new(STRENGTH, LEVELS.len());
}

fn new_map(at_parameter: usize) -> CoverageMap<usize> {
    let mut cm = CoverageMap::new(LEVELS.to_vec(), &PC_LIST);
    cm.initialise(at_parameter);
    cm
}

#[test]
fn test_indices_are_sequential() {
    for at_parameter in STRENGTH..LEVELS.len() {
        let cm = new_map(at_parameter);
        let mut expected = 0;

        for pc_id in 0..cm.pc_count() {
            let mut parameters = PC_LIST.parameters(pc_id);
            parameters.push(at_parameter);
            for values in ValueGenerator::new(&LEVELS, &parameters).iter() {
                let (pc_values, value) = values.split_at(STRENGTH - 1);
                assert_eq!(cm.get_index(pc_id, pc_values, value[0]), expected);
                expected += 1;
            }
        }

        assert_eq!(expected, cm.total());
        assert_eq!(cm.uncovered, cm.total());
        assert_eq!(cm.map.len(), (cm.total() >> BIT_SHIFT) + 1);
    }
}

#[test]
fn test_initialise_sizes() {
    let cm = new_map(3);
    assert_eq!(cm.pc_count(), 3);
    assert_eq!(cm.value_choices(), 2);
    assert_eq!(cm.total(), (2 * 3 + 2 * 2 + 3 * 2) * 2);

    let cm = new_map(5);
    assert_eq!(cm.pc_count(), 10);
    assert_eq!(cm.value_choices(), 3);
}

#[test]
fn test_set_covered_row() {
    let mut cm = new_map(3);
    let total = cm.total();

    assert_eq!(cm.set_covered_row(&PC_LIST, &[0, 1, 1, DC, DC, DC]), 0);
    assert_eq!(cm.uncovered, total);

    assert_eq!(cm.set_covered_row(&PC_LIST, &[0, 1, 1, 1, DC, DC]), 3);
    assert_eq!(cm.uncovered, total - 3);
    assert_eq!(cm.set_covered_row(&PC_LIST, &[0, 1, 1, 1, DC, DC]), 0);

    assert_eq!(cm.set_covered_row(&PC_LIST, &[0, DC, 1, 1, DC, DC]), 0);
    assert_eq!(cm.set_covered_row(&PC_LIST, &[1, DC, 1, 1, DC, DC]), 1);
    assert_eq!(cm.uncovered, total - 4);

    let index = cm.get_index(0, &[0, 1], 1);
    assert!(cm.is_index_covered(index));
    assert!(!cm.is_index_covered(index - 1));
}

#[test]
fn test_cover_everything() {
    let mut cm = new_map(4);
    for row in ValueGenerator::new(&LEVELS, &[0, 1, 2, 3, 4]).iter() {
        let mut row = row;
        row.push(DC);
        cm.set_covered_row(&PC_LIST, &row);
    }
    assert!(cm.is_covered());
}

#[test]
fn test_get_high_score() {
    let mut cm = new_map(3);
    let row = [1, 2, 0, DC, DC, DC];

    let mut scores = vec![Vec::new(); cm.value_choices()];
    cm.get_high_score(&PC_LIST, &row, &mut scores);
    assert_eq!(scores[0].len(), 3);
    assert_eq!(scores[1].len(), 3);

    assert_eq!(cm.set_indices(&scores[0]), 3);
    assert_eq!(cm.set_indices(&scores[0]), 0);

    let mut scores = vec![Vec::new(); cm.value_choices()];
    cm.get_high_score(&PC_LIST, &row, &mut scores);
    assert!(scores[0].is_empty());
    assert_eq!(scores[1].len(), 3);

    let mut scores = vec![Vec::new(); cm.value_choices()];
    cm.get_high_score(&PC_LIST, &[1, usize::dont_care(), 0, DC, DC, DC], &mut scores);
    assert_eq!(scores[1].len(), 1);
}

#[test]
fn test_get_highscore() {
    let scores = vec![vec![1], vec![1, 2], vec![1, 2]];
    assert_eq!(get_highscore(&scores, &[0, 0, 0], 0, &[false; 3]), Some(1));
    assert_eq!(get_highscore(&scores, &[0, 1, 0], 0, &[false; 3]), Some(2));
    assert_eq!(get_highscore(&scores, &[0, 0, 0], 1, &[false; 3]), Some(2));
    assert_eq!(get_highscore(&scores, &[0, 0, 0], 0, &[false, true, false]), Some(2));
    assert_eq!(get_highscore(&scores, &[0, 0, 0], 0, &[false, true, true]), Some(0));
    assert_eq!(get_highscore(&scores, &[0, 0, 0], 0, &[true; 3]), None);

    let empty = vec![Vec::new(); 3];
    assert_eq!(get_highscore(&empty, &[0, 0, 0], 2, &[false; 3]), Some(0));
}
