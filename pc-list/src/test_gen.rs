// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

use itertools::Itertools;

use super::*;

#[test]
fn test_generate_pc_list_3_5() {
    let result = PCList::<usize>::new(3, 5);
    assert_eq!(result.pcs.len(), 6);
    assert_eq!(calculate_length(3, 4), 6);

    assert_eq!(result.pcs, vec![[0, 1], [0, 2], [1, 2], [0, 3], [1, 3], [2, 3]]);
    assert_eq!(result.sizes, vec![3, 6]);
    assert_eq!(result.len_for(3), 3);
    assert_eq!(result.len_for(4), 6);
}

#[test]
fn test_generate_pc_list_2_5() {
    let result = PCList::<u8>::new(2, 5);
    assert_eq!(calculate_length(2, 4), 4);
    assert_eq!(result.pcs.len(), 4);

    assert_eq!(result.pcs, vec![[0], [1], [2], [3]]);
    assert_eq!(result.sizes, vec![2, 3, 4]);
}

#[test]
fn test_generate_pc_list_6_8() {
    let result = PCList::<usize>::new(6, 8);
    assert_eq!(result.pcs.len(), 21);
    assert_eq!(calculate_length(6, 7), 21);

    let check = vec![
        [0, 1, 2, 3, 4],
        [0, 1, 2, 3, 5],
        [0, 1, 2, 4, 5],
        [0, 1, 3, 4, 5],
        [0, 2, 3, 4, 5],
        [1, 2, 3, 4, 5],
        [0, 1, 2, 3, 6],
        [0, 1, 2, 4, 6],
        [0, 1, 2, 5, 6],
        [0, 1, 3, 4, 6],
        [0, 1, 3, 5, 6],
        [0, 1, 4, 5, 6],
        [0, 2, 3, 4, 6],
        [0, 2, 3, 5, 6],
        [0, 2, 4, 5, 6],
        [0, 3, 4, 5, 6],
        [1, 2, 3, 4, 6],
        [1, 2, 3, 5, 6],
        [1, 2, 4, 5, 6],
        [1, 3, 4, 5, 6],
        [2, 3, 4, 5, 6],
    ];

    assert_eq!(result.pcs, check);
    assert_eq!(result.sizes, vec![6, 21]);
}

#[test]
fn test_generate_pc_list_3_14() {
    let result = PCList::<u16>::new(3, 14);
    assert_eq!(result.len(), calculate_length(3, 13));

    for at_parameter in 3..14 {
        let considered = result.len_for(at_parameter);
        assert_eq!(considered, calculate_length(3, at_parameter));

        let expected: Vec<Vec<u16>> = (0..at_parameter as u16).combinations(2).collect();
        let mut actual = result.pcs[..considered].to_vec();
        actual.sort();
        assert_eq!(actual, expected);
    }
}

#[test]
fn test_strength_equals_parameters() {
    let result = PCList::<usize>::new(3, 3);
    assert_eq!(result.pcs, vec![[0, 1]]);
    assert!(result.sizes.is_empty());
}

#[test]
fn test_combinations() {
    assert_eq!(Combinations::new(3, 0).collect::<Vec<_>>(), vec![Vec::<usize>::new()]);
    assert_eq!(Combinations::new(2, 3).count(), 0);
    assert_eq!(Combinations::new(3, 3).collect::<Vec<_>>(), vec![vec![0, 1, 2]]);
    assert_eq!(
        Combinations::new(6, 3).collect::<Vec<_>>(),
        (0..6).combinations(3).collect::<Vec<_>>(),
    );
}

#[test]
fn test_calculate_length() {
    assert_eq!(calculate_length(2, 0), 0);
    assert_eq!(calculate_length(3, 1), 0);
    assert_eq!(calculate_length(3, 2), 1);
    assert_eq!(calculate_length(4, 10), 120);
}
