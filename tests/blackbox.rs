// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

use std::fs::{read_to_string, remove_file, write};
use std::path::PathBuf;
use std::process::Command;

use itertools::Itertools;
use lazy_static::lazy_static;
use proptest::prelude::*;
use proptest::sample::Index;

use tway::ipog::IpogConfig;
use tway::mca::{MCA, UnsatisfiablePolicy};
use tway::sut::{NoConstraints, Solver, SUT, SutError};
use tway::{Error, generate, generate_sut, generate_with, generate_with_config};

const TCAS: &str = "\
p0: 1, 0;
p1: 0, 1;
p2: 0, 1;
p3: 1, 0;
p4: 0, 1;
p5: 0, 1;
p6: 1, 0;
p7: 0, 1, 2;
p8: 0, 1, 2;
p9: 0, 1, 2, 3;
p10: 0, 1, 2, 3, 4, 5, 6, 7, 8, 9;
p11: 0, 1, 2, 3, 4, 5, 6, 7, 8, 9;

$forbid p3=0, p6=1;
$forbid p7=0, p0=0;
$forbid p6=0, p0=1;
";

lazy_static! {
    static ref TCAS_SUT: SUT<String> = tway::sut::parse(TCAS).unwrap();
}

const WILD: Option<usize> = None;

fn levels_to_parameters(levels: &[usize]) -> Vec<Vec<usize>> {
    levels.iter().map(|&level| (0..level).collect()).collect()
}

fn to_mca(parameter_count: usize, rows: Vec<Vec<usize>>) -> MCA<usize> {
    let mut mca = MCA::new(parameter_count);
    rows.into_iter().for_each(|row| {
        mca.push_row(row);
    });
    mca
}

/// The number of interactions of the given strength that are not excluded by the constraints.
fn required_interactions<S: Solver<usize>>(levels: &[usize], strength: usize, solver: &S) -> usize {
    let mut count = 0;
    for parameters in (0..levels.len()).combinations(strength) {
        for values in parameters.iter().map(|&parameter| 0..levels[parameter]).multi_cartesian_product() {
            let mut partial = vec![usize::MAX; levels.len()];
            for (&parameter, &value) in parameters.iter().zip(values.iter()) {
                partial[parameter] = value;
            }
            if !solver.violates(&partial) && solver.is_satisfiable(&partial) {
                count += 1;
            }
        }
    }
    count
}

fn assert_invalid<T: std::fmt::Debug>(result: Result<T, Error>, expected: SutError) {
    match result {
        Err(Error::InvalidArgument(error)) => assert_eq!(error, expected),
        other => panic!("Expected {:?}, got {:?}", expected, other),
    }
}

#[test]
fn argument_validation() {
    let parameters = vec![vec![0, 1], vec![0, 1], vec![0, 1]];
    assert_invalid(generate(0, &parameters), SutError::StrengthTooLow(0));
    assert_invalid(generate(1, &parameters), SutError::StrengthTooLow(1));
    assert_invalid(generate::<usize>(2, &[]), SutError::TooFewParameters(0));
    assert_invalid(generate(2, &[vec![0, 1]]), SutError::TooFewParameters(1));
    assert_invalid(generate::<usize>(3, &[vec![], vec![]]), SutError::StrengthTooHigh { strength: 3, parameters: 2 });
    assert_invalid(generate(4, &parameters), SutError::StrengthTooHigh { strength: 4, parameters: 3 });
    assert_invalid(generate(2, &[vec![0, 1], vec![]]), SutError::EmptyDomain(1));
}

#[test]
fn constraint_and_seed_validation() {
    let parameters = vec![vec!["a", "b"], vec!["x", "y"], vec!["0", "1"]];

    assert!(matches!(
        generate_with(2, &parameters, &[vec![Some(0), None]], &[]),
        Err(Error::InvalidArgument(SutError::LengthMismatch { index: 0, expected: 3, actual: 2, .. }))
    ));
    assert!(matches!(
        generate_with(2, &parameters, &[vec![Some(0), Some(2), None]], &[]),
        Err(Error::InvalidArgument(SutError::ValueOutOfRange { index: 0, parameter: 1, value: 2, level: 2, .. }))
    ));
    assert_invalid(generate_with(2, &parameters, &[vec![WILD, WILD, WILD]], &[]), SutError::EmptyConstraint(0));
    assert!(matches!(
        generate_with(2, &parameters, &[], &[vec!["a", "x"]]),
        Err(Error::InvalidArgument(SutError::LengthMismatch { index: 0, expected: 3, actual: 2, .. }))
    ));
    assert_invalid(
        generate_with(2, &parameters, &[], &[vec!["a", "z", "0"]]),
        SutError::UnknownSeedValue { seed: 0, parameter: 1 },
    );
    assert_invalid(
        generate_with(2, &parameters, &[vec![Some(0), None, Some(1)]], &[vec!["b", "x", "1"], vec!["a", "y", "1"]]),
        SutError::SeedViolatesConstraint { seed: 1, constraint: 0 },
    );
}

#[test]
fn base_order() {
    let rows = generate(2, &[vec![1, 2], vec![3, 4]]).unwrap();
    assert_eq!(rows, vec![vec![1, 3], vec![1, 4], vec![2, 3], vec![2, 4]]);
}

#[test]
fn heterogeneous_values() {
    #[derive(Debug, Clone, PartialEq)]
    enum Value {
        Flag(bool),
        Size(u32),
        Name(&'static str),
    }

    let parameters = vec![
        vec![Value::Flag(false), Value::Flag(true)],
        vec![Value::Size(1), Value::Size(1024), Value::Size(1 << 20)],
        vec![Value::Name("alpha"), Value::Name("beta")],
    ];
    let rows = generate(2, &parameters).unwrap();
    assert_eq!(rows.len(), 6);
    for row in rows.iter() {
        assert!(matches!(row[0], Value::Flag(_)));
        assert!(matches!(row[1], Value::Size(_)));
        assert!(matches!(row[2], Value::Name(_)));
    }
    for (first, second) in [(0, 1), (0, 2), (1, 2)] {
        let pairs = rows.iter().map(|row| (row[first].clone(), row[second].clone())).collect_vec();
        let expected = parameters[first].len() * parameters[second].len();
        assert_eq!(pairs.iter().map(|pair| format!("{:?}", pair)).unique().count(), expected);
    }
}

#[test]
fn constraints_and_seeds() {
    let parameters = vec![vec!["a", "b"], vec!["x", "y"], vec!["0", "1", "2", "3"]];
    let constraints = vec![vec![Some(0), None, Some(2)], vec![Some(0), Some(1), Some(0)]];
    let seeds = vec![vec!["a", "x", "0"]];
    let rows = generate_with(3, &parameters, &constraints, &seeds).unwrap();

    assert_eq!(rows.len(), 13);
    assert_eq!(rows[0], vec!["a", "x", "0"]);
    assert!(!rows.iter().any(|row| row[0] == "a" && row[2] == "2"));
    assert!(!rows.iter().any(|row| row == &vec!["a", "y", "0"]));
    assert!(rows.iter().any(|row| row == &vec!["b", "y", "2"]));
}

fn combined_constraints() -> Vec<Vec<Option<usize>>> {
    vec![
        vec![Some(0), Some(1), Some(0), WILD, WILD],
        vec![Some(0), Some(1), WILD, WILD, WILD],
        vec![Some(1), Some(1), WILD, WILD, WILD],
        vec![Some(0), WILD, WILD, WILD, Some(3)],
    ]
}

#[test]
fn unsatisfiable_policy() {
    let parameters = levels_to_parameters(&[2, 2, 2, 3, 4]);
    let constraints = combined_constraints();

    let config = IpogConfig::new(3);
    let rows = generate_with_config(&parameters, &constraints, &[], &config).unwrap();
    assert_eq!(rows.len(), 24);

    let config = config.lookahead(false);
    match generate_with_config(&parameters, &constraints, &[], &config) {
        Err(Error::UnsatisfiableConstraintSet(error)) => assert_eq!((error.row, error.parameter), (21, 0)),
        other => panic!("Expected an unsatisfiable constraint set, got {:?}", other),
    }

    let config = config.unsatisfiable(UnsatisfiablePolicy::Drop);
    let rows = generate_with_config(&parameters, &constraints, &[], &config).unwrap();
    assert_eq!(rows.len(), 21);
    assert!(rows.iter().all(|row| row[1] == 0 && !(row[0] == 0 && row[4] == 3)));
}

#[test]
fn lookahead_covers_feasible_interactions() {
    let mut sut = SUT::new(levels_to_parameters(&[2, 2, 2, 3, 4]));
    combined_constraints().into_iter().for_each(|constraint| sut.add_constraint(constraint).unwrap());

    let mca = generate_sut(&sut, &IpogConfig::new(3)).unwrap();
    assert_eq!(mca.check_coverage(&sut.levels::<usize>(), 3, &sut.get_solver::<usize>(), true), Ok(()));
}

#[test]
fn tcas() {
    assert_eq!(TCAS_SUT.parameters, vec![2, 2, 2, 2, 2, 2, 2, 3, 3, 4, 10, 10]);
    assert_eq!(TCAS_SUT.count_constraints(), 3);

    let levels = TCAS_SUT.levels::<usize>();
    let solver = TCAS_SUT.get_solver::<usize>();
    for strength in 2..=3 {
        let mca = generate_sut(&*TCAS_SUT, &IpogConfig::new(strength)).unwrap();
        assert_eq!(mca.check_coverage(&levels, strength, &solver, true), Ok(()));
    }

    let mut unconstrained = TCAS_SUT.clone();
    unconstrained.clear_constraints();
    let mca = generate_sut(&unconstrained, &IpogConfig::new(2)).unwrap();
    assert_eq!(mca.check_coverage(&levels, 2, &NoConstraints, true), Ok(()));
}

#[test]
fn parameters_keep_their_order() {
    let parameters = vec![vec!["a", "b"], vec!["c", "d"], vec!["e", "f"], vec!["x", "y", "z"]];
    let rows = generate(3, &parameters).unwrap();
    assert_eq!(rows.len(), 12);
    for row in rows.iter() {
        for (value, domain) in row.iter().zip(parameters.iter()) {
            assert!(domain.contains(value), "{:?}", row);
        }
    }

    let config = IpogConfig::new(3).sort_parameters(false);
    let rows = generate_with_config(&parameters, &[], &[], &config).unwrap();
    assert_eq!(rows.len(), 14);
}

#[test]
fn wide_domains() {
    let parameters = vec![(0..300).collect_vec(), vec![0, 1], vec![0, 1]];
    let rows = generate(2, &parameters).unwrap();
    assert_eq!(rows.len(), 600);
    assert_eq!(rows.iter().map(|row| (row[0], row[1])).unique().count(), 600);
}

#[test]
fn deterministic() {
    let config = IpogConfig::new(2);
    assert_eq!(
        generate_sut(&*TCAS_SUT, &config).unwrap(),
        generate_sut(&*TCAS_SUT, &config).unwrap()
    );

    let parameters = levels_to_parameters(&[2, 3, 2, 4]);
    let constraints = vec![vec![Some(0), Some(2), WILD, WILD]];
    let seeds = vec![vec![1, 2, 0, 3]];
    assert_eq!(
        generate_with(3, &parameters, &constraints, &seeds).unwrap(),
        generate_with(3, &parameters, &constraints, &seeds).unwrap()
    );
}

#[test]
fn many_parameters_with_constraints() {
    let mut zero = vec![WILD; 48];
    zero[0] = Some(0);
    zero[47] = Some(0);
    let mut one = zero.clone();
    one[47] = Some(1);

    let rows = generate_with(2, &levels_to_parameters(&[2; 48]), &[zero, one], &[]).unwrap();
    assert!(rows.iter().all(|row| row[0] == 1));
}

fn temporary_file(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("tway-{}-{}", std::process::id(), name))
}

#[test]
fn binaries() {
    let input = temporary_file("tcas.txt");
    let output = temporary_file("result.txt");
    write(&input, TCAS).unwrap();

    let status = Command::new(env!("CARGO_BIN_EXE_tway"))
        .arg(&input)
        .args(["--strength", "2", "--constraints", "--output"])
        .arg(&output)
        .status()
        .unwrap();
    assert!(status.success());

    let result = read_to_string(&output).unwrap();
    assert!(result.starts_with("#"));
    assert!(result.contains("p0,p1,p2,p3,p4,p5,p6,p7,p8,p9,p10,p11\n"));

    let check = |strength: &str, constraints: &str| {
        Command::new(env!("CARGO_BIN_EXE_check-ca"))
            .arg(&input)
            .args(["--strength", strength, constraints, "--output"])
            .arg(&output)
            .status()
            .unwrap()
    };
    assert!(check("2", "-c").success());
    assert!(!check("3", "-c").success());
    assert!(!check("2", "-n").success());

    remove_file(&input).unwrap();
    remove_file(&output).unwrap();
}

fn system() -> impl Strategy<Value = (usize, Vec<usize>, Vec<Vec<Option<usize>>>, Vec<usize>)> {
    prop::collection::vec(1usize..=4, 2..=6).prop_flat_map(|levels| {
        let parameter_count = levels.len();
        (
            2..=parameter_count.min(3),
            Just(levels),
            prop::collection::vec((0..parameter_count, 0..parameter_count, any::<Index>(), any::<Index>()), 0..4),
            prop::collection::vec(any::<Index>(), parameter_count),
        )
            .prop_map(|(strength, levels, pairs, seed)| {
                let constraints = pairs
                    .into_iter()
                    .filter(|(first, second, _, _)| first != second)
                    .map(|(first, second, first_value, second_value)| {
                        let mut constraint = vec![None; levels.len()];
                        constraint[first] = Some(first_value.index(levels[first]));
                        constraint[second] = Some(second_value.index(levels[second]));
                        constraint
                    })
                    .collect();
                let seed = seed.iter().zip(levels.iter()).map(|(index, &level)| index.index(level)).collect();
                (strength, levels, constraints, seed)
            })
    })
}

fn matches(constraint: &[Option<usize>], row: &[usize]) -> bool {
    constraint.iter().zip(row.iter()).all(|(required, value)| required.map_or(true, |required| required == *value))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn unconstrained_coverage((strength, levels, _, _) in system()) {
        let rows = generate(strength, &levels_to_parameters(&levels)).unwrap();
        let mca = to_mca(levels.len(), rows);
        prop_assert_eq!(mca.check_coverage(&levels, strength, &NoConstraints, true), Ok(()));
    }

    #[test]
    fn constrained_coverage((strength, levels, constraints, _) in system()) {
        let rows = generate_with(strength, &levels_to_parameters(&levels), &constraints, &[]).unwrap();
        for row in rows.iter() {
            prop_assert!(!constraints.iter().any(|constraint| matches(constraint, row)), "{:?}", row);
        }

        let mut sut = SUT::new(levels_to_parameters(&levels));
        for constraint in constraints {
            sut.add_constraint(constraint).unwrap();
        }
        let mca = to_mca(levels.len(), rows);
        prop_assert_eq!(mca.check_coverage(&levels, strength, &sut.get_solver::<usize>(), true), Ok(()));
    }

    #[test]
    fn seeds_are_kept((strength, levels, constraints, seed) in system()) {
        let constraints = constraints.into_iter().filter(|constraint| !matches(constraint, &seed)).collect_vec();
        let parameters = levels_to_parameters(&levels);
        let rows = generate_with(strength, &parameters, &constraints, &[seed.clone()]).unwrap();
        prop_assert_eq!(&rows[0], &seed);
    }

    #[test]
    fn constraints_never_add_interactions((strength, levels, constraints, _) in system()) {
        let mut sut = SUT::new(levels_to_parameters(&levels));
        let mut previous = required_interactions(&levels, strength, &sut.get_solver::<usize>());
        for constraint in constraints {
            sut.add_constraint(constraint).unwrap();
            let required = required_interactions(&levels, strength, &sut.get_solver::<usize>());
            prop_assert!(required <= previous);
            previous = required;
        }
    }
}
