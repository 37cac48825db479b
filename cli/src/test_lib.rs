// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

use std::fs::write;

use super::*;

fn arguments(args: &[&str]) -> Result<Arguments, String> {
    parse_arguments_from("tway", "test", args)
}

#[test]
fn test_validate_strength() {
    assert!(arguments(&["exe", "-s", "2", "ignored", "-c"]).is_ok());
    assert!(arguments(&["exe", "-s", "8", "ignored", "-n"]).is_ok());
    assert!(arguments(&["exe", "-s", "13", "ignored", "-n"]).is_ok());
    assert!(arguments(&["exe", "-s", "0", "ignored", "-c"]).is_err());
    assert!(arguments(&["exe", "-s", "1", "ignored", "-n"]).is_err());
    assert!(arguments(&["exe", "-s", "a", "ignored", "-c"]).is_err());
    assert!(arguments(&["exe", "-s", " ", "ignored", "-n"]).is_err());
}

#[test]
fn test_required() {
    assert!(arguments(&["exe", "-s", "2", "ignored"]).is_err());
    assert!(arguments(&["exe", "-s", "2", "ignored", "-c", "-n"]).is_err());
    assert!(arguments(&["exe", "ignored", "-c"]).is_err());
    assert!(arguments(&["exe", "-s", "2", "-c"]).is_err());
    assert!(arguments(&["exe", "-s", "2", "same.txt", "-o", "same.txt", "-c"]).is_err());
}

#[test]
fn test_defaults() {
    let arguments = arguments(&["exe", "-s", "3", "input.txt", "-n"]).unwrap();
    assert_eq!(
        arguments,
        Arguments {
            input_path: PathBuf::from("input.txt"),
            output_path: PathBuf::from("result.txt"),
            config: IpogConfig::new(3),
            constraints: false,
            seeds: true,
            verbosity: 0,
        }
    );
}

#[test]
fn test_flags() {
    let arguments = arguments(&[
        "exe",
        "-s",
        "2",
        "input.txt",
        "-o",
        "out.txt",
        "-c",
        "--no-seeds",
        "--no-lookahead",
        "--drop-unsatisfiable",
        "--no-sort",
        "-vv",
    ])
    .unwrap();
    assert_eq!(arguments.output_path, PathBuf::from("out.txt"));
    assert!(arguments.constraints);
    assert!(!arguments.seeds);
    assert!(!arguments.config.lookahead);
    assert_eq!(arguments.config.unsatisfiable, UnsatisfiablePolicy::Drop);
    assert!(!arguments.config.sort_parameters);
    assert_eq!(arguments.verbosity, 2);
    assert_eq!(log_level(arguments.verbosity), Level::TRACE);
    assert_eq!(log_level(0), Level::INFO);
}

#[test]
fn test_load_sut() {
    let input = std::env::temp_dir().join(format!("tway-cli-{}.txt", std::process::id()));
    write(&input, "a: x, y;\nb: x, y;\nc: x, y, z;\n$forbid a=x, b=y;\n$seed a=y, b=y, c=z;\n").unwrap();
    let input_name = input.to_string_lossy().to_string();

    let with_all = arguments(&["exe", "-s", "2", &input_name, "-c"]).unwrap();
    let sut = load_sut(&with_all).unwrap();
    assert_eq!(sut.parameters, vec![2, 2, 3]);
    assert_eq!(sut.count_constraints(), 1);
    assert_eq!(sut.seeds, vec![vec![1, 1, 2]]);

    let without = arguments(&["exe", "-s", "2", &input_name, "-n", "--no-seeds"]).unwrap();
    let sut = load_sut(&without).unwrap();
    assert!(!sut.has_constraints());
    assert!(sut.seeds.is_empty());

    let too_strong = arguments(&["exe", "-s", "4", &input_name, "-n"]).unwrap();
    assert!(load_sut(&too_strong).is_err());

    std::fs::remove_file(&input).unwrap();

    assert!(load_sut(&with_all).is_err());
}
