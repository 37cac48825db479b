// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

//! The `$forbid` and `$seed` statements following the parameter lines.

use nom::branch::alt;
use nom::bytes::complete::{is_a, tag};
use nom::combinator::{all_consuming, opt};
use nom::IResult;
use nom::multi::{many0, separated_list1};

use super::{e2s, read_value};

/// A statement, listing `parameter=value` pairs by name.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Statement<'a> {
    /// The pairs may never appear together in a row.
    Forbid(Vec<(&'a str, &'a str)>),
    /// A row that has to be part of the result.
    Seed(Vec<(&'a str, &'a str)>),
}

fn pair(text: &str) -> IResult<&str, (&str, &str)> {
    let (text, parameter) = read_value(text)?;
    let (text, _) = tag("=")(text)?;
    let (text, value) = read_value(text)?;
    Ok((text, (parameter, value)))
}

fn pairs(text: &str) -> IResult<&str, Vec<(&str, &str)>> {
    separated_list1(tag(","), pair)(text)
}

fn forbid(text: &str) -> IResult<&str, Statement> {
    let (text, _) = tag("$forbid")(text)?;
    let (text, pairs) = pairs(text)?;
    let (text, _) = tag(";")(text)?;
    Ok((text, Statement::Forbid(pairs)))
}

fn seed(text: &str) -> IResult<&str, Statement> {
    let (text, _) = tag("$seed")(text)?;
    let (text, pairs) = pairs(text)?;
    let (text, _) = tag(";")(text)?;
    Ok((text, Statement::Seed(pairs)))
}

fn eof(text: &str) -> IResult<&str, Option<&str>> {
    all_consuming(opt(is_a(" \t\r\n")))(text)
}

fn statement(text: &str) -> IResult<&str, Statement> {
    let (text, _) = opt(is_a(" \t\r\n"))(text)?;
    alt((forbid, seed))(text)
}

pub(crate) fn parse(text: &str) -> Result<Vec<Statement>, String> {
    let (text, statements) = many0(statement)(text).map_err(e2s)?;
    eof(text).map_err(e2s)?;
    Ok(statements)
}
