// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

use nom::bytes::complete::tag;
use nom::IResult;
use nom::multi::{many1, separated_list1};

use crate::TemporaryParameter;

use super::{e2s, read_value};

fn parse_values(text: &str) -> IResult<&str, Vec<&str>> {
    separated_list1(tag(","), read_value)(text)
}

fn parse_parameter(text: &str) -> IResult<&str, TemporaryParameter> {
    let (text, parameter) = read_value(text)?;
    let (text, _) = tag(":")(text)?;
    let (text, values) = parse_values(text)?;
    let (text, _) = tag(";")(text)?;
    Ok((text, TemporaryParameter { name: parameter.to_string(), values: values.into_iter().map(|s| s.into()).collect() }))
}

pub(crate) fn parse(text: &str) -> Result<(&str, Vec<TemporaryParameter>), String> {
    many1(parse_parameter)(text).map_err(e2s)
}
