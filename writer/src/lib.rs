// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

//! This module contains the methods for writing the resulting [MCA] to a file and for reading it back.
//!
//! The file starts with comment lines (starting with `#`), followed by a line with the parameter names and a line
//! of comma separated values per row.

#![deny(missing_docs, rustdoc::missing_crate_level_docs, future_incompatible)]

use std::collections::HashMap;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;
use tracing::info;

use common::{DONT_CARE_TEXT, Id};
use mca::MCA;
use sut::SUT;


/// The errors found while reading a result file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    /// There is no line with parameter names.
    #[error("the file does not contain a line with parameter names")]
    NoHeader,
    /// The header names a parameter the SUT does not have.
    #[error("unknown parameter '{0}' in the header")]
    UnknownParameter(String),
    /// The header does not name every parameter exactly once.
    #[error("the header names {actual} parameters, the SUT has {expected}")]
    ParameterCount {
        /// The number of parameters of the SUT.
        expected: usize,
        /// The number of distinct names in the header.
        actual: usize,
    },
    /// A row has the wrong number of values.
    #[error("line {line} has {actual} values, expected {expected}")]
    RowLength {
        /// The line number, starting at one.
        line: usize,
        /// The number of parameters.
        expected: usize,
        /// The number of values found.
        actual: usize,
    },
    /// A row contains a value that is not in the domain of its parameter.
    #[error("line {line} has unknown value '{value}' for parameter '{parameter}'")]
    UnknownValue {
        /// The line number, starting at one.
        line: usize,
        /// The name of the parameter.
        parameter: String,
        /// The value found.
        value: String,
    },
}

fn write_value<V: Display, W: Write, ValueId: Id>(
    writer: &mut W,
    sut: &SUT<V>,
    index: usize,
    value: ValueId,
) -> std::io::Result<()> {
    if value.is_dont_care() {
        return writer.write_all(DONT_CARE_TEXT.as_bytes());
    }
    match sut.values[index].get(value.as_usize()) {
        Some(value) => write!(writer, "{}", value),
        None => writer.write_all(DONT_CARE_TEXT.as_bytes()),
    }
}

fn write_headers<V, W: Write>(sut: &SUT<V>, mca_size: usize, writer: &mut W) -> std::io::Result<()> {
    writer.write_all(format!("#  '{}' represents don't care value\n", DONT_CARE_TEXT).as_bytes())?;
    writer.write_all(format!("# Number of parameters: {}\n", sut.parameters.len()).as_bytes())?;
    writer.write_all(format!("# Number of configurations: {}\n", mca_size).as_bytes())?;
    writer.write_all(sut.parameter_names.join(",").as_bytes())?;
    writer.write_all(b"\n")
}

/// Write the given [MCA] to the writer, resolving the value indices to the values of the SUT.
pub fn write_result<V: Display, W: Write, ValueId: Id>(
    sut: &SUT<V>,
    mca: &MCA<ValueId>,
    writer: &mut W,
) -> std::io::Result<()> {
    write_headers(sut, mca.len(), writer)?;
    for row in mca.array.iter() {
        for (index, &value) in row.iter().enumerate() {
            if index > 0 {
                writer.write_all(b",")?;
            }
            write_value(writer, sut, index, value)?;
        }
        writer.write_all(b"\n")?;
    }
    Ok(())
}

/// Write the given [MCA] to the given filename.
pub fn write_result_file<V: Display, ValueId: Id>(
    sut: &SUT<V>,
    mca: &MCA<ValueId>,
    filename: &Path,
) -> std::io::Result<()> {
    info!("The resulting suite has {} tests", mca.len());
    let mut writer = BufWriter::new(File::create(filename)?);
    write_result(sut, mca, &mut writer)?;
    writer.flush()
}

/// Read the rows of a result file as value indices of the given SUT.
///
/// The columns may be in any order; the rows are returned in the parameter order of the SUT.
/// A `*` is read as [Id::dont_care].
pub fn read_result(sut: &SUT<String>, text: &str) -> Result<Vec<Vec<usize>>, ReadError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(line, content)| (line + 1, content.trim()))
        .filter(|(_, content)| !content.is_empty() && !content.starts_with('#'));

    let (_, header) = lines.next().ok_or(ReadError::NoHeader)?;
    let columns = header
        .split(',')
        .map(|name| {
            let name = name.trim();
            sut.parameter_names
                .iter()
                .position(|parameter_name| parameter_name == name)
                .ok_or_else(|| ReadError::UnknownParameter(name.to_string()))
        })
        .collect::<Result<Vec<usize>, ReadError>>()?;

    let mut distinct = columns.clone();
    distinct.sort_unstable();
    distinct.dedup();
    if distinct.len() != columns.len() || columns.len() != sut.parameters.len() {
        return Err(ReadError::ParameterCount { expected: sut.parameters.len(), actual: distinct.len() });
    }

    let value_to_id: Vec<HashMap<&str, usize>> = sut
        .values
        .iter()
        .map(|values| values.iter().enumerate().map(|(index, value)| (value.as_str(), index)).collect())
        .collect();

    let mut rows = Vec::new();
    for (line, content) in lines {
        let values: Vec<&str> = content.split(',').map(str::trim).collect();
        if values.len() != columns.len() {
            return Err(ReadError::RowLength { line, expected: columns.len(), actual: values.len() });
        }

        let mut row = vec![usize::dont_care(); columns.len()];
        for (&parameter, value) in columns.iter().zip(values) {
            if value == DONT_CARE_TEXT {
                continue;
            }
            row[parameter] = *value_to_id[parameter].get(value).ok_or_else(|| ReadError::UnknownValue {
                line,
                parameter: sut.parameter_names[parameter].clone(),
                value: value.to_string(),
            })?;
        }
        rows.push(row);
    }

    Ok(rows)
}
