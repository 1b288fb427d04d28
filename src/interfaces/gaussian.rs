//! Element-keyed basis definitions in the Gaussian `****` format.

use std::io::BufRead;
use std::mem;
use std::path::Path;

use anyhow::{self, Context};
use indexmap::IndexMap;
use itertools::Itertools;
use log;
use nalgebra::Point3;

use crate::angmom::angmom_from_label;
use crate::auxiliary::atom::normalise_symbol;
use crate::basis::shell::{Primitive, Shell};
use crate::io::{parse_fortran_float, LineCursor};

#[cfg(test)]
#[path = "gaussian_tests.rs"]
mod gaussian_tests;

/// Separator between element blocks.
const SENTINEL: &str = "****";

/// Comment marker.
const COMMENT: char = '!';

/// States of the basis definition parser.
enum ParseState {
    /// Skipping the preamble before the first separator.
    SeekingSentinel,

    /// A separator has just been read; the next content line names an element.
    ExpectingElement,

    /// Reading shell records for an element.
    InElement { element: String, shells: Vec<Shell> },
}

/// Reads `n_prims` primitive lines of `n_columns` numbers each, skipping blank and comment
/// lines.
fn read_primitive_rows<R: BufRead>(
    cursor: &mut LineCursor<R>,
    n_prims: usize,
    n_columns: usize,
) -> Result<Vec<Vec<f64>>, anyhow::Error> {
    (0..n_prims)
        .map(|i| {
            let line = cursor.next_content_line(COMMENT)?.ok_or_else(|| {
                cursor.error(&format!(
                    "Reached end of file after {i} of {n_prims} primitives had been read."
                ))
            })?;
            let row = line
                .split_whitespace()
                .take(n_columns)
                .map(parse_fortran_float)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|err| cursor.error(&err.to_string()))?;
            if row.len() < n_columns {
                return Err(cursor.error(&format!(
                    "Expected {n_columns} numbers in primitive line `{line}`."
                )));
            }
            Ok(row)
        })
        .collect()
}

/// Reads one shell record, given its header line, together with its primitive lines.
///
/// # Returns
///
/// The shells defined by the record: one shell in general, or an S shell followed by a P shell
/// for an `SP` record.
fn read_shell_record<R: BufRead>(
    header: &str,
    cursor: &mut LineCursor<R>,
) -> Result<Vec<Shell>, anyhow::Error> {
    let (label, n_prims) = header
        .split_whitespace()
        .take(2)
        .collect_tuple()
        .ok_or_else(|| cursor.error(&format!("Invalid shell header `{header}`.")))?;
    let n_prims = n_prims
        .parse::<usize>()
        .map_err(|_| cursor.error(&format!("Invalid number of primitives `{n_prims}`.")))?;
    let label = normalise_symbol(label);
    let origin = Point3::origin();
    if label == "SP" {
        let rows = read_primitive_rows(cursor, n_prims, 3)?;
        let s_prims = rows
            .iter()
            .map(|row| Primitive::new(row[0], row[1]))
            .collect_vec();
        let p_prims = rows
            .iter()
            .map(|row| Primitive::new(row[0], row[2]))
            .collect_vec();
        Ok(vec![
            Shell::new("S", origin, &s_prims)?,
            Shell::new("P", origin, &p_prims)?,
        ])
    } else {
        angmom_from_label(&label).map_err(|err| cursor.error(&err.to_string()))?;
        let rows = read_primitive_rows(cursor, n_prims, 2)?;
        let prims = rows
            .iter()
            .map(|row| Primitive::new(row[0], row[1]))
            .collect_vec();
        Ok(vec![Shell::new(&label, origin, &prims)?])
    }
}

/// Parses an element-keyed basis definition.
///
/// Everything before the first `****` line is ignored. Each subsequent block names an element on
/// its first content line and lists its shell records until the next `****` line. Blank lines
/// and lines starting with `!` are skipped throughout.
///
/// # Returns
///
/// A map from each uppercased element symbol to its shells, in file order. Shells are centred at
/// the origin.
///
/// # Errors
///
/// Errors if a shell label is unknown or a shell record is truncated or malformed.
pub fn parse_gaussian_basis<R: BufRead>(
    cursor: &mut LineCursor<R>,
) -> Result<IndexMap<String, Vec<Shell>>, anyhow::Error> {
    let mut basis_map = IndexMap::new();
    let mut state = ParseState::SeekingSentinel;
    while let Some(line) = cursor.next_line()? {
        let trimmed = line.trim();
        if matches!(state, ParseState::SeekingSentinel) {
            if trimmed == SENTINEL {
                state = ParseState::ExpectingElement;
            }
            continue;
        }
        if trimmed.is_empty() || trimmed.starts_with(COMMENT) {
            continue;
        }
        if trimmed == SENTINEL {
            if let ParseState::InElement { element, shells } =
                mem::replace(&mut state, ParseState::ExpectingElement)
            {
                if !shells.is_empty() {
                    let replaced = basis_map.insert(element.clone(), shells);
                    if replaced.is_some() {
                        log::warn!(
                            "Basis for {element} is defined more than once. The last definition is used."
                        );
                    }
                }
            }
            continue;
        }
        state = match state {
            ParseState::ExpectingElement => {
                let element = trimmed
                    .split_whitespace()
                    .next()
                    .map(normalise_symbol)
                    .ok_or_else(|| cursor.error("Missing element symbol."))?;
                ParseState::InElement {
                    element,
                    shells: vec![],
                }
            }
            ParseState::InElement {
                element,
                mut shells,
            } => {
                shells.extend(read_shell_record(trimmed, cursor)?);
                ParseState::InElement { element, shells }
            }
            ParseState::SeekingSentinel => ParseState::SeekingSentinel,
        };
    }
    if let ParseState::InElement { element, shells } = state {
        if !shells.is_empty() {
            log::warn!(
                "Basis for {element} in `{}` is not terminated by `{SENTINEL}` and has been discarded.",
                cursor.source()
            );
        }
    }
    log::debug!(
        "Read basis definitions for {} elements from `{}`.",
        basis_map.len(),
        cursor.source()
    );
    Ok(basis_map)
}

/// Reads an element-keyed basis definition file. A file that cannot be opened gives an empty
/// map.
///
/// # Errors
///
/// Errors if the file content is malformed.
pub fn read_gaussian_basis<P: AsRef<Path>>(
    path: P,
) -> Result<IndexMap<String, Vec<Shell>>, anyhow::Error> {
    let path = path.as_ref();
    match LineCursor::open_if_readable(path) {
        Some(mut cursor) => parse_gaussian_basis(&mut cursor)
            .with_context(|| format!("Unable to read basis definitions from `{}`", path.display())),
        None => Ok(IndexMap::new()),
    }
}
