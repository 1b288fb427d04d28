//! Tabular `xyz` geometries.

use std::io::BufRead;
use std::path::Path;

use anyhow::{self, format_err, Context};
use itertools::Itertools;
use log;
use nalgebra::Point3;

use crate::auxiliary::atom::{Atom, ElementMap, LengthUnit};
use crate::io::LineCursor;

#[cfg(test)]
#[path = "xyz_tests.rs"]
mod xyz_tests;

/// Parses one `<symbol> <x> <y> <z>` row. Tokens after the third coordinate are ignored.
fn parse_atom_row(line: &str, unit: LengthUnit, emap: &ElementMap) -> Result<Atom, anyhow::Error> {
    let tokens = line.split_whitespace().collect_vec();
    let (symbol, x, y, z) = tokens
        .iter()
        .take(4)
        .collect_tuple()
        .ok_or_else(|| format_err!("Expected `<symbol> <x> <y> <z>` but found `{line}`."))?;
    let coordinates = [x, y, z]
        .iter()
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|err| format_err!("Unable to parse coordinate `{token}`: {err}."))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Atom::from_symbol(
        symbol,
        Point3::new(coordinates[0], coordinates[1], coordinates[2]),
        unit,
        emap,
    ))
}

/// Parses an `xyz` geometry from a line cursor.
///
/// The first line holds the number of atoms as its first token, the second line is a comment,
/// and each of the following lines holds one atom. Coordinates are tagged with `unit` but not
/// converted.
///
/// # Errors
///
/// Errors if the atom count or any coordinate is malformed, or if the source ends before all
/// atoms have been read.
pub fn parse_xyz<R: BufRead>(
    cursor: &mut LineCursor<R>,
    unit: LengthUnit,
) -> Result<Vec<Atom>, anyhow::Error> {
    let count_line = cursor
        .next_line()?
        .ok_or_else(|| cursor.error("Reached end of file before the number of atoms was found."))?;
    let n_atoms = count_line
        .split_whitespace()
        .next()
        .and_then(|token| token.parse::<usize>().ok())
        .ok_or_else(|| cursor.error(&format!("Invalid number of atoms `{count_line}`.")))?;
    cursor
        .next_line()?
        .ok_or_else(|| cursor.error("Reached end of file before the comment line."))?;

    let emap = ElementMap::new();
    let atoms = (0..n_atoms)
        .map(|i| {
            let line = cursor.next_line()?.ok_or_else(|| {
                cursor.error(&format!(
                    "Reached end of file after {i} of {n_atoms} atoms had been read."
                ))
            })?;
            parse_atom_row(&line, unit, &emap).map_err(|err| cursor.error(&err.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    log::debug!(
        "Read {} atoms from `{}` in {}.",
        atoms.len(),
        cursor.source(),
        unit
    );
    Ok(atoms)
}

/// Reads an `xyz` file whose coordinates are in bohr. A file that cannot be opened gives no
/// atoms.
///
/// # Errors
///
/// Errors if the file content is malformed.
pub fn read_xyz<P: AsRef<Path>>(path: P) -> Result<Vec<Atom>, anyhow::Error> {
    read_xyz_with_units(path, LengthUnit::Bohr)
}

/// Reads an `xyz` file whose coordinates are in a given unit. A file that cannot be opened
/// gives no atoms.
///
/// # Errors
///
/// Errors if the file content is malformed.
pub fn read_xyz_with_units<P: AsRef<Path>>(
    path: P,
    unit: LengthUnit,
) -> Result<Vec<Atom>, anyhow::Error> {
    let path = path.as_ref();
    let Some(mut cursor) = LineCursor::open_if_readable(path) else {
        return Ok(vec![]);
    };
    parse_xyz(&mut cursor, unit)
        .with_context(|| format!("Unable to read geometry from `{}`", path.display()))
}

/// Parses a geometry given inline as one `<symbol> <x> <y> <z>` row per line. Blank lines are
/// skipped.
///
/// # Errors
///
/// Errors if any row is malformed.
pub fn parse_inline_geometry(text: &str, unit: LengthUnit) -> Result<Vec<Atom>, anyhow::Error> {
    let emap = ElementMap::new();
    let mut cursor = LineCursor::from_text(text, "inline geometry");
    let mut atoms = vec![];
    while let Some(line) = cursor.next_content_line('#')? {
        atoms.push(parse_atom_row(&line, unit, &emap).map_err(|err| cursor.error(&err.to_string()))?);
    }
    Ok(atoms)
}
