//! Geometries and basis sets in the Molden format.

use std::fs;
use std::io::BufRead;
use std::path::Path;

use anyhow::{self, bail, format_err, Context};
use itertools::Itertools;
use log;
use nalgebra::Point3;

use crate::angmom::angmom_from_label;
use crate::auxiliary::atom::{normalise_symbol, Atom, ElementMap, LengthUnit};
use crate::basis::ao::BasisSet;
use crate::basis::shell::{Primitive, Shell};
use crate::io::{parse_fortran_float, LineCursor};

#[cfg(test)]
#[path = "molden_tests.rs"]
mod molden_tests;

/// Reads a whole Molden file, treating an unreadable file as empty.
fn read_molden_text(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(contents) => Some(contents),
        Err(err) => {
            log::warn!(
                "Unable to read `{}`: {err}. The file will be treated as empty.",
                path.display()
            );
            None
        }
    }
}

// --------
// Geometry
// --------

/// Parses one row of the `[Atoms]` section.
///
/// Six-column rows follow `<label> <index> <charge> <x> <y> <z>`; five-column rows follow
/// `<label> <charge> <x> <y> <z>`.
fn parse_atom_row(line: &str, unit: LengthUnit, emap: &ElementMap) -> Result<Atom, anyhow::Error> {
    let tokens = line.split_whitespace().collect_vec();
    let charge_index = match tokens.len() {
        6 => 2,
        5 => 1,
        n => bail!("Expected 5 or 6 columns in atom row `{line}` but found {n}."),
    };
    let charge = tokens[charge_index]
        .parse::<u32>()
        .map_err(|err| format_err!("Invalid nuclear charge `{}`: {err}.", tokens[charge_index]))?;
    let coordinates = tokens[charge_index + 1..]
        .iter()
        .map(|token| parse_fortran_float(token))
        .collect::<Result<Vec<_>, _>>()?;
    let mut atom = Atom::from_charge(
        charge,
        Point3::new(coordinates[0], coordinates[1], coordinates[2]),
        unit,
        emap,
    )?;
    atom.to_bohr();
    Ok(atom)
}

/// Parses the geometry of a Molden file.
///
/// If an `N_ATOMS` line is present, the last token of the line after it declares the number of
/// atoms and the parsed atoms are checked against it. The atoms are read from the section whose
/// header contains `ATOMS` or `Atoms` until the next line containing `[`. A header containing
/// `angs` in any case marks coordinates in ångström, which are converted to bohr.
///
/// # Arguments
///
/// * `contents` - The contents of the Molden file.
/// * `source` - A name for the contents used in error messages.
///
/// # Errors
///
/// Errors if the atom section is missing or unterminated, if a row is malformed, or if the
/// declared number of atoms does not match the number of atoms read.
pub fn parse_molden_geometry(contents: &str, source: &str) -> Result<Vec<Atom>, anyhow::Error> {
    let mut cursor = LineCursor::from_text(contents, source);
    let declared = match cursor.seek_containing(&["N_ATOMS"])? {
        Some(_) => {
            let count_line = cursor
                .next_line()?
                .ok_or_else(|| cursor.error("Reached end of file before the number of atoms."))?;
            let n_atoms = count_line
                .split_whitespace()
                .last()
                .and_then(|token| token.parse::<usize>().ok())
                .ok_or_else(|| cursor.error(&format!("Invalid number of atoms `{count_line}`.")))?;
            Some(n_atoms)
        }
        None => {
            cursor = LineCursor::from_text(contents, source);
            None
        }
    };

    let header = cursor
        .seek_containing(&["ATOMS", "Atoms"])?
        .ok_or_else(|| cursor.error("Reached end of file before the atom section was found."))?;
    let unit = if header.to_lowercase().contains("angs") {
        LengthUnit::Angstrom
    } else {
        LengthUnit::Bohr
    };

    let emap = ElementMap::new();
    let mut atoms = vec![];
    loop {
        let line = cursor
            .next_line()?
            .ok_or_else(|| cursor.error("Reached end of file before the atoms could be parsed."))?;
        if line.contains('[') {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        atoms.push(parse_atom_row(&line, unit, &emap).map_err(|err| cursor.error(&err.to_string()))?);
    }

    if let Some(n_atoms) = declared {
        if n_atoms != atoms.len() {
            bail!(
                "{n_atoms} atoms are declared in `N_ATOMS` but {} atoms were found in `{source}`.",
                atoms.len()
            );
        }
    }
    log::debug!("Read {} atoms from `{source}`.", atoms.len());
    Ok(atoms)
}

/// Reads the geometry of a Molden file. A file that cannot be read gives no atoms.
///
/// # Errors
///
/// Errors if the file content is malformed.
pub fn read_molden_geometry<P: AsRef<Path>>(path: P) -> Result<Vec<Atom>, anyhow::Error> {
    let path = path.as_ref();
    match read_molden_text(path) {
        Some(contents) => parse_molden_geometry(&contents, &path.display().to_string()),
        None => Ok(vec![]),
    }
}

// ---------
// Basis set
// ---------

/// Reads one Molden shell given its `<label> <nprims> <rest>` header.
///
/// # Arguments
///
/// * `header` - The shell header line.
/// * `cursor` - A cursor positioned just after the header, from which `nprims` primitive lines
/// of `<exponent> <coefficient>` are read.
/// * `center` - The centre of the shell.
///
/// # Returns
///
/// A pure shell.
///
/// # Errors
///
/// Errors if the header or any primitive line is malformed, or if the source ends early.
pub fn read_molden_shell<R: BufRead>(
    header: &str,
    cursor: &mut LineCursor<R>,
    center: Point3<f64>,
) -> Result<Shell, anyhow::Error> {
    let (label, n_prims) = header
        .split_whitespace()
        .take(2)
        .collect_tuple()
        .ok_or_else(|| cursor.error(&format!("Invalid shell header `{header}`.")))?;
    let label = normalise_symbol(label);
    angmom_from_label(&label).map_err(|err| cursor.error(&err.to_string()))?;
    let n_prims = n_prims
        .parse::<usize>()
        .map_err(|_| cursor.error(&format!("Invalid number of primitives `{n_prims}`.")))?;

    let prims = (0..n_prims)
        .map(|i| {
            let line = cursor.next_line()?.ok_or_else(|| {
                cursor.error(&format!(
                    "Reached end of file after {i} of {n_prims} primitives had been read."
                ))
            })?;
            let (exponent, coefficient) = line
                .split_whitespace()
                .take(2)
                .map(parse_fortran_float)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|err| cursor.error(&err.to_string()))?
                .into_iter()
                .collect_tuple()
                .ok_or_else(|| cursor.error(&format!("Invalid primitive line `{line}`.")))?;
            Ok(Primitive::new(exponent, coefficient))
        })
        .collect::<Result<Vec<_>, anyhow::Error>>()?;
    Shell::new(&label, center, &prims)
}

/// Spherical-harmonic flags of a Molden file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct PurityFlags {
    /// Whether `5D` appears.
    d: bool,

    /// Whether `7F` appears.
    f: bool,

    /// Whether `9G` appears.
    g: bool,
}

impl PurityFlags {
    /// Scans every line for `5D`, `7F` and `9G` markers in any case.
    fn scan(contents: &str) -> Self {
        contents
            .lines()
            .map(str::to_uppercase)
            .fold(Self::default(), |flags, line| Self {
                d: flags.d || line.contains("5D"),
                f: flags.f || line.contains("7F"),
                g: flags.g || line.contains("9G"),
            })
    }

    /// Whether shells of angular momentum `l` are pure.
    fn is_pure(&self, l: u32) -> bool {
        match l {
            2 => self.d,
            3 => self.f,
            4 => self.g,
            _ => true,
        }
    }
}

/// Parses the basis set of a Molden file.
///
/// The `[GTO]` section is read until the next line containing `[` or the end of the file. A line
/// holding a single integer selects the 1-based atom on which the following shells are centred.
/// Shells of angular momentum 2, 3 or 4 are Cartesian unless the file carries the corresponding
/// `5D`, `7F` or `9G` marker. All shells are normalised.
///
/// # Arguments
///
/// * `contents` - The contents of the Molden file.
/// * `source` - A name for the contents used in error messages.
/// * `atoms` - The atoms of the file, as read by [`parse_molden_geometry`].
///
/// # Errors
///
/// Errors if the `[GTO]` section is missing, if a shell appears before any atom index, if an
/// atom index is out of range, or if a shell is malformed.
pub fn parse_molden_basis(
    contents: &str,
    source: &str,
    atoms: &[Atom],
) -> Result<BasisSet, anyhow::Error> {
    let flags = PurityFlags::scan(contents);
    log::debug!("Spherical-harmonic markers in `{source}`: {flags:?}.");

    let mut cursor = LineCursor::from_text(contents, source);
    cursor
        .seek_containing(&["GTO"])?
        .ok_or_else(|| cursor.error("Reached end of file before the GTO section was found."))?;

    let mut atom_index: Option<usize> = None;
    let mut shells = vec![];
    while let Some(line) = cursor.next_line()? {
        if line.contains('[') {
            break;
        }
        let Some(first) = line.split_whitespace().next() else {
            continue;
        };
        if first.chars().all(|c| c.is_ascii_digit()) {
            let index = first
                .parse::<usize>()
                .map_err(|err| cursor.error(&format!("Invalid atom index `{first}`: {err}.")))?;
            if index == 0 || index > atoms.len() {
                return Err(cursor.error(&format!(
                    "Atom index {index} is out of range for {} atoms.",
                    atoms.len()
                )));
            }
            atom_index = Some(index - 1);
        } else if first.starts_with(|c: char| c.is_ascii_alphabetic()) {
            let index = atom_index
                .ok_or_else(|| cursor.error("Shell found before any atom index."))?;
            let mut shell = read_molden_shell(&line, &mut cursor, atoms[index].coordinates)?;
            shell.pure = flags.is_pure(shell.l);
            shells.push((index, shell));
        }
    }

    let mut basis_set = BasisSet::from_shells(
        source,
        atoms.iter().map(|atom| atom.coordinates).collect_vec(),
        shells,
    )?;
    basis_set.normalise()?;
    log::debug!(
        "Read {} shells ({} Cartesian functions) from `{source}`.",
        basis_set.n_shells(),
        basis_set.n_funcs()
    );
    Ok(basis_set)
}

/// Reads the basis set of a Molden file. A file that cannot be read gives an empty basis set.
///
/// # Errors
///
/// Errors if the file content is malformed.
pub fn read_molden_basis<P: AsRef<Path>>(
    path: P,
    atoms: &[Atom],
) -> Result<BasisSet, anyhow::Error> {
    let path = path.as_ref();
    let source = path.display().to_string();
    match read_molden_text(path) {
        Some(contents) => parse_molden_basis(&contents, &source, atoms)
            .with_context(|| format!("Unable to read basis set from `{source}`")),
        None => BasisSet::from_shells(
            &source,
            atoms.iter().map(|atom| atom.coordinates).collect_vec(),
            vec![],
        ),
    }
}

/// Reads both the geometry and the basis set of a Molden file.
///
/// # Errors
///
/// Errors if the file cannot be read or its content is malformed.
pub fn read_molden<P: AsRef<Path>>(path: P) -> Result<(Vec<Atom>, BasisSet), anyhow::Error> {
    let path = path.as_ref();
    let source = path.display().to_string();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Unable to read Molden file `{source}`"))?;
    let atoms = parse_molden_geometry(&contents, &source)
        .with_context(|| format!("Unable to read geometry from `{source}`"))?;
    let basis_set = parse_molden_basis(&contents, &source, &atoms)
        .with_context(|| format!("Unable to read basis set from `{source}`"))?;
    Ok((atoms, basis_set))
}
