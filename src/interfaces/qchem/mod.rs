//! Interfaces with Q-Chem formatted output.

use std::path::Path;

use anyhow::{self, Context};
use log;
use ndarray::Array2;

use crate::io::LineCursor;

pub mod density;
pub mod energy;
pub mod packed;

use packed::{fill_lower_triangular, read_packed_values};

#[cfg(test)]
#[path = "qchem_tests.rs"]
mod qchem_tests;

/// Marker of the packed overlap matrix.
const OVERLAP_MARKER: &str = "Overlap Matrix";

/// Reads the atomic-orbital overlap matrix, stored as a packed lower triangle.
///
/// A file that cannot be opened gives a zero matrix.
///
/// # Arguments
///
/// * `path` - The file containing the overlap matrix.
/// * `nbasis` - The number of basis functions.
///
/// # Errors
///
/// Errors if the file has no overlap matrix, or if the matrix is malformed or of the wrong size.
pub fn read_qchem_overlap<P: AsRef<Path>>(
    path: P,
    nbasis: usize,
) -> Result<Array2<f64>, anyhow::Error> {
    let path = path.as_ref();
    let Some(mut cursor) = LineCursor::open_if_readable(path) else {
        return Ok(Array2::zeros((nbasis, nbasis)));
    };
    let header = cursor
        .seek_containing(&[OVERLAP_MARKER])?
        .ok_or_else(|| cursor.error("Reached end of file before the overlap matrix was found."))?;
    let values = read_packed_values(&mut cursor, &header)?;
    log::debug!("Read {} overlap elements from `{}`.", values.len(), path.display());
    fill_lower_triangular(&values, nbasis)
        .map_err(|err| cursor.error(&err.to_string()))
        .with_context(|| format!("Unable to read the overlap matrix from `{}`", path.display()))
}
