//! Matrices stored as flat runs of numbers, five per line.

use std::io::BufRead;

use anyhow::{self, ensure, format_err};
use itertools::Itertools;
use ndarray::Array2;

use crate::io::{parse_fortran_float, LineCursor};

#[cfg(test)]
#[path = "packed_tests.rs"]
mod packed_tests;

/// Number of values on each full line of a packed matrix.
pub const VALUES_PER_LINE: usize = 5;

/// Reads the number of packed values announced by the last token of a block header.
///
/// # Errors
///
/// Errors if the last token is not a non-negative integer.
pub fn element_count(header: &str) -> Result<usize, anyhow::Error> {
    let token = header
        .split_whitespace()
        .last()
        .ok_or_else(|| format_err!("Empty block header."))?;
    token
        .parse::<usize>()
        .map_err(|err| format_err!("Invalid element count `{token}` in `{header}`: {err}."))
}

/// Reads the values of a packed block whose header has just been consumed.
///
/// The block spans `ceil(M / 5)` lines, where `M` is the element count of `header`.
///
/// # Errors
///
/// Errors if the source ends early, if a value cannot be parsed, or if the lines do not hold
/// exactly `M` values.
pub fn read_packed_values<R: BufRead>(
    cursor: &mut LineCursor<R>,
    header: &str,
) -> Result<Vec<f64>, anyhow::Error> {
    let n_values = element_count(header).map_err(|err| cursor.error(&err.to_string()))?;
    let n_lines = n_values.div_ceil(VALUES_PER_LINE);
    let mut values = Vec::with_capacity(n_values);
    for k in 0..n_lines {
        let line = cursor.next_line()?.ok_or_else(|| {
            cursor.error(&format!(
                "Reached end of file after {k} of {n_lines} lines of packed values."
            ))
        })?;
        for token in line.split_whitespace() {
            values.push(parse_fortran_float(token).map_err(|err| cursor.error(&err.to_string()))?);
        }
    }
    if values.len() != n_values {
        return Err(cursor.error(&format!(
            "Expected {n_values} packed values but found {}.",
            values.len()
        )));
    }
    Ok(values)
}

/// Fills a symmetric `n x n` matrix from its lower triangle given row by row.
///
/// # Errors
///
/// Errors if `values` does not hold exactly `n(n+1)/2` values.
pub fn fill_lower_triangular(values: &[f64], n: usize) -> Result<Array2<f64>, anyhow::Error> {
    ensure!(
        values.len() == n * (n + 1) / 2,
        "A {n} x {n} lower triangle needs {} values but {} were given.",
        n * (n + 1) / 2,
        values.len()
    );
    let mut mat = Array2::<f64>::zeros((n, n));
    (0..n)
        .flat_map(|i| (0..=i).map(move |j| (i, j)))
        .zip(values)
        .for_each(|((i, j), &value)| {
            mat[[i, j]] = value;
            mat[[j, i]] = value;
        });
    Ok(mat)
}

/// Fills an `n x n` matrix from its elements given in row-major order.
///
/// # Errors
///
/// Errors if `values` does not hold exactly `n^2` values.
pub fn fill_row_major(values: &[f64], n: usize) -> Result<Array2<f64>, anyhow::Error> {
    ensure!(
        values.len() == n * n,
        "A {n} x {n} matrix needs {} values but {} were given.",
        n * n,
        values.len()
    );
    Array2::from_shape_vec((n, n), values.iter().copied().collect_vec())
        .map_err(|err| format_err!(err))
}
