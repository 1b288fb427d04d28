//! Energies of electronic states printed in program output.

use std::fmt;
use std::path::Path;

use anyhow::{self, format_err};
use ndarray::Array2;

use crate::auxiliary::atom::normalise_symbol;
use crate::io::format::capdata_warn;
use crate::io::LineCursor;

#[cfg(test)]
#[path = "energy_tests.rs"]
mod energy_tests;

/// Position of the energy value on the line following a state marker.
const ENERGY_TOKEN_INDEX: usize = 3;

/// Structure containing the energies of a set of electronic states.
#[derive(Clone, Debug, PartialEq)]
pub struct StateEnergies {
    /// The uppercased method label used to locate the states.
    pub method: String,

    /// The `nstates x nstates` diagonal matrix of state energies. Entries of states that were
    /// not found are zero.
    pub energies: Array2<f64>,

    /// The number of states whose energies were found.
    pub n_found: usize,
}

impl StateEnergies {
    /// The number of requested states.
    pub fn nstates(&self) -> usize {
        self.energies.nrows()
    }

    /// Whether every requested state was found.
    pub fn is_complete(&self) -> bool {
        self.n_found == self.nstates()
    }
}

impl fmt::Display for StateEnergies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} state energies ({} of {} found):",
            self.method,
            self.n_found,
            self.nstates()
        )?;
        for (k, energy) in self.energies.diag().iter().enumerate() {
            writeln!(f, "  {:>4}  {:+.10}", k + 1, energy)?;
        }
        Ok(())
    }
}

/// Reads state energies from program output.
///
/// For `k = 1, ..., nstates` in turn, the output is scanned for a line containing
/// `"<METHOD> transition <k>"`, and the fourth token of the next line is taken as the energy of
/// state `k`. Scanning stops at the end of the file, so states that are not found keep a zero
/// energy and a warning is logged. A file that cannot be opened gives zero energies.
///
/// # Arguments
///
/// * `nstates` - The number of states.
/// * `method` - The method label in any case, *e.g.* `eomea-ccsd`.
/// * `path` - The output file.
///
/// # Errors
///
/// Errors if a line after a state marker does not carry a valid energy.
pub fn read_qchem_energies<P: AsRef<Path>>(
    nstates: usize,
    method: &str,
    path: P,
) -> Result<StateEnergies, anyhow::Error> {
    let path = path.as_ref();
    let method = normalise_symbol(method);
    let mut energies = Array2::<f64>::zeros((nstates, nstates));
    let mut n_found = 0;
    if let Some(mut cursor) = LineCursor::open_if_readable(path) {
        while n_found < nstates {
            let marker = format!("{method} transition {}", n_found + 1);
            if cursor.seek_containing(&[&marker])?.is_none() {
                break;
            }
            let line = cursor
                .next_line()?
                .ok_or_else(|| cursor.error(&format!("Reached end of file after `{marker}`.")))?;
            let energy = line
                .split_whitespace()
                .nth(ENERGY_TOKEN_INDEX)
                .ok_or_else(|| format_err!("No energy found in `{line}`."))
                .and_then(|token| {
                    token
                        .parse::<f64>()
                        .map_err(|err| format_err!("Invalid energy `{token}`: {err}."))
                })
                .map_err(|err| cursor.error(&err.to_string()))?;
            energies[[n_found, n_found]] = energy;
            n_found += 1;
        }
    }
    if n_found < nstates {
        capdata_warn!(
            "Only {n_found} of {nstates} {method} state energies were found in `{}`. The remaining energies are set to zero.",
            path.display()
        );
    }
    Ok(StateEnergies {
        method,
        energies,
        n_found,
    })
}
