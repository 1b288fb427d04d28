//! State and transition density matrices of several electronic states.

use std::fmt;
use std::path::Path;

use anyhow::{self, ensure};
use itertools::Itertools;
use log;
use ndarray::Array2;

use crate::interfaces::qchem::packed::{fill_row_major, read_packed_values};
use crate::io::LineCursor;

#[cfg(test)]
#[path = "density_tests.rs"]
mod density_tests;

// ----
// Spin
// ----

/// Enumerated type for spin channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Spin {
    /// Spin-up channel.
    Alpha,

    /// Spin-down channel.
    Beta,
}

impl Spin {
    /// Both spin channels in file order.
    pub const ALL: [Spin; 2] = [Spin::Alpha, Spin::Beta];

    fn index(self) -> usize {
        match self {
            Spin::Alpha => 0,
            Spin::Beta => 1,
        }
    }
}

impl fmt::Display for Spin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Spin::Alpha => write!(f, "alpha"),
            Spin::Beta => write!(f, "beta"),
        }
    }
}

// ------------
// DensityBlock
// ------------

/// Enumerated type for the kinds of density blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DensityKind {
    /// One-particle density of a single state.
    State,

    /// Transition density between two distinct states.
    Transition,
}

impl DensityKind {
    /// The text that marks a block of this kind.
    pub fn marker(&self) -> &'static str {
        match self {
            DensityKind::State => "State Density",
            DensityKind::Transition => "Transition DM",
        }
    }
}

/// One density block expected in a density file. State indices are 0-based and `i <= j`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DensityBlock {
    /// The kind of the block.
    pub kind: DensityKind,

    /// The bra state.
    pub i: usize,

    /// The ket state.
    pub j: usize,

    /// The spin channel.
    pub spin: Spin,
}

/// Enumerates the density blocks of an `nstates`-state file in the order they are stored.
///
/// State densities come first, alpha then beta for each state. Transition densities follow for
/// each pair `i < j` with `i` running slowest, again alpha then beta.
pub fn expected_density_blocks(nstates: usize) -> Vec<DensityBlock> {
    let state_blocks = (0..nstates).flat_map(|i| {
        Spin::ALL.into_iter().map(move |spin| DensityBlock {
            kind: DensityKind::State,
            i,
            j: i,
            spin,
        })
    });
    let transition_blocks = (0..nstates)
        .tuple_combinations::<(_, _)>()
        .flat_map(|(i, j)| {
            Spin::ALL.into_iter().map(move |spin| DensityBlock {
                kind: DensityKind::Transition,
                i,
                j,
                spin,
            })
        });
    state_blocks.chain(transition_blocks).collect_vec()
}

/// The number of distinct transition densities per spin channel, `nstates(nstates - 1)/2`.
pub fn total_tdms_to_read(nstates: usize) -> usize {
    nstates * nstates.saturating_sub(1) / 2
}

/// The position in the block stream of the first transition block of a state.
///
/// # Arguments
///
/// * `nstates` - The number of states.
/// * `state` - The 1-based state index.
///
/// # Returns
///
/// `2 nstates + 2 (sum over i = 1 .. state - 1 of (nstates - i))`, so that
/// `tdm_start(3, 2) == 10`. Each pair holds an alpha and a beta block, hence the factor of two
/// on the sum. Without it the same example gives 8, the alpha block of the (1, 3) pair.
///
/// # Errors
///
/// Errors if `state` is not in `1..=nstates`.
pub fn tdm_start(nstates: usize, state: usize) -> Result<usize, anyhow::Error> {
    ensure!(
        (1..=nstates).contains(&state),
        "State {state} is out of range for {nstates} states."
    );
    Ok(2 * nstates + (1..state).map(|i| 2 * (nstates - i)).sum::<usize>())
}

// -----------------
// DensityMatrixSet
// -----------------

/// Structure containing the full lattice of state and transition densities for both spin
/// channels.
#[derive(Clone, Debug, PartialEq)]
pub struct DensityMatrixSet {
    /// The number of states.
    pub nstates: usize,

    /// The number of basis functions.
    pub nbasis: usize,

    /// The `nstates x nstates` lattices, alpha then beta.
    lattices: [Vec<Vec<Array2<f64>>>; 2],
}

impl DensityMatrixSet {
    /// Constructs a set whose every density is zero.
    pub fn zeros(nstates: usize, nbasis: usize) -> Self {
        let lattice = vec![vec![Array2::<f64>::zeros((nbasis, nbasis)); nstates]; nstates];
        Self {
            nstates,
            nbasis,
            lattices: [lattice.clone(), lattice],
        }
    }

    /// The density between states `i` and `j` (0-based) in a spin channel.
    pub fn get(&self, spin: Spin, i: usize, j: usize) -> Option<&Array2<f64>> {
        self.lattices[spin.index()].get(i)?.get(j)
    }

    /// The full lattice of a spin channel.
    pub fn lattice(&self, spin: Spin) -> &[Vec<Array2<f64>>] {
        &self.lattices[spin.index()]
    }

    /// Copies every block above the diagonal into its mirror position below the diagonal.
    fn symmetrise(&mut self) {
        for lattice in self.lattices.iter_mut() {
            for (i, j) in (0..self.nstates).tuple_combinations::<(_, _)>() {
                lattice[j][i] = lattice[i][j].clone();
            }
        }
    }
}

/// Reads the densities of `nstates` states from a density file.
///
/// Each block is located by the next line containing the marker of its kind and decoded as a
/// row-major `nbasis x nbasis` matrix. Blocks are assigned positionally following
/// [`expected_density_blocks`]. A file that cannot be opened gives zero densities.
///
/// # Errors
///
/// Errors if the file ends before all expected blocks, or if a block is malformed or of the
/// wrong size.
pub fn read_qchem_densities<P: AsRef<Path>>(
    path: P,
    nstates: usize,
    nbasis: usize,
) -> Result<DensityMatrixSet, anyhow::Error> {
    let path = path.as_ref();
    let mut densities = DensityMatrixSet::zeros(nstates, nbasis);
    let Some(mut cursor) = LineCursor::open_if_readable(path) else {
        return Ok(densities);
    };
    log::debug!("Reading densities of {nstates} states from `{}`.", path.display());
    for block in expected_density_blocks(nstates) {
        let header = cursor.seek_containing(&[block.kind.marker()])?.ok_or_else(|| {
            cursor.error(&format!(
                "Reached end of file before the {} {} block for states ({}, {}).",
                block.spin,
                block.kind.marker(),
                block.i + 1,
                block.j + 1
            ))
        })?;
        let values = read_packed_values(&mut cursor, &header)?;
        let mat =
            fill_row_major(&values, nbasis).map_err(|err| cursor.error(&err.to_string()))?;
        densities.lattices[block.spin.index()][block.i][block.j] = mat;
    }
    densities.symmetrise();
    Ok(densities)
}
