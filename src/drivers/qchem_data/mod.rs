//! Reading of Q-Chem results for an assembled basis set.

use std::fmt;

use anyhow::{self, ensure, format_err};
use derive_builder::Builder;
use ndarray::Array2;

use crate::basis::ao::BasisSet;
use crate::drivers::CapDataDriver;
use crate::interfaces::input::QChemInput;
use crate::interfaces::qchem::density::{read_qchem_densities, DensityMatrixSet, Spin};
use crate::interfaces::qchem::energy::{read_qchem_energies, StateEnergies};
use crate::interfaces::qchem::read_qchem_overlap;
use crate::io::format::{capdata_output, capdata_warn, log_subtitle, log_title, CapDataOutput};


// =========
// QChemData
// =========

/// A structure containing the Q-Chem results needed for CAP calculations.
#[derive(Clone, Debug)]
pub struct QChemData {
    /// The atomic-orbital overlap matrix.
    pub overlap: Array2<f64>,

    /// The state and transition densities.
    pub densities: DensityMatrixSet,

    /// The state energies.
    pub energies: StateEnergies,
}

impl fmt::Display for QChemData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (nrows, ncols) = self.overlap.dim();
        writeln!(f, "Overlap matrix: {nrows} x {ncols}")?;
        writeln!(
            f,
            "Densities: {} states, {} x {} per block",
            self.densities.nstates, self.densities.nbasis, self.densities.nbasis
        )?;
        for spin in Spin::ALL {
            let traces = (0..self.densities.nstates)
                .filter_map(|i| self.densities.get(spin, i, i))
                .map(|mat| format!("{:+.6}", mat.diag().sum()))
                .collect::<Vec<_>>();
            writeln!(f, "  Traces of {spin} state densities: {}", traces.join(", "))?;
        }
        write!(f, "{}", self.energies)
    }
}

// ===============
// QChemDataDriver
// ===============

/// A driver for reading Q-Chem results consistent with a basis set.
#[derive(Clone, Builder)]
pub struct QChemDataDriver<'a> {
    /// The locations and parameters of the results.
    parameters: &'a QChemInput,

    /// The basis set in which the matrices are expressed.
    basis_set: &'a BasisSet,

    /// The results read in.
    #[builder(setter(skip), default = "None")]
    result: Option<QChemData>,
}

impl<'a> QChemDataDriver<'a> {
    /// Returns a builder to construct a [`QChemDataDriver`] structure.
    pub fn builder() -> QChemDataDriverBuilder<'a> {
        QChemDataDriverBuilder::default()
    }

    /// Reads the overlap matrix, the densities and the energies.
    fn read_data(&mut self) -> Result<(), anyhow::Error> {
        log_title("Q-Chem Data");
        capdata_output!("");
        let params = self.parameters;
        let nbasis = self.basis_set.n_ao_funcs();

        let overlap_file = params
            .overlap_file
            .as_ref()
            .unwrap_or(&params.density_file);
        let overlap = read_qchem_overlap(overlap_file, nbasis)?;
        ensure!(
            overlap.dim() == (nbasis, nbasis),
            "The overlap matrix has dimensions {:?} but the basis set has {nbasis} functions.",
            overlap.dim()
        );
        if overlap.iter().all(|x| *x == 0.0) && nbasis > 0 {
            capdata_warn!("The overlap matrix is zero.");
        }

        let densities = read_qchem_densities(&params.density_file, params.nstates, nbasis)?;
        let energies = read_qchem_energies(params.nstates, &params.method, &params.output_file)?;

        let data = QChemData {
            overlap,
            densities,
            energies,
        };
        log_subtitle("Q-Chem results");
        capdata_output!("");
        data.log_output_display();
        capdata_output!("");
        self.result = Some(data);
        Ok(())
    }
}

impl<'a> CapDataDriver for QChemDataDriver<'a> {
    type Params = QChemInput;

    type Outcome = QChemData;

    fn result(&self) -> Result<&Self::Outcome, anyhow::Error> {
        self.result
            .as_ref()
            .ok_or_else(|| format_err!("No Q-Chem data found."))
    }

    fn run(&mut self) -> Result<(), anyhow::Error> {
        self.read_data()
    }
}
