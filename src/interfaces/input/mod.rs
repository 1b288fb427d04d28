//! Input configuration read from YAML files.

use std::path::PathBuf;

use anyhow::{self, Context};
use serde::{Deserialize, Serialize};

use crate::angmom::angmom_from_label;
use crate::auxiliary::atom::LengthUnit;
use crate::drivers::qchem_data::QChemDataDriver;
use crate::drivers::system::SystemDriver;
use crate::drivers::CapDataDriver;
use crate::interfaces::InputHandle;


// --------------
// MoleculeSource
// --------------

/// An enumerated type for the sources of a molecular geometry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MoleculeSource {
    /// Variant for a tabular `xyz` file.
    Xyz {
        /// The path to the `xyz` file.
        path: PathBuf,

        /// The unit of the coordinates in the file. Defaults to bohr.
        #[serde(default)]
        unit: LengthUnit,
    },

    /// Variant for a geometry given inline, one `<symbol> <x> <y> <z>` row per line.
    Inline {
        /// The geometry rows.
        geometry: String,

        /// The unit of the coordinates. Defaults to bohr.
        #[serde(default)]
        unit: LengthUnit,
    },

    /// Variant for a Molden file, which also provides the basis set.
    Molden {
        /// The path to the Molden file.
        path: PathBuf,
    },
}

// -----------
// SystemInput
// -----------

/// A structure containing the specification of the molecular system.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SystemInput {
    /// The source of the geometry.
    pub molecule: MoleculeSource,

    /// The path to an element-keyed basis definition file. Required unless the geometry comes
    /// from a Molden file.
    #[serde(default)]
    pub basis_file: Option<PathBuf>,

    /// The shell labels, *e.g.* `df`, whose shells are to be treated as Cartesian. Only used with
    /// [`Self::basis_file`].
    #[serde(default)]
    pub cart_bf: String,
}

impl SystemInput {
    /// The angular momenta named in [`Self::cart_bf`].
    ///
    /// # Errors
    ///
    /// Errors if any character is not a shell label.
    pub fn cartesian_ls(&self) -> Result<Vec<u32>, anyhow::Error> {
        self.cart_bf
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ',')
            .map(|c| angmom_from_label(&c.to_string()))
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Invalid `cart_bf` value `{}`", self.cart_bf))
    }
}

// ----------
// QChemInput
// ----------

/// A structure containing the locations and parameters of Q-Chem results.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QChemInput {
    /// The formatted file containing the state and transition densities.
    pub density_file: PathBuf,

    /// The formatted file containing the overlap matrix. Defaults to [`Self::density_file`].
    #[serde(default)]
    pub overlap_file: Option<PathBuf>,

    /// The output file containing the state energies.
    pub output_file: PathBuf,

    /// The number of states.
    pub nstates: usize,

    /// The method label preceding `transition <k>` in the output file, *e.g.* `EOMEA-CCSD`.
    pub method: String,
}

// -----
// Input
// -----

/// A structure containing `capdata` input parameters which can be serialised into and
/// deserialised from a YAML input file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Input {
    /// Specification of the molecular system.
    pub system: SystemInput,

    /// Specification of Q-Chem results to be read in. If `None`, only the system is assembled.
    #[serde(default)]
    pub qchem: Option<QChemInput>,
}

impl InputHandle for Input {
    fn handle(&self) -> Result<(), anyhow::Error> {
        let mut system_driver = SystemDriver::builder()
            .parameters(&self.system)
            .build()
            .context("Unable to construct a system driver")?;
        system_driver.run()?;
        let system = system_driver.result()?;

        if let Some(qchem) = self.qchem.as_ref() {
            let mut qchem_driver = QChemDataDriver::builder()
                .parameters(qchem)
                .basis_set(&system.basis_set)
                .build()
                .context("Unable to construct a Q-Chem data driver")?;
            qchem_driver.run()?;
        }
        Ok(())
    }
}
