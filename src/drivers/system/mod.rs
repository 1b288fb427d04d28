//! Assembly of a molecular system and its basis set.

use std::fmt;

use anyhow::{self, format_err};
use derive_builder::Builder;
use log;

use crate::auxiliary::atom::Atom;
use crate::basis::ao::BasisSet;
use crate::drivers::CapDataDriver;
use crate::interfaces::gaussian::read_gaussian_basis;
use crate::interfaces::input::{MoleculeSource, SystemInput};
use crate::interfaces::molden::read_molden;
use crate::interfaces::xyz::{parse_inline_geometry, read_xyz_with_units};
use crate::io::format::{capdata_output, capdata_warn, log_subtitle, log_title, CapDataOutput};


// ======
// System
// ======

/// A structure containing the atoms of a molecule, in bohr, and the basis set placed on them.
#[derive(Clone, Debug)]
pub struct System {
    /// The atoms of the molecule.
    pub atoms: Vec<Atom>,

    /// The basis set of the molecule.
    pub basis_set: BasisSet,
}

impl fmt::Display for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Atoms:")?;
        for atom in self.atoms.iter() {
            writeln!(f, "{atom}")?;
        }
        writeln!(f)?;
        write!(f, "{}", self.basis_set)
    }
}

// ============
// SystemDriver
// ============

/// A driver for assembling a [`System`] from a [`SystemInput`].
#[derive(Clone, Builder)]
pub struct SystemDriver<'a> {
    /// The specification of the system.
    parameters: &'a SystemInput,

    /// The assembled system.
    #[builder(setter(skip), default = "None")]
    result: Option<System>,
}

impl<'a> SystemDriver<'a> {
    /// Returns a builder to construct a [`SystemDriver`] structure.
    pub fn builder() -> SystemDriverBuilder<'a> {
        SystemDriverBuilder::default()
    }

    /// Reads the geometry and places a basis set defined per element on it.
    fn assemble_from_basis_file(&self, mut atoms: Vec<Atom>) -> Result<System, anyhow::Error> {
        let params = self.parameters;
        atoms.iter_mut().for_each(Atom::to_bohr);
        let basis_file = params.basis_file.as_ref().ok_or_else(|| {
            format_err!("A basis file is required unless the geometry is read from a Molden file.")
        })?;
        let basis_map = read_gaussian_basis(basis_file)?;
        let name = basis_file
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| basis_file.display().to_string());
        let mut basis_set = BasisSet::from_geometry(&name, &atoms, &basis_map)?;
        basis_set.set_cartesian(&params.cartesian_ls()?);
        basis_set.normalise()?;
        Ok(System { atoms, basis_set })
    }

    /// Executes the assembly.
    fn assemble(&mut self) -> Result<(), anyhow::Error> {
        log_title("System Assembly");
        capdata_output!("");
        let params = self.parameters;
        let system = match &params.molecule {
            MoleculeSource::Xyz { path, unit } => {
                log::debug!("Reading geometry from `{}` in {unit}.", path.display());
                self.assemble_from_basis_file(read_xyz_with_units(path, *unit)?)?
            }
            MoleculeSource::Inline { geometry, unit } => {
                self.assemble_from_basis_file(parse_inline_geometry(geometry, *unit)?)?
            }
            MoleculeSource::Molden { path } => {
                if params.basis_file.is_some() || !params.cart_bf.trim().is_empty() {
                    capdata_warn!(
                        "The basis set is read from `{}`. `basis_file` and `cart_bf` are ignored.",
                        path.display()
                    );
                }
                let (atoms, basis_set) = read_molden(path)?;
                System { atoms, basis_set }
            }
        };
        log_subtitle("Molecular system");
        capdata_output!("");
        system.log_output_display();
        capdata_output!("");
        self.result = Some(system);
        Ok(())
    }
}

impl<'a> CapDataDriver for SystemDriver<'a> {
    type Params = SystemInput;

    type Outcome = System;

    fn result(&self) -> Result<&Self::Outcome, anyhow::Error> {
        self.result
            .as_ref()
            .ok_or_else(|| format_err!("No assembled system found."))
    }

    fn run(&mut self) -> Result<(), anyhow::Error> {
        self.assemble()
    }
}
