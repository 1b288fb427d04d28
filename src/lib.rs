//! # capdata: Data Ingestion for Complex-Absorbing-Potential Calculations
//!
//! `capdata` reads the artefacts of quantum-chemical calculations and assembles them into
//! in-memory numerical structures for complex-absorbing-potential (CAP) work:
//! - molecular geometries from tabular `xyz` files, inline text, and Molden `[Atoms]` sections,
//! - Gaussian-type basis sets from Gaussian-style `****` definition files and Molden `[GTO]`
//!   sections, expanded into Cartesian basis functions in lexicographic order, and
//! - Q-Chem style packed overlap matrices, state and transition density matrices, and state
//!   energies.
//!
//! All coordinates are held in bohr once a system has been assembled, and every contracted shell
//! is normalised so that its self-overlap is unity.
//!
//! ## Examples and usage
//!
//! A calculation is described by a YAML input file deserialised into
//! [`interfaces::input::Input`]:
//!
//! ```yaml
//! system:
//!   molecule:
//!     kind: xyz
//!     path: water.xyz
//!     unit: angstrom
//!   basis_file: sto-3g.bas
//!   cart_bf: d
//! qchem:
//!   density_file: water.fchk
//!   output_file: water.out
//!   nstates: 3
//!   method: EOMEA-CCSD
//! ```
//!
//! The input is then handled by [`interfaces::InputHandle::handle`], which runs
//! [`drivers::system::SystemDriver`] followed by [`drivers::qchem_data::QChemDataDriver`].
//! Output is written to the `capdata-output` log target, which can be directed to a file with
//! [`io::logging::setup_logger`].
//!
//! For most items, their usages are illustrated in test functions.

pub mod angmom;
pub mod auxiliary;
pub mod basis;
pub mod drivers;
pub mod interfaces;
pub mod io;
