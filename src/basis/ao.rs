//! Cartesian basis functions and basis sets.

use std::fmt;
use std::slice::Iter;
use std::sync::Arc;

use anyhow::{self, bail};
use indexmap::IndexMap;
use itertools::Itertools;
use log;
use nalgebra::Point3;

use crate::angmom::angmom_label;
use crate::auxiliary::atom::{normalise_symbol, Atom};
use crate::basis::shell::{Primitive, Shell};
use crate::io::format::write_subtitle;

#[cfg(test)]
#[path = "ao_tests.rs"]
mod ao_tests;

// ---------
// CartOrder
// ---------

/// Structure to contain the ordering of Cartesian Gaussians of a certain rank.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CartOrder {
    /// A sequence of $`(l_x, l_y, l_z)`$ tuples giving the ordering of the Cartesian Gaussians.
    pub cart_tuples: Vec<(u32, u32, u32)>,

    /// The rank of the Cartesian Gaussians.
    pub lcart: u32,
}

impl CartOrder {
    /// Constructs a new [`CartOrder`] structure for a specified rank with lexicographic order:
    /// $`l_x`$ runs from `lcart` down to zero and, for each $`l_x`$, $`l_y`$ runs from
    /// `lcart` $`- l_x`$ down to zero.
    #[must_use]
    pub fn lex(lcart: u32) -> Self {
        let cart_tuples = (0..=lcart)
            .rev()
            .flat_map(|lx| (0..=(lcart - lx)).rev().map(move |ly| (lx, ly, lcart - lx - ly)))
            .collect_vec();
        Self { cart_tuples, lcart }
    }

    /// Iterates over the constituent tuples.
    pub fn iter(&'_ self) -> Iter<'_, (u32, u32, u32)> {
        self.cart_tuples.iter()
    }
}

/// Translates a Cartesian exponent tuple to a human-understandable string, *e.g.*
/// `(1, 2, 0)` becomes `xyy`.
pub(crate) fn cart_tuple_to_str(cart_tuple: &(u32, u32, u32)) -> String {
    if cart_tuple.0 + cart_tuple.1 + cart_tuple.2 == 0u32 {
        "1".to_string()
    } else {
        [cart_tuple.0, cart_tuple.1, cart_tuple.2]
            .iter()
            .zip(["x", "y", "z"])
            .map(|(&l, axis)| axis.repeat(l as usize))
            .collect::<String>()
    }
}

// -------------
// BasisFunction
// -------------

/// Structure representing one Cartesian component of a contracted shell.
#[derive(Clone, Debug)]
pub struct BasisFunction {
    /// The centre of the function.
    pub center: Point3<f64>,

    /// The Cartesian exponents $`(l_x, l_y, l_z)`$ of the function.
    pub cart_tuple: (u32, u32, u32),

    /// The index of the owning shell in the basis set.
    pub shell_index: usize,

    /// The index of the atom on which the function is centred.
    pub atom_index: usize,

    /// The primitives of the owning shell.
    pub primitives: Arc<[Primitive]>,
}

impl BasisFunction {
    /// The total Cartesian degree $`l_x + l_y + l_z`$ of the function.
    pub fn l(&self) -> u32 {
        self.cart_tuple.0 + self.cart_tuple.1 + self.cart_tuple.2
    }
}

// --------
// BasisSet
// --------

/// Structure containing an ordered set of Cartesian basis functions together with the shells and
/// centres that generated them.
#[derive(Clone, Debug)]
pub struct BasisSet {
    /// A name for the basis set.
    pub name: String,

    /// The atomic centres of the basis set in atom order.
    pub centers: Vec<Point3<f64>>,

    /// The shells of the basis set, each paired with the index of its atom.
    shells: Vec<(usize, Shell)>,

    /// The Cartesian basis functions in atom, shell, then Cartesian order.
    basis_functions: Vec<BasisFunction>,
}

impl BasisSet {
    /// Assembles a basis set by placing the element-keyed shells of a basis definition on every
    /// atom of a geometry. Atoms whose element has no basis definition, such as ghost centres,
    /// contribute no functions.
    ///
    /// # Arguments
    ///
    /// * `name` - A name for the basis set.
    /// * `atoms` - The atoms in the order their functions are to appear.
    /// * `basis_map` - A map from an uppercased element symbol to its ordered shells.
    ///
    /// # Errors
    ///
    /// Errors if the shells cannot be placed on the atoms.
    pub fn from_geometry(
        name: &str,
        atoms: &[Atom],
        basis_map: &IndexMap<String, Vec<Shell>>,
    ) -> Result<Self, anyhow::Error> {
        let shells = atoms
            .iter()
            .enumerate()
            .flat_map(|(atom_index, atom)| {
                let element_shells = basis_map
                    .get(&normalise_symbol(&atom.atomic_symbol))
                    .map(Vec::as_slice)
                    .unwrap_or_else(|| {
                        log::warn!(
                            "No basis functions defined for atom {} ({}). It will carry no functions.",
                            atom_index + 1,
                            atom.atomic_symbol
                        );
                        &[]
                    });
                element_shells
                    .iter()
                    .map(move |shell| (atom_index, shell.placed_at(atom.coordinates)))
            })
            .collect_vec();
        Self::from_shells(
            name,
            atoms.iter().map(|atom| atom.coordinates).collect_vec(),
            shells,
        )
    }

    /// Assembles a basis set from shells already placed on atomic centres.
    ///
    /// # Arguments
    ///
    /// * `name` - A name for the basis set.
    /// * `centers` - The atomic centres.
    /// * `shells` - The shells in order, each paired with the index of its centre.
    ///
    /// # Errors
    ///
    /// Errors if a shell refers to a centre that does not exist.
    pub fn from_shells(
        name: &str,
        centers: Vec<Point3<f64>>,
        shells: Vec<(usize, Shell)>,
    ) -> Result<Self, anyhow::Error> {
        if let Some((atom_index, _)) = shells
            .iter()
            .find(|(atom_index, _)| *atom_index >= centers.len())
        {
            bail!(
                "Shell placed on atom {} but only {} atoms are present.",
                atom_index + 1,
                centers.len()
            );
        }
        let basis_functions = expand_shells(&shells);
        Ok(Self {
            name: name.to_string(),
            centers,
            shells,
            basis_functions,
        })
    }

    /// The basis functions of this basis set in order.
    pub fn basis_functions(&self) -> &[BasisFunction] {
        &self.basis_functions
    }

    /// Iterates over the shells of this basis set together with their atom indices.
    pub fn shells(&self) -> impl Iterator<Item = (usize, &Shell)> + '_ {
        self.shells.iter().map(|(atom_index, shell)| (*atom_index, shell))
    }

    /// The number of Cartesian basis functions.
    pub fn n_funcs(&self) -> usize {
        self.basis_functions.len()
    }

    /// The number of atomic orbitals as counted by electronic-structure programs, with pure shells
    /// contributing $`2l + 1`$ functions.
    pub fn n_ao_funcs(&self) -> usize {
        self.shells.iter().map(|(_, shell)| shell.n_funcs()).sum()
    }

    /// The number of shells.
    pub fn n_shells(&self) -> usize {
        self.shells.len()
    }

    /// Normalises every shell of this basis set and regenerates the basis functions.
    ///
    /// # Errors
    ///
    /// Errors if any shell cannot be normalised.
    pub fn normalise(&mut self) -> Result<(), anyhow::Error> {
        self.shells
            .iter_mut()
            .try_for_each(|(_, shell)| shell.normalise())?;
        self.basis_functions = expand_shells(&self.shells);
        Ok(())
    }

    /// Marks every shell whose angular momentum is in `ls` as Cartesian.
    pub fn set_cartesian(&mut self, ls: &[u32]) {
        self.shells
            .iter_mut()
            .filter(|(_, shell)| ls.contains(&shell.l))
            .for_each(|(_, shell)| shell.pure = false);
    }
}

/// Expands shells into basis functions in shell order.
fn expand_shells(shells: &[(usize, Shell)]) -> Vec<BasisFunction> {
    shells
        .iter()
        .enumerate()
        .flat_map(|(shell_index, (atom_index, shell))| {
            shell.basis_functions(shell_index, *atom_index)
        })
        .collect_vec()
}

impl fmt::Display for BasisSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_subtitle(f, &format!("Basis set: {}", self.name))?;
        writeln!(f, "Number of atoms: {}", self.centers.len())?;
        writeln!(f, "Number of shells: {}", self.n_shells())?;
        writeln!(f, "Number of Cartesian functions: {}", self.n_funcs())?;
        writeln!(f, "Number of atomic orbitals: {}", self.n_ao_funcs())?;
        writeln!(f)?;
        writeln!(f, "{:>6}  {:>4}  {:>5}  {:>4}  {:<6}", "Index", "Atom", "Shell", "Pure", "Comp")?;
        for (index, bf) in self.basis_functions.iter().enumerate() {
            let pure = self
                .shells
                .get(bf.shell_index)
                .map(|(_, shell)| shell.pure)
                .unwrap_or(true);
            writeln!(
                f,
                "{:>6}  {:>4}  {:>5}  {:>4}  {:<6}",
                index,
                bf.atom_index + 1,
                angmom_label(bf.l()),
                if pure { "yes" } else { "no" },
                cart_tuple_to_str(&bf.cart_tuple),
            )?;
        }
        Ok(())
    }
}
