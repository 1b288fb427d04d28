//! Contracted Gaussian shells.

use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

use anyhow::{self, ensure, format_err};
use derive_builder::Builder;
use itertools::Itertools;
use nalgebra::Point3;

use crate::angmom::{angmom_from_label, angmom_label};
use crate::auxiliary::atom::normalise_symbol;
use crate::basis::ao::{BasisFunction, CartOrder};

#[cfg(test)]
#[path = "shell_tests.rs"]
mod shell_tests;

// ---------
// Primitive
// ---------

/// A primitive Gaussian term of a contracted shell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Primitive {
    /// The Gaussian exponent.
    pub exponent: f64,

    /// The contraction coefficient.
    pub coefficient: f64,
}

impl Primitive {
    /// Constructs a new primitive.
    #[must_use]
    pub fn new(exponent: f64, coefficient: f64) -> Self {
        Self {
            exponent,
            coefficient,
        }
    }
}

// -----
// Shell
// -----

/// Structure representing a contracted Gaussian shell.
#[derive(Clone, Builder)]
pub struct Shell {
    /// The angular momentum of the shell.
    pub l: u32,

    /// The uppercased label of the shell, *e.g.* `S`, `P`, `D`.
    #[builder(setter(into))]
    pub label: String,

    /// The centre of the shell. Shells read in from element-keyed basis definitions sit at the
    /// origin until they are placed on an atom.
    #[builder(default = "Point3::origin()")]
    pub center: Point3<f64>,

    /// The primitives of the shell in file order.
    #[builder(setter(custom))]
    primitives: Arc<[Primitive]>,

    /// Whether the shell is spherical-harmonic (`true`) or Cartesian (`false`).
    #[builder(default = "true")]
    pub pure: bool,
}

impl ShellBuilder {
    pub fn primitives(&mut self, primitives: &[Primitive]) -> &mut Self {
        self.primitives = Some(Arc::from(primitives));
        self
    }
}

impl Shell {
    /// Returns a builder to construct a new [`Shell`].
    pub fn builder() -> ShellBuilder {
        ShellBuilder::default()
    }

    /// Constructs a new pure shell from its label.
    ///
    /// # Arguments
    ///
    /// * `label` - The shell label in any case.
    /// * `center` - The centre of the shell.
    /// * `primitives` - The primitives of the shell.
    ///
    /// # Errors
    ///
    /// Errors if the label is not a known angular momentum.
    pub fn new(
        label: &str,
        center: Point3<f64>,
        primitives: &[Primitive],
    ) -> Result<Self, anyhow::Error> {
        let l = angmom_from_label(label)?;
        Self::builder()
            .l(l)
            .label(normalise_symbol(label))
            .center(center)
            .primitives(primitives)
            .build()
            .map_err(|err| format_err!(err))
    }

    /// The primitives of this shell.
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// A shared handle to the primitives of this shell.
    pub fn shared_primitives(&self) -> Arc<[Primitive]> {
        Arc::clone(&self.primitives)
    }

    /// Returns a copy of this shell placed at a new centre. The primitives are shared with this
    /// shell.
    #[must_use]
    pub fn placed_at(&self, center: Point3<f64>) -> Self {
        Self {
            center,
            ..self.clone()
        }
    }

    /// The number of Cartesian components in this shell.
    pub fn n_cart_funcs(&self) -> usize {
        let l = self.l as usize;
        ((l + 1) * (l + 2)).div_euclid(2)
    }

    /// The number of functions in this shell as counted by electronic-structure programs:
    /// $`2l + 1`$ if the shell is pure and $`(l + 1)(l + 2)/2`$ otherwise.
    pub fn n_funcs(&self) -> usize {
        if self.pure {
            2 * self.l as usize + 1
        } else {
            self.n_cart_funcs()
        }
    }

    /// Expands this shell into its Cartesian basis functions in lexicographic order.
    ///
    /// # Arguments
    ///
    /// * `shell_index` - The index of this shell in its basis set.
    /// * `atom_index` - The index of the atom on which this shell is centred.
    pub fn basis_functions(&self, shell_index: usize, atom_index: usize) -> Vec<BasisFunction> {
        CartOrder::lex(self.l)
            .iter()
            .map(|&cart_tuple| BasisFunction {
                center: self.center,
                cart_tuple,
                shell_index,
                atom_index,
                primitives: self.shared_primitives(),
            })
            .collect_vec()
    }

    /// Rescales the contraction coefficients so that the contracted $`x^l e^{-a r^2}`$ function
    /// of this shell has unit self-overlap. The rescaled coefficients include the normalisation
    /// constants of the primitives.
    ///
    /// # Errors
    ///
    /// Errors if any exponent is not positive or if the contraction has no positive
    /// self-overlap.
    pub fn normalise(&mut self) -> Result<(), anyhow::Error> {
        ensure!(
            self.primitives.iter().all(|prim| prim.exponent > 0.0),
            "Shell {} has a non-positive exponent.",
            self.label
        );
        let l = self.l;
        let dfact = double_factorial_odd(l);
        let scaled = self
            .primitives
            .iter()
            .map(|prim| prim.coefficient * primitive_norm(prim.exponent, l))
            .collect_vec();
        let overlap = self
            .primitives
            .iter()
            .zip(scaled.iter())
            .cartesian_product(self.primitives.iter().zip(scaled.iter()))
            .map(|((prim_i, ci), (prim_j, cj))| {
                let p = prim_i.exponent + prim_j.exponent;
                ci * cj * (PI / p).powf(1.5) * dfact / (2.0 * p).powi(l as i32)
            })
            .sum::<f64>();
        ensure!(
            overlap > 0.0,
            "Shell {} has a non-positive self-overlap of {overlap}.",
            self.label
        );
        let factor = overlap.sqrt().recip();
        self.primitives = self
            .primitives
            .iter()
            .zip(scaled)
            .map(|(prim, c)| Primitive::new(prim.exponent, c * factor))
            .collect();
        Ok(())
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} shell (l = {}, {}) at ({:+.7}, {:+.7}, {:+.7})",
            self.label,
            self.l,
            if self.pure { "pure" } else { "Cartesian" },
            self.center[0],
            self.center[1],
            self.center[2],
        )?;
        for prim in self.primitives.iter() {
            writeln!(f, "  {:>18.10e} {:>18.10e}", prim.exponent, prim.coefficient)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Shell({}, {}, {:?})",
            angmom_label(self.l),
            self.pure,
            self.primitives
        )
    }
}

/// The double factorial $`(2l - 1)!!`$, with $`(-1)!! = 1`$.
fn double_factorial_odd(l: u32) -> f64 {
    (1..=l).map(|k| f64::from(2 * k - 1)).product()
}

/// The normalisation constant of a primitive $`x^l e^{-a r^2}`$ Gaussian.
fn primitive_norm(exponent: f64, l: u32) -> f64 {
    (2.0 * exponent / PI).powf(0.75) * (4.0 * exponent).powf(f64::from(l) / 2.0)
        / double_factorial_odd(l).sqrt()
}
