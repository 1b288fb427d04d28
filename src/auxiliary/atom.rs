//! Atoms and length units.

use std::collections::HashMap;
use std::fmt;

use nalgebra::Point3;
use periodic_table;
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "atom_tests.rs"]
mod atom_tests;

/// Number of bohr radii in one ångström.
pub const ANG_TO_BOHR: f64 = 1.889_726_124_625_770_2;

/// Symbol given to centres without an associated element, such as ghost atoms.
pub const GHOST_SYMBOL: &str = "X";

/// Normalises an element symbol or shell label so that all parsers key their lookups
/// identically.
///
/// # Arguments
///
/// * `symbol` - The raw symbol as read in from a file.
///
/// # Returns
///
/// The trimmed, uppercased symbol.
#[must_use]
pub fn normalise_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

// ==========
// LengthUnit
// ==========

/// Enumerated type for the length unit in which a set of coordinates is expressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    /// Ångström.
    Angstrom,

    /// Bohr radius (atomic unit of length).
    #[default]
    Bohr,
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LengthUnit::Angstrom => write!(f, "Å"),
            LengthUnit::Bohr => write!(f, "bohr"),
        }
    }
}

// ==========
// ElementMap
// ==========

/// A struct storing look-ups between normalised element symbols and atomic numbers.
pub struct ElementMap {
    /// A [`HashMap`] from an uppercased symbol to an atomic number.
    numbers: HashMap<String, u32>,

    /// A [`HashMap`] from an atomic number to an uppercased symbol.
    symbols: HashMap<u32, String>,
}

impl Default for ElementMap {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementMap {
    /// Creates a new [`ElementMap`] for all elements in the periodic table.
    #[must_use]
    pub fn new() -> Self {
        let mut numbers = HashMap::new();
        let mut symbols = HashMap::new();
        for element in periodic_table::periodic_table() {
            let symbol = normalise_symbol(element.symbol);
            numbers.insert(symbol.clone(), element.atomic_number);
            symbols.insert(element.atomic_number, symbol);
        }
        ElementMap { numbers, symbols }
    }

    /// Returns the atomic number of an element symbol, if the symbol is known.
    pub fn atomic_number(&self, symbol: &str) -> Option<u32> {
        self.numbers.get(&normalise_symbol(symbol)).copied()
    }

    /// Returns the uppercased symbol of an atomic number, if the number is known.
    pub fn symbol(&self, atomic_number: u32) -> Option<&str> {
        self.symbols.get(&atomic_number).map(String::as_str)
    }
}

// ====
// Atom
// ====

/// A struct representing an atomic centre read in from a geometry file.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    /// The uppercased atomic symbol of the atom.
    pub atomic_symbol: String,

    /// The atomic number of the atom, or `None` for centres that do not correspond to an
    /// element (*e.g.* ghost atoms).
    pub atomic_number: Option<u32>,

    /// The position of the atom.
    pub coordinates: Point3<f64>,

    /// The unit in which [`Self::coordinates`] is currently expressed.
    pub unit: LengthUnit,
}

impl Atom {
    /// Constructs an atom from its symbol.
    ///
    /// # Arguments
    ///
    /// * `symbol` - The element symbol in any case.
    /// * `coordinates` - The position of the atom.
    /// * `unit` - The unit of `coordinates`. No conversion is performed.
    /// * `emap` - A look-up between element symbols and atomic numbers.
    #[must_use]
    pub fn from_symbol(
        symbol: &str,
        coordinates: Point3<f64>,
        unit: LengthUnit,
        emap: &ElementMap,
    ) -> Self {
        Atom {
            atomic_symbol: normalise_symbol(symbol),
            atomic_number: emap.atomic_number(symbol),
            coordinates,
            unit,
        }
    }

    /// Constructs an atom from its nuclear charge. A zero charge gives a ghost centre labelled
    /// [`GHOST_SYMBOL`].
    ///
    /// # Errors
    ///
    /// Errors if the charge does not correspond to any known element.
    pub fn from_charge(
        charge: u32,
        coordinates: Point3<f64>,
        unit: LengthUnit,
        emap: &ElementMap,
    ) -> Result<Self, anyhow::Error> {
        if charge == 0 {
            return Ok(Atom {
                atomic_symbol: GHOST_SYMBOL.to_string(),
                atomic_number: None,
                coordinates,
                unit,
            });
        }
        let symbol = emap
            .symbol(charge)
            .ok_or_else(|| anyhow::format_err!("No element has nuclear charge {charge}."))?;
        Ok(Atom {
            atomic_symbol: symbol.to_string(),
            atomic_number: Some(charge),
            coordinates,
            unit,
        })
    }

    /// Converts the coordinates of this atom to bohr. Atoms already in bohr are left untouched,
    /// so repeated calls scale the coordinates at most once.
    pub fn to_bohr(&mut self) {
        if self.unit == LengthUnit::Angstrom {
            self.coordinates = Point3::from(self.coordinates.coords * ANG_TO_BOHR);
            self.unit = LengthUnit::Bohr;
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>9} {:>3} {:+12.7} {:+12.7} {:+12.7} ({})",
            "Atom",
            self.atomic_symbol,
            self.coordinates[0],
            self.coordinates[1],
            self.coordinates[2],
            self.unit,
        )
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}
