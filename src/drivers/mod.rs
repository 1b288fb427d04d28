//! Drivers assembling systems and reading electronic-structure results.

use anyhow;

pub mod qchem_data;
pub mod system;

// =================
// Trait definitions
// =================

/// Trait defining behaviours of `capdata` drivers.
pub trait CapDataDriver {
    /// The type of the parameter structure controlling the driver.
    type Params;

    /// The type of the successful outcome when executing the driver.
    type Outcome;

    /// Executes the driver and stores the result internally.
    fn run(&mut self) -> Result<(), anyhow::Error>;

    /// Returns the result of the driver execution.
    fn result(&self) -> Result<&Self::Outcome, anyhow::Error>;
}
