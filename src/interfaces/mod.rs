//! Interfaces between `capdata` and the files written by other software.

use anyhow;

pub mod gaussian;
pub mod input;
pub mod molden;
pub mod qchem;
pub mod xyz;

/// Trait for handling an input specification.
pub trait InputHandle {
    /// Handles the input section and runs appropriate calculations.
    fn handle(&self) -> Result<(), anyhow::Error>;
}
