//! Contracted Gaussian shells and the Cartesian basis functions expanded from them.

pub mod ao;
pub mod shell;
