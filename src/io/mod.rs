//! Reading of input configurations and line-oriented text sources.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{self, format_err};
use serde::de::DeserializeOwned;
use serde_yaml;

pub(crate) mod format;
pub mod lines;
pub mod logging;

pub use lines::{parse_fortran_float, LineCursor};

/// Reads a configuration YAML file and deserialises it into an appropriate structure.
///
/// # Arguments
///
/// * `name` - The name of the file to be read in (with its `.yml` or `.yaml` extension).
///
/// # Returns
///
/// A `Result` containing the structure deserialised from the read-in file.
pub fn read_input_yaml<T, P: AsRef<Path>>(name: P) -> Result<T, anyhow::Error>
where
    T: DeserializeOwned,
{
    let path = name.as_ref();
    let mut reader = BufReader::new(
        File::open(path)
            .map_err(|err| format_err!("Unable to open `{}`: {err}", path.display()))?,
    );
    serde_yaml::from_reader(&mut reader).map_err(|err| format_err!(err))
}
