//! Angular momentum labels.

use anyhow::format_err;
use phf::phf_map;

use crate::auxiliary::atom::normalise_symbol;

/// Alphabetical labels of angular momenta.
pub static ANGMOM_LABELS: [&str; 7] = ["S", "P", "D", "F", "G", "H", "I"];

/// Indices of alphabetical labels of angular momenta.
pub static ANGMOM_INDICES: phf::Map<&'static str, u32> = phf_map! {
    "S" => 0,
    "P" => 1,
    "D" => 2,
    "F" => 3,
    "G" => 4,
    "H" => 5,
    "I" => 6,
};

/// Converts a shell label in any case into its angular momentum.
///
/// # Errors
///
/// Errors if the label is not one of [`ANGMOM_LABELS`].
pub fn angmom_from_label(label: &str) -> Result<u32, anyhow::Error> {
    let label = normalise_symbol(label);
    ANGMOM_INDICES
        .get(label.as_str())
        .copied()
        .ok_or_else(|| format_err!("Unknown shell label `{label}`."))
}

/// Returns the alphabetical label of an angular momentum, or its numerical value if the
/// angular momentum is beyond [`ANGMOM_LABELS`].
pub fn angmom_label(l: u32) -> String {
    usize::try_from(l)
        .ok()
        .and_then(|l| ANGMOM_LABELS.get(l))
        .map(|label| label.to_string())
        .unwrap_or_else(|| l.to_string())
}
