//! Formatting of `capdata` output.

use std::fmt;

use log;

const CAPDATA_BANNER_LENGTH: usize = 80;

/// Logs a warning to both the default logger and the `capdata-output` logger.
macro_rules! capdata_warn {
    ($fmt:expr $(, $($arg:tt)*)?) => {
        log::warn!($fmt, $($($arg)*)?);
        log::warn!(target: "capdata-output", $fmt, $($($arg)*)?);
    }
}

/// Logs a main output line to the `capdata-output` logger.
macro_rules! capdata_output {
    ($fmt:expr $(, $($arg:tt)*)?) => { log::info!(target: "capdata-output", $fmt, $($($arg)*)?); }
}

pub(crate) use {capdata_output, capdata_warn};

/// Logs a section title to the `capdata-output` logger.
pub(crate) fn log_title(title: &str) {
    let length = title.chars().count().max(CAPDATA_BANNER_LENGTH - 6);
    let bar = "─".repeat(length);
    capdata_output!("┌──{bar}──┐");
    capdata_output!("│§ {title:^length$} §│");
    capdata_output!("└──{bar}──┘");
}

/// Writes an underlined subtitle.
pub(crate) fn write_subtitle(f: &mut fmt::Formatter<'_>, subtitle: &str) -> fmt::Result {
    let length = subtitle.chars().count();
    let bar = "═".repeat(length);
    writeln!(f, "{subtitle}")?;
    writeln!(f, "{bar}")?;
    Ok(())
}

/// Logs an underlined subtitle to the `capdata-output` logger.
pub(crate) fn log_subtitle(subtitle: &str) {
    let length = subtitle.chars().count();
    let bar = "═".repeat(length);
    capdata_output!("{}", subtitle);
    capdata_output!("{}", bar);
}

/// A trait for logging `capdata` structures line by line.
pub(crate) trait CapDataOutput: fmt::Debug + fmt::Display {
    /// Logs display output.
    fn log_output_display(&self) {
        let lines = self.to_string();
        lines.lines().for_each(|line| {
            capdata_output!("{line}");
        })
    }
}

// Blanket implementation
impl<T> CapDataOutput for T where T: fmt::Debug + fmt::Display {}
