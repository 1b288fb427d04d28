//! Logger configuration for applications using `capdata`.

use std::path::Path;

use anyhow::{self, Context};
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Handle;

#[cfg(test)]
#[path = "logging_tests.rs"]
mod logging_tests;

/// Pattern used for the main `capdata-output` stream.
const OUTPUT_PATTERN: &str = "{m}{n}";

/// Pattern used for diagnostic messages.
const DIAGNOSTIC_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {h({l:<5})} {t} - {m}{n}";

/// Builds a `log4rs` configuration with two streams: the `capdata-output` target for the main
/// output and the root logger for diagnostics on standard error.
///
/// # Arguments
///
/// * `output` - A file to which the main output is written. If `None`, the main output goes to
/// standard output.
/// * `level` - The level filter of the diagnostic stream.
///
/// # Errors
///
/// Errors if the output file cannot be created or the configuration is invalid.
pub fn logger_config(output: Option<&Path>, level: LevelFilter) -> Result<Config, anyhow::Error> {
    let output_appender: Box<dyn log4rs::append::Append> = match output {
        Some(path) => Box::new(
            FileAppender::builder()
                .encoder(Box::new(PatternEncoder::new(OUTPUT_PATTERN)))
                .append(false)
                .build(path)
                .with_context(|| {
                    format!("Unable to create the output log file `{}`", path.display())
                })?,
        ),
        None => Box::new(
            ConsoleAppender::builder()
                .encoder(Box::new(PatternEncoder::new(OUTPUT_PATTERN)))
                .target(Target::Stdout)
                .build(),
        ),
    };
    let diagnostic_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(DIAGNOSTIC_PATTERN)))
        .target(Target::Stderr)
        .build();

    Config::builder()
        .appender(Appender::builder().build("output", output_appender))
        .appender(Appender::builder().build("diagnostic", Box::new(diagnostic_appender)))
        .logger(
            Logger::builder()
                .appender("output")
                .additive(false)
                .build("capdata-output", LevelFilter::Info),
        )
        .build(Root::builder().appender("diagnostic").build(level))
        .context("Invalid logger configuration")
}

/// Builds and installs the `capdata` logger.
///
/// # Errors
///
/// Errors if the configuration cannot be built or a global logger has already been installed.
pub fn setup_logger(output: Option<&Path>, level: LevelFilter) -> Result<Handle, anyhow::Error> {
    let config = logger_config(output, level)?;
    log4rs::init_config(config).context("Unable to install the logger")
}
