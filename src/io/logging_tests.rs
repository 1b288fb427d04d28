use std::env;

use log::LevelFilter;

use crate::io::logging::logger_config;

#[test]
fn test_io_logging_config_stdout() {
    let config = logger_config(None, LevelFilter::Warn).unwrap();
    assert_eq!(config.appenders().len(), 2);
    assert_eq!(config.loggers().len(), 1);
    assert_eq!(config.loggers()[0].name(), "capdata-output");
    assert_eq!(config.root().level(), LevelFilter::Warn);
}

#[test]
fn test_io_logging_config_file() {
    let path = env::temp_dir().join("capdata_logging_test.out");
    let config = logger_config(Some(&path), LevelFilter::Debug).unwrap();
    assert_eq!(config.appenders().len(), 2);
    assert!(path.exists());
}

