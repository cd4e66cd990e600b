use std::io::{self, Write};

use colored::Colorize;
use log::{Level, LevelFilter, Metadata, Record};

/// Stderr logger. Stdout carries raw samples, so nothing is ever logged there.
#[derive(Clone, Copy)]
pub struct ColorLogger {
    max_level: LevelFilter,
}

impl ColorLogger {
    /// `verbosity` counts `-v` flags: 0 = info, 1 = debug, 2+ = trace.
    pub fn new(quiet: bool, verbosity: u8) -> Self {
        let max_level = if quiet {
            LevelFilter::Off
        } else {
            match verbosity {
                0 => LevelFilter::Info,
                1 => LevelFilter::Debug,
                _ => LevelFilter::Trace,
            }
        };
        Self { max_level }
    }

    pub fn max_level(&self) -> LevelFilter {
        self.max_level
    }
}

impl log::Log for ColorLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        match record.level() {
            Level::Error => eprintln!(
                "{} {}",
                "[ERROR]".red().bold(),
                format!("{}", record.args()).red().bold()
            ),
            Level::Warn => eprintln!(
                "{} {}",
                "[WARN]".yellow().bold(),
                format!("{}", record.args()).yellow().bold()
            ),
            Level::Info => eprintln!(
                "[{}] {}",
                record.level().to_string().blue(),
                record.args()
            ),
            // Debug and trace lines name the emitting module.
            _ => eprintln!(
                "[{}] {} {}",
                record.level().to_string().blue(),
                record.target().dimmed(),
                record.args()
            ),
        }
        self.flush();
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    #[test]
    fn verbosity_maps_to_level() {
        assert_eq!(ColorLogger::new(false, 0).max_level(), LevelFilter::Info);
        assert_eq!(ColorLogger::new(false, 1).max_level(), LevelFilter::Debug);
        assert_eq!(ColorLogger::new(false, 5).max_level(), LevelFilter::Trace);
        assert_eq!(ColorLogger::new(true, 2).max_level(), LevelFilter::Off);
    }

    #[test]
    fn enabled_respects_max_level() {
        let logger = ColorLogger::new(false, 0);
        let info = Metadata::builder().level(Level::Info).build();
        let debug = Metadata::builder().level(Level::Debug).build();
        assert!(logger.enabled(&info));
        assert!(!logger.enabled(&debug));
    }
}
