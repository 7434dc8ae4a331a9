// Copyright 2020 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// log an error and terminate with a non-zero exit code
macro_rules! fatal {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
        ::std::process::exit(1)
    }};
}

/// Timestamped logger writing to standard out.
pub struct Logger {
    label: String,
    level: LevelFilter,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            label: String::new(),
            level: LevelFilter::Info,
        }
    }

    /// set the label used for info and coarser messages
    pub fn label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    /// set the maximum level which will be logged
    pub fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// register as the global logger
    pub fn init(self) -> Result<(), SetLoggerError> {
        log::set_max_level(self.level);
        log::set_boxed_logger(Box::new(self))
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // show the module path for fine-grained levels, the label otherwise
        let target = if record.level() >= Level::Debug || self.label.is_empty() {
            record.target()
        } else {
            self.label.as_str()
        };
        println!(
            "{} {:<5} [{}] {}",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            target,
            record.args()
        );
    }

    fn flush(&self) {}
}
