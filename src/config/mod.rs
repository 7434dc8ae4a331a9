// Copyright 2020 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use clap::{App, Arg};
use log::{info, LevelFilter};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

pub struct Config {
    file1: String,
    file2: String,
    name1: String,
    name2: String,
    stat: String,
    use_percentage: bool,
    logging: LevelFilter,
}

impl Config {
    /// parse command line options and return `Config`
    pub fn new() -> Config {
        let matches = App::new(NAME)
            .version(VERSION)
            .about("Compare cache statistics between two benchmark runs")
            .arg(
                Arg::with_name("file1")
                    .value_name("FILE")
                    .help("First statistics file")
                    .required(true)
                    .index(1),
            )
            .arg(
                Arg::with_name("file2")
                    .value_name("FILE")
                    .help("Second statistics file")
                    .required(true)
                    .index(2),
            )
            .arg(
                Arg::with_name("name1")
                    .long("name1")
                    .value_name("LABEL")
                    .help("Display label for the first file")
                    .takes_value(true),
            )
            .arg(
                Arg::with_name("name2")
                    .long("name2")
                    .value_name("LABEL")
                    .help("Display label for the second file")
                    .takes_value(true),
            )
            .arg(
                Arg::with_name("stat")
                    .long("stat")
                    .value_name("NAME")
                    .help("Statistic to plot")
                    .takes_value(true),
            )
            .arg(
                Arg::with_name("percentage")
                    .long("percentage")
                    .value_name("true|false")
                    .help("Plot percentages (true) or raw totals (false)")
                    .takes_value(true),
            )
            .arg(
                Arg::with_name("verbose")
                    .short("v")
                    .long("verbose")
                    .help("Increase verbosity by one level. Can be used more than once")
                    .multiple(true),
            )
            .get_matches();

        // anything other than the literal `true` selects totals
        let use_percentage = matches
            .value_of("percentage")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(true);

        let logging = match matches.occurrences_of("verbose") {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };

        Config {
            file1: matches.value_of("file1").unwrap().to_string(),
            file2: matches.value_of("file2").unwrap().to_string(),
            name1: matches.value_of("name1").unwrap_or("File 1").to_string(),
            name2: matches.value_of("name2").unwrap_or("File 2").to_string(),
            stat: matches.value_of("stat").unwrap_or("Cache Hits").to_string(),
            use_percentage,
            logging,
        }
    }

    pub fn file1(&self) -> &str {
        &self.file1
    }

    pub fn file2(&self) -> &str {
        &self.file2
    }

    pub fn name1(&self) -> &str {
        &self.name1
    }

    pub fn name2(&self) -> &str {
        &self.name2
    }

    /// the primary statistic to render
    pub fn stat(&self) -> &str {
        &self.stat
    }

    pub fn use_percentage(&self) -> bool {
        self.use_percentage
    }

    /// get logging level
    pub fn logging(&self) -> LevelFilter {
        self.logging
    }

    pub fn print(&self) {
        info!("-----");
        info!("Config: File 1: {} Label: {}", self.file1, self.name1);
        info!("Config: File 2: {} Label: {}", self.file2, self.name2);
        info!(
            "Config: Statistic: {} Mode: {}",
            self.stat,
            if self.use_percentage {
                "percentage"
            } else {
                "total"
            }
        );
    }
}
